//! Defensive field extraction from provider page responses.
//!
//! The provider's company listing is loosely shaped: pages arrive as a
//! bare array or wrapped under `data`/`items`, and record fields vary
//! between camelCase and snake_case. Extraction tries each known key in
//! priority order.

use serde_json::Value as JsonValue;

/// Fallback name for records that carry no usable name field.
pub const FALLBACK_NAME: &str = "Sem nome";

/// Extracts the records of one page response.
///
/// Accepts a bare array, `{"data": [...]}` or `{"items": [...]}`.
/// Returns `None` for anything else.
pub fn page_records(body: &JsonValue) -> Option<&Vec<JsonValue>> {
    if let Some(records) = body.as_array() {
        return Some(records);
    }
    body.get("data")
        .and_then(JsonValue::as_array)
        .or_else(|| body.get("items").and_then(JsonValue::as_array))
}

/// Extracts the page-count hint from a wrapped page response, if present.
pub fn total_pages(body: &JsonValue) -> Option<u64> {
    body.get("totalPages")
        .or_else(|| body.get("total_pages"))
        .and_then(JsonValue::as_u64)
}

/// Extracts the raw tax identifier of a record.
///
/// Candidate keys in priority order: `cnpj`, `cpf`, `identificador`,
/// `document`. Empty strings do not count.
pub fn record_identifier(record: &JsonValue) -> Option<&str> {
    ["cnpj", "cpf", "identificador", "document"]
        .iter()
        .find_map(|key| non_empty_str(record.get(*key)))
}

/// Extracts the display name of a record.
///
/// Candidate keys in priority order: `razaoSocial`, `razao_social`,
/// `nome`, `name`. Falls back to a placeholder when none is usable.
pub fn record_name(record: &JsonValue) -> String {
    ["razaoSocial", "razao_social", "nome", "name"]
        .iter()
        .find_map(|key| non_empty_str(record.get(*key)))
        .unwrap_or(FALLBACK_NAME)
        .to_string()
}

/// Extracts the tax regime hint some records carry.
pub fn record_tax_regime(record: &JsonValue) -> Option<String> {
    ["regimeTributario", "regime_tributario"]
        .iter()
        .find_map(|key| non_empty_str(record.get(*key)))
        .map(str::to_string)
}

fn non_empty_str(value: Option<&JsonValue>) -> Option<&str> {
    value
        .and_then(JsonValue::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_records_accepts_all_shapes() {
        let bare = json!([{"cnpj": "1"}]);
        let data = json!({"data": [{"cnpj": "1"}]});
        let items = json!({"items": [{"cnpj": "1"}]});

        assert_eq!(page_records(&bare).unwrap().len(), 1);
        assert_eq!(page_records(&data).unwrap().len(), 1);
        assert_eq!(page_records(&items).unwrap().len(), 1);
        assert!(page_records(&json!({"other": true})).is_none());
    }

    #[test]
    fn total_pages_reads_both_spellings() {
        assert_eq!(total_pages(&json!({"totalPages": 3})), Some(3));
        assert_eq!(total_pages(&json!({"total_pages": 7})), Some(7));
        assert_eq!(total_pages(&json!({"data": []})), None);
    }

    #[test]
    fn identifier_priority_order() {
        let record = json!({"cpf": "123", "cnpj": "456"});
        assert_eq!(record_identifier(&record), Some("456"));

        let record = json!({"document": "789", "identificador": "abc"});
        assert_eq!(record_identifier(&record), Some("abc"));
    }

    #[test]
    fn identifier_skips_empty_values() {
        let record = json!({"cnpj": "", "cpf": "123"});
        assert_eq!(record_identifier(&record), Some("123"));

        let record = json!({"cnpj": "  "});
        assert_eq!(record_identifier(&record), None);
    }

    #[test]
    fn name_priority_and_fallback() {
        let record = json!({"nome": "Nome", "razaoSocial": "Razao"});
        assert_eq!(record_name(&record), "Razao");

        let record = json!({"name": "Fallback Name"});
        assert_eq!(record_name(&record), "Fallback Name");

        let record = json!({"cnpj": "123"});
        assert_eq!(record_name(&record), FALLBACK_NAME);
    }

    #[test]
    fn tax_regime_hint_is_optional() {
        let record = json!({"regimeTributario": "lucro_real"});
        assert_eq!(record_tax_regime(&record), Some("lucro_real".to_string()));

        let record = json!({"regime_tributario": "mei"});
        assert_eq!(record_tax_regime(&record), Some("mei".to_string()));

        assert_eq!(record_tax_regime(&json!({"cnpj": "1"})), None);
    }
}
