//! Payload fingerprinting for change detection.
//!
//! A record's fingerprint is the SHA-256 of its canonical JSON
//! serialization. Canonical form sorts object keys at every level, so
//! two payloads that differ only in key order fingerprint identically.

use serde_json::Value as JsonValue;
use sha2::{Digest, Sha256};

/// Computes the hex-encoded SHA-256 fingerprint of a JSON value.
pub fn fingerprint(value: &JsonValue) -> String {
    let canonical = canonical_json(value);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Serializes a JSON value with object keys sorted at every level.
fn canonical_json(value: &JsonValue) -> String {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<(&String, &JsonValue)> = map.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());

            let body: Vec<String> = entries
                .into_iter()
                .map(|(key, inner)| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(key).unwrap_or_default(),
                        canonical_json(inner)
                    )
                })
                .collect();
            format!("{{{}}}", body.join(","))
        }
        JsonValue::Array(items) => {
            let body: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", body.join(","))
        }
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_order_does_not_change_fingerprint() {
        let a = json!({"cnpj": "123", "nome": "Acme", "extra": {"b": 1, "a": 2}});
        let b = json!({"extra": {"a": 2, "b": 1}, "nome": "Acme", "cnpj": "123"});
        assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn value_change_changes_fingerprint() {
        let a = json!({"cnpj": "123", "nome": "Acme"});
        let b = json!({"cnpj": "123", "nome": "Acme Ltda"});
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn array_order_matters() {
        let a = json!([1, 2, 3]);
        let b = json!([3, 2, 1]);
        assert_ne!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_is_hex_sha256() {
        let value = json!({"k": "v"});
        let fp = fingerprint(&value);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
