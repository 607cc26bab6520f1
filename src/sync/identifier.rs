//! Brazilian tax identifier normalization.
//!
//! Provider records carry CNPJ/CPF values in mixed formats; matching
//! relies on a single canonical presentation per identifier.

/// Formats a raw tax identifier into its canonical presentation.
///
/// 14 digits format as CNPJ (`##.###.###/####-##`), 11 digits as CPF
/// (`###.###.###-##`). Anything else passes through trimmed, so
/// unexpected identifiers still match themselves on re-sync.
pub fn format_tax_id(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        14 => format!(
            "{}.{}.{}/{}-{}",
            &digits[0..2],
            &digits[2..5],
            &digits[5..8],
            &digits[8..12],
            &digits[12..14]
        ),
        11 => format!(
            "{}.{}.{}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..9],
            &digits[9..11]
        ),
        _ => raw.trim().to_string(),
    }
}

/// Strips identifier punctuation for provider-side key storage.
///
/// Removes `.`, `-` and `/` and trims whitespace; other characters are
/// preserved.
pub fn external_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_cnpj() {
        assert_eq!(format_tax_id("12345678000195"), "12.345.678/0001-95");
        assert_eq!(format_tax_id("12.345.678/0001-95"), "12.345.678/0001-95");
    }

    #[test]
    fn formats_cpf() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
        assert_eq!(format_tax_id("123.456.789-01"), "123.456.789-01");
    }

    #[test]
    fn passes_through_other_lengths() {
        assert_eq!(format_tax_id("  ABC-123  "), "ABC-123");
        assert_eq!(format_tax_id("123"), "123");
    }

    #[test]
    fn external_key_strips_punctuation() {
        assert_eq!(external_key("12.345.678/0001-95"), "12345678000195");
        assert_eq!(external_key(" 123.456.789-01 "), "12345678901");
        assert_eq!(external_key("ABC-123"), "ABC123");
    }

    #[test]
    fn formatting_is_stable_under_reformat() {
        let formatted = format_tax_id("12345678000195");
        assert_eq!(format_tax_id(&formatted), formatted);
    }
}
