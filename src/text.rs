use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize text for comparison: lowercase, strip diacritics (NFKD plus
/// combining-mark removal), trim surrounding whitespace.
///
/// Every country/faculty/status comparison in the crate goes through this so
/// that accented and unaccented spellings of the same word match.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a monetary amount, accepting either a comma or a dot as the decimal
/// separator. Campaign exports in this domain use both.
pub fn parse_amount(value: &str) -> Option<f64> {
    value.trim().replace(',', ".").parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("España"), "espana");
        assert_eq!(normalize("Perú"), "peru");
        assert_eq!(normalize("Azerbaiyán"), "azerbaiyan");
        assert_eq!(normalize("Diseño"), "diseno");
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(normalize("  MEDICINA México  "), "medicina mexico");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("República Dominicana");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_parse_amount_accepts_both_separators() {
        assert_eq!(parse_amount("1.5"), Some(1.5));
        assert_eq!(parse_amount("1,5"), Some(1.5));
        assert_eq!(parse_amount(" 41 "), Some(41.0));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }
}
