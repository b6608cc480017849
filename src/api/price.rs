use regex::Regex;
use std::sync::OnceLock;

static PRICE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn price_pattern() -> &'static Regex {
    PRICE_PATTERN.get_or_init(|| Regex::new(r"([0-9]+)\s*€").expect("valid price pattern"))
}

/// First integer directly followed (whitespace allowed) by a euro sign.
pub fn extract_price(description: &str) -> Option<u64> {
    price_pattern()
        .captures(description)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_match() {
        assert_eq!(extract_price("Vendu 50 € ou 40€ si rapide"), Some(50));
        assert_eq!(extract_price("prix: 1200€"), Some(1200));
    }

    #[test]
    fn test_only_trailing_digits_of_a_formatted_number() {
        // "1 200 €" only captures the group touching the symbol
        assert_eq!(extract_price("1 200 €"), Some(200));
    }

    #[test]
    fn test_no_currency_pattern() {
        assert_eq!(extract_price("Statue bronze, prix à débattre"), None);
        assert_eq!(extract_price("€ 50"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn test_zero_is_extracted_as_zero() {
        assert_eq!(extract_price("0 €"), Some(0));
    }
}
