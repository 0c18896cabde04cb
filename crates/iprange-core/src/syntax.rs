//! Textual address syntax checks

use once_cell::sync::Lazy;
use regex::Regex;

static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}$").expect("static regex is valid")
});

/// Returns true if `text` has the shape of a dotted-decimal address.
///
/// Only the shape is checked (four groups of one to three digits); octet
/// ranges are validated by [`Address::parse`](crate::Address::parse).
pub fn is_dotted_quad(text: &str) -> bool {
    DOTTED_QUAD.is_match(text)
}

/// Returns true if `text` is one or more ASCII digits with no sign.
pub fn is_decimal(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_quad_matches() {
        assert!(is_dotted_quad("255.255.255.0"));
        assert!(is_dotted_quad("0.0.0.0"));
        assert!(is_dotted_quad("999.1.1.1"));
    }

    #[test]
    fn test_dotted_quad_rejects() {
        assert!(!is_dotted_quad("24"));
        assert!(!is_dotted_quad("255.255.0"));
        assert!(!is_dotted_quad("255.255.0.0.0"));
        assert!(!is_dotted_quad("255.255.a.0"));
        assert!(!is_dotted_quad(" 255.255.0.0"));
        assert!(!is_dotted_quad("1000.0.0.0"));
    }

    #[test]
    fn test_is_decimal() {
        assert!(is_decimal("0"));
        assert!(is_decimal("24"));
        assert!(is_decimal("007"));
        assert!(!is_decimal(""));
        assert!(!is_decimal("+8"));
        assert!(!is_decimal("-1"));
        assert!(!is_decimal("2 4"));
    }
}
