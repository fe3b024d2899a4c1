//! Input sanitization for the evaluator.
//!
//! Expressions reach the evaluator as free text. Before tokenizing, every
//! character outside the arithmetic alphabet is stripped so that stray
//! input from the front-end can never change what gets evaluated.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Matches any character that is not part of the arithmetic alphabet.
    /// Allows: digits, the four operators, dots and parentheses.
    static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^0-9+\-*/().]").unwrap();
}

/// Strip every character not in `0-9 + - * / . ( )`.
///
/// Returns the input unchanged (borrowed) when nothing had to be removed.
pub fn sanitize(input: &str) -> Cow<'_, str> {
    DISALLOWED_CHARS.replace_all(input, "")
}

/// Check whether the input contains characters the evaluator would drop.
pub fn has_disallowed_chars(input: &str) -> bool {
    DISALLOWED_CHARS.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_input_is_borrowed() {
        let sanitized = sanitize("(1+2)*3.5/4-5");
        assert!(matches!(sanitized, Cow::Borrowed(_)));
        assert_eq!(sanitized, "(1+2)*3.5/4-5");
    }

    #[test]
    fn test_strips_foreign_characters() {
        assert_eq!(sanitize("2 + 2"), "2+2");
        assert_eq!(sanitize("alert(1)"), "(1)");
        assert_eq!(sanitize("3×4"), "34");
        assert_eq!(sanitize("1_000^2"), "10002");
        assert_eq!(sanitize("abc"), "");
    }

    #[test]
    fn test_disallowed_detection() {
        assert!(!has_disallowed_chars("12.5*(3-1)"));
        assert!(has_disallowed_chars("12 + 1"));
        assert!(has_disallowed_chars("2^3"));
    }
}
