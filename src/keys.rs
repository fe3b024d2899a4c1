//! Keypad vocabulary.
//!
//! Maps the labels of the calculator keypad (and their ASCII spellings for
//! terminals) to [`Key`] values the session understands.

use std::str::FromStr;

use thiserror::Error;

use crate::calculator::UnaryOp;

/// A single key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// `0`-`9` or `.`
    Digit(char),
    /// `(` or `)`
    Paren(char),
    /// One of `+ - * /` (already normalized from `×` and `÷`).
    Operator(char),
    /// `⌫`
    Delete,
    /// `C`
    Clear,
    /// `=`
    Evaluate,
    /// `√`, `x²` or `%`
    Unary(UnaryOp),
    /// Show or hide the history panel.
    ToggleHistory,
    /// Wipe the stored history.
    ClearHistory,
    /// Copy the displayed result.
    Copy,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key: {0}")]
    Unknown(String),
}

impl Key {
    /// Look up a single-character key.
    pub fn from_char(ch: char) -> Option<Self> {
        let key = match ch {
            '0'..='9' | '.' => Self::Digit(ch),
            '(' | ')' => Self::Paren(ch),
            '+' | '-' | '*' | '/' => Self::Operator(ch),
            '×' => Self::Operator('*'),
            '÷' => Self::Operator('/'),
            '=' => Self::Evaluate,
            'C' | 'c' => Self::Clear,
            '⌫' => Self::Delete,
            '√' => Self::Unary(UnaryOp::Sqrt),
            '²' => Self::Unary(UnaryOp::Square),
            '%' => Self::Unary(UnaryOp::Percentage),
            '📊' => Self::ToggleHistory,
            _ => return None,
        };
        Some(key)
    }

    /// Look up a named key such as `sqrt` or `x²`.
    fn from_word(word: &str) -> Option<Self> {
        let key = match word.to_ascii_lowercase().as_str() {
            "x²" | "sq" | "square" => Self::Unary(UnaryOp::Square),
            "sqrt" => Self::Unary(UnaryOp::Sqrt),
            "pct" | "percent" => Self::Unary(UnaryOp::Percentage),
            "del" | "delete" | "backspace" => Self::Delete,
            "clear" => Self::Clear,
            "h" | "history" => Self::ToggleHistory,
            "clear-history" => Self::ClearHistory,
            "copy" => Self::Copy,
            _ => return None,
        };
        Some(key)
    }
}

impl FromStr for Key {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next())
            && let Some(key) = Self::from_char(ch)
        {
            return Ok(key);
        }

        Self::from_word(s).ok_or_else(|| KeyError::Unknown(s.to_string()))
    }
}

/// Parse a line of input into key presses.
///
/// Whitespace separates words. A word that names a key (`sqrt`, `del`,
/// `x²`) is one press; any other word is read one character at a time,
/// so `12+3=` is five presses.
pub fn parse_line(line: &str) -> Result<Vec<Key>, KeyError> {
    let mut keys = Vec::new();

    for word in line.split_whitespace() {
        if let Ok(key) = word.parse::<Key>() {
            keys.push(key);
            continue;
        }

        for ch in word.chars() {
            let key = Key::from_char(ch).ok_or_else(|| KeyError::Unknown(word.to_string()))?;
            keys.push(key);
        }
    }

    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_symbols() {
        assert_eq!("×".parse::<Key>(), Ok(Key::Operator('*')));
        assert_eq!("÷".parse::<Key>(), Ok(Key::Operator('/')));
        assert_eq!("√".parse::<Key>(), Ok(Key::Unary(UnaryOp::Sqrt)));
        assert_eq!("x²".parse::<Key>(), Ok(Key::Unary(UnaryOp::Square)));
        assert_eq!("%".parse::<Key>(), Ok(Key::Unary(UnaryOp::Percentage)));
        assert_eq!("⌫".parse::<Key>(), Ok(Key::Delete));
        assert_eq!("C".parse::<Key>(), Ok(Key::Clear));
        assert_eq!("=".parse::<Key>(), Ok(Key::Evaluate));
    }

    #[test]
    fn test_unary_symbols_parse_back() {
        for op in [UnaryOp::Sqrt, UnaryOp::Square, UnaryOp::Percentage] {
            assert_eq!(op.symbol().parse::<Key>(), Ok(Key::Unary(op)));
        }
    }

    #[test]
    fn test_named_keys() {
        assert_eq!("sqrt".parse::<Key>(), Ok(Key::Unary(UnaryOp::Sqrt)));
        assert_eq!("SQ".parse::<Key>(), Ok(Key::Unary(UnaryOp::Square)));
        assert_eq!("del".parse::<Key>(), Ok(Key::Delete));
        assert_eq!("history".parse::<Key>(), Ok(Key::ToggleHistory));
        assert_eq!("clear-history".parse::<Key>(), Ok(Key::ClearHistory));
        assert_eq!("copy".parse::<Key>(), Ok(Key::Copy));
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            "banana".parse::<Key>(),
            Err(KeyError::Unknown("banana".to_string()))
        );
    }

    #[test]
    fn test_parse_line_splits_characters() {
        let keys = parse_line("12+3=").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Digit('1'),
                Key::Digit('2'),
                Key::Operator('+'),
                Key::Digit('3'),
                Key::Evaluate,
            ]
        );
    }

    #[test]
    fn test_parse_line_mixes_words_and_characters() {
        let keys = parse_line("(2×4) sqrt del c").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Paren('('),
                Key::Digit('2'),
                Key::Operator('*'),
                Key::Digit('4'),
                Key::Paren(')'),
                Key::Unary(UnaryOp::Sqrt),
                Key::Delete,
                Key::Clear,
            ]
        );
    }

    #[test]
    fn test_parse_line_rejects_unknown_characters() {
        assert_eq!(
            parse_line("2^3"),
            Err(KeyError::Unknown("2^3".to_string()))
        );
        assert_eq!(parse_line("   "), Ok(vec![]));
    }
}
