//! Expression evaluation.
//!
//! Sanitized input is tokenized into numbers, operators and parentheses and
//! evaluated by a precedence-climbing parser over `f64`. Division by zero and
//! non-finite results are rejected explicitly instead of leaking `NaN` or
//! `Infinity` into the display.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use super::sanitize::{has_disallowed_chars, sanitize};

/// Error returned by every evaluation entry point.
///
/// The calculator deliberately exposes a single failure kind: the display
/// only ever shows `Error`, whatever went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("malformed expression")]
    Malformed,
}

/// Why an expression was rejected. Only surfaced through logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fault {
    Empty,
    InvalidNumber,
    UnexpectedToken,
    UnexpectedEnd,
    UnbalancedParens,
    DivisionByZero,
    NegativeRoot,
    NonFinite,
    TooDeep,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "empty expression",
            Self::InvalidNumber => "invalid number literal",
            Self::UnexpectedToken => "unexpected token",
            Self::UnexpectedEnd => "unexpected end of expression",
            Self::UnbalancedParens => "unbalanced parentheses",
            Self::DivisionByZero => "division by zero",
            Self::NegativeRoot => "square root of a negative number",
            Self::NonFinite => "result is not a finite number",
            Self::TooDeep => "expression nested too deeply",
        };
        f.write_str(reason)
    }
}

/// A unary transform applied to the value of the whole expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Square root (`√`).
    Sqrt,
    /// Value squared (`x²`).
    Square,
    /// Value divided by 100 (`%`).
    Percentage,
}

impl UnaryOp {
    /// The keypad label for this operation.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Sqrt => "√",
            Self::Square => "x²",
            Self::Percentage => "%",
        }
    }

    /// Format the history notation for this operation.
    pub fn notation(self, expression: &str, result: &str) -> String {
        match self {
            Self::Sqrt => format!("√({expression}) = {result}"),
            Self::Square => format!("({expression})² = {result}"),
            Self::Percentage => format!("({expression})% = {result}"),
        }
    }

    fn apply(self, value: f64) -> Result<f64, Fault> {
        match self {
            Self::Sqrt if value < 0.0 => Err(Fault::NegativeRoot),
            Self::Sqrt => Ok(value.sqrt()),
            Self::Square => Ok(value * value),
            Self::Percentage => Ok(value / 100.0),
        }
    }
}

/// Format the history notation for a standard evaluation.
pub fn standard_notation(expression: &str, result: &str) -> String {
    format!("{expression} = {result}")
}

/// Evaluate an expression and return the stringified result.
pub fn evaluate_standard(expression: &str) -> Result<String, EvalError> {
    evaluate_value(expression).map(format_number)
}

/// Evaluate an expression to its numeric value.
///
/// The input is sanitized first, then evaluated with `*`/`/` binding
/// tighter than `+`/`-` and parentheses grouping as usual.
pub fn evaluate_value(expression: &str) -> Result<f64, EvalError> {
    let sanitized = sanitize(expression);
    if has_disallowed_chars(expression) {
        debug!(expression, %sanitized, "Stripped foreign characters");
    }

    compute(&sanitized).map_err(|fault| reject(expression, fault))
}

/// Evaluate an expression and apply a unary transform to its value.
///
/// Returns the stringified result together with the history notation,
/// e.g. `("3", "√(9) = 3")`.
pub fn evaluate_unary(expression: &str, op: UnaryOp) -> Result<(String, String), EvalError> {
    let value = evaluate_value(expression)?;

    let transformed = op
        .apply(value)
        .and_then(ensure_finite)
        .map_err(|fault| reject(expression, fault))?;

    let result = format_number(transformed);
    let notation = op.notation(expression, &result);

    Ok((result, notation))
}

/// Convert a number to its default textual form.
///
/// Uses the shortest representation that round-trips. Zero is always
/// `0` (never `-0`) and magnitudes outside `[1e-6, 1e21)` switch to
/// exponent notation with an explicit sign, e.g. `1e+21` or `1e-7`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

fn reject(expression: &str, fault: Fault) -> EvalError {
    debug!(expression, %fault, "Rejected expression");
    EvalError::Malformed
}

fn ensure_finite(value: f64) -> Result<f64, Fault> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Fault::NonFinite)
    }
}

fn compute(sanitized: &str) -> Result<f64, Fault> {
    if sanitized.is_empty() {
        return Err(Fault::Empty);
    }

    let tokens = tokenize(sanitized)?;
    let mut parser = Parser::new(tokens);
    let value = parser.expression()?;

    // Anything left over means the input did not form a single expression
    match parser.peek() {
        None => ensure_finite(value),
        Some(Token::RParen) => Err(Fault::UnbalancedParens),
        Some(_) => Err(Fault::UnexpectedToken),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, Fault> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        let token = match ch {
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || c == '.') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token::Number(parse_number(&input[start..end])?));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            _ => return Err(Fault::UnexpectedToken),
        };
        tokens.push(token);
        chars.next();
    }

    Ok(tokens)
}

/// Parse a run of digits and dots. `1.2.3` and a lone `.` are rejected.
fn parse_number(literal: &str) -> Result<f64, Fault> {
    literal.parse::<f64>().map_err(|_| Fault::InvalidNumber)
}

/// Recursive-descent parser, one method per precedence level:
///
/// ```text
/// expression := term (('+' | '-') term)*
/// term       := factor (('*' | '/') factor)*
/// factor     := ('+' | '-') factor | NUMBER | '(' expression ')'
/// ```
///
/// Every `factor` counts towards [`MAX_DEPTH`], so deeply nested input is
/// rejected instead of exhausting the stack.
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

/// Maximum number of nested parentheses and unary signs.
const MAX_DEPTH: usize = 256;

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expression(&mut self) -> Result<f64, Fault> {
        let mut value = self.term()?;

        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus {
                value + rhs
            } else {
                value - rhs
            };
        }

        Ok(value)
    }

    fn term(&mut self) -> Result<f64, Fault> {
        let mut value = self.factor()?;

        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if op == Token::Star {
                value * rhs
            } else if rhs == 0.0 {
                return Err(Fault::DivisionByZero);
            } else {
                value / rhs
            };
        }

        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, Fault> {
        if self.depth >= MAX_DEPTH {
            return Err(Fault::TooDeep);
        }

        self.depth += 1;
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> Result<f64, Fault> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(Token::Minus) => Ok(-self.factor()?),
            Some(Token::Plus) => self.factor(),
            Some(Token::LParen) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(value),
                    None => Err(Fault::UnbalancedParens),
                    Some(_) => Err(Fault::UnexpectedToken),
                }
            }
            Some(Token::RParen) => Err(Fault::UnbalancedParens),
            Some(Token::Star | Token::Slash) => Err(Fault::UnexpectedToken),
            None => Err(Fault::UnexpectedEnd),
        }
    }
}
