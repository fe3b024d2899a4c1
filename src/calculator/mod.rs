//! Calculator core.
//!
//! This module provides functionality to:
//! - Apply keypad input to a pending expression
//! - Sanitize and evaluate expressions, including unary transforms
//! - Copy results to the clipboard

mod clipboard;
mod evaluation;
mod input;
mod sanitize;

pub use clipboard::copy_to_clipboard;
pub use evaluation::{
    EvalError, UnaryOp, evaluate_standard, evaluate_unary, evaluate_value, format_number,
    standard_notation,
};
pub use input::{
    EMPTY_DISPLAY, ERROR_DISPLAY, ExpressionBuffer, InputState, OPERATORS, is_operator,
};
pub use sanitize::{has_disallowed_chars, sanitize};
