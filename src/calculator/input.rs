//! Expression buffer and input state machine.
//!
//! Owns the pending expression text and the last displayed result, and
//! applies keypad input to them. The buffer never holds two adjacent
//! operators: a second operator replaces the first.

use tracing::debug;

/// Operators accepted by [`ExpressionBuffer::append_operator`].
pub const OPERATORS: [char; 4] = ['+', '-', '*', '/'];

/// What the display shows when there is nothing to show.
pub const EMPTY_DISPLAY: &str = "0";

/// What the display shows after a failed evaluation.
pub const ERROR_DISPLAY: &str = "Error";

/// Check if a character is one of the four binary operators.
pub fn is_operator(ch: char) -> bool {
    OPERATORS.contains(&ch)
}

/// Logical state of the input machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputState {
    /// Normal digit and operator entry.
    #[default]
    Entering,
    /// The expression holds a just-computed result, ready for chaining.
    ResultShown,
}

/// The pending expression plus the last computed display value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionBuffer {
    expression: String,
    display_result: String,
    state: InputState,
}

impl Default for ExpressionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionBuffer {
    pub fn new() -> Self {
        Self {
            expression: String::new(),
            display_result: EMPTY_DISPLAY.to_string(),
            state: InputState::Entering,
        }
    }

    /// Append a digit or decimal point.
    ///
    /// Numeric literals are not validated here: `1.2.3` or `007` are
    /// accepted and left for the evaluator to judge. After a result is
    /// shown, digits extend the result text rather than starting over.
    pub fn append_digit_or_dot(&mut self, ch: char) {
        debug_assert!(ch.is_ascii_digit() || ch == '.', "not a digit or dot: {ch:?}");
        self.expression.push(ch);
        self.state = InputState::Entering;
    }

    /// Append an opening or closing parenthesis.
    pub fn append_paren(&mut self, ch: char) {
        debug_assert!(ch == '(' || ch == ')', "not a parenthesis: {ch:?}");
        self.expression.push(ch);
        self.state = InputState::Entering;
    }

    /// Append an operator, enforcing the "no adjacent operators" rule.
    ///
    /// On an empty expression only `-` is accepted (as a leading sign).
    /// If the expression already ends in an operator it is replaced, so the
    /// last operator pressed wins.
    ///
    /// Returns `false` when the input was ignored.
    pub fn append_operator(&mut self, op: char) -> bool {
        if !is_operator(op) {
            return false;
        }

        if self.expression.is_empty() && op != '-' {
            debug!(%op, "Ignoring operator on empty expression");
            return false;
        }

        if self.expression.ends_with(is_operator) {
            self.expression.pop();
        }
        self.expression.push(op);
        self.state = InputState::Entering;
        true
    }

    /// Remove the last character. No-op on an empty expression.
    pub fn delete_last(&mut self) {
        self.expression.pop();
        self.state = InputState::Entering;
    }

    /// Reset the expression and the display to their initial values.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.display_result = EMPTY_DISPLAY.to_string();
        self.state = InputState::Entering;
    }

    /// The expression for display: an empty buffer reads as `0`.
    pub fn current_expression(&self) -> &str {
        if self.expression.is_empty() {
            EMPTY_DISPLAY
        } else {
            &self.expression
        }
    }

    /// The raw expression text, possibly empty.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn display_result(&self) -> &str {
        &self.display_result
    }

    pub fn state(&self) -> InputState {
        self.state
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }

    /// Show a successful result and load it as the next expression.
    ///
    /// Results in exponent form (`1e+21`) are loaded verbatim, so the
    /// expression may briefly hold an `e` until the next edit.
    pub fn show_result(&mut self, result: &str) {
        self.display_result = result.to_string();
        self.expression = result.to_string();
        self.state = InputState::ResultShown;
    }

    /// Show the error marker. The expression is kept for correction.
    pub fn show_error(&mut self) {
        self.display_result = ERROR_DISPLAY.to_string();
        self.state = InputState::Entering;
    }
}
