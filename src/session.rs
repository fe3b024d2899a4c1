//! Calculator session.
//!
//! Wires key presses through the expression buffer, the evaluator and the
//! history recorder. Front-ends feed [`Key`]s in and render the [`View`]
//! that comes back; they never touch the buffer or the log directly.

use std::fmt;

use tracing::debug;

use crate::calculator::{
    ExpressionBuffer, UnaryOp, copy_to_clipboard, evaluate_standard, evaluate_unary,
    standard_notation,
};
use crate::history::{HistoryEntry, HistoryRecorder, KeyValueStore};
use crate::keys::Key;

/// A non-fatal message for the user, shown once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    HistoryCleared,
    HistoryClearFailed(String),
    HistorySaveFailed(String),
    Copied(String),
    CopyFailed(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HistoryClearFailed(_) | Self::HistorySaveFailed(_) | Self::CopyFailed(_)
        )
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HistoryCleared => write!(f, "History cleared!"),
            Self::HistoryClearFailed(reason) => write!(f, "Failed to clear history: {reason}"),
            Self::HistorySaveFailed(reason) => write!(f, "Failed to save history: {reason}"),
            Self::Copied(text) => write!(f, "Copied {text} to clipboard"),
            Self::CopyFailed(reason) => write!(f, "{reason}"),
        }
    }
}

/// Everything a front-end needs to draw the calculator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct View<'a> {
    /// The pending expression, `0` when empty.
    pub expression: &'a str,
    /// The last result or `Error`.
    pub result: &'a str,
    /// History entries, most recent first.
    pub history: &'a [HistoryEntry],
    pub history_visible: bool,
}

pub struct Session<S> {
    buffer: ExpressionBuffer,
    history: HistoryRecorder<S>,
    history_visible: bool,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(history: HistoryRecorder<S>) -> Self {
        Self {
            buffer: ExpressionBuffer::new(),
            history,
            history_visible: false,
        }
    }

    /// Start a session, loading the persisted history from `store`.
    pub async fn open(store: S, key: impl Into<String>) -> Self {
        Self::new(HistoryRecorder::open(store, key).await)
    }

    /// Apply a single key press.
    pub async fn press(&mut self, key: Key) -> Option<Notice> {
        debug!(?key, expression = self.buffer.expression(), "Key pressed");

        match key {
            Key::Digit(ch) => self.buffer.append_digit_or_dot(ch),
            Key::Paren(ch) => self.buffer.append_paren(ch),
            Key::Operator(op) => {
                self.buffer.append_operator(op);
            }
            Key::Delete => self.buffer.delete_last(),
            Key::Clear => self.buffer.clear(),
            Key::Evaluate => return self.evaluate().await,
            Key::Unary(op) => return self.apply_unary(op).await,
            Key::ToggleHistory => self.history_visible = !self.history_visible,
            Key::ClearHistory => return Some(self.clear_history().await),
            Key::Copy => return Some(self.copy_result()),
        }

        None
    }

    /// Evaluate the pending expression.
    ///
    /// An empty expression is left alone. On failure the display shows
    /// `Error` and the expression is kept for correction; nothing is
    /// recorded.
    pub async fn evaluate(&mut self) -> Option<Notice> {
        if self.buffer.is_empty() {
            return None;
        }

        let expression = self.buffer.expression().to_string();
        match evaluate_standard(&expression) {
            Ok(result) => {
                let entry = HistoryEntry::new(standard_notation(&expression, &result));
                self.finish(&result, entry).await
            }
            Err(_) => {
                self.buffer.show_error();
                None
            }
        }
    }

    /// Apply a unary operation to the value of the pending expression.
    pub async fn apply_unary(&mut self, op: UnaryOp) -> Option<Notice> {
        match evaluate_unary(self.buffer.expression(), op) {
            Ok((result, notation)) => self.finish(&result, HistoryEntry::new(notation)).await,
            Err(_) => {
                self.buffer.show_error();
                None
            }
        }
    }

    /// Wipe the history, in memory and in storage.
    pub async fn clear_history(&mut self) -> Notice {
        match self.history.clear().await {
            Ok(()) => Notice::HistoryCleared,
            Err(e) => Notice::HistoryClearFailed(e.to_string()),
        }
    }

    pub fn view(&self) -> View<'_> {
        View {
            expression: self.buffer.current_expression(),
            result: self.buffer.display_result(),
            history: self.history.entries(),
            history_visible: self.history_visible,
        }
    }

    pub fn buffer(&self) -> &ExpressionBuffer {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryRecorder<S> {
        &self.history
    }

    async fn finish(&mut self, result: &str, entry: HistoryEntry) -> Option<Notice> {
        self.buffer.show_result(result);

        self.history
            .record(entry)
            .await
            .err()
            .map(|e| Notice::HistorySaveFailed(e.to_string()))
    }

    fn copy_result(&self) -> Notice {
        let text = self.buffer.display_result();
        match copy_to_clipboard(text) {
            Ok(()) => Notice::Copied(text.to_string()),
            Err(e) => Notice::CopyFailed(e.to_string()),
        }
    }
}
