//! Keyboard-driven arithmetic calculator with a persistent history.
//!
//! Input flows through [`session::Session`]: key presses mutate the
//! expression buffer, `=` and the unary keys run the evaluator, and every
//! successful calculation is recorded in a capped history log backed by a
//! [`history::KeyValueStore`].

pub mod calculator;
pub mod config;
pub mod error;
pub mod history;
pub mod keys;
pub mod session;
pub mod terminal;

pub use calculator::{EvalError, ExpressionBuffer, UnaryOp, evaluate_standard, evaluate_unary};
pub use config::Config;
pub use error::{ConfigError, PersistenceError};
pub use history::{HistoryEntry, HistoryRecorder, KeyValueStore};
pub use keys::Key;
pub use session::{Notice, Session, View};
