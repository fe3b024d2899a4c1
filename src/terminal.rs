//! Line-oriented terminal front-end.
//!
//! Each input line is a sequence of key presses (see [`parse_line`]). After
//! every line the expression, the result and, when toggled on, the history
//! panel are redrawn.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::calculator::{EvalError, evaluate_standard, standard_notation};
use crate::history::{HistoryEntry, HistoryRecorder, KeyValueStore};
use crate::keys::parse_line;
use crate::session::{Notice, Session, View};

const PROMPT: &str = "> ";
const QUIT_WORDS: &[&str] = &["q", "quit", "exit"];

/// Render the history panel.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("Calculation History\n");

    if entries.is_empty() {
        out.push_str("  No calculations yet\n");
    }
    for entry in entries {
        out.push_str(&format!("  {entry}\n"));
    }

    out
}

/// Render one frame of the calculator display.
pub fn render(view: &View<'_>) -> String {
    let mut out = String::new();

    if view.history_visible {
        out.push_str(&render_history(view.history));
    }
    out.push_str(&format!("  {}\n= {}\n", view.expression, view.result));

    out
}

fn render_notice(notice: &Notice) -> String {
    let marker = if notice.is_error() { '!' } else { '*' };
    format!("{marker} {notice}\n")
}

async fn write_out<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .await
        .context("Failed to write to stdout")?;
    out.flush().await.context("Failed to flush stdout")
}

/// Evaluate one expression outside the interactive loop and record it.
///
/// Returns the result together with a warning when the history could not
/// be saved. The result stands either way.
pub async fn eval_once<S: KeyValueStore>(
    history: &mut HistoryRecorder<S>,
    expression: &str,
) -> Result<(String, Option<Notice>), EvalError> {
    let result = evaluate_standard(expression)?;

    let entry = HistoryEntry::new(standard_notation(expression, &result));
    let notice = history
        .record(entry)
        .await
        .err()
        .map(|e| Notice::HistorySaveFailed(e.to_string()));

    Ok((result, notice))
}

/// Run the interactive loop until EOF or a quit word.
pub async fn run<S: KeyValueStore>(session: &mut Session<S>) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    write_out(
        &mut stdout,
        "Type keys (e.g. `12+3=`, `sqrt`, `x²`, `%`, `del`, `C`, `history`, `copy`); `q` quits.\n",
    )
    .await?;
    write_out(&mut stdout, &format!("{}{PROMPT}", render(&session.view()))).await?;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if QUIT_WORDS.contains(&line) {
            break;
        }

        let mut frame = String::new();
        match parse_line(line) {
            Ok(keys) => {
                for key in keys {
                    if let Some(notice) = session.press(key).await {
                        frame.push_str(&render_notice(&notice));
                    }
                }
            }
            Err(e) => frame.push_str(&format!("! {e}\n")),
        }
        frame.push_str(&render(&session.view()));
        frame.push_str(PROMPT);

        write_out(&mut stdout, &frame).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{HISTORY_KEY, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_render_display_only() {
        let view = View {
            expression: "12+3",
            result: "0",
            history: &[],
            history_visible: false,
        };
        assert_eq!(render(&view), "  12+3\n= 0\n");
    }

    #[test]
    fn test_render_with_history() {
        let history = [HistoryEntry::new("2+2 = 4"), HistoryEntry::new("√(9) = 3")];
        let view = View {
            expression: "4",
            result: "4",
            history: &history,
            history_visible: true,
        };
        assert_eq!(
            render(&view),
            "Calculation History\n  2+2 = 4\n  √(9) = 3\n  4\n= 4\n"
        );
    }

    #[test]
    fn test_render_empty_history() {
        assert_eq!(
            render_history(&[]),
            "Calculation History\n  No calculations yet\n"
        );
    }

    #[tokio::test]
    async fn test_eval_once_records() {
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryRecorder::new(Arc::clone(&store), HISTORY_KEY);

        let (result, notice) = eval_once(&mut history, "6*7").await.unwrap();
        assert_eq!(result, "42");
        assert_eq!(notice, None);
        assert_eq!(history.entries(), &[HistoryEntry::new("6*7 = 42")]);
    }

    #[tokio::test]
    async fn test_eval_once_save_failure_is_a_warning() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let mut history = HistoryRecorder::new(Arc::clone(&store), HISTORY_KEY);

        let (result, notice) = eval_once(&mut history, "2+2").await.unwrap();
        assert_eq!(result, "4");
        assert!(matches!(notice, Some(Notice::HistorySaveFailed(_))));
    }

    #[tokio::test]
    async fn test_eval_once_error_records_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut history = HistoryRecorder::new(Arc::clone(&store), HISTORY_KEY);

        assert_eq!(eval_once(&mut history, "5/0").await, Err(EvalError::Malformed));
        assert!(history.is_empty());
    }

    #[test]
    fn test_render_notice_marks_errors() {
        assert_eq!(render_notice(&Notice::HistoryCleared), "* History cleared!\n");
        assert_eq!(
            render_notice(&Notice::HistoryClearFailed("denied".into())),
            "! Failed to clear history: denied\n"
        );
    }
}
