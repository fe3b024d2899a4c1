//! Clipboard functionality for copying the displayed result.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

use super::input::ERROR_DISPLAY;

/// Copy a displayed result to the system clipboard.
///
/// The error marker is never copied; there is no value behind it.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    if text == ERROR_DISPLAY {
        bail!("Nothing to copy: the last evaluation failed");
    }

    let mut clipboard = Clipboard::new().context("Failed to access clipboard")?;

    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_marker_is_not_copied() {
        let err = copy_to_clipboard("Error").unwrap_err();
        assert!(err.to_string().contains("Nothing to copy"));
    }
}
