use crate::{Result, Y2tError};

/// Destination for copying transcript text
#[cfg_attr(test, mockall::automock)]
pub trait ClipboardSink: Send + Sync {
    fn copy(&self, text: &str) -> Result<()>;
}

/// The desktop clipboard, opened on each copy
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| Y2tError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| Y2tError::Clipboard(e.to_string()))?;
        tracing::debug!("Copied {} chars to clipboard", text.len());
        Ok(())
    }
}
