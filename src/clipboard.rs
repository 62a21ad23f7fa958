//! Clipboard access as an injected capability.
//!
//! The dashboard copies codes to the OS clipboard; abstracting the access
//! behind a trait keeps the core logic free of any presentation runtime
//! and lets tests observe what would have been copied.

/// Errors that can occur when writing to the clipboard.
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Write-only clipboard capability.
pub trait Clipboard: Send {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// OS clipboard via `arboard` (NSPasteboard on macOS, X11/Wayland on
/// Linux). The handle is opened per call; some platforms invalidate
/// long-lived clipboard handles.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

/// In-memory clipboard for tests; records every copy.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    pub copies: Vec<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.copies.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_records() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("492039").unwrap();
        clipboard.set_text("003417").unwrap();
        assert_eq!(clipboard.copies, vec!["492039", "003417"]);
    }
}
