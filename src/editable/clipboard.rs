//! Clipboard service injected by the host.

/// Read/write access to the host clipboard.
pub trait Clipboard {
    fn get_text(&mut self) -> String;
    fn set_text(&mut self, text: String);
}

/// Process-local clipboard, for tests and headless hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            contents: text.into(),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> String {
        self.contents.clone()
    }

    fn set_text(&mut self, text: String) {
        self.contents = text;
    }
}

/// The OS clipboard. Failures to reach it read as empty and drop writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> String {
        let text = if let Ok(mut clipboard) = arboard::Clipboard::new() {
            clipboard.get_text().ok()
        } else {
            None
        };
        text.unwrap_or_default()
    }

    fn set_text(&mut self, text: String) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            if let Err(e) = clipboard.set_text(text) {
                tracing::warn!("clipboard write failed: {}", e);
            }
        } else {
            tracing::warn!("system clipboard unavailable");
        }
    }
}
