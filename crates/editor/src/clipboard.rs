//! Clipboard provider used by cut, copy and paste.

pub trait Clipboard {
    fn get_text(&self) -> String;
    fn set_text(&mut self, text: &str);
}

/// Process-local clipboard for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}
