//! Text editing engine used by the editable layout nodes.
//!
//! [`TextDocument`] is the code-point line buffer, [`EditorEngine`] adds a
//! caret, a selection and key handling, and reports every change to an
//! [`EditorClient`].

pub mod client;
pub mod clipboard;
pub mod engine;
pub mod keys;
pub mod text_document;

pub use client::EditorClient;
pub use clipboard::{Clipboard, MemoryClipboard};
pub use engine::{DEFAULT_TAB_WIDTH, EditorEngine, EditorKind};
pub use keys::{KeyCode, Modifiers};
pub use text_document::{DocumentEvent, TextDocument, TextDocumentLine, TextPosition, TextRange};
