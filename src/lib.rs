//! # docengine
//!
//! A small interactive document engine: tag markup and stylesheets go in,
//! a styled and laid out tree with hit testing, editable fields and a
//! display list comes out.
//!
//! [`DocumentWidget`] drives the pipeline implemented by the workspace crates:
//! `markup` → `dom` → `style` → `layout` → `paint`, with `editor` behind the
//! `Input` and `Textarea` nodes.

pub mod config;
pub mod document;
pub mod error;
pub mod input;

pub use config::{DEFAULT_USER_AGENT_STYLESHEET, EngineConfig, USER_AGENT_SOURCE};
pub use document::DocumentWidget;
pub use error::EngineError;
pub use input::{HitTestResult, InputEvent};

pub use common::{Color, Diagnostic, Rect, Size, Vec2};
pub use dom::{Dom, NodeId, UiState};
pub use editor::{Clipboard, KeyCode, MemoryClipboard, Modifiers};
pub use layout::{MonospaceMeasure, TextMeasure};
pub use paint::{DisplayItem, DisplayList};
pub use style::CursorMode;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
