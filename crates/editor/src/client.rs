//! Callbacks an editor owner receives after each mutation.

use crate::text_document::{TextPosition, TextRange};

/// Every hook defaults to a no-op.
pub trait EditorClient {
    fn did_insert_line(&mut self, _index: usize) {}
    fn did_remove_line(&mut self, _index: usize) {}
    fn did_change(&mut self) {}
    fn did_move_caret(&mut self, _caret: TextPosition) {}
    fn did_change_selection(&mut self, _selection: Option<TextRange>) {}
}

impl EditorClient for () {}
