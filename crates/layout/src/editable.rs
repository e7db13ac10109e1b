//! The editing component carried by `Input` and `Textarea` nodes.

use common::{Size, Vec2};
use editor::{EditorClient, EditorEngine, EditorKind, TextPosition};

/// Records what the engine reported since the last layout pass.
#[derive(Debug, Default)]
pub struct EditTracker {
    changed: bool,
    lines_changed: bool,
}

impl EditorClient for EditTracker {
    fn did_insert_line(&mut self, _index: usize) {
        self.lines_changed = true;
    }

    fn did_remove_line(&mut self, _index: usize) {
        self.lines_changed = true;
    }

    fn did_change(&mut self) {
        self.changed = true;
    }
}

/// An editor engine placed on a grid of character cells.
///
/// `columns` x `rows` is the visible grid; `scroll` is the first visible
/// column of a single-line editor.
#[derive(Debug)]
pub struct EditableBox {
    engine: EditorEngine<EditTracker>,
    pub cell: Size,
    pub columns: i32,
    pub rows: i32,
    pub scroll: i32,
    pub placeholder: Option<String>,
}

impl EditableBox {
    pub fn new(kind: EditorKind, text: &str, placeholder: Option<String>) -> Self {
        Self {
            engine: EditorEngine::with_text(kind, text, EditTracker::default()),
            cell: Size::ZERO,
            columns: 1,
            rows: 1,
            scroll: 0,
            placeholder,
        }
    }

    pub fn engine(&self) -> &EditorEngine<EditTracker> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut EditorEngine<EditTracker> {
        &mut self.engine
    }

    pub fn text(&self) -> String {
        self.engine.text()
    }

    pub fn is_empty(&self) -> bool {
        self.engine.document().is_empty()
    }

    /// Whether the text changed since the last call.
    pub fn take_changed(&mut self) -> bool {
        let tracker = self.engine.client_mut();
        let changed = tracker.changed || tracker.lines_changed;
        tracker.changed = false;
        tracker.lines_changed = false;
        changed
    }

    /// Scroll a single-line editor so the caret stays inside the grid.
    pub fn follow_caret(&mut self) {
        if self.engine.is_multi_line() {
            return;
        }

        let column = self.engine.caret().column as i32;
        if column < self.scroll {
            self.scroll = column;
        } else if column - self.scroll > self.columns {
            self.scroll = column - self.columns;
        }

        let len = self.engine.document().line_len(0) as i32;
        let max_scroll = (len - self.columns).max(0);
        self.scroll = self.scroll.clamp(0, max_scroll);
    }

    /// The part of a single-line editor's text inside the grid; every line of
    /// a multi-line editor.
    pub fn visible_lines(&self) -> Vec<String> {
        let document = self.engine.document();
        if self.engine.is_multi_line() {
            return document.lines().iter().map(|line| line.text()).collect();
        }

        let line = document.line(0).map(|line| line.chars()).unwrap_or_default();
        let start = (self.scroll.max(0) as usize).min(line.len());
        let end = (start + self.columns.max(0) as usize).min(line.len());
        vec![line[start..end].iter().collect()]
    }

    /// Top-left of the cell holding `position`, with `inner` the content
    /// origin of the node.
    pub fn position_to_screen(&self, position: TextPosition, inner: Vec2) -> Vec2 {
        let column = position.column as i32;
        if self.engine.is_multi_line() {
            let line = position.line as i32;
            Vec2::new(inner.x + column * self.cell.width, inner.y + line * self.cell.height)
        } else {
            Vec2::new(inner.x + (column - self.scroll) * self.cell.width, inner.y)
        }
    }

    /// Text position of the cell under `point`. Points past the end of a line
    /// land at its end; points below the last line land at the document end.
    pub fn screen_to_position(&self, point: Vec2, inner: Vec2) -> TextPosition {
        let document = self.engine.document();
        let cell_column = cell_index(point.x - inner.x, self.cell.width);

        if self.engine.is_single_line() {
            let column = (self.scroll.max(0) as usize + cell_column).min(document.line_len(0));
            return TextPosition::new(0, column);
        }

        let line = cell_index(point.y - inner.y, self.cell.height);
        if line >= document.line_count() {
            return document.range_for_entire_document().end;
        }
        TextPosition::new(line, cell_column.min(document.line_len(line)))
    }
}

fn cell_index(offset: i32, cell: i32) -> usize {
    if cell <= 0 { 0 } else { (offset.max(0) / cell) as usize }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor::{KeyCode, MemoryClipboard, Modifiers};

    fn input(text: &str, columns: i32) -> EditableBox {
        let mut editable = EditableBox::new(EditorKind::SingleLine, text, None);
        editable.cell = Size::new(6, 12);
        editable.columns = columns;
        editable
    }

    #[test]
    fn single_line_scroll_follows_caret() {
        let mut editable = input("abcdefghij", 4);
        editable.engine_mut().set_caret(TextPosition::new(0, 10));
        editable.follow_caret();
        assert_eq!(editable.scroll, 6);
        assert_eq!(editable.visible_lines(), vec!["ghij".to_string()]);

        editable.engine_mut().set_caret(TextPosition::new(0, 2));
        editable.follow_caret();
        assert_eq!(editable.scroll, 2);
    }

    #[test]
    fn short_text_never_scrolls() {
        let mut editable = input("abc", 6);
        editable.engine_mut().set_caret(TextPosition::new(0, 3));
        editable.follow_caret();
        assert_eq!(editable.scroll, 0);
    }

    #[test]
    fn single_line_screen_mapping() {
        let mut editable = input("abcdefghij", 4);
        editable.scroll = 3;
        let inner = Vec2::new(10, 20);
        assert_eq!(editable.position_to_screen(TextPosition::new(0, 5), inner), Vec2::new(22, 20));
        assert_eq!(editable.screen_to_position(Vec2::new(23, 25), inner), TextPosition::new(0, 5));
        assert_eq!(editable.screen_to_position(Vec2::new(0, 0), inner), TextPosition::new(0, 3));
        assert_eq!(editable.screen_to_position(Vec2::new(500, 0), inner), TextPosition::new(0, 10));
    }

    #[test]
    fn multi_line_screen_mapping() {
        let mut editable = EditableBox::new(EditorKind::MultiLine, "ab\nlonger", None);
        editable.cell = Size::new(6, 12);
        let inner = Vec2::ZERO;
        assert_eq!(editable.position_to_screen(TextPosition::new(1, 2), inner), Vec2::new(12, 12));
        assert_eq!(editable.screen_to_position(Vec2::new(30, 5), inner), TextPosition::new(0, 2));
        assert_eq!(editable.screen_to_position(Vec2::new(13, 13), inner), TextPosition::new(1, 2));
        assert_eq!(editable.screen_to_position(Vec2::new(0, 100), inner), TextPosition::new(1, 6));
    }

    #[test]
    fn edits_are_tracked_until_taken() {
        let mut editable = input("ab", 6);
        assert!(!editable.take_changed());
        let mut clipboard = MemoryClipboard::default();
        editable.engine_mut().set_caret(TextPosition::new(0, 2));
        editable
            .engine_mut()
            .handle_key_down(KeyCode::Backspace, Modifiers::empty(), &mut clipboard);
        assert!(editable.take_changed());
        assert!(!editable.take_changed());
        assert_eq!(editable.text(), "a");
    }
}
