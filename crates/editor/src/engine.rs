//! Caret, selection and key handling on top of a [`TextDocument`].

use crate::client::EditorClient;
use crate::clipboard::Clipboard;
use crate::keys::{KeyCode, Modifiers};
use crate::text_document::{DocumentEvent, TextDocument, TextPosition, TextRange};

pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    SingleLine,
    MultiLine,
}

/// A text editor without any rendering.
///
/// The selection is kept as `anchor..caret`; it is empty when both are equal.
/// After every operation the document's queued events and any caret or
/// selection change are forwarded to the client.
#[derive(Debug)]
pub struct EditorEngine<C: EditorClient = ()> {
    kind: EditorKind,
    document: TextDocument,
    caret: TextPosition,
    selection: TextRange,
    tab_width: usize,
    client: C,
}

impl<C: EditorClient> EditorEngine<C> {
    pub fn new(kind: EditorKind, client: C) -> Self {
        Self {
            kind,
            document: TextDocument::new(),
            caret: TextPosition::default(),
            selection: TextRange::default(),
            tab_width: DEFAULT_TAB_WIDTH,
            client,
        }
    }

    pub fn with_text(kind: EditorKind, text: &str, client: C) -> Self {
        let mut engine = Self::new(kind, client);
        engine.document = TextDocument::from_text(text);
        engine
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn is_single_line(&self) -> bool {
        self.kind == EditorKind::SingleLine
    }

    pub fn is_multi_line(&self) -> bool {
        self.kind == EditorKind::MultiLine
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn set_tab_width(&mut self, width: usize) {
        self.tab_width = width;
    }

    pub fn caret(&self) -> TextPosition {
        self.caret
    }

    /// Move the caret (clamped) and drop the selection.
    pub fn set_caret(&mut self, position: TextPosition) {
        let before = self.snapshot();
        self.caret = self.document.clamp(position);
        self.selection = TextRange::default();
        self.notify(before);
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// The normalized selection, if any.
    pub fn selection(&self) -> Option<TextRange> {
        self.has_selection().then(|| self.selection.normalized())
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|range| self.document.text_in_range(range))
    }

    /// Replace the whole content; the caret moves to the end.
    pub fn set_text(&mut self, text: &str) {
        let before = self.snapshot();
        self.document.reset_to(text);
        self.selection = TextRange::default();
        self.caret = self.document.range_for_entire_document().end;
        self.notify(before);
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Insert a typed code point, replacing the selection.
    pub fn handle_input(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }

        let before = self.snapshot();
        self.delete_selection();
        self.caret = self.document.insert_char(self.caret, c);
        self.notify(before);
        true
    }

    /// Returns whether the key was consumed.
    pub fn handle_key_down(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        clipboard: &mut dyn Clipboard,
    ) -> bool {
        let before = self.snapshot();
        let consumed = self.dispatch_key(key, modifiers, clipboard);
        self.notify(before);
        consumed
    }

    pub fn handle_key_up(&mut self, _key: KeyCode, _modifiers: Modifiers) -> bool {
        false
    }

    fn dispatch_key(
        &mut self,
        key: KeyCode,
        modifiers: Modifiers,
        clipboard: &mut dyn Clipboard,
    ) -> bool {
        let ctrl = modifiers.contains(Modifiers::CTRL);
        let shift = modifiers.contains(Modifiers::SHIFT);
        let vertical = self.is_multi_line();

        match key {
            KeyCode::Char('c') if ctrl => {
                if let Some(text) = self.selected_text() {
                    log::trace!("copy {} chars", text.chars().count());
                    clipboard.set_text(&text);
                }
                true
            }
            KeyCode::Char('x') if ctrl => {
                let range = match self.selection() {
                    Some(range) => range,
                    None => self.document.range_for_entire_line(self.caret.line),
                };
                let text = self.document.text_in_range(range);
                log::trace!("cut {} chars", text.chars().count());
                clipboard.set_text(&text);
                self.selection = TextRange::default();
                self.caret = self.document.erase_range(range);
                true
            }
            KeyCode::Char('v') if ctrl => {
                let text = clipboard.get_text();
                let text = if self.is_single_line() {
                    text.replace('\n', " ")
                } else {
                    text
                };
                self.delete_selection();
                self.caret = self.document.insert(self.caret, &text);
                true
            }
            KeyCode::Char('a') if ctrl => {
                let all = self.document.range_for_entire_document();
                self.selection = all;
                self.caret = all.end;
                true
            }

            KeyCode::Right | KeyCode::Left | KeyCode::Home | KeyCode::End if shift => {
                let target = self.horizontal_target(key, ctrl);
                self.extend_selection(target);
                true
            }
            KeyCode::Up | KeyCode::Down if shift && vertical => {
                let target = self.vertical_target(key);
                self.extend_selection(target);
                true
            }
            KeyCode::Right | KeyCode::Left | KeyCode::Home | KeyCode::End => {
                self.caret = self.horizontal_target(key, ctrl);
                self.selection = TextRange::default();
                true
            }
            KeyCode::Up | KeyCode::Down if vertical => {
                self.caret = self.vertical_target(key);
                self.selection = TextRange::default();
                true
            }

            KeyCode::Backspace => {
                if !self.delete_selection() {
                    self.caret = self.document.erase(self.caret);
                }
                true
            }
            KeyCode::Enter if vertical => {
                self.delete_selection();
                self.caret = self.document.split_line(self.caret);
                true
            }
            KeyCode::Tab => {
                self.delete_selection();
                let spaces = " ".repeat(self.tab_width);
                self.caret = self.document.insert(self.caret, &spaces);
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn horizontal_target(&self, key: KeyCode, by_word: bool) -> TextPosition {
        let doc = &self.document;
        match key {
            KeyCode::Right if by_word => doc.next_word_break_after(self.caret),
            KeyCode::Right => doc.next_position_after(self.caret),
            KeyCode::Left if by_word => doc.previous_word_break_after(self.caret),
            KeyCode::Left => doc.previous_position_after(self.caret),
            KeyCode::Home => doc.start_of_line(self.caret.line),
            KeyCode::End => doc.end_of_line(self.caret.line),
            _ => self.caret,
        }
    }

    fn vertical_target(&self, key: KeyCode) -> TextPosition {
        match key {
            KeyCode::Up => self.document.next_position_up(self.caret),
            _ => self.document.next_position_down(self.caret),
        }
    }

    /// Grow the selection from the current caret (its anchor) to `target`.
    fn extend_selection(&mut self, target: TextPosition) {
        if !self.has_selection() {
            self.selection = TextRange::new(self.caret, self.caret);
        }
        self.caret = target;
        self.selection.end = target;
    }

    /// Erase the selection, if any, and put the caret at its start.
    fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection() else {
            return false;
        };
        self.caret = self.document.erase_range(range);
        self.selection = TextRange::default();
        true
    }

    fn snapshot(&self) -> (TextPosition, Option<TextRange>) {
        (self.caret, self.selection())
    }

    fn notify(&mut self, (caret, selection): (TextPosition, Option<TextRange>)) {
        for event in self.document.take_events() {
            match event {
                DocumentEvent::InsertedLine(index) => self.client.did_insert_line(index),
                DocumentEvent::RemovedLine(index) => self.client.did_remove_line(index),
                DocumentEvent::Changed => self.client.did_change(),
            }
        }
        if self.caret != caret {
            self.client.did_move_caret(self.caret);
        }
        let current = self.selection();
        if current != selection {
            self.client.did_change_selection(current);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    #[derive(Debug, Default)]
    struct Recorder {
        inserted: Vec<usize>,
        removed: Vec<usize>,
        changes: usize,
        carets: usize,
    }

    impl EditorClient for Recorder {
        fn did_insert_line(&mut self, index: usize) {
            self.inserted.push(index);
        }
        fn did_remove_line(&mut self, index: usize) {
            self.removed.push(index);
        }
        fn did_change(&mut self) {
            self.changes += 1;
        }
        fn did_move_caret(&mut self, _caret: TextPosition) {
            self.carets += 1;
        }
    }

    fn pos(line: usize, column: usize) -> TextPosition {
        TextPosition::new(line, column)
    }

    fn multi(text: &str) -> EditorEngine<Recorder> {
        EditorEngine::with_text(EditorKind::MultiLine, text, Recorder::default())
    }

    fn key(engine: &mut EditorEngine<Recorder>, key: KeyCode, mods: Modifiers) -> bool {
        let mut clipboard = MemoryClipboard::new();
        engine.handle_key_down(key, mods, &mut clipboard)
    }

    #[test]
    fn typing_inserts_and_notifies() {
        let mut e = multi("");
        assert!(e.handle_input('h'));
        assert!(e.handle_input('i'));
        assert_eq!(e.text(), "hi");
        assert_eq!(e.caret(), pos(0, 2));
        assert_eq!(e.client().changes, 2);
        assert_eq!(e.client().carets, 2);
        assert!(!e.handle_input('\u{7}'));
    }

    #[test]
    fn shift_arrows_extend_selection_and_input_replaces_it() {
        let mut e = multi("hello");
        e.set_caret(pos(0, 1));
        key(&mut e, KeyCode::Right, Modifiers::SHIFT);
        key(&mut e, KeyCode::Right, Modifiers::SHIFT);
        assert_eq!(e.selection(), Some(TextRange::new(pos(0, 1), pos(0, 3))));
        assert_eq!(e.selected_text().as_deref(), Some("el"));

        e.handle_input('X');
        assert_eq!(e.text(), "hXlo");
        assert!(!e.has_selection());
    }

    #[test]
    fn plain_arrow_clears_selection() {
        let mut e = multi("hello");
        key(&mut e, KeyCode::Char('a'), Modifiers::CTRL);
        assert_eq!(e.selected_text().as_deref(), Some("hello"));
        key(&mut e, KeyCode::Left, Modifiers::empty());
        assert!(!e.has_selection());
        assert_eq!(e.caret(), pos(0, 4));
    }

    #[test]
    fn copy_cut_paste() {
        let mut e = multi("one\ntwo");
        let mut clipboard = MemoryClipboard::new();

        // copy without selection leaves the clipboard alone
        clipboard.set_text("keep");
        e.handle_key_down(KeyCode::Char('c'), Modifiers::CTRL, &mut clipboard);
        assert_eq!(clipboard.get_text(), "keep");

        // cut without selection takes the caret line
        e.set_caret(pos(1, 1));
        e.handle_key_down(KeyCode::Char('x'), Modifiers::CTRL, &mut clipboard);
        assert_eq!(clipboard.get_text(), "two");
        assert_eq!(e.text(), "one");
        assert_eq!(e.client().removed, vec![1]);

        e.set_caret(pos(0, 0));
        e.handle_key_down(KeyCode::Char('v'), Modifiers::CTRL, &mut clipboard);
        assert_eq!(e.text(), "twoone");
        assert_eq!(e.caret(), pos(0, 3));
    }

    #[test]
    fn enter_splits_and_backspace_joins() {
        let mut e = multi("hello");
        e.set_caret(pos(0, 2));
        assert!(key(&mut e, KeyCode::Enter, Modifiers::empty()));
        assert_eq!(e.text(), "he\nllo");
        assert_eq!(e.caret(), pos(1, 0));
        assert_eq!(e.client().inserted, vec![1]);

        key(&mut e, KeyCode::Backspace, Modifiers::empty());
        assert_eq!(e.text(), "hello");
        assert_eq!(e.caret(), pos(0, 2));
    }

    #[test]
    fn tab_inserts_spaces() {
        let mut e = multi("x");
        e.set_tab_width(2);
        key(&mut e, KeyCode::Tab, Modifiers::empty());
        assert_eq!(e.text(), "  x");
        assert_eq!(e.caret(), pos(0, 2));
    }

    #[test]
    fn vertical_keys_only_in_multi_line() {
        let mut single = EditorEngine::with_text(EditorKind::SingleLine, "ab", ());
        let mut clipboard = MemoryClipboard::new();
        assert!(!single.handle_key_down(KeyCode::Up, Modifiers::empty(), &mut clipboard));
        assert!(!single.handle_key_down(KeyCode::Down, Modifiers::SHIFT, &mut clipboard));
        assert!(!single.handle_key_down(KeyCode::Enter, Modifiers::empty(), &mut clipboard));

        let mut e = multi("abcd\nx");
        e.set_caret(pos(0, 3));
        assert!(key(&mut e, KeyCode::Down, Modifiers::empty()));
        assert_eq!(e.caret(), pos(1, 1));
        assert!(key(&mut e, KeyCode::Up, Modifiers::SHIFT));
        assert_eq!(e.selection(), Some(TextRange::new(pos(0, 1), pos(1, 1))));
    }

    #[test]
    fn word_and_line_navigation() {
        let mut e = multi("foo bar-baz");
        e.set_caret(pos(0, 0));
        key(&mut e, KeyCode::Right, Modifiers::CTRL);
        assert_eq!(e.caret(), pos(0, 3));
        key(&mut e, KeyCode::End, Modifiers::empty());
        assert_eq!(e.caret(), pos(0, 11));
        key(&mut e, KeyCode::Left, Modifiers::CTRL);
        assert_eq!(e.caret(), pos(0, 8));
        key(&mut e, KeyCode::Home, Modifiers::SHIFT);
        assert_eq!(e.selected_text().as_deref(), Some("foo bar-"));
    }

    #[test]
    fn key_up_is_never_consumed() {
        let mut e = multi("");
        assert!(!e.handle_key_up(KeyCode::Enter, Modifiers::empty()));
    }
}
