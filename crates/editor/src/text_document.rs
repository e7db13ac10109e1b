//! Line buffer of code points with caret navigation.
//!
//! A [`TextDocument`] never has zero lines. Mutations queue
//! [`DocumentEvent`]s which the owning engine drains and forwards to its
//! client.

use core::fmt;

// ---------------------------------------------------------------------------
// Positions and ranges
// ---------------------------------------------------------------------------

/// A caret position. Ordering is by line, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPosition {
    pub line: usize,
    pub column: usize,
}

impl TextPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for TextPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Two positions; `start` may come after `end` until normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextRange {
    pub start: TextPosition,
    pub end: TextPosition,
}

impl TextRange {
    pub const fn new(start: TextPosition, end: TextPosition) -> Self {
        Self { start, end }
    }

    /// Same range with `start <= end`.
    pub fn normalized(self) -> Self {
        if self.start > self.end {
            Self::new(self.end, self.start)
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_same_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// Inclusive on both ends. Expects a normalized range.
    pub fn contains(&self, position: TextPosition) -> bool {
        position >= self.start && position <= self.end
    }
}

// ---------------------------------------------------------------------------
// Lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextDocumentLine {
    chars: Vec<char>,
}

impl TextDocumentLine {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    /// Length in code points.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }
}

/// Structural change notifications, drained with [`TextDocument::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    InsertedLine(usize),
    RemovedLine(usize),
    Changed,
}

// ---------------------------------------------------------------------------
// Word classes
// ---------------------------------------------------------------------------

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_punctuation(c: char) -> bool {
    matches!(c, '-' | '(' | ')' | '[' | ']' | '{' | '}' | '.' | ':' | ';' | '#')
}

// ---------------------------------------------------------------------------
// TextDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TextDocument {
    lines: Vec<TextDocumentLine>,
    events: Vec<DocumentEvent>,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDocument {
    /// One empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![TextDocumentLine::default()],
            events: Vec::new(),
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut document = Self::new();
        document.reset_to(text);
        document.events.clear();
        document
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&TextDocumentLine> {
        self.lines.get(index)
    }

    pub fn lines(&self) -> &[TextDocumentLine] {
        &self.lines
    }

    pub fn line_len(&self, index: usize) -> usize {
        self.lines.get(index).map_or(0, TextDocumentLine::len)
    }

    pub fn take_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Whole-document text
    // -----------------------------------------------------------------------

    /// Replace the content; every `\n` starts a new line.
    pub fn reset_to(&mut self, text: &str) {
        self.lines = text.split('\n').map(TextDocumentLine::new).collect();
        self.events.push(DocumentEvent::Changed);
    }

    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        let lines: Vec<String> = self.lines.iter().map(TextDocumentLine::text).collect();
        lines.join("\n")
    }

    pub fn text_in_range(&self, range: TextRange) -> String {
        let range = self.clamp_range(range.normalized());
        let mut out = String::new();

        for index in range.start.line..=range.end.line {
            let chars = self.lines[index].chars();
            let from = if index == range.start.line { range.start.column } else { 0 };
            let to = if index == range.end.line { range.end.column } else { chars.len() };
            out.extend(&chars[from..to]);
            if index != range.end.line {
                out.push('\n');
            }
        }
        out
    }

    pub fn code_point_at(&self, position: TextPosition) -> Option<char> {
        self.lines
            .get(position.line)
            .and_then(|line| line.chars.get(position.column))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    // -----------------------------------------------------------------------
    // Ranges and positions
    // -----------------------------------------------------------------------

    pub fn range_for_entire_document(&self) -> TextRange {
        let last = self.lines.len() - 1;
        TextRange::new(TextPosition::default(), self.end_of_line(last))
    }

    pub fn range_for_entire_line(&self, index: usize) -> TextRange {
        TextRange::new(self.start_of_line(index), self.end_of_line(index))
    }

    pub fn start_of_line(&self, index: usize) -> TextPosition {
        TextPosition::new(index.min(self.lines.len() - 1), 0)
    }

    pub fn end_of_line(&self, index: usize) -> TextPosition {
        let index = index.min(self.lines.len() - 1);
        TextPosition::new(index, self.lines[index].len())
    }

    pub fn contains(&self, position: TextPosition) -> bool {
        position.line < self.lines.len() && position.column <= self.lines[position.line].len()
    }

    /// Nearest valid position.
    pub fn clamp(&self, position: TextPosition) -> TextPosition {
        if position.line >= self.lines.len() {
            return self.end_of_line(self.lines.len() - 1);
        }
        TextPosition::new(position.line, position.column.min(self.lines[position.line].len()))
    }

    fn clamp_range(&self, range: TextRange) -> TextRange {
        TextRange::new(self.clamp(range.start), self.clamp(range.end))
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// One code point to the right, wrapping to the next line. Stays put at
    /// the end of the document.
    pub fn next_position_after(&self, position: TextPosition) -> TextPosition {
        let position = self.clamp(position);
        if position.column < self.lines[position.line].len() {
            TextPosition::new(position.line, position.column + 1)
        } else if position.line + 1 < self.lines.len() {
            TextPosition::new(position.line + 1, 0)
        } else {
            position
        }
    }

    /// One code point to the left, wrapping to the previous line's end.
    pub fn previous_position_after(&self, position: TextPosition) -> TextPosition {
        let position = self.clamp(position);
        if position.column > 0 {
            TextPosition::new(position.line, position.column - 1)
        } else if position.line > 0 {
            self.end_of_line(position.line - 1)
        } else {
            position
        }
    }

    /// Previous line, column clamped to its length.
    pub fn next_position_up(&self, position: TextPosition) -> TextPosition {
        if position.line == 0 {
            return self.clamp(position);
        }
        self.clamp(TextPosition::new(position.line - 1, position.column))
    }

    /// Next line, column clamped to its length.
    pub fn next_position_down(&self, position: TextPosition) -> TextPosition {
        if position.line + 1 >= self.lines.len() {
            return self.clamp(position);
        }
        self.clamp(TextPosition::new(position.line + 1, position.column))
    }

    /// From inside a word, the end of that word. Otherwise the first word or
    /// punctuation character after `position`.
    pub fn next_word_break_after(&self, position: TextPosition) -> TextPosition {
        let mut pos = self.clamp(position);

        if self.code_point_at(pos).is_some_and(is_word) {
            while self.code_point_at(pos).is_some_and(is_word) {
                pos = self.next_position_after(pos);
            }
            return pos;
        }

        loop {
            let next = self.next_position_after(pos);
            if next == pos {
                return pos;
            }
            pos = next;
            if self
                .code_point_at(pos)
                .is_some_and(|c| is_word(c) || is_punctuation(c))
            {
                return pos;
            }
        }
    }

    /// Start of the word before `position`, skipping whitespace. Stops on a
    /// punctuation character.
    pub fn previous_word_break_after(&self, position: TextPosition) -> TextPosition {
        let mut pos = self.clamp(position);

        loop {
            let prev = self.previous_position_after(pos);
            if prev == pos {
                return pos;
            }
            pos = prev;
            match self.code_point_at(pos) {
                Some(c) if is_word(c) => break,
                Some(c) if is_punctuation(c) => return pos,
                _ => {}
            }
        }

        // Inside a word: walk back to its first character.
        while pos.column > 0 {
            let prev = TextPosition::new(pos.line, pos.column - 1);
            if !self.code_point_at(prev).is_some_and(is_word) {
                break;
            }
            pos = prev;
        }
        pos
    }

    // -----------------------------------------------------------------------
    // Line structure
    // -----------------------------------------------------------------------

    pub fn append_line(&mut self, text: &str) {
        self.lines.push(TextDocumentLine::new(text));
        self.events.push(DocumentEvent::InsertedLine(self.lines.len() - 1));
    }

    pub fn insert_line_before(&mut self, index: usize, text: &str) {
        let index = index.min(self.lines.len());
        self.lines.insert(index, TextDocumentLine::new(text));
        self.events.push(DocumentEvent::InsertedLine(index));
    }

    pub fn insert_line_after(&mut self, index: usize, text: &str) {
        self.insert_line_before(index.saturating_add(1), text);
    }

    /// Remove a line. The last remaining line is emptied instead.
    pub fn remove_line(&mut self, index: usize) {
        if index >= self.lines.len() {
            return;
        }
        if self.lines.len() == 1 {
            self.lines[0].chars.clear();
            self.events.push(DocumentEvent::Changed);
            return;
        }
        self.lines.remove(index);
        self.events.push(DocumentEvent::RemovedLine(index));
    }

    /// Move everything right of `position` onto a new line below it. Returns
    /// the start of the new line.
    pub fn split_line(&mut self, position: TextPosition) -> TextPosition {
        let position = self.clamp(position);
        let tail: Vec<char> = self.lines[position.line].chars.split_off(position.column);
        self.lines.insert(position.line + 1, TextDocumentLine { chars: tail });
        self.events.push(DocumentEvent::InsertedLine(position.line + 1));
        self.events.push(DocumentEvent::Changed);
        TextPosition::new(position.line + 1, 0)
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Insert one code point; returns the position after it.
    pub fn insert_char(&mut self, position: TextPosition, c: char) -> TextPosition {
        if c == '\n' {
            return self.split_line(position);
        }
        let position = self.clamp(position);
        self.lines[position.line].chars.insert(position.column, c);
        self.events.push(DocumentEvent::Changed);
        TextPosition::new(position.line, position.column + 1)
    }

    /// Insert text, splitting lines on `\n`; returns the position after the
    /// inserted content.
    pub fn insert(&mut self, position: TextPosition, text: &str) -> TextPosition {
        let mut pos = self.clamp(position);
        for (i, segment) in text.split('\n').enumerate() {
            if i > 0 {
                pos = self.split_line(pos);
            }
            let chars: Vec<char> = segment.chars().collect();
            let line = &mut self.lines[pos.line].chars;
            line.splice(pos.column..pos.column, chars.iter().copied());
            pos.column += chars.len();
        }
        self.events.push(DocumentEvent::Changed);
        pos
    }

    /// Backspace at `position`; returns the new caret position.
    ///
    /// At column 0 an empty line is removed (landing at the end of the line
    /// above) and a non-empty one is joined onto the line above.
    pub fn erase(&mut self, position: TextPosition) -> TextPosition {
        let position = self.clamp(position);

        if position.column > 0 {
            self.lines[position.line].chars.remove(position.column - 1);
            self.events.push(DocumentEvent::Changed);
            return TextPosition::new(position.line, position.column - 1);
        }

        if self.lines[position.line].is_empty() && self.lines.len() > 1 {
            self.remove_line(position.line);
            return self.end_of_line(position.line.saturating_sub(1));
        }

        if position.line == 0 {
            return position;
        }

        let tail = std::mem::take(&mut self.lines[position.line].chars);
        self.remove_line(position.line);
        let join = self.end_of_line(position.line - 1);
        self.lines[join.line].chars.extend(tail);
        self.events.push(DocumentEvent::Changed);
        join
    }

    /// Delete a range and return its normalized start.
    ///
    /// Interior lines go away and the partial first and last lines are
    /// trimmed. Any line left empty is removed while more than one line
    /// remains, so the entire-document range leaves one empty line.
    pub fn erase_range(&mut self, range: TextRange) -> TextPosition {
        let range = self.clamp_range(range.normalized());

        if range == self.range_for_entire_document() {
            let removed = self.lines.len();
            self.lines = vec![TextDocumentLine::default()];
            for index in (1..removed).rev() {
                self.events.push(DocumentEvent::RemovedLine(index));
            }
            self.events.push(DocumentEvent::Changed);
            return TextPosition::default();
        }

        for index in (range.start.line..=range.end.line).rev() {
            let line = &mut self.lines[index].chars;
            let from = if index == range.start.line { range.start.column } else { 0 };
            let to = if index == range.end.line { range.end.column } else { line.len() };
            line.drain(from..to);

            if line.is_empty() && self.lines.len() > 1 {
                self.lines.remove(index);
                self.events.push(DocumentEvent::RemovedLine(index));
            }
        }

        self.events.push(DocumentEvent::Changed);
        self.clamp(range.start)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
