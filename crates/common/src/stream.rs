//! Position-tracked reader over a buffered sequence of symbols.
//!
//! Both lexers read characters through a `StreamReader<char>`; both parsers
//! read their token streams through the same type.

use core::fmt;

/// Zero-based row/column of the next symbol to be consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct StreamPosition {
    pub row: u32,
    pub column: u32,
}

impl StreamPosition {
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for StreamPosition {
    /// One-based `row:column`, the way editors show it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// Anything a `StreamReader` can walk over.
pub trait Symbol: Clone {
    /// Whether consuming this symbol starts a new row.
    fn is_newline(&self) -> bool {
        false
    }
}

impl Symbol for char {
    fn is_newline(&self) -> bool {
        *self == '\n'
    }
}

impl Symbol for u8 {
    fn is_newline(&self) -> bool {
        *self == b'\n'
    }
}

/// Cursor with peek/consume/unwind that keeps row and column in step.
pub struct StreamReader<T: Symbol> {
    data: Vec<T>,
    cursor: usize,
    row: u32,
    column: u32,
    /// Column at the end of every row already left behind, so `unwind`
    /// across a newline lands on the right column.
    row_ends: Vec<u32>,
}

impl<T: Symbol> StreamReader<T> {
    pub fn new(data: impl IntoIterator<Item = T>) -> Self {
        Self {
            data: data.into_iter().collect(),
            cursor: 0,
            row: 0,
            column: 0,
            row_ends: Vec::new(),
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.cursor >= self.data.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn position(&self) -> StreamPosition {
        StreamPosition::new(self.row, self.column)
    }

    /// The next symbol, without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<T> {
        self.peek_at(0)
    }

    /// The symbol `n` places ahead of the cursor.
    #[inline]
    pub fn peek_at(&self, n: usize) -> Option<T> {
        self.data.get(self.cursor + n).cloned()
    }

    pub fn consume(&mut self) -> Option<T> {
        let symbol = self.data.get(self.cursor).cloned()?;
        self.cursor += 1;
        if symbol.is_newline() {
            self.row_ends.push(self.column);
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(symbol)
    }

    /// Consume the next symbol only if it equals `expected`.
    pub fn consume_if(&mut self, expected: T) -> bool
    where
        T: PartialEq,
    {
        if self.data.get(self.cursor) == Some(&expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    /// Consume symbols while `pred` holds, returning them.
    pub fn consume_while(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut out = Vec::new();
        while self.data.get(self.cursor).is_some_and(&mut pred) {
            if let Some(symbol) = self.consume() {
                out.push(symbol);
            }
        }
        out
    }

    /// Step back `n` symbols. Stops at the start of the stream.
    pub fn unwind(&mut self, n: usize) {
        for _ in 0..n {
            if self.cursor == 0 {
                return;
            }
            self.cursor -= 1;
            if self.data[self.cursor].is_newline() {
                self.row -= 1;
                self.column = self.row_ends.pop().unwrap_or(0);
            } else {
                self.column -= 1;
            }
        }
    }
}

impl StreamReader<char> {
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars())
    }

    /// Consume characters while `pred` holds, collecting them into a string.
    pub fn consume_string_while(&mut self, pred: impl FnMut(&char) -> bool) -> String {
        self.consume_while(pred).into_iter().collect()
    }
}
