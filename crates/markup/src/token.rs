//! Markup token types produced by the lexer.

use common::{StreamPosition, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// One character of text between tags.
    Character,
    /// `<`
    OpenTagOpen,
    OpenTagName,
    /// `>` ending an open tag.
    OpenTagClose,
    /// `/>`
    OpenTagSelfClosing,
    AttributeName,
    /// `=`
    AttributeEqual,
    AttributeQuoteStart,
    /// One character of an attribute value, escapes already resolved.
    AttributeValueFragment,
    AttributeQuoteEnd,
    /// `</`
    ClosingTagOpen,
    ClosingTagName,
    /// `>` ending a closing tag.
    ClosingTagClose,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub start: StreamPosition,
    pub end: StreamPosition,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, start: StreamPosition, end: StreamPosition) -> Self {
        Self {
            kind,
            content: content.into(),
            start,
            end,
        }
    }
}

impl Symbol for Token {}
