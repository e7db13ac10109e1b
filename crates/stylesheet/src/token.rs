//! Stylesheet token types produced by the lexer.

use common::{StreamPosition, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Comma,
    /// Whitespace between selector parts; the descendant combinator.
    CompoundDelimiter,
    Universal,
    TagName,
    IdRef,
    ClassName,
    PseudoIdentifier,
    Plus,
    Greater,
    BraceOpen,
    PropertyName,
    Colon,
    PropertyValue,
    PropertyColorValue,
    PropertyPixelValue,
    PropertyPercentageValue,
    SemiColon,
    BraceClose,
}

impl TokenKind {
    pub fn is_relation_operator(self) -> bool {
        matches!(self, Self::Greater | Self::Plus)
    }

    pub fn is_selector_part(self) -> bool {
        matches!(self, Self::Universal | Self::TagName | Self::IdRef | Self::ClassName)
    }

    pub fn is_property_value(self) -> bool {
        matches!(
            self,
            Self::PropertyValue
                | Self::PropertyColorValue
                | Self::PropertyPixelValue
                | Self::PropertyPercentageValue
        )
    }
}

/// A token with its raw content. For `#id`, `.class` and `:pseudo` the
/// content is the bare name.
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
