//! Diagnostic messages produced while lexing and parsing markup.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    #[error("unexpected null character")]
    NullCharacter,
    #[error("unexpected character {0:?} in tag name")]
    InvalidTagNameCharacter(char),
    #[error("tag without a name")]
    EmptyTagName,
    #[error("unexpected character {0:?} inside tag")]
    UnexpectedCharacterInTag(char),
    #[error("expected '=' after attribute name, found {0:?}")]
    ExpectedEquals(char),
    #[error("expected '\"' to start attribute value, found {0:?}")]
    ExpectedQuote(char),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("found another <doc> tag inside an already opened document; treating it as a regular node")]
    NestedDocument,
    #[error("closing tag </{found}> does not match <{expected}>; closing anyway")]
    MismatchedClosingTag { expected: String, found: String },
    #[error("{0} element(s) still open at end of input")]
    UnclosedElements(usize),
}
