//! Diagnostic messages produced while lexing and parsing stylesheets.

use crate::token::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StylesheetError {
    // -- lexer --------------------------------------------------------------
    #[error("unexpected character {0:?} while reading a selector")]
    UnexpectedSelectorCharacter(char),
    #[error("expected a name after {0:?}")]
    MissingName(char),
    #[error("invalid start character {0:?} for property name")]
    InvalidPropertyStart(char),
    #[error("expected ':' after property name, found {0:?}")]
    ExpectedColon(char),
    #[error("unknown character {0:?} after number value")]
    UnknownNumberSuffix(char),
    #[error("expected ';' or '}}' after property value, found {0:?}")]
    ExpectedTerminator(char),
    #[error("unexpected end of input inside a rule body")]
    UnterminatedRule,
    #[error("too many errors encountered, stopping")]
    TooManyErrors,

    // -- parser -------------------------------------------------------------
    #[error("relation operator not allowed before a selector part")]
    RelationWithoutSelector,
    #[error("relation operator is not followed by a selector part")]
    DanglingRelation,
    #[error("pseudo class :{0} needs a selector part before it")]
    PseudoWithoutSelector(String),
    #[error("unknown pseudo class :{0}")]
    UnknownPseudoClass(String),
    #[error("unexpected {0:?} token while reading a selector")]
    UnexpectedSelectorToken(TokenKind),
    #[error("rule body has no selector")]
    EmptySelector,
    #[error("expected property name, found {0:?}")]
    ExpectedPropertyName(TokenKind),
    #[error("expected ':' after property {0}")]
    ExpectedColonToken(String),
    #[error("expected a value for property {0}")]
    ExpectedValue(String),
    #[error("value of property {0} is not followed by ';' or '}}'")]
    MissingTerminator(String),
    #[error("invalid color {0}")]
    InvalidColor(String),
    #[error("invalid number {0}")]
    InvalidNumber(String),
}
