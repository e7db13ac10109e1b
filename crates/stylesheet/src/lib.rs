//! Stylesheet crate: lexer, parser and rule model for the engine's
//! CSS-like stylesheet language.
//!
//! ```text
//! // comment
//! panel > .title, #header { text-color: #ff0000; padding-x: 8px; }
//! ```

pub mod declaration;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod selector;
pub mod token;
pub mod value;

pub use declaration::{Declaration, Property};
pub use error::StylesheetError;
pub use lexer::{ERROR_THRESHOLD, Lexer};
pub use parser::{StylesheetOutput, parse, parse_selector};
pub use selector::{PartKind, PseudoClass, Relation, Selector, SelectorPart, SimpleSelector};
pub use token::{Token, TokenKind};
pub use value::{SizeUnit, StylesheetValue};

use common::Diagnostic;

/// A parsed stylesheet together with the name it was loaded under.
///
/// The source name is what `reload` keys on; it is usually a file path.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    pub declarations: Vec<Declaration>,
    pub source: String,
}

impl Stylesheet {
    pub fn parse(text: &str, source: impl Into<String>) -> (Self, Vec<Diagnostic>) {
        let output = parse(text);
        let sheet = Self {
            declarations: output.declarations,
            source: source.into(),
        };
        (sheet, output.diagnostics)
    }
}
