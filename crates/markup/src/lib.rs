//! Markup parser crate: lexer and tree builder.
//!
//! Parses the engine's tag markup into a [`dom::Dom`] tree. Both stages are
//! explicit state machines that record diagnostics instead of failing.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::MarkupError;
pub use lexer::Lexer;
pub use parser::{ParseOutput, SELF_CLOSING_TAGS, is_self_closing};
pub use token::{Token, TokenKind};

/// Convenience function: parse markup into a DOM tree.
///
/// ```
/// let output = markup::parse("<doc><panel>Hello</panel></doc>");
/// assert!(output.diagnostics.is_empty());
/// ```
pub fn parse(markup: &str) -> ParseOutput {
    parser::parse(markup)
}
