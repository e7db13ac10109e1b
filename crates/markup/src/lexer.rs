//! Markup lexer state machine.
//!
//! Converts characters into [`Token`]s. Tag and attribute names are
//! `[A-Za-z0-9_-]+`, attribute values are always double quoted and only `\\`
//! and `\"` are escapes.

use common::{Diagnostic, StreamPosition, StreamReader};

use crate::error::MarkupError;
use crate::token::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Lexer states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    InOpenTag,
    InOpenTagAfterName,
    InOpenTagAfterAttributeName,
    InOpenTagAfterAttributeEqual,
    InAttributeValue,
    InClosingTag,
    InClosingTagAfterName,
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

pub struct Lexer {
    reader: StreamReader<char>,
    state: State,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    pub fn new(markup: &str) -> Self {
        Self {
            reader: StreamReader::from_text(markup),
            state: State::Data,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the state machine to completion. The last token is always `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.reader.is_eof() {
            self.state = self.step();
        }

        let end = self.reader.position();
        if self.state != State::Data {
            self.error(end, MarkupError::UnexpectedEof);
        }
        self.tokens.push(Token::new(TokenKind::Eof, "", end, end));

        (self.tokens, self.diagnostics)
    }

    fn step(&mut self) -> State {
        match self.state {
            State::Data => self.lex_data(),
            State::InOpenTag => self.lex_open_tag(),
            State::InOpenTagAfterName => self.lex_after_tag_name(),
            State::InOpenTagAfterAttributeName => self.lex_after_attribute_name(),
            State::InOpenTagAfterAttributeEqual => self.lex_after_attribute_equal(),
            State::InAttributeValue => self.lex_attribute_value(),
            State::InClosingTag => self.lex_closing_tag(),
            State::InClosingTagAfterName => self.lex_closing_tag_after_name(),
        }
    }

    fn lex_data(&mut self) -> State {
        let start = self.reader.position();
        let Some(c) = self.reader.consume() else {
            return State::Data;
        };

        match c {
            '<' if self.reader.peek() == Some('/') => {
                self.reader.consume();
                self.emit(TokenKind::ClosingTagOpen, "</", start);
                State::InClosingTag
            }
            '<' => {
                self.emit(TokenKind::OpenTagOpen, "<", start);
                State::InOpenTag
            }
            '\0' => {
                self.error(start, MarkupError::NullCharacter);
                self.emit(TokenKind::Character, c, start);
                State::Data
            }
            _ => {
                self.emit(TokenKind::Character, c, start);
                State::Data
            }
        }
    }

    // -----------------------------------------------------------------------
    // Open tags
    // -----------------------------------------------------------------------

    fn lex_open_tag(&mut self) -> State {
        let start = self.reader.position();
        match self.reader.peek() {
            Some(c) if is_name_char(c) => {
                let name = self.reader.consume_string_while(|&c| is_name_char(c));
                self.emit(TokenKind::OpenTagName, name, start);

                if let Some(next) = self.reader.peek() {
                    if next != '>' && next != '/' && !next.is_whitespace() {
                        self.error(self.reader.position(), MarkupError::InvalidTagNameCharacter(next));
                    }
                }
                State::InOpenTagAfterName
            }
            Some('>') => {
                self.reader.consume();
                self.error(start, MarkupError::EmptyTagName);
                State::Data
            }
            Some(c) => {
                self.reader.consume();
                self.error(start, MarkupError::InvalidTagNameCharacter(c));
                State::InOpenTag
            }
            None => State::InOpenTag,
        }
    }

    fn lex_after_tag_name(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::InOpenTagAfterName,
            Some('/') if self.reader.peek_at(1) == Some('>') => {
                self.reader.consume();
                self.reader.consume();
                self.emit(TokenKind::OpenTagSelfClosing, "/>", start);
                State::Data
            }
            Some('>') => {
                self.reader.consume();
                self.emit(TokenKind::OpenTagClose, ">", start);
                State::Data
            }
            Some(c) if is_name_char(c) => {
                let name = self.reader.consume_string_while(|&c| is_name_char(c));
                self.emit(TokenKind::AttributeName, name, start);
                State::InOpenTagAfterAttributeName
            }
            Some(c) => {
                self.reader.consume();
                self.error(start, MarkupError::UnexpectedCharacterInTag(c));
                State::InOpenTagAfterName
            }
        }
    }

    fn lex_after_attribute_name(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::InOpenTagAfterAttributeName,
            Some('=') => {
                self.reader.consume();
                self.emit(TokenKind::AttributeEqual, "=", start);
                State::InOpenTagAfterAttributeEqual
            }
            Some(c) => {
                self.error(start, MarkupError::ExpectedEquals(c));
                State::InOpenTagAfterName
            }
        }
    }

    fn lex_after_attribute_equal(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::InOpenTagAfterAttributeEqual,
            Some('"') => {
                self.reader.consume();
                self.emit(TokenKind::AttributeQuoteStart, "\"", start);
                State::InAttributeValue
            }
            Some(c) => {
                self.error(start, MarkupError::ExpectedQuote(c));
                State::InOpenTagAfterName
            }
        }
    }

    fn lex_attribute_value(&mut self) -> State {
        let start = self.reader.position();
        let Some(c) = self.reader.consume() else {
            return State::InAttributeValue;
        };

        match c {
            '"' => {
                self.emit(TokenKind::AttributeQuoteEnd, "\"", start);
                State::InOpenTagAfterName
            }
            '\\' => {
                match self.reader.consume() {
                    Some(escaped @ ('\\' | '"')) => {
                        self.emit(TokenKind::AttributeValueFragment, escaped, start)
                    }
                    Some(other) => {
                        self.emit(TokenKind::AttributeValueFragment, format!("\\{other}"), start)
                    }
                    None => self.emit(TokenKind::AttributeValueFragment, '\\', start),
                }
                State::InAttributeValue
            }
            '\0' => {
                self.error(start, MarkupError::NullCharacter);
                State::InAttributeValue
            }
            _ => {
                self.emit(TokenKind::AttributeValueFragment, c, start);
                State::InAttributeValue
            }
        }
    }

    // -----------------------------------------------------------------------
    // Closing tags
    // -----------------------------------------------------------------------

    fn lex_closing_tag(&mut self) -> State {
        let start = self.reader.position();
        match self.reader.peek() {
            Some(c) if is_name_char(c) => {
                let name = self.reader.consume_string_while(|&c| is_name_char(c));
                self.emit(TokenKind::ClosingTagName, name, start);
                State::InClosingTagAfterName
            }
            Some('>') => {
                self.reader.consume();
                self.error(start, MarkupError::EmptyTagName);
                State::Data
            }
            Some(c) => {
                self.reader.consume();
                self.error(start, MarkupError::InvalidTagNameCharacter(c));
                State::InClosingTag
            }
            None => State::InClosingTag,
        }
    }

    fn lex_closing_tag_after_name(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.consume() {
            None => State::InClosingTagAfterName,
            Some('>') => {
                self.emit(TokenKind::ClosingTagClose, ">", start);
                State::Data
            }
            Some(c) => {
                self.error(start, MarkupError::UnexpectedCharacterInTag(c));
                State::InClosingTagAfterName
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        self.reader.consume_while(|c| c.is_whitespace());
    }

    fn emit(&mut self, kind: TokenKind, content: impl ToString, start: StreamPosition) {
        let end = self.reader.position();
        self.tokens.push(Token::new(kind, content.to_string(), start, end));
    }

    fn error(&mut self, position: StreamPosition, error: MarkupError) {
        log::warn!("markup {position}: {error}");
        self.diagnostics.push(Diagnostic::new(position, error));
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Tokenize a whole markup document.
pub fn tokenize(markup: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(markup).tokenize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
