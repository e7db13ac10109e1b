//! Stylesheet lexer state machine.
//!
//! Selector text is tokenized outside rule bodies; `{` switches to
//! `name : value ;` mode until the matching `}`. The kind of a property value
//! is decided by its first character: `#` starts a color, a digit starts a
//! number with an optional `px`/`%` unit, anything else is a raw string.

use common::{Diagnostic, StreamPosition, StreamReader};

use crate::error::StylesheetError;
use crate::token::{Token, TokenKind};

/// Lexing stops once this many diagnostics have been recorded.
pub const ERROR_THRESHOLD: usize = 8;

// ---------------------------------------------------------------------------
// Lexer states
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    ExpectingSelectorPart,
    ExpectingTagName,
    ExpectingIdRef,
    ExpectingClassName,
    ExpectingOp,
    ExpectingPseudo,
    InRuleBody,
    ExpectingColon,
    ExpectingPropertyValue,
    ExpectingColor,
    ExpectingNumber,
    ExpectingString,
    ExpectingSemiColon,
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
    pub fn new(text: &str) -> Self {
        Self {
            reader: StreamReader::from_text(text),
            state: State::Data,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Run the state machine to completion.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        while !self.reader.is_eof() {
            self.state = self.step();

            if self.diagnostics.len() >= ERROR_THRESHOLD {
                self.error(self.reader.position(), StylesheetError::TooManyErrors);
                return (self.tokens, self.diagnostics);
            }
        }

        if !matches!(
            self.state,
            State::Data | State::ExpectingSelectorPart | State::ExpectingTagName
        ) {
            self.error(self.reader.position(), StylesheetError::UnterminatedRule);
        }

        (self.tokens, self.diagnostics)
    }

    fn step(&mut self) -> State {
        match self.state {
            State::Data => self.lex_data(),
            State::ExpectingSelectorPart => self.lex_selector_part(),
            State::ExpectingTagName => self.lex_tag_name(),
            State::ExpectingIdRef => self.lex_prefixed_name('#', TokenKind::IdRef),
            State::ExpectingClassName => self.lex_prefixed_name('.', TokenKind::ClassName),
            State::ExpectingOp => self.lex_op(),
            State::ExpectingPseudo => self.lex_prefixed_name(':', TokenKind::PseudoIdentifier),
            State::InRuleBody => self.lex_in_rule_body(),
            State::ExpectingColon => self.lex_colon(),
            State::ExpectingPropertyValue => self.lex_property_value(),
            State::ExpectingColor => self.lex_color(),
            State::ExpectingNumber => self.lex_number(),
            State::ExpectingString => self.lex_string(),
            State::ExpectingSemiColon => self.lex_semicolon(),
        }
    }

    // -----------------------------------------------------------------------
    // Selector states
    // -----------------------------------------------------------------------

    fn lex_data(&mut self) -> State {
        if self.reader.peek() == Some('/') && self.reader.peek_at(1) == Some('/') {
            self.reader.consume_while(|&c| c != '\n');
            return State::Data;
        }

        if self.reader.peek().is_some_and(char::is_whitespace) {
            let start = self.reader.position();
            self.skip_whitespace();
            self.emit(TokenKind::CompoundDelimiter, " ", start);
            return State::Data;
        }

        State::ExpectingSelectorPart
    }

    fn lex_selector_part(&mut self) -> State {
        let start = self.reader.position();
        let Some(c) = self.reader.peek() else {
            return State::Data;
        };

        match c {
            ',' => {
                self.reader.consume();
                self.emit(TokenKind::Comma, ",", start);
                State::Data
            }
            '#' => State::ExpectingIdRef,
            '.' => State::ExpectingClassName,
            '>' | '+' => State::ExpectingOp,
            ':' => State::ExpectingPseudo,
            '*' => {
                self.reader.consume();
                self.emit(TokenKind::Universal, "*", start);
                State::Data
            }
            '{' => {
                self.reader.consume();
                self.emit(TokenKind::BraceOpen, "{", start);
                State::InRuleBody
            }
            c if is_name_start(c) => State::ExpectingTagName,
            c => {
                self.reader.consume();
                self.error(start, StylesheetError::UnexpectedSelectorCharacter(c));
                State::Data
            }
        }
    }

    fn lex_tag_name(&mut self) -> State {
        let start = self.reader.position();
        let name = self.reader.consume_string_while(|&c| is_name_char(c));
        self.emit(TokenKind::TagName, name, start);
        State::Data
    }

    /// `#id`, `.class` and `:pseudo` share the same shape.
    fn lex_prefixed_name(&mut self, prefix: char, kind: TokenKind) -> State {
        let start = self.reader.position();
        self.reader.consume();
        let name = self.reader.consume_string_while(|&c| is_name_char(c));
        if name.is_empty() {
            self.error(start, StylesheetError::MissingName(prefix));
        } else {
            self.emit(kind, name, start);
        }
        State::Data
    }

    fn lex_op(&mut self) -> State {
        let start = self.reader.position();
        match self.reader.consume() {
            Some('>') => self.emit(TokenKind::Greater, ">", start),
            Some(_) => self.emit(TokenKind::Plus, "+", start),
            None => {}
        }
        State::Data
    }

    // -----------------------------------------------------------------------
    // Rule body states
    // -----------------------------------------------------------------------

    fn lex_in_rule_body(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::InRuleBody,
            Some('}') => {
                self.reader.consume();
                self.emit(TokenKind::BraceClose, "}", start);
                State::Data
            }
            Some(c) if is_name_start(c) => {
                let name = self.reader.consume_string_while(|&c| is_name_char(c));
                self.emit(TokenKind::PropertyName, name, start);
                State::ExpectingColon
            }
            Some(c) => {
                self.error(start, StylesheetError::InvalidPropertyStart(c));
                self.recover_in_rule_body()
            }
        }
    }

    fn lex_colon(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::ExpectingColon,
            Some(':') => {
                self.reader.consume();
                self.emit(TokenKind::Colon, ":", start);
                State::ExpectingPropertyValue
            }
            Some(c) => {
                self.error(start, StylesheetError::ExpectedColon(c));
                self.recover_in_rule_body()
            }
        }
    }

    fn lex_property_value(&mut self) -> State {
        self.skip_whitespace();

        match self.reader.peek() {
            None => State::ExpectingPropertyValue,
            Some('#') => State::ExpectingColor,
            Some(c) if c.is_ascii_digit() => State::ExpectingNumber,
            Some(_) => State::ExpectingString,
        }
    }

    fn lex_color(&mut self) -> State {
        let start = self.reader.position();
        let value = self.reader.consume_string_while(|&c| c == '#' || is_name_char(c));
        self.emit(TokenKind::PropertyColorValue, value, start);
        State::ExpectingSemiColon
    }

    fn lex_number(&mut self) -> State {
        let start = self.reader.position();
        let mut value = self.reader.consume_string_while(char::is_ascii_digit);
        let mut kind = TokenKind::PropertyPixelValue;

        match self.reader.peek() {
            Some('p') if self.reader.peek_at(1) == Some('x') => {
                self.reader.consume();
                self.reader.consume();
                value.push_str("px");
            }
            Some('%') => {
                self.reader.consume();
                value.push('%');
                kind = TokenKind::PropertyPercentageValue;
            }
            Some(c) if c != ';' && c != '}' && !c.is_whitespace() => {
                self.error(self.reader.position(), StylesheetError::UnknownNumberSuffix(c));
            }
            _ => {}
        }

        self.emit(kind, value, start);
        State::ExpectingSemiColon
    }

    fn lex_string(&mut self) -> State {
        let start = self.reader.position();
        let raw = self.reader.consume_string_while(|&c| c != ';' && c != '}');
        self.emit(TokenKind::PropertyValue, raw.trim(), start);
        State::ExpectingSemiColon
    }

    fn lex_semicolon(&mut self) -> State {
        self.skip_whitespace();
        let start = self.reader.position();

        match self.reader.peek() {
            None => State::ExpectingSemiColon,
            Some(';') => {
                self.reader.consume();
                self.emit(TokenKind::SemiColon, ";", start);
                State::InRuleBody
            }
            Some('}') => {
                self.reader.consume();
                self.emit(TokenKind::BraceClose, "}", start);
                State::Data
            }
            Some(c) => {
                self.error(start, StylesheetError::ExpectedTerminator(c));
                self.recover_in_rule_body()
            }
        }
    }

    /// Skip the rest of a broken `name: value` pair, up to and including the
    /// next `;`, or up to a `}` which is emitted so the rule still closes.
    fn recover_in_rule_body(&mut self) -> State {
        self.reader.consume_while(|&c| c != ';' && c != '}');
        let start = self.reader.position();
        match self.reader.consume() {
            Some('}') => {
                self.emit(TokenKind::BraceClose, "}", start);
                State::Data
            }
            _ => State::InRuleBody,
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        self.reader.consume_while(|c| c.is_whitespace());
    }

    fn emit(&mut self, kind: TokenKind, content: impl Into<String>, start: StreamPosition) {
        let end = self.reader.position();
        self.tokens.push(Token::new(kind, content, start, end));
    }

    fn error(&mut self, position: StreamPosition, error: StylesheetError) {
        log::warn!("stylesheet {position}: {error}");
        self.diagnostics.push(Diagnostic::new(position, error));
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Tokenize a whole stylesheet.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    Lexer::new(text).tokenize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).0.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_rule() {
        use TokenKind::*;
        assert_eq!(
            kinds("div{color:red;}"),
            vec![TagName, BraceOpen, PropertyName, Colon, PropertyValue, SemiColon, BraceClose]
        );
    }

    #[test]
    fn selector_tokens_and_delimiters() {
        use TokenKind::*;
        assert_eq!(
            kinds("#a > .b:hover, *"),
            vec![
                IdRef,
                CompoundDelimiter,
                Greater,
                CompoundDelimiter,
                ClassName,
                PseudoIdentifier,
                Comma,
                CompoundDelimiter,
                Universal
            ]
        );
        let (tokens, _) = tokenize("#main-box");
        assert_eq!(tokens[0].content, "main-box");
    }

    #[test]
    fn value_kinds_follow_first_character() {
        let (tokens, diagnostics) = tokenize("x { a: #ff0000; b: 12px; c: 50%; d: some font ; e: 4 }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind.is_property_value())
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::PropertyColorValue, "#ff0000"),
                (TokenKind::PropertyPixelValue, "12px"),
                (TokenKind::PropertyPercentageValue, "50%"),
                (TokenKind::PropertyValue, "some font"),
                (TokenKind::PropertyPixelValue, "4"),
            ]
        );
    }

    #[test]
    fn line_comments_are_skipped() {
        use TokenKind::*;
        let k = kinds("// heading\np{}");
        assert_eq!(k, vec![CompoundDelimiter, TagName, BraceOpen, BraceClose]);
    }

    #[test]
    fn unknown_number_suffix_is_reported() {
        let (tokens, diagnostics) = tokenize("p { width: 10em; }");
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].message, StylesheetError::UnknownNumberSuffix('e').to_string());
        assert!(tokens.iter().any(|t| t.kind == TokenKind::BraceClose));
    }

    #[test]
    fn missing_colon_recovers_at_next_declaration() {
        let (tokens, diagnostics) = tokenize("p { color red; width: 3px; }");
        assert_eq!(diagnostics.len(), 1);
        let names: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::PropertyName)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(names, vec!["color", "width"]);
    }

    #[test]
    fn lexing_stops_after_error_threshold() {
        let (_, diagnostics) = tokenize("! @ $ % ^ & ( ) ? ~ div {}");
        assert_eq!(diagnostics.len(), ERROR_THRESHOLD + 1);
        assert_eq!(
            diagnostics.last().map(|d| d.message.clone()),
            Some(StylesheetError::TooManyErrors.to_string())
        );
    }

    #[test]
    fn unterminated_rule_is_reported() {
        let (_, diagnostics) = tokenize("p { color: red");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, StylesheetError::UnterminatedRule.to_string());
    }

    #[test]
    fn positions_track_lines() {
        let (tokens, _) = tokenize("a{}\nb{}");
        let b = tokens.iter().find(|t| t.content == "b").map(|t| t.start);
        assert_eq!(b, Some(StreamPosition::new(1, 0)));
    }
}
