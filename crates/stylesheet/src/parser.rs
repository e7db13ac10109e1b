//! Stylesheet parser: token stream to [`Declaration`]s.
//!
//! Two states. While reading selectors, parts accumulate into the current
//! simple selector; whitespace finishes it, `>`/`+` set the relation of the
//! next one, `,` starts another alternative and `{` opens a declaration. While
//! reading properties, every `name : value` pair must be followed by `;` or
//! `}`.

use common::{Color, Diagnostic, StreamPosition, StreamReader};

use crate::declaration::Declaration;
use crate::error::StylesheetError;
use crate::lexer;
use crate::selector::{PartKind, PseudoClass, Relation, Selector, SelectorPart, SimpleSelector};
use crate::token::{Token, TokenKind};
use crate::value::StylesheetValue;

/// Everything a parse produces. Diagnostics never prevent a result.
#[derive(Debug, Clone, Default)]
pub struct StylesheetOutput {
    pub declarations: Vec<Declaration>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a whole stylesheet.
pub fn parse(text: &str) -> StylesheetOutput {
    let (tokens, mut diagnostics) = lexer::tokenize(text);
    let mut parser = Parser::new(tokens);
    parser.run();

    log::debug!(
        "parsed stylesheet: {} declarations, {} diagnostics",
        parser.declarations.len(),
        diagnostics.len() + parser.diagnostics.len()
    );

    diagnostics.append(&mut parser.diagnostics);
    StylesheetOutput {
        declarations: parser.declarations,
        diagnostics,
    }
}

/// Parse a selector list such as `div > .a, #b` into its alternatives.
pub fn parse_selector(text: &str) -> Result<Vec<Selector>, Vec<Diagnostic>> {
    let output = parse(&format!("{text}{{}}"));
    if !output.diagnostics.is_empty() {
        return Err(output.diagnostics);
    }
    match output.declarations.into_iter().next() {
        Some(decl) if !decl.selectors.is_empty() => Ok(decl.selectors),
        _ => Err(vec![Diagnostic::new(
            StreamPosition::default(),
            StylesheetError::EmptySelector,
        )]),
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectingSelectorPart,
    ExpectingProperties,
}

struct Parser {
    reader: StreamReader<Token>,
    state: State,
    declarations: Vec<Declaration>,
    diagnostics: Vec<Diagnostic>,

    current_simple: SimpleSelector,
    current_selector: Selector,
    current_selectors: Vec<Selector>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            reader: StreamReader::new(tokens),
            state: State::ExpectingSelectorPart,
            declarations: Vec::new(),
            diagnostics: Vec::new(),
            current_simple: SimpleSelector::default(),
            current_selector: Selector::default(),
            current_selectors: Vec::new(),
        }
    }

    fn run(&mut self) {
        while let Some(token) = self.reader.consume() {
            self.state = match self.state {
                State::ExpectingSelectorPart => self.parse_selector_part(token),
                State::ExpectingProperties => self.parse_property(token),
            };
        }
    }

    // -----------------------------------------------------------------------
    // Selectors
    // -----------------------------------------------------------------------

    fn parse_selector_part(&mut self, token: Token) -> State {
        match token.kind {
            TokenKind::Comma => {
                self.check_dangling_relation(&token);
                self.finish_simple();
                self.finish_selector();
            }
            TokenKind::CompoundDelimiter => self.finish_simple(),
            kind if kind.is_relation_operator() => {
                if self.current_selector.is_empty() && self.current_simple.parts.is_empty() {
                    self.error(&token, StylesheetError::RelationWithoutSelector);
                    return State::ExpectingSelectorPart;
                }
                self.finish_simple();
                self.current_simple.relation = if kind == TokenKind::Plus {
                    Relation::AdjacentSibling
                } else {
                    Relation::ImmediateChild
                };
            }
            kind if kind.is_selector_part() => {
                if !self.current_selector.is_empty() && self.current_simple.relation == Relation::None {
                    self.current_simple.relation = Relation::Descendant;
                }
                let part_kind = match kind {
                    TokenKind::TagName => PartKind::TagName,
                    TokenKind::IdRef => PartKind::Id,
                    TokenKind::ClassName => PartKind::Class,
                    _ => PartKind::Universal,
                };
                self.current_simple.parts.push(SelectorPart::new(part_kind, token.content));
            }
            TokenKind::PseudoIdentifier => {
                if self.current_simple.parts.is_empty() {
                    let name = token.content.clone();
                    self.error(&token, StylesheetError::PseudoWithoutSelector(name));
                    return State::ExpectingSelectorPart;
                }
                match PseudoClass::from_name(&token.content) {
                    Some(pseudo) => self.current_simple.pseudo_class = Some(pseudo),
                    None => {
                        let name = token.content.clone();
                        self.error(&token, StylesheetError::UnknownPseudoClass(name));
                    }
                }
            }
            TokenKind::BraceOpen => {
                self.check_dangling_relation(&token);
                self.finish_simple();
                self.finish_selector();
                let selectors = std::mem::take(&mut self.current_selectors);
                if selectors.is_empty() {
                    self.error(&token, StylesheetError::EmptySelector);
                }
                self.declarations.push(Declaration::new(selectors));
                return State::ExpectingProperties;
            }
            kind => self.error(&token, StylesheetError::UnexpectedSelectorToken(kind)),
        }

        State::ExpectingSelectorPart
    }

    /// `>` or `+` with no simple selector after it.
    fn check_dangling_relation(&mut self, token: &Token) {
        let relation = self.current_simple.relation;
        if self.current_simple.parts.is_empty()
            && matches!(relation, Relation::ImmediateChild | Relation::AdjacentSibling)
        {
            self.error(token, StylesheetError::DanglingRelation);
        }
    }

    fn finish_simple(&mut self) {
        if !self.current_simple.parts.is_empty() {
            let simple = std::mem::take(&mut self.current_simple);
            self.current_selector.push(simple);
        }
    }

    fn finish_selector(&mut self) {
        // A relation set before a delimiter belongs to a simple selector
        // that never got parts.
        self.current_simple = SimpleSelector::default();
        if !self.current_selector.is_empty() {
            let selector = std::mem::take(&mut self.current_selector);
            self.current_selectors.push(selector);
        }
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    fn parse_property(&mut self, token: Token) -> State {
        match token.kind {
            TokenKind::SemiColon => return State::ExpectingProperties,
            TokenKind::BraceClose => return State::ExpectingSelectorPart,
            TokenKind::PropertyName => {}
            kind => {
                self.error(&token, StylesheetError::ExpectedPropertyName(kind));
                return State::ExpectingProperties;
            }
        }

        let name = token.content;

        match self.reader.peek() {
            Some(t) if t.kind == TokenKind::Colon => {
                self.reader.consume();
            }
            Some(t) => {
                self.error(&t, StylesheetError::ExpectedColonToken(name));
                return State::ExpectingProperties;
            }
            None => return State::ExpectingProperties,
        }

        let value_token = match self.reader.peek() {
            Some(t) if t.kind.is_property_value() => {
                self.reader.consume();
                t
            }
            Some(t) => {
                self.error(&t, StylesheetError::ExpectedValue(name));
                return State::ExpectingProperties;
            }
            None => return State::ExpectingProperties,
        };

        match self.reader.peek() {
            Some(t) if matches!(t.kind, TokenKind::SemiColon | TokenKind::BraceClose) => {}
            _ => {
                self.error(&value_token, StylesheetError::MissingTerminator(name));
                return State::ExpectingProperties;
            }
        }

        if let Some(value) = self.convert_value(&value_token) {
            if let Some(decl) = self.declarations.last_mut() {
                decl.set_property(&name, value);
            }
        }
        State::ExpectingProperties
    }

    fn convert_value(&mut self, token: &Token) -> Option<StylesheetValue> {
        let content = token.content.as_str();
        match token.kind {
            TokenKind::PropertyColorValue => match Color::from_hex(content) {
                Ok(color) => Some(StylesheetValue::Color(color)),
                Err(_) => {
                    self.error(token, StylesheetError::InvalidColor(content.to_string()));
                    None
                }
            },
            TokenKind::PropertyPixelValue | TokenKind::PropertyPercentageValue => {
                let digits = content.trim_end_matches("px").trim_end_matches('%');
                match digits.parse::<i32>() {
                    Ok(scalar) if token.kind == TokenKind::PropertyPercentageValue => {
                        Some(StylesheetValue::percent(scalar))
                    }
                    Ok(scalar) => Some(StylesheetValue::px(scalar)),
                    Err(_) => {
                        self.error(token, StylesheetError::InvalidNumber(content.to_string()));
                        None
                    }
                }
            }
            _ => Some(StylesheetValue::String(content.to_string())),
        }
    }

    fn error(&mut self, token: &Token, error: StylesheetError) {
        log::warn!("stylesheet {}: {error}", token.start);
        self.diagnostics.push(Diagnostic::new(token.start, error));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
