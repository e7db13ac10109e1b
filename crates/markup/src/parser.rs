//! Markup tree builder.
//!
//! Consumes the lexer's tokens and builds a [`Dom`]. Open elements live on a
//! construction stack seeded with the document root. Text between tags is
//! buffered and only becomes a trimmed text fragment when the parser leaves
//! the tag body it was read in.

use common::{Diagnostic, StreamReader};
use dom::{DOCUMENT_TAG_NAME, Dom, NodeId};

use crate::error::MarkupError;
use crate::lexer;
use crate::token::{Token, TokenKind};

/// Elements that close as soon as their open tag ends.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "textarea", "link", "meta",
    "source", "track", "wbr",
];

pub fn is_self_closing(tag_name: &str) -> bool {
    SELF_CLOSING_TAGS.contains(&tag_name)
}

/// The parsed tree plus every lexer and parser diagnostic.
pub struct ParseOutput {
    pub dom: Dom,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse markup into a DOM tree.
pub fn parse(markup: &str) -> ParseOutput {
    let (tokens, mut diagnostics) = lexer::tokenize(markup);
    let mut builder = TreeBuilder::new(tokens);
    builder.run();

    log::debug!(
        "parsed markup: {} nodes, {} diagnostics",
        builder.dom.len(),
        diagnostics.len() + builder.diagnostics.len()
    );

    diagnostics.append(&mut builder.diagnostics);
    ParseOutput {
        dom: builder.dom,
        diagnostics,
    }
}

// ---------------------------------------------------------------------------
// Tree builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ExpectingDocument,
    AfterTagName,
    InTagBody,
    InTagAttributeDeclaration,
    InClosingTag,
    Done,
}

struct TreeBuilder {
    reader: StreamReader<Token>,
    state: State,
    dom: Dom,
    diagnostics: Vec<Diagnostic>,
    stack: Vec<NodeId>,
    /// Most recently closed element, for `<br></br>`.
    last_closed: Option<NodeId>,
    buffer: String,
    current_attribute: String,
}

impl TreeBuilder {
    fn new(tokens: Vec<Token>) -> Self {
        let dom = Dom::new();
        let root = dom.root();
        Self {
            reader: StreamReader::new(tokens),
            state: State::ExpectingDocument,
            dom,
            diagnostics: Vec::new(),
            stack: vec![root],
            last_closed: None,
            buffer: String::new(),
            current_attribute: String::new(),
        }
    }

    fn run(&mut self) {
        while let Some(token) = self.reader.consume() {
            self.process(token);
            if self.state == State::Done {
                break;
            }
        }

        let unclosed = self.stack.iter().filter(|&&n| n != self.dom.root()).count();
        if unclosed > 0 {
            let position = self.reader.peek().map(|t| t.start).unwrap_or_default();
            self.error_at(position, MarkupError::UnclosedElements(unclosed));
        }
    }

    fn process(&mut self, token: Token) {
        match token.kind {
            TokenKind::Eof => self.change_state(State::Done),
            TokenKind::Character => {
                if self.state == State::InTagBody {
                    self.buffer.push_str(&token.content);
                }
            }
            TokenKind::OpenTagOpen
            | TokenKind::AttributeEqual
            | TokenKind::AttributeQuoteStart => {}
            TokenKind::OpenTagName => {
                self.flush_text();
                self.append_new_node(&token);
                self.state = State::AfterTagName;
            }
            TokenKind::OpenTagSelfClosing => self.close_current_tag(),
            TokenKind::OpenTagClose => {
                if is_self_closing(self.dom.tag_name(self.working_parent())) {
                    self.close_current_tag();
                } else {
                    self.change_state(State::InTagBody);
                }
            }
            TokenKind::AttributeName => {
                self.change_state(State::InTagAttributeDeclaration);
                self.current_attribute = token.content;
            }
            TokenKind::AttributeValueFragment => self.buffer.push_str(&token.content),
            TokenKind::AttributeQuoteEnd => {
                let parent = self.working_parent();
                let value = std::mem::take(&mut self.buffer);
                self.dom.set_attribute(parent, &self.current_attribute, &value);
                self.change_state(State::AfterTagName);
            }
            TokenKind::ClosingTagOpen => self.change_state(State::InClosingTag),
            TokenKind::ClosingTagName => self.buffer = token.content,
            TokenKind::ClosingTagClose => self.close_tag_named(&token),
        }
    }

    fn close_tag_named(&mut self, token: &Token) {
        let name = std::mem::take(&mut self.buffer);

        let auto_closed = self
            .last_closed
            .is_some_and(|n| self.dom.tag_name(n) == name && is_self_closing(&name));
        if auto_closed {
            self.last_closed = None;
            self.exit_out_of_node();
            return;
        }

        let top = self.dom.tag_name(self.working_parent()).to_string();
        if top != name {
            self.error_at(
                token.start,
                MarkupError::MismatchedClosingTag {
                    expected: top,
                    found: name,
                },
            );
        }
        self.close_current_tag();
    }

    // -----------------------------------------------------------------------
    // Stack handling
    // -----------------------------------------------------------------------

    fn working_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.dom.root())
    }

    fn append_new_node(&mut self, token: &Token) {
        if token.content == DOCUMENT_TAG_NAME {
            if self.state == State::ExpectingDocument {
                // The leading <doc> is the root itself.
                return;
            }
            self.error_at(token.start, MarkupError::NestedDocument);
        }

        let node = self.dom.create_element(&token.content);
        let parent = self.working_parent();
        self.dom.append_child(parent, node);
        self.stack.push(node);
    }

    fn close_current_tag(&mut self) {
        self.last_closed = self.stack.pop();
        self.exit_out_of_node();
    }

    fn exit_out_of_node(&mut self) {
        if self.stack.is_empty() {
            self.change_state(State::Done);
        } else {
            self.change_state(State::InTagBody);
        }
    }

    // -----------------------------------------------------------------------
    // Text buffering
    // -----------------------------------------------------------------------

    fn change_state(&mut self, state: State) {
        self.flush_text();
        self.state = state;
    }

    /// Leaving a tag body turns its buffered text into a fragment; any other
    /// buffered content is discarded.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        if self.state != State::InTagBody {
            return;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            let fragment = self.dom.create_text_fragment(trimmed);
            let parent = self.working_parent();
            self.dom.append_child(parent, fragment);
        }
    }

    fn error_at(&mut self, position: common::StreamPosition, error: MarkupError) {
        log::warn!("markup {position}: {error}");
        self.diagnostics.push(Diagnostic::new(position, error));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Render the tree as `tag[children]` for compact structural asserts.
    fn shape(dom: &Dom, node: NodeId) -> String {
        let mut out = match dom.get(node).and_then(|n| n.text()) {
            Some(text) => format!("'{text}'"),
            None => dom.tag_name(node).to_string(),
        };
        let children = dom.children(node);
        if !children.is_empty() {
            let inner: Vec<_> = children.into_iter().map(|c| shape(dom, c)).collect();
            out.push_str(&format!("[{}]", inner.join(" ")));
        }
        out
    }

    fn parse_ok(markup: &str) -> Dom {
        let output = parse(markup);
        assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
        output.dom
    }

    #[test]
    fn builds_nested_tree_with_trimmed_text() {
        let dom = parse_ok("<doc>\n  <panel>  Hello  <b>world</b> again </panel>\n</doc>");
        assert_eq!(shape(&dom, dom.root()), "doc[panel['Hello' b['world'] 'again']]");
    }

    #[test]
    fn implicit_root_without_doc_tag() {
        let dom = parse_ok("<a>x</a><b/>");
        assert_eq!(shape(&dom, dom.root()), "doc[a['x'] b]");
    }

    #[test]
    fn leading_doc_attributes_apply_to_root() {
        let dom = parse_ok(r#"<doc id="main" class="dark wide"><p/></doc>"#);
        let root = dom.root();
        assert_eq!(dom.attribute(root, "id"), Some("main"));
        assert!(dom.has_class(root, "dark"));
        assert!(dom.has_class(root, "wide"));
        assert_eq!(dom.element_by_id("main"), Some(root));
    }

    #[test]
    fn nested_doc_is_a_regular_node() {
        let output = parse("<doc><doc></doc></doc>");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].message, MarkupError::NestedDocument.to_string());
        assert_eq!(shape(&output.dom, output.dom.root()), "doc[doc]");
    }

    #[test]
    fn attributes_classes_and_ids() {
        let dom = parse_ok(r#"<doc><input id="name" class="a b" placeholder="Your \"name\""/></doc>"#);
        let input = dom.element_by_id("name");
        assert!(input.is_some());
        let input = input.unwrap();
        assert_eq!(dom.tag_name(input), "input");
        assert_eq!(dom.attribute(input, "placeholder"), Some(r#"Your "name""#));
        assert_eq!(dom.attribute(input, "class"), None);
        assert_eq!(dom.get(input).unwrap().classes(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn img_without_slash_closes_like_explicit_self_closing() {
        let implicit = parse_ok("<doc><p><img>after</p></doc>");
        let explicit = parse_ok("<doc><p><img/>after</p></doc>");
        assert_eq!(shape(&implicit, implicit.root()), "doc[p[img 'after']]");
        assert_eq!(shape(&implicit, implicit.root()), shape(&explicit, explicit.root()));
    }

    #[test]
    fn closing_an_auto_closed_element_is_accepted() {
        let dom = parse_ok("<doc><br></br><hr>x</doc>");
        assert_eq!(shape(&dom, dom.root()), "doc[br hr 'x']");
    }

    #[test]
    fn mismatched_closing_tag_closes_top_anyway() {
        let output = parse("<doc><a><b>x</a><c/></doc>");
        assert_eq!(output.diagnostics.len(), 2);
        assert_eq!(
            output.diagnostics[0].message,
            MarkupError::MismatchedClosingTag {
                expected: "b".into(),
                found: "a".into()
            }
            .to_string()
        );
        // </a> closed <b>, so <c/> lands in <a> and </doc> closes <a>.
        assert_eq!(shape(&output.dom, output.dom.root()), "doc[a[b['x'] c]]");
        assert_eq!(
            output.diagnostics[1].message,
            MarkupError::MismatchedClosingTag {
                expected: "a".into(),
                found: "doc".into()
            }
            .to_string()
        );
    }

    #[test]
    fn unclosed_elements_are_reported() {
        let output = parse("<doc><a><b>");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].message, MarkupError::UnclosedElements(2).to_string());
    }

    #[test]
    fn text_before_first_element_is_ignored() {
        let dom = parse_ok("loose <a/> text");
        assert_eq!(shape(&dom, dom.root()), "doc[a 'text']");
    }

    #[test]
    fn parsing_stops_after_root_closes() {
        let dom = parse_ok("<doc><a/></doc><b/>");
        assert_eq!(shape(&dom, dom.root()), "doc[a]");
    }
}
