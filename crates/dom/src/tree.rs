//! DOM tree operations.
//!
//! The [`Dom`] struct owns an `Arena<Node>` and provides tree-manipulation
//! methods that keep the intrusive parent/child/sibling links consistent. It
//! plays the role of the document node: it owns the id index, the loaded
//! stylesheets and the hover/focus holders.

use std::collections::HashMap;

use arena::Arena;
use common::Diagnostic;
use stylesheet::{Declaration, Stylesheet};

use crate::node::{DOCUMENT_TAG_NAME, ElementData, Node, NodeData, NodeId};

/// Interaction states that at most one node holds at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiState {
    Hovered,
    Focused,
}

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// The complete DOM tree.
pub struct Dom {
    pub nodes: Arena<Node>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
    stylesheets: Vec<Stylesheet>,
    hovered: Option<NodeId>,
    focused: Option<NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Create a document holding only its root.
    pub fn new() -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::new(NodeData::Document(ElementData::new(
            DOCUMENT_TAG_NAME,
        ))));
        Self {
            nodes,
            root,
            ids: HashMap::new(),
            stylesheets: Vec::new(),
            hovered: None,
            focused: None,
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =======================================================================
    // Node creation
    // =======================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.nodes
            .insert(Node::new(NodeData::Element(ElementData::new(tag_name))))
    }

    /// Create a detached text fragment.
    pub fn create_text_fragment(&mut self, text: &str) -> NodeId {
        self.nodes
            .insert(Node::new(NodeData::TextFragment(text.to_string())))
    }

    // =======================================================================
    // Tree mutation
    // =======================================================================

    /// Append `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent it is first removed from its current
    /// position.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes.get(child).and_then(|n| n.parent).is_some() {
            self.detach(child);
        }

        let old_last = self.nodes.get(parent).and_then(|n| n.last_child);

        if let Some(old_last_node) = old_last.and_then(|id| self.nodes.get_mut(id)) {
            old_last_node.next_sibling = Some(child);
        }

        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = old_last;
            child_node.next_sibling = None;
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = Some(child);
            }
            parent_node.last_child = Some(child);
        }
    }

    /// Detach a node from its parent without deallocating it.
    fn detach(&mut self, node_id: NodeId) {
        let (parent_id, prev, next) = match self.nodes.get(node_id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if let Some(prev_node) = prev.and_then(|id| self.nodes.get_mut(id)) {
            prev_node.next_sibling = next;
        }
        if let Some(next_node) = next.and_then(|id| self.nodes.get_mut(id)) {
            next_node.prev_sibling = prev;
        }

        if let Some(parent_node) = parent_id.and_then(|id| self.nodes.get_mut(id)) {
            if parent_node.first_child == Some(node_id) {
                parent_node.first_child = next;
            }
            if parent_node.last_child == Some(node_id) {
                parent_node.last_child = prev;
            }
        }

        if let Some(node) = self.nodes.get_mut(node_id) {
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    /// Set an attribute. `class` feeds the class list instead of the map and
    /// `id` keeps the id index current.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if name == "class" {
            self.add_class(node, value);
            return;
        }

        let Some(element) = self.nodes.get_mut(node).and_then(Node::as_element_mut) else {
            return;
        };
        element.attributes.insert(name.to_string(), value.to_string());

        if name == "id" {
            self.ids.retain(|_, holder| *holder != node);
            self.ids.insert(value.to_string(), node);
        }
    }

    /// Add one or more space-separated class names.
    pub fn add_class(&mut self, node: NodeId, names: &str) {
        if let Some(element) = self.nodes.get_mut(node).and_then(Node::as_element_mut) {
            element
                .classes
                .extend(names.split(' ').filter(|n| !n.is_empty()).map(String::from));
        }
    }

    /// Replace the text of a fragment.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(Node {
            data: NodeData::TextFragment(t),
            ..
        }) = self.nodes.get_mut(node)
        {
            *t = text.to_string();
        }
    }

    // =======================================================================
    // Accessors
    // =======================================================================

    /// Tag name of `node`; empty for a stale handle.
    pub fn tag_name(&self, node: NodeId) -> &str {
        self.nodes.get(node).map_or("", Node::tag_name)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(node).and_then(|n| n.attribute(name))
    }

    pub fn has_class(&self, node: NodeId, name: &str) -> bool {
        self.nodes.get(node).is_some_and(|n| n.has_class(name))
    }

    pub fn is_fragment(&self, node: NodeId) -> bool {
        self.nodes.get(node).is_some_and(Node::is_fragment)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.prev_sibling)
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Whether every descendant of `node` is a text fragment.
    pub fn children_are_fragments(&self, node: NodeId) -> bool {
        self.children(node)
            .into_iter()
            .all(|c| self.is_fragment(c) && self.children_are_fragments(c))
    }

    /// Text of every fragment below `node`, joined with single spaces.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(text) = self.nodes.get(node).and_then(Node::text) {
            parts.push(text);
        }
        for id in self.descendants(node) {
            if let Some(text) = self.nodes.get(id).and_then(Node::text) {
                parts.push(text);
            }
        }
        parts.join(" ")
    }

    // =======================================================================
    // Traversal
    // =======================================================================

    /// Return the immediate children of `parent` in document order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.nodes.get(parent).and_then(|n| n.first_child);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.nodes.get(id).and_then(|n| n.next_sibling);
        }
        out
    }

    /// Return the chain of ancestors from `node` up to (and including) the root.
    /// The first element is the direct parent, the last is the root.
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cursor = self.parent(node);
        while let Some(id) = cursor {
            out.push(id);
            cursor = self.parent(id);
        }
        out
    }

    /// Return all descendants of `node` in pre-order DFS (not including `node` itself).
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();

        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        out
    }

    // =======================================================================
    // Stylesheets
    // =======================================================================

    /// Parse and append a stylesheet. Returns its diagnostics.
    pub fn load_stylesheet(&mut self, text: &str, source: &str) -> Vec<Diagnostic> {
        let (sheet, diagnostics) = Stylesheet::parse(text, source);
        log::debug!(
            "loaded stylesheet {source:?}: {} declarations",
            sheet.declarations.len()
        );
        self.stylesheets.push(sheet);
        diagnostics
    }

    /// Drop the sheet loaded under `source` and load `text` in its place.
    /// Returns `None` when no sheet was loaded under that name.
    pub fn reload_stylesheet(&mut self, text: &str, source: &str) -> Option<Vec<Diagnostic>> {
        let index = self.stylesheets.iter().position(|s| s.source == source)?;
        self.stylesheets.remove(index);
        Some(self.load_stylesheet(text, source))
    }

    pub fn stylesheets(&self) -> &[Stylesheet] {
        &self.stylesheets
    }

    /// Every declaration of every sheet, in load order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.stylesheets.iter().flat_map(|s| s.declarations.iter())
    }

    // =======================================================================
    // UI state
    // =======================================================================

    /// Make `node` the holder of `state`, returning the previous holder.
    pub fn set_ui_state(&mut self, state: UiState, node: Option<NodeId>) -> Option<NodeId> {
        let slot = match state {
            UiState::Hovered => &mut self.hovered,
            UiState::Focused => &mut self.focused,
        };
        let previous = std::mem::replace(slot, node);
        if previous != node {
            log::trace!("{state:?}: {previous:?} -> {node:?}");
        }
        previous
    }

    pub fn ui_state_holder(&self, state: UiState) -> Option<NodeId> {
        match state {
            UiState::Hovered => self.hovered,
            UiState::Focused => self.focused,
        }
    }

    pub fn is_hovered(&self, node: NodeId) -> bool {
        self.hovered == Some(node)
    }

    pub fn is_focused(&self, node: NodeId) -> bool {
        self.focused == Some(node)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Build:
    /// ```text
    /// doc
    /// └── panel
    ///     ├── title ── "Hello"
    ///     └── body  ── "a", "b"
    /// ```
    fn sample() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let panel = dom.create_element("panel");
        let title = dom.create_element("title");
        let body = dom.create_element("body");
        let hello = dom.create_text_fragment("Hello");
        let a = dom.create_text_fragment("a");
        let b = dom.create_text_fragment("b");
        dom.append_child(dom.root(), panel);
        dom.append_child(panel, title);
        dom.append_child(title, hello);
        dom.append_child(panel, body);
        dom.append_child(body, a);
        dom.append_child(body, b);
        (dom, panel, title, body)
    }

    #[test]
    fn root_is_the_document() {
        let dom = Dom::new();
        let root = dom.get(dom.root()).unwrap();
        assert!(root.is_document());
        assert_eq!(root.tag_name(), "doc");
        assert_eq!(dom.len(), 1);
    }

    #[test]
    fn fragments_report_their_tag_name() {
        let mut dom = Dom::new();
        let t = dom.create_text_fragment("x");
        assert_eq!(dom.tag_name(t), "#text-fragment");
        assert_eq!(dom.get(t).and_then(Node::text), Some("x"));
        assert!(dom.get(t).unwrap().as_element().is_none());
    }

    #[test]
    fn append_child_sets_links() {
        let (dom, panel, title, body) = sample();
        assert_eq!(dom.children(panel), vec![title, body]);
        assert_eq!(dom.parent(body), Some(panel));
        assert_eq!(dom.prev_sibling(body), Some(title));
        assert_eq!(dom.prev_sibling(title), None);
    }

    #[test]
    fn append_child_moves_from_old_parent() {
        let (mut dom, panel, title, body) = sample();
        dom.append_child(body, title);
        assert_eq!(dom.children(panel), vec![body]);
        assert_eq!(dom.parent(title), Some(body));
        assert_eq!(dom.prev_sibling(body), None);
    }

    #[test]
    fn descendants_preorder() {
        let (dom, panel, title, body) = sample();
        let tags: Vec<_> = dom
            .descendants(panel)
            .into_iter()
            .map(|n| dom.tag_name(n).to_string())
            .collect();
        assert_eq!(tags, vec!["title", "#text-fragment", "body", "#text-fragment", "#text-fragment"]);
        assert_eq!(dom.ancestors(title), vec![panel, dom.root()]);
        assert_eq!(dom.descendants(body).len(), 2);
    }

    #[test]
    fn class_attribute_splits_and_stays_out_of_the_map() {
        let mut dom = Dom::new();
        let n = dom.create_element("div");
        dom.set_attribute(n, "class", "a  b");
        dom.add_class(n, "c");
        assert!(dom.has_class(n, "a"));
        assert!(dom.has_class(n, "b"));
        assert!(dom.has_class(n, "c"));
        assert_eq!(dom.get(n).unwrap().classes().len(), 3);
        assert_eq!(dom.attribute(n, "class"), None);
    }

    #[test]
    fn id_index_follows_set_attribute() {
        let mut dom = Dom::new();
        let n = dom.create_element("div");
        dom.set_attribute(n, "id", "first");
        assert_eq!(dom.element_by_id("first"), Some(n));
        dom.set_attribute(n, "id", "second");
        assert_eq!(dom.element_by_id("first"), None);
        assert_eq!(dom.element_by_id("second"), Some(n));
        assert_eq!(dom.attribute(n, "id"), Some("second"));
    }

    #[test]
    fn text_content_and_fragment_checks() {
        let (dom, panel, title, body) = sample();
        assert_eq!(dom.text_content(body), "a b");
        assert_eq!(dom.text_content(panel), "Hello a b");
        assert!(dom.children_are_fragments(title));
        assert!(!dom.children_are_fragments(panel));
    }

    #[test]
    fn ui_state_has_a_single_holder() {
        let (mut dom, panel, title, _) = sample();
        assert_eq!(dom.set_ui_state(UiState::Hovered, Some(panel)), None);
        assert!(dom.is_hovered(panel));
        assert_eq!(dom.set_ui_state(UiState::Hovered, Some(title)), Some(panel));
        assert!(!dom.is_hovered(panel));
        assert!(dom.is_hovered(title));
        assert!(!dom.is_focused(title));
        dom.set_ui_state(UiState::Focused, Some(title));
        assert_eq!(dom.ui_state_holder(UiState::Focused), Some(title));
        assert_eq!(dom.ui_state_holder(UiState::Hovered), Some(title));
    }

    #[test]
    fn load_and_reload_stylesheets() {
        let mut dom = Dom::new();
        assert!(dom.load_stylesheet("a {} b {}", "base.yss").is_empty());
        assert!(dom.load_stylesheet("c {}", "theme.yss").is_empty());
        assert_eq!(dom.declarations().count(), 3);

        let diagnostics = dom.reload_stylesheet("x {}", "base.yss");
        assert_eq!(diagnostics, Some(Vec::new()));
        assert_eq!(dom.declarations().count(), 2);
        assert_eq!(dom.stylesheets()[1].source, "base.yss");
        assert!(dom.reload_stylesheet("", "missing.yss").is_none());
    }
}
