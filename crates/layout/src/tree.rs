//! Layout tree: the node tree that mirrors (but is not identical to) the DOM tree.
//!
//! Nodes live in an arena owned by [`LayoutTree`]; parent, child and sibling
//! links are handles into it. The tree is rebuilt wholesale, never patched.

use std::sync::atomic::{AtomicU64, Ordering};

use arena::{Arena, Handle};
use common::{Rect, Size, Vec2};
use dom::NodeId;
use editor::EditorKind;
use style::{ComputedValues, StyleMap};

use crate::editable::EditableBox;

/// A handle into the layout arena.
pub type LayoutNodeId = Handle;

/// Diagnostic ids, unique for the process lifetime.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

// ─────────────────────────────────────────────────────────────────────────────
// LayoutKind
// ─────────────────────────────────────────────────────────────────────────────

/// Text fragments coalesced into one inline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineText {
    pub fragments: Vec<String>,
}

impl InlineText {
    /// Fragments joined with a single space.
    pub fn text(&self) -> String {
        self.fragments.join(" ")
    }
}

#[derive(Debug)]
pub enum LayoutKind {
    /// The root; owns the viewport.
    DocumentWidget,
    Box,
    Inline(InlineText),
    /// An inline run promoted so that other nodes can sit beside it.
    InlineBox,
    Input(EditableBox),
    Textarea(EditableBox),
}

impl LayoutKind {
    pub fn name(&self) -> &'static str {
        match self {
            LayoutKind::DocumentWidget => "document",
            LayoutKind::Box => "box",
            LayoutKind::Inline(_) => "inline",
            LayoutKind::InlineBox => "inline-box",
            LayoutKind::Input(_) => "input",
            LayoutKind::Textarea(_) => "textarea",
        }
    }

    pub fn input(text: &str, placeholder: Option<String>) -> Self {
        LayoutKind::Input(EditableBox::new(EditorKind::SingleLine, text, placeholder))
    }

    pub fn textarea(text: &str, placeholder: Option<String>) -> Self {
        LayoutKind::Textarea(EditableBox::new(EditorKind::MultiLine, text, placeholder))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LayoutNode
// ─────────────────────────────────────────────────────────────────────────────

/// A single node in the layout tree.
///
/// `position` is the top-left of the padding box, `size` the content box.
#[derive(Debug)]
pub struct LayoutNode {
    pub id: u64,
    pub kind: LayoutKind,
    /// The DOM node this layout node was created for.
    pub dom_node: NodeId,
    pub position: Vec2,
    pub size: Size,
    pub parent: Option<LayoutNodeId>,
    pub previous: Option<LayoutNodeId>,
    pub next: Option<LayoutNodeId>,
    pub children: Vec<LayoutNodeId>,
}

impl LayoutNode {
    pub fn new(kind: LayoutKind, dom_node: NodeId) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            dom_node,
            position: Vec2::ZERO,
            size: Size::ZERO,
            parent: None,
            previous: None,
            next: None,
            children: Vec::new(),
        }
    }

    /// `Inline` or `InlineBox`.
    pub fn is_inline(&self) -> bool {
        matches!(self.kind, LayoutKind::Inline(_) | LayoutKind::InlineBox)
    }

    pub fn is_inline_box(&self) -> bool {
        matches!(self.kind, LayoutKind::InlineBox)
    }

    /// An `Inline` that fragments can still be appended to.
    pub fn is_open_inline(&self) -> bool {
        matches!(self.kind, LayoutKind::Inline(_))
    }

    pub fn is_editable(&self) -> bool {
        self.editor().is_some()
    }

    /// Placed on the current row by the rows layout.
    pub fn is_inline_level(&self) -> bool {
        self.is_inline() || self.is_editable()
    }

    pub fn inline_text(&self) -> Option<&InlineText> {
        match &self.kind {
            LayoutKind::Inline(text) => Some(text),
            _ => None,
        }
    }

    pub fn editor(&self) -> Option<&EditableBox> {
        match &self.kind {
            LayoutKind::Input(editable) | LayoutKind::Textarea(editable) => Some(editable),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditableBox> {
        match &mut self.kind {
            LayoutKind::Input(editable) | LayoutKind::Textarea(editable) => Some(editable),
            _ => None,
        }
    }

    /// Content size plus padding on both sides.
    pub fn size_with_padding(&self, style: &ComputedValues) -> Size {
        let padding = style.padding();
        Size::new(
            self.size.width + padding.horizontal(),
            self.size.height + padding.vertical(),
        )
    }

    /// Top-left of the content box.
    pub fn inner_position(&self, style: &ComputedValues) -> Vec2 {
        let padding = style.padding();
        Vec2::new(self.position.x + padding.left, self.position.y + padding.top)
    }

    pub fn padding_rect(&self, style: &ComputedValues) -> Rect {
        Rect::from_origin_size(self.position, self.size_with_padding(style))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LayoutTree
// ─────────────────────────────────────────────────────────────────────────────

/// The complete layout tree, rooted at a document widget.
pub struct LayoutTree {
    nodes: Arena<LayoutNode>,
    root: LayoutNodeId,
}

impl LayoutTree {
    /// A tree holding only the document widget for `dom_root`.
    pub fn new(dom_root: NodeId) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(LayoutNode::new(LayoutKind::DocumentWidget, dom_root));
        Self { nodes, root }
    }

    pub fn root(&self) -> LayoutNodeId {
        self.root
    }

    pub fn get(&self, id: LayoutNodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: LayoutNodeId) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: LayoutNodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The root is always present.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: LayoutKind, dom_node: NodeId) -> LayoutNodeId {
        self.nodes.insert(LayoutNode::new(kind, dom_node))
    }

    pub fn children(&self, id: LayoutNodeId) -> &[LayoutNodeId] {
        self.nodes.get(id).map_or(&[], |node| node.children.as_slice())
    }

    pub fn parent(&self, id: LayoutNodeId) -> Option<LayoutNodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Append `child` to `parent`. Returns `false` when it is already there.
    pub fn insert_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> bool {
        if parent == child || !self.nodes.contains(child) {
            return false;
        }
        let Some(node) = self.nodes.get_mut(parent) else {
            return false;
        };
        if node.children.contains(&child) {
            return false;
        }
        node.children.push(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        self.update_siblings(parent);
        true
    }

    /// Detach `child` from `parent`, returning the slot it occupied.
    pub fn remove_child(&mut self, parent: LayoutNodeId, child: LayoutNodeId) -> Option<usize> {
        let node = self.nodes.get_mut(parent)?;
        let index = node.children.iter().position(|&c| c == child)?;
        node.children.remove(index);

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
            node.previous = None;
            node.next = None;
        }
        self.update_siblings(parent);
        Some(index)
    }

    /// Put `new` in the slot `old` occupies under `parent`. `old` is detached.
    pub fn replace_child(&mut self, parent: LayoutNodeId, old: LayoutNodeId, new: LayoutNodeId) -> bool {
        if !self.nodes.contains(new) {
            return false;
        }
        let Some(index) = self.remove_child(parent, old) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.insert(index, new);
        }
        if let Some(node) = self.nodes.get_mut(new) {
            node.parent = Some(parent);
        }
        self.update_siblings(parent);
        true
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    pub fn is_ancestor_of(&self, ancestor: LayoutNodeId, node: LayoutNodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Every node in pre-order, root first.
    pub fn pre_order(&self) -> Vec<LayoutNodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// The first node in pre-order created for `dom_node`.
    pub fn find_layout_node(&self, dom_node: NodeId) -> Option<LayoutNodeId> {
        self.pre_order()
            .into_iter()
            .find(|&id| self.nodes.get(id).is_some_and(|node| node.dom_node == dom_node))
    }

    /// Delete every node but the root.
    pub fn clear(&mut self) {
        for handle in self.nodes.handles() {
            if handle != self.root {
                self.nodes.remove(handle);
            }
        }
        if let Some(root) = self.nodes.get_mut(self.root) {
            root.children.clear();
            root.size = Size::ZERO;
        }
    }

    /// The deepest node whose padding box contains `point`. Children are
    /// tested before their parent, in document order.
    pub fn hit_test(&self, styles: &StyleMap, point: Vec2) -> Option<LayoutNodeId> {
        self.hit_test_from(self.root, styles, point)
    }

    fn hit_test_from(&self, id: LayoutNodeId, styles: &StyleMap, point: Vec2) -> Option<LayoutNodeId> {
        let node = self.nodes.get(id)?;
        for &child in &node.children {
            if let Some(hit) = self.hit_test_from(child, styles, point) {
                return Some(hit);
            }
        }

        if node.is_open_inline() && node.size.is_zero() {
            return None;
        }
        let style = crate::style_for(styles, node.dom_node);
        node.padding_rect(style).contains(point).then_some(id)
    }

    fn update_siblings(&mut self, parent: LayoutNodeId) {
        let children = self.children(parent).to_vec();
        for (index, &child) in children.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(child) {
                node.previous = index.checked_sub(1).map(|i| children[i]);
                node.next = children.get(index + 1).copied();
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Dom;

    fn tree_with_children(count: usize) -> (LayoutTree, Vec<LayoutNodeId>) {
        let dom = Dom::new();
        let mut tree = LayoutTree::new(dom.root());
        let children: Vec<_> = (0..count)
            .map(|_| tree.alloc(LayoutKind::Box, dom.root()))
            .collect();
        for &child in &children {
            assert!(tree.insert_child(tree.root(), child));
        }
        (tree, children)
    }

    #[test]
    fn insert_links_siblings() {
        let (tree, c) = tree_with_children(3);
        let middle = tree.get(c[1]).unwrap();
        assert_eq!(middle.parent, Some(tree.root()));
        assert_eq!(middle.previous, Some(c[0]));
        assert_eq!(middle.next, Some(c[2]));
        assert_eq!(tree.get(c[0]).unwrap().previous, None);
    }

    #[test]
    fn insert_twice_is_rejected() {
        let (mut tree, c) = tree_with_children(1);
        let root = tree.root();
        assert!(!tree.insert_child(root, c[0]));
        assert_eq!(tree.children(root).len(), 1);
    }

    #[test]
    fn remove_child_matches_identity() {
        let (mut tree, c) = tree_with_children(3);
        let root = tree.root();
        assert_eq!(tree.remove_child(root, c[1]), Some(1));
        assert_eq!(tree.children(root), &[c[0], c[2]]);
        assert_eq!(tree.get(c[0]).unwrap().next, Some(c[2]));
        assert_eq!(tree.get(c[1]).unwrap().parent, None);
        assert_eq!(tree.remove_child(root, c[1]), None);
    }

    #[test]
    fn replace_child_keeps_slot() {
        let (mut tree, c) = tree_with_children(3);
        let root = tree.root();
        let replacement = tree.alloc(LayoutKind::InlineBox, tree.get(root).unwrap().dom_node);
        assert!(tree.replace_child(root, c[1], replacement));
        assert_eq!(tree.children(root), &[c[0], replacement, c[2]]);
        assert_eq!(tree.get(replacement).unwrap().previous, Some(c[0]));
        assert_eq!(tree.get(c[1]).unwrap().parent, None);
    }

    #[test]
    fn ancestry() {
        let (mut tree, c) = tree_with_children(2);
        let grandchild = tree.alloc(LayoutKind::Box, tree.get(c[0]).unwrap().dom_node);
        tree.insert_child(c[0], grandchild);
        assert!(tree.is_ancestor_of(tree.root(), grandchild));
        assert!(tree.is_ancestor_of(c[0], grandchild));
        assert!(!tree.is_ancestor_of(c[1], grandchild));
        assert!(!tree.is_ancestor_of(grandchild, grandchild));
    }

    #[test]
    fn clear_keeps_only_root() {
        let (mut tree, c) = tree_with_children(3);
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains(c[0]));
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn ids_are_unique() {
        let (tree, c) = tree_with_children(2);
        assert_ne!(tree.get(c[0]).unwrap().id, tree.get(c[1]).unwrap().id);
    }

    #[test]
    fn checked_editor_accessors() {
        let dom = Dom::new();
        let mut tree = LayoutTree::new(dom.root());
        let input = tree.alloc(LayoutKind::input("hi", None), dom.root());
        let boxed = tree.alloc(LayoutKind::Box, dom.root());
        assert_eq!(tree.get(input).unwrap().editor().unwrap().text(), "hi");
        assert!(tree.get_mut(boxed).unwrap().editor_mut().is_none());
        assert!(tree.get(input).unwrap().is_inline_level());
    }
}
