//! Build a layout tree from the DOM tree and computed styles.
//!
//! Walks the DOM in tree order with an explicit stack of open layout nodes,
//! seeded with the document widget. `display: none` subtrees are skipped,
//! consecutive text fragments coalesce into the open `Inline` run, and an
//! inline element met while an inline element's `Inline` run is open
//! promotes that run into an `InlineBox` so the element can sit beside it.
//! Any other element goes under the stack top as is.

use dom::{Dom, NodeId};
use style::{Display, StyleMap};

use crate::tree::{InlineText, LayoutKind, LayoutNodeId, LayoutTree};

/// Build a complete layout tree for `dom`. The document widget stands for
/// the DOM root; layout nodes are created for its descendants.
pub fn build_layout_tree(dom: &Dom, styles: &StyleMap) -> LayoutTree {
    let tree = LayoutTree::new(dom.root());
    let stack = vec![tree.root()];
    let mut builder = Builder { dom, styles, tree, stack };

    for child in dom.children(dom.root()) {
        builder.visit(child);
    }

    log::debug!("constructed layout tree with {} nodes", builder.tree.len());
    builder.tree
}

struct Builder<'a> {
    dom: &'a Dom,
    styles: &'a StyleMap,
    tree: LayoutTree,
    stack: Vec<LayoutNodeId>,
}

impl Builder<'_> {
    fn visit(&mut self, dom_node: NodeId) {
        let Some(node) = self.allocate(dom_node) else {
            return;
        };

        let top = self.top();
        let attached = self.tree.parent(node).is_some();
        if !attached && node != top {
            self.tree.insert_child(top, node);
        }

        let pushed = node != top;
        if pushed {
            self.stack.push(node);
        }
        for child in self.dom.children(dom_node) {
            self.visit(child);
        }
        if pushed {
            self.stack.pop();
        }
    }

    /// The layout node `dom_node` lives in: a new node, or the open inline
    /// run a fragment joins. `None` skips the subtree.
    fn allocate(&mut self, dom_node: NodeId) -> Option<LayoutNodeId> {
        let top = self.top();
        let top_is_open_inline = self.tree.get(top).is_some_and(|node| node.is_open_inline());

        if self.dom.is_fragment(dom_node) {
            let text = self.dom.get(dom_node).and_then(|node| node.text()).unwrap_or_default();
            if top_is_open_inline {
                if let Some(LayoutKind::Inline(run)) = self.tree.get_mut(top).map(|node| &mut node.kind) {
                    run.fragments.push(text.to_owned());
                }
                return Some(top);
            }
            let run = InlineText { fragments: vec![text.to_owned()] };
            return Some(self.tree.alloc(LayoutKind::Inline(run), dom_node));
        }

        let display = crate::style_for(self.styles, dom_node).display();
        if display == Display::None {
            log::trace!("skipping hidden <{}>", self.dom.tag_name(dom_node));
            return None;
        }

        let kind = self.kind_for(dom_node, display);
        if display == Display::Inline && top_is_open_inline && self.is_inline_element(top) {
            return Some(self.promote(top, kind, dom_node));
        }
        Some(self.tree.alloc(kind, dom_node))
    }

    fn kind_for(&self, dom_node: NodeId, display: Display) -> LayoutKind {
        let value = self.dom.attribute(dom_node, "value").unwrap_or_default();
        let placeholder = self.dom.attribute(dom_node, "placeholder").map(str::to_owned);

        match self.dom.tag_name(dom_node) {
            "input" => LayoutKind::input(value, placeholder),
            "textarea" => LayoutKind::textarea(value, placeholder),
            _ if display == Display::Inline => LayoutKind::Inline(InlineText::default()),
            _ => LayoutKind::Box,
        }
    }

    /// Wrap the open inline run `inline` in a new `InlineBox` that takes its
    /// place in the parent and on the stack, then create the node for
    /// `dom_node` inside the box.
    fn promote(&mut self, inline: LayoutNodeId, kind: LayoutKind, dom_node: NodeId) -> LayoutNodeId {
        let Some(inline_dom) = self.tree.get(inline).map(|node| node.dom_node) else {
            return self.tree.alloc(kind, dom_node);
        };

        let inline_box = self.tree.alloc(LayoutKind::InlineBox, inline_dom);
        if let Some(parent) = self.tree.parent(inline) {
            self.tree.replace_child(parent, inline, inline_box);
        }
        self.tree.insert_child(inline_box, inline);
        if let Some(top) = self.stack.last_mut() {
            *top = inline_box;
        }

        let node = self.tree.alloc(kind, dom_node);
        self.tree.insert_child(inline_box, node);
        node
    }

    /// Whether the DOM node behind layout node `id` is displayed inline.
    fn is_inline_element(&self, id: LayoutNodeId) -> bool {
        self.tree
            .get(id)
            .is_some_and(|node| crate::style_for(self.styles, node.dom_node).display() == Display::Inline)
    }

    fn top(&self) -> LayoutNodeId {
        self.stack.last().copied().unwrap_or(self.tree.root())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use style::{InheritedValues, compute_styles};

    const SHEET: &str = "span, b { display: inline; } .hidden { display: none; }";

    fn build(markup: &[(&str, &str)]) -> (Dom, LayoutTree) {
        // (parent id or "", tag or "'text") pairs.
        let mut dom = Dom::new();
        for &(parent, tag) in markup {
            let parent = if parent.is_empty() {
                dom.root()
            } else {
                dom.element_by_id(parent).unwrap()
            };
            let node = match tag.strip_prefix('\'') {
                Some(text) => dom.create_text_fragment(text),
                None => {
                    let (tag, id) = tag.split_once('#').unwrap_or((tag, ""));
                    let node = dom.create_element(tag);
                    if !id.is_empty() {
                        dom.set_attribute(node, "id", id);
                    }
                    node
                }
            };
            dom.append_child(parent, node);
        }
        dom.load_stylesheet(SHEET, "test");
        let styles = compute_styles(&dom, &InheritedValues::default());
        let tree = build_layout_tree(&dom, &styles);
        (dom, tree)
    }

    fn shape(tree: &LayoutTree, id: LayoutNodeId) -> String {
        let node = tree.get(id).unwrap();
        let mut out = node.kind.name().to_string();
        if let Some(text) = node.inline_text().filter(|t| !t.fragments.is_empty()) {
            out.push_str(&format!("'{}'", text.text()));
        }
        let children: Vec<_> = node.children.iter().map(|&c| shape(tree, c)).collect();
        if !children.is_empty() {
            out.push_str(&format!("[{}]", children.join(" ")));
        }
        out
    }

    #[test]
    fn blocks_become_boxes() {
        let (_, tree) = build(&[("", "div#a"), ("a", "div"), ("", "div")]);
        assert_eq!(shape(&tree, tree.root()), "document[box[box] box]");
    }

    #[test]
    fn fragments_coalesce_inside_inline() {
        let (_, tree) = build(&[("", "span#s"), ("s", "'one"), ("s", "'two")]);
        assert_eq!(shape(&tree, tree.root()), "document[inline'one two']");
    }

    #[test]
    fn loose_fragment_gets_own_inline() {
        let (_, tree) = build(&[("", "div#a"), ("a", "'hello")]);
        assert_eq!(shape(&tree, tree.root()), "document[box[inline'hello']]");
    }

    #[test]
    fn display_none_skips_subtree() {
        let (mut dom, _) = build(&[]);
        let hidden = dom.create_element("div");
        dom.set_attribute(hidden, "class", "hidden");
        let inner = dom.create_element("div");
        dom.append_child(dom.root(), hidden);
        dom.append_child(hidden, inner);
        let styles = compute_styles(&dom, &InheritedValues::default());
        let tree = build_layout_tree(&dom, &styles);
        assert_eq!(tree.len(), 1);
        assert!(tree.find_layout_node(inner).is_none());
    }

    #[test]
    fn element_inside_inline_promotes_run() {
        let (dom, tree) = build(&[
            ("", "span#s"),
            ("s", "'a"),
            ("s", "b#b"),
            ("b", "'x"),
            ("s", "'c"),
        ]);
        assert_eq!(
            shape(&tree, tree.root()),
            "document[inline-box[inline'a' inline'x' inline'c']]"
        );

        let span = dom.element_by_id("s").unwrap();
        let inline_box = tree.children(tree.root())[0];
        assert_eq!(tree.get(inline_box).unwrap().dom_node, span);
        assert_eq!(tree.find_layout_node(span), Some(inline_box));
    }

    #[test]
    fn block_inside_inline_is_not_promoted() {
        let (_, tree) = build(&[("", "span#s"), ("s", "'a"), ("s", "div")]);
        assert_eq!(shape(&tree, tree.root()), "document[inline'a'[box]]");
    }

    #[test]
    fn editable_inside_inline_is_not_promoted() {
        let (_, tree) = build(&[("", "span#s"), ("s", "'a"), ("s", "input"), ("s", "b#b"), ("b", "'x")]);
        assert_eq!(
            shape(&tree, tree.root()),
            "document[inline-box[inline'a'[input] inline'x']]"
        );
    }

    #[test]
    fn editable_tags() {
        let (mut dom, _) = build(&[]);
        let input = dom.create_element("input");
        dom.set_attribute(input, "value", "hello");
        dom.set_attribute(input, "placeholder", "name");
        let textarea = dom.create_element("textarea");
        dom.append_child(dom.root(), input);
        dom.append_child(dom.root(), textarea);
        let styles = compute_styles(&dom, &InheritedValues::default());
        let tree = build_layout_tree(&dom, &styles);

        assert_eq!(shape(&tree, tree.root()), "document[input textarea]");
        let editable = tree.get(tree.find_layout_node(input).unwrap()).unwrap().editor().unwrap();
        assert_eq!(editable.text(), "hello");
        assert_eq!(editable.placeholder.as_deref(), Some("name"));
        let textarea = tree.get(tree.find_layout_node(textarea).unwrap()).unwrap();
        assert!(textarea.editor().unwrap().engine().is_multi_line());
    }
}
