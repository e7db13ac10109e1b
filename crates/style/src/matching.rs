//! Selector matching: determine whether a DOM node matches a selector.
//!
//! A selector chain is matched **right-to-left**: the last simple selector is
//! tested against the node itself, then its relation decides where the
//! previous simple selector has to match (parent, any ancestor or the
//! preceding sibling).

use common::Diagnostic;
use dom::{Dom, Node, NodeId};
use stylesheet::{Declaration, PartKind, PseudoClass, Relation, Selector, SelectorPart, SimpleSelector};

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// Test whether `node_id` matches a full selector chain.
pub fn matches_selector(dom: &Dom, node_id: NodeId, selector: &Selector) -> bool {
    match selector.simple_selectors.len() {
        0 => false,
        n => matches_from(dom, node_id, &selector.simple_selectors, n - 1),
    }
}

/// A declaration applies when any of its alternative selectors matches.
pub fn matches_declaration(dom: &Dom, node_id: NodeId, declaration: &Declaration) -> bool {
    declaration
        .selectors
        .iter()
        .any(|selector| matches_selector(dom, node_id, selector))
}

/// Test a single simple selector (all parts plus the pseudo class) against
/// the node itself, ignoring its relation.
pub fn matches_simple(dom: &Dom, node_id: NodeId, simple: &SimpleSelector) -> bool {
    let Some(node) = dom.get(node_id) else {
        return false;
    };

    let pseudo_ok = match simple.pseudo_class {
        None => true,
        Some(PseudoClass::Hover) => dom.is_hovered(node_id),
        Some(PseudoClass::Focus) => dom.is_focused(node_id),
    };

    pseudo_ok && simple.parts.iter().all(|part| matches_part(node, part))
}

/// Every declaration of every loaded sheet that applies to `node_id`, in load
/// order.
pub fn matching_declarations(dom: &Dom, node_id: NodeId) -> Vec<&Declaration> {
    dom.declarations()
        .filter(|declaration| matches_declaration(dom, node_id, declaration))
        .collect()
}

/// First node in pre-order (root included) matched by `selector_text`.
pub fn query(dom: &Dom, selector_text: &str) -> Result<Option<NodeId>, Vec<Diagnostic>> {
    Ok(query_all(dom, selector_text)?.into_iter().next())
}

/// Every node in pre-order (root included) matched by `selector_text`, which
/// may hold comma-separated alternatives.
pub fn query_all(dom: &Dom, selector_text: &str) -> Result<Vec<NodeId>, Vec<Diagnostic>> {
    let selectors = stylesheet::parse_selector(selector_text)?;

    let root = dom.root();
    let matched = std::iter::once(root)
        .chain(dom.descendants(root))
        .filter(|&node| selectors.iter().any(|s| matches_selector(dom, node, s)))
        .collect();
    Ok(matched)
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────────────────────────

fn matches_from(dom: &Dom, node_id: NodeId, chain: &[SimpleSelector], index: usize) -> bool {
    let simple = &chain[index];
    if !matches_simple(dom, node_id, simple) {
        return false;
    }

    match simple.relation {
        Relation::None => true,
        _ if index == 0 => false,
        Relation::ImmediateChild => dom
            .parent(node_id)
            .is_some_and(|parent| matches_from(dom, parent, chain, index - 1)),
        Relation::Descendant => dom
            .ancestors(node_id)
            .into_iter()
            .any(|ancestor| matches_from(dom, ancestor, chain, index - 1)),
        Relation::AdjacentSibling => dom
            .prev_sibling(node_id)
            .is_some_and(|sibling| matches_from(dom, sibling, chain, index - 1)),
    }
}

fn matches_part(node: &Node, part: &SelectorPart) -> bool {
    match part.kind {
        PartKind::Universal => true,
        PartKind::TagName => node.tag_name() == part.value,
        PartKind::Id => node.attribute("id") == Some(part.value.as_str()),
        PartKind::Class => node.has_class(&part.value),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
