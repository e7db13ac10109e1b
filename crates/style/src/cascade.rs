//! Cascade resolution: merge matching declarations and apply inheritance.
//!
//! For each node every matching declaration is collected, ordered by weight
//! (stable, so equal weights keep sheet order) and folded onto the defaults so
//! the heaviest declaration wins per property. The result then inherits the
//! unset text fields from the parent's already resolved values. Nodes are
//! processed in pre-order, so a parent is always resolved before its children.

use std::collections::HashMap;

use dom::{Dom, NodeId};
use stylesheet::Declaration;

use crate::computed::{ComputedValues, InheritedValues, MutableComputedValues};
use crate::matching::matching_declarations;

/// Resolved style of every node in a document.
pub type StyleMap = HashMap<NodeId, ComputedValues>;

// ─────────────────────────────────────────────────────────────────────────────
// Collect matching rules
// ─────────────────────────────────────────────────────────────────────────────

/// Declarations applying to `node_id`, lightest first.
pub fn collect_matching_rules(dom: &Dom, node_id: NodeId) -> Vec<&Declaration> {
    let mut matched = matching_declarations(dom, node_id);
    matched.sort_by_key(|declaration| declaration.weight());
    matched
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolve style
// ─────────────────────────────────────────────────────────────────────────────

/// Merge `matched` (lightest first) into one declaration and apply it onto
/// the defaults. Inheritable fields the merge did not set stay unset.
pub fn resolve_style(matched: &[&Declaration]) -> MutableComputedValues {
    let mut merged = Declaration::default();
    for declaration in matched {
        merged.merge_from(declaration);
    }

    let mut style = MutableComputedValues::default();
    for (property, value) in merged.properties() {
        style.apply(property, value);
    }
    style
}

/// Resolve every node of `dom`. `root_values` are what the document root
/// inherits from.
pub fn compute_styles(dom: &Dom, root_values: &InheritedValues) -> StyleMap {
    let mut styles = StyleMap::with_capacity(dom.len());
    let root = dom.root();

    let mut stack = vec![(root, None::<NodeId>)];
    while let Some((node, parent)) = stack.pop() {
        let matched = collect_matching_rules(dom, node);
        let own = resolve_style(&matched);

        let inherited_from = parent
            .and_then(|p| styles.get(&p))
            .map_or(root_values, |parent_style: &ComputedValues| &parent_style.inherited);
        let computed = own.inherit(inherited_from);
        styles.insert(node, computed);

        stack.extend(dom.children(node).into_iter().rev().map(|child| (child, Some(node))));
    }

    log::debug!("computed styles for {} nodes", styles.len());
    styles
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
