//! # Layout Engine
//!
//! Builds a layout tree from the DOM and its computed styles, then computes
//! positions and sizes with the rows layout. Text extents come from a
//! [`TextMeasure`] provider.

use std::sync::LazyLock;

use dom::NodeId;
use style::{ComputedValues, StyleMap};

pub mod build;
pub mod compute;
pub mod dump;
pub mod editable;
pub mod measure;
pub mod tree;

pub use build::build_layout_tree;
pub use compute::{LayoutContext, compute_layout, compute_node};
pub use dump::dump_layout_tree;
pub use editable::{EditTracker, EditableBox};
pub use measure::{Font, MonospaceMeasure, TextMeasure};
pub use tree::{InlineText, LayoutKind, LayoutNode, LayoutNodeId, LayoutTree};

static FALLBACK_STYLE: LazyLock<ComputedValues> = LazyLock::new(ComputedValues::default);

/// The computed style of `node`, or the defaults for a node the cascade has
/// not seen.
pub fn style_for(styles: &StyleMap, node: NodeId) -> &ComputedValues {
    styles.get(&node).unwrap_or(&FALLBACK_STYLE)
}
