//! Box-model compute: positions and sizes for a built layout tree.
//!
//! Only the rows direction is implemented. Children are positioned in
//! document order and computed right after being placed; the parent's
//! content size is then aggregated from their margin boxes, treating each
//! run of inline-level siblings as one line.

use common::{Edges, Rect, Size, Vec2};
use dom::{Dom, NodeId};
use style::{ComputedValues, LayoutDirection, Length, StyleMap};

use crate::measure::TextMeasure;
use crate::tree::{LayoutKind, LayoutNodeId, LayoutTree};

const DEFAULT_INPUT_COLUMNS: i32 = 6;
const DEFAULT_TEXTAREA_COLUMNS: i32 = 80;
const DEFAULT_TEXTAREA_ROWS: i32 = 6;

/// Everything layout reads besides the tree itself.
pub struct LayoutContext<'a> {
    pub dom: &'a Dom,
    pub styles: &'a StyleMap,
    pub measure: &'a dyn TextMeasure,
    /// Percentage base of the top-level nodes.
    pub viewport: Size,
}

impl<'a> LayoutContext<'a> {
    pub fn style(&self, node: NodeId) -> &'a ComputedValues {
        crate::style_for(self.styles, node)
    }
}

/// Lay out the whole tree from the origin.
pub fn compute_layout(tree: &mut LayoutTree, ctx: &LayoutContext<'_>) {
    let root = tree.root();
    if let Some(node) = tree.get_mut(root) {
        node.position = Vec2::ZERO;
    }
    compute_node(tree, ctx, root, ctx.viewport);

    if let Some(node) = tree.get(root) {
        log::debug!("computed layout of {} nodes, document size {}", tree.len(), node.size);
    }
}

/// Compute the size of `id` and the geometry of its subtree. The node must
/// already be positioned. `base` is the parent's content size.
pub fn compute_node(tree: &mut LayoutTree, ctx: &LayoutContext<'_>, id: LayoutNodeId, base: Size) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let style = ctx.style(node.dom_node);

    let size = match &node.kind {
        LayoutKind::DocumentWidget => compute_rows(tree, ctx, id, Vec2::ZERO, base),
        LayoutKind::InlineBox => {
            let inner = node.inner_position(style);
            compute_rows(tree, ctx, id, inner, base)
        }
        LayoutKind::Box => {
            let inner = node.inner_position(style);
            let own_base = Size::new(
                explicit_or(style.non_inherited.width, base.width),
                explicit_or(style.non_inherited.height, base.height),
            );
            let content = match style.layout() {
                LayoutDirection::Rows => compute_rows(tree, ctx, id, inner, own_base),
                LayoutDirection::Columns => {
                    log::trace!("columns layout is not implemented, leaving node {} as is", node.id);
                    node.size
                }
            };
            constrain(content, style, base)
        }
        LayoutKind::Inline(text) => {
            ctx.measure.measure(&text.text(), style.font_name(), style.font_size())
        }
        LayoutKind::Input(_) | LayoutKind::Textarea(_) => {
            compute_editable(tree, ctx, id, style);
            return;
        }
    };

    if let Some(node) = tree.get_mut(id) {
        node.size = size;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rows
// ─────────────────────────────────────────────────────────────────────────────

/// Position and compute the children of `id` as rows starting at `inner`,
/// returning the aggregated content size.
fn compute_rows(
    tree: &mut LayoutTree,
    ctx: &LayoutContext<'_>,
    id: LayoutNodeId,
    inner: Vec2,
    base: Size,
) -> Size {
    let children = tree.children(id).to_vec();

    // Padding box, margins and inline-level flag of the previous child.
    let mut previous: Option<(Rect, Edges<i32>, bool)> = None;
    for &child in &children {
        let Some(node) = tree.get(child) else {
            continue;
        };
        let style = ctx.style(node.dom_node);
        let margin = style.margin();
        let inline_level = node.is_inline_level();

        let position = match previous {
            Some((rect, prev_margin, true)) if inline_level => {
                Vec2::new(rect.right() + prev_margin.right + margin.left, rect.y)
            }
            Some((rect, prev_margin, _)) => {
                Vec2::new(inner.x + margin.left, rect.bottom() + prev_margin.bottom + margin.top)
            }
            None => Vec2::new(inner.x + margin.left, inner.y + margin.top),
        };
        if let Some(node) = tree.get_mut(child) {
            node.position = position;
        }

        compute_node(tree, ctx, child, base);
        previous = tree
            .get(child)
            .map(|node| (node.padding_rect(style), margin, inline_level));
    }

    aggregate_rows(tree, ctx, &children)
}

#[derive(Default)]
struct LineRun {
    width: i32,
    height: i32,
    bottom_margin: i32,
}

impl LineRun {
    fn flush_into(self, width: &mut i32, height: &mut i32) {
        *height += self.height + self.bottom_margin;
        *width = (*width).max(self.width);
    }
}

fn aggregate_rows(tree: &LayoutTree, ctx: &LayoutContext<'_>, children: &[LayoutNodeId]) -> Size {
    let mut width = 0;
    let mut height = 0;
    let mut run: Option<LineRun> = None;

    for &child in children {
        let Some(node) = tree.get(child) else {
            continue;
        };
        let style = ctx.style(node.dom_node);
        let margin = style.margin();
        let outer = node.size_with_padding(style);

        if node.is_inline_level() {
            let line = run.get_or_insert_with(LineRun::default);
            line.width += margin.left + outer.width + margin.right;
            line.height = line.height.max(outer.height);
            line.bottom_margin = line.bottom_margin.max(margin.bottom);
        } else {
            if let Some(line) = run.take() {
                line.flush_into(&mut width, &mut height);
            }
            height += margin.top + outer.height + margin.bottom;
            width = width.max(margin.left + outer.width + margin.right);
        }
    }
    if let Some(line) = run.take() {
        line.flush_into(&mut width, &mut height);
    }

    Size::new(width, height)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sizing helpers
// ─────────────────────────────────────────────────────────────────────────────

fn explicit_or(length: Length, fallback: i32) -> i32 {
    if length.is_zero() { fallback } else { length.resolve(fallback) }
}

/// Apply explicit `width`/`height`, then `max-*` and `min-*`.
fn constrain(content: Size, style: &ComputedValues, base: Size) -> Size {
    let n = &style.non_inherited;
    Size::new(
        constrain_axis(content.width, n.width, n.min_width, n.max_width, base.width),
        constrain_axis(content.height, n.height, n.min_height, n.max_height, base.height),
    )
}

fn constrain_axis(content: i32, explicit: Length, min: Length, max: Length, base: i32) -> i32 {
    let mut value = if explicit.is_zero() { content } else { explicit.resolve(base) };
    if !max.is_zero() {
        value = value.min(max.resolve(base));
    }
    if !min.is_zero() {
        value = value.max(min.resolve(base));
    }
    value
}

/// Size an `Input` or `Textarea` as a grid of `)` cells.
fn compute_editable(tree: &mut LayoutTree, ctx: &LayoutContext<'_>, id: LayoutNodeId, style: &ComputedValues) {
    let Some(node) = tree.get_mut(id) else {
        return;
    };
    let dom_node = node.dom_node;
    let cell = ctx.measure.measure(")", style.font_name(), style.font_size());

    let (columns, rows) = match node.kind {
        LayoutKind::Input(_) => (grid_attribute(ctx.dom, dom_node, "size", DEFAULT_INPUT_COLUMNS), 1),
        _ => (
            grid_attribute(ctx.dom, dom_node, "cols", DEFAULT_TEXTAREA_COLUMNS),
            grid_attribute(ctx.dom, dom_node, "rows", DEFAULT_TEXTAREA_ROWS),
        ),
    };

    node.size = Size::new(cell.width * columns, cell.height * rows);
    if let Some(editable) = node.editor_mut() {
        editable.cell = cell;
        editable.columns = columns;
        editable.rows = rows;
        editable.follow_caret();
    }
}

fn grid_attribute(dom: &Dom, node: NodeId, name: &str, default: i32) -> i32 {
    dom.attribute(node, name)
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|&value| value > 0)
        .unwrap_or(default)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
