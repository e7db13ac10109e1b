//! # Paint Crate
//!
//! Display list generation from a computed layout tree.
//! Walks the tree in document order and emits `DisplayItem` commands for an
//! external painter: background, border, then the node's own content
//! (text, selection, placeholder, caret), then its children.

use common::{Color, Rect, Size, Vec2};
use dom::Dom;
use editor::TextRange;
use layout::{EditableBox, Font, LayoutKind, LayoutNode, LayoutNodeId, LayoutTree, TextMeasure, style_for};
use style::{ComputedValues, StyleMap};

pub const SELECTION_COLOR: Color = Color::rgba(4, 97, 208, 255);
pub const PLACEHOLDER_COLOR: Color = Color::rgba(255, 255, 255, 100);
pub const CARET_COLOR: Color = Color::WHITE;

// ─────────────────────────────────────────────────────────────────────────────
// DisplayItem
// ─────────────────────────────────────────────────────────────────────────────

/// A single paint command in the display list.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayItem {
    /// Fill a rectangle with a solid color.
    SolidRect { rect: Rect, color: Color },

    /// Outline a rectangle with a line of `width` pixels.
    Border { rect: Rect, width: i32, color: Color },

    /// Draw a run of text with its top-left at `origin`.
    TextRun { origin: Vec2, text: String, color: Color, font: Font },

    /// Highlight selected text.
    Selection { rect: Rect, color: Color },

    /// Hint text of an empty, unfocused input.
    Placeholder { origin: Vec2, text: String, color: Color, font: Font },

    /// Vertical caret line of the focused editor.
    Caret { from: Vec2, to: Vec2, color: Color },
}

/// An ordered list of paint commands.
pub type DisplayList = Vec<DisplayItem>;

// ─────────────────────────────────────────────────────────────────────────────
// Build display list
// ─────────────────────────────────────────────────────────────────────────────

/// Build a display list from a computed layout tree. Focus is read from
/// `dom`; fonts are resolved through `measure`, and text whose font is
/// unknown is skipped.
pub fn build_display_list(
    tree: &LayoutTree,
    dom: &Dom,
    styles: &StyleMap,
    measure: &dyn TextMeasure,
) -> DisplayList {
    let mut painter = Painter { tree, dom, styles, measure, list: DisplayList::new() };
    painter.paint_node(tree.root());
    log::trace!("built display list with {} items", painter.list.len());
    painter.list
}

struct Painter<'a> {
    tree: &'a LayoutTree,
    dom: &'a Dom,
    styles: &'a StyleMap,
    measure: &'a dyn TextMeasure,
    list: DisplayList,
}

impl Painter<'_> {
    fn paint_node(&mut self, id: LayoutNodeId) {
        let Some(node) = self.tree.get(id) else {
            return;
        };
        let style = style_for(self.styles, node.dom_node);
        let rect = node.padding_rect(style);

        let background = style.non_inherited.background_color;
        if !background.is_transparent() {
            self.list.push(DisplayItem::SolidRect { rect, color: background });
        }

        let border_width = style.non_inherited.border_width;
        if border_width > 0 {
            let color = style.non_inherited.border_color;
            self.list.push(DisplayItem::Border { rect, width: border_width, color });
        }

        match &node.kind {
            LayoutKind::Inline(text) => self.paint_inline(node, &text.text(), style),
            LayoutKind::Input(editable) | LayoutKind::Textarea(editable) => {
                self.paint_editable(node, editable, style)
            }
            _ => {}
        }

        for &child in &node.children {
            self.paint_node(child);
        }
    }

    fn font(&self, style: &ComputedValues) -> Option<Font> {
        self.measure.font(style.font_name(), style.font_size())
    }

    /// Text is centered in the padding box unless the node sits in an
    /// `InlineBox`.
    fn paint_inline(&mut self, node: &LayoutNode, text: &str, style: &ComputedValues) {
        if text.is_empty() {
            return;
        }
        let Some(font) = self.font(style) else {
            return;
        };

        let in_inline_box = node
            .parent
            .and_then(|parent| self.tree.get(parent))
            .is_some_and(|parent| parent.is_inline_box());
        let origin = if in_inline_box {
            node.position
        } else {
            let outer = node.size_with_padding(style);
            Vec2::new(
                node.position.x + (outer.width - node.size.width) / 2,
                node.position.y + (outer.height - node.size.height) / 2,
            )
        };

        self.list.push(DisplayItem::TextRun {
            origin,
            text: text.to_owned(),
            color: style.text_color(),
            font,
        });
    }

    fn paint_editable(&mut self, node: &LayoutNode, editable: &EditableBox, style: &ComputedValues) {
        let inner = node.inner_position(style);
        let focused = self.dom.is_focused(node.dom_node);
        let cell = editable.cell;

        if let Some(selection) = editable.engine().selection() {
            for rect in selection_rects(editable, selection, inner, node.size) {
                self.list.push(DisplayItem::Selection { rect, color: SELECTION_COLOR });
            }
        }

        if let Some(font) = self.font(style) {
            if editable.is_empty() {
                if let Some(placeholder) = editable.placeholder.as_ref().filter(|_| !focused) {
                    self.list.push(DisplayItem::Placeholder {
                        origin: inner,
                        text: placeholder.clone(),
                        color: PLACEHOLDER_COLOR,
                        font: font.clone(),
                    });
                }
            } else {
                for (index, line) in editable.visible_lines().into_iter().enumerate() {
                    if line.is_empty() {
                        continue;
                    }
                    self.list.push(DisplayItem::TextRun {
                        origin: Vec2::new(inner.x, inner.y + index as i32 * cell.height),
                        text: line,
                        color: style.text_color(),
                        font: font.clone(),
                    });
                }
            }
        }

        if focused {
            let from = editable.position_to_screen(editable.engine().caret(), inner);
            let to = Vec2::new(from.x, from.y + cell.height);
            self.list.push(DisplayItem::Caret { from, to, color: CARET_COLOR });
        }
    }
}

/// One rectangle per selected line, clipped to the content box.
fn selection_rects(editable: &EditableBox, selection: TextRange, inner: Vec2, content: Size) -> Vec<Rect> {
    let document = editable.engine().document();
    let right_edge = inner.x + content.width;

    (selection.start.line..=selection.end.line)
        .filter_map(|line| {
            let start = if line == selection.start.line { selection.start.column } else { 0 };
            let end = if line == selection.end.line {
                selection.end.column
            } else {
                document.line_len(line)
            };

            let from = editable.position_to_screen(editor::TextPosition::new(line, start), inner);
            let to = editable.position_to_screen(editor::TextPosition::new(line, end), inner);
            let left = from.x.max(inner.x);
            let right = to.x.min(right_edge);
            (right > left).then(|| Rect::new(left, from.y, right - left, editable.cell.height))
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{NodeId, UiState};
    use editor::{KeyCode, MemoryClipboard, Modifiers, TextPosition};
    use layout::{LayoutContext, MonospaceMeasure, build_layout_tree, compute_layout};
    use style::{CursorMode, InheritedValues, compute_styles};

    struct Scene {
        dom: Dom,
        styles: StyleMap,
        tree: LayoutTree,
    }

    impl Scene {
        fn new(dom: Dom) -> Self {
            let values = InheritedValues {
                text_color: Color::BLACK,
                font_name: "sans".into(),
                font_size: 10,
                cursor: CursorMode::None,
            };
            let styles = compute_styles(&dom, &values);
            let mut tree = build_layout_tree(&dom, &styles);
            let ctx = LayoutContext {
                dom: &dom,
                styles: &styles,
                measure: &MonospaceMeasure,
                viewport: Size::new(800, 600),
            };
            compute_layout(&mut tree, &ctx);
            Self { dom, styles, tree }
        }

        fn paint(&self) -> DisplayList {
            build_display_list(&self.tree, &self.dom, &self.styles, &MonospaceMeasure)
        }

        fn editable_mut(&mut self, dom_node: NodeId) -> &mut EditableBox {
            let id = self.tree.find_layout_node(dom_node).unwrap();
            self.tree.get_mut(id).unwrap().editor_mut().unwrap()
        }
    }

    fn dom_with(sheet: &str, build: impl FnOnce(&mut Dom) -> NodeId) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let node = build(&mut dom);
        dom.load_stylesheet(sheet, "test");
        (dom, node)
    }

    fn child(dom: &mut Dom, tag: &str) -> NodeId {
        let node = dom.create_element(tag);
        dom.append_child(dom.root(), node);
        node
    }

    #[test]
    fn empty_document_paints_nothing() {
        let scene = Scene::new(Dom::new());
        assert!(scene.paint().is_empty());
    }

    #[test]
    fn background_and_border() {
        let (dom, _) = dom_with(
            "div { background-color: #ff0000; border-size: 1px; border-color: #000000; }",
            |dom| child(dom, "div"),
        );
        let list = Scene::new(dom).paint();
        let rect = Rect::new(2, 2, 10, 10);
        assert_eq!(
            list,
            vec![
                DisplayItem::SolidRect { rect, color: Color::rgb(255, 0, 0) },
                DisplayItem::Border { rect, width: 1, color: Color::BLACK },
            ]
        );
    }

    #[test]
    fn inline_text_is_centered_in_padding_box() {
        let (dom, _) = dom_with("", |dom| {
            let div = child(dom, "div");
            let text = dom.create_text_fragment("hi");
            dom.append_child(div, text);
            div
        });
        let list = Scene::new(dom).paint();
        // div at (2, 2), inner (7, 7); the inline sits at (9, 9) with 5px padding.
        assert_eq!(
            list,
            vec![DisplayItem::TextRun {
                origin: Vec2::new(14, 14),
                text: "hi".into(),
                color: Color::BLACK,
                font: Font { name: "sans".into(), size: 10 },
            }]
        );
    }

    #[test]
    fn placeholder_only_when_empty_and_unfocused() {
        let (dom, input) = dom_with("", |dom| {
            let input = child(dom, "input");
            dom.set_attribute(input, "placeholder", "name");
            input
        });
        let mut scene = Scene::new(dom);
        assert!(scene.paint().iter().any(|item| matches!(
            item,
            DisplayItem::Placeholder { text, color, .. } if text == "name" && *color == PLACEHOLDER_COLOR
        )));

        scene.dom.set_ui_state(UiState::Focused, Some(input));
        let list = scene.paint();
        assert!(!list.iter().any(|item| matches!(item, DisplayItem::Placeholder { .. })));
        assert!(list.iter().any(|item| matches!(item, DisplayItem::Caret { .. })));
    }

    #[test]
    fn selection_and_caret_of_focused_input() {
        let (dom, input) = dom_with("input { padding-x: 0px; padding-y: 0px; }", |dom| {
            let input = child(dom, "input");
            dom.set_attribute(input, "value", "hello");
            input
        });
        let mut scene = Scene::new(dom);
        scene.dom.set_ui_state(UiState::Focused, Some(input));
        let editable = scene.editable_mut(input);
        let mut clipboard = MemoryClipboard::new();
        editable.engine_mut().set_caret(TextPosition::new(0, 1));
        editable
            .engine_mut()
            .handle_key_down(KeyCode::Right, Modifiers::SHIFT, &mut clipboard);
        editable
            .engine_mut()
            .handle_key_down(KeyCode::Right, Modifiers::SHIFT, &mut clipboard);

        let list = scene.paint();
        // Input at (2, 2), cells of 6 x 12.
        assert!(list.contains(&DisplayItem::Selection {
            rect: Rect::new(8, 2, 12, 12),
            color: SELECTION_COLOR,
        }));
        assert!(list.contains(&DisplayItem::Caret {
            from: Vec2::new(20, 2),
            to: Vec2::new(20, 14),
            color: CARET_COLOR,
        }));
    }

    #[test]
    fn textarea_lines_stack() {
        let (dom, _) = dom_with("textarea { padding-x: 0px; padding-y: 0px; }", |dom| {
            let textarea = child(dom, "textarea");
            dom.set_attribute(textarea, "value", "one\n\nthree");
            textarea
        });
        let texts: Vec<_> = Scene::new(dom)
            .paint()
            .into_iter()
            .filter_map(|item| match item {
                DisplayItem::TextRun { origin, text, .. } => Some((origin, text)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                (Vec2::new(2, 2), "one".to_string()),
                (Vec2::new(2, 26), "three".to_string()),
            ]
        );
    }
}
