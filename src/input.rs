//! Input processing: hit testing and routing of pointer and keyboard
//! events into the document widget.
//!
//! Pointer events update the hover and focus holders and mark the affected
//! layout nodes dirty; keyboard and text events go to the focused editor.
//! Every handler returns whether the event was consumed.

use common::Vec2;
use dom::{NodeId, UiState};
use editor::{KeyCode, Modifiers};
use layout::{EditableBox, LayoutNodeId};

use crate::document::DocumentWidget;

// ─────────────────────────────────────────────────────────────────────────────
// InputEvent
// ─────────────────────────────────────────────────────────────────────────────

/// A windowing-layer event, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MouseMove(Vec2),
    LeftMouseDown(Vec2),
    LeftMouseUp(Vec2),
    KeyDown(KeyCode, Modifiers),
    KeyUp(KeyCode, Modifiers),
    /// A typed code point.
    Text(char),
}

// ─────────────────────────────────────────────────────────────────────────────
// HitTestResult
// ─────────────────────────────────────────────────────────────────────────────

/// The deepest layout node whose padding box contains a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTestResult {
    pub layout_node: LayoutNodeId,
    pub dom_node: NodeId,
}

impl DocumentWidget {
    pub fn hit_test(&self, point: Vec2) -> Option<HitTestResult> {
        let tree = self.layout.as_ref()?;
        let layout_node = tree.hit_test(&self.styles, point)?;
        let dom_node = tree.get(layout_node)?.dom_node;
        Some(HitTestResult { layout_node, dom_node })
    }

    pub fn dispatch(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::MouseMove(point) => self.on_mouse_move(point),
            InputEvent::LeftMouseDown(point) => self.on_left_mouse_down(point),
            InputEvent::LeftMouseUp(point) => self.on_left_mouse_up(point),
            InputEvent::KeyDown(key, modifiers) => self.on_key_down(key, modifiers),
            InputEvent::KeyUp(key, modifiers) => self.on_key_up(key, modifiers),
            InputEvent::Text(c) => self.on_input(c),
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pointer
    // ─────────────────────────────────────────────────────────────────────

    /// Move the hover holder to the node under `point`.
    pub fn on_mouse_move(&mut self, point: Vec2) -> bool {
        let hit = self.hit_test(point).map(|hit| hit.dom_node);
        self.set_ui_state(UiState::Hovered, hit);
        hit.is_some()
    }

    pub fn on_left_mouse_down(&mut self, point: Vec2) -> bool {
        self.pressed = self.hit_test(point).map(|hit| hit.dom_node);
        self.pressed.is_some()
    }

    /// Focus the node under `point`; a click into an editor also moves its
    /// caret to the clicked cell.
    pub fn on_left_mouse_up(&mut self, point: Vec2) -> bool {
        self.pressed = None;
        let Some(hit) = self.hit_test(point) else {
            return false;
        };
        self.set_ui_state(UiState::Focused, Some(hit.dom_node));

        let style = layout::style_for(&self.styles, hit.dom_node);
        if let Some(node) = self.layout.as_mut().and_then(|tree| tree.get_mut(hit.layout_node)) {
            let inner = node.inner_position(style);
            if let Some(editable) = node.editor_mut() {
                let position = editable.screen_to_position(point, inner);
                editable.engine_mut().set_caret(position);
            }
        }
        true
    }

    /// Give focus to `node` directly, as a click on it would.
    pub fn focus(&mut self, node: Option<NodeId>) {
        self.set_ui_state(UiState::Focused, node);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Keyboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn on_key_down(&mut self, key: KeyCode, modifiers: Modifiers) -> bool {
        let consumed = match focused_editor(&mut self.layout, &self.dom) {
            Some((_, editable)) => editable
                .engine_mut()
                .handle_key_down(key, modifiers, self.clipboard.as_mut()),
            None => false,
        };
        self.after_edit(consumed);
        consumed
    }

    pub fn on_key_up(&mut self, key: KeyCode, modifiers: Modifiers) -> bool {
        match focused_editor(&mut self.layout, &self.dom) {
            Some((_, editable)) => editable.engine_mut().handle_key_up(key, modifiers),
            None => false,
        }
    }

    pub fn on_input(&mut self, c: char) -> bool {
        let consumed = match focused_editor(&mut self.layout, &self.dom) {
            Some((_, editable)) => editable.engine_mut().handle_input(c),
            None => false,
        };
        self.after_edit(consumed);
        consumed
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────

    /// Write a changed editor's text back into the DOM `value` attribute so
    /// a rebuild keeps it, and queue the node for the next tick.
    fn after_edit(&mut self, consumed: bool) {
        if !consumed {
            return;
        }
        let Some((id, editable)) = focused_editor(&mut self.layout, &self.dom) else {
            return;
        };
        let changed = editable.take_changed();
        let text = editable.text();

        if changed {
            if let Some(node) = self.focused() {
                self.dom.set_attribute(node, "value", &text);
            }
        }
        self.mark_dirty(id);
    }

    /// Move `state` to `node`, marking the layout nodes of the previous and
    /// the new holder dirty.
    fn set_ui_state(&mut self, state: UiState, node: Option<NodeId>) {
        let previous = self.dom.ui_state_holder(state);
        if previous == node {
            return;
        }
        self.dom.set_ui_state(state, node);

        for dom_node in [previous, node].into_iter().flatten() {
            if let Ok(id) = self.layout_node_for(dom_node) {
                self.mark_dirty(id);
            }
        }
    }
}

/// The editor of the focused node, with its layout node.
fn focused_editor<'a>(
    layout: &'a mut Option<layout::LayoutTree>,
    dom: &dom::Dom,
) -> Option<(LayoutNodeId, &'a mut EditableBox)> {
    let focused = dom.ui_state_holder(UiState::Focused)?;
    let tree = layout.as_mut()?;
    let id = tree.find_layout_node(focused)?;
    let editable = tree.get_mut(id)?.editor_mut()?;
    Some((id, editable))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use style::CursorMode;

    fn widget(markup: &str, sheet: &str) -> DocumentWidget {
        let mut widget = DocumentWidget::new(EngineConfig::default().with_font("sans", 10));
        widget.parse(markup);
        widget.load_stylesheet(sheet, "author");
        widget.refresh();
        widget
    }

    fn center(widget: &DocumentWidget, id: &str) -> Vec2 {
        let node = widget.dom().element_by_id(id).unwrap();
        let rect = widget.layout_rect(node).unwrap();
        Vec2::new(rect.x + rect.w / 2, rect.y + rect.h / 2)
    }

    #[test]
    fn hover_marks_dirty_and_sets_cursor() {
        let mut widget = widget(
            "<doc><panel id=\"a\"/><panel id=\"b\"/></doc>",
            "panel:hover { cursor: hand; }",
        );
        let a = widget.dom().element_by_id("a").unwrap();
        let b = widget.dom().element_by_id("b").unwrap();

        assert!(widget.on_mouse_move(center(&widget, "a")));
        assert_eq!(widget.hovered(), Some(a));
        assert_eq!(widget.dirty_nodes().len(), 1);
        assert_eq!(widget.tick(), CursorMode::Hand);
        assert!(widget.dirty_nodes().is_empty());

        widget.on_mouse_move(center(&widget, "b"));
        assert_eq!(widget.hovered(), Some(b));
        assert_eq!(widget.dirty_nodes().len(), 2);
        widget.tick();

        // Same holder again: nothing to flush.
        widget.on_mouse_move(center(&widget, "b"));
        assert!(widget.dirty_nodes().is_empty());
    }

    #[test]
    fn no_hover_means_default_cursor() {
        let mut widget = widget("<doc><panel/></doc>", "");
        assert!(!widget.on_mouse_move(Vec2::new(5000, 5000)));
        assert_eq!(widget.hovered(), None);
        assert_eq!(widget.tick(), CursorMode::None);
    }

    #[test]
    fn click_focuses_deepest_node() {
        let mut widget = widget("<doc><panel id=\"outer\"><panel id=\"inner\"/></panel></doc>", "");
        let inner = widget.dom().element_by_id("inner").unwrap();
        let point = center(&widget, "inner");
        assert!(widget.on_left_mouse_down(point));
        assert!(widget.on_left_mouse_up(point));
        assert_eq!(widget.focused(), Some(inner));
    }

    #[test]
    fn typing_into_focused_input_updates_value() {
        let mut widget = widget(
            "<doc><input id=\"name\" value=\"ab\"/></doc>",
            "input { padding-x: 0px; padding-y: 0px; }",
        );
        let input = widget.dom().element_by_id("name").unwrap();

        // Input at (2, 2) with 6px cells: click right of the last cell.
        let point = Vec2::new(2 + 6 * 5, 4);
        assert!(widget.on_left_mouse_up(point));
        assert!(widget.on_input('c'));
        assert_eq!(widget.dom().attribute(input, "value"), Some("abc"));
        assert_eq!(widget.editor_text(input).unwrap().as_deref(), Some("abc"));

        assert!(widget.on_key_down(KeyCode::Backspace, Modifiers::empty()));
        assert_eq!(widget.dom().attribute(input, "value"), Some("ab"));
        assert!(!widget.on_key_up(KeyCode::Backspace, Modifiers::empty()));
    }

    #[test]
    fn click_places_caret_in_textarea() {
        let mut widget = widget(
            "<doc><textarea id=\"t\" value=\"one\"/></doc>",
            "textarea { padding-x: 0px; padding-y: 0px; }",
        );
        let textarea = widget.dom().element_by_id("t").unwrap();
        widget.on_left_mouse_up(Vec2::new(2 + 6, 2 + 1));
        widget.on_input('X');
        assert_eq!(widget.editor_text(textarea).unwrap().as_deref(), Some("oXne"));
    }

    #[test]
    fn keys_without_focus_are_not_consumed() {
        let mut widget = widget("<doc><input/></doc>", "");
        assert!(!widget.on_key_down(KeyCode::Left, Modifiers::empty()));
        assert!(!widget.on_input('a'));
    }

    #[test]
    fn clipboard_round_trip_between_inputs() {
        let mut widget = widget(
            "<doc><input id=\"from\" value=\"copy me\"/><input id=\"to\"/></doc>",
            "",
        );
        let from = widget.dom().element_by_id("from").unwrap();
        let to = widget.dom().element_by_id("to").unwrap();

        widget.focus(Some(from));
        assert!(widget.dispatch(InputEvent::KeyDown(KeyCode::Char('a'), Modifiers::CTRL)));
        assert!(widget.dispatch(InputEvent::KeyDown(KeyCode::Char('c'), Modifiers::CTRL)));
        assert_eq!(widget.clipboard().get_text(), "copy me");

        widget.focus(Some(to));
        assert!(widget.dispatch(InputEvent::KeyDown(KeyCode::Char('v'), Modifiers::CTRL)));
        assert_eq!(widget.dom().attribute(to, "value"), Some("copy me"));
    }
}
