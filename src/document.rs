//! The document widget: owns a DOM, its styles and its layout tree, and
//! runs the pipeline: parse → style → layout construct/compute → paint.

use common::{Diagnostic, Rect};
use dom::{Dom, NodeId, UiState};
use editor::{Clipboard, MemoryClipboard};
use layout::{LayoutContext, LayoutNodeId, LayoutTree, MonospaceMeasure, TextMeasure};
use paint::DisplayList;
use style::{CursorMode, StyleMap};

use crate::config::{EngineConfig, USER_AGENT_SOURCE};
use crate::error::EngineError;

/// The root of an interactive document.
///
/// Style and layout are recomputed only when asked to, or on [`tick`]
/// when a hover or focus change marked nodes dirty.
///
/// [`tick`]: DocumentWidget::tick
pub struct DocumentWidget {
    pub(crate) config: EngineConfig,
    pub(crate) measure: Box<dyn TextMeasure>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) dom: Dom,
    pub(crate) styles: StyleMap,
    pub(crate) layout: Option<LayoutTree>,
    pub(crate) dirty: Vec<LayoutNodeId>,
    /// DOM node under the left button while it is held.
    pub(crate) pressed: Option<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for DocumentWidget {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl DocumentWidget {
    /// An empty document measured with [`MonospaceMeasure`] and using an
    /// in-memory clipboard.
    pub fn new(config: EngineConfig) -> Self {
        let mut widget = Self {
            config,
            measure: Box::new(MonospaceMeasure),
            clipboard: Box::new(MemoryClipboard::new()),
            dom: Dom::new(),
            styles: StyleMap::new(),
            layout: None,
            dirty: Vec::new(),
            pressed: None,
            diagnostics: Vec::new(),
        };
        widget.load_user_agent_stylesheet();
        widget
    }

    pub fn with_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Parse, style, construct and compute in one go.
    pub fn from_markup(config: EngineConfig, markup: &str) -> Self {
        let mut widget = Self::new(config);
        widget.parse(markup);
        widget.refresh();
        widget
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the document with `markup`. Author stylesheets are dropped,
    /// the user agent sheet is reloaded and the layout tree is discarded.
    /// Returns the markup diagnostics.
    pub fn parse(&mut self, markup: &str) -> Vec<Diagnostic> {
        let output = markup::parse(markup);
        log::debug!("parsed document with {} nodes", output.dom.len());

        self.dom = output.dom;
        self.styles.clear();
        self.layout = None;
        self.dirty.clear();
        self.pressed = None;
        self.load_user_agent_stylesheet();

        self.diagnostics.extend(output.diagnostics.iter().cloned());
        output.diagnostics
    }

    /// Append an author stylesheet. Styles are not recomputed.
    pub fn load_stylesheet(&mut self, text: &str, source: &str) -> Vec<Diagnostic> {
        let diagnostics = self.dom.load_stylesheet(text, source);
        self.diagnostics.extend(diagnostics.iter().cloned());
        diagnostics
    }

    /// Replace the sheet loaded under `source`, or load it when there is none.
    pub fn reload_stylesheet(&mut self, text: &str, source: &str) -> Vec<Diagnostic> {
        match self.dom.reload_stylesheet(text, source) {
            Some(diagnostics) => {
                self.diagnostics.extend(diagnostics.iter().cloned());
                diagnostics
            }
            None => self.load_stylesheet(text, source),
        }
    }

    pub fn compute_styles(&mut self) {
        self.styles = style::compute_styles(&self.dom, &self.config.root_values());
    }

    /// Rebuild the layout tree from scratch.
    pub fn construct_layout_tree(&mut self) {
        self.clear_layout_tree();
        let mut tree = layout::build_layout_tree(&self.dom, &self.styles);

        let tab_width = self.config.tab_width;
        for id in tree.pre_order() {
            if let Some(editable) = tree.get_mut(id).and_then(|node| node.editor_mut()) {
                editable.engine_mut().set_tab_width(tab_width);
            }
        }
        self.layout = Some(tree);
    }

    /// Delete every layout node.
    pub fn clear_layout_tree(&mut self) {
        if let Some(tree) = self.layout.as_mut() {
            tree.clear();
        }
        self.layout = None;
        self.dirty.clear();
    }

    /// Recompute positions and sizes of the current layout tree.
    pub fn compute(&mut self) -> Result<(), EngineError> {
        let tree = self.layout.as_mut().ok_or(EngineError::NoLayoutTree)?;
        let ctx = LayoutContext {
            dom: &self.dom,
            styles: &self.styles,
            measure: self.measure.as_ref(),
            viewport: self.config.viewport,
        };
        layout::compute_layout(tree, &ctx);
        Ok(())
    }

    /// Styles, layout construction and compute.
    pub fn refresh(&mut self) {
        self.compute_styles();
        self.construct_layout_tree();
        if let Err(err) = self.compute() {
            log::warn!("refresh could not compute layout: {err}");
        }
    }

    /// Flush the dirty list: restyle and recompute once if anything changed
    /// since the last tick. Returns the cursor the hovered node asks for.
    pub fn tick(&mut self) -> CursorMode {
        if !self.dirty.is_empty() {
            log::trace!("flushing {} dirty layout nodes", self.dirty.len());
            self.compute_styles();
            if let Err(err) = self.compute() {
                log::trace!("dirty nodes not recomputed: {err}");
            }
            self.dirty.clear();
        }

        self.dom
            .ui_state_holder(UiState::Hovered)
            .map(|node| layout::style_for(&self.styles, node).cursor())
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    /// Changes through this reference take effect after
    /// [`compute_styles`](Self::compute_styles) and [`compute`](Self::compute).
    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn styles(&self) -> &StyleMap {
        &self.styles
    }

    pub fn layout_tree(&self) -> Option<&LayoutTree> {
        self.layout.as_ref()
    }

    /// Every diagnostic recorded since the widget was created.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clipboard(&self) -> &dyn Clipboard {
        self.clipboard.as_ref()
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.dom.ui_state_holder(UiState::Hovered)
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.dom.ui_state_holder(UiState::Focused)
    }

    /// Layout nodes waiting for the next [`tick`](Self::tick).
    pub fn dirty_nodes(&self) -> &[LayoutNodeId] {
        &self.dirty
    }

    pub fn mark_dirty(&mut self, id: LayoutNodeId) {
        if !self.dirty.contains(&id) {
            self.dirty.push(id);
        }
    }

    /// The layout node created for `dom_node`.
    pub fn layout_node_for(&self, dom_node: NodeId) -> Result<LayoutNodeId, EngineError> {
        let tree = self.layout.as_ref().ok_or(EngineError::NoLayoutTree)?;
        if self.dom.get(dom_node).is_none() {
            return Err(EngineError::StaleNode);
        }
        tree.find_layout_node(dom_node).ok_or(EngineError::StaleNode)
    }

    /// Padding box of the layout node created for `dom_node`.
    pub fn layout_rect(&self, dom_node: NodeId) -> Result<Rect, EngineError> {
        let id = self.layout_node_for(dom_node)?;
        let tree = self.layout.as_ref().ok_or(EngineError::NoLayoutTree)?;
        let node = tree.get(id).ok_or(EngineError::StaleNode)?;
        Ok(node.padding_rect(layout::style_for(&self.styles, dom_node)))
    }

    /// Text of the editor created for `dom_node`, `None` for other nodes.
    pub fn editor_text(&self, dom_node: NodeId) -> Result<Option<String>, EngineError> {
        let id = self.layout_node_for(dom_node)?;
        let tree = self.layout.as_ref().ok_or(EngineError::NoLayoutTree)?;
        Ok(tree.get(id).and_then(|node| node.editor()).map(|editable| editable.text()))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Output
    // ─────────────────────────────────────────────────────────────────────

    /// Indented text rendering of the layout tree.
    pub fn dump(&self) -> Result<String, EngineError> {
        let tree = self.layout.as_ref().ok_or(EngineError::NoLayoutTree)?;
        Ok(layout::dump_layout_tree(tree, &self.dom, &self.styles))
    }

    pub fn display_list(&self) -> Result<DisplayList, EngineError> {
        let tree = self.layout.as_ref().ok_or(EngineError::NoLayoutTree)?;
        Ok(paint::build_display_list(tree, &self.dom, &self.styles, self.measure.as_ref()))
    }

    fn load_user_agent_stylesheet(&mut self) {
        if let Some(sheet) = self.config.user_agent_stylesheet.clone() {
            let diagnostics = self.dom.load_stylesheet(&sheet, USER_AGENT_SOURCE);
            self.diagnostics.extend(diagnostics);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
