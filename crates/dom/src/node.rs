//! DOM node model.
//!
//! All nodes live in an `Arena<Node>` and are referenced by `NodeId`.
//! The tree structure is encoded via parent/child/sibling links stored
//! directly on each node.

use std::collections::BTreeMap;

/// A handle into the arena that identifies a DOM node.
pub type NodeId = arena::Handle;

/// Tag name of the document root.
pub const DOCUMENT_TAG_NAME: &str = "doc";

/// Tag name reported by text fragments.
pub const TEXT_FRAGMENT_TAG_NAME: &str = "#text-fragment";

// ---------------------------------------------------------------------------
// Element data
// ---------------------------------------------------------------------------

/// Data shared by the document root and regular elements.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ElementData {
    pub tag_name: String,
    /// Every attribute except `class`.
    pub attributes: BTreeMap<String, String>,
    /// Split from `class` attributes, in order of appearance.
    pub classes: Vec<String>,
}

impl ElementData {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|c| c == name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }
}

// ---------------------------------------------------------------------------
// Node data (variant per node type)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData {
    Document(ElementData),
    Element(ElementData),
    /// Literal text between tags, already trimmed.
    TextFragment(String),
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// A single node in the DOM tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub data: NodeData,

    // -- tree links ----------------------------------------------------------
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

impl Node {
    /// Create a new detached node.
    pub fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }

    pub fn tag_name(&self) -> &str {
        match &self.data {
            NodeData::Document(e) | NodeData::Element(e) => &e.tag_name,
            NodeData::TextFragment(_) => TEXT_FRAGMENT_TAG_NAME,
        }
    }

    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::TextFragment(_))
    }

    /// Element data of the root or a regular element.
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Document(e) | NodeData::Element(e) => Some(e),
            NodeData::TextFragment(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Document(e) | NodeData::Element(e) => Some(e),
            NodeData::TextFragment(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.data {
            NodeData::TextFragment(t) => Some(t),
            _ => None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|e| e.attribute(name))
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.as_element().is_some_and(|e| e.has_class(name))
    }

    pub fn classes(&self) -> &[String] {
        self.as_element().map_or(&[], |e| e.classes.as_slice())
    }
}
