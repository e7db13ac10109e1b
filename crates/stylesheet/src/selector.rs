//! Selector chains and their specificity weight.

use core::fmt;

/// Kind of a single selector part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Universal,
    TagName,
    Id,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorPart {
    pub kind: PartKind,
    pub value: String,
}

impl SelectorPart {
    pub fn new(kind: PartKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn weight(&self) -> u32 {
        match self.kind {
            PartKind::Universal => 1,
            PartKind::TagName | PartKind::Class => 10,
            PartKind::Id => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoClass {
    Hover,
    Focus,
}

impl PseudoClass {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hover" => Some(Self::Hover),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    pub const WEIGHT: u32 = 50;
}

/// How a simple selector relates to the one before it in the chain.
///
/// In `a > b c`, `a` has `None`, `b` has `ImmediateChild`, `c` has
/// `Descendant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Relation {
    #[default]
    None,
    Descendant,
    ImmediateChild,
    AdjacentSibling,
}

/// A compound of parts that must all match one element, e.g. `div.title:hover`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SimpleSelector {
    pub parts: Vec<SelectorPart>,
    pub pseudo_class: Option<PseudoClass>,
    pub relation: Relation,
}

impl SimpleSelector {
    pub fn new(parts: Vec<SelectorPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    pub fn with_pseudo_class(mut self, pseudo_class: PseudoClass) -> Self {
        self.pseudo_class = Some(pseudo_class);
        self
    }

    pub fn weight(&self) -> u32 {
        let parts: u32 = self.parts.iter().map(SelectorPart::weight).sum();
        parts + self.pseudo_class.map_or(0, |_| PseudoClass::WEIGHT)
    }
}

/// An ordered chain of simple selectors; the last one is matched against the
/// subject element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Selector {
    pub simple_selectors: Vec<SimpleSelector>,
}

impl Selector {
    pub fn new(simple_selectors: Vec<SimpleSelector>) -> Self {
        Self { simple_selectors }
    }

    pub fn push(&mut self, simple: SimpleSelector) {
        self.simple_selectors.push(simple);
    }

    pub fn is_empty(&self) -> bool {
        self.simple_selectors.is_empty()
    }

    /// Universal 1, tag and class 10, id 100, pseudo class 50.
    pub fn weight(&self) -> u32 {
        self.simple_selectors.iter().map(SimpleSelector::weight).sum()
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            match part.kind {
                PartKind::Universal => f.write_str("*")?,
                PartKind::TagName => f.write_str(&part.value)?,
                PartKind::Id => write!(f, "#{}", part.value)?,
                PartKind::Class => write!(f, ".{}", part.value)?,
            }
        }
        match self.pseudo_class {
            Some(PseudoClass::Hover) => f.write_str(":hover"),
            Some(PseudoClass::Focus) => f.write_str(":focus"),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, simple) in self.simple_selectors.iter().enumerate() {
            if i > 0 {
                match simple.relation {
                    Relation::ImmediateChild => f.write_str(" > ")?,
                    Relation::AdjacentSibling => f.write_str(" + ")?,
                    Relation::Descendant | Relation::None => f.write_str(" ")?,
                }
            }
            write!(f, "{simple}")?;
        }
        Ok(())
    }
}
