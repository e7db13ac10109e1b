//! Rules: alternative selectors plus the properties they set.

use std::collections::BTreeMap;

use crate::selector::Selector;
use crate::value::StylesheetValue;

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

macro_rules! properties {
    ($($variant:ident => $kebab:literal, $camel:literal;)*) => {
        /// Standardized properties. Anything else lands in the custom map.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Property {
            $($variant,)*
        }

        impl Property {
            pub const ALL: &'static [Property] = &[$(Property::$variant,)*];

            /// Accepts the kebab-case name and its camelCase alias.
            #[allow(unreachable_patterns)]
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($kebab | $camel => Some(Self::$variant),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $kebab,)*
                }
            }
        }
    };
}

properties! {
    Display => "display", "display";
    Cursor => "cursor", "cursor";
    BackgroundColor => "background-color", "backgroundColor";
    TextColor => "text-color", "textColor";
    FontName => "font-name", "fontName";
    FontSize => "font-size", "fontSize";
    BorderColor => "border-color", "borderColor";
    BorderSize => "border-size", "borderSize";
    TextAlign => "text-align", "textAlign";
    Layout => "layout", "layout";
    MarginTop => "margin-top", "marginTop";
    MarginBottom => "margin-bottom", "marginBottom";
    MarginLeft => "margin-left", "marginLeft";
    MarginRight => "margin-right", "marginRight";
    PaddingX => "padding-x", "paddingX";
    PaddingY => "padding-y", "paddingY";
    Width => "width", "width";
    Height => "height", "height";
    MaxWidth => "max-width", "maxWidth";
    MaxHeight => "max-height", "maxHeight";
    MinWidth => "min-width", "minWidth";
    MinHeight => "min-height", "minHeight";
}

// ---------------------------------------------------------------------------
// Declaration
// ---------------------------------------------------------------------------

/// A rule body and the selectors it applies to.
///
/// The selectors are alternatives: the declaration matches an element when
/// any one of them does.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Declaration {
    pub selectors: Vec<Selector>,
    properties: BTreeMap<Property, StylesheetValue>,
    custom_properties: BTreeMap<String, StylesheetValue>,
}

impl Declaration {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self {
            selectors,
            ..Self::default()
        }
    }

    /// Sum of the weights of every alternative selector, not only the one
    /// that matched.
    pub fn weight(&self) -> u32 {
        self.selectors.iter().map(Selector::weight).sum()
    }

    pub fn properties(&self) -> impl Iterator<Item = (Property, &StylesheetValue)> {
        self.properties.iter().map(|(p, v)| (*p, v))
    }

    pub fn custom_properties(&self) -> impl Iterator<Item = (&str, &StylesheetValue)> {
        self.custom_properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn property(&self, property: Property) -> Option<&StylesheetValue> {
        self.properties.get(&property)
    }

    pub fn custom_property(&self, name: &str) -> Option<&StylesheetValue> {
        self.custom_properties.get(name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        match Property::from_name(name) {
            Some(p) => self.properties.contains_key(&p),
            None => self.custom_properties.contains_key(name),
        }
    }

    pub fn set(&mut self, property: Property, value: StylesheetValue) {
        self.properties.insert(property, value);
    }

    /// Set by name, routing unknown names to the custom map.
    pub fn set_property(&mut self, name: &str, value: StylesheetValue) {
        match Property::from_name(name) {
            Some(p) => self.set(p, value),
            None => {
                self.custom_properties.insert(name.to_string(), value);
            }
        }
    }

    pub fn unset_property(&mut self, name: &str) {
        match Property::from_name(name) {
            Some(p) => {
                self.properties.remove(&p);
            }
            None => {
                self.custom_properties.remove(name);
            }
        }
    }

    /// Copy every property of `other` over this one.
    pub fn merge_from(&mut self, other: &Declaration) {
        for (p, v) in &other.properties {
            self.properties.insert(*p, v.clone());
        }
        for (k, v) in &other.custom_properties {
            self.custom_properties.insert(k.clone(), v.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.custom_properties.is_empty()
    }
}
