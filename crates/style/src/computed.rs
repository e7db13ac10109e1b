//! Computed style values: the final resolved properties for a node.
//!
//! Values are split into the group children inherit from their parent
//! (text color, font, cursor) and the group they do not.

use common::{Color, Edges};
use stylesheet::{Property, SizeUnit, StylesheetValue};

// ─────────────────────────────────────────────────────────────────────────────
// Keyword enums
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

impl Display {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "block" => Some(Self::Block),
            "inline" => Some(Self::Inline),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    #[inline]
    pub fn is_inline(self) -> bool {
        self == Self::Inline
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "left" => Some(Self::Left),
            "center" => Some(Self::Center),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// How a box stacks its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    Rows,
    Columns,
}

impl LayoutDirection {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "rows" => Some(Self::Rows),
            "columns" => Some(Self::Columns),
            _ => None,
        }
    }
}

/// Pointer shape requested while hovering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    None,
    Input,
    Hand,
}

impl CursorMode {
    /// Unknown keywords fall back to `None`.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "input" => Self::Input,
            "hand" => Self::Hand,
            _ => Self::None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Length
// ─────────────────────────────────────────────────────────────────────────────

/// A size constraint. Zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Px(i32),
    Percent(i32),
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0)
    }
}

impl Length {
    pub fn is_zero(self) -> bool {
        matches!(self, Length::Px(0) | Length::Percent(0))
    }

    /// Resolve against the parent's content extent.
    pub fn resolve(self, base: i32) -> i32 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => base * pct / 100,
        }
    }

    fn from_value(value: &StylesheetValue) -> Option<Self> {
        match value.as_size()? {
            (scalar, SizeUnit::Pixels) => Some(Length::Px(scalar)),
            (scalar, SizeUnit::Percentage) => Some(Length::Percent(scalar)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Value groups
// ─────────────────────────────────────────────────────────────────────────────

/// Values a child takes from its parent unless it sets them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedValues {
    pub text_color: Color,
    pub font_name: String,
    pub font_size: i32,
    pub cursor: CursorMode,
}

impl Default for InheritedValues {
    fn default() -> Self {
        Self {
            text_color: Color::WHITE,
            font_name: String::new(),
            font_size: 0,
            cursor: CursorMode::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonInheritedValues {
    pub display: Display,
    pub layout: LayoutDirection,
    pub margin: Edges<i32>,
    pub padding_x: i32,
    pub padding_y: i32,
    pub border_width: i32,
    pub border_color: Color,
    pub background_color: Color,
    pub text_align: TextAlign,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
}

impl Default for NonInheritedValues {
    fn default() -> Self {
        Self {
            display: Display::Block,
            layout: LayoutDirection::Rows,
            margin: Edges::all(2),
            padding_x: 5,
            padding_y: 5,
            border_width: 0,
            border_color: Color::TRANSPARENT,
            background_color: Color::TRANSPARENT,
            text_align: TextAlign::Center,
            width: Length::default(),
            height: Length::default(),
            min_width: Length::default(),
            min_height: Length::default(),
            max_width: Length::default(),
            max_height: Length::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ComputedValues
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved, read-only style of one node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComputedValues {
    pub inherited: InheritedValues,
    pub non_inherited: NonInheritedValues,
}

impl ComputedValues {
    #[inline]
    pub fn display(&self) -> Display {
        self.non_inherited.display
    }

    #[inline]
    pub fn layout(&self) -> LayoutDirection {
        self.non_inherited.layout
    }

    #[inline]
    pub fn margin(&self) -> Edges<i32> {
        self.non_inherited.margin
    }

    /// `padding-x` on the left and right, `padding-y` on top and bottom.
    pub fn padding(&self) -> Edges<i32> {
        let n = &self.non_inherited;
        Edges {
            top: n.padding_y,
            right: n.padding_x,
            bottom: n.padding_y,
            left: n.padding_x,
        }
    }

    #[inline]
    pub fn text_color(&self) -> Color {
        self.inherited.text_color
    }

    #[inline]
    pub fn font_name(&self) -> &str {
        &self.inherited.font_name
    }

    #[inline]
    pub fn font_size(&self) -> i32 {
        self.inherited.font_size
    }

    #[inline]
    pub fn cursor(&self) -> CursorMode {
        self.inherited.cursor
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// MutableComputedValues
// ─────────────────────────────────────────────────────────────────────────────

/// Builder used by the cascade. An inheritable field left at `None` is taken
/// from the parent when the values are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MutableComputedValues {
    pub text_color: Option<Color>,
    pub font_name: Option<String>,
    pub font_size: Option<i32>,
    pub cursor: CursorMode,
    pub non_inherited: NonInheritedValues,
}

impl MutableComputedValues {
    /// Apply one declared property. Values of the wrong shape and unknown
    /// keywords are ignored.
    pub fn apply(&mut self, property: Property, value: &StylesheetValue) {
        let n = &mut self.non_inherited;
        let px = || match value.as_size() {
            Some((scalar, SizeUnit::Pixels)) => Some(scalar),
            _ => None,
        };

        match property {
            Property::Display => set(&mut n.display, value.as_str().and_then(Display::from_keyword)),
            Property::Layout => set(
                &mut n.layout,
                value.as_str().and_then(LayoutDirection::from_keyword),
            ),
            Property::TextAlign => {
                set(&mut n.text_align, value.as_str().and_then(TextAlign::from_keyword))
            }
            Property::Cursor => {
                set(&mut self.cursor, value.as_str().map(CursorMode::from_keyword))
            }
            Property::MarginTop => set(&mut n.margin.top, px()),
            Property::MarginRight => set(&mut n.margin.right, px()),
            Property::MarginBottom => set(&mut n.margin.bottom, px()),
            Property::MarginLeft => set(&mut n.margin.left, px()),
            Property::PaddingX => set(&mut n.padding_x, px()),
            Property::PaddingY => set(&mut n.padding_y, px()),
            Property::BorderSize => set(&mut n.border_width, px()),
            Property::BorderColor => set(&mut n.border_color, value.as_color()),
            Property::BackgroundColor => set(&mut n.background_color, value.as_color()),
            Property::Width => set(&mut n.width, Length::from_value(value)),
            Property::Height => set(&mut n.height, Length::from_value(value)),
            Property::MinWidth => set(&mut n.min_width, Length::from_value(value)),
            Property::MinHeight => set(&mut n.min_height, Length::from_value(value)),
            Property::MaxWidth => set(&mut n.max_width, Length::from_value(value)),
            Property::MaxHeight => set(&mut n.max_height, Length::from_value(value)),
            Property::TextColor => {
                if let Some(color) = value.as_color() {
                    self.text_color = Some(color);
                }
            }
            Property::FontName => {
                if let Some(name) = value.as_str() {
                    self.font_name = Some(name.to_string());
                }
            }
            Property::FontSize => {
                if let Some(size) = px() {
                    self.font_size = Some(size);
                }
            }
        }
    }

    /// Fill every unset inheritable field from `parent` and freeze.
    ///
    /// The cursor is taken from the parent only while this node's own cursor
    /// is `None`.
    pub fn inherit(self, parent: &InheritedValues) -> ComputedValues {
        let cursor = if self.cursor == CursorMode::None {
            parent.cursor
        } else {
            self.cursor
        };

        ComputedValues {
            inherited: InheritedValues {
                text_color: self.text_color.unwrap_or(parent.text_color),
                font_name: self.font_name.unwrap_or_else(|| parent.font_name.clone()),
                font_size: self.font_size.unwrap_or(parent.font_size),
                cursor,
            },
            non_inherited: self.non_inherited,
        }
    }

    /// Freeze without a parent; unset fields keep their defaults.
    pub fn immutable(self) -> ComputedValues {
        self.inherit(&InheritedValues::default())
    }
}

#[inline]
fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ComputedValues::default();
        assert_eq!(c.display(), Display::Block);
        assert_eq!(c.layout(), LayoutDirection::Rows);
        assert_eq!(c.margin(), Edges::all(2));
        assert_eq!(c.padding(), Edges::all(5));
        assert_eq!(c.non_inherited.text_align, TextAlign::Center);
        assert_eq!(c.text_color(), Color::WHITE);
        assert_eq!(c.font_name(), "");
        assert_eq!(c.font_size(), 0);
        assert!(c.non_inherited.background_color.is_transparent());
    }

    #[test]
    fn apply_keywords_and_sizes() {
        let mut m = MutableComputedValues::default();
        m.apply(Property::Display, &StylesheetValue::String("inline".into()));
        m.apply(Property::TextAlign, &StylesheetValue::String("right".into()));
        m.apply(Property::MarginLeft, &StylesheetValue::px(7));
        m.apply(Property::Width, &StylesheetValue::percent(50));
        m.apply(Property::Cursor, &StylesheetValue::String("hand".into()));
        let c = m.immutable();
        assert_eq!(c.display(), Display::Inline);
        assert_eq!(c.non_inherited.text_align, TextAlign::Right);
        assert_eq!(c.margin().left, 7);
        assert_eq!(c.non_inherited.width, Length::Percent(50));
        assert_eq!(c.cursor(), CursorMode::Hand);
    }

    #[test]
    fn wrong_value_shape_is_ignored() {
        let mut m = MutableComputedValues::default();
        m.apply(Property::MarginTop, &StylesheetValue::String("big".into()));
        m.apply(Property::BackgroundColor, &StylesheetValue::px(3));
        m.apply(Property::Display, &StylesheetValue::String("flex".into()));
        assert_eq!(m.immutable(), ComputedValues::default());
    }

    #[test]
    fn inherit_fills_only_unset_fields() {
        let parent = InheritedValues {
            text_color: Color::rgb(1, 2, 3),
            font_name: "mono".into(),
            font_size: 20,
            cursor: CursorMode::Input,
        };

        let mut m = MutableComputedValues::default();
        m.apply(Property::FontSize, &StylesheetValue::px(12));
        let c = m.inherit(&parent);

        assert_eq!(c.font_size(), 12);
        assert_eq!(c.font_name(), "mono");
        assert_eq!(c.text_color(), Color::rgb(1, 2, 3));
        assert_eq!(c.cursor(), CursorMode::Input);
    }

    #[test]
    fn own_cursor_is_kept() {
        let parent = InheritedValues {
            cursor: CursorMode::Input,
            ..InheritedValues::default()
        };
        let mut m = MutableComputedValues::default();
        m.apply(Property::Cursor, &StylesheetValue::String("hand".into()));
        assert_eq!(m.inherit(&parent).cursor(), CursorMode::Hand);
    }

    #[test]
    fn length_resolves_percent_against_base() {
        assert_eq!(Length::Percent(25).resolve(200), 50);
        assert_eq!(Length::Px(30).resolve(200), 30);
        assert!(Length::default().is_zero());
    }
}
