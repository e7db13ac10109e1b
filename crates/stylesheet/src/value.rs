//! Property values as they appear in a stylesheet.

use core::fmt;

use common::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeUnit {
    Pixels,
    Percentage,
}

/// A property value, tagged by the shape it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetValue {
    String(String),
    Color(Color),
    Size { scalar: i32, unit: SizeUnit },
}

impl StylesheetValue {
    pub fn px(scalar: i32) -> Self {
        Self::Size {
            scalar,
            unit: SizeUnit::Pixels,
        }
    }

    pub fn percent(scalar: i32) -> Self {
        Self::Size {
            scalar,
            unit: SizeUnit::Percentage,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<(i32, SizeUnit)> {
        match self {
            Self::Size { scalar, unit } => Some((*scalar, *unit)),
            _ => None,
        }
    }
}

impl fmt::Display for StylesheetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Color(c) => write!(f, "{c}"),
            Self::Size {
                scalar,
                unit: SizeUnit::Pixels,
            } => write!(f, "{scalar}px"),
            Self::Size {
                scalar,
                unit: SizeUnit::Percentage,
            } => write!(f, "{scalar}%"),
        }
    }
}
