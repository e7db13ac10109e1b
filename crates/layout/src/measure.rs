//! Text measurement: the font provider layout asks for text extents.

use common::Size;

/// A font resolved by family name and pixel size.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    pub name: String,
    pub size: i32,
}

/// Font lookup and text extents. Layout degrades to zero sizes when a font
/// cannot be found.
pub trait TextMeasure {
    fn font(&self, name: &str, size: i32) -> Option<Font>;

    fn text_size(&self, text: &str, font: &Font) -> Size;

    /// Extent of `text` in the named font, or zero when the font is unknown.
    fn measure(&self, text: &str, name: &str, size: i32) -> Size {
        self.font(name, size)
            .map_or(Size::ZERO, |font| self.text_size(text, &font))
    }
}

/// Fixed-advance measurement: every code point is 0.6 × size wide and a line
/// is 1.2 × size tall. Any family name resolves; only size 0 is unknown.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonospaceMeasure;

impl MonospaceMeasure {
    pub fn advance(size: i32) -> i32 {
        size * 3 / 5
    }

    pub fn line_height(size: i32) -> i32 {
        size * 6 / 5
    }
}

impl TextMeasure for MonospaceMeasure {
    fn font(&self, name: &str, size: i32) -> Option<Font> {
        (size > 0).then(|| Font { name: name.to_owned(), size })
    }

    fn text_size(&self, text: &str, font: &Font) -> Size {
        let columns = text.chars().count() as i32;
        Size::new(columns * Self::advance(font.size), Self::line_height(font.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_extents() {
        let measure = MonospaceMeasure;
        assert_eq!(measure.measure("hello", "sans", 10), Size::new(30, 12));
        assert_eq!(measure.measure("", "sans", 10), Size::new(0, 12));
        assert_eq!(measure.measure("héllo", "mono", 20), Size::new(60, 24));
    }

    #[test]
    fn zero_size_font_is_unknown() {
        let measure = MonospaceMeasure;
        assert!(measure.font("sans", 0).is_none());
        assert_eq!(measure.measure("hello", "sans", 0), Size::ZERO);
    }
}
