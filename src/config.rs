//! Engine configuration.

use common::{Color, Size};
use editor::DEFAULT_TAB_WIDTH;
use style::{CursorMode, InheritedValues};

/// One rule per selector so every rule weighs the same as a single author
/// tag selector.
pub const DEFAULT_USER_AGENT_STYLESHEET: &str = "\
span { display: inline; }
a { display: inline; }
b { display: inline; }
i { display: inline; }
em { display: inline; }
strong { display: inline; }
label { display: inline; }
code { display: inline; }
head { display: none; }
script { display: none; }
style { display: none; }
title { display: none; }
meta { display: none; }
link { display: none; }
";

/// Source name the user agent sheet is loaded under.
pub const USER_AGENT_SOURCE: &str = "user-agent";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Area the document lays out into; percentage sizes of top-level nodes
    /// resolve against it.
    pub viewport: Size,
    pub default_font_family: String,
    pub default_font_size: i32,
    pub default_text_color: Color,
    /// Loaded before any author stylesheet.
    pub user_agent_stylesheet: Option<String>,
    pub tab_width: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(800, 600),
            default_font_family: "sans".into(),
            default_font_size: 16,
            default_text_color: Color::BLACK,
            user_agent_stylesheet: Some(DEFAULT_USER_AGENT_STYLESHEET.into()),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl EngineConfig {
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_font(mut self, family: impl Into<String>, size: i32) -> Self {
        self.default_font_family = family.into();
        self.default_font_size = size;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.default_text_color = color;
        self
    }

    /// `None` disables the user agent sheet.
    pub fn with_user_agent_stylesheet(mut self, sheet: Option<String>) -> Self {
        self.user_agent_stylesheet = sheet;
        self
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// What the document root inherits from.
    pub fn root_values(&self) -> InheritedValues {
        InheritedValues {
            text_color: self.default_text_color,
            font_name: self.default_font_family.clone(),
            font_size: self.default_font_size,
            cursor: CursorMode::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.viewport, Size::new(800, 600));
        assert_eq!(config.root_values().font_name, "sans");
        assert_eq!(config.root_values().font_size, 16);
        assert_eq!(config.tab_width, 4);
        assert!(config.user_agent_stylesheet.is_some());
    }

    #[test]
    fn builders_override() {
        let config = EngineConfig::default()
            .with_font("mono", 10)
            .with_tab_width(2)
            .with_user_agent_stylesheet(None);
        assert_eq!(config.root_values().font_size, 10);
        assert_eq!(config.tab_width, 2);
        assert_eq!(config.user_agent_stylesheet, None);
    }

    #[test]
    fn user_agent_sheet_parses_cleanly() {
        let mut dom = dom::Dom::new();
        assert!(dom.load_stylesheet(DEFAULT_USER_AGENT_STYLESHEET, USER_AGENT_SOURCE).is_empty());
        assert_eq!(dom.stylesheets()[0].declarations.len(), 14);
    }
}
