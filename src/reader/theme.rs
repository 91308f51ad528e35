use std::fmt;

use super::{Document, Storage};

/// The root element attribute the stylesheet keys its palette on.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// The `data-action` of the theme toggle button.
pub const TOGGLE_ACTION: &str = "toggle-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorTheme {
    Dark,
    Light,
}

impl ColorTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTheme::Dark => "dark",
            ColorTheme::Light => "light",
        }
    }

    /// Parses a stored or attribute value. Anything other than `light` is
    /// treated as dark.
    pub fn parse(s: &str) -> ColorTheme {
        match s {
            "light" => ColorTheme::Light,
            _ => ColorTheme::Dark,
        }
    }

    pub fn toggled(self) -> ColorTheme {
        match self {
            ColorTheme::Dark => ColorTheme::Light,
            ColorTheme::Light => ColorTheme::Dark,
        }
    }

    // The toggle button offers the theme you'd switch to.
    fn button(&self) -> (&'static str, &'static str) {
        match self {
            ColorTheme::Dark => ("☀️", "切換亮色模式"),
            ColorTheme::Light => ("🌙", "切換暗色模式"),
        }
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remembers the reader's light/dark preference under `<prefix>-theme`.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeManager {
    key: String,
}

impl ThemeManager {
    pub fn new(prefix: &str) -> ThemeManager {
        ThemeManager {
            key: format!("{}-theme", prefix),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Applies the stored theme, defaulting to dark.
    pub fn init(&self, storage: &mut dyn Storage, document: &mut dyn Document) -> ColorTheme {
        let theme = storage
            .get(&self.key)
            .map(|s| ColorTheme::parse(&s))
            .unwrap_or(ColorTheme::Dark);
        self.set_theme(theme, storage, document);
        theme
    }

    pub fn set_theme(&self, theme: ColorTheme, storage: &mut dyn Storage, document: &mut dyn Document) {
        document.set_attribute(THEME_ATTRIBUTE, theme.as_str());
        storage.set(&self.key, theme.as_str());
        let (text, title) = theme.button();
        document.set_control(TOGGLE_ACTION, text, title);
    }

    /// The theme currently applied to the page.
    pub fn current(&self, document: &dyn Document) -> ColorTheme {
        document
            .attribute(THEME_ATTRIBUTE)
            .map(|s| ColorTheme::parse(&s))
            .unwrap_or(ColorTheme::Dark)
    }

    /// Switches between dark and light and returns the new theme.
    pub fn toggle(&self, storage: &mut dyn Storage, document: &mut dyn Document) -> ColorTheme {
        let next = self.current(document).toggled();
        self.set_theme(next, storage, document);
        next
    }
}
