//! The slice of the page the reader runtime touches. In a browser this is the
//! DOM and `window`; tests substitute a recording fake.

use std::time::Duration;

/// Which sibling page a navigation link points to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// The value of the link's `data-nav` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Prev => "prev",
            Direction::Next => "next",
        }
    }
}

/// A `[data-nav]` element on a chapter page.
#[derive(Clone, Debug, PartialEq)]
pub struct NavLink {
    pub href: String,

    /// Set when the element carries the `disabled` class, i.e. there is no
    /// sibling in that direction.
    pub disabled: bool,
}

/// The page's scroll state, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    /// `window.scrollY`
    pub scroll_y: f64,

    /// `document.body.scrollHeight`
    pub scroll_height: f64,

    /// `window.innerHeight`
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// How far the page can scroll. Zero or less means it fits the viewport.
    pub fn scrollable(&self) -> f64 {
        self.scroll_height - self.viewport_height
    }
}

pub trait Document {
    /// Reads an attribute of the root (`<html>`) element.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Sets an attribute on the root element.
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Sets a CSS custom property on the root element.
    fn set_style_property(&mut self, name: &str, value: &str);

    /// Updates the label and tooltip of the control with the given
    /// `data-action`, if the page has one.
    fn set_control(&mut self, action: &str, text: &str, title: &str);

    /// Updates the `[data-fontsize-display]` element, if the page has one.
    fn set_font_size_display(&mut self, text: &str);

    /// Whether the page is a chapter page (has a `.chapter-content` element).
    fn has_chapter_content(&self) -> bool;

    /// `window.location.pathname`
    fn path(&self) -> String;

    fn scroll_metrics(&self) -> ScrollMetrics;

    /// Asks the reader a yes/no question.
    fn confirm(&mut self, message: &str) -> bool;

    /// Scrolls to `y` after `delay`.
    fn schedule_scroll(&mut self, y: f64, delay: Duration);

    /// Requests a callback before the next repaint; the runtime answers it
    /// with [`crate::reader::Reader::on_animation_frame`].
    fn request_animation_frame(&mut self);

    /// Finds the `[data-nav]` element for a direction.
    fn nav_link(&self, direction: Direction) -> Option<NavLink>;

    /// Leaves the page for `href`.
    fn navigate(&mut self, href: &str);
}
