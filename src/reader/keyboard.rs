use super::{Direction, Document};
use tracing::debug;

/// Elements whose key events belong to the user's typing, not to paging.
const TEXT_INPUT_TAGS: &[&str] = &["INPUT", "TEXTAREA"];

/// Arrow-key paging between chapters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardNav;

impl KeyboardNav {
    pub fn new() -> KeyboardNav {
        KeyboardNav
    }

    /// Maps a key to a direction, ignoring keys typed into text fields.
    pub fn direction(key: &str, target_tag: &str) -> Option<Direction> {
        if TEXT_INPUT_TAGS
            .iter()
            .any(|tag| tag.eq_ignore_ascii_case(target_tag))
        {
            return None;
        }
        match key {
            "ArrowLeft" => Some(Direction::Prev),
            "ArrowRight" => Some(Direction::Next),
            _ => None,
        }
    }

    /// Handles a `keydown` event. Returns the href navigated to, if any.
    pub fn on_keydown(&self, key: &str, target_tag: &str, document: &mut dyn Document) -> Option<String> {
        let direction = KeyboardNav::direction(key, target_tag)?;
        self.navigate(direction, document)
    }

    /// Follows the `[data-nav]` link for `direction` unless it is missing or
    /// disabled.
    pub fn navigate(&self, direction: Direction, document: &mut dyn Document) -> Option<String> {
        match document.nav_link(direction) {
            Some(link) if !link.disabled && !link.href.is_empty() => {
                debug!(direction = direction.as_str(), href = %link.href, "Navigating");
                document.navigate(&link.href);
                Some(link.href)
            }
            _ => {
                debug!(direction = direction.as_str(), "No page in that direction");
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reader::testing::FakeDocument;
    use crate::reader::NavLink;

    fn document() -> FakeDocument {
        let mut document = FakeDocument::default();
        document.nav.insert(
            "prev",
            NavLink {
                href: String::new(),
                disabled: true,
            },
        );
        document.nav.insert(
            "next",
            NavLink {
                href: String::from("ch01-02.html"),
                disabled: false,
            },
        );
        document
    }

    #[test]
    fn test_arrow_right_follows_next() {
        let mut document = document();
        assert_eq!(
            Some(String::from("ch01-02.html")),
            KeyboardNav::new().on_keydown("ArrowRight", "BODY", &mut document)
        );
        assert_eq!(vec![String::from("ch01-02.html")], document.navigations);
    }

    #[test]
    fn test_disabled_link_is_not_followed() {
        let mut document = document();
        assert_eq!(
            None,
            KeyboardNav::new().on_keydown("ArrowLeft", "BODY", &mut document)
        );
        assert!(document.navigations.is_empty());
    }

    #[test]
    fn test_text_inputs_are_ignored() {
        let mut document = document();
        for tag in &["INPUT", "TEXTAREA", "input"] {
            assert_eq!(
                None,
                KeyboardNav::new().on_keydown("ArrowRight", tag, &mut document)
            );
        }
        assert!(document.navigations.is_empty());
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let mut document = document();
        assert_eq!(None, KeyboardNav::new().on_keydown("Enter", "BODY", &mut document));
        assert_eq!(None, KeyboardNav::new().on_keydown("ArrowUp", "BODY", &mut document));
    }
}
