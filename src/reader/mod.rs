//! The reader runtime: the behaviour behind the controls on every generated
//! page. `js/reader.js` implements the same rules in the browser; this module
//! states them against injected [`Storage`] and [`Document`] surfaces so they
//! can be exercised without one.
//!
//! Every page gets the theme toggle and font size controls. Chapter pages
//! (those with a `.chapter-content` element) also remember the reading
//! position and page between chapters with the arrow keys.

mod document;
mod font;
mod keyboard;
mod progress;
mod storage;
mod theme;

pub use self::document::{Direction, Document, NavLink, ScrollMetrics};
pub use self::font::{FontSizeManager, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE, STEP};
pub use self::keyboard::KeyboardNav;
pub use self::progress::{ReadingProgress, RESUME_DELAY, RESUME_PROMPT, RESUME_THRESHOLD};
pub use self::storage::{DisabledStorage, MemoryStorage, Storage};
pub use self::theme::{ColorTheme, ThemeManager};

use std::fmt;
use std::str::FromStr;

/// The `data-action` values of the page controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    FontIncrease,
    FontDecrease,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ToggleTheme => "toggle-theme",
            Action::FontIncrease => "font-increase",
            Action::FontDecrease => "font-decrease",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a `data-action` value names no known control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Unknown action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Action, UnknownAction> {
        match s {
            "toggle-theme" => Ok(Action::ToggleTheme),
            "font-increase" => Ok(Action::FontIncrease),
            "font-decrease" => Ok(Action::FontDecrease),
            _ => Err(UnknownAction(s.to_owned())),
        }
    }
}

/// Wires the managers to one page. Events arrive as method calls: `init`
/// once the page has loaded, then `on_click`, `on_scroll`,
/// `on_animation_frame`, and `on_keydown` as they happen.
pub struct Reader<S: Storage, D: Document> {
    storage: S,
    document: D,
    theme: ThemeManager,
    font_size: FontSizeManager,

    // Only set up on chapter pages.
    progress: Option<ReadingProgress>,
    keyboard: Option<KeyboardNav>,
    prefix: String,
}

impl<S: Storage, D: Document> Reader<S, D> {
    pub fn new(prefix: &str, storage: S, document: D) -> Reader<S, D> {
        Reader {
            storage,
            document,
            theme: ThemeManager::new(prefix),
            font_size: FontSizeManager::new(prefix),
            progress: None,
            keyboard: None,
            prefix: prefix.to_owned(),
        }
    }

    pub fn init(&mut self) {
        self.theme.init(&mut self.storage, &mut self.document);
        self.font_size.init(&mut self.storage, &mut self.document);

        if !self.document.has_chapter_content() {
            return;
        }
        let progress = ReadingProgress::new(&self.prefix);
        progress.restore_position(&self.storage, &mut self.document);
        self.progress = Some(progress);
        self.keyboard = Some(KeyboardNav::new());
    }

    /// Handles a click on a `[data-action]` control. Unknown actions are
    /// ignored.
    pub fn on_click(&mut self, action: &str) {
        match action.parse::<Action>() {
            Ok(action) => self.apply(action),
            Err(err) => tracing::debug!("{}", err),
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::ToggleTheme => {
                self.theme.toggle(&mut self.storage, &mut self.document);
            }
            Action::FontIncrease => {
                self.font_size.increase(&mut self.storage, &mut self.document);
            }
            Action::FontDecrease => {
                self.font_size.decrease(&mut self.storage, &mut self.document);
            }
        }
    }

    pub fn on_scroll(&mut self) {
        if let Some(progress) = &mut self.progress {
            progress.on_scroll(&mut self.document);
        }
    }

    pub fn on_animation_frame(&mut self) {
        if let Some(progress) = &mut self.progress {
            progress.on_animation_frame(&mut self.storage, &self.document);
        }
    }

    /// Handles a `keydown` event from an element with tag `target_tag`.
    /// Returns the href navigated to, if any.
    pub fn on_keydown(&mut self, key: &str, target_tag: &str) -> Option<String> {
        let keyboard = self.keyboard?;
        keyboard.on_keydown(key, target_tag, &mut self.document)
    }

    pub fn theme(&self) -> ColorTheme {
        self.theme.current(&self.document)
    }

    pub fn font_size(&self) -> i32 {
        self.font_size.get_size(&self.storage)
    }

    /// Whether the chapter-only behaviour (progress, keyboard) is active.
    pub fn is_chapter_page(&self) -> bool {
        self.progress.is_some()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn document(&self) -> &D {
        &self.document
    }
}
