use std::time::Duration;

use super::{Document, Storage};
use tracing::debug;

/// Saved positions at or below this percentage aren't worth offering.
pub const RESUME_THRESHOLD: f64 = 5.0;

pub const RESUME_PROMPT: &str = "要從上次閱讀位置繼續嗎？";

/// How long to wait for layout before jumping to the saved position.
pub const RESUME_DELAY: Duration = Duration::from_millis(100);

/// Remembers how far down each chapter page the reader got, as a percentage
/// of the scrollable height, under `<prefix>-progress-<path>`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadingProgress {
    prefix: String,
    ticking: bool,
}

impl ReadingProgress {
    pub fn new(prefix: &str) -> ReadingProgress {
        ReadingProgress {
            prefix: prefix.to_owned(),
            ticking: false,
        }
    }

    pub fn key(&self, document: &dyn Document) -> String {
        format!("{}-progress-{}", self.prefix, document.path())
    }

    /// Whether a save is waiting on an animation frame.
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// Stores the current scroll position and returns the percentage saved.
    pub fn save_position(&self, storage: &mut dyn Storage, document: &dyn Document) -> f64 {
        let metrics = document.scroll_metrics();
        let scrollable = metrics.scrollable();
        let percent = if scrollable > 0.0 {
            metrics.scroll_y / scrollable * 100.0
        } else {
            0.0
        };
        storage.set(&self.key(document), &percent.to_string());
        percent
    }

    /// Offers to jump back to the saved position. Returns the offset
    /// scheduled, if the reader accepted.
    pub fn restore_position(&self, storage: &dyn Storage, document: &mut dyn Document) -> Option<f64> {
        let saved = storage
            .get(&self.key(document))
            .and_then(|s| s.trim().parse::<f64>().ok())?;
        if !(saved > RESUME_THRESHOLD) || !document.confirm(RESUME_PROMPT) {
            return None;
        }
        let y = saved / 100.0 * document.scroll_metrics().scrollable();
        debug!(saved, y, "Resuming reading position");
        document.schedule_scroll(y, RESUME_DELAY);
        Some(y)
    }

    /// Throttles scroll events to one save per animation frame.
    pub fn on_scroll(&mut self, document: &mut dyn Document) {
        if self.ticking {
            return;
        }
        self.ticking = true;
        document.request_animation_frame();
    }

    pub fn on_animation_frame(&mut self, storage: &mut dyn Storage, document: &dyn Document) {
        if !self.ticking {
            return;
        }
        self.save_position(storage, document);
        self.ticking = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reader::testing::FakeDocument;
    use crate::reader::{MemoryStorage, ScrollMetrics};

    const KEY: &str = "q-progress-/phases/phase-01/volumes/vol-01/ch01-01.html";

    fn document(scroll_y: f64) -> FakeDocument {
        FakeDocument {
            path: String::from("/phases/phase-01/volumes/vol-01/ch01-01.html"),
            metrics: ScrollMetrics {
                scroll_y,
                scroll_height: 2400.0,
                viewport_height: 400.0,
            },
            ..FakeDocument::default()
        }
    }

    #[test]
    fn test_save_position() {
        let mut storage = MemoryStorage::new();
        let progress = ReadingProgress::new("q");

        assert_eq!(25.0, progress.save_position(&mut storage, &document(500.0)));
        assert_eq!(Some(String::from("25")), storage.get(KEY));
    }

    #[test]
    fn test_save_position_short_page() {
        let mut storage = MemoryStorage::new();
        let progress = ReadingProgress::new("q");
        let mut document = document(0.0);
        document.metrics.scroll_height = 300.0;

        assert_eq!(0.0, progress.save_position(&mut storage, &document));
        assert_eq!(Some(String::from("0")), storage.get(KEY));
    }

    #[test]
    fn test_restore_position_accepted() {
        let mut storage = MemoryStorage::new();
        storage.set(KEY, "50");
        let mut document = document(0.0);
        document.confirm_answer = true;

        assert_eq!(
            Some(1000.0),
            ReadingProgress::new("q").restore_position(&storage, &mut document)
        );
        assert_eq!(vec![String::from(RESUME_PROMPT)], document.prompts);
        assert_eq!(vec![(1000.0, RESUME_DELAY)], document.scheduled_scrolls);
    }

    #[test]
    fn test_restore_position_declined() {
        let mut storage = MemoryStorage::new();
        storage.set(KEY, "50");
        let mut document = document(0.0);
        document.confirm_answer = false;

        assert_eq!(
            None,
            ReadingProgress::new("q").restore_position(&storage, &mut document)
        );
        assert_eq!(1, document.prompts.len());
        assert!(document.scheduled_scrolls.is_empty());
    }

    #[test]
    fn test_restore_position_near_top_does_not_ask() {
        let mut storage = MemoryStorage::new();
        let progress = ReadingProgress::new("q");
        let mut document = document(0.0);
        document.confirm_answer = true;

        for saved in &["5", "0", "garbage"] {
            storage.set(KEY, saved);
            assert_eq!(None, progress.restore_position(&storage, &mut document));
        }
        assert!(document.prompts.is_empty());
    }

    #[test]
    fn test_scroll_is_throttled() {
        let mut storage = MemoryStorage::new();
        let mut progress = ReadingProgress::new("q");
        let mut document = document(1000.0);

        progress.on_scroll(&mut document);
        progress.on_scroll(&mut document);
        progress.on_scroll(&mut document);
        assert_eq!(1, document.frame_requests);
        assert!(progress.is_ticking());
        assert!(storage.is_empty());

        progress.on_animation_frame(&mut storage, &document);
        assert!(!progress.is_ticking());
        assert_eq!(Some(String::from("50")), storage.get(KEY));

        progress.on_scroll(&mut document);
        assert_eq!(2, document.frame_requests);
    }
}
