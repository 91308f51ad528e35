use super::{Document, Storage};

pub const MIN_SIZE: i32 = 14;
pub const MAX_SIZE: i32 = 24;
pub const STEP: i32 = 2;
pub const DEFAULT_SIZE: i32 = 18;

/// The CSS custom property the stylesheet sizes chapter text with.
pub const FONT_SIZE_PROPERTY: &str = "--font-size";

/// Remembers the chapter text size, in pixels, under `<prefix>-fontsize`.
/// Sizes are clamped to [`MIN_SIZE`]..=[`MAX_SIZE`].
#[derive(Clone, Debug, PartialEq)]
pub struct FontSizeManager {
    key: String,
}

impl FontSizeManager {
    pub fn new(prefix: &str) -> FontSizeManager {
        FontSizeManager {
            key: format!("{}-fontsize", prefix),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn init(&self, storage: &mut dyn Storage, document: &mut dyn Document) -> i32 {
        let size = self.get_size(storage);
        self.set_size(size, storage, document)
    }

    /// Applies and stores `size`, clamped. Returns the size actually applied.
    pub fn set_size(&self, size: i32, storage: &mut dyn Storage, document: &mut dyn Document) -> i32 {
        let size = size.max(MIN_SIZE).min(MAX_SIZE);
        let px = format!("{}px", size);
        document.set_style_property(FONT_SIZE_PROPERTY, &px);
        storage.set(&self.key, &size.to_string());
        document.set_font_size_display(&px);
        size
    }

    /// The stored size. Missing, unparseable, and zero values read as
    /// [`DEFAULT_SIZE`].
    pub fn get_size(&self, storage: &dyn Storage) -> i32 {
        storage
            .get(&self.key)
            .and_then(|s| s.trim().parse::<i32>().ok())
            .filter(|size| *size != 0)
            .unwrap_or(DEFAULT_SIZE)
    }

    pub fn increase(&self, storage: &mut dyn Storage, document: &mut dyn Document) -> i32 {
        let size = self.get_size(storage) + STEP;
        self.set_size(size, storage, document)
    }

    pub fn decrease(&self, storage: &mut dyn Storage, document: &mut dyn Document) -> i32 {
        let size = self.get_size(storage) - STEP;
        self.set_size(size, storage, document)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reader::testing::FakeDocument;
    use crate::reader::MemoryStorage;

    #[test]
    fn test_init_defaults() {
        let (mut storage, mut document) = (MemoryStorage::new(), FakeDocument::default());
        let manager = FontSizeManager::new("quantum-agent");

        assert_eq!(DEFAULT_SIZE, manager.init(&mut storage, &mut document));
        assert_eq!(Some(String::from("18")), storage.get("quantum-agent-fontsize"));
        assert_eq!(Some(&String::from("18px")), document.style.get(FONT_SIZE_PROPERTY));
        assert_eq!(Some(String::from("18px")), document.font_size_display);
    }

    #[test]
    fn test_size_is_clamped() {
        let (mut storage, mut document) = (MemoryStorage::new(), FakeDocument::default());
        let manager = FontSizeManager::new("q");
        manager.init(&mut storage, &mut document);

        let sizes: Vec<i32> = (0..5)
            .map(|_| manager.increase(&mut storage, &mut document))
            .collect();
        assert_eq!(vec![20, 22, 24, 24, 24], sizes);

        let sizes: Vec<i32> = (0..7)
            .map(|_| manager.decrease(&mut storage, &mut document))
            .collect();
        assert_eq!(vec![22, 20, 18, 16, 14, 14, 14], sizes);
        assert_eq!(MIN_SIZE, manager.get_size(&storage));
    }

    #[test]
    fn test_unreadable_size_falls_back_to_default() {
        let mut storage = MemoryStorage::new();
        let manager = FontSizeManager::new("q");
        for value in &["", "big", "0"] {
            storage.set("q-fontsize", value);
            assert_eq!(DEFAULT_SIZE, manager.get_size(&storage));
        }
    }
}
