//! The key-value store the reader persists its preferences in. In a browser
//! this is `localStorage`; [`MemoryStorage`] stands in for it elsewhere.

use std::collections::BTreeMap;

/// A string key-value store. Writes never fail: a store that can't persist a
/// value drops it silently, the way a browser with storage disabled does.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// A [`Storage`] backed by an in-memory map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }
}

/// A [`Storage`] that remembers nothing, e.g. for private browsing modes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DisabledStorage;

impl Storage for DisabledStorage {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&mut self, _key: &str, _value: &str) {}
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set("a", "1");
        storage.set("a", "2");
        assert_eq!(Some(String::from("2")), storage.get("a"));
        assert_eq!(None, storage.get("b"));
        assert_eq!(1, storage.len());
    }

    #[test]
    fn test_disabled_storage_drops_writes() {
        let mut storage = DisabledStorage;
        storage.set("a", "1");
        assert_eq!(None, storage.get("a"));
    }
}
