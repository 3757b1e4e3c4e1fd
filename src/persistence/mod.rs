//! Best-score storage
//!
//! A tiny key-value store of integer scores keyed by name. Backends:
//! - [`MemoryStore`]: process-local, used by tests and the headless runner
//! - [`JsonFileStore`]: JSON file with write-to-temp-then-rename

mod file;

pub use file::JsonFileStore;

use std::collections::BTreeMap;

/// Key-value store for best scores
///
/// Writes never fail from the caller's point of view. Backends that cannot
/// persist log the problem and keep the value in memory.
pub trait BestScoreStore {
    /// Stored value for `key`, if any
    fn read(&self, key: &str) -> Option<u32>;

    /// Store `value` under `key`
    fn write(&mut self, key: &str, value: u32);
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with some keys already present
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, u32)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }

    fn write(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}

impl<S: BestScoreStore + ?Sized> BestScoreStore for Box<S> {
    fn read(&self, key: &str) -> Option<u32> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: u32) {
        (**self).write(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::with_values([("BestScoreEasy", 40)]);
        assert_eq!(store.read("BestScoreEasy"), Some(40));
        assert_eq!(store.read("BestScoreHard"), None);

        store.write("BestScoreHard", 90);
        assert_eq!(store.read("BestScoreHard"), Some(90));
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn BestScoreStore> = Box::new(MemoryStore::new());
        store.write("k", 3);
        assert_eq!(store.read("k"), Some(3));
    }
}
