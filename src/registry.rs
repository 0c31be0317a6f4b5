//! Concurrent per-channel stores
//!
//! Three independent reader/writer-locked maps keyed by channel name: the
//! last-rotated day, the open file handle, and the emitter. Each store is
//! atomic on its own; there is no cross-store transaction, so callers must
//! only ever build consistent combinations by construction.

use std::collections::HashMap;
use std::fs::File;
use std::sync::{Arc, Mutex, RwLock};

use crate::emitter::Emitter;

/// A reader/writer-locked map from channel name to a value.
///
/// Channels persist for the process lifetime, so no delete is exposed.
#[derive(Debug)]
pub struct Store<V> {
    map: RwLock<HashMap<String, V>>,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> Store<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<V> {
        self.map.read().ok().and_then(|map| map.get(key).cloned())
    }

    pub fn insert(&self, key: &str, value: V) {
        if let Ok(mut map) = self.map.write() {
            map.insert(key.to_string(), value);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map
            .read()
            .map(|map| map.contains_key(key))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.map.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The three parallel stores backing the channel system
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Last-rotated day per channel, as days since the common era
    pub days: Store<i32>,
    /// Open file handle per channel (production mode only)
    pub files: Store<Arc<Mutex<File>>>,
    /// Emitter per channel, created once at first use
    pub emitters: Store<Arc<Emitter>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_get_absent_returns_none() {
        let store: Store<i32> = Store::new();
        assert_eq!(store.get("missing"), None);
        assert!(!store.contains("missing"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_insert_and_get() {
        let store: Store<i32> = Store::new();
        store.insert("info", 738000);
        assert_eq!(store.get("info"), Some(738000));
        assert!(store.contains("info"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let store: Store<i32> = Store::new();
        store.insert("info", 1);
        store.insert("info", 2);
        assert_eq!(store.get("info"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_and_readers() {
        let store: Arc<Store<usize>> = Arc::new(Store::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                let key = format!("channel-{}", i);
                store.insert(&key, i);
                // Readers run in parallel with other writers
                assert_eq!(store.get(&key), Some(i));
            }));
        }
        for handle in handles {
            handle.join().expect("thread should complete");
        }

        assert_eq!(store.len(), 8);
        for i in 0..8 {
            assert_eq!(store.get(&format!("channel-{}", i)), Some(i));
        }
    }

    #[test]
    fn test_registry_stores_are_independent() {
        let registry = ChannelRegistry::new();
        registry.days.insert("info", 738000);
        assert!(registry.days.contains("info"));
        assert!(!registry.files.contains("info"));
        assert!(!registry.emitters.contains("info"));
    }
}
