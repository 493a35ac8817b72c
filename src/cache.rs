use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use crate::parse::{parse, ParseError};
use crate::{LogicalOperator, TagDictionary};

/// Minimal cache contract the engine's collaborators program against.
/// `get_or_load` runs the loader and stores its result as one atomic
/// step; concurrent callers for any key serialize behind it.
pub trait Cache<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn put(&self, key: K, value: V);
    fn get_or_load(&self, key: &K, loader: &mut dyn FnMut() -> V) -> V;
    fn remove_all(&self);
}

/// Unbounded in-memory [`Cache`] backed by a mutexed map.
pub struct MemoryCache<K, V> {
    map: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self {
            map: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoryCache<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        self.map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: K, value: V) {
        self.map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    fn get_or_load(&self, key: &K, loader: &mut dyn FnMut() -> V) -> V {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = map.get(key) {
            return value.clone();
        }
        let value = loader();
        map.insert(key.clone(), value.clone());
        value
    }

    fn remove_all(&self) {
        self.map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Compute-once cache: each key owns a cell, and the first caller to
/// reach the cell runs the initializer while later callers block on it
/// and then read the stored value. A failed initialization evicts the
/// cell so the next caller retries instead of observing the failure.
pub struct MemoCache<K, V> {
    cells: Mutex<HashMap<K, Arc<Mutex<Option<V>>>>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the value for `key`, running `init` if no caller has
    /// produced one yet.
    ///
    /// # Errors
    ///
    /// Propagates the initializer's error to the caller that ran it.
    pub fn get_or_try_init<E>(
        &self,
        key: &K,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        let cell = {
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                cells
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(None))),
            )
        };

        let mut slot = cell.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = slot.as_ref() {
            return Ok(value.clone());
        }
        match init() {
            Ok(value) => {
                *slot = Some(value.clone());
                Ok(value)
            }
            Err(err) => {
                drop(slot);
                self.cells
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(key);
                Err(err)
            }
        }
    }

    pub fn clear(&self) {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Parsed-tree cache in front of [`parse`]. The backing cache is
/// optional; without one every lookup parses afresh, so a missing cache
/// degrades throughput but never correctness.
pub struct ConditionTreeCache {
    dictionary: Arc<dyn TagDictionary>,
    cache: Option<Box<dyn Cache<String, Arc<Option<LogicalOperator>>>>>,
}

impl ConditionTreeCache {
    /// A tree cache with no backing store; every call parses.
    #[must_use]
    pub fn new(dictionary: Arc<dyn TagDictionary>) -> Self {
        Self {
            dictionary,
            cache: None,
        }
    }

    #[must_use]
    pub fn with_cache(
        dictionary: Arc<dyn TagDictionary>,
        cache: Box<dyn Cache<String, Arc<Option<LogicalOperator>>>>,
    ) -> Self {
        Self {
            dictionary,
            cache: Some(cache),
        }
    }

    /// Fetch the parsed tree for a condition string, parsing and caching
    /// on miss. Parse failures are never cached.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the string fails to parse or resolve.
    pub fn get_tree(
        &self,
        condition_string: &str,
    ) -> Result<Arc<Option<LogicalOperator>>, ParseError> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(parse(condition_string, &*self.dictionary)?));
        };
        let key = cache_key(condition_string);
        if let Some(tree) = cache.get(&key) {
            return Ok(tree);
        }
        let tree = Arc::new(parse(condition_string, &*self.dictionary)?);
        cache.put(key, Arc::clone(&tree));
        Ok(tree)
    }
}

#[cfg(feature = "digest-keys")]
fn cache_key(condition_string: &str) -> String {
    blake3::hash(condition_string.as_bytes()).to_hex().to_string()
}

#[cfg(not(feature = "digest-keys"))]
fn cache_key(condition_string: &str) -> String {
    condition_string.to_owned()
}
