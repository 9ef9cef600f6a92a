//! Persistent key-value store capability
//!
//! A store is synchronous, string-keyed and string-valued, the shape of the
//! browser's LocalStorage. Cells receive one explicitly instead of probing the
//! environment, so both the "store present" and "store absent" paths are
//! reachable from tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::StoreError;

/// Synchronous string key-value storage
pub trait Store {
    /// Raw text at `key`, `None` if nothing is stored there
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the text at `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the entry at `key` (no-op if absent)
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-process store backed by a `HashMap`
///
/// Entry size is counted as key bytes plus value bytes, the way browsers
/// account LocalStorage usage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    /// Total byte limit across all entries (`None` = unlimited)
    quota: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryStore {
    /// Create an empty, unlimited store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes past `bytes` total
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::default()
        }
    }

    /// Make every operation fail with [`StoreError::Unavailable`]
    pub fn disable(&self) {
        self.disabled.set(true);
    }

    /// Undo [`disable`](Self::disable)
    pub fn enable(&self) {
        self.disabled.set(false);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Bytes currently used (keys + values)
    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn check_enabled(&self) -> Result<(), StoreError> {
        if self.disabled.get() {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_enabled()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_enabled()?;

        if let Some(limit) = self.quota {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit: Some(limit),
                });
            }
        }

        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.check_enabled()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store adapter that prefixes every key with a fixed namespace
///
/// Keeps several applications (or several builds of one) from trampling each
/// other's slots in a shared origin-wide store.
#[derive(Debug)]
pub struct Namespaced<S> {
    inner: S,
    prefix: String,
}

impl<S: Store> Namespaced<S> {
    pub fn new(inner: S, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S: Store> Store for Namespaced<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(&self.full_key(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(&self.full_key(key), value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(&self.full_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_set_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "\"dark\"").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"dark\""));
        assert_eq!(store.len(), 1);

        store.remove("theme").unwrap();
        assert!(store.is_empty());
        // Removing a missing key is fine
        store.remove("theme").unwrap();
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.set("k", "12345").unwrap(); // 6 bytes
        assert_eq!(store.used_bytes(), 6);

        let err = store.set("j", "12345").unwrap_err(); // would be 12
        assert_eq!(
            err,
            StoreError::QuotaExceeded {
                key: "j".to_string(),
                needed: 12,
                limit: Some(10),
            }
        );
        // Rejected write leaves the store untouched
        assert_eq!(store.get("j").unwrap(), None);

        // Replacing an entry only counts the difference
        store.set("k", "123456789").unwrap(); // 10 bytes
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_memory_store_disable() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.disable();
        assert_eq!(store.get("a"), Err(StoreError::Unavailable));
        assert_eq!(store.set("a", "2"), Err(StoreError::Unavailable));
        assert_eq!(store.remove("a"), Err(StoreError::Unavailable));

        store.enable();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_namespaced_prefixes_keys() {
        let backing = Rc::new(MemoryStore::new());
        let store = Namespaced::new(Rc::clone(&backing), "app_");
        assert_eq!(store.prefix(), "app_");

        store.set("theme", "\"light\"").unwrap();
        assert_eq!(backing.get("app_theme").unwrap().as_deref(), Some("\"light\""));
        assert_eq!(backing.get("theme").unwrap(), None);
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("\"light\""));

        store.remove("theme").unwrap();
        assert!(backing.is_empty());
    }

    #[test]
    fn test_rc_store_shares_entries() {
        let store: Rc<dyn Store> = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);
        store.set("x", "1").unwrap();
        assert_eq!(other.get("x").unwrap().as_deref(), Some("1"));
    }
}
