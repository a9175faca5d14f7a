//! Single-setting persistence.
//!
//! The only thing persisted between visits is the user's API key. The
//! [`KeyValueStore`] trait is the seam: the browser build backs it with
//! `localStorage`, native code and tests use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A string key-value store.
///
/// Implementations swallow their own failures (quota exceeded, storage
/// disabled): persistence is best effort and never blocks the crop flow.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// The user's API key, kept in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CredentialStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Stored value, or an empty string when nothing was saved.
    pub fn load(&self) -> String {
        self.store.get(&self.key).unwrap_or_default()
    }

    /// Persist `value`. Empty values are stored too, clearing the key.
    pub fn save(&self, value: &str) {
        self.store.set(&self.key, value);
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}
