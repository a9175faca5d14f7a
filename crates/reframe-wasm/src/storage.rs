//! `localStorage` implementation of the key-value seam.

use reframe_core::storage::KeyValueStore;
use web_sys::Storage;

/// Browser `window.localStorage`.
///
/// When storage is unavailable (private mode, sandboxed iframe) reads return
/// nothing and writes are dropped with a warning.
#[derive(Debug, Clone)]
pub struct WebStorage {
    storage: Option<Storage>,
}

impl WebStorage {
    pub fn local() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable; API key will not be remembered");
        }
        Self { storage }
    }
}

impl KeyValueStore for WebStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                log::warn!("Failed to persist {}: {:?}", key, e);
            }
        }
    }
}
