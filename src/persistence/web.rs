//! Browser Web Storage backend

use wasm_bindgen::JsValue;
use web_sys::Storage;

use super::{KeyValueStore, StorageError};

/// `localStorage` or `sessionStorage` of the current window
pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    /// Persistent storage (survives reloads)
    pub fn local() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }

    /// Tab-scoped storage, used for the player identity
    pub fn session() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn backend_error(err: JsValue) -> StorageError {
    StorageError::Backend(format!("{err:?}"))
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(backend_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(backend_error)
    }
}
