//! Browser `localStorage` backend for the core key/value contract.
use runledger_core::KeyValueStore;
use web_sys::Storage;

/// Web-specific storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("No window object available")]
    NoWindow,
    #[error("localStorage is disabled for this origin")]
    Unavailable,
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LocalStorageStore {
    fn storage() -> Result<Storage, WebStorageError> {
        let window = web_sys::window().ok_or(WebStorageError::NoWindow)?;
        window
            .local_storage()
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))?
            .ok_or(WebStorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorageStore {
    type Error = WebStorageError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        // Quota errors surface here.
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| WebStorageError::Storage(format!("{e:?}")))
    }
}
