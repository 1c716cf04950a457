//! Browser `localStorage` backend (WASM only).

use super::Storage;
use crate::error::SessionError;

/// Key/value storage over `window.localStorage`.
///
/// Holds no handle: the storage object is looked up on every call, which
/// keeps this type `Send + Sync` like the other backends.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebStorage;

impl WebStorage {
    pub fn new() -> Self {
        Self
    }

    fn local_storage() -> Result<web_sys::Storage, SessionError> {
        web_sys::window()
            .ok_or_else(|| SessionError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| SessionError::Unavailable("localStorage disabled".to_string()))
    }
}

fn js_error(value: wasm_bindgen::JsValue) -> SessionError {
    SessionError::Unavailable(format!("{:?}", value))
}

impl Storage for WebStorage {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Self::local_storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        Self::local_storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        Self::local_storage()?.remove_item(key).map_err(js_error)
    }
}
