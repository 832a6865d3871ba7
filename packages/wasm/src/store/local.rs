//! Browser `localStorage` backend.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use super::{PositionStore, decode, encode};
use crate::error::StoreError;
use crate::geometry::PositionMap;

/// Snapshots kept in the window's `localStorage`.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the window's local storage. Fails when there is no window or
    /// storage is disabled (private browsing, sandboxed iframes).
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = window
            .local_storage()
            .ok()
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl PositionStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<PositionMap>, StoreError> {
        let text = self.storage.get_item(key).map_err(|err| StoreError::Read {
            key: key.to_string(),
            reason: reason(err),
        })?;
        text.as_deref().map(decode).transpose()
    }

    fn set(&mut self, key: &str, positions: &PositionMap) -> Result<(), StoreError> {
        let text = encode(positions)?;
        self.storage.set_item(key, &text).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: reason(err),
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(|err| StoreError::Write {
            key: key.to_string(),
            reason: reason(err),
        })
    }
}
