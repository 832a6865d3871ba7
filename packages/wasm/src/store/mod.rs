//! Persistence of node positions between page views.
//!
//! A [`PositionStore`] is a keyed map from session key to a snapshot of node
//! positions. Backends may fail; callers log failures and carry on.

#[cfg(target_arch = "wasm32")]
mod local;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::geometry::PositionMap;

/// Prefix of every key written by a layout session.
pub const KEY_PREFIX: &str = "network-graph-pos-";

/// The storage key for a container.
pub fn session_key(container_id: &str) -> String {
    format!("{KEY_PREFIX}{container_id}")
}

/// Backend for saved layouts.
pub trait PositionStore {
    /// Saved positions under `key`, or `None` when nothing was saved.
    fn get(&self, key: &str) -> Result<Option<PositionMap>, StoreError>;

    /// Replace the snapshot under `key`.
    fn set(&mut self, key: &str, positions: &PositionMap) -> Result<(), StoreError>;

    /// Forget `key`. Removing a missing key succeeds.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Decode a stored snapshot, dropping entries with non-finite coordinates.
pub(crate) fn decode(text: &str) -> Result<PositionMap, StoreError> {
    let mut positions: PositionMap = serde_json::from_str(text)?;
    positions.retain(|_, at| at.is_finite());
    Ok(positions)
}

pub(crate) fn encode(positions: &PositionMap) -> Result<String, StoreError> {
    Ok(serde_json::to_string(positions)?)
}
