//! In-memory position store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::{PositionStore, decode, encode};
use crate::error::StoreError;
use crate::geometry::PositionMap;

/// Keeps snapshots as serialized text, the same way browser storage does.
///
/// Clones share their entries, so a host can keep a handle to a store it gave
/// to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Store raw text under `key`, bypassing encoding.
    pub fn insert_raw(&self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.borrow_mut().insert(key.into(), text.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PositionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<PositionMap>, StoreError> {
        self.entries
            .borrow()
            .get(key)
            .map(|text| decode(text))
            .transpose()
    }

    fn set(&mut self, key: &str, positions: &PositionMap) -> Result<(), StoreError> {
        let text = encode(positions)?;
        self.entries.borrow_mut().insert(key.to_string(), text);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
