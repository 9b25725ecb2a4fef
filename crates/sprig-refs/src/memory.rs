//! In-memory reference store for testing and ephemeral use.
//!
//! [`InMemoryRefStore`] stores all refs in a `BTreeMap` protected by a
//! `RwLock`. It implements the full [`RefStore`] trait and is suitable for
//! unit tests and short-lived processes.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::Result;
use crate::traits::RefStore;
use crate::types::RefValue;

/// An in-memory implementation of [`RefStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    refs: RwLock<BTreeMap<String, RefValue>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_raw(&self, name: &str) -> Result<Option<RefValue>> {
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs.get(name).cloned())
    }

    fn write_raw(&self, name: &str, value: &RefValue) -> Result<()> {
        let mut refs = self.refs.write().expect("lock poisoned");
        refs.insert(name.to_string(), value.clone());
        Ok(())
    }

    fn ref_names(&self) -> Result<Vec<String>> {
        let refs = self.refs.read().expect("lock poisoned");
        Ok(refs.keys().cloned().collect())
    }
}
