//! In-memory implementation of the KvStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite but
//! keeps everything in memory with no persistence. An optional byte quota
//! lets tests exercise storage-full failure paths.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::KvStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryKv {
    inner: RwLock<HashMap<String, String>>,
    capacity: Option<usize>,
}

impl MemoryKv {
    /// Create a new empty in-memory store with no quota.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            capacity: None,
        }
    }

    /// Create a store that rejects writes once keys plus values would
    /// exceed `bytes` in total, mirroring browser-profile storage limits.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            capacity: Some(bytes),
        }
    }

    /// Total bytes currently held, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        let inner = self.inner.read().unwrap();
        inner.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap();

        if let Some(limit) = self.capacity {
            let others: usize = inner
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let attempted = others + key.len() + value.len();
            if attempted > limit {
                return Err(StoreError::QuotaExceeded { attempted, limit });
            }
        }

        inner.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
