//! KvStore trait: the abstract interface for slot persistence.
//!
//! This trait keeps the ledger storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests). The surface is deliberately
//! narrow: string keys, string values, `get`/`set`. There is no transaction
//! spanning multiple keys; two handles racing on a slot resolve
//! last-write-wins.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// The KvStore trait: async interface for slot persistence.
///
/// All methods are async to support both sync (SQLite via `spawn_blocking`)
/// and genuinely async backends.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value at `key`. Returns `None` when the key was never
    /// written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` at `key`, replacing any prior value.
    ///
    /// A rejected write (capacity, I/O) surfaces as an error; nothing is
    /// retried.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Extension trait for typed JSON access to slots.
pub trait KvStoreExt: KvStore {
    /// Read and JSON-decode the value at `key`.
    ///
    /// A missing key is `Ok(None)`; a value that fails to parse is
    /// [`StoreError::Corrupt`], leaving the fail-open/fail-closed choice
    /// to the caller.
    fn get_json<T>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<T>>> + Send
    where
        T: DeserializeOwned + Send;

    /// JSON-encode `value` and write it to `key`.
    fn set_json<T>(
        &self,
        key: &str,
        value: &T,
    ) -> impl std::future::Future<Output = Result<()>> + Send
    where
        T: Serialize + Sync;
}

impl<S: KvStore + ?Sized> KvStoreExt for S {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                    key: key.to_string(),
                    source,
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value).map_err(StoreError::Serialization)?;
        self.set(key, &raw).await
    }
}
