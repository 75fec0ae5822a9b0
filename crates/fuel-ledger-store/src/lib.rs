//! # Fuel Ledger Store
//!
//! Key-value persistence port for the fuel ledger. Provides a trait-based
//! interface for slot storage with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The ledger persists its state as JSON text under three logical keys.
//! This crate abstracts that key-value surface behind the [`KvStore`]
//! trait, allowing the ledger to be storage-agnostic. The primary
//! implementation is [`SqliteKv`], with [`MemoryKv`] for testing.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait for slot reads and writes
//! - [`KvStoreExt`] - Typed JSON access on top of the raw slots
//! - [`SqliteKv`] - SQLite-based persistent storage
//! - [`MemoryKv`] - In-memory storage for tests, with an optional quota
//!
//! ## Design Notes
//!
//! - **Last write wins**: There is no transaction spanning keys and no
//!   guard against two handles racing on one slot; the later write stands.
//! - **No internal retries**: A rejected write surfaces immediately as a
//!   [`StoreError`].

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;
pub use traits::{KvStore, KvStoreExt};
