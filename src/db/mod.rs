// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer: a small key-value store holding JSON snapshots.

pub mod file;
pub mod memory;
pub mod snapshot;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Storage keys as constants.
pub mod keys {
    /// The serialized workout collection
    pub const WORKOUTS: &str = "workouts";
}

/// Key-value storage for snapshots.
///
/// Writes are synchronous and assumed atomic; a failed write is reported to
/// the caller and never retried here.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove every key this store holds.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("Failed to encode snapshot: {0}")]
    Encode(String),
}
