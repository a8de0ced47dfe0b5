//! Durable snapshots of store state.
//!
//! # Layout
//!
//! Each store owns one key in a [`KeyValueStorage`] backend and writes its
//! full state there as a JSON array after every mutation:
//!
//! - cart key (`nexis_cart`) - array of `{id, name, price, image, quantity}`
//! - wishlist key (`nexis_wishlist`) - array of canonical product ID strings
//!
//! # Failure taxonomy
//!
//! - `StorageUnavailable` - no backend in this context; stores run memory-only
//! - `CorruptPayload` - stored value is not a JSON array; treated as empty
//! - `ElementInvalid` - one array element fails validation; dropped alone

mod file;
mod snapshot;
mod storage;

pub use file::FileStorage;
pub use snapshot::{Hydrated, InvalidElement, Lifecycle, SnapshotAdapter, SnapshotElement};
pub use storage::{KeyValueStorage, MemoryStorage, StorageError};

use thiserror::Error;

/// Errors from the snapshot adapter.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// There is no durable storage in this execution context.
    #[error("storage unavailable")]
    StorageUnavailable,

    /// The stored value could not be decoded into a JSON array.
    #[error("corrupt payload under {key}: {reason}")]
    CorruptPayload { key: String, reason: String },

    /// A single element failed validation and was dropped.
    #[error("invalid element at index {index}: {reason}")]
    ElementInvalid {
        index: usize,
        reason: InvalidElement,
    },

    /// The storage backend failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// State could not be encoded as JSON.
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
