//! Key-value persistence for OmniCart documents.
//!
//! # Layout
//!
//! Every logical collection lives under a single string key and is stored as
//! one JSON document:
//!
//! - `omnicart_custom_products` - Locally created or edited products
//! - `omnicart_deleted_product_ids` - Tombstoned product ids
//! - `omnicart_cart_{user}` / `omnicart_wishlist_{user}` - Per-user lists
//! - `omnicart_orders` / `omnicart_shipments` - Global order and shipment lists
//! - `omnicart_ads` - Promotional ads
//! - `omnicart_preferences_{user}` - UI preference scalars
//!
//! # Backends
//!
//! - [`MemoryStore`] - In-process map (tests, ephemeral runs)
//! - [`FileStore`] - One file per key with a journal for multi-key batches
//!
//! Typed access goes through [`Documents`], which adds versioned envelopes,
//! legacy migration, and serialized read-modify-write.

mod documents;
mod file;
pub mod keys;
mod memory;
mod schema;

pub use documents::{CURRENT_VERSION, Documents, MigrationReport, Transaction};
pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// The stored document cannot be decoded by this build, so it is never
    /// overwritten.
    #[error("stored document {0} is unreadable and will not be overwritten")]
    Unreadable(String),

    /// A blocking storage task panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}

/// Run blocking storage work on the runtime's blocking thread pool.
///
/// Backends do synchronous file I/O under a process-wide lock; async callers
/// go through here instead of calling them on a runtime worker.
///
/// # Errors
///
/// Propagates the error returned by `f`, or `StoreError::Task` if the task
/// panicked.
pub async fn blocking<R, E, F>(f: F) -> Result<R, E>
where
    F: FnOnce() -> Result<R, E> + Send + 'static,
    R: Send + 'static,
    E: From<StoreError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| E::from(StoreError::Task(e.to_string())))?
}

/// A single write inside a [`Batch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BatchOp {
    Set { key: String, value: String },
    Remove { key: String },
}

impl BatchOp {
    /// The key this operation touches.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }
}

/// An ordered group of writes applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    ops: Vec<BatchOp>,
}

impl Batch {
    /// Create an empty batch.
    #[must_use]
    pub const fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Queue a write of `value` under `key`.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(BatchOp::Set {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue removal of `key`.
    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.ops.push(BatchOp::Remove { key: key.into() });
        self
    }

    /// Append an already-built operation.
    pub fn push(&mut self, op: BatchOp) {
        self.ops.push(op);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Operations in application order.
    #[must_use]
    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Minimal capability every storage backend provides.
///
/// Values are opaque strings; callers own the encoding. Implementations must
/// apply a [`Batch`] atomically: after a crash either every operation in the
/// batch is visible or none is.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every operation in `batch` atomically.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn apply(&self, batch: Batch) -> Result<(), StoreError>;

    /// List every key currently stored, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Write a single value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.apply(Batch::new().set(key, value))
    }

    /// Remove a single key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.apply(Batch::new().remove(key))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_preserves_order() {
        let batch = Batch::new().set("a", "1").remove("b").set("c", "3");
        let keys: Vec<&str> = batch.ops().iter().map(BatchOp::key).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert_eq!(batch.len(), 3);
    }

    #[tokio::test]
    async fn test_blocking_runs_off_the_worker() {
        let worker = std::thread::current().id();
        let ran_on = blocking(move || Ok::<_, StoreError>(std::thread::current().id()))
            .await
            .unwrap();
        assert_ne!(ran_on, worker);
    }

    #[tokio::test]
    async fn test_blocking_reports_panics() {
        let result: Result<(), StoreError> = blocking(|| panic!("boom")).await;
        assert!(matches!(result, Err(StoreError::Task(_))));
    }

    #[test]
    fn test_batch_op_serializes_tagged() {
        let op = BatchOp::Remove {
            key: "omnicart_orders".to_string(),
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"op":"remove","key":"omnicart_orders"}"#);
    }
}
