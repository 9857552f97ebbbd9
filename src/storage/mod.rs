//! Storage abstraction layer for entity rows.
//!
//! This module separates persistence from the entity mapping done by
//! [`ModelManager`](crate::manager::ModelManager). The `StorageProvider` trait
//! defines pure data operations on JSON rows, keyed by entity name and numeric id,
//! so backends can be swapped without touching customer logic.
//!
//! # Architecture
//!
//! The storage layer is responsible for:
//! - PUT/GET/DELETE operations on JSON rows
//! - Named, monotonically increasing sequences (row ids, number ranges)
//! - Applying a batch of writes atomically
//! - Basic attribute lookup and counting
//!
//! The storage layer is NOT responsible for:
//! - Mapping rows to entities or hydrating associations
//! - Validation or uniqueness rules
//! - Authorization
//!
//! # Example Usage
//!
//! ```rust
//! use customer_resource::storage::{InMemoryStorage, StorageKey, StorageOp, StorageProvider};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = InMemoryStorage::new();
//!
//! let id = storage.next_sequence("customer").await?;
//! let key = StorageKey::new("customer", id);
//! storage
//!     .apply(vec![StorageOp::Put(key.clone(), json!({"id": id, "email": "a@b.de"}))])
//!     .await?;
//!
//! assert!(storage.get(key.clone()).await?.is_some());
//! assert!(storage.delete(key).await?);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod in_memory;

pub use errors::StorageError;
pub use in_memory::{InMemoryStorage, InMemoryStorageStats};

use serde_json::Value;
use std::fmt;
use std::future::Future;

/// Key of a single row: `entity` → `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    entity: String,
    id: u64,
}

impl StorageKey {
    /// Create a new storage key.
    pub fn new(entity: impl Into<String>, id: u64) -> Self {
        Self {
            entity: entity.into(),
            id,
        }
    }

    /// Get the entity name.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Get the row id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Create a prefix for listing all rows of an entity.
    pub fn prefix(entity: impl Into<String>) -> StoragePrefix {
        StoragePrefix {
            entity: entity.into(),
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.id)
    }
}

/// A prefix selecting every row of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePrefix {
    entity: String,
}

impl StoragePrefix {
    /// Get the entity name.
    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl fmt::Display for StoragePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity)
    }
}

/// A single write inside an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageOp {
    /// Insert or replace the row at the key.
    Put(StorageKey, Value),
    /// Remove the row at the key, if present.
    Delete(StorageKey),
}

impl StorageOp {
    /// The key this operation touches.
    pub fn key(&self) -> &StorageKey {
        match self {
            StorageOp::Put(key, _) | StorageOp::Delete(key) => key,
        }
    }
}

/// Core trait for storage providers that handle pure row persistence.
///
/// # Key Design Decisions
///
/// - **No separate CREATE/UPDATE**: both are a PUT. Whether a write creates or
///   replaces is decided by the entity manager.
/// - **Batches are atomic**: [`apply`](Self::apply) either writes every
///   operation or none, and readers never observe a partially applied batch.
/// - **Sequences never repeat**: a value returned by
///   [`next_sequence`](Self::next_sequence) is never handed out again, even if
///   the row using it is deleted.
pub trait StorageProvider: Send + Sync {
    /// The error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store a row at the key and return the stored data.
    ///
    /// An existing row at the same key is replaced.
    fn put(
        &self,
        key: StorageKey,
        data: Value,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;

    /// Retrieve a row by key.
    fn get(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send;

    /// Delete a row by key.
    ///
    /// Returns `true` if the row existed.
    fn delete(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// List rows of an entity ordered by id, with pagination.
    ///
    /// An `offset` past the end or a `limit` of 0 yields an empty vector.
    fn list(
        &self,
        prefix: StoragePrefix,
        offset: usize,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Find rows whose attribute at a dotted path equals `value`.
    ///
    /// Matching is exact on the string rendering of scalars. Results are ordered
    /// by id.
    fn find_by_attribute(
        &self,
        prefix: StoragePrefix,
        attribute: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<(StorageKey, Value)>, Self::Error>> + Send;

    /// Check if a row exists.
    fn exists(&self, key: StorageKey) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Count the rows of an entity.
    fn count(
        &self,
        prefix: StoragePrefix,
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;

    /// Increment the named sequence and return the new value. Sequences start at 1.
    fn next_sequence(&self, name: &str)
    -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Apply a batch of writes atomically, in order.
    fn apply(
        &self,
        batch: Vec<StorageOp>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Remove every row and reset every sequence.
    fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
