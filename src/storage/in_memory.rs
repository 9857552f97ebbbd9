//! In-memory storage implementation for entity rows.
//!
//! Thread-safe implementation of [`StorageProvider`] using ordered maps behind a
//! tokio `RwLock`. Suitable for tests, development and fixtures where
//! persistence is not required.
//!
//! # Performance Characteristics
//!
//! * PUT/GET/DELETE: O(log n)
//! * LIST with pagination: O(offset + limit)
//! * FIND_BY_ATTRIBUTE: O(n) with JSON path traversal
//! * APPLY: O(batch) under a single write lock

use crate::storage::{StorageError, StorageKey, StorageOp, StoragePrefix, StorageProvider};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    // entity -> id -> row
    rows: HashMap<String, BTreeMap<u64, Value>>,
    sequences: HashMap<String, u64>,
}

/// Thread-safe in-memory storage.
///
/// Cloning is cheap and clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStorage {
    /// Create a new empty in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage statistics for debugging and monitoring.
    pub async fn stats(&self) -> InMemoryStorageStats {
        let tables = self.tables.read().await;
        let entity_count = tables.rows.values().filter(|rows| !rows.is_empty()).count();
        let total_rows = tables.rows.values().map(BTreeMap::len).sum();

        InMemoryStorageStats {
            entity_count,
            total_rows,
            sequence_count: tables.sequences.len(),
        }
    }

    /// Extract a nested attribute value from JSON data using dot notation.
    fn extract_attribute_value(data: &Value, attribute_path: &str) -> Option<String> {
        let mut current = data;

        for part in attribute_path.split('.') {
            if let Ok(index) = part.parse::<usize>() {
                current = current.get(index)?;
            } else {
                current = current.get(part)?;
            }
        }

        match current {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl StorageProvider for InMemoryStorage {
    type Error = StorageError;

    async fn put(&self, key: StorageKey, data: Value) -> Result<Value, Self::Error> {
        let mut tables = self.tables.write().await;
        tables
            .rows
            .entry(key.entity().to_string())
            .or_default()
            .insert(key.id(), data.clone());

        Ok(data)
    }

    async fn get(&self, key: StorageKey) -> Result<Option<Value>, Self::Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .rows
            .get(key.entity())
            .and_then(|rows| rows.get(&key.id()))
            .cloned())
    }

    async fn delete(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let mut tables = self.tables.write().await;

        Ok(tables
            .rows
            .get_mut(key.entity())
            .is_some_and(|rows| rows.remove(&key.id()).is_some()))
    }

    async fn list(
        &self,
        prefix: StoragePrefix,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let tables = self.tables.read().await;
        let Some(rows) = tables.rows.get(prefix.entity()) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(id, data)| (StorageKey::new(prefix.entity(), *id), data.clone()))
            .collect())
    }

    async fn find_by_attribute(
        &self,
        prefix: StoragePrefix,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<(StorageKey, Value)>, Self::Error> {
        let tables = self.tables.read().await;
        let Some(rows) = tables.rows.get(prefix.entity()) else {
            return Ok(Vec::new());
        };

        Ok(rows
            .iter()
            .filter(|(_, data)| {
                Self::extract_attribute_value(data, attribute).as_deref() == Some(value)
            })
            .map(|(id, data)| (StorageKey::new(prefix.entity(), *id), data.clone()))
            .collect())
    }

    async fn exists(&self, key: StorageKey) -> Result<bool, Self::Error> {
        let tables = self.tables.read().await;

        Ok(tables
            .rows
            .get(key.entity())
            .is_some_and(|rows| rows.contains_key(&key.id())))
    }

    async fn count(&self, prefix: StoragePrefix) -> Result<usize, Self::Error> {
        let tables = self.tables.read().await;

        Ok(tables.rows.get(prefix.entity()).map_or(0, BTreeMap::len))
    }

    async fn next_sequence(&self, name: &str) -> Result<u64, Self::Error> {
        let mut tables = self.tables.write().await;
        let value = tables.sequences.entry(name.to_string()).or_insert(0);
        *value += 1;

        Ok(*value)
    }

    async fn apply(&self, batch: Vec<StorageOp>) -> Result<(), Self::Error> {
        let mut tables = self.tables.write().await;

        for op in batch {
            match op {
                StorageOp::Put(key, data) => {
                    tables
                        .rows
                        .entry(key.entity().to_string())
                        .or_default()
                        .insert(key.id(), data);
                }
                StorageOp::Delete(key) => {
                    if let Some(rows) = tables.rows.get_mut(key.entity()) {
                        rows.remove(&key.id());
                    }
                }
            }
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), Self::Error> {
        let mut tables = self.tables.write().await;
        tables.rows.clear();
        tables.sequences.clear();

        Ok(())
    }
}

/// Statistics about the current state of in-memory storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryStorageStats {
    /// Number of entities holding at least one row
    pub entity_count: usize,
    /// Total number of rows across entities
    pub total_rows: usize,
    /// Number of sequences that have been used
    pub sequence_count: usize,
}
