//! Result hydration: plain array form vs. domain objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::storage::StorageError;

/// How read operations return records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HydrationMode {
    /// Plain JSON structure (the serde form of the entity)
    #[default]
    Array,
    /// The domain object itself
    Object,
}

/// A record returned in the configured [`HydrationMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Hydrated<T> {
    Array(Value),
    Object(T),
}

impl<T: Serialize> Hydrated<T> {
    /// Render an entity in the requested mode.
    pub fn hydrate(entity: T, mode: HydrationMode) -> ApiResult<Self> {
        match mode {
            HydrationMode::Object => Ok(Hydrated::Object(entity)),
            HydrationMode::Array => serde_json::to_value(&entity)
                .map(Hydrated::Array)
                .map_err(|e| ApiError::from(StorageError::from(e))),
        }
    }
}

impl<T> Hydrated<T> {
    pub fn is_object(&self) -> bool {
        matches!(self, Hydrated::Object(_))
    }

    pub fn as_array(&self) -> Option<&Value> {
        match self {
            Hydrated::Array(value) => Some(value),
            Hydrated::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&T> {
        match self {
            Hydrated::Object(entity) => Some(entity),
            Hydrated::Array(_) => None,
        }
    }

    pub fn into_array(self) -> Option<Value> {
        match self {
            Hydrated::Array(value) => Some(value),
            Hydrated::Object(_) => None,
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self {
            Hydrated::Object(entity) => Some(entity),
            Hydrated::Array(_) => None,
        }
    }
}

/// One page of a list operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ListResult<T> {
    /// Records on this page
    pub data: Vec<Hydrated<T>>,
    /// Records matching the criteria across all pages
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Sample {
        id: u64,
    }

    #[test]
    fn test_hydrate_modes() {
        let array = Hydrated::hydrate(Sample { id: 3 }, HydrationMode::Array).unwrap();
        assert!(!array.is_object());
        assert_eq!(array.as_array(), Some(&json!({"id": 3})));
        assert!(array.as_object().is_none());

        let object = Hydrated::hydrate(Sample { id: 3 }, HydrationMode::Object).unwrap();
        assert!(object.is_object());
        assert_eq!(object.into_object(), Some(Sample { id: 3 }));
    }

    #[test]
    fn test_mode_serde() {
        let mode: HydrationMode = serde_json::from_str("\"object\"").unwrap();
        assert_eq!(mode, HydrationMode::Object);
        assert_eq!(HydrationMode::default(), HydrationMode::Array);
    }
}
