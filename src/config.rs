//! Resource configuration.
//!
//! Settings can be built in code or deserialized from JSON. Missing keys take
//! their defaults.
//!
//! ```rust
//! use customer_resource::config::ResourceConfig;
//! use customer_resource::resource::HydrationMode;
//!
//! let config = ResourceConfig::from_json(r#"{"resultMode": "object", "listLimit": 50}"#).unwrap();
//! assert_eq!(config.result_mode, HydrationMode::Object);
//! assert_eq!(config.list_limit, 50);
//! assert_eq!(config.default_shop_id, 1);
//! ```

use crate::resource::HydrationMode;
use serde::{Deserialize, Serialize};

/// Settings shared by customer resource operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourceConfig {
    /// Hydration of records returned by read operations
    pub result_mode: HydrationMode,
    /// Flush the unit of work after every mutating operation
    pub auto_flush: bool,
    /// Shop used when a create payload has no `shopId`
    pub default_shop_id: u64,
    /// Page size used when a list query sets no limit
    pub list_limit: usize,
    /// Added to the user number sequence to form customer numbers
    pub number_range_offset: u64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            result_mode: HydrationMode::Array,
            auto_flush: true,
            default_shop_id: 1,
            list_limit: 25,
            number_range_offset: 20000,
        }
    }
}

impl ResourceConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_result_mode(mut self, mode: HydrationMode) -> Self {
        self.result_mode = mode;
        self
    }

    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    pub fn with_default_shop_id(mut self, shop_id: u64) -> Self {
        self.default_shop_id = shop_id;
        self
    }

    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }

    pub fn with_number_range_offset(mut self, offset: u64) -> Self {
        self.number_range_offset = offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResourceConfig::default();
        assert_eq!(config.result_mode, HydrationMode::Array);
        assert!(config.auto_flush);
        assert_eq!(config.default_shop_id, 1);
        assert_eq!(config.list_limit, 25);
        assert_eq!(config.number_range_offset, 20000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ResourceConfig::from_json(r#"{"autoFlush": false}"#).unwrap();
        assert!(!config.auto_flush);
        assert_eq!(config.list_limit, 25);

        assert!(ResourceConfig::from_json(r#"{"resultMode": "xml"}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let config = ResourceConfig::default()
            .with_result_mode(HydrationMode::Object)
            .with_auto_flush(false)
            .with_default_shop_id(2)
            .with_list_limit(10)
            .with_number_range_offset(50000);

        assert_eq!(config.result_mode, HydrationMode::Object);
        assert!(!config.auto_flush);
        assert_eq!(config.default_shop_id, 2);
        assert_eq!(config.list_limit, 10);
        assert_eq!(config.number_range_offset, 50000);
    }
}
