//! Shops and customer groups: reference data a customer points at.

use serde::{Deserialize, Serialize};

/// A sales channel. Customer emails are unique per shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: u64,
    pub name: String,
    /// Group assigned to customers created without an explicit group.
    pub customer_group_key: String,
}

impl Shop {
    pub fn new(id: u64, name: impl Into<String>, customer_group_key: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            customer_group_key: customer_group_key.into(),
        }
    }
}

/// A pricing/permission group customers belong to, addressed by its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerGroup {
    pub id: u64,
    pub key: String,
    pub name: String,
}

impl CustomerGroup {
    pub fn new(id: u64, key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            name: name.into(),
        }
    }
}
