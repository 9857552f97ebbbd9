//! Row layouts persisted through the storage layer.
//!
//! Owned records are stored as their own rows, pointing back at the customer
//! via `customerId`; the customer row holds the forward references.

use crate::models::{AccountMode, Billing, Customer, Debit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub(crate) const CUSTOMER: &str = "customer";
pub(crate) const BILLING: &str = "billing";
pub(crate) const SHIPPING: &str = "shipping";
pub(crate) const DEBIT: &str = "debit";
pub(crate) const SHOP: &str = "shop";
pub(crate) const CUSTOMER_GROUP: &str = "customer_group";

/// Sequence feeding customer numbers.
pub(crate) const NUMBER_RANGE_USER: &str = "number_range.user";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerRow {
    pub id: u64,
    pub email: String,
    pub hashed_password: String,
    pub encoder_name: String,
    pub active: bool,
    pub account_mode: AccountMode,
    pub newsletter: bool,
    pub internal_comment: String,
    pub first_login: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub shop_id: u64,
    pub group_key: String,
    pub billing_id: u64,
    pub shipping_id: u64,
    pub debit_id: Option<u64>,
}

impl CustomerRow {
    /// Build the row for a customer whose identities are all assigned.
    pub fn from_customer(customer: &Customer, id: u64, billing_id: u64, shipping_id: u64) -> Self {
        Self {
            id,
            email: customer.email.clone(),
            hashed_password: customer.hashed_password.clone(),
            encoder_name: customer.encoder_name.clone(),
            active: customer.active,
            account_mode: customer.account_mode,
            newsletter: customer.newsletter,
            internal_comment: customer.internal_comment.clone(),
            first_login: customer.first_login,
            last_login: customer.last_login,
            shop_id: customer.shop.id,
            group_key: customer.group.key.clone(),
            billing_id,
            shipping_id,
            debit_id: customer.debit.as_ref().and_then(Debit::id),
        }
    }
}

/// A record owned by a customer, flattened next to its back reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OwnedRow<T> {
    pub customer_id: u64,
    #[serde(flatten)]
    pub record: T,
}

pub(crate) type BillingRow = OwnedRow<Billing>;
