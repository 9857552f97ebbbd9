//! The customer aggregate and the records it owns.
//!
//! A [`Customer`] always owns one [`Billing`] and one [`Shipping`] record and
//! may own one [`Debit`] record. Identities are assigned by the
//! [`ModelManager`](crate::manager::ModelManager) when the aggregate is
//! persisted and reset to `None` when it is removed.

use crate::models::{Attribute, CustomerGroup, Shop};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether the customer has a full account or checked out as a guest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AccountMode {
    #[default]
    Customer,
    Guest,
}

impl AccountMode {
    pub const ALLOWED: [u8; 2] = [0, 1];
}

impl From<AccountMode> for u8 {
    fn from(mode: AccountMode) -> Self {
        match mode {
            AccountMode::Customer => 0,
            AccountMode::Guest => 1,
        }
    }
}

impl TryFrom<u8> for AccountMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccountMode::Customer),
            1 => Ok(AccountMode::Guest),
            other => Err(format!("unknown account mode {}", other)),
        }
    }
}

/// A shop customer with its owned address and bank records.
///
/// The array form (see [`Hydrated`](crate::resource::Hydrated)) is the serde
/// serialization of this type. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub(crate) id: Option<u64>,
    pub email: String,
    #[serde(skip)]
    pub(crate) hashed_password: String,
    #[serde(skip)]
    pub(crate) encoder_name: String,
    pub active: bool,
    pub account_mode: AccountMode,
    pub newsletter: bool,
    pub internal_comment: String,
    pub first_login: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub shop: Shop,
    pub group: CustomerGroup,
    pub billing: Billing,
    pub shipping: Shipping,
    pub debit: Option<Debit>,
}

impl Customer {
    /// Create a new, not yet persisted customer for a shop and group.
    ///
    /// Defaults: active, full account, no newsletter, first and last login now.
    pub fn new(email: impl Into<String>, shop: Shop, group: CustomerGroup) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            email: email.into(),
            hashed_password: String::new(),
            encoder_name: String::new(),
            active: true,
            account_mode: AccountMode::Customer,
            newsletter: false,
            internal_comment: String::new(),
            first_login: now,
            last_login: now,
            shop,
            group,
            billing: Billing::default(),
            shipping: Shipping::default(),
            debit: None,
        }
    }

    /// Identity assigned by the manager; `None` before persist and after removal.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn hashed_password(&self) -> &str {
        &self.hashed_password
    }

    pub fn encoder_name(&self) -> &str {
        &self.encoder_name
    }

    pub(crate) fn set_password_hash(&mut self, hash: String, encoder_name: &str) {
        self.hashed_password = hash;
        self.encoder_name = encoder_name.to_string();
    }

    /// Reset every identity in the aggregate, leaving a detached snapshot.
    pub(crate) fn detach(&mut self) {
        self.id = None;
        self.billing.id = None;
        self.shipping.id = None;
        if let Some(debit) = self.debit.as_mut() {
            debit.id = None;
        }
    }
}

/// Billing address. Carries the customer number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Billing {
    pub(crate) id: Option<u64>,
    pub(crate) number: String,
    pub salutation: String,
    pub company: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub zip_code: String,
    pub city: String,
    pub phone: String,
    pub birthday: Option<NaiveDate>,
    pub attribute: Attribute,
}

impl Billing {
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Customer number, unique across all customers. Empty until persisted.
    pub fn number(&self) -> &str {
        &self.number
    }
}

/// Shipping address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shipping {
    pub(crate) id: Option<u64>,
    pub salutation: String,
    pub company: String,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub zip_code: String,
    pub city: String,
    pub attribute: Attribute,
}

impl Shipping {
    pub fn id(&self) -> Option<u64> {
        self.id
    }
}

/// Bank details for direct debit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Debit {
    pub(crate) id: Option<u64>,
    pub account: String,
    pub bank_code: String,
    pub bank_name: String,
    pub account_holder: String,
}

impl Debit {
    pub fn id(&self) -> Option<u64> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer() -> Customer {
        Customer::new(
            "max@example.com",
            Shop::new(1, "Main", "EK"),
            CustomerGroup::new(1, "EK", "Shopkunden"),
        )
    }

    #[test]
    fn test_new_customer_defaults() {
        let customer = customer();
        assert_eq!(customer.id(), None);
        assert!(customer.active);
        assert_eq!(customer.account_mode, AccountMode::Customer);
        assert_eq!(customer.first_login, customer.last_login);
        assert!(customer.debit.is_none());
        assert_eq!(customer.billing.number(), "");
    }

    #[test]
    fn test_array_form_hides_password() {
        let mut customer = customer();
        customer.set_password_hash("abc123".to_string(), "sha256");

        let value = serde_json::to_value(&customer).unwrap();
        assert!(value.get("hashedPassword").is_none());
        assert!(value.get("encoderName").is_none());
        assert_eq!(value["accountMode"], json!(0));
        assert_eq!(value["shop"]["id"], json!(1));
        assert_eq!(value["group"]["key"], json!("EK"));
        assert_eq!(value["debit"], json!(null));
    }

    #[test]
    fn test_detach_resets_identities() {
        let mut customer = customer();
        customer.id = Some(5);
        customer.billing.id = Some(6);
        customer.shipping.id = Some(7);
        customer.debit = Some(Debit {
            id: Some(8),
            ..Debit::default()
        });

        customer.detach();

        assert_eq!(customer.id(), None);
        assert_eq!(customer.billing.id(), None);
        assert_eq!(customer.shipping.id(), None);
        assert_eq!(customer.debit.as_ref().and_then(Debit::id), None);
    }

    #[test]
    fn test_account_mode_conversion() {
        assert_eq!(AccountMode::try_from(1), Ok(AccountMode::Guest));
        assert!(AccountMode::try_from(2).is_err());
        assert_eq!(u8::from(AccountMode::Guest), 1);
        assert!(serde_json::from_value::<AccountMode>(json!(3)).is_err());
    }
}
