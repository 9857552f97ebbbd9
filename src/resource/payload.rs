//! Input payloads for create and update.
//!
//! Every field is optional: absent keys leave the entity untouched, which gives
//! update its merge semantics. Values that parse structurally but are invalid
//! (bad dates, unknown account modes) are collected as violations instead of
//! failing the parse.

use crate::error::{ApiResult, ValidationError, ValidationErrors};
use crate::models::{AccountMode, Attribute, Billing, Customer, Debit, Shipping};
use crate::resource::password::PasswordEncoder;
use crate::resource::validation::{parse_date, parse_datetime};
use serde::{Deserialize, Deserializer, de};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CustomerData {
    pub email: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
    pub account_mode: Option<i64>,
    pub newsletter: Option<bool>,
    pub internal_comment: Option<String>,
    #[serde(alias = "firstlogin")]
    pub first_login: Option<String>,
    #[serde(alias = "lastlogin")]
    pub last_login: Option<String>,
    #[serde(default, deserialize_with = "numeric_id")]
    pub shop_id: Option<u64>,
    pub group_key: Option<String>,
    pub billing: Option<BillingData>,
    pub shipping: Option<ShippingData>,
    pub debit: Option<DebitData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BillingData {
    pub salutation: Option<String>,
    pub company: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<String>,
    pub attribute: Option<Attribute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShippingData {
    pub salutation: Option<String>,
    pub company: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub zip_code: Option<String>,
    pub city: Option<String>,
    pub attribute: Option<Attribute>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DebitData {
    pub account: Option<String>,
    pub bank_code: Option<String>,
    pub bank_name: Option<String>,
    pub account_holder: Option<String>,
}

/// Accept an id as a JSON number or a numeric string.
fn numeric_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid id '{}'", text))),
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl CustomerData {
    /// Parse a JSON payload. `null` counts as an empty payload.
    pub fn from_value(value: Value) -> ApiResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value).map_err(|e| {
                ValidationError::MalformedPayload {
                    message: e.to_string(),
                }
                .into()
            }),
            other => Err(ValidationError::MalformedPayload {
                message: format!("expected a JSON object, got {}", other),
            }
            .into()),
        }
    }

    /// Merge the payload into `customer`. Shop and group are resolved by the
    /// caller and ignored here.
    pub fn apply_to(
        self,
        customer: &mut Customer,
        encoder: &dyn PasswordEncoder,
        errors: &mut ValidationErrors,
    ) {
        set(&mut customer.email, self.email);
        set(&mut customer.active, self.active);
        set(&mut customer.newsletter, self.newsletter);
        set(&mut customer.internal_comment, self.internal_comment);

        match self.password.as_deref() {
            Some("") => errors.push(ValidationError::custom("password", "must not be empty")),
            Some(password) => customer.set_password_hash(encoder.encode(password), encoder.name()),
            None => {}
        }

        if let Some(mode) = self.account_mode {
            match u8::try_from(mode).ok().and_then(|m| AccountMode::try_from(m).ok()) {
                Some(mode) => customer.account_mode = mode,
                None => errors.push(ValidationError::InvalidCanonicalValue {
                    attribute: "accountMode".to_string(),
                    value: mode.to_string(),
                    allowed: AccountMode::ALLOWED.iter().map(u8::to_string).collect(),
                }),
            }
        }

        let first_login = self
            .first_login
            .map(|value| parse_datetime("firstLogin", &value))
            .and_then(|parsed| parsed.map_err(|e| errors.push(e)).ok());
        let last_login = self
            .last_login
            .map(|value| parse_datetime("lastLogin", &value))
            .and_then(|parsed| parsed.map_err(|e| errors.push(e)).ok());

        let is_new = customer.id().is_none();
        if let Some(first_login) = first_login {
            customer.first_login = first_login;
            // A new customer without a last login has not logged in since
            if is_new && last_login.is_none() {
                customer.last_login = first_login;
            }
        } else if let Some(last_login) = last_login.filter(|_| is_new) {
            // A new customer cannot have logged in after its first login
            customer.first_login = customer.first_login.min(last_login);
        }
        set(&mut customer.last_login, last_login);

        if let Some(billing) = self.billing {
            billing.apply_to(&mut customer.billing, errors);
        }
        if let Some(shipping) = self.shipping {
            shipping.apply_to(&mut customer.shipping);
        }
        if let Some(debit) = self.debit {
            debit.apply_to(customer.debit.get_or_insert_with(Debit::default));
        }
    }
}

impl BillingData {
    fn apply_to(self, billing: &mut Billing, errors: &mut ValidationErrors) {
        set(&mut billing.salutation, self.salutation);
        set(&mut billing.company, self.company);
        set(&mut billing.first_name, self.first_name);
        set(&mut billing.last_name, self.last_name);
        set(&mut billing.street, self.street);
        set(&mut billing.zip_code, self.zip_code);
        set(&mut billing.city, self.city);
        set(&mut billing.phone, self.phone);

        match self.birthday.as_deref().map(str::trim) {
            Some("") => billing.birthday = None,
            Some(value) => match parse_date("billing.birthday", value) {
                Ok(date) => billing.birthday = Some(date),
                Err(e) => errors.push(e),
            },
            None => {}
        }

        if let Some(attribute) = self.attribute {
            billing.attribute.merge(attribute);
        }
    }
}

impl ShippingData {
    fn apply_to(self, shipping: &mut Shipping) {
        set(&mut shipping.salutation, self.salutation);
        set(&mut shipping.company, self.company);
        set(&mut shipping.first_name, self.first_name);
        set(&mut shipping.last_name, self.last_name);
        set(&mut shipping.street, self.street);
        set(&mut shipping.zip_code, self.zip_code);
        set(&mut shipping.city, self.city);

        if let Some(attribute) = self.attribute {
            shipping.attribute.merge(attribute);
        }
    }
}

impl DebitData {
    fn apply_to(self, debit: &mut Debit) {
        set(&mut debit.account, self.account);
        set(&mut debit.bank_code, self.bank_code);
        set(&mut debit.bank_name, self.bank_name);
        set(&mut debit.account_holder, self.account_holder);
    }
}
