//! Domain entities managed by the [`ModelManager`](crate::manager::ModelManager).

pub mod attribute;
pub mod customer;
pub mod shop;

pub use attribute::Attribute;
pub use customer::{AccountMode, Billing, Customer, Debit, Shipping};
pub use shop::{CustomerGroup, Shop};
