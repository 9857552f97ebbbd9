//! The customer API resource and its supporting types.
//!
//! # Key Components
//!
//! * [`CustomerResource`] - CRUD operations over customers with ACL checks
//! * [`ResourceContext`] - Role and ACL of the caller
//! * [`Hydrated`] - Records in array or object form, see [`HydrationMode`]
//! * [`ListQuery`] - Paging, criteria and ordering for list operations
//! * [`Identifier`] - Ids as received from callers
//! * [`PasswordEncoder`] - Password hashing seam

pub mod context;
pub mod customer;
pub mod hydration;
pub mod identifier;
pub mod password;
pub(crate) mod payload;
pub mod query;
pub mod validation;

pub use context::ResourceContext;
pub use customer::CustomerResource;
pub use hydration::{HydrationMode, Hydrated, ListResult};
pub use identifier::Identifier;
pub use password::{PasswordEncoder, Sha256PasswordEncoder};
pub use query::{ListQuery, SortDirection};
