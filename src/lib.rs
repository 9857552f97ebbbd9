//! Customer API resource library for Rust.
//!
//! Provides async create, read, update, delete and list operations over shop
//! customers, with role based access control, field validation and pluggable
//! storage backends.
//!
//! # Core Components
//!
//! - [`CustomerResource`] - The API resource callers talk to
//! - [`ModelManager`] - Entity mapping, unit of work and cascades
//! - [`StorageProvider`](storage::StorageProvider) - Trait for storage backends
//! - [`Acl`] - Access control seam, with [`StaticAcl`] as a ready implementation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use customer_resource::{CustomerResource, ModelManager};
//! use customer_resource::models::{CustomerGroup, Shop};
//! use customer_resource::storage::InMemoryStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Arc::new(ModelManager::new(InMemoryStorage::new()));
//! manager.save_customer_group(CustomerGroup::new(1, "EK", "Shopkunden")).await?;
//! manager.save_shop(Shop::new(1, "Main", "EK")).await?;
//!
//! let resource = CustomerResource::new(manager);
//! let page = resource.get_list(&Default::default()).await?;
//! assert_eq!(page.total, 0);
//! # Ok(())
//! # }
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod resource;
pub mod storage;

// Re-export commonly used types for convenience
pub use acl::{Acl, Privilege, StaticAcl};
pub use config::ResourceConfig;
pub use error::{ApiError, ApiResult, ValidationError, ValidationErrors};
pub use manager::ModelManager;
pub use models::{Customer, CustomerGroup, Shop};
pub use resource::{
    CustomerResource, HydrationMode, Hydrated, Identifier, ListQuery, ListResult, ResourceContext,
};
