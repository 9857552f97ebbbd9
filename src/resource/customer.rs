//! The customer API resource.
//!
//! [`CustomerResource`] exposes read, list, create, update and delete over
//! customers. Every operation checks the caller's privilege first, then the
//! identifier, then existence, and only then looks at the payload.
//!
//! # Example Usage
//!
//! ```rust
//! use customer_resource::manager::ModelManager;
//! use customer_resource::models::{CustomerGroup, Shop};
//! use customer_resource::resource::CustomerResource;
//! use customer_resource::storage::InMemoryStorage;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = Arc::new(ModelManager::new(InMemoryStorage::new()));
//! manager.save_customer_group(CustomerGroup::new(1, "EK", "Shopkunden")).await?;
//! manager.save_shop(Shop::new(1, "Main", "EK")).await?;
//!
//! let resource = CustomerResource::new(manager);
//! let customer = resource
//!     .create(json!({
//!         "email": "max@example.com",
//!         "password": "secret",
//!         "billing": {"firstName": "Max", "lastName": "Mustermann"}
//!     }))
//!     .await?;
//!
//! assert_eq!(customer.billing.number(), "20001");
//! let record = resource.get_one(customer.id()).await?;
//! assert_eq!(record.as_array().unwrap()["email"], "max@example.com");
//! # Ok(())
//! # }
//! ```

use crate::acl::{Acl, Privilege};
use crate::config::ResourceConfig;
use crate::error::{ApiError, ApiResult, ValidationErrors};
use crate::manager::ModelManager;
use crate::models::{Customer, CustomerGroup, Shop};
use crate::resource::context::ResourceContext;
use crate::resource::hydration::{HydrationMode, Hydrated, ListResult};
use crate::resource::identifier::{IdLookup, Identifier};
use crate::resource::password::{PasswordEncoder, Sha256PasswordEncoder};
use crate::resource::payload::CustomerData;
use crate::resource::query::ListQuery;
use crate::resource::validation::validate_customer;
use crate::storage::{StorageError, StorageProvider};
use log::{debug, info, trace, warn};
use serde_json::Value;
use std::sync::Arc;

/// API resource for customers, backed by a shared [`ModelManager`].
pub struct CustomerResource<S: StorageProvider> {
    manager: Arc<ModelManager<S>>,
    context: ResourceContext,
    config: ResourceConfig,
    encoder: Arc<dyn PasswordEncoder>,
}

impl<S: StorageProvider> CustomerResource<S> {
    /// Name of this resource in the ACL.
    pub const RESOURCE_NAME: &'static str = "customer";

    /// Create a resource with default configuration and SHA-256 passwords.
    pub fn new(manager: Arc<ModelManager<S>>) -> Self {
        Self {
            manager,
            context: ResourceContext::new(),
            config: ResourceConfig::default(),
            encoder: Arc::new(Sha256PasswordEncoder),
        }
    }

    pub fn with_config(mut self, config: ResourceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_context(mut self, context: ResourceContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_password_encoder(mut self, encoder: Arc<dyn PasswordEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.context.set_role(role);
    }

    pub fn set_acl(&mut self, acl: Arc<dyn Acl>) {
        self.context.set_acl(acl);
    }

    pub fn set_result_mode(&mut self, mode: HydrationMode) {
        self.config.result_mode = mode;
    }

    pub fn result_mode(&self) -> HydrationMode {
        self.config.result_mode
    }

    /// Turn flushing after every mutation on or off.
    pub fn set_auto_flush(&mut self, auto_flush: bool) {
        self.config.auto_flush = auto_flush;
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn context(&self) -> &ResourceContext {
        &self.context
    }

    pub fn manager(&self) -> &Arc<ModelManager<S>> {
        &self.manager
    }

    /// Apply queued changes. Only needed with auto-flush off.
    pub async fn flush(&self) -> ApiResult<usize> {
        self.manager.flush().await
    }

    /// Fetch one customer by id, in the configured result mode.
    pub async fn get_one(&self, id: impl Into<Identifier>) -> ApiResult<Hydrated<Customer>> {
        self.check_privilege(Privilege::Read)?;
        let customer = self.load(id.into()).await?;
        Hydrated::hydrate(customer, self.config.result_mode)
    }

    /// Fetch one customer by its billing number, in the configured result mode.
    pub async fn get_one_by_number(&self, number: &str) -> ApiResult<Hydrated<Customer>> {
        self.check_privilege(Privilege::Read)?;
        let customer = self.load_by_number(number).await?;
        Hydrated::hydrate(customer, self.config.result_mode)
    }

    /// List customers matching the query, one page at a time.
    pub async fn get_list(&self, query: &ListQuery) -> ApiResult<ListResult<Customer>> {
        self.check_privilege(Privilege::Read)?;

        let mut records = Vec::new();
        for customer in self.manager.find_customers().await? {
            let array = serde_json::to_value(&customer)
                .map_err(|e| ApiError::from(StorageError::from(e)))?;
            if query.matches(&array) {
                records.push((array, customer));
            }
        }
        records.sort_by(|(a, _), (b, _)| query.compare(a, b));

        let total = records.len();
        let limit = query.limit.unwrap_or(self.config.list_limit);
        let data = records
            .into_iter()
            .skip(query.offset)
            .take(limit)
            .map(|(array, customer)| match self.config.result_mode {
                HydrationMode::Array => Hydrated::Array(array),
                HydrationMode::Object => Hydrated::Object(customer),
            })
            .collect::<Vec<_>>();

        debug!(
            "Listed {} of {} customers (offset {}, limit {})",
            data.len(),
            total,
            query.offset,
            limit
        );
        Ok(ListResult { data, total })
    }

    /// Create a customer with its billing, shipping and optional debit records.
    pub async fn create(&self, data: Value) -> ApiResult<Customer> {
        self.check_privilege(Privilege::Create)?;
        trace!("Create customer data: {}", data);

        let data = CustomerData::from_value(data)?;
        let shop = self
            .resolve_shop(data.shop_id.unwrap_or(self.config.default_shop_id))
            .await?;
        let group_key = data
            .group_key
            .clone()
            .unwrap_or_else(|| shop.customer_group_key.clone());
        let group = self.resolve_group(&group_key).await?;

        let email = data.email.clone().unwrap_or_default();
        let _guard = self.manager.write_guard().await;
        self.ensure_unique_email(&email, shop.id, None).await?;

        let mut customer = Customer::new(email, shop, group);
        let mut errors = ValidationErrors::new();
        data.apply_to(&mut customer, self.encoder.as_ref(), &mut errors);
        self.validate(&customer, errors)?;

        customer.billing.number = self
            .manager
            .next_customer_number(self.config.number_range_offset)
            .await?;
        self.manager.persist_customer(&mut customer).await?;
        self.flush_if_auto().await?;

        info!(
            "Created customer {:?} with number {} in shop {}",
            customer.id(),
            customer.billing.number(),
            customer.shop.id
        );
        Ok(customer)
    }

    /// Merge `data` into the customer with the given id.
    pub async fn update(&self, id: impl Into<Identifier>, data: Value) -> ApiResult<Customer> {
        self.check_privilege(Privilege::Update)?;
        let customer = self.load(id.into()).await?;
        self.apply_update(customer, data).await
    }

    /// Merge `data` into the customer with the given billing number.
    pub async fn update_by_number(&self, number: &str, data: Value) -> ApiResult<Customer> {
        self.check_privilege(Privilege::Update)?;
        let customer = self.load_by_number(number).await?;
        self.apply_update(customer, data).await
    }

    /// Delete a customer and its owned records.
    ///
    /// Returns the removed customer with every identity reset to `None`.
    pub async fn delete(&self, id: impl Into<Identifier>) -> ApiResult<Customer> {
        self.check_privilege(Privilege::Delete)?;
        let mut customer = self.load(id.into()).await?;
        let id = customer.id();

        self.manager.remove_customer(&mut customer).await?;
        self.flush_if_auto().await?;

        info!("Deleted customer {:?}", id);
        Ok(customer)
    }

    fn check_privilege(&self, privilege: Privilege) -> ApiResult<()> {
        self.context.check_privilege(Self::RESOURCE_NAME, privilege)
    }

    async fn load(&self, id: Identifier) -> ApiResult<Customer> {
        match id.lookup() {
            IdLookup::Missing => Err(ApiError::parameter_missing("id")),
            IdLookup::Unmatchable(raw) => {
                debug!("Identifier '{}' can never match a customer", raw);
                Err(ApiError::not_found(format!("Customer by id {} not found", raw)))
            }
            IdLookup::Id(id) => self
                .manager
                .find_customer(id)
                .await?
                .ok_or_else(|| ApiError::not_found(format!("Customer by id {} not found", id))),
        }
    }

    async fn load_by_number(&self, number: &str) -> ApiResult<Customer> {
        let number = number.trim();
        if number.is_empty() {
            return Err(ApiError::parameter_missing("number"));
        }

        let not_found = || ApiError::not_found(format!("Customer by number {} not found", number));
        let id = self
            .manager
            .find_customer_id_by_number(number)
            .await?
            .ok_or_else(not_found)?;
        self.manager.find_customer(id).await?.ok_or_else(not_found)
    }

    async fn apply_update(&self, mut customer: Customer, data: Value) -> ApiResult<Customer> {
        trace!("Update customer {:?} data: {}", customer.id(), data);
        let data = CustomerData::from_value(data)?;

        let previous_shop = customer.shop.id;
        if let Some(shop_id) = data.shop_id {
            customer.shop = self.resolve_shop(shop_id).await?;
        }
        if let Some(group_key) = data.group_key.as_deref() {
            customer.group = self.resolve_group(group_key).await?;
        }

        let _guard = self.manager.write_guard().await;
        let email_changed = data
            .email
            .as_deref()
            .is_some_and(|email| email != customer.email);
        if email_changed || customer.shop.id != previous_shop {
            let email = data.email.as_deref().unwrap_or(&customer.email);
            self.ensure_unique_email(email, customer.shop.id, customer.id())
                .await?;
        }

        let mut errors = ValidationErrors::new();
        data.apply_to(&mut customer, self.encoder.as_ref(), &mut errors);
        self.validate(&customer, errors)?;

        self.manager.persist_customer(&mut customer).await?;
        self.flush_if_auto().await?;

        info!("Updated customer {:?}", customer.id());
        Ok(customer)
    }

    async fn resolve_shop(&self, shop_id: u64) -> ApiResult<Shop> {
        self.manager
            .find_shop(shop_id)
            .await?
            .ok_or_else(|| ApiError::custom_validation(format!("Shop by id {} not found", shop_id)))
    }

    async fn resolve_group(&self, key: &str) -> ApiResult<CustomerGroup> {
        self.manager.find_customer_group(key).await?.ok_or_else(|| {
            ApiError::custom_validation(format!("CustomerGroup by key {} not found", key))
        })
    }

    async fn ensure_unique_email(
        &self,
        email: &str,
        shop_id: u64,
        exclude: Option<u64>,
    ) -> ApiResult<()> {
        // Blank emails are reported by field validation
        if email.trim().is_empty() {
            return Ok(());
        }

        let ids = self.manager.find_customer_ids_by_email(email, shop_id).await?;
        if ids.iter().any(|id| Some(*id) != exclude) {
            warn!("Rejected duplicate email {} in shop {}", email, shop_id);
            return Err(ApiError::custom_validation(format!(
                "Emailaddress {} for shopId {} is not unique",
                email, shop_id
            )));
        }
        Ok(())
    }

    fn validate(&self, customer: &Customer, mut errors: ValidationErrors) -> ApiResult<()> {
        validate_customer(customer, &mut errors);
        errors.into_result().map_err(|errors| {
            warn!("Customer validation failed: {}", errors);
            ApiError::Validation(errors)
        })
    }

    async fn flush_if_auto(&self) -> ApiResult<()> {
        if self.config.auto_flush {
            self.manager.flush().await?;
        }
        Ok(())
    }
}
