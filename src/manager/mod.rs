//! Entity manager mapping the customer aggregate onto storage rows.
//!
//! The [`ModelManager`] plays the role of an ORM for the resource layer:
//!
//! * hydrates a [`Customer`] together with its shop, group and owned records
//! * assigns identities from storage sequences on persist
//! * queues writes in a unit of work and flushes them as one atomic batch
//! * cascades removal of a customer to its billing, shipping and debit rows
//!
//! Lookups read flushed state only; queued changes become visible after
//! [`flush`](ModelManager::flush).
//!
//! # Example Usage
//!
//! ```rust
//! use customer_resource::manager::ModelManager;
//! use customer_resource::models::{Customer, CustomerGroup, Shop};
//! use customer_resource::storage::InMemoryStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ModelManager::new(InMemoryStorage::new());
//! manager.save_customer_group(CustomerGroup::new(1, "EK", "Shopkunden")).await?;
//! manager.save_shop(Shop::new(1, "Main", "EK")).await?;
//!
//! let shop = manager.find_shop(1).await?.unwrap();
//! let group = manager.find_customer_group("EK").await?.unwrap();
//! let mut customer = Customer::new("max@example.com", shop, group);
//!
//! manager.persist_customer(&mut customer).await?;
//! manager.flush().await?;
//!
//! let id = customer.id().unwrap();
//! assert!(manager.find_customer(id).await?.is_some());
//! # Ok(())
//! # }
//! ```

pub(crate) mod rows;

use crate::error::{ApiError, ApiResult};
use crate::models::{Billing, Customer, CustomerGroup, Debit, Shipping, Shop};
use crate::storage::{StorageError, StorageKey, StorageOp, StorageProvider};
use log::{debug, info, trace};
use rows::{
    BILLING, BillingRow, CUSTOMER, CUSTOMER_GROUP, CustomerRow, DEBIT, NUMBER_RANGE_USER, OwnedRow,
    SHIPPING, SHOP,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

/// Entity manager over a pluggable storage backend.
pub struct ModelManager<S: StorageProvider> {
    storage: S,
    // Unit of work: writes queued by persist/remove, applied by flush
    pending: Mutex<Vec<StorageOp>>,
    // Held by resources from a uniqueness check until its write is flushed
    write_gate: Mutex<()>,
}

impl<S: StorageProvider> ModelManager<S> {
    /// Create a manager with an empty unit of work.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            pending: Mutex::new(Vec::new()),
            write_gate: Mutex::new(()),
        }
    }

    /// Access the underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Store a shop row immediately, bypassing the unit of work.
    pub async fn save_shop(&self, shop: Shop) -> ApiResult<()> {
        let key = StorageKey::new(SHOP, shop.id);
        self.storage
            .put(key, to_row(SHOP, &shop)?)
            .await
            .map_err(ApiError::storage)?;
        Ok(())
    }

    /// Store a customer group row immediately, bypassing the unit of work.
    pub async fn save_customer_group(&self, group: CustomerGroup) -> ApiResult<()> {
        let key = StorageKey::new(CUSTOMER_GROUP, group.id);
        self.storage
            .put(key, to_row(CUSTOMER_GROUP, &group)?)
            .await
            .map_err(ApiError::storage)?;
        Ok(())
    }

    pub async fn find_shop(&self, id: u64) -> ApiResult<Option<Shop>> {
        let row = self
            .storage
            .get(StorageKey::new(SHOP, id))
            .await
            .map_err(ApiError::storage)?;
        row.map(|value| from_row(SHOP, value)).transpose()
    }

    /// Look up a customer group by its key (e.g. `"EK"`).
    pub async fn find_customer_group(&self, key: &str) -> ApiResult<Option<CustomerGroup>> {
        let matches = self
            .storage
            .find_by_attribute(StorageKey::prefix(CUSTOMER_GROUP), "key", key)
            .await
            .map_err(ApiError::storage)?;
        matches
            .into_iter()
            .next()
            .map(|(_, value)| from_row(CUSTOMER_GROUP, value))
            .transpose()
    }

    /// Load a customer aggregate by id.
    pub async fn find_customer(&self, id: u64) -> ApiResult<Option<Customer>> {
        let row = self
            .storage
            .get(StorageKey::new(CUSTOMER, id))
            .await
            .map_err(ApiError::storage)?;

        match row {
            Some(value) => {
                let row: CustomerRow = from_row(CUSTOMER, value)?;
                self.hydrate(row).await.map(Some)
            }
            None => {
                debug!("Customer row {} not found", id);
                Ok(None)
            }
        }
    }

    /// Ids of customers in a shop registered with exactly this email.
    pub async fn find_customer_ids_by_email(&self, email: &str, shop_id: u64) -> ApiResult<Vec<u64>> {
        let matches = self
            .storage
            .find_by_attribute(StorageKey::prefix(CUSTOMER), "email", email)
            .await
            .map_err(ApiError::storage)?;

        let mut ids = Vec::new();
        for (key, value) in matches {
            let row: CustomerRow = from_row(CUSTOMER, value)?;
            if row.shop_id == shop_id {
                ids.push(key.id());
            }
        }
        Ok(ids)
    }

    /// Resolve a customer id from the customer number on its billing record.
    pub async fn find_customer_id_by_number(&self, number: &str) -> ApiResult<Option<u64>> {
        let matches = self
            .storage
            .find_by_attribute(StorageKey::prefix(BILLING), "number", number)
            .await
            .map_err(ApiError::storage)?;

        match matches.into_iter().next() {
            Some((_, value)) => {
                let row: BillingRow = from_row(BILLING, value)?;
                Ok(Some(row.customer_id))
            }
            None => Ok(None),
        }
    }

    /// Load every customer, ordered by id.
    pub async fn find_customers(&self) -> ApiResult<Vec<Customer>> {
        let rows = self
            .storage
            .list(StorageKey::prefix(CUSTOMER), 0, usize::MAX)
            .await
            .map_err(ApiError::storage)?;

        let mut customers = Vec::with_capacity(rows.len());
        for (_, value) in rows {
            let row: CustomerRow = from_row(CUSTOMER, value)?;
            customers.push(self.hydrate(row).await?);
        }
        Ok(customers)
    }

    pub async fn count_customers(&self) -> ApiResult<usize> {
        self.storage
            .count(StorageKey::prefix(CUSTOMER))
            .await
            .map_err(ApiError::storage)
    }

    /// Draw the next customer number: `offset + n` for the n-th draw.
    pub async fn next_customer_number(&self, offset: u64) -> ApiResult<String> {
        let n = self
            .storage
            .next_sequence(NUMBER_RANGE_USER)
            .await
            .map_err(ApiError::storage)?;
        Ok((offset + n).to_string())
    }

    /// Queue the aggregate for writing, assigning any missing identities.
    pub async fn persist_customer(&self, customer: &mut Customer) -> ApiResult<()> {
        let id = self.assign_id(CUSTOMER, customer.id).await?;
        let billing_id = self.assign_id(BILLING, customer.billing.id).await?;
        let shipping_id = self.assign_id(SHIPPING, customer.shipping.id).await?;
        customer.id = Some(id);
        customer.billing.id = Some(billing_id);
        customer.shipping.id = Some(shipping_id);

        let mut batch = Vec::with_capacity(4);
        if let Some(debit) = customer.debit.as_mut() {
            let debit_id = self.assign_id(DEBIT, debit.id).await?;
            debit.id = Some(debit_id);
            batch.push(owned_put(DEBIT, debit_id, id, &*debit)?);
        }

        batch.push(owned_put(BILLING, billing_id, id, &customer.billing)?);
        batch.push(owned_put(SHIPPING, shipping_id, id, &customer.shipping)?);
        let row = CustomerRow::from_customer(customer, id, billing_id, shipping_id);
        batch.push(StorageOp::Put(StorageKey::new(CUSTOMER, id), to_row(CUSTOMER, &row)?));

        trace!("Queued {} writes for customer {}", batch.len(), id);
        self.pending.lock().await.extend(batch);
        Ok(())
    }

    /// Queue removal of the aggregate and detach it.
    ///
    /// After this call every identity in `customer` is `None`.
    pub async fn remove_customer(&self, customer: &mut Customer) -> ApiResult<()> {
        let Some(id) = customer.id else {
            return Err(ApiError::not_found("Customer is not managed"));
        };

        let mut batch = vec![StorageOp::Delete(StorageKey::new(CUSTOMER, id))];
        if let Some(billing_id) = customer.billing.id {
            batch.push(StorageOp::Delete(StorageKey::new(BILLING, billing_id)));
        }
        if let Some(shipping_id) = customer.shipping.id {
            batch.push(StorageOp::Delete(StorageKey::new(SHIPPING, shipping_id)));
        }
        if let Some(debit_id) = customer.debit.as_ref().and_then(Debit::id) {
            batch.push(StorageOp::Delete(StorageKey::new(DEBIT, debit_id)));
        }

        trace!("Queued cascade removal of customer {}", id);
        self.pending.lock().await.extend(batch);
        customer.detach();
        Ok(())
    }

    /// Apply all queued writes atomically. Returns the number of writes applied.
    pub async fn flush(&self) -> ApiResult<usize> {
        let batch = std::mem::take(&mut *self.pending.lock().await);
        let count = batch.len();
        if count == 0 {
            return Ok(0);
        }

        self.storage.apply(batch).await.map_err(ApiError::storage)?;
        info!("Flushed {} queued writes", count);
        Ok(count)
    }

    /// Discard queued, unflushed writes.
    pub async fn clear(&self) {
        let discarded = std::mem::take(&mut *self.pending.lock().await);
        if !discarded.is_empty() {
            debug!("Discarded {} unflushed writes", discarded.len());
        }
    }

    /// Serialize a read-check-write sequence against other writers sharing
    /// this manager. Writers release the guard when it drops.
    pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    /// Number of writes waiting for the next flush.
    pub async fn pending_changes(&self) -> usize {
        self.pending.lock().await.len()
    }

    async fn assign_id(&self, entity: &str, current: Option<u64>) -> ApiResult<u64> {
        match current {
            Some(id) => Ok(id),
            None => self
                .storage
                .next_sequence(entity)
                .await
                .map_err(ApiError::storage),
        }
    }

    async fn hydrate(&self, row: CustomerRow) -> ApiResult<Customer> {
        let shop = self
            .find_shop(row.shop_id)
            .await?
            .ok_or_else(|| StorageError::not_found(SHOP, row.shop_id))?;
        let group = self.find_customer_group(&row.group_key).await?.ok_or_else(|| {
            StorageError::InvalidData {
                message: format!("customer {} references unknown group", row.id),
                cause: Some(row.group_key.clone()),
            }
        })?;

        let billing: Billing = self.load_owned::<Billing>(BILLING, row.billing_id).await?;
        let shipping: Shipping = self.load_owned::<Shipping>(SHIPPING, row.shipping_id).await?;
        let debit = match row.debit_id {
            Some(debit_id) => Some(self.load_owned::<Debit>(DEBIT, debit_id).await?),
            None => None,
        };

        Ok(Customer {
            id: Some(row.id),
            email: row.email,
            hashed_password: row.hashed_password,
            encoder_name: row.encoder_name,
            active: row.active,
            account_mode: row.account_mode,
            newsletter: row.newsletter,
            internal_comment: row.internal_comment,
            first_login: row.first_login,
            last_login: row.last_login,
            shop,
            group,
            billing,
            shipping,
            debit,
        })
    }

    async fn load_owned<T: DeserializeOwned>(&self, entity: &str, id: u64) -> ApiResult<T> {
        let value = self
            .storage
            .get(StorageKey::new(entity, id))
            .await
            .map_err(ApiError::storage)?
            .ok_or_else(|| StorageError::not_found(entity, id))?;
        let row: OwnedRow<T> = from_row(entity, value)?;
        Ok(row.record)
    }
}

fn to_row<T: Serialize>(entity: &str, record: &T) -> Result<Value, StorageError> {
    serde_json::to_value(record).map_err(|e| StorageError::serialization(entity, e))
}

fn from_row<T: DeserializeOwned>(entity: &str, value: Value) -> ApiResult<T> {
    serde_json::from_value(value)
        .map_err(|e| StorageError::serialization(entity, e))
        .map_err(ApiError::from)
}

fn owned_put<T: Serialize + Clone>(
    entity: &str,
    id: u64,
    customer_id: u64,
    record: &T,
) -> Result<StorageOp, StorageError> {
    let row = OwnedRow {
        customer_id,
        record: record.clone(),
    };
    Ok(StorageOp::Put(StorageKey::new(entity, id), to_row(entity, &row)?))
}
