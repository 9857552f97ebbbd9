//! Shared fixtures for customer resource integration tests.
//!
//! Every test gets its own in-memory storage seeded with the default shop
//! (id 1, group "EK") and one existing customer `test@example.com`.

#![allow(dead_code)]

use customer_resource::acl::{Acl, Privilege};
use customer_resource::models::{CustomerGroup, Shop};
use customer_resource::storage::InMemoryStorage;
use customer_resource::{CustomerResource, ModelManager};
use serde_json::{Value, json};
use std::sync::Arc;

pub const FIXTURE_EMAIL: &str = "test@example.com";

/// Route library logs to the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A manager with shops, groups and the fixture customer in place.
pub async fn seeded_manager() -> Arc<ModelManager<InMemoryStorage>> {
    init_logging();
    let manager = Arc::new(ModelManager::new(InMemoryStorage::new()));

    manager
        .save_customer_group(CustomerGroup::new(1, "EK", "Shopkunden"))
        .await
        .unwrap();
    manager
        .save_customer_group(CustomerGroup::new(2, "H", "Haendler"))
        .await
        .unwrap();
    manager.save_shop(Shop::new(1, "Deutsch", "EK")).await.unwrap();
    manager.save_shop(Shop::new(2, "English", "EK")).await.unwrap();

    let fixture = CustomerResource::new(Arc::clone(&manager));
    fixture
        .create(json!({
            "email": FIXTURE_EMAIL,
            "password": "fixture",
            "active": true,
            "billing": {"firstName": "Fixture", "lastName": "Customer"}
        }))
        .await
        .unwrap();

    manager
}

/// A resource over a freshly seeded manager.
pub async fn seeded_resource() -> CustomerResource<InMemoryStorage> {
    CustomerResource::new(seeded_manager().await)
}

/// A complete create payload with a unique email.
pub fn full_customer_data(email: &str) -> Value {
    json!({
        "password": "fooobar",
        "email": email,

        "firstlogin": "2012-10-01T10:15:00+0200",
        "lastlogin": "2012-10-03T10:15:00+0200",

        "billing": {
            "firstName": "Max",
            "lastName": "Mustermann",
            "birthday": "1986-12-20T00:00:00+0100",
            "attribute": {
                "text1": "Freitext1",
                "text2": "Freitext2"
            }
        },

        "shipping": {
            "salutation": "Mr",
            "company": "Widgets Inc.",
            "firstName": "Max",
            "lastName": "Mustermann",
            "attribute": {
                "text1": "Freitext1",
                "text2": "Freitext2"
            }
        },

        "debit": {
            "account": "Fake Account",
            "bankCode": "55555555",
            "bankName": "Fake Bank",
            "accountHolder": "Max Mustermann"
        }
    })
}

/// An ACL that knows every resource and allows nothing.
pub struct DenyingAcl;

impl Acl for DenyingAcl {
    fn has(&self, _resource: &str) -> bool {
        true
    }

    fn is_allowed(&self, _role: &str, _resource: &str, _privilege: Privilege) -> bool {
        false
    }
}
