//! Integration tests for list paging, filtering and ordering.

mod common;

use common::seeded_resource;
use customer_resource::resource::SortDirection;
use customer_resource::storage::InMemoryStorage;
use customer_resource::{CustomerResource, HydrationMode, ListQuery, ResourceConfig};
use serde_json::{Value, json};

async fn resource_with_customers() -> CustomerResource<InMemoryStorage> {
    let resource = seeded_resource().await;
    let people = [
        ("anna@foobar.com", "Zimmermann", 1, false),
        ("bernd@foobar.com", "Albers", 1, true),
        ("carla@foobar.com", "Meyer", 2, true),
        ("dieter@foobar.com", "Albers", 1, true),
    ];
    for (email, last_name, shop_id, newsletter) in people {
        resource
            .create(json!({
                "email": email,
                "shopId": shop_id,
                "newsletter": newsletter,
                "billing": {"lastName": last_name}
            }))
            .await
            .unwrap();
    }
    resource
}

fn emails(data: &[customer_resource::Hydrated<customer_resource::Customer>]) -> Vec<Value> {
    data.iter()
        .map(|record| record.as_array().unwrap()["email"].clone())
        .collect()
}

#[tokio::test]
async fn test_default_order_is_by_id() {
    let resource = resource_with_customers().await;
    let result = resource.get_list(&ListQuery::new()).await.unwrap();

    assert_eq!(result.total, 5);
    assert_eq!(
        emails(&result.data),
        vec![
            json!("test@example.com"),
            json!("anna@foobar.com"),
            json!("bernd@foobar.com"),
            json!("carla@foobar.com"),
            json!("dieter@foobar.com"),
        ]
    );
}

#[tokio::test]
async fn test_paging_keeps_total() {
    let resource = resource_with_customers().await;
    let result = resource
        .get_list(&ListQuery::new().offset(1).limit(2))
        .await
        .unwrap();

    assert_eq!(result.total, 5);
    assert_eq!(
        emails(&result.data),
        vec![json!("anna@foobar.com"), json!("bernd@foobar.com")]
    );

    let past_end = resource
        .get_list(&ListQuery::new().offset(10))
        .await
        .unwrap();
    assert_eq!(past_end.total, 5);
    assert!(past_end.data.is_empty());
}

#[tokio::test]
async fn test_configured_list_limit_applies() {
    let resource = resource_with_customers()
        .await
        .with_config(ResourceConfig::default().with_list_limit(3));

    let result = resource.get_list(&ListQuery::new()).await.unwrap();
    assert_eq!(result.total, 5);
    assert_eq!(result.data.len(), 3);
}

#[tokio::test]
async fn test_criteria_filter_on_nested_paths() {
    let resource = resource_with_customers().await;

    let result = resource
        .get_list(&ListQuery::new().filter("shop.id", 2))
        .await
        .unwrap();
    assert_eq!(result.total, 1);
    assert_eq!(emails(&result.data), vec![json!("carla@foobar.com")]);

    let result = resource
        .get_list(
            &ListQuery::new()
                .filter("billing.lastName", "Albers")
                .filter("newsletter", true),
        )
        .await
        .unwrap();
    assert_eq!(result.total, 2);

    let result = resource
        .get_list(&ListQuery::new().filter("billing.lastName", "Nobody"))
        .await
        .unwrap();
    assert_eq!(result.total, 0);
    assert!(result.data.is_empty());
}

#[tokio::test]
async fn test_order_by_multiple_keys() {
    let resource = resource_with_customers().await;
    let query = ListQuery::new()
        .filter("shop.id", 1)
        .order_by("billing.lastName", SortDirection::Asc)
        .order_by("email", SortDirection::Desc);

    let result = resource.get_list(&query).await.unwrap();
    assert_eq!(
        emails(&result.data),
        vec![
            json!("dieter@foobar.com"),
            json!("bernd@foobar.com"),
            json!("test@example.com"),
            json!("anna@foobar.com"),
        ]
    );
}

#[tokio::test]
async fn test_object_mode_list() {
    let mut resource = resource_with_customers().await;
    resource.set_result_mode(HydrationMode::Object);

    let result = resource
        .get_list(&ListQuery::new().order_by("id", SortDirection::Desc).limit(1))
        .await
        .unwrap();
    let customer = result.data[0].as_object().unwrap();
    assert_eq!(customer.email, "dieter@foobar.com");
}
