//! Property-based tests for validation and create/read round trips.

mod common;

use common::seeded_resource;
use customer_resource::resource::validation::is_valid_email;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_well_formed_emails_are_accepted(
        local in "[a-z0-9]{1,20}(\\.[a-z0-9]{1,10})?",
        domain in "[a-z0-9]{1,15}(-[a-z0-9]{1,5})?",
        tld in "[a-z]{2,6}",
    ) {
        let email = format!("{}@{}.{}", local, domain, tld);
        prop_assert!(is_valid_email(&email), "{} should be valid", email);
    }

    #[test]
    fn prop_strings_without_at_sign_are_rejected(value in "[^@]{0,40}") {
        prop_assert!(!is_valid_email(&value));
    }

    #[test]
    fn prop_create_then_get_one_round_trips(
        local in "[a-z]{1,12}",
        first_name in "[A-Za-z ]{0,20}",
        last_name in "[A-Za-z]{1,20}",
        newsletter in any::<bool>(),
        account_mode in 0u8..=1,
    ) {
        let email = format!("{}@roundtrip.example", local);
        let data = json!({
            "email": email,
            "newsletter": newsletter,
            "accountMode": account_mode,
            "billing": {"firstName": first_name, "lastName": last_name}
        });

        let array = tokio_test::block_on(async {
            let resource = seeded_resource().await;
            let created = resource.create(data).await.unwrap();
            resource
                .get_one(created.id())
                .await
                .unwrap()
                .into_array()
                .unwrap()
        });

        prop_assert_eq!(&array["email"], &json!(email));
        prop_assert_eq!(&array["newsletter"], &json!(newsletter));
        prop_assert_eq!(&array["accountMode"], &json!(account_mode));
        prop_assert_eq!(&array["billing"]["firstName"], &json!(first_name));
        prop_assert_eq!(&array["billing"]["lastName"], &json!(last_name));
    }

    #[test]
    fn prop_unknown_account_modes_are_rejected(account_mode in 2i64..1000) {
        let result = tokio_test::block_on(async {
            let resource = seeded_resource().await;
            resource
                .create(json!({"email": "mode@foobar.com", "accountMode": account_mode}))
                .await
        });

        let err = result.unwrap_err();
        prop_assert!(err.is_validation());
    }
}
