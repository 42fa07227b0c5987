//! Live API integration tests.
//!
//! These tests run against Stripe's test mode. Set `STRIPE_API_KEY` (and
//! optionally `STRIPE_TEST_API_KEY`) or provide `.secrets/stripe.json`.
//!
//! Run with: cargo test --test live_api -- --nocapture --ignored

use std::collections::HashMap;

use stripe_client::stripe_core::{CancellationReason, PaymentSource, SetupIntentStatus};
use stripe_client::{
    CreateCustomer, CreateSetupIntent, Environment, ListCustomers, Page, SourceParam,
    StripeClient,
};

fn test_client() -> StripeClient {
    StripeClient::from_env()
        .expect("Stripe credentials must be configured")
        .with_environment(Environment::Testing)
}

// ============================================================================
// Customers
// ============================================================================

#[tokio::test]
#[ignore = "requires Stripe API credentials"]
async fn live_customer_lifecycle() {
    let client = test_client();

    let customer = client
        .customers()
        .create(&CreateCustomer {
            email: Some("live-test@example.com".into()),
            description: Some("stripe-client live test".into()),
            metadata: HashMap::from([("suite".to_string(), "live_api".to_string())]),
            ..CreateCustomer::default()
        })
        .await
        .expect("create customer");
    println!("Created customer {}", customer.id);

    let fetched = client
        .customers()
        .retrieve(&customer.id)
        .await
        .expect("retrieve customer");
    assert_eq!(fetched.email.as_deref(), Some("live-test@example.com"));
    assert_eq!(
        fetched.metadata.get("suite").map(String::as_str),
        Some("live_api")
    );

    let deleted = client
        .customers()
        .delete(&customer.id)
        .await
        .expect("delete customer");
    assert!(deleted.deleted);
}

#[tokio::test]
#[ignore = "requires Stripe API credentials"]
async fn live_list_customers() {
    let client = test_client();

    let list = client
        .customers()
        .list(&ListCustomers {
            email: None,
            page: Page::limit(3),
        })
        .await
        .expect("list customers");
    println!("Listed {} customers (has_more={})", list.data.len(), list.has_more);
    assert!(list.data.len() <= 3);
}

#[tokio::test]
#[ignore = "requires Stripe API credentials"]
async fn live_card_source() {
    let client = test_client();

    let customer = client
        .customers()
        .create(&CreateCustomer::default())
        .await
        .expect("create customer");

    let card = client
        .customers()
        .add_card_source(
            &customer.id,
            &SourceParam::Token("tok_visa".into()),
            &HashMap::new(),
            None,
        )
        .await
        .expect("add card");
    assert_eq!(card.last4, "4242");

    let fetched = client
        .customers()
        .retrieve(&customer.id)
        .await
        .expect("retrieve customer");
    let sources = fetched.sources.map(|s| s.data).unwrap_or_default();
    assert!(sources
        .iter()
        .any(|s| matches!(s, PaymentSource::Card(c) if c.id == card.id)));

    client
        .customers()
        .delete_source(&customer.id, &card.id)
        .await
        .expect("delete source");
    client
        .customers()
        .delete(&customer.id)
        .await
        .expect("delete customer");
}

// ============================================================================
// Setup intents
// ============================================================================

#[tokio::test]
#[ignore = "requires Stripe API credentials"]
async fn live_setup_intent_cancel() {
    let client = test_client();

    let intent = client
        .setup_intents()
        .create(&CreateSetupIntent {
            payment_method_types: vec!["card".into()],
            ..CreateSetupIntent::default()
        })
        .await
        .expect("create setup intent");
    assert_eq!(intent.status, SetupIntentStatus::RequiresPaymentMethod);

    let canceled = client
        .setup_intents()
        .cancel(&intent.id, Some(CancellationReason::Abandoned))
        .await
        .expect("cancel setup intent");
    assert_eq!(canceled.status, SetupIntentStatus::Canceled);
}

#[tokio::test]
#[ignore = "requires Stripe API credentials"]
async fn live_missing_customer_is_remote_error() {
    let client = test_client();

    let err = client
        .customers()
        .retrieve(&"cus_does_not_exist".parse().unwrap())
        .await
        .unwrap_err();

    let remote = err.as_remote().expect("expected a remote error");
    println!("Stripe error: {remote}");
    assert_eq!(remote.status, 404);
    assert_eq!(remote.code.as_deref(), Some("resource_missing"));
    assert!(remote.request_id.is_some());
}
