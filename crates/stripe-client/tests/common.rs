//! Common test utilities for stripe-client integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use serde_json::{json, Value};
use wiremock::MockServer;

use stripe_client::{ApiKey, Environment, StripeClient, StripeConfig};

pub const LIVE_KEY: &str = "sk_live_999";
pub const TEST_KEY: &str = "sk_test_123";

/// A client pointed at a local mock Stripe.
pub struct TestHarness {
    /// The mock server standing in for `api.stripe.com`.
    pub server: MockServer,
    /// Client configured against `server`.
    pub client: StripeClient,
}

impl TestHarness {
    /// Harness with both keys configured, in the testing environment.
    pub async fn new() -> Self {
        Self::with_environment(Environment::Testing).await
    }

    pub async fn with_environment(environment: Environment) -> Self {
        let server = MockServer::start().await;
        let config = StripeConfig::new(ApiKey::new(LIVE_KEY).expect("valid key"))
            .with_test_api_key(ApiKey::new(TEST_KEY).expect("valid key"))
            .with_environment(environment)
            .with_base_url(server.uri())
            .with_timeout_seconds(5);
        let client = StripeClient::new(config).expect("Failed to build client");
        Self { server, client }
    }
}

pub fn bearer(key: &str) -> String {
    format!("Bearer {key}")
}

pub fn customer_json(id: &str) -> Value {
    json!({
        "id": id,
        "object": "customer",
        "account_balance": 0,
        "created": 1_568_000_000,
        "currency": null,
        "default_source": null,
        "delinquent": false,
        "email": "jenny@example.com",
        "invoice_prefix": "8E1B0A7",
        "invoice_settings": {
            "custom_fields": null,
            "default_payment_method": null,
            "footer": null
        },
        "livemode": false,
        "metadata": {"order": "6735"},
        "name": null,
        "phone": null,
        "sources": {
            "object": "list",
            "data": [],
            "has_more": false,
            "url": format!("/v1/customers/{id}/sources")
        }
    })
}

pub fn card_json(id: &str, customer: &str) -> Value {
    json!({
        "id": id,
        "object": "card",
        "brand": "Visa",
        "country": "US",
        "customer": customer,
        "exp_month": 8,
        "exp_year": 2026,
        "fingerprint": "Xt5EWLLDS7FJjR1c",
        "funding": "credit",
        "last4": "4242",
        "metadata": {}
    })
}

pub fn setup_intent_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "object": "setup_intent",
        "cancellation_reason": null,
        "client_secret": format!("{id}_secret_abc"),
        "created": 1_568_000_000,
        "customer": "cus_1",
        "livemode": false,
        "metadata": {},
        "payment_method": "pm_1",
        "payment_method_types": ["card"],
        "status": status,
        "usage": "off_session"
    })
}

pub fn error_json(kind: &str, message: &str) -> Value {
    json!({
        "error": {
            "type": kind,
            "message": message,
            "code": "card_declined",
            "decline_code": "insufficient_funds",
            "param": "source",
            "doc_url": "https://stripe.com/docs/error-codes/card-declined"
        }
    })
}
