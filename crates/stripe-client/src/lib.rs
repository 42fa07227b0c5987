//! Authenticated Stripe API client.
//!
//! This crate sends requests built from [`stripe_core`] parameters and decodes
//! the responses into its models.
//!
//! # Example
//!
//! ```no_run
//! use stripe_client::{CreateCustomer, StripeClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StripeClient::from_env()?;
//!
//! let customer = client
//!     .customers()
//!     .create(&CreateCustomer {
//!         email: Some("jenny@example.com".to_string()),
//!         ..CreateCustomer::default()
//!     })
//!     .await?;
//!
//! println!("Created {}", customer.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Credentials
//!
//! A client carries a primary key and optionally a test key. Calls made in
//! [`Environment::Development`] or [`Environment::Testing`] use the test key
//! when one is configured; production calls always use the primary key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod dispatch;
pub mod routes;
mod transport;

pub use config::{
    ApiKey, ConfigError, Credentials, Environment, StripeConfig, DEFAULT_API_VERSION,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECONDS,
};
pub use dispatch::{RequestSpec, StripeClient, REQUEST_ID, STRIPE_ACCOUNT, STRIPE_VERSION};
pub use routes::{
    ConfirmSetupIntent, CreateCustomer, CreatePaymentMethod, CreateSetupIntent, ListCustomers,
    ListPaymentMethods, ListSetupIntents, Page, SourceParam, UpdateCustomer, UpdatePaymentMethod,
    UpdateSetupIntent,
};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportRequest, TransportResponse,
    DEFAULT_MAX_RESPONSE_BYTES,
};

pub use stripe_core;
pub use stripe_core::{Result, StripeError};
