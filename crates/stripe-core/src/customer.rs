//! The customer resource.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{Address, List};
use crate::ids::CustomerId;
use crate::source::PaymentSource;

/// A Stripe customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,
    /// Object type (always "customer").
    #[serde(default)]
    pub object: Option<String>,
    /// Balance in the smallest currency unit; negative is a credit.
    ///
    /// Older API versions call this `account_balance`.
    #[serde(default, alias = "account_balance")]
    pub balance: i64,
    /// Time at which the customer was created.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created: DateTime<Utc>,
    /// Three-letter ISO currency code the customer is billed in.
    #[serde(default)]
    pub currency: Option<String>,
    /// Id of the default payment source.
    #[serde(default)]
    pub default_source: Option<String>,
    /// Whether the latest invoice is past due.
    #[serde(default)]
    pub delinquent: Option<bool>,
    /// Arbitrary description.
    #[serde(default)]
    pub description: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Prefix for invoice numbers.
    #[serde(default)]
    pub invoice_prefix: Option<String>,
    /// Default invoice settings.
    pub invoice_settings: InvoiceSettings,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Full name or business name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Shipping information.
    #[serde(default)]
    pub shipping: Option<Shipping>,
    /// Attached payment sources.
    #[serde(default)]
    pub sources: Option<List<PaymentSource>>,
}

/// Default invoice settings on a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InvoiceSettings {
    /// Default payment method for invoices and subscriptions.
    #[serde(default)]
    pub default_payment_method: Option<String>,
    /// Default footer on invoices.
    #[serde(default)]
    pub footer: Option<String>,
}

/// Shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Shipping {
    /// Shipping address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Recipient name.
    pub name: String,
    /// Recipient phone.
    #[serde(default)]
    pub phone: Option<String>,
}
