//! Charges and payment intents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::LastError;
use crate::ids::{ChargeId, PaymentIntentId};

/// A Stripe payment intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentIntent {
    /// Unique identifier.
    pub id: PaymentIntentId,
    /// Object type (always "payment_intent").
    #[serde(default)]
    pub object: Option<String>,
    /// Amount intended to be collected.
    pub amount: i64,
    /// Amount that can be captured.
    #[serde(default)]
    pub amount_capturable: i64,
    /// Amount already received.
    pub amount_received: i64,
    /// `automatic` or `manual`.
    #[serde(default)]
    pub capture_method: Option<String>,
    /// Secret used client-side to confirm the intent.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Time at which the intent was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Three-letter currency code.
    pub currency: String,
    /// Paying customer.
    #[serde(default)]
    pub customer: Option<String>,
    /// Arbitrary description.
    #[serde(default)]
    pub description: Option<String>,
    /// Invoice the intent was created for.
    #[serde(default)]
    pub invoice: Option<String>,
    /// Error from the last payment attempt.
    #[serde(default)]
    pub last_payment_error: Option<LastError>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Payment method used.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Current status.
    pub status: PaymentIntentStatus,
}

/// Payment intent status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    /// Waiting for a payment method.
    RequiresPaymentMethod,
    /// Waiting for confirmation.
    RequiresConfirmation,
    /// Customer action required.
    RequiresAction,
    /// Being processed.
    Processing,
    /// Authorized, waiting for capture.
    RequiresCapture,
    /// Canceled.
    Canceled,
    /// Paid.
    Succeeded,
    /// Any status this crate does not model.
    #[serde(other)]
    Unknown,
}

/// A Stripe charge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Charge {
    /// Unique identifier.
    pub id: ChargeId,
    /// Object type (always "charge").
    #[serde(default)]
    pub object: Option<String>,
    /// Amount charged.
    pub amount: i64,
    /// Amount refunded.
    pub amount_refunded: i64,
    /// Whether the charge was captured.
    pub captured: bool,
    /// Time at which the charge was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Three-letter currency code.
    pub currency: String,
    /// Charged customer.
    #[serde(default)]
    pub customer: Option<String>,
    /// Arbitrary description.
    #[serde(default)]
    pub description: Option<String>,
    /// Failure code, when failed.
    #[serde(default)]
    pub failure_code: Option<String>,
    /// Failure explanation, when failed.
    #[serde(default)]
    pub failure_message: Option<String>,
    /// Invoice this charge pays.
    #[serde(default)]
    pub invoice: Option<String>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Whether the charge succeeded.
    pub paid: bool,
    /// Payment intent that created the charge.
    #[serde(default)]
    pub payment_intent: Option<String>,
    /// Payment method charged.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Email the receipt was sent to.
    #[serde(default)]
    pub receipt_email: Option<String>,
    /// Receipt page.
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// Whether the charge was fully refunded.
    #[serde(default)]
    pub refunded: bool,
    /// `succeeded`, `pending` or `failed`.
    pub status: String,
}
