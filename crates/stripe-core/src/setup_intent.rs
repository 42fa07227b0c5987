//! The setup intent resource.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::common::LastError;
use crate::ids::SetupIntentId;

/// A Stripe setup intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SetupIntent {
    /// Unique identifier.
    pub id: SetupIntentId,
    /// Object type (always "setup_intent").
    #[serde(default)]
    pub object: Option<String>,
    /// Connect application that created the intent.
    #[serde(default)]
    pub application: Option<String>,
    /// Why the intent was canceled.
    #[serde(default)]
    pub cancellation_reason: Option<CancellationReason>,
    /// Secret used client-side to confirm the intent.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Time at which the intent was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Customer the payment method will be attached to.
    #[serde(default)]
    pub customer: Option<String>,
    /// Arbitrary description.
    #[serde(default)]
    pub description: Option<String>,
    /// Error from the last setup attempt.
    #[serde(default)]
    pub last_setup_error: Option<LastError>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Mandate created by the intent.
    #[serde(default)]
    pub mandate: Option<String>,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Action the customer must take, kept as returned.
    #[serde(default)]
    pub next_action: Option<Value>,
    /// Connected account the setup is on behalf of.
    #[serde(default)]
    pub on_behalf_of: Option<String>,
    /// Payment method being set up.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Payment method types allowed for this intent.
    #[serde(default)]
    pub payment_method_types: Vec<String>,
    /// Single-use mandate created by the intent.
    #[serde(default)]
    pub single_use_mandate: Option<String>,
    /// Current status.
    pub status: SetupIntentStatus,
    /// How the payment method will be used.
    #[serde(default)]
    pub usage: Option<SetupIntentUsage>,
}

/// Setup intent status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupIntentStatus {
    /// Waiting for a payment method.
    RequiresPaymentMethod,
    /// Waiting for confirmation.
    RequiresConfirmation,
    /// Customer action required.
    RequiresAction,
    /// Being processed.
    Processing,
    /// Canceled.
    Canceled,
    /// Set up successfully.
    Succeeded,
    /// Any status this crate does not model.
    #[serde(other)]
    Unknown,
}

/// How a set-up payment method will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupIntentUsage {
    /// Customer present.
    OnSession,
    /// Customer absent.
    OffSession,
}

impl SetupIntentUsage {
    /// The value Stripe uses on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OnSession => "on_session",
            Self::OffSession => "off_session",
        }
    }
}

/// Reason given when canceling a setup intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    /// The customer abandoned the flow.
    Abandoned,
    /// The customer asked to cancel.
    RequestedByCustomer,
    /// A duplicate intent exists.
    Duplicate,
}

impl CancellationReason {
    /// The value Stripe uses on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abandoned => "abandoned",
            Self::RequestedByCustomer => "requested_by_customer",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
