//! Invoices and subscriptions.
//!
//! These mostly reach callers inside webhook events, so the models keep the
//! fields billing code reads and tolerate statuses added later.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{Expandable, List};
use crate::ids::{InvoiceId, SubscriptionId};
use crate::payment::PaymentIntent;

/// A Stripe invoice.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Invoice {
    /// Unique identifier. Absent on upcoming invoices.
    #[serde(default)]
    pub id: Option<InvoiceId>,
    /// Object type (always "invoice").
    #[serde(default)]
    pub object: Option<String>,
    /// Final amount due.
    pub amount_due: i64,
    /// Amount paid so far.
    pub amount_paid: i64,
    /// Amount still owed.
    pub amount_remaining: i64,
    /// Number of payment attempts made.
    #[serde(default)]
    pub attempt_count: u32,
    /// Whether a payment attempt has been made.
    #[serde(default)]
    pub attempted: bool,
    /// Why the invoice was created, e.g. `subscription_cycle`.
    #[serde(default)]
    pub billing_reason: Option<String>,
    /// Latest charge for this invoice.
    #[serde(default)]
    pub charge: Option<String>,
    /// `charge_automatically` or `send_invoice`.
    #[serde(default)]
    pub collection_method: Option<String>,
    /// Time at which the invoice was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Three-letter currency code.
    pub currency: String,
    /// Billed customer.
    #[serde(default)]
    pub customer: Option<String>,
    /// Customer email at finalization.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Payment due date for `send_invoice` collection.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub due_date: Option<DateTime<Utc>>,
    /// Hosted payment page.
    #[serde(default)]
    pub hosted_invoice_url: Option<String>,
    /// PDF download link.
    #[serde(default)]
    pub invoice_pdf: Option<String>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Human-readable invoice number.
    #[serde(default)]
    pub number: Option<String>,
    /// Whether the invoice is paid.
    #[serde(default)]
    pub paid: bool,
    /// Payment intent collecting this invoice; an id unless expanded.
    #[serde(default)]
    pub payment_intent: Option<Expandable<PaymentIntent>>,
    /// Start of the billed period.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub period_start: Option<DateTime<Utc>>,
    /// End of the billed period.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub period_end: Option<DateTime<Utc>>,
    /// Current status.
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    /// Subscription that generated the invoice.
    #[serde(default)]
    pub subscription: Option<String>,
    /// Total before discounts and tax.
    #[serde(default)]
    pub subtotal: i64,
    /// Total after discounts and tax.
    #[serde(default)]
    pub total: i64,
}

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Editable draft.
    Draft,
    /// Finalized and awaiting payment.
    Open,
    /// Paid.
    Paid,
    /// Marked uncollectible.
    Uncollectible,
    /// Voided.
    Void,
    /// Any status this crate does not model.
    #[serde(other)]
    Unknown,
}

/// A Stripe subscription.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    /// Unique identifier.
    pub id: SubscriptionId,
    /// Object type (always "subscription").
    #[serde(default)]
    pub object: Option<String>,
    /// Whether the subscription ends at the end of the current period.
    #[serde(default)]
    pub cancel_at_period_end: bool,
    /// When the subscription was canceled.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub canceled_at: Option<DateTime<Utc>>,
    /// Time at which the subscription was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Start of the current period.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub current_period_start: DateTime<Utc>,
    /// End of the current period.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub current_period_end: DateTime<Utc>,
    /// Subscribed customer.
    pub customer: String,
    /// Default payment method.
    #[serde(default)]
    pub default_payment_method: Option<String>,
    /// When the subscription ended.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Subscribed items.
    pub items: List<SubscriptionItem>,
    /// Most recent invoice; an id unless expanded.
    #[serde(default)]
    pub latest_invoice: Option<Expandable<Invoice>>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Current status.
    pub status: SubscriptionStatus,
    /// End of the trial.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub trial_end: Option<DateTime<Utc>>,
    /// Start of the trial.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub trial_start: Option<DateTime<Utc>>,
}

/// Subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// First payment not yet made.
    Incomplete,
    /// First payment never made; terminal.
    IncompleteExpired,
    /// In a trial.
    Trialing,
    /// Active.
    Active,
    /// Latest payment failed.
    PastDue,
    /// Canceled.
    Canceled,
    /// Unpaid after retries.
    Unpaid,
    /// Paused.
    Paused,
    /// Any status this crate does not model.
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Whether the customer should currently have access.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Trialing)
    }
}

/// One item of a subscription.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscriptionItem {
    /// Unique identifier (`si_...`).
    pub id: String,
    /// Object type (always "subscription_item").
    #[serde(default)]
    pub object: Option<String>,
    /// Time at which the item was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Plan the item bills for.
    #[serde(default)]
    pub plan: Option<Plan>,
    /// Quantity.
    #[serde(default)]
    pub quantity: Option<u64>,
    /// Owning subscription.
    #[serde(default)]
    pub subscription: Option<String>,
}

/// A recurring price plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Plan {
    /// Unique identifier.
    pub id: String,
    /// Whether the plan can be used for new purchases.
    #[serde(default)]
    pub active: bool,
    /// Amount per interval.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Three-letter currency code.
    pub currency: String,
    /// `day`, `week`, `month` or `year`.
    pub interval: String,
    /// Number of intervals between billings.
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    /// Display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Product id.
    #[serde(default)]
    pub product: Option<String>,
}

const fn default_interval_count() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice_json() -> serde_json::Value {
        json!({
            "id": "in_1MtHbELkdIwHu7ixl4OzzPMv",
            "object": "invoice",
            "amount_due": 2000,
            "amount_paid": 0,
            "amount_remaining": 2000,
            "attempt_count": 0,
            "attempted": false,
            "billing_reason": "subscription_cycle",
            "currency": "usd",
            "customer": "cus_NeZwdNtLEOXuvB",
            "livemode": false,
            "paid": false,
            "payment_intent": "pi_3MtHbELkdIwHu7ix0ZRpb1X2",
            "status": "open",
            "subscription": "sub_1MtHbELkdIwHu7ix",
            "total": 2000
        })
    }

    #[test]
    fn invoice_with_payment_intent_id() {
        let invoice: Invoice = serde_json::from_value(invoice_json()).unwrap();
        assert_eq!(invoice.status, Some(InvoiceStatus::Open));
        let intent = invoice.payment_intent.unwrap();
        assert_eq!(intent, Expandable::Id("pi_3MtHbELkdIwHu7ix0ZRpb1X2".into()));
    }

    #[test]
    fn invoice_with_expanded_payment_intent() {
        let mut payload = invoice_json();
        payload["payment_intent"] = json!({
            "id": "pi_3MtHbELkdIwHu7ix0ZRpb1X2",
            "object": "payment_intent",
            "amount": 2000,
            "amount_received": 0,
            "currency": "usd",
            "status": "requires_payment_method"
        });
        let invoice: Invoice = serde_json::from_value(payload).unwrap();
        let intent = invoice.payment_intent.unwrap();
        assert_eq!(intent.as_object().map(|pi| pi.amount), Some(2000));
    }

    #[test]
    fn subscription_with_items_and_latest_invoice() {
        let subscription: Subscription = serde_json::from_value(json!({
            "id": "sub_1MowQVLkdIwHu7ixeRlqHVzs",
            "object": "subscription",
            "cancel_at_period_end": false,
            "created": 1_679_609_767,
            "current_period_start": 1_679_609_767,
            "current_period_end": 1_682_288_167,
            "customer": "cus_Na6dX7aXxi11N4",
            "items": {
                "object": "list",
                "has_more": false,
                "data": [{
                    "id": "si_Na6dzxczY5fwHx",
                    "object": "subscription_item",
                    "plan": {
                        "id": "price_1MowQULkdIwHu7ixraBm864M",
                        "active": true,
                        "amount": 1000,
                        "currency": "usd",
                        "interval": "month",
                        "product": "prod_Na6dGcTsmU0I4R"
                    },
                    "quantity": 1
                }]
            },
            "latest_invoice": "in_1MowQWLkdIwHu7ixuzkSPfKd",
            "status": "active"
        }))
        .unwrap();

        assert!(subscription.status.is_active());
        let plan = subscription.items.data[0].plan.as_ref().unwrap();
        assert_eq!(plan.interval_count, 1);
        assert!(subscription.latest_invoice.unwrap().is_id());
    }
}
