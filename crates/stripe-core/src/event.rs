//! Webhook and API events.
//!
//! An event's `data.object` can be any Stripe object. [`EventObject`] resolves
//! it against the modelled resources in a fixed order and keeps anything else
//! as raw JSON in [`EventObject::Unrecognized`], so new object kinds never fail
//! the decode of the surrounding event.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::billing::{Invoice, Subscription};
use crate::customer::Customer;
use crate::decode::{resolve_by_priority, Candidate};
use crate::ids::EventId;
use crate::payment::{Charge, PaymentIntent};

/// A Stripe event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Object type (always "event").
    #[serde(default)]
    pub object: Option<String>,
    /// API version used to render `data`.
    #[serde(default)]
    pub api_version: Option<String>,
    /// Time at which the event was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Object the event is about.
    #[serde(default)]
    pub data: Option<EventData>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: Option<bool>,
    /// Webhooks not yet delivered.
    #[serde(default)]
    pub pending_webhooks: Option<u32>,
    /// Event name.
    #[serde(rename = "type")]
    pub event_type: EventType,
}

/// Payload of an event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventData {
    /// The object, as it was when the event fired.
    pub object: EventObject,
    /// Prior values of changed attributes, on `*.updated` events.
    #[serde(default)]
    pub previous_attributes: Option<Map<String, Value>>,
}

/// The object carried by an event.
#[derive(Debug, Clone, PartialEq)]
pub enum EventObject {
    /// An invoice.
    Invoice(Box<Invoice>),
    /// A subscription.
    Subscription(Box<Subscription>),
    /// A payment intent.
    PaymentIntent(Box<PaymentIntent>),
    /// A charge.
    Charge(Box<Charge>),
    /// A customer.
    Customer(Box<Customer>),
    /// Any object this crate does not model, as received.
    Unrecognized(Value),
}

impl EventObject {
    /// Resolution order for event payloads.
    ///
    /// Each `required` list names the fields the matching model cannot decode
    /// without.
    pub const CANDIDATES: &'static [Candidate<Self>] = &[
        Candidate {
            tag: "invoice",
            required: &["amount_due", "amount_paid", "amount_remaining", "currency"],
            construct: |v| serde_json::from_value(v).map(|o| Self::Invoice(Box::new(o))),
        },
        Candidate {
            tag: "subscription",
            required: &[
                "id",
                "current_period_start",
                "current_period_end",
                "customer",
                "items",
                "status",
            ],
            construct: |v| serde_json::from_value(v).map(|o| Self::Subscription(Box::new(o))),
        },
        Candidate {
            tag: "payment_intent",
            required: &["id", "amount", "amount_received", "currency", "status"],
            construct: |v| serde_json::from_value(v).map(|o| Self::PaymentIntent(Box::new(o))),
        },
        Candidate {
            tag: "charge",
            required: &[
                "id",
                "amount",
                "amount_refunded",
                "captured",
                "currency",
                "paid",
                "status",
            ],
            construct: |v| serde_json::from_value(v).map(|o| Self::Charge(Box::new(o))),
        },
        Candidate {
            tag: "customer",
            required: &["id", "created", "invoice_settings"],
            construct: |v| serde_json::from_value(v).map(|o| Self::Customer(Box::new(o))),
        },
    ];

    /// Resolve a raw payload. Never fails.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        resolve_by_priority(value, "object", Self::CANDIDATES, Self::Unrecognized)
    }

    /// The `object` name of the resolved variant, or of the raw payload.
    #[must_use]
    pub fn object(&self) -> Option<&str> {
        match self {
            Self::Invoice(_) => Some("invoice"),
            Self::Subscription(_) => Some("subscription"),
            Self::PaymentIntent(_) => Some("payment_intent"),
            Self::Charge(_) => Some("charge"),
            Self::Customer(_) => Some("customer"),
            Self::Unrecognized(raw) => raw.get("object").and_then(Value::as_str),
        }
    }

    /// Whether the payload matched no modelled resource.
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }
}

impl<'de> Deserialize<'de> for EventObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

macro_rules! event_types {
    ($($variant:ident => $name:literal,)+) => {
        /// Event name.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
        pub enum EventType {
            $(
                #[doc = concat!("`", $name, "`")]
                #[serde(rename = $name)]
                $variant,
            )+
            /// Any event name this crate does not model.
            #[serde(other)]
            Unknown,
        }

        impl EventType {
            /// The event name on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                    Self::Unknown => "unknown",
                }
            }
        }
    };
}

event_types! {
    ChargeCaptured => "charge.captured",
    ChargeExpired => "charge.expired",
    ChargeFailed => "charge.failed",
    ChargePending => "charge.pending",
    ChargeRefunded => "charge.refunded",
    ChargeSucceeded => "charge.succeeded",
    ChargeUpdated => "charge.updated",
    CustomerCreated => "customer.created",
    CustomerDeleted => "customer.deleted",
    CustomerUpdated => "customer.updated",
    CustomerDiscountCreated => "customer.discount.created",
    CustomerDiscountDeleted => "customer.discount.deleted",
    CustomerDiscountUpdated => "customer.discount.updated",
    CustomerSourceCreated => "customer.source.created",
    CustomerSourceDeleted => "customer.source.deleted",
    CustomerSourceExpiring => "customer.source.expiring",
    CustomerSourceUpdated => "customer.source.updated",
    CustomerSubscriptionCreated => "customer.subscription.created",
    CustomerSubscriptionDeleted => "customer.subscription.deleted",
    CustomerSubscriptionTrialWillEnd => "customer.subscription.trial_will_end",
    CustomerSubscriptionUpdated => "customer.subscription.updated",
    InvoiceCreated => "invoice.created",
    InvoiceDeleted => "invoice.deleted",
    InvoiceFinalized => "invoice.finalized",
    InvoiceMarkedUncollectible => "invoice.marked_uncollectible",
    InvoicePaymentActionRequired => "invoice.payment_action_required",
    InvoicePaymentFailed => "invoice.payment_failed",
    InvoicePaymentSucceeded => "invoice.payment_succeeded",
    InvoiceSent => "invoice.sent",
    InvoiceUpcoming => "invoice.upcoming",
    InvoiceUpdated => "invoice.updated",
    InvoiceVoided => "invoice.voided",
    PaymentIntentAmountCapturableUpdated => "payment_intent.amount_capturable_updated",
    PaymentIntentCanceled => "payment_intent.canceled",
    PaymentIntentCreated => "payment_intent.created",
    PaymentIntentPaymentFailed => "payment_intent.payment_failed",
    PaymentIntentSucceeded => "payment_intent.succeeded",
    PaymentMethodAttached => "payment_method.attached",
    PaymentMethodCardAutomaticallyUpdated => "payment_method.card_automatically_updated",
    PaymentMethodDetached => "payment_method.detached",
    PaymentMethodUpdated => "payment_method.updated",
    SetupIntentCanceled => "setup_intent.canceled",
    SetupIntentCreated => "setup_intent.created",
    SetupIntentSetupFailed => "setup_intent.setup_failed",
    SetupIntentSucceeded => "setup_intent.succeeded",
    SourceCanceled => "source.canceled",
    SourceChargeable => "source.chargeable",
    SourceFailed => "source.failed",
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer_payload() -> Value {
        json!({
            "id": "cus_NffrFeUfNV2Hib",
            "address": null,
            "balance": 0,
            "created": 1_680_893_993,
            "currency": null,
            "delinquent": false,
            "email": "jennyrosen@example.com",
            "invoice_settings": {"default_payment_method": null, "footer": null},
            "livemode": false,
            "metadata": {},
            "name": "Jenny Rosen"
        })
    }

    #[test]
    fn untagged_customer_shape_resolves_to_customer() {
        let object = EventObject::from_value(customer_payload());
        match object {
            EventObject::Customer(customer) => {
                assert_eq!(customer.email.as_deref(), Some("jennyrosen@example.com"));
            }
            other => panic!("expected customer, got {other:?}"),
        }
    }

    #[test]
    fn object_tag_overrides_field_heuristics() {
        // Has every invoice field, but says it is a charge.
        let object = EventObject::from_value(json!({
            "id": "ch_1",
            "object": "charge",
            "amount": 500,
            "amount_due": 500,
            "amount_paid": 0,
            "amount_remaining": 500,
            "amount_refunded": 0,
            "captured": true,
            "currency": "usd",
            "paid": true,
            "status": "succeeded"
        }));
        assert!(matches!(object, EventObject::Charge(_)));
    }

    #[test]
    fn invoice_wins_over_payment_intent_without_tag() {
        let object = EventObject::from_value(json!({
            "id": "in_1",
            "amount": 1,
            "amount_due": 1,
            "amount_paid": 0,
            "amount_received": 0,
            "amount_remaining": 1,
            "currency": "usd",
            "status": "open"
        }));
        assert!(matches!(object, EventObject::Invoice(_)));
    }

    #[test]
    fn unmodelled_object_is_kept_raw() {
        let payload = json!({"id": "prod_1", "object": "product", "name": "Gold"});
        let object = EventObject::from_value(payload.clone());
        assert_eq!(object.object(), Some("product"));
        assert_eq!(object, EventObject::Unrecognized(payload));
    }

    #[test]
    fn decodes_full_event() {
        let event: Event = serde_json::from_value(json!({
            "id": "evt_1NG8Du2eZvKYlo2CUI79vXWy",
            "object": "event",
            "api_version": "2019-09-09",
            "created": 1_686_089_970,
            "data": {
                "object": customer_payload(),
                "previous_attributes": {"email": "old@example.com"}
            },
            "livemode": false,
            "pending_webhooks": 0,
            "type": "customer.updated"
        }))
        .unwrap();

        assert_eq!(event.event_type, EventType::CustomerUpdated);
        let data = event.data.unwrap();
        assert_eq!(data.object.object(), Some("customer"));
        assert_eq!(
            data.previous_attributes.unwrap()["email"],
            json!("old@example.com")
        );
    }

    #[test]
    fn unknown_event_type() {
        let event: Event = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "radar.early_fraud_warning.created",
            "data": {"object": {"object": "radar.early_fraud_warning", "id": "issfr_1"}}
        }))
        .unwrap();
        assert_eq!(event.event_type, EventType::Unknown);
        assert!(event.data.unwrap().object.is_unrecognized());
    }

    #[test]
    fn event_type_names() {
        assert_eq!(
            EventType::InvoicePaymentSucceeded.to_string(),
            "invoice.payment_succeeded"
        );
    }
}
