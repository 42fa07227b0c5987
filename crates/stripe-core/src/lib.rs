//! Core types for talking to the Stripe API.
//!
//! This crate has no network code. It provides:
//!
//! - **Parameters**: `ParamTree`, `ParamMap` and the bracket-notation flattener
//!   that turns nested request parameters into `key[sub][0]=value` pairs
//! - **Decoding**: `decode_response` plus helpers for tagged and
//!   ordered-fallback unions
//! - **Errors**: `StripeError` (malformed response, remote error, transport failure)
//! - **Identifiers**: `CustomerId`, `PaymentMethodId`, `SetupIntentId`, ...
//! - **Models**: customers, payment sources, payment methods, setup intents,
//!   invoices, subscriptions, charges, payment intents and events

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod billing;
pub mod common;
pub mod customer;
pub mod decode;
pub mod error;
pub mod event;
pub mod ids;
pub mod params;
pub mod payment;
pub mod payment_method;
pub mod setup_intent;
pub mod source;

pub use billing::{Invoice, InvoiceStatus, Plan, Subscription, SubscriptionItem, SubscriptionStatus};
pub use common::{Address, DeletedObject, Expandable, LastError, List};
pub use customer::{Customer, InvoiceSettings, Shipping};
pub use decode::{decode_response, deserialize_tagged, resolve_by_priority, Candidate, TaggedUnion};
pub use error::{DecodedResult, ErrorKind, RemoteError, Result, StripeError, TransportError};
pub use event::{Event, EventData, EventObject, EventType};
pub use ids::{
    ChargeId, CustomerId, EventId, IdError, InvoiceId, PaymentIntentId, PaymentMethodId,
    SetupIntentId, SourceId, SubscriptionId,
};
pub use params::{encode_form, flatten, ParamMap, ParamTree, Scalar, WireParam};
pub use payment::{Charge, PaymentIntent, PaymentIntentStatus};
pub use payment_method::{
    BillingDetails, CardChecks, CardWallet, PaymentMethod, PaymentMethodCard, PaymentMethodType,
    ThreeDSecureUsage,
};
pub use setup_intent::{CancellationReason, SetupIntent, SetupIntentStatus, SetupIntentUsage};
pub use source::{BankAccount, Card, PaymentSource, Source};
