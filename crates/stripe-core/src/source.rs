//! Payment sources attached to a customer.
//!
//! A customer's `sources` list mixes three object kinds. Each payload names its
//! kind in the `object` field, so [`PaymentSource`] decodes by that tag and
//! rejects kinds it does not know.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::decode::{deserialize_tagged, TaggedUnion};
use crate::ids::SourceId;

/// A card attached directly to a customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    /// Unique identifier (`card_...`).
    pub id: SourceId,
    /// Object type (always "card").
    pub object: String,
    /// Billing address city.
    #[serde(default)]
    pub address_city: Option<String>,
    /// Billing address country.
    #[serde(default)]
    pub address_country: Option<String>,
    /// Billing address line 1.
    #[serde(default)]
    pub address_line1: Option<String>,
    /// Result of the address line 1 check.
    #[serde(default)]
    pub address_line1_check: Option<String>,
    /// Billing postal code.
    #[serde(default)]
    pub address_zip: Option<String>,
    /// Result of the postal code check.
    #[serde(default)]
    pub address_zip_check: Option<String>,
    /// Card brand, e.g. "Visa".
    #[serde(default)]
    pub brand: Option<String>,
    /// Two-letter country code of the issuer.
    #[serde(default)]
    pub country: Option<String>,
    /// Owning customer id.
    #[serde(default)]
    pub customer: Option<String>,
    /// Result of the CVC check.
    #[serde(default)]
    pub cvc_check: Option<String>,
    /// Expiration month.
    pub exp_month: u32,
    /// Expiration year.
    pub exp_year: u32,
    /// Card number fingerprint.
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Funding type: credit, debit, prepaid or unknown.
    #[serde(default)]
    pub funding: Option<String>,
    /// Last four digits.
    pub last4: String,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Cardholder name.
    #[serde(default)]
    pub name: Option<String>,
}

/// A bank account attached to a customer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BankAccount {
    /// Unique identifier (`ba_...`).
    pub id: SourceId,
    /// Object type (always "bank_account").
    pub object: String,
    /// Account holder name.
    #[serde(default)]
    pub account_holder_name: Option<String>,
    /// `individual` or `company`.
    #[serde(default)]
    pub account_holder_type: Option<String>,
    /// Bank name.
    #[serde(default)]
    pub bank_name: Option<String>,
    /// Two-letter country code.
    pub country: String,
    /// Three-letter currency code.
    pub currency: String,
    /// Owning customer id.
    #[serde(default)]
    pub customer: Option<String>,
    /// Account number fingerprint.
    #[serde(default)]
    pub fingerprint: Option<String>,
    /// Last four digits.
    pub last4: String,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Routing transit number.
    #[serde(default)]
    pub routing_number: Option<String>,
    /// Verification status, e.g. "new" or "verified".
    #[serde(default)]
    pub status: Option<String>,
}

/// A Sources API object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Source {
    /// Unique identifier (`src_...`).
    pub id: SourceId,
    /// Object type (always "source").
    pub object: String,
    /// Amount associated with the source, if any.
    #[serde(default)]
    pub amount: Option<i64>,
    /// Secret used client-side to fetch the source.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Time at which the source was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Three-letter currency code.
    #[serde(default)]
    pub currency: Option<String>,
    /// Owning customer id.
    #[serde(default)]
    pub customer: Option<String>,
    /// Authentication flow: redirect, receiver, `code_verification` or none.
    #[serde(default)]
    pub flow: Option<String>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Status, e.g. "chargeable".
    pub status: String,
    /// Source type, e.g. "card" or "sepa_debit".
    #[serde(rename = "type")]
    pub source_type: String,
    /// `reusable` or `single_use`.
    #[serde(default)]
    pub usage: Option<String>,
}

/// One of the objects that can sit in a customer's `sources` list.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentSource {
    /// `object: "bank_account"`.
    BankAccount(BankAccount),
    /// `object: "card"`.
    Card(Card),
    /// `object: "source"`.
    Source(Source),
}

impl PaymentSource {
    /// Identifier of the underlying object.
    #[must_use]
    pub fn id(&self) -> &SourceId {
        match self {
            Self::BankAccount(account) => &account.id,
            Self::Card(card) => &card.id,
            Self::Source(source) => &source.id,
        }
    }

    /// The discriminator value this variant decodes from.
    #[must_use]
    pub const fn object(&self) -> &'static str {
        match self {
            Self::BankAccount(_) => "bank_account",
            Self::Card(_) => "card",
            Self::Source(_) => "source",
        }
    }

    /// The bank account, if this is one.
    #[must_use]
    pub const fn as_bank_account(&self) -> Option<&BankAccount> {
        match self {
            Self::BankAccount(account) => Some(account),
            _ => None,
        }
    }

    /// The card, if this is one.
    #[must_use]
    pub const fn as_card(&self) -> Option<&Card> {
        match self {
            Self::Card(card) => Some(card),
            _ => None,
        }
    }

    /// The source object, if this is one.
    #[must_use]
    pub const fn as_source(&self) -> Option<&Source> {
        match self {
            Self::Source(source) => Some(source),
            _ => None,
        }
    }
}

impl TaggedUnion for PaymentSource {
    const TAG_FIELD: &'static str = "object";
    const TAGS: &'static [&'static str] = &["bank_account", "card", "source"];

    fn decode_variant(tag: &str, value: Value) -> Result<Self, serde_json::Error> {
        match tag {
            "bank_account" => serde_json::from_value(value).map(Self::BankAccount),
            "card" => serde_json::from_value(value).map(Self::Card),
            "source" => serde_json::from_value(value).map(Self::Source),
            other => Err(Self::unknown_tag(other)),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_tagged(deserializer)
    }
}
