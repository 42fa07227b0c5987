//! The payment method resource.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::Address;
use crate::ids::PaymentMethodId;

/// A Stripe payment method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentMethod {
    /// Unique identifier.
    pub id: PaymentMethodId,
    /// Object type (always "payment_method").
    #[serde(default)]
    pub object: Option<String>,
    /// Billing information associated with the method.
    #[serde(default)]
    pub billing_details: Option<BillingDetails>,
    /// Card details, for `type: card`.
    #[serde(default)]
    pub card: Option<PaymentMethodCard>,
    /// Time at which the payment method was created.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created: Option<DateTime<Utc>>,
    /// Customer the method is attached to.
    #[serde(default)]
    pub customer: Option<String>,
    /// Whether this object lives in live mode.
    #[serde(default)]
    pub livemode: bool,
    /// Key-value metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Payment method type.
    #[serde(rename = "type", default)]
    pub method_type: Option<PaymentMethodType>,
}

/// Kind of payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodType {
    /// Card.
    Card,
    /// Card present at a terminal.
    CardPresent,
    /// iDEAL bank redirect.
    Ideal,
    /// SEPA Direct Debit.
    SepaDebit,
    /// Any type this crate does not model.
    #[serde(other)]
    Unknown,
}

impl PaymentMethodType {
    /// The value Stripe uses on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::CardPresent => "card_present",
            Self::Ideal => "ideal",
            Self::SepaDebit => "sepa_debit",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentMethodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing information attached to a payment method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BillingDetails {
    /// Billing address.
    #[serde(default)]
    pub address: Option<Address>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Card details of a card payment method.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaymentMethodCard {
    /// Card brand, e.g. "visa".
    pub brand: String,
    /// Results of address and CVC checks.
    #[serde(default)]
    pub checks: Option<CardChecks>,
    /// Two-letter country code of the issuer.
    #[serde(default)]
    pub country: Option<String>,
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
    /// 3D Secure support.
    #[serde(default)]
    pub three_d_secure_usage: Option<ThreeDSecureUsage>,
    /// Digital wallet the card was tokenized by.
    #[serde(default)]
    pub wallet: Option<CardWallet>,
}

/// Address and CVC check results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CardChecks {
    /// Address line 1 check.
    #[serde(default)]
    pub address_line1_check: Option<String>,
    /// Postal code check.
    #[serde(default)]
    pub address_postal_code_check: Option<String>,
    /// CVC check.
    #[serde(default)]
    pub cvc_check: Option<String>,
}

/// 3D Secure support of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ThreeDSecureUsage {
    /// Whether 3D Secure is supported.
    pub supported: bool,
}

/// Wallet details of a tokenized card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardWallet {
    /// Wallet type, e.g. `apple_pay`.
    #[serde(rename = "type")]
    pub wallet_type: String,
    /// Last four digits of the device account number.
    #[serde(default)]
    pub dynamic_last4: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_card_payment_method() {
        let pm: PaymentMethod = serde_json::from_value(json!({
            "id": "pm_1MqLiJLkdIwHu7ixUEgbFdYF",
            "object": "payment_method",
            "billing_details": {
                "address": {"city": null, "country": "US", "line1": null, "line2": null, "postal_code": "94107", "state": null},
                "email": "jenny@example.com",
                "name": null,
                "phone": null
            },
            "card": {
                "brand": "visa",
                "checks": {"address_line1_check": null, "address_postal_code_check": null, "cvc_check": "unchecked"},
                "country": "US",
                "exp_month": 8,
                "exp_year": 2026,
                "fingerprint": "mToisGZ01V71BCos",
                "funding": "credit",
                "last4": "4242",
                "three_d_secure_usage": {"supported": true},
                "wallet": null
            },
            "created": 1_679_945_299,
            "customer": null,
            "livemode": false,
            "metadata": {},
            "type": "card"
        }))
        .unwrap();

        assert_eq!(pm.method_type, Some(PaymentMethodType::Card));
        let card = pm.card.unwrap();
        assert_eq!(card.last4, "4242");
        assert_eq!(card.three_d_secure_usage, Some(ThreeDSecureUsage { supported: true }));
        let billing = pm.billing_details.unwrap();
        assert_eq!(
            billing.address.and_then(|a| a.postal_code).as_deref(),
            Some("94107")
        );
    }

    #[test]
    fn unmodelled_type_is_unknown() {
        let pm: PaymentMethod = serde_json::from_value(json!({
            "id": "pm_1",
            "type": "us_bank_account"
        }))
        .unwrap();
        assert_eq!(pm.method_type, Some(PaymentMethodType::Unknown));
    }

    #[test]
    fn type_wire_names() {
        assert_eq!(PaymentMethodType::SepaDebit.to_string(), "sepa_debit");
        assert_eq!(PaymentMethodType::CardPresent.as_str(), "card_present");
    }
}
