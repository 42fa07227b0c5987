//! Identifier types for Stripe objects.
//!
//! Stripe identifiers are opaque strings with a type prefix (`cus_`, `pm_`, ...).
//! They are interpolated into request paths, so parsing rejects anything that
//! would change the shape of a URL.
//!
//! # Macro-based ID Types
//!
//! The `stripe_id_type!` macro generates the newtypes so every identifier gets
//! the same serialization, parsing and display behavior.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier was empty.
    #[error("identifier is empty")]
    Empty,

    /// The identifier contains a character that is not allowed in a path segment.
    #[error("identifier contains invalid character {0:?}")]
    InvalidCharacter(char),
}

fn validate(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    match value
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%'))
    {
        Some(c) => Err(IdError::InvalidCharacter(c)),
        None => Ok(()),
    }
}

/// Macro to define a Stripe identifier type with standard trait implementations.
///
/// This macro generates a newtype wrapper around `String` with implementations for:
/// - `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `Serialize`, `Deserialize` (transparent string)
/// - `FromStr`, `Display`, `Debug`
/// - `AsRef<str>`, `Into<String>`
///
/// # Example
///
/// ```ignore
/// stripe_id_type!(CustomerId, "cus_", "A customer identifier.");
/// let id: CustomerId = "cus_123".parse()?;
/// ```
macro_rules! stripe_id_type {
    ($name:ident, $prefix:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// The prefix Stripe uses for this kind of object.
            pub const PREFIX: &'static str = $prefix;

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier starts with the expected prefix.
            #[must_use]
            pub fn has_expected_prefix(&self) -> bool {
                self.0.starts_with(Self::PREFIX)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                validate(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

stripe_id_type!(CustomerId, "cus_", "A customer identifier (`cus_...`).");
stripe_id_type!(
    PaymentMethodId,
    "pm_",
    "A payment method identifier (`pm_...`).\n\nLegacy card objects used as payment methods carry `card_` ids."
);
stripe_id_type!(SetupIntentId, "seti_", "A setup intent identifier (`seti_...`).");
stripe_id_type!(
    SourceId,
    "src_",
    "A payment source identifier.\n\nAttached sources may be `src_`, `card_` or `ba_` objects."
);
stripe_id_type!(InvoiceId, "in_", "An invoice identifier (`in_...`).");
stripe_id_type!(SubscriptionId, "sub_", "A subscription identifier (`sub_...`).");
stripe_id_type!(ChargeId, "ch_", "A charge identifier (`ch_...`).");
stripe_id_type!(PaymentIntentId, "pi_", "A payment intent identifier (`pi_...`).");
stripe_id_type!(EventId, "evt_", "An event identifier (`evt_...`).");
