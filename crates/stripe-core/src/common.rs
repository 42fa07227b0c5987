//! Shapes shared by several resources.

use serde::Deserialize;

/// A postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    /// City, district, suburb, town, or village.
    #[serde(default)]
    pub city: Option<String>,
    /// Two-letter country code (ISO 3166-1 alpha-2).
    #[serde(default)]
    pub country: Option<String>,
    /// Address line 1 (street, PO box, or company name).
    #[serde(default)]
    pub line1: Option<String>,
    /// Address line 2 (apartment, suite, unit, or building).
    #[serde(default)]
    pub line2: Option<String>,
    /// ZIP or postal code.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// State, county, province, or region.
    #[serde(default)]
    pub state: Option<String>,
}

/// Error recorded on an intent after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastError {
    /// Error type, e.g. `card_error`.
    #[serde(rename = "type")]
    pub error_type: String,
    /// Short code.
    #[serde(default)]
    pub code: Option<String>,
    /// Issuer decline code.
    #[serde(default)]
    pub decline_code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
    /// Parameter the error relates to.
    #[serde(default)]
    pub param: Option<String>,
}

/// A field that holds either an object id or, when expanded, the object itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    /// Not expanded: just the id.
    Id(String),
    /// Expanded object.
    Object(Box<T>),
}

impl<T> Expandable<T> {
    /// The expanded object, if present.
    #[must_use]
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Object(object) => Some(object),
        }
    }

    /// Whether only the id was returned.
    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::Id(_))
    }
}

/// Stripe list response wrapper.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct List<T> {
    /// Object type (always "list").
    pub object: String,
    /// Data items.
    pub data: Vec<T>,
    /// Whether there are more items.
    pub has_more: bool,
    /// URL for the list endpoint.
    #[serde(default)]
    pub url: Option<String>,
}

/// Response to a delete call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedObject {
    /// Id of the deleted object.
    pub id: String,
    /// Type of the deleted object.
    #[serde(default)]
    pub object: Option<String>,
    /// Always true for a successful delete.
    pub deleted: bool,
}
