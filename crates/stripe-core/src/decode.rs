//! Response decoding.
//!
//! [`decode_response`] turns a raw status + body into the expected value or an
//! error. The HTTP status is authoritative: any non-2xx response is decoded as
//! Stripe's error envelope, whatever the body looks like.
//!
//! Two helpers cover union-typed payloads:
//!
//! - [`TaggedUnion`] + [`deserialize_tagged`] for payloads with a reliable
//!   discriminator field. An unknown tag is a decode error.
//! - [`Candidate`] + [`resolve_by_priority`] for payloads where the variant has
//!   to be inferred. Candidates are tried in a fixed order and anything that
//!   matches none of them resolves to an explicit fallback value.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::error::{DecodedResult, ErrorEnvelope, RemoteError, StripeError};

/// Decode a response body against the expected type `T`.
///
/// # Errors
///
/// Returns [`StripeError::Remote`] for any non-success status, and
/// [`StripeError::MalformedResponse`] when a success body does not decode as `T`.
pub fn decode_response<T: DeserializeOwned>(
    status: u16,
    request_id: Option<&str>,
    body: &[u8],
) -> DecodedResult<T> {
    if !(200..300).contains(&status) {
        let request_id = request_id.map(str::to_owned);
        let remote = match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.into_remote(status, request_id),
            Err(_) => RemoteError::unparsed(status, request_id),
        };
        return Err(remote.into());
    }

    serde_json::from_slice(body).map_err(|source| StripeError::MalformedResponse { status, source })
}

/// A union whose variant is named by a discriminator field in the payload.
pub trait TaggedUnion: Sized {
    /// Name of the discriminator field, e.g. `object`.
    const TAG_FIELD: &'static str;

    /// All recognized discriminator values.
    const TAGS: &'static [&'static str];

    /// Decode the payload as the variant named by `tag`.
    ///
    /// # Errors
    ///
    /// Fails if `tag` is not one of [`TaggedUnion::TAGS`] or the payload does not
    /// decode as that variant.
    fn decode_variant(tag: &str, value: Value) -> Result<Self, serde_json::Error>;

    /// The error to return for a discriminator value outside [`TaggedUnion::TAGS`].
    #[must_use]
    fn unknown_tag(tag: &str) -> serde_json::Error {
        serde_json::Error::unknown_variant(tag, Self::TAGS)
    }
}

/// Deserialize a [`TaggedUnion`] by reading its discriminator first.
///
/// # Errors
///
/// Fails if the discriminator is missing, not a string, unknown, or the
/// selected variant does not decode.
pub fn deserialize_tagged<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TaggedUnion,
{
    let value = Value::deserialize(deserializer)?;
    let tag = value
        .get(T::TAG_FIELD)
        .ok_or_else(|| D::Error::missing_field(T::TAG_FIELD))?
        .as_str()
        .ok_or_else(|| D::Error::custom(format!("`{}` is not a string", T::TAG_FIELD)))?
        .to_owned();

    T::decode_variant(&tag, value).map_err(D::Error::custom)
}

/// One shape an untagged payload may resolve to.
pub struct Candidate<T> {
    /// Discriminator value identifying this shape when the payload carries one.
    pub tag: &'static str,
    /// Fields that must be present (and non-null) when there is no discriminator.
    pub required: &'static [&'static str],
    /// Decode the payload as this shape.
    pub construct: fn(Value) -> Result<T, serde_json::Error>,
}

impl<T> Candidate<T> {
    /// Whether this candidate applies to the payload.
    ///
    /// If the payload has a string discriminator it must equal [`Candidate::tag`];
    /// otherwise every required field must be present.
    #[must_use]
    pub fn matches(&self, tag_field: &str, payload: &Map<String, Value>) -> bool {
        match payload.get(tag_field).and_then(Value::as_str) {
            Some(tag) => tag == self.tag,
            None => self
                .required
                .iter()
                .all(|field| payload.get(*field).is_some_and(|v| !v.is_null())),
        }
    }
}

impl<T> std::fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("tag", &self.tag)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

/// Resolve a payload against candidates in order.
///
/// The first candidate that matches and decodes wins. A payload that matches
/// none of them (or is not a JSON object) is handed to `unrecognized`.
pub fn resolve_by_priority<T>(
    value: Value,
    tag_field: &str,
    candidates: &[Candidate<T>],
    unrecognized: fn(Value) -> T,
) -> T {
    if let Value::Object(payload) = &value {
        for candidate in candidates {
            if !candidate.matches(tag_field, payload) {
                continue;
            }
            match (candidate.construct)(value.clone()) {
                Ok(resolved) => return resolved,
                Err(error) => {
                    tracing::debug!(
                        candidate = candidate.tag,
                        error = %error,
                        "Payload matched candidate but failed to decode"
                    );
                }
            }
        }
    }

    let tag = value.get(tag_field).and_then(serde_json::Value::as_str);
    tracing::debug!(tag = ?tag, "Payload resolved to unrecognized variant");
    unrecognized(value)
}
