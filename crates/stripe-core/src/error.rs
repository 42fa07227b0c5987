//! Error types for Stripe API calls.

use std::fmt;

use serde::Deserialize;

/// Result type for Stripe API calls.
pub type Result<T> = std::result::Result<T, StripeError>;

/// The outcome of decoding a single response: the expected value or an error.
pub type DecodedResult<T> = Result<T>;

/// Errors that can occur when calling the Stripe API.
///
/// Every failed call resolves to exactly one of these three kinds.
#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    /// A success response did not match the expected shape.
    #[error("malformed response (HTTP {status}): {source}")]
    MalformedResponse {
        /// HTTP status of the response.
        status: u16,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// Stripe answered with its documented error envelope.
    #[error("Stripe API error: {0}")]
    Remote(Box<RemoteError>),

    /// The network call itself failed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

impl StripeError {
    /// Returns the remote error if this is one.
    #[must_use]
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }

    /// Whether this is a decode failure against the expected shape.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedResponse { .. })
    }
}

impl From<RemoteError> for StripeError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(Box::new(err))
    }
}

/// Failure of the outbound HTTP call.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    /// Create a transport error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The failure description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Category of a Stripe error, from the envelope's `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// `api_error`
    Api,
    /// `api_connection_error`
    ApiConnection,
    /// `authentication_error`
    Authentication,
    /// `card_error`
    Card,
    /// `idempotency_error`
    Idempotency,
    /// `invalid_request_error`
    InvalidRequest,
    /// `permission_error`
    Permission,
    /// `rate_limit_error`
    RateLimit,
    /// Any other category, or a body that was not an error envelope.
    Unknown(String),
}

impl ErrorKind {
    /// Get the wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Api => "api_error",
            Self::ApiConnection => "api_connection_error",
            Self::Authentication => "authentication_error",
            Self::Card => "card_error",
            Self::Idempotency => "idempotency_error",
            Self::InvalidRequest => "invalid_request_error",
            Self::Permission => "permission_error",
            Self::RateLimit => "rate_limit_error",
            Self::Unknown(other) => other,
        }
    }
}

impl From<&str> for ErrorKind {
    fn from(value: &str) -> Self {
        match value {
            "api_error" => Self::Api,
            "api_connection_error" => Self::ApiConnection,
            "authentication_error" => Self::Authentication,
            "card_error" => Self::Card,
            "idempotency_error" => Self::Idempotency,
            "invalid_request_error" => Self::InvalidRequest,
            "permission_error" => Self::Permission,
            "rate_limit_error" => Self::RateLimit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded Stripe error envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    /// HTTP status code of the response.
    pub status: u16,
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Short machine-readable code, e.g. `resource_missing`.
    pub code: Option<String>,
    /// Card issuer decline code, for card errors.
    pub decline_code: Option<String>,
    /// Name of the parameter the error relates to.
    pub param: Option<String>,
    /// Link to Stripe's documentation for the code.
    pub doc_url: Option<String>,
    /// Value of the `Request-Id` response header.
    pub request_id: Option<String>,
}

impl RemoteError {
    /// Build the error used when an error-status body is not a valid envelope.
    #[must_use]
    pub fn unparsed(status: u16, request_id: Option<String>) -> Self {
        Self {
            status,
            kind: ErrorKind::Unknown("unknown".to_string()),
            message: format!("HTTP {status}"),
            code: None,
            decline_code: None,
            param: None,
            doc_url: None,
            request_id,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.kind, self.message)?;
        if let Some(param) = &self.param {
            write!(f, " (param: {param})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RemoteError {}

/// Stripe API error response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

/// Stripe error detail.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub decline_code: Option<String>,
    #[serde(default)]
    pub param: Option<String>,
    #[serde(default)]
    pub doc_url: Option<String>,
}

impl ErrorEnvelope {
    pub(crate) fn into_remote(self, status: u16, request_id: Option<String>) -> RemoteError {
        let detail = self.error;
        RemoteError {
            status,
            kind: ErrorKind::from(detail.error_type.as_str()),
            message: detail.message.unwrap_or_else(|| format!("HTTP {status}")),
            code: detail.code,
            decline_code: detail.decline_code,
            param: detail.param,
            doc_url: detail.doc_url,
            request_id,
        }
    }
}
