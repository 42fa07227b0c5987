//! Outbound HTTP capability.
//!
//! The dispatcher only needs "send these bytes, give me status, headers and
//! bytes back". [`HttpTransport`] is that seam; [`ReqwestTransport`] is the
//! production implementation.

use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, Method, StatusCode};
use reqwest::Client;
use stripe_core::TransportError;

use crate::config::ConfigError;

/// Largest response body [`ReqwestTransport`] reads by default.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 1_000_000;

/// A fully prepared outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including any query string.
    pub url: String,
    /// Request headers.
    pub headers: HeaderMap,
    /// Encoded body; empty for none.
    pub body: Vec<u8>,
}

/// A raw response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Response body.
    pub body: Vec<u8>,
}

/// Performs one HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Fails only if no response was received.
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_response_bytes: usize,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(timeout_seconds: u64) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self {
            client,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// Set the largest response body accepted before the call fails.
    #[must_use]
    pub const fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    fn too_large(&self) -> TransportError {
        TransportError::new(format!(
            "response body exceeds {} bytes",
            self.max_response_bytes
        ))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let mut response = builder.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out"
            } else if e.is_connect() {
                "failed to connect"
            } else {
                "request failed"
            };
            TransportError::with_source(message, e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();

        let limit = u64::try_from(self.max_response_bytes).unwrap_or(u64::MAX);
        if response.content_length().is_some_and(|len| len > limit) {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransportError::with_source("failed to read response body", e))?
        {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}
