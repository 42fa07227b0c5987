//! The authenticated send primitive.
//!
//! Every route builds a [`RequestSpec`] and hands it to [`StripeClient::send`].
//! A send performs exactly one HTTP exchange and returns either the decoded
//! value or one of the three [`StripeError`] kinds.

use std::fmt;
use std::sync::Arc;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;
use stripe_core::{decode_response, encode_form, ParamMap, Result, StripeError, TransportError};

use crate::config::{ConfigError, Environment, StripeConfig};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};

/// `Stripe-Version` header.
pub const STRIPE_VERSION: &str = "stripe-version";

/// `Stripe-Account` header, for calls made on behalf of a connected account.
pub const STRIPE_ACCOUNT: &str = "stripe-account";

/// `Request-Id` response header.
pub const REQUEST_ID: &str = "request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One API call: method, path, parameters and extra headers.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    method: Method,
    path: String,
    query: String,
    body: ParamMap,
    headers: Vec<(HeaderName, HeaderValue)>,
    connected_account: Option<String>,
}

impl RequestSpec {
    /// A request for `path` (e.g. `/v1/customers`).
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: String::new(),
            body: ParamMap::new(),
            headers: Vec::new(),
            connected_account: None,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// A `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Query parameters, flattened and encoded like a body.
    #[must_use]
    pub fn query(mut self, params: &ParamMap) -> Self {
        self.query = encode_form(&params.flatten());
        self
    }

    /// A pre-encoded query string, used as is.
    #[must_use]
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Body parameters.
    #[must_use]
    pub fn body(mut self, params: ParamMap) -> Self {
        self.body = params;
        self
    }

    /// An extra header. Replaces a default header of the same name.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Make the call on behalf of a connected account.
    #[must_use]
    pub fn connected_account(mut self, account: impl Into<String>) -> Self {
        self.connected_account = Some(account.into());
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Encoded query string, empty if none.
    #[must_use]
    pub fn query_string(&self) -> &str {
        &self.query
    }

    /// Body parameters.
    #[must_use]
    pub const fn body_params(&self) -> &ParamMap {
        &self.body
    }

    fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        url
    }
}

/// Stripe API client.
///
/// Cheap to clone; clones share the HTTP transport.
#[derive(Clone)]
pub struct StripeClient {
    config: Arc<StripeConfig>,
    transport: Arc<dyn HttpTransport>,
}

impl StripeClient {
    /// Create a client with a `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StripeConfig) -> std::result::Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.timeout_seconds)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client from [`StripeConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Create a client with a custom transport.
    #[must_use]
    pub fn with_transport(config: StripeConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// A client identical to this one but defaulting to `environment`.
    #[must_use]
    pub fn with_environment(&self, environment: Environment) -> Self {
        let config = StripeConfig {
            environment,
            ..(*self.config).clone()
        };
        Self {
            config: Arc::new(config),
            transport: Arc::clone(&self.transport),
        }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Send a request in the configured environment and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`StripeError::Transport`] if no response was received,
    /// [`StripeError::Remote`] for an error status, and
    /// [`StripeError::MalformedResponse`] if the body does not decode as `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: RequestSpec) -> Result<T> {
        self.send_in(request, self.config.environment).await
    }

    /// Send a request in an explicit environment and decode the response.
    ///
    /// # Errors
    ///
    /// See [`StripeClient::send`].
    pub async fn send_in<T: DeserializeOwned>(
        &self,
        request: RequestSpec,
        environment: Environment,
    ) -> Result<T> {
        let headers = self.headers_for(&request, environment)?;
        let url = request.url(&self.config.base_url);
        let body = encode_form(&request.body.flatten()).into_bytes();

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            environment = %environment,
            key_mode = self.config.credentials.select(environment).mode(),
            body_params = request.body.len(),
            "Sending Stripe request"
        );

        let response = self
            .transport
            .execute(TransportRequest {
                method: request.method.clone(),
                url,
                headers,
                body,
            })
            .await
            .map_err(|e| {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    "Stripe request failed"
                );
                StripeError::Transport(e)
            })?;

        let status = response.status.as_u16();
        let request_id = response
            .headers
            .get(REQUEST_ID)
            .and_then(|v| v.to_str().ok());

        tracing::debug!(
            path = %request.path,
            status,
            request_id = request_id.unwrap_or("-"),
            "Received Stripe response"
        );

        let result = decode_response(status, request_id, &response.body);
        match &result {
            Err(StripeError::Remote(remote)) => {
                tracing::warn!(
                    path = %request.path,
                    status,
                    kind = %remote.kind,
                    code = remote.code.as_deref().unwrap_or("-"),
                    request_id = remote.request_id.as_deref().unwrap_or("-"),
                    "Stripe returned an error"
                );
            }
            Err(StripeError::MalformedResponse { source, .. }) => {
                tracing::warn!(
                    path = %request.path,
                    status,
                    error = %source,
                    "Malformed Stripe response"
                );
            }
            _ => {}
        }
        result
    }

    fn headers_for(
        &self,
        request: &RequestSpec,
        environment: Environment,
    ) -> std::result::Result<HeaderMap, TransportError> {
        let key = self.config.credentials.select(environment);

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(STRIPE_VERSION),
            header_value("Stripe-Version", &self.config.api_version)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(AUTHORIZATION, key.authorization().clone());

        if let Some(account) = &request.connected_account {
            headers.insert(
                HeaderName::from_static(STRIPE_ACCOUNT),
                header_value("Stripe-Account", account)?,
            );
        }

        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> std::result::Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value)
        .map_err(|e| TransportError::with_source(format!("invalid {name} header value"), e))
}

impl fmt::Debug for StripeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;
    use http::StatusCode;
    use std::sync::Mutex;
    use stripe_core::{Customer, DeletedObject, ErrorKind};

    /// Records requests and answers with a canned response.
    struct FakeTransport {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl FakeTransport {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn last(&self) -> TransportRequest {
            self.seen.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            let mut headers = HeaderMap::new();
            headers.insert(REQUEST_ID, HeaderValue::from_static("req_fake"));
            Ok(TransportResponse {
                status: self.status,
                headers,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl HttpTransport for FailingTransport {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> std::result::Result<TransportResponse, TransportError> {
            Err(TransportError::new("connection refused"))
        }
    }

    const DELETED: &str = r#"{"id":"cus_1","object":"customer","deleted":true}"#;

    fn config() -> StripeConfig {
        StripeConfig::new(ApiKey::new("sk_live_999").unwrap())
            .with_test_api_key(ApiKey::new("sk_test_123").unwrap())
            .with_base_url("https://api.example.test")
    }

    #[test]
    fn request_spec_builder() {
        let request = RequestSpec::post("/v1/customers")
            .query(&ParamMap::new().with("expand", vec!["sources"]))
            .body(ParamMap::new().with("email", "jenny@example.com"));

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/v1/customers");
        assert_eq!(request.query_string(), "expand%5B0%5D=sources");
        assert_eq!(request.body_params().len(), 1);

        let request = request.raw_query("client_secret=abc");
        assert_eq!(request.query_string(), "client_secret=abc");

        let request = RequestSpec::get("/v1/customers/cus_1");
        assert_eq!(request.method(), &Method::GET);
        assert!(request.query_string().is_empty());
        assert!(request.body_params().is_empty());
    }

    #[tokio::test]
    async fn testing_environment_signs_with_test_key() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(
            config().with_environment(Environment::Testing),
            transport.clone(),
        );

        let _: DeletedObject = client.send(RequestSpec::delete("/v1/customers/cus_1")).await.unwrap();

        let request = transport.last();
        assert_eq!(request.headers[AUTHORIZATION], "Bearer sk_test_123");
        assert!(request.headers[AUTHORIZATION].is_sensitive());
    }

    #[tokio::test]
    async fn production_ignores_test_key() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(config(), transport.clone());

        let _: DeletedObject = client.send(RequestSpec::delete("/v1/customers/cus_1")).await.unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "Bearer sk_live_999");

        // Selection follows the environment of each call.
        let _: DeletedObject = client
            .send_in(RequestSpec::delete("/v1/customers/cus_1"), Environment::Development)
            .await
            .unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "Bearer sk_test_123");
    }

    #[tokio::test]
    async fn with_environment_shares_transport() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let live = StripeClient::with_transport(config(), transport.clone());
        let test = live.with_environment(Environment::Testing);

        let _: DeletedObject = test.send(RequestSpec::delete("/v1/customers/cus_1")).await.unwrap();
        assert_eq!(transport.last().headers[AUTHORIZATION], "Bearer sk_test_123");
        assert_eq!(live.config().environment, Environment::Production);
    }

    #[tokio::test]
    async fn default_headers_and_overrides() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(config(), transport.clone());

        let request = RequestSpec::delete("/v1/customers/cus_1")
            .header(
                HeaderName::from_static(STRIPE_VERSION),
                HeaderValue::from_static("2020-08-27"),
            )
            .connected_account("acct_123");
        let _: DeletedObject = client.send(request).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.headers[STRIPE_VERSION], "2020-08-27");
        assert_eq!(sent.headers[CONTENT_TYPE], FORM_CONTENT_TYPE);
        assert_eq!(sent.headers[STRIPE_ACCOUNT], "acct_123");
        assert_eq!(sent.headers.get_all(STRIPE_VERSION).iter().count(), 1);
    }

    #[tokio::test]
    async fn url_and_body_encoding() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(config(), transport.clone());

        let body = ParamMap::new()
            .with("email", "jenny@example.com")
            .with("metadata", ParamMap::new().with("order", "6735"));
        let request = RequestSpec::post("/v1/customers")
            .query(&ParamMap::new().with("expand", vec!["sources"]))
            .body(body);
        let _: DeletedObject = client.send(request).await.unwrap();

        let sent = transport.last();
        assert_eq!(sent.method, Method::POST);
        assert_eq!(
            sent.url,
            "https://api.example.test/v1/customers?expand%5B0%5D=sources"
        );
        assert_eq!(
            String::from_utf8(sent.body).unwrap(),
            "email=jenny%40example.com&metadata%5Border%5D=6735"
        );
    }

    #[tokio::test]
    async fn empty_query_adds_no_question_mark() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(config(), transport.clone());

        let _: DeletedObject = client
            .send(RequestSpec::get("/v1/customers/cus_1").query(&ParamMap::new()))
            .await
            .unwrap();
        let sent = transport.last();
        assert_eq!(sent.url, "https://api.example.test/v1/customers/cus_1");
        assert!(sent.body.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_remote_error_with_request_id() {
        let transport = FakeTransport::new(
            StatusCode::PAYMENT_REQUIRED,
            r#"{"error":{"type":"card_error","code":"card_declined","message":"Your card was declined."}}"#,
        );
        let client = StripeClient::with_transport(config(), transport);

        let err = client
            .send::<Customer>(RequestSpec::post("/v1/customers"))
            .await
            .unwrap_err();
        let remote = err.as_remote().unwrap();
        assert_eq!(remote.kind, ErrorKind::Card);
        assert_eq!(remote.request_id.as_deref(), Some("req_fake"));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let client = StripeClient::with_transport(config(), Arc::new(FailingTransport));
        let err = client
            .send::<Customer>(RequestSpec::get("/v1/customers/cus_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StripeError::Transport(ref e) if e.message() == "connection refused"));
    }

    #[tokio::test]
    async fn invalid_connected_account_is_a_transport_error() {
        let transport = FakeTransport::new(StatusCode::OK, DELETED);
        let client = StripeClient::with_transport(config(), transport.clone());
        let err = client
            .send::<DeletedObject>(
                RequestSpec::delete("/v1/customers/cus_1").connected_account("acct\n1"),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StripeError::Transport(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let client = StripeClient::with_transport(config(), Arc::new(FailingTransport));
        let debug = format!("{client:?}");
        assert!(!debug.contains("sk_live_999"));
        assert!(!debug.contains("sk_test_123"));
    }
}
