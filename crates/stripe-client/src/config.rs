//! Client configuration and credential selection.
//!
//! Configuration is built once (directly or with [`StripeConfig::from_env`]) and
//! never mutated afterwards. Which key a request is signed with is decided per
//! call by [`Credentials::select`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use http::HeaderValue;
use serde::Deserialize;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// API version sent with every request unless overridden.
pub const DEFAULT_API_VERSION: &str = "2019-09-09";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

const SECRET_PATHS: [&str; 2] = [".secrets/stripe.json", "../.secrets/stripe.json"];

/// Errors raised while building configuration or a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No primary API key was found.
    #[error("missing Stripe API key (set STRIPE_API_KEY or provide .secrets/stripe.json)")]
    MissingApiKey,

    /// The API key cannot be sent in an HTTP header.
    #[error("invalid API key: {0}")]
    InvalidApiKey(&'static str),

    /// An environment variable held an unusable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Runtime environment the client runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Environment {
    /// Live traffic. Always uses the primary key.
    #[default]
    Production,
    /// Local development.
    Development,
    /// Automated tests.
    Testing,
}

impl Environment {
    /// Whether this is the live environment.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" | "live" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            _ => Err(ConfigError::InvalidValue {
                name: "STRIPE_ENVIRONMENT",
                value: s.to_string(),
            }),
        }
    }
}

/// A secret API key.
///
/// The key is only reachable through the prepared `Authorization` header; its
/// `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    authorization: HeaderValue,
    mode: &'static str,
}

impl ApiKey {
    /// Validate a key and prepare its bearer header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty or contains
    /// characters that are not visible ASCII.
    pub fn new(key: impl AsRef<str>) -> Result<Self, ConfigError> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(ConfigError::InvalidApiKey("key is empty"));
        }
        if !key.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ConfigError::InvalidApiKey(
                "key must contain only visible ASCII characters",
            ));
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| ConfigError::InvalidApiKey("key is not a valid header value"))?;
        authorization.set_sensitive(true);

        let mode = if key.starts_with("sk_live_") || key.starts_with("rk_live_") {
            "live"
        } else if key.starts_with("sk_test_") || key.starts_with("rk_test_") {
            "test"
        } else {
            "unknown"
        };

        Ok(Self {
            authorization,
            mode,
        })
    }

    /// The `Authorization` header value for this key (marked sensitive).
    #[must_use]
    pub fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }

    /// `live`, `test` or `unknown`, from the key prefix.
    #[must_use]
    pub const fn mode(&self) -> &'static str {
        self.mode
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({} key, redacted)", self.mode)
    }
}

impl FromStr for ApiKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The configured API keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    primary: ApiKey,
    test: Option<ApiKey>,
}

impl Credentials {
    /// Credentials with a primary key and an optional test key.
    #[must_use]
    pub const fn new(primary: ApiKey, test: Option<ApiKey>) -> Self {
        Self { primary, test }
    }

    /// Pick the key for a call made in `environment`.
    ///
    /// Outside production the test key is used when one is configured. In
    /// production the primary key is always used.
    #[must_use]
    pub fn select(&self, environment: Environment) -> &ApiKey {
        match (&self.test, environment) {
            (Some(test), Environment::Development | Environment::Testing) => test,
            _ => &self.primary,
        }
    }

    /// Whether a test key is configured.
    #[must_use]
    pub const fn has_test_key(&self) -> bool {
        self.test.is_some()
    }
}

/// Stripe client configuration.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// API keys.
    pub credentials: Credentials,

    /// Environment used by calls that do not name one (default: production).
    pub environment: Environment,

    /// API host (default: `https://api.stripe.com`).
    pub base_url: String,

    /// Value of the `Stripe-Version` header (default: `2019-09-09`).
    pub api_version: String,

    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

/// Stripe secrets file structure.
#[derive(Debug, Deserialize)]
struct StripeSecrets {
    api_key: String,
    #[serde(default)]
    test_api_key: Option<String>,
}

impl StripeConfig {
    /// Configuration with a primary key and default settings.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            credentials: Credentials::new(api_key, None),
            environment: Environment::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Set the test key used outside production.
    #[must_use]
    pub fn with_test_api_key(mut self, key: ApiKey) -> Self {
        self.credentials.test = Some(key);
        self
    }

    /// Set the default environment.
    #[must_use]
    pub const fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the API host.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the `Stripe-Version` header value.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Load configuration from a secrets file and environment variables.
    ///
    /// Keys come from the first readable `.secrets/stripe.json` or
    /// `../.secrets/stripe.json`, else from `STRIPE_API_KEY` and
    /// `STRIPE_TEST_API_KEY`. `STRIPE_ENVIRONMENT`, `STRIPE_API_BASE` and
    /// `STRIPE_TIMEOUT_SECONDS` are read from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no primary key is found or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets = SECRET_PATHS.iter().find_map(|path| {
            load_secrets_file::<StripeSecrets>(path)
                .map(|secrets| {
                    tracing::info!(path = %path, "Loaded Stripe secrets from file");
                    secrets
                })
                .ok()
        });
        if secrets.is_none() {
            tracing::debug!("Stripe secrets file not found, using environment variables");
        }

        Self::from_sources(secrets, |name| std::env::var(name).ok())
    }

    fn from_sources(
        secrets: Option<StripeSecrets>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (api_key, test_api_key) = match secrets {
            Some(secrets) => (Some(secrets.api_key), secrets.test_api_key),
            None => (var("STRIPE_API_KEY"), var("STRIPE_TEST_API_KEY")),
        };

        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let mut config = Self::new(ApiKey::new(api_key)?);

        if let Some(test_key) = test_api_key.filter(|key| !key.trim().is_empty()) {
            config = config.with_test_api_key(ApiKey::new(test_key)?);
        }

        if let Some(environment) = var("STRIPE_ENVIRONMENT") {
            config = config.with_environment(environment.parse()?);
        }

        if let Some(base_url) = var("STRIPE_API_BASE") {
            config = config.with_base_url(base_url);
        }

        if let Some(timeout) = var("STRIPE_TIMEOUT_SECONDS") {
            let seconds = timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "STRIPE_TIMEOUT_SECONDS",
                value: timeout.clone(),
            })?;
            config = config.with_timeout_seconds(seconds);
        }

        Ok(config)
    }
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn key(value: &str) -> ApiKey {
        ApiKey::new(value).unwrap()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_key_used_outside_production() {
        let credentials = Credentials::new(key("sk_live_999"), Some(key("sk_test_123")));
        assert_eq!(
            credentials.select(Environment::Testing).authorization(),
            "Bearer sk_test_123"
        );
        assert_eq!(
            credentials.select(Environment::Development).authorization(),
            "Bearer sk_test_123"
        );
        assert_eq!(
            credentials.select(Environment::Production).authorization(),
            "Bearer sk_live_999"
        );
    }

    #[test]
    fn primary_key_without_test_key() {
        let credentials = Credentials::new(key("sk_live_999"), None);
        assert_eq!(
            credentials.select(Environment::Testing).authorization(),
            "Bearer sk_live_999"
        );
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = key("sk_live_supersecret");
        let debug = format!("{key:?}");
        assert!(!debug.contains("supersecret"));
        assert_eq!(debug, "ApiKey(live key, redacted)");
        assert!(key.authorization().is_sensitive());
    }

    #[test]
    fn api_key_mode_from_prefix() {
        assert_eq!(key("sk_live_1").mode(), "live");
        assert_eq!(key("rk_test_1").mode(), "test");
        assert_eq!(key("pk_other").mode(), "unknown");
    }

    #[test]
    fn api_key_rejects_header_breaking_input() {
        assert!(matches!(ApiKey::new(""), Err(ConfigError::InvalidApiKey(_))));
        assert!(ApiKey::new("sk_test_1\r\nX-Evil: 1").is_err());
        assert!(ApiKey::new("sk_test_ä").is_err());
    }

    #[test]
    fn environment_names() {
        assert_eq!("live".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Testing);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn builder_pattern() {
        let config = StripeConfig::new(key("sk_live_1"))
            .with_test_api_key(key("sk_test_1"))
            .with_environment(Environment::Development)
            .with_base_url("http://localhost:12111/")
            .with_timeout_seconds(5);

        assert_eq!(config.base_url, "http://localhost:12111");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.timeout_seconds, 5);
        assert!(config.credentials.has_test_key());
    }

    #[test]
    fn from_sources_reads_variables() {
        let config = StripeConfig::from_sources(
            None,
            lookup(&[
                ("STRIPE_API_KEY", "sk_live_abc"),
                ("STRIPE_TEST_API_KEY", "sk_test_abc"),
                ("STRIPE_ENVIRONMENT", "testing"),
                ("STRIPE_API_BASE", "http://127.0.0.1:9000"),
                ("STRIPE_TIMEOUT_SECONDS", "12"),
            ]),
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Testing);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout_seconds, 12);
        assert_eq!(
            config.credentials.select(config.environment).authorization(),
            "Bearer sk_test_abc"
        );
    }

    #[test]
    fn secrets_file_takes_precedence() {
        let secrets = StripeSecrets {
            api_key: "sk_live_file".into(),
            test_api_key: None,
        };
        let config =
            StripeConfig::from_sources(Some(secrets), lookup(&[("STRIPE_API_KEY", "sk_live_env")]))
                .unwrap();
        assert_eq!(
            config.credentials.select(Environment::Production).authorization(),
            "Bearer sk_live_file"
        );
        assert_eq!(config.environment, Environment::Production);
    }

    #[test]
    fn missing_key_is_an_error() {
        let err = StripeConfig::from_sources(None, lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn bad_timeout_is_an_error() {
        let err = StripeConfig::from_sources(
            None,
            lookup(&[("STRIPE_API_KEY", "sk_live_1"), ("STRIPE_TIMEOUT_SECONDS", "soon")]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                name: "STRIPE_TIMEOUT_SECONDS",
                ..
            }
        ));
    }
}
