//! Merchant configuration for the Payconiq API

use crate::{PayconiqError, Result};
use http::HeaderValue;
use std::env;
use std::time::Duration;
use url::Url;

/// Production API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.payconiq.com/v2";

/// Sandbox API base URL
pub const DEFAULT_SANDBOX_ENDPOINT: &str = "https://dev.payconiq.com/v2";

/// Connect and read timeout applied to every request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Immutable client configuration.
///
/// Built once and handed to [`crate::PayconiqClient`]; there are no setters.
#[derive(Clone, PartialEq, Eq)]
pub struct PayconiqConfig {
    /// Merchant ID registered with Payconiq
    pub merchant_id: String,
    /// Token securing requests between the merchant backend and Payconiq
    pub access_token: String,
    /// Route requests to the sandbox environment
    pub sandbox: bool,
    /// Production base URL
    pub endpoint: String,
    /// Sandbox base URL
    pub sandbox_endpoint: String,
    /// Connect and read timeout
    pub timeout: Duration,
    /// Optional scheme placed before the token in the `Authorization` header
    pub authorization_scheme: Option<String>,
}

impl std::fmt::Debug for PayconiqConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayconiqConfig")
            .field("merchant_id", &self.merchant_id)
            .field("access_token", &"<redacted>")
            .field("sandbox", &self.sandbox)
            .field("endpoint", &self.endpoint)
            .field("sandbox_endpoint", &self.sandbox_endpoint)
            .field("timeout", &self.timeout)
            .field("authorization_scheme", &self.authorization_scheme)
            .finish()
    }
}

impl PayconiqConfig {
    /// Create a new configuration for the production environment
    pub fn new(merchant_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            access_token: access_token.into(),
            sandbox: false,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sandbox_endpoint: DEFAULT_SANDBOX_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            authorization_scheme: None,
        }
    }

    /// Route requests to the sandbox (or back to production)
    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Override the production base URL
    pub fn with_endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }

    /// Override the sandbox base URL
    pub fn with_sandbox_endpoint(mut self, url: impl Into<String>) -> Self {
        self.sandbox_endpoint = url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Prefix the access token with a scheme such as `Bearer`
    pub fn with_authorization_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.authorization_scheme = Some(scheme.into());
        self
    }

    /// Base URL for the selected environment
    pub fn base_url(&self) -> &str {
        if self.sandbox {
            &self.sandbox_endpoint
        } else {
            &self.endpoint
        }
    }

    /// Value of the `Authorization` header
    pub fn authorization_header(&self) -> String {
        match self.authorization_scheme.as_deref() {
            Some(scheme) if !scheme.is_empty() => format!("{} {}", scheme, self.access_token),
            _ => self.access_token.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.merchant_id.trim().is_empty() {
            return Err(PayconiqError::config("Merchant ID cannot be empty"));
        }

        if self.access_token.trim().is_empty() {
            return Err(PayconiqError::config("Access token cannot be empty"));
        }

        if HeaderValue::from_str(&self.authorization_header()).is_err() {
            return Err(PayconiqError::config("Access token is not a valid header value"));
        }

        validate_base_url("endpoint", &self.endpoint)?;
        validate_base_url("sandbox endpoint", &self.sandbox_endpoint)?;

        if self.timeout.is_zero() {
            return Err(PayconiqError::config("Timeout must be greater than zero"));
        }

        Ok(())
    }

    /// Create a configuration from environment variables
    ///
    /// `PAYCONIQ_MERCHANT_ID` and `PAYCONIQ_ACCESS_TOKEN` are required.
    /// `PAYCONIQ_SANDBOX`, `PAYCONIQ_ENDPOINT`, `PAYCONIQ_SANDBOX_ENDPOINT`,
    /// `PAYCONIQ_TIMEOUT_SECS` and `PAYCONIQ_AUTH_SCHEME` are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create a configuration from the same variables as [`Self::from_env`],
    /// read through `lookup` instead of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let merchant_id = lookup("PAYCONIQ_MERCHANT_ID").ok_or_else(|| {
            PayconiqError::config("PAYCONIQ_MERCHANT_ID environment variable is required")
        })?;
        let access_token = lookup("PAYCONIQ_ACCESS_TOKEN").ok_or_else(|| {
            PayconiqError::config("PAYCONIQ_ACCESS_TOKEN environment variable is required")
        })?;

        let mut config = Self::new(merchant_id, access_token);

        if let Some(sandbox) = lookup("PAYCONIQ_SANDBOX") {
            config.sandbox = parse_flag(&sandbox);
        }
        if let Some(endpoint) = lookup("PAYCONIQ_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("PAYCONIQ_SANDBOX_ENDPOINT") {
            config.sandbox_endpoint = endpoint;
        }
        if let Some(secs) = lookup("PAYCONIQ_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PayconiqError::config(format!("PAYCONIQ_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(scheme) = lookup("PAYCONIQ_AUTH_SCHEME") {
            if !scheme.trim().is_empty() {
                config.authorization_scheme = Some(scheme.trim().to_string());
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn validate_base_url(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| PayconiqError::config(format!("Invalid {} URL '{}': {}", name, value, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(PayconiqError::config(format!(
            "{} URL must use http or https, got {}",
            name, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = PayconiqConfig::new("merchant-1", "token-1");
        assert_eq!(config.endpoint, "https://api.payconiq.com/v2");
        assert_eq!(config.sandbox_endpoint, "https://dev.payconiq.com/v2");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(!config.sandbox);
        assert!(config.authorization_scheme.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_follows_sandbox_flag() {
        let config = PayconiqConfig::new("merchant-1", "token-1");
        assert_eq!(config.base_url(), DEFAULT_ENDPOINT);

        let config = config.with_sandbox(true);
        assert_eq!(config.base_url(), DEFAULT_SANDBOX_ENDPOINT);
    }

    #[test]
    fn test_overridden_endpoints() {
        let config = PayconiqConfig::new("merchant-1", "token-1")
            .with_endpoint("https://prod.example.com/v2")
            .with_sandbox_endpoint("https://test.example.com/v2");
        assert_eq!(config.base_url(), "https://prod.example.com/v2");
        assert_eq!(
            config.with_sandbox(true).base_url(),
            "https://test.example.com/v2"
        );
    }

    #[test]
    fn test_authorization_header_is_raw_token_by_default() {
        let config = PayconiqConfig::new("merchant-1", "secret-token");
        assert_eq!(config.authorization_header(), "secret-token");
    }

    #[test]
    fn test_authorization_header_with_scheme() {
        let config =
            PayconiqConfig::new("merchant-1", "secret-token").with_authorization_scheme("Bearer");
        assert_eq!(config.authorization_header(), "Bearer secret-token");
    }

    #[test]
    fn test_validate_rejects_missing_credentials() {
        let err = PayconiqConfig::new("", "token").validate().unwrap_err();
        assert!(err.to_string().contains("Merchant ID cannot be empty"));

        let err = PayconiqConfig::new("merchant", " ").validate().unwrap_err();
        assert!(err.to_string().contains("Access token cannot be empty"));
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let err = PayconiqConfig::new("merchant", "token")
            .with_endpoint("not a url")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint URL"));

        let err = PayconiqConfig::new("merchant", "token")
            .with_sandbox_endpoint("ftp://dev.payconiq.com/v2")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("must use http or https"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let err = PayconiqConfig::new("merchant", "token")
            .with_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("Timeout"));
    }

    #[test]
    fn test_validate_rejects_token_unfit_for_header() {
        let err = PayconiqConfig::new("merchant", "tok\nen")
            .validate()
            .unwrap_err();
        assert!(matches!(err, PayconiqError::Config { .. }));
        assert!(err.to_string().contains("not a valid header value"));

        let err = PayconiqConfig::new("merchant", "token")
            .with_authorization_scheme("Bearer\r")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("not a valid header value"));
    }

    #[test]
    fn test_from_lookup() {
        let config = PayconiqConfig::from_lookup(lookup_from(&[
            ("PAYCONIQ_MERCHANT_ID", "merchant-env"),
            ("PAYCONIQ_ACCESS_TOKEN", "token-env"),
            ("PAYCONIQ_SANDBOX", "true"),
            ("PAYCONIQ_TIMEOUT_SECS", "5"),
            ("PAYCONIQ_AUTH_SCHEME", "Bearer"),
        ]))
        .unwrap();

        assert_eq!(config.merchant_id, "merchant-env");
        assert!(config.sandbox);
        assert_eq!(config.base_url(), DEFAULT_SANDBOX_ENDPOINT);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.authorization_header(), "Bearer token-env");
    }

    #[test]
    fn test_from_lookup_overrides_endpoints() {
        let config = PayconiqConfig::from_lookup(lookup_from(&[
            ("PAYCONIQ_MERCHANT_ID", "merchant-env"),
            ("PAYCONIQ_ACCESS_TOKEN", "token-env"),
            ("PAYCONIQ_ENDPOINT", "https://prod.example.com/v2"),
            ("PAYCONIQ_SANDBOX_ENDPOINT", "https://test.example.com/v2"),
        ]))
        .unwrap();

        assert!(!config.sandbox);
        assert_eq!(config.base_url(), "https://prod.example.com/v2");
        assert_eq!(config.sandbox_endpoint, "https://test.example.com/v2");
        assert_eq!(config.authorization_header(), "token-env");
    }

    #[test]
    fn test_from_lookup_requires_credentials() {
        let err = PayconiqConfig::from_lookup(lookup_from(&[(
            "PAYCONIQ_ACCESS_TOKEN",
            "token-env",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("PAYCONIQ_MERCHANT_ID"));

        let err = PayconiqConfig::from_lookup(lookup_from(&[(
            "PAYCONIQ_MERCHANT_ID",
            "merchant-env",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("PAYCONIQ_ACCESS_TOKEN"));
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let err = PayconiqConfig::from_lookup(lookup_from(&[
            ("PAYCONIQ_MERCHANT_ID", "merchant-env"),
            ("PAYCONIQ_ACCESS_TOKEN", "token-env"),
            ("PAYCONIQ_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PAYCONIQ_TIMEOUT_SECS"));
    }

    #[test]
    fn test_debug_redacts_access_token() {
        let config = PayconiqConfig::new("merchant-1", "very-secret");
        let debug = format!("{:?}", config);
        assert!(debug.contains("merchant-1"));
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
