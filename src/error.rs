//! Error types for the payconiq client

use thiserror::Error;

/// Result type alias for payconiq operations
pub type Result<T> = std::result::Result<T, PayconiqError>;

/// Main error type for payconiq operations
#[derive(Error, Debug)]
pub enum PayconiqError {
    /// The provider answered without the identifying field the operation requires
    #[error("Provider error: {message}{}", code_suffix(.code))]
    Provider {
        /// Human-readable message supplied by the provider
        message: String,
        /// Provider error code, when one was returned
        code: Option<String>,
        /// HTTP status of the response, when a response was received
        status: Option<u16>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Amount cannot be expressed in minor currency units
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },
}

fn code_suffix(code: &Option<String>) -> String {
    match code {
        Some(code) => format!(" (code: {})", code),
        None => String::new(),
    }
}

impl PayconiqError {
    /// Create a provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            code: None,
            status: None,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid amount error
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount {
            message: message.into(),
        }
    }

    /// Provider message, if this is a provider error
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Provider { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Provider error code, if one was returned
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Provider { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_without_code() {
        let error = PayconiqError::provider("bad request");
        assert_eq!(error.to_string(), "Provider error: bad request");
        assert_eq!(error.provider_message(), Some("bad request"));
        assert_eq!(error.provider_code(), None);
    }

    #[test]
    fn test_provider_error_with_code() {
        let error = PayconiqError::Provider {
            message: "Transaction not found".to_string(),
            code: Some("PAYMENT_NOT_FOUND".to_string()),
            status: Some(404),
        };
        assert_eq!(
            error.to_string(),
            "Provider error: Transaction not found (code: PAYMENT_NOT_FOUND)"
        );
        assert_eq!(error.provider_code(), Some("PAYMENT_NOT_FOUND"));
    }

    #[test]
    fn test_non_provider_error_has_no_provider_fields() {
        let error = PayconiqError::config("missing merchant id");
        assert_eq!(error.provider_message(), None);
        assert_eq!(error.provider_code(), None);
    }
}
