//! HTTP client for the Payconiq API

use crate::config::PayconiqConfig;
use crate::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::types::*;
use crate::{PayconiqError, Result};
use http::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, Method};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Decoded provider body plus the status it arrived with
struct ProviderResponse {
    status: Option<u16>,
    body: Map<String, Value>,
}

/// Client for creating, retrieving and refunding Payconiq transactions
#[derive(Clone)]
pub struct PayconiqClient {
    config: PayconiqConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for PayconiqClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayconiqClient")
            .field("config", &self.config)
            .field("transport", &"<transport>")
            .finish()
    }
}

impl PayconiqClient {
    /// Create a client backed by reqwest
    pub fn new(config: PayconiqConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self {
            config,
            transport: Arc::new(transport),
        })
    }

    /// Create a client that sends its requests through `transport`
    ///
    /// The configuration is not validated here; a header that cannot be
    /// built still fails each call with [`PayconiqError::Config`].
    pub fn with_transport(config: PayconiqConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Get the client configuration
    pub fn config(&self) -> &PayconiqConfig {
        &self.config
    }

    /// Full URL for `route` in the configured environment
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.config.base_url().trim_end_matches('/'), route)
    }

    /// URL for `segments` under the base URL; each segment is percent-encoded,
    /// so a `/` inside an identifier cannot reach another route
    fn url_for(&self, segments: &[&str]) -> Result<String> {
        let base = self.config.base_url();
        let mut url = Url::parse(base)
            .map_err(|e| PayconiqError::config(format!("Invalid base URL '{}': {}", base, e)))?;

        url.path_segments_mut()
            .map_err(|_| PayconiqError::config(format!("Base URL cannot carry a path: {}", base)))?
            .pop_if_empty()
            .extend(segments);

        Ok(url.to_string())
    }

    /// Create a new transaction
    ///
    /// `amount` is in minor currency units. Payconiq calls `callback_url` when
    /// the transaction status changes.
    pub async fn create_transaction(
        &self,
        amount: i64,
        currency: &str,
        callback_url: &str,
    ) -> Result<Transaction> {
        let body = CreateTransactionRequest {
            amount,
            currency: currency.to_string(),
            callback_url: callback_url.to_string(),
        };

        let response = self
            .call(Method::POST, &["transactions"], Some(serde_json::to_value(&body)?))
            .await?;
        let transaction = Transaction::from(require_field(response, "transactionId", false)?);

        info!(
            transaction_id = transaction.reference().unwrap_or_default(),
            amount, currency, "Payconiq transaction created"
        );
        Ok(transaction)
    }

    /// Retrieve an existing transaction
    pub async fn retrieve_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let response = self
            .call(Method::GET, &["transactions", transaction_id], None)
            .await?;
        let transaction = Transaction::from(require_field(response, "_id", false)?);

        info!(
            transaction_id,
            status = ?transaction.status_value(),
            "Payconiq transaction retrieved"
        );
        Ok(transaction)
    }

    /// Refund (part of) a transaction
    pub async fn create_refund(&self, transaction_id: &str, request: &RefundRequest) -> Result<Refund> {
        let response = self
            .call(
                Method::POST,
                &["transactions", transaction_id, "refunds"],
                Some(serde_json::to_value(request)?),
            )
            .await?;
        let refund = Refund::from(require_field(response, "_id", true)?);

        info!(
            transaction_id,
            refund_id = refund.id().unwrap_or_default(),
            amount = request.amount,
            "Payconiq refund created"
        );
        Ok(refund)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut authorization = HeaderValue::from_str(&self.config.authorization_header())
            .map_err(|e| PayconiqError::config(format!("Invalid access token: {}", e)))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        Ok(headers)
    }

    /// Send one request.
    ///
    /// A request that cannot be built is a `Config` error and nothing is sent.
    /// Transport failures and undecodable bodies come back as an empty body so
    /// the caller's required-field check rejects them.
    async fn call(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> Result<ProviderResponse> {
        let url = self.url_for(segments)?;
        let headers = self.headers()?;
        debug!(%method, %url, "Sending Payconiq request");

        let request = TransportRequest {
            method,
            url: url.clone(),
            headers,
            body,
        };

        match self.transport.send(request).await {
            Ok(response) => {
                debug!(%url, status = response.status, "Payconiq response received");
                Ok(ProviderResponse {
                    status: Some(response.status),
                    body: decode_body(&response.body),
                })
            }
            Err(e) => {
                warn!(%url, error = %e, "Payconiq request failed");
                Ok(ProviderResponse {
                    status: None,
                    body: Map::new(),
                })
            }
        }
    }
}

/// Parse a response body into a JSON object, or an empty object if it is not one
fn decode_body(bytes: &[u8]) -> Map<String, Value> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => Map::new(),
    }
}

fn has_identifier(body: &Map<String, Value>, field: &str) -> bool {
    match body.get(field) {
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reject a body lacking `field`, otherwise hand back the provider object untouched
fn require_field(
    response: ProviderResponse,
    field: &str,
    with_code: bool,
) -> Result<Map<String, Value>> {
    if !has_identifier(&response.body, field) {
        let message = response
            .body
            .get("message")
            .and_then(scalar_to_string)
            .unwrap_or_else(|| format!("response did not contain {}", field));
        let code = if with_code {
            response.body.get("code").and_then(scalar_to_string)
        } else {
            None
        };

        warn!(status = ?response.status, %message, ?code, "Payconiq rejected request");
        return Err(PayconiqError::Provider {
            message,
            code,
            status: response.status,
        });
    }

    Ok(response.body)
}
