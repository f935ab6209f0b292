//! HTTP transport used by the client
//!
//! The client never talks to reqwest directly. It hands a [`TransportRequest`]
//! to a [`Transport`], which lets tests substitute a recording transport.

use crate::{PayconiqError, Result};
use http::{HeaderMap, Method};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// A fully built request, ready to be sent
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// JSON body, if any
    pub body: Option<Value>,
}

/// Raw response returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Sends requests to the Payconiq API
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send a single request and return the raw response
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Transport backed by a reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport applying `timeout` to both connect and total request time
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| PayconiqError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}
