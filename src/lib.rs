//! # payconiq - Payconiq payments for e-commerce checkouts
//!
//! A client for the Payconiq v2 REST API. It creates payment transactions,
//! retrieves their status and issues refunds, and a small gateway adapts it
//! to a checkout flow.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::PayconiqClient;
pub use config::PayconiqConfig;
pub use error::{PayconiqError, Result};
pub use gateway::PaymentGateway;
pub use transport::{ReqwestTransport, Transport, TransportRequest, TransportResponse};
pub use types::*;

/// Current version of the payconiq library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
