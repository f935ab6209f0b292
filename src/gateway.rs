//! Checkout-side entry point
//!
//! The host shop hands a configured [`PayconiqClient`] to [`PaymentGateway`]
//! and calls it with order totals as decimals. The gateway converts them to
//! minor units, points the provider callback at the order and forwards to
//! the client.

use crate::client::PayconiqClient;
use crate::types::{Refund, RefundRequest, Transaction};
use crate::{PayconiqError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;
use url::Url;

/// Query parameter carrying the order reference on callback URLs
pub const ORDER_QUERY_PARAM: &str = "order";

/// Convert a decimal amount to integer minor units (cents).
///
/// Rounds half away from zero to two places. Negative amounts and amounts
/// that do not fit in an `i64` are rejected.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PayconiqError::invalid_amount(format!(
            "amount cannot be negative: {}",
            amount
        )));
    }

    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
        .ok_or_else(|| PayconiqError::invalid_amount(format!("amount out of range: {}", amount)))
}

/// Payment gateway used by the checkout flow
#[derive(Debug, Clone)]
pub struct PaymentGateway {
    client: PayconiqClient,
    callback_url: Url,
}

impl PaymentGateway {
    /// Create a gateway around `client`; `callback_url` is where Payconiq reports status changes
    pub fn new(client: PayconiqClient, callback_url: &str) -> Result<Self> {
        let callback_url = Url::parse(callback_url)
            .map_err(|e| PayconiqError::config(format!("Invalid callback URL: {}", e)))?;

        Ok(Self {
            client,
            callback_url,
        })
    }

    /// Get the underlying client
    pub fn client(&self) -> &PayconiqClient {
        &self.client
    }

    /// Callback URL for a single order
    pub fn callback_url(&self, order_reference: &str) -> String {
        let mut url = self.callback_url.clone();
        url.query_pairs_mut()
            .append_pair(ORDER_QUERY_PARAM, order_reference);
        url.to_string()
    }

    /// Start a payment for an order
    pub async fn process_payment(
        &self,
        order_reference: &str,
        total: Decimal,
        currency: &str,
    ) -> Result<Transaction> {
        let amount = to_minor_units(total)?;
        let callback_url = self.callback_url(order_reference);

        info!(order_reference, amount, currency, "Starting Payconiq payment");
        self.client
            .create_transaction(amount, currency, &callback_url)
            .await
    }

    /// Current provider view of a transaction
    pub async fn payment_status(&self, transaction_id: &str) -> Result<Transaction> {
        self.client.retrieve_transaction(transaction_id).await
    }

    /// Refund an amount of a paid transaction
    pub async fn process_refund(
        &self,
        transaction_id: &str,
        amount: Decimal,
        currency: &str,
        reason: Option<&str>,
    ) -> Result<Refund> {
        let mut request = RefundRequest::new(to_minor_units(amount)?, currency);
        if let Some(reason) = reason {
            request = request.with_description(reason);
        }

        info!(transaction_id, amount = request.amount, currency, "Requesting Payconiq refund");
        self.client.create_refund(transaction_id, &request).await
    }
}
