//! Core types for the Payconiq API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::PayconiqError;

/// Read `key` as a non-empty string
fn str_field<'a>(raw: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A payment transaction as reported by Payconiq.
///
/// The provider's JSON object is kept as-is; accessors read from it
/// leniently and never reject a field of an unexpected shape. Creation
/// responses identify the transaction through `transactionId`, retrieval
/// responses through `_id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction {
    raw: Map<String, Value>,
}

impl Transaction {
    /// Identifier returned when the transaction is created
    pub fn transaction_id(&self) -> Option<&str> {
        str_field(&self.raw, "transactionId")
    }

    /// Identifier returned when the transaction is retrieved
    pub fn id(&self) -> Option<&str> {
        str_field(&self.raw, "_id")
    }

    /// The provider-issued identifier, whichever field carried it
    pub fn reference(&self) -> Option<&str> {
        self.transaction_id().or_else(|| self.id())
    }

    /// Amount in minor currency units, when the provider sent an integer
    pub fn amount(&self) -> Option<i64> {
        self.raw.get("amount").and_then(Value::as_i64)
    }

    /// ISO 4217 currency code
    pub fn currency(&self) -> Option<&str> {
        str_field(&self.raw, "currency")
    }

    /// Callback where Payconiq posts status updates
    pub fn callback_url(&self) -> Option<&str> {
        str_field(&self.raw, "callbackUrl")
    }

    /// Provider status when it is a plain string
    pub fn status(&self) -> Option<&str> {
        str_field(&self.raw, "status")
    }

    /// Provider status in whatever shape it was sent; opaque to this client
    pub fn status_value(&self) -> Option<&Value> {
        self.raw.get("status")
    }

    /// Any field of the provider object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The provider object, unchanged
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Consume the transaction, returning the provider object
    pub fn into_map(self) -> Map<String, Value> {
        self.raw
    }
}

impl From<Map<String, Value>> for Transaction {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}

/// A refund issued against a transaction
///
/// Like [`Transaction`], the provider's object is kept unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Refund {
    raw: Map<String, Value>,
}

impl Refund {
    /// Refund identifier
    pub fn id(&self) -> Option<&str> {
        str_field(&self.raw, "_id")
    }

    /// Transaction the refund belongs to
    pub fn transaction_id(&self) -> Option<&str> {
        str_field(&self.raw, "transactionId")
    }

    /// Amount in minor currency units, when the provider sent an integer
    pub fn amount(&self) -> Option<i64> {
        self.raw.get("amount").and_then(Value::as_i64)
    }

    /// ISO 4217 currency code
    pub fn currency(&self) -> Option<&str> {
        str_field(&self.raw, "currency")
    }

    /// SEPA scheme used to pay the refund out, if recognised
    pub fn payment_method(&self) -> Option<PaymentMethod> {
        str_field(&self.raw, "paymentMethod").and_then(|m| m.parse().ok())
    }

    /// Free text shown to the customer
    pub fn description(&self) -> Option<&str> {
        self.raw.get("description").and_then(Value::as_str)
    }

    /// Any field of the provider object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// The provider object, unchanged
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }
}

impl From<Map<String, Value>> for Refund {
    fn from(raw: Map<String, Value>) -> Self {
        Self { raw }
    }
}

/// Refund payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// SEPA Credit Transfer
    #[serde(rename = "SCT")]
    Sct,
    /// SEPA Direct Debit
    #[default]
    #[serde(rename = "SDD")]
    Sdd,
}

impl PaymentMethod {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Sct => "SCT",
            PaymentMethod::Sdd => "SDD",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = PayconiqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SCT" => Ok(PaymentMethod::Sct),
            "SDD" => Ok(PaymentMethod::Sdd),
            other => Err(PayconiqError::config(format!(
                "Unknown refund payment method: {}",
                other
            ))),
        }
    }
}

/// Body of `POST /transactions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Amount in minor currency units
    pub amount: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// Callback where Payconiq posts status updates
    #[serde(rename = "callbackUrl")]
    pub callback_url: String,
}

/// Body of `POST /transactions/{id}/refunds`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundRequest {
    /// Amount in minor currency units
    pub amount: i64,
    /// ISO 4217 currency code
    pub currency: String,
    /// SEPA scheme used to pay the refund out
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    /// Free text shown to the customer
    pub description: String,
}

impl RefundRequest {
    /// Create a refund request paid out by SEPA Direct Debit with no description
    pub fn new(amount: i64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            payment_method: PaymentMethod::default(),
            description: String::new(),
        }
    }

    /// Set the payment method
    pub fn with_payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
