//! Example checkout against the Payconiq sandbox
//!
//! Reads credentials from `PAYCONIQ_MERCHANT_ID` / `PAYCONIQ_ACCESS_TOKEN`.

use payconiq::{PayconiqClient, PayconiqConfig, PaymentGateway};
use rust_decimal::Decimal;
use std::str::FromStr;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let config = PayconiqConfig::from_env()?.with_sandbox(true);
    println!("Using {} for merchant {}", config.base_url(), config.merchant_id);

    let client = PayconiqClient::new(config)?;
    let gateway = PaymentGateway::new(client, "https://shop.example.com/wc-api/payconiq")?;

    let total = Decimal::from_str("12.50")?;
    let transaction = gateway.process_payment("1001", total, "EUR").await?;
    let reference = transaction.reference().unwrap_or_default().to_string();
    println!("💳 Transaction created: {}", reference);

    if let Some(links) = transaction.get("_links") {
        println!("  Links: {}", links);
    }

    let status = gateway.payment_status(&reference).await?;
    println!(
        "📡 Current status: {}",
        status.status().unwrap_or("unknown")
    );

    Ok(())
}
