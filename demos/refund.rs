//! Example refund of a sandbox transaction
//!
//! Usage: `cargo run --example refund -- <transaction-id> <amount> [SCT|SDD]`

use payconiq::{PayconiqClient, PayconiqConfig, PayconiqError, PaymentMethod, RefundRequest};
use std::env;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let transaction_id = args.next().ok_or("missing transaction id")?;
    let amount: i64 = args.next().ok_or("missing amount in cents")?.parse()?;
    let payment_method: PaymentMethod = match args.next() {
        Some(method) => method.parse()?,
        None => PaymentMethod::default(),
    };

    let client = PayconiqClient::new(PayconiqConfig::from_env()?.with_sandbox(true))?;
    let request = RefundRequest::new(amount, "EUR")
        .with_payment_method(payment_method)
        .with_description("Refund from example");

    match client.create_refund(&transaction_id, &request).await {
        Ok(refund) => println!("✅ Refund {} created via {}", refund.id().unwrap_or_default(), payment_method),
        Err(PayconiqError::Provider { message, code, .. }) => {
            println!("❌ Payconiq refused the refund: {} ({:?})", message, code)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
