use std::io;

use smsgate::{Credentials, GatewayClient};

fn require_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let username = require_env("SMSGATE_USERNAME")?;
    let password = require_env("SMSGATE_PASSWORD")?;

    let mut builder = GatewayClient::builder(Credentials::new(username, password)?);
    if let Ok(base) = std::env::var("SMSGATE_BASE_URL") {
        builder = builder.base_url(base);
    }
    let client = builder.build()?;

    let response = client.balance().await?;
    println!(
        "balance: {}, sms_count: {}",
        response.balance.value().unwrap_or("ND"),
        response.sms_count.value().unwrap_or("ND"),
    );

    Ok(())
}
