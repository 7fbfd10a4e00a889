use std::io;

use smsgate::{CheckRate, Credentials, GatewayClient, MessageText, RateOptions, RawPhoneNumber};

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
    let to = require_env("SMSGATE_TO")?;

    let mut builder = GatewayClient::builder(Credentials::new(username, password)?);
    if let Ok(base) = std::env::var("SMSGATE_BASE_URL") {
        builder = builder.base_url(base);
    }
    let client = builder.build()?;

    let options = RateOptions {
        content: std::env::var("SMSGATE_CONTENT")
            .ok()
            .map(MessageText::new)
            .transpose()?,
        ..Default::default()
    };
    let response = client.rate(CheckRate::new(RawPhoneNumber::new(to)?, options)).await?;
    println!(
        "unit rate: {}, parts: {}",
        response.unit_rate, response.submit_sm_count
    );

    Ok(())
}
