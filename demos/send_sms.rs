use std::io;

use smsgate::{Credentials, GatewayClient, MessageText, RawPhoneNumber, SendOptions, SendSms};

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
    let content = std::env::var("SMSGATE_CONTENT")
        .unwrap_or_else(|_| "Hello from the smsgate demo.".to_owned());

    let mut builder = GatewayClient::builder(Credentials::new(username, password)?);
    if let Ok(base) = std::env::var("SMSGATE_BASE_URL") {
        builder = builder.base_url(base);
    }
    let client = builder.build()?;

    let request = SendSms::new(
        RawPhoneNumber::new(to)?,
        MessageText::new(content)?,
        SendOptions::default(),
    );

    let result = client.send(request).await?;
    match result.message_id() {
        Some(id) => println!("accepted, message id: {}", id.as_str()),
        None => println!("rejected: {}", result.error_detail().unwrap_or("")),
    }

    Ok(())
}
