//! Feeds one MO callback body (read from stdin) through a
//! [`DeliveryHandler`] wired to the weather auto-responder, and prints the
//! response the gateway would see. Pipe a urlencoded form body in:
//!
//! ```text
//! echo 'id=a1&from=%2B33612345678&to=85551&origin-connector=c1&content=weather%20paris' \
//!     | SMSGATE_USERNAME=foo SMSGATE_PASSWORD=bar mo_webhook
//! ```

use std::io::{self, Read};
use std::sync::Arc;

use smsgate::webhook::BoxFuture;
use smsgate::{
    AutoResponder, CommandGrammar, Credentials, DeliveryHandler, GatewayClient, InboundMessage,
    InboundProcessor,
};

struct PrintingStore;

impl InboundProcessor for PrintingStore {
    fn process<'a>(
        &'a self,
        message: &'a InboundMessage,
    ) -> BoxFuture<'a, Result<(), Box<dyn std::error::Error + Send + Sync>>> {
        Box::pin(async move {
            println!(
                "stored MO [id:{}] [from:{}] [to:{}] [cid:{}]",
                message.id.as_str(),
                message.from.raw(),
                message.to.raw(),
                message.origin_connector.as_str(),
            );
            Ok(())
        })
    }
}

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

    let responder = AutoResponder::new(
        CommandGrammar::new("weather")?,
        |city| format!("{city} forecast: Sunny 21C, 13Knots NW light wind"),
        "SMS Syntax error, please type 'weather city' to get a fresh weather forecast",
    );

    let handler = DeliveryHandler::new(Arc::new(PrintingStore))
        .with_auto_reply(responder, Arc::new(client));

    let mut body = String::new();
    io::stdin().read_to_string(&mut body)?;

    let outcome = handler.handle_form(body.trim()).await;
    println!("response status: {}", outcome.response.status);
    println!("response body: {}", outcome.response.body);
    if let Some(reply) = outcome.reply {
        println!("auto-reply outcome: {reply:?}");
    }

    Ok(())
}
