//! Webhook layer: subscriber-side handling of gateway delivery callbacks.
//!
//! The gateway delivers inbound (MO) messages and delivery receipts (DLR)
//! over HTTP and redelivers any callback that is not acknowledged with
//! [`ACK_BODY`]. Handlers here are framework-agnostic: they consume a raw
//! urlencoded body and produce a [`WebhookResponse`] (status + body) that
//! any HTTP server crate can write out. They are `Send + Sync` and safe
//! under concurrent invocation.

mod command;
mod dedup;
mod handler;
mod receipt;

use std::future::Future;
use std::pin::Pin;

pub use command::{AutoResponder, CommandGrammar};
pub use dedup::{Claim, DedupCache, DedupKey};
pub use handler::{
    DeliveryHandler, DeliveryOutcome, Disposition, InboundProcessor, ReplySender,
};
pub use receipt::{ReceiptHandler, ReceiptOutcome, ReceiptProcessor};

/// Literal response body the gateway requires as delivery acknowledgment.
///
/// Anything else — error status, different body, timeout — is treated by
/// the gateway as "not acknowledged" and triggers redelivery on its own
/// schedule.
pub const ACK_BODY: &str = "ACK/Jasmin";

/// Boxed future used by the webhook traits so they stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// HTTP response a webhook handler asks its server to write.
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    /// Acknowledge durable receipt: `200` with the exact token body.
    pub fn ack() -> Self {
        Self {
            status: 200,
            body: ACK_BODY.to_owned(),
        }
    }

    /// Refuse acknowledgment so the gateway redelivers. The body follows
    /// the gateway's own plain-text diagnostic convention.
    pub fn error(status: u16, detail: impl AsRef<str>) -> Self {
        Self {
            status,
            body: format!("Error \"{}\"", detail.as_ref()),
        }
    }

    /// Whether this response acknowledges the delivery.
    pub fn is_ack(&self) -> bool {
        (200..=299).contains(&self.status) && self.body.trim() == ACK_BODY
    }
}
