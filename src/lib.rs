//! Typed client and webhook toolkit for an SMS gateway's HTTP API.
//!
//! The crate covers both sides of the gateway's delivery-and-acknowledgment
//! contract: a domain layer of strong types, a transport layer for
//! wire-format quirks, a client layer for outbound (MT) submission, and a
//! webhook layer for inbound (MO) and delivery-receipt callbacks with
//! at-least-once redelivery semantics.
//!
//! Submitting a message:
//!
//! ```rust,no_run
//! use smsgate::{Credentials, GatewayClient, MessageText, RawPhoneNumber, SendOptions, SendSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), smsgate::GatewayError> {
//!     let client = GatewayClient::new(Credentials::new("foo", "bar")?);
//!     let to = RawPhoneNumber::new("+33612345678")?;
//!     let content = MessageText::new("hello")?;
//!     let result = client.send(SendSms::new(to, content, SendOptions::default())).await?;
//!     println!("submitted: {result:?}");
//!     Ok(())
//! }
//! ```
//!
//! Handling inbound deliveries (mount `handle_form` behind any HTTP
//! server; the gateway redelivers until it reads back [`ACK_BODY`]):
//!
//! ```rust,ignore
//! let handler = DeliveryHandler::new(store)
//!     .with_auto_reply(responder, Arc::new(client));
//! let outcome = handler.handle_form(&request_body).await;
//! // write outcome.response.status / outcome.response.body
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;
pub mod webhook;

pub use client::{Credentials, GatewayClient, GatewayClientBuilder, GatewayError};
pub use domain::{
    BalanceResponse, CheckRate, ConnectorId, DataCoding, DeliveryReceipt, DlrDetails, DlrLevel,
    DlrMethod, DlrRequest, DlrUrl, InboundMessage, MessageId, MessageText, Password, PhoneNumber,
    PriorityFlag, Quota, RateOptions, RateResponse, RawPhoneNumber, SendOptions, SendSms,
    SenderId, SubmissionResult, Tag, Username, ValidationError, ValidityMinutes,
};
pub use webhook::{
    ACK_BODY, AutoResponder, CommandGrammar, DedupCache, DeliveryHandler, DeliveryOutcome,
    Disposition, InboundProcessor, ReceiptHandler, ReceiptOutcome, ReceiptProcessor, ReplySender,
    WebhookResponse,
};
