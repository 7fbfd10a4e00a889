use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::DeliveryReceipt;
use crate::webhook::dedup::{Claim, DedupCache, DedupKey};
use crate::webhook::handler::Disposition;
use crate::webhook::{BoxFuture, WebhookResponse};

/// Subscriber-side processing of one delivery receipt (e.g. marking a
/// sent message delivered). Same acknowledgment contract as
/// [`InboundProcessor`](crate::webhook::InboundProcessor).
pub trait ReceiptProcessor: Send + Sync {
    fn process<'a>(
        &'a self,
        receipt: &'a DeliveryReceipt,
    ) -> BoxFuture<'a, Result<(), Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug)]
/// Result of handling one receipt callback.
pub struct ReceiptOutcome {
    pub response: WebhookResponse,
    pub disposition: Disposition,
}

/// Handles delivery-receipt (DLR) callbacks.
///
/// Receipts carry the stable id assigned at submission, so dedup keys on
/// (`id`, `message_status`): the same receipt redelivered is acknowledged
/// without reprocessing, while a later receipt for the same message at a
/// different status is processed normally.
pub struct ReceiptHandler {
    processor: Arc<dyn ReceiptProcessor>,
    dedup: DedupCache,
}

impl ReceiptHandler {
    /// Create a handler around `processor` with the default dedup window.
    pub fn new(processor: Arc<dyn ReceiptProcessor>) -> Self {
        Self {
            processor,
            dedup: DedupCache::default(),
        }
    }

    /// Override how long redeliveries are remembered.
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup = DedupCache::new(window);
        self
    }

    /// Handle one raw urlencoded callback body (POST form or GET query).
    pub async fn handle_form(&self, body: &str) -> ReceiptOutcome {
        match crate::transport::decode_dlr_form(body) {
            Ok(receipt) => self.handle(receipt).await,
            Err(err) => {
                tracing::warn!(error = %err, "rejecting undecodable receipt callback");
                ReceiptOutcome {
                    response: WebhookResponse::error(400, err.to_string()),
                    disposition: Disposition::Invalid,
                }
            }
        }
    }

    /// Handle one decoded receipt.
    pub async fn handle(&self, receipt: DeliveryReceipt) -> ReceiptOutcome {
        let key = DedupKey::for_receipt(&receipt);

        match self.dedup.claim(&key) {
            Claim::Done => {
                tracing::debug!(
                    id = %receipt.id.as_str(),
                    status = %receipt.message_status,
                    "acknowledging redelivered receipt"
                );
                ReceiptOutcome {
                    response: WebhookResponse::ack(),
                    disposition: Disposition::Duplicate,
                }
            }
            Claim::InFlight => ReceiptOutcome {
                response: WebhookResponse::error(503, "receipt already in progress"),
                disposition: Disposition::InFlight,
            },
            Claim::Fresh => match self.processor.process(&receipt).await {
                Ok(()) => {
                    self.dedup.complete(&key);
                    tracing::info!(
                        id = %receipt.id.as_str(),
                        status = %receipt.message_status,
                        "receipt processed, acknowledging"
                    );
                    ReceiptOutcome {
                        response: WebhookResponse::ack(),
                        disposition: Disposition::Processed,
                    }
                }
                Err(err) => {
                    self.dedup.release(&key);
                    tracing::warn!(
                        id = %receipt.id.as_str(),
                        error = %err,
                        "receipt processing failed, refusing acknowledgment"
                    );
                    ReceiptOutcome {
                        response: WebhookResponse::error(500, err.to_string()),
                        disposition: Disposition::Rejected,
                    }
                }
            },
        }
    }
}
