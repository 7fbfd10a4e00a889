use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use crate::client::GatewayClient;
use crate::domain::{
    InboundMessage, MessageText, RawPhoneNumber, SendOptions, SendSms, SubmissionResult,
};
use crate::webhook::command::AutoResponder;
use crate::webhook::dedup::{Claim, DedupCache, DedupKey};
use crate::webhook::{BoxFuture, WebhookResponse};

/// Subscriber-side processing of one inbound message (e.g. a datastore
/// write). Implementations must be safe for concurrent execution.
///
/// Returning `Ok` means the message is durably accepted and will be
/// acknowledged; returning `Err` means the delivery attempt is refused and
/// the gateway will redeliver.
pub trait InboundProcessor: Send + Sync {
    fn process<'a>(
        &'a self,
        message: &'a InboundMessage,
    ) -> BoxFuture<'a, Result<(), Box<dyn StdError + Send + Sync>>>;
}

/// Outbound path used for auto-replies. Implemented by [`GatewayClient`];
/// handler tests substitute fakes.
pub trait ReplySender: Send + Sync {
    fn submit_reply<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        content: MessageText,
    ) -> BoxFuture<'a, SubmissionResult>;
}

impl ReplySender for GatewayClient {
    fn submit_reply<'a>(
        &'a self,
        to: &'a RawPhoneNumber,
        content: MessageText,
    ) -> BoxFuture<'a, SubmissionResult> {
        Box::pin(async move {
            let request = SendSms::new(to.clone(), content, SendOptions::default());
            self.submit(request).await
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How the handler classified one delivery attempt.
pub enum Disposition {
    /// Fresh message, durably processed and acknowledged.
    Processed,
    /// Redelivery of an already-processed message; acknowledged without
    /// re-running the processor.
    Duplicate,
    /// A parallel attempt for the same message is still being processed;
    /// not acknowledged, the gateway retries later.
    InFlight,
    /// The processor refused the message; not acknowledged.
    Rejected,
    /// The callback body could not be decoded; not acknowledged.
    Invalid,
}

#[derive(Debug)]
/// Result of handling one delivery attempt.
///
/// The acknowledgment decision and the auto-reply outcome are carried
/// separately: `reply` can only be populated once `response` is already
/// decided, so a failed reply-send can never suppress an acknowledgment.
pub struct DeliveryOutcome {
    pub response: WebhookResponse,
    pub disposition: Disposition,
    /// Outcome of the auto-reply submission, when one was attempted.
    pub reply: Option<SubmissionResult>,
}

impl DeliveryOutcome {
    fn without_reply(response: WebhookResponse, disposition: Disposition) -> Self {
        Self {
            response,
            disposition,
            reply: None,
        }
    }
}

/// Handles inbound (MO) delivery callbacks.
///
/// Every invocation is treated as a fresh delivery attempt: the gateway
/// may redeliver the same message with a different per-attempt id, in
/// parallel or in rapid succession. The handler guarantees the two
/// cardinal properties of the contract:
/// - a downstream failure never produces a false acknowledgment,
/// - a durably processed message is always acknowledged, including on
///   every later redelivery inside the dedup window.
pub struct DeliveryHandler {
    processor: Arc<dyn InboundProcessor>,
    dedup: DedupCache,
    responder: Option<(AutoResponder, Arc<dyn ReplySender>)>,
}

impl DeliveryHandler {
    /// Create a handler around `processor` with the default dedup window.
    pub fn new(processor: Arc<dyn InboundProcessor>) -> Self {
        Self {
            processor,
            dedup: DedupCache::default(),
            responder: None,
        }
    }

    /// Override how long redeliveries are remembered. The window should
    /// cover the gateway's full redelivery schedule.
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup = DedupCache::new(window);
        self
    }

    /// React to processed messages by sending a composed reply back to the
    /// originator through `sender`.
    pub fn with_auto_reply(
        mut self,
        responder: AutoResponder,
        sender: Arc<dyn ReplySender>,
    ) -> Self {
        self.responder = Some((responder, sender));
        self
    }

    /// Handle one raw urlencoded callback body.
    pub async fn handle_form(&self, body: &str) -> DeliveryOutcome {
        match crate::transport::decode_deliver_form(body) {
            Ok(message) => self.handle(message).await,
            Err(err) => {
                tracing::warn!(error = %err, "rejecting undecodable delivery callback");
                DeliveryOutcome::without_reply(
                    WebhookResponse::error(400, err.to_string()),
                    Disposition::Invalid,
                )
            }
        }
    }

    /// Handle one decoded delivery attempt.
    pub async fn handle(&self, message: InboundMessage) -> DeliveryOutcome {
        let key = DedupKey::for_message(&message);

        match self.dedup.claim(&key) {
            Claim::Done => {
                // Already durably processed: ack again, never reprocess.
                tracing::debug!(
                    id = %message.id.as_str(),
                    from = %message.from.raw(),
                    "acknowledging redelivery of processed message"
                );
                DeliveryOutcome::without_reply(WebhookResponse::ack(), Disposition::Duplicate)
            }
            Claim::InFlight => {
                tracing::debug!(
                    id = %message.id.as_str(),
                    from = %message.from.raw(),
                    "parallel delivery attempt still in flight"
                );
                DeliveryOutcome::without_reply(
                    WebhookResponse::error(503, "delivery attempt already in progress"),
                    Disposition::InFlight,
                )
            }
            Claim::Fresh => match self.processor.process(&message).await {
                Ok(()) => {
                    self.dedup.complete(&key);
                    tracing::info!(
                        id = %message.id.as_str(),
                        from = %message.from.raw(),
                        connector = %message.origin_connector.as_str(),
                        "inbound message processed, acknowledging"
                    );
                    let reply = self.send_reply(&message).await;
                    DeliveryOutcome {
                        response: WebhookResponse::ack(),
                        disposition: Disposition::Processed,
                        reply,
                    }
                }
                Err(err) => {
                    // Leave the message claimable so redelivery reprocesses it.
                    self.dedup.release(&key);
                    tracing::warn!(
                        id = %message.id.as_str(),
                        from = %message.from.raw(),
                        error = %err,
                        "processing failed, refusing acknowledgment"
                    );
                    DeliveryOutcome::without_reply(
                        WebhookResponse::error(500, err.to_string()),
                        Disposition::Rejected,
                    )
                }
            },
        }
    }

    /// Compose and submit the auto-reply. The ack for the inbound message
    /// is already decided by the time this runs; a failed submission is
    /// reported in the outcome and logged, nothing more.
    async fn send_reply(&self, message: &InboundMessage) -> Option<SubmissionResult> {
        let (responder, sender) = self.responder.as_ref()?;

        let content = responder.reply_content(&message.content);
        let content = match MessageText::new(content) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(error = %err, "composed reply is not sendable");
                return None;
            }
        };

        let result = sender.submit_reply(&message.from, content).await;
        if let SubmissionResult::Error { error_detail } = &result {
            tracing::warn!(
                to = %message.from.raw(),
                error_detail = %error_detail,
                "auto-reply submission failed"
            );
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::domain::{ConnectorId, MessageId};
    use crate::webhook::ACK_BODY;
    use crate::webhook::command::CommandGrammar;

    use super::*;

    #[derive(Default)]
    struct RecordingProcessor {
        calls: AtomicUsize,
        fail_first: AtomicUsize,
    }

    impl RecordingProcessor {
        fn failing_once() -> Self {
            let processor = Self::default();
            processor.fail_first.store(1, Ordering::SeqCst);
            processor
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl InboundProcessor for RecordingProcessor {
        fn process<'a>(
            &'a self,
            _message: &'a InboundMessage,
        ) -> BoxFuture<'a, Result<(), Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::SeqCst);
                let remaining = self.fail_first.load(Ordering::SeqCst);
                if remaining > 0 {
                    self.fail_first.store(remaining - 1, Ordering::SeqCst);
                    return Err("sms store unreachable".into());
                }
                Ok(())
            })
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, String)>>,
        fail: bool,
    }

    impl RecordingSender {
        fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn sent(&self) -> Vec<(String, String)> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl ReplySender for RecordingSender {
        fn submit_reply<'a>(
            &'a self,
            to: &'a RawPhoneNumber,
            content: MessageText,
        ) -> BoxFuture<'a, SubmissionResult> {
            Box::pin(async move {
                self.sent
                    .lock()
                    .unwrap()
                    .push((to.raw().to_owned(), content.as_str().to_owned()));
                if self.fail {
                    SubmissionResult::Error {
                        error_detail: "transport error: connection refused".to_owned(),
                    }
                } else {
                    SubmissionResult::Success {
                        message_id: MessageId::new("reply-1").unwrap(),
                    }
                }
            })
        }
    }

    fn message(id: &str, content: &str) -> InboundMessage {
        InboundMessage {
            id: MessageId::new(id).unwrap(),
            from: RawPhoneNumber::new("+33612345678").unwrap(),
            to: RawPhoneNumber::new("85551").unwrap(),
            origin_connector: ConnectorId::new("smppcon-1").unwrap(),
            content: content.to_owned(),
            priority: None,
            coding: None,
            validity: None,
            binary: None,
        }
    }

    fn weather_responder() -> AutoResponder {
        AutoResponder::new(
            CommandGrammar::new("weather").unwrap(),
            |city| format!("{city} forecast: Sunny 21C, 13Knots NW light wind"),
            "SMS Syntax error, please type 'weather city' to get a fresh weather forecast",
        )
    }

    #[tokio::test]
    async fn fresh_message_is_processed_and_acked() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        let outcome = handler.handle(message("a1", "hello")).await;
        assert_eq!(outcome.disposition, Disposition::Processed);
        assert!(outcome.response.is_ack());
        assert_eq!(outcome.response.body, ACK_BODY);
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test]
    async fn redelivery_with_new_attempt_id_is_acked_without_reprocessing() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        let first = handler.handle(message("attempt-1", "hello")).await;
        assert_eq!(first.disposition, Disposition::Processed);

        // Same business fields, different per-attempt id.
        let second = handler.handle(message("attempt-2", "hello")).await;
        assert_eq!(second.disposition, Disposition::Duplicate);
        assert!(second.response.is_ack());
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test]
    async fn distinct_messages_are_both_processed() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        handler.handle(message("a1", "first")).await;
        handler.handle(message("a2", "second")).await;
        assert_eq!(processor.calls(), 2);
    }

    #[tokio::test]
    async fn processor_failure_refuses_ack_and_allows_retry() {
        let processor = Arc::new(RecordingProcessor::failing_once());
        let handler = DeliveryHandler::new(processor.clone());

        let first = handler.handle(message("attempt-1", "hello")).await;
        assert_eq!(first.disposition, Disposition::Rejected);
        assert!(!first.response.is_ack());
        assert_eq!(first.response.status, 500);

        // Gateway redelivers; this time the downstream store is back.
        let second = handler.handle(message("attempt-2", "hello")).await;
        assert_eq!(second.disposition, Disposition::Processed);
        assert!(second.response.is_ack());
        assert_eq!(processor.calls(), 2);
    }

    #[tokio::test]
    async fn parallel_attempt_is_refused_while_first_is_in_flight() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        // First attempt holds the claim while its processing runs.
        let inbound = message("attempt-1", "hello");
        let key = DedupKey::for_message(&inbound);
        assert_eq!(handler.dedup.claim(&key), Claim::Fresh);

        let racing = handler.handle(message("attempt-2", "hello")).await;
        assert_eq!(racing.disposition, Disposition::InFlight);
        assert_eq!(racing.response.status, 503);
        assert!(!racing.response.is_ack());
        assert_eq!(processor.calls(), 0);
    }

    #[tokio::test]
    async fn matched_command_sends_reply_to_originator() {
        let processor = Arc::new(RecordingProcessor::default());
        let sender = Arc::new(RecordingSender::default());
        let handler = DeliveryHandler::new(processor)
            .with_auto_reply(weather_responder(), sender.clone());

        let outcome = handler.handle(message("a1", "weather paris")).await;
        assert!(outcome.response.is_ack());
        assert!(outcome.reply.as_ref().unwrap().is_success());

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "+33612345678");
        assert!(sent[0].1.contains("paris"));
    }

    #[tokio::test]
    async fn unmatched_content_sends_syntax_error_reply() {
        let processor = Arc::new(RecordingProcessor::default());
        let sender = Arc::new(RecordingSender::default());
        let handler = DeliveryHandler::new(processor)
            .with_auto_reply(weather_responder(), sender.clone());

        handler.handle(message("a1", "hello there")).await;

        let sent = sender.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].1,
            "SMS Syntax error, please type 'weather city' to get a fresh weather forecast"
        );
    }

    #[tokio::test]
    async fn reply_failure_never_suppresses_the_ack() {
        let processor = Arc::new(RecordingProcessor::default());
        let sender = Arc::new(RecordingSender::failing());
        let handler = DeliveryHandler::new(processor)
            .with_auto_reply(weather_responder(), sender.clone());

        let outcome = handler.handle(message("a1", "weather paris")).await;
        assert_eq!(outcome.disposition, Disposition::Processed);
        assert!(outcome.response.is_ack());
        assert!(!outcome.reply.as_ref().unwrap().is_success());
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn duplicates_and_failures_send_no_reply() {
        let processor = Arc::new(RecordingProcessor::failing_once());
        let sender = Arc::new(RecordingSender::default());
        let handler = DeliveryHandler::new(processor)
            .with_auto_reply(weather_responder(), sender.clone());

        // First attempt fails downstream: no reply.
        let failed = handler.handle(message("attempt-1", "weather paris")).await;
        assert_eq!(failed.disposition, Disposition::Rejected);
        assert!(failed.reply.is_none());
        assert_eq!(sender.sent().len(), 0);

        // Redelivery processes and replies once.
        handler.handle(message("attempt-2", "weather paris")).await;
        assert_eq!(sender.sent().len(), 1);

        // Further redelivery is a duplicate: still no second reply.
        let duplicate = handler.handle(message("attempt-3", "weather paris")).await;
        assert_eq!(duplicate.disposition, Disposition::Duplicate);
        assert!(duplicate.reply.is_none());
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn handle_form_decodes_and_processes() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        let body = "id=a1&from=%2B33612345678&to=85551&origin-connector=smppcon-1&content=hi";
        let outcome = handler.handle_form(body).await;
        assert_eq!(outcome.disposition, Disposition::Processed);
        assert!(outcome.response.is_ack());
        assert_eq!(processor.calls(), 1);
    }

    #[tokio::test]
    async fn handle_form_rejects_malformed_body_without_processing() {
        let processor = Arc::new(RecordingProcessor::default());
        let handler = DeliveryHandler::new(processor.clone());

        let outcome = handler.handle_form("id=a1&content=hi").await;
        assert_eq!(outcome.disposition, Disposition::Invalid);
        assert_eq!(outcome.response.status, 400);
        assert!(!outcome.response.is_ack());
        assert_eq!(processor.calls(), 0);
    }
}
