use crate::domain::value::{ConnectorId, DlrLevel, MessageId, RawPhoneNumber};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One inbound (MO) message as delivered by the gateway's webhook callback.
///
/// Created by the gateway on inbound receipt and redelivered, not mutated,
/// until acknowledged. `id` identifies the delivery attempt batch and is
/// not guaranteed stable across redeliveries of the same message; dedup
/// must key on the business fields instead.
pub struct InboundMessage {
    pub id: MessageId,
    pub from: RawPhoneNumber,
    pub to: RawPhoneNumber,
    pub origin_connector: ConnectorId,
    /// Text payload; may be empty for binary-only messages.
    pub content: String,
    /// Delivery metadata, opaque unless interpreted by the handler.
    pub priority: Option<String>,
    pub coding: Option<String>,
    pub validity: Option<String>,
    /// Hex rendition of the payload, as supplied by the gateway.
    pub binary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Extended receipt fields present on intermediate-level callbacks.
pub struct DlrDetails {
    pub id_smsc: Option<String>,
    pub sub: Option<String>,
    pub dlvrd: Option<String>,
    pub subdate: Option<String>,
    pub donedate: Option<String>,
    pub err: Option<String>,
    pub text: Option<String>,
}

impl DlrDetails {
    /// Whether any extended field was supplied.
    pub fn is_empty(&self) -> bool {
        self.id_smsc.is_none()
            && self.sub.is_none()
            && self.dlvrd.is_none()
            && self.subdate.is_none()
            && self.donedate.is_none()
            && self.err.is_none()
            && self.text.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One delivery receipt (DLR) as delivered by the gateway's webhook
/// callback.
///
/// Unlike [`InboundMessage::id`], the receipt `id` is the identifier the
/// send endpoint returned, so it is stable across redeliveries.
pub struct DeliveryReceipt {
    pub id: MessageId,
    /// Carrier status string (e.g. `DELIVRD`, `UNDELIV`), opaque here.
    pub message_status: String,
    pub level: DlrLevel,
    /// Present on level 2/3 receipts.
    pub details: Option<DlrDetails>,
}
