use std::collections::HashMap;

use crate::domain::{ConnectorId, InboundMessage, MessageId, RawPhoneNumber, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("callback body is missing mandatory field: {field}")]
    MissingField { field: &'static str },

    #[error("callback field rejected: {0}")]
    Invalid(#[from] ValidationError),
}

/// Decode one inbound delivery callback from its urlencoded form body.
///
/// Mandatory fields: `id`, `from`, `to`, `origin-connector`, `content`.
/// The metadata fields (`priority`, `coding`, `validity`, `binary`) are
/// carried through opaquely when present.
pub fn decode_deliver_form(body: &str) -> Result<InboundMessage, TransportError> {
    let mut fields = parse_form(body);

    let id = MessageId::new(take_mandatory(&mut fields, MessageId::FIELD)?)?;
    let from = RawPhoneNumber::new(take_mandatory(&mut fields, "from")?)?;
    let to = RawPhoneNumber::new(take_mandatory(&mut fields, RawPhoneNumber::FIELD)?)?;
    let origin_connector =
        ConnectorId::new(take_mandatory(&mut fields, ConnectorId::FIELD)?)?;
    let content = take_mandatory(&mut fields, "content")?;

    Ok(InboundMessage {
        id,
        from,
        to,
        origin_connector,
        content,
        priority: fields.remove("priority"),
        coding: fields.remove("coding"),
        validity: fields.remove("validity"),
        binary: fields.remove("binary"),
    })
}

pub(crate) fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

pub(crate) fn take_mandatory(
    fields: &mut HashMap<String, String>,
    field: &'static str,
) -> Result<String, TransportError> {
    fields
        .remove(field)
        .ok_or(TransportError::MissingField { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_BODY: &str = "id=16fd2706-8baf-433b&from=%2B33612345678&to=85551&\
                             origin-connector=smppcon-1&priority=2&coding=0&validity=60&\
                             content=weather%20paris&binary=77656174686572207061726973";

    #[test]
    fn decode_full_callback_body() {
        let message = decode_deliver_form(FULL_BODY).unwrap();
        assert_eq!(message.id.as_str(), "16fd2706-8baf-433b");
        assert_eq!(message.from.raw(), "+33612345678");
        assert_eq!(message.to.raw(), "85551");
        assert_eq!(message.origin_connector.as_str(), "smppcon-1");
        assert_eq!(message.content, "weather paris");
        assert_eq!(message.priority.as_deref(), Some("2"));
        assert_eq!(message.coding.as_deref(), Some("0"));
        assert_eq!(message.validity.as_deref(), Some("60"));
        assert_eq!(
            message.binary.as_deref(),
            Some("77656174686572207061726973")
        );
    }

    #[test]
    fn decode_minimal_callback_body() {
        let body = "id=a1&from=100&to=200&origin-connector=c1&content=hi";
        let message = decode_deliver_form(body).unwrap();
        assert_eq!(message.content, "hi");
        assert_eq!(message.priority, None);
        assert_eq!(message.binary, None);
    }

    #[test]
    fn decode_rejects_missing_mandatory_field() {
        let body = "id=a1&from=100&to=200&content=hi";
        let err = decode_deliver_form(body).unwrap_err();
        assert!(matches!(
            err,
            TransportError::MissingField {
                field: "origin-connector"
            }
        ));
    }

    #[test]
    fn decode_rejects_empty_mandatory_value() {
        let body = "id=%20&from=100&to=200&origin-connector=c1&content=hi";
        let err = decode_deliver_form(body).unwrap_err();
        assert!(matches!(err, TransportError::Invalid(_)));
    }

    #[test]
    fn decode_accepts_empty_content() {
        // Binary-only messages arrive with an empty text payload.
        let body = "id=a1&from=100&to=200&origin-connector=c1&content=&binary=00ff";
        let message = decode_deliver_form(body).unwrap();
        assert_eq!(message.content, "");
        assert_eq!(message.binary.as_deref(), Some("00ff"));
    }
}
