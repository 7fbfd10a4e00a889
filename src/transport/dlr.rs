use crate::domain::{DeliveryReceipt, DlrDetails, DlrLevel, MessageId, ValidationError};
use crate::transport::deliver_sm::{parse_form, take_mandatory};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("callback body is missing mandatory field: {field}")]
    MissingField { field: &'static str },

    #[error("callback carries a non-numeric level: {value:?}")]
    MalformedLevel { value: String },

    #[error("callback field rejected: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<crate::transport::deliver_sm::TransportError> for TransportError {
    fn from(err: crate::transport::deliver_sm::TransportError) -> Self {
        match err {
            crate::transport::deliver_sm::TransportError::MissingField { field } => {
                Self::MissingField { field }
            }
            crate::transport::deliver_sm::TransportError::Invalid(err) => Self::Invalid(err),
        }
    }
}

/// Decode one delivery-receipt callback from its urlencoded form body
/// (POST) or query string (GET).
///
/// Mandatory fields: `id`, `message_status`, `level`. The extended fields
/// appear on level 2/3 receipts and are grouped into [`DlrDetails`].
pub fn decode_dlr_form(body: &str) -> Result<DeliveryReceipt, TransportError> {
    let mut fields = parse_form(body);

    let id = MessageId::new(take_mandatory(&mut fields, MessageId::FIELD)?)?;
    let message_status = take_mandatory(&mut fields, "message_status")?;
    let level_raw = take_mandatory(&mut fields, "level")?;
    let level = level_raw
        .trim()
        .parse::<u8>()
        .map_err(|_| TransportError::MalformedLevel {
            value: level_raw.clone(),
        })
        .and_then(|value| DlrLevel::from_u8(value).map_err(TransportError::Invalid))?;

    let details = DlrDetails {
        id_smsc: fields.remove("id_smsc"),
        sub: fields.remove("sub"),
        dlvrd: fields.remove("dlvrd"),
        subdate: fields.remove("subdate"),
        donedate: fields.remove("donedate"),
        err: fields.remove("err"),
        text: fields.remove("text"),
    };

    Ok(DeliveryReceipt {
        id,
        message_status,
        level,
        details: if details.is_empty() { None } else { Some(details) },
    })
}
