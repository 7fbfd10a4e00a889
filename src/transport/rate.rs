use serde::Deserialize;
use serde::de::Error as DeError;

use crate::domain::{
    CheckRate, DataCoding, MessageText, RateResponse, RawPhoneNumber, SenderId,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decimal preserved as its raw JSON token (same rationale as the quota
/// decoding: `0.020` must not become `0.02`).
#[derive(Debug, Clone)]
struct RawDecimal(String);

impl<'de> Deserialize<'de> for RawDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();
        match token.as_bytes().first().copied() {
            Some(b'-' | b'0'..=b'9') => Ok(Self(token.to_owned())),
            _ => Err(D::Error::custom("expected unit_rate to be a JSON number")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RateJsonResponse {
    unit_rate: RawDecimal,
    submit_sm_count: u32,
}

pub fn encode_rate_form(request: &CheckRate) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    params.push((
        RawPhoneNumber::FIELD.to_owned(),
        request.to().raw().to_owned(),
    ));

    let options = request.options();
    if let Some(content) = options.content.as_ref() {
        params.push((MessageText::FIELD.to_owned(), content.as_str().to_owned()));
    }
    if let Some(from) = options.from.as_ref() {
        params.push((SenderId::FIELD.to_owned(), from.as_str().to_owned()));
    }
    if let Some(coding) = options.coding {
        params.push((DataCoding::FIELD.to_owned(), coding.value().to_string()));
    }

    params
}

pub fn decode_rate_json_response(json: &str) -> Result<RateResponse, TransportError> {
    let parsed: RateJsonResponse = serde_json::from_str(json)?;
    Ok(RateResponse {
        unit_rate: parsed.unit_rate.0,
        submit_sm_count: parsed.submit_sm_count,
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::RateOptions;

    use super::*;

    #[test]
    fn encode_rate_form_params() {
        let request = CheckRate::new(
            RawPhoneNumber::new("+33612345678").unwrap(),
            RateOptions {
                content: Some(MessageText::new("hello").unwrap()),
                ..Default::default()
            },
        );
        assert_eq!(
            encode_rate_form(&request),
            vec![
                ("to".to_owned(), "+33612345678".to_owned()),
                ("content".to_owned(), "hello".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_rate_json_preserves_raw_rate() {
        let response =
            decode_rate_json_response(r#"{"unit_rate": 0.020, "submit_sm_count": 2}"#).unwrap();
        assert_eq!(response.unit_rate, "0.020");
        assert_eq!(response.submit_sm_count, 2);
    }

    #[test]
    fn decode_rate_json_rejects_string_rate() {
        let err =
            decode_rate_json_response(r#"{"unit_rate": "free", "submit_sm_count": 1}"#)
                .unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
