use crate::domain::{
    DataCoding, DlrLevel, DlrMethod, DlrUrl, MessageId, MessageText, PriorityFlag, RawPhoneNumber,
    SendSms, SenderId, SubmissionResult, Tag, ValidityMinutes,
};

/// Marker the gateway prefixes to an accepted submission response.
const SUCCESS_MARKER: &str = "Success";

/// Marker the gateway prefixes to a rejected submission response.
const ERROR_MARKER: &str = "Error";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("response does not start with a known marker: {body:?}")]
    UnrecognizedResponse { body: String },

    #[error("success response carries no message id")]
    MissingMessageId,
}

pub fn encode_send_form(request: &SendSms) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();

    params.push((
        RawPhoneNumber::FIELD.to_owned(),
        request.to().raw().to_owned(),
    ));
    params.push((
        MessageText::FIELD.to_owned(),
        request.content().as_str().to_owned(),
    ));

    let options = request.options();
    if let Some(from) = options.from.as_ref() {
        params.push((SenderId::FIELD.to_owned(), from.as_str().to_owned()));
    }
    if let Some(coding) = options.coding {
        params.push((DataCoding::FIELD.to_owned(), coding.value().to_string()));
    }
    if let Some(priority) = options.priority {
        params.push((PriorityFlag::FIELD.to_owned(), priority.value().to_string()));
    }
    if let Some(validity) = options.validity {
        params.push((
            ValidityMinutes::FIELD.to_owned(),
            validity.value().to_string(),
        ));
    }

    // The dlr field is mandatory on the wire even when no receipts are wanted.
    match options.dlr.as_ref() {
        None => params.push(("dlr".to_owned(), "no".to_owned())),
        Some(dlr) => {
            params.push(("dlr".to_owned(), "yes".to_owned()));
            params.push((DlrUrl::FIELD.to_owned(), dlr.url().as_str().to_owned()));
            params.push((DlrLevel::FIELD.to_owned(), dlr.level().as_u8().to_string()));
            params.push((
                DlrMethod::FIELD.to_owned(),
                dlr.method().as_str().to_owned(),
            ));
        }
    }

    if !options.tags.is_empty() {
        let tags = options
            .tags
            .iter()
            .map(Tag::as_str)
            .collect::<Vec<_>>()
            .join(",");
        params.push((Tag::FIELD.to_owned(), tags));
    }

    params
}

/// Classify the send endpoint's plain-text response body.
///
/// The wire contract is prefix-based: `Success "<id>"` or
/// `Error "<detail>"`. The value may also appear `:`-separated and
/// unquoted; both renderings are accepted here so call sites never touch
/// the markers themselves.
pub fn decode_send_response(body: &str) -> Result<SubmissionResult, TransportError> {
    let trimmed = body.trim();

    if let Some(rest) = trimmed.strip_prefix(SUCCESS_MARKER) {
        let id = unwrap_marker_value(rest);
        let message_id =
            MessageId::new(id).map_err(|_| TransportError::MissingMessageId)?;
        return Ok(SubmissionResult::Success { message_id });
    }

    if let Some(rest) = trimmed.strip_prefix(ERROR_MARKER) {
        return Ok(SubmissionResult::Error {
            error_detail: unwrap_marker_value(rest).to_owned(),
        });
    }

    Err(TransportError::UnrecognizedResponse {
        body: trimmed.to_owned(),
    })
}

/// Strip the separators the gateway may place between marker and value:
/// whitespace, one optional colon, and one optional pair of double quotes.
fn unwrap_marker_value(rest: &str) -> &str {
    let mut value = rest.trim_start();
    if let Some(after_colon) = value.strip_prefix(':') {
        value = after_colon.trim_start();
    }
    value = value.trim_end();
    if value.len() >= 2 {
        if let Some(unquoted) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            value = unquoted;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use crate::domain::{
        DlrRequest, MessageText, PriorityFlag, RawPhoneNumber, SendOptions, SendSms, SenderId, Tag,
    };

    use super::*;

    fn request(options: SendOptions) -> SendSms {
        SendSms::new(
            RawPhoneNumber::new("+33612345678").unwrap(),
            MessageText::new("hello").unwrap(),
            options,
        )
    }

    #[test]
    fn encode_minimal_form_params() {
        let params = encode_send_form(&request(SendOptions::default()));
        assert_eq!(
            params,
            vec![
                ("to".to_owned(), "+33612345678".to_owned()),
                ("content".to_owned(), "hello".to_owned()),
                ("dlr".to_owned(), "no".to_owned()),
            ]
        );
    }

    #[test]
    fn encode_full_form_params() {
        let options = SendOptions {
            from: Some(SenderId::new("brand").unwrap()),
            coding: Some(crate::domain::DataCoding::new(8).unwrap()),
            priority: Some(PriorityFlag::new(2).unwrap()),
            validity: Some(crate::domain::ValidityMinutes::new(1440)),
            dlr: Some(DlrRequest::new(
                crate::domain::DlrUrl::new("https://example.com/dlr").unwrap(),
                crate::domain::DlrLevel::All,
                crate::domain::DlrMethod::Post,
            )),
            tags: vec![Tag::new("prio").unwrap(), Tag::new("fr").unwrap()],
        };

        let params = encode_send_form(&request(options));
        assert_eq!(
            params,
            vec![
                ("to".to_owned(), "+33612345678".to_owned()),
                ("content".to_owned(), "hello".to_owned()),
                ("from".to_owned(), "brand".to_owned()),
                ("coding".to_owned(), "8".to_owned()),
                ("priority".to_owned(), "2".to_owned()),
                ("validity-period".to_owned(), "1440".to_owned()),
                ("dlr".to_owned(), "yes".to_owned()),
                ("dlr-url".to_owned(), "https://example.com/dlr".to_owned()),
                ("dlr-level".to_owned(), "3".to_owned()),
                ("dlr-method".to_owned(), "POST".to_owned()),
                ("tags".to_owned(), "prio,fr".to_owned()),
            ]
        );
    }

    #[test]
    fn decode_quoted_success_response() {
        let result = decode_send_response("Success \"16fd2706-8baf-433b-82eb-8c7fada847da\"")
            .unwrap();
        assert_eq!(
            result.message_id().map(|id| id.as_str()),
            Some("16fd2706-8baf-433b-82eb-8c7fada847da")
        );
    }

    #[test]
    fn decode_colon_separated_success_response() {
        let result = decode_send_response("Success: 12345").unwrap();
        assert!(result.is_success());
        assert_eq!(result.message_id().map(|id| id.as_str()), Some("12345"));
    }

    #[test]
    fn decode_quoted_error_response() {
        let result = decode_send_response("Error \"No route found\"").unwrap();
        assert_eq!(result.error_detail(), Some("No route found"));
    }

    #[test]
    fn decode_colon_separated_error_response() {
        let result = decode_send_response("Error: invalid credentials").unwrap();
        assert!(!result.is_success());
        assert_eq!(result.error_detail(), Some("invalid credentials"));
    }

    #[test]
    fn decode_preserves_empty_error_detail() {
        let result = decode_send_response("Error \"\"").unwrap();
        assert_eq!(result.error_detail(), Some(""));
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let result = decode_send_response("  Success \"abc\" \n").unwrap();
        assert_eq!(result.message_id().map(|id| id.as_str()), Some("abc"));
    }

    #[test]
    fn decode_rejects_success_without_id() {
        let err = decode_send_response("Success").unwrap_err();
        assert!(matches!(err, TransportError::MissingMessageId));
    }

    #[test]
    fn decode_rejects_unknown_body() {
        let err = decode_send_response("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, TransportError::UnrecognizedResponse { .. }));
    }
}
