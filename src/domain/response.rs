use crate::domain::value::MessageId;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Classified outcome of one submission, as parsed from the send
/// endpoint's plain-text response.
///
/// Exactly one of the message id and the error detail exists; the enum
/// makes the other unrepresentable.
pub enum SubmissionResult {
    /// The gateway accepted the message and assigned an id.
    Success { message_id: MessageId },
    /// The gateway rejected the message, or the round trip failed.
    Error { error_detail: String },
}

impl SubmissionResult {
    /// Whether the submission was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The gateway-assigned id, when accepted.
    pub fn message_id(&self) -> Option<&MessageId> {
        match self {
            Self::Success { message_id } => Some(message_id),
            Self::Error { .. } => None,
        }
    }

    /// The diagnostic detail, when rejected.
    pub fn error_detail(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { error_detail } => Some(error_detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account quota value: a number rendered as reported by the gateway, or
/// `Undefined` when the account has no quota set (`"ND"` on the wire).
pub enum Quota {
    Value(String),
    Undefined,
}

impl Quota {
    /// The reported value, unless undefined.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Undefined => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Account balance as reported by the balance endpoint.
pub struct BalanceResponse {
    pub balance: Quota,
    pub sms_count: Quota,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pricing for a prospective submission as reported by the rate endpoint.
pub struct RateResponse {
    /// Price per message part. Preserved as the raw decimal rendering to
    /// avoid formatting drift.
    pub unit_rate: String,
    /// Number of message parts the content would be split into.
    pub submit_sm_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::MessageId;

    #[test]
    fn submission_result_exposes_exactly_one_side() {
        let ok = SubmissionResult::Success {
            message_id: MessageId::new("abc123").unwrap(),
        };
        assert!(ok.is_success());
        assert_eq!(ok.message_id().map(MessageId::as_str), Some("abc123"));
        assert_eq!(ok.error_detail(), None);

        let err = SubmissionResult::Error {
            error_detail: "No route found".to_owned(),
        };
        assert!(!err.is_success());
        assert_eq!(err.message_id(), None);
        assert_eq!(err.error_detail(), Some("No route found"));
    }

    #[test]
    fn quota_distinguishes_undefined() {
        assert_eq!(Quota::Value("100.2".to_owned()).value(), Some("100.2"));
        assert_eq!(Quota::Undefined.value(), None);
    }
}
