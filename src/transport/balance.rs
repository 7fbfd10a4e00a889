use serde::Deserialize;

use crate::domain::BalanceResponse;
use crate::transport::quota::TransportQuota;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct BalanceJsonResponse {
    balance: TransportQuota,
    sms_count: TransportQuota,
}

pub fn decode_balance_json_response(json: &str) -> Result<BalanceResponse, TransportError> {
    let parsed: BalanceJsonResponse = serde_json::from_str(json)?;
    Ok(BalanceResponse {
        balance: parsed.balance.into_quota(),
        sms_count: parsed.sms_count.into_quota(),
    })
}

#[cfg(test)]
mod tests {
    use crate::domain::Quota;

    use super::*;

    #[test]
    fn decode_numeric_quotas() {
        let response = decode_balance_json_response(r#"{"balance": 100.20, "sms_count": 310}"#)
            .unwrap();
        assert_eq!(response.balance, Quota::Value("100.20".to_owned()));
        assert_eq!(response.sms_count, Quota::Value("310".to_owned()));
    }

    #[test]
    fn decode_undefined_quotas() {
        let response =
            decode_balance_json_response(r#"{"balance": "ND", "sms_count": "ND"}"#).unwrap();
        assert_eq!(response.balance, Quota::Undefined);
        assert_eq!(response.sms_count, Quota::Undefined);
    }

    #[test]
    fn decode_rejects_missing_fields() {
        let err = decode_balance_json_response(r#"{"balance": 10}"#).unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
