use serde::Deserialize;
use serde::de::Error as DeError;

use crate::domain::Quota;

/// Quota-like value returned by the gateway as either JSON number or the
/// string `"ND"` (not defined).
///
/// For numbers, the raw JSON token is preserved to avoid formatting drift
/// (`100.20` remains `"100.20"` instead of becoming `"100.2"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportQuota(Quota);

impl TransportQuota {
    pub fn into_quota(self) -> Quota {
        self.0
    }
}

impl<'de> Deserialize<'de> for TransportQuota {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                if parsed == "ND" {
                    Ok(Self(Quota::Undefined))
                } else {
                    Ok(Self(Quota::Value(parsed)))
                }
            }
            Some(b'-' | b'0'..=b'9') => Ok(Self(Quota::Value(token.to_owned()))),
            _ => Err(D::Error::custom(
                "expected quota field to be JSON number or \"ND\"",
            )),
        }
    }
}
