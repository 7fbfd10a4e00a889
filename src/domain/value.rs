use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// HTTP API account username.
///
/// Invariant: non-empty after trimming, at most 16 characters.
pub struct Username(String);

impl Username {
    /// Form field name used by the gateway (`username`).
    pub const FIELD: &'static str = "username";

    /// Maximum length accepted by the gateway.
    pub const MAX_LEN: usize = 16;

    /// Create a validated [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: trimmed.chars().count(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// HTTP API account password.
///
/// Invariant: non-empty, at most 16 characters (whitespace is preserved).
/// The `Debug` output is redacted so the clear value cannot reach logs.
pub struct Password(String);

impl Password {
    /// Form field name used by the gateway (`password`).
    pub const FIELD: &'static str = "password";

    /// Maximum length accepted by the gateway.
    pub const MAX_LEN: usize = 16;

    /// Create a validated [`Password`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(ValidationError::TooLong {
                field: Self::FIELD,
                max: Self::MAX_LEN,
                actual: value.chars().count(),
            });
        }
        Ok(Self(value))
    }

    /// Borrow the password as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender id carried in the `from` field of a submission.
///
/// Invariant: non-empty after trimming. The value must be enabled for your
/// gateway account.
pub struct SenderId(String);

impl SenderId {
    /// Form field name used by the gateway (`from`).
    pub const FIELD: &'static str = "from";

    /// Create a validated [`SenderId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// SMS message text (`content`).
///
/// Invariant: non-empty after trimming. The original value (including
/// whitespace) is preserved. Length and encoding constraints are the
/// gateway's responsibility.
pub struct MessageText(String);

impl MessageText {
    /// Form field name used by the gateway (`content`).
    pub const FIELD: &'static str = "content";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Gateway-assigned message identifier.
///
/// Returned by the send endpoint on success and carried in the `id` field
/// of delivery callbacks. For inbound callbacks the id is per delivery
/// attempt, not stable across redeliveries.
///
/// Invariant: non-empty after trimming.
pub struct MessageId(String);

impl MessageId {
    /// Form field name used in callbacks (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Identifier of the carrier connector that received an inbound message.
///
/// Invariant: non-empty after trimming.
pub struct ConnectorId(String);

impl ConnectorId {
    /// Form field name used in callbacks (`origin-connector`).
    pub const FIELD: &'static str = "origin-connector";

    /// Create a validated [`ConnectorId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated connector id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated phone number as sent to the gateway (`to`).
///
/// Invariant: non-empty after trimming. The gateway is authoritative for
/// the numbering format; this type does not normalize. For opt-in E.164
/// normalization, parse into [`PhoneNumber`] and convert.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// Form field name used by the gateway (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw (trimmed) value as sent to the gateway.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to a normalized raw value (E.164).
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with an E.164 representation.
///
/// Equality, ordering, and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    parsed: phonenumber::PhoneNumber,
}

impl PhoneNumber {
    /// Form field name used by the gateway (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse and normalize a phone number into E.164.
    ///
    /// `default_region` is used when the input does not contain an explicit
    /// country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region, &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();

        Ok(Self { raw, e164, parsed })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation.
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// The parsed phone number from the `phonenumber` crate.
    pub fn parsed(&self) -> &phonenumber::PhoneNumber {
        &self.parsed
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl std::cmp::PartialOrd for PhoneNumber {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::cmp::Ord for PhoneNumber {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.e164.cmp(&other.e164)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// SMPP data coding scheme (`coding`).
///
/// Invariant: one of the coding values the gateway routes
/// (0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 13, 14). 0 is the GSM 03.38
/// default, 8 is UCS2.
pub struct DataCoding(u8);

impl DataCoding {
    /// Form field name used by the gateway (`coding`).
    pub const FIELD: &'static str = "coding";

    const ALLOWED: [u8; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 13, 14];

    /// Create a validated [`DataCoding`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if !Self::ALLOWED.contains(&value) {
            return Err(ValidationError::InvalidDataCoding { actual: value });
        }
        Ok(Self(value))
    }

    /// Get the underlying coding value.
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Submission priority flag (`priority`).
///
/// Invariant: `0..=3`, highest last.
pub struct PriorityFlag(u8);

impl PriorityFlag {
    /// Form field name used by the gateway (`priority`).
    pub const FIELD: &'static str = "priority";

    /// Minimum allowed priority.
    pub const MIN: u8 = 0;
    /// Maximum allowed priority.
    pub const MAX: u8 = 3;

    /// Create a validated [`PriorityFlag`].
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > Self::MAX {
            return Err(ValidationError::PriorityOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                actual: value,
            });
        }
        Ok(Self(value))
    }

    /// Get the underlying priority value.
    pub fn value(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Message validity period in minutes (`validity-period`).
///
/// The gateway stops delivery attempts once the period expires.
pub struct ValidityMinutes(u32);

impl ValidityMinutes {
    /// Form field name used by the gateway (`validity-period`).
    pub const FIELD: &'static str = "validity-period";

    /// Create a validity period (no range validation is performed).
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the underlying value in minutes.
    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Delivery-receipt callback URL (`dlr-url`).
///
/// Invariant: a parseable absolute `http` or `https` URL.
pub struct DlrUrl(url::Url);

impl DlrUrl {
    /// Form field name used by the gateway (`dlr-url`).
    pub const FIELD: &'static str = "dlr-url";

    /// Create a validated [`DlrUrl`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let parsed = url::Url::parse(value.trim())
            .map_err(|_| ValidationError::InvalidUrl {
                input: value.clone(),
            })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl { input: value });
        }
        Ok(Self(parsed))
    }

    /// Borrow the URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Borrow the parsed URL.
    pub fn url(&self) -> &url::Url {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which delivery-receipt stages the gateway reports (`dlr-level`).
pub enum DlrLevel {
    /// Terminal receipts only (delivered / undeliverable).
    Terminal,
    /// Intermediate receipts only (taken by the carrier).
    Intermediate,
    /// Both terminal and intermediate receipts.
    All,
}

impl DlrLevel {
    /// Form field name used by the gateway (`dlr-level`).
    pub const FIELD: &'static str = "dlr-level";

    /// Wire value for this level.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Terminal => 1,
            Self::Intermediate => 2,
            Self::All => 3,
        }
    }

    /// Map a wire value to a level.
    pub fn from_u8(value: u8) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(Self::Terminal),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::All),
            other => Err(ValidationError::InvalidDlrLevel { actual: other }),
        }
    }

    /// Whether receipts at this level carry the extended detail fields.
    pub fn has_details(self) -> bool {
        matches!(self, Self::Intermediate | Self::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// HTTP method the gateway uses for delivery-receipt callbacks (`dlr-method`).
pub enum DlrMethod {
    #[default]
    Post,
    Get,
}

impl DlrMethod {
    /// Form field name used by the gateway (`dlr-method`).
    pub const FIELD: &'static str = "dlr-method";

    /// Wire value for this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Get => "GET",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Routing tag attached to a submission (`tags`, comma-joined on the wire).
///
/// Invariant: non-empty, characters limited to `[-a-zA-Z0-9]`.
pub struct Tag(String);

impl Tag {
    /// Form field name used by the gateway (`tags`).
    pub const FIELD: &'static str = "tags";

    /// Create a validated [`Tag`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty()
            || !value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ValidationError::InvalidTag { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the validated tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
