use crate::domain::value::{
    DataCoding, DlrLevel, DlrMethod, DlrUrl, MessageText, PriorityFlag, RawPhoneNumber, SenderId,
    Tag, ValidityMinutes,
};

#[derive(Debug, Clone, Default)]
/// Optional submission parameters for [`SendSms`].
///
/// When `dlr` is `None` the request is encoded with `dlr=no`; a
/// [`DlrRequest`] switches it to `dlr=yes` and adds the callback fields.
pub struct SendOptions {
    pub from: Option<SenderId>,
    pub coding: Option<DataCoding>,
    pub priority: Option<PriorityFlag>,
    pub validity: Option<ValidityMinutes>,
    pub dlr: Option<DlrRequest>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone)]
/// Delivery-receipt subscription attached to a submission.
pub struct DlrRequest {
    url: DlrUrl,
    level: DlrLevel,
    method: DlrMethod,
}

impl DlrRequest {
    /// Request receipts at `level` delivered to `url` using `method`.
    pub fn new(url: DlrUrl, level: DlrLevel, method: DlrMethod) -> Self {
        Self { url, level, method }
    }

    pub fn url(&self) -> &DlrUrl {
        &self.url
    }

    pub fn level(&self) -> DlrLevel {
        self.level
    }

    pub fn method(&self) -> DlrMethod {
        self.method
    }
}

#[derive(Debug, Clone)]
/// One outbound (MT) message submission.
///
/// Ephemeral: built per send request and discarded once the gateway's
/// synchronous response has been classified.
pub struct SendSms {
    to: RawPhoneNumber,
    content: MessageText,
    options: SendOptions,
}

impl SendSms {
    /// Build a submission to a single destination.
    pub fn new(to: RawPhoneNumber, content: MessageText, options: SendOptions) -> Self {
        Self {
            to,
            content,
            options,
        }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn content(&self) -> &MessageText {
        &self.content
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }
}

#[derive(Debug, Clone, Default)]
/// Optional parameters for [`CheckRate`].
pub struct RateOptions {
    pub content: Option<MessageText>,
    pub from: Option<SenderId>,
    pub coding: Option<DataCoding>,
}

#[derive(Debug, Clone)]
/// Rate lookup for a prospective submission.
pub struct CheckRate {
    to: RawPhoneNumber,
    options: RateOptions,
}

impl CheckRate {
    /// Look up the unit rate for sending to `to`.
    pub fn new(to: RawPhoneNumber, options: RateOptions) -> Self {
        Self { to, options }
    }

    pub fn to(&self) -> &RawPhoneNumber {
        &self.to
    }

    pub fn options(&self) -> &RateOptions {
        &self.options
    }
}
