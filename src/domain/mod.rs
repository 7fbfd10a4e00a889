//! Domain layer: strong types with validation and invariants (no I/O).

mod inbound;
mod request;
mod response;
mod validation;
mod value;

pub use inbound::{DeliveryReceipt, DlrDetails, InboundMessage};
pub use request::{CheckRate, DlrRequest, RateOptions, SendOptions, SendSms};
pub use response::{BalanceResponse, Quota, RateResponse, SubmissionResult};
pub use validation::ValidationError;
pub use value::{
    ConnectorId, DataCoding, DlrLevel, DlrMethod, DlrUrl, MessageId, MessageText, Password,
    PhoneNumber, PriorityFlag, RawPhoneNumber, SenderId, Tag, Username, ValidityMinutes,
};
