//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod balance;
mod deliver_sm;
mod dlr;
mod quota;
mod rate;
mod send_sms;

pub use balance::decode_balance_json_response;
pub use deliver_sm::decode_deliver_form;
pub use dlr::decode_dlr_form;
pub use rate::{decode_rate_json_response, encode_rate_form};
pub use send_sms::{decode_send_response, encode_send_form};
