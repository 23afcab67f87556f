// ABOUTME: Field filters translating between logical values and their wire representation
// ABOUTME: Resolved per field when the command tables are built, then applied around encode/decode

mod message;
mod records;
pub mod time;

pub use message::{InformationElement, MessageBody, ShortMessage, Udh};
pub use records::{
    AreaData, BillingIdentification, BroadcastAreaIdentifier, BroadcastContentType,
    BroadcastFrequencyInterval, CallbackNum, CallbackNumAtag,
};

use crate::codec::CodecError;
use crate::types::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Time,
    Message,
    BillingIdentification,
    BroadcastAreaIdentifier,
    BroadcastContentType,
    BroadcastFrequencyInterval,
    CallbackNum,
    CallbackNumAtag,
}

impl Filter {
    /// Turn a logical value into its wire shape. `fields` is the rest of the
    /// PDU and may be updated (the message filter sets `data_coding` and
    /// `esm_class`).
    pub fn encode(
        &self,
        value: Value,
        fields: &mut BTreeMap<String, Value>,
    ) -> Result<Value, CodecError> {
        Ok(match self {
            Filter::Time => time::encode(value),
            Filter::Message => message::encode(value, fields)?,
            Filter::BillingIdentification => records::encode_billing(value),
            Filter::BroadcastAreaIdentifier => records::encode_broadcast_area(value)?,
            Filter::BroadcastContentType => records::encode_content_type(value),
            Filter::BroadcastFrequencyInterval => records::encode_frequency_interval(value),
            Filter::CallbackNum => records::encode_callback_num(value)?,
            Filter::CallbackNumAtag => records::encode_callback_num_atag(value),
        })
    }

    /// Turn a wire value into its logical form. Values that do not decode
    /// are returned unchanged.
    pub fn decode(&self, value: Value, fields: &BTreeMap<String, Value>, skip_udh: bool) -> Value {
        match self {
            Filter::Time => time::decode(value),
            Filter::Message => message::decode(value, fields, skip_udh),
            Filter::BillingIdentification => records::decode_billing(value),
            Filter::BroadcastAreaIdentifier => records::decode_broadcast_area(value),
            Filter::BroadcastContentType => records::decode_content_type(value),
            Filter::BroadcastFrequencyInterval => records::decode_frequency_interval(value),
            Filter::CallbackNum => records::decode_callback_num(value),
            Filter::CallbackNumAtag => records::decode_callback_num_atag(value),
        }
    }

    /// Logical value shapes this filter turns into wire values.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Filter::Time => matches!(value, Value::Time(_) | Value::Str(_)),
            Filter::Message => {
                matches!(value, Value::Message(_) | Value::Str(_) | Value::Bytes(_))
            }
            Filter::BillingIdentification => matches!(value, Value::Billing(_) | Value::Bytes(_)),
            Filter::BroadcastAreaIdentifier => matches!(
                value,
                Value::BroadcastArea(_) | Value::Str(_) | Value::Bytes(_)
            ),
            Filter::BroadcastContentType => {
                matches!(value, Value::ContentType(_) | Value::Bytes(_))
            }
            Filter::BroadcastFrequencyInterval => {
                matches!(value, Value::FrequencyInterval(_) | Value::Bytes(_))
            }
            Filter::CallbackNum => matches!(value, Value::CallbackNum(_) | Value::Bytes(_)),
            Filter::CallbackNumAtag => {
                matches!(value, Value::CallbackNumAtag(_) | Value::Bytes(_))
            }
        }
    }
}
