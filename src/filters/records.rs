// ABOUTME: Fixed-layout TLV records used by broadcast, billing and callback number parameters
// ABOUTME: Each record packs to a single byte buffer and unpacks when the payload is long enough

use crate::codec::{octets_to_string, string_to_octets, CodecError};
use crate::types::Value;
use bytes::{BufMut, Bytes, BytesMut};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingIdentification {
    pub format: u8,
    pub data: Bytes,
}

/// Area payload of a `broadcast_area_identifier`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaData {
    /// Format 0: alias or name
    Name(String),
    Raw(Bytes),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastAreaIdentifier {
    pub format: u8,
    pub data: AreaData,
}

impl BroadcastAreaIdentifier {
    pub const NAME_FORMAT: u8 = 0x00;

    pub fn name(name: impl Into<String>) -> Self {
        BroadcastAreaIdentifier {
            format: Self::NAME_FORMAT,
            data: AreaData::Name(name.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastContentType {
    pub network: u8,
    pub content_type: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastFrequencyInterval {
    pub unit: u8,
    pub interval: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackNum {
    pub digit_mode: u8,
    pub ton: u8,
    pub npi: u8,
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackNumAtag {
    pub encoding: u8,
    pub display: Bytes,
}

fn packed(capacity: usize, fill: impl FnOnce(&mut BytesMut)) -> Value {
    let mut buf = BytesMut::with_capacity(capacity);
    fill(&mut buf);
    Value::Bytes(buf.freeze())
}

pub(crate) fn encode_billing(value: Value) -> Value {
    match value {
        Value::Billing(b) => packed(b.data.len() + 1, |buf| {
            buf.put_u8(b.format);
            buf.put_slice(&b.data);
        }),
        other => other,
    }
}

pub(crate) fn decode_billing(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if !raw.is_empty() => Value::Billing(BillingIdentification {
            format: raw[0],
            data: raw.slice(1..),
        }),
        other => other,
    }
}

pub(crate) fn encode_broadcast_area(value: Value) -> Result<Value, CodecError> {
    let area = match value {
        Value::Str(name) => BroadcastAreaIdentifier::name(name),
        Value::BroadcastArea(area) => area,
        other => return Ok(other),
    };
    let data = match area.data {
        AreaData::Name(name) => Bytes::from(string_to_octets(&name)?),
        AreaData::Raw(raw) => raw,
    };
    Ok(packed(data.len() + 1, |buf| {
        buf.put_u8(area.format);
        buf.put_slice(&data);
    }))
}

pub(crate) fn decode_broadcast_area(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if !raw.is_empty() => {
            let format = raw[0];
            let data = if format == BroadcastAreaIdentifier::NAME_FORMAT {
                AreaData::Name(octets_to_string(&raw[1..]))
            } else {
                AreaData::Raw(raw.slice(1..))
            };
            Value::BroadcastArea(BroadcastAreaIdentifier { format, data })
        }
        other => other,
    }
}

pub(crate) fn encode_content_type(value: Value) -> Value {
    match value {
        Value::ContentType(c) => packed(3, |buf| {
            buf.put_u8(c.network);
            buf.put_u16(c.content_type);
        }),
        other => other,
    }
}

pub(crate) fn decode_content_type(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if raw.len() >= 3 => Value::ContentType(BroadcastContentType {
            network: raw[0],
            content_type: u16::from_be_bytes([raw[1], raw[2]]),
        }),
        other => other,
    }
}

pub(crate) fn encode_frequency_interval(value: Value) -> Value {
    match value {
        Value::FrequencyInterval(f) => packed(3, |buf| {
            buf.put_u8(f.unit);
            buf.put_u16(f.interval);
        }),
        other => other,
    }
}

pub(crate) fn decode_frequency_interval(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if raw.len() >= 3 => {
            Value::FrequencyInterval(BroadcastFrequencyInterval {
                unit: raw[0],
                interval: u16::from_be_bytes([raw[1], raw[2]]),
            })
        }
        other => other,
    }
}

pub(crate) fn encode_callback_num(value: Value) -> Result<Value, CodecError> {
    match value {
        Value::CallbackNum(c) => {
            let number = string_to_octets(&c.number)?;
            Ok(packed(number.len() + 3, |buf| {
                buf.put_u8(c.digit_mode);
                buf.put_u8(c.ton);
                buf.put_u8(c.npi);
                buf.put_slice(&number);
            }))
        }
        other => Ok(other),
    }
}

pub(crate) fn decode_callback_num(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if raw.len() >= 3 => Value::CallbackNum(CallbackNum {
            digit_mode: raw[0],
            ton: raw[1],
            npi: raw[2],
            number: octets_to_string(&raw[3..]),
        }),
        other => other,
    }
}

pub(crate) fn encode_callback_num_atag(value: Value) -> Value {
    match value {
        Value::CallbackNumAtag(c) => packed(c.display.len() + 1, |buf| {
            buf.put_u8(c.encoding);
            buf.put_slice(&c.display);
        }),
        other => other,
    }
}

pub(crate) fn decode_callback_num_atag(value: Value) -> Value {
    match value {
        Value::Bytes(raw) if !raw.is_empty() => Value::CallbackNumAtag(CallbackNumAtag {
            encoding: raw[0],
            display: raw.slice(1..),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(bytes: &'static [u8]) -> Value {
        Value::Bytes(Bytes::from_static(bytes))
    }

    #[test]
    fn test_billing_identification() {
        let record = Value::Billing(BillingIdentification {
            format: 0x01,
            data: Bytes::from_static(b"abc"),
        });
        assert_eq!(encode_billing(record.clone()), raw(b"\x01abc"));
        assert_eq!(decode_billing(raw(b"\x01abc")), record);
    }

    #[test]
    fn test_broadcast_area_name() {
        assert_eq!(
            encode_broadcast_area(Value::Str("area".into())).unwrap(),
            raw(b"\x00area")
        );
        assert_eq!(
            decode_broadcast_area(raw(b"\x00area")),
            Value::BroadcastArea(BroadcastAreaIdentifier::name("area"))
        );
        assert_eq!(
            decode_broadcast_area(raw(b"\x02\x10\x20")),
            Value::BroadcastArea(BroadcastAreaIdentifier {
                format: 0x02,
                data: AreaData::Raw(Bytes::from_static(b"\x10\x20")),
            })
        );
    }

    #[test]
    fn test_content_type_and_frequency() {
        let content = Value::ContentType(BroadcastContentType {
            network: 0x01,
            content_type: 0x0102,
        });
        assert_eq!(encode_content_type(content.clone()), raw(b"\x01\x01\x02"));
        assert_eq!(decode_content_type(raw(b"\x01\x01\x02")), content);

        let freq = Value::FrequencyInterval(BroadcastFrequencyInterval {
            unit: 0x09,
            interval: 30,
        });
        assert_eq!(encode_frequency_interval(freq.clone()), raw(b"\x09\x00\x1e"));
        assert_eq!(decode_frequency_interval(raw(b"\x09\x00\x1e")), freq);
    }

    #[test]
    fn test_callback_numbers() {
        let num = Value::CallbackNum(CallbackNum {
            digit_mode: 0,
            ton: 1,
            npi: 1,
            number: "4670".into(),
        });
        assert_eq!(encode_callback_num(num.clone()).unwrap(), raw(b"\x00\x01\x014670"));
        assert_eq!(decode_callback_num(raw(b"\x00\x01\x014670")), num);

        let atag = Value::CallbackNumAtag(CallbackNumAtag {
            encoding: 0x03,
            display: Bytes::from_static(b"Shop"),
        });
        assert_eq!(encode_callback_num_atag(atag.clone()), raw(b"\x03Shop"));
        assert_eq!(decode_callback_num_atag(raw(b"\x03Shop")), atag);
    }

    #[test]
    fn test_short_payloads_stay_raw() {
        assert_eq!(decode_content_type(raw(b"\x01")), raw(b"\x01"));
        assert_eq!(decode_callback_num(raw(b"\x00\x01")), raw(b"\x00\x01"));
        assert_eq!(decode_billing(raw(b"")), raw(b""));
    }
}
