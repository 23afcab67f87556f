// ABOUTME: Dynamic field values and the wire-type codecs that read, write and size them
// ABOUTME: WireType covers fixed PDU fields; TlvType covers values whose length comes from a TLV header

use crate::codec::{
    decode_bytes, decode_cstring, decode_u32, decode_u8, encode_cstring, encode_u16, encode_u32,
    encode_u8, octets_to_string, string_to_octets, CodecError,
};
use crate::datatypes::{
    CommandStatus, DataCoding, EsmClass, InterfaceVersion, NumericPlanIndicator, TypeOfNumber,
};
use crate::filters::{
    BillingIdentification, BroadcastAreaIdentifier, BroadcastContentType,
    BroadcastFrequencyInterval, CallbackNum, CallbackNumAtag, ShortMessage,
};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::io::Cursor;

/// A single PDU field value.
///
/// Raw wire shapes (`Int`, `Str`, `Bytes` and the two address arrays) are what
/// the codecs read and write. The remaining variants are produced and consumed
/// by field filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(u32),
    Str(String),
    Bytes(Bytes),
    DestAddresses(Vec<DestAddress>),
    UnsuccessSmes(Vec<UnsuccessSme>),
    Time(DateTime<Utc>),
    Message(ShortMessage),
    Billing(BillingIdentification),
    BroadcastArea(BroadcastAreaIdentifier),
    ContentType(BroadcastContentType),
    FrequencyInterval(BroadcastFrequencyInterval),
    CallbackNum(CallbackNum),
    CallbackNumAtag(CallbackNumAtag),
    /// Repeated TLV occurrences
    List(Vec<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&ShortMessage> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Text of a string value or of a decoded message body.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Message(m) => m.text(),
            _ => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::DestAddresses(_) => "dest_address list",
            Value::UnsuccessSmes(_) => "unsuccess_sme list",
            Value::Time(_) => "time",
            Value::Message(_) => "message",
            Value::Billing(_) => "billing_identification",
            Value::BroadcastArea(_) => "broadcast_area_identifier",
            Value::ContentType(_) => "broadcast_content_type",
            Value::FrequencyInterval(_) => "broadcast_frequency_interval",
            Value::CallbackNum(_) => "callback_num",
            Value::CallbackNumAtag(_) => "callback_num_atag",
            Value::List(_) => "list",
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => |$v:ident| $body:expr),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

value_from! {
    u8 => |v| Value::Int(u32::from(v)),
    u16 => |v| Value::Int(u32::from(v)),
    u32 => |v| Value::Int(v),
    &str => |v| Value::Str(v.to_string()),
    String => |v| Value::Str(v),
    Bytes => |v| Value::Bytes(v),
    Vec<u8> => |v| Value::Bytes(Bytes::from(v)),
    &[u8] => |v| Value::Bytes(Bytes::copy_from_slice(v)),
    Vec<DestAddress> => |v| Value::DestAddresses(v),
    Vec<UnsuccessSme> => |v| Value::UnsuccessSmes(v),
    DateTime<Utc> => |v| Value::Time(v),
    ShortMessage => |v| Value::Message(v),
    BillingIdentification => |v| Value::Billing(v),
    BroadcastAreaIdentifier => |v| Value::BroadcastArea(v),
    BroadcastContentType => |v| Value::ContentType(v),
    BroadcastFrequencyInterval => |v| Value::FrequencyInterval(v),
    CallbackNum => |v| Value::CallbackNum(v),
    CallbackNumAtag => |v| Value::CallbackNumAtag(v),
    Vec<Value> => |v| Value::List(v),
    TypeOfNumber => |v| Value::Int(v as u32),
    NumericPlanIndicator => |v| Value::Int(v as u32),
    InterfaceVersion => |v| Value::Int(v as u32),
    DataCoding => |v| Value::Int(v as u32),
    EsmClass => |v| Value::Int(u32::from(v.0)),
    CommandStatus => |v| Value::Int(v as u32),
}

/// One entry of a submit_multi `dest_address` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestAddress {
    /// dest_flag 1
    Sme { ton: u8, npi: u8, address: String },
    /// dest_flag 2
    DistributionList(String),
}

impl DestAddress {
    pub const SME_FLAG: u8 = 0x01;
    pub const DISTRIBUTION_LIST_FLAG: u8 = 0x02;

    pub fn sme(ton: u8, npi: u8, address: impl Into<String>) -> Self {
        DestAddress::Sme {
            ton,
            npi,
            address: address.into(),
        }
    }

    pub fn distribution_list(name: impl Into<String>) -> Self {
        DestAddress::DistributionList(name.into())
    }

    fn size(&self) -> usize {
        match self {
            DestAddress::Sme { address, .. } => 3 + address.chars().count() + 1,
            DestAddress::DistributionList(name) => 1 + name.chars().count() + 1,
        }
    }
}

/// One entry of a submit_multi_resp `unsuccess_sme` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsuccessSme {
    pub ton: u8,
    pub npi: u8,
    pub address: String,
    pub error_status_code: u32,
}

impl UnsuccessSme {
    fn size(&self) -> usize {
        2 + self.address.chars().count() + 1 + 4
    }
}

/// Codec for a mandatory PDU field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Int8,
    Int16,
    Int32,
    /// 1-byte length prefix followed by the octets
    String,
    /// NUL-terminated octets
    CString,
    /// 1-byte length prefix followed by raw bytes
    Buffer,
    DestAddressArray,
    UnsuccessSmeArray,
}

impl WireType {
    pub fn default_value(&self) -> Value {
        match self {
            WireType::Int8 | WireType::Int16 | WireType::Int32 => Value::Int(0),
            WireType::String | WireType::CString => Value::Str(String::new()),
            WireType::Buffer => Value::Bytes(Bytes::new()),
            WireType::DestAddressArray => Value::DestAddresses(Vec::new()),
            WireType::UnsuccessSmeArray => Value::UnsuccessSmes(Vec::new()),
        }
    }

    /// Whether `value` has a shape this type can write.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            WireType::Int8 | WireType::Int16 | WireType::Int32 => matches!(value, Value::Int(_)),
            WireType::String | WireType::CString | WireType::Buffer => {
                matches!(value, Value::Str(_) | Value::Bytes(_))
            }
            WireType::DestAddressArray => matches!(value, Value::DestAddresses(_)),
            WireType::UnsuccessSmeArray => matches!(value, Value::UnsuccessSmes(_)),
        }
    }

    pub fn read(&self, buf: &mut Cursor<&[u8]>) -> Result<Value, CodecError> {
        match self {
            WireType::Int8 => Ok(Value::Int(u32::from(decode_u8(buf)?))),
            WireType::Int16 => Ok(Value::Int(u32::from(crate::codec::decode_u16(buf)?))),
            WireType::Int32 => Ok(Value::Int(decode_u32(buf)?)),
            WireType::String => {
                let len = decode_u8(buf)? as usize;
                Ok(Value::Str(octets_to_string(&decode_bytes(buf, len)?)))
            }
            WireType::CString => Ok(Value::Str(octets_to_string(&decode_cstring(buf)?))),
            WireType::Buffer => {
                let len = decode_u8(buf)? as usize;
                Ok(Value::Bytes(decode_bytes(buf, len)?))
            }
            WireType::DestAddressArray => {
                let count = decode_u8(buf)?;
                let mut result = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let flag = decode_u8(buf)?;
                    if flag == DestAddress::SME_FLAG {
                        let ton = decode_u8(buf)?;
                        let npi = decode_u8(buf)?;
                        let address = octets_to_string(&decode_cstring(buf)?);
                        result.push(DestAddress::Sme { ton, npi, address });
                    } else {
                        result.push(DestAddress::DistributionList(octets_to_string(
                            &decode_cstring(buf)?,
                        )));
                    }
                }
                Ok(Value::DestAddresses(result))
            }
            WireType::UnsuccessSmeArray => {
                let count = decode_u8(buf)?;
                let mut result = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let ton = decode_u8(buf)?;
                    let npi = decode_u8(buf)?;
                    let address = octets_to_string(&decode_cstring(buf)?);
                    let error_status_code = decode_u32(buf)?;
                    result.push(UnsuccessSme {
                        ton,
                        npi,
                        address,
                        error_status_code,
                    });
                }
                Ok(Value::UnsuccessSmes(result))
            }
        }
    }

    /// Number of bytes `write` produces for `value`.
    pub fn size(&self, value: &Value) -> usize {
        match self {
            WireType::Int8 => 1,
            WireType::Int16 => 2,
            WireType::Int32 => 4,
            WireType::String | WireType::CString | WireType::Buffer => octets_len(value) + 1,
            WireType::DestAddressArray => match value {
                Value::DestAddresses(list) => 1 + list.iter().map(DestAddress::size).sum::<usize>(),
                _ => 1,
            },
            WireType::UnsuccessSmeArray => match value {
                Value::UnsuccessSmes(list) => {
                    1 + list.iter().map(UnsuccessSme::size).sum::<usize>()
                }
                _ => 1,
            },
        }
    }

    pub fn write(&self, value: &Value, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            WireType::Int8 => encode_u8(buf, int_of_width(value, 0xFF)? as u8),
            WireType::Int16 => encode_u16(buf, int_of_width(value, 0xFFFF)? as u16),
            WireType::Int32 => encode_u32(buf, int_of_width(value, u32::MAX)?),
            WireType::String | WireType::Buffer => {
                let octets = octets(value)?;
                let len = u8::try_from(octets.len()).map_err(|_| {
                    CodecError::invalid(format!(
                        "{} bytes do not fit a 1-byte length prefix",
                        octets.len()
                    ))
                })?;
                buf.put_u8(len);
                buf.put_slice(&octets);
            }
            WireType::CString => encode_cstring(buf, &octets(value)?),
            WireType::DestAddressArray => {
                let Value::DestAddresses(list) = value else {
                    return Err(mismatch("dest_address list", value));
                };
                encode_u8(buf, count_of(list.len())?);
                for dest in list {
                    match dest {
                        DestAddress::Sme { ton, npi, address } => {
                            encode_u8(buf, DestAddress::SME_FLAG);
                            encode_u8(buf, *ton);
                            encode_u8(buf, *npi);
                            encode_cstring(buf, &string_to_octets(address)?);
                        }
                        DestAddress::DistributionList(name) => {
                            encode_u8(buf, DestAddress::DISTRIBUTION_LIST_FLAG);
                            encode_cstring(buf, &string_to_octets(name)?);
                        }
                    }
                }
            }
            WireType::UnsuccessSmeArray => {
                let Value::UnsuccessSmes(list) = value else {
                    return Err(mismatch("unsuccess_sme list", value));
                };
                encode_u8(buf, count_of(list.len())?);
                for sme in list {
                    encode_u8(buf, sme.ton);
                    encode_u8(buf, sme.npi);
                    encode_cstring(buf, &string_to_octets(&sme.address)?);
                    encode_u32(buf, sme.error_status_code);
                }
            }
        }
        Ok(())
    }
}

/// Codec for a TLV value. The value length comes from the TLV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlvType {
    Int8,
    Int16,
    Int32,
    CString,
    /// Octets, length given by the TLV header
    String,
    /// Raw bytes, length given by the TLV header
    Buffer,
}

impl TlvType {
    pub fn default_value(&self) -> Value {
        match self {
            TlvType::Int8 | TlvType::Int16 | TlvType::Int32 => Value::Int(0),
            TlvType::CString | TlvType::String => Value::Str(String::new()),
            TlvType::Buffer => Value::Bytes(Bytes::new()),
        }
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TlvType::Int8 | TlvType::Int16 | TlvType::Int32 => matches!(value, Value::Int(_)),
            TlvType::CString | TlvType::String | TlvType::Buffer => {
                matches!(value, Value::Str(_) | Value::Bytes(_))
            }
        }
    }

    /// Read a value from exactly the TLV payload.
    pub fn read(&self, payload: &[u8]) -> Result<Value, CodecError> {
        let width = match self {
            TlvType::Int8 => 1,
            TlvType::Int16 => 2,
            TlvType::Int32 => 4,
            _ => 0,
        };
        if payload.len() < width {
            return Err(CodecError::invalid(format!(
                "{} byte value is shorter than its {width} byte integer type",
                payload.len()
            )));
        }

        let mut cursor = Cursor::new(payload);
        Ok(match self {
            TlvType::Int8 => Value::Int(u32::from(cursor.get_u8())),
            TlvType::Int16 => Value::Int(u32::from(cursor.get_u16())),
            TlvType::Int32 => Value::Int(cursor.get_u32()),
            TlvType::CString => {
                let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
                Value::Str(octets_to_string(&payload[..end]))
            }
            TlvType::String => Value::Str(octets_to_string(payload)),
            TlvType::Buffer => Value::Bytes(Bytes::copy_from_slice(payload)),
        })
    }

    pub fn size(&self, value: &Value) -> usize {
        match self {
            TlvType::Int8 => 1,
            TlvType::Int16 => 2,
            TlvType::Int32 => 4,
            TlvType::CString => octets_len(value) + 1,
            TlvType::String | TlvType::Buffer => octets_len(value),
        }
    }

    pub fn write(&self, value: &Value, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            TlvType::Int8 => encode_u8(buf, int_of_width(value, 0xFF)? as u8),
            TlvType::Int16 => encode_u16(buf, int_of_width(value, 0xFFFF)? as u16),
            TlvType::Int32 => encode_u32(buf, int_of_width(value, u32::MAX)?),
            TlvType::CString => encode_cstring(buf, &octets(value)?),
            TlvType::String | TlvType::Buffer => buf.put_slice(&octets(value)?),
        }
        Ok(())
    }
}

fn mismatch(expected: &str, value: &Value) -> CodecError {
    CodecError::invalid(format!("expected {expected}, got {}", value.kind()))
}

fn int_of_width(value: &Value, max: u32) -> Result<u32, CodecError> {
    match value {
        Value::Int(v) if *v <= max => Ok(*v),
        Value::Int(v) => Err(CodecError::invalid(format!(
            "{v} does not fit in {} bytes",
            (32 - max.leading_zeros()) / 8
        ))),
        other => Err(mismatch("integer", other)),
    }
}

fn count_of(len: usize) -> Result<u8, CodecError> {
    u8::try_from(len).map_err(|_| CodecError::invalid(format!("{len} entries exceed 255")))
}

fn octets(value: &Value) -> Result<Cow<'_, [u8]>, CodecError> {
    match value {
        Value::Bytes(b) => Ok(Cow::Borrowed(b.as_ref())),
        Value::Str(s) => Ok(Cow::Owned(string_to_octets(s)?)),
        other => Err(mismatch("string or bytes", other)),
    }
}

fn octets_len(value: &Value) -> usize {
    match value {
        Value::Bytes(b) => b.len(),
        Value::Str(s) => s.chars().count(),
        _ => 0,
    }
}
