// ABOUTME: Short message bodies: text encoding selection, User Data Header split and join
// ABOUTME: Encoding may set data_coding and the esm_class UDH indicator on the owning PDU

use crate::codec::CodecError;
use crate::datatypes::EsmClass;
use crate::encodings::{Encoding, GsmShift};
use crate::types::Value;
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::BTreeMap;

/// One User Data Header information element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InformationElement {
    pub id: u8,
    pub data: Bytes,
}

impl InformationElement {
    pub const CONCATENATED_8BIT: u8 = 0x00;
    pub const CONCATENATED_16BIT: u8 = 0x08;
    pub const NATIONAL_SINGLE_SHIFT: u8 = 0x24;
    pub const NATIONAL_LOCKING_SHIFT: u8 = 0x25;

    pub fn new(id: u8, data: impl Into<Bytes>) -> Self {
        InformationElement {
            id,
            data: data.into(),
        }
    }

    fn is_national_shift(&self) -> bool {
        self.id == Self::NATIONAL_SINGLE_SHIFT || self.id == Self::NATIONAL_LOCKING_SHIFT
    }
}

/// User Data Header: a length byte followed by `{id, length, data}` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Udh {
    pub elements: Vec<InformationElement>,
}

impl Udh {
    pub fn new(elements: Vec<InformationElement>) -> Self {
        Udh { elements }
    }

    /// Parse a header including its leading length byte. Elements whose
    /// declared length runs past the end keep whatever bytes remain.
    pub fn parse(bytes: &[u8]) -> Self {
        let mut elements = Vec::new();
        let mut cursor = 1;
        while cursor + 1 < bytes.len() {
            let id = bytes[cursor];
            let len = bytes[cursor + 1] as usize;
            let start = cursor + 2;
            let end = (start + len).min(bytes.len());
            elements.push(InformationElement::new(
                id,
                Bytes::copy_from_slice(&bytes[start..end]),
            ));
            cursor = start + len;
        }
        Udh { elements }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, element: InformationElement) {
        self.elements.push(element);
    }

    /// The shift table requested by the first national language IE, if any.
    pub fn national_shift(&self) -> Option<GsmShift> {
        self.elements
            .iter()
            .find(|ie| ie.is_national_shift())
            .map(|ie| GsmShift::from_id(ie.data.first().copied().unwrap_or(0)))
    }

    /// Serialized header including the length byte.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let body_len: usize = self.elements.iter().map(|ie| ie.data.len() + 2).sum();
        let len = u8::try_from(body_len)
            .map_err(|_| CodecError::invalid(format!("UDH of {body_len} bytes is too long")))?;

        let mut out = Vec::with_capacity(body_len + 1);
        out.push(len);
        for ie in &self.elements {
            let ie_len = u8::try_from(ie.data.len()).map_err(|_| {
                CodecError::invalid(format!("UDH element {:#04x} is too long", ie.id))
            })?;
            out.push(ie.id);
            out.push(ie_len);
            out.extend_from_slice(&ie.data);
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    /// Payload in a data coding with no text codec
    Binary(Bytes),
}

/// A message body with its optional User Data Header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortMessage {
    pub udh: Option<Udh>,
    pub body: MessageBody,
}

impl ShortMessage {
    pub fn new(text: impl Into<String>) -> Self {
        ShortMessage {
            udh: None,
            body: MessageBody::Text(text.into()),
        }
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        ShortMessage {
            udh: None,
            body: MessageBody::Binary(data.into()),
        }
    }

    pub fn with_udh(mut self, udh: Udh) -> Self {
        self.udh = Some(udh);
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            MessageBody::Text(s) => Some(s),
            MessageBody::Binary(_) => None,
        }
    }
}

pub(crate) fn encode(
    value: Value,
    fields: &mut BTreeMap<String, Value>,
) -> Result<Value, CodecError> {
    let message = match value {
        Value::Str(text) => ShortMessage::new(text),
        Value::Message(message) => message,
        other => return Ok(other),
    };
    let mut udh = message.udh.unwrap_or_default();

    let payload = match message.body {
        MessageBody::Binary(data) => data.to_vec(),
        MessageBody::Text(text) if text.is_empty() => Vec::new(),
        MessageBody::Text(text) => {
            let encoding = select_encoding(&text, &mut udh, fields)?;
            encoding.encode(&text)
        }
    };

    if udh.is_empty() {
        return Ok(Value::Bytes(Bytes::from(payload)));
    }

    if let Some(Value::Int(esm_class)) = fields.get_mut("esm_class") {
        *esm_class |= u32::from(EsmClass::UDH_INDICATOR);
    }
    let header = udh.to_bytes()?;
    let mut out = BytesMut::with_capacity(header.len() + payload.len());
    out.put_slice(&header);
    out.put_slice(&payload);
    Ok(Value::Bytes(out.freeze()))
}

fn select_encoding(
    text: &str,
    udh: &mut Udh,
    fields: &mut BTreeMap<String, Value>,
) -> Result<Encoding, CodecError> {
    if let Some(shift) = udh.national_shift() {
        let encoding = Encoding::Gsm(shift);
        fields.insert("data_coding".into(), Value::Int(u32::from(encoding.data_coding())));
        return Ok(encoding);
    }

    match fields.get("data_coding") {
        None => {
            let encoding = Encoding::detect(text);
            fields.insert("data_coding".into(), Value::Int(u32::from(encoding.data_coding())));
            if let Encoding::Gsm(shift) = encoding {
                if shift != GsmShift::Default {
                    udh.push(InformationElement::new(
                        InformationElement::NATIONAL_LOCKING_SHIFT,
                        vec![shift.id()],
                    ));
                }
            }
            Ok(encoding)
        }
        Some(Value::Int(0)) => Ok(Encoding::Gsm(GsmShift::Default)),
        Some(Value::Int(data_coding)) => u8::try_from(*data_coding)
            .ok()
            .and_then(Encoding::from_data_coding)
            .ok_or_else(|| CodecError::InvalidFieldValue {
                field: "data_coding".into(),
                reason: format!("no text encoding for data_coding {data_coding:#04x}"),
            }),
        Some(other) => Err(CodecError::InvalidFieldValue {
            field: "data_coding".into(),
            reason: format!("expected integer, got {}", other.kind()),
        }),
    }
}

pub(crate) fn decode(value: Value, fields: &BTreeMap<String, Value>, skip_udh: bool) -> Value {
    let Value::Bytes(raw) = value else {
        return value;
    };
    let Some(data_coding) = fields.get("data_coding").and_then(Value::as_int) else {
        return Value::Bytes(raw);
    };
    let esm_class = fields
        .get("esm_class")
        .and_then(Value::as_int)
        .unwrap_or(0);

    let udh_len = raw.first().map(|&len| len as usize + 1);
    let (udh, payload) = match udh_len {
        Some(len) if !skip_udh && EsmClass(esm_class as u8).has_udhi() && len <= raw.len() => {
            (Some(Udh::parse(&raw[..len])), raw.slice(len..))
        }
        _ => (None, raw),
    };

    let is_gsm = data_coding & 0x0F <= 0x01;
    let encoding = match udh.as_ref().and_then(Udh::national_shift) {
        Some(shift) if is_gsm => Some(Encoding::Gsm(shift)),
        _ => Encoding::from_data_coding(data_coding as u8),
    };
    let body = match encoding {
        Some(encoding) => MessageBody::Text(encoding.decode(&payload)),
        None => MessageBody::Binary(payload),
    };
    Value::Message(ShortMessage { udh, body })
}
