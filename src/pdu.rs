// ABOUTME: The schema-driven PDU: construction from named fields, wire encoding and decoding
// ABOUTME: Also builds responses and reads/writes SMSC delivery receipts

use crate::codec::{
    check_command_length, decode_u16, encode_u16, octets_to_string, CodecError, PduHeader,
    MAX_PDU_SIZE,
};
use crate::datatypes::{CommandStatus, EsmClass};
use crate::defs::{registry, CommandDef, Registry, TlvDef};
use crate::filters::MessageBody;
use crate::types::Value;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Command name given to PDUs whose command_id is not registered.
pub const UNKNOWN_COMMAND: &str = "unknown";

/// A single SMPP PDU.
///
/// The header is kept as plain numbers. Body fields live in a name-keyed map
/// holding both the mandatory fields of the command and any TLVs.
#[derive(Debug, Clone)]
pub struct Pdu {
    pub command: String,
    /// Set when the PDU was decoded or last serialized with [`Pdu::to_bytes`]
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
    fields: BTreeMap<String, Value>,
    unknown_tlvs: BTreeMap<u16, Bytes>,
    schema: Option<Arc<CommandDef>>,
}

impl PartialEq for Pdu {
    fn eq(&self, other: &Self) -> bool {
        self.command == other.command
            && self.command_id == other.command_id
            && self.command_status == other.command_status
            && self.sequence_number == other.sequence_number
            && self.fields == other.fields
            && self.unknown_tlvs == other.unknown_tlvs
    }
}

/// Builder for outbound PDUs.
#[derive(Debug, Clone)]
pub struct PduBuilder {
    command: String,
    sequence_number: u32,
    command_status: u32,
    fields: Vec<(String, Value)>,
}

impl PduBuilder {
    fn new(command: impl Into<String>) -> Self {
        PduBuilder {
            command: command.into(),
            sequence_number: 0,
            command_status: 0,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn sequence_number(mut self, sequence_number: u32) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    pub fn command_status(mut self, status: impl Into<u32>) -> Self {
        self.command_status = status.into();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Resolve the command schema and populate every mandatory field.
    ///
    /// Fields the caller did not supply take the field's own default, then
    /// the wire type's default. Extra keys must name a known TLV. A non-zero
    /// `command_status` produces a header-only PDU.
    pub fn build(self) -> Result<Pdu, CodecError> {
        let registry = registry();
        let schema = registry
            .command(&self.command)
            .cloned()
            .ok_or_else(|| CodecError::UnknownCommand(self.command.clone()))?;

        let mut pdu = Pdu {
            command: self.command,
            command_length: 0,
            command_id: schema.id,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
            fields: BTreeMap::new(),
            unknown_tlvs: BTreeMap::new(),
            schema: Some(Arc::clone(&schema)),
        };
        if pdu.command_status != 0 {
            return Ok(pdu);
        }

        let mut supplied: BTreeMap<String, Value> = self.fields.into_iter().collect();
        for field in &schema.fields {
            let value = match supplied.remove(&field.name) {
                Some(value) if !field.accepts(&value) => {
                    return Err(CodecError::InvalidFieldValue {
                        field: field.name.clone(),
                        reason: format!("{:?} cannot hold a {}", field.wire_type, value.kind()),
                    });
                }
                Some(value) => Some(value),
                None => field.initial_value(),
            };
            if let Some(value) = value {
                pdu.fields.insert(field.name.clone(), value);
            }
        }

        for (name, value) in supplied {
            let Some(tlv) = registry.tlv(&name) else {
                return Err(CodecError::UnknownField {
                    command: pdu.command.clone(),
                    field: name,
                });
            };
            if !tlv.accepts(&value) {
                return Err(CodecError::InvalidFieldValue {
                    field: name,
                    reason: format!("{:?} TLV cannot hold a {}", tlv.tlv_type, value.kind()),
                });
            }
            pdu.fields.insert(name, value);
        }

        Ok(pdu)
    }
}

impl Pdu {
    pub fn builder(command: impl Into<String>) -> PduBuilder {
        PduBuilder::new(command)
    }

    /// Build a PDU with every field defaulted.
    pub fn new(command: &str) -> Result<Pdu, CodecError> {
        PduBuilder::new(command).build()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a field or TLV. Values are checked when the PDU is encoded.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// TLVs with no registered definition, keyed by tag id.
    pub fn unknown_tlvs(&self) -> &BTreeMap<u16, Bytes> {
        &self.unknown_tlvs
    }

    pub fn is_response(&self) -> bool {
        self.command_id & crate::codec::RESPONSE_BIT != 0
    }

    /// The command status, if it is one this crate knows.
    pub fn status(&self) -> Option<CommandStatus> {
        CommandStatus::try_from(self.command_status).ok()
    }

    pub fn is_ok(&self) -> bool {
        self.command_status == 0
    }

    /// Start the response to this PDU, carrying its sequence number.
    ///
    /// PDUs with an unrecognised command are answered with `generic_nack`
    /// and a default status of `ESME_RINVCMDID`.
    pub fn response(&self) -> PduBuilder {
        if self.schema.is_none() {
            return PduBuilder::new("generic_nack")
                .sequence_number(self.sequence_number)
                .command_status(CommandStatus::InvalidCommandId);
        }
        PduBuilder::new(format!("{}_resp", self.command)).sequence_number(self.sequence_number)
    }

    /// Validate the `command_length` prefix of a buffer without decoding it.
    pub fn peek_command_length(buf: &[u8]) -> Result<u32, CodecError> {
        let prefix: [u8; 4] = buf
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(CodecError::Incomplete)?;
        let length = u32::from_be_bytes(prefix);
        check_command_length(length)?;
        Ok(length)
    }

    /// Decode one complete PDU from the front of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Pdu, CodecError> {
        let mut cursor = Cursor::new(buf);
        let header = PduHeader::decode(&mut cursor)?;
        let length = header.command_length as usize;
        if buf.len() < length {
            return Err(CodecError::Incomplete);
        }

        let registry = registry();
        let Some(schema) = registry.command_by_id(header.command_id).cloned() else {
            warn!(
                "Unknown command_id {:#010x} (sequence {})",
                header.command_id, header.sequence_number
            );
            return Ok(Pdu {
                command: UNKNOWN_COMMAND.to_string(),
                command_length: header.command_length,
                command_id: header.command_id,
                command_status: header.command_status,
                sequence_number: header.sequence_number,
                fields: BTreeMap::new(),
                unknown_tlvs: BTreeMap::new(),
                schema: None,
            });
        };

        let mut pdu = Pdu {
            command: schema.name.clone(),
            command_length: header.command_length,
            command_id: header.command_id,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            fields: BTreeMap::new(),
            unknown_tlvs: BTreeMap::new(),
            schema: Some(Arc::clone(&schema)),
        };
        let tlvs = pdu.decode_body(&registry, &schema, &buf[PduHeader::SIZE..length])?;
        pdu.decode_filters(&schema, &tlvs);
        Ok(pdu)
    }

    fn malformed(&self, reason: impl Into<String>) -> CodecError {
        CodecError::Malformed {
            command: self.command.clone(),
            reason: reason.into(),
        }
    }

    /// Read mandatory fields, stopping early when the body runs out, then
    /// the TLV stream. Returns the definitions of the TLVs that were stored.
    fn decode_body(
        &mut self,
        registry: &Registry,
        schema: &CommandDef,
        body: &[u8],
    ) -> Result<BTreeMap<String, Arc<TlvDef>>, CodecError> {
        let mut cursor = Cursor::new(body);

        for field in &schema.fields {
            if !cursor.has_remaining() {
                break;
            }
            let value = field
                .wire_type
                .read(&mut cursor)
                .map_err(|_| self.malformed(format!("field {} runs past the end", field.name)))?;
            self.fields.insert(field.name.clone(), value);
        }

        let mut stored = BTreeMap::new();
        while cursor.remaining() >= 4 {
            let id = decode_u16(&mut cursor)?;
            let len = decode_u16(&mut cursor)? as usize;
            if cursor.remaining() < len {
                return Err(self.malformed(format!(
                    "TLV {id:#06x} declares {len} bytes, {} left",
                    cursor.remaining()
                )));
            }
            let start = cursor.position() as usize;
            let payload = &body[start..start + len];
            cursor.advance(len);

            let Some(def) = registry.tlv_by_id(id) else {
                warn!("Unknown TLV {:#06x} in {}", id, self.command);
                self.unknown_tlvs.insert(id, Bytes::copy_from_slice(payload));
                continue;
            };
            let value = def
                .tlv_type
                .read(payload)
                .map_err(|e| self.malformed(format!("TLV {}: {e}", def.tag)))?;
            let key = schema
                .tlv_remap
                .get(&def.tag)
                .cloned()
                .unwrap_or_else(|| def.tag.clone());

            if def.multiple {
                match self.fields.entry(key.clone()) {
                    Entry::Occupied(mut entry) => match entry.get_mut() {
                        Value::List(items) => items.push(value),
                        other => *other = Value::List(vec![other.clone(), value]),
                    },
                    Entry::Vacant(entry) => {
                        entry.insert(Value::List(vec![value]));
                    }
                }
            } else {
                self.fields.insert(key.clone(), value);
            }
            stored.insert(key, Arc::clone(def));
        }

        if cursor.has_remaining() {
            return Err(self.malformed(format!("{} trailing bytes", cursor.remaining())));
        }
        Ok(stored)
    }

    fn decode_filters(&mut self, schema: &CommandDef, tlvs: &BTreeMap<String, Arc<TlvDef>>) {
        for field in &schema.fields {
            let Some(filter) = field.filter else { continue };
            if let Some(value) = self.fields.remove(&field.name) {
                let value = filter.decode(value, &self.fields, false);
                self.fields.insert(field.name.clone(), value);
            }
        }

        // message_payload keeps its UDH only when short_message carries nothing
        let short_message_used = self
            .fields
            .get("short_message")
            .is_some_and(has_message_body);

        for (key, def) in tlvs {
            let Some(filter) = def.filter else { continue };
            let Some(value) = self.fields.remove(key) else {
                continue;
            };
            let value = match value {
                Value::List(items) if def.multiple => Value::List(
                    items
                        .into_iter()
                        .map(|item| filter.decode(item, &self.fields, true))
                        .collect(),
                ),
                value if key == "message_payload" => {
                    filter.decode(value, &self.fields, short_message_used)
                }
                value => filter.decode(value, &self.fields, true),
            };
            self.fields.insert(key.clone(), value);
        }
    }

    /// Run encode filters over a copy of the fields.
    fn encoded_fields(
        &self,
        registry: &Registry,
        schema: &CommandDef,
    ) -> Result<BTreeMap<String, Value>, CodecError> {
        let mut fields = self.fields.clone();

        for field in &schema.fields {
            let Some(filter) = field.filter else { continue };
            if let Some(value) = fields.remove(&field.name) {
                let value = filter
                    .encode(value, &mut fields)
                    .map_err(|e| e.for_field(&field.name))?;
                fields.insert(field.name.clone(), value);
            }
        }

        let tlv_keys: Vec<String> = self
            .fields
            .keys()
            .filter(|key| schema.field_def(key).is_none())
            .cloned()
            .collect();
        for key in tlv_keys {
            let Some(def) = registry.tlv(&key) else { continue };
            let Some(filter) = def.filter else { continue };
            let Some(value) = fields.remove(&key) else {
                continue;
            };
            let value = match value {
                Value::List(items) if def.multiple => Value::List(
                    items
                        .into_iter()
                        .map(|item| filter.encode(item, &mut fields))
                        .collect::<Result<_, _>>()
                        .map_err(|e| e.for_field(&key))?,
                ),
                value => filter
                    .encode(value, &mut fields)
                    .map_err(|e| e.for_field(&key))?,
            };
            fields.insert(key, value);
        }

        Ok(fields)
    }

    /// Serialize without touching `self`.
    ///
    /// Filters run first since they may set `esm_class` and `data_coding`.
    /// PDUs with a non-zero status, or with no known command, are written
    /// as a bare header.
    pub fn encode(&self) -> Result<Bytes, CodecError> {
        let header_only = |command_length| {
            let mut buf = BytesMut::with_capacity(PduHeader::SIZE);
            self.header(command_length).encode(&mut buf);
            buf.freeze()
        };
        let schema = match &self.schema {
            Some(schema) if self.command_status == 0 => schema,
            _ => return Ok(header_only(PduHeader::SIZE as u32)),
        };

        let registry = registry();
        let fields = self.encoded_fields(&registry, schema)?;

        let mut mandatory = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let value = fields
                .get(&field.name)
                .cloned()
                .unwrap_or_else(|| field.wire_type.default_value());
            mandatory.push((field, value));
        }

        let mut tlvs: Vec<(Arc<TlvDef>, &Value)> = Vec::new();
        for (key, value) in &fields {
            if schema.field_def(key).is_some() {
                continue;
            }
            let Some(def) = registry.tlv(key) else { continue };
            match value {
                Value::List(items) if def.multiple => {
                    tlvs.extend(items.iter().map(|item| (Arc::clone(def), item)))
                }
                value => tlvs.push((Arc::clone(def), value)),
            }
        }

        let length = PduHeader::SIZE
            + mandatory
                .iter()
                .map(|(field, value)| field.wire_type.size(value))
                .sum::<usize>()
            + tlvs
                .iter()
                .map(|(def, value)| 4 + def.tlv_type.size(value))
                .sum::<usize>()
            + self
                .unknown_tlvs
                .values()
                .map(|raw| 4 + raw.len())
                .sum::<usize>();
        if length > MAX_PDU_SIZE as usize {
            return Err(CodecError::PduTooLarge {
                length: u32::try_from(length).unwrap_or(u32::MAX),
                max: MAX_PDU_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(length);
        self.header(length as u32).encode(&mut buf);
        for (field, value) in &mandatory {
            field
                .wire_type
                .write(value, &mut buf)
                .map_err(|e| e.for_field(&field.name))?;
        }
        for (def, value) in &tlvs {
            let size = tlv_length(def.tlv_type.size(value), &def.tag)?;
            encode_u16(&mut buf, def.id);
            encode_u16(&mut buf, size);
            def.tlv_type
                .write(value, &mut buf)
                .map_err(|e| e.for_field(&def.tag))?;
        }
        for (id, raw) in &self.unknown_tlvs {
            encode_u16(&mut buf, *id);
            encode_u16(&mut buf, tlv_length(raw.len(), &format!("{id:#06x}"))?);
            buf.put_slice(raw);
        }

        debug_assert_eq!(buf.len(), length);
        Ok(buf.freeze())
    }

    /// Serialize and record the resulting `command_length`.
    pub fn to_bytes(&mut self) -> Result<Bytes, CodecError> {
        let bytes = self.encode()?;
        self.command_length = bytes.len() as u32;
        Ok(bytes)
    }

    fn header(&self, command_length: u32) -> PduHeader {
        PduHeader {
            command_length,
            command_id: self.command_id,
            command_status: self.command_status,
            sequence_number: self.sequence_number,
        }
    }

    /// Whether this is a deliver_sm or data_sm carrying an SMSC delivery receipt.
    pub fn is_delivery_acknowledgement(&self) -> bool {
        if self.command != "deliver_sm" && self.command != "data_sm" {
            return false;
        }
        self.get("esm_class")
            .and_then(Value::as_int)
            .is_some_and(|esm| EsmClass(esm as u8).is_delivery_acknowledgement())
    }

    /// Turn a deliver_sm or data_sm into a delivery acknowledgement.
    pub fn set_delivery_acknowledgement(
        &mut self,
        receipt: &DeliveryReceipt,
    ) -> Result<(), CodecError> {
        let target = match self.command.as_str() {
            "deliver_sm" => "short_message",
            "data_sm" => "message_payload",
            other => {
                return Err(CodecError::InvalidFieldValue {
                    field: "esm_class".into(),
                    reason: format!("Cannot create delivery acknowledgement for {other}"),
                })
            }
        };
        self.set("esm_class", EsmClass::DELIVERY_ACKNOWLEDGEMENT);
        self.set(target, receipt.to_string());
        Ok(())
    }

    /// Parse the delivery receipt carried by this PDU.
    pub fn delivery_acknowledgement(&self) -> Result<DeliveryReceipt, CodecError> {
        if !self.is_delivery_acknowledgement() {
            return Err(CodecError::InvalidFieldValue {
                field: "esm_class".into(),
                reason: "Cannot get payload for pdu that is not delivery acknowledgement".into(),
            });
        }
        let text = ["short_message", "message_payload"]
            .iter()
            .filter_map(|name| self.get(name).and_then(receipt_text))
            .find(|text| !text.is_empty())
            .unwrap_or_default();
        text.parse()
    }
}

fn tlv_length(size: usize, tag: &str) -> Result<u16, CodecError> {
    u16::try_from(size).map_err(|_| CodecError::InvalidFieldValue {
        field: tag.to_string(),
        reason: format!("{size} bytes do not fit a TLV"),
    })
}

fn has_message_body(value: &Value) -> bool {
    match value {
        Value::Message(message) => match &message.body {
            MessageBody::Text(text) => !text.is_empty(),
            MessageBody::Binary(data) => !data.is_empty(),
        },
        _ => false,
    }
}

fn receipt_text(value: &Value) -> Option<String> {
    match value {
        Value::Bytes(raw) => Some(octets_to_string(raw)),
        Value::Message(message) => match &message.body {
            MessageBody::Text(text) => Some(text.clone()),
            MessageBody::Binary(raw) => Some(octets_to_string(raw)),
        },
        other => other.text().map(str::to_string),
    }
}

impl fmt::Display for Pdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (seq {}, status {:#x})",
            self.command, self.sequence_number, self.command_status
        )
    }
}

/// SMSC delivery receipt text, as carried in a delivery acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeliveryReceipt {
    pub id: String,
    pub sub: String,
    pub dlvrd: String,
    pub submit_date: String,
    pub done_date: String,
    pub status: String,
    pub error: String,
    pub text: String,
}

const RECEIPT_LABELS: [&str; 8] = [
    "id:",
    " sub:",
    " dlvrd:",
    " submit date:",
    " done date:",
    " stat:",
    " err:",
    " text:",
];

impl fmt::Display for DeliveryReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id:{} sub:{} dlvrd:{} submit date:{} done date:{} stat:{} err:{} text:{}",
            self.id,
            self.sub,
            self.dlvrd,
            self.submit_date,
            self.done_date,
            self.status,
            self.error,
            self.text
        )
    }
}

impl FromStr for DeliveryReceipt {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let not_a_receipt = || CodecError::InvalidFieldValue {
            field: "short_message".into(),
            reason: format!("not a delivery receipt: {s:?}"),
        };

        let mut rest = s.trim().strip_prefix(RECEIPT_LABELS[0]).ok_or_else(not_a_receipt)?;
        let mut values = Vec::with_capacity(RECEIPT_LABELS.len());
        for label in &RECEIPT_LABELS[1..] {
            match rest.find(label) {
                Some(at) => {
                    values.push(&rest[..at]);
                    rest = &rest[at + label.len()..];
                }
                // Some SMSCs omit the text part entirely
                None if *label == " text:" => {
                    values.push(rest);
                    rest = "";
                }
                None => return Err(not_a_receipt()),
            }
        }
        values.push(rest);

        let [id, sub, dlvrd, submit_date, done_date, status, error, text] = values[..] else {
            return Err(not_a_receipt());
        };
        Ok(DeliveryReceipt {
            id: id.to_string(),
            sub: sub.to_string(),
            dlvrd: dlvrd.to_string(),
            submit_date: submit_date.to_string(),
            done_date: done_date.to_string(),
            status: status.to_string(),
            error: error.to_string(),
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{BroadcastAreaIdentifier, ShortMessage, Udh};
    use crate::types::{DestAddress, UnsuccessSme, WireType};

    const SUBMIT_SM: &str = "0000003f000000040000000000000002\
        00010034363730313133333131310001013436373039373731333337\
        004000000000000001000803240103747B7374";

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap())
            .collect()
    }

    fn receipt() -> DeliveryReceipt {
        "id:12345-54321 sub:004 dlvrd:004 submit date:1405230303 done date:1405230303 stat:ACCEPTD err:999 text:test"
            .parse()
            .unwrap()
    }

    #[test]
    fn test_decode_submit_sm() {
        let pdu = Pdu::from_bytes(&hex(SUBMIT_SM)).unwrap();

        assert_eq!(pdu.command, "submit_sm");
        assert_eq!(pdu.command_length, 63);
        assert_eq!(pdu.sequence_number, 2);
        assert_eq!(pdu.get("source_addr"), Some(&Value::Str("46701133111".into())));
        assert_eq!(pdu.get("destination_addr"), Some(&Value::Str("46709771337".into())));
        assert_eq!(pdu.get("esm_class"), Some(&Value::Int(0x40)));
        assert_eq!(pdu.get("data_coding"), Some(&Value::Int(0x01)));

        let message = pdu.get("short_message").and_then(Value::as_message).unwrap();
        assert_eq!(message.text(), Some("tãst"));
        let udh = message.udh.as_ref().unwrap();
        assert_eq!(udh.elements[0].id, 0x24);
        assert_eq!(&udh.elements[0].data[..], &[0x03]);
    }

    #[test]
    fn test_encode_submit_sm_matches_wire_bytes() {
        let mut pdu = Pdu::builder("submit_sm")
            .sequence_number(2)
            .field("source_addr_ton", 1u8)
            .field("source_addr", "46701133111")
            .field("dest_addr_ton", 1u8)
            .field("dest_addr_npi", 1u8)
            .field("destination_addr", "46709771337")
            .field(
                "short_message",
                ShortMessage::new("tãst").with_udh(Udh::parse(&[0x03, 0x24, 0x01, 0x03])),
            )
            .build()
            .unwrap();

        let bytes = pdu.to_bytes().unwrap();
        assert_eq!(bytes.to_vec(), hex(SUBMIT_SM));
        assert_eq!(pdu.command_length as usize, bytes.len());
        // the caller's fields are left alone
        assert_eq!(pdu.get("esm_class"), Some(&Value::Int(0)));
        assert_eq!(pdu.get("data_coding"), None);
    }

    #[test]
    fn test_roundtrip_plain_text() {
        let pdu = Pdu::builder("submit_sm")
            .sequence_number(9)
            .field("destination_addr", "46709771337")
            .field("short_message", "tãst")
            .build()
            .unwrap();

        let decoded = Pdu::from_bytes(&pdu.encode().unwrap()).unwrap();
        assert_eq!(decoded.command, "submit_sm");
        assert_eq!(decoded.sequence_number, 9);
        assert_eq!(decoded.get("destination_addr"), pdu.get("destination_addr"));
        assert_eq!(
            decoded.get("short_message").and_then(Value::text),
            Some("tãst")
        );
    }

    #[test]
    fn test_decode_message_payload_tlv() {
        let mut bytes = hex(SUBMIT_SM);
        bytes[3] = 0x47;
        bytes.extend_from_slice(&hex("0424000474657374"));

        let pdu = Pdu::from_bytes(&bytes).unwrap();
        assert_eq!(pdu.command_length, 71);
        assert_eq!(pdu.get("message_payload").and_then(Value::text), Some("test"));
        assert_eq!(pdu.get("short_message").and_then(Value::text), Some("tãst"));
    }

    #[test]
    fn test_truncated_schema_decodes_present_fields() {
        let mut bytes = hex(SUBMIT_SM);
        bytes.truncate(45);
        bytes[3] = 45;

        let pdu = Pdu::from_bytes(&bytes).unwrap();
        assert_eq!(pdu.get("destination_addr"), Some(&Value::Str("46709771337".into())));
        assert!(pdu.get("esm_class").is_none());
        assert!(pdu.get("short_message").is_none());
    }

    #[test]
    fn test_too_large_is_rejected_before_body() {
        let mut bytes = hex("00004001000000040000000000000001");
        bytes.resize(32, 0);
        let err = Pdu::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::PduTooLarge { length: 16385, .. }));
        assert!(err.to_string().contains("PDU length was too large"));

        assert!(matches!(
            Pdu::peek_command_length(&bytes),
            Err(CodecError::PduTooLarge { .. })
        ));
        assert_eq!(Pdu::peek_command_length(&hex(SUBMIT_SM)).unwrap(), 63);
    }

    #[test]
    fn test_trailing_bytes_are_malformed() {
        let bytes = hex("0000001100000015000000000000000100");
        let err = Pdu::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::Malformed { ref command, .. } if command == "enquire_link"));
        assert!(err.to_string().starts_with("Malformed PDU."));
    }

    #[test]
    fn test_tlv_overrun_is_malformed() {
        let bytes = hex("00000016000000150000000000000001042400107465");
        assert!(matches!(
            Pdu::from_bytes(&bytes),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn test_short_buffer_is_incomplete() {
        let bytes = hex(SUBMIT_SM);
        assert!(matches!(
            Pdu::from_bytes(&bytes[..40]),
            Err(CodecError::Incomplete)
        ));
        assert!(matches!(
            Pdu::from_bytes(&bytes[..10]),
            Err(CodecError::Incomplete)
        ));
    }

    #[test]
    fn test_unknown_command_and_generic_nack() {
        let pdu = Pdu::from_bytes(&hex("000000120000099900000000000000070102")).unwrap();
        assert_eq!(pdu.command, UNKNOWN_COMMAND);
        assert!(pdu.fields().is_empty());

        let nack = pdu.response().build().unwrap();
        assert_eq!(nack.command, "generic_nack");
        assert_eq!(nack.sequence_number, 7);
        assert_eq!(nack.status(), Some(CommandStatus::InvalidCommandId));
        assert_eq!(
            nack.encode().unwrap().to_vec(),
            hex("00000010800000000000000300000007")
        );
    }

    #[test]
    fn test_unknown_tlv_is_preserved() {
        let bytes = hex("0000001600000015000000000000000119990002abcd");
        let pdu = Pdu::from_bytes(&bytes).unwrap();
        assert_eq!(
            pdu.unknown_tlvs().get(&0x1999).map(|b| b.to_vec()),
            Some(vec![0xAB, 0xCD])
        );
        assert_eq!(pdu.encode().unwrap().to_vec(), bytes);
    }

    #[test]
    fn test_remapped_multiple_tlv() {
        // broadcast_sm_resp, message_id "a", two broadcast_area_identifier TLVs
        let bytes = hex("0000001f800001110000000000000003610006060003004142060600020043");
        let pdu = Pdu::from_bytes(&bytes).unwrap();

        assert!(pdu.get("broadcast_area_identifier").is_none());
        assert_eq!(
            pdu.get("failed_broadcast_area_identifier"),
            Some(&Value::List(vec![
                Value::BroadcastArea(BroadcastAreaIdentifier::name("AB")),
                Value::BroadcastArea(BroadcastAreaIdentifier::name("C")),
            ]))
        );
        assert_eq!(pdu.encode().unwrap().to_vec(), bytes);
    }

    fn sample_value(name: &str, wire_type: WireType) -> Value {
        match wire_type {
            WireType::Int8 => Value::Int(1),
            WireType::Int16 => Value::Int(0x0102),
            WireType::Int32 => Value::Int(0x0102_0304),
            WireType::String | WireType::CString => Value::Str(format!("{name}-1")),
            WireType::Buffer => Value::Bytes(Bytes::from_static(&[1, 2])),
            WireType::DestAddressArray => Value::DestAddresses(vec![
                DestAddress::sme(1, 1, "46709771337"),
                DestAddress::distribution_list("friends"),
            ]),
            WireType::UnsuccessSmeArray => Value::UnsuccessSmes(vec![UnsuccessSme {
                ton: 1,
                npi: 1,
                address: "46709771337".into(),
                error_status_code: 0x45,
            }]),
        }
    }

    #[test]
    fn test_every_command_survives_the_wire() {
        let registry = Registry::standard();
        let mut seen = 0;
        for def in registry.commands() {
            seen += 1;

            let mut plain = Pdu::new(&def.name).unwrap();
            plain.sequence_number = 7;
            let bytes = plain.to_bytes().unwrap();
            assert_eq!(Pdu::peek_command_length(&bytes).unwrap() as usize, bytes.len());
            let decoded = Pdu::from_bytes(&bytes).unwrap();
            assert_eq!(decoded.command, def.name);
            assert_eq!(decoded.command_length as usize, bytes.len());
            assert_eq!(decoded.sequence_number, 7);
            assert_eq!(decoded.encode().unwrap(), bytes, "{} with defaults", def.name);

            let mut populated = Pdu::new(&def.name).unwrap();
            populated.sequence_number = 8;
            let plain_fields: Vec<_> = def
                .fields
                .iter()
                .filter(|field| field.filter.is_none())
                .map(|field| (field.name.clone(), sample_value(&field.name, field.wire_type)))
                .collect();
            for (name, value) in &plain_fields {
                populated.set(name.clone(), value.clone());
            }
            let bytes = populated.to_bytes().unwrap();
            assert_eq!(Pdu::peek_command_length(&bytes).unwrap() as usize, bytes.len());
            let decoded = Pdu::from_bytes(&bytes).unwrap();
            assert_eq!(decoded.command_length as usize, bytes.len());
            assert_eq!(decoded.encode().unwrap(), bytes, "{} populated", def.name);
            for (name, value) in &plain_fields {
                assert_eq!(decoded.get(name), Some(value), "{}.{}", def.name, name);
            }
        }
        assert!(seen > 20);
    }

    #[test]
    fn test_response_keeps_sequence_number() {
        let request = Pdu::builder("submit_sm").sequence_number(5).build().unwrap();
        let response = request.response().field("message_id", "abc").build().unwrap();

        assert_eq!(response.command, "submit_sm_resp");
        assert_eq!(response.sequence_number, 5);
        assert!(response.is_response());
        assert_eq!(response.get("message_id"), Some(&Value::Str("abc".into())));
    }

    #[test]
    fn test_error_status_is_header_only() {
        let mut pdu = Pdu::builder("submit_sm_resp")
            .command_status(CommandStatus::SubmitFailed)
            .field("message_id", "ignored")
            .build()
            .unwrap();
        assert!(pdu.get("message_id").is_none());
        assert_eq!(pdu.to_bytes().unwrap().len(), 16);
        assert_eq!(pdu.command_length, 16);
    }

    #[test]
    fn test_builder_errors() {
        assert!(matches!(
            Pdu::builder("no_such_command").build(),
            Err(CodecError::UnknownCommand(_))
        ));
        assert!(matches!(
            Pdu::builder("submit_sm").field("colour", "blue").build(),
            Err(CodecError::UnknownField { .. })
        ));
        assert!(matches!(
            Pdu::builder("submit_sm").field("esm_class", "x").build(),
            Err(CodecError::InvalidFieldValue { ref field, .. }) if field == "esm_class"
        ));
        assert!(Pdu::builder("submit_sm")
            .field("message_payload", "hello")
            .build()
            .is_ok());
    }

    #[test]
    fn test_defaults_are_independent() {
        let mut first = Pdu::new("submit_sm").unwrap();
        let second = Pdu::new("submit_sm").unwrap();

        if let Some(Value::Bytes(body)) = first.fields.get_mut("short_message") {
            *body = Bytes::from_static(b"changed");
        }
        assert_eq!(second.get("short_message"), Some(&Value::Bytes(Bytes::new())));
        assert_ne!(first.get("short_message"), second.get("short_message"));
    }

    #[test]
    fn test_bind_defaults() {
        let pdu = Pdu::new("bind_transceiver").unwrap();
        assert_eq!(pdu.get("interface_version"), Some(&Value::Int(0x50)));
        assert_eq!(pdu.get("system_id"), Some(&Value::Str(String::new())));
    }

    #[test]
    fn test_oversized_encode_fails() {
        let pdu = Pdu::builder("submit_sm")
            .field("message_payload", vec![0x41u8; 16400])
            .build()
            .unwrap();
        assert!(matches!(
            pdu.encode(),
            Err(CodecError::PduTooLarge { .. })
        ));
    }

    #[test]
    fn test_receipt_text_format() {
        let receipt = receipt();
        assert_eq!(receipt.id, "12345-54321");
        assert_eq!(receipt.submit_date, "1405230303");
        assert_eq!(receipt.status, "ACCEPTD");
        assert_eq!(receipt.error, "999");
        assert_eq!(receipt.text, "test");
        assert_eq!(
            receipt.to_string(),
            "id:12345-54321 sub:004 dlvrd:004 submit date:1405230303 done date:1405230303 stat:ACCEPTD err:999 text:test"
        );
        assert!("hello".parse::<DeliveryReceipt>().is_err());
    }

    #[test]
    fn test_deliver_sm_delivery_acknowledgement() {
        let mut pdu = Pdu::new("deliver_sm").unwrap();
        assert!(!pdu.is_delivery_acknowledgement());
        let err = pdu.delivery_acknowledgement().unwrap_err();
        assert!(err
            .to_string()
            .contains("Cannot get payload for pdu that is not delivery acknowledgement"));

        pdu.set_delivery_acknowledgement(&receipt()).unwrap();
        assert!(pdu.is_delivery_acknowledgement());
        assert_eq!(pdu.delivery_acknowledgement().unwrap(), receipt());

        let decoded = Pdu::from_bytes(&pdu.encode().unwrap()).unwrap();
        assert!(decoded.is_delivery_acknowledgement());
        assert_eq!(decoded.delivery_acknowledgement().unwrap(), receipt());
    }

    #[test]
    fn test_data_sm_delivery_acknowledgement_uses_payload() {
        let mut pdu = Pdu::new("data_sm").unwrap();
        pdu.set_delivery_acknowledgement(&receipt()).unwrap();
        assert!(pdu.get("message_payload").is_some());

        let decoded = Pdu::from_bytes(&pdu.encode().unwrap()).unwrap();
        assert_eq!(decoded.delivery_acknowledgement().unwrap(), receipt());
    }

    #[test]
    fn test_submit_sm_cannot_be_acknowledgement() {
        let mut pdu = Pdu::new("submit_sm").unwrap();
        let err = pdu.set_delivery_acknowledgement(&receipt()).unwrap_err();
        assert!(err.to_string().contains("Cannot create delivery acknowledgement"));
    }
}
