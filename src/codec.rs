// ABOUTME: Bounds-checked cursor primitives and the 16-byte header shared by every SMPP PDU
// ABOUTME: Defines CodecError and the hard PDU size ceiling enforced before any body is parsed

use crate::datatypes::CommandStatus;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed PDU size. A peer declaring more than this is rejected
/// before a single body byte is looked at.
pub const MAX_PDU_SIZE: u32 = 16384;

/// Bit set on every response command id.
pub const RESPONSE_BIT: u32 = 0x8000_0000;

/// SMPP PDU Header (16 bytes, common to all PDUs)
///
/// The header is kept numeric: `command_id` and `command_status` may carry
/// values this crate has no name for, and those still have to round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: u32,
    pub command_status: u32,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode the header, validating `command_length` before anything else.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        check_command_length(command_length)?;

        Ok(PduHeader {
            command_length,
            command_id: buf.get_u32(),
            command_status: buf.get_u32(),
            sequence_number: buf.get_u32(),
        })
    }

    /// Encode the header to the buffer
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id);
        buf.put_u32(self.command_status);
        buf.put_u32(self.sequence_number);
    }

    pub fn is_response(&self) -> bool {
        self.command_id & RESPONSE_BIT != 0
    }
}

/// Apply the size guard to a declared `command_length`.
pub fn check_command_length(length: u32) -> Result<(), CodecError> {
    if length > MAX_PDU_SIZE {
        return Err(CodecError::PduTooLarge {
            length,
            max: MAX_PDU_SIZE,
        });
    }
    if length < PduHeader::SIZE as u32 {
        return Err(CodecError::InvalidPduLength {
            length,
            min: PduHeader::SIZE as u32,
            max: MAX_PDU_SIZE,
        });
    }
    Ok(())
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Incomplete PDU: need more data")]
    Incomplete,

    #[error("PDU length was too large ({length}, maximum is {max}).")]
    PduTooLarge { length: u32, max: u32 },

    #[error("Invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("Malformed PDU. {command}: {reason}")]
    Malformed { command: String, reason: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Unknown field '{field}' for command {command}")]
    UnknownField { command: String, field: String },

    #[error("Field '{field}' has an invalid value: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CodecError::InvalidFieldValue {
            field: String::new(),
            reason: reason.into(),
        }
    }

    /// Attach a field name to a value error raised below the PDU layer.
    pub(crate) fn for_field(self, name: &str) -> Self {
        match self {
            CodecError::InvalidFieldValue { field, reason } if field.is_empty() => {
                CodecError::InvalidFieldValue {
                    field: name.to_string(),
                    reason,
                }
            }
            other => other,
        }
    }

    /// Map a codec failure to the status a server would answer with.
    pub fn to_command_status(&self) -> CommandStatus {
        match self {
            CodecError::PduTooLarge { .. } | CodecError::InvalidPduLength { .. } => {
                CommandStatus::InvalidCommandLength
            }
            CodecError::Malformed { .. } | CodecError::Incomplete => {
                CommandStatus::InvalidCommandLength
            }
            CodecError::UnknownCommand(_) => CommandStatus::InvalidCommandId,
            CodecError::UnknownField { .. } => CommandStatus::OptionalParameterNotAllowed,
            CodecError::InvalidFieldValue { .. } => CommandStatus::InvalidOptionalParameterValue,
            CodecError::Io(_) => CommandStatus::SystemError,
        }
    }
}

/// Decode a single byte
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

/// Decode a 16-bit big-endian integer
pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

/// Decode a 32-bit big-endian integer
pub fn decode_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u32())
}

/// Peek at next 4 bytes without advancing cursor (for command_length)
pub fn peek_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }

    let pos = buf.position();
    let value = buf.get_u32();
    buf.set_position(pos);
    Ok(value)
}

/// Take exactly `len` bytes
pub fn decode_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Read a NUL-terminated octet string, consuming the terminator.
pub fn decode_cstring(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let chunk = buf.chunk();
    let end = chunk
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::Incomplete)?;
    let value = Bytes::copy_from_slice(&chunk[..end]);
    buf.advance(end + 1);
    Ok(value)
}

/// Encode a single byte
pub fn encode_u8(buf: &mut BytesMut, value: u8) {
    buf.put_u8(value);
}

/// Encode a 16-bit big-endian integer
pub fn encode_u16(buf: &mut BytesMut, value: u16) {
    buf.put_u16(value);
}

/// Encode a 32-bit big-endian integer
pub fn encode_u32(buf: &mut BytesMut, value: u32) {
    buf.put_u32(value);
}

/// Write octets followed by a NUL terminator
pub fn encode_cstring(buf: &mut BytesMut, value: &[u8]) {
    buf.put_slice(value);
    buf.put_u8(0);
}

/// SMPP octet strings are single-byte text. Each byte maps to the code
/// point of the same value, so decoding never fails and is reversible.
pub fn octets_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Inverse of [`octets_to_string`]. Characters above U+00FF cannot be
/// carried in an octet string.
pub fn string_to_octets(value: &str) -> Result<Vec<u8>, CodecError> {
    value
        .chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| {
                CodecError::invalid(format!("character {c:?} does not fit in an octet string"))
            })
        })
        .collect()
}
