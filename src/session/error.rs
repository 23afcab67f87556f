// ABOUTME: Session error type covering transport, codec, timeout and lifecycle failures
// ABOUTME: Wraps io::Error and CodecError so they propagate with `?` from the session actor

use crate::codec::CodecError;
use crate::pdu::Pdu;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// I/O error on the underlying stream
    #[error("Connection error: {0}")]
    Io(#[from] io::Error),

    /// The peer sent something that could not be framed or decoded, or an
    /// outbound PDU could not be encoded
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// No response arrived within the request timeout
    #[error("Timed out waiting for response")]
    Timeout,

    /// The session closed before the operation completed
    #[error("Session closed")]
    Closed,

    /// The PDU could not be written. Its status is set to ESME_RSUBMITFAIL.
    #[error("Failed to send {0}")]
    SendFailed(Box<Pdu>),

    #[error("Invalid session state: {0}")]
    InvalidState(String),
}

impl SessionError {
    /// The PDU that failed to send, if this is a send failure.
    pub fn failed_pdu(&self) -> Option<&Pdu> {
        match self {
            SessionError::SendFailed(pdu) => Some(pdu),
            _ => None,
        }
    }
}
