// ABOUTME: Frames SMPP PDUs off any ordered byte stream and writes encoded PDUs back
// ABOUTME: Reads are buffered so partial PDUs wait for more bytes without being consumed

use crate::codec::{CodecError, PduHeader};
use crate::pdu::Pdu;
use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};

/// Default read buffer size.
pub const DEFAULT_READ_CAPACITY: usize = 4 * 1024;

/// PDU framing over a byte stream.
///
/// Works with anything that is `AsyncRead + AsyncWrite`: a `TcpStream`, a
/// TLS stream supplied by the caller, or an in-memory `duplex` pipe.
///
/// Each PDU starts with its own 4-byte `command_length`. Extraction looks at
/// that prefix first, rejects lengths over the PDU ceiling straight away,
/// and otherwise waits until the whole PDU is buffered before decoding it.
#[derive(Debug)]
pub struct Connection<S> {
    stream: BufWriter<S>,

    // The buffer for reading PDUs.
    buffer: BytesMut,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(socket: S) -> Connection<S> {
        Self::with_capacity(socket, DEFAULT_READ_CAPACITY)
    }

    pub fn with_capacity(socket: S, capacity: usize) -> Connection<S> {
        Connection {
            stream: BufWriter::new(socket),
            buffer: BytesMut::with_capacity(capacity),
        }
    }

    /// Start with bytes that were already read off the socket, e.g. the
    /// remainder after a proxy header.
    pub fn with_buffered(socket: S, capacity: usize, buffered: &[u8]) -> Connection<S> {
        let mut connection = Self::with_capacity(socket, capacity.max(buffered.len()));
        connection.buffer.extend_from_slice(buffered);
        connection
    }

    /// Read a single PDU from the underlying stream.
    ///
    /// Returns `None` when the peer closes the stream between PDUs. Closing
    /// in the middle of a PDU is an error. Cancelling the returned future
    /// loses no data: bytes read so far stay buffered.
    pub async fn read_pdu(&mut self) -> Result<Option<Pdu>, CodecError> {
        loop {
            if let Some(pdu) = self.parse_pdu()? {
                return Ok(Some(pdu));
            }

            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )
                .into());
            }
        }
    }

    /// Decode one PDU if the buffer holds a complete one.
    ///
    /// An oversized or malformed PDU is consumed from the buffer and
    /// returned as an error. The stream cannot be resynchronised after that
    /// and the caller should close it.
    pub fn parse_pdu(&mut self) -> Result<Option<Pdu>, CodecError> {
        let length = match Pdu::peek_command_length(&self.buffer) {
            Ok(length) => length as usize,
            Err(CodecError::Incomplete) => return Ok(None),
            Err(e) => {
                self.buffer.clear();
                return Err(e);
            }
        };

        if self.buffer.len() < length {
            self.buffer.reserve(length - self.buffer.len());
            return Ok(None);
        }

        let frame = self.buffer.split_to(length);
        Pdu::from_bytes(&frame).map(Some)
    }

    /// Bytes waiting in the read buffer, not yet framed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Write already encoded PDU bytes and flush them to the socket.
    pub async fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        debug_assert!(bytes.len() >= PduHeader::SIZE);
        self.stream.write_all(bytes).await?;
        self.stream.flush().await
    }

    /// Encode and write a single PDU, returning the number of bytes written.
    pub async fn write_pdu(&mut self, pdu: &Pdu) -> Result<usize, CodecError> {
        let bytes = pdu.encode()?;
        self.write_bytes(&bytes).await?;
        Ok(bytes.len())
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.flush().await?;
        self.stream.shutdown().await
    }

    pub fn get_ref(&self) -> &S {
        self.stream.get_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;
    use tokio::io::duplex;

    fn enquire_link(sequence_number: u32) -> Vec<u8> {
        Pdu::builder("enquire_link")
            .sequence_number(sequence_number)
            .build()
            .unwrap()
            .encode()
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_read_pdus_split_across_writes() {
        let (client, server) = duplex(64);
        let mut reader = Connection::new(server);
        let mut writer = client;

        let mut bytes = enquire_link(1);
        bytes.extend(enquire_link(2));
        let task = tokio::spawn(async move {
            for chunk in bytes.chunks(5) {
                writer.write_all(chunk).await.unwrap();
                tokio::task::yield_now().await;
            }
        });

        let first = reader.read_pdu().await.unwrap().unwrap();
        let second = reader.read_pdu().await.unwrap().unwrap();
        assert_eq!(first.command, "enquire_link");
        assert_eq!(first.sequence_number, 1);
        assert_eq!(second.sequence_number, 2);

        task.await.unwrap();
        assert!(reader.read_pdu().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_pdu_roundtrip() {
        let (client, server) = duplex(1024);
        let mut writer = Connection::new(client);
        let mut reader = Connection::new(server);

        let pdu = Pdu::builder("submit_sm")
            .sequence_number(3)
            .field("destination_addr", "46709771337")
            .field("short_message", "hello")
            .build()
            .unwrap();
        let written = writer.write_pdu(&pdu).await.unwrap();

        let read = reader.read_pdu().await.unwrap().unwrap();
        assert_eq!(read.command_length as usize, written);
        assert_eq!(read.get("destination_addr"), Some(&Value::Str("46709771337".into())));
        assert_eq!(read.get("short_message").and_then(Value::text), Some("hello"));
    }

    #[tokio::test]
    async fn test_oversized_prefix_is_rejected_immediately() {
        let (mut client, server) = duplex(64);
        let mut reader = Connection::new(server);

        client.write_all(&[0x00, 0x01, 0x00, 0x00]).await.unwrap();
        let err = reader.read_pdu().await.unwrap_err();
        assert!(matches!(err, CodecError::PduTooLarge { length: 0x10000, .. }));
        assert_eq!(reader.buffered(), 0);
    }

    #[tokio::test]
    async fn test_partial_pdu_then_eof_is_an_error() {
        let (mut client, server) = duplex(64);
        let mut reader = Connection::new(server);

        client.write_all(&enquire_link(1)[..10]).await.unwrap();
        drop(client);
        assert!(matches!(reader.read_pdu().await, Err(CodecError::Io(_))));
    }

    #[test]
    fn test_parse_waits_for_full_pdu() {
        let bytes = enquire_link(9);
        let (socket, _peer) = duplex(64);
        let mut connection = Connection::with_buffered(socket, 0, &bytes[..12]);
        assert!(connection.parse_pdu().unwrap().is_none());
        assert_eq!(connection.buffered(), 12);

        connection.buffer.extend_from_slice(&bytes[12..]);
        let pdu = connection.parse_pdu().unwrap().unwrap();
        assert_eq!(pdu.sequence_number, 9);
        assert_eq!(connection.buffered(), 0);
    }
}
