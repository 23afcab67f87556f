//! SMPP v3.4/v5.0 protocol engine.
//!
//! The codec side turns PDUs into bytes and back using a registry of
//! command and TLV schemas. The session side frames PDUs off any async byte
//! stream, hands out sequence numbers and matches responses to requests.

#[macro_use]
mod macros;

pub mod client;
pub mod codec;
pub mod connection;
pub mod datatypes;
pub mod defs;
pub mod encodings;
pub mod filters;
pub mod metrics;
pub mod pdu;
pub mod server;
pub mod session;
pub mod types;


pub use codec::{CodecError, MAX_PDU_SIZE, PduHeader};
pub use connection::Connection;
pub use datatypes::{CommandId, CommandStatus, DataCoding, EsmClass};
pub use defs::{registry, register_command, register_tlv};
pub use encodings::Encoding;
pub use filters::{MessageBody, ShortMessage};
pub use pdu::{DeliveryReceipt, Pdu, PduBuilder};
pub use server::Server;
pub use session::{
    EventStream, Session, SessionConfig, SessionError, SessionEvent, SessionHandle, SessionState,
    SessionWatch,
};
pub use types::Value;

/// Error returned by most functions.
///
/// Library code returns the typed errors ([`CodecError`], [`SessionError`]).
/// This boxed alias is for applications that mix them with other failures,
/// as the demo does.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for SMPP operations.
///
/// # Examples
///
/// ## Encoding and decoding a PDU
///
/// ```rust
/// use smpp::Pdu;
///
/// fn main() -> smpp::Result<()> {
///     let mut pdu = Pdu::builder("submit_sm")
///         .sequence_number(1)
///         .field("destination_addr", "46709771337")
///         .field("short_message", "Hello")
///         .build()?;
///     let bytes = pdu.to_bytes()?;
///     assert_eq!(pdu.command_length as usize, bytes.len());
///
///     let decoded = Pdu::from_bytes(&bytes)?;
///     assert_eq!(decoded.command, "submit_sm");
///     assert_eq!(decoded.get("short_message").and_then(|v| v.text()), Some("Hello"));
///     Ok(())
/// }
/// ```
///
/// ## Answering binds on the SMSC side
///
/// ```rust,no_run
/// use smpp::{Server, SessionConfig};
///
/// #[tokio::main]
/// async fn main() -> smpp::Result<()> {
///     let mut server = Server::bind(("0.0.0.0", smpp::server::DEFAULT_PORT), SessionConfig::default()).await?;
///     loop {
///         let (session, mut events, peer) = server.accept().await?;
///         tokio::spawn(async move {
///             while let Some(pdu) = events.next_pdu().await {
///                 let reply = match pdu.command.as_str() {
///                     "bind_transceiver" => pdu.response().field("system_id", "smsc"),
///                     "submit_sm" => pdu.response().field("message_id", "1"),
///                     "unbind" => pdu.response(),
///                     _ => continue,
///                 };
///                 if let Ok(reply) = reply.build() {
///                     let _ = session.send(reply);
///                 }
///             }
///             println!("{peer} went away");
///         });
///     }
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
