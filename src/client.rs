// ABOUTME: ESME-side helpers that open a TCP connection to an SMSC and start a session on it
// ABOUTME: Binding is left to the caller through SessionHandle::bind_* shortcuts

use crate::session::{EventStream, Session, SessionConfig, SessionError, SessionHandle};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::debug;

/// Conventional SMPP port for plaintext connections.
pub const DEFAULT_PORT: u16 = 2775;

pub const DEFAULT_HOST: &str = "localhost";

/// Connect to `host:port` with client defaults (keep-alive enabled).
///
/// ```rust,no_run
/// use smpp::client;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (session, _events) = client::connect("localhost", client::DEFAULT_PORT).await?;
///     let response = session
///         .bind_transceiver(|pdu| pdu.field("system_id", "esme").field("password", "secret"))
///         .await?;
///     assert!(response.is_ok());
///
///     session
///         .submit_sm(|pdu| pdu.field("destination_addr", "46709771337").field("short_message", "Hello"))
///         .await?;
///     session.unbind(|pdu| pdu).await?;
///     session.close();
///     Ok(())
/// }
/// ```
pub async fn connect(
    host: &str,
    port: u16,
) -> Result<(SessionHandle, EventStream), SessionError> {
    connect_with((host, port), SessionConfig::client()).await
}

pub async fn connect_with<A: ToSocketAddrs>(
    addr: A,
    config: SessionConfig,
) -> Result<(SessionHandle, EventStream), SessionError> {
    let socket = TcpStream::connect(addr).await?;
    socket.set_nodelay(true)?;
    let peer_addr = socket.peer_addr()?;
    debug!("Connected to {}", peer_addr);

    Ok(Session::with_peer_addr(socket, config, peer_addr))
}
