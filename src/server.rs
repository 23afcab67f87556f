// ABOUTME: SMSC-side listener that accepts TCP connections and starts a session per peer
// ABOUTME: An optional proxy-protocol detector can rewrite the peer address before framing starts

use crate::connection::Connection;
use crate::session::{
    EventStream, Session, SessionConfig, SessionError, SessionHandle, SessionWatch,
};
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

pub use crate::client::DEFAULT_PORT;

/// Conventional SMPP port for TLS. TLS itself is up to the caller.
pub const DEFAULT_TLS_PORT: u16 = 3550;

/// Most leading bytes offered to a proxy detector. Large enough for a
/// PROXY v2 header with address and TLV data.
pub const MAX_PROXY_HEADER: usize = 536;

/// How long a new connection may take to settle proxy detection.
pub const DEFAULT_PROXY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of inspecting the first bytes of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyDetection {
    /// Not enough bytes to decide yet
    NeedMore,
    NotProxied,
    /// A header of `header_len` bytes announced `peer` as the real client
    Proxied { header_len: usize, peer: SocketAddr },
}

/// Decides whether a freshly accepted connection starts with a proxy header.
pub trait ProxyProtocolDetector: Send + Sync + fmt::Debug {
    fn detect(&self, leading: &[u8]) -> ProxyDetection;
}

type Detected = io::Result<(Connection<TcpStream>, SocketAddr)>;

/// Accepts SMPP connections.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: SessionConfig,
    proxy: Option<Arc<dyn ProxyProtocolDetector>>,
    proxy_timeout: Duration,
    /// Connections still waiting on proxy detection
    detecting: JoinSet<Detected>,
    sessions: Vec<SessionWatch>,
}

impl Server {
    pub async fn bind<A: ToSocketAddrs>(addr: A, config: SessionConfig) -> io::Result<Server> {
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        Ok(Server {
            listener,
            config,
            proxy: None,
            proxy_timeout: DEFAULT_PROXY_TIMEOUT,
            detecting: JoinSet::new(),
            sessions: Vec::new(),
        })
    }

    pub fn with_proxy_detector(mut self, detector: Arc<dyn ProxyProtocolDetector>) -> Self {
        self.proxy = Some(detector);
        self
    }

    /// Connections that have not settled proxy detection within `limit`
    /// are dropped.
    pub fn with_proxy_timeout(mut self, limit: Duration) -> Self {
        self.proxy_timeout = limit;
        self
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Sessions started by this server that have not closed yet.
    pub fn sessions(&self) -> Vec<SessionWatch> {
        self.sessions
            .iter()
            .filter(|session| !session.is_closed())
            .cloned()
            .collect()
    }

    /// Wait for the next connection and start its session.
    ///
    /// The returned address is the peer as seen on the socket, or the one
    /// announced by a proxy header when a detector is installed. Proxy
    /// detection runs concurrently, so a client that never sends anything
    /// does not hold up the others.
    pub async fn accept(
        &mut self,
    ) -> Result<(SessionHandle, EventStream, SocketAddr), SessionError> {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (socket, peer) = accepted?;
                    socket.set_nodelay(true)?;
                    let capacity = self.config.read_buffer_capacity;

                    let Some(detector) = self.proxy.clone() else {
                        let connection = Connection::with_capacity(socket, capacity);
                        return Ok(self.start(connection, peer));
                    };
                    let limit = self.proxy_timeout;
                    self.detecting.spawn(async move {
                        match timeout(limit, detect_proxy(&*detector, socket, peer, capacity)).await {
                            Ok(detected) => detected,
                            Err(_) => Err(io::Error::new(
                                io::ErrorKind::TimedOut,
                                format!("no proxy decision from {peer} in {limit:?}"),
                            )),
                        }
                    });
                }
                Some(detected) = self.detecting.join_next(), if !self.detecting.is_empty() => {
                    match detected {
                        Ok(Ok((connection, peer))) => return Ok(self.start(connection, peer)),
                        Ok(Err(e)) => debug!("Dropping connection: {}", e),
                        Err(e) => warn!("Proxy detection task failed: {}", e),
                    }
                }
            }
        }
    }

    fn start(
        &mut self,
        connection: Connection<TcpStream>,
        peer: SocketAddr,
    ) -> (SessionHandle, EventStream, SocketAddr) {
        debug!("Accepted connection from {}", peer);
        let (handle, events) = Session::start(connection, self.config.clone(), Some(peer));
        self.sessions.retain(|session| !session.is_closed());
        self.sessions.push(handle.watch());
        (handle, events, peer)
    }
}

/// Read leading bytes until `detector` decides, then hand the rest to a
/// fresh connection.
async fn detect_proxy(
    detector: &dyn ProxyProtocolDetector,
    mut socket: TcpStream,
    mut peer: SocketAddr,
    capacity: usize,
) -> Detected {
    let mut leading = Vec::with_capacity(MAX_PROXY_HEADER);
    let skip = loop {
        match detector.detect(&leading) {
            ProxyDetection::NotProxied => break 0,
            ProxyDetection::Proxied { header_len, peer: real } => {
                debug!("Proxied connection from {} via {}", real, peer);
                peer = real;
                break header_len.min(leading.len());
            }
            ProxyDetection::NeedMore if leading.len() >= MAX_PROXY_HEADER => break 0,
            ProxyDetection::NeedMore => {
                let mut chunk = [0u8; 64];
                let wanted = chunk.len().min(MAX_PROXY_HEADER - leading.len());
                let n = socket.read(&mut chunk[..wanted]).await?;
                if n == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "connection closed before the first PDU",
                    ));
                }
                leading.extend_from_slice(&chunk[..n]);
            }
        }
    };
    Ok((Connection::with_buffered(socket, capacity, &leading[skip..]), peer))
}
