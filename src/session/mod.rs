// ABOUTME: SMPP session engine: one actor task per connection owning framing, correlation and timers
// ABOUTME: SessionHandle sends and awaits PDUs; EventStream delivers inbound PDUs and lifecycle events

mod config;
mod error;
mod keepalive;

pub use config::SessionConfig;
pub use error::SessionError;
pub use keepalive::{KeepAliveConfig, KeepAliveManager, KeepAliveStatus};

use crate::codec::{CodecError, PduHeader};
use crate::connection::Connection;
use crate::datatypes::CommandStatus;
use crate::metrics;
use crate::pdu::{Pdu, PduBuilder};
use bytes::{Bytes, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, Notify};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, trace, warn};

/// Highest sequence number handed out before the counter wraps.
pub const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// Offset of `sequence_number` in the PDU header.
const SEQUENCE_OFFSET: usize = 12;

/// Sequence number following `current`. Wraps past [`MAX_SEQUENCE_NUMBER`]
/// and never yields 0, which marks an unassigned PDU.
pub fn next_sequence_number(current: u32) -> u32 {
    if current >= MAX_SEQUENCE_NUMBER {
        1
    } else {
        current + 1
    }
}

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SessionState {
    Connecting = 0,
    Open = 1,
    /// Connected, but inbound PDUs are not extracted
    Paused = 2,
    Closing = 3,
    Closed = 4,
}

impl SessionState {
    pub fn can_send(self) -> bool {
        self < SessionState::Closing
    }
}

/// What a session reports to its owner.
///
/// Inbound PDUs wait for room in the channel, and the session stops reading
/// meanwhile. `Sent` notices are dropped when the channel is full.
#[derive(Debug)]
pub enum SessionEvent {
    /// An inbound PDU that no pending request claimed
    Pdu(Pdu),
    /// A PDU was written and flushed
    Sent(Pdu),
    /// A fatal error. The session closes right after.
    Error(SessionError),
    Closed,
}

/// Receiving side of a session's events.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<SessionEvent>,
}

impl EventStream {
    /// `None` once the session has gone and every event was read.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// The next inbound PDU, skipping send notifications and errors.
    /// `None` when the session closes.
    pub async fn next_pdu(&mut self) -> Option<Pdu> {
        loop {
            match self.rx.recv().await? {
                SessionEvent::Pdu(pdu) => return Some(pdu),
                SessionEvent::Closed => return None,
                SessionEvent::Sent(_) | SessionEvent::Error(_) => continue,
            }
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: AtomicU8,
    sequence: AtomicU32,
    peer_addr: Option<SocketAddr>,
    response_timeout: Duration,
    closed: Notify,
}

impl Shared {
    fn state(&self) -> SessionState {
        SessionState::try_from(self.state.load(Ordering::Acquire)).unwrap_or(SessionState::Closed)
    }

    fn set_state(&self, state: SessionState) {
        self.state.store(state.into(), Ordering::Release);
    }

    fn transition(&self, from: SessionState, to: SessionState) -> bool {
        self.state
            .compare_exchange(from.into(), to.into(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn mark_closed(&self) {
        self.set_state(SessionState::Closed);
        self.closed.notify_waiters();
    }

    async fn wait_closed(&self) {
        let notified = self.closed.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.state() == SessionState::Closed {
            return;
        }
        notified.await;
    }

    fn next_sequence(&self) -> u32 {
        let previous = self
            .sequence
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(next_sequence_number(n))
            })
            .unwrap_or_else(|n| n);
        next_sequence_number(previous)
    }
}

struct Reply {
    tx: oneshot::Sender<Result<Pdu, SessionError>>,
    timeout: Duration,
}

enum Command {
    Send {
        pdu: Pdu,
        bytes: Bytes,
        reply: Option<Reply>,
    },
    /// Wakes the actor so it starts reading again
    Resume,
    Close,
}

/// Read-only view of a session that does not keep it alive.
#[derive(Debug, Clone)]
pub struct SessionWatch {
    shared: Arc<Shared>,
}

impl SessionWatch {
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.shared.peer_addr
    }

    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed
    }

    /// Resolves once the session has fully closed.
    pub async fn closed(&self) {
        self.shared.wait_closed().await
    }
}

fn send_failed(mut pdu: Pdu) -> SessionError {
    pdu.command_status = CommandStatus::SubmitFailed.into();
    SessionError::SendFailed(Box::new(pdu))
}

/// Cloneable handle for talking to a running session.
///
/// Dropping every handle closes the session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    shared: Arc<Shared>,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        self.shared.state()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.shared.peer_addr
    }

    pub fn is_closed(&self) -> bool {
        !self.state().can_send()
    }

    /// Resolves once the session has fully closed.
    pub async fn closed(&self) {
        self.shared.wait_closed().await
    }

    pub fn watch(&self) -> SessionWatch {
        SessionWatch {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Queue a PDU for writing and return its sequence number.
    ///
    /// Requests without a sequence number get the next one from the session
    /// counter. Encoding happens here, so a bad field fails the call
    /// instead of reaching the wire, and does not use up a sequence number.
    /// On a closed session the PDU comes back in [`SessionError::SendFailed`].
    pub fn send(&self, pdu: Pdu) -> Result<u32, SessionError> {
        self.dispatch(pdu, None)
    }

    /// Send a request and wait for the response with the same sequence
    /// number, up to the configured response timeout.
    pub async fn request(&self, pdu: Pdu) -> Result<Pdu, SessionError> {
        let timeout = self.shared.response_timeout;
        self.request_with_timeout(pdu, timeout).await
    }

    /// A request whose preset sequence number is still awaiting a response
    /// fails with [`SessionError::InvalidState`] and is not written.
    pub async fn request_with_timeout(
        &self,
        pdu: Pdu,
        timeout: Duration,
    ) -> Result<Pdu, SessionError> {
        if pdu.is_response() {
            return Err(SessionError::InvalidState(format!(
                "{} is a response and gets no reply",
                pdu.command
            )));
        }
        let (tx, rx) = oneshot::channel();
        self.dispatch(pdu, Some(Reply { tx, timeout }))?;
        rx.await.unwrap_or(Err(SessionError::Closed))
    }

    fn dispatch(&self, mut pdu: Pdu, reply: Option<Reply>) -> Result<u32, SessionError> {
        if !self.state().can_send() {
            return Err(send_failed(pdu));
        }
        let encoded = pdu.to_bytes()?;
        let bytes = if !pdu.is_response() && pdu.sequence_number == 0 {
            pdu.sequence_number = self.shared.next_sequence();
            let mut patched = BytesMut::from(&encoded[..]);
            patched[SEQUENCE_OFFSET..PduHeader::SIZE]
                .copy_from_slice(&pdu.sequence_number.to_be_bytes());
            patched.freeze()
        } else {
            encoded
        };
        let sequence_number = pdu.sequence_number;

        self.commands
            .send(Command::Send { pdu, bytes, reply })
            .map_err(|mpsc::error::SendError(command)| match command {
                Command::Send { pdu, .. } => send_failed(pdu),
                _ => SessionError::Closed,
            })?;
        Ok(sequence_number)
    }

    /// Stop extracting inbound PDUs. Writes keep working.
    pub fn pause(&self) -> bool {
        self.shared.transition(SessionState::Open, SessionState::Paused)
    }

    pub fn resume(&self) -> bool {
        let resumed = self.shared.transition(SessionState::Paused, SessionState::Open);
        if resumed {
            let _ = self.commands.send(Command::Resume);
        }
        resumed
    }

    /// Close after everything queued so far has been written.
    pub fn close(&self) {
        let _ = self
            .shared
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| {
                (state < SessionState::Closing as u8).then_some(SessionState::Closing.into())
            });
        let _ = self.commands.send(Command::Close);
    }
}

macro_rules! command_shortcuts {
    ($($name:ident),* $(,)?) => {
        impl SessionHandle {
            $(
                #[doc = concat!("Send `", stringify!($name), "` and wait for its response.")]
                pub async fn $name(
                    &self,
                    build: impl FnOnce(PduBuilder) -> PduBuilder,
                ) -> Result<Pdu, SessionError> {
                    let pdu = build(Pdu::builder(stringify!($name))).build()?;
                    self.request(pdu).await
                }
            )*
        }
    };
}

command_shortcuts!(
    bind_transceiver,
    bind_transmitter,
    bind_receiver,
    submit_sm,
    deliver_sm,
    data_sm,
    enquire_link,
    unbind,
);

enum Pending {
    Caller {
        tx: oneshot::Sender<Result<Pdu, SessionError>>,
        deadline: Instant,
    },
    KeepAlive {
        deadline: Instant,
    },
}

impl Pending {
    fn deadline(&self) -> Instant {
        match self {
            Pending::Caller { deadline, .. } | Pending::KeepAlive { deadline } => *deadline,
        }
    }
}

type Inbound = (
    Option<mpsc::OwnedPermit<SessionEvent>>,
    Result<Option<Pdu>, CodecError>,
);

enum Step {
    Command(Option<Command>),
    Inbound(Inbound),
    Expire,
    Ping,
}

/// The actor driving one SMPP connection.
///
/// Everything that touches the sequence-to-request map or the stream runs
/// on this single task, so inbound extraction is never re-entered.
pub struct Session<S> {
    connection: Connection<S>,
    config: SessionConfig,
    shared: Arc<Shared>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::Sender<SessionEvent>,
    pending: HashMap<u32, Pending>,
    keep_alive: KeepAliveManager,
    last_activity: Instant,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    /// Spawn a session over `stream`. Must be called from within a Tokio runtime.
    pub fn new(stream: S, config: SessionConfig) -> (SessionHandle, EventStream) {
        let connection = Connection::with_capacity(stream, config.read_buffer_capacity);
        Self::start(connection, config, None)
    }

    pub fn with_peer_addr(
        stream: S,
        config: SessionConfig,
        peer_addr: SocketAddr,
    ) -> (SessionHandle, EventStream) {
        let connection = Connection::with_capacity(stream, config.read_buffer_capacity);
        Self::start(connection, config, Some(peer_addr))
    }

    pub(crate) fn start(
        connection: Connection<S>,
        config: SessionConfig,
        peer_addr: Option<SocketAddr>,
    ) -> (SessionHandle, EventStream) {
        let shared = Arc::new(Shared {
            state: AtomicU8::new(SessionState::Connecting.into()),
            sequence: AtomicU32::new(0),
            peer_addr,
            response_timeout: config.response_timeout,
            closed: Notify::new(),
        });
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel(config.event_capacity.max(1));

        let session = Session {
            connection,
            keep_alive: KeepAliveManager::new(config.keep_alive.clone()),
            config,
            shared: Arc::clone(&shared),
            commands: command_rx,
            events: event_tx,
            pending: HashMap::new(),
            last_activity: Instant::now(),
        };
        tokio::spawn(session.run());

        (
            SessionHandle {
                commands: command_tx,
                shared,
            },
            EventStream { rx: event_rx },
        )
    }

    async fn run(mut self) {
        self.shared
            .transition(SessionState::Connecting, SessionState::Open);
        self.record(metrics::SESSION_OPEN, 1, "");
        debug!("Session open (peer: {:?})", self.shared.peer_addr);

        let result = self.run_loop().await;
        if let Err(e) = &result {
            error!("Session error: {}", e);
        }
        // pending callers hear about the close before any event is awaited
        self.shutdown().await;
        if let Err(e) = result {
            self.emit(SessionEvent::Error(e)).await;
        }
        self.emit(SessionEvent::Closed).await;
    }

    async fn run_loop(&mut self) -> Result<(), SessionError> {
        loop {
            let reading = self.shared.state() == SessionState::Open;
            let deadline = self.pending.values().map(Pending::deadline).min();
            let ping_at = self.keep_alive.next_ping(self.last_activity);

            let step = tokio::select! {
                command = self.commands.recv() => Step::Command(command),
                inbound = Self::next_inbound(self.events.clone(), &mut self.connection), if reading => {
                    Step::Inbound(inbound)
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Step::Expire
                }
                _ = sleep_until(ping_at.unwrap_or_else(Instant::now)), if ping_at.is_some() => {
                    Step::Ping
                }
            };

            match step {
                Step::Command(None) => {
                    debug!("Every session handle was dropped");
                    return Ok(());
                }
                Step::Command(Some(Command::Close)) => return Ok(()),
                Step::Command(Some(Command::Resume)) => {}
                Step::Command(Some(Command::Send { pdu, bytes, reply })) => {
                    self.send(pdu, bytes, reply).await?
                }
                Step::Inbound((permit, Ok(Some(pdu)))) => self.receive(pdu, permit).await?,
                Step::Inbound((_, Ok(None))) => {
                    info!("Peer closed the connection");
                    return Ok(());
                }
                Step::Inbound((_, Err(e))) => {
                    match &e {
                        CodecError::Io(io) => {
                            self.record(metrics::SOCKET_ERROR, 1, &io.to_string())
                        }
                        other => self.record(metrics::PDU_COMMAND_ERROR, 1, &other.to_string()),
                    }
                    return Err(e.into());
                }
                Step::Expire => self.expire_pending()?,
                Step::Ping => self.ping().await?,
            }
        }
    }

    /// Wait for room in the event channel, then read the next PDU, so an
    /// owner that stops reading events stops inbound extraction too.
    async fn next_inbound(
        events: mpsc::Sender<SessionEvent>,
        connection: &mut Connection<S>,
    ) -> Inbound {
        let permit = events.reserve_owned().await.ok();
        (permit, connection.read_pdu().await)
    }

    async fn send(
        &mut self,
        pdu: Pdu,
        bytes: Bytes,
        reply: Option<Reply>,
    ) -> Result<(), SessionError> {
        let sequence_number = pdu.sequence_number;
        if let Some(Reply { tx, timeout }) = reply {
            if self.pending.contains_key(&sequence_number) {
                let _ = tx.send(Err(SessionError::InvalidState(format!(
                    "sequence number {sequence_number} is already awaiting a response"
                ))));
                return Ok(());
            }
            let deadline = Instant::now() + timeout;
            self.pending
                .insert(sequence_number, Pending::Caller { tx, deadline });
        }

        if let Err(e) = self.connection.write_bytes(&bytes).await {
            self.record(metrics::SOCKET_ERROR, 1, &e.to_string());
            if let Some(Pending::Caller { tx, .. }) = self.pending.remove(&sequence_number) {
                let _ = tx.send(Err(send_failed(pdu)));
            }
            return Err(e.into());
        }

        self.last_activity = Instant::now();
        self.record(metrics::PDU_COMMAND_OUT, 1, &pdu.command);
        self.record(metrics::SOCKET_DATA_OUT, bytes.len() as u64, "");
        trace!("Sent {}", pdu);
        self.notify(SessionEvent::Sent(pdu));
        Ok(())
    }

    async fn receive(
        &mut self,
        pdu: Pdu,
        permit: Option<mpsc::OwnedPermit<SessionEvent>>,
    ) -> Result<(), SessionError> {
        self.last_activity = Instant::now();
        self.record(metrics::PDU_COMMAND_IN, 1, &pdu.command);
        self.record(metrics::SOCKET_DATA_IN, u64::from(pdu.command_length), "");
        trace!("Received {}", pdu);

        if pdu.is_response() {
            match self.pending.remove(&pdu.sequence_number) {
                Some(Pending::Caller { tx, .. }) => {
                    let _ = tx.send(Ok(pdu));
                    return Ok(());
                }
                Some(Pending::KeepAlive { .. }) => {
                    self.keep_alive.on_ping_success();
                    return Ok(());
                }
                None => debug!("No request waiting for {}", pdu),
            }
        } else if pdu.command == "enquire_link" && self.config.auto_enquire_link_resp {
            let mut response = pdu.response().build()?;
            let bytes = response.to_bytes()?;
            self.send(response, bytes, None).await?;
        } else if self.config.pause_after_bind && pdu.command.starts_with("bind_") {
            self.shared
                .transition(SessionState::Open, SessionState::Paused);
            debug!("Paused after {}", pdu.command);
        }

        match permit {
            Some(permit) => {
                permit.send(SessionEvent::Pdu(pdu));
            }
            None => trace!("Event stream dropped"),
        }
        Ok(())
    }

    /// Fail every pending request whose deadline has passed.
    fn expire_pending(&mut self) -> Result<(), SessionError> {
        let now = Instant::now();
        let expired: Vec<u32> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline() <= now)
            .map(|(sequence_number, _)| *sequence_number)
            .collect();

        for sequence_number in expired {
            match self.pending.remove(&sequence_number) {
                Some(Pending::Caller { tx, .. }) => {
                    debug!("Request {} timed out", sequence_number);
                    let _ = tx.send(Err(SessionError::Timeout));
                }
                Some(Pending::KeepAlive { .. }) => {
                    self.keep_alive.on_ping_failure();
                    if self.keep_alive.is_connection_failed() {
                        warn!("Peer stopped answering enquire_link, closing");
                        return Err(SessionError::Timeout);
                    }
                }
                None => {}
            }
        }
        Ok(())
    }

    async fn ping(&mut self) -> Result<(), SessionError> {
        let mut pdu = Pdu::builder("enquire_link")
            .sequence_number(self.shared.next_sequence())
            .build()?;
        let bytes = pdu.to_bytes()?;
        let sequence_number = pdu.sequence_number;

        self.keep_alive.on_ping_sent(sequence_number);
        let deadline = Instant::now() + self.keep_alive.timeout();
        self.pending
            .insert(sequence_number, Pending::KeepAlive { deadline });
        self.send(pdu, bytes, None).await
    }

    async fn shutdown(&mut self) {
        self.shared.set_state(SessionState::Closing);

        for (_, pending) in self.pending.drain() {
            if let Pending::Caller { tx, .. } = pending {
                let _ = tx.send(Err(SessionError::Closed));
            }
        }
        self.commands.close();
        while let Ok(command) = self.commands.try_recv() {
            if let Command::Send {
                pdu,
                reply: Some(Reply { tx, .. }),
                ..
            } = command
            {
                let _ = tx.send(Err(send_failed(pdu)));
            }
        }

        if let Err(e) = self.connection.shutdown().await {
            debug!("Error shutting down stream: {}", e);
        }
        self.shared.mark_closed();
        self.record(metrics::SESSION_CLOSE, 1, "");
        info!("Session closed (peer: {:?})", self.shared.peer_addr);
    }

    /// Deliver a lifecycle event, waiting for room in the channel.
    async fn emit(&mut self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            trace!("Event stream dropped");
        }
    }

    /// Deliver a notice without waiting. Dropped when the channel is full.
    fn notify(&self, event: SessionEvent) {
        match self.events.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(event)) => {
                debug!("Event stream full, dropping {:?}", event);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => trace!("Event stream dropped"),
        }
    }

    fn record(&self, event: &'static str, value: u64, detail: &str) {
        if let Some(metrics) = &self.config.metrics {
            metrics.record(event, value, detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemoryMetrics;
    use tokio::io::{duplex, DuplexStream};
    use tokio::time::timeout;

    fn pair(config: SessionConfig) -> (SessionHandle, EventStream, Connection<DuplexStream>) {
        let (local, remote) = duplex(16 * 1024);
        let (handle, events) = Session::new(local, config);
        (handle, events, Connection::new(remote))
    }

    fn enquire_link() -> Pdu {
        Pdu::new("enquire_link").unwrap()
    }

    async fn wait_for_close(events: &mut EventStream) -> Vec<SessionEvent> {
        let mut seen = Vec::new();
        timeout(Duration::from_secs(2), async {
            while let Some(event) = events.recv().await {
                let closed = matches!(event, SessionEvent::Closed);
                seen.push(event);
                if closed {
                    break;
                }
            }
        })
        .await
        .unwrap();
        seen
    }

    #[test]
    fn test_sequence_numbers_wrap_without_zero() {
        assert_eq!(next_sequence_number(0), 1);
        assert_eq!(next_sequence_number(41), 42);
        assert_eq!(next_sequence_number(MAX_SEQUENCE_NUMBER - 1), MAX_SEQUENCE_NUMBER);
        assert_eq!(next_sequence_number(MAX_SEQUENCE_NUMBER), 1);
    }

    #[test]
    fn test_shared_counter_wraps() {
        let shared = Shared {
            state: AtomicU8::new(SessionState::Open.into()),
            sequence: AtomicU32::new(MAX_SEQUENCE_NUMBER - 1),
            peer_addr: None,
            response_timeout: Duration::from_secs(1),
            closed: Notify::new(),
        };
        assert_eq!(shared.next_sequence(), MAX_SEQUENCE_NUMBER);
        assert_eq!(shared.next_sequence(), 1);
        assert_eq!(shared.next_sequence(), 2);
    }

    #[tokio::test]
    async fn test_send_assigns_sequence_numbers() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());

        for expected in 1..=3 {
            assert_eq!(handle.send(enquire_link()).unwrap(), expected);
            let received = peer.read_pdu().await.unwrap().unwrap();
            assert_eq!(received.sequence_number, expected);
        }

        let preset = Pdu::builder("enquire_link").sequence_number(77).build().unwrap();
        assert_eq!(handle.send(preset).unwrap(), 77);
        assert_eq!(peer.read_pdu().await.unwrap().unwrap().sequence_number, 77);

        let response = Pdu::new("enquire_link_resp").unwrap();
        assert_eq!(handle.send(response).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_response_resolves_matching_request_once() {
        let (handle, mut events, mut peer) = pair(SessionConfig::default());

        let requester = handle.clone();
        let request = tokio::spawn(async move { requester.request(enquire_link()).await });

        let received = peer.read_pdu().await.unwrap().unwrap();
        let stray = Pdu::builder("enquire_link_resp")
            .sequence_number(received.sequence_number + 100)
            .build()
            .unwrap();
        peer.write_pdu(&stray).await.unwrap();
        let response = received.response().build().unwrap();
        peer.write_pdu(&response).await.unwrap();

        let answered = request.await.unwrap().unwrap();
        assert_eq!(answered.command, "enquire_link_resp");
        assert_eq!(answered.sequence_number, received.sequence_number);

        let unmatched = events.next_pdu().await.unwrap();
        assert_eq!(unmatched.sequence_number, stray.sequence_number);

        peer.write_pdu(&response).await.unwrap();
        let repeated = events.next_pdu().await.unwrap();
        assert_eq!(repeated.sequence_number, received.sequence_number);
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let (handle, mut events, mut peer) = pair(SessionConfig::default());

        let err = handle
            .request_with_timeout(enquire_link(), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Timeout));
        assert_eq!(err.to_string(), "Timed out waiting for response");

        // a late answer is just an event now
        let sent = peer.read_pdu().await.unwrap().unwrap();
        peer.write_pdu(&sent.response().build().unwrap()).await.unwrap();
        let late = events.next_pdu().await.unwrap();
        assert_eq!(late.sequence_number, sent.sequence_number);
        assert_eq!(handle.state(), SessionState::Open);
    }

    #[tokio::test]
    async fn test_close_fails_pending_and_later_sends() {
        let (handle, mut events, mut peer) = pair(SessionConfig::default());

        let requester = handle.clone();
        let pending = tokio::spawn(async move { requester.request(enquire_link()).await });
        peer.read_pdu().await.unwrap().unwrap();

        handle.close();
        assert!(matches!(pending.await.unwrap(), Err(SessionError::Closed)));

        let seen = wait_for_close(&mut events).await;
        assert!(matches!(seen.last(), Some(SessionEvent::Closed)));
        assert_eq!(handle.state(), SessionState::Closed);
        assert!(peer.read_pdu().await.unwrap().is_none());

        match handle.send(enquire_link()) {
            Err(SessionError::SendFailed(pdu)) => {
                assert_eq!(pdu.status(), Some(CommandStatus::SubmitFailed));
                assert_eq!(pdu.command, "enquire_link");
            }
            other => panic!("expected SendFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_pdu_reports_error_then_closes() {
        let (handle, mut events, mut peer) = pair(SessionConfig::default());

        peer.write_bytes(&[
            0x00, 0x00, 0x00, 0x11, 0x00, 0x00, 0x00, 0x15, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00,
        ])
        .await
        .unwrap();

        let seen = wait_for_close(&mut events).await;
        assert!(matches!(
            seen.first(),
            Some(SessionEvent::Error(SessionError::Codec(CodecError::Malformed { .. })))
        ));
        assert!(matches!(seen.last(), Some(SessionEvent::Closed)));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_oversized_pdu_closes_session() {
        let (_handle, mut events, mut peer) = pair(SessionConfig::default());

        let mut bytes = vec![0x00, 0x00, 0x40, 0x01];
        bytes.extend_from_slice(&[0; 12]);
        peer.write_bytes(&bytes).await.unwrap();

        let seen = wait_for_close(&mut events).await;
        assert!(matches!(
            seen.first(),
            Some(SessionEvent::Error(SessionError::Codec(CodecError::PduTooLarge { .. })))
        ));
    }

    #[tokio::test]
    async fn test_enquire_link_is_answered() {
        let (_handle, mut events, mut peer) = pair(SessionConfig::default());

        let ping = Pdu::builder("enquire_link").sequence_number(5).build().unwrap();
        peer.write_pdu(&ping).await.unwrap();

        let answer = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(answer.command, "enquire_link_resp");
        assert_eq!(answer.sequence_number, 5);
        assert_eq!(events.next_pdu().await.unwrap().command, "enquire_link");
    }

    #[tokio::test]
    async fn test_pause_after_bind_holds_later_pdus() {
        let config = SessionConfig::default().with_pause_after_bind(true);
        let (handle, mut events, mut peer) = pair(config);

        let bind = Pdu::builder("bind_transceiver")
            .sequence_number(1)
            .field("system_id", "esme")
            .build()
            .unwrap();
        peer.write_pdu(&bind).await.unwrap();
        let unbind = Pdu::builder("unbind").sequence_number(2).build().unwrap();
        peer.write_pdu(&unbind).await.unwrap();

        assert_eq!(events.next_pdu().await.unwrap().command, "bind_transceiver");
        assert_eq!(handle.state(), SessionState::Paused);
        assert!(timeout(Duration::from_millis(50), events.recv()).await.is_err());

        // replies still go out while paused
        let reply = bind.response().field("system_id", "smsc").build().unwrap();
        handle.send(reply).unwrap();
        assert_eq!(peer.read_pdu().await.unwrap().unwrap().command, "bind_transceiver_resp");

        assert!(handle.resume());
        assert_eq!(events.next_pdu().await.unwrap().command, "unbind");
        assert!(!handle.resume());
    }

    #[tokio::test]
    async fn test_manual_pause() {
        let (handle, _events, _peer) = pair(SessionConfig::default());
        tokio::task::yield_now().await;
        timeout(Duration::from_secs(1), async {
            while handle.state() != SessionState::Open {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert!(handle.pause());
        assert_eq!(handle.state(), SessionState::Paused);
        assert!(!handle.pause());
        assert!(handle.resume());
        assert_eq!(handle.state(), SessionState::Open);
    }

    #[tokio::test]
    async fn test_keep_alive_closes_after_unanswered_pings() {
        let keep_alive = KeepAliveConfig::new(Duration::from_millis(30))
            .with_timeout(Duration::from_millis(30))
            .with_max_failures(2);
        let config = SessionConfig::default().with_keep_alive(keep_alive);
        let (_handle, mut events, mut peer) = pair(config);

        let first = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(first.command, "enquire_link");
        assert_eq!(first.sequence_number, 1);
        peer.write_pdu(&first.response().build().unwrap()).await.unwrap();

        let second = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(second.sequence_number, 2);
        let third = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(third.sequence_number, 3);

        let seen = wait_for_close(&mut events).await;
        assert!(seen
            .iter()
            .any(|event| matches!(event, SessionEvent::Error(SessionError::Timeout))));
    }

    #[tokio::test]
    async fn test_metrics_are_recorded() {
        let metrics = Arc::new(InMemoryMetrics::new());
        let config = SessionConfig::default().with_metrics(metrics.clone());
        let (handle, mut events, mut peer) = pair(config);

        handle.send(enquire_link()).unwrap();
        let sent = peer.read_pdu().await.unwrap().unwrap();
        peer.write_pdu(&sent.response().build().unwrap()).await.unwrap();
        events.next_pdu().await.unwrap();

        handle.close();
        wait_for_close(&mut events).await;

        assert_eq!(metrics.count(metrics::SESSION_OPEN), 1);
        assert_eq!(metrics.count(metrics::SESSION_CLOSE), 1);
        assert_eq!(metrics.count("pdu.command.out/enquire_link"), 1);
        assert_eq!(metrics.count("pdu.command.in/enquire_link_resp"), 1);
        assert_eq!(metrics.get(metrics::SOCKET_DATA_IN).total, 16);
    }

    #[tokio::test]
    async fn test_unread_sent_events_do_not_block_timeouts() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());

        for _ in 0..70 {
            handle.send(enquire_link()).unwrap();
        }
        let result = timeout(
            Duration::from_secs(2),
            handle.request_with_timeout(enquire_link(), Duration::from_millis(50)),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(SessionError::Timeout)));

        for expected in 1..=71 {
            assert_eq!(peer.read_pdu().await.unwrap().unwrap().sequence_number, expected);
        }
    }

    #[tokio::test]
    async fn test_full_event_channel_holds_inbound_pdus() {
        let config = SessionConfig::default().with_event_capacity(1);
        let (handle, mut events, mut peer) = pair(config);

        for sequence_number in 1..=4 {
            let unbind = Pdu::builder("unbind")
                .sequence_number(sequence_number)
                .build()
                .unwrap();
            peer.write_pdu(&unbind).await.unwrap();
        }

        let result = timeout(
            Duration::from_secs(2),
            handle.request_with_timeout(enquire_link(), Duration::from_millis(50)),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(SessionError::Timeout)));

        // nothing was lost while reading was held back
        for expected in 1..=4 {
            let pdu = events.next_pdu().await.unwrap();
            assert_eq!(pdu.command, "unbind");
            assert_eq!(pdu.sequence_number, expected);
        }
    }

    #[tokio::test]
    async fn test_duplicate_pending_sequence_is_rejected() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());
        let preset = || Pdu::builder("enquire_link").sequence_number(9).build().unwrap();

        let requester = handle.clone();
        let first = tokio::spawn(async move { requester.request(preset()).await });
        let received = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(received.sequence_number, 9);

        let err = handle.request(preset()).await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));

        peer.write_pdu(&received.response().build().unwrap()).await.unwrap();
        let answered = first.await.unwrap().unwrap();
        assert_eq!(answered.command, "enquire_link_resp");
        assert_eq!(answered.sequence_number, 9);

        // the rejected request never reached the wire
        handle.send(enquire_link()).unwrap();
        assert_eq!(peer.read_pdu().await.unwrap().unwrap().sequence_number, 1);
    }

    #[tokio::test]
    async fn test_encode_failure_keeps_sequence_number() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());

        let mut bad = Pdu::new("submit_sm").unwrap();
        bad.set("esm_class", 300u32);
        assert!(matches!(handle.send(bad), Err(SessionError::Codec(_))));

        assert_eq!(handle.send(enquire_link()).unwrap(), 1);
        let received = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(received.command, "enquire_link");
        assert_eq!(received.sequence_number, 1);
    }

    #[tokio::test]
    async fn test_watch_reports_close() {
        let (handle, mut events, _peer) = pair(SessionConfig::default());
        let watch = handle.watch();
        assert!(!watch.is_closed());

        handle.close();
        timeout(Duration::from_secs(2), watch.closed()).await.unwrap();
        assert!(watch.is_closed());
        assert_eq!(watch.state(), SessionState::Closed);
        // already closed resolves at once
        timeout(Duration::from_millis(100), handle.closed()).await.unwrap();

        let seen = wait_for_close(&mut events).await;
        assert!(matches!(seen.last(), Some(SessionEvent::Closed)));
    }

    #[tokio::test]
    async fn test_watch_does_not_keep_session_alive() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());
        let watch = handle.watch();

        drop(handle);
        timeout(Duration::from_secs(2), watch.closed()).await.unwrap();
        assert!(peer.read_pdu().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_shortcut_builds_named_command() {
        let (handle, _events, mut peer) = pair(SessionConfig::default());

        let requester = handle.clone();
        let submit = tokio::spawn(async move {
            requester
                .submit_sm(|pdu| pdu.field("destination_addr", "46709771337").field("short_message", "hi"))
                .await
        });

        let received = peer.read_pdu().await.unwrap().unwrap();
        assert_eq!(received.command, "submit_sm");
        let response = received.response().field("message_id", "m-1").build().unwrap();
        peer.write_pdu(&response).await.unwrap();

        let answer = submit.await.unwrap().unwrap();
        assert_eq!(answer.get("message_id").and_then(|v| v.as_str()), Some("m-1"));
    }
}
