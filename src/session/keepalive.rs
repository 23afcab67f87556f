// ABOUTME: Idle-time enquire_link scheduling for a session, with failure counting
// ABOUTME: The session actor asks when the next ping is due and reports how each one ended

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Configuration for keep-alive pings.
///
/// When enabled, a session that has seen no traffic for `interval` sends an
/// `enquire_link` and waits up to `timeout` for the response. After
/// `max_failures` consecutive unanswered pings the session is closed.
///
/// # Example
///
/// ```rust
/// use smpp::session::KeepAliveConfig;
/// use std::time::Duration;
///
/// let config = KeepAliveConfig::new(Duration::from_secs(60))
///     .with_timeout(Duration::from_secs(15))
///     .with_max_failures(5);
/// assert!(config.enabled);
/// assert!(!KeepAliveConfig::disabled().enabled);
/// ```
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Idle time before an enquire_link is sent (default: 30 seconds)
    pub interval: Duration,

    /// Time to wait for enquire_link_resp (default: 10 seconds)
    pub timeout: Duration,

    /// Consecutive unanswered pings before the session is closed (default: 3)
    pub max_failures: u32,

    pub enabled: bool,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(10),
            max_failures: 3,
            enabled: true,
        }
    }
}

impl KeepAliveConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_failures(mut self, max_failures: u32) -> Self {
        self.max_failures = max_failures;
        self
    }

    /// No automatic pings. This is the default for server-side sessions.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Snapshot of keep-alive health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepAliveStatus {
    pub running: bool,
    pub consecutive_failures: u32,
    pub total_pings: u32,
    pub total_pongs: u32,
}

/// Tracks the one outstanding keep-alive ping of a session.
#[derive(Debug)]
pub struct KeepAliveManager {
    config: KeepAliveConfig,
    /// Sequence number of the ping awaiting its response
    outstanding: Option<u32>,
    consecutive_failures: u32,
    total_pings: u32,
    total_pongs: u32,
}

impl KeepAliveManager {
    pub fn new(config: KeepAliveConfig) -> Self {
        Self {
            config,
            outstanding: None,
            consecutive_failures: 0,
            total_pings: 0,
            total_pongs: 0,
        }
    }

    /// When the next ping is due, given the time of the last traffic.
    ///
    /// `None` while disabled, while a ping is in flight, or once the
    /// failure limit is reached.
    pub fn next_ping(&self, last_activity: Instant) -> Option<Instant> {
        if !self.config.enabled || self.outstanding.is_some() || self.is_connection_failed() {
            return None;
        }
        Some(last_activity + self.config.interval)
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    pub fn on_ping_sent(&mut self, sequence_number: u32) {
        self.outstanding = Some(sequence_number);
        self.total_pings += 1;
        debug!("Keep-alive enquire_link sent (total: {})", self.total_pings);
    }

    /// Whether `sequence_number` answers the outstanding ping.
    pub fn is_outstanding(&self, sequence_number: u32) -> bool {
        self.outstanding == Some(sequence_number)
    }

    pub fn on_ping_success(&mut self) {
        self.outstanding = None;
        self.consecutive_failures = 0;
        self.total_pongs += 1;
        debug!("Keep-alive answered (total: {})", self.total_pongs);
    }

    pub fn on_ping_failure(&mut self) {
        self.outstanding = None;
        self.consecutive_failures += 1;
        warn!(
            "Keep-alive enquire_link unanswered (consecutive failures: {})",
            self.consecutive_failures
        );
    }

    pub fn is_connection_failed(&self) -> bool {
        self.consecutive_failures >= self.config.max_failures
    }

    pub fn status(&self) -> KeepAliveStatus {
        KeepAliveStatus {
            running: self.config.enabled,
            consecutive_failures: self.consecutive_failures,
            total_pings: self.total_pings,
            total_pongs: self.total_pongs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keep_alive_config_defaults() {
        let config = KeepAliveConfig::default();
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_failures, 3);
        assert!(config.enabled);
    }

    #[test]
    fn test_next_ping_follows_activity() {
        let manager = KeepAliveManager::new(KeepAliveConfig::new(Duration::from_millis(100)));
        let now = Instant::now();
        assert_eq!(manager.next_ping(now), Some(now + Duration::from_millis(100)));
    }

    #[test]
    fn test_no_ping_while_outstanding() {
        let mut manager = KeepAliveManager::new(KeepAliveConfig::default());
        manager.on_ping_sent(7);
        assert!(manager.is_outstanding(7));
        assert!(!manager.is_outstanding(8));
        assert_eq!(manager.next_ping(Instant::now()), None);

        manager.on_ping_success();
        assert!(manager.next_ping(Instant::now()).is_some());
        assert_eq!(
            manager.status(),
            KeepAliveStatus {
                running: true,
                consecutive_failures: 0,
                total_pings: 1,
                total_pongs: 1,
            }
        );
    }

    #[test]
    fn test_failure_limit_stops_pings() {
        let mut manager =
            KeepAliveManager::new(KeepAliveConfig::default().with_max_failures(2));
        manager.on_ping_sent(1);
        manager.on_ping_failure();
        assert!(!manager.is_connection_failed());

        manager.on_ping_sent(2);
        manager.on_ping_failure();
        assert!(manager.is_connection_failed());
        assert_eq!(manager.next_ping(Instant::now()), None);
    }

    #[test]
    fn test_disabled_never_pings() {
        let manager = KeepAliveManager::new(KeepAliveConfig::disabled());
        assert_eq!(manager.next_ping(Instant::now()), None);
        assert!(!manager.status().running);
    }
}
