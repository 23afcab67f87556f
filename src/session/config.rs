// ABOUTME: Programmatic configuration for an SMPP session
// ABOUTME: Plain struct with defaults and with_* builders, no files or environment involved

use super::keepalive::KeepAliveConfig;
use crate::connection::DEFAULT_READ_CAPACITY;
use crate::metrics::MetricsSink;
use std::sync::Arc;
use std::time::Duration;

/// Settings for one session.
///
/// # Example
///
/// ```rust
/// use smpp::session::{KeepAliveConfig, SessionConfig};
/// use std::time::Duration;
///
/// let config = SessionConfig::default()
///     .with_response_timeout(Duration::from_secs(5))
///     .with_keep_alive(KeepAliveConfig::new(Duration::from_secs(60)));
/// assert!(config.keep_alive.enabled);
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long `request` waits for the response (default: 30 seconds)
    pub response_timeout: Duration,

    /// Stop reading after an inbound bind request until `resume` is called
    pub pause_after_bind: bool,

    /// Answer inbound enquire_link automatically (default: true)
    pub auto_enquire_link_resp: bool,

    /// Disabled by default; [`SessionConfig::client`] turns it on
    pub keep_alive: KeepAliveConfig,

    pub read_buffer_capacity: usize,

    /// Depth of the event channel. The session stops reading while it is full.
    pub event_capacity: usize,

    pub metrics: Option<Arc<dyn MetricsSink>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: Duration::from_secs(30),
            pause_after_bind: false,
            auto_enquire_link_resp: true,
            keep_alive: KeepAliveConfig::disabled(),
            read_buffer_capacity: DEFAULT_READ_CAPACITY,
            event_capacity: 64,
            metrics: None,
        }
    }
}

impl SessionConfig {
    /// Defaults for the ESME side: keep-alive pings enabled.
    pub fn client() -> Self {
        Self {
            keep_alive: KeepAliveConfig::default(),
            ..Default::default()
        }
    }

    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub fn with_pause_after_bind(mut self, pause: bool) -> Self {
        self.pause_after_bind = pause;
        self
    }

    pub fn with_auto_enquire_link_resp(mut self, enabled: bool) -> Self {
        self.auto_enquire_link_resp = enabled;
        self
    }

    pub fn with_keep_alive(mut self, keep_alive: KeepAliveConfig) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    pub fn with_read_buffer_capacity(mut self, capacity: usize) -> Self {
        self.read_buffer_capacity = capacity;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::InMemoryMetrics;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.response_timeout, Duration::from_secs(30));
        assert!(!config.pause_after_bind);
        assert!(config.auto_enquire_link_resp);
        assert!(!config.keep_alive.enabled);
        assert_eq!(config.read_buffer_capacity, 4096);
        assert!(config.metrics.is_none());

        assert!(SessionConfig::client().keep_alive.enabled);
    }

    #[test]
    fn test_builders() {
        let config = SessionConfig::default()
            .with_pause_after_bind(true)
            .with_event_capacity(0)
            .with_metrics(Arc::new(InMemoryMetrics::new()));
        assert!(config.pause_after_bind);
        assert_eq!(config.event_capacity, 1);
        assert!(config.metrics.is_some());
    }
}
