// ABOUTME: Observational hooks a session reports to, plus a simple in-process aggregator
// ABOUTME: Recording never changes protocol behaviour; sinks do their own synchronisation

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

pub const PDU_COMMAND_IN: &str = "pdu.command.in";
pub const PDU_COMMAND_OUT: &str = "pdu.command.out";
pub const PDU_COMMAND_ERROR: &str = "pdu.command.error";
pub const SOCKET_DATA_IN: &str = "socket.data.in";
pub const SOCKET_DATA_OUT: &str = "socket.data.out";
pub const SOCKET_ERROR: &str = "socket.error";
pub const SESSION_OPEN: &str = "session.open";
pub const SESSION_CLOSE: &str = "session.close";

/// Receiver of session telemetry.
///
/// `value` is a count or a byte size depending on the event. `detail`
/// is free-form: the command name for PDU events, the error text for
/// error events.
pub trait MetricsSink: Send + Sync + fmt::Debug {
    fn record(&self, event: &'static str, value: u64, detail: &str);
}

/// Totals for one event name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counter {
    /// Times the event was recorded
    pub count: u64,
    /// Sum of recorded values
    pub total: u64,
}

/// Aggregates events in memory, keyed by event name and by `event/detail`.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    counters: Mutex<HashMap<String, Counter>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for an event name, or for `event/detail` (e.g. `pdu.command.in/submit_sm`).
    pub fn get(&self, key: &str) -> Counter {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
            .unwrap_or_default()
    }

    pub fn count(&self, key: &str) -> u64 {
        self.get(key).count
    }

    pub fn snapshot(&self) -> HashMap<String, Counter> {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MetricsSink for InMemoryMetrics {
    fn record(&self, event: &'static str, value: u64, detail: &str) {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);
        let mut bump = |key: String| {
            let counter = counters.entry(key).or_default();
            counter.count += 1;
            counter.total += value;
        };
        bump(event.to_string());
        if !detail.is_empty() {
            bump(format!("{event}/{detail}"));
        }
    }
}
