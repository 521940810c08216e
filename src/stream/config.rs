// src/stream/config.rs
use std::time::Duration;

pub const DEFAULT_STREAM_INTERVAL: Duration = Duration::from_secs(60);

/// How a stream polls. Fixed once the stream is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub interval: Duration,
    /// Treat the first non-empty snapshot as baseline instead of output.
    pub discard_initial: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_STREAM_INTERVAL,
            discard_initial: false,
        }
    }
}

impl StreamConfig {
    /// Zero is ignored and keeps the current interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if !interval.is_zero() {
            self.interval = interval;
        }
        self
    }

    pub fn discard_initial(mut self) -> Self {
        self.discard_initial = true;
        self
    }
}
