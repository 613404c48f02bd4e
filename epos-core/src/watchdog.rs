//! Transaction watchdog
//!
//! The port only notifies on change, so a device that stops answering would
//! leave the engine waiting forever. The watchdog accumulates time since the
//! last state change and reports expiry once the configured bound passes.

/// Transaction progress watchdog
#[derive(Debug, Clone)]
pub struct Watchdog {
    /// Allowed time without progress (ms)
    timeout_ms: u32,
    /// Time since last progress (ms)
    elapsed_ms: u32,
}

impl Watchdog {
    /// Create a new watchdog
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            elapsed_ms: 0,
        }
    }

    /// Record progress
    pub fn feed(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Update time tracking
    ///
    /// # Arguments
    /// - `delta_ms`: Time elapsed since last update
    ///
    /// Returns true once the timeout has been reached.
    pub fn update(&mut self, delta_ms: u32) -> bool {
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);
        self.expired()
    }

    /// Check whether the timeout has been reached
    pub fn expired(&self) -> bool {
        self.elapsed_ms >= self.timeout_ms
    }

    /// Time since last progress (ms)
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }
}
