//! Mock implementations for testing
//!
//! [`MockI2s`] records every call the transfer manager makes and lets a test
//! play the role of the interrupt source.

#![cfg(any(test, feature = "std"))]

use crate::i2s::{EventMask, I2sChannel, I2sHardware, StartRequest};
use crate::i2s_config::I2sConfig;

const LOG_DEPTH: usize = 64;

/// Mock I2S unit
pub struct MockI2s {
    active: bool,
    pending: [EventMask; 2],
    starts: heapless::Vec<StartRequest, LOG_DEPTH>,
    applied: heapless::Vec<I2sConfig, LOG_DEPTH>,
    aborts: usize,
}

impl MockI2s {
    /// Create an idle mock unit
    pub const fn new() -> Self {
        Self {
            active: false,
            pending: [EventMask::NONE; 2],
            starts: heapless::Vec::new(),
            applied: heapless::Vec::new(),
            aborts: 0,
        }
    }

    /// Every `start` call, oldest first
    pub fn starts(&self) -> &[StartRequest] {
        &self.starts
    }

    /// Most recent `start` call
    pub fn last_start(&self) -> Option<&StartRequest> {
        self.starts.last()
    }

    /// Every configuration written by `apply_config`, oldest first
    pub fn applied_configs(&self) -> &[I2sConfig] {
        &self.applied
    }

    /// Number of `apply_config` calls
    pub fn config_applications(&self) -> usize {
        self.applied.len()
    }

    /// Number of `abort` calls
    pub fn aborts(&self) -> usize {
        self.aborts
    }

    /// Latch `events` on `channel` while the transfer keeps running
    /// (half-complete, under/overrun, circular wrap).
    pub fn raise(&mut self, channel: I2sChannel, events: EventMask) {
        if let Some(slot) = self.pending.get_mut(channel.index()) {
            *slot |= events;
        }
    }

    /// End the running transfer and latch `events` on `channel`.
    pub fn finish(&mut self, channel: I2sChannel, events: EventMask) {
        self.active = false;
        self.raise(channel, events);
    }

    /// Force the activity flag, as if another driver owned the unit.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for MockI2s {
    fn default() -> Self {
        Self::new()
    }
}

impl I2sHardware for MockI2s {
    fn start(&mut self, request: &StartRequest) {
        self.active = true;
        // Log saturates; tests never start more than LOG_DEPTH transfers.
        let _ = self.starts.push(*request);
    }

    fn abort(&mut self) {
        self.aborts = self.aborts.saturating_add(1);
        self.active = false;
    }

    fn read_event(&mut self, channel: I2sChannel) -> EventMask {
        self.pending
            .get_mut(channel.index())
            .map_or(EventMask::NONE, core::mem::take)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn apply_config(&mut self, config: &I2sConfig) {
        let _ = self.applied.push(*config);
    }
}
