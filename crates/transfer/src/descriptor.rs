//! Transfer descriptors and queue entries.

use platform::{DmaSlice, EventMask, StartRequest};

use crate::config_cache::HandleId;

/// Completion handler.
///
/// Runs on the task that drains the completion channel, never in interrupt
/// context. Receives the transfer's buffers and the events that fired,
/// already filtered by the mask registered with it.
pub type EventCallback = fn(tx: Option<DmaSlice>, rx: Option<DmaSlice>, events: EventMask);

/// Immutable description of one transfer.
///
/// Built by [`TransferBuilder`](crate::TransferBuilder); once built there
/// is no way to change it.
#[derive(Debug, Clone, Copy)]
pub struct TransferDescriptor {
    tx: Option<DmaSlice>,
    rx: Option<DmaSlice>,
    circular: bool,
    callback: Option<EventCallback>,
    events: EventMask,
}

impl TransferDescriptor {
    pub(crate) const fn new(
        tx: Option<DmaSlice>,
        rx: Option<DmaSlice>,
        circular: bool,
        callback: Option<EventCallback>,
        events: EventMask,
    ) -> Self {
        Self {
            tx,
            rx,
            circular,
            callback,
            events,
        }
    }

    /// Buffer to transmit from.
    pub const fn tx(&self) -> Option<DmaSlice> {
        self.tx
    }

    /// Buffer to receive into.
    pub const fn rx(&self) -> Option<DmaSlice> {
        self.rx
    }

    /// Whether the hardware restarts the buffers instead of finishing.
    pub const fn is_circular(&self) -> bool {
        self.circular
    }

    /// Events that trigger the callback.
    pub const fn events(&self) -> EventMask {
        self.events
    }

    /// Whether a completion handler is registered.
    pub const fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub(crate) fn start_request(&self) -> StartRequest {
        StartRequest {
            tx: self.tx,
            rx: self.rx,
            circular: self.circular,
            events: self.events,
        }
    }

    /// Callback and filtered mask if `fired` concerns the registered events.
    pub(crate) fn notification(&self, fired: EventMask) -> Option<(EventCallback, EventMask)> {
        let callback = self.callback?;
        let matched = fired & self.events;
        if matched.is_empty() {
            None
        } else {
            Some((callback, matched))
        }
    }
}

/// A descriptor together with the handle whose configuration it needs.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueEntry {
    pub handle: HandleId,
    pub descriptor: TransferDescriptor,
}
