//! Deferred delivery of completion callbacks.
//!
//! The completion interrupt never calls user code. It packages the callback
//! and its arguments into a [`Completion`] and posts it to a [`Dispatcher`];
//! a thread-mode task later takes it off and calls [`Completion::deliver`].
//!
//! The stock dispatcher is an embassy-sync [`Channel`]:
//!
//! ```text
//! I2S TX/RX ISR ──try_send──▶ CompletionChannel ──receive().await──▶ run_completions task
//! ```
//!
//! `try_send` never blocks. If the channel is full the notification is
//! dropped and counted in [`TransferStats`](crate::TransferStats); the
//! transfer itself still advances.
//!
//! Justification for `CriticalSectionRawMutex`: the channel is written from
//! interrupt context and read from thread mode. The lock is held only for a
//! heapless deque push/pop, far shorter than one audio frame.

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::channel::{Channel, TrySendError};
use platform::{DmaSlice, EventMask};

use crate::config_cache::HandleId;
use crate::descriptor::EventCallback;

/// A callback bound to its arguments, ready to run outside interrupt context.
#[derive(Debug, Clone, Copy)]
pub struct Completion {
    handle: HandleId,
    callback: EventCallback,
    tx: Option<DmaSlice>,
    rx: Option<DmaSlice>,
    events: EventMask,
}

impl Completion {
    pub(crate) const fn new(
        handle: HandleId,
        callback: EventCallback,
        tx: Option<DmaSlice>,
        rx: Option<DmaSlice>,
        events: EventMask,
    ) -> Self {
        Self {
            handle,
            callback,
            tx,
            rx,
            events,
        }
    }

    /// Handle that submitted the transfer. If that handle has been dropped
    /// since, this differs from the id of any handle now in its slot.
    pub const fn handle(&self) -> HandleId {
        self.handle
    }

    /// Events that fired, restricted to the registered mask.
    pub const fn events(&self) -> EventMask {
        self.events
    }

    /// Transmit buffer of the transfer.
    pub const fn tx(&self) -> Option<DmaSlice> {
        self.tx
    }

    /// Receive buffer of the transfer.
    pub const fn rx(&self) -> Option<DmaSlice> {
        self.rx
    }

    /// Run the callback.
    pub fn deliver(self) {
        (self.callback)(self.tx, self.rx, self.events);
    }
}

/// Sink for completions posted from interrupt context.
///
/// `post` must not block and must not run the callback itself. Completions
/// posted by one unit must be delivered in posting order. It is called from
/// the unit's interrupt handler, but outside the unit's critical section.
pub trait Dispatcher {
    /// Queue `completion` for later delivery, or hand it back if there is no
    /// room.
    fn post(&self, completion: Completion) -> Result<(), Completion>;
}

impl<T: Dispatcher + ?Sized> Dispatcher for &T {
    fn post(&self, completion: Completion) -> Result<(), Completion> {
        (**self).post(completion)
    }
}

impl<M: RawMutex, const N: usize> Dispatcher for Channel<M, Completion, N> {
    fn post(&self, completion: Completion) -> Result<(), Completion> {
        self.try_send(completion)
            .map_err(|TrySendError::Full(rejected)| rejected)
    }
}

/// Interrupt-safe completion channel.
pub type CompletionChannel<const N: usize> = Channel<CriticalSectionRawMutex, Completion, N>;

/// Deliver completions forever, in the order they were posted.
///
/// Spawn this from an executor task that runs in thread mode.
pub async fn run_completions<M: RawMutex, const N: usize>(
    channel: &Channel<M, Completion, N>,
) -> ! {
    loop {
        channel.receive().await.deliver();
    }
}

/// Deliver every completion that is already waiting; returns how many ran.
///
/// For super-loop firmware without an executor.
pub fn drain_completions<M: RawMutex, const N: usize>(channel: &Channel<M, Completion, N>) -> usize {
    let mut delivered = 0usize;
    while let Ok(completion) = channel.try_receive() {
        completion.deliver();
        delivered = delivered.saturating_add(1);
    }
    delivered
}
