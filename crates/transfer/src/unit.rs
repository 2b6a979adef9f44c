//! The physical I2S unit shared by logical handles.
//!
//! # Usage
//!
//! ```rust,ignore
//! static COMPLETIONS: CompletionChannel<COMPLETION_CHANNEL_DEPTH> = Channel::new();
//! static I2S2: I2sUnit<Spi2I2s, &CompletionChannel<COMPLETION_CHANNEL_DEPTH>> =
//!     I2sUnit::new(UnitId::new(2), Spi2I2s::new(), &COMPLETIONS);
//!
//! #[interrupt]
//! fn DMA1_STR4() {
//!     I2S2.on_interrupt(I2sChannel::Tx);
//! }
//!
//! #[interrupt]
//! fn DMA1_STR3() {
//!     I2S2.on_interrupt(I2sChannel::Rx);
//! }
//!
//! #[embassy_executor::task]
//! async fn completions() -> ! {
//!     run_completions(&COMPLETIONS).await
//! }
//! ```
//!
//! # Locking
//!
//! All mutable state lives in one `critical_section::Mutex<RefCell<Session>>`.
//! Every public method takes the critical section once, does a bounded amount
//! of work (at most one queue operation, one `apply_config` and one hardware
//! start) and releases it before returning. User callbacks and
//! [`Dispatcher::post`] are never run while it is held.

use core::cell::RefCell;

use critical_section::Mutex;
use platform::{I2sChannel, I2sConfig, I2sHardware};

use crate::config::{DEFAULT_HANDLE_SLOTS, DEFAULT_QUEUE_DEPTH};
use crate::config_cache::HandleId;
use crate::dispatch::Dispatcher;
use crate::error::TransferError;
use crate::handle::I2s;
use crate::session::{Session, TransferStats, TransferStatus};

/// Identity of a physical unit (the peripheral instance number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnitId(u8);

impl UnitId {
    /// Wrap a peripheral instance number.
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// The peripheral instance number.
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// One physical I2S unit: hardware, pending-transfer queue, configuration
/// registry and the completion dispatcher it posts to.
///
/// `QUEUE` bounds the pending transfers, `HANDLES` the logical handles that
/// can be bound at once.
pub struct I2sUnit<H, D, const QUEUE: usize = DEFAULT_QUEUE_DEPTH, const HANDLES: usize = DEFAULT_HANDLE_SLOTS> {
    id: UnitId,
    session: Mutex<RefCell<Session<H, QUEUE, HANDLES>>>,
    dispatcher: D,
}

impl<H, D, const QUEUE: usize, const HANDLES: usize> I2sUnit<H, D, QUEUE, HANDLES> {
    /// Wrap `hardware`; completions go to `dispatcher`.
    ///
    /// `const` so that units can live in `static`s reachable from interrupt
    /// handlers.
    pub const fn new(id: UnitId, hardware: H, dispatcher: D) -> Self {
        Self {
            id,
            session: Mutex::new(RefCell::new(Session::new(hardware))),
            dispatcher,
        }
    }

    /// Identity of this unit.
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Maximum number of pending transfers.
    pub const fn queue_capacity(&self) -> usize {
        QUEUE
    }

    pub(crate) fn lock<R>(&self, f: impl FnOnce(&mut Session<H, QUEUE, HANDLES>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.session.borrow_ref_mut(cs)))
    }
}

impl<H, D, const QUEUE: usize, const HANDLES: usize> I2sUnit<H, D, QUEUE, HANDLES>
where
    H: I2sHardware,
    D: Dispatcher,
{
    /// Bind a new logical handle with its own configuration.
    ///
    /// Nothing is written to the hardware until the handle's first transfer
    /// (or an explicit [`I2s::acquire`]).
    pub fn handle(&self, config: I2sConfig) -> Result<I2s<'_, H, D, QUEUE, HANDLES>, TransferError> {
        let id = self
            .lock(|session| session.registry_mut().register(config))
            .ok_or(TransferError::NoFreeHandle)?;
        Ok(I2s::new(self, id))
    }

    /// Interrupt entry point for one channel of this unit.
    ///
    /// Call it from the TX or RX completion interrupt. Acknowledges the
    /// channel's events, posts the running transfer's callback if it
    /// subscribed to any of them, then starts the next queued transfer or
    /// goes idle if the transfer has ended.
    ///
    /// The notification is posted after the critical section is released,
    /// so a user [`Dispatcher`] never runs with the unit locked. Posts from
    /// one channel keep their order because that channel's interrupt cannot
    /// preempt itself.
    pub fn on_interrupt(&self, channel: I2sChannel) {
        let completion = self.lock(|session| {
            let (fired, completion) = session.take_events(channel);
            session.finish(fired);
            completion
        });
        let Some(completion) = completion else {
            return;
        };
        if self.dispatcher.post(completion).is_err() {
            self.lock(|session| session.note_dropped_notification());

            #[cfg(feature = "defmt")]
            defmt::warn!("i2s: completion channel full, notification dropped");
        }
    }

    /// Busy or idle. No side effects.
    pub fn status(&self) -> TransferStatus {
        self.lock(|session| session.status())
    }

    /// Number of transfers waiting behind the running one.
    pub fn pending_transfers(&self) -> usize {
        self.lock(|session| session.pending())
    }

    /// Stop the running transfer and start the next queued one, if any.
    /// The stopped transfer's callback does not run.
    pub fn abort_transfer(&self) {
        self.lock(|session| session.abort());
    }

    /// Drop all pending transfers without running their callbacks. The
    /// running transfer continues.
    pub fn clear_transfer_buffer(&self) {
        self.lock(|session| session.clear());
    }

    /// Drop all pending transfers, then stop the running one.
    pub fn abort_all_transfers(&self) {
        self.lock(|session| {
            session.clear();
            session.abort();
        });
    }

    /// Counters since the unit was created.
    pub fn stats(&self) -> TransferStats {
        self.lock(|session| session.stats())
    }

    /// Handle whose configuration is currently in the registers, if known.
    pub fn config_owner(&self) -> Option<HandleId> {
        self.lock(|session| session.registry().owner())
    }

    /// Run `f` on the hardware inside the unit's critical section.
    ///
    /// For diagnostics and register access the transfer manager does not
    /// cover. `f` must not start or abort transfers, and must not call back
    /// into this unit.
    pub fn with_hardware<R>(&self, f: impl FnOnce(&mut H) -> R) -> R {
        self.lock(|session| f(session.hardware_mut()))
    }
}
