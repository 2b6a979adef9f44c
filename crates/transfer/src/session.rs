//! Transfer state machine of one physical unit.
//!
//! ```text
//!            submit (unit free)                 submit (busy): queue.push
//!   [Idle] ─────────────────────▶ [Busy] ◀──────────────────────────────┐
//!     ▲                             │ │                                  │
//!     │  complete/abort, queue empty │ └── complete/abort, queue non-empty: start(queue.pop())
//!     └─────────────────────────────┘
//! ```
//!
//! `Session` has no locking of its own. [`I2sUnit`](crate::I2sUnit) keeps it
//! in a `critical_section::Mutex<RefCell<_>>` and calls every method below
//! from inside one critical section, both from thread mode and from the
//! unit's interrupt handlers. Nothing here blocks, allocates or calls user
//! code.

use platform::{EventMask, I2sChannel, I2sHardware};

use crate::config_cache::{ConfigRegistry, HandleId};
use crate::descriptor::QueueEntry;
use crate::dispatch::Completion;
use crate::error::TransferError;
use crate::queue::TransferQueue;

/// Whether the unit is running (or about to run) a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferStatus {
    /// Nothing running, nothing queued.
    Idle,
    /// A transfer is running; more may be queued behind it.
    Busy,
}

/// How an accepted submission was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Submission {
    /// The unit was idle and the transfer was started right away.
    Started,
    /// The unit was busy and the transfer waits in the queue.
    Queued,
}

impl Submission {
    /// Legacy integer result code (`0` for both outcomes).
    pub const fn code(self) -> i32 {
        0
    }
}

/// Running totals for one unit. All counters saturate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferStats {
    /// Transfers handed to the hardware.
    pub started: u32,
    /// Transfers that ran to their end.
    pub completed: u32,
    /// Running transfers stopped by an abort.
    pub aborted: u32,
    /// Submissions dropped because the queue was full.
    pub rejected: u32,
    /// Completions lost because the dispatcher had no room.
    pub notifications_dropped: u32,
}

pub(crate) struct Session<H, const Q: usize, const N: usize> {
    hardware: H,
    registry: ConfigRegistry<N>,
    queue: TransferQueue<Q>,
    busy: bool,
    current: Option<QueueEntry>,
    stats: TransferStats,
}

impl<H, const Q: usize, const N: usize> Session<H, Q, N> {
    pub(crate) const fn new(hardware: H) -> Self {
        Self {
            hardware,
            registry: ConfigRegistry::new(),
            queue: TransferQueue::new(),
            busy: false,
            current: None,
            stats: TransferStats {
                started: 0,
                completed: 0,
                aborted: 0,
                rejected: 0,
                notifications_dropped: 0,
            },
        }
    }

    pub(crate) fn status(&self) -> TransferStatus {
        if self.busy {
            TransferStatus::Busy
        } else {
            TransferStatus::Idle
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn stats(&self) -> TransferStats {
        self.stats
    }

    pub(crate) fn registry(&self) -> &ConfigRegistry<N> {
        &self.registry
    }

    pub(crate) fn registry_mut(&mut self) -> &mut ConfigRegistry<N> {
        &mut self.registry
    }

    pub(crate) fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    pub(crate) fn note_dropped_notification(&mut self) {
        self.stats.notifications_dropped = self.stats.notifications_dropped.saturating_add(1);
    }

    /// Forget a handle: drop its queued transfers and free its slot. A
    /// transfer of that handle that is already running finishes normally.
    pub(crate) fn release_handle(&mut self, id: HandleId) {
        self.queue.purge(id);
        self.registry.release(id);
    }

    /// Empty the queue. The running transfer is not touched.
    pub(crate) fn clear(&mut self) {
        self.queue.clear();

        #[cfg(feature = "defmt")]
        defmt::debug!("i2s: pending transfers cleared");
    }
}

impl<H: I2sHardware, const Q: usize, const N: usize> Session<H, Q, N> {
    /// Explicit acquire from a handle. Refused while a transfer runs: the
    /// registers belong to that transfer, and the next start applies
    /// whatever configuration it needs.
    pub(crate) fn acquire(&mut self, id: HandleId) -> bool {
        if self.busy || self.hardware.is_active() {
            #[cfg(feature = "defmt")]
            defmt::debug!("i2s: acquire by handle {} deferred, unit busy", id);

            return false;
        }
        self.registry.acquire(id, &mut self.hardware)
    }

    /// Start `entry` now if the unit is free, otherwise queue it.
    ///
    /// A rejected entry leaves the session exactly as it was.
    pub(crate) fn submit(&mut self, entry: QueueEntry) -> Result<Submission, TransferError> {
        if !self.busy && !self.hardware.is_active() {
            self.start(entry);
            return Ok(Submission::Started);
        }
        match self.queue.push(entry) {
            Ok(()) => {
                // Hardware may be active without us (foreign start); its
                // completion interrupt will pull this entry.
                self.busy = true;

                #[cfg(feature = "defmt")]
                defmt::trace!("i2s: queued transfer, {} pending", self.queue.len());

                Ok(Submission::Queued)
            }
            Err(_rejected) => {
                self.stats.rejected = self.stats.rejected.saturating_add(1);

                #[cfg(feature = "defmt")]
                defmt::warn!("i2s: queue full ({}), transfer dropped", Q);

                Err(TransferError::QueueFull)
            }
        }
    }

    fn start(&mut self, entry: QueueEntry) {
        self.registry.acquire(entry.handle, &mut self.hardware);
        self.hardware.start(&entry.descriptor.start_request());
        self.current = Some(entry);
        self.busy = true;
        self.stats.started = self.stats.started.saturating_add(1);

        #[cfg(feature = "defmt")]
        defmt::debug!("i2s: started transfer of handle {}", entry.handle);
    }

    /// Start the next queued transfer, or go idle.
    fn advance(&mut self) {
        match self.queue.pop() {
            Some(next) => self.start(next),
            None => {
                self.current = None;
                self.busy = false;

                #[cfg(feature = "defmt")]
                defmt::debug!("i2s: idle");
            }
        }
    }

    /// Stop the running transfer and move on to the next queued one.
    ///
    /// Without a running transfer this does nothing.
    pub(crate) fn abort(&mut self) {
        if !self.busy && !self.hardware.is_active() {
            return;
        }
        self.hardware.abort();
        if self.current.take().is_some() {
            self.stats.aborted = self.stats.aborted.saturating_add(1);

            #[cfg(feature = "defmt")]
            defmt::debug!("i2s: transfer aborted");
        }
        self.advance();
    }

    /// Interrupt step 1: acknowledge `channel`'s events and build the
    /// notification for the running transfer, if it subscribed to them.
    pub(crate) fn take_events(&mut self, channel: I2sChannel) -> (EventMask, Option<Completion>) {
        let fired = self.hardware.read_event(channel);

        #[cfg(feature = "defmt")]
        defmt::trace!("i2s: {} events {=u32:#x}", channel, fired.bits());

        let completion = self.current.and_then(|entry| {
            let descriptor = entry.descriptor;
            descriptor.notification(fired).map(|(callback, events)| {
                Completion::new(entry.handle, callback, descriptor.tx(), descriptor.rx(), events)
            })
        });
        (fired, completion)
    }

    /// Interrupt step 2: if `fired` ends the running transfer, start the next
    /// one or go idle. Half-complete and error events alone do not advance;
    /// neither does a completion while the hardware is still running (the
    /// other direction of a duplex transfer, or a circular wrap).
    pub(crate) fn finish(&mut self, fired: EventMask) {
        if !self.busy || !fired.intersects(EventMask::COMPLETION) || self.hardware.is_active() {
            return;
        }
        if self.current.is_some() {
            self.stats.completed = self.stats.completed.saturating_add(1);
        }
        self.advance();
    }

    #[cfg(test)]
    pub(crate) fn current_handle(&self) -> Option<HandleId> {
        self.current.map(|entry| entry.handle)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::descriptor::TransferDescriptor;
    use platform::mocks::MockI2s;
    use platform::I2sConfig;

    fn entry(handle: HandleId, tag: u32) -> QueueEntry {
        QueueEntry {
            handle,
            descriptor: TransferDescriptor::new(None, None, false, None, EventMask::from_bits(tag)),
        }
    }

    fn session() -> (Session<MockI2s, 2, 2>, HandleId) {
        let mut s = Session::new(MockI2s::new());
        let h = s.registry_mut().register(I2sConfig::DEFAULT).unwrap();
        (s, h)
    }

    fn complete(s: &mut Session<MockI2s, 2, 2>) {
        s.hardware_mut().finish(I2sChannel::Tx, EventMask::TX_COMPLETE);
        let (fired, _) = s.take_events(I2sChannel::Tx);
        s.finish(fired);
    }

    #[test]
    fn idle_submit_starts() {
        let (mut s, h) = session();
        assert_eq!(s.submit(entry(h, 1)), Ok(Submission::Started));
        assert_eq!(s.status(), TransferStatus::Busy);
        assert_eq!(s.hardware_mut().starts().len(), 1);
    }

    #[test]
    fn busy_submit_queues_and_full_rejects_without_side_effects() {
        let (mut s, h) = session();
        s.submit(entry(h, 1)).unwrap();
        assert_eq!(s.submit(entry(h, 2)), Ok(Submission::Queued));
        assert_eq!(s.submit(entry(h, 3)), Ok(Submission::Queued));
        assert_eq!(s.submit(entry(h, 4)), Err(TransferError::QueueFull));
        assert_eq!(s.pending(), 2);
        assert_eq!(s.stats().rejected, 1);
        assert_eq!(s.hardware_mut().starts().len(), 1);
    }

    #[test]
    fn completion_advances_then_idles() {
        let (mut s, h) = session();
        s.submit(entry(h, 1)).unwrap();
        s.submit(entry(h, 2)).unwrap();

        complete(&mut s);
        assert_eq!(s.status(), TransferStatus::Busy);
        assert_eq!(s.hardware_mut().last_start().unwrap().events.bits(), 2);

        complete(&mut s);
        assert_eq!(s.status(), TransferStatus::Idle);
        assert_eq!(s.current_handle(), None);
        assert_eq!(s.stats().completed, 2);
    }

    #[test]
    fn half_complete_does_not_advance() {
        let (mut s, h) = session();
        s.submit(entry(h, 1)).unwrap();
        s.submit(entry(h, 2)).unwrap();
        s.hardware_mut().raise(I2sChannel::Tx, EventMask::TX_HALF_COMPLETE);
        let (fired, _) = s.take_events(I2sChannel::Tx);
        s.finish(fired);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.hardware_mut().starts().len(), 1);
    }

    #[test]
    fn completion_while_hardware_still_active_does_not_advance() {
        let (mut s, h) = session();
        s.submit(entry(h, 1)).unwrap();
        s.submit(entry(h, 2)).unwrap();
        s.hardware_mut().raise(I2sChannel::Tx, EventMask::TX_COMPLETE);
        let (fired, _) = s.take_events(I2sChannel::Tx);
        s.finish(fired);
        assert_eq!(s.pending(), 1);
    }

    #[test]
    fn acquire_while_busy_writes_nothing() {
        let (mut s, h) = session();
        let other = s.registry_mut().register(I2sConfig::DEFAULT).unwrap();
        s.submit(entry(h, 1)).unwrap();
        assert!(!s.acquire(other));
        assert_eq!(s.hardware_mut().config_applications(), 1);
        assert_eq!(s.registry().owner(), Some(h));
    }

    #[test]
    fn abort_when_idle_is_noop() {
        let (mut s, _) = session();
        s.abort();
        assert_eq!(s.hardware_mut().aborts(), 0);
        assert_eq!(s.status(), TransferStatus::Idle);
    }

    #[test]
    fn foreign_activity_queues_then_drains_on_its_interrupt() {
        let (mut s, h) = session();
        s.hardware_mut().set_active(true);
        assert_eq!(s.submit(entry(h, 1)), Ok(Submission::Queued));
        assert_eq!(s.status(), TransferStatus::Busy);

        complete(&mut s);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.current_handle(), Some(h));
        assert_eq!(s.stats().completed, 0);
    }

    #[test]
    fn release_purges_queue_but_not_running_transfer() {
        let mut s: Session<MockI2s, 4, 2> = Session::new(MockI2s::new());
        let a = s.registry_mut().register(I2sConfig::DEFAULT).unwrap();
        let b = s.registry_mut().register(I2sConfig::DEFAULT).unwrap();
        s.submit(entry(a, 1)).unwrap();
        s.submit(entry(b, 2)).unwrap();
        s.submit(entry(a, 3)).unwrap();

        s.release_handle(a);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.current_handle(), Some(a));
    }
}
