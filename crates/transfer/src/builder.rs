//! Transfer builder.
//!
//! ```rust,ignore
//! static TONE: [i16; 256] = [0; 256];
//!
//! fn played(_tx: Option<DmaSlice>, _rx: Option<DmaSlice>, events: EventMask) { /* ... */ }
//!
//! let result = i2s
//!     .begin_transfer()
//!     .set_tx(&TONE)
//!     .set_callback(played, EventMask::TX_COMPLETE)
//!     .commit();
//! ```
//!
//! Each field can be set once. The builder is submitted exactly once: on the
//! first [`commit`](TransferBuilder::commit), or when it is dropped if
//! `commit` was never called.

use platform::{DmaSlice, EventMask, I2sHardware};

use crate::descriptor::{EventCallback, TransferDescriptor};
use crate::dispatch::Dispatcher;
use crate::error::TransferError;
use crate::handle::I2s;
use crate::session::Submission;

/// Accumulates the parameters of one transfer. See the module docs.
#[must_use = "a dropped builder submits its transfer immediately"]
pub struct TransferBuilder<'h, 'u, H, D, const QUEUE: usize, const HANDLES: usize>
where
    H: I2sHardware,
    D: Dispatcher,
{
    handle: &'h I2s<'u, H, D, QUEUE, HANDLES>,
    tx: Option<Option<DmaSlice>>,
    rx: Option<Option<DmaSlice>>,
    circular: Option<bool>,
    callback: Option<(EventCallback, EventMask)>,
    result: Option<Result<Submission, TransferError>>,
    poisoned: bool,
}

impl<'h, 'u, H, D, const QUEUE: usize, const HANDLES: usize> TransferBuilder<'h, 'u, H, D, QUEUE, HANDLES>
where
    H: I2sHardware,
    D: Dispatcher,
{
    pub(crate) fn new(handle: &'h I2s<'u, H, D, QUEUE, HANDLES>) -> Self {
        Self {
            handle,
            tx: None,
            rx: None,
            circular: None,
            callback: None,
            result: None,
            poisoned: false,
        }
    }

    /// Transmit from a `'static` buffer. An empty slice means "no transmit".
    ///
    /// # Panics
    ///
    /// If the transmit buffer was already set, or the transfer was already
    /// committed.
    pub fn set_tx<T: Copy>(&mut self, buffer: &'static [T]) -> &mut Self {
        self.set_tx_dma(DmaSlice::from_static(buffer))
    }

    /// Receive into a `'static` buffer. An empty slice means "no receive".
    ///
    /// # Panics
    ///
    /// If the receive buffer was already set, or the transfer was already
    /// committed.
    pub fn set_rx<T: Copy>(&mut self, buffer: &'static mut [T]) -> &mut Self {
        self.set_rx_dma(DmaSlice::from_static_mut(buffer))
    }

    /// Transmit from a raw buffer view.
    ///
    /// # Panics
    ///
    /// As [`set_tx`](Self::set_tx).
    pub fn set_tx_dma(&mut self, buffer: DmaSlice) -> &mut Self {
        self.claim(self.tx.is_none(), "transmit buffer");
        self.tx = Some((!buffer.is_empty()).then_some(buffer));
        self
    }

    /// Receive into a raw buffer view.
    ///
    /// # Panics
    ///
    /// As [`set_rx`](Self::set_rx).
    pub fn set_rx_dma(&mut self, buffer: DmaSlice) -> &mut Self {
        self.claim(self.rx.is_none(), "receive buffer");
        self.rx = Some((!buffer.is_empty()).then_some(buffer));
        self
    }

    /// Restart the buffers from the beginning instead of finishing.
    ///
    /// # Panics
    ///
    /// If called twice, or after commit.
    pub fn set_circular(&mut self, circular: bool) -> &mut Self {
        self.claim(self.circular.is_none(), "circular mode");
        self.circular = Some(circular);
        self
    }

    /// Run `callback` (outside interrupt context) when any of `events` fires.
    ///
    /// # Panics
    ///
    /// If a callback was already set, or after commit.
    pub fn set_callback(&mut self, callback: EventCallback, events: EventMask) -> &mut Self {
        self.claim(self.callback.is_none(), "callback");
        self.callback = Some((callback, events & EventMask::ALL));
        self
    }

    /// Submit the transfer. Started and queued are both success; a full
    /// queue drops the transfer and reports [`TransferError::QueueFull`].
    ///
    /// Only the first call submits; later calls return the same result.
    pub fn commit(&mut self) -> Result<Submission, TransferError> {
        if let Some(result) = self.result {
            return result;
        }
        let result = self.handle.submit(self.descriptor());
        self.result = Some(result);
        result
    }

    /// `true` once the transfer has been submitted.
    pub fn is_committed(&self) -> bool {
        self.result.is_some()
    }

    fn descriptor(&self) -> TransferDescriptor {
        let (callback, events) = match self.callback {
            Some((callback, events)) => (Some(callback), events),
            None => (None, EventMask::NONE),
        };
        TransferDescriptor::new(
            self.tx.flatten(),
            self.rx.flatten(),
            self.circular.unwrap_or(false),
            callback,
            events,
        )
    }

    /// Fail fast on a second set of one field. A builder that tripped this
    /// never submits, not even from `Drop` during the unwind.
    fn claim(&mut self, unset: bool, field: &str) {
        assert!(self.result.is_none(), "transfer already committed");
        if !unset {
            self.poisoned = true;
        }
        assert!(unset, "{field} set twice");
    }
}

impl<H, D, const QUEUE: usize, const HANDLES: usize> Drop for TransferBuilder<'_, '_, H, D, QUEUE, HANDLES>
where
    H: I2sHardware,
    D: Dispatcher,
{
    fn drop(&mut self) {
        if self.poisoned {
            return;
        }
        // Result is cached for an explicit commit; nobody is left to read it here.
        let _ = self.commit();
    }
}
