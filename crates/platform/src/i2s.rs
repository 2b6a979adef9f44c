//! I2S hardware transfer primitive
//!
//! [`I2sHardware`] is the seam between the transfer manager and the
//! register-level driver of one physical I2S unit. Every method is
//! synchronous and bounded: `start` kicks off DMA and returns, completion is
//! reported later by the unit's TX/RX interrupts, whose handlers call back
//! into the transfer manager, which then reads the cause with
//! [`I2sHardware::read_event`].

use core::ops::{BitAnd, BitOr, BitOrAssign};

use crate::dma::DmaSlice;
use crate::i2s_config::I2sConfig;

/// One direction of a duplex unit. Each has its own completion interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sChannel {
    /// Transmit direction.
    Tx,
    /// Receive direction.
    Rx,
}

impl I2sChannel {
    /// Both channels, TX first.
    pub const ALL: [Self; 2] = [Self::Tx, Self::Rx];

    /// Stable index (TX = 0, RX = 1) for per-channel tables.
    pub const fn index(self) -> usize {
        match self {
            Self::Tx => 0,
            Self::Rx => 1,
        }
    }
}

/// Bitmask of transfer events reported by the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct EventMask(u32);

impl EventMask {
    /// No events.
    pub const NONE: Self = Self(0);
    /// Receive buffer filled.
    pub const RX_COMPLETE: Self = Self(1 << 1);
    /// Transmit buffer drained.
    pub const TX_COMPLETE: Self = Self(1 << 2);
    /// First half of the receive buffer filled.
    pub const RX_HALF_COMPLETE: Self = Self(1 << 3);
    /// First half of the transmit buffer drained.
    pub const TX_HALF_COMPLETE: Self = Self(1 << 4);
    /// Receive FIFO overflowed.
    pub const RX_OVERFLOW: Self = Self(1 << 5);
    /// Transmit FIFO ran dry.
    pub const TX_UNDERRUN: Self = Self(1 << 6);
    /// Every event a caller can subscribe to.
    pub const ALL: Self = Self(
        Self::RX_COMPLETE.0
            | Self::TX_COMPLETE.0
            | Self::RX_HALF_COMPLETE.0
            | Self::TX_HALF_COMPLETE.0
            | Self::RX_OVERFLOW.0
            | Self::TX_UNDERRUN.0,
    );
    /// Driver-internal: the whole transfer finished (never delivered to callbacks).
    pub const INTERNAL_TRANSFER_COMPLETE: Self = Self(1 << 30);
    /// Events that mean a buffer, or the whole transfer, reached its end.
    pub const COMPLETION: Self = Self(
        Self::RX_COMPLETE.0 | Self::TX_COMPLETE.0 | Self::INTERNAL_TRANSFER_COMPLETE.0,
    );

    /// Build a mask from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// `true` when no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` when every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` when `self` and `other` share at least one bit.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Bits set in both masks.
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Bits set in either mask.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitAnd for EventMask {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitOr for EventMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for EventMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Everything the hardware needs to start one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    /// Data to send, if any.
    pub tx: Option<DmaSlice>,
    /// Storage to receive into, if any.
    pub rx: Option<DmaSlice>,
    /// Restart from the beginning of the buffers instead of stopping.
    pub circular: bool,
    /// Events the caller wants raised.
    pub events: EventMask,
}

/// Register-level driver of one physical I2S unit.
///
/// Implementations are called with interrupts of the unit masked, from both
/// thread mode and the unit's own interrupt handlers. They must not block.
pub trait I2sHardware {
    /// Program DMA for `request` and start clocking data.
    fn start(&mut self, request: &StartRequest);

    /// Stop the running transfer. No-op when nothing is running.
    fn abort(&mut self);

    /// Read and acknowledge the pending events of `channel`.
    ///
    /// When the transfer has ended, the returned mask must contain a
    /// completion event ([`EventMask::COMPLETION`]) whether or not the caller
    /// subscribed to it, and [`is_active`](Self::is_active) must already
    /// return `false`.
    fn read_event(&mut self, channel: I2sChannel) -> EventMask;

    /// `true` while a transfer is running on the unit.
    fn is_active(&self) -> bool;

    /// Write format, frequency, protocol and mode to the unit.
    fn apply_config(&mut self, config: &I2sConfig);
}

impl<T: I2sHardware + ?Sized> I2sHardware for &mut T {
    fn start(&mut self, request: &StartRequest) {
        (**self).start(request);
    }

    fn abort(&mut self) {
        (**self).abort();
    }

    fn read_event(&mut self, channel: I2sChannel) -> EventMask {
        (**self).read_event(channel)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn apply_config(&mut self, config: &I2sConfig) {
        (**self).apply_config(config);
    }
}
