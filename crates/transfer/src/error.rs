//! Transfer manager errors

/// Errors returned to the caller that submitted or bound something.
///
/// Interrupt-context code never produces these; they only surface from
/// foreground calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// The unit was busy and its pending-transfer queue is at capacity.
    /// The submission was dropped; state is unchanged.
    QueueFull,
    /// Every handle slot of the unit is in use.
    NoFreeHandle,
}

impl TransferError {
    /// Legacy integer result code (`-1` for every failure).
    pub const fn code(self) -> i32 {
        -1
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TransferError {}

impl core::fmt::Display for TransferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull => write!(f, "Transfer queue is full"),
            Self::NoFreeHandle => write!(f, "No free handle slot on I2S unit"),
        }
    }
}
