//! Logical I2S handle.
//!
//! An [`I2s`] is one configured view of a physical [`I2sUnit`]. Several
//! handles with different formats or rates can share one unit; their
//! transfers go through the unit's single queue in submission order, and the
//! unit rewrites its registers whenever the next transfer belongs to a
//! different handle than the last one.

use platform::{I2sConfig, I2sFormat, I2sHardware, I2sMode, I2sProtocol, SampleRateHz};

use crate::builder::TransferBuilder;
use crate::config_cache::HandleId;
use crate::descriptor::{QueueEntry, TransferDescriptor};
use crate::dispatch::Dispatcher;
use crate::error::TransferError;
use crate::session::{Submission, TransferStatus};
use crate::unit::{I2sUnit, UnitId};

/// Logical handle bound to a shared [`I2sUnit`].
///
/// Dropping the handle frees its slot and discards its transfers that are
/// still queued. A transfer of this handle that is already running is left
/// to finish.
pub struct I2s<'u, H, D, const QUEUE: usize, const HANDLES: usize>
where
    H: I2sHardware,
    D: Dispatcher,
{
    unit: &'u I2sUnit<H, D, QUEUE, HANDLES>,
    id: HandleId,
}

impl<'u, H, D, const QUEUE: usize, const HANDLES: usize> I2s<'u, H, D, QUEUE, HANDLES>
where
    H: I2sHardware,
    D: Dispatcher,
{
    pub(crate) fn new(unit: &'u I2sUnit<H, D, QUEUE, HANDLES>, id: HandleId) -> Self {
        Self { unit, id }
    }

    /// This handle's identity within its unit.
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The physical unit this handle drives.
    pub fn unit_id(&self) -> UnitId {
        self.unit.id()
    }

    /// Current configuration of this handle.
    pub fn config(&self) -> I2sConfig {
        self.unit
            .lock(|session| session.registry().config(self.id))
            .unwrap_or_default()
    }

    /// Replace the whole configuration.
    ///
    /// Like every mutator, this only records the change and invalidates the
    /// unit's configuration cache. The registers are written at the next
    /// [`acquire`](Self::acquire), which every transfer start performs, so a
    /// transfer that is already running keeps its settings.
    pub fn configure(&self, config: I2sConfig) {
        self.update(|current| *current = config);
    }

    /// Set data width, frame width and clock polarity.
    pub fn set_format(&self, format: I2sFormat) {
        self.update(|current| current.format = format);
    }

    /// Set the frame rate.
    pub fn set_audio_frequency(&self, frequency: SampleRateHz) {
        self.update(|current| current.frequency = frequency);
    }

    /// Set the frame alignment protocol.
    pub fn set_protocol(&self, protocol: I2sProtocol) {
        self.update(|current| current.protocol = protocol);
    }

    /// Set direction and clock ownership.
    pub fn set_mode(&self, mode: I2sMode) {
        self.update(|current| current.mode = mode);
    }

    fn update(&self, change: impl FnOnce(&mut I2sConfig)) {
        self.unit
            .lock(|session| session.registry_mut().update(self.id, change));
    }

    /// Write this handle's configuration to the unit unless it is already
    /// there. Returns `true` if the registers were written.
    ///
    /// While the unit is busy nothing is written and this returns `false`;
    /// the configuration is applied when this handle's next transfer starts.
    pub fn acquire(&self) -> bool {
        self.unit.lock(|session| session.acquire(self.id))
    }

    /// Start describing a transfer. It is submitted on
    /// [`commit`](TransferBuilder::commit) or when the builder is dropped.
    pub fn begin_transfer(&self) -> TransferBuilder<'_, 'u, H, D, QUEUE, HANDLES> {
        TransferBuilder::new(self)
    }

    pub(crate) fn submit(&self, descriptor: TransferDescriptor) -> Result<Submission, TransferError> {
        let entry = QueueEntry {
            handle: self.id,
            descriptor,
        };
        self.unit.lock(|session| session.submit(entry))
    }

    /// See [`I2sUnit::abort_transfer`].
    pub fn abort_transfer(&self) {
        self.unit.abort_transfer();
    }

    /// See [`I2sUnit::clear_transfer_buffer`].
    pub fn clear_transfer_buffer(&self) {
        self.unit.clear_transfer_buffer();
    }

    /// See [`I2sUnit::abort_all_transfers`].
    pub fn abort_all_transfers(&self) {
        self.unit.abort_all_transfers();
    }

    /// Busy or idle state of the shared unit.
    pub fn get_transfer_status(&self) -> TransferStatus {
        self.unit.status()
    }
}

impl<H, D, const QUEUE: usize, const HANDLES: usize> Drop for I2s<'_, H, D, QUEUE, HANDLES>
where
    H: I2sHardware,
    D: Dispatcher,
{
    fn drop(&mut self) {
        let id = self.id;
        self.unit.lock(|session| session.release_handle(id));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dispatch::CompletionChannel;
    use embassy_sync::channel::Channel;
    use platform::mocks::MockI2s;

    type Unit<'c> = I2sUnit<MockI2s, &'c CompletionChannel<4>, 4, 2>;

    #[test]
    fn handles_share_unit_identity() {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(3), MockI2s::new(), &channel);
        let a = unit.handle(I2sConfig::DEFAULT).unwrap();
        let b = unit.handle(I2sConfig::DEFAULT).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.unit_id(), UnitId::new(3));
        assert_eq!(b.unit_id().get(), 3);
    }

    #[test]
    fn third_handle_on_two_slot_unit_fails() {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(0), MockI2s::new(), &channel);
        let _a = unit.handle(I2sConfig::DEFAULT).unwrap();
        let _b = unit.handle(I2sConfig::DEFAULT).unwrap();
        assert_eq!(
            unit.handle(I2sConfig::DEFAULT).err(),
            Some(TransferError::NoFreeHandle)
        );
    }

    #[test]
    fn dropping_handle_frees_slot() {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(0), MockI2s::new(), &channel);
        let a = unit.handle(I2sConfig::DEFAULT).unwrap();
        let _b = unit.handle(I2sConfig::DEFAULT).unwrap();
        drop(a);
        assert!(unit.handle(I2sConfig::DEFAULT).is_ok());
    }

    #[test]
    fn setters_update_config() {
        let channel: CompletionChannel<4> = Channel::new();
        let unit: Unit<'_> = I2sUnit::new(UnitId::new(0), MockI2s::new(), &channel);
        let h = unit.handle(I2sConfig::DEFAULT).unwrap();
        let rate = SampleRateHz::new(96_000).unwrap();
        h.set_audio_frequency(rate);
        h.set_protocol(I2sProtocol::PcmShort);
        h.set_mode(I2sMode::SlaveRx);
        let cfg = h.config();
        assert_eq!(cfg.frequency, rate);
        assert_eq!(cfg.protocol, I2sProtocol::PcmShort);
        assert_eq!(cfg.mode, I2sMode::SlaveRx);
        // Recording only: nothing written yet.
        assert_eq!(unit.with_hardware(|hw| hw.config_applications()), 0);
    }
}
