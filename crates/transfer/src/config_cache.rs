//! Per-unit configuration registry and last-owner cache.
//!
//! Several logical handles may drive one physical unit, each with its own
//! format, frequency, protocol and mode. The unit's registers can only hold
//! one of those at a time, so the registry remembers which handle's
//! configuration was written last and only rewrites the registers when a
//! different handle (or a changed configuration) needs the unit.
//!
//! ```text
//! acquire(H1)  owner: None -> H1   apply(H1)
//! acquire(H1)  owner: H1           (nothing)
//! acquire(H2)  owner: H1 -> H2     apply(H2)
//! set_*(H2)    owner: H2 -> None
//! acquire(H2)  owner: None -> H2   apply(H2)
//! ```
//!
//! Each [`I2sUnit`](crate::I2sUnit) owns exactly one registry, so units never
//! share an owner notion.

use platform::{I2sConfig, I2sHardware};

/// Identity of a logical handle within its unit.
///
/// Slot indices are reused once a handle is dropped; the generation tells a
/// replaced handle apart from the one that now holds its slot. A
/// [`Completion`](crate::Completion) of a transfer that outlived its handle
/// therefore never compares equal to the new handle's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandleId {
    slot: u8,
    generation: u8,
}

impl HandleId {
    #[cfg(test)]
    pub(crate) const fn from_index(slot: u8) -> Self {
        Self { slot, generation: 0 }
    }

    /// Slot index of this handle in its unit's registry.
    pub const fn index(self) -> usize {
        self.slot as usize
    }

    /// How many handles held this slot before this one (wrapping).
    pub const fn generation(self) -> u8 {
        self.generation
    }
}

/// Handle slots plus the identity of the handle whose configuration is
/// currently in the unit's registers.
pub(crate) struct ConfigRegistry<const N: usize> {
    slots: [Option<I2sConfig>; N],
    generations: [u8; N],
    owner: Option<HandleId>,
}

impl<const N: usize> ConfigRegistry<N> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: [None; N],
            generations: [0; N],
            owner: None,
        }
    }

    /// Claim a free slot for a new handle.
    pub(crate) fn register(&mut self, config: I2sConfig) -> Option<HandleId> {
        let (index, (slot, generation)) = self
            .slots
            .iter_mut()
            .zip(self.generations.iter())
            .enumerate()
            .find(|(_, (slot, _))| slot.is_none())?;
        let id = HandleId {
            slot: u8::try_from(index).ok()?,
            generation: *generation,
        };
        *slot = Some(config);
        Some(id)
    }

    fn is_live(&self, id: HandleId) -> bool {
        self.generations.get(id.index()) == Some(&id.generation)
    }

    /// Free `id`'s slot and start a new generation for it. If it owned the
    /// registers, the next acquire by whoever reuses the slot must rewrite
    /// them.
    pub(crate) fn release(&mut self, id: HandleId) {
        if !self.is_live(id) {
            return;
        }
        if let Some(slot) = self.slots.get_mut(id.index()) {
            *slot = None;
        }
        if let Some(generation) = self.generations.get_mut(id.index()) {
            *generation = generation.wrapping_add(1);
        }
        if self.owner == Some(id) {
            self.owner = None;
        }
    }

    pub(crate) fn config(&self, id: HandleId) -> Option<I2sConfig> {
        if !self.is_live(id) {
            return None;
        }
        self.slots.get(id.index()).copied().flatten()
    }

    /// Change `id`'s configuration. Always invalidates the owner cache.
    pub(crate) fn update(&mut self, id: HandleId, change: impl FnOnce(&mut I2sConfig)) {
        if self.is_live(id) {
            if let Some(Some(config)) = self.slots.get_mut(id.index()) {
                change(config);
            }
        }
        self.invalidate();
    }

    /// Forget which handle owns the registers.
    pub(crate) fn invalidate(&mut self) {
        self.owner = None;
    }

    pub(crate) fn owner(&self) -> Option<HandleId> {
        self.owner
    }

    /// Make `id`'s configuration the one in the unit's registers.
    ///
    /// Returns `true` if the registers were written.
    pub(crate) fn acquire<H: I2sHardware>(&mut self, id: HandleId, hardware: &mut H) -> bool {
        if self.owner == Some(id) {
            return false;
        }
        let Some(config) = self.config(id) else {
            return false;
        };
        hardware.apply_config(&config);
        self.owner = Some(id);

        #[cfg(feature = "defmt")]
        defmt::debug!("i2s: applied config of handle {}", id);

        true
    }
}
