//! I2S peripheral configuration newtypes.
//!
//! The numeric register encoding of these values belongs to the HAL that
//! implements [`I2sHardware`](crate::i2s::I2sHardware); this module only
//! guarantees that what reaches `apply_config` is in range:
//! - `SampleRateHz`: 8000–768000 Hz
//! - `I2sFormat`: data word 8–32 bits inside a frame of at most 32 bits

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "value {} out of range {}..={}",
            self.value, self.min, self.max
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OutOfRangeError {}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Audio frame rate in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 768000 Hz.
    pub const MAX_HZ: u32 = 768_000;

    /// CD rate, the power-on default of the peripheral.
    pub const CD: Self = Self(44_100);

    /// Create a `SampleRateHz`, returning an error if out of 8000–768000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 768000`.
    pub const fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if hz < Self::MIN_HZ || hz > Self::MAX_HZ {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

// ── I2sFormat ────────────────────────────────────────────────────────────────

/// Clock polarity of the serial bit clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Data latched on the rising edge of SCK.
    Normal,
    /// Data latched on the falling edge of SCK.
    Inverted,
}

/// Word layout on the wire: valid data bits inside a channel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sFormat {
    data_bits: u8,
    frame_bits: u8,
    polarity: Polarity,
}

impl I2sFormat {
    /// Smallest data word supported.
    pub const MIN_DATA_BITS: u8 = 8;

    /// Largest channel frame supported.
    pub const MAX_FRAME_BITS: u8 = 32;

    /// 16-bit samples in 16-bit frames, normal polarity.
    pub const PCM16: Self = Self {
        data_bits: 16,
        frame_bits: 16,
        polarity: Polarity::Normal,
    };

    /// Build a format.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] for `data_bits` outside
    /// `8..=frame_bits`, or `frame_bits` above 32.
    pub const fn new(
        data_bits: u8,
        frame_bits: u8,
        polarity: Polarity,
    ) -> Result<Self, OutOfRangeError> {
        if frame_bits > Self::MAX_FRAME_BITS || frame_bits < Self::MIN_DATA_BITS {
            return Err(OutOfRangeError {
                value: frame_bits as u32,
                min: Self::MIN_DATA_BITS as u32,
                max: Self::MAX_FRAME_BITS as u32,
            });
        }
        if data_bits < Self::MIN_DATA_BITS || data_bits > frame_bits {
            return Err(OutOfRangeError {
                value: data_bits as u32,
                min: Self::MIN_DATA_BITS as u32,
                max: frame_bits as u32,
            });
        }
        Ok(Self {
            data_bits,
            frame_bits,
            polarity,
        })
    }

    /// Valid data bits per sample.
    pub const fn data_bits(&self) -> u8 {
        self.data_bits
    }

    /// Bits per channel frame.
    pub const fn frame_bits(&self) -> u8 {
        self.frame_bits
    }

    /// Bit-clock polarity.
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }
}

// ── Protocol / mode ──────────────────────────────────────────────────────────

/// Frame alignment protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sProtocol {
    /// Philips I2S: data delayed one bit after WS transition.
    Philips,
    /// Left-justified (MSB aligned with WS).
    Msb,
    /// Right-justified (LSB aligned with the end of the frame).
    Lsb,
    /// PCM with a one-bit frame sync pulse.
    PcmShort,
    /// PCM with a frame sync as long as the data word.
    PcmLong,
}

/// Direction and clock ownership of the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2sMode {
    /// Drives the clocks and transmits.
    MasterTx,
    /// Drives the clocks and receives.
    MasterRx,
    /// Follows external clocks and transmits.
    SlaveTx,
    /// Follows external clocks and receives.
    SlaveRx,
}

impl I2sMode {
    /// `true` when this end generates SCK and WS.
    pub const fn is_master(self) -> bool {
        matches!(self, Self::MasterTx | Self::MasterRx)
    }
}

// ── I2sConfig ────────────────────────────────────────────────────────────────

/// Complete configuration applied to a physical unit before a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sConfig {
    /// Word layout.
    pub format: I2sFormat,
    /// Frame rate.
    pub frequency: SampleRateHz,
    /// Frame alignment.
    pub protocol: I2sProtocol,
    /// Direction and clock ownership.
    pub mode: I2sMode,
}

impl I2sConfig {
    /// Power-on configuration: 16/16 bit, 44.1 kHz, Philips, master transmit.
    pub const DEFAULT: Self = Self {
        format: I2sFormat::PCM16,
        frequency: SampleRateHz::CD,
        protocol: I2sProtocol::Philips,
        mode: I2sMode::MasterTx,
    };

    /// Bit clock for a stereo frame: `frame_bits` × 2 × fs.
    pub fn bclk_hz(&self) -> u32 {
        u32::from(self.format.frame_bits())
            .saturating_mul(2)
            .saturating_mul(self.frequency.get())
    }
}

impl Default for I2sConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_power_on_state() {
        let cfg = I2sConfig::default();
        assert_eq!(cfg.format.data_bits(), 16);
        assert_eq!(cfg.format.frame_bits(), 16);
        assert_eq!(cfg.format.polarity(), Polarity::Normal);
        assert_eq!(cfg.frequency.get(), 44_100);
        assert_eq!(cfg.protocol, I2sProtocol::Philips);
        assert_eq!(cfg.mode, I2sMode::MasterTx);
    }

    #[test]
    fn bclk_for_cd_audio() {
        // 16 bits × 2 channels × 44 100 = 1.4112 MHz
        assert_eq!(I2sConfig::DEFAULT.bclk_hz(), 1_411_200);
    }

    #[test]
    fn data_wider_than_frame_is_rejected() {
        let err = I2sFormat::new(24, 16, Polarity::Normal).unwrap_err();
        assert_eq!(err.value, 24);
        assert_eq!(err.max, 16);
    }

    #[test]
    fn frame_above_32_bits_is_rejected() {
        assert!(I2sFormat::new(24, 48, Polarity::Normal).is_err());
    }

    #[test]
    fn twenty_four_in_thirty_two_is_valid() {
        let fmt = I2sFormat::new(24, 32, Polarity::Inverted).expect("valid format");
        assert_eq!(fmt.data_bits(), 24);
        assert_eq!(fmt.frame_bits(), 32);
    }

    #[test]
    fn master_modes() {
        assert!(I2sMode::MasterTx.is_master());
        assert!(I2sMode::MasterRx.is_master());
        assert!(!I2sMode::SlaveRx.is_master());
    }
}
