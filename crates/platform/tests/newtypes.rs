//! Type system enforcement tests for I2S configuration newtypes.
//! Out-of-range values must be rejected before they reach `apply_config`.

#![allow(clippy::unwrap_used)] // Tests use unwrap() for readable assertions

// ── SampleRateHz ─────────────────────────────────────────────────────────────

#[test]
fn sample_rate_accepts_bounds() {
    use platform::i2s_config::SampleRateHz;
    assert!(SampleRateHz::new(8_000).is_ok());
    assert!(SampleRateHz::new(768_000).is_ok());
}

#[test]
fn sample_rate_rejects_just_outside_bounds() {
    use platform::i2s_config::SampleRateHz;
    let low = SampleRateHz::new(7_999).unwrap_err();
    assert_eq!(low.min, 8_000);
    let high = SampleRateHz::new(768_001).unwrap_err();
    assert_eq!(high.max, 768_000);
}

#[test]
fn sample_rate_is_one_word() {
    use platform::i2s_config::SampleRateHz;
    assert_eq!(core::mem::size_of::<SampleRateHz>(), 4);
}

// ── I2sFormat ────────────────────────────────────────────────────────────────

#[test]
fn format_rejects_tiny_words() {
    use platform::i2s_config::{I2sFormat, Polarity};
    assert!(I2sFormat::new(4, 16, Polarity::Normal).is_err());
}

#[test]
fn format_pcm16_constant_is_valid() {
    use platform::i2s_config::{I2sFormat, Polarity};
    let built = I2sFormat::new(16, 16, Polarity::Normal).unwrap();
    assert_eq!(built, I2sFormat::PCM16);
}

// ── EventMask ────────────────────────────────────────────────────────────────

#[test]
fn event_mask_is_one_word() {
    use platform::EventMask;
    assert_eq!(core::mem::size_of::<EventMask>(), 4);
}

#[test]
fn event_mask_round_trips_bits() {
    use platform::EventMask;
    let m = EventMask::from_bits(EventMask::TX_COMPLETE.bits() | EventMask::RX_OVERFLOW.bits());
    assert!(m.contains(EventMask::TX_COMPLETE));
    assert!(m.contains(EventMask::RX_OVERFLOW));
    assert!(!m.contains(EventMask::RX_COMPLETE));
}
