//! Property-based tests for I2S configuration math.
//! Verifies invariants hold for ALL inputs, not just fixed examples.

use platform::i2s_config::{I2sFormat, Polarity, SampleRateHz};

proptest::proptest! {
    /// SampleRateHz::new never panics for any u32 input.
    #[test]
    fn sample_rate_hz_new_never_panics(hz in 0u32..=u32::MAX) {
        let _ = SampleRateHz::new(hz);
    }

    /// SampleRateHz valid range [8000, 768000] always succeeds and round-trips.
    #[test]
    fn sample_rate_hz_valid_range_always_ok(hz in 8000u32..=768_000u32) {
        let rate = SampleRateHz::new(hz);
        assert!(rate.is_ok(), "SampleRateHz::new({}) should be Ok", hz);
        assert_eq!(rate.map(SampleRateHz::get), Ok(hz));
    }

    /// SampleRateHz out of range always fails.
    #[test]
    fn sample_rate_hz_out_of_range_always_err(hz in 768_001u32..=u32::MAX) {
        assert!(SampleRateHz::new(hz).is_err());
    }

    /// A format is accepted exactly when 8 <= data <= frame <= 32.
    #[test]
    fn format_acceptance_matches_bounds(data in 0u8..=64u8, frame in 0u8..=64u8) {
        let ok = I2sFormat::new(data, frame, Polarity::Normal).is_ok();
        let expected = (8..=32).contains(&frame) && (8..=frame).contains(&data);
        assert_eq!(ok, expected, "data={} frame={}", data, frame);
    }
}
