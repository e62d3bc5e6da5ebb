//! # Input Normalization and Output Bounds
//!
//! The two fixed stages around every mixing strategy:
//!
//! 1. [`normalize_inputs`] runs before mixing and collapses raw inputs that are
//!    already expressed in channel units (> 1000) with `raw / 1000 - 1000`.
//! 2. [`enforce_bounds`] runs after mixing and clamps every channel into
//!    [`PWM_MIN`, `PWM_MAX`].
//!
//! ## Normalization quirk
//!
//! The rescale is not a linear map of 1000-2000 onto 0-1: a fed-back display
//! value of 1500 becomes `-998.5`, which mixes to roughly `-997_500` and is then
//! clamped to 1000. The analog signal is discarded rather than rescaled. This
//! is most likely a defect in the formula; it is preserved unchanged for
//! compatibility with the existing mixer output.
//!
//! ```
//! use anyrc_bridge::mixer::scaling::normalize_inputs;
//!
//! let normalized = normalize_inputs(&[1500, 1, 0, 1000, 0, 0, 0, 0]);
//! assert_eq!(normalized[0], -998.5);
//! assert_eq!(normalized[1], 1.0);
//! assert_eq!(normalized[3], 1000.0);
//! ```

use super::protocol::{ChannelVector, InputFrame, NUM_CHANNELS, PWM_MAX, PWM_MIN};

/// Raw values above this are treated as pre-scaled channel units.
pub const NORMALIZE_THRESHOLD: i32 = 1000;

/// Normalized inputs, one per channel.
pub type NormalizedInputs = [f64; NUM_CHANNELS];

/// Mixer output before clamping. May be far outside the PWM range.
pub type RawChannels = [f64; NUM_CHANNELS];

/// Rescales raw inputs above [`NORMALIZE_THRESHOLD`]; everything else passes
/// through unchanged.
#[must_use]
pub fn normalize_inputs(frame: &InputFrame) -> NormalizedInputs {
    frame.map(normalize_value)
}

#[inline]
fn normalize_value(raw: i32) -> f64 {
    if raw > NORMALIZE_THRESHOLD {
        f64::from(raw) / 1000.0 - 1000.0
    } else {
        f64::from(raw)
    }
}

/// Clamps mixer output into the PWM range and rounds to whole microseconds.
///
/// NaN never comes out of the built-in strategies; it is pinned to
/// [`PWM_MIN`] so a custom strategy cannot break the range invariant.
#[must_use]
pub fn enforce_bounds(raw: &RawChannels) -> ChannelVector {
    ChannelVector::from_clamped(raw.map(clamp_channel))
}

#[inline]
fn clamp_channel(value: f64) -> u16 {
    if value.is_nan() {
        return PWM_MIN;
    }
    value.clamp(f64::from(PWM_MIN), f64::from(PWM_MAX)).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Normalization Tests ====================

    #[test]
    fn test_digital_flags_pass_through() {
        let normalized = normalize_inputs(&[0, 1, 0, 1, 0, 1, 0, 1]);
        assert_eq!(normalized, [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let normalized = normalize_inputs(&[1000, 1001, 0, 0, 0, 0, 0, 0]);
        assert_eq!(normalized[0], 1000.0);
        assert!((normalized[1] - (-998.999)).abs() < 1e-9);
    }

    #[test]
    fn test_fed_back_display_value() {
        let normalized = normalize_inputs(&[1500, 2000, 0, 0, 0, 0, 0, 0]);
        assert_eq!(normalized[0], -998.5);
        assert_eq!(normalized[1], -998.0);
    }

    #[test]
    fn test_negative_values_pass_through() {
        let normalized = normalize_inputs(&[-5, -2000, 0, 0, 0, 0, 0, 0]);
        assert_eq!(normalized[0], -5.0);
        assert_eq!(normalized[1], -2000.0);
    }

    #[test]
    fn test_very_large_raw_value() {
        // 1_000_500 / 1000 - 1000 = 0.5
        let normalized = normalize_inputs(&[1_000_500, 0, 0, 0, 0, 0, 0, 0]);
        assert!((normalized[0] - 0.5).abs() < 1e-9);
    }

    // ==================== Bounds Tests ====================

    #[test]
    fn test_in_range_values_unchanged() {
        let channels = enforce_bounds(&[1000.0, 1100.0, 1500.0, 1999.0, 2000.0, 1001.0, 1250.0, 1750.0]);
        assert_eq!(channels.as_array(), &[1000, 1100, 1500, 1999, 2000, 1001, 1250, 1750]);
    }

    #[test]
    fn test_clamps_low_and_high() {
        let channels = enforce_bounds(&[-997_500.0, 999.0, 2001.0, 1e12, 0.0, -1.0, 3000.0, 1500.0]);
        assert_eq!(channels.as_array(), &[1000, 1000, 2000, 2000, 1000, 1000, 2000, 1500]);
    }

    #[test]
    fn test_rounds_fractional_values() {
        let channels = enforce_bounds(&[1500.4, 1500.6, 1000.2, 1999.7, 1500.0, 1500.0, 1500.0, 1500.0]);
        assert_eq!(channels[0], 1500);
        assert_eq!(channels[1], 1501);
        assert_eq!(channels[2], 1000);
        assert_eq!(channels[3], 2000);
    }

    #[test]
    fn test_nan_pinned_to_min() {
        let channels = enforce_bounds(&[f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 1500.0, 1500.0, 1500.0, 1500.0, 1500.0]);
        assert_eq!(channels[0], PWM_MIN);
        assert_eq!(channels[1], PWM_MAX);
        assert_eq!(channels[2], PWM_MIN);
    }
}
