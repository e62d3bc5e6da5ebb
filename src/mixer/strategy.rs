//! # Mixing Strategies
//!
//! A [`MixingStrategy`] turns one frame of normalized inputs (plus the
//! previous channel state, for stateful modes) into raw channel values.
//! Bounds are enforced afterwards by the engine, so strategies are free to
//! produce out-of-range intermediates.
//!
//! ## Direct mapping (Default, Custom)
//!
//! `channel[i] = input[i] * 1000 + 1000`, so a digital flag maps 0 -> 1000 and
//! 1 -> 2000. Prior channel values are ignored.
//!
//! ## Keyboard
//!
//! | Channel | Input | Behaviour |
//! |---------|-------|-----------|
//! | CH1 | IN1 / IN2 | +100 / -100 per tick while held |
//! | CH2 | IN3 / IN4 | +100 / -100 per tick while held |
//! | CH3-CH6 | IN5-IN8 | Direct mapping |
//! | CH7-CH8 | - | Fixed at 1500 |

use std::fmt;

use super::mode::ProcessMode;
use super::protocol::{ChannelVector, NUM_CHANNELS, PWM_CENTER};
use super::scaling::{NormalizedInputs, RawChannels};

/// Per-tick trim step applied by the keyboard strategy, in microseconds.
pub const TRIM_STEP: f64 = 100.0;

/// Scale applied by the direct mapping.
const DIRECT_SCALE: f64 = 1000.0;

/// Offset applied by the direct mapping.
const DIRECT_OFFSET: f64 = 1000.0;

/// A pluggable mixing function.
///
/// The engine owns exactly one strategy at a time and may swap it between
/// ticks.
pub trait MixingStrategy: Send + fmt::Debug {
    /// Mode this strategy implements.
    fn mode(&self) -> ProcessMode;

    /// Mixes one frame. `previous` is the clamped output of the last tick.
    fn mix(&self, inputs: &NormalizedInputs, previous: &ChannelVector) -> RawChannels;
}

/// Builds the built-in strategy for a mode.
#[must_use]
pub fn strategy_for(mode: ProcessMode) -> Box<dyn MixingStrategy> {
    match mode {
        ProcessMode::Default | ProcessMode::Custom => Box::new(DirectMix::new(mode)),
        ProcessMode::Keyboard => Box::new(KeyboardMix),
    }
}

#[inline]
fn direct(input: f64) -> f64 {
    input * DIRECT_SCALE + DIRECT_OFFSET
}

#[inline]
fn is_pressed(input: f64) -> bool {
    input == 1.0
}

/// Direct mapping of every input onto its channel.
#[derive(Debug, Clone, Copy)]
pub struct DirectMix {
    mode: ProcessMode,
}

impl DirectMix {
    /// Creates a direct mixer reporting the given mode.
    #[must_use]
    pub fn new(mode: ProcessMode) -> Self {
        Self { mode }
    }
}

impl MixingStrategy for DirectMix {
    fn mode(&self) -> ProcessMode {
        self.mode
    }

    fn mix(&self, inputs: &NormalizedInputs, _previous: &ChannelVector) -> RawChannels {
        inputs.map(direct)
    }
}

/// Trim keys on the first two channels, direct mapping on the next four.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardMix;

impl KeyboardMix {
    fn trim(current: u16, up: f64, down: f64) -> f64 {
        let mut value = f64::from(current);
        if is_pressed(up) {
            value += TRIM_STEP;
        }
        if is_pressed(down) {
            value -= TRIM_STEP;
        }
        value
    }
}

impl MixingStrategy for KeyboardMix {
    fn mode(&self) -> ProcessMode {
        ProcessMode::Keyboard
    }

    fn mix(&self, inputs: &NormalizedInputs, previous: &ChannelVector) -> RawChannels {
        let mut out: RawChannels = [f64::from(PWM_CENTER); NUM_CHANNELS];

        out[0] = Self::trim(previous[0], inputs[0], inputs[1]);
        out[1] = Self::trim(previous[1], inputs[2], inputs[3]);

        for (channel, &input) in out[2..6].iter_mut().zip(&inputs[4..8]) {
            *channel = direct(input);
        }

        // CH7 and CH8 stay at PWM_CENTER
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous(values: [u16; NUM_CHANNELS]) -> ChannelVector {
        ChannelVector::new(values).unwrap()
    }

    // ==================== Factory Tests ====================

    #[test]
    fn test_strategy_for_reports_mode() {
        for mode in ProcessMode::ALL {
            assert_eq!(strategy_for(mode).mode(), mode);
        }
    }

    // ==================== Direct Mapping Tests ====================

    #[test]
    fn test_direct_maps_flags() {
        let mix = DirectMix::new(ProcessMode::Default);
        let out = mix.mix(&[0.0, 1.0, 0.0, 1.0, 0.5, 0.0, 1.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out, [1000.0, 2000.0, 1000.0, 2000.0, 1500.0, 1000.0, 2000.0, 1000.0]);
    }

    #[test]
    fn test_direct_ignores_previous_state() {
        let mix = DirectMix::new(ProcessMode::Custom);
        let inputs = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let a = mix.mix(&inputs, &previous([1000; NUM_CHANNELS]));
        let b = mix.mix(&inputs, &previous([2000; NUM_CHANNELS]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_direct_produces_out_of_range_intermediates() {
        let mix = DirectMix::new(ProcessMode::Default);
        let out = mix.mix(&[-998.5, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out[0], -997_500.0);
        assert_eq!(out[1], 6000.0);
    }

    // ==================== Keyboard Tests ====================

    #[test]
    fn test_keyboard_increment_channel_one() {
        let out = KeyboardMix.mix(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out[0], 1600.0);
        assert_eq!(out[1], 1500.0);
    }

    #[test]
    fn test_keyboard_decrement_channel_two() {
        let out = KeyboardMix.mix(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out[0], 1500.0);
        assert_eq!(out[1], 1400.0);
    }

    #[test]
    fn test_keyboard_both_flags_cancel() {
        let out = KeyboardMix.mix(&[1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out[0], 1500.0);
        assert_eq!(out[1], 1500.0);
    }

    #[test]
    fn test_keyboard_trim_only_on_exact_one() {
        let out = KeyboardMix.mix(&[2.0, 0.5, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0], &ChannelVector::neutral());
        assert_eq!(out[0], 1500.0);
        assert_eq!(out[1], 1500.0);
    }

    #[test]
    fn test_keyboard_direct_and_fixed_channels() {
        let prev = previous([1200, 1800, 2000, 2000, 2000, 2000, 1000, 1000]);
        let out = KeyboardMix.mix(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0], &prev);

        assert_eq!(out[0], 1200.0);
        assert_eq!(out[1], 1800.0);
        assert_eq!(&out[2..6], &[2000.0, 1000.0, 2000.0, 1000.0]);
        assert_eq!(out[6], 1500.0);
        assert_eq!(out[7], 1500.0);
    }

    #[test]
    fn test_keyboard_accumulates_from_previous() {
        let prev = previous([1950, 1050, 1500, 1500, 1500, 1500, 1500, 1500]);
        let out = KeyboardMix.mix(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], &prev);
        // Engine clamps these back to 2000 / 1000
        assert_eq!(out[0], 2050.0);
        assert_eq!(out[1], 950.0);
    }
}
