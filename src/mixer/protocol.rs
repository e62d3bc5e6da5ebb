//! # Channel Constants and Types
//!
//! Core definitions shared by the mixing engine, the sinks and the transport.

use std::fmt;
use std::ops::Index;

use crate::error::{AnyRcError, Result};

/// Number of RC channels (and raw inputs per frame)
pub const NUM_CHANNELS: usize = 8;

/// PWM pulse width range in microseconds
pub const PWM_MIN: u16 = 1000;
pub const PWM_MAX: u16 = 2000;
pub const PWM_CENTER: u16 = 1500;

/// One tick worth of raw operator inputs.
///
/// Values are either digital flags (0/1) or pre-scaled analog magnitudes
/// such as a joystick axis already rendered into 1000-2000.
pub type InputFrame = [i32; NUM_CHANNELS];

/// Eight PWM channel values, each guaranteed to lie in [`PWM_MIN`, `PWM_MAX`].
///
/// # Examples
///
/// ```
/// use anyrc_bridge::mixer::protocol::{ChannelVector, PWM_CENTER};
///
/// let channels = ChannelVector::neutral();
/// assert!(channels.as_array().iter().all(|&c| c == PWM_CENTER));
///
/// assert!(ChannelVector::new([1000, 2000, 1500, 1500, 1500, 1500, 1500, 2001]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelVector([u16; NUM_CHANNELS]);

impl Default for ChannelVector {
    fn default() -> Self {
        Self::neutral()
    }
}

impl ChannelVector {
    /// All channels centered at [`PWM_CENTER`].
    #[must_use]
    pub const fn neutral() -> Self {
        Self([PWM_CENTER; NUM_CHANNELS])
    }

    /// Builds a channel vector, rejecting any value outside the PWM range.
    ///
    /// # Errors
    ///
    /// Returns `ChannelOutOfRange` for the first offending channel.
    pub fn new(values: [u16; NUM_CHANNELS]) -> Result<Self> {
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !(PWM_MIN..=PWM_MAX).contains(*v))
        {
            return Err(AnyRcError::ChannelOutOfRange { index, value });
        }
        Ok(Self(values))
    }

    /// Builds a channel vector from values the caller has already clamped.
    pub(crate) const fn from_clamped(values: [u16; NUM_CHANNELS]) -> Self {
        Self(values)
    }

    /// Returns the raw channel values.
    #[must_use]
    pub const fn as_array(&self) -> &[u16; NUM_CHANNELS] {
        &self.0
    }

    /// Returns the value of a single channel (0-based), if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }
}

impl Index<usize> for ChannelVector {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.0[index]
    }
}

/// Renders one `CH<n>: <value>` line per channel (1-based, like the
/// channel labels on a transmitter).
impl fmt::Display for ChannelVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "CH{}: {}", i + 1, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(NUM_CHANNELS, 8);
        assert_eq!(PWM_MIN, 1000);
        assert_eq!(PWM_MAX, 2000);
        assert_eq!(PWM_CENTER, 1500);
    }

    #[test]
    fn test_neutral_is_default() {
        assert_eq!(ChannelVector::default(), ChannelVector::neutral());
        assert_eq!(ChannelVector::neutral().as_array(), &[1500; 8]);
    }

    #[test]
    fn test_new_accepts_range_edges() {
        let values = [1000, 2000, 1500, 1000, 2000, 1234, 1999, 1001];
        let channels = ChannelVector::new(values).unwrap();
        assert_eq!(channels.as_array(), &values);
    }

    #[test]
    fn test_new_rejects_below_min() {
        let result = ChannelVector::new([1500, 999, 1500, 1500, 1500, 1500, 1500, 1500]);
        match result {
            Err(AnyRcError::ChannelOutOfRange { index, value }) => {
                assert_eq!(index, 1);
                assert_eq!(value, 999);
            }
            other => panic!("Expected ChannelOutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_above_max() {
        let result = ChannelVector::new([1500, 1500, 1500, 1500, 1500, 1500, 1500, 2001]);
        assert!(matches!(
            result,
            Err(AnyRcError::ChannelOutOfRange { index: 7, value: 2001 })
        ));
    }

    #[test]
    fn test_index_and_get() {
        let channels = ChannelVector::new([1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700]).unwrap();
        assert_eq!(channels[3], 1300);
        assert_eq!(channels.get(7), Some(1700));
        assert_eq!(channels.get(8), None);
    }

    #[test]
    fn test_display_format() {
        let channels = ChannelVector::new([1000, 1100, 1200, 1300, 1400, 1500, 1600, 2000]).unwrap();
        let rendered = channels.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), NUM_CHANNELS);
        assert_eq!(lines[0], "CH1: 1000");
        assert_eq!(lines[7], "CH8: 2000");
    }
}
