//! # Mixing Engine
//!
//! Stateful core that turns raw input frames into bounded PWM channels.
//!
//! Each tick runs: normalize -> mix (active strategy, previous channels) ->
//! clamp. The engine is the only owner of the channel state; everything else
//! receives `ChannelVector` copies.
//!
//! ## Usage
//!
//! ```
//! use anyrc_bridge::mixer::{MixingEngine, ProcessMode};
//!
//! let mut engine = MixingEngine::new();
//! assert_eq!(engine.channels().as_array(), &[1500; 8]);
//!
//! engine.set_mode(ProcessMode::Keyboard);
//! engine.update_inputs(&[1, 0, 0, 0, 0, 0, 0, 0])?;
//! engine.process();
//! assert_eq!(engine.channels()[0], 1600);
//! # Ok::<(), anyrc_bridge::error::AnyRcError>(())
//! ```

use tracing::{debug, info};

use super::mode::ProcessMode;
use super::protocol::{ChannelVector, InputFrame, NUM_CHANNELS};
use super::scaling::{enforce_bounds, normalize_inputs};
use super::strategy::{strategy_for, MixingStrategy};
use crate::error::{AnyRcError, Result};

/// Runs one mixing step without touching any engine state.
///
/// # Examples
///
/// ```
/// use anyrc_bridge::mixer::engine::mix_frame;
/// use anyrc_bridge::mixer::protocol::ChannelVector;
/// use anyrc_bridge::mixer::strategy::KeyboardMix;
///
/// let next = mix_frame(&KeyboardMix, &[0, 1, 0, 0, 0, 0, 0, 0], &ChannelVector::neutral());
/// assert_eq!(next[0], 1400);
/// ```
#[must_use]
pub fn mix_frame(
    strategy: &dyn MixingStrategy,
    frame: &InputFrame,
    previous: &ChannelVector,
) -> ChannelVector {
    let normalized = normalize_inputs(frame);
    let raw = strategy.mix(&normalized, previous);
    enforce_bounds(&raw)
}

/// Channel mixing engine.
#[derive(Debug)]
pub struct MixingEngine {
    strategy: Box<dyn MixingStrategy>,
    inputs: InputFrame,
    channels: ChannelVector,
    ticks: u64,
}

impl Default for MixingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MixingEngine {
    /// Creates an engine in `Default` mode with all channels neutral.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(ProcessMode::Default)
    }

    /// Creates an engine using the built-in strategy for `mode`.
    #[must_use]
    pub fn with_mode(mode: ProcessMode) -> Self {
        Self::with_strategy(strategy_for(mode))
    }

    /// Creates an engine around an arbitrary strategy.
    #[must_use]
    pub fn with_strategy(strategy: Box<dyn MixingStrategy>) -> Self {
        Self {
            strategy,
            inputs: [0; NUM_CHANNELS],
            channels: ChannelVector::neutral(),
            ticks: 0,
        }
    }

    /// Currently active mode.
    #[must_use]
    pub fn mode(&self) -> ProcessMode {
        self.strategy.mode()
    }

    /// Switches to the built-in strategy for `mode`. Takes effect on the next
    /// tick; channel state is kept.
    pub fn set_mode(&mut self, mode: ProcessMode) {
        if mode != self.mode() {
            info!("Process mode changed: {} -> {}", self.mode(), mode);
        }
        self.strategy = strategy_for(mode);
    }

    /// Switches mode by boundary name. Unknown names select `Default`.
    pub fn set_mode_by_name(&mut self, name: &str) {
        self.set_mode(ProcessMode::from_name(name));
    }

    /// Replaces the active strategy between ticks, keeping channel state.
    ///
    /// Returns the strategy that was active before.
    pub fn swap_strategy(&mut self, strategy: Box<dyn MixingStrategy>) -> Box<dyn MixingStrategy> {
        info!("Mixing strategy swapped: {} -> {}", self.mode(), strategy.mode());
        std::mem::replace(&mut self.strategy, strategy)
    }

    /// Stores the next input frame.
    ///
    /// # Errors
    ///
    /// Returns `LengthMismatch` if `values` does not hold exactly
    /// [`NUM_CHANNELS`] elements. Nothing is modified in that case.
    pub fn update_inputs(&mut self, values: &[i32]) -> Result<()> {
        let frame = InputFrame::try_from(values).map_err(|_| AnyRcError::LengthMismatch {
            expected: NUM_CHANNELS,
            actual: values.len(),
        })?;
        self.inputs = frame;
        Ok(())
    }

    /// Runs one mixing tick over the stored inputs.
    pub fn process(&mut self) {
        self.channels = mix_frame(self.strategy.as_ref(), &self.inputs, &self.channels);
        self.ticks += 1;
        debug!(
            "Tick {} ({}): inputs {:?} -> channels {:?}",
            self.ticks,
            self.mode(),
            self.inputs,
            self.channels.as_array()
        );
    }

    /// Feeds one frame and runs a tick, returning the new channels.
    pub fn tick(&mut self, frame: InputFrame) -> ChannelVector {
        self.inputs = frame;
        self.process();
        self.channels
    }

    /// Snapshot of the current channels.
    #[must_use]
    pub fn channels(&self) -> ChannelVector {
        self.channels
    }

    /// Human-readable rendering of the current channels.
    #[must_use]
    pub fn channels_display(&self) -> String {
        self.channels.to_string()
    }

    /// Last accepted input frame.
    #[must_use]
    pub fn inputs(&self) -> &InputFrame {
        &self.inputs
    }

    /// Number of ticks processed since construction.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
