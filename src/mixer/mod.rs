//! # Mixer Module
//!
//! Channel mixing engine.
//!
//! This module handles:
//! - Normalizing raw operator inputs
//! - Mixing inputs into channels under the selected process mode
//! - Keeping trim state across ticks
//! - Clamping every channel into the 1000-2000 µs PWM range

pub mod engine;
pub mod mode;
pub mod protocol;
pub mod scaling;
pub mod strategy;

pub use engine::MixingEngine;
pub use mode::ProcessMode;
pub use protocol::{ChannelVector, InputFrame, NUM_CHANNELS};
