//! # Channel Display
//!
//! Sinks that receive the finished channel vector after every tick.

use tracing::{info, warn};

use crate::error::Result;
use crate::mixer::{ChannelVector, ProcessMode};

/// Receiver of post-clamp channel vectors.
///
/// Sinks get a copy each tick and cannot influence the engine. Errors are
/// reported to the caller, which logs them and carries on.
#[cfg_attr(test, mockall::automock)]
pub trait ChannelSink: Send {
    /// Publishes one tick's channels.
    fn publish(&mut self, mode: ProcessMode, channels: &ChannelVector) -> Result<()>;
}

/// Logs the channel rendering every `every_ticks` publishes.
#[derive(Debug, Clone)]
pub struct TracingDisplay {
    every_ticks: u64,
    published: u64,
}

impl TracingDisplay {
    /// Creates a display that logs every `every_ticks` ticks (minimum 1).
    #[must_use]
    pub fn new(every_ticks: u64) -> Self {
        Self {
            every_ticks: every_ticks.max(1),
            published: 0,
        }
    }

    /// Number of vectors received so far.
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published
    }

    fn is_due(&self) -> bool {
        self.published > 0 && (self.published - 1) % self.every_ticks == 0
    }
}

impl ChannelSink for TracingDisplay {
    fn publish(&mut self, mode: ProcessMode, channels: &ChannelVector) -> Result<()> {
        self.published += 1;
        if self.is_due() {
            info!("RC Channels [{}]\n{}", mode, channels);
        }
        Ok(())
    }
}

/// Publishes to every sink, logging failures instead of propagating them.
///
/// Returns the number of sinks that failed.
pub fn publish_all(
    sinks: &mut [Box<dyn ChannelSink>],
    mode: ProcessMode,
    channels: &ChannelVector,
) -> usize {
    let mut failures = 0;
    for sink in sinks.iter_mut() {
        if let Err(e) = sink.publish(mode, channels) {
            warn!("Channel sink failed: {}", e);
            failures += 1;
        }
    }
    failures
}
