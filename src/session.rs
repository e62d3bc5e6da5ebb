//! # Session
//!
//! Glue between operator input and the mixing engine for one running bridge.
//!
//! A session owns the [`InputTable`] and the [`MixingEngine`]. The scheduler
//! in `main.rs` calls [`Session::tick`] at the configured cadence and routes
//! operator commands through [`Session::apply`].
//!
//! ## Usage
//!
//! ```
//! use anyrc_bridge::config::Config;
//! use anyrc_bridge::input::Command;
//! use anyrc_bridge::session::Session;
//!
//! let mut session = Session::new(&Config::default());
//! session.apply(Command::Bind { row: 0, key: "Up".to_string() })?;
//! session.apply(Command::Press("Up".to_string()))?;
//! assert_eq!(session.tick(), None);
//!
//! session.apply(Command::Start)?;
//! let channels = session.tick().expect("reading was started");
//! assert_eq!(channels[0], 2000);
//! # Ok::<(), anyrc_bridge::error::AnyRcError>(())
//! ```

use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::input::{Command, InputTable};
use crate::mixer::{ChannelVector, MixingEngine};

/// Input table plus mixing engine
#[derive(Debug)]
pub struct Session {
    engine: MixingEngine,
    table: InputTable,
}

impl Session {
    /// Creates a session from configuration: engine in the configured mode,
    /// rows bound as configured. Reading is off until a `Start` command, so
    /// the channels stay neutral.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            engine: MixingEngine::with_mode(config.mixer.mode),
            table: InputTable::from_config(&config.inputs),
        }
    }

    /// Applies one operator command.
    ///
    /// # Errors
    ///
    /// Returns `Command` if the command refers to a row that does not exist
    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Press(key) => {
                let rows = self.table.key_pressed(&key);
                debug!("Key '{}' pressed ({} rows)", key, rows);
            }
            Command::Release(key) => {
                let rows = self.table.key_released(&key);
                debug!("Key '{}' released ({} rows)", key, rows);
            }
            Command::Bind { row, key } => {
                self.table.assign_key(row, &key)?;
                info!("Row {} bound to key '{}'", row, key);
            }
            Command::Axis { row, value } => self.table.set_axis(row, value)?,
            Command::Set { row, value } => self.table.set_value(row, value)?,
            Command::Mode(name) => self.engine.set_mode_by_name(&name),
            Command::Start => {
                if self.table.start_reading() {
                    info!("Input reading started");
                }
            }
            Command::Stop => {
                if self.table.stop_reading() {
                    info!("Input reading stopped");
                }
            }
            Command::Status => {
                info!(
                    "Mode: {}, reading: {}, ticks: {}\n{}",
                    self.engine.mode(),
                    self.table.is_reading(),
                    self.engine.ticks(),
                    self.engine.channels_display()
                );
            }
        }
        Ok(())
    }

    /// Runs one tick if reading is enabled, returning the new channels.
    ///
    /// While stopped the engine is not ticked and `None` is returned; the
    /// last channels remain available from [`Session::channels`].
    pub fn tick(&mut self) -> Option<ChannelVector> {
        if !self.table.is_reading() {
            return None;
        }
        Some(self.engine.tick(self.table.frame()))
    }

    /// Replaces the engine with a fresh one built from `config` and rebinds
    /// the configured rows. Channel state restarts at neutral; the reading
    /// switch is kept.
    pub fn reload(&mut self, config: &Config) {
        let reading = self.table.is_reading();
        self.engine = MixingEngine::with_mode(config.mixer.mode);
        self.table = InputTable::from_config(&config.inputs);
        if reading {
            self.table.start_reading();
        }
        info!("Configuration reloaded (mode: {})", self.engine.mode());
    }

    /// Current channels
    #[must_use]
    pub fn channels(&self) -> ChannelVector {
        self.engine.channels()
    }

    /// The mixing engine
    #[must_use]
    pub fn engine(&self) -> &MixingEngine {
        &self.engine
    }

    /// The input table
    #[must_use]
    pub fn table(&self) -> &InputTable {
        &self.table
    }
}
