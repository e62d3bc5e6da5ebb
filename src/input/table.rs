//! # Input Table
//!
//! Device rows that collect operator inputs between ticks.
//!
//! Each row names a device, optionally has a key assigned to it and holds
//! the row's current value:
//!
//! | Source | Value written |
//! |--------|---------------|
//! | Key press | 1 |
//! | Key release | 0 |
//! | Joystick axis (-1.0 to 1.0) | `1000 + (axis + 1) * 500` |
//! | Direct set | any integer |
//!
//! Only the first eight rows feed the mixer; the remaining rows are spare
//! slots an operator can rebind. A new table is not reading: nothing reaches
//! the mixer until [`InputTable::start_reading`] is called.
//!
//! ## Usage
//!
//! ```
//! use anyrc_bridge::input::table::InputTable;
//!
//! let mut table = InputTable::new();
//! table.assign_key(0, "Up")?;
//! table.key_pressed("Up");
//! assert_eq!(table.frame(), [1, 0, 0, 0, 0, 0, 0, 0]);
//!
//! table.key_released("Up");
//! assert_eq!(table.frame(), [0; 8]);
//! # Ok::<(), anyrc_bridge::error::AnyRcError>(())
//! ```

use tracing::debug;

use crate::config::InputRowConfig;
use crate::error::{AnyRcError, Result};
use crate::mixer::protocol::{InputFrame, NUM_CHANNELS};

/// Number of device rows in the table.
pub const NUM_ROWS: usize = 20;

/// Device name used for rows without an explicit device.
pub const DEFAULT_DEVICE: &str = "Keyboard";

/// Value written to a row while its key is held.
pub const KEY_DOWN: i32 = 1;
/// Value written to a row when its key is released.
pub const KEY_UP: i32 = 0;

/// Maps a joystick axis in [-1.0, 1.0] to the 1000-2000 display range.
///
/// Out-of-range axes are clamped first; the result is truncated.
///
/// # Examples
///
/// ```
/// use anyrc_bridge::input::table::axis_to_value;
///
/// assert_eq!(axis_to_value(-1.0), 1000);
/// assert_eq!(axis_to_value(0.0), 1500);
/// assert_eq!(axis_to_value(1.0), 2000);
/// ```
#[must_use]
pub fn axis_to_value(axis: f32) -> i32 {
    let axis = if axis.is_nan() { 0.0 } else { axis.clamp(-1.0, 1.0) };
    (1000.0 + (f64::from(axis) + 1.0) * 500.0) as i32
}

/// A single device row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRow {
    /// Device feeding this row (e.g. "Keyboard" or a joystick name).
    pub device: String,
    /// Key symbol assigned to this row, if any.
    pub key: Option<String>,
    /// Current value.
    pub value: i32,
}

impl Default for InputRow {
    fn default() -> Self {
        Self {
            device: DEFAULT_DEVICE.to_string(),
            key: None,
            value: 0,
        }
    }
}

/// Collection of device rows plus the "reading" switch.
#[derive(Debug, Clone)]
pub struct InputTable {
    rows: Vec<InputRow>,
    reading: bool,
}

impl Default for InputTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InputTable {
    /// Creates a table of [`NUM_ROWS`] unbound keyboard rows. Reading starts
    /// disabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: vec![InputRow::default(); NUM_ROWS],
            reading: false,
        }
    }

    /// Creates a table from configured rows. Rows beyond the configuration
    /// keep their defaults; extra configured rows are ignored.
    #[must_use]
    pub fn from_config(rows: &[InputRowConfig]) -> Self {
        let mut table = Self::new();
        for (row, cfg) in table.rows.iter_mut().zip(rows) {
            row.device = cfg.device.clone();
            row.key = cfg.key.clone().filter(|k| !k.is_empty());
        }
        table
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[InputRow] {
        &self.rows
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut InputRow> {
        self.rows.get_mut(index).ok_or_else(|| {
            AnyRcError::Command(format!("row {} out of range (0-{})", index, NUM_ROWS - 1))
        })
    }

    /// Assigns a key symbol to a row.
    ///
    /// # Errors
    ///
    /// Returns `Command` if the row does not exist.
    pub fn assign_key(&mut self, index: usize, key: &str) -> Result<()> {
        let row = self.row_mut(index)?;
        row.key = Some(key.to_string());
        debug!("Row {} assigned key '{}'", index, key);
        Ok(())
    }

    /// Sets every row bound to `key` to [`KEY_DOWN`]. Returns the number of
    /// rows updated.
    pub fn key_pressed(&mut self, key: &str) -> usize {
        self.set_key_rows(key, KEY_DOWN)
    }

    /// Sets every row bound to `key` to [`KEY_UP`]. Returns the number of
    /// rows updated.
    pub fn key_released(&mut self, key: &str) -> usize {
        self.set_key_rows(key, KEY_UP)
    }

    fn set_key_rows(&mut self, key: &str, value: i32) -> usize {
        let mut updated = 0;
        for row in self.rows.iter_mut().filter(|r| r.key.as_deref() == Some(key)) {
            row.value = value;
            updated += 1;
        }
        updated
    }

    /// Writes a joystick axis reading into a row.
    ///
    /// # Errors
    ///
    /// Returns `Command` if the row does not exist.
    pub fn set_axis(&mut self, index: usize, axis: f32) -> Result<()> {
        self.row_mut(index)?.value = axis_to_value(axis);
        Ok(())
    }

    /// Writes a raw value into a row.
    ///
    /// # Errors
    ///
    /// Returns `Command` if the row does not exist.
    pub fn set_value(&mut self, index: usize, value: i32) -> Result<()> {
        self.row_mut(index)?.value = value;
        Ok(())
    }

    /// Starts feeding frames to the mixer. Returns `false` if already reading.
    pub fn start_reading(&mut self) -> bool {
        !std::mem::replace(&mut self.reading, true)
    }

    /// Stops feeding frames to the mixer. Returns `false` if already stopped.
    pub fn stop_reading(&mut self) -> bool {
        std::mem::replace(&mut self.reading, false)
    }

    /// Whether frames are currently fed to the mixer.
    #[must_use]
    pub fn is_reading(&self) -> bool {
        self.reading
    }

    /// Values of the first eight rows, zero-padded if fewer rows exist.
    #[must_use]
    pub fn frame(&self) -> InputFrame {
        let mut frame = [0; NUM_CHANNELS];
        for (slot, row) in frame.iter_mut().zip(&self.rows) {
            *slot = row.value;
        }
        frame
    }
}
