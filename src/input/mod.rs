//! # Input Module
//!
//! Operator input collection.
//!
//! This module handles:
//! - Device rows with key assignments
//! - Key press/release and joystick axis values
//! - Building the 8-value input frame for each tick
//! - Parsing operator commands from stdin

pub mod command;
pub mod table;

pub use command::Command;
pub use table::InputTable;
