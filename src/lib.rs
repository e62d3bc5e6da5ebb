//! # AnyRC Bridge Library
//!
//! Turn keyboard and joystick input into RC servo channels and forward them
//! to a microcontroller over USB serial.
//!
//! This library provides the channel mixing engine plus the input collection,
//! display, recording and serial transport around it.

pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod mixer;
pub mod serial;
pub mod session;
pub mod telemetry;
