//! # Channel Frame Encoder
//!
//! Encodes a channel vector into the text line sent to the microcontroller.
//!
//! ## Frame Format
//!
//! ```text
//! 1500,1500,1000,2000,1500,1500,1500,1500\n
//! ```
//!
//! Eight decimal pulse widths in channel order, comma separated, newline
//! terminated. The microcontroller sketch reads one line per update with
//! `Serial.readStringUntil('\n')`.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt::Write;

use crate::mixer::protocol::{ChannelVector, NUM_CHANNELS};

/// Frame terminator
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Channel separator
pub const CHANNEL_SEPARATOR: char = ',';

/// Longest possible frame: 8 × "2000" + 7 separators + terminator
pub const MAX_FRAME_LEN: usize = NUM_CHANNELS * 4 + (NUM_CHANNELS - 1) + 1;

/// Encode channels into a complete frame
///
/// # Examples
///
/// ```
/// use anyrc_bridge::mixer::protocol::ChannelVector;
/// use anyrc_bridge::serial::encoder::encode_channels_frame;
///
/// let frame = encode_channels_frame(&ChannelVector::neutral());
/// assert_eq!(&frame[..], b"1500,1500,1500,1500,1500,1500,1500,1500\n");
/// ```
#[must_use]
pub fn encode_channels_frame(channels: &ChannelVector) -> Bytes {
    let mut frame = BytesMut::with_capacity(MAX_FRAME_LEN);

    for (i, value) in channels.as_array().iter().enumerate() {
        if i > 0 {
            frame.put_u8(CHANNEL_SEPARATOR as u8);
        }
        // Writing into BytesMut cannot fail
        let _ = write!(frame, "{}", value);
    }
    frame.put_u8(FRAME_TERMINATOR);

    frame.freeze()
}
