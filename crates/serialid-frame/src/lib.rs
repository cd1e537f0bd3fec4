//! Framing for the serialid device protocol.
//!
//! Every message on the wire is a self-describing frame:
//! - 1-byte total length (header + payload + trailer)
//! - 1-byte control: protocol marker `0x1_` plus a 4-bit sequence id
//! - payload (up to 250 bytes)
//! - 2-byte big-endian CRC-16/MCRF4XX over everything before it
//! - `0x7E` sync byte
//!
//! Addresses inside payloads are carried as signed VLQs, see [`vlq`].

pub mod checksum;
pub mod codec;
pub mod error;
pub mod reader;
pub mod sequence;
pub mod vlq;
pub mod writer;

pub use checksum::checksum;
pub use codec::{
    build_frame, encode_frame, parse_frame, Frame, CONTROL_MARKER, FRAME_OVERHEAD,
    MAX_PAYLOAD, SYNC_BYTE,
};
pub use error::{FrameError, MalformedReason, Result};
pub use reader::receive_frame;
pub use sequence::SequenceId;
pub use writer::send_frame;
