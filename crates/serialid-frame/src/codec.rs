use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::checksum;
use crate::error::{FrameError, MalformedReason, Result};
use crate::sequence::SequenceId;

/// Header (length + control) plus trailer (CRC + sync).
pub const FRAME_OVERHEAD: usize = 5;

/// Largest payload a one-byte length field can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize - FRAME_OVERHEAD;

/// Upper nibble of every control byte.
pub const CONTROL_MARKER: u8 = 0x10;

/// Frame terminator.
pub const SYNC_BYTE: u8 = 0x7E;

const MARKER_MASK: u8 = 0xF0;
const TRAILER_LEN: usize = 3;

/// A request or response with its correlation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sequence id carried in the control byte.
    pub sequence: SequenceId,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(sequence: SequenceId, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload + trailer).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Append the wire form of this frame to `dst`.
    pub fn encode(&self, dst: &mut BytesMut) -> Result<()> {
        encode_frame(&self.payload, self.sequence, dst)
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬───────────┬─────────────┬──────────┬──────┐
/// │ Length   │ Control   │ Payload     │ CRC      │ Sync │
/// │ (1B)     │ 0x1 | seq │ (Length-5B) │ (2B BE)  │ 0x7E │
/// └──────────┴───────────┴─────────────┴──────────┴──────┘
/// ```
///
/// The CRC covers length, control and payload.
pub fn encode_frame(payload: &[u8], sequence: SequenceId, dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let start = dst.len();
    dst.reserve(FRAME_OVERHEAD + payload.len());
    dst.put_u8((payload.len() + FRAME_OVERHEAD) as u8);
    dst.put_u8(CONTROL_MARKER | sequence.get());
    dst.put_slice(payload);
    let crc = checksum(&dst[start..]);
    dst.put_u16(crc);
    dst.put_u8(SYNC_BYTE);
    Ok(())
}

/// Build a standalone frame for `payload`.
pub fn build_frame(payload: &[u8], sequence: SequenceId) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(FRAME_OVERHEAD + payload.len());
    encode_frame(payload, sequence, &mut buf)?;
    Ok(buf.freeze())
}

/// Validate a complete frame and return its payload.
///
/// The CRC is checked first; structural checks (length, marker, sync) follow,
/// and the sequence id is compared last so a mismatch only ever reports an
/// otherwise intact frame.
pub fn parse_frame(frame: &[u8], expected: SequenceId) -> Result<&[u8]> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(FrameError::MalformedFrame(MalformedReason::TooShort {
            len: frame.len(),
        }));
    }

    let body_end = frame.len() - TRAILER_LEN;
    let embedded = u16::from_be_bytes([frame[body_end], frame[body_end + 1]]);
    let computed = checksum(&frame[..body_end]);
    if embedded != computed {
        return Err(FrameError::Checksum {
            expected: embedded,
            actual: computed,
        });
    }

    let declared = usize::from(frame[0]);
    if declared != frame.len() {
        return Err(FrameError::MalformedFrame(
            MalformedReason::LengthMismatch {
                declared,
                actual: frame.len(),
            },
        ));
    }

    let control = frame[1];
    if control & MARKER_MASK != CONTROL_MARKER {
        return Err(FrameError::MalformedFrame(MalformedReason::ControlMarker(
            control,
        )));
    }

    let sync = frame[frame.len() - 1];
    if sync != SYNC_BYTE {
        return Err(FrameError::MalformedFrame(MalformedReason::SyncByte(sync)));
    }

    let actual = SequenceId::from_control(control);
    if actual != expected {
        return Err(FrameError::SequenceMismatch {
            expected: expected.get(),
            actual: actual.get(),
        });
    }

    Ok(&frame[2..body_end])
}
