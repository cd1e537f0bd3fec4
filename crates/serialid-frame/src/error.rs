use serialid_transport::TransportError;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The embedded CRC does not match the frame contents.
    #[error("checksum mismatch (frame carries {expected:#06x}, computed {actual:#06x})")]
    Checksum { expected: u16, actual: u16 },

    /// A structural invariant of the frame is violated.
    #[error("malformed frame: {0}")]
    MalformedFrame(MalformedReason),

    /// The reply is tagged with a different sequence id than expected (implicit NAK).
    #[error("sequence mismatch (expected {expected}, got {actual})")]
    SequenceMismatch { expected: u8, actual: u8 },

    /// A VLQ ended before any byte cleared its continuation bit.
    #[error("truncated VLQ sequence")]
    TruncatedSequence,

    /// A VLQ does not fit in 64 bits.
    #[error("VLQ value exceeds 64 bits")]
    VlqOverflow,

    /// The payload does not fit in a single frame.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

impl FrameError {
    /// Whether a caller could reasonably resend the request after this error.
    ///
    /// Corruption in transit and sequence mismatches can clear up on a resend;
    /// structural violations point at a protocol bug and should not be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FrameError::Checksum { .. } | FrameError::SequenceMismatch { .. }
        )
    }
}

/// The structural check a malformed frame failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// Too few bytes to hold header and trailer.
    #[error("frame too short ({len} bytes, need at least 5)")]
    TooShort { len: usize },

    /// Declared length disagrees with the received byte count.
    #[error("declared length {declared} does not match actual length {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Upper nibble of the control byte is not the protocol marker.
    #[error("control byte {0:#04x} lacks the 0x10 marker")]
    ControlMarker(u8),

    /// Final byte is not the sync terminator.
    #[error("sync byte is {0:#04x}, expected 0x7e")]
    SyncByte(u8),
}

pub type Result<T> = std::result::Result<T, FrameError>;
