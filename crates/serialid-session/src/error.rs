use serialid_frame::FrameError;
use serialid_transport::TransportError;

/// Errors that can occur during an identification session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The reassembled image is not a valid zlib stream.
    #[error("decompression failed: {0}")]
    Decompression(#[source] std::io::Error),

    /// The inflated image is not a valid identification record.
    #[error("record decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// The read cursor ran past the addressable range.
    #[error("read address overflow after {0:#x}")]
    AddressOverflow(u32),
}

pub type Result<T> = std::result::Result<T, SessionError>;
