use bytes::BytesMut;
use serialid_transport::Transport;
use tracing::trace;

use crate::codec::FRAME_OVERHEAD;
use crate::error::{FrameError, MalformedReason, Result};

/// Read one raw frame from `transport` (blocking).
///
/// The first byte announces the total frame length; the rest is read in a
/// single exact read. The returned bytes are not validated beyond the
/// declared length; hand them to [`parse_frame`](crate::parse_frame).
pub fn receive_frame<T: Transport + ?Sized>(transport: &mut T) -> Result<BytesMut> {
    let mut length = [0u8; 1];
    transport.read_exact(&mut length)?;

    let declared = usize::from(length[0]);
    if declared < FRAME_OVERHEAD {
        return Err(FrameError::MalformedFrame(MalformedReason::TooShort {
            len: declared,
        }));
    }

    let mut frame = BytesMut::zeroed(declared);
    frame[0] = length[0];
    transport.read_exact(&mut frame[1..])?;
    trace!(len = declared, "frame received");
    Ok(frame)
}
