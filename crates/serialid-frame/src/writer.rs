use bytes::BytesMut;
use serialid_transport::Transport;
use tracing::trace;

use crate::codec::Frame;
use crate::error::Result;

/// Encode `frame` and write it to `transport` in one piece.
///
/// Returns the number of bytes written.
pub fn send_frame<T: Transport + ?Sized>(transport: &mut T, frame: &Frame) -> Result<usize> {
    let mut buf = BytesMut::with_capacity(frame.wire_size());
    frame.encode(&mut buf)?;
    transport.write_all(&buf)?;
    trace!(len = buf.len(), seq = %frame.sequence, "frame sent");
    Ok(buf.len())
}
