use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serialid_frame::{
    parse_frame, receive_frame, send_frame, vlq, Frame, FrameError, SequenceId, FRAME_OVERHEAD,
};
use serialid_transport::Transport;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::image::{decode_record, decompress, IdentityRecord};

/// Opcode for "read device memory".
pub const READ_MEMORY: u8 = 0x01;

/// Build a read-memory request payload: opcode, VLQ address, chunk size.
pub fn read_request(address: u32, chunk_size: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(2 + vlq::encoded_len(i64::from(address)));
    buf.put_u8(READ_MEMORY);
    vlq::encode(i64::from(address), &mut buf);
    buf.put_u8(chunk_size);
    buf.freeze()
}

/// New data carried by a read reply.
///
/// The device echoes the request payload ahead of the memory contents, so the
/// first `request_frame_len - FRAME_OVERHEAD` bytes are skipped. A reply
/// shorter than the echo carries no data.
pub fn extract_new_data(response_payload: &[u8], request_frame_len: usize) -> &[u8] {
    let echoed = request_frame_len.saturating_sub(FRAME_OVERHEAD);
    response_payload.get(echoed..).unwrap_or_default()
}

/// A connected device and the protocol state for talking to it.
///
/// Exactly one request is outstanding at a time; every method blocks until
/// the reply has been validated or an error aborts the exchange.
pub struct Device<T> {
    transport: T,
    sequence: SequenceId,
    config: SessionConfig,
}

impl<T: Transport> Device<T> {
    /// Wrap `transport` with the default session configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    /// Wrap `transport` with explicit configuration.
    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Self {
            transport,
            sequence: SequenceId::default(),
            config,
        }
    }

    /// Sequence id the next request will carry.
    pub fn sequence(&self) -> SequenceId {
        self.sequence
    }

    /// Current session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read one raw frame from the device.
    pub fn receive(&mut self) -> Result<BytesMut> {
        receive_frame(&mut self.transport).map_err(Into::into)
    }

    /// Request one page at `address` and return the new data in the reply.
    pub fn read_page(&mut self, address: u32) -> Result<Bytes> {
        self.transport.reset_input_buffer()?;

        let sent = self.sequence.advance();
        let request = Frame::new(sent, read_request(address, self.config.chunk_size.get()));
        let request_len = send_frame(&mut self.transport, &request)?;

        let expected = self.config.reply_sequence.expected(sent);
        let raw = self.receive()?;
        let payload = parse_frame(&raw, expected).inspect_err(|err| match err {
            FrameError::Checksum { .. } | FrameError::SequenceMismatch { .. } => {
                warn!(address, seq = %sent, error = %err, "rejected reply");
            }
            _ => {}
        })?;

        let data = extract_new_data(payload, request_len);
        debug!(address, seq = %sent, len = data.len(), "page read");
        Ok(Bytes::copy_from_slice(data))
    }

    /// Page through device memory from address 0 until a short page arrives.
    ///
    /// Returns the concatenated, still-compressed image.
    pub fn read_image(&mut self) -> Result<BytesMut> {
        let chunk_size = self.config.chunk_size.get();
        let mut image = BytesMut::new();
        let mut address = 0u32;
        let mut pages = 0usize;

        loop {
            let data = self.read_page(address)?;
            pages += 1;
            image.extend_from_slice(&data);

            if data.len() < usize::from(chunk_size) {
                break;
            }
            address = address
                .checked_add(u32::from(chunk_size))
                .ok_or(SessionError::AddressOverflow(address))?;
        }

        info!(pages, bytes = image.len(), "image read complete");
        Ok(image)
    }

    /// Read, inflate and decode the identification record.
    pub fn identify(&mut self) -> Result<IdentityRecord> {
        self.identify_as()
    }

    /// Like [`identify`](Self::identify), decoding into a caller-chosen type.
    pub fn identify_as<R: DeserializeOwned>(&mut self) -> Result<R> {
        let image = self.read_image()?;
        let inflated = decompress(&image)?;
        decode_record(&inflated)
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }
}

impl<T> std::fmt::Debug for Device<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("sequence", &self.sequence)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
