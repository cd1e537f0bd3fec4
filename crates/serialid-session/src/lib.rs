//! Device session: the paged identification read.
//!
//! A [`Device`] owns one transport and the sequence counter for it. Its
//! [`identify`](Device::identify) call pages through device memory in fixed
//! chunks until the device returns a short page, then inflates the image and
//! decodes the JSON identification record inside.

pub mod config;
pub mod device;
pub mod error;
pub mod image;

pub use config::{ReplySequence, SessionConfig, DEFAULT_CHUNK_SIZE};
pub use device::{extract_new_data, read_request, Device, READ_MEMORY};
pub use error::{Result, SessionError};
pub use image::{decode_record, decompress, IdentityRecord};
