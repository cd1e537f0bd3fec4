//! Identification queries for serial-attached devices.
//!
//! serialid speaks a small framed protocol over a half-duplex serial link:
//! CRC-checked frames tagged with a 4-bit sequence id, signed VLQ addresses,
//! and a paged memory read that retrieves a zlib-compressed JSON record.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial link abstraction and port enumeration
//! - [`frame`] — Frame codec, CRC, VLQ and sequence ids
//! - [`session`] — The paged identification read
//!
//! ```no_run
//! use serialid::session::Device;
//! use serialid::transport::{SerialConfig, SerialTransport};
//!
//! let transport = SerialTransport::open(&SerialConfig::new("/dev/ttyACM0"))?;
//! let record = Device::new(transport).identify()?;
//! println!("{record}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use serialid_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use serialid_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use serialid_session::*;
}
