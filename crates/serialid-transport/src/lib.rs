//! Half-duplex serial transport abstraction.
//!
//! The protocol layers above only need three primitives from a link:
//! write a buffer, read an exact number of bytes, and discard stale input.
//! [`Transport`] captures those; [`SerialTransport`] provides them over a
//! real serial port.
//!
//! Line configuration beyond baud rate and read timeout is left at the
//! platform defaults (8N1, no flow control).

pub mod error;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use serial::{list_ports, PortInfo, SerialConfig, SerialTransport, DEFAULT_BAUD_RATE};
pub use traits::Transport;
