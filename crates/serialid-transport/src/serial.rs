use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort, SerialPortType};
use tracing::{debug, trace};

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// Default line speed for identification requests.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default per-read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for opening a serial device.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyACM0` or `COM3`.
    pub path: PathBuf,
    /// Line speed in baud. Default: 115200.
    pub baud_rate: u32,
    /// Read timeout applied to every blocking read. Default: 1 s.
    pub timeout: Duration,
}

impl SerialConfig {
    /// Configuration for `path` with default line settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// [`Transport`] over an operating-system serial port.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    path: PathBuf,
}

impl SerialTransport {
    /// Open the device described by `config`.
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let path_str = config.path.to_string_lossy();
        let port = serialport::new(path_str.as_ref(), config.baud_rate)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                path: config.path.clone(),
                source,
            })?;

        debug!(path = %config.path.display(), baud = config.baud_rate, "serial port opened");
        Ok(Self {
            port,
            path: config.path.clone(),
        })
    }

    /// Device path this transport was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the read timeout for subsequent reads.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.port.set_timeout(timeout).map_err(Into::into)
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        trace!(len = buf.len(), "serial write");
        write_all_to(&mut self.port, buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        read_exact_from(&mut self.port, buf)?;
        trace!(len = buf.len(), "serial read");
        Ok(())
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        self.port.clear(ClearBuffer::Input).map_err(Into::into)
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .finish()
    }
}

/// Fill `buf` from `reader`, retrying interrupted and partial reads.
pub(crate) fn read_exact_from<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::TimedOut => {
                return Err(TransportError::Timeout {
                    expected: buf.len(),
                    received: filled,
                })
            }
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
    Ok(())
}

pub(crate) fn write_all_to<W: Write + ?Sized>(writer: &mut W, buf: &[u8]) -> Result<()> {
    let mut offset = 0usize;
    while offset < buf.len() {
        match writer.write(&buf[offset..]) {
            Ok(0) => return Err(TransportError::Closed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }

    loop {
        match writer.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(TransportError::Io(err)),
        }
    }
}

/// A serial port visible to the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub name: String,
    pub kind: &'static str,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl PortInfo {
    fn from_serialport(info: serialport::SerialPortInfo) -> Self {
        let mut port = Self {
            name: info.port_name,
            kind: "unknown",
            vid: None,
            pid: None,
            serial_number: None,
            manufacturer: None,
            product: None,
        };
        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                port.kind = "usb";
                port.vid = Some(usb.vid);
                port.pid = Some(usb.pid);
                port.serial_number = usb.serial_number;
                port.manufacturer = usb.manufacturer;
                port.product = usb.product;
            }
            SerialPortType::PciPort => port.kind = "pci",
            SerialPortType::BluetoothPort => port.kind = "bluetooth",
            SerialPortType::Unknown => {}
        }
        port
    }
}

/// Enumerate serial ports on this machine.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;
    debug!(count = ports.len(), "enumerated serial ports");
    Ok(ports.into_iter().map(PortInfo::from_serialport).collect())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FailFirst {
        kind: ErrorKind,
        failed: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for FailFirst {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn read_exact_handles_partial_reads() {
        let mut reader = ByteByByteReader {
            bytes: vec![1, 2, 3, 4],
            pos: 0,
        };
        let mut buf = [0u8; 4];
        read_exact_from(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn read_exact_retries_interrupted() {
        let mut reader = FailFirst {
            kind: ErrorKind::Interrupted,
            failed: false,
            inner: Cursor::new(vec![9, 8]),
        };
        let mut buf = [0u8; 2];
        read_exact_from(&mut reader, &mut buf).unwrap();
        assert_eq!(buf, [9, 8]);
    }

    #[test]
    fn read_exact_maps_timeout() {
        let mut reader = FailFirst {
            kind: ErrorKind::TimedOut,
            failed: false,
            inner: Cursor::new(vec![9, 8]),
        };
        let mut buf = [0u8; 2];
        let err = read_exact_from(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(
            err,
            TransportError::Timeout {
                expected: 2,
                received: 0
            }
        ));
    }

    #[test]
    fn read_exact_reports_closed_on_eof() {
        let mut reader = Cursor::new(vec![1u8]);
        let mut buf = [0u8; 3];
        let err = read_exact_from(&mut reader, &mut buf).unwrap_err();
        assert!(matches!(err, TransportError::Closed));
    }

    #[test]
    fn write_all_collects_everything() {
        let mut out = Vec::new();
        write_all_to(&mut out, b"\x07\x10\x01").unwrap();
        assert_eq!(out, b"\x07\x10\x01");
    }

    #[test]
    fn serial_config_defaults() {
        let cfg = SerialConfig::new("/dev/ttyACM0");
        assert_eq!(cfg.baud_rate, DEFAULT_BAUD_RATE);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.path, PathBuf::from("/dev/ttyACM0"));
    }

    #[test]
    fn open_missing_device_fails() {
        let cfg = SerialConfig::new("/dev/serialid-does-not-exist");
        let err = SerialTransport::open(&cfg).unwrap_err();
        assert!(matches!(err, TransportError::Open { .. }));
    }
}
