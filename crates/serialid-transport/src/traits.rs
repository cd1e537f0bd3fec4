use crate::error::Result;

/// A blocking, half-duplex byte link to a single device.
///
/// Implementations own any read timeout; `read_exact` must either fill the
/// whole buffer or fail.
pub trait Transport {
    /// Write the entire buffer to the device.
    fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Block until `buf` is completely filled.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Discard any bytes received but not yet read.
    fn reset_input_buffer(&mut self) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        (**self).reset_input_buffer()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write_all(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact(buf)
    }

    fn reset_input_buffer(&mut self) -> Result<()> {
        (**self).reset_input_buffer()
    }
}
