use crc::{Crc, CRC_16_MCRF4XX};

/// CRC engine for frame trailers.
///
/// Width 16, polynomial 0x1021, initial value 0xFFFF, reflected input and
/// output, no final xor.
pub const FRAME_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Checksum over `bytes` as carried in a frame trailer.
pub fn checksum(bytes: &[u8]) -> u16 {
    FRAME_CRC.checksum(bytes)
}
