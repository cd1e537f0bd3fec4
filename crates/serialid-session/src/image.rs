use std::io::Read;

use flate2::read::ZlibDecoder;
use serde::de::DeserializeOwned;

use crate::error::{Result, SessionError};

/// The decoded identification record.
///
/// Its schema is device-defined, so it is kept as a JSON value; use
/// [`decode_record`] with a concrete type when the layout is known.
pub type IdentityRecord = serde_json::Value;

/// Inflate a zlib-wrapped image.
pub fn decompress(image: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(image.len() * 4);
    ZlibDecoder::new(image)
        .read_to_end(&mut out)
        .map_err(SessionError::Decompression)?;
    Ok(out)
}

/// Decode an inflated image as JSON.
pub fn decode_record<R: DeserializeOwned>(bytes: &[u8]) -> Result<R> {
    serde_json::from_slice(bytes).map_err(SessionError::Decode)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;

    fn zlib(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn inflates_zlib() {
        let packed = zlib(b"{\"model\":\"X1\"}");
        assert_eq!(decompress(&packed).unwrap(), b"{\"model\":\"X1\"}");
    }

    #[test]
    fn rejects_raw_bytes() {
        let err = decompress(b"not compressed at all").unwrap_err();
        assert!(matches!(err, SessionError::Decompression(_)));
    }

    #[test]
    fn decodes_json_value() {
        let record: IdentityRecord = decode_record(br#"{"serial":1234,"hw":"rev-b"}"#).unwrap();
        assert_eq!(record["serial"], 1234);
        assert_eq!(record["hw"], "rev-b");
    }

    #[test]
    fn rejects_invalid_json() {
        let err = decode_record::<IdentityRecord>(b"{serial:").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }
}
