//! Signed variable-length quantities.
//!
//! Big-endian groups of 7 bits; every byte except the last has its high bit
//! set. The sign lives in bits 5 and 6 of the leading group: when both are
//! set the value is negative and the decoder removes the bias of one extra
//! group. A single byte therefore covers `-32..=95`.

use bytes::BufMut;

use crate::error::{FrameError, Result};

/// High bit marking "more bytes follow".
pub const CONTINUATION: u8 = 0x80;

/// Longest encoding of an `i64`.
pub const MAX_ENCODED_LEN: usize = 10;

const GROUP_MASK: u8 = 0x7F;
const SIGN_BITS: u8 = 0x60;

/// Whether a leading byte marks a negative (sign-extended) value.
pub fn is_sign_extended(first_byte: u8) -> bool {
    first_byte & SIGN_BITS == SIGN_BITS
}

/// Number of bytes [`encode`] emits for `value`.
pub fn encoded_len(value: i64) -> usize {
    let value = i128::from(value);
    let mut len = 1;
    while !fits(value, len) {
        len += 1;
    }
    len
}

// A non-negative value must not set both sign bits of its leading group; a
// negative one must be reachable by subtracting the bias of `len` groups.
fn fits(value: i128, len: usize) -> bool {
    let shift = 7 * (len - 1);
    if value >= 0 {
        value < i128::from(SIGN_BITS) << shift
    } else {
        value >= -(0x20_i128 << shift)
    }
}

/// Append the minimal encoding of `value` to `dst`.
pub fn encode<B: BufMut>(value: i64, dst: &mut B) {
    let len = encoded_len(value);
    for group in (0..len).rev() {
        let bits = ((value >> (7 * group)) as u8) & GROUP_MASK;
        if group == 0 {
            dst.put_u8(bits);
        } else {
            dst.put_u8(CONTINUATION | bits);
        }
    }
}

/// Decode one value from the front of `src`.
///
/// Returns the value and the bytes after it.
pub fn decode(src: &[u8]) -> Result<(i64, &[u8])> {
    let last = src
        .iter()
        .position(|byte| byte & CONTINUATION == 0)
        .ok_or(FrameError::TruncatedSequence)?;
    if last >= MAX_ENCODED_LEN {
        return Err(FrameError::VlqOverflow);
    }

    let mut value = src[..=last]
        .iter()
        .fold(0i128, |acc, byte| (acc << 7) | i128::from(byte & GROUP_MASK));
    if is_sign_extended(src[0]) {
        value -= i128::from(CONTINUATION) << (7 * last);
    }

    let value = i64::try_from(value).map_err(|_| FrameError::VlqOverflow)?;
    Ok((value, &src[last + 1..]))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn enc(value: i64) -> Vec<u8> {
        let mut out = Vec::new();
        encode(value, &mut out);
        out
    }

    #[test]
    fn zero() {
        assert_eq!(enc(0), [0x00]);
        assert_eq!(decode(&[0x00]).unwrap(), (0, &[][..]));
    }

    #[test]
    fn minus_one() {
        assert_eq!(enc(-1), [0x7F]);
        assert_eq!(decode(&[0x7F]).unwrap(), (-1, &[][..]));
    }

    #[test]
    fn one_twenty_seven_needs_two_bytes() {
        assert_eq!(enc(127), [0x80, 0x7F]);
        assert_eq!(decode(&[0x80, 0x7F]).unwrap(), (127, &[][..]));
    }

    #[test]
    fn single_byte_range_edges() {
        assert_eq!(enc(95), [0x5F]);
        assert_eq!(enc(96), [0x80, 0x60]);
        assert_eq!(enc(-32), [0x60]);
        assert_eq!(enc(-33), [0xFF, 0x5F]);
    }

    #[test]
    fn page_addresses() {
        assert_eq!(enc(0x28), [0x28]);
        assert_eq!(enc(0x50), [0x50]);
        assert_eq!(enc(0x78), [0x80, 0x78]);
    }

    #[test]
    fn leading_group_sign_bits_force_extra_group() {
        // 0x3000 has bits 12 and 13 set, which would read as negative in two bytes.
        assert_eq!(enc(0x2FFF), [0xDF, 0x7F]);
        assert_eq!(enc(0x3000), [0x80, 0xE0, 0x00]);
        assert_eq!(decode(&[0x80, 0xE0, 0x00]).unwrap().0, 0x3000);
    }

    #[test]
    fn decode_returns_remainder() {
        let (value, rest) = decode(&[0x28, 0x28, 0x01]).unwrap();
        assert_eq!(value, 0x28);
        assert_eq!(rest, &[0x28, 0x01]);
    }

    #[test]
    fn decode_truncated() {
        assert!(matches!(decode(&[]), Err(FrameError::TruncatedSequence)));
        assert!(matches!(
            decode(&[0x80, 0x81, 0xFF]),
            Err(FrameError::TruncatedSequence)
        ));
    }

    #[test]
    fn decode_overflow() {
        let mut long = vec![0x81; MAX_ENCODED_LEN];
        long.push(0x00);
        assert!(matches!(decode(&long), Err(FrameError::VlqOverflow)));

        // Ten groups hold 70 bits; a positive value above i64::MAX must be rejected.
        let mut wide = vec![0x9F];
        wide.extend(std::iter::repeat(0xFF).take(8));
        wide.push(0x7F);
        assert!(matches!(decode(&wide), Err(FrameError::VlqOverflow)));
    }

    #[test]
    fn extremes_round_trip() {
        for value in [i64::MIN, i64::MIN + 1, i64::MAX, i64::MAX - 1] {
            let bytes = enc(value);
            assert_eq!(bytes.len(), MAX_ENCODED_LEN);
            assert_eq!(decode(&bytes).unwrap(), (value, &[][..]));
        }
    }

    #[test]
    fn sign_extension_boundaries() {
        assert!(!is_sign_extended(0x3F));
        assert!(!is_sign_extended(0x40));
        assert!(!is_sign_extended(0x5F));
        assert!(is_sign_extended(0x60));
        assert!(is_sign_extended(0x7F));
        assert!(is_sign_extended(0xE0));
        assert!(!is_sign_extended(0xA0));
    }

    proptest! {
        #[test]
        fn round_trip(value in any::<i64>()) {
            let bytes = enc(value);
            prop_assert_eq!(bytes.len(), encoded_len(value));
            prop_assert_eq!(decode(&bytes).unwrap(), (value, &[][..]));
        }

        #[test]
        fn only_last_byte_terminates(value in any::<i64>()) {
            let bytes = enc(value);
            let (last, head) = bytes.split_last().unwrap();
            prop_assert_eq!(last & CONTINUATION, 0);
            prop_assert!(head.iter().all(|b| b & CONTINUATION != 0));
        }

        #[test]
        fn minimal(value in any::<i64>()) {
            let bytes = enc(value);
            if bytes.len() > 1 {
                let shorter = decode(&bytes[1..]).unwrap().0;
                prop_assert_ne!(shorter, value);
            }
        }

        #[test]
        fn all_continuation_is_truncated(bytes in proptest::collection::vec(0x80u8..=0xFF, 0..16)) {
            prop_assert!(matches!(decode(&bytes), Err(FrameError::TruncatedSequence)));
        }
    }
}
