use std::fmt;

/// 4-bit request/response correlation tag.
///
/// Always in `0..=15`; arithmetic wraps inside the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SequenceId(u8);

impl SequenceId {
    /// Number of distinct sequence ids.
    pub const MODULUS: u8 = 16;

    const MASK: u8 = 0x0F;

    /// Sequence id from the low nibble of `raw`.
    pub const fn new(raw: u8) -> Self {
        Self(raw & Self::MASK)
    }

    /// Sequence id carried in a frame control byte.
    pub const fn from_control(control: u8) -> Self {
        Self::new(control)
    }

    /// The id as a plain integer in `0..=15`.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The id following this one, wrapping 15 -> 0.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0.wrapping_add(1))
    }

    /// Return the current id and step `self` to the next one.
    pub fn advance(&mut self) -> Self {
        let current = *self;
        *self = current.next();
        current
    }
}

impl From<u8> for SequenceId {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_masks_to_low_nibble() {
        assert_eq!(SequenceId::new(0x00).get(), 0);
        assert_eq!(SequenceId::new(0x0F).get(), 15);
        assert_eq!(SequenceId::new(0x10).get(), 0);
        assert_eq!(SequenceId::new(0xF3).get(), 3);
    }

    #[test]
    fn next_wraps_after_fifteen() {
        assert_eq!(SequenceId::new(14).next(), SequenceId::new(15));
        assert_eq!(SequenceId::new(15).next(), SequenceId::new(0));
    }

    #[test]
    fn advance_returns_current() {
        let mut seq = SequenceId::new(15);
        assert_eq!(seq.advance().get(), 15);
        assert_eq!(seq.get(), 0);
        assert_eq!(seq.advance().get(), 0);
        assert_eq!(seq.get(), 1);
    }

    #[test]
    fn full_cycle_returns_to_start() {
        let start = SequenceId::new(5);
        let mut seq = start;
        for _ in 0..SequenceId::MODULUS {
            seq.advance();
        }
        assert_eq!(seq, start);
    }

    #[test]
    fn from_control_ignores_marker() {
        assert_eq!(SequenceId::from_control(0x1A).get(), 0x0A);
    }
}
