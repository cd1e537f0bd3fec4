use std::num::NonZeroU8;

use serialid_frame::SequenceId;

/// Bytes requested per page.
pub const DEFAULT_CHUNK_SIZE: NonZeroU8 = match NonZeroU8::new(0x28) {
    Some(size) => size,
    None => unreachable!(),
};

/// Which sequence id a reply is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplySequence {
    /// The reply echoes the request's id.
    #[default]
    SameAsRequest,
    /// The reply carries the id after the request's.
    Next,
}

impl ReplySequence {
    /// Expected reply id for a request sent with `sent`.
    pub fn expected(self, sent: SequenceId) -> SequenceId {
        match self {
            ReplySequence::SameAsRequest => sent,
            ReplySequence::Next => sent.next(),
        }
    }
}

/// Configuration for a device session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bytes requested per page; a shorter reply ends the read. Default: 40.
    pub chunk_size: NonZeroU8,
    /// Reply correlation rule. Default: same id as the request.
    pub reply_sequence: ReplySequence,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            reply_sequence: ReplySequence::default(),
        }
    }
}
