//! Failure modes for compilation and parsing. Neither path ever panics
//! on malformed input that originates from outside the process; genuinely
//! impossible states (an offset computed by our own compiler pointing past
//! the end of the buffer) remain `debug_assert!`s.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompilationError {
    #[error("field `{field}` value {value} exceeds its {width}-byte wire width")]
    FieldOverflow {
        field: &'static str,
        value: i64,
        width: u8,
    },
    #[error("deck size violation: total deal size {requested} exceeds deck size {available}")]
    DeckSizeViolation { requested: u32, available: u32 },
    #[error("enum value {value} for `{field}` has no wire representation")]
    UnrepresentableEnum { field: &'static str, value: i64 },
    #[error("player_count {0} is outside the supported 2..=4 range")]
    InvalidPlayerCount(u8),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("buffer too short: need at least {needed} bytes, have {available}")]
    BufferTooShort { needed: usize, available: usize },
    #[error("offset {offset} for `{field}` is out of bounds (buffer length {length})")]
    OffsetOutOfBounds {
        field: &'static str,
        offset: u32,
        length: usize,
    },
    #[error("length prefix {length} for `{field}` exceeds remaining buffer of {remaining}")]
    LengthPrefixExceedsBuffer {
        field: &'static str,
        length: usize,
        remaining: usize,
    },
    #[error("unknown phase tag {0}: evolution must not silently run malformed bytecode")]
    UnknownPhaseTag(u8),
    #[error("unknown opcode {0} in condition record")]
    UnknownOpcode(u8),
}
