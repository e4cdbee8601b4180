//! Shared helpers for encoding optional u8-valued fields where 255 means
//! "any"/"none", matching the wire conventions in.

use crate::cards::{Rank, Suit};

pub const SENTINEL_NONE: u8 = 255;

pub fn encode_optional_suit(suit: Option<Suit>) -> u8 {
    suit.map(|s| s as u8).unwrap_or(SENTINEL_NONE)
}

pub fn decode_optional_suit(byte: u8) -> Option<Suit> {
    if byte == SENTINEL_NONE {
        None
    } else {
        Some(Suit::from(byte))
    }
}

pub fn encode_optional_rank(rank: Option<Rank>) -> u8 {
    rank.map(|r| r as u8).unwrap_or(SENTINEL_NONE)
}

pub fn decode_optional_rank(byte: u8) -> Option<Rank> {
    if byte == SENTINEL_NONE {
        None
    } else {
        Some(Rank::from(byte))
    }
}

/// FNV-1a 64-bit, used only for the genome content hash embedded in the
/// bytecode header. Not cryptographic; just needs to be stable and cheap.
pub fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let mut hash = OFFSET;
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
