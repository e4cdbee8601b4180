//! Header layout constants. All integers are big-endian.

pub const BYTECODE_VERSION: u8 = 2;
/// Monotone content version, bumped whenever a section layout changes
/// within the v2 wire format (independent of `BYTECODE_VERSION`).
pub const CONTENT_VERSION: u32 = 1;
pub const OP_EFFECT_HEADER: u8 = 60;

/// Byte length of the v2 header, version prefix included.
pub const HEADER_LEN_V2: usize = 47;
/// Byte length of the legacy v1 header (no version-prefix byte).
pub const HEADER_LEN_V1: usize = 36;

/// Condition records are fixed-width: opcode, operator, value(4), reference.
pub const CONDITION_RECORD_LEN: usize = 7;
/// Special-effect records: trigger_rank, effect_type, target, value.
pub const EFFECT_RECORD_LEN: usize = 4;
/// Card-scoring records: suit, rank, points(2), trigger.
pub const CARD_SCORING_RECORD_LEN: usize = 5;

#[derive(Debug, Clone, Copy)]
pub struct HeaderV2 {
    pub legacy_version: u32,
    pub genome_id_hash: u64,
    pub player_count: u32,
    pub max_turns: u32,
    pub setup_offset: u32,
    pub turn_offset: u32,
    pub win_offset: u32,
    pub scoring_offset: u32,
    pub tableau_mode: u8,
    pub sequence_direction: u8,
    pub card_scoring_offset: u32,
    pub hand_eval_offset: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct HeaderV1 {
    pub legacy_version: u32,
    pub genome_id_hash: u64,
    pub player_count: u32,
    pub max_turns: u32,
    pub setup_offset: u32,
    pub turn_offset: u32,
    pub win_offset: u32,
    pub scoring_offset: u32,
}
