//! Condition records: the small boolean expression language evaluated to
//! guard optional draws, plays, and valid-play filters.
//!
//! Wire format (7 bytes): opcode:1, operator:1, value:4, reference:1.
//! Opcodes 0..14 are leaf state predicates, 20..35 are "can-act" predicates,
//! 40..41 are compound AND/OR (the `value` field doubles as the nested
//! child count), and operator bytes 50..55 are the comparison operators
//! applied to a leaf predicate's observed value.

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ComparisonOperator {
    Equal = 50,
    NotEqual = 51,
    GreaterThan = 52,
    LessThan = 53,
    GreaterOrEqual = 54,
    LessOrEqual = 55,
}

impl ComparisonOperator {
    pub fn apply(&self, observed: i32, value: i32) -> bool {
        match self {
            ComparisonOperator::Equal => observed == value,
            ComparisonOperator::NotEqual => observed != value,
            ComparisonOperator::GreaterThan => observed > value,
            ComparisonOperator::LessThan => observed < value,
            ComparisonOperator::GreaterOrEqual => observed >= value,
            ComparisonOperator::LessOrEqual => observed <= value,
        }
    }
}

impl From<u8> for ComparisonOperator {
    fn from(n: u8) -> Self {
        match n {
            50 => ComparisonOperator::Equal,
            51 => ComparisonOperator::NotEqual,
            52 => ComparisonOperator::GreaterThan,
            53 => ComparisonOperator::LessThan,
            54 => ComparisonOperator::GreaterOrEqual,
            55 => ComparisonOperator::LessOrEqual,
            _ => panic!("invalid comparison operator byte: {n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Predicate {
    HandSize = 0,
    TableauEmpty = 1,
    DiscardEmpty = 2,
    DeckEmpty = 3,
    IsLeader = 4,
    TopDiscardRank = 5,
    TopDiscardSuit = 6,
    TableauTopRank = 7,
    Score = 8,
    Chips = 9,
    TurnNumber = 10,
    PlayersRemaining = 11,
    HasWildcardInHand = 12,
    LeadSuitMatches = 13,
    Always = 14,
    CanDraw = 20,
    CanPlay = 21,
    CanDiscard = 22,
    CanCapture = 23,
    CanChallenge = 24,
    CanBet = 25,
    CanRaise = 26,
    CanFold = 27,
    CanCall = 28,
    CanCheck = 29,
    CanAllIn = 30,
    CanBid = 31,
    CanDeclareNil = 32,
    CanExtendSequence = 33,
    CanStartPile = 34,
    CanStand = 35,
}

impl Predicate {
    pub const AND: u8 = 40;
    pub const OR: u8 = 41;

    pub fn from_opcode(n: u8) -> Option<Self> {
        use Predicate::*;
        Some(match n {
            0 => HandSize,
            1 => TableauEmpty,
            2 => DiscardEmpty,
            3 => DeckEmpty,
            4 => IsLeader,
            5 => TopDiscardRank,
            6 => TopDiscardSuit,
            7 => TableauTopRank,
            8 => Score,
            9 => Chips,
            10 => TurnNumber,
            11 => PlayersRemaining,
            12 => HasWildcardInHand,
            13 => LeadSuitMatches,
            14 => Always,
            20 => CanDraw,
            21 => CanPlay,
            22 => CanDiscard,
            23 => CanCapture,
            24 => CanChallenge,
            25 => CanBet,
            26 => CanRaise,
            27 => CanFold,
            28 => CanCall,
            29 => CanCheck,
            30 => CanAllIn,
            31 => CanBid,
            32 => CanDeclareNil,
            33 => CanExtendSequence,
            34 => CanStartPile,
            35 => CanStand,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Condition {
    Leaf {
        predicate: Predicate,
        operator: ComparisonOperator,
        value: i32,
        reference: u8,
    },
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

impl Condition {
    pub fn always() -> Self {
        Condition::Leaf {
            predicate: Predicate::Always,
            operator: ComparisonOperator::Equal,
            value: 1,
            reference: 0,
        }
    }

    /// Number of 7-byte records this condition occupies, including nested children.
    pub fn encoded_len(&self) -> u32 {
        match self {
            Condition::Leaf { .. } => 1,
            Condition::And(children) | Condition::Or(children) => {
                1 + children.iter().map(Condition::encoded_len).sum::<u32>()
            }
        }
    }
}
