//! Special effects triggered by playing a particular rank.

use crate::cards::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EffectKind {
    Skip = 0,
    Reverse = 1,
    DrawCards = 2,
    ExtraTurn = 3,
    ForceDiscard = 4,
}

impl From<u8> for EffectKind {
    fn from(n: u8) -> Self {
        match n {
            0 => EffectKind::Skip,
            1 => EffectKind::Reverse,
            2 => EffectKind::DrawCards,
            3 => EffectKind::ExtraTurn,
            4 => EffectKind::ForceDiscard,
            _ => panic!("invalid effect kind byte: {n}"),
        }
    }
}

/// Who an effect acts on. `SpecificSeat` indexes directly into the seat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EffectTarget {
    NextPlayer,
    AllOpponents,
    SpecificSeat(u8),
}

impl EffectTarget {
    pub fn to_byte(self) -> u8 {
        match self {
            EffectTarget::NextPlayer => 0,
            EffectTarget::AllOpponents => 1,
            EffectTarget::SpecificSeat(seat) => 2 + seat,
        }
    }

    pub fn from_byte(n: u8) -> Self {
        match n {
            0 => EffectTarget::NextPlayer,
            1 => EffectTarget::AllOpponents,
            seat => EffectTarget::SpecificSeat(seat - 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SpecialEffect {
    pub rank: Rank,
    pub effect: EffectKind,
    pub target: EffectTarget,
    pub value: u8,
}

/// O(1) rank -> effect lookup, since `special_effects` is keyed by rank and
/// there are at most 13 ranks.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct EffectTable {
    slots: [Option<SpecialEffect>; 13],
}

impl EffectTable {
    pub fn new(effects: impl IntoIterator<Item = SpecialEffect>) -> Self {
        let mut slots: [Option<SpecialEffect>; 13] = Default::default();
        for effect in effects {
            slots[effect.rank as usize] = Some(effect);
        }
        Self { slots }
    }

    pub fn get(&self, rank: Rank) -> Option<&SpecialEffect> {
        self.slots[rank as usize].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpecialEffect> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
