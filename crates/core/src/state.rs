use crate::bosses::BossKind;
use crate::hand::HandKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Top-level run phase. Mutating actions are gated on it and fail with
/// `RunError::InvalidPhase` before touching anything.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RunPhase {
    SelectingBlind,
    PlayingBlind,
    Shop,
    /// A purchased pack is waiting for picks; finishing returns to the shop.
    OpeningPackShop,
    /// A tag-granted pack is waiting for picks; finishing returns to blind
    /// select.
    OpeningPackTag,
    GameOver,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BlindStage {
    Small,
    Big,
    Boss,
}

impl BlindStage {
    pub fn next(self) -> BlindStage {
        match self {
            BlindStage::Small => BlindStage::Big,
            BlindStage::Big => BlindStage::Boss,
            BlindStage::Boss => BlindStage::Small,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlindStage::Small => "Small Blind",
            BlindStage::Big => "Big Blind",
            BlindStage::Boss => "Boss Blind",
        }
    }
}

/// Per-category level and play count. Levels start at 1 and never drop
/// below it; `played` counts hands of this category over the whole run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandInfo {
    pub level: u32,
    pub played: u32,
}

impl Default for HandInfo {
    fn default() -> Self {
        Self { level: 1, played: 0 }
    }
}

/// Everything that only exists while a blind is being played. The whole
/// struct is dropped when the round ends, so hands/discards/hand-size
/// counters cannot leak across rounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub stage: BlindStage,
    pub goal: i64,
    pub score: i128,
    pub hands_left: u8,
    pub discards_left: u8,
    pub hands_max: u8,
    pub discards_max: u8,
    pub hand_size: usize,
    pub boss: Option<BossKind>,
    /// Hand categories played this round (for The Eye and Card Sharp).
    #[serde(default)]
    pub played_kinds: Vec<HandKind>,
    /// First category played, locked in by The Mouth.
    #[serde(default)]
    pub locked_kind: Option<HandKind>,
    #[serde(default)]
    pub jacks_discarded: u32,
    #[serde(default)]
    pub first_hand_kind: Option<HandKind>,
    #[serde(default)]
    pub boss_disabled: bool,
}

impl RoundState {
    pub fn cleared(&self) -> bool {
        self.score >= self.goal as i128
    }

    pub fn is_final_hand(&self) -> bool {
        self.hands_left == 1
    }
}

/// Sections of the shop addressed by `buy_shop_item`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShopSection {
    Card,
    Pack,
    Voucher,
}

/// Collections addressed by `sell_item`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SellSection {
    Joker,
    Consumable,
}

/// Run-lifetime counters that feed scaling jokers and tag payouts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTotals {
    pub hands_played: u32,
    pub blinds_skipped: u32,
    pub tarots_used: u32,
    pub planets_used: u32,
    pub unused_discards: u32,
    pub packs_skipped: u32,
    pub cards_added: u32,
    pub rerolls: u32,
    /// Distinct planets used, for Satellite's round payout.
    pub planet_kinds_used: HashSet<u8>,
    /// Card ids played earlier this ante, debuffed by The Pillar.
    pub played_ids_ante: HashSet<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_cycle_small_big_boss() {
        assert_eq!(BlindStage::Small.next(), BlindStage::Big);
        assert_eq!(BlindStage::Big.next(), BlindStage::Boss);
        assert_eq!(BlindStage::Boss.next(), BlindStage::Small);
    }

    #[test]
    fn round_clears_on_goal() {
        let mut round = RoundState {
            stage: BlindStage::Small,
            goal: 100,
            score: 99,
            hands_left: 1,
            discards_left: 0,
            hands_max: 4,
            discards_max: 3,
            hand_size: 8,
            boss: None,
            played_kinds: Vec::new(),
            locked_kind: None,
            jacks_discarded: 0,
            first_hand_kind: None,
            boss_disabled: false,
        };
        assert!(!round.cleared());
        round.score = 100;
        assert!(round.cleared());
    }
}
