use crate::{BlindStage, HandKind, JokerRarity, Rank};
use serde::{Deserialize, Serialize};

/// Base chips/mult for a hand category plus its per-level growth.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HandValue {
    pub chips: i64,
    pub mult: f64,
    pub level_chips: i64,
    pub level_mult: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageRule {
    pub stage: BlindStage,
    pub target_mult: f64,
    pub reward: i64,
    pub can_skip: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShopItemKind {
    Joker,
    Tarot,
    Planet,
    Spectral,
    PlayingCard,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ItemWeight {
    pub kind: ShopItemKind,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: JokerRarity,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackKind {
    Standard,
    Arcana,
    Celestial,
    Spectral,
    Buffoon,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PackSize {
    Normal,
    Jumbo,
    Mega,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackRule {
    pub kind: PackKind,
    pub size: PackSize,
    pub weight: u32,
    pub price: i64,
    pub options: u8,
    pub picks: u8,
}

/// Relative weights for the edition rolled on shop jokers, out of the
/// summed total. Voucher effects scale the non-plain entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EditionWeights {
    pub plain: u32,
    pub foil: u32,
    pub holographic: u32,
    pub polychrome: u32,
    pub negative: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopRule {
    pub card_slots: usize,
    pub pack_slots: usize,
    pub item_weights: Vec<ItemWeight>,
    pub rarity_weights: Vec<RarityWeight>,
    pub packs: Vec<PackRule>,
    pub editions: EditionWeights,
    pub prices: PriceTable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceTable {
    pub joker_common: i64,
    pub joker_uncommon: i64,
    pub joker_rare: i64,
    pub joker_legendary: i64,
    pub tarot: i64,
    pub planet: i64,
    pub spectral: i64,
    pub playing_card: i64,
    pub voucher: i64,
    pub foil: i64,
    pub holographic: i64,
    pub polychrome: i64,
    pub negative: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EconomyRule {
    pub starting_money: i64,
    pub interest_step: i64,
    pub interest_per: i64,
    pub interest_cap: i64,
    pub hand_reward: i64,
    pub reroll_base: i64,
    pub reroll_step: i64,
    pub sell_min: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub hands: u8,
    pub discards: u8,
    pub hand_size: usize,
    pub joker_slots: usize,
    pub consumable_slots: usize,
    pub hand_values: Vec<(HandKind, HandValue)>,
    pub rank_chips: Vec<(Rank, i64)>,
    pub stages: Vec<StageRule>,
    pub ante_targets: Vec<i64>,
    /// Target growth per ante past the end of the table (endless play).
    pub endless_step: i64,
    pub shop: ShopRule,
    pub economy: EconomyRule,
}

impl GameConfig {
    /// Base chip target for an ante, before stage/deck/stake multipliers.
    pub fn ante_base(&self, ante: u32) -> i64 {
        if ante == 0 {
            return 0;
        }
        let idx = (ante - 1) as usize;
        match self.ante_targets.get(idx) {
            Some(base) => *base,
            None => {
                let last = self.ante_targets.last().copied().unwrap_or(100);
                let extra = (idx + 1 - self.ante_targets.len()) as i64;
                last + self.endless_step * extra
            }
        }
    }

    pub fn stage_rule(&self, stage: BlindStage) -> StageRule {
        self.stages
            .iter()
            .copied()
            .find(|rule| rule.stage == stage)
            .unwrap_or(StageRule {
                stage,
                target_mult: 1.0,
                reward: 0,
                can_skip: false,
            })
    }

    pub fn hand_value(&self, kind: HandKind) -> HandValue {
        self.hand_values
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, v)| *v)
            .unwrap_or(HandValue {
                chips: 5,
                mult: 1.0,
                level_chips: 10,
                level_mult: 1.0,
            })
    }

    pub fn rank_chip_value(&self, rank: Rank) -> i64 {
        self.rank_chips
            .iter()
            .find(|(r, _)| *r == rank)
            .map(|(_, chips)| *chips)
            .unwrap_or_else(|| rank.chip_value())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hands: 4,
            discards: 3,
            hand_size: 8,
            joker_slots: 5,
            consumable_slots: 2,
            hand_values: default_hand_values(),
            rank_chips: Rank::ALL.iter().map(|r| (*r, r.chip_value())).collect(),
            stages: vec![
                StageRule {
                    stage: BlindStage::Small,
                    target_mult: 1.0,
                    reward: 3,
                    can_skip: true,
                },
                StageRule {
                    stage: BlindStage::Big,
                    target_mult: 1.5,
                    reward: 4,
                    can_skip: true,
                },
                StageRule {
                    stage: BlindStage::Boss,
                    target_mult: 2.0,
                    reward: 5,
                    can_skip: false,
                },
            ],
            ante_targets: vec![100, 300, 800, 2000, 5000, 11000, 20000, 35000],
            endless_step: 15000,
            shop: ShopRule::default(),
            economy: EconomyRule::default(),
        }
    }
}

impl Default for ShopRule {
    fn default() -> Self {
        Self {
            card_slots: 2,
            pack_slots: 2,
            item_weights: vec![
                ItemWeight {
                    kind: ShopItemKind::Joker,
                    weight: 20,
                },
                ItemWeight {
                    kind: ShopItemKind::Tarot,
                    weight: 4,
                },
                ItemWeight {
                    kind: ShopItemKind::Planet,
                    weight: 4,
                },
                ItemWeight {
                    kind: ShopItemKind::Spectral,
                    weight: 0,
                },
                ItemWeight {
                    kind: ShopItemKind::PlayingCard,
                    weight: 0,
                },
            ],
            rarity_weights: vec![
                RarityWeight {
                    rarity: JokerRarity::Common,
                    weight: 70,
                },
                RarityWeight {
                    rarity: JokerRarity::Uncommon,
                    weight: 25,
                },
                RarityWeight {
                    rarity: JokerRarity::Rare,
                    weight: 5,
                },
            ],
            packs: default_packs(),
            editions: EditionWeights {
                plain: 960,
                foil: 20,
                holographic: 14,
                polychrome: 3,
                negative: 3,
            },
            prices: PriceTable::default(),
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            joker_common: 4,
            joker_uncommon: 7,
            joker_rare: 9,
            joker_legendary: 20,
            tarot: 3,
            planet: 3,
            spectral: 4,
            playing_card: 1,
            voucher: 10,
            foil: 2,
            holographic: 3,
            polychrome: 5,
            negative: 5,
        }
    }
}

impl Default for EconomyRule {
    fn default() -> Self {
        Self {
            starting_money: 4,
            interest_step: 5,
            interest_per: 1,
            interest_cap: 5,
            hand_reward: 1,
            reroll_base: 5,
            reroll_step: 1,
            sell_min: 1,
        }
    }
}

fn default_hand_values() -> Vec<(HandKind, HandValue)> {
    fn value(chips: i64, mult: f64, level_chips: i64, level_mult: f64) -> HandValue {
        HandValue {
            chips,
            mult,
            level_chips,
            level_mult,
        }
    }
    vec![
        (HandKind::HighCard, value(5, 1.0, 10, 1.0)),
        (HandKind::Pair, value(10, 2.0, 15, 1.0)),
        (HandKind::TwoPair, value(20, 2.0, 20, 1.0)),
        (HandKind::ThreeOfAKind, value(30, 3.0, 20, 2.0)),
        (HandKind::Straight, value(30, 4.0, 30, 3.0)),
        (HandKind::Flush, value(35, 4.0, 15, 2.0)),
        (HandKind::FullHouse, value(40, 4.0, 25, 2.0)),
        (HandKind::FourOfAKind, value(60, 7.0, 30, 3.0)),
        (HandKind::StraightFlush, value(100, 8.0, 40, 4.0)),
        (HandKind::FiveOfAKind, value(120, 12.0, 35, 3.0)),
        (HandKind::FlushHouse, value(140, 14.0, 40, 4.0)),
        (HandKind::FlushFive, value(160, 16.0, 50, 3.0)),
    ]
}

fn default_packs() -> Vec<PackRule> {
    let mut packs = Vec::new();
    for kind in [
        PackKind::Standard,
        PackKind::Arcana,
        PackKind::Celestial,
        PackKind::Buffoon,
        PackKind::Spectral,
    ] {
        let base = match kind {
            PackKind::Standard | PackKind::Arcana | PackKind::Celestial => 40,
            PackKind::Buffoon => 12,
            PackKind::Spectral => 6,
        };
        packs.push(PackRule {
            kind,
            size: PackSize::Normal,
            weight: base,
            price: 4,
            options: 3,
            picks: 1,
        });
        packs.push(PackRule {
            kind,
            size: PackSize::Jumbo,
            weight: base / 2,
            price: 6,
            options: 5,
            picks: 1,
        });
        packs.push(PackRule {
            kind,
            size: PackSize::Mega,
            weight: (base / 8).max(1),
            price: 8,
            options: 5,
            picks: 2,
        });
    }
    packs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ante_one_base_is_one_hundred() {
        let config = GameConfig::default();
        assert_eq!(config.ante_base(1), 100);
        assert_eq!(config.ante_base(8), 35000);
    }

    #[test]
    fn endless_antes_keep_growing() {
        let config = GameConfig::default();
        assert_eq!(config.ante_base(9), 50000);
        assert_eq!(config.ante_base(10), 65000);
    }

    #[test]
    fn every_hand_kind_has_a_value() {
        let config = GameConfig::default();
        for kind in HandKind::ALL {
            let value = config.hand_value(kind);
            assert!(value.chips > 0);
            assert!(value.mult >= 1.0);
        }
    }
}
