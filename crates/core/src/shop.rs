use crate::cards::{Card, Edition};
use crate::config::{PackKind, PackSize};
use crate::consumables::Consumable;
use crate::inventory::JokerStickers;
use crate::jokers::JokerKind;
use crate::rng::RngState;
use crate::vouchers::VoucherKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CardOffer {
    Joker {
        kind: JokerKind,
        edition: Option<Edition>,
        stickers: JokerStickers,
        price: i64,
    },
    Consumable {
        consumable: Consumable,
        negative: bool,
        price: i64,
    },
    PlayingCard {
        card: Card,
        price: i64,
    },
}

impl CardOffer {
    pub fn price(&self) -> i64 {
        match self {
            CardOffer::Joker { price, .. }
            | CardOffer::Consumable { price, .. }
            | CardOffer::PlayingCard { price, .. } => *price,
        }
    }

    pub fn label(&self) -> String {
        match self {
            CardOffer::Joker { kind, .. } => kind.name().to_string(),
            CardOffer::Consumable { consumable, .. } => consumable.name().to_string(),
            CardOffer::PlayingCard { card, .. } => format!("{:?} of {:?}", card.rank, card.suit),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackOffer {
    pub kind: PackKind,
    pub size: PackSize,
    pub price: i64,
    pub options: u8,
    pub picks: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PackItem {
    Joker {
        kind: JokerKind,
        edition: Option<Edition>,
    },
    Consumable(Consumable),
    PlayingCard(Card),
}

impl PackItem {
    pub fn label(&self) -> String {
        match self {
            PackItem::Joker { kind, .. } => kind.name().to_string(),
            PackItem::Consumable(consumable) => consumable.name().to_string(),
            PackItem::PlayingCard(card) => format!("{:?} of {:?}", card.rank, card.suit),
        }
    }
}

/// An opened pack waiting for picks. `from_tag` packs return to blind
/// select when finished instead of the shop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackOpen {
    pub kind: PackKind,
    pub size: PackSize,
    pub options: Vec<PackItem>,
    pub picks_left: u8,
    pub from_tag: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopState {
    pub cards: Vec<CardOffer>,
    pub packs: Vec<PackOffer>,
    pub voucher: Option<VoucherKind>,
    pub reroll_cost: i64,
    pub free_rerolls: u32,
    pub paid_rerolls: u32,
    /// Coupon tag: card and pack offers cost nothing this shop.
    pub coupon: bool,
}

/// Weighted pick. A pool whose weights sum to zero falls back to a
/// uniform pick instead of refusing.
pub fn pick_weighted<T: Copy>(items: &[(T, u32)], rng: &mut RngState) -> Option<T> {
    if items.is_empty() {
        return None;
    }
    let total: u64 = items.iter().map(|(_, w)| *w as u64).sum();
    if total == 0 {
        let idx = rng.index(items.len());
        return Some(items[idx].0);
    }
    let mut roll = rng.next_u64() % total;
    for (item, weight) in items {
        let weight = *weight as u64;
        if roll < weight {
            return Some(*item);
        }
        roll -= weight;
    }
    items.last().map(|(item, _)| *item)
}

/// Shop price after discount vouchers, floored at 1. The epsilon keeps
/// exact halves rounding down so discounted prices match the reference
/// tables.
pub fn discounted_price(base: i64, factor: f64) -> i64 {
    (((base as f64) * factor - 1e-9).round() as i64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weight_pool_picks_uniformly() {
        let mut rng = RngState::from_seed(11);
        let items = [(1u8, 0u32), (2, 0), (3, 0)];
        let mut seen = [false; 3];
        for _ in 0..64 {
            let pick = pick_weighted(&items, &mut rng).unwrap();
            seen[(pick - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn weighted_pick_skips_zero_entries_when_total_positive() {
        let mut rng = RngState::from_seed(3);
        let items = [(1u8, 0u32), (2, 5)];
        for _ in 0..32 {
            assert_eq!(pick_weighted(&items, &mut rng), Some(2));
        }
    }

    #[test]
    fn empty_pool_returns_none() {
        let mut rng = RngState::from_seed(0);
        let items: [(u8, u32); 0] = [];
        assert_eq!(pick_weighted(&items, &mut rng), None);
    }

    #[test]
    fn discounts_round_halves_down() {
        assert_eq!(discounted_price(4, 1.0), 4);
        assert_eq!(discounted_price(4, 0.75), 3);
        assert_eq!(discounted_price(3, 0.75), 2);
        assert_eq!(discounted_price(5, 0.5), 2);
        assert_eq!(discounted_price(1, 0.5), 1);
    }
}
