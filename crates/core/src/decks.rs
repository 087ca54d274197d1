use crate::cards::{Card, Rank, Suit};
use crate::consumables::{Consumable, Spectral, Tarot};
use crate::rng::RngState;
use crate::vouchers::VoucherKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DeckKind {
    Red,
    Blue,
    Yellow,
    Green,
    Black,
    Magic,
    Nebula,
    Ghost,
    Abandoned,
    Checkered,
    Zodiac,
    Painted,
    Anaglyph,
    Plasma,
    Erratic,
}

/// Flat adjustments a deck applies at run start.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeckMods {
    pub hands: i8,
    pub discards: i8,
    pub hand_size: i8,
    pub joker_slots: i8,
    pub consumable_slots: i8,
    pub money: i64,
    pub no_interest: bool,
}

impl DeckKind {
    pub const ALL: [DeckKind; 15] = [
        DeckKind::Red,
        DeckKind::Blue,
        DeckKind::Yellow,
        DeckKind::Green,
        DeckKind::Black,
        DeckKind::Magic,
        DeckKind::Nebula,
        DeckKind::Ghost,
        DeckKind::Abandoned,
        DeckKind::Checkered,
        DeckKind::Zodiac,
        DeckKind::Painted,
        DeckKind::Anaglyph,
        DeckKind::Plasma,
        DeckKind::Erratic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DeckKind::Red => "Red Deck",
            DeckKind::Blue => "Blue Deck",
            DeckKind::Yellow => "Yellow Deck",
            DeckKind::Green => "Green Deck",
            DeckKind::Black => "Black Deck",
            DeckKind::Magic => "Magic Deck",
            DeckKind::Nebula => "Nebula Deck",
            DeckKind::Ghost => "Ghost Deck",
            DeckKind::Abandoned => "Abandoned Deck",
            DeckKind::Checkered => "Checkered Deck",
            DeckKind::Zodiac => "Zodiac Deck",
            DeckKind::Painted => "Painted Deck",
            DeckKind::Anaglyph => "Anaglyph Deck",
            DeckKind::Plasma => "Plasma Deck",
            DeckKind::Erratic => "Erratic Deck",
        }
    }

    pub fn mods(self) -> DeckMods {
        let mut mods = DeckMods::default();
        match self {
            DeckKind::Red => mods.discards = 1,
            DeckKind::Blue => mods.hands = 1,
            DeckKind::Yellow => mods.money = 10,
            DeckKind::Green => {
                mods.no_interest = true;
            }
            DeckKind::Black => {
                mods.joker_slots = 1;
                mods.hands = -1;
            }
            DeckKind::Nebula => mods.consumable_slots = -1,
            DeckKind::Painted => {
                mods.hand_size = 2;
                mods.joker_slots = -1;
            }
            _ => {}
        }
        mods
    }

    /// Chips and mult are averaged and squared instead of multiplied.
    pub fn balanced_scoring(self) -> bool {
        matches!(self, DeckKind::Plasma)
    }

    pub fn blind_factor(self) -> f64 {
        if matches!(self, DeckKind::Plasma) {
            2.0
        } else {
            1.0
        }
    }

    /// Green deck trades interest for per-hand/discard payouts at round end.
    pub fn unused_hand_bonus(self) -> i64 {
        if matches!(self, DeckKind::Green) {
            2
        } else {
            0
        }
    }

    pub fn unused_discard_bonus(self) -> i64 {
        if matches!(self, DeckKind::Green) {
            1
        } else {
            0
        }
    }

    pub fn double_tag_after_boss(self) -> bool {
        matches!(self, DeckKind::Anaglyph)
    }

    pub fn spectral_in_shop(self) -> bool {
        matches!(self, DeckKind::Ghost)
    }

    pub fn start_vouchers(self) -> Vec<VoucherKind> {
        match self {
            DeckKind::Magic => vec![VoucherKind::CrystalBall],
            DeckKind::Nebula => vec![VoucherKind::Telescope],
            DeckKind::Zodiac => vec![
                VoucherKind::TarotMerchant,
                VoucherKind::PlanetMerchant,
                VoucherKind::Overstock,
            ],
            _ => Vec::new(),
        }
    }

    pub fn start_consumables(self) -> Vec<Consumable> {
        match self {
            DeckKind::Magic => vec![
                Consumable::Tarot(Tarot::Fool),
                Consumable::Tarot(Tarot::Fool),
            ],
            DeckKind::Ghost => vec![Consumable::Spectral(Spectral::Hex)],
            _ => Vec::new(),
        }
    }

    /// Starting card list. Ids are assigned by the run after shuffling.
    pub fn build_cards(self, rng: &mut RngState) -> Vec<Card> {
        match self {
            DeckKind::Checkered => {
                let mut cards = Vec::with_capacity(52);
                for suit in [Suit::Spades, Suit::Hearts] {
                    for rank in Rank::ALL {
                        cards.push(Card::standard(suit, rank));
                        cards.push(Card::standard(suit, rank));
                    }
                }
                cards
            }
            DeckKind::Abandoned => {
                let mut cards = Vec::with_capacity(40);
                for suit in Suit::STANDARD {
                    for rank in Rank::ALL {
                        if !rank.is_face() {
                            cards.push(Card::standard(suit, rank));
                        }
                    }
                }
                cards
            }
            DeckKind::Erratic => {
                let mut cards = Vec::with_capacity(52);
                for _ in 0..52 {
                    let suit = Suit::STANDARD[rng.index(Suit::STANDARD.len())];
                    let rank = Rank::ALL[rng.index(Rank::ALL.len())];
                    cards.push(Card::standard(suit, rank));
                }
                cards
            }
            _ => {
                let mut cards = Vec::with_capacity(52);
                for suit in Suit::STANDARD {
                    for rank in Rank::ALL {
                        cards.push(Card::standard(suit, rank));
                    }
                }
                cards
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StakeKind {
    White,
    Red,
    Green,
    Black,
    Blue,
    Purple,
    Orange,
    Gold,
}

impl StakeKind {
    pub const ALL: [StakeKind; 8] = [
        StakeKind::White,
        StakeKind::Red,
        StakeKind::Green,
        StakeKind::Black,
        StakeKind::Blue,
        StakeKind::Purple,
        StakeKind::Orange,
        StakeKind::Gold,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StakeKind::White => "White Stake",
            StakeKind::Red => "Red Stake",
            StakeKind::Green => "Green Stake",
            StakeKind::Black => "Black Stake",
            StakeKind::Blue => "Blue Stake",
            StakeKind::Purple => "Purple Stake",
            StakeKind::Orange => "Orange Stake",
            StakeKind::Gold => "Gold Stake",
        }
    }

    /// Stake effects are cumulative: each tier carries every lower one.
    pub fn includes(self, other: StakeKind) -> bool {
        self as u8 >= other as u8
    }

    pub fn target_factor(self, ante: u32) -> f64 {
        let mut factor = 1.0;
        if self.includes(StakeKind::Green) && ante > 1 {
            factor *= 1.0 + 0.25 * (ante - 1) as f64;
        }
        if self.includes(StakeKind::Purple) && ante >= 2 {
            factor *= 1.5;
        }
        factor
    }

    pub fn discard_delta(self) -> i8 {
        if self.includes(StakeKind::Blue) {
            -1
        } else {
            0
        }
    }

    pub fn small_blind_pays(self) -> bool {
        !self.includes(StakeKind::Red)
    }

    /// Percent chance a shop joker rolls the matching sticker.
    pub fn eternal_percent(self) -> u64 {
        if self.includes(StakeKind::Black) {
            30
        } else {
            0
        }
    }

    pub fn perishable_percent(self) -> u64 {
        if self.includes(StakeKind::Orange) {
            30
        } else {
            0
        }
    }

    pub fn rental_percent(self) -> u64 {
        if self.includes(StakeKind::Gold) {
            30
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkered_deck_has_two_suits_only() {
        let mut rng = RngState::from_seed(0);
        let cards = DeckKind::Checkered.build_cards(&mut rng);
        assert_eq!(cards.len(), 52);
        assert!(cards
            .iter()
            .all(|c| matches!(c.suit, Suit::Spades | Suit::Hearts)));
    }

    #[test]
    fn abandoned_deck_has_no_faces() {
        let mut rng = RngState::from_seed(0);
        let cards = DeckKind::Abandoned.build_cards(&mut rng);
        assert_eq!(cards.len(), 40);
        assert!(cards.iter().all(|c| !c.rank.is_face()));
    }

    #[test]
    fn erratic_deck_is_seed_stable() {
        let a = DeckKind::Erratic.build_cards(&mut RngState::from_seed(5));
        let b = DeckKind::Erratic.build_cards(&mut RngState::from_seed(5));
        assert_eq!(a, b);
    }

    #[test]
    fn stakes_are_cumulative() {
        assert!(StakeKind::Gold.includes(StakeKind::Blue));
        assert!(!StakeKind::Red.includes(StakeKind::Green));
        assert_eq!(StakeKind::Blue.discard_delta(), -1);
        assert_eq!(StakeKind::White.target_factor(8), 1.0);
        assert!(StakeKind::Purple.target_factor(2) > 1.0);
    }
}
