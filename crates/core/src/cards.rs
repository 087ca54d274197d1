use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
    Wild,
}

impl Suit {
    pub const STANDARD: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds | Suit::Wild)
    }

    pub fn is_black(self) -> bool {
        matches!(self, Suit::Spades | Suit::Clubs | Suit::Wild)
    }

    /// Smeared bucket: Spades/Clubs share 0, Hearts/Diamonds share 1.
    pub fn color_group(self) -> u8 {
        match self {
            Suit::Spades | Suit::Clubs => 0,
            Suit::Hearts | Suit::Diamonds => 1,
            Suit::Wild => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ordering value for straights and high-card ties. Ace is high (14);
    /// ace-low straights are special-cased by the evaluator.
    pub fn order_value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    pub fn chip_value(self) -> i64 {
        match self {
            Rank::Ace => 11,
            Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.order_value() as i64,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    /// Rank one step up, King wrapping to Ace.
    pub fn next_up(self) -> Rank {
        match self {
            Rank::Ace => Rank::Two,
            Rank::Two => Rank::Three,
            Rank::Three => Rank::Four,
            Rank::Four => Rank::Five,
            Rank::Five => Rank::Six,
            Rank::Six => Rank::Seven,
            Rank::Seven => Rank::Eight,
            Rank::Eight => Rank::Nine,
            Rank::Nine => Rank::Ten,
            Rank::Ten => Rank::Jack,
            Rank::Jack => Rank::Queen,
            Rank::Queen => Rank::King,
            Rank::King => Rank::Ace,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Enhancement {
    Bonus,
    Mult,
    Wild,
    Glass,
    Steel,
    Stone,
    Lucky,
    Gold,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Edition {
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Seal {
    Red,
    Blue,
    Gold,
    Purple,
}

/// A playing card. `id` is unique within a run and survives enhancement,
/// copying excepted; `bonus_chips` is the permanent chip bonus some jokers
/// grant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub seal: Option<Seal>,
    #[serde(default)]
    pub bonus_chips: i64,
    #[serde(default)]
    pub id: u32,
}

impl Card {
    pub fn standard(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            enhancement: None,
            edition: None,
            seal: None,
            bonus_chips: 0,
            id: 0,
        }
    }

    pub fn is_wild(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Wild)) || self.suit == Suit::Wild
    }

    pub fn is_stone(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Stone))
    }

    /// Stone cards have no rank for evaluation or chips.
    pub fn order_value(&self) -> Option<u8> {
        if self.is_stone() {
            None
        } else {
            Some(self.rank.order_value())
        }
    }

    pub fn chip_value(&self) -> i64 {
        if self.is_stone() {
            0
        } else {
            self.rank.chip_value()
        }
    }

    pub fn is_face(&self, pareidolia: bool) -> bool {
        if self.is_stone() {
            return false;
        }
        pareidolia || self.rank.is_face()
    }

    pub fn is_red(&self) -> bool {
        self.is_wild() || self.suit.is_red()
    }

    pub fn is_black(&self) -> bool {
        self.is_wild() || self.suit.is_black()
    }

    pub fn is_odd(&self) -> bool {
        !self.is_stone()
            && matches!(
                self.rank,
                Rank::Ace | Rank::Three | Rank::Five | Rank::Seven | Rank::Nine
            )
    }

    pub fn is_even(&self) -> bool {
        !self.is_stone()
            && matches!(
                self.rank,
                Rank::Two | Rank::Four | Rank::Six | Rank::Eight | Rank::Ten
            )
    }

    /// Suit match used by the evaluator and suit-counting jokers. Debuffed
    /// cards match nothing; wild cards match everything.
    pub fn matches_suit(&self, suit: Suit, debuffed: bool, smeared: bool) -> bool {
        if debuffed || self.is_stone() {
            return false;
        }
        if self.is_wild() {
            return true;
        }
        if smeared {
            self.suit.color_group() == suit.color_group()
        } else {
            self.suit == suit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chip_values_follow_printed_ranks() {
        assert_eq!(Rank::Two.chip_value(), 2);
        assert_eq!(Rank::Ten.chip_value(), 10);
        assert_eq!(Rank::Jack.chip_value(), 10);
        assert_eq!(Rank::King.chip_value(), 10);
        assert_eq!(Rank::Ace.chip_value(), 11);
    }

    #[test]
    fn stone_cards_hide_rank_and_suit() {
        let mut card = Card::standard(Suit::Hearts, Rank::King);
        card.enhancement = Some(Enhancement::Stone);
        assert_eq!(card.order_value(), None);
        assert_eq!(card.chip_value(), 0);
        assert!(!card.is_face(false));
        assert!(!card.matches_suit(Suit::Hearts, false, false));
    }

    #[test]
    fn wild_cards_match_every_suit_and_both_colors() {
        let mut card = Card::standard(Suit::Spades, Rank::Four);
        card.enhancement = Some(Enhancement::Wild);
        for suit in Suit::STANDARD {
            assert!(card.matches_suit(suit, false, false));
        }
        assert!(card.is_red() && card.is_black());
        assert!(!card.matches_suit(Suit::Spades, true, false));
    }

    #[test]
    fn smeared_matching_buckets_by_color() {
        let club = Card::standard(Suit::Clubs, Rank::Nine);
        assert!(club.matches_suit(Suit::Spades, false, true));
        assert!(!club.matches_suit(Suit::Hearts, false, true));
    }
}
