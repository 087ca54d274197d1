use crate::cards::Suit;
use serde::{Deserialize, Serialize};

/// Boss blind effects. Finishers only appear on antes that are multiples
/// of eight; regular bosses never repeat within a run until the pool runs
/// dry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BossKind {
    Hook,
    Ox,
    Wall,
    Arm,
    Club,
    Goad,
    Window,
    Head,
    Psychic,
    Water,
    Manacle,
    Eye,
    Mouth,
    Plant,
    Serpent,
    Pillar,
    Needle,
    Tooth,
    Flint,
    VerdantLeaf,
    VioletVessel,
    CrimsonHeart,
}

impl BossKind {
    pub const REGULAR: [BossKind; 19] = [
        BossKind::Hook,
        BossKind::Ox,
        BossKind::Wall,
        BossKind::Arm,
        BossKind::Club,
        BossKind::Goad,
        BossKind::Window,
        BossKind::Head,
        BossKind::Psychic,
        BossKind::Water,
        BossKind::Manacle,
        BossKind::Eye,
        BossKind::Mouth,
        BossKind::Plant,
        BossKind::Serpent,
        BossKind::Pillar,
        BossKind::Needle,
        BossKind::Tooth,
        BossKind::Flint,
    ];

    pub const FINISHERS: [BossKind; 3] = [
        BossKind::VerdantLeaf,
        BossKind::VioletVessel,
        BossKind::CrimsonHeart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BossKind::Hook => "The Hook",
            BossKind::Ox => "The Ox",
            BossKind::Wall => "The Wall",
            BossKind::Arm => "The Arm",
            BossKind::Club => "The Club",
            BossKind::Goad => "The Goad",
            BossKind::Window => "The Window",
            BossKind::Head => "The Head",
            BossKind::Psychic => "The Psychic",
            BossKind::Water => "The Water",
            BossKind::Manacle => "The Manacle",
            BossKind::Eye => "The Eye",
            BossKind::Mouth => "The Mouth",
            BossKind::Plant => "The Plant",
            BossKind::Serpent => "The Serpent",
            BossKind::Pillar => "The Pillar",
            BossKind::Needle => "The Needle",
            BossKind::Tooth => "The Tooth",
            BossKind::Flint => "The Flint",
            BossKind::VerdantLeaf => "Verdant Leaf",
            BossKind::VioletVessel => "Violet Vessel",
            BossKind::CrimsonHeart => "Crimson Heart",
        }
    }

    pub fn is_finisher(self) -> bool {
        Self::FINISHERS.contains(&self)
    }

    /// Extra goal multiplier on top of the boss stage multiplier.
    pub fn target_factor(self) -> f64 {
        match self {
            BossKind::Wall => 2.0,
            BossKind::VioletVessel => 3.0,
            _ => 1.0,
        }
    }

    pub fn debuffed_suit(self) -> Option<Suit> {
        match self {
            BossKind::Club => Some(Suit::Clubs),
            BossKind::Goad => Some(Suit::Spades),
            BossKind::Window => Some(Suit::Diamonds),
            BossKind::Head => Some(Suit::Hearts),
            _ => None,
        }
    }

    pub fn debuffs_faces(self) -> bool {
        matches!(self, BossKind::Plant)
    }

    /// Cards played earlier this ante are debuffed.
    pub fn debuffs_replayed(self) -> bool {
        matches!(self, BossKind::Pillar)
    }

    pub fn hands_override(self) -> Option<u8> {
        match self {
            BossKind::Needle => Some(1),
            _ => None,
        }
    }

    pub fn discards_override(self) -> Option<u8> {
        match self {
            BossKind::Water => Some(0),
            _ => None,
        }
    }

    pub fn hand_size_delta(self) -> i8 {
        match self {
            BossKind::Manacle => -1,
            _ => 0,
        }
    }

    pub fn required_play_count(self) -> Option<usize> {
        match self {
            BossKind::Psychic => Some(5),
            _ => None,
        }
    }

    /// Scoring level shift for the played hand.
    pub fn level_delta(self) -> i32 {
        match self {
            BossKind::Arm => -1,
            _ => 0,
        }
    }

    pub fn halves_base(self) -> bool {
        matches!(self, BossKind::Flint)
    }

    pub fn forbids_repeat_hand(self) -> bool {
        matches!(self, BossKind::Eye)
    }

    pub fn locks_first_hand(self) -> bool {
        matches!(self, BossKind::Mouth)
    }

    /// Random held cards discarded after every played hand.
    pub fn discards_after_play(self) -> usize {
        match self {
            BossKind::Hook => 2,
            _ => 0,
        }
    }

    /// Draw exactly this many after a play or discard, regardless of hand
    /// size.
    pub fn fixed_draw(self) -> Option<usize> {
        match self {
            BossKind::Serpent => Some(3),
            _ => None,
        }
    }

    pub fn money_per_played_card(self) -> i64 {
        match self {
            BossKind::Tooth => -1,
            _ => 0,
        }
    }

    pub fn zeroes_money_on_most_played(self) -> bool {
        matches!(self, BossKind::Ox)
    }

    pub fn debuffs_all_until_joker_sold(self) -> bool {
        matches!(self, BossKind::VerdantLeaf)
    }

    pub fn debuffs_random_joker(self) -> bool {
        matches!(self, BossKind::CrimsonHeart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pools_are_disjoint() {
        for boss in BossKind::REGULAR {
            assert!(!boss.is_finisher());
        }
        for boss in BossKind::FINISHERS {
            assert!(boss.is_finisher());
        }
    }

    #[test]
    fn wall_quadruples_relative_to_small() {
        // Boss stage itself doubles; the Wall doubles again.
        assert_eq!(BossKind::Wall.target_factor(), 2.0);
        assert_eq!(BossKind::VioletVessel.target_factor(), 3.0);
    }
}
