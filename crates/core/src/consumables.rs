use crate::hand::HandKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ConsumableKind {
    Tarot,
    Planet,
    Spectral,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Tarot {
    Fool,
    Magician,
    HighPriestess,
    Empress,
    Emperor,
    Hierophant,
    Lovers,
    Chariot,
    Justice,
    Hermit,
    WheelOfFortune,
    Strength,
    HangedMan,
    Death,
    Temperance,
    Devil,
    Tower,
    Star,
    Moon,
    Sun,
    Judgement,
    World,
}

impl Tarot {
    pub const ALL: [Tarot; 22] = [
        Tarot::Fool,
        Tarot::Magician,
        Tarot::HighPriestess,
        Tarot::Empress,
        Tarot::Emperor,
        Tarot::Hierophant,
        Tarot::Lovers,
        Tarot::Chariot,
        Tarot::Justice,
        Tarot::Hermit,
        Tarot::WheelOfFortune,
        Tarot::Strength,
        Tarot::HangedMan,
        Tarot::Death,
        Tarot::Temperance,
        Tarot::Devil,
        Tarot::Tower,
        Tarot::Star,
        Tarot::Moon,
        Tarot::Sun,
        Tarot::Judgement,
        Tarot::World,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tarot::Fool => "The Fool",
            Tarot::Magician => "The Magician",
            Tarot::HighPriestess => "The High Priestess",
            Tarot::Empress => "The Empress",
            Tarot::Emperor => "The Emperor",
            Tarot::Hierophant => "The Hierophant",
            Tarot::Lovers => "The Lovers",
            Tarot::Chariot => "The Chariot",
            Tarot::Justice => "Justice",
            Tarot::Hermit => "The Hermit",
            Tarot::WheelOfFortune => "The Wheel of Fortune",
            Tarot::Strength => "Strength",
            Tarot::HangedMan => "The Hanged Man",
            Tarot::Death => "Death",
            Tarot::Temperance => "Temperance",
            Tarot::Devil => "The Devil",
            Tarot::Tower => "The Tower",
            Tarot::Star => "The Star",
            Tarot::Moon => "The Moon",
            Tarot::Sun => "The Sun",
            Tarot::Judgement => "Judgement",
            Tarot::World => "The World",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    PlanetX,
    Ceres,
    Eris,
}

impl Planet {
    pub const ALL: [Planet; 12] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
        Planet::PlanetX,
        Planet::Ceres,
        Planet::Eris,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
            Planet::PlanetX => "Planet X",
            Planet::Ceres => "Ceres",
            Planet::Eris => "Eris",
        }
    }

    pub fn hand(self) -> HandKind {
        match self {
            Planet::Mercury => HandKind::Pair,
            Planet::Venus => HandKind::ThreeOfAKind,
            Planet::Earth => HandKind::FullHouse,
            Planet::Mars => HandKind::FourOfAKind,
            Planet::Jupiter => HandKind::Flush,
            Planet::Saturn => HandKind::Straight,
            Planet::Uranus => HandKind::TwoPair,
            Planet::Neptune => HandKind::StraightFlush,
            Planet::Pluto => HandKind::HighCard,
            Planet::PlanetX => HandKind::FiveOfAKind,
            Planet::Ceres => HandKind::FlushHouse,
            Planet::Eris => HandKind::FlushFive,
        }
    }

    pub fn for_hand(kind: HandKind) -> Planet {
        match kind {
            HandKind::HighCard => Planet::Pluto,
            HandKind::Pair => Planet::Mercury,
            HandKind::TwoPair => Planet::Uranus,
            HandKind::ThreeOfAKind => Planet::Venus,
            HandKind::Straight => Planet::Saturn,
            HandKind::Flush => Planet::Jupiter,
            HandKind::FullHouse => Planet::Earth,
            HandKind::FourOfAKind => Planet::Mars,
            HandKind::StraightFlush => Planet::Neptune,
            HandKind::FiveOfAKind => Planet::PlanetX,
            HandKind::FlushHouse => Planet::Ceres,
            HandKind::FlushFive => Planet::Eris,
        }
    }

    /// Planets for the hidden hands only roll after the hand was played.
    pub fn is_secret(self) -> bool {
        matches!(self, Planet::PlanetX | Planet::Ceres | Planet::Eris)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Spectral {
    Familiar,
    Grim,
    Incantation,
    Talisman,
    Aura,
    Wraith,
    Sigil,
    Ouija,
    Ectoplasm,
    Immolate,
    Ankh,
    DejaVu,
    Hex,
    Trance,
    Medium,
    Cryptid,
    Soul,
    BlackHole,
}

impl Spectral {
    pub const ALL: [Spectral; 18] = [
        Spectral::Familiar,
        Spectral::Grim,
        Spectral::Incantation,
        Spectral::Talisman,
        Spectral::Aura,
        Spectral::Wraith,
        Spectral::Sigil,
        Spectral::Ouija,
        Spectral::Ectoplasm,
        Spectral::Immolate,
        Spectral::Ankh,
        Spectral::DejaVu,
        Spectral::Hex,
        Spectral::Trance,
        Spectral::Medium,
        Spectral::Cryptid,
        Spectral::Soul,
        Spectral::BlackHole,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Spectral::Familiar => "Familiar",
            Spectral::Grim => "Grim",
            Spectral::Incantation => "Incantation",
            Spectral::Talisman => "Talisman",
            Spectral::Aura => "Aura",
            Spectral::Wraith => "Wraith",
            Spectral::Sigil => "Sigil",
            Spectral::Ouija => "Ouija",
            Spectral::Ectoplasm => "Ectoplasm",
            Spectral::Immolate => "Immolate",
            Spectral::Ankh => "Ankh",
            Spectral::DejaVu => "Deja Vu",
            Spectral::Hex => "Hex",
            Spectral::Trance => "Trance",
            Spectral::Medium => "Medium",
            Spectral::Cryptid => "Cryptid",
            Spectral::Soul => "The Soul",
            Spectral::BlackHole => "Black Hole",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Consumable {
    Tarot(Tarot),
    Planet(Planet),
    Spectral(Spectral),
}

impl Consumable {
    pub fn kind(self) -> ConsumableKind {
        match self {
            Consumable::Tarot(_) => ConsumableKind::Tarot,
            Consumable::Planet(_) => ConsumableKind::Planet,
            Consumable::Spectral(_) => ConsumableKind::Spectral,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Consumable::Tarot(t) => t.name(),
            Consumable::Planet(p) => p.name(),
            Consumable::Spectral(s) => s.name(),
        }
    }

    /// Required hand-card targets as `(min, max)`; `None` for untargeted
    /// effects.
    pub fn targets(self) -> Option<(usize, usize)> {
        match self {
            Consumable::Tarot(t) => match t {
                Tarot::Magician | Tarot::Empress | Tarot::Hierophant | Tarot::Strength => {
                    Some((1, 2))
                }
                Tarot::Lovers
                | Tarot::Chariot
                | Tarot::Justice
                | Tarot::Devil
                | Tarot::Tower => Some((1, 1)),
                Tarot::HangedMan => Some((1, 2)),
                Tarot::Death => Some((2, 2)),
                Tarot::Star | Tarot::Moon | Tarot::Sun | Tarot::World => Some((1, 3)),
                _ => None,
            },
            Consumable::Planet(_) => None,
            Consumable::Spectral(s) => match s {
                Spectral::Talisman
                | Spectral::Aura
                | Spectral::DejaVu
                | Spectral::Trance
                | Spectral::Medium
                | Spectral::Cryptid => Some((1, 1)),
                _ => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planet_hand_mapping_round_trips() {
        for planet in Planet::ALL {
            assert_eq!(Planet::for_hand(planet.hand()), planet);
        }
    }

    #[test]
    fn targeted_cards_declare_bounds() {
        assert_eq!(
            Consumable::Tarot(Tarot::Death).targets(),
            Some((2, 2))
        );
        assert_eq!(Consumable::Tarot(Tarot::Hermit).targets(), None);
        assert_eq!(
            Consumable::Spectral(Spectral::Cryptid).targets(),
            Some((1, 1))
        );
        assert_eq!(Consumable::Planet(Planet::Pluto).targets(), None);
    }
}
