use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JokerRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

macro_rules! define_jokers {
    ($($variant:ident => $name:literal,)+) => {
        /// Every joker in the game. Declaration order groups rarities so
        /// `rarity` can range-match on the discriminant; the group
        /// boundaries are checked by tests.
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub enum JokerKind {
            $($variant,)+
        }

        impl JokerKind {
            pub const ALL: &'static [JokerKind] = &[$(JokerKind::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(JokerKind::$variant => $name,)+
                }
            }
        }
    };
}

define_jokers! {
    // Common
    Joker => "Joker",
    GreedyJoker => "Greedy Joker",
    LustyJoker => "Lusty Joker",
    WrathfulJoker => "Wrathful Joker",
    GluttonousJoker => "Gluttonous Joker",
    JollyJoker => "Jolly Joker",
    ZanyJoker => "Zany Joker",
    MadJoker => "Mad Joker",
    CrazyJoker => "Crazy Joker",
    DrollJoker => "Droll Joker",
    SlyJoker => "Sly Joker",
    WilyJoker => "Wily Joker",
    CleverJoker => "Clever Joker",
    DeviousJoker => "Devious Joker",
    CraftyJoker => "Crafty Joker",
    HalfJoker => "Half Joker",
    CreditCard => "Credit Card",
    Banner => "Banner",
    MysticSummit => "Mystic Summit",
    EightBall => "8 Ball",
    Misprint => "Misprint",
    RaisedFist => "Raised Fist",
    ChaosTheClown => "Chaos the Clown",
    ScaryFace => "Scary Face",
    AbstractJoker => "Abstract Joker",
    DelayedGratification => "Delayed Gratification",
    GrosMichel => "Gros Michel",
    EvenSteven => "Even Steven",
    OddTodd => "Odd Todd",
    Scholar => "Scholar",
    BusinessCard => "Business Card",
    Supernova => "Supernova",
    RideTheBus => "Ride the Bus",
    Egg => "Egg",
    Runner => "Runner",
    IceCream => "Ice Cream",
    Splash => "Splash",
    BlueJoker => "Blue Joker",
    FacelessJoker => "Faceless Joker",
    GreenJoker => "Green Joker",
    Superposition => "Superposition",
    ToDoList => "To Do List",
    Cavendish => "Cavendish",
    RedCard => "Red Card",
    SquareJoker => "Square Joker",
    RiffRaff => "Riff-Raff",
    Photograph => "Photograph",
    ReservedParking => "Reserved Parking",
    MailInRebate => "Mail-In Rebate",
    Hallucination => "Hallucination",
    FortuneTeller => "Fortune Teller",
    Juggler => "Juggler",
    Drunkard => "Drunkard",
    GoldenJoker => "Golden Joker",
    Popcorn => "Popcorn",
    WalkieTalkie => "Walkie Talkie",
    SmileyFace => "Smiley Face",
    GoldenTicket => "Golden Ticket",
    Swashbuckler => "Swashbuckler",
    HangingChad => "Hanging Chad",
    ShootTheMoon => "Shoot the Moon",
    // Uncommon
    JokerStencil => "Joker Stencil",
    FourFingers => "Four Fingers",
    Mime => "Mime",
    CeremonialDagger => "Ceremonial Dagger",
    Marble => "Marble Joker",
    LoyaltyCard => "Loyalty Card",
    Dusk => "Dusk",
    Fibonacci => "Fibonacci",
    SteelJoker => "Steel Joker",
    Hack => "Hack",
    Pareidolia => "Pareidolia",
    SpaceJoker => "Space Joker",
    Burglar => "Burglar",
    Blackboard => "Blackboard",
    SixthSense => "Sixth Sense",
    Constellation => "Constellation",
    Hiker => "Hiker",
    CardSharp => "Card Sharp",
    Madness => "Madness",
    Seance => "Seance",
    Vampire => "Vampire",
    Shortcut => "Shortcut",
    Hologram => "Hologram",
    CloudNine => "Cloud 9",
    Rocket => "Rocket",
    MidasMask => "Midas Mask",
    Luchador => "Luchador",
    GiftCard => "Gift Card",
    TurtleBean => "Turtle Bean",
    Erosion => "Erosion",
    ToTheMoon => "To the Moon",
    StoneJoker => "Stone Joker",
    LuckyCat => "Lucky Cat",
    Bull => "Bull",
    DietCola => "Diet Cola",
    TradingCard => "Trading Card",
    FlashCard => "Flash Card",
    SpareTrousers => "Spare Trousers",
    Ramen => "Ramen",
    Seltzer => "Seltzer",
    Castle => "Castle",
    MrBones => "Mr. Bones",
    Acrobat => "Acrobat",
    SockAndBuskin => "Sock and Buskin",
    Troubadour => "Troubadour",
    Certificate => "Certificate",
    SmearedJoker => "Smeared Joker",
    Throwback => "Throwback",
    RoughGem => "Rough Gem",
    Bloodstone => "Bloodstone",
    Arrowhead => "Arrowhead",
    OnyxAgate => "Onyx Agate",
    GlassJoker => "Glass Joker",
    Showman => "Showman",
    FlowerPot => "Flower Pot",
    MerryAndy => "Merry Andy",
    OopsAllSixes => "Oops! All 6s",
    TheIdol => "The Idol",
    SeeingDouble => "Seeing Double",
    Matador => "Matador",
    Satellite => "Satellite",
    Cartomancer => "Cartomancer",
    Astronomer => "Astronomer",
    Bootstraps => "Bootstraps",
    // Rare
    Dna => "DNA",
    Vagabond => "Vagabond",
    Baron => "Baron",
    Obelisk => "Obelisk",
    BaseballCard => "Baseball Card",
    AncientJoker => "Ancient Joker",
    Campfire => "Campfire",
    Blueprint => "Blueprint",
    WeeJoker => "Wee Joker",
    HitTheRoad => "Hit the Road",
    TheDuo => "The Duo",
    TheTrio => "The Trio",
    TheFamily => "The Family",
    TheOrder => "The Order",
    TheTribe => "The Tribe",
    Stuntman => "Stuntman",
    InvisibleJoker => "Invisible Joker",
    Brainstorm => "Brainstorm",
    DriversLicense => "Driver's License",
    BurntJoker => "Burnt Joker",
    // Legendary
    Canio => "Canio",
    Triboulet => "Triboulet",
    Yorick => "Yorick",
    Chicot => "Chicot",
    Perkeo => "Perkeo",
}

const UNCOMMON_START: u16 = JokerKind::JokerStencil as u16;
const RARE_START: u16 = JokerKind::Dna as u16;
const LEGENDARY_START: u16 = JokerKind::Canio as u16;

impl JokerKind {
    pub fn rarity(self) -> JokerRarity {
        let idx = self as u16;
        if idx >= LEGENDARY_START {
            JokerRarity::Legendary
        } else if idx >= RARE_START {
            JokerRarity::Rare
        } else if idx >= UNCOMMON_START {
            JokerRarity::Uncommon
        } else {
            JokerRarity::Common
        }
    }

    pub fn is_copier(self) -> bool {
        matches!(self, JokerKind::Blueprint | JokerKind::Brainstorm)
    }

    /// Starting values for the counters a joker carries in its `vars`.
    pub fn initial_vars(self) -> &'static [(&'static str, f64)] {
        match self {
            JokerKind::IceCream => &[("chips", 100.0)],
            JokerKind::Popcorn => &[("mult", 20.0)],
            JokerKind::Ramen => &[("xmult", 2.0)],
            JokerKind::Seltzer => &[("rounds", 10.0)],
            JokerKind::TurtleBean => &[("hand_size", 5.0)],
            JokerKind::Rocket => &[("payout", 1.0)],
            JokerKind::GlassJoker
            | JokerKind::Hologram
            | JokerKind::Madness
            | JokerKind::Vampire
            | JokerKind::Obelisk
            | JokerKind::Constellation
            | JokerKind::LuckyCat
            | JokerKind::Canio
            | JokerKind::Yorick
            | JokerKind::Campfire
            | JokerKind::HitTheRoad => &[("xmult", 1.0)],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_counts_per_rarity() {
        let count = |rarity: JokerRarity| {
            JokerKind::ALL
                .iter()
                .filter(|k| k.rarity() == rarity)
                .count()
        };
        assert_eq!(JokerKind::ALL.len(), 150);
        assert_eq!(count(JokerRarity::Common), 61);
        assert_eq!(count(JokerRarity::Uncommon), 64);
        assert_eq!(count(JokerRarity::Rare), 20);
        assert_eq!(count(JokerRarity::Legendary), 5);
    }

    #[test]
    fn rarity_boundaries_hold() {
        assert_eq!(JokerKind::ShootTheMoon.rarity(), JokerRarity::Common);
        assert_eq!(JokerKind::JokerStencil.rarity(), JokerRarity::Uncommon);
        assert_eq!(JokerKind::Bootstraps.rarity(), JokerRarity::Uncommon);
        assert_eq!(JokerKind::Dna.rarity(), JokerRarity::Rare);
        assert_eq!(JokerKind::BurntJoker.rarity(), JokerRarity::Rare);
        assert_eq!(JokerKind::Canio.rarity(), JokerRarity::Legendary);
        assert_eq!(JokerKind::Perkeo.rarity(), JokerRarity::Legendary);
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = JokerKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), JokerKind::ALL.len());
    }
}
