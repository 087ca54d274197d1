//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod bosses;
pub mod cards;
pub mod config;
pub mod consumables;
pub mod deck;
pub mod decks;
pub mod events;
pub mod hand;
pub mod inventory;
pub mod jokers;
pub mod rng;
pub mod run;
pub mod score;
pub mod shop;
pub mod state;
pub mod tags;
pub mod vouchers;

pub use bosses::*;
pub use cards::*;
pub use config::*;
pub use consumables::*;
pub use deck::*;
pub use decks::*;
pub use events::*;
pub use hand::*;
pub use inventory::*;
pub use jokers::*;
pub use rng::*;
pub use run::*;
pub use score::*;
pub use shop::*;
pub use state::*;
pub use tags::*;
pub use vouchers::*;
