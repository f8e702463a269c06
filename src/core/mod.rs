//! Core types: cards, players, deterministic RNG.

pub mod card;
pub mod player;
pub mod rng;

pub use card::{standard_deck, Card, Rank, Suit};
pub use player::{Player, PlayerId};
pub use rng::{GameRng, GameRngState};
