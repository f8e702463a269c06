//! # eights-engine
//!
//! A rule engine for multiplayer Crazy 8's with stacking and counter-play.
//!
//! ## Design Principles
//!
//! 1. **Validate Then Commit**: Every operation checks all of its
//!    preconditions before touching state. A rejected operation leaves the
//!    game byte-for-byte unchanged.
//!
//! 2. **N-Player First**: 2 to 8 seats, direction reversal, and mid-round
//!    rotation shrinkage (safe or eliminated players) are first-class. No
//!    convenience paths that assume 2 players.
//!
//! 3. **Deterministic Replay**: All shuffling and drawing flows through a
//!    seeded `GameRng` whose state serializes, so a persisted game resumes
//!    on the exact same deck.
//!
//! ## Architecture
//!
//! - **Pure Rules Core**: `rules` validates submissions and computes card
//!   effects from borrowed state alone; only `Game` mutates.
//!
//! - **Persistent Event History**: committed operations append to an
//!   `im::Vector`, so snapshots and clones are cheap.
//!
//! - **One Lock Per Game**: `GameTable` hands out exclusive per-game
//!   handles; operations on different games never contend.
//!
//! ## Modules
//!
//! - `core`: Cards, ranks, suits, players, seeded RNG
//! - `error`: The `GameError` taxonomy every operation returns
//! - `zones`: Draw and discard piles, with reshuffle-on-exhaustion
//! - `rules`: Pure play validation and effect computation
//! - `turn`: Seat rotation with direction and removal re-indexing
//! - `game`: The game state machine (lobby through rematch)
//! - `registry`: Concurrent table of live games

pub mod core;
pub mod error;
pub mod game;
pub mod registry;
pub mod rules;
pub mod turn;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{standard_deck, Card, GameRng, GameRngState, Player, PlayerId, Rank, Suit};

pub use crate::error::GameError;

pub use crate::zones::Piles;

pub use crate::rules::{
    compute_effect, playable_from_hand, validate_play, PlayEffect, TableState,
};

pub use crate::turn::{Direction, TurnOrder};

pub use crate::game::{
    DrawOutcome, Game, GameId, GamePhase, PlayAgainStatus, PlayOutcome, DECK_SIZE, MAX_PLAYERS,
    MIN_PLAYERS, PREPARATION_TIMEOUT, STARTING_HAND_SIZE,
};

pub use crate::game::event::{EventKind, GameEvent};
pub use crate::game::snapshot::{GameSnapshot, PlayerPublic};

pub use crate::registry::GameTable;
