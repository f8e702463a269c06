//! Immutable per-viewer projections of game state.
//!
//! A snapshot carries public fields only: hand *sizes* for every player,
//! full hand contents only for the viewer it was built for. The surrounding
//! service broadcasts each participant their own snapshot after every
//! committed operation.

use serde::{Deserialize, Serialize};

use crate::core::{Card, PlayerId, Suit};
use crate::turn::Direction;

use super::{GameId, GamePhase};

/// Public view of one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub display_name: String,
    pub hand_size: usize,
    pub is_safe: bool,
    pub is_eliminated: bool,
    pub is_connected: bool,
}

/// Read-only projection of a game, suitable for broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub phase: GamePhase,
    pub round_number: u32,
    pub creator: PlayerId,
    /// Seating order, including safe and eliminated players.
    pub players: Vec<PlayerPublic>,
    pub current_player: Option<PlayerId>,
    pub direction: Direction,
    pub discard_top: Option<Card>,
    pub declared_suit: Option<Suit>,
    pub draw_stack: u32,
    pub draw_pile_size: usize,
    pub discard_pile_size: usize,
    /// Who this snapshot was built for; `None` for spectators.
    pub viewer: Option<PlayerId>,
    /// The viewer's own hand. `None` in spectator snapshots.
    pub hand: Option<Vec<Card>>,
}

impl GameSnapshot {
    /// Public hand size of a given player, if seated.
    #[must_use]
    pub fn hand_size(&self, player: PlayerId) -> Option<usize> {
        self.players
            .iter()
            .find(|p| p.id == player)
            .map(|p| p.hand_size)
    }
}
