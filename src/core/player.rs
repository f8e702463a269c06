//! Player identity and roster entries.
//!
//! ## PlayerId
//!
//! Opaque, caller-assigned durable identity. The session layer is
//! responsible for authenticating it and keeping it stable across
//! reconnections; the engine only compares ids.
//!
//! ## Player
//!
//! One seat at the table: the private hand plus the status flags that drive
//! turn rotation. A player whose hand empties via a legal play becomes
//! *safe* and leaves the rotation; elimination is flipped by the surrounding
//! round-resolution policy through `Game::eliminate`.

use serde::{Deserialize, Serialize};

use super::card::Card;

/// Durable player identifier, assigned by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// A seat at the table.
///
/// Owned exclusively by the `Game` aggregate; mutated only through validated
/// operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    /// Private hand, in deal/draw order.
    pub hand: Vec<Card>,
    /// Emptied their hand via a legal play; out of rotation, still scored.
    pub is_safe: bool,
    /// Removed by round-resolution policy; out of rotation, still listed.
    pub is_eliminated: bool,
    /// Session-layer connectivity flag; the engine only stores it.
    pub is_connected: bool,
}

impl Player {
    /// Create a freshly seated player with an empty hand.
    #[must_use]
    pub fn new(id: PlayerId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            hand: Vec::new(),
            is_safe: false,
            is_eliminated: false,
            is_connected: true,
        }
    }

    /// Still part of the turn rotation.
    #[must_use]
    pub fn in_rotation(&self) -> bool {
        !self.is_safe && !self.is_eliminated
    }

    /// Remove one physical copy of `card` from the hand.
    ///
    /// Returns true if a copy was found and removed.
    pub fn remove_card(&mut self, card: Card) -> bool {
        if let Some(pos) = self.hand.iter().position(|&c| c == card) {
            self.hand.remove(pos);
            true
        } else {
            false
        }
    }
}
