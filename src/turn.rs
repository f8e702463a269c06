//! Turn rotation over the active-player roster.
//!
//! [`TurnOrder`] owns the current-player index and the direction of play
//! over the players still in rotation. Removing a player (on going safe or
//! being eliminated) re-indexes the current pointer so the next `advance`
//! still lands on the correct surviving seat in either direction. This is
//! the most error-prone math in the engine and is covered by model-based
//! property tests.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Direction of play around the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Step delta: +1 clockwise, -1 counter-clockwise.
    #[must_use]
    pub const fn delta(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// Rotation state over the active players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    /// Active players in seating order. Safe/eliminated players are absent.
    seats: Vec<PlayerId>,
    /// Index of the current player within `seats`.
    current: usize,
    direction: Direction,
}

impl TurnOrder {
    /// Build a rotation starting at the first seat, clockwise.
    #[must_use]
    pub fn new(seats: Vec<PlayerId>) -> Self {
        Self {
            seats,
            current: 0,
            direction: Direction::Clockwise,
        }
    }

    /// The player whose turn it is. `None` once the rotation is empty.
    #[must_use]
    pub fn current(&self) -> Option<PlayerId> {
        self.seats.get(self.current).copied()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Players still in rotation, in seating order.
    #[must_use]
    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.seats.contains(&id)
    }

    /// Flip the direction of play.
    pub fn reverse(&mut self) {
        self.direction = self.direction.flipped();
    }

    /// Move the current pointer `steps` seats in the prevailing direction.
    pub fn advance(&mut self, steps: usize) {
        if self.seats.is_empty() {
            return;
        }
        let len = self.seats.len() as i64;
        let moved = self.current as i64 + self.direction.delta() * steps as i64;
        self.current = moved.rem_euclid(len) as usize;
    }

    /// The seat `steps` ahead of the current player, without advancing.
    #[must_use]
    pub fn peek(&self, steps: usize) -> Option<PlayerId> {
        if self.seats.is_empty() {
            return None;
        }
        let len = self.seats.len() as i64;
        let idx = (self.current as i64 + self.direction.delta() * steps as i64).rem_euclid(len);
        self.seats.get(idx as usize).copied()
    }

    /// Remove a player from rotation, re-indexing the current pointer.
    ///
    /// If the removed seat *is* the current one, the pointer moves to the
    /// seat one step away in the prevailing direction, so a subsequent
    /// `advance(n)` applies exactly `n` further steps. Returns false if the
    /// player was not in rotation.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        let Some(idx) = self.seats.iter().position(|&p| p == id) else {
            return false;
        };
        self.seats.remove(idx);

        if self.seats.is_empty() {
            self.current = 0;
            return true;
        }

        let len = self.seats.len() as i64;
        if idx < self.current {
            self.current -= 1;
        } else if idx == self.current {
            // The removed player's successor in `direction` becomes current.
            self.current = match self.direction {
                Direction::Clockwise => idx as i64,
                Direction::CounterClockwise => idx as i64 - 1,
            }
            .rem_euclid(len) as usize;
        }
        true
    }
}
