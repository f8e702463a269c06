//! The two shared piles: face-down draw pile and face-up discard pile.
//!
//! Both piles are ordered stacks with top = end of vec. Hands are owned by
//! their `Player` entries; this module only manages the shared zones and
//! the reshuffle that recycles the discard pile when the draw pile runs
//! out.
//!
//! ## Reshuffle rule
//!
//! The top discard card is never recycled: it stays as the live match
//! target. Everything beneath it is shuffled into a fresh draw pile.

use serde::{Deserialize, Serialize};

use crate::core::{standard_deck, Card, GameRng};

/// Draw and discard piles for one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piles {
    /// Face-down draw pile (top = end).
    draw: Vec<Card>,
    /// Face-up discard pile (top = end = most recently played).
    discard: Vec<Card>,
}

impl Piles {
    /// A full shuffled 52-card deck in the draw pile, empty discard.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut draw = standard_deck();
        rng.shuffle(&mut draw);
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    /// Empty piles, for rebuilding state by hand (tests, deserialization
    /// helpers).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            draw: Vec::new(),
            discard: Vec::new(),
        }
    }

    /// Take the top card of the draw pile, recycling the discard pile
    /// (minus its top card) if the draw pile is exhausted.
    ///
    /// Returns `None` only when every other card in the round is held in
    /// hands or is the discard top.
    pub fn draw_one(&mut self, rng: &mut GameRng) -> Option<Card> {
        if self.draw.is_empty() {
            self.recycle_discard(rng);
        }
        self.draw.pop()
    }

    /// Move everything beneath the discard top into a fresh shuffled draw
    /// pile. No-op if the discard pile has at most one card.
    fn recycle_discard(&mut self, rng: &mut GameRng) {
        if self.discard.len() <= 1 {
            return;
        }
        let top = self.discard.pop();
        self.draw.append(&mut self.discard);
        rng.shuffle(&mut self.draw);
        self.discard.extend(top);
    }

    /// Put a card on top of the discard pile.
    pub fn push_discard(&mut self, card: Card) {
        self.discard.push(card);
    }

    /// Push a card back on the bottom of the draw pile.
    ///
    /// Used while seeding the starter card, when wild starters are sent
    /// back.
    pub fn push_draw_bottom(&mut self, card: Card) {
        self.draw.insert(0, card);
    }

    /// The current top of the discard pile.
    #[must_use]
    pub fn discard_top(&self) -> Option<Card> {
        self.discard.last().copied()
    }

    #[must_use]
    pub fn draw_size(&self) -> usize {
        self.draw.len()
    }

    #[must_use]
    pub fn discard_size(&self) -> usize {
        self.discard.len()
    }

    /// Cards held across both piles, for conservation checks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.draw.len() + self.discard.len()
    }
}
