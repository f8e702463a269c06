//! Effect computation for validated plays.
//!
//! Given a play the validator has already approved, [`compute_effect`]
//! returns a structured descriptor of its consequences. The rank-to-effect
//! mapping is the fixed rule table of the game, not configuration:
//!
//! | Rank  | Effect                          |
//! |-------|---------------------------------|
//! | Jack  | Skip next player's turn         |
//! | Queen | Reverse turn direction          |
//! | Ace   | Add 4 to the draw stack         |
//! | 2     | Add 2 to the draw stack         |
//! | 8     | Sets the declared suit          |
//! | other | No side effect                  |
//!
//! Stacked cards multiply the magnitude (skips, draw amounts). Queens
//! toggle per card, so an even stack is a net no-op. The suit declaration
//! is singular per play.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Rank, Suit};

/// Consequences of a validated play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayEffect {
    /// Number of players whose turns are skipped.
    pub skip_count: u32,
    /// Whether the turn direction flips.
    pub reverse: bool,
    /// Amount added to the pending draw stack.
    pub draw_amount_added: u32,
    /// Newly declared suit, for wild plays.
    pub suit_declared: Option<Suit>,
}

impl PlayEffect {
    /// True if the play had no effect beyond the cards landing on the
    /// discard pile.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute the effect of an already-validated play.
///
/// `declared` is the wild declaration that was validated alongside the
/// play; it is `Some` exactly when the lead card is an 8.
#[must_use]
pub fn compute_effect(cards: &[Card], declared: Option<Suit>) -> PlayEffect {
    let count = cards.len() as u32;
    let lead_rank = cards.first().map(|c| c.rank);

    match lead_rank {
        Some(Rank::Jack) => PlayEffect {
            skip_count: count,
            ..PlayEffect::default()
        },
        Some(Rank::Queen) => PlayEffect {
            reverse: count % 2 == 1,
            ..PlayEffect::default()
        },
        Some(Rank::Ace) => PlayEffect {
            draw_amount_added: 4 * count,
            ..PlayEffect::default()
        },
        Some(Rank::Two) => PlayEffect {
            draw_amount_added: 2 * count,
            ..PlayEffect::default()
        },
        Some(Rank::Eight) => PlayEffect {
            suit_declared: declared,
            ..PlayEffect::default()
        },
        _ => PlayEffect::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Suit;

    fn cards(rank: Rank, suits: &[Suit]) -> Vec<Card> {
        suits.iter().map(|&s| Card::new(rank, s)).collect()
    }

    #[test]
    fn test_plain_rank_has_no_effect() {
        let effect = compute_effect(&cards(Rank::Seven, &[Suit::Hearts]), None);
        assert!(effect.is_plain());
    }

    #[test]
    fn test_jack_skips_per_card() {
        let effect = compute_effect(&cards(Rank::Jack, &[Suit::Hearts]), None);
        assert_eq!(effect.skip_count, 1);

        let effect = compute_effect(
            &cards(Rank::Jack, &[Suit::Hearts, Suit::Clubs, Suit::Spades]),
            None,
        );
        assert_eq!(effect.skip_count, 3);
    }

    #[test]
    fn test_queen_toggles_per_card() {
        let one = compute_effect(&cards(Rank::Queen, &[Suit::Hearts]), None);
        assert!(one.reverse);

        let two = compute_effect(&cards(Rank::Queen, &[Suit::Hearts, Suit::Clubs]), None);
        assert!(!two.reverse);
    }

    #[test]
    fn test_ace_adds_four() {
        let effect = compute_effect(&cards(Rank::Ace, &[Suit::Hearts]), None);
        assert_eq!(effect.draw_amount_added, 4);
    }

    #[test]
    fn test_two_adds_two() {
        let effect = compute_effect(&cards(Rank::Two, &[Suit::Hearts]), None);
        assert_eq!(effect.draw_amount_added, 2);
    }

    #[test]
    fn test_eight_declares_once() {
        let effect = compute_effect(
            &cards(Rank::Eight, &[Suit::Hearts, Suit::Clubs]),
            Some(Suit::Spades),
        );
        assert_eq!(effect.suit_declared, Some(Suit::Spades));
        assert_eq!(effect.skip_count, 0);
        assert_eq!(effect.draw_amount_added, 0);
    }

    #[test]
    fn test_effect_serialization() {
        let effect = compute_effect(&cards(Rank::Ace, &[Suit::Hearts]), None);
        let json = serde_json::to_string(&effect).unwrap();
        let back: PlayEffect = serde_json::from_str(&json).unwrap();
        assert_eq!(effect, back);
    }
}
