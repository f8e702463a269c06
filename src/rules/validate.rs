//! Stateless play validation.
//!
//! Checks run strictly in this order, short-circuiting on the first
//! failure:
//!
//! 1. Submission shape and ownership (one physical copy consumed per
//!    submitted card; duplicate ranks across suits never falsely satisfy
//!    the check)
//! 2. Stacking (same rank; Aces and Twos additionally same suit)
//! 3. Legality against the discard top / pending draw stack
//! 4. Wild suit declaration
//!
//! Every function here is a pure predicate over its arguments: calling one
//! twice with identical inputs yields identical results. Phase, membership
//! and turn-order checks happen in the `Game` aggregate before any of this
//! runs, because they need the aggregate itself.

use crate::core::{Card, Suit};
use crate::error::GameError;

/// The table-facing inputs a play is judged against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableState {
    /// Current top of the discard pile.
    pub discard_top: Card,
    /// Active wild declaration, if the top is an 8.
    pub declared_suit: Option<Suit>,
    /// Accumulated forced-draw penalty.
    pub draw_stack: u32,
}

/// Validate a complete submission against a hand and the table.
///
/// This is the full §-ordered pipeline; the individual predicates are also
/// exported for targeted use (`draw_cards` uses [`playable_from_hand`]).
pub fn validate_play(
    hand: &[Card],
    submitted: &[Card],
    declared: Option<Suit>,
    table: &TableState,
) -> Result<(), GameError> {
    if submitted.is_empty() {
        return Err(GameError::InvalidStack("no cards submitted".to_string()));
    }
    validate_ownership(hand, submitted)?;
    validate_card_stacking(submitted)?;
    validate_against_table(submitted[0], table)?;
    validate_declaration(submitted[0], declared)?;
    Ok(())
}

/// Every submitted card must be present in the hand, consuming one physical
/// copy per match.
pub fn validate_ownership(hand: &[Card], submitted: &[Card]) -> Result<(), GameError> {
    let mut remaining: Vec<Card> = hand.to_vec();
    for &card in submitted {
        match remaining.iter().position(|&c| c == card) {
            Some(pos) => {
                remaining.swap_remove(pos);
            }
            None => return Err(GameError::CardNotInHand(card)),
        }
    }
    Ok(())
}

/// All submitted cards must share a rank; Aces and Twos must additionally
/// share a suit, because their counter effect is suit-sensitive.
pub fn validate_card_stacking(submitted: &[Card]) -> Result<(), GameError> {
    if submitted.is_empty() {
        return Err(GameError::InvalidStack("no cards submitted".to_string()));
    }
    let lead = submitted[0];
    if submitted.iter().any(|c| c.rank != lead.rank) {
        return Err(GameError::InvalidStack(
            "all cards in a stack must share the same rank".to_string(),
        ));
    }
    if lead.rank.accumulates_draws() && submitted.iter().any(|c| c.suit != lead.suit) {
        return Err(GameError::InvalidStack(format!(
            "stacked {}s must also share the same suit",
            lead.rank
        )));
    }
    Ok(())
}

/// Legality of the lead card against the discard top or the pending draw
/// stack. The two branches are mutually exclusive.
fn validate_against_table(lead: Card, table: &TableState) -> Result<(), GameError> {
    if table.draw_stack > 0 {
        return validate_counter(lead, table);
    }

    if lead.rank.is_wild() {
        return Ok(());
    }
    if lead.rank == table.discard_top.rank {
        return Ok(());
    }
    let live_suit = table.declared_suit.unwrap_or(table.discard_top.suit);
    if lead.suit == live_suit {
        return Ok(());
    }
    Err(GameError::IllegalPlay(format!(
        "{lead} matches neither the suit nor the rank of {}",
        match table.declared_suit {
            Some(suit) => format!("the declared suit ({suit})"),
            None => format!("{}", table.discard_top),
        }
    )))
}

/// With a draw stack pending, only a counter is legal: same rank in any
/// suit, or the other draw-accumulating rank if it matches the suit of the
/// carried-over discard top.
fn validate_counter(lead: Card, table: &TableState) -> Result<(), GameError> {
    let top = table.discard_top;
    debug_assert!(top.rank.accumulates_draws());

    if lead.rank.accumulates_draws() {
        if lead.rank == top.rank || lead.suit == top.suit {
            return Ok(());
        }
        return Err(GameError::MustCounterOrDraw {
            pending: table.draw_stack,
            detail: format!("Cannot counter {} with {lead}", top.rank),
        });
    }
    Err(GameError::MustCounterOrDraw {
        pending: table.draw_stack,
        detail: format!("a forced draw of {} cards is pending", table.draw_stack),
    })
}

/// Wild leads require a declaration; anything else must not carry one.
fn validate_declaration(lead: Card, declared: Option<Suit>) -> Result<(), GameError> {
    match (lead.rank.is_wild(), declared) {
        (true, None) => Err(GameError::SuitDeclarationRequired),
        (false, Some(suit)) => Err(GameError::InvalidSuitDeclaration(format!(
            "cannot declare {suit} on a non-wild {}",
            lead.rank,
        ))),
        _ => Ok(()),
    }
}

/// The subset of `cards` that would be legal as a single-card lead right
/// now. Wilds count as playable even though they still need a declaration
/// at play time.
#[must_use]
pub fn playable_from_hand(cards: &[Card], table: &TableState) -> Vec<Card> {
    cards
        .iter()
        .copied()
        .filter(|&card| validate_against_table(card, table).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rank;

    fn card(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn table(top: Card) -> TableState {
        TableState {
            discard_top: top,
            declared_suit: None,
            draw_stack: 0,
        }
    }

    #[test]
    fn test_ownership_exact_copies() {
        let hand = vec![
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Seven, Suit::Clubs),
        ];

        assert!(validate_ownership(&hand, &[card(Rank::Seven, Suit::Hearts)]).is_ok());

        // Duplicate ranks across suits must not satisfy ownership twice.
        let double = [
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Seven, Suit::Hearts),
        ];
        assert_eq!(
            validate_ownership(&hand, &double),
            Err(GameError::CardNotInHand(card(Rank::Seven, Suit::Hearts)))
        );
    }

    #[test]
    fn test_stacking_same_rank_ok() {
        let stack = [
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Seven, Suit::Clubs),
        ];
        assert!(validate_card_stacking(&stack).is_ok());
    }

    #[test]
    fn test_stacking_mixed_rank_rejected() {
        let stack = [
            card(Rank::Seven, Suit::Hearts),
            card(Rank::Eight, Suit::Hearts),
        ];
        assert!(matches!(
            validate_card_stacking(&stack),
            Err(GameError::InvalidStack(_))
        ));
    }

    #[test]
    fn test_stacking_aces_require_same_suit() {
        let stack = [card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Spades)];
        let err = validate_card_stacking(&stack).unwrap_err();
        match err {
            GameError::InvalidStack(msg) => assert!(msg.contains("same suit")),
            other => panic!("expected InvalidStack, got {other:?}"),
        }
    }

    #[test]
    fn test_lead_matches_suit_or_rank() {
        let t = table(card(Rank::King, Suit::Hearts));

        assert!(validate_play(
            &[card(Rank::Seven, Suit::Hearts)],
            &[card(Rank::Seven, Suit::Hearts)],
            None,
            &t
        )
        .is_ok());
        assert!(validate_play(
            &[card(Rank::King, Suit::Clubs)],
            &[card(Rank::King, Suit::Clubs)],
            None,
            &t
        )
        .is_ok());
        assert!(matches!(
            validate_play(
                &[card(Rank::Nine, Suit::Clubs)],
                &[card(Rank::Nine, Suit::Clubs)],
                None,
                &t
            ),
            Err(GameError::IllegalPlay(_))
        ));
    }

    #[test]
    fn test_declared_suit_overrides_top_suit() {
        let t = TableState {
            discard_top: card(Rank::Eight, Suit::Hearts),
            declared_suit: Some(Suit::Spades),
            draw_stack: 0,
        };

        let spade = [card(Rank::Four, Suit::Spades)];
        assert!(validate_play(&spade, &spade, None, &t).is_ok());

        // Matching the 8's printed suit is not enough once a suit is declared.
        let heart = [card(Rank::Four, Suit::Hearts)];
        assert!(matches!(
            validate_play(&heart, &heart, None, &t),
            Err(GameError::IllegalPlay(_))
        ));

        // Another 8 is always legal.
        let eight = [card(Rank::Eight, Suit::Clubs)];
        assert!(validate_play(&eight, &eight, Some(Suit::Hearts), &t).is_ok());
    }

    #[test]
    fn test_wild_requires_declaration() {
        let t = table(card(Rank::King, Suit::Hearts));
        let eight = [card(Rank::Eight, Suit::Hearts)];

        assert_eq!(
            validate_play(&eight, &eight, None, &t),
            Err(GameError::SuitDeclarationRequired)
        );
        assert!(validate_play(&eight, &eight, Some(Suit::Spades), &t).is_ok());
    }

    #[test]
    fn test_declaration_on_non_wild_rejected() {
        let t = table(card(Rank::King, Suit::Hearts));
        let king = [card(Rank::King, Suit::Clubs)];

        assert!(matches!(
            validate_play(&king, &king, Some(Suit::Spades), &t),
            Err(GameError::InvalidSuitDeclaration(_))
        ));
    }

    #[test]
    fn test_counter_same_rank_any_suit() {
        let t = TableState {
            discard_top: card(Rank::Ace, Suit::Hearts),
            declared_suit: None,
            draw_stack: 4,
        };

        let ace = [card(Rank::Ace, Suit::Spades)];
        assert!(validate_play(&ace, &ace, None, &t).is_ok());
    }

    #[test]
    fn test_cross_rank_counter_needs_matching_suit() {
        let t = TableState {
            discard_top: card(Rank::Ace, Suit::Hearts),
            declared_suit: None,
            draw_stack: 4,
        };

        // A 2 may counter an Ace only in the carried-over top's suit.
        let hearts_two = [card(Rank::Two, Suit::Hearts)];
        assert!(validate_play(&hearts_two, &hearts_two, None, &t).is_ok());

        let clubs_two = [card(Rank::Two, Suit::Clubs)];
        let err = validate_play(&clubs_two, &clubs_two, None, &t).unwrap_err();
        match err {
            GameError::MustCounterOrDraw { pending, detail } => {
                assert_eq!(pending, 4);
                assert!(detail.contains("Cannot counter Ace with 2 of Clubs"));
            }
            other => panic!("expected MustCounterOrDraw, got {other:?}"),
        }
    }

    #[test]
    fn test_non_counter_rejected_with_pending_amount() {
        let t = TableState {
            discard_top: card(Rank::Two, Suit::Hearts),
            declared_suit: None,
            draw_stack: 6,
        };

        let king = [card(Rank::King, Suit::Hearts)];
        let err = validate_play(&king, &king, None, &t).unwrap_err();
        match err {
            GameError::MustCounterOrDraw { pending, .. } => assert_eq!(pending, 6),
            other => panic!("expected MustCounterOrDraw, got {other:?}"),
        }
    }

    #[test]
    fn test_wild_not_a_counter() {
        let t = TableState {
            discard_top: card(Rank::Ace, Suit::Hearts),
            declared_suit: None,
            draw_stack: 4,
        };

        let eight = [card(Rank::Eight, Suit::Hearts)];
        assert!(matches!(
            validate_play(&eight, &eight, Some(Suit::Spades), &t),
            Err(GameError::MustCounterOrDraw { .. })
        ));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let t = table(card(Rank::King, Suit::Hearts));
        let hand = vec![card(Rank::Seven, Suit::Hearts)];
        let submitted = [card(Rank::Seven, Suit::Hearts)];

        let first = validate_play(&hand, &submitted, None, &t);
        let second = validate_play(&hand, &submitted, None, &t);
        assert_eq!(first, second);
    }

    #[test]
    fn test_playable_from_hand() {
        let t = table(card(Rank::King, Suit::Hearts));
        let hand = vec![
            card(Rank::Seven, Suit::Hearts),  // suit match
            card(Rank::King, Suit::Clubs),    // rank match
            card(Rank::Eight, Suit::Spades),  // wild
            card(Rank::Four, Suit::Diamonds), // dead
        ];

        let playable = playable_from_hand(&hand, &t);
        assert_eq!(
            playable,
            vec![
                card(Rank::Seven, Suit::Hearts),
                card(Rank::King, Suit::Clubs),
                card(Rank::Eight, Suit::Spades),
            ]
        );
    }
}
