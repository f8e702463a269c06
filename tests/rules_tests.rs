//! Rule-table coverage through the public surface: stacking shapes, wild
//! declarations, counter chains, and effect arithmetic.

use eights_engine::{
    compute_effect, playable_from_hand, validate_play, Card, GameError, Rank, Suit, TableState,
};

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

fn quiet_table(top: Card) -> TableState {
    TableState {
        discard_top: top,
        declared_suit: None,
        draw_stack: 0,
    }
}

#[test]
fn test_stacked_jacks_skip_one_seat_each() {
    let jacks = [card(Rank::Jack, Suit::Hearts), card(Rank::Jack, Suit::Clubs)];
    let t = quiet_table(card(Rank::Jack, Suit::Spades));
    assert!(validate_play(&jacks, &jacks, None, &t).is_ok());

    let effect = compute_effect(&jacks, None);
    assert_eq!(effect.skip_count, 2);
    assert!(!effect.reverse);
    assert_eq!(effect.draw_amount_added, 0);
}

#[test]
fn test_queen_reversal_follows_parity() {
    let one = [card(Rank::Queen, Suit::Hearts)];
    assert!(compute_effect(&one, None).reverse);

    let two = [
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Queen, Suit::Clubs),
    ];
    assert!(!compute_effect(&two, None).reverse);

    let three = [
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Queen, Suit::Clubs),
        card(Rank::Queen, Suit::Spades),
    ];
    assert!(compute_effect(&three, None).reverse);
}

#[test]
fn test_draw_penalties_add_per_card() {
    let aces = [card(Rank::Ace, Suit::Hearts), card(Rank::Ace, Suit::Hearts)];
    assert_eq!(compute_effect(&aces, None).draw_amount_added, 8);

    let twos = [
        card(Rank::Two, Suit::Spades),
        card(Rank::Two, Suit::Spades),
        card(Rank::Two, Suit::Spades),
    ];
    assert_eq!(compute_effect(&twos, None).draw_amount_added, 6);
}

#[test]
fn test_wild_effect_carries_declaration() {
    let eight = [card(Rank::Eight, Suit::Clubs)];
    let effect = compute_effect(&eight, Some(Suit::Diamonds));
    assert_eq!(effect.suit_declared, Some(Suit::Diamonds));
    assert!(!effect.is_plain());
}

#[test]
fn test_plain_card_has_no_effect() {
    let seven = [card(Rank::Seven, Suit::Hearts)];
    let effect = compute_effect(&seven, None);
    assert!(effect.is_plain());
    assert_eq!(effect.skip_count, 0);
    assert_eq!(effect.draw_amount_added, 0);
    assert_eq!(effect.suit_declared, None);
}

#[test]
fn test_mixed_rank_stack_rejected_even_when_each_card_would_be_legal() {
    let t = quiet_table(card(Rank::King, Suit::Hearts));
    // Both cards match the top's suit individually; the stack still fails.
    let hand = vec![
        card(Rank::King, Suit::Clubs),
        card(Rank::Seven, Suit::Hearts),
    ];
    let submitted = [
        card(Rank::King, Suit::Clubs),
        card(Rank::Seven, Suit::Hearts),
    ];
    assert!(matches!(
        validate_play(&hand, &submitted, None, &t),
        Err(GameError::InvalidStack(_))
    ));
}

#[test]
fn test_counter_chain_accumulates_across_turns() {
    // Ace of Hearts opens the chain at 4.
    let mut t = TableState {
        discard_top: card(Rank::Ace, Suit::Hearts),
        declared_suit: None,
        draw_stack: 4,
    };

    // Same rank counters in any suit.
    let ace_spades = [card(Rank::Ace, Suit::Spades)];
    assert!(validate_play(&ace_spades, &ace_spades, None, &t).is_ok());
    t.discard_top = ace_spades[0];
    t.draw_stack += compute_effect(&ace_spades, None).draw_amount_added;
    assert_eq!(t.draw_stack, 8);

    // A 2 counters the Ace only in the carried-over top's suit.
    let two_spades = [card(Rank::Two, Suit::Spades)];
    assert!(validate_play(&two_spades, &two_spades, None, &t).is_ok());
    let two_hearts = [card(Rank::Two, Suit::Hearts)];
    assert!(matches!(
        validate_play(&two_hearts, &two_hearts, None, &t),
        Err(GameError::MustCounterOrDraw { pending: 8, .. })
    ));

    t.discard_top = two_spades[0];
    t.draw_stack += compute_effect(&two_spades, None).draw_amount_added;
    assert_eq!(t.draw_stack, 10);

    // And back: an Ace counters the 2 only in Spades now.
    let ace_clubs = [card(Rank::Ace, Suit::Clubs)];
    assert!(matches!(
        validate_play(&ace_clubs, &ace_clubs, None, &t),
        Err(GameError::MustCounterOrDraw { pending: 10, .. })
    ));
    let back = [card(Rank::Ace, Suit::Spades)];
    assert!(validate_play(&back, &back, None, &t).is_ok());
}

#[test]
fn test_playable_respects_pending_draw_stack() {
    let t = TableState {
        discard_top: card(Rank::Two, Suit::Clubs),
        declared_suit: None,
        draw_stack: 2,
    };
    let hand = vec![
        card(Rank::Two, Suit::Hearts),   // same-rank counter
        card(Rank::Ace, Suit::Clubs),    // cross-rank counter in suit
        card(Rank::Ace, Suit::Hearts),   // cross-rank, wrong suit
        card(Rank::Eight, Suit::Clubs),  // wild, not a counter
        card(Rank::King, Suit::Clubs),   // plain, not a counter
    ];

    let playable = playable_from_hand(&hand, &t);
    assert_eq!(
        playable,
        vec![card(Rank::Two, Suit::Hearts), card(Rank::Ace, Suit::Clubs)]
    );
}

#[test]
fn test_rejected_submission_reports_first_failure() {
    let t = quiet_table(card(Rank::King, Suit::Hearts));
    let hand = vec![card(Rank::Nine, Suit::Clubs)];

    // Ownership failure wins over table legality.
    let not_owned = [card(Rank::Seven, Suit::Hearts)];
    assert_eq!(
        validate_play(&hand, &not_owned, None, &t),
        Err(GameError::CardNotInHand(card(Rank::Seven, Suit::Hearts)))
    );

    // Owned but dead against the table.
    let dead = [card(Rank::Nine, Suit::Clubs)];
    assert!(matches!(
        validate_play(&hand, &dead, None, &t),
        Err(GameError::IllegalPlay(_))
    ));
}
