//! Effect-summary records emitted after each committed operation.
//!
//! The transport layer fans these out to participants; the engine has no
//! knowledge of how or to whom they are delivered. Events carry only public
//! information; a draw event reports the count, never the cards.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Card, PlayerId, Suit};
use crate::rules::PlayEffect;

/// One committed operation, summarized for broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Monotonic sequence number within the game.
    pub seq: u64,
    /// Round the event belongs to.
    pub round: u32,
    pub kind: EventKind,
    /// Whose turn it is after this event, if anyone's.
    pub next_player: Option<PlayerId>,
}

/// What changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    PlayerJoined {
        player: PlayerId,
    },
    PlayerLeft {
        player: PlayerId,
    },
    /// Hands dealt, preparation window opened.
    GameStarted {
        starter: Card,
    },
    /// Preparation ended (unanimous vote or caller-driven timeout).
    PlayStarted,
    CardsPlayed {
        player: PlayerId,
        /// Submission order preserved; last card is the new discard top.
        cards: SmallVec<[Card; 4]>,
        effect: PlayEffect,
        /// The play emptied the player's hand.
        went_safe: bool,
    },
    CardsDrawn {
        player: PlayerId,
        count: u32,
        /// Resolved a pending draw stack rather than a voluntary draw.
        forced: bool,
    },
    TurnPassed {
        player: PlayerId,
    },
    PlayerEliminated {
        player: PlayerId,
    },
    /// Rotation dropped to at most one player.
    RoundFinished {
        /// First player to have gone safe, if any.
        winner: Option<PlayerId>,
    },
    PlayAgainVote {
        player: PlayerId,
        voted: bool,
    },
    SkipPreparationVote {
        player: PlayerId,
        voted: bool,
    },
    /// Suit declared by a wild play (also inside the CardsPlayed effect;
    /// split out for cheap client handling).
    SuitDeclared {
        player: PlayerId,
        suit: Suit,
    },
}
