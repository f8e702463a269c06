//! Engine error taxonomy.
//!
//! Every variant except [`GameError::Fault`] is a non-fatal rule rejection:
//! the operation was a complete no-op and the caller can relay the message
//! to the offending player. `Fault` signals a broken internal invariant
//! (e.g. a card-count mismatch) and should be alerted on, not relayed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Card, PlayerId};

/// Central error type for every game operation.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    // === Basic-requirement failures ===
    #[error("it is not your turn")]
    NotYourTurn,

    #[error("{0} is not in this game")]
    PlayerNotFound(PlayerId),

    #[error("{0} has been eliminated")]
    PlayerEliminated(PlayerId),

    #[error("{0} has already gone safe this round")]
    PlayerSafe(PlayerId),

    #[error("the game is not in the playing phase")]
    GameNotActive,

    // === Play validation failures ===
    #[error("card {0} is not in your hand")]
    CardNotInHand(Card),

    #[error("invalid stack: {0}")]
    InvalidStack(String),

    #[error("illegal play: {0}")]
    IllegalPlay(String),

    #[error("{detail}; draw {pending} cards or play a counter")]
    MustCounterOrDraw { pending: u32, detail: String },

    #[error("playing an 8 requires a suit declaration")]
    SuitDeclarationRequired,

    #[error("invalid suit declaration: {0}")]
    InvalidSuitDeclaration(String),

    // === Start-of-game failures ===
    #[error("need at least {required} players to start, have {actual}")]
    InsufficientPlayers { required: usize, actual: usize },

    #[error("only the game creator may do this")]
    Unauthorized,

    // === Phase failures ===
    #[error("operation not allowed in this phase: {0}")]
    WrongPhase(String),

    // === Lobby failures ===
    #[error("players can only join or leave while the game is waiting")]
    LobbyClosed,

    #[error("the game already has the maximum number of players")]
    GameFull,

    #[error("{0} is already seated in this game")]
    DuplicatePlayer(PlayerId),

    // === Draw/pass/vote failures ===
    #[error("draw not allowed: {0}")]
    DrawNotAllowed(String),

    #[error("pass not allowed: {0}")]
    PassNotAllowed(String),

    #[error("vote not allowed: {0}")]
    VoteNotAllowed(String),

    // === Infrastructure ===
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Internal invariant violation. Fatal for this game instance.
    #[error("internal invariant violated: {0}")]
    Fault(String),
}

impl GameError {
    /// True only for internal invariant violations, which the caller should
    /// alert on rather than relay as an ordinary rule rejection.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, GameError::Fault(_))
    }
}
