//! Game aggregate and state machine.
//!
//! [`Game`] owns everything for a single table (roster, piles, turn
//! rotation, draw stack, declared suit) and exposes the public operation
//! set. Every operation is validate-then-commit: a rejected call returns an
//! error without touching state, a successful call mutates atomically and
//! appends one effect-summary [`GameEvent`].
//!
//! ## Lifecycle
//!
//! `Waiting` (lobby) → `Preparation` (hands dealt, short skip-vote window)
//! → `Playing` → `Finished` (rotation down to at most one player). A
//! unanimous play-again vote on a finished game spawns a fresh `Waiting`
//! game with the same roster.
//!
//! ## Concurrency
//!
//! A game is a single logical actor. Nothing here blocks or does I/O; the
//! registry wraps each game in an exclusive lock and operations on
//! different games run in parallel.

use std::time::Duration;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::core::{Card, GameRng, Player, PlayerId, Suit};
use crate::error::GameError;
use crate::rules::{compute_effect, playable_from_hand, validate_play, PlayEffect, TableState};
use crate::turn::TurnOrder;
use crate::zones::Piles;

pub mod event;
pub mod snapshot;

pub use event::{EventKind, GameEvent};
pub use snapshot::{GameSnapshot, PlayerPublic};

/// Minimum players to start a game.
pub const MIN_PLAYERS: usize = 2;
/// Maximum seats at one table.
pub const MAX_PLAYERS: usize = 8;
/// Cards dealt to each player at the start of a round.
pub const STARTING_HAND_SIZE: usize = 5;
/// Cards in play for one round.
pub const DECK_SIZE: usize = 52;
/// How long the preparation window stays open before the surrounding
/// scheduler should call [`Game::complete_preparation`].
pub const PREPARATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Identifier for one game instance, allocated by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game {}", self.0)
    }
}

/// Game lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Lobby: players may join and leave.
    Waiting,
    /// Hands dealt; skip-vote window before play begins.
    Preparation,
    /// Live round.
    Playing,
    /// Rotation down to at most one player; play-again voting open.
    Finished,
}

/// A voluntary draw awaiting resolution (play one drawn card, or pass).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PendingDraw {
    player: PlayerId,
    cards: Vec<Card>,
}

/// Result of a committed play.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayOutcome {
    /// The broadcastable effect summary.
    pub event: GameEvent,
    pub effect: PlayEffect,
    /// The play emptied the player's hand.
    pub went_safe: bool,
    /// The play ended the round.
    pub round_finished: bool,
}

/// Result of a committed draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    /// The broadcastable effect summary (count only, no card identities).
    pub event: GameEvent,
    /// The drawn cards, private to the drawing player.
    pub drawn: Vec<Card>,
    /// The draw resolved a pending draw stack and ended the turn.
    pub forced: bool,
    /// Which drawn cards are immediately playable (voluntary draws only).
    pub playable: Vec<Card>,
}

/// Tally of the post-game play-again vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayAgainStatus {
    /// Players who have voted yes.
    pub votes: Vec<PlayerId>,
    /// Votes required for unanimity (connected, non-eliminated players).
    pub required: usize,
    pub unanimous: bool,
}

/// The aggregate root for one table.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Game {
    id: GameId,
    creator: PlayerId,
    round_number: u32,
    phase: GamePhase,
    /// Seating order; safe and eliminated players stay listed.
    players: Vec<Player>,
    /// Active-player rotation; empty until the game starts.
    turn: TurnOrder,
    piles: Piles,
    declared_suit: Option<Suit>,
    draw_stack: u32,
    pending_draw: Option<PendingDraw>,
    /// First player to empty their hand this round.
    round_winner: Option<PlayerId>,
    skip_prep_votes: FxHashSet<PlayerId>,
    play_again_votes: FxHashSet<PlayerId>,
    /// Committed-operation history; persistent structure for cheap clones.
    events: im::Vector<GameEvent>,
    next_seq: u64,
    rng: GameRng,
}

impl Game {
    /// Create a lobby with the creator seated.
    #[must_use]
    pub fn new(
        id: GameId,
        creator: PlayerId,
        creator_name: impl Into<String>,
        seed: u64,
    ) -> Self {
        Self {
            id,
            creator,
            round_number: 1,
            phase: GamePhase::Waiting,
            players: vec![Player::new(creator, creator_name)],
            turn: TurnOrder::new(Vec::new()),
            piles: Piles::empty(),
            declared_suit: None,
            draw_stack: 0,
            pending_draw: None,
            round_winner: None,
            skip_prep_votes: FxHashSet::default(),
            play_again_votes: FxHashSet::default(),
            events: im::Vector::new(),
            next_seq: 0,
            rng: GameRng::new(seed),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn creator(&self) -> PlayerId {
        self.creator
    }

    #[must_use]
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    #[must_use]
    pub fn draw_stack(&self) -> u32 {
        self.draw_stack
    }

    #[must_use]
    pub fn declared_suit(&self) -> Option<Suit> {
        self.declared_suit
    }

    #[must_use]
    pub fn discard_top(&self) -> Option<Card> {
        self.piles.discard_top()
    }

    /// Whose turn it is, when a round is live.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.phase {
            GamePhase::Playing => self.turn.current(),
            _ => None,
        }
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// First player to have emptied their hand this round.
    #[must_use]
    pub fn round_winner(&self) -> Option<PlayerId> {
        self.round_winner
    }

    /// Committed-operation history, oldest first.
    #[must_use]
    pub fn events(&self) -> &im::Vector<GameEvent> {
        &self.events
    }

    #[must_use]
    pub fn last_event(&self) -> Option<&GameEvent> {
        self.events.last()
    }

    // === Lobby operations ===

    /// Seat a new player. Waiting phase only.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        display_name: impl Into<String>,
    ) -> Result<GameEvent, GameError> {
        if self.phase != GamePhase::Waiting {
            return Err(GameError::LobbyClosed);
        }
        if self.player(id).is_some() {
            return Err(GameError::DuplicatePlayer(id));
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }

        self.players.push(Player::new(id, display_name));
        debug!(game = %self.id, %id, "player joined");
        Ok(self.record(EventKind::PlayerJoined { player: id }, None))
    }

    /// Unseat a player. Waiting phase only; once a round has started,
    /// disconnection bookkeeping is the session layer's job.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        if self.phase != GamePhase::Waiting {
            return Err(GameError::LobbyClosed);
        }
        let Some(pos) = self.players.iter().position(|p| p.id == id) else {
            return Err(GameError::PlayerNotFound(id));
        };

        self.players.remove(pos);
        if self.creator == id {
            if let Some(next) = self.players.first() {
                self.creator = next.id;
            }
        }
        debug!(game = %self.id, %id, "player left");
        Ok(self.record(EventKind::PlayerLeft { player: id }, None))
    }

    /// Store the session layer's connectivity flag for a player.
    pub fn set_connected(&mut self, id: PlayerId, connected: bool) -> Result<(), GameError> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))?;
        player.is_connected = connected;
        Ok(())
    }

    // === Start / preparation ===

    /// Deal hands, seed the discard pile, and open the preparation window.
    ///
    /// Only the game creator may start; at least [`MIN_PLAYERS`] must be
    /// seated.
    pub fn start_game(&mut self, requester: PlayerId) -> Result<GameEvent, GameError> {
        if self.phase != GamePhase::Waiting {
            return Err(GameError::WrongPhase("the game has already started".into()));
        }
        if requester != self.creator {
            return Err(GameError::Unauthorized);
        }
        if self.players.len() < MIN_PLAYERS {
            return Err(GameError::InsufficientPlayers {
                required: MIN_PLAYERS,
                actual: self.players.len(),
            });
        }

        self.piles = Piles::shuffled(&mut self.rng);
        for _ in 0..STARTING_HAND_SIZE {
            for player in &mut self.players {
                // A full deck always covers 8 players x 5 cards.
                if let Some(card) = self.piles.draw_one(&mut self.rng) {
                    player.hand.push(card);
                }
            }
        }
        let starter = self.seed_starter()?;

        self.turn = TurnOrder::new(self.players.iter().map(|p| p.id).collect());
        self.phase = GamePhase::Preparation;
        self.skip_prep_votes.clear();
        self.round_winner = None;

        info!(game = %self.id, round = self.round_number, "game started, preparation open");
        let event = self.record(EventKind::GameStarted { starter }, self.turn.current());
        self.check_conservation()?;
        Ok(event)
    }

    /// Flip a non-wild starter card onto the discard pile. Wild starters go
    /// back to the bottom of the draw pile, because nobody declared a suit
    /// for them.
    fn seed_starter(&mut self) -> Result<Card, GameError> {
        loop {
            let card = self
                .piles
                .draw_one(&mut self.rng)
                .ok_or_else(|| GameError::Fault("draw pile exhausted while seeding".into()))?;
            if card.rank.is_wild() {
                self.piles.push_draw_bottom(card);
            } else {
                self.piles.push_discard(card);
                return Ok(card);
            }
        }
    }

    /// Vote to skip the rest of the preparation window. Unanimity begins
    /// play immediately.
    pub fn vote_skip_preparation(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        self.require_preparation()?;
        if self.player(id).is_none() {
            return Err(GameError::PlayerNotFound(id));
        }
        if !self.skip_prep_votes.insert(id) {
            return Err(GameError::VoteNotAllowed("vote already counted".into()));
        }

        let event = self.record(
            EventKind::SkipPreparationVote {
                player: id,
                voted: true,
            },
            None,
        );
        if self.skip_prep_votes.len() == self.players.len() {
            self.begin_play();
        }
        Ok(event)
    }

    /// Withdraw a skip-preparation vote.
    pub fn remove_skip_preparation_vote(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        self.require_preparation()?;
        if self.player(id).is_none() {
            return Err(GameError::PlayerNotFound(id));
        }
        if !self.skip_prep_votes.remove(&id) {
            return Err(GameError::VoteNotAllowed("no vote to withdraw".into()));
        }
        Ok(self.record(
            EventKind::SkipPreparationVote {
                player: id,
                voted: false,
            },
            None,
        ))
    }

    /// Number of skip-preparation votes currently counted.
    #[must_use]
    pub fn skip_preparation_votes(&self) -> usize {
        self.skip_prep_votes.len()
    }

    /// End the preparation window. Invoked by the surrounding scheduler
    /// once [`PREPARATION_TIMEOUT`] elapses; the engine holds no timer.
    pub fn complete_preparation(&mut self) -> Result<GameEvent, GameError> {
        self.require_preparation()?;
        Ok(self.begin_play())
    }

    fn require_preparation(&self) -> Result<(), GameError> {
        if self.phase != GamePhase::Preparation {
            return Err(GameError::WrongPhase(
                "the preparation window is not open".into(),
            ));
        }
        Ok(())
    }

    fn begin_play(&mut self) -> GameEvent {
        self.phase = GamePhase::Playing;
        info!(game = %self.id, round = self.round_number, "play started");
        let event = self.record(EventKind::PlayStarted, self.turn.current());
        // Eliminations during preparation may already have emptied the
        // rotation below the playable minimum.
        if self.turn.len() <= 1 {
            self.finish_round();
        }
        event
    }

    // === Playing operations ===

    /// Play one or more cards from hand.
    ///
    /// Runs the full validation pipeline; on success the cards move to the
    /// discard pile in submission order, the effect is applied, and the
    /// turn advances by `1 + skip_count`. A rejected play mutates nothing.
    pub fn play_cards(
        &mut self,
        id: PlayerId,
        cards: &[Card],
        declared: Option<Suit>,
    ) -> Result<PlayOutcome, GameError> {
        self.require_turn(id)?;
        if self.pending_draw.is_some() {
            return Err(GameError::IllegalPlay(
                "resolve the drawn card first: play it or pass".into(),
            ));
        }

        let table = self.table_state()?;
        let hand = &self.player(id).expect("checked by require_turn").hand;
        validate_play(hand, cards, declared, &table)?;

        let submission: SmallVec<[Card; 4]> = SmallVec::from_slice(cards);
        self.commit_play(id, submission, declared)
    }

    /// Play the single card just drawn by a voluntary draw.
    ///
    /// Same validation and effect pipeline as [`Game::play_cards`],
    /// restricted to one of the cards returned by the preceding draw.
    pub fn play_drawn_card(
        &mut self,
        id: PlayerId,
        card: Card,
        declared: Option<Suit>,
    ) -> Result<PlayOutcome, GameError> {
        self.require_turn(id)?;
        let Some(pending) = self.pending_draw.as_ref() else {
            return Err(GameError::IllegalPlay(
                "no freshly drawn card to play".into(),
            ));
        };
        if pending.player != id || !pending.cards.contains(&card) {
            return Err(GameError::IllegalPlay(format!(
                "{card} was not drawn this turn"
            )));
        }

        let table = self.table_state()?;
        let hand = &self.player(id).expect("checked by require_turn").hand;
        validate_play(hand, &[card], declared, &table)?;

        self.pending_draw = None;
        self.commit_play(id, SmallVec::from_slice(&[card]), declared)
    }

    /// Draw cards on your turn.
    ///
    /// With a pending draw stack this resolves the whole penalty: exactly
    /// `draw_stack` cards are drawn, the stack resets to zero, and the turn
    /// ends. Otherwise it is a voluntary draw of `count` (default 1); the
    /// outcome reports which drawn cards are immediately playable, and the
    /// turn stays with the player until they play a drawn card or pass.
    pub fn draw_cards(
        &mut self,
        id: PlayerId,
        count: Option<u32>,
    ) -> Result<DrawOutcome, GameError> {
        self.require_turn(id)?;
        if self.pending_draw.is_some() {
            return Err(GameError::DrawNotAllowed(
                "already drew this turn: play the drawn card or pass".into(),
            ));
        }

        if self.draw_stack > 0 {
            return self.resolve_forced_draw(id);
        }

        let requested = count.unwrap_or(1).max(1);
        let mut drawn = Vec::with_capacity(requested as usize);
        for _ in 0..requested {
            match self.piles.draw_one(&mut self.rng) {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        if drawn.is_empty() {
            return Err(GameError::DrawNotAllowed(
                "no cards left to draw".into(),
            ));
        }

        let table = self.table_state()?;
        let playable = playable_from_hand(&drawn, &table);

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .expect("checked by require_turn");
        player.hand.extend(drawn.iter().copied());

        self.pending_draw = Some(PendingDraw {
            player: id,
            cards: drawn.clone(),
        });

        debug!(game = %self.id, %id, count = drawn.len(), "voluntary draw");
        let event = self.record(
            EventKind::CardsDrawn {
                player: id,
                count: drawn.len() as u32,
                forced: false,
            },
            Some(id),
        );
        self.check_conservation()?;
        Ok(DrawOutcome {
            event,
            drawn,
            forced: false,
            playable,
        })
    }

    /// End the turn after a voluntary draw without playing.
    pub fn pass_turn_after_draw(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        self.require_turn(id)?;
        match self.pending_draw.as_ref() {
            Some(pending) if pending.player == id => {}
            _ => {
                return Err(GameError::PassNotAllowed(
                    "passing is only allowed right after a voluntary draw".into(),
                ))
            }
        }

        self.pending_draw = None;
        self.turn.advance(1);
        debug!(game = %self.id, %id, "turn passed");
        let event = self.record(EventKind::TurnPassed { player: id }, self.turn.current());
        self.check_conservation()?;
        Ok(event)
    }

    /// Round-resolution hook: eliminate a player and drop them from the
    /// rotation. The policy deciding *when* lives outside the engine.
    pub fn eliminate(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        if !matches!(self.phase, GamePhase::Preparation | GamePhase::Playing) {
            return Err(GameError::WrongPhase(
                "elimination applies to a live round".into(),
            ));
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))?;
        if player.is_eliminated {
            return Err(GameError::PlayerEliminated(id));
        }

        player.is_eliminated = true;
        if self.pending_draw.as_ref().is_some_and(|p| p.player == id) {
            self.pending_draw = None;
        }
        self.turn.remove(id);

        info!(game = %self.id, %id, "player eliminated");
        let event = self.record(EventKind::PlayerEliminated { player: id }, self.turn.current());
        if self.turn.len() <= 1 && self.phase == GamePhase::Playing {
            self.finish_round();
        }
        Ok(event)
    }

    // === Play-again voting ===

    /// Vote to play another round. Finished games only; eliminated and
    /// disconnected players have no say in the rematch.
    pub fn add_play_again_vote(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        self.require_finished()?;
        let player = self.player(id).ok_or(GameError::PlayerNotFound(id))?;
        if player.is_eliminated || !player.is_connected {
            return Err(GameError::VoteNotAllowed(
                "only remaining connected players may vote".into(),
            ));
        }
        if !self.play_again_votes.insert(id) {
            return Err(GameError::VoteNotAllowed("vote already counted".into()));
        }
        Ok(self.record(
            EventKind::PlayAgainVote {
                player: id,
                voted: true,
            },
            None,
        ))
    }

    /// Withdraw a play-again vote.
    pub fn remove_play_again_vote(&mut self, id: PlayerId) -> Result<GameEvent, GameError> {
        self.require_finished()?;
        if self.player(id).is_none() {
            return Err(GameError::PlayerNotFound(id));
        }
        if !self.play_again_votes.remove(&id) {
            return Err(GameError::VoteNotAllowed("no vote to withdraw".into()));
        }
        Ok(self.record(
            EventKind::PlayAgainVote {
                player: id,
                voted: false,
            },
            None,
        ))
    }

    /// Current play-again tally. Unanimity means every quorum member has
    /// voted; stale votes from players who have since left the quorum are
    /// not counted.
    #[must_use]
    pub fn play_again_status(&self) -> PlayAgainStatus {
        let quorum = self.rematch_quorum();
        let mut votes: Vec<PlayerId> = quorum
            .iter()
            .copied()
            .filter(|id| self.play_again_votes.contains(id))
            .collect();
        votes.sort_unstable();
        PlayAgainStatus {
            unanimous: !quorum.is_empty() && votes.len() == quorum.len(),
            required: quorum.len(),
            votes,
        }
    }

    /// Connected, non-eliminated players: the unanimity denominator.
    fn rematch_quorum(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| p.is_connected && !p.is_eliminated)
            .map(|p| p.id)
            .collect()
    }

    /// Spawn a fresh game with the same roster once the play-again vote is
    /// unanimous. The new game starts in `Waiting` under `new_id`, with
    /// hands and flags reset and `round_number` advanced.
    pub fn spawn_rematch(&mut self, new_id: GameId) -> Result<Game, GameError> {
        self.require_finished()?;
        let status = self.play_again_status();
        if !status.unanimous {
            return Err(GameError::VoteNotAllowed(format!(
                "waiting for {} more play-again votes",
                status.required.saturating_sub(status.votes.len())
            )));
        }

        let seed = self.rng.next_seed();
        let mut rematch = Game::new(new_id, self.creator, "", seed);
        rematch.round_number = self.round_number + 1;
        rematch.players = self
            .players
            .iter()
            .map(|p| {
                let mut fresh = Player::new(p.id, p.display_name.clone());
                fresh.is_connected = p.is_connected;
                fresh
            })
            .collect();

        info!(game = %self.id, rematch = %new_id, round = rematch.round_number, "rematch spawned");
        Ok(rematch)
    }

    fn require_finished(&self) -> Result<(), GameError> {
        if self.phase != GamePhase::Finished {
            return Err(GameError::WrongPhase(
                "play-again voting opens when the game finishes".into(),
            ));
        }
        Ok(())
    }

    // === Snapshots & persistence ===

    /// Build the immutable projection for one viewer. `None` yields the
    /// spectator view: hand sizes only, no hand contents.
    #[must_use]
    pub fn snapshot_for(&self, viewer: Option<PlayerId>) -> GameSnapshot {
        GameSnapshot {
            game_id: self.id,
            phase: self.phase,
            round_number: self.round_number,
            creator: self.creator,
            players: self
                .players
                .iter()
                .map(|p| PlayerPublic {
                    id: p.id,
                    display_name: p.display_name.clone(),
                    hand_size: p.hand.len(),
                    is_safe: p.is_safe,
                    is_eliminated: p.is_eliminated,
                    is_connected: p.is_connected,
                })
                .collect(),
            current_player: self.current_player(),
            direction: self.turn.direction(),
            discard_top: self.piles.discard_top(),
            declared_suit: self.declared_suit,
            draw_stack: self.draw_stack,
            draw_pile_size: self.piles.draw_size(),
            discard_pile_size: self.piles.discard_size(),
            viewer,
            hand: viewer
                .and_then(|v| self.player(v))
                .map(|p| p.hand.clone()),
        }
    }

    /// Serialize the whole aggregate for checkpointing.
    pub fn to_bytes(&self) -> Result<Vec<u8>, GameError> {
        bincode::serialize(self).map_err(|e| GameError::Persistence(e.to_string()))
    }

    /// Restore an aggregate from [`Game::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> Result<Game, GameError> {
        bincode::deserialize(bytes).map_err(|e| GameError::Persistence(e.to_string()))
    }

    // === Internals ===

    /// Basic requirements shared by every in-round operation: phase,
    /// membership, status flags, turn order. Checked in this order so the
    /// most specific failure wins.
    fn require_turn(&self, id: PlayerId) -> Result<(), GameError> {
        if self.phase != GamePhase::Playing {
            return Err(GameError::GameNotActive);
        }
        let player = self.player(id).ok_or(GameError::PlayerNotFound(id))?;
        if player.is_eliminated {
            return Err(GameError::PlayerEliminated(id));
        }
        if player.is_safe {
            return Err(GameError::PlayerSafe(id));
        }
        if self.turn.current() != Some(id) {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    fn table_state(&self) -> Result<TableState, GameError> {
        Ok(TableState {
            discard_top: self
                .piles
                .discard_top()
                .ok_or_else(|| GameError::Fault("discard pile empty during a round".into()))?,
            declared_suit: self.declared_suit,
            draw_stack: self.draw_stack,
        })
    }

    /// Commit an already-validated play: move cards, apply the effect,
    /// advance the rotation, check invariants, record the event.
    fn commit_play(
        &mut self,
        id: PlayerId,
        cards: SmallVec<[Card; 4]>,
        declared: Option<Suit>,
    ) -> Result<PlayOutcome, GameError> {
        let effect = compute_effect(&cards, declared);

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .expect("validated membership");
        for &card in &cards {
            if !player.remove_card(card) {
                return Err(GameError::Fault(format!(
                    "validated card {card} missing from hand at commit"
                )));
            }
        }
        let went_safe = player.hand.is_empty();
        if went_safe {
            player.is_safe = true;
        }

        for &card in &cards {
            self.piles.push_discard(card);
        }

        self.draw_stack += effect.draw_amount_added;
        self.declared_suit = effect.suit_declared;
        if effect.reverse {
            self.turn.reverse();
        }
        self.pending_draw = None;

        if went_safe {
            self.round_winner = self.round_winner.or(Some(id));
            self.turn.remove(id);
        }

        let round_finished = self.turn.len() <= 1;
        if !round_finished {
            if went_safe {
                // Removal already moved the pointer one seat onward.
                self.turn.advance(effect.skip_count as usize);
            } else {
                self.turn.advance(1 + effect.skip_count as usize);
            }
        }
        let next_player = if round_finished {
            None
        } else {
            self.turn.current()
        };

        debug!(
            game = %self.id,
            %id,
            count = cards.len(),
            draw_stack = self.draw_stack,
            went_safe,
            "cards played"
        );

        if let Some(suit) = effect.suit_declared {
            self.record(EventKind::SuitDeclared { player: id, suit }, None);
        }
        let event = self.record(
            EventKind::CardsPlayed {
                player: id,
                cards,
                effect,
                went_safe,
            },
            next_player,
        );
        if round_finished {
            self.finish_round();
        }
        self.check_conservation()?;

        Ok(PlayOutcome {
            event,
            effect,
            went_safe,
            round_finished,
        })
    }

    /// Resolve a pending draw stack: draw exactly `draw_stack` cards,
    /// reset it, and end the turn.
    fn resolve_forced_draw(&mut self, id: PlayerId) -> Result<DrawOutcome, GameError> {
        let owed = self.draw_stack;
        let mut drawn = Vec::with_capacity(owed as usize);
        for _ in 0..owed {
            match self.piles.draw_one(&mut self.rng) {
                Some(card) => drawn.push(card),
                // Every other card is in hands; the penalty caps there.
                None => break,
            }
        }

        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id)
            .expect("checked by require_turn");
        player.hand.extend(drawn.iter().copied());

        self.draw_stack = 0;
        self.turn.advance(1);

        debug!(game = %self.id, %id, count = drawn.len(), "forced draw resolved");
        let event = self.record(
            EventKind::CardsDrawn {
                player: id,
                count: drawn.len() as u32,
                forced: true,
            },
            self.turn.current(),
        );
        self.check_conservation()?;
        Ok(DrawOutcome {
            event,
            drawn,
            forced: true,
            playable: Vec::new(),
        })
    }

    fn finish_round(&mut self) {
        self.phase = GamePhase::Finished;
        self.play_again_votes.clear();
        info!(game = %self.id, winner = ?self.round_winner, "round finished");
        self.record(
            EventKind::RoundFinished {
                winner: self.round_winner,
            },
            None,
        );
    }

    fn record(&mut self, kind: EventKind, next_player: Option<PlayerId>) -> GameEvent {
        let event = GameEvent {
            seq: self.next_seq,
            round: self.round_number,
            kind,
            next_player,
        };
        self.next_seq += 1;
        self.events.push_back(event.clone());
        event
    }

    /// No card is ever created or destroyed during a round.
    fn check_conservation(&self) -> Result<(), GameError> {
        if self.phase == GamePhase::Waiting {
            return Ok(());
        }
        let in_hands: usize = self.players.iter().map(|p| p.hand.len()).sum();
        let total = self.piles.total() + in_hands;
        if total != DECK_SIZE {
            return Err(GameError::Fault(format!(
                "card count mismatch: {total} cards accounted for, expected {DECK_SIZE}"
            )));
        }
        Ok(())
    }
}
