//! Game table: one exclusive-access handle per game.
//!
//! Each game is a single logical actor (see `game`): every operation on it
//! runs under that entry's lock, start to finish, while operations on
//! different games proceed in parallel. The outer map lock is held only for
//! the id lookup, never across a game operation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::info;

use crate::core::PlayerId;
use crate::error::GameError;
use crate::game::{Game, GameId};

/// Registry of live games, indexed by id.
#[derive(Debug, Default)]
pub struct GameTable {
    games: Mutex<FxHashMap<GameId, Arc<Mutex<Game>>>>,
    next_id: AtomicU64,
}

impl GameTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new lobby and return its id.
    pub fn create(
        &self,
        creator: PlayerId,
        creator_name: impl Into<String>,
        seed: u64,
    ) -> GameId {
        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let game = Game::new(id, creator, creator_name, seed);
        self.games.lock().insert(id, Arc::new(Mutex::new(game)));
        info!(game = %id, "game created");
        id
    }

    /// Run `f` under the game's exclusive lock.
    ///
    /// Returns `None` if the id is unknown. The outer map lock is released
    /// before `f` runs, so long operations on one game never block lookups
    /// or operations on others.
    pub fn with_game<R>(&self, id: GameId, f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        let entry = self.games.lock().get(&id).cloned()?;
        let mut game = entry.lock();
        Some(f(&mut game))
    }

    /// Spawn the rematch of a finished game and register it under a fresh
    /// id. Fails with the underlying vote error if the play-again vote is
    /// not unanimous.
    pub fn spawn_rematch(&self, id: GameId) -> Option<Result<GameId, GameError>> {
        let entry = self.games.lock().get(&id).cloned()?;
        let new_id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let spawned = entry.lock().spawn_rematch(new_id);
        Some(match spawned {
            Ok(game) => {
                self.games.lock().insert(new_id, Arc::new(Mutex::new(game)));
                Ok(new_id)
            }
            Err(e) => Err(e),
        })
    }

    /// Drop a game from the table. Returns true if it existed.
    pub fn remove(&self, id: GameId) -> bool {
        self.games.lock().remove(&id).is_some()
    }

    #[must_use]
    pub fn contains(&self, id: GameId) -> bool {
        self.games.lock().contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }
}
