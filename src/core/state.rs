//! Game state: board, players, randomness, and the message log.
//!
//! ## GameState
//!
//! Everything a move can read or change:
//! - The board graph
//! - Seated players and their display names
//! - Deterministic RNG
//! - The log of completed-action messages
//!
//! ## Viewpoint
//!
//! Queries such as "my pieces" depend on whose turn is being resolved.
//! `with_viewpoint` scopes that explicitly: it pushes a player, runs the
//! closure, and pops again, so nested resolutions restore the outer viewer.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::player::{PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use crate::board::{Board, ElementQuery};
use crate::core::ElementId;
use crate::error::EngineError;

/// Complete state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    /// The board graph.
    pub board: Board,

    /// Deterministic RNG.
    pub rng: GameRng,

    players: PlayerMap<String>,
    config: EngineConfig,
    viewpoints: Vec<PlayerId>,
    messages: Vector<String>,
}

/// Serialized form of a `GameState`.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    board: Board,
    players: PlayerMap<String>,
    rng: GameRngState,
    config: EngineConfig,
    messages: Vec<String>,
}

impl GameState {
    /// Create a new game with default configuration.
    ///
    /// Players are named "Player 1", "Player 2", ...
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self::with_config(player_count, seed, EngineConfig::default())
    }

    /// Create a new game with explicit configuration.
    #[must_use]
    pub fn with_config(player_count: usize, seed: u64, config: EngineConfig) -> Self {
        Self {
            board: Board::new(),
            rng: GameRng::new(seed),
            players: PlayerMap::new(player_count, |p| p.to_string()),
            config,
            viewpoints: Vec::new(),
            messages: Vector::new(),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // === Players ===

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.player_ids()
    }

    /// Check whether a player is seated.
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(player)
    }

    /// Display name of a player.
    #[must_use]
    pub fn player_name(&self, player: PlayerId) -> Option<&str> {
        self.players.get(player).map(String::as_str)
    }

    /// Rename a player.
    pub fn set_player_name(&mut self, player: PlayerId, name: impl Into<String>) {
        if let Some(slot) = self.players.get_mut(player) {
            *slot = name.into();
        }
    }

    // === Viewpoint ===

    /// Player whose viewpoint is active, if any.
    #[must_use]
    pub fn viewpoint(&self) -> Option<PlayerId> {
        self.viewpoints.last().copied()
    }

    /// Run `f` with `player`'s viewpoint active, restoring the previous
    /// viewpoint afterwards.
    ///
    /// ```
    /// use rust_tabletop::core::{GameState, PlayerId};
    ///
    /// let mut state = GameState::new(2, 1);
    /// let inner = state.with_viewpoint(PlayerId::new(1), |s| {
    ///     s.with_viewpoint(PlayerId::new(0), |s| s.viewpoint())
    /// });
    /// assert_eq!(inner, Some(PlayerId::new(0)));
    /// assert_eq!(state.viewpoint(), None);
    /// ```
    pub fn with_viewpoint<R>(&mut self, player: PlayerId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.viewpoints.push(player);
        let result = f(self);
        self.viewpoints.pop();
        result
    }

    // === Board queries from the active viewpoint ===

    /// Every element matching `query`, as seen by the active viewpoint.
    #[must_use]
    pub fn all(&self, query: &ElementQuery) -> Vec<ElementId> {
        self.board.all(query, self.viewpoint())
    }

    /// First element matching `query`, as seen by the active viewpoint.
    #[must_use]
    pub fn first(&self, query: &ElementQuery) -> Option<ElementId> {
        self.board.first(query, self.viewpoint())
    }

    // === Messages ===

    /// Append a message to the game log.
    pub fn log_message(&mut self, message: impl Into<String>) {
        self.messages.push_back(message.into());
    }

    /// The message log, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &String> {
        self.messages.iter()
    }

    // === Snapshots ===

    /// Serialize board, players, rng and log with bincode.
    ///
    /// The viewpoint stack is transient and not included.
    pub fn snapshot(&self) -> Result<Vec<u8>, EngineError> {
        let snapshot = Snapshot {
            board: self.board.clone(),
            players: self.players.clone(),
            rng: self.rng.state(),
            config: self.config.clone(),
            messages: self.messages.iter().cloned().collect(),
        };
        Ok(bincode::serialize(&snapshot)?)
    }

    /// Rebuild a game from `snapshot` output.
    pub fn restore(bytes: &[u8]) -> Result<Self, EngineError> {
        let snapshot: Snapshot = bincode::deserialize(bytes)?;
        Ok(Self {
            board: snapshot.board,
            rng: GameRng::from_state(&snapshot.rng),
            players: snapshot.players,
            config: snapshot.config,
            viewpoints: Vec::new(),
            messages: snapshot.messages.into_iter().collect(),
        })
    }
}
