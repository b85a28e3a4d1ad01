//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Type-safe seat identifier supporting 1-255 players. Internally 0-based;
//! the 1-based *position* is what players see and what the wire format uses.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Player identifier supporting 1-255 players.
///
/// The first player is `PlayerId(0)`, sitting at position 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID from a 0-based index.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Create a player ID from a 1-based seat position.
    ///
    /// Returns `None` for position 0 or positions above 255.
    ///
    /// ```
    /// use rust_tabletop::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::from_position(1), Some(PlayerId::new(0)));
    /// assert_eq!(PlayerId::from_position(0), None);
    /// ```
    #[must_use]
    pub fn from_position(position: usize) -> Option<Self> {
        if position == 0 || position > 255 {
            return None;
        }
        Some(Self((position - 1) as u8))
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the 1-based seat position.
    #[must_use]
    pub const fn position(self) -> usize {
        self.0 as usize + 1
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use rust_tabletop::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.position())
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use rust_tabletop::core::{PlayerId, PlayerMap};
///
/// let mut score: PlayerMap<i64> = PlayerMap::with_value(2, 0);
/// score[PlayerId::new(1)] += 3;
/// assert_eq!(score[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Create a new PlayerMap with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether a player belongs to this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    /// Get a player's data, or `None` for an unknown seat.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}
