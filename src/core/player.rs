//! Seats and per-seat storage for the bundled games.
//!
//! The search engine is generic over each game's own player type
//! (`GameState::Player`); `PlayerId` is simply what the reference games use.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// A 0-based seat. Displays 1-based (`P1`, `P2`, ...) for narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    #[must_use]
    pub const fn new(seat: u8) -> Self {
        Self(seat)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whoever sits after this seat at a table of `seats`.
    #[must_use]
    pub fn next_in(self, seats: usize) -> Self {
        debug_assert!(seats > 0);
        Self(((self.index() + 1) % seats) as u8)
    }

    /// Every seat at a table of `seats`, in turn order.
    ///
    /// ```
    /// use lookahead::core::PlayerId;
    ///
    /// let names: Vec<String> = PlayerId::all(3).map(|p| p.to_string()).collect();
    /// assert_eq!(names, ["P1", "P2", "P3"]);
    /// ```
    pub fn all(seats: usize) -> impl Iterator<Item = PlayerId> {
        (0..seats as u8).map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.index() + 1)
    }
}

/// One `T` per seat.
///
/// ```
/// use lookahead::core::{PlayerId, PlayerMap};
///
/// let mut banked: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// banked[PlayerId::new(1)] += 3;
/// assert_eq!(banked[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    per_seat: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build each seat's value from its id.
    pub fn from_fn(seats: usize, mut init: impl FnMut(PlayerId) -> T) -> Self {
        assert!(
            (1..=usize::from(u8::MAX)).contains(&seats),
            "need between 1 and 255 seats, got {seats}"
        );
        Self {
            per_seat: PlayerId::all(seats).map(&mut init).collect(),
        }
    }

    pub fn with_value(seats: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(seats, |_| value.clone())
    }

    #[must_use]
    pub fn seats(&self) -> usize {
        self.per_seat.len()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.per_seat[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.per_seat[player.index()]
    }
}
