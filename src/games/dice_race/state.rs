//! Dice race positions.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PlayerId, PlayerMap};
use crate::rules::GameState;

/// Faces on each die; also the number of tracks.
pub const FACES: u8 = 6;

/// Squares on each track, indexed by `face - 1`.
pub const TRACK_LENGTHS: [u8; FACES as usize] = [3, 4, 5, 5, 4, 3];

/// Runners a player may have on the board in one turn.
pub const RUNNERS: usize = 2;

/// A temporary marker for progress made this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Runner {
    pub track: u8,
    pub position: u8,
}

/// Length of the track numbered `track` (1-based).
#[must_use]
pub fn track_length(track: u8) -> u8 {
    TRACK_LENGTHS[usize::from(track - 1)]
}

/// A full dice race position.
///
/// Per-player banked progress lives in persistent vectors so that the
/// constant cloning done by search shares structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceState {
    pub(crate) seats: Vec<PlayerId>,
    pub(crate) current: PlayerId,
    pub(crate) turn: u16,
    pub(crate) banked: PlayerMap<im::Vector<u8>>,
    pub(crate) claimed: im::Vector<Option<PlayerId>>,
    pub(crate) dice: Option<[u8; 2]>,
    pub(crate) spent: [bool; 2],
    pub(crate) runners: SmallVec<[Runner; RUNNERS]>,
    pub(crate) victors: Vec<PlayerId>,
    pub(crate) defeated: Vec<PlayerId>,
    pub(crate) drawn: bool,
}

impl RaceState {
    pub(crate) fn new(player_count: usize) -> Self {
        let seats: Vec<PlayerId> = PlayerId::all(player_count).collect();
        Self {
            seats,
            current: PlayerId::new(0),
            turn: 0,
            banked: PlayerMap::with_value(
                player_count,
                im::Vector::from(vec![0u8; usize::from(FACES)]),
            ),
            claimed: im::Vector::from(vec![None; usize::from(FACES)]),
            dice: None,
            spent: [false; 2],
            runners: SmallVec::new(),
            victors: Vec::new(),
            defeated: Vec::new(),
            drawn: false,
        }
    }

    /// Completed turns so far.
    #[must_use]
    pub fn turn(&self) -> u16 {
        self.turn
    }

    /// The dice on the table, if the current player has rolled.
    #[must_use]
    pub fn dice(&self) -> Option<[u8; 2]> {
        self.dice
    }

    /// Replace the dice on the table, as if they had just been rolled.
    ///
    /// Useful for setting up positions in tests and tutorials.
    pub fn force_dice(&mut self, dice: [u8; 2]) {
        assert!(
            dice.iter().all(|d| (1..=FACES).contains(d)),
            "dice must show 1..={FACES}"
        );
        self.dice = Some(dice);
        self.spent = [false; 2];
    }

    #[must_use]
    pub fn runners(&self) -> &[Runner] {
        &self.runners
    }

    /// Progress `player` has banked on `track`.
    #[must_use]
    pub fn banked(&self, player: PlayerId, track: u8) -> u8 {
        self.banked[player][usize::from(track - 1)]
    }

    /// Who owns `track`, if anyone.
    #[must_use]
    pub fn claimed_by(&self, track: u8) -> Option<PlayerId> {
        self.claimed[usize::from(track - 1)]
    }

    /// Tracks owned by `player`.
    #[must_use]
    pub fn claims_of(&self, player: PlayerId) -> usize {
        self.claimed.iter().filter(|c| **c == Some(player)).count()
    }

    /// Runner currently on `track`, if any.
    #[must_use]
    pub fn runner_on(&self, track: u8) -> Option<&Runner> {
        self.runners.iter().find(|r| r.track == track)
    }

    /// Can a runner move up `track` right now?
    #[must_use]
    pub fn can_advance(&self, track: u8) -> bool {
        if self.claimed_by(track).is_some() {
            return false;
        }
        match self.runner_on(track) {
            Some(runner) => runner.position < track_length(track),
            None => {
                self.runners.len() < RUNNERS
                    && self.banked(self.current, track) < track_length(track)
            }
        }
    }

    /// Indices of dice that are unspent and can move a runner.
    pub fn usable_dice(&self) -> impl Iterator<Item = usize> + '_ {
        self.dice
            .into_iter()
            .flat_map(|dice| dice.into_iter().enumerate())
            .filter(|(i, face)| !self.spent[*i] && self.can_advance(*face))
            .map(|(i, _)| i)
    }

    pub(crate) fn end_turn(&mut self) {
        self.runners.clear();
        self.dice = None;
        self.spent = [false; 2];
        self.turn += 1;
        self.current = self.current.next_in(self.seats.len());
    }
}

impl GameState for RaceState {
    type Player = PlayerId;

    fn player(&self) -> PlayerId {
        self.current
    }

    fn players(&self) -> &[PlayerId] {
        &self.seats
    }

    fn ended(&self) -> bool {
        self.drawn || !self.victors.is_empty()
    }

    fn ended_in_victory_for(&self) -> &[PlayerId] {
        &self.victors
    }

    fn ended_in_defeat_for(&self) -> &[PlayerId] {
        &self.defeated
    }

    /// Runners are interchangeable: order them by track.
    fn canonicalize(&self) -> Self {
        let mut canonical = self.clone();
        canonical.runners.sort_unstable();
        canonical
    }
}

impl fmt::Display for RaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn {} {} ", self.turn + 1, self.current)?;
        match self.dice {
            Some([a, b]) => write!(f, "dice {a}/{b}")?,
            None => write!(f, "to roll")?,
        }
        write!(f, " runners [")?;
        for (i, runner) in self.runners.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", runner.track, runner.position)?;
        }
        write!(f, "] claimed [")?;
        for (i, owner) in self.claimed.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match owner {
                Some(player) => write!(f, "{player}")?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_empty() {
        let state = RaceState::new(3);
        assert_eq!(state.players().len(), 3);
        assert_eq!(state.player(), PlayerId::new(0));
        assert!(!state.ended());
        for track in 1..=FACES {
            assert_eq!(state.banked(PlayerId::new(2), track), 0);
            assert_eq!(state.claimed_by(track), None);
            assert!(state.can_advance(track));
        }
    }

    #[test]
    fn test_runner_order_is_cosmetic() {
        let mut a = RaceState::new(2);
        a.runners.push(Runner { track: 2, position: 1 });
        a.runners.push(Runner { track: 5, position: 1 });
        let mut b = a.clone();
        b.runners.reverse();

        assert_ne!(a, b);
        assert!(a.equivalent(&b));
    }

    #[test]
    fn test_no_free_runner_blocks_new_tracks() {
        let mut state = RaceState::new(1);
        state.runners.push(Runner { track: 1, position: 1 });
        state.runners.push(Runner { track: 2, position: 4 });

        assert!(state.can_advance(1));
        assert!(!state.can_advance(2), "runner is at the top");
        assert!(!state.can_advance(3), "both runners are placed");
    }

    #[test]
    fn test_usable_dice_skip_spent_and_blocked() {
        let mut state = RaceState::new(2);
        state.claimed[0] = Some(PlayerId::new(1));
        state.force_dice([1, 4]);
        assert_eq!(state.usable_dice().collect::<Vec<_>>(), vec![1]);

        state.spent[1] = true;
        assert_eq!(state.usable_dice().count(), 0);
    }

    #[test]
    fn test_display() {
        let mut state = RaceState::new(2);
        state.force_dice([2, 5]);
        state.runners.push(Runner { track: 2, position: 1 });
        assert_eq!(
            state.to_string(),
            "turn 1 P1 dice 2/5 runners [2@1] claimed [- - - - - -]"
        );
    }
}
