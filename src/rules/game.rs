//! The game definition contract.
//!
//! Games implement three traits:
//! - `GameState`: who is to act, who is playing, whether and how it ended
//! - `GameAction`: opaque moves, with a recursive `Sequence` form
//! - `Game`: the rule set and the reducer for atomic actions
//!
//! Everything else (legal action enumeration, sequence reduction, legality
//! checks) is provided on top of those.
//!
//! ## Implementation Notes
//!
//! - `apply` only ever sees atomic actions; `reduce` checks legality and
//!   unfolds sequences
//! - `apply` must draw all randomness from the `rng` argument
//! - rules must be total and side-effect-free

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crate::core::{GameRng, LogEntry};

use super::compose;
use super::rule::Rule;

/// A complete, fully visible game position.
pub trait GameState: Clone + PartialEq + Debug + Display {
    /// Seat identifier used by this game.
    type Player: Copy + Eq + Hash + Debug;

    /// The player to act.
    fn player(&self) -> Self::Player;

    /// Every player taking part, in seating order.
    fn players(&self) -> &[Self::Player];

    /// Whether the game is over.
    fn ended(&self) -> bool;

    /// Players who won. Empty while the game is running.
    fn ended_in_victory_for(&self) -> &[Self::Player];

    /// Players who lost. Empty while the game is running.
    fn ended_in_defeat_for(&self) -> &[Self::Player];

    /// Erase cosmetic differences before comparison.
    ///
    /// Games with interchangeable pieces override this to put the pieces in
    /// a fixed order, so that moving "runner 1" or "runner 2" into the same
    /// square produces equivalent states.
    #[must_use]
    fn canonicalize(&self) -> Self {
        self.clone()
    }

    /// Outcome equivalence used for action deduplication.
    fn equivalent(&self, other: &Self) -> bool {
        self.canonicalize() == other.canonicalize()
    }

    /// Terminal score from `player`'s perspective: +1 victory, -1 defeat,
    /// 0 for anything else (draws, unfinished games).
    fn value_for(&self, player: Self::Player) -> f64 {
        if self.ended_in_victory_for().contains(&player) {
            1.0
        } else if self.ended_in_defeat_for().contains(&player) {
            -1.0
        } else {
            0.0
        }
    }
}

/// An opaque move. Composite moves are a `Sequence` of sub-moves.
pub trait GameAction: Clone + Eq + Hash + Debug + Display {
    /// Build a composite action applying `actions` left to right.
    fn sequence(actions: Vec<Self>) -> Self;

    /// The sub-actions, if this is a composite action.
    fn as_sequence(&self) -> Option<&[Self]>;
}

/// A turn-based game: rule set plus deterministic reducer.
pub trait Game: Sized + 'static {
    type State: GameState;
    type Action: GameAction;

    /// Starting position.
    fn new_state(&self) -> Self::State;

    /// The rules, in declaration order.
    fn rules(&self) -> &[Rule<Self>];

    /// Apply one atomic action.
    ///
    /// Panics on actions that make no sense in `state`.
    fn apply(
        &self,
        state: &mut Self::State,
        action: &Self::Action,
        rng: &mut GameRng,
    ) -> Vec<LogEntry>;

    // === Provided ===

    /// Apply a legal action, atomic or composite.
    ///
    /// # Panics
    ///
    /// If `action` is not among `allowed_actions(state)`.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: &Self::Action,
        rng: &mut GameRng,
    ) -> Vec<LogEntry> {
        let allowed = self.allowed_actions(state);
        assert!(
            allowed.contains(action),
            "illegal action `{action}` in state `{state}` (allowed: {allowed:?})"
        );
        self.reduce_unchecked(state, action, rng)
    }

    /// `reduce` without the legality check, for callers that took `action`
    /// from `allowed_actions` themselves or build speculative composites.
    ///
    /// Sequences are applied left to right on the evolving state, so
    /// `[a, b]` lands where `a` then `b` would for the same dice.
    fn reduce_unchecked(
        &self,
        state: &mut Self::State,
        action: &Self::Action,
        rng: &mut GameRng,
    ) -> Vec<LogEntry> {
        match action.as_sequence() {
            Some(actions) => {
                let mut log = Vec::new();
                for sub in actions {
                    log.extend(self.reduce_unchecked(state, sub, rng));
                }
                log
            }
            None => self.apply(state, action, rng),
        }
    }

    /// Every legal action, deduplicated by outcome, in rule order.
    fn allowed_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        compose::allowed_actions(self, state)
    }

    /// The state after `action`, reduced speculatively with the fixed-seed
    /// dice source. `state` is left untouched.
    fn outcome_after(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut next = state.clone();
        let mut rng = GameRng::speculative();
        self.reduce_unchecked(&mut next, action, &mut rng);
        next
    }
}
