//! Single-decision bandit game for exercising the search engines.
//!
//! One player picks an arm. Each arm wins with a fixed probability, resolved
//! by the dice source. An arm may require a number of forced "approach"
//! steps before it resolves; while approaching, `Approach` is the only legal
//! action.

use std::fmt;

use crate::core::{GameRng, LogEntry, PlayerId};
use crate::rules::{running, Game, GameAction, GameState, Rule};

/// An arm with a known win probability.
#[derive(Clone, Debug, PartialEq)]
pub struct Arm {
    pub name: String,
    pub win_probability: f64,
    /// Forced steps between choosing the arm and resolving it.
    pub approach: usize,
}

impl Arm {
    pub fn new(name: impl Into<String>, win_probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&win_probability),
            "win probability must be within 0..=1"
        );
        Self {
            name: name.into(),
            win_probability,
            approach: 0,
        }
    }

    /// Require `steps` forced `Approach` actions before the arm resolves.
    #[must_use]
    pub fn with_approach(mut self, steps: usize) -> Self {
        self.approach = steps;
        self
    }
}

/// Bandit actions.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pull {
    /// Commit to the arm at this index.
    Arm(usize),
    /// One forced step towards the chosen arm.
    Approach,
    Sequence(Vec<Pull>),
}

impl GameAction for Pull {
    fn sequence(actions: Vec<Self>) -> Self {
        Pull::Sequence(actions)
    }

    fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Pull::Sequence(actions) => Some(actions),
            _ => None,
        }
    }
}

impl fmt::Display for Pull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pull::Arm(i) => write!(f, "pull {i}"),
            Pull::Approach => write!(f, "approach"),
            Pull::Sequence(actions) => {
                write!(f, "[")?;
                for (i, action) in actions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{action}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Bandit position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BanditState {
    seats: Vec<PlayerId>,
    chosen: Option<usize>,
    approach_left: usize,
    victors: Vec<PlayerId>,
    defeated: Vec<PlayerId>,
}

impl BanditState {
    /// Has an arm been chosen yet?
    #[must_use]
    pub fn pulled(&self) -> bool {
        self.chosen.is_some()
    }

    #[must_use]
    pub fn chosen(&self) -> Option<usize> {
        self.chosen
    }

    #[must_use]
    pub fn approach_left(&self) -> usize {
        self.approach_left
    }
}

impl GameState for BanditState {
    type Player = PlayerId;

    fn player(&self) -> PlayerId {
        self.seats[0]
    }

    fn players(&self) -> &[PlayerId] {
        &self.seats
    }

    fn ended(&self) -> bool {
        !self.victors.is_empty() || !self.defeated.is_empty()
    }

    fn ended_in_victory_for(&self) -> &[PlayerId] {
        &self.victors
    }

    fn ended_in_defeat_for(&self) -> &[PlayerId] {
        &self.defeated
    }
}

impl fmt::Display for BanditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.chosen, self.ended()) {
            (None, _) => write!(f, "choosing"),
            (Some(arm), false) => write!(f, "arm {arm}, {} steps left", self.approach_left),
            (Some(arm), true) if !self.victors.is_empty() => write!(f, "arm {arm} won"),
            (Some(arm), true) => write!(f, "arm {arm} lost"),
        }
    }
}

/// The bandit game.
#[derive(Debug)]
pub struct Bandit {
    arms: Vec<Arm>,
    rules: Vec<Rule<Bandit>>,
}

impl Bandit {
    pub fn new(arms: Vec<Arm>) -> Self {
        assert!(!arms.is_empty(), "a bandit needs at least one arm");

        let choose = Rule::<Bandit>::new(
            "choose arm",
            |_, state: &BanditState| !state.pulled(),
            |game: &Bandit, _| (0..game.arms.len()).map(Pull::Arm).collect(),
        )
        .also(running);
        let approach = Rule::<Bandit>::new(
            "approach",
            |_, state: &BanditState| state.pulled() && state.approach_left > 0,
            |_, _| vec![Pull::Approach],
        )
        .also(running);

        Self {
            arms,
            rules: vec![choose, approach],
        }
    }

    #[must_use]
    pub fn arms(&self) -> &[Arm] {
        &self.arms
    }

    fn resolve(&self, state: &mut BanditState, arm: usize, rng: &mut GameRng) -> LogEntry {
        let player = state.player();
        if rng.gen_bool(self.arms[arm].win_probability) {
            state.victors.push(player);
            LogEntry::new(format!("{} wins on {}", player, self.arms[arm].name))
        } else {
            state.defeated.push(player);
            LogEntry::new(format!("{} loses on {}", player, self.arms[arm].name))
        }
    }
}

impl Game for Bandit {
    type State = BanditState;
    type Action = Pull;

    fn new_state(&self) -> BanditState {
        BanditState {
            seats: vec![PlayerId::new(0)],
            chosen: None,
            approach_left: 0,
            victors: Vec::new(),
            defeated: Vec::new(),
        }
    }

    fn rules(&self) -> &[Rule<Self>] {
        &self.rules
    }

    fn apply(&self, state: &mut BanditState, action: &Pull, rng: &mut GameRng) -> Vec<LogEntry> {
        assert!(!state.ended(), "game is over, cannot apply `{action}`");
        match action {
            Pull::Arm(arm) => {
                assert!(state.chosen.is_none(), "an arm was already chosen");
                assert!(*arm < self.arms.len(), "no arm {arm}");
                state.chosen = Some(*arm);
                state.approach_left = self.arms[*arm].approach;
                let mut log = vec![LogEntry::new(format!("chose {}", self.arms[*arm].name))];
                if state.approach_left == 0 {
                    log.push(self.resolve(state, *arm, rng));
                }
                log
            }
            Pull::Approach => {
                let Some(arm) = state.chosen else {
                    panic!("nothing to approach before choosing an arm");
                };
                assert!(state.approach_left > 0, "already at the arm");
                state.approach_left -= 1;
                if state.approach_left == 0 {
                    vec![self.resolve(state, arm, rng)]
                } else {
                    Vec::new()
                }
            }
            Pull::Sequence(_) => unreachable!("sequences are unfolded by reduce"),
        }
    }
}
