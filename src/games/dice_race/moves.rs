use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rules::GameAction;

/// Dice race actions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Throw both dice.
    Roll,
    /// Bank this turn's progress and pass the dice.
    Stop,
    /// Lose this turn's progress; forced when no die can be used.
    Bust,
    /// Mark the die at this index as used.
    Spend(usize),
    /// Move a runner one square up the track with this number.
    Advance(u8),
    Sequence(Vec<Move>),
}

impl GameAction for Move {
    fn sequence(actions: Vec<Self>) -> Self {
        Move::Sequence(actions)
    }

    fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Move::Sequence(actions) => Some(actions),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Roll => write!(f, "roll"),
            Move::Stop => write!(f, "stop"),
            Move::Bust => write!(f, "bust"),
            Move::Spend(die) => write!(f, "spend die {}", die + 1),
            Move::Advance(track) => write!(f, "advance {track}"),
            Move::Sequence(actions) => {
                let parts: Vec<String> = actions.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(" then "))
            }
        }
    }
}
