//! A small push-your-luck dice race.
//!
//! Two dice pick which tracks advance; two interchangeable runners hold the
//! turn's progress until the player stops (banking it) or busts (losing it).
//! Owning enough tracks wins.
//!
//! Supports 1-4 players. The solitaire game is a race against the turn limit.

mod game;
mod moves;
mod state;

pub use game::{DiceRace, DEFAULT_COLUMNS_TO_WIN, DEFAULT_TURNS_PER_PLAYER};
pub use moves::Move;
pub use state::{track_length, RaceState, Runner, FACES, RUNNERS, TRACK_LENGTHS};
