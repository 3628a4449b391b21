//! The game definition contract and the rule composition engine.
//!
//! Games implement `GameState`, `GameAction` and `Game` to define:
//! - the rules that generate candidate actions
//! - how atomic actions modify state
//! - who won or lost
//!
//! The composition engine turns the rule list into a deduplicated set of
//! legal actions and never interprets game-specific concepts directly.

pub mod compose;
pub mod game;
pub mod rule;

pub use compose::{allowed_actions, dedup_equivalent, yields_equivalent_state};
pub use game::{Game, GameAction, GameState};
pub use rule::{append, running, Condition, Generator, Rule};
