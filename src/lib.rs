//! # lookahead
//!
//! Rule composition and Monte Carlo tree search for small turn-based board
//! games.
//!
//! ## Design Principles
//!
//! 1. **Rules Are Values**: a game is a list of `Rule`s (condition plus
//!    action generator). The engine takes their union and never interprets
//!    game concepts itself.
//!
//! 2. **Deterministic Reducer**: `Game::reduce` is a pure function of state,
//!    action and an explicit `GameRng`. Composite actions are sequences of
//!    atomic ones.
//!
//! 3. **Outcome Deduplication**: two actions that lead to equivalent states
//!    are one choice. Games erase cosmetic differences in `canonicalize`.
//!
//! ## Architecture
//!
//! - **Lookahead Chaining**: `append(first, second)` turns "do a, then maybe
//!   b" into composite actions without a fixed ply count.
//!
//! - **Closed- and Open-Loop MCTS**: arena trees indexed by `NodeId`; the
//!   open-loop forest keeps one tree per player and tolerates dice.
//!
//! ## Modules
//!
//! - `core`: Player IDs, per-player maps, RNG, narration
//! - `rules`: Game contract, rules, composition engine
//! - `mcts`: Monte Carlo Tree Search and recommendations
//! - `games`: Reference games (bandit, dice race)

pub mod core;
pub mod rules;
pub mod mcts;
pub mod games;

// Re-export commonly used types
pub use crate::core::{GameRng, LogEntry, PlayerId, PlayerMap};

pub use crate::rules::{append, Game, GameAction, GameState, Rule};

pub use crate::mcts::{
    ActionStats, AnytimePlayer, ClosedLoopSearch, OpenLoopSearch, Recommendation,
    SearchConfig, SearchStats,
};
