//! Monte Carlo Tree Search over any `Game`.
//!
//! ## Overview
//!
//! Two variants share configuration, statistics and selection scoring:
//!
//! - **Closed loop** (`ClosedLoopSearch`): nodes hold the state reached by an
//!   action path; scored for the player to act at the root
//! - **Open loop** (`OpenLoopSearch`): one state-free action tree per player,
//!   legality re-derived on every visit; each player scored for themselves
//!
//! Both implement `AnytimePlayer`, which reports a `Recommendation`: the
//! summed value and visit count of every action legal at the root.
//!
//! ## Usage
//!
//! ```rust
//! use lookahead::core::GameRng;
//! use lookahead::games::bandit::{Arm, Bandit, Pull};
//! use lookahead::mcts::{AnytimePlayer, OpenLoopSearch, SearchConfig};
//! use lookahead::rules::Game;
//!
//! let game = Bandit::new(vec![Arm::new("safe", 0.9), Arm::new("risky", 0.1)]);
//! let state = game.new_state();
//!
//! let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default().with_seed(7));
//! let recommendation = search.recommendation(500, 1);
//!
//! assert_eq!(recommendation.total_visits(), 500);
//! let best = recommendation.best(&mut GameRng::new(0));
//! assert_eq!(best, Some(&Pull::Arm(0)));
//! ```
//!
//! ## Custom Exploration
//!
//! ```rust,ignore
//! use lookahead::mcts::{OpenLoopSearch, Ucb1};
//!
//! let search = OpenLoopSearch::new(&game, &state, config)
//!     .with_exploration(Ucb1);  // sqrt(ln N / n) instead of sqrt(N / n)
//! ```

pub mod closed;
pub mod config;
pub mod node;
pub mod open;
pub mod policy;
pub mod recommend;
pub mod stats;
pub mod tree;

// Re-export main types
pub use closed::ClosedLoopSearch;
pub use config::SearchConfig;
pub use node::{Edge, Node, NodeId};
pub use open::{ActionNode, OpenLoopSearch};
pub use policy::{Exploration, SqrtRatio, Ucb1};
pub use recommend::{ActionStats, AnytimePlayer, Recommendation};
pub use stats::SearchStats;
pub use tree::{SearchTree, TreeStats};
