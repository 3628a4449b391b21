//! Search configuration parameters.

use serde::{Deserialize, Serialize};

/// Search configuration parameters, shared by both search variants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Weight of the exploration term (default: 1.0).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Plies a single playout may run before it is scored as a draw.
    pub max_rollout_depth: u32,

    /// Maximum nodes to allocate.
    /// Once reached, searches keep playing out but stop growing.
    pub max_nodes: usize,

    /// Deepest a tree node may sit below its root.
    /// Nodes at this depth are played out from but never grown past.
    pub max_tree_depth: u16,

    /// Random seed for selection tie-breaks, expansion and playouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_constant: 1.0,
            max_rollout_depth: 1000,
            max_nodes: 100_000,
            max_tree_depth: u16::MAX,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with custom playout depth limit.
    #[must_use]
    pub fn with_max_rollout_depth(mut self, depth: u32) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Create a new config with custom node cap.
    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Create a new config with custom tree depth limit.
    #[must_use]
    pub fn with_max_tree_depth(mut self, depth: u16) -> Self {
        self.max_tree_depth = depth;
        self
    }

    /// Panic on settings no search can run with.
    pub(crate) fn validate(&self) {
        assert!(
            self.exploration_constant >= 0.0,
            "exploration constant must be non-negative, got {}",
            self.exploration_constant
        );
        assert!(self.max_rollout_depth > 0, "max rollout depth must be positive");
        assert!(self.max_nodes > 0, "max nodes must be positive");
        assert!(self.max_tree_depth > 0, "max tree depth must be positive");
    }
}
