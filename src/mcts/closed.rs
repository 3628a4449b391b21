//! Closed-loop search.
//!
//! Every node stores the state reached by one path of actions from the root,
//! so a chance outcome sampled during expansion is baked into that node.
//! Suited to games where the searching player's view is all that matters.
//!
//! Each iteration:
//! 1. **Select** down through fully expanded nodes by UCT score
//! 2. **Expand** a random untried action, following forced moves eagerly
//! 3. **Roll out** random legal actions from the new node's state
//! 4. **Backpropagate** the root player's score up to the root

use std::time::Instant;

use log::{debug, trace};

use crate::core::GameRng;
use crate::rules::{Game, GameState};

use super::config::SearchConfig;
use super::node::{Node, NodeId};
use super::policy::{argmax_random, uct_score, Exploration, SqrtRatio};
use super::recommend::{ActionStats, AnytimePlayer, Recommendation};
use super::stats::SearchStats;
use super::tree::SearchTree;

type Player<G> = <<G as Game>::State as GameState>::Player;

/// Closed-loop search from one root position, scored for the player to act
/// there.
pub struct ClosedLoopSearch<'g, G: Game> {
    /// The game rules.
    game: &'g G,

    /// Search configuration.
    config: SearchConfig,

    /// The search tree.
    tree: SearchTree<G::State, G::Action>,

    /// Whose wins count as +1.
    root_player: Player<G>,

    /// Search choices: tie-breaks, expansion order, playout moves.
    rng: GameRng,

    /// Chance inside the game.
    dice: GameRng,

    /// Exploration term of the selection score.
    exploration: Box<dyn Exploration>,

    /// Search statistics.
    stats: SearchStats,
}

impl<'g, G: Game> ClosedLoopSearch<'g, G> {
    /// Create a search rooted at a copy of `state`.
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    pub fn new(game: &'g G, state: &G::State, config: SearchConfig) -> Self {
        config.validate();
        let mut rng = GameRng::new(config.seed);
        let dice = rng.fork();
        Self {
            game,
            tree: SearchTree::new(Self::root_node(game, state)),
            root_player: state.player(),
            config,
            rng,
            dice,
            exploration: Box::new(SqrtRatio),
            stats: SearchStats::default(),
        }
    }

    /// Set a custom exploration formula.
    #[must_use]
    pub fn with_exploration<E: Exploration + 'static>(mut self, exploration: E) -> Self {
        self.exploration = Box::new(exploration);
        self
    }

    /// Discard the tree and statistics and search `state` instead.
    pub fn reset(&mut self, state: &G::State) {
        self.tree.reset(Self::root_node(self.game, state));
        self.root_player = state.player();
        self.stats.reset();
    }

    fn root_node(game: &G, state: &G::State) -> Node<G::State, G::Action> {
        let actions = if state.ended() {
            Vec::new()
        } else {
            game.allowed_actions(state)
        };
        Node::root(state.clone(), state.ended(), actions)
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &SearchTree<G::State, G::Action> {
        &self.tree
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Single iteration: select, expand, roll out, backpropagate.
    fn iteration(&mut self, rollouts: u32) {
        let mut current = self.tree.root();

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);
            if node.is_terminal || node.edges.is_empty() || node.has_untried() {
                break;
            }
            let edge = self.select(current);
            current = self.tree.get(current).edges[edge].child;
        }

        // === EXPANSION ===
        let node = self.tree.get(current);
        if node.has_untried() && self.can_grow(current) {
            let untried: Vec<usize> = node.untried_edges().collect();
            let edge = untried[self.rng.gen_range_usize(0..untried.len())];
            current = self.expand(current, edge);

            // Forced continuations carry no decision; create them eagerly.
            while self.can_grow(current) {
                let node = self.tree.get(current);
                if node.is_terminal || node.edges.len() != 1 {
                    break;
                }
                current = self.expand(current, 0);
            }
        }

        // === ROLLOUT + BACKPROPAGATION ===
        for _ in 0..rollouts {
            let value = self.rollout(current);
            self.tree.backpropagate(current, value);
        }
        trace!(
            "iteration {} ended at depth {}",
            self.stats.iterations,
            self.tree.get(current).depth
        );
    }

    /// Pick the child with the best UCT score.
    fn select(&mut self, node_id: NodeId) -> usize {
        let node = self.tree.get(node_id);
        let scores = node.edges.iter().map(|edge| {
            uct_score(
                self.exploration.as_ref(),
                self.config.exploration_constant,
                edge.value_sum,
                edge.visits,
                node.visits,
            )
        });
        argmax_random(scores, &mut self.rng).unwrap_or(0)
    }

    /// May `node_id` get another child under the node and depth caps?
    fn can_grow(&self, node_id: NodeId) -> bool {
        self.tree.len() < self.config.max_nodes
            && self.tree.get(node_id).depth < self.config.max_tree_depth
    }

    /// Create the child behind `edge_idx`, sampling its state.
    fn expand(&mut self, parent_id: NodeId, edge_idx: usize) -> NodeId {
        let parent = self.tree.get(parent_id);
        let depth = parent.depth + 1;
        let action = parent.edges[edge_idx].action.clone();
        let mut state = parent.state.clone();

        self.game.reduce_unchecked(&mut state, &action, &mut self.dice);
        let ended = state.ended();
        let actions = if ended {
            Vec::new()
        } else {
            self.game.allowed_actions(&state)
        };

        // Node::new caps edge counts, so the index fits.
        let child = Node::new(state, parent_id, edge_idx as u16, depth, ended, actions);
        let child_id = self.tree.attach(child);

        self.stats.nodes_expanded += 1;
        self.stats.record_depth(depth);
        child_id
    }

    /// Play random legal actions from a copy of the node's state.
    fn rollout(&mut self, node_id: NodeId) -> f64 {
        self.stats.rollouts += 1;
        let mut state = self.tree.get(node_id).state.clone();

        for _ in 0..self.config.max_rollout_depth {
            if state.ended() {
                break;
            }
            let actions = self.game.allowed_actions(&state);
            if actions.is_empty() {
                break;
            }
            let action = &actions[self.rng.gen_range_usize(0..actions.len())];
            self.game.reduce_unchecked(&mut state, action, &mut self.dice);
        }

        state.value_for(self.root_player)
    }
}

impl<G: Game> AnytimePlayer for ClosedLoopSearch<'_, G> {
    type Action = G::Action;

    fn search(&mut self, iterations: u32, rollouts_per_expansion: u32) {
        assert!(rollouts_per_expansion > 0, "need at least one rollout per expansion");
        if self.tree.root_node().is_terminal {
            debug!("closed-loop search skipped: root is terminal");
            return;
        }

        let start = Instant::now();
        debug!(
            "closed-loop search: {} iterations x {} rollouts",
            iterations, rollouts_per_expansion
        );
        for _ in 0..iterations {
            self.iteration(rollouts_per_expansion);
            self.stats.iterations += 1;
        }
        self.stats.time_us += start.elapsed().as_micros() as u64;
        debug!(
            "closed-loop search done: {} nodes, {} rollouts, {:.0} it/s",
            self.tree.len(),
            self.stats.rollouts,
            self.stats.iterations_per_second()
        );
    }

    fn report(&self) -> Recommendation<G::Action> {
        Recommendation::new(
            self.tree
                .root_node()
                .edges
                .iter()
                .map(|edge| {
                    let stats = ActionStats {
                        value: edge.value_sum,
                        visits: edge.visits,
                    };
                    (edge.action.clone(), stats)
                })
                .collect(),
        )
    }
}
