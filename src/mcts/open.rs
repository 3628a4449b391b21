//! Open-loop search.
//!
//! Nodes are keyed only by the action that reached them and hold no state:
//! legality is re-derived from the live state on every visit, so a node
//! stands for "this action sequence" across every chance outcome. Each
//! player grows their own action tree, which lets every seat at the table be
//! scored from its own perspective.
//!
//! Each iteration plays one game from a private copy of the root state. The
//! player to act decides according to their current phase:
//! - **select**: mark every legal child as visitable, then descend by
//!   `mean + c * sqrt(visitable / visits)`; a legal child with no visits
//!   switches to expand
//! - **expand**: descend into a random unvisited legal child, then switch to
//!   rollout
//! - **rollout**: uniformly random legal action, no tree movement
//!
//! When the game ends (or the depth limit is hit) every player's visited
//! chain is credited with that player's score.

use std::fmt::{self, Display, Write};
use std::time::Instant;

use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::GameRng;
use crate::rules::{Game, GameState};

use super::config::SearchConfig;
use super::node::NodeId;
use super::policy::{argmax_random, mean, uct_score, Exploration, SqrtRatio};
use super::recommend::{ActionStats, AnytimePlayer, Recommendation};
use super::stats::SearchStats;

type Player<G> = <<G as Game>::State as GameState>::Player;

/// Where a player is in the select → expand → rollout progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Select,
    Expand,
    Rollout,
}

/// A node in one player's action tree.
#[derive(Clone, Debug)]
pub struct ActionNode<P, A> {
    /// Action that led here; `None` for a player's root.
    pub inbound: Option<A>,

    /// Owner of the tree this node belongs to.
    pub player: P,

    /// Parent node (NONE for roots).
    pub parent: NodeId,

    pub children: SmallVec<[NodeId; 8]>,

    /// How often this action was legal when its parent was visited.
    pub visitable: u32,

    /// Playouts that went through this node.
    pub visits: u32,

    /// Sum of the owner's scores over those playouts.
    pub value_sum: f64,

    pub depth: u16,
}

impl<P, A> ActionNode<P, A> {
    fn new(inbound: Option<A>, player: P, parent: NodeId, depth: u16) -> Self {
        Self {
            inbound,
            player,
            parent,
            children: SmallVec::new(),
            visitable: 0,
            visits: 0,
            value_sum: 0.0,
            depth,
        }
    }

    /// Mean score, 0 when unvisited.
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        mean(self.value_sum, self.visits)
    }
}

/// One playout's position in every player's tree.
struct Walk<P> {
    cursors: FxHashMap<P, NodeId>,
    phases: FxHashMap<P, Phase>,
}

/// Open-loop search with one action tree per player.
pub struct OpenLoopSearch<'g, G: Game> {
    /// The game rules.
    game: &'g G,

    /// Search configuration.
    config: SearchConfig,

    /// Position every playout starts from.
    root_state: G::State,

    /// All players' nodes.
    nodes: Vec<ActionNode<Player<G>, G::Action>>,

    /// Each player's root node.
    roots: FxHashMap<Player<G>, NodeId>,

    /// Search choices: tie-breaks, expansion order, playout moves.
    rng: GameRng,

    /// Chance inside the game.
    dice: GameRng,

    /// Exploration term of the selection score.
    exploration: Box<dyn Exploration>,

    /// Search statistics.
    stats: SearchStats,
}

impl<'g, G: Game> OpenLoopSearch<'g, G> {
    /// Create a search rooted at a copy of `state`.
    ///
    /// # Panics
    ///
    /// If `config` is invalid.
    pub fn new(game: &'g G, state: &G::State, config: SearchConfig) -> Self {
        config.validate();
        let mut rng = GameRng::new(config.seed);
        let dice = rng.fork();
        let mut search = Self {
            game,
            root_state: state.clone(),
            nodes: Vec::new(),
            roots: FxHashMap::default(),
            config,
            rng,
            dice,
            exploration: Box::new(SqrtRatio),
            stats: SearchStats::default(),
        };
        search.plant_roots();
        search
    }

    /// Set a custom exploration formula.
    #[must_use]
    pub fn with_exploration<E: Exploration + 'static>(mut self, exploration: E) -> Self {
        self.exploration = Box::new(exploration);
        self
    }

    /// Discard the forest and statistics and search `state` instead.
    pub fn reset(&mut self, state: &G::State) {
        self.root_state = state.clone();
        self.stats.reset();
        self.plant_roots();
    }

    fn plant_roots(&mut self) {
        self.nodes.clear();
        self.roots.clear();
        for &player in self.root_state.players() {
            let id = NodeId::at(self.nodes.len());
            self.nodes.push(ActionNode::new(None, player, NodeId::NONE, 0));
            self.roots.insert(player, id);
        }
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Total nodes across every player's tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &ActionNode<Player<G>, G::Action> {
        &self.nodes[id.index()]
    }

    /// The root of `player`'s tree.
    #[must_use]
    pub fn root_of(&self, player: Player<G>) -> Option<NodeId> {
        self.roots.get(&player).copied()
    }

    /// Child of `parent` reached by `action`, if it exists.
    #[must_use]
    pub fn child(&self, parent: NodeId, action: &G::Action) -> Option<NodeId> {
        self.get(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).inbound.as_ref() == Some(action))
    }

    /// Child of `parent` reached by `action`, created if missing.
    /// `None` once the node cap is reached or `parent` sits at the depth cap.
    fn child_or_insert(&mut self, parent: NodeId, action: &G::Action) -> Option<NodeId> {
        if let Some(child) = self.child(parent, action) {
            return Some(child);
        }
        let parent_depth = self.get(parent).depth;
        if self.nodes.len() >= self.config.max_nodes
            || parent_depth >= self.config.max_tree_depth
        {
            return None;
        }

        let owner = self.get(parent).player;
        let depth = parent_depth + 1;
        let id = NodeId::at(self.nodes.len());
        self.nodes.push(ActionNode::new(Some(action.clone()), owner, parent, depth));
        self.nodes[parent.index()].children.push(id);

        self.stats.nodes_expanded += 1;
        self.stats.record_depth(depth);
        Some(id)
    }

    /// Decide the next action for the player to act, moving their cursor.
    fn decide(
        &mut self,
        walk: &mut Walk<Player<G>>,
        player: Player<G>,
        actions: &[G::Action],
    ) -> usize {
        let mut phase = walk.phases.get(&player).copied().unwrap_or(Phase::Rollout);
        let Some(&cursor) = walk.cursors.get(&player) else {
            return self.rng.gen_range_usize(0..actions.len());
        };

        let mut children: Vec<NodeId> = Vec::with_capacity(actions.len());
        if phase != Phase::Rollout {
            for action in actions {
                match self.child_or_insert(cursor, action) {
                    Some(child) => children.push(child),
                    None => {
                        phase = Phase::Rollout;
                        break;
                    }
                }
            }
        }

        if phase == Phase::Select {
            for &child in &children {
                self.nodes[child.index()].visitable += 1;
            }
            if children.iter().any(|&c| self.get(c).visits == 0) {
                phase = Phase::Expand;
            } else {
                let scores: Vec<f64> = children
                    .iter()
                    .map(|&c| {
                        let node = self.get(c);
                        uct_score(
                            self.exploration.as_ref(),
                            self.config.exploration_constant,
                            node.value_sum,
                            node.visits,
                            node.visitable,
                        )
                    })
                    .collect();
                let pick = argmax_random(scores, &mut self.rng).unwrap_or(0);
                walk.cursors.insert(player, children[pick]);
                return pick;
            }
        }

        if phase == Phase::Expand {
            let fresh: Vec<usize> = (0..children.len())
                .filter(|&i| self.get(children[i]).visits == 0)
                .collect();
            if let Some(&pick) = self.rng.choose(&fresh) {
                walk.cursors.insert(player, children[pick]);
                walk.phases.insert(player, Phase::Rollout);
                return pick;
            }
            phase = Phase::Rollout;
        }

        walk.phases.insert(player, phase);
        self.rng.gen_range_usize(0..actions.len())
    }

    /// Random playout from `state` for at most `plies` plies.
    fn play_out(&mut self, state: &mut G::State, plies: u32) {
        for _ in 0..plies {
            if state.ended() {
                break;
            }
            let actions = self.game.allowed_actions(state);
            if actions.is_empty() {
                break;
            }
            let action = &actions[self.rng.gen_range_usize(0..actions.len())];
            self.game.reduce_unchecked(state, action, &mut self.dice);
        }
    }

    /// Credit every player's chain, from their cursor up to their root.
    fn backpropagate(&mut self, cursors: &FxHashMap<Player<G>, NodeId>, state: &G::State) {
        self.stats.rollouts += 1;
        for (&player, &cursor) in cursors {
            let score = state.value_for(player);
            let mut id = cursor;
            while !id.is_none() {
                let node = &mut self.nodes[id.index()];
                node.visits += 1;
                node.value_sum += score;
                id = node.parent;
            }
        }
    }

    /// One playout through the forest, plus `extra` replays of the root
    /// player's expansion.
    fn iteration(&mut self, extra: u32) {
        let root_player = self.root_state.player();
        let mut state = self.root_state.clone();
        let mut walk = Walk {
            cursors: self.roots.clone(),
            phases: self.roots.keys().map(|&p| (p, Phase::Select)).collect(),
        };
        let mut snapshot: Option<(G::State, FxHashMap<Player<G>, NodeId>, u32)> = None;

        let mut plies = 0;
        while plies < self.config.max_rollout_depth && !state.ended() {
            let actions = self.game.allowed_actions(&state);
            if actions.is_empty() {
                break;
            }
            let player = state.player();
            let expanding = walk.phases.get(&player) != Some(&Phase::Rollout);
            let pick = self.decide(&mut walk, player, &actions);

            self.game.reduce_unchecked(&mut state, &actions[pick], &mut self.dice);
            plies += 1;

            let expanded = expanding && walk.phases.get(&player) == Some(&Phase::Rollout);
            if expanded && player == root_player && snapshot.is_none() {
                snapshot = Some((state.clone(), walk.cursors.clone(), plies));
            }
        }
        self.backpropagate(&walk.cursors, &state);
        trace!("iteration {} ended after {plies} plies", self.stats.iterations);

        if let Some((snapshot_state, cursors, played)) = snapshot {
            for _ in 0..extra {
                let mut replay = snapshot_state.clone();
                self.play_out(&mut replay, self.config.max_rollout_depth - played);
                self.backpropagate(&cursors, &replay);
            }
        }
    }
}

impl<'g, G: Game> OpenLoopSearch<'g, G>
where
    G::Action: Display,
    Player<G>: Display,
{
    /// Write an indented outline of every player's tree, one line per node.
    pub fn dump_tree(&self, out: &mut impl Write) -> fmt::Result {
        for &player in self.root_state.players() {
            let Some(root) = self.root_of(player) else {
                continue;
            };
            let node = self.get(root);
            writeln!(out, "{player} visits={} value={:.3}", node.visits, node.value_sum)?;
            self.dump_children(out, root, 1)?;
        }
        Ok(())
    }

    fn dump_children(&self, out: &mut impl Write, id: NodeId, indent: usize) -> fmt::Result {
        for &child in &self.get(id).children {
            let node = self.get(child);
            if let Some(action) = &node.inbound {
                writeln!(
                    out,
                    "{:width$}{action} visits={}/{} value={:.3}",
                    "",
                    node.visits,
                    node.visitable,
                    node.value_sum,
                    width = indent * 2
                )?;
            }
            self.dump_children(out, child, indent + 1)?;
        }
        Ok(())
    }
}

impl<G: Game> AnytimePlayer for OpenLoopSearch<'_, G> {
    type Action = G::Action;

    fn search(&mut self, iterations: u32, rollouts_per_expansion: u32) {
        assert!(rollouts_per_expansion > 0, "need at least one rollout per expansion");
        if self.root_state.ended() {
            debug!("open-loop search skipped: root is terminal");
            return;
        }

        let start = Instant::now();
        debug!(
            "open-loop search: {} iterations x {} rollouts, {} players",
            iterations,
            rollouts_per_expansion,
            self.roots.len()
        );
        for _ in 0..iterations {
            self.iteration(rollouts_per_expansion - 1);
            self.stats.iterations += 1;
        }
        self.stats.time_us += start.elapsed().as_micros() as u64;
        debug!(
            "open-loop search done: {} nodes, {} rollouts, {:.0} it/s",
            self.nodes.len(),
            self.stats.rollouts,
            self.stats.iterations_per_second()
        );
    }

    fn report(&self) -> Recommendation<G::Action> {
        if self.root_state.ended() {
            return Recommendation::new(Vec::new());
        }
        let root = self.root_of(self.root_state.player());
        let entries = self
            .game
            .allowed_actions(&self.root_state)
            .into_iter()
            .map(|action| {
                let stats = root
                    .and_then(|root| self.child(root, &action))
                    .map(|child| {
                        let node = self.get(child);
                        ActionStats {
                            value: node.value_sum,
                            visits: node.visits,
                        }
                    })
                    .unwrap_or_default();
                (action, stats)
            })
            .collect();
        Recommendation::new(entries)
    }
}
