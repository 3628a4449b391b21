//! What a search reports back: per-action value and visit totals.

use std::ops::Index;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::GameRng;
use crate::rules::GameAction;

use super::policy::{argmax_random, mean};

/// Iterations run between clock checks in `recommend_for`.
const TIMED_BATCH: u32 = 16;

/// Aggregated playout results for one root action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionStats {
    /// Sum of playout values.
    pub value: f64,
    /// Playouts that started with this action.
    pub visits: u32,
}

impl ActionStats {
    /// `value / visits`, 0 when unvisited.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        mean(self.value, self.visits)
    }
}

/// Per-action statistics for every action legal at the searched state,
/// in legal-action order.
///
/// Empty when the searched state is terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation<A> {
    entries: Vec<(A, ActionStats)>,
}

impl<A: GameAction> Recommendation<A> {
    pub fn new(entries: Vec<(A, ActionStats)>) -> Self {
        Self { entries }
    }

    /// Statistics for `action`, if it was legal at the root.
    #[must_use]
    pub fn get(&self, action: &A) -> Option<&ActionStats> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == action)
            .map(|(_, stats)| stats)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&A, &ActionStats)> {
        self.entries.iter().map(|(action, stats)| (action, stats))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of visits over all actions.
    #[must_use]
    pub fn total_visits(&self) -> u32 {
        self.entries.iter().map(|(_, stats)| stats.visits).sum()
    }

    /// The action with the best value/visits ratio, ties broken at random.
    #[must_use]
    pub fn best(&self, rng: &mut GameRng) -> Option<&A> {
        argmax_random(self.entries.iter().map(|(_, stats)| stats.ratio()), rng)
            .map(|i| &self.entries[i].0)
    }

    pub fn into_vec(self) -> Vec<(A, ActionStats)> {
        self.entries
    }
}

impl<A: GameAction> Index<&A> for Recommendation<A> {
    type Output = ActionStats;

    /// # Panics
    ///
    /// If `action` was not legal at the root.
    fn index(&self, action: &A) -> &ActionStats {
        match self.get(action) {
            Some(stats) => stats,
            None => panic!("`{action}` was not legal at the searched state"),
        }
    }
}

/// A search that can be asked for a recommendation at any time.
///
/// Each call continues from the statistics gathered so far; rebuild the
/// search (or call its `reset`) to search a new position.
pub trait AnytimePlayer {
    type Action: GameAction;

    /// Run `iterations` more iterations, replaying each expansion
    /// `rollouts_per_expansion` times.
    ///
    /// # Panics
    ///
    /// If `rollouts_per_expansion` is 0.
    fn search(&mut self, iterations: u32, rollouts_per_expansion: u32);

    /// Statistics for every action legal at the root so far.
    fn report(&self) -> Recommendation<Self::Action>;

    /// Search, then report.
    fn recommendation(
        &mut self,
        iterations: u32,
        rollouts_per_expansion: u32,
    ) -> Recommendation<Self::Action> {
        self.search(iterations, rollouts_per_expansion);
        self.report()
    }

    /// Search until `budget` has elapsed, then report.
    ///
    /// Returns immediately for a finished game.
    fn recommend_for(
        &mut self,
        budget: Duration,
        rollouts_per_expansion: u32,
    ) -> Recommendation<Self::Action> {
        let start = Instant::now();
        if self.report().is_empty() {
            return self.report();
        }
        while start.elapsed() < budget {
            self.search(TIMED_BATCH, rollouts_per_expansion);
        }
        self.report()
    }
}
