//! Counters a search keeps about its own work.

use serde::{Deserialize, Serialize};

/// Work done since the search was created or last reset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub iterations: u32,

    /// Nodes added to the tree or forest.
    pub nodes_expanded: u32,

    /// Playouts performed, including extra playouts per expansion.
    pub rollouts: u32,

    /// Deepest node created.
    pub max_depth: u16,

    /// Wall-clock time inside `search`, in microseconds.
    pub time_us: u64,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        self.per_second(u64::from(self.iterations))
    }

    #[must_use]
    pub fn rollouts_per_second(&self) -> f64 {
        self.per_second(u64::from(self.rollouts))
    }

    fn per_second(&self, count: u64) -> f64 {
        match self.time_us {
            0 => 0.0,
            us => count as f64 * 1e6 / us as f64,
        }
    }

    pub(crate) fn record_depth(&mut self, depth: u16) {
        self.max_depth = self.max_depth.max(depth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_default() {
        let stats = SearchStats::new();
        assert_eq!(stats.iterations, 0);
        assert_eq!(stats.rollouts, 0);
        assert_eq!(stats.iterations_per_second(), 0.0);
    }

    #[test]
    fn test_stats_per_second() {
        let mut stats = SearchStats::new();
        stats.iterations = 1000;
        stats.rollouts = 3000;
        stats.time_us = 1_000_000;

        assert_eq!(stats.iterations_per_second(), 1000.0);
        assert_eq!(stats.rollouts_per_second(), 3000.0);
    }

    #[test]
    fn test_stats_reset() {
        let mut stats = SearchStats::new();
        stats.iterations = 100;
        stats.record_depth(4);
        stats.record_depth(2);
        assert_eq!(stats.max_depth, 4);

        stats.reset();

        assert_eq!(stats, SearchStats::default());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = SearchStats::new();
        stats.iterations = 42;

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: SearchStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
