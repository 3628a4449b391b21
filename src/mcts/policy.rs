//! Selection scoring shared by both search variants.
//!
//! A child's score is `exploit + c * explore`, where `exploit` is the child's
//! mean value and `explore` comes from an `Exploration` formula:
//! - `SqrtRatio`: `sqrt(N / n)`, the default
//! - `Ucb1`: `sqrt(ln(N) / n)`
//!
//! `N` counts opportunities: parent visits in the closed-loop tree, times the
//! action was legal in the open-loop forest.

use std::fmt::Debug;

use crate::core::GameRng;

// =============================================================================
// Exploration
// =============================================================================

/// Exploration bonus for a child.
pub trait Exploration: Send + Sync + Debug {
    /// Bonus for a child visited `visits` times out of `opportunities`.
    /// Unvisited children get `f64::INFINITY`.
    fn bonus(&self, opportunities: u32, visits: u32) -> f64;
}

/// `sqrt(N / n)` with no log dampening.
#[derive(Clone, Copy, Debug, Default)]
pub struct SqrtRatio;

impl Exploration for SqrtRatio {
    fn bonus(&self, opportunities: u32, visits: u32) -> f64 {
        if visits == 0 {
            f64::INFINITY
        } else {
            (opportunities as f64 / visits as f64).sqrt()
        }
    }
}

/// Classic UCB1: `sqrt(ln(N) / n)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ucb1;

impl Exploration for Ucb1 {
    fn bonus(&self, opportunities: u32, visits: u32) -> f64 {
        if visits == 0 {
            f64::INFINITY
        } else {
            ((opportunities.max(1) as f64).ln() / visits as f64).sqrt()
        }
    }
}

/// Mean value, 0 for unvisited.
#[inline]
#[must_use]
pub fn mean(value_sum: f64, visits: u32) -> f64 {
    if visits == 0 {
        0.0
    } else {
        value_sum / visits as f64
    }
}

/// `exploit + c * explore` for one child.
#[must_use]
pub fn uct_score(
    exploration: &dyn Exploration,
    exploration_constant: f64,
    value_sum: f64,
    visits: u32,
    opportunities: u32,
) -> f64 {
    if visits == 0 {
        return f64::INFINITY;
    }
    mean(value_sum, visits) + exploration_constant * exploration.bonus(opportunities, visits)
}

// =============================================================================
// Tie-breaking
// =============================================================================

/// Index of the highest score, ties broken uniformly at random.
///
/// Returns `None` for an empty input.
pub fn argmax_random(scores: impl IntoIterator<Item = f64>, rng: &mut GameRng) -> Option<usize> {
    let mut best = f64::NEG_INFINITY;
    let mut ties: Vec<usize> = Vec::new();

    for (i, score) in scores.into_iter().enumerate() {
        if score > best || ties.is_empty() {
            best = score;
            ties.clear();
            ties.push(i);
        } else if score == best {
            ties.push(i);
        }
    }

    rng.choose(&ties).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_ratio() {
        assert_eq!(SqrtRatio.bonus(16, 4), 2.0);
        assert_eq!(SqrtRatio.bonus(10, 0), f64::INFINITY);
    }

    #[test]
    fn test_ucb1_is_dampened() {
        let n = 100;
        assert!(Ucb1.bonus(n, 10) < SqrtRatio.bonus(n, 10));
        assert_eq!(Ucb1.bonus(1, 1), 0.0);
        assert_eq!(Ucb1.bonus(5, 0), f64::INFINITY);
    }

    #[test]
    fn test_uct_score_prefers_unvisited() {
        let visited = uct_score(&SqrtRatio, 1.0, 9.0, 10, 11);
        let fresh = uct_score(&SqrtRatio, 1.0, 0.0, 0, 11);
        assert!(fresh > visited);
    }

    #[test]
    fn test_uct_score_without_exploration_is_mean() {
        assert_eq!(uct_score(&SqrtRatio, 0.0, 3.0, 4, 40), 0.75);
    }

    #[test]
    fn test_mean_of_unvisited_is_zero() {
        assert_eq!(mean(5.0, 0), 0.0);
        assert_eq!(mean(-3.0, 6), -0.5);
    }

    #[test]
    fn test_argmax_unique() {
        let mut rng = GameRng::new(1);
        assert_eq!(argmax_random([0.1, 0.9, 0.3], &mut rng), Some(1));
        assert_eq!(argmax_random(Vec::<f64>::new(), &mut rng), None);
    }

    #[test]
    fn test_argmax_breaks_ties_randomly() {
        let mut rng = GameRng::new(5);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let i = argmax_random([1.0, 0.0, 1.0], &mut rng).unwrap();
            assert!(i == 0 || i == 2);
            seen[i] = true;
        }
        assert!(seen[0] && seen[2]);
    }
}
