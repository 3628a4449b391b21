//! Closed-loop search integration tests.

use lookahead::core::GameRng;
use lookahead::games::bandit::{Arm, Bandit, Pull};
use lookahead::games::dice_race::{DiceRace, Move};
use lookahead::mcts::{AnytimePlayer, ClosedLoopSearch, SearchConfig, Ucb1};
use lookahead::rules::{Game, GameState};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sure_bandit() -> Bandit {
    Bandit::new(vec![Arm::new("A", 1.0), Arm::new("B", 0.0)])
}

// =============================================================================
// Backpropagation
// =============================================================================

#[test]
fn test_root_visits_equal_iterations() {
    init_logging();
    let game = DiceRace::new(2);
    let state = game.new_state();

    for iterations in [1, 7, 50] {
        let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());
        search.search(iterations, 1);
        assert_eq!(search.tree().root_node().visits, iterations);
    }
}

#[test]
fn test_root_edges_sum_to_root_visits() {
    let game = DiceRace::new(2);
    let mut state = game.new_state();
    state.force_dice([2, 2]);
    let doubles = game.allowed_actions(&state);
    game.reduce(&mut state, &doubles[0], &mut GameRng::new(0));

    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());
    let rec = search.recommendation(40, 1);

    assert_eq!(rec.len(), 2, "roll or stop");
    assert_eq!(rec.total_visits(), 40);
}

#[test]
fn test_sure_bandit_scenario() {
    let game = sure_bandit();
    let state = game.new_state();
    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());

    let rec = search.recommendation(10, 1);
    let a = rec[&Pull::Arm(0)];
    let b = rec[&Pull::Arm(1)];

    assert_eq!(a.visits + b.visits, 10);
    assert_eq!(a.value, a.visits as f64);
    assert_eq!(b.value, -(b.visits as f64));
    assert_eq!(a.value - b.value, 10.0);
    assert!(a.visits > b.visits);
    assert_eq!(rec.best(&mut GameRng::new(0)), Some(&Pull::Arm(0)));
}

// =============================================================================
// Terminal Roots
// =============================================================================

#[test]
fn test_terminal_root_short_circuits() {
    let game = sure_bandit();
    let mut state = game.new_state();
    game.reduce(&mut state, &Pull::Arm(1), &mut GameRng::new(0));
    assert!(state.ended());

    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());
    let rec = search.recommendation(100, 1);

    assert!(rec.is_empty());
    assert_eq!(search.stats().iterations, 0);
    assert_eq!(search.stats().rollouts, 0);
    assert_eq!(search.tree().len(), 1);
    assert_eq!(search.tree().root_node().visits, 0);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_recommendation() {
    let game = DiceRace::new(2);
    let state = game.new_state();
    let config = SearchConfig::default().with_seed(12345);

    let mut search1 = ClosedLoopSearch::new(&game, &state, config.clone());
    let mut search2 = ClosedLoopSearch::new(&game, &state, config);

    assert_eq!(search1.recommendation(100, 1), search2.recommendation(100, 1));
    assert_eq!(search1.tree().len(), search2.tree().len());
}

#[test]
fn test_search_leaves_caller_state_alone() {
    let game = DiceRace::new(3);
    let mut state = game.new_state();
    state.force_dice([1, 6]);
    let before = state.clone();

    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());
    search.search(50, 2);

    assert_eq!(state, before);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_depth_limited_rollouts_score_zero() {
    let game = Bandit::new(vec![Arm::new("far", 1.0).with_approach(50)]);
    let state = game.new_state();
    let config = SearchConfig::default()
        .with_max_rollout_depth(1)
        .with_max_nodes(2);
    let mut search = ClosedLoopSearch::new(&game, &state, config);

    let rec = search.recommendation(10, 1);

    assert_eq!(rec[&Pull::Arm(0)].visits, 10);
    assert_eq!(rec[&Pull::Arm(0)].value, 0.0);
}

#[test]
fn test_ucb1_exploration_still_finds_the_sure_arm() {
    let game = sure_bandit();
    let state = game.new_state();
    let mut search =
        ClosedLoopSearch::new(&game, &state, SearchConfig::default()).with_exploration(Ucb1);

    let rec = search.recommendation(30, 1);

    assert!(rec[&Pull::Arm(0)].visits > rec[&Pull::Arm(1)].visits);
}

#[test]
#[should_panic(expected = "exploration constant must be non-negative")]
fn test_invalid_config_rejected() {
    let game = sure_bandit();
    let state = game.new_state();
    let _ = ClosedLoopSearch::new(&game, &state, SearchConfig::default().with_exploration(-1.0));
}

// =============================================================================
// Dice Race
// =============================================================================

#[test]
fn test_recommends_only_legal_moves() {
    let game = DiceRace::new(2);
    let mut state = game.new_state();
    state.force_dice([3, 4]);

    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());
    let rec = search.recommendation(60, 1);
    let legal = game.allowed_actions(&state);

    let recommended: Vec<Move> = rec.iter().map(|(action, _)| action.clone()).collect();
    assert_eq!(recommended, legal);
    let best = rec.best(&mut GameRng::new(1)).unwrap();
    assert!(legal.contains(best));
}

#[test]
fn test_tree_grows_with_iterations() {
    let game = DiceRace::new(2);
    let state = game.new_state();
    let mut search = ClosedLoopSearch::new(&game, &state, SearchConfig::default());

    search.search(200, 1);

    let tree_stats = search.tree().stats();
    assert!(tree_stats.node_count > 1);
    assert!(tree_stats.max_depth > 0);
    assert_eq!(search.stats().nodes_expanded as usize, tree_stats.node_count - 1);
}
