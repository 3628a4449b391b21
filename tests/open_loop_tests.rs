//! Open-loop search integration tests.

use std::time::Duration;

use lookahead::core::{GameRng, PlayerId};
use lookahead::games::bandit::{Arm, Bandit, Pull};
use lookahead::games::dice_race::{DiceRace, Move};
use lookahead::mcts::{AnytimePlayer, OpenLoopSearch, SearchConfig, Ucb1};
use lookahead::rules::{Game, GameState};

// =============================================================================
// Statistical Behaviour
// =============================================================================

#[test]
fn test_better_arm_wins_most_runs() {
    let game = Bandit::new(vec![Arm::new("good", 0.7), Arm::new("bad", 0.3)]);
    let state = game.new_state();

    let mut wins = 0;
    for seed in 0..20 {
        let config = SearchConfig::default().with_seed(seed);
        let mut search = OpenLoopSearch::new(&game, &state, config);
        let rec = search.recommendation(300, 1);
        if rec.best(&mut GameRng::new(seed)) == Some(&Pull::Arm(0)) {
            wins += 1;
        }
    }

    assert!(wins >= 18, "better arm recommended in only {wins}/20 runs");
}

#[test]
fn test_chance_is_resampled_every_playout() {
    let game = Bandit::new(vec![Arm::new("coin", 0.5)]);
    let state = game.new_state();
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());

    let rec = search.recommendation(400, 1);
    let coin = rec[&Pull::Arm(0)];

    assert_eq!(coin.visits, 400);
    assert!(coin.ratio().abs() < 0.25, "ratio {}", coin.ratio());
}

#[test]
fn test_sure_bandit_scenario() {
    let game = Bandit::new(vec![Arm::new("A", 1.0), Arm::new("B", 0.0)]);
    let state = game.new_state();
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());

    let rec = search.recommendation(10, 1);
    let a = rec[&Pull::Arm(0)];
    let b = rec[&Pull::Arm(1)];

    assert_eq!(a.visits + b.visits, 10);
    assert_eq!(a.ratio(), 1.0);
    assert_eq!(b.ratio(), -1.0);
    assert_eq!(a.value - b.value, 10.0);
    assert!(a.visits > b.visits);
}

#[test]
fn test_ucb1_exploration() {
    let game = Bandit::new(vec![Arm::new("A", 1.0), Arm::new("B", 0.0)]);
    let state = game.new_state();
    let mut search =
        OpenLoopSearch::new(&game, &state, SearchConfig::default()).with_exploration(Ucb1);

    let rec = search.recommendation(30, 1);

    assert!(rec[&Pull::Arm(0)].visits > rec[&Pull::Arm(1)].visits);
}

// =============================================================================
// Multi-player
// =============================================================================

#[test]
fn test_every_player_grows_a_tree() {
    let game = DiceRace::new(3).with_columns_to_win(1);
    let state = game.new_state();
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());

    search.search(150, 1);

    for player in PlayerId::all(3) {
        let root = search.root_of(player).unwrap();
        let node = search.get(root);
        assert_eq!(node.visits, 150, "{player}");
        assert!(!node.children.is_empty(), "{player} never decided");
    }
}

#[test]
fn test_scores_are_per_player() {
    // A win for one seat is a loss for the other; draws and cut-off
    // playouts score zero for both.
    let game = DiceRace::new(2).with_columns_to_win(1);
    let state = game.new_state();
    let config = SearchConfig::default().with_max_rollout_depth(5000);
    let mut search = OpenLoopSearch::new(&game, &state, config);

    search.search(100, 1);

    let p1 = search.get(search.root_of(PlayerId::new(0)).unwrap());
    let p2 = search.get(search.root_of(PlayerId::new(1)).unwrap());
    assert_eq!(p1.visits, 100);
    assert_eq!(p2.visits, 100);
    assert!((p1.value_sum + p2.value_sum).abs() < 1e-9);
    assert!(p1.value_sum.abs() <= p1.visits as f64);
}

#[test]
fn test_extra_rollouts_add_visits() {
    let game = DiceRace::new(2);
    let mut state = game.new_state();
    state.force_dice([1, 2]);
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());

    search.search(10, 4);

    let root = search.root_of(state.player()).unwrap();
    assert_eq!(search.get(root).visits, search.stats().rollouts);
    assert!(search.stats().rollouts > 10);
}

// =============================================================================
// Budgets
// =============================================================================

#[test]
fn test_recommend_for_duration() {
    let game = DiceRace::new(2);
    let state = game.new_state();
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());

    let rec = search.recommend_for(Duration::from_millis(30), 1);

    assert_eq!(rec.len(), 1);
    assert!(rec[&Move::Roll].visits > 0);
    assert!(search.stats().time_us > 0);
}

#[test]
fn test_recommend_for_terminal_root_returns_at_once() {
    let game = Bandit::new(vec![Arm::new("A", 1.0)]);
    let mut state = game.new_state();
    game.reduce(&mut state, &Pull::Arm(0), &mut GameRng::new(0));

    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());
    let rec = search.recommend_for(Duration::from_secs(60), 1);

    assert!(rec.is_empty());
    assert_eq!(search.stats().iterations, 0);
}

#[test]
fn test_node_cap_is_respected() {
    let game = DiceRace::new(2);
    let state = game.new_state();
    let config = SearchConfig::default().with_max_nodes(20);
    let mut search = OpenLoopSearch::new(&game, &state, config);

    search.search(200, 1);

    assert!(search.node_count() <= 20);
    let root = search.root_of(PlayerId::new(0)).unwrap();
    assert_eq!(search.get(root).visits, 200);
}

#[test]
fn test_reset_searches_new_position() {
    let game = DiceRace::new(2);
    let state = game.new_state();
    let mut search = OpenLoopSearch::new(&game, &state, SearchConfig::default());
    search.search(20, 1);

    let mut rolled = state.clone();
    rolled.force_dice([2, 5]);
    search.reset(&rolled);

    assert_eq!(search.node_count(), 2);
    let rec = search.recommendation(5, 1);
    assert_eq!(rec.total_visits(), 5);
    assert!(rec.get(&Move::Roll).is_none());
}
