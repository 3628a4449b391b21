//! Rule composition: union of fired rules, collapsed by outcome.

use super::game::{Game, GameState};

/// Union, in rule-declaration order, of every rule that fires in `state`,
/// with equivalent-outcome actions collapsed to their first representative.
pub fn allowed_actions<G: Game>(game: &G, state: &G::State) -> Vec<G::Action> {
    let candidates: Vec<G::Action> = game
        .rules()
        .iter()
        .flat_map(|rule| rule.fire(game, state))
        .collect();
    dedup_equivalent(game, state, candidates)
}

/// Do `lhs` and `rhs` lead to equivalent states from `state`?
///
/// Both sides are reduced with identical fixed-seed dice.
pub fn yields_equivalent_state<G: Game>(
    game: &G,
    state: &G::State,
    lhs: &G::Action,
    rhs: &G::Action,
) -> bool {
    game.outcome_after(state, lhs)
        .equivalent(&game.outcome_after(state, rhs))
}

/// Keep exactly one action per outcome-equivalence class, in discovery order.
pub fn dedup_equivalent<G: Game>(
    game: &G,
    state: &G::State,
    actions: Vec<G::Action>,
) -> Vec<G::Action> {
    let mut kept: Vec<(G::Action, G::State)> = Vec::with_capacity(actions.len());
    for action in actions {
        if kept.iter().any(|(seen, _)| *seen == action) {
            continue;
        }
        let outcome = game.outcome_after(state, &action);
        if kept.iter().any(|(_, seen)| seen.equivalent(&outcome)) {
            continue;
        }
        kept.push((action, outcome));
    }
    kept.into_iter().map(|(action, _)| action).collect()
}
