//! Rules: a condition paired with an action generator.
//!
//! A rule is a value, not a trait object hierarchy. Games build their rule
//! list once and the composition engine takes the union of whatever fires.
//!
//! ```
//! use lookahead::games::bandit::{Arm, Bandit, Pull};
//! use lookahead::rules::{Game, Rule};
//!
//! let game = Bandit::new(vec![Arm::new("left", 0.7), Arm::new("right", 0.2)]);
//! let state = game.new_state();
//!
//! let only_left = Rule::<Bandit>::new(
//!     "only left",
//!     |_, state| !state.pulled(),
//!     |_, _| vec![Pull::Arm(0)],
//! );
//! assert_eq!(only_left.fire(&game, &state), vec![Pull::Arm(0)]);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::core::GameRng;

use super::game::{Game, GameAction, GameState};

/// Predicate half of a rule.
pub type Condition<G> = Arc<dyn Fn(&G, &<G as Game>::State) -> bool + Send + Sync>;

/// Generator half of a rule.
pub type Generator<G> =
    Arc<dyn Fn(&G, &<G as Game>::State) -> Vec<<G as Game>::Action> + Send + Sync>;

/// A conditional action generator.
///
/// `generate` may assume whatever `condition` guarantees and nothing more.
pub struct Rule<G: Game> {
    name: Cow<'static, str>,
    condition: Condition<G>,
    generate: Generator<G>,
}

impl<G: Game> Clone for Rule<G> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            condition: Arc::clone(&self.condition),
            generate: Arc::clone(&self.generate),
        }
    }
}

impl<G: Game> fmt::Debug for Rule<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<G: Game> Rule<G> {
    /// Create a rule from its two halves.
    pub fn new<C, A>(name: impl Into<Cow<'static, str>>, condition: C, generate: A) -> Self
    where
        C: Fn(&G, &G::State) -> bool + Send + Sync + 'static,
        A: Fn(&G, &G::State) -> Vec<G::Action> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            condition: Arc::new(condition),
            generate: Arc::new(generate),
        }
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Does the rule apply in `state`?
    pub fn applies(&self, game: &G, state: &G::State) -> bool {
        (self.condition)(game, state)
    }

    /// Run the generator. Only meaningful when `applies` holds.
    pub fn generate(&self, game: &G, state: &G::State) -> Vec<G::Action> {
        (self.generate)(game, state)
    }

    /// The generated actions if the rule applies, otherwise nothing.
    pub fn fire(&self, game: &G, state: &G::State) -> Vec<G::Action> {
        if self.applies(game, state) {
            self.generate(game, state)
        } else {
            Vec::new()
        }
    }

    /// Same actions, with an extra condition conjoined.
    #[must_use]
    pub fn also<C>(&self, extra: C) -> Self
    where
        C: Fn(&G, &G::State) -> bool + Send + Sync + 'static,
    {
        let base = Arc::clone(&self.condition);
        Self {
            name: self.name.clone(),
            condition: Arc::new(move |game: &G, state: &G::State| {
                base(game, state) && extra(game, state)
            }),
            generate: Arc::clone(&self.generate),
        }
    }

    /// Lookahead chaining, see [`append`].
    #[must_use]
    pub fn then(&self, second: &Rule<G>) -> Self {
        append(self, second)
    }
}

/// Chain `second` after each action of `first`.
///
/// For every `a1` generated by `first`, the state after `a1` is computed; when
/// `second` applies there and generates something, one `Sequence([a1, a2])` is
/// emitted per `a2` (plain `a1` when `a2 == a1`). Otherwise `a1` is emitted on
/// its own. The composite only needs `first`'s condition to enter.
///
/// Nesting (`append(&append(&r, &r), &r)`) looks further ahead without any
/// fixed ply count.
pub fn append<G: Game>(first: &Rule<G>, second: &Rule<G>) -> Rule<G> {
    let head = first.clone();
    let tail = second.clone();
    Rule {
        name: Cow::Owned(format!("{} then {}", first.name, second.name)),
        condition: Arc::clone(&first.condition),
        generate: Arc::new(move |game: &G, state: &G::State| -> Vec<G::Action> {
            let mut out = Vec::new();
            for a1 in head.generate(game, state) {
                let mut after = state.clone();
                let mut rng = GameRng::speculative();
                game.reduce_unchecked(&mut after, &a1, &mut rng);

                let follow_ups = tail.fire(game, &after);
                if follow_ups.is_empty() {
                    out.push(a1);
                    continue;
                }
                for a2 in follow_ups {
                    if a2 == a1 {
                        out.push(a1.clone());
                    } else {
                        out.push(G::Action::sequence(vec![a1.clone(), a2]));
                    }
                }
            }
            out
        }),
    }
}

/// Does `state` still let the rule's game continue? Small helper for rule
/// conditions that must not fire after the game is over.
pub fn running<G: Game>(_: &G, state: &G::State) -> bool {
    !state.ended()
}
