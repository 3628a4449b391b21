//! Dice race rules and reducer.

use crate::core::{GameRng, LogEntry};
use crate::rules::{append, running, Game, GameAction, GameState, Rule};

use super::moves::Move;
use super::state::{track_length, RaceState, Runner, FACES};

/// Default number of tracks a player must own to win.
pub const DEFAULT_COLUMNS_TO_WIN: usize = 2;

/// Default number of turns each player gets before the game is a draw.
pub const DEFAULT_TURNS_PER_PLAYER: u16 = 25;

/// A push-your-luck race for 1-4 players.
///
/// On each turn the current player rolls two dice and must spend every die
/// that can move a runner; each die moves a runner up the track matching its
/// face. They may then roll again or stop to bank the progress. A roll that
/// cannot be used busts, losing the turn's progress. Banking a runner at the
/// top of its track claims that track.
#[derive(Debug)]
pub struct DiceRace {
    player_count: usize,
    columns_to_win: usize,
    turn_limit: u16,
    rules: Vec<Rule<DiceRace>>,
}

impl DiceRace {
    pub fn new(player_count: usize) -> Self {
        assert!(
            (1..=4).contains(&player_count),
            "Player count must be 1-4"
        );

        let roll = Rule::<DiceRace>::new(
            "roll",
            |_, state: &RaceState| state.dice().is_none(),
            |_, _| vec![Move::Roll],
        )
        .also(running);
        let stop = Rule::<DiceRace>::new(
            "stop",
            |_, state: &RaceState| state.dice().is_none() && !state.runners().is_empty(),
            |_, _| vec![Move::Stop],
        )
        .also(running);
        let use_die = Rule::<DiceRace>::new(
            "use die",
            |_, state: &RaceState| state.dice().is_some(),
            |_, state: &RaceState| {
                let Some(dice) = state.dice() else {
                    return Vec::new();
                };
                state
                    .usable_dice()
                    .map(|die| Move::sequence(vec![Move::Spend(die), Move::Advance(dice[die])]))
                    .collect()
            },
        )
        .also(running);
        let bust = Rule::<DiceRace>::new(
            "bust",
            |_, state: &RaceState| state.dice().is_some(),
            |_, _| vec![Move::Bust],
        )
        .also(|_, state: &RaceState| state.usable_dice().next().is_none())
        .also(running);

        Self {
            player_count,
            columns_to_win: DEFAULT_COLUMNS_TO_WIN,
            turn_limit: DEFAULT_TURNS_PER_PLAYER * player_count as u16,
            rules: vec![roll, stop, append(&use_die, &use_die), bust],
        }
    }

    /// Tracks a player must own to win.
    #[must_use]
    pub fn with_columns_to_win(mut self, columns: usize) -> Self {
        assert!(
            (1..=usize::from(FACES)).contains(&columns),
            "columns to win must be 1-{FACES}"
        );
        self.columns_to_win = columns;
        self
    }

    /// Total turns, across all players, before the game is drawn.
    #[must_use]
    pub fn with_turn_limit(mut self, turns: u16) -> Self {
        assert!(turns > 0, "turn limit must be positive");
        self.turn_limit = turns;
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    #[must_use]
    pub fn columns_to_win(&self) -> usize {
        self.columns_to_win
    }

    fn pass_turn(&self, state: &mut RaceState, log: &mut Vec<LogEntry>) {
        state.end_turn();
        if state.turn >= self.turn_limit {
            state.drawn = true;
            log.push(LogEntry::new(format!("draw after {} turns", state.turn)));
        }
    }

    fn bank(&self, state: &mut RaceState) -> Vec<LogEntry> {
        let player = state.current;
        let mut log = Vec::new();
        let runners: Vec<Runner> = state.runners.drain(..).collect();
        for runner in runners {
            let slot = usize::from(runner.track - 1);
            state.banked[player][slot] = runner.position;
            if runner.position >= track_length(runner.track) {
                state.claimed[slot] = Some(player);
                log.push(LogEntry::new(format!("{player} claims track {}", runner.track)));
            }
        }

        if state.claims_of(player) >= self.columns_to_win {
            state.victors.push(player);
            state.defeated = state.seats.iter().copied().filter(|p| *p != player).collect();
            log.push(LogEntry::new(format!("{player} wins")));
        } else {
            self.pass_turn(state, &mut log);
        }
        log
    }
}

impl Game for DiceRace {
    type State = RaceState;
    type Action = Move;

    fn new_state(&self) -> RaceState {
        RaceState::new(self.player_count)
    }

    fn rules(&self) -> &[Rule<Self>] {
        &self.rules
    }

    fn apply(&self, state: &mut RaceState, action: &Move, rng: &mut GameRng) -> Vec<LogEntry> {
        assert!(!state.ended(), "game is over, cannot apply `{action}`");
        let player = state.current;

        match action {
            Move::Roll => {
                assert!(state.dice.is_none(), "dice already rolled");
                let dice = [rng.roll_die(FACES), rng.roll_die(FACES)];
                state.dice = Some(dice);
                state.spent = [false; 2];
                vec![LogEntry::new(format!("{player} rolls {} and {}", dice[0], dice[1]))]
            }
            Move::Stop => {
                assert!(state.dice.is_none(), "cannot stop with dice to use");
                assert!(!state.runners.is_empty(), "nothing to bank");
                let mut log = vec![LogEntry::new(format!("{player} stops"))];
                log.extend(self.bank(state));
                log
            }
            Move::Bust => {
                assert!(state.dice.is_some(), "cannot bust before rolling");
                assert!(
                    state.usable_dice().next().is_none(),
                    "cannot bust with a usable die"
                );
                let mut log = vec![LogEntry::new(format!("{player} busts"))];
                self.pass_turn(state, &mut log);
                log
            }
            Move::Spend(die) => {
                assert!(state.dice.is_some(), "no dice to spend");
                assert!(*die < 2 && !state.spent[*die], "die {die} cannot be spent");
                state.spent[*die] = true;
                Vec::new()
            }
            Move::Advance(track) => {
                assert!((1..=FACES).contains(track), "no track {track}");
                assert!(state.can_advance(*track), "cannot advance on track {track}");
                let position = match state.runners.iter_mut().find(|r| r.track == *track) {
                    Some(runner) => {
                        runner.position += 1;
                        runner.position
                    }
                    None => {
                        let position = state.banked(player, *track) + 1;
                        state.runners.push(Runner {
                            track: *track,
                            position,
                        });
                        position
                    }
                };
                if state.usable_dice().next().is_none() {
                    state.dice = None;
                    state.spent = [false; 2];
                }
                vec![LogEntry::new(format!(
                    "{player} advances on track {track} to {position}"
                ))]
            }
            Move::Sequence(_) => unreachable!("sequences are unfolded by reduce"),
        }
    }
}
