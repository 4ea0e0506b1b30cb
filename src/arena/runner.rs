//! The match loop.
//!
//! ## Turn structure
//!
//! 1. Stop when the rules report an outcome or only one seat is still in.
//! 2. A retired seat passes without being asked.
//! 3. Otherwise the seat's agent decides under the turn budget, counted
//!    from when its worker starts on the request. A timeout, panic or
//!    reported error is a strike; reaching the strike limit retires the
//!    seat on the spot. Either way the turn becomes a pass.
//! 4. An illegal answer is quietly replaced by a pass. It is not a strike.
//! 5. The action is applied with live chance and broadcast to every seat.
//!
//! The pass is the rules' forced action: 60, or the first legal return when
//! the mover is over the gem limit without a white gem to give back.

use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::ArenaConfig;
use super::seat::SeatWorker;
use crate::agents::{AgentContext, Entrant};
use crate::core::{ActionIndex, BoardState, GameConfig, GameRng, PlayerId};
use crate::error::ConfigError;
use crate::facade::GameFacade;
use crate::rules::Outcome;

macro_rules! narrate {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            info!($($arg)+)
        } else {
            debug!($($arg)+)
        }
    };
}

/// How a match came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEnding {
    /// The rules declared the game over.
    Finished,
    /// Every other seat was retired.
    LastStanding,
}

/// Result of one match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    /// Entrant name per seat, in turn order.
    pub seats: Vec<String>,
    pub winners: Vec<String>,
    pub winner_seats: Vec<PlayerId>,
    /// Final outcome vector from the rules.
    pub outcome: Outcome,
    /// Final prestige per seat.
    pub scores: Vec<u32>,
    pub strikes: Vec<u32>,
    pub retired: Vec<bool>,
    /// Actions applied, discard sub-turns included.
    pub turns: u32,
    pub ending: MatchEnding,
}

impl MatchReport {
    /// Whether more than one seat shares the win.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        self.winners.len() > 1
    }
}

/// Seats a fixed set of entrants and plays matches between them.
pub struct Arena {
    entrants: Vec<Entrant>,
    game: GameConfig,
    config: ArenaConfig,
}

impl Arena {
    /// Arena for `entrants` in initial seat order.
    pub fn new(entrants: Vec<Entrant>, config: ArenaConfig) -> Result<Self, ConfigError> {
        let game = GameConfig::new(entrants.len())?;
        config.validate()?;
        for (i, entrant) in entrants.iter().enumerate() {
            if entrants[..i].iter().any(|e| e.name == entrant.name) {
                return Err(ConfigError::DuplicateEntrant(entrant.name.clone()));
            }
        }
        Ok(Self {
            entrants,
            game,
            config,
        })
    }

    /// Override the game rules, e.g. a lower prestige target.
    pub fn with_game_config(mut self, game: GameConfig) -> Result<Self, ConfigError> {
        if game.num_players != self.entrants.len() {
            return Err(ConfigError::PlayerCount(game.num_players));
        }
        self.game = game;
        Ok(self)
    }

    #[must_use]
    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Switch turn narration between `info` and `debug`.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.config.verbose = verbose;
    }

    /// Whether a console player sits at this table.
    #[must_use]
    pub fn has_human(&self) -> bool {
        self.entrants.iter().any(Entrant::is_human)
    }

    /// Seat names in current turn order.
    #[must_use]
    pub fn seat_names(&self) -> Vec<String> {
        self.entrants.iter().map(|e| e.name.clone()).collect()
    }

    /// Move every entrant one seat earlier; the first seat goes last.
    pub fn rotate_seats(&mut self) {
        self.entrants.rotate_left(1);
    }

    /// Play `trials` matches, rotating seats before each one.
    pub fn run_trials(&mut self, trials: usize, seed: u64) -> Vec<MatchReport> {
        let mut seeds = GameRng::new(seed);
        (0..trials)
            .map(|_| {
                self.rotate_seats();
                self.play(seeds.next_u64())
            })
            .collect()
    }

    /// Play one match in the current seat order.
    pub fn play(&self, seed: u64) -> MatchReport {
        let verbose = self.config.verbose;
        let num_players = self.entrants.len();
        let names = self.seat_names();

        let mut rng = GameRng::new(seed);
        let mut facade = GameFacade::new(self.game.clone(), rng.fork());
        let mut workers: Vec<SeatWorker> = self
            .entrants
            .iter()
            .zip(PlayerId::all(num_players))
            .map(|(entrant, seat)| {
                let ctx = AgentContext {
                    facade: facade.fork(),
                    player_id: seat,
                    rng: rng.fork(),
                };
                SeatWorker::spawn(seat, &entrant.name, entrant.build(ctx))
            })
            .collect();

        let mut state = facade.initial_state();
        let mut strikes = vec![0u32; num_players];
        let mut current = PlayerId::new(0);
        let mut turns = 0u32;

        narrate!(verbose, seats = ?names, seed, "match started");

        loop {
            if facade.game_ended(&state).is_over() {
                break;
            }
            let retired = state.players.iter().filter(|p| p.retired).count();
            if retired + 1 >= num_players {
                break;
            }

            turns += 1;
            let action = if state.player(current).retired {
                facade.forced_action(&state, current)
            } else {
                let choice = self.ask(&mut workers[current.index()], &mut state, &facade, current, &names, &mut strikes);
                self.validate(&facade, &state, current, choice)
            };

            narrate!(
                verbose,
                turn = turns,
                seat = %current,
                name = %names[current.index()],
                action = %facade.move_to_string(action),
                "move"
            );

            let (next_state, next_player) = facade.next_state_of(&state, current, action, false);
            state = next_state;
            for worker in &mut workers {
                worker.observe(&state, current, action);
            }
            if verbose {
                info!("\n{}", state);
                self.pause();
            }
            current = next_player;
        }

        let report = self.report(&facade, &state, names, strikes, turns);
        narrate!(
            verbose,
            winners = ?report.winners,
            scores = ?report.scores,
            turns = report.turns,
            ending = ?report.ending,
            "match over"
        );
        if verbose {
            self.pause();
        }
        report
    }

    /// Ask the seat's agent, recording a strike on any fault. `None` when
    /// the agent produced nothing usable.
    fn ask(
        &self,
        worker: &mut SeatWorker,
        state: &mut BoardState,
        facade: &GameFacade,
        seat: PlayerId,
        names: &[String],
        strikes: &mut [u32],
    ) -> Option<ActionIndex> {
        match worker.decide(state, self.config.turn_budget, self.config.start_limit()) {
            Ok(action) => Some(action),
            Err(err) => {
                let count = &mut strikes[seat.index()];
                *count += 1;
                warn!(
                    %seat,
                    name = %names[seat.index()],
                    strikes = *count,
                    max = self.config.max_strikes,
                    error = %err,
                    "agent fault"
                );
                if *count >= self.config.max_strikes {
                    warn!(%seat, name = %names[seat.index()], "retiring seat");
                    facade.retire_player(state, seat);
                }
                None
            }
        }
    }

    fn pause(&self) {
        if !self.config.wait.is_zero() {
            thread::sleep(self.config.wait);
        }
    }

    /// The agent's answer when legal, the forced pass otherwise.
    fn validate(
        &self,
        facade: &GameFacade,
        state: &BoardState,
        seat: PlayerId,
        choice: Option<ActionIndex>,
    ) -> ActionIndex {
        let forced = facade.forced_action(state, seat);
        match choice {
            Some(action) if facade.valid_moves(state, seat).contains(action) => action,
            Some(action) => {
                narrate!(
                    self.config.verbose,
                    %seat,
                    rejected = %facade.move_to_string(action),
                    "illegal action replaced by a pass"
                );
                forced
            }
            None => forced,
        }
    }

    fn report(
        &self,
        facade: &GameFacade,
        state: &BoardState,
        seats: Vec<String>,
        strikes: Vec<u32>,
        turns: u32,
    ) -> MatchReport {
        let num_players = seats.len();
        let outcome = facade.game_ended(state);
        let retired: Vec<bool> = state.players.iter().map(|p| p.retired).collect();
        let retired_count = retired.iter().filter(|&&r| r).count();

        let (winner_seats, ending) = if retired_count + 1 >= num_players {
            let standing = PlayerId::all(num_players)
                .filter(|p| !retired[p.index()])
                .collect();
            (standing, MatchEnding::LastStanding)
        } else {
            (outcome.winners(), MatchEnding::Finished)
        };

        MatchReport {
            winners: winner_seats.iter().map(|p| seats[p.index()].clone()).collect(),
            winner_seats,
            scores: PlayerId::all(num_players)
                .map(|p| facade.player_points(state, p))
                .collect(),
            seats,
            outcome,
            strikes,
            retired,
            turns,
            ending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Agent;
    use crate::core::NOOP;
    use crate::error::AgentError;
    use std::time::{Duration, Instant};

    struct Passer;

    impl Agent for Passer {
        fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
            Ok(NOOP)
        }
    }

    struct Failing;

    impl Agent for Failing {
        fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
            Err(AgentError::Failed("always".into()))
        }
    }

    fn passer(name: &str) -> Entrant {
        Entrant::new(name, |_| Box::new(Passer) as Box<dyn Agent>)
    }

    #[test]
    fn test_arena_rejects_bad_setups() {
        let one = Arena::new(vec![passer("a")], ArenaConfig::default());
        assert_eq!(one.err(), Some(ConfigError::PlayerCount(1)));

        let dup = Arena::new(vec![passer("a"), passer("a")], ArenaConfig::default());
        assert_eq!(dup.err(), Some(ConfigError::DuplicateEntrant("a".into())));

        let zero = Arena::new(
            vec![passer("a"), passer("b")],
            ArenaConfig::default().with_max_strikes(0),
        );
        assert_eq!(zero.err(), Some(ConfigError::ZeroStrikes));
    }

    #[test]
    fn test_passers_reach_the_round_cap() {
        let arena = Arena::new(vec![passer("a"), passer("b")], ArenaConfig::default())
            .unwrap()
            .with_game_config(GameConfig::new(2).unwrap().with_max_rounds(5))
            .unwrap();
        let report = arena.play(3);

        assert_eq!(report.ending, MatchEnding::Finished);
        assert_eq!(report.turns, 10);
        // Nobody scores: a two-way draw on cards too.
        assert_eq!(report.winners, vec!["a".to_string(), "b".to_string()]);
        assert!(report.is_draw());
        assert_eq!(report.strikes, vec![0, 0]);
    }

    #[test]
    fn test_failing_agent_is_retired() {
        let entrants = vec![
            passer("steady"),
            Entrant::new("broken", |_| Box::new(Failing) as Box<dyn Agent>),
        ];
        let report = Arena::new(entrants, ArenaConfig::default()).unwrap().play(9);

        assert_eq!(report.strikes, vec![0, 3]);
        assert_eq!(report.retired, vec![false, true]);
        assert_eq!(report.ending, MatchEnding::LastStanding);
        assert_eq!(report.winners, vec!["steady".to_string()]);
        assert_eq!(report.turns, 6);
    }

    #[test]
    fn test_verbose_match_pauses_after_each_turn() {
        let config = ArenaConfig::default()
            .with_verbose(true)
            .with_wait(Duration::from_millis(10));
        let arena = Arena::new(vec![passer("a"), passer("b")], config)
            .unwrap()
            .with_game_config(GameConfig::new(2).unwrap().with_max_rounds(2))
            .unwrap();
        let started = Instant::now();
        let report = arena.play(5);
        // Four turns and the closing board.
        assert_eq!(report.turns, 4);
        assert!(started.elapsed() >= Duration::from_millis(50));

    }

    #[test]
    fn test_rotation() {
        let mut arena = Arena::new(vec![passer("a"), passer("b"), passer("c")], ArenaConfig::default()).unwrap();
        arena.rotate_seats();
        assert_eq!(arena.seat_names(), vec!["b", "c", "a"]);
    }
}
