//! Arena integration tests: faults, retirement, rotation and termination.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use splendor_arena::agents::{Agent, AgentContext, Entrant, GreedyAgent};
use splendor_arena::arena::{Arena, ArenaConfig, MatchEnding};
use splendor_arena::core::{ActionIndex, BoardState, GameConfig, PlayerId, NOOP};
use splendor_arena::error::AgentError;
use splendor_arena::facade::GameFacade;

// =============================================================================
// Test agents
// =============================================================================

struct Passer;

impl Agent for Passer {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        Ok(NOOP)
    }
}

/// Never answers.
struct Sleeper;

impl Agent for Sleeper {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        thread::sleep(Duration::from_secs(3600));
        Ok(NOOP)
    }
}

/// Overruns its first decision, then answers at once.
struct SlowOnce {
    slept: bool,
}

impl Agent for SlowOnce {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        if !self.slept {
            self.slept = true;
            thread::sleep(Duration::from_millis(250));
        }
        Ok(NOOP)
    }
}

struct Panicker;

impl Agent for Panicker {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        panic!("decide exploded");
    }
}

/// Buys the first tier-one card when it can, otherwise passes.
struct FirstCardBuyer {
    facade: GameFacade,
    player_id: PlayerId,
}

impl Agent for FirstCardBuyer {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        if self.facade.valid_moves(state, self.player_id).contains(0) {
            Ok(0)
        } else {
            Ok(NOOP)
        }
    }
}

/// Always submits an illegal purchase.
struct Cheater;

impl Agent for Cheater {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        Ok(11)
    }
}

/// Records every broadcast it receives.
struct Recorder {
    log: Arc<Mutex<Vec<(PlayerId, ActionIndex)>>>,
}

impl Agent for Recorder {
    fn decide(&mut self, _state: &BoardState) -> Result<ActionIndex, AgentError> {
        Ok(45)
    }

    fn on_action_applied(&mut self, _state: &BoardState, player: PlayerId, action: ActionIndex) {
        self.log.lock().unwrap().push((player, action));
    }
}

fn entrant<A: Agent + 'static>(name: &str, make: fn() -> A) -> Entrant {
    Entrant::new(name, move |_| Box::new(make()) as Box<dyn Agent>)
}

fn short_game(players: usize, rounds: u32) -> GameConfig {
    GameConfig::new(players).unwrap().with_max_rounds(rounds)
}

// =============================================================================
// Faults and retirement
// =============================================================================

/// Test that an agent that never answers is struck every turn and retired on the third.
#[test]
fn test_sleeping_agent_is_struck_and_retired() {
    let entrants = vec![
        entrant("passer1", || Passer),
        entrant("sleeper", || Sleeper),
        entrant("passer2", || Passer),
    ];
    let config = ArenaConfig::default().with_turn_budget(Duration::from_millis(50));
    let arena = Arena::new(entrants, config)
        .unwrap()
        .with_game_config(short_game(3, 6))
        .unwrap();

    let report = arena.play(17);

    // One strike per seated turn, retirement on the third, play continues.
    assert_eq!(report.strikes, vec![0, 3, 0]);
    assert_eq!(report.retired, vec![false, true, false]);
    assert_eq!(report.ending, MatchEnding::Finished);
    assert_eq!(report.turns, 18);
    assert_eq!(report.winners, vec!["passer1".to_string(), "passer2".to_string()]);
    assert!(report.outcome.value(PlayerId::new(1)) < 0.0);
}

/// Test that one overrun costs one strike even while the late call still
/// holds the seat's worker on the next turn.
#[test]
fn test_single_overrun_is_a_single_strike() {
    let entrants = vec![
        entrant("slow-once", || SlowOnce { slept: false }),
        entrant("passer", || Passer),
    ];
    let config = ArenaConfig::default().with_turn_budget(Duration::from_millis(100));
    let arena = Arena::new(entrants, config)
        .unwrap()
        .with_game_config(short_game(2, 4))
        .unwrap();

    let report = arena.play(8);

    assert_eq!(report.strikes, vec![1, 0]);
    assert_eq!(report.retired, vec![false, false]);
    assert_eq!(report.turns, 8);
    assert_eq!(report.ending, MatchEnding::Finished);
}

/// Test that the last seat still in wins once its opponent is retired.
#[test]
fn test_last_agent_standing_wins() {
    let entrants = vec![entrant("sleeper", || Sleeper), entrant("passer", || Passer)];
    let config = ArenaConfig::default().with_turn_budget(Duration::from_millis(30));
    let report = Arena::new(entrants, config).unwrap().play(2);

    assert_eq!(report.ending, MatchEnding::LastStanding);
    assert_eq!(report.winners, vec!["passer".to_string()]);
    assert_eq!(report.winner_seats, vec![PlayerId::new(1)]);
    assert_eq!(report.strikes, vec![3, 0]);
    assert_eq!(report.turns, 5);
}

/// Test that a panic inside `decide` is a strike, not a crash of the match.
#[test]
fn test_panicking_agent_counts_strikes() {
    let entrants = vec![entrant("passer", || Passer), entrant("panicker", || Panicker)];
    let report = Arena::new(entrants, ArenaConfig::default()).unwrap().play(4);

    assert_eq!(report.strikes, vec![0, 3]);
    assert_eq!(report.retired, vec![false, true]);
    assert_eq!(report.winners, vec!["passer".to_string()]);
}

/// Test that the strike limit comes from the arena config.
#[test]
fn test_custom_strike_limit() {
    let entrants = vec![entrant("passer", || Passer), entrant("panicker", || Panicker)];
    let config = ArenaConfig::default().with_max_strikes(1);
    let report = Arena::new(entrants, config).unwrap().play(4);

    assert_eq!(report.strikes, vec![0, 1]);
    assert_eq!(report.turns, 2);
}

/// Test that an illegal submission becomes a pass without a strike.
#[test]
fn test_illegal_action_is_a_pass_not_a_strike() {
    let entrants = vec![entrant("cheater", || Cheater), entrant("passer", || Passer)];
    let arena = Arena::new(entrants, ArenaConfig::default())
        .unwrap()
        .with_game_config(short_game(2, 3))
        .unwrap();
    let report = arena.play(8);

    assert_eq!(report.strikes, vec![0, 0]);
    assert_eq!(report.retired, vec![false, false]);
    assert_eq!(report.scores, vec![0, 0]);
    assert_eq!(report.turns, 6);
}

// =============================================================================
// Broadcast and termination
// =============================================================================

/// Test that every applied action reaches every seat in match order.
#[test]
fn test_every_action_is_broadcast_to_every_seat() {
    let logs: Vec<Arc<Mutex<Vec<(PlayerId, ActionIndex)>>>> =
        (0..2).map(|_| Arc::new(Mutex::new(Vec::new()))).collect();
    let entrants: Vec<Entrant> = logs
        .iter()
        .enumerate()
        .map(|(i, log)| {
            let log = Arc::clone(log);
            Entrant::new(format!("recorder{i}"), move |_| {
                Box::new(Recorder { log: Arc::clone(&log) }) as Box<dyn Agent>
            })
        })
        .collect();
    let arena = Arena::new(entrants, ArenaConfig::default())
        .unwrap()
        .with_game_config(short_game(2, 2))
        .unwrap();

    let report = arena.play(5);
    // Workers are joined when the match ends, so the logs are complete.
    let first = logs[0].lock().unwrap().clone();
    let second = logs[1].lock().unwrap().clone();
    assert_eq!(first.len() as u32, report.turns);
    assert_eq!(first, second);
    assert_eq!(first[0], (PlayerId::new(0), 45));
    assert_eq!(first[1].0, PlayerId::new(1));
}

/// Test that a match where nobody can score ends at the round cap as a draw.
#[test]
fn test_buyer_against_passer_terminates() {
    let entrants = vec![
        Entrant::new("buyer", |ctx: AgentContext| {
            Box::new(FirstCardBuyer {
                facade: ctx.facade,
                player_id: ctx.player_id,
            }) as Box<dyn Agent>
        }),
        entrant("passer", || Passer),
    ];
    let report = Arena::new(entrants, ArenaConfig::default()).unwrap().play(12);

    assert_eq!(report.ending, MatchEnding::Finished);
    assert_eq!(report.scores[1], 0);
    // Nobody can afford anything without taking gems: the round cap ends it.
    assert_eq!(report.turns, 200);
    assert!(report.is_draw());
}

/// Test that the greedy agent beats an agent that only passes in a short race.
#[test]
fn test_greedy_beats_passer() {
    let entrants = vec![
        Entrant::new("greedy", |ctx| Box::new(GreedyAgent::new(ctx)) as Box<dyn Agent>),
        entrant("passer", || Passer),
    ];
    let arena = Arena::new(entrants, ArenaConfig::default())
        .unwrap()
        .with_game_config(GameConfig::new(2).unwrap().with_winning_points(3))
        .unwrap();
    let report = arena.play(21);

    assert_eq!(report.ending, MatchEnding::Finished);
    assert_eq!(report.winners, vec!["greedy".to_string()]);
    assert_eq!(report.scores[1], 0);
}

// =============================================================================
// Seat rotation
// =============================================================================

/// Test that seats rotate by one position before each trial.
#[test]
fn test_rotation_across_trials() {
    let entrants = vec![entrant("a", || Passer), entrant("b", || Passer)];
    let mut arena = Arena::new(entrants, ArenaConfig::default())
        .unwrap()
        .with_game_config(short_game(2, 1))
        .unwrap();

    let reports = arena.run_trials(3, 99);
    let seatings: Vec<Vec<String>> = reports.iter().map(|r| r.seats.clone()).collect();
    assert_eq!(
        seatings,
        vec![
            vec!["b".to_string(), "a".to_string()],
            vec!["a".to_string(), "b".to_string()],
            vec!["b".to_string(), "a".to_string()],
        ]
    );

    let a_first = seatings.iter().filter(|s| s[0] == "a").count();
    assert_eq!(a_first, 1);
}

/// Test that the same seed replays the same match.
#[test]
fn test_same_seed_same_match() {
    let make = || {
        Arena::new(
            vec![
                Entrant::from_name("random").unwrap(),
                Entrant::from_name("heuristic").unwrap(),
            ],
            ArenaConfig::default(),
        )
        .unwrap()
    };
    let first = make().play(31);
    let second = make().play(31);
    assert_eq!(first, second);
}
