//! MCTS integration tests on Splendor positions.

use splendor_arena::agents::{Agent, AgentContext, Entrant, MctsAgent};
use splendor_arena::arena::{Arena, ArenaConfig, MatchEnding};
use splendor_arena::core::{GameConfig, GameRng, PlayerId};
use splendor_arena::mcts::{MCTSConfig, MCTSSearch};
use splendor_arena::rules::{RulesEngine, SplendorRules};

fn small_config() -> MCTSConfig {
    MCTSConfig::fixed(60, 20)
}

fn setup(players: usize, seed: u64) -> (SplendorRules, splendor_arena::core::BoardState) {
    let mut rules = SplendorRules::with_seed(GameConfig::new(players).unwrap(), seed);
    let state = rules.initial_state();
    (rules, state)
}

// =============================================================================
// Basic Search Tests
// =============================================================================

/// Test that search returns a legal action from the opening position.
#[test]
fn test_mcts_returns_legal_action() {
    let (rules, state) = setup(2, 42);
    let mut search = MCTSSearch::new(rules.clone(), small_config());

    let action = search.search(&state, PlayerId::new(0)).expect("game is not over");
    assert!(rules.legal_actions(&state, PlayerId::new(0)).contains(action));
}

/// Test that search works with a tiny iteration budget.
#[test]
fn test_mcts_with_low_iterations() {
    let (rules, state) = setup(2, 42);
    let mut search = MCTSSearch::new(rules, small_config().with_iterations(3));

    assert!(search.search(&state, PlayerId::new(0)).is_some());
    assert_eq!(search.stats().iterations, 3);
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Test that two searches with the same seed pick the same action.
#[test]
fn test_mcts_deterministic_with_seed() {
    let (rules1, state1) = setup(2, 42);
    let (rules2, state2) = setup(2, 42);
    let config = small_config().with_seed(12345);

    let mut search1 = MCTSSearch::new(rules1, config.clone());
    let mut search2 = MCTSSearch::new(rules2, config);

    assert_eq!(
        search1.search(&state1, PlayerId::new(0)),
        search2.search(&state2, PlayerId::new(0))
    );
    assert_eq!(search1.action_visits(), search2.action_visits());
}

// =============================================================================
// N-Player Tests
// =============================================================================

/// Test search at a four-player table.
#[test]
fn test_mcts_four_player() {
    let (rules, state) = setup(4, 42);
    let mut search = MCTSSearch::new(rules, small_config());

    assert!(search.search(&state, PlayerId::new(0)).is_some());
    assert!(search.tree().len() > 1);
}

/// Test search on behalf of a seat other than the first.
#[test]
fn test_mcts_searches_for_later_seat() {
    let (mut rules, mut state) = setup(3, 5);
    let next = rules.apply(&mut state, PlayerId::new(0), 45, true);
    let mut search = MCTSSearch::new(rules.clone(), small_config());

    let action = search.search(&state, next).expect("game is not over");
    assert!(rules.legal_actions(&state, next).contains(action));
}

// =============================================================================
// Statistics Tests
// =============================================================================

/// Test that every iteration ends in exactly one of rollout, terminal or cutoff.
#[test]
fn test_mcts_statistics() {
    let (rules, state) = setup(2, 42);
    let mut search = MCTSSearch::new(rules, small_config());
    search.search(&state, PlayerId::new(0));

    let stats = search.stats();
    assert_eq!(stats.iterations, 60);
    assert!(stats.nodes_expanded > 0);
    assert!(stats.simulations > 0);
    assert_eq!(
        stats.simulations + stats.terminal_hits + stats.depth_cutoffs,
        stats.iterations
    );
}

/// Test that tree statistics reflect the nodes added by a search.
#[test]
fn test_mcts_tree_stats() {
    let (rules, state) = setup(2, 42);
    let mut search = MCTSSearch::new(rules, small_config().with_iterations(200));
    search.search(&state, PlayerId::new(0));

    let tree_stats = search.tree().stats();
    assert!(tree_stats.node_count > 1);
    assert!(tree_stats.max_depth > 0);
    assert!(tree_stats.total_edges > 0);
}

/// Test that root visits add up to the iteration count.
#[test]
fn test_root_visits_match_iterations() {
    let (rules, state) = setup(2, 9);
    let mut search = MCTSSearch::new(rules, small_config());
    search.search(&state, PlayerId::new(0));

    let visits: u32 = search.action_visits().iter().map(|(_, v)| v).sum();
    assert_eq!(visits, 60);
}

// =============================================================================
// Agent Tests
// =============================================================================

/// Test that the MCTS agent plays a whole short match without faults.
#[test]
fn test_mcts_agent_plays_a_short_match() {
    let mcts = Entrant::new("mcts", |ctx: AgentContext| {
        Box::new(MctsAgent::with_config(ctx, small_config())) as Box<dyn Agent>
    });
    let entrants = vec![mcts, Entrant::from_name("random").unwrap()];
    let arena = Arena::new(entrants, ArenaConfig::default())
        .unwrap()
        .with_game_config(GameConfig::new(2).unwrap().with_max_rounds(8))
        .unwrap();

    let report = arena.play(GameRng::new(3).next_u64());
    assert_eq!(report.ending, MatchEnding::Finished);
    assert_eq!(report.strikes, vec![0, 0]);
    assert!(report.turns >= 16);
}
