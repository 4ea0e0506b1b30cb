//! Tournament scheduling and aggregation.
//!
//! A tournament turns a list of agent names into match-ups, plays a fixed
//! number of trials of each, and reduces the reports to win rates. Every
//! match-up is validated while scheduling, so a bad name or table size is
//! reported before the first move is made.
//!
//! Match-ups without a human run in parallel on a rayon pool. Match-ups
//! with a human run afterwards, one at a time, on the calling thread.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::config::ArenaConfig;
use super::runner::{Arena, MatchReport};
use crate::agents::Entrant;
use crate::core::GameRng;
use crate::error::ConfigError;

/// Default trials per match-up.
pub const DEFAULT_TRIALS: usize = 12;

/// How entrants are grouped into match-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Competition {
    /// Every unordered pair, two players per table.
    League,
    /// Consecutive groups of two.
    Bracket2,
    /// Consecutive groups of three.
    Bracket3,
    /// Consecutive groups of four.
    Bracket4,
    /// Every entrant against a human.
    VersusHuman,
    /// Two humans.
    HumanOnly,
}

impl Competition {
    /// Table size of a bracket.
    #[must_use]
    pub fn bracket_size(self) -> Option<usize> {
        match self {
            Competition::Bracket2 => Some(2),
            Competition::Bracket3 => Some(3),
            Competition::Bracket4 => Some(4),
            _ => None,
        }
    }

    #[must_use]
    pub fn involves_human(self) -> bool {
        matches!(self, Competition::VersusHuman | Competition::HumanOnly)
    }

    fn min_entrants(self) -> usize {
        match self {
            Competition::League => 2,
            Competition::VersusHuman => 1,
            Competition::HumanOnly => 0,
            _ => self.bracket_size().unwrap_or(2),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Competition::League => "league",
            Competition::Bracket2 => "bracket2",
            Competition::Bracket3 => "bracket3",
            Competition::Bracket4 => "bracket4",
            Competition::VersusHuman => "versus-human",
            Competition::HumanOnly => "human-only",
        }
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which trials narrate their turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum DisplayPolicy {
    Always,
    /// Only the first trial of each match-up.
    First,
    #[default]
    Never,
}

impl DisplayPolicy {
    /// Whether trial `trial` of a match-up is displayed. Human tables
    /// always are.
    #[must_use]
    pub fn shows(self, trial: usize, has_human: bool) -> bool {
        has_human
            || match self {
                DisplayPolicy::Always => true,
                DisplayPolicy::First => trial == 0,
                DisplayPolicy::Never => false,
            }
    }
}

/// Tournament settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub competition: Competition,
    pub trials: usize,
    pub seed: u64,
    pub display: DisplayPolicy,
    pub arena: ArenaConfig,
    /// Worker threads for automated match-ups (`None` = rayon default).
    pub threads: Option<usize>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            competition: Competition::League,
            trials: DEFAULT_TRIALS,
            seed: 0,
            display: DisplayPolicy::Never,
            arena: ArenaConfig::default(),
            threads: None,
        }
    }
}

impl TournamentConfig {
    #[must_use]
    pub fn with_competition(mut self, competition: Competition) -> Self {
        self.competition = competition;
        self
    }

    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: DisplayPolicy) -> Self {
        self.display = display;
        self
    }

    #[must_use]
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }
}

/// Group `agents` into match-ups for `competition`.
pub fn schedule(competition: Competition, agents: &[String]) -> Result<Vec<Vec<String>>, ConfigError> {
    let needed = competition.min_entrants();
    if agents.len() < needed {
        return Err(ConfigError::TooFewEntrants {
            competition: competition.to_string(),
            needed,
            got: agents.len(),
        });
    }

    let matchups = match competition {
        Competition::League => {
            let mut pairs = Vec::new();
            for (i, a) in agents.iter().enumerate() {
                for b in &agents[i + 1..] {
                    pairs.push(vec![a.clone(), b.clone()]);
                }
            }
            pairs
        }
        Competition::Bracket2 | Competition::Bracket3 | Competition::Bracket4 => {
            let size = competition.bracket_size().unwrap_or(2);
            agents
                .chunks(size)
                .map(|group| {
                    let mut group = group.to_vec();
                    let missing = size - group.len();
                    group.extend_from_slice(&agents[..missing]);
                    group
                })
                .collect()
        }
        Competition::VersusHuman => agents
            .iter()
            .map(|a| vec![a.clone(), "human".to_string()])
            .collect(),
        Competition::HumanOnly => vec![vec!["human1".to_string(), "human2".to_string()]],
    };
    Ok(matchups)
}

/// Aggregated trials of one match-up.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchUpResult {
    /// Entrant names in scheduled seat order.
    pub entrants: Vec<String>,
    /// Trials won (shared wins included) per entrant.
    pub wins: BTreeMap<String, usize>,
    pub trials: usize,
    pub reports: Vec<MatchReport>,
}

impl MatchUpResult {
    fn new(entrants: Vec<String>, reports: Vec<MatchReport>) -> Self {
        let mut wins: BTreeMap<String, usize> = entrants.iter().map(|e| (e.clone(), 0)).collect();
        for report in &reports {
            for winner in &report.winners {
                *wins.entry(winner.clone()).or_default() += 1;
            }
        }
        Self {
            entrants,
            wins,
            trials: reports.len(),
            reports,
        }
    }

    #[must_use]
    pub fn win_rate(&self, entrant: &str) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.wins.get(entrant).copied().unwrap_or(0) as f64 / self.trials as f64
    }

    /// Entrants with the most wins.
    #[must_use]
    pub fn leaders(&self) -> Vec<String> {
        let best = self.wins.values().copied().max().unwrap_or(0);
        self.entrants
            .iter()
            .filter(|e| self.wins.get(*e).copied() == Some(best))
            .cloned()
            .collect()
    }

    /// Entrants with their win rate, best first.
    #[must_use]
    pub fn rates(&self) -> Vec<(String, f64)> {
        let mut rates: Vec<(String, f64)> = self
            .entrants
            .iter()
            .map(|e| (e.clone(), self.win_rate(e)))
            .collect();
        rates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        rates
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.entrants.join(" vs ")
    }
}

impl fmt::Display for MatchUpResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        writeln!(f, "{}", "-".repeat(80))?;
        for (name, rate) in self.rates() {
            writeln!(f, "Winning rate of {:10} = {:6.2}%", name, rate * 100.0)?;
        }
        write!(f, "{}", "-".repeat(80))
    }
}

/// Final standings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FinalResults {
    /// Brackets: the leaders of each match-up.
    Brackets(Vec<(String, Vec<String>)>),
    /// Leagues and human games: average win rate per entrant, best first.
    Rates(Vec<(String, f64)>),
}

impl fmt::Display for FinalResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "FINAL RESULT")?;
        writeln!(f, "{}", "-".repeat(80))?;
        match self {
            FinalResults::Brackets(brackets) => {
                for (title, winners) in brackets {
                    writeln!(f, "Winner of {:40} is {}.", title, winners.join(" & "))?;
                }
            }
            FinalResults::Rates(rates) => {
                for (name, rate) in rates {
                    writeln!(f, "Winning rate of {:10} = {:6.2}%", name, rate * 100.0)?;
                }
            }
        }
        Ok(())
    }
}

/// Everything a tournament produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentReport {
    pub competition: Competition,
    pub matchups: Vec<MatchUpResult>,
    pub results: FinalResults,
}

/// A scheduled, validated tournament.
pub struct Tournament {
    config: TournamentConfig,
    arenas: Vec<Arena>,
}

impl Tournament {
    /// Schedule match-ups for `agents` and validate every table.
    pub fn new(config: TournamentConfig, agents: &[String]) -> Result<Self, ConfigError> {
        if config.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        config.arena.validate()?;

        let arenas = schedule(config.competition, agents)?
            .into_iter()
            .map(|names| {
                let entrants = names
                    .iter()
                    .map(|name| Entrant::from_name(name))
                    .collect::<Result<Vec<_>, _>>()?;
                Arena::new(entrants, config.arena.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { config, arenas })
    }

    /// Build a tournament from prepared entrants, e.g. custom agents.
    pub fn with_entrants(config: TournamentConfig, matchups: Vec<Vec<Entrant>>) -> Result<Self, ConfigError> {
        if config.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        let arenas = matchups
            .into_iter()
            .map(|entrants| Arena::new(entrants, config.arena.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { config, arenas })
    }

    /// Seat order of every scheduled match-up.
    #[must_use]
    pub fn matchups(&self) -> Vec<Vec<String>> {
        self.arenas.iter().map(Arena::seat_names).collect()
    }

    /// Play every match-up and aggregate the results.
    pub fn run(mut self) -> TournamentReport {
        let mut seeds = GameRng::new(self.config.seed);
        let matchup_seeds: Vec<u64> = self.arenas.iter().map(|_| seeds.next_u64()).collect();
        let trials = self.config.trials;
        let display = self.config.display;

        let automated: Vec<(usize, MatchUpResult)> = with_pool(self.config.threads, || {
            self.arenas
                .par_iter_mut()
                .zip(matchup_seeds.par_iter())
                .enumerate()
                .filter(|(_, (arena, _))| !arena.has_human())
                .map(|(i, (arena, &seed))| (i, play_matchup(arena, trials, seed, display)))
                .collect()
        });

        let mut results: Vec<(usize, MatchUpResult)> = automated;
        for (i, arena) in self.arenas.iter_mut().enumerate() {
            if arena.has_human() {
                results.push((i, play_matchup(arena, trials, matchup_seeds[i], display)));
            }
        }
        results.sort_by_key(|(i, _)| *i);
        let matchups: Vec<MatchUpResult> = results.into_iter().map(|(_, r)| r).collect();

        let results = final_results(self.config.competition, &matchups);
        TournamentReport {
            competition: self.config.competition,
            matchups,
            results,
        }
    }
}

fn with_pool<R, F>(threads: Option<usize>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let Some(threads) = threads else {
        return op();
    };
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(op),
        Err(err) => {
            warn!(error = %err, threads, "falling back to the global rayon pool");
            op()
        }
    }
}

fn play_matchup(arena: &mut Arena, trials: usize, seed: u64, display: DisplayPolicy) -> MatchUpResult {
    let entrants = arena.seat_names();
    let has_human = arena.has_human();
    let mut seeds = GameRng::new(seed);

    let reports: Vec<MatchReport> = (0..trials)
        .map(|trial| {
            arena.rotate_seats();
            arena.set_verbose(display.shows(trial, has_human));
            arena.play(seeds.next_u64())
        })
        .collect();

    let result = MatchUpResult::new(entrants, reports);
    info!(matchup = %result.title(), wins = ?result.wins, "match-up finished");
    result
}

fn final_results(competition: Competition, matchups: &[MatchUpResult]) -> FinalResults {
    if competition.bracket_size().is_some() {
        return FinalResults::Brackets(
            matchups.iter().map(|m| (m.title(), m.leaders())).collect(),
        );
    }

    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for matchup in matchups {
        for entrant in &matchup.entrants {
            let entry = totals.entry(entrant.as_str()).or_default();
            entry.0 += matchup.win_rate(entrant);
            entry.1 += 1;
        }
    }
    let mut rates: Vec<(String, f64)> = totals
        .into_iter()
        .map(|(name, (sum, count))| (name.to_string(), sum / count as f64))
        .collect();
    rates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    FinalResults::Rates(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_league_schedule() {
        let matchups = schedule(Competition::League, &names(&["a", "b", "c"])).unwrap();
        assert_eq!(matchups, vec![names(&["a", "b"]), names(&["a", "c"]), names(&["b", "c"])]);
    }

    #[test]
    fn test_bracket_pads_from_front() {
        let matchups = schedule(Competition::Bracket3, &names(&["a", "b", "c", "d"])).unwrap();
        assert_eq!(matchups, vec![names(&["a", "b", "c"]), names(&["d", "a", "b"])]);
    }

    #[test]
    fn test_human_schedules() {
        let versus = schedule(Competition::VersusHuman, &names(&["mcts"])).unwrap();
        assert_eq!(versus, vec![names(&["mcts", "human"])]);

        let humans = schedule(Competition::HumanOnly, &[]).unwrap();
        assert_eq!(humans, vec![names(&["human1", "human2"])]);
    }

    #[test]
    fn test_too_few_entrants() {
        let err = schedule(Competition::Bracket4, &names(&["a", "b", "c"])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooFewEntrants {
                competition: "bracket4".to_string(),
                needed: 4,
                got: 3
            }
        );
    }

    #[test]
    fn test_tournament_validation() {
        let config = TournamentConfig::default();
        assert_eq!(
            Tournament::new(config.clone(), &names(&["random", "nope"])).err(),
            Some(ConfigError::UnknownAgent("nope".to_string()))
        );
        assert_eq!(
            Tournament::new(config.clone(), &names(&["random", "random"])).err(),
            Some(ConfigError::DuplicateEntrant("random".to_string()))
        );
        assert_eq!(
            Tournament::new(config.with_trials(0), &names(&["random", "greedy"])).err(),
            Some(ConfigError::ZeroTrials)
        );
    }

    #[test]
    fn test_display_policy() {
        assert!(DisplayPolicy::First.shows(0, false));
        assert!(!DisplayPolicy::First.shows(1, false));
        assert!(!DisplayPolicy::Never.shows(0, false));
        assert!(DisplayPolicy::Never.shows(3, true));
        assert!(DisplayPolicy::Always.shows(7, false));
    }

    #[test]
    fn test_final_rates_average_over_matchups() {
        let mut first = MatchUpResult::new(names(&["a", "b"]), Vec::new());
        first.trials = 4;
        first.wins.insert("a".into(), 3);
        first.wins.insert("b".into(), 1);
        let mut second = MatchUpResult::new(names(&["a", "c"]), Vec::new());
        second.trials = 4;
        second.wins.insert("a".into(), 1);
        second.wins.insert("c".into(), 3);

        let results = final_results(Competition::League, &[first, second]);
        assert_eq!(
            results,
            FinalResults::Rates(vec![
                ("c".to_string(), 0.75),
                ("a".to_string(), 0.5),
                ("b".to_string(), 0.25),
            ])
        );
    }
}
