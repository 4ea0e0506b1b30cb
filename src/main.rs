//! Splendor tournament CLI.
//!
//! Runs the selected competition between the named agents and prints
//! per-match-up win rates followed by the final standings.

use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use splendor_arena::arena::{
    ArenaConfig, Competition, DisplayPolicy, Tournament, TournamentConfig, DEFAULT_TRIALS,
};

#[derive(Parser)]
#[command(name = "splendor")]
#[command(about = "Run Splendor tournaments between decision agents")]
struct Args {
    /// Agents to enter: random, greedy, heuristic, mcts, or human*
    #[arg(long, value_delimiter = ',', default_value = "random,greedy,heuristic")]
    agents: Vec<String>,

    /// Competition format
    #[arg(long, value_enum, default_value_t = Competition::League)]
    competition: Competition,

    /// Trials per match-up
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    trials: usize,

    /// Tournament seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Wall-clock budget per decision, in seconds
    #[arg(long, default_value_t = 300)]
    turn_budget_secs: u64,

    /// Which trials narrate their turns
    #[arg(long, value_enum, default_value_t = DisplayPolicy::Never)]
    display: DisplayPolicy,

    /// Seconds to pause after each displayed turn
    #[arg(long, default_value_t = 0)]
    wait_secs: u64,

    /// Worker threads for parallel match-ups
    #[arg(long)]
    threads: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn log_level(&self) -> &'static str {
        let shows_moves = self.display != DisplayPolicy::Never || self.competition.involves_human();
        if self.verbose {
            "debug"
        } else if shows_moves {
            "info"
        } else {
            "warn"
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG wins over the level implied by the flags.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = TournamentConfig::default()
        .with_competition(args.competition)
        .with_trials(args.trials)
        .with_seed(args.seed)
        .with_display(args.display)
        .with_threads(args.threads)
        .with_arena(
            ArenaConfig::default()
                .with_turn_budget(Duration::from_secs(args.turn_budget_secs))
                .with_wait(Duration::from_secs(args.wait_secs)),
        );

    let tournament = Tournament::new(config, &args.agents)?;
    info!(
        competition = %args.competition,
        matchups = tournament.matchups().len(),
        trials = args.trials,
        "starting tournament"
    );

    let report = tournament.run();
    for matchup in &report.matchups {
        println!();
        println!("{}", matchup);
        if args.competition.bracket_size().is_some() {
            println!(
                "The winner of {} is {}!",
                matchup.title(),
                matchup.leaders().join(" & ")
            );
        }
    }
    println!();
    print!("{}", report.results);

    Ok(())
}
