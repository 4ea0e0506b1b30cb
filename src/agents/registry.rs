//! Agent registry.
//!
//! Names map to factories through a static table. Any name starting with
//! `human` builds a console agent, so several humans can sit at one table
//! under distinct names.

use std::fmt;
use std::sync::Arc;

use super::{Agent, AgentContext, GreedyAgent, HeuristicAgent, MctsAgent, RandomAgent, StdioHuman};
use crate::error::ConfigError;

/// Shared constructor for one entrant's agents.
pub type MakeAgent = Arc<dyn Fn(AgentContext) -> Box<dyn Agent> + Send + Sync>;

/// A registered strategy.
pub struct AgentFactory {
    pub name: &'static str,
    pub make: fn(AgentContext) -> Box<dyn Agent>,
}

static AGENT_FACTORIES: &[AgentFactory] = &[
    AgentFactory {
        name: RandomAgent::NAME,
        make: make_random,
    },
    AgentFactory {
        name: GreedyAgent::NAME,
        make: make_greedy,
    },
    AgentFactory {
        name: HeuristicAgent::NAME,
        make: make_heuristic,
    },
    AgentFactory {
        name: MctsAgent::NAME,
        make: make_mcts,
    },
];

pub fn registered_agents() -> &'static [AgentFactory] {
    AGENT_FACTORIES
}

pub fn by_name(name: &str) -> Option<&'static AgentFactory> {
    registered_agents().iter().find(|factory| factory.name == name)
}

/// Whether `name` selects a console player.
pub fn is_human(name: &str) -> bool {
    name.starts_with(StdioHuman::NAME)
}

fn make_random(ctx: AgentContext) -> Box<dyn Agent> {
    Box::new(RandomAgent::new(ctx))
}

fn make_greedy(ctx: AgentContext) -> Box<dyn Agent> {
    Box::new(GreedyAgent::new(ctx))
}

fn make_heuristic(ctx: AgentContext) -> Box<dyn Agent> {
    Box::new(HeuristicAgent::new(ctx))
}

fn make_mcts(ctx: AgentContext) -> Box<dyn Agent> {
    Box::new(MctsAgent::new(ctx))
}

fn make_human(ctx: AgentContext) -> Box<dyn Agent> {
    Box::new(StdioHuman::stdio(ctx))
}

/// A named participant: how to build its agent for each trial.
#[derive(Clone)]
pub struct Entrant {
    pub name: String,
    make: MakeAgent,
}

impl Entrant {
    /// Entrant with a custom constructor.
    pub fn new<F>(name: impl Into<String>, make: F) -> Self
    where
        F: Fn(AgentContext) -> Box<dyn Agent> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            make: Arc::new(make),
        }
    }

    /// Resolve a registered or human agent name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        if is_human(name) {
            return Ok(Self::new(name, make_human));
        }
        let factory = by_name(name).ok_or_else(|| ConfigError::UnknownAgent(name.to_string()))?;
        Ok(Self::new(name, factory.make))
    }

    #[must_use]
    pub fn is_human(&self) -> bool {
        is_human(&self.name)
    }

    /// Build a fresh agent for one seat.
    pub fn build(&self, ctx: AgentContext) -> Box<dyn Agent> {
        (self.make)(ctx)
    }
}

impl fmt::Debug for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entrant").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_names() {
        let names: Vec<&str> = registered_agents().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["random", "greedy", "heuristic", "mcts"]);
        assert!(by_name("mcts").is_some());
        assert!(by_name("human").is_none());
    }

    #[test]
    fn test_entrant_from_name() {
        assert_eq!(Entrant::from_name("greedy").unwrap().name, "greedy");
        assert!(Entrant::from_name("human2").unwrap().is_human());
        assert_eq!(
            Entrant::from_name("alphazero").unwrap_err(),
            ConfigError::UnknownAgent("alphazero".to_string())
        );
    }
}
