//! Supervised agent workers.
//!
//! Each seat's agent lives on its own thread and is driven over a command
//! channel. A decision request carries a fresh reply channel. The worker
//! first reports that it has started on the request, then sends the answer.
//! The turn budget runs from the start report, so a request queued behind an
//! abandoned decision is not charged for the time the old call still takes.
//! When the budget runs out the arena stops listening; whatever the agent
//! answers later goes nowhere.
//!
//! Observation commands are fire-and-forget. They queue behind a decision
//! that is still running, so an agent always sees updates in match order.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

use crate::agents::Agent;
use crate::core::{ActionIndex, BoardState, PlayerId};
use crate::error::AgentError;

/// What a seat answered: an action index or the fault it raised.
pub type Decision = Result<ActionIndex, AgentError>;

enum Reply {
    Started,
    Decided(Decision),
}

enum Command {
    Decide {
        state: BoardState,
        reply: Sender<Reply>,
    },
    Observe {
        state: BoardState,
        player: PlayerId,
        action: ActionIndex,
    },
}

/// Handle to one seat's worker thread.
pub struct SeatWorker {
    seat: PlayerId,
    commands: Option<Sender<Command>>,
    handle: Option<JoinHandle<()>>,
    /// A decision was given up on; the thread may never return.
    abandoned: bool,
}

impl SeatWorker {
    /// Move `agent` onto a new worker thread.
    ///
    /// If the thread cannot be started the seat is dead from the outset and
    /// every decision reports [`AgentError::Crashed`].
    pub fn spawn(seat: PlayerId, name: &str, agent: Box<dyn Agent>) -> Self {
        let (tx, rx) = mpsc::channel::<Command>();
        let spawned = thread::Builder::new()
            .name(format!("seat-{}-{}", seat.index(), name))
            .spawn(move || run_agent(agent, rx));

        match spawned {
            Ok(handle) => Self {
                seat,
                commands: Some(tx),
                handle: Some(handle),
                abandoned: false,
            },
            Err(err) => {
                warn!(%seat, error = %err, "failed to start agent worker");
                Self {
                    seat,
                    commands: None,
                    handle: None,
                    abandoned: false,
                }
            }
        }
    }

    /// Ask for a decision on `state`.
    ///
    /// The worker gets up to `start_limit` to pick the request up and then
    /// `budget` to answer it. Missing the first limit means an abandoned
    /// decision is still running and reports [`AgentError::Stalled`].
    pub fn decide(&mut self, state: &BoardState, budget: Duration, start_limit: Duration) -> Decision {
        let Some(commands) = &self.commands else {
            return Err(AgentError::Crashed);
        };

        let (reply, answer) = mpsc::channel();
        let request = Command::Decide {
            state: state.clone(),
            reply,
        };
        if commands.send(request).is_err() {
            self.commands = None;
            return Err(AgentError::Crashed);
        }

        match answer.recv_timeout(start_limit) {
            Ok(Reply::Started) => {}
            Ok(Reply::Decided(_)) | Err(RecvTimeoutError::Disconnected) => {
                self.commands = None;
                return Err(AgentError::Crashed);
            }
            Err(RecvTimeoutError::Timeout) => {
                self.abandoned = true;
                return Err(AgentError::Stalled(start_limit));
            }
        }

        match answer.recv_timeout(budget) {
            Ok(Reply::Decided(decision)) => {
                self.abandoned = false;
                decision
            }
            Ok(Reply::Started) | Err(RecvTimeoutError::Disconnected) => {
                self.commands = None;
                Err(AgentError::Crashed)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.abandoned = true;
                Err(AgentError::Timeout(budget))
            }
        }
    }

    /// Forward an applied action without waiting.
    pub fn observe(&mut self, state: &BoardState, player: PlayerId, action: ActionIndex) {
        let Some(commands) = &self.commands else {
            return;
        };
        let update = Command::Observe {
            state: state.clone(),
            player,
            action,
        };
        if commands.send(update).is_err() {
            self.commands = None;
        }
    }

    /// Whether the worker can still take requests.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.commands.is_some()
    }
}

impl Drop for SeatWorker {
    fn drop(&mut self) {
        // Closing the channel ends the worker's loop.
        self.commands = None;
        let Some(handle) = self.handle.take() else {
            return;
        };
        if self.abandoned {
            debug!(seat = %self.seat, "detaching worker with an abandoned decision");
            return;
        }
        if handle.join().is_err() {
            warn!(seat = %self.seat, "agent worker exited with a panic");
        }
    }
}

fn run_agent(mut agent: Box<dyn Agent>, commands: mpsc::Receiver<Command>) {
    for command in commands {
        match command {
            Command::Decide { state, reply } => {
                if reply.send(Reply::Started).is_err() {
                    debug!("skipping a decision nobody is waiting for");
                    continue;
                }
                let decision = panic::catch_unwind(AssertUnwindSafe(|| agent.decide(&state)))
                    .unwrap_or_else(|payload| Err(AgentError::Panicked(panic_message(&*payload))));
                if reply.send(Reply::Decided(decision)).is_err() {
                    warn!("late decision discarded");
                }
            }
            Command::Observe {
                state,
                player,
                action,
            } => {
                let observed = panic::catch_unwind(AssertUnwindSafe(|| {
                    agent.on_action_applied(&state, player, action)
                }));
                if let Err(payload) = observed {
                    warn!(%player, action, panic = %panic_message(&*payload), "agent panicked while observing");
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
