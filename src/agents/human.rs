//! Console player.
//!
//! Prints the board and the main legal moves, then reads an action index.
//! `+` lists every legal move. Anything else that is not a legal index is
//! rejected and the prompt repeats.
//!
//! A read cannot be interrupted. When a human runs out of turn budget, their
//! worker stays blocked on the console, and the next line typed answers that
//! abandoned prompt. The answer is logged and discarded, and the player is
//! prompted again for the current turn. With two console players, that line
//! may have been meant for the other seat, so human-only matches want a
//! generous `--turn-budget-secs`.

use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

use super::{Agent, AgentContext};
use crate::core::action::{
    BUY, BUY_RESERVED, RESERVE, RESERVE_BLIND, RETURN, TAKE_DOUBLE, TAKE_ONE, TAKE_THREE, TAKE_TWO,
};
use crate::core::{ActionIndex, ActionMask, BoardState, PlayerId};
use crate::error::AgentError;
use crate::facade::GameFacade;

/// Console player on the process's stdin and stdout.
pub type StdioHuman = HumanAgent<BufReader<Stdin>, Stdout>;

pub struct HumanAgent<R, W> {
    facade: GameFacade,
    player_id: PlayerId,
    input: R,
    output: W,
}

impl StdioHuman {
    pub const NAME: &'static str = "human";

    /// Human at the process console.
    pub fn stdio(ctx: AgentContext) -> Self {
        Self::new(ctx, BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(ctx: AgentContext, input: R, output: W) -> Self {
        Self {
            facade: ctx.facade,
            player_id: ctx.player_id,
            input,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    fn show_all_moves(&mut self, legal: ActionMask) -> io::Result<()> {
        let mut last_group = None;
        for action in legal.iter() {
            let group = action / 5;
            if last_group.is_some() && last_group != Some(group) {
                writeln!(self.output)?;
            }
            last_group = Some(group);
            write!(self.output, "[{}] {:<24}", action, self.facade.move_to_string(action))?;
        }
        writeln!(self.output)
    }

    /// Buys, takes of the widest class available, and returns when over
    /// the limit. Reserves are summarised on one line.
    fn show_main_moves(&mut self, state: &BoardState, legal: ActionMask) -> io::Result<()> {
        let can_take = if legal.any_in(TAKE_THREE) {
            3
        } else if legal.any_in(TAKE_TWO) {
            2
        } else if legal.any_in(TAKE_ONE) {
            1
        } else {
            0
        };
        let must_discard = self.facade.must_discard(state, self.player_id);

        writeln!(self.output, "{}", state)?;
        writeln!(self.output, "{} to move", self.player_id)?;
        if legal.any_in(RESERVE.start..RESERVE_BLIND.end) {
            writeln!(self.output, "{}-{} = reserve", RESERVE.start, RESERVE_BLIND.end - 1)?;
        }

        let shown = legal.iter().filter(|&a| {
            BUY.contains(&a)
                || BUY_RESERVED.contains(&a)
                || (TAKE_ONE.contains(&a) && can_take <= 1)
                || (TAKE_TWO.contains(&a) && can_take <= 2)
                || TAKE_THREE.contains(&a)
                || TAKE_DOUBLE.contains(&a)
                || (RETURN.contains(&a) && must_discard)
        });
        for action in shown {
            writeln!(self.output, "{} = {}", action, self.facade.move_to_string(action))?;
        }
        writeln!(self.output, "([+] to show all moves)")?;
        self.output.flush()
    }
}

impl<R: BufRead + Send, W: Write + Send> Agent for HumanAgent<R, W> {
    fn decide(&mut self, state: &BoardState) -> Result<ActionIndex, AgentError> {
        let legal = self.facade.valid_moves(state, self.player_id);
        self.show_main_moves(state, legal)?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AgentError::Io("input closed".into()));
            }
            let entry = line.trim();
            if entry == "+" {
                self.show_all_moves(legal)?;
                continue;
            }
            match entry.parse::<ActionIndex>() {
                Ok(action) if legal.contains(action) => return Ok(action),
                _ => {
                    writeln!(self.output, "Invalid move: {}", entry)?;
                    self.output.flush()?;
                }
            }
        }
    }
}
