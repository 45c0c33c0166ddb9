use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{CheckContext, Command, CommandResult, GraphCommand, GraphCommandContext};
use crate::errors::{Result, StunnerError};

/// Ordered list of commands executed as one unit
///
/// Checking simulates the whole sequence on a scratch copy of the graph, so
/// later commands are checked against the effects of earlier ones. If a
/// child fails during execution, the children already executed are undone
/// in reverse order before the failure is returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeCommand {
    pub commands: Vec<Command>,
    #[serde(skip)]
    executed: bool,
}

impl CompositeCommand {
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands,
            executed: false,
        }
    }

    fn rollback(&mut self, ctx: &mut GraphCommandContext<'_>, executed: usize) {
        for command in self.commands[..executed].iter_mut().rev() {
            match command.undo(ctx) {
                Ok(result) if !result.is_error() => {}
                Ok(result) => warn!(
                    command = command.name(),
                    violation_count = result.violations().len(),
                    "rollback step rejected"
                ),
                Err(err) => warn!(command = command.name(), error = %err, "rollback step failed"),
            }
        }
    }

    /// Re-execute the `undone` trailing children after an undo failed midway
    fn reapply(&mut self, ctx: &mut GraphCommandContext<'_>, undone: usize) {
        let start = self.commands.len() - undone;
        let mut ctx = ctx.unchecked();
        for command in self.commands[start..].iter_mut() {
            match command.execute(&mut ctx) {
                Ok(result) if !result.is_error() => {}
                Ok(_) => warn!(command = command.name(), "reapply step rejected"),
                Err(err) => warn!(command = command.name(), error = %err, "reapply step failed"),
            }
        }
    }
}

impl GraphCommand for CompositeCommand {
    fn check(&self, ctx: &CheckContext<'_>) -> Result<CommandResult> {
        let mut scratch = ctx.graph().clone();
        let mut scratch_ctx = ctx.simulate(&mut scratch);

        let mut builder = CommandResult::builder();
        for command in &self.commands {
            let result = command.clone().execute(&mut scratch_ctx)?;
            let failed = result.is_error();
            builder = builder.merge(result);
            if failed {
                break;
            }
        }
        Ok(builder.build())
    }

    fn execute(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        let result = self.check(&ctx.checking())?;
        if result.is_error() {
            return Ok(result);
        }

        for index in 0..self.commands.len() {
            match self.commands[index].execute(ctx) {
                Ok(step) if !step.is_error() => {}
                outcome => {
                    self.rollback(ctx, index);
                    return outcome;
                }
            }
        }
        self.executed = true;
        Ok(result)
    }

    fn undo(&mut self, ctx: &mut GraphCommandContext<'_>) -> Result<CommandResult> {
        if !self.executed {
            return Err(StunnerError::CommandNotExecuted {
                command: "composite".to_string(),
            });
        }

        let mut builder = CommandResult::builder();
        let total = self.commands.len();
        for undone in 0..total {
            let index = total - 1 - undone;
            match self.commands[index].undo(ctx) {
                Ok(step) if !step.is_error() => builder = builder.merge(step),
                outcome => {
                    self.reapply(ctx, undone);
                    return outcome;
                }
            }
        }
        self.executed = false;
        Ok(builder.build())
    }
}
