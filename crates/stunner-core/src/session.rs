//! Editing sessions
//!
//! An [`EditorSession`] owns one diagram, the rules it is edited under and
//! its command history. All edits go through the session so undo and redo
//! stay linear, and so a save in progress can fence off further edits.

use std::time::Instant;

use stunner_core_types::{CommandId, SessionId};

use crate::apply::{apply, check, revert};
use crate::commands::{Command, CommandResult};
use crate::errors::{Result, StunnerError};
use crate::history::CommandHistory;
use crate::model::{Diagram, DiagramMetadata};
use crate::ops::Graph;
use crate::rules::{error_count, validate_diagram, validate_graph, RuleSet, RuleViolation};
use crate::snapshot::compute_diagram_digest;
use crate::{log_op_end, log_op_error, log_op_start};

pub struct EditorSession {
    id: SessionId,
    diagram: Diagram,
    rules: RuleSet,
    history: CommandHistory,
    saved_digest: String,
    saving: bool,
}

impl EditorSession {
    /// Open a session over a loaded diagram
    ///
    /// The diagram as given is the clean state for dirty tracking.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the diagram cannot be digested.
    pub fn open(diagram: Diagram, rules: RuleSet, history_limit: usize) -> Result<Self> {
        let saved_digest = compute_diagram_digest(&diagram)?;
        let id = SessionId::new();
        tracing::debug!(
            session_id = id.as_str(),
            diagram_id = diagram.id(),
            "session opened"
        );
        Ok(Self {
            id,
            diagram,
            rules,
            history: CommandHistory::new(history_limit),
            saved_digest,
            saving: false,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn graph(&self) -> &Graph {
        &self.diagram.graph
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    fn ensure_idle(&self, op: &str) -> Result<()> {
        if self.saving {
            return Err(StunnerError::SessionBusy {
                session_id: self.id.to_string(),
                reason: format!("{} rejected while a save is in progress", op),
            });
        }
        Ok(())
    }

    /// Evaluate a command's rules without applying it
    ///
    /// # Errors
    ///
    /// Returns the command's resolution error.
    pub fn check(&self, command: &Command) -> Result<CommandResult> {
        check(&self.diagram.graph, &self.rules, command)
    }

    /// Execute a command and record it for undo
    ///
    /// A command blocked by an error violation is not recorded.
    ///
    /// # Errors
    ///
    /// Returns `SessionBusy` during a save, or the command's error.
    pub fn execute(&mut self, mut command: Command) -> Result<CommandResult> {
        self.ensure_idle("execute")?;
        let command_id = CommandId::new();
        tracing::debug!(
            session_id = self.id.as_str(),
            command_id = command_id.as_str(),
            command = command.name(),
            "session execute"
        );

        let result = apply(&mut self.diagram.graph, &self.rules, &mut command)?;
        if !result.is_error() {
            self.history.record(command);
        }
        Ok(result)
    }

    /// Undo the most recent command
    ///
    /// If the inverse is rejected the command stays on the undo stack.
    ///
    /// # Errors
    ///
    /// Returns `NothingToUndo`, `SessionBusy`, or the inverse command's error.
    pub fn undo(&mut self) -> Result<CommandResult> {
        self.ensure_idle("undo")?;
        let mut command = self.history.pop_undo().ok_or(StunnerError::NothingToUndo)?;

        match revert(&mut self.diagram.graph, &self.rules, &mut command) {
            Ok(result) if !result.is_error() => {
                self.history.push_redo(command);
                Ok(result)
            }
            outcome => {
                self.history.push_undo(command);
                outcome
            }
        }
    }

    /// Re-execute the most recently undone command
    ///
    /// # Errors
    ///
    /// Returns `NothingToRedo`, `SessionBusy`, or the command's error.
    pub fn redo(&mut self) -> Result<CommandResult> {
        self.ensure_idle("redo")?;
        let mut command = self.history.pop_redo().ok_or(StunnerError::NothingToRedo)?;

        match apply(&mut self.diagram.graph, &self.rules, &mut command) {
            Ok(result) if !result.is_error() => {
                self.history.push_undo(command);
                Ok(result)
            }
            outcome => {
                self.history.push_redo(command);
                outcome
            }
        }
    }

    /// True when the diagram differs from its last loaded or saved state
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the diagram cannot be digested.
    pub fn is_dirty(&self) -> Result<bool> {
        Ok(compute_diagram_digest(&self.diagram)? != self.saved_digest)
    }

    /// Graph integrity plus whole-diagram rule violations
    ///
    /// # Errors
    ///
    /// Returns the first integrity error (dangling endpoint, adjacency
    /// mismatch, multiple parents, containment cycle).
    pub fn validate(&self) -> Result<Vec<RuleViolation>> {
        validate_graph(&self.diagram.graph)?;
        Ok(validate_diagram(&self.rules, &self.diagram.graph))
    }

    /// Validate and fence the session for saving
    ///
    /// Returns the diagram to persist. Error violations block the save;
    /// warnings do not. Edits are rejected until [`EditorSession::end_save`].
    ///
    /// # Errors
    ///
    /// Returns `SessionBusy` if a save is already running, `DiagramInvalid`
    /// when validation finds error violations, or an integrity error.
    pub fn begin_save(&mut self) -> Result<Diagram> {
        let start = Instant::now();
        log_op_start!("begin_save", session_id = self.id.as_str());

        let outcome = self.ensure_idle("begin_save").and_then(|()| {
            let violations = self.validate()?;
            let errors = error_count(&violations);
            if errors > 0 {
                return Err(StunnerError::DiagramInvalid {
                    error_count: errors,
                });
            }
            Ok(violations.len())
        });

        match outcome {
            Ok(warnings) => {
                self.saving = true;
                log_op_end!(
                    "begin_save",
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str(),
                    violation_count = warnings
                );
                Ok(self.diagram.snapshot())
            }
            Err(err) => {
                log_op_error!(
                    "begin_save",
                    &err,
                    duration_ms = start.elapsed().as_millis() as u64,
                    session_id = self.id.as_str()
                );
                Err(err)
            }
        }
    }

    /// Release the save fence
    ///
    /// Pass the stored metadata (with its bumped version) when the save
    /// succeeded; the current state then becomes the clean state. `None`
    /// behaves like [`EditorSession::abort_save`].
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if the diagram cannot be digested.
    pub fn end_save(&mut self, saved: Option<DiagramMetadata>) -> Result<()> {
        self.saving = false;
        if let Some(metadata) = saved {
            self.diagram.metadata = metadata;
            self.saved_digest = compute_diagram_digest(&self.diagram)?;
        }
        tracing::debug!(session_id = self.id.as_str(), "save fence released");
        Ok(())
    }

    /// Release the save fence after a failed save, keeping the clean state
    pub fn abort_save(&mut self) {
        self.saving = false;
        tracing::debug!(session_id = self.id.as_str(), "save aborted");
    }
}
