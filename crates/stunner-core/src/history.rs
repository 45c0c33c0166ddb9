use crate::commands::Command;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Linear undo/redo stacks of executed commands
///
/// Executing a new command clears the redo stack. When the undo stack grows
/// past `limit` the oldest entry is dropped; a limit of 0 keeps everything.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandHistory {
    undo: Vec<Command>,
    redo: Vec<Command>,
    limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: Vec::new(),
            redo: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Record a freshly executed command
    pub fn record(&mut self, command: Command) {
        self.redo.clear();
        self.push_undo(command);
    }

    pub(crate) fn push_undo(&mut self, command: Command) {
        self.undo.push(command);
        if self.limit > 0 && self.undo.len() > self.limit {
            self.undo.remove(0);
        }
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Command> {
        self.undo.pop()
    }

    pub(crate) fn push_redo(&mut self, command: Command) {
        self.redo.push(command);
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Command> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recently executed command
    pub fn peek_undo(&self) -> Option<&Command> {
        self.undo.last()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::DeleteNode;

    fn command(uuid: &str) -> Command {
        Command::from(DeleteNode::new(uuid))
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = CommandHistory::default();
        history.record(command("a"));
        let undone = history.pop_undo().unwrap();
        history.push_redo(undone);
        assert!(history.can_redo());

        history.record(command("b"));

        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = CommandHistory::new(2);
        for uuid in ["a", "b", "c"] {
            history.record(command(uuid));
        }

        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.pop_undo(), Some(command("c")));
        assert_eq!(history.pop_undo(), Some(command("b")));
        assert_eq!(history.pop_undo(), None);
    }

    #[test]
    fn test_zero_limit_is_unbounded() {
        let mut history = CommandHistory::new(0);
        for index in 0..250 {
            history.record(command(&index.to_string()));
        }
        assert_eq!(history.undo_len(), 250);
    }
}
