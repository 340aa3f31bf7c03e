//! Cursor-based undo/redo history.
//!
//! The history is kept as two ordered stacks: `done` (oldest first, the last
//! entry is the next to undo) and `undone` (the last entry is the next to
//! redo). Adding an entry discards the `undone` stack.

use crate::command::Command;
use crate::error::CoreError;
use crate::undoable::Undoable;

/// Prefix of the undo tooltip.
pub const UNDO_LABEL_PREFIX: &str = "Undo";

/// Prefix of the redo tooltip.
pub const REDO_LABEL_PREFIX: &str = "Redo";

#[derive(Debug, Clone, Default)]
pub struct UndoManager {
    done: Vec<Undoable>,
    undone: Vec<Undoable>,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an applied edit. Any pending redo entries are discarded.
    pub fn add(&mut self, undoable: Undoable) {
        self.undone.clear();
        self.done.push(undoable);
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// The command that would undo the most recent edit.
    pub fn peek_undo_command(&self) -> Result<&Command, CoreError> {
        self.done
            .last()
            .map(Undoable::undo_command)
            .ok_or(CoreError::NothingToUndo)
    }

    /// The command that would redo the most recently undone edit.
    pub fn peek_redo_command(&self) -> Result<&Command, CoreError> {
        self.undone
            .last()
            .map(Undoable::redo_command)
            .ok_or(CoreError::NothingToRedo)
    }

    /// Step back one edit and return the command to execute.
    pub fn pop_undo_command(&mut self) -> Result<Command, CoreError> {
        let undoable = self.done.pop().ok_or(CoreError::NothingToUndo)?;
        let command = undoable.undo_command().clone();
        self.undone.push(undoable);
        Ok(command)
    }

    /// Step forward one edit and return the command to execute.
    pub fn pop_redo_command(&mut self) -> Result<Command, CoreError> {
        let undoable = self.undone.pop().ok_or(CoreError::NothingToRedo)?;
        let command = undoable.redo_command().clone();
        self.done.push(undoable);
        Ok(command)
    }

    /// Drop the whole history, both directions.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    pub fn undo_label(&self) -> String {
        label(UNDO_LABEL_PREFIX, self.peek_undo_command().ok())
    }

    pub fn redo_label(&self) -> String {
        label(REDO_LABEL_PREFIX, self.peek_redo_command().ok())
    }

    /// Applied history, oldest first. Pending redo entries are not included.
    pub fn to_array(&self) -> &[Undoable] {
        &self.done
    }

    /// Number of pending redo entries.
    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }
}

fn label(prefix: &str, command: Option<&Command>) -> String {
    match command {
        Some(command) => format!("{prefix} {}", command.name()),
        None => prefix.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
