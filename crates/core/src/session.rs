//! An editing session: one view definition, its history, and its state id.
//!
//! The session is the single owner of its [`UndoManager`] and
//! [`ViewDefinition`]; every operation completes before returning, so no
//! partially applied edit is ever observable.

use crate::command::Command;
use crate::command_factory::CommandFactory;
use crate::editor_state::ViewEditorState;
use crate::error::CoreError;
use crate::types::StateId;
use crate::undo_manager::UndoManager;
use crate::view_definition::ViewDefinition;

#[derive(Debug, Clone)]
pub struct ViewEditor {
    state_id: StateId,
    undo_manager: UndoManager,
    view: ViewDefinition,
}

impl ViewEditor {
    /// A fresh session with an empty definition and no history.
    pub fn new(state_id: impl Into<StateId>) -> Self {
        Self {
            state_id: state_id.into(),
            undo_manager: UndoManager::new(),
            view: ViewDefinition::default(),
        }
    }

    /// Resume a persisted session. The history is loaded without being
    /// re-executed; the stored definition is taken as current.
    pub fn from_state(state: ViewEditorState) -> Self {
        let (state_id, undoables, view) = state.into_parts();
        let mut undo_manager = UndoManager::new();
        for undoable in undoables {
            undo_manager.add(undoable);
        }
        tracing::debug!(
            state_id = state_id.as_str(),
            history = undo_manager.to_array().len(),
            "Editor session restored"
        );
        Self {
            state_id,
            undo_manager,
            view,
        }
    }

    pub fn state_id(&self) -> &str {
        &self.state_id
    }

    pub fn view_definition(&self) -> &ViewDefinition {
        &self.view
    }

    pub fn undo_manager(&self) -> &UndoManager {
        &self.undo_manager
    }

    // -- Editing ------------------------------------------------------------

    /// Execute a user edit: apply it, pair the executed edit with its inverse,
    /// and record it. An edit that would leave the definition unchanged is
    /// rejected and not recorded.
    pub fn fire(&mut self, command: Command) -> Result<(), CoreError> {
        if !command.is_undoable() {
            return Err(CoreError::NotUndoable(command.id().to_string()));
        }
        let mut view = self.view.clone();
        let executed = command.apply(&mut view).ok_or_else(|| {
            CoreError::Validation(format!(
                "{} does not change view '{}'",
                command.name(),
                self.view.name()
            ))
        })?;
        let undoable = CommandFactory::create_undoable(executed)?;
        self.view = view;
        tracing::debug!(
            state_id = self.state_id.as_str(),
            command = undoable.redo_command().id(),
            "Command executed"
        );
        self.undo_manager.add(undoable);
        Ok(())
    }

    /// Undo the most recent edit. Returns the command that was executed.
    pub fn undo(&mut self) -> Result<Command, CoreError> {
        let command = self.undo_manager.pop_undo_command()?;
        if command.apply(&mut self.view).is_none() {
            tracing::warn!(
                state_id = self.state_id.as_str(),
                command = command.id(),
                "Undo left the view unchanged"
            );
        }
        tracing::debug!(
            state_id = self.state_id.as_str(),
            command = command.id(),
            "Undo executed"
        );
        Ok(command)
    }

    /// Redo the most recently undone edit. Returns the command that was
    /// executed.
    pub fn redo(&mut self) -> Result<Command, CoreError> {
        let command = self.undo_manager.pop_redo_command()?;
        if command.apply(&mut self.view).is_none() {
            tracing::warn!(
                state_id = self.state_id.as_str(),
                command = command.id(),
                "Redo left the view unchanged"
            );
        }
        tracing::debug!(
            state_id = self.state_id.as_str(),
            command = command.id(),
            "Redo executed"
        );
        Ok(command)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }

    pub fn undo_label(&self) -> String {
        self.undo_manager.undo_label()
    }

    pub fn redo_label(&self) -> String {
        self.undo_manager.redo_label()
    }

    /// Forget the history; the current definition is kept.
    pub fn clear_history(&mut self) {
        self.undo_manager.clear();
    }

    // -- Save / restore -----------------------------------------------------

    /// A complete, consistent snapshot for persistence.
    pub fn snapshot(&self) -> Result<ViewEditorState, CoreError> {
        ViewEditorState::new(
            self.state_id.clone(),
            self.undo_manager.to_array().to_vec(),
            self.view.clone(),
        )
    }

    /// Adopt a persisted state for this session. The state must belong to the
    /// same id; on rejection the session is left untouched.
    pub fn restore(&mut self, state: ViewEditorState) -> Result<(), CoreError> {
        if state.id() != self.state_id {
            tracing::warn!(
                state_id = self.state_id.as_str(),
                offered = state.id(),
                "Rejected restore of a foreign editor state"
            );
            return Err(CoreError::Validation(format!(
                "Editor state '{}' does not belong to session '{}'",
                state.id(),
                self.state_id
            )));
        }
        *self = Self::from_state(state);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
