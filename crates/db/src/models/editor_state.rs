//! View editor state entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use vieweditor_core::editor_state::ViewEditorState;
use vieweditor_core::error::CoreError;
use vieweditor_core::types::Timestamp;

/// A row from the `view_editor_states` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorStateRow {
    pub id: String,
    pub state_json: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl EditorStateRow {
    /// Decode the stored state. The row's key must match the state's own id.
    pub fn to_state(&self) -> Result<ViewEditorState, CoreError> {
        let state = ViewEditorState::create(&self.state_json)?;
        if state.id() != self.id {
            return Err(CoreError::Validation(format!(
                "Stored state id '{}' does not match row id '{}'",
                state.id(),
                self.id
            )));
        }
        Ok(state)
    }
}

/// Summary of a stored state, without its history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EditorStateSummary {
    pub id: String,
    pub view_name: Option<String>,
    pub history_length: i32,
    pub updated_at: Timestamp,
}

/// DTO for saving (upserting) a complete editor state.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveEditorState {
    pub id: String,
    pub state_json: serde_json::Value,
}

impl From<&ViewEditorState> for SaveEditorState {
    fn from(state: &ViewEditorState) -> Self {
        Self {
            id: state.id().to_string(),
            state_json: state.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use vieweditor_core::view_definition::ViewDefinition;

    use super::*;

    fn row(id: &str, state_json: serde_json::Value) -> EditorStateRow {
        EditorStateRow {
            id: id.to_string(),
            state_json,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn save_dto_round_trips_through_a_row() {
        let state = ViewEditorState::new(
            "virt1vdb.view",
            vec![],
            ViewDefinition::new("v").with_source_path("a"),
        )
        .unwrap();
        let dto = SaveEditorState::from(&state);
        assert_eq!(dto.id, "virt1vdb.view");

        let loaded = row(&dto.id, dto.state_json).to_state().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn mismatched_row_id_is_rejected() {
        let json = serde_json::json!({"id": "a", "undoables": []});
        assert_matches!(row("b", json).to_state(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn corrupt_history_is_rejected() {
        let json = serde_json::json!({
            "id": "a",
            "undoables": [{"undo": {"id": "Unknown"}, "redo": {"id": "NoOpCommand"}}]
        });
        assert_matches!(row("a", json).to_state(), Err(CoreError::Decode(_)));
    }
}
