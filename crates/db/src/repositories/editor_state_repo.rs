//! Repository for the `view_editor_states` table.

use sqlx::PgPool;
use vieweditor_core::editor_state::ViewEditorState;
use vieweditor_core::error::CoreError;

use crate::models::editor_state::{EditorStateRow, EditorStateSummary, SaveEditorState};
use crate::DbError;

/// Column list for `view_editor_states` queries.
const COLUMNS: &str = "id, state_json, created_at, updated_at";

/// Provides save/restore operations for persisted editor sessions.
pub struct EditorStateRepo;

impl EditorStateRepo {
    /// Get the stored row for a state id, or `None` if nothing was saved yet.
    pub async fn get_state(pool: &PgPool, id: &str) -> Result<Option<EditorStateRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM view_editor_states WHERE id = $1");
        sqlx::query_as::<_, EditorStateRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load and decode a complete state. Fails with `NotFound` when absent
    /// and with a decode error if any part of the stored state is invalid.
    pub async fn load_state(pool: &PgPool, id: &str) -> Result<ViewEditorState, DbError> {
        let row = Self::get_state(pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "ViewEditorState",
                id: id.to_string(),
            })?;
        let state = row.to_state()?;
        tracing::info!(
            state_id = id,
            history = state.undoables().len(),
            "Editor state loaded"
        );
        Ok(state)
    }

    /// Upsert a complete state snapshot in a single statement.
    pub async fn save_state(
        pool: &PgPool,
        input: &SaveEditorState,
    ) -> Result<EditorStateRow, sqlx::Error> {
        let sql = format!(
            "INSERT INTO view_editor_states (id, state_json) \
             VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET state_json = EXCLUDED.state_json \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, EditorStateRow>(&sql)
            .bind(&input.id)
            .bind(&input.state_json)
            .fetch_one(pool)
            .await?;

        tracing::info!(state_id = input.id.as_str(), "Editor state saved");
        Ok(row)
    }

    /// Delete a stored state. Returns `true` if a row was deleted.
    pub async fn delete_state(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM view_editor_states WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List stored states, most recently updated first.
    pub async fn list_states(pool: &PgPool) -> Result<Vec<EditorStateSummary>, sqlx::Error> {
        sqlx::query_as::<_, EditorStateSummary>(
            "SELECT id, \
                    state_json -> 'viewDefinition' ->> 'viewName' AS view_name, \
                    COALESCE(jsonb_array_length(state_json -> 'undoables'), 0)::INT4 AS history_length, \
                    updated_at \
             FROM view_editor_states ORDER BY updated_at DESC",
        )
        .fetch_all(pool)
        .await
    }
}
