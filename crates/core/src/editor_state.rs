//! The persisted aggregate of an editing session.
//!
//! Wire form:
//!
//! ```json
//! { "id": "virt1vdb.view", "undoables": [ {"undo": ..., "redo": ...} ], "viewDefinition": {...} }
//! ```
//!
//! The `viewDefinition` is authoritative; the decoded history is restored for
//! undo but never re-executed on load.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::StateId;
use crate::undoable::Undoable;
use crate::view_definition::ViewDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEditorState {
    id: StateId,
    #[serde(default)]
    undoables: Vec<Undoable>,
    #[serde(default)]
    view_definition: ViewDefinition,
}

impl ViewEditorState {
    pub fn new(
        id: impl Into<StateId>,
        undoables: Vec<Undoable>,
        view_definition: ViewDefinition,
    ) -> Result<Self, CoreError> {
        let state = Self {
            id: id.into(),
            undoables,
            view_definition,
        };
        state.validate()?;
        Ok(state)
    }

    /// Decode a complete state. Any malformed history entry rejects the
    /// whole state.
    pub fn create(json: &Value) -> Result<Self, CoreError> {
        let state: Self = serde_json::from_value(json.clone())?;
        state.validate()?;
        Ok(state)
    }

    /// Parse a state from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        let state: Self = serde_json::from_str(text)?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "undoables": self.undoables.iter().map(Undoable::to_json).collect::<Vec<_>>(),
            "viewDefinition": serde_json::to_value(&self.view_definition)
                .unwrap_or(Value::Null),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn undoables(&self) -> &[Undoable] {
        &self.undoables
    }

    pub fn view_definition(&self) -> &ViewDefinition {
        &self.view_definition
    }

    pub fn into_parts(self) -> (StateId, Vec<Undoable>, ViewDefinition) {
        (self.id, self.undoables, self.view_definition)
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Editor state id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::command::AddSourceCommand;
    use crate::command_factory::CommandFactory;

    fn state() -> ViewEditorState {
        let undoable = CommandFactory::create_undoable(AddSourceCommand::new("a").into()).unwrap();
        ViewEditorState::new(
            "virt1vdb.view",
            vec![undoable],
            ViewDefinition::new("v").with_source_path("a"),
        )
        .unwrap()
    }

    #[test]
    fn to_json_and_create_are_inverse() {
        let original = state();
        let restored = ViewEditorState::create(&original.to_json()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn serde_matches_to_json() {
        let original = state();
        assert_eq!(serde_json::to_value(&original).unwrap(), original.to_json());
    }

    #[test]
    fn empty_id_is_rejected() {
        assert_matches!(
            ViewEditorState::new(" ", vec![], ViewDefinition::default()),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            ViewEditorState::create(&json!({"id": "", "undoables": []})),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn one_bad_entry_rejects_the_whole_state() {
        let json = json!({
            "id": "s",
            "undoables": [
                {"undo": {"id": "NoOpCommand"}, "redo": {"id": "NoOpCommand"}},
                {"undo": {"id": "Bogus", "args": {}}, "redo": {"id": "NoOpCommand"}}
            ],
            "viewDefinition": {"viewName": "v"}
        });
        assert_matches!(ViewEditorState::create(&json), Err(CoreError::Decode(msg)) if msg.contains("Bogus"));
    }

    #[test]
    fn missing_history_and_definition_default_to_empty() {
        let state = ViewEditorState::from_json_str(r#"{"id":"s"}"#).unwrap();
        assert!(state.undoables().is_empty());
        assert_eq!(state.view_definition(), &ViewDefinition::default());
    }
}
