//! Reversible edits of a view definition.
//!
//! A [`Command`] is an immutable, named, serializable description of one
//! edit. Its wire form is an envelope `{ "id": <command id>, "args": {...} }`
//! where `args` is the variant's payload. Decoding goes through
//! [`crate::command_factory::CommandFactory`], so an unknown id is rejected
//! instead of silently dropped.

pub mod object_id;
pub mod variants;
pub mod wire;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::command_factory::CommandFactory;
use crate::error::CoreError;
use crate::view_definition::ViewDefinition;

pub use variants::{
    ids, AddCompositionCommand, AddSourceCommand, AddSourcesCommand, RemoveCompositionCommand,
    RemoveSourceCommand, RemoveSourcesCommand, UpdateProjectedColumnsCommand,
    UpdateViewDescriptionCommand, UpdateViewNameCommand,
};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wire envelope of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub id: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// One edit of a view definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CommandEnvelope", into = "CommandEnvelope")]
pub enum Command {
    AddSource(AddSourceCommand),
    AddSources(AddSourcesCommand),
    RemoveSource(RemoveSourceCommand),
    RemoveSources(RemoveSourcesCommand),
    AddComposition(AddCompositionCommand),
    RemoveComposition(RemoveCompositionCommand),
    UpdateViewName(UpdateViewNameCommand),
    UpdateViewDescription(UpdateViewDescriptionCommand),
    UpdateProjectedColumns(UpdateProjectedColumnsCommand),
    /// Placeholder that does nothing and has no inverse.
    NoOp,
}

impl Command {
    /// Stable identifier of the command kind.
    pub fn id(&self) -> &'static str {
        match self {
            Command::AddSource(_) => ids::ADD_SOURCE,
            Command::AddSources(_) => ids::ADD_SOURCES,
            Command::RemoveSource(_) => ids::REMOVE_SOURCE,
            Command::RemoveSources(_) => ids::REMOVE_SOURCES,
            Command::AddComposition(_) => ids::ADD_COMPOSITION,
            Command::RemoveComposition(_) => ids::REMOVE_COMPOSITION,
            Command::UpdateViewName(_) => ids::UPDATE_VIEW_NAME,
            Command::UpdateViewDescription(_) => ids::UPDATE_VIEW_DESCRIPTION,
            Command::UpdateProjectedColumns(_) => ids::UPDATE_PROJECTED_COLUMNS,
            Command::NoOp => ids::NO_OP,
        }
    }

    /// Human-readable label, used in undo/redo tooltips.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddSource(_) => "Add Source",
            Command::AddSources(_) => "Add Sources",
            Command::RemoveSource(_) => "Remove Source",
            Command::RemoveSources(_) => "Remove Sources",
            Command::AddComposition(_) => "Add Composition",
            Command::RemoveComposition(_) => "Remove Composition",
            Command::UpdateViewName(_) => "Update View Name",
            Command::UpdateViewDescription(_) => "Update View Description",
            Command::UpdateProjectedColumns(_) => "Update Projected Columns",
            Command::NoOp => "No Op",
        }
    }

    /// Arguments in wire form. The map is built on every call; changing it
    /// does not affect the command.
    pub fn args(&self) -> Map<String, Value> {
        match self {
            Command::AddSource(c) => payload_args(c),
            Command::AddSources(c) => payload_args(c),
            Command::RemoveSource(c) => payload_args(c),
            Command::RemoveSources(c) => payload_args(c),
            Command::AddComposition(c) => payload_args(c),
            Command::RemoveComposition(c) => payload_args(c),
            Command::UpdateViewName(c) => payload_args(c),
            Command::UpdateViewDescription(c) => payload_args(c),
            Command::UpdateProjectedColumns(c) => payload_args(c),
            Command::NoOp => Map::new(),
        }
    }

    pub fn get_arg(&self, key: &str) -> Option<Value> {
        self.args().remove(key)
    }

    /// Whether the command can be paired with an inverse.
    pub fn is_undoable(&self) -> bool {
        !matches!(self, Command::NoOp)
    }

    /// Whether an argument is left out of the wire form. No current command
    /// has session-only arguments.
    pub fn is_transient(&self, _key: &str) -> bool {
        false
    }

    /// Identity shared by an add/remove pair, if the command carries one.
    pub fn object_id(&self) -> Option<&str> {
        let id = match self {
            Command::AddSource(c) => &c.object_id,
            Command::AddSources(c) => &c.object_id,
            Command::RemoveSource(c) => &c.object_id,
            Command::RemoveSources(c) => &c.object_id,
            Command::AddComposition(c) => &c.object_id,
            Command::RemoveComposition(c) => &c.object_id,
            Command::UpdateProjectedColumns(c) => &c.object_id,
            Command::UpdateViewName(_) | Command::UpdateViewDescription(_) | Command::NoOp => {
                return None
            }
        };
        (!id.is_empty()).then_some(id.as_str())
    }

    /// Wire envelope with transient arguments removed.
    pub fn to_envelope(&self) -> CommandEnvelope {
        let mut args = self.args();
        args.retain(|key, _| !self.is_transient(key));
        CommandEnvelope {
            id: self.id().to_string(),
            args,
        }
    }

    pub fn to_json(&self) -> Value {
        let envelope = self.to_envelope();
        let mut object = Map::new();
        object.insert("id".to_string(), Value::String(envelope.id));
        object.insert("args".to_string(), Value::Object(envelope.args));
        Value::Object(object)
    }

    /// Apply the edit to a view definition.
    ///
    /// Returns the edit as it was executed: positions filled in, source lists
    /// narrowed to the entries that actually changed, and `old*` values taken
    /// from the definition. Returns `None`, leaving the definition untouched,
    /// when the edit would change nothing.
    pub fn apply(&self, view: &mut ViewDefinition) -> Option<Command> {
        let executed = match self {
            Command::AddSource(c) => {
                let index = view.insert_source_path(c.source_path.clone(), c.position)?;
                Command::AddSource(AddSourceCommand {
                    position: Some(index),
                    ..c.clone()
                })
            }
            Command::AddSources(c) => {
                let mut pending: Vec<(Option<usize>, &String)> =
                    if c.positions.len() == c.source_paths.len() {
                        c.positions.iter().copied().map(Some).zip(&c.source_paths).collect()
                    } else {
                        c.source_paths.iter().map(|path| (None, path)).collect()
                    };
                // Ascending positions land each entry at its own index.
                pending.sort_by_key(|(position, _)| *position);

                let mut added = Vec::new();
                for (position, path) in pending {
                    if view.insert_source_path(path.clone(), position).is_some() {
                        added.push(path.clone());
                    }
                }
                if added.is_empty() {
                    return None;
                }
                let positions = added.iter().filter_map(|p| view.source_index(p)).collect();
                Command::AddSources(AddSourcesCommand {
                    source_paths: added,
                    positions,
                    object_id: c.object_id.clone(),
                })
            }
            Command::RemoveSource(c) => {
                let index = view.remove_source_path(&c.source_path)?;
                Command::RemoveSource(RemoveSourceCommand {
                    position: Some(index),
                    ..c.clone()
                })
            }
            Command::RemoveSources(c) => {
                let mut removed: Vec<String> = Vec::new();
                let mut positions = Vec::new();
                for path in &c.source_paths {
                    if removed.contains(path) {
                        continue;
                    }
                    if let Some(index) = view.source_index(path) {
                        removed.push(path.clone());
                        positions.push(index);
                    }
                }
                if removed.is_empty() {
                    return None;
                }
                for path in &removed {
                    view.remove_source_path(path);
                }
                Command::RemoveSources(RemoveSourcesCommand {
                    source_paths: removed,
                    positions,
                    object_id: c.object_id.clone(),
                })
            }
            Command::AddComposition(c) => {
                let index = view.insert_composition(c.composition.clone(), c.position);
                Command::AddComposition(AddCompositionCommand {
                    position: Some(index),
                    ..c.clone()
                })
            }
            Command::RemoveComposition(c) => {
                let index = view.remove_composition(&c.composition, c.position)?;
                Command::RemoveComposition(RemoveCompositionCommand {
                    position: Some(index),
                    ..c.clone()
                })
            }
            Command::UpdateViewName(c) => {
                let old = view.name().to_string();
                if old == c.new_name.as_deref().unwrap_or_default() {
                    return None;
                }
                view.set_name(c.new_name.as_deref());
                Command::UpdateViewName(UpdateViewNameCommand::new(
                    view.name(),
                    &old,
                ))
            }
            Command::UpdateViewDescription(c) => {
                let old = view.description().to_string();
                if old == c.new_description.as_deref().unwrap_or_default() {
                    return None;
                }
                view.set_description(c.new_description.as_deref());
                Command::UpdateViewDescription(UpdateViewDescriptionCommand::new(
                    view.description(),
                    &old,
                ))
            }
            Command::UpdateProjectedColumns(c) => {
                if view.projected_columns() == c.new_columns.as_slice() {
                    return None;
                }
                let old = view.projected_columns().to_vec();
                view.set_projected_columns(c.new_columns.clone());
                Command::UpdateProjectedColumns(UpdateProjectedColumnsCommand {
                    old_columns: old,
                    ..c.clone()
                })
            }
            Command::NoOp => return None,
        };
        Some(executed)
    }
}

fn payload_args<T: Serialize>(payload: &T) -> Map<String, Value> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.id(), Value::Object(self.args()))
    }
}

impl From<Command> for CommandEnvelope {
    fn from(command: Command) -> Self {
        command.to_envelope()
    }
}

impl TryFrom<CommandEnvelope> for Command {
    type Error = CoreError;

    fn try_from(envelope: CommandEnvelope) -> Result<Self, Self::Error> {
        CommandFactory::decode_envelope(envelope)
    }
}

macro_rules! impl_from_payload {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for Command {
                fn from(payload: $payload) -> Self {
                    Command::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    AddSourceCommand => AddSource,
    AddSourcesCommand => AddSources,
    RemoveSourceCommand => RemoveSource,
    RemoveSourcesCommand => RemoveSources,
    AddCompositionCommand => AddComposition,
    RemoveCompositionCommand => RemoveComposition,
    UpdateViewNameCommand => UpdateViewName,
    UpdateViewDescriptionCommand => UpdateViewDescription,
    UpdateProjectedColumnsCommand => UpdateProjectedColumns,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::composition::Composition;
    use crate::view_definition::ProjectedColumn;

    fn composition() -> Composition {
        Composition::new(
            "compositionName",
            "leftSourcePath",
            "rightSourcePath",
            "leftCriteriaCol",
            "rightCriteriaCol",
        )
    }

    // -- Contract -----------------------------------------------------------

    #[test]
    fn args_is_a_copy() {
        let cmd = Command::from(AddSourceCommand::new("connection=c/table=t"));
        let mut args = cmd.args();
        args.insert("addedSourceId".into(), Value::String("changed".into()));
        assert_eq!(
            cmd.get_arg("addedSourceId"),
            Some(Value::String("connection=c/table=t".into()))
        );
    }

    #[test]
    fn absent_optional_args_are_omitted() {
        let cmd = Command::from(UpdateViewNameCommand::new("newName", ""));
        let args = cmd.args();
        assert_eq!(args.len(), 1);
        assert!(!args.contains_key("oldName"));
        assert_eq!(cmd.get_arg("oldName"), None);
    }

    #[test]
    fn no_op_has_no_args_and_is_not_undoable() {
        assert!(Command::NoOp.args().is_empty());
        assert_eq!(Command::NoOp.get_arg("anything"), None);
        assert!(!Command::NoOp.is_undoable());
        assert!(Command::from(AddSourceCommand::new("a")).is_undoable());
    }

    #[test]
    fn structural_commands_carry_object_id() {
        let cmd = Command::from(AddCompositionCommand::new(composition()));
        let oid = cmd.object_id().unwrap().to_string();
        assert!(oid.starts_with(ids::ADD_COMPOSITION));
        assert_eq!(
            cmd.get_arg(object_id::OBJECT_ID_ARG),
            Some(Value::String(oid))
        );
        assert_eq!(
            Command::from(UpdateViewNameCommand::new("a", "b")).object_id(),
            None
        );
    }

    #[test]
    fn composition_key_appends_name_after_divider() {
        let cmd = RemoveCompositionCommand::with_object_id(composition(), "oid1");
        assert_eq!(cmd.composition_key(None), "oid1");
        assert_eq!(
            cmd.composition_key(Some(&composition())),
            "oid1][compositionName"
        );
    }

    // -- Wire form ----------------------------------------------------------

    #[test]
    fn composition_is_serialized_natively() {
        let cmd = Command::from(AddCompositionCommand::with_object_id(composition(), "oid"));
        let json = cmd.to_json();
        assert_eq!(json["id"], ids::ADD_COMPOSITION);
        assert_eq!(json["args"]["addedComposition"]["type"], "INNER_JOIN");
        assert_eq!(json["args"]["ObjectId"], "oid");
    }

    #[test]
    fn serde_and_to_json_agree() {
        let cmd = Command::from(UpdateProjectedColumnsCommand::new(
            vec![ProjectedColumn::new("id", "integer")],
            vec![],
        ));
        assert_eq!(serde_json::to_value(&cmd).unwrap(), cmd.to_json());
    }

    #[test]
    fn display_names_id_and_args() {
        let cmd = Command::from(RemoveSourceCommand {
            source_path: "a".into(),
            position: None,
            object_id: String::new(),
        });
        assert_eq!(cmd.to_string(), r#"RemoveSourceCommand {"removedSourceId":"a"}"#);
    }

    // -- Application --------------------------------------------------------

    #[test]
    fn apply_edits_the_definition() {
        let mut view = ViewDefinition::default();
        Command::from(UpdateViewNameCommand::new("v", "")).apply(&mut view);
        Command::from(AddSourcesCommand::new(vec!["a".into(), "b".into()])).apply(&mut view);
        Command::from(AddCompositionCommand::new(Composition::new("ab", "a", "b", "x", "y")))
            .apply(&mut view);
        assert_eq!(view.name(), "v");
        assert_eq!(view.source_paths(), ["a", "b"]);
        assert!(view.is_complete());

        Command::from(RemoveSourceCommand::new("b")).apply(&mut view);
        Command::from(UpdateViewDescriptionCommand::new("", "old")).apply(&mut view);
        assert_eq!(view.source_paths(), ["a"]);
        assert_eq!(view.description(), "");
    }

    #[test]
    fn apply_reports_edits_that_change_nothing() {
        let mut view = ViewDefinition::new("v").with_source_path("a");
        let start = view.clone();
        assert_eq!(Command::from(AddSourceCommand::new("a")).apply(&mut view), None);
        assert_eq!(Command::from(RemoveSourceCommand::new("x")).apply(&mut view), None);
        assert_eq!(
            Command::from(RemoveCompositionCommand::new(composition())).apply(&mut view),
            None
        );
        assert_eq!(Command::from(UpdateViewNameCommand::new("v", "")).apply(&mut view), None);
        assert_eq!(Command::NoOp.apply(&mut view), None);
        assert_eq!(view, start);
    }

    #[test]
    fn executed_edit_records_positions_and_narrows_lists() {
        let mut view = ViewDefinition::new("v")
            .with_source_path("a")
            .with_source_path("b")
            .with_source_path("c");

        let executed = Command::from(RemoveSourceCommand::new("b")).apply(&mut view);
        assert_matches!(
            executed,
            Some(Command::RemoveSource(c)) if c.position == Some(1)
        );

        let executed =
            Command::from(AddSourcesCommand::new(vec!["a".into(), "d".into()])).apply(&mut view);
        assert_matches!(
            executed,
            Some(Command::AddSources(c)) if c.source_paths == ["d"] && c.positions == [2]
        );
        assert_eq!(view.source_paths(), ["a", "c", "d"]);
    }

    #[test]
    fn executed_rename_takes_old_value_from_the_definition() {
        let mut view = ViewDefinition::new("actual");
        let executed = Command::from(UpdateViewNameCommand::new("new", "stale")).apply(&mut view);
        assert_eq!(
            executed,
            Some(Command::from(UpdateViewNameCommand::new("new", "actual")))
        );
    }

    #[test]
    fn positions_are_written_only_when_known() {
        let cmd = Command::from(RemoveSourceCommand::new("a"));
        assert_eq!(cmd.get_arg("removedSourceIndex"), None);

        let mut view = ViewDefinition::new("v").with_source_path("z").with_source_path("a");
        let executed = cmd.apply(&mut view).unwrap();
        assert_eq!(executed.get_arg("removedSourceIndex"), Some(Value::from(1)));
    }
}
