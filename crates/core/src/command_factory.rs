//! Decoding of wire commands and derivation of inverse commands.

use serde_json::{Map, Value};

use crate::command::{
    ids, AddCompositionCommand, AddSourceCommand, AddSourcesCommand, Command, CommandEnvelope,
    RemoveCompositionCommand, RemoveSourceCommand, RemoveSourcesCommand,
    UpdateProjectedColumnsCommand, UpdateViewDescriptionCommand, UpdateViewNameCommand,
};
use crate::error::CoreError;
use crate::undoable::{Undoable, UndoableJson};

/// Builds live commands and undoables from their wire form.
pub struct CommandFactory;

impl CommandFactory {
    /// Decode a command from `{ "id": ..., "args": {...} }`.
    ///
    /// Fails with [`CoreError::Decode`] on an unknown id or malformed args.
    pub fn decode(json: &Value) -> Result<Command, CoreError> {
        let envelope: CommandEnvelope = serde_json::from_value(json.clone())?;
        Self::decode_envelope(envelope)
    }

    /// Dispatch an already-parsed envelope to its command variant.
    pub fn decode_envelope(envelope: CommandEnvelope) -> Result<Command, CoreError> {
        let CommandEnvelope { id, args } = envelope;
        let command = match id.as_str() {
            ids::ADD_SOURCE => Command::AddSource(payload::<AddSourceCommand>(&id, args)?),
            ids::ADD_SOURCES => Command::AddSources(payload::<AddSourcesCommand>(&id, args)?),
            ids::REMOVE_SOURCE => {
                Command::RemoveSource(payload::<RemoveSourceCommand>(&id, args)?)
            }
            ids::REMOVE_SOURCES => {
                Command::RemoveSources(payload::<RemoveSourcesCommand>(&id, args)?)
            }
            ids::ADD_COMPOSITION => {
                Command::AddComposition(payload::<AddCompositionCommand>(&id, args)?)
            }
            ids::REMOVE_COMPOSITION => {
                Command::RemoveComposition(payload::<RemoveCompositionCommand>(&id, args)?)
            }
            ids::UPDATE_VIEW_NAME => {
                Command::UpdateViewName(payload::<UpdateViewNameCommand>(&id, args)?)
            }
            ids::UPDATE_VIEW_DESCRIPTION => Command::UpdateViewDescription(payload::<
                UpdateViewDescriptionCommand,
            >(&id, args)?),
            ids::UPDATE_PROJECTED_COLUMNS => Command::UpdateProjectedColumns(payload::<
                UpdateProjectedColumnsCommand,
            >(&id, args)?),
            ids::NO_OP => Command::NoOp,
            unknown => {
                return Err(CoreError::Decode(format!(
                    "Unknown command id '{unknown}'. Must be one of: {}",
                    ids::ALL.join(", ")
                )))
            }
        };
        Ok(command)
    }

    /// Pair a redo command with its derived inverse.
    ///
    /// Add/remove inverses carry the same payload, position and object id, so
    /// the undo can be correlated with the exact edit it reverses. Pass the
    /// command returned by [`Command::apply`] to get positional inverses.
    pub fn create_undoable(redo: Command) -> Result<Undoable, CoreError> {
        let undo = Self::inverse(&redo)?;
        Ok(Undoable::new(undo, redo))
    }

    /// The command that reverses `command`.
    pub fn inverse(command: &Command) -> Result<Command, CoreError> {
        let inverse = match command {
            Command::AddSource(c) => Command::RemoveSource(RemoveSourceCommand {
                source_path: c.source_path.clone(),
                position: c.position,
                object_id: c.object_id.clone(),
            }),
            Command::RemoveSource(c) => Command::AddSource(AddSourceCommand {
                source_path: c.source_path.clone(),
                position: c.position,
                object_id: c.object_id.clone(),
            }),
            Command::AddSources(c) => Command::RemoveSources(RemoveSourcesCommand {
                source_paths: c.source_paths.clone(),
                positions: c.positions.clone(),
                object_id: c.object_id.clone(),
            }),
            Command::RemoveSources(c) => Command::AddSources(AddSourcesCommand {
                source_paths: c.source_paths.clone(),
                positions: c.positions.clone(),
                object_id: c.object_id.clone(),
            }),
            Command::AddComposition(c) => Command::RemoveComposition(RemoveCompositionCommand {
                composition: c.composition.clone(),
                position: c.position,
                object_id: c.object_id.clone(),
            }),
            Command::RemoveComposition(c) => Command::AddComposition(AddCompositionCommand {
                composition: c.composition.clone(),
                position: c.position,
                object_id: c.object_id.clone(),
            }),
            Command::UpdateViewName(c) => Command::UpdateViewName(UpdateViewNameCommand {
                new_name: c.old_name.clone(),
                old_name: c.new_name.clone(),
            }),
            Command::UpdateViewDescription(c) => {
                Command::UpdateViewDescription(UpdateViewDescriptionCommand {
                    new_description: c.old_description.clone(),
                    old_description: c.new_description.clone(),
                })
            }
            Command::UpdateProjectedColumns(c) => {
                Command::UpdateProjectedColumns(UpdateProjectedColumnsCommand {
                    new_columns: c.old_columns.clone(),
                    old_columns: c.new_columns.clone(),
                    object_id: c.object_id.clone(),
                })
            }
            Command::NoOp => return Err(CoreError::NotUndoable(command.id().to_string())),
        };
        Ok(inverse)
    }

    /// Decode `{ "undo": <command>, "redo": <command> }`; each side is
    /// decoded independently.
    pub fn decode_undoable(json: &Value) -> Result<Undoable, CoreError> {
        let wire: UndoableJson = serde_json::from_value(json.clone())?;
        let undo = Self::decode(&wire.undo)?;
        let redo = Self::decode(&wire.redo)?;
        Ok(Undoable::new(undo, redo))
    }
}

fn payload<T: serde::de::DeserializeOwned>(
    id: &str,
    args: Map<String, Value>,
) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| CoreError::Decode(format!("Invalid args for {id}: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
