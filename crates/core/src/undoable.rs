//! A paired undo/redo command: one unit of edit history.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::command::Command;

/// An immutable `(undo, redo)` command pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Undoable {
    undo: Command,
    redo: Command,
}

/// Raw wire form `{ "undo": <command>, "redo": <command> }`, decoded side by
/// side by [`crate::command_factory::CommandFactory::decode_undoable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UndoableJson {
    pub undo: Value,
    pub redo: Value,
}

impl Undoable {
    pub fn new(undo: Command, redo: Command) -> Self {
        Self { undo, redo }
    }

    pub fn undo_command(&self) -> &Command {
        &self.undo
    }

    pub fn redo_command(&self) -> &Command {
        &self.redo
    }

    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "undo": self.undo.to_json(),
            "redo": self.redo.to_json(),
        })
    }
}

impl Serialize for Undoable {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Undoable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Value::deserialize(deserializer)?;
        crate::command_factory::CommandFactory::decode_undoable(&json)
            .map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Undoable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "undo: {}, redo: {}", self.undo, self.redo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AddSourceCommand, RemoveSourceCommand};

    #[test]
    fn json_has_undo_and_redo_commands() {
        let undoable = Undoable::new(
            RemoveSourceCommand::new("a").into(),
            AddSourceCommand::new("a").into(),
        );
        let json = undoable.to_json();
        assert_eq!(json["undo"]["id"], "RemoveSourceCommand");
        assert_eq!(json["redo"]["id"], "AddSourceCommand");
        assert_eq!(serde_json::to_value(&undoable).unwrap(), json);
    }

    #[test]
    fn deserialize_goes_through_the_factory() {
        let undoable = Undoable::new(
            RemoveSourceCommand::new("a").into(),
            AddSourceCommand::new("a").into(),
        );
        let back: Undoable = serde_json::from_value(undoable.to_json()).unwrap();
        assert_eq!(back, undoable);
    }
}
