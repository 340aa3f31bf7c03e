//! Argument payloads of the concrete commands.
//!
//! Field names on the wire follow the established history format; optional
//! values are omitted rather than written as `null`. Positions record where an
//! executed add or remove landed in the ordered lists of the view, so that the
//! inverse puts an entry back where it was. Histories without them fall back
//! to appending and to the first equal entry.

use serde::{Deserialize, Serialize};

use super::object_id::{self, IDENT_DIVIDER};
use super::wire;
use crate::composition::Composition;
use crate::view_definition::ProjectedColumn;

// ---------------------------------------------------------------------------
// Command ids
// ---------------------------------------------------------------------------

pub mod ids {
    pub const ADD_SOURCE: &str = "AddSourceCommand";
    pub const ADD_SOURCES: &str = "AddSourcesCommand";
    pub const REMOVE_SOURCE: &str = "RemoveSourceCommand";
    pub const REMOVE_SOURCES: &str = "RemoveSourcesCommand";
    pub const ADD_COMPOSITION: &str = "AddCompositionCommand";
    pub const REMOVE_COMPOSITION: &str = "RemoveCompositionCommand";
    pub const UPDATE_VIEW_NAME: &str = "UpdateViewNameCommand";
    pub const UPDATE_VIEW_DESCRIPTION: &str = "UpdateViewDescriptionCommand";
    pub const UPDATE_PROJECTED_COLUMNS: &str = "UpdateProjectedColumnsCommand";
    pub const NO_OP: &str = "NoOpCommand";

    /// All recognised command ids.
    pub const ALL: &[&str] = &[
        ADD_SOURCE,
        ADD_SOURCES,
        REMOVE_SOURCE,
        REMOVE_SOURCES,
        ADD_COMPOSITION,
        REMOVE_COMPOSITION,
        UPDATE_VIEW_NAME,
        UPDATE_VIEW_DESCRIPTION,
        UPDATE_PROJECTED_COLUMNS,
        NO_OP,
    ];
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// `<object id>][<composition name>`, or the bare object id.
fn composition_key(object_id: &str, composition: Option<&Composition>) -> String {
    match composition.and_then(|c| c.name.as_deref()) {
        Some(name) => format!("{object_id}{IDENT_DIVIDER}{name}"),
        None => object_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSourceCommand {
    #[serde(rename = "addedSourceId")]
    pub source_path: String,
    #[serde(rename = "addedSourceIndex", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl AddSourceCommand {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            position: None,
            object_id: object_id::generate(ids::ADD_SOURCE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddSourcesCommand {
    #[serde(rename = "addedSourcesIds", deserialize_with = "wire::id_list")]
    pub source_paths: Vec<String>,
    #[serde(rename = "addedSourcesIndices", default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl AddSourcesCommand {
    pub fn new(source_paths: Vec<String>) -> Self {
        Self {
            source_paths,
            positions: Vec::new(),
            object_id: object_id::generate(ids::ADD_SOURCES),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSourceCommand {
    #[serde(rename = "removedSourceId")]
    pub source_path: String,
    #[serde(rename = "removedSourceIndex", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl RemoveSourceCommand {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            position: None,
            object_id: object_id::generate(ids::REMOVE_SOURCE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveSourcesCommand {
    #[serde(rename = "removedSourcesIds", deserialize_with = "wire::id_list")]
    pub source_paths: Vec<String>,
    #[serde(rename = "removedSourcesIndices", default, skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl RemoveSourcesCommand {
    pub fn new(source_paths: Vec<String>) -> Self {
        Self {
            source_paths,
            positions: Vec::new(),
            object_id: object_id::generate(ids::REMOVE_SOURCES),
        }
    }
}

// ---------------------------------------------------------------------------
// Compositions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCompositionCommand {
    #[serde(rename = "addedComposition", deserialize_with = "wire::embedded")]
    pub composition: Composition,
    #[serde(rename = "addedCompositionIndex", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl AddCompositionCommand {
    pub fn new(composition: Composition) -> Self {
        Self::with_object_id(composition, object_id::generate(ids::ADD_COMPOSITION))
    }

    pub fn with_object_id(composition: Composition, object_id: impl Into<String>) -> Self {
        Self {
            composition,
            position: None,
            object_id: object_id.into(),
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Graph-facing id of the added composition, disambiguated by name when
    /// a composition is given.
    pub fn composition_key(&self, composition: Option<&Composition>) -> String {
        composition_key(&self.object_id, composition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveCompositionCommand {
    #[serde(rename = "removedComposition", deserialize_with = "wire::embedded")]
    pub composition: Composition,
    #[serde(rename = "removedCompositionIndex", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl RemoveCompositionCommand {
    pub fn new(composition: Composition) -> Self {
        Self::with_object_id(composition, object_id::generate(ids::REMOVE_COMPOSITION))
    }

    pub fn with_object_id(composition: Composition, object_id: impl Into<String>) -> Self {
        Self {
            composition,
            position: None,
            object_id: object_id.into(),
        }
    }

    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Id of the removed composition; when several identical compositions
    /// exist, passing one appends its name after the ident divider.
    pub fn composition_key(&self, composition: Option<&Composition>) -> String {
        composition_key(&self.object_id, composition)
    }
}

// ---------------------------------------------------------------------------
// View properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateViewNameCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_name: Option<String>,
}

impl UpdateViewNameCommand {
    /// Empty names are recorded as absent.
    pub fn new(new_name: &str, old_name: &str) -> Self {
        Self {
            new_name: non_empty(new_name),
            old_name: non_empty(old_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateViewDescriptionCommand {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_description: Option<String>,
}

impl UpdateViewDescriptionCommand {
    /// Empty descriptions are recorded as absent.
    pub fn new(new_description: &str, old_description: &str) -> Self {
        Self {
            new_description: non_empty(new_description),
            old_description: non_empty(old_description),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProjectedColumnsCommand {
    #[serde(
        rename = "newProjectedColumns",
        default,
        deserialize_with = "wire::embedded"
    )]
    pub new_columns: Vec<ProjectedColumn>,
    #[serde(
        rename = "oldProjectedColumns",
        default,
        deserialize_with = "wire::embedded"
    )]
    pub old_columns: Vec<ProjectedColumn>,
    #[serde(rename = "ObjectId", default, skip_serializing_if = "String::is_empty")]
    pub object_id: String,
}

impl UpdateProjectedColumnsCommand {
    pub fn new(new_columns: Vec<ProjectedColumn>, old_columns: Vec<ProjectedColumn>) -> Self {
        Self {
            new_columns,
            old_columns,
            object_id: object_id::generate(ids::UPDATE_PROJECTED_COLUMNS),
        }
    }
}
