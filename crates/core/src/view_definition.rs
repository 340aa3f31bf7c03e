//! The view definition being edited, and its completeness rules.
//!
//! A definition is only mutated by applying commands; the `pub(crate)`
//! mutators below exist for [`crate::command::Command::apply`]. Callers build
//! an initial value with the `with_*` builders or by decoding wire JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::composition::Composition;

// ---------------------------------------------------------------------------
// Projected columns
// ---------------------------------------------------------------------------

/// A column of the view's projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default = "default_selected")]
    pub selected: bool,
}

fn default_selected() -> bool {
    true
}

impl ProjectedColumn {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            selected: true,
        }
    }
}

// ---------------------------------------------------------------------------
// View definition
// ---------------------------------------------------------------------------

/// A named, described projection over ordered sources and compositions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ViewDefinitionWire", from = "ViewDefinitionWire")]
pub struct ViewDefinition {
    name: String,
    description: String,
    source_paths: Vec<String>,
    compositions: Vec<Composition>,
    projected_columns: Vec<ProjectedColumn>,
}

impl ViewDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.insert_source_path(path.into(), None);
        self
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.compositions.push(composition);
        self
    }

    pub fn with_projected_columns(mut self, columns: Vec<ProjectedColumn>) -> Self {
        self.projected_columns = columns;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_paths(&self) -> &[String] {
        &self.source_paths
    }

    pub fn compositions(&self) -> &[Composition] {
        &self.compositions
    }

    pub fn projected_columns(&self) -> &[ProjectedColumn] {
        &self.projected_columns
    }

    // -- Mutation (command application only) --------------------------------

    pub(crate) fn set_name(&mut self, name: Option<&str>) {
        self.name = name.unwrap_or_default().to_string();
    }

    pub(crate) fn set_description(&mut self, description: Option<&str>) {
        self.description = description.unwrap_or_default().to_string();
    }

    /// Index of a source path, if present.
    pub(crate) fn source_index(&self, path: &str) -> Option<usize> {
        self.source_paths.iter().position(|p| p == path)
    }

    /// Insert a source path at `position` (clamped to the end), or append it
    /// when no position is given. Returns `None` if the path is already present.
    pub(crate) fn insert_source_path(
        &mut self,
        path: String,
        position: Option<usize>,
    ) -> Option<usize> {
        if self.source_paths.contains(&path) {
            return None;
        }
        let index = position.map_or(self.source_paths.len(), |p| p.min(self.source_paths.len()));
        self.source_paths.insert(index, path);
        Some(index)
    }

    /// Remove a source path. Returns the index it had, if present.
    pub(crate) fn remove_source_path(&mut self, path: &str) -> Option<usize> {
        let index = self.source_index(path)?;
        self.source_paths.remove(index);
        Some(index)
    }

    /// Insert a composition at `position` (clamped to the end), or append it.
    pub(crate) fn insert_composition(
        &mut self,
        composition: Composition,
        position: Option<usize>,
    ) -> usize {
        let index = position.map_or(self.compositions.len(), |p| p.min(self.compositions.len()));
        self.compositions.insert(index, composition);
        index
    }

    /// Remove a composition equal to `composition`: the one at `position` if
    /// it matches, otherwise the first equal one. Returns the removed index.
    pub(crate) fn remove_composition(
        &mut self,
        composition: &Composition,
        position: Option<usize>,
    ) -> Option<usize> {
        let index = position
            .filter(|&p| self.compositions.get(p) == Some(composition))
            .or_else(|| self.compositions.iter().position(|c| c == composition))?;
        self.compositions.remove(index);
        Some(index)
    }

    pub(crate) fn set_projected_columns(&mut self, columns: Vec<ProjectedColumn>) {
        self.projected_columns = columns;
    }

    // -- Completeness -------------------------------------------------------

    /// A definition is complete when it has a name, at least one source, and
    /// all sources are connected through complete compositions.
    pub fn is_complete(&self) -> bool {
        self.validation_messages().is_empty()
    }

    /// Human-readable reasons why the definition is not complete.
    pub fn validation_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();

        if self.name.trim().is_empty() {
            messages.push("View name is required".to_string());
        }
        if self.source_paths.is_empty() {
            messages.push("At least one source is required".to_string());
            return messages;
        }

        for (index, composition) in self.compositions.iter().enumerate() {
            let missing = composition.missing_fields();
            if !missing.is_empty() {
                messages.push(format!(
                    "Composition {} is missing: {}",
                    composition.name.as_deref().unwrap_or(&index.to_string()),
                    missing.join(", ")
                ));
            }
        }

        let unconnected = self.unconnected_sources();
        if !unconnected.is_empty() {
            messages.push(format!(
                "Sources are not connected by a composition: {}",
                unconnected.join(", ")
            ));
        }

        messages
    }

    /// Sources not reachable from the first source through complete
    /// compositions whose both sides are sources of this view.
    fn unconnected_sources(&self) -> Vec<&str> {
        let index: HashMap<&str, usize> = self
            .source_paths
            .iter()
            .enumerate()
            .map(|(i, p)| (p.as_str(), i))
            .collect();
        let mut parent: Vec<usize> = (0..self.source_paths.len()).collect();

        fn find(parent: &mut [usize], mut i: usize) -> usize {
            while parent[i] != i {
                parent[i] = parent[parent[i]];
                i = parent[i];
            }
            i
        }

        for composition in self.compositions.iter().filter(|c| c.is_complete()) {
            let left = composition
                .left_source_path
                .as_deref()
                .and_then(|p| index.get(p));
            let right = composition
                .right_source_path
                .as_deref()
                .and_then(|p| index.get(p));
            if let (Some(&l), Some(&r)) = (left, right) {
                let (rl, rr) = (find(&mut parent, l), find(&mut parent, r));
                parent[rr] = rl;
            }
        }

        let root = find(&mut parent, 0);
        (0..self.source_paths.len())
            .filter(|&i| find(&mut parent, i) != root)
            .map(|i| self.source_paths[i].as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Wire form
// ---------------------------------------------------------------------------

/// JSON shape of a view definition. `isComplete` is computed on output and
/// ignored on input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ViewDefinitionWire {
    #[serde(default)]
    view_name: String,
    #[serde(default, rename = "keng__description")]
    description: String,
    #[serde(default)]
    is_complete: bool,
    #[serde(default)]
    source_paths: Vec<String>,
    #[serde(default)]
    compositions: Vec<Composition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    projected_columns: Vec<ProjectedColumn>,
}

impl From<ViewDefinition> for ViewDefinitionWire {
    fn from(def: ViewDefinition) -> Self {
        Self {
            is_complete: def.is_complete(),
            view_name: def.name,
            description: def.description,
            source_paths: def.source_paths,
            compositions: def.compositions,
            projected_columns: def.projected_columns,
        }
    }
}

impl From<ViewDefinitionWire> for ViewDefinition {
    fn from(wire: ViewDefinitionWire) -> Self {
        Self {
            name: wire.view_name,
            description: wire.description,
            source_paths: wire.source_paths,
            compositions: wire.compositions,
            projected_columns: wire.projected_columns,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn join(name: &str, left: &str, right: &str) -> Composition {
        Composition::new(name, left, right, "id", "id")
    }

    // -- Completeness -------------------------------------------------------

    #[test]
    fn empty_definition_is_incomplete() {
        let def = ViewDefinition::default();
        assert!(!def.is_complete());
        assert_eq!(def.validation_messages().len(), 2);
    }

    #[test]
    fn single_source_with_name_is_complete() {
        let def = ViewDefinition::new("v").with_source_path("connection=c/table=a");
        assert!(def.is_complete());
    }

    #[test]
    fn two_sources_need_a_composition() {
        let def = ViewDefinition::new("v")
            .with_source_path("a")
            .with_source_path("b");
        assert!(!def.is_complete());
        assert!(def.validation_messages()[0].contains('b'));

        let def = def.with_composition(join("ab", "a", "b"));
        assert!(def.is_complete());
    }

    #[test]
    fn incomplete_composition_does_not_connect() {
        let mut c = join("ab", "a", "b");
        c.left_criteria_column = None;
        let def = ViewDefinition::new("v")
            .with_source_path("a")
            .with_source_path("b")
            .with_composition(c);
        let messages = def.validation_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].contains("leftCriteriaColumn"));
    }

    #[test]
    fn three_sources_connected_transitively() {
        let def = ViewDefinition::new("v")
            .with_source_path("a")
            .with_source_path("b")
            .with_source_path("c")
            .with_composition(join("ab", "a", "b"))
            .with_composition(join("cb", "c", "b"));
        assert!(def.is_complete());
    }

    #[test]
    fn composition_to_foreign_source_is_ignored() {
        let def = ViewDefinition::new("v")
            .with_source_path("a")
            .with_source_path("b")
            .with_composition(join("ax", "a", "x"));
        assert!(!def.is_complete());
    }

    // -- Mutation -----------------------------------------------------------

    #[test]
    fn duplicate_source_is_not_added_twice() {
        let mut def = ViewDefinition::new("v");
        assert_eq!(def.insert_source_path("a".into(), None), Some(0));
        assert_eq!(def.insert_source_path("a".into(), None), None);
        assert_eq!(def.source_paths(), ["a"]);
        assert_eq!(def.remove_source_path("a"), Some(0));
        assert_eq!(def.remove_source_path("a"), None);
    }

    #[test]
    fn source_position_is_clamped_to_the_end() {
        let mut def = ViewDefinition::new("v").with_source_path("a").with_source_path("c");
        assert_eq!(def.insert_source_path("b".into(), Some(1)), Some(1));
        assert_eq!(def.insert_source_path("d".into(), Some(9)), Some(3));
        assert_eq!(def.source_paths(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn remove_composition_prefers_the_given_position() {
        let mut def = ViewDefinition::new("v")
            .with_composition(join("ab", "a", "b"))
            .with_composition(join("cd", "c", "d"))
            .with_composition(join("ab", "a", "b"));
        assert_eq!(def.remove_composition(&join("ab", "a", "b"), Some(2)), Some(2));
        assert_eq!(def.remove_composition(&join("ab", "a", "b"), Some(1)), Some(0));
        assert_eq!(def.remove_composition(&join("ab", "a", "b"), None), None);
        assert_eq!(def.compositions(), [join("cd", "c", "d")]);
    }

    // -- Wire form ----------------------------------------------------------

    #[test]
    fn wire_form_uses_legacy_keys_and_computes_completeness() {
        let def = ViewDefinition::new("viewDefnName")
            .with_description("viewDescription")
            .with_source_path("sourcePath1");
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["viewName"], "viewDefnName");
        assert_eq!(json["keng__description"], "viewDescription");
        assert_eq!(json["isComplete"], true);
        assert!(json.get("projectedColumns").is_none());
    }

    #[test]
    fn incoming_is_complete_flag_is_ignored() {
        let def: ViewDefinition = serde_json::from_value(serde_json::json!({
            "viewName": "",
            "isComplete": true,
            "sourcePaths": []
        }))
        .unwrap();
        assert!(!def.is_complete());
        assert_eq!(def.description(), "");
    }

    #[test]
    fn projected_columns_survive_serialization() {
        let def = ViewDefinition::new("v")
            .with_projected_columns(vec![ProjectedColumn::new("id", "integer")]);
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["projectedColumns"][0]["type"], "integer");
        assert_eq!(json["projectedColumns"][0]["selected"], true);
        let back: ViewDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }
}
