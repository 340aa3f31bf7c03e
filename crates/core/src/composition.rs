//! Compositions: join/union relationships between two sources of a view.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Composition type
// ---------------------------------------------------------------------------

/// How the two sources of a composition are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionType {
    #[default]
    InnerJoin,
    LeftOuterJoin,
    RightOuterJoin,
    FullOuterJoin,
    Union,
}

impl CompositionType {
    /// SQL keyword(s) for this composition type.
    pub fn sql_keyword(self) -> &'static str {
        match self {
            CompositionType::InnerJoin => "INNER JOIN",
            CompositionType::LeftOuterJoin => "LEFT OUTER JOIN",
            CompositionType::RightOuterJoin => "RIGHT OUTER JOIN",
            CompositionType::FullOuterJoin => "FULL OUTER JOIN",
            CompositionType::Union => "UNION",
        }
    }
}

// ---------------------------------------------------------------------------
// Criteria operator
// ---------------------------------------------------------------------------

/// Comparison operator between the two criteria columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompositionOperator {
    #[default]
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompositionOperator {
    /// SQL comparison symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            CompositionOperator::Eq => "=",
            CompositionOperator::Ne => "<>",
            CompositionOperator::Gt => ">",
            CompositionOperator::Lt => "<",
            CompositionOperator::Ge => ">=",
            CompositionOperator::Le => "<=",
        }
    }
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// A join or union between a left and a right source.
///
/// Each criteria column belongs to the source on the same side; the two must
/// always move together (see [`Composition::swap_tables`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_source_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_criteria_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_criteria_column: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: CompositionType,
    #[serde(default)]
    pub operator: CompositionOperator,
}

impl Composition {
    /// A fully specified composition with the default type and operator.
    pub fn new(
        name: impl Into<String>,
        left_source_path: impl Into<String>,
        right_source_path: impl Into<String>,
        left_criteria_column: impl Into<String>,
        right_criteria_column: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            left_source_path: Some(left_source_path.into()),
            right_source_path: Some(right_source_path.into()),
            left_criteria_column: Some(left_criteria_column.into()),
            right_criteria_column: Some(right_criteria_column.into()),
            kind: CompositionType::default(),
            operator: CompositionOperator::default(),
        }
    }

    pub fn with_type(mut self, kind: CompositionType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_operator(mut self, operator: CompositionOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Exchange the left and right sides, moving each criteria column with
    /// its source.
    pub fn swap_tables(&mut self) {
        std::mem::swap(&mut self.left_source_path, &mut self.right_source_path);
        std::mem::swap(
            &mut self.left_criteria_column,
            &mut self.right_criteria_column,
        );
    }

    /// Whether the composition names both sides.
    pub fn connects(&self, left: &str, right: &str) -> bool {
        let (l, r) = (
            self.left_source_path.as_deref(),
            self.right_source_path.as_deref(),
        );
        (l == Some(left) && r == Some(right)) || (l == Some(right) && r == Some(left))
    }

    /// Every field required to generate the composition is set and non-empty.
    pub fn is_complete(&self) -> bool {
        [
            &self.name,
            &self.left_source_path,
            &self.right_source_path,
            &self.left_criteria_column,
            &self.right_criteria_column,
        ]
        .iter()
        .all(|field| is_present(field))
    }

    /// Names of the required fields that are missing.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("name", &self.name),
            ("leftSourcePath", &self.left_source_path),
            ("rightSourcePath", &self.right_source_path),
            ("leftCriteriaColumn", &self.left_criteria_column),
            ("rightCriteriaColumn", &self.right_criteria_column),
        ];
        fields
            .iter()
            .filter(|(_, value)| !is_present(value))
            .map(|(field, _)| *field)
            .collect()
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let or_blank = |v: &Option<String>| v.clone().unwrap_or_default();
        write!(
            f,
            "{}: {} {} {} ON {} {} {}",
            or_blank(&self.name),
            or_blank(&self.left_source_path),
            self.kind.sql_keyword(),
            or_blank(&self.right_source_path),
            or_blank(&self.left_criteria_column),
            self.operator.symbol(),
            or_blank(&self.right_criteria_column),
        )
    }
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Composition {
        Composition::new(
            "compositionName",
            "leftSourcePath",
            "rightSourcePath",
            "leftCriteriaCol",
            "rightCriteriaCol",
        )
    }

    #[test]
    fn defaults_are_inner_join_and_eq() {
        let c = Composition::default();
        assert_eq!(c.kind, CompositionType::InnerJoin);
        assert_eq!(c.operator, CompositionOperator::Eq);
    }

    #[test]
    fn swap_tables_moves_columns_with_sources() {
        let mut c = sample();
        c.swap_tables();
        assert_eq!(c.left_source_path.as_deref(), Some("rightSourcePath"));
        assert_eq!(c.left_criteria_column.as_deref(), Some("rightCriteriaCol"));
        assert_eq!(c.right_source_path.as_deref(), Some("leftSourcePath"));
        assert_eq!(c.right_criteria_column.as_deref(), Some("leftCriteriaCol"));
    }

    #[test]
    fn completeness_requires_every_field() {
        assert!(sample().is_complete());

        let mut c = sample();
        c.right_criteria_column = Some(String::new());
        assert!(!c.is_complete());
        assert_eq!(c.missing_fields(), vec!["rightCriteriaColumn"]);

        assert_eq!(Composition::default().missing_fields().len(), 5);
    }

    #[test]
    fn connects_ignores_direction() {
        let c = sample();
        assert!(c.connects("leftSourcePath", "rightSourcePath"));
        assert!(c.connects("rightSourcePath", "leftSourcePath"));
        assert!(!c.connects("leftSourcePath", "other"));
    }

    #[test]
    fn wire_form_uses_upper_case_enums() {
        let c = sample()
            .with_type(CompositionType::LeftOuterJoin)
            .with_operator(CompositionOperator::Ge);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["type"], "LEFT_OUTER_JOIN");
        assert_eq!(json["operator"], "GE");
        assert_eq!(json["leftCriteriaColumn"], "leftCriteriaCol");
    }

    #[test]
    fn missing_type_and_operator_take_defaults() {
        let c: Composition = serde_json::from_value(serde_json::json!({
            "name": "c",
            "leftSourcePath": "a",
            "rightSourcePath": "b"
        }))
        .unwrap();
        assert_eq!(c.kind, CompositionType::InnerJoin);
        assert_eq!(c.operator, CompositionOperator::Eq);
        assert_eq!(c.left_criteria_column, None);
    }

    #[test]
    fn display_reads_like_sql() {
        assert_eq!(
            sample().to_string(),
            "compositionName: leftSourcePath INNER JOIN rightSourcePath ON leftCriteriaCol = rightCriteriaCol"
        );
    }
}
