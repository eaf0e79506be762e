//! Error type shared by every parse, validate and mutate operation.
//!
//! Variants that describe bad input carry a dotted `path` such as
//! `layout.levels[1].layout.walls.vertical` so callers can point at the
//! offending field.

use std::fmt;

/// Which index of an element set a lookup or insertion concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementField {
    Name,
    Token,
    Value,
}

impl fmt::Display for ElementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementField::Name => "name",
            ElementField::Token => "token",
            ElementField::Value => "value",
        })
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MazeError {
    #[error("{path}: duplicate element {field} '{value}'")]
    DuplicateElement {
        path: String,
        field: ElementField,
        value: String,
    },
    #[error("{path}: unknown element {field} '{value}'")]
    UnknownElement {
        path: String,
        field: ElementField,
        value: String,
    },
    #[error("{path}: element list cannot be empty")]
    EmptyElementList { path: String },
    #[error("{path} is required")]
    MissingField { path: String },
    #[error("{path} must be {expected}")]
    TypeMismatch { path: String, expected: String },
    #[error("{path}: all rows must have the same length (row {row} has {actual}, expected {expected})")]
    RaggedGrid {
        path: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{path}: unknown token '{token}' at row {row}, column {col}")]
    UnknownToken {
        path: String,
        token: char,
        row: usize,
        col: usize,
    },
    #[error("{path}: {context} expected {expected}, got {actual}")]
    DimensionMismatch {
        path: String,
        context: String,
        expected: String,
        actual: String,
    },
    #[error("unknown maze type: {0}")]
    UnknownMazeType(String),
    #[error("{path} is derived: {reason}")]
    DerivedFieldOverride { path: String, reason: String },
    #[error("{path} must be {constraint}")]
    OutOfRangeValue { path: String, constraint: String },
    #[error("{context}: index {index} out of range ({bounds})")]
    IndexOutOfRange {
        context: String,
        index: String,
        bounds: String,
    },
    #[error("{operation} is not supported for maze type {maze_type}")]
    UnsupportedOperation {
        operation: String,
        maze_type: String,
    },
    #[error("{operation} requires a level for maze type {maze_type}")]
    MissingLevel {
        operation: String,
        maze_type: String,
    },
    #[error("{path}: duplicate level id '{name}'")]
    DuplicateLevelName { path: String, name: String },
    #[error("{path} must connect adjacent levels (got {from} and {to})")]
    NonAdjacentLevels { path: String, from: usize, to: usize },
    #[error("{path}: {reason}")]
    ConnectorCoordinateRule { path: String, reason: String },
    #[error("{path} must reference a {expected_name} cell (value {expected}), found value {actual}")]
    ConnectorCellMismatch {
        path: String,
        expected_name: String,
        expected: i64,
        actual: i64,
    },
    #[error("invalid element: {reason}")]
    InvalidElement { reason: String },
    #[error("{path}: {detail}")]
    ElementCollision { path: String, detail: String },
    #[error("{path} must include elements: {}", .names.join(", "))]
    MissingRequiredElements { path: String, names: Vec<String> },
    #[error("{path}: {reason}")]
    MalformedGrid { path: String, reason: String },
    #[error("{path}: unknown level '{identifier}'")]
    UnknownLevel { path: String, identifier: String },
    #[error("{path}: {reason}")]
    UnexpectedField { path: String, reason: String },
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;

impl MazeError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        MazeError::MissingField { path: path.into() }
    }

    pub(crate) fn type_mismatch(path: impl Into<String>, expected: impl Into<String>) -> Self {
        MazeError::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
        }
    }

    pub(crate) fn out_of_range(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        MazeError::OutOfRangeValue {
            path: path.into(),
            constraint: constraint.into(),
        }
    }
}

impl From<serde_yaml::Error> for MazeError {
    fn from(err: serde_yaml::Error) -> Self {
        MazeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_path() {
        let err = MazeError::missing("layout.walls.vertical");
        assert_eq!(err.to_string(), "layout.walls.vertical is required");

        let err = MazeError::MissingRequiredElements {
            path: "config.cell_elements".into(),
            names: vec!["elevator".into(), "escalator".into()],
        };
        assert_eq!(
            err.to_string(),
            "config.cell_elements must include elements: elevator, escalator"
        );
    }
}
