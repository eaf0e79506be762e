//! Elevator and escalator connectors between adjacent levels.

use std::fmt;

use serde_json::{json, Value};

use crate::config::ensure_required_elements;
use crate::element::ElementKind;
use crate::element_set::ElementLookup;
use crate::error::{MazeError, Result};
use crate::grid::GridView;
use crate::levels::{resolve_level, LevelDefinition};
use crate::spec::{self, child, item};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectorKind {
    /// Straight up or down: both ends share row, column and arm
    Elevator,
    /// Slanted: the ends differ in at least one coordinate
    Escalator,
}

impl ConnectorKind {
    /// Also the name of the cell element each end must hold.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectorKind::Elevator => "elevator",
            ConnectorKind::Escalator => "escalator",
        }
    }

    fn parse(value: &Value, path: &str) -> Result<Self> {
        match value.as_str() {
            Some("elevator") => Ok(ConnectorKind::Elevator),
            Some("escalator") => Ok(ConnectorKind::Escalator),
            _ => Err(MazeError::type_mismatch(path, "'elevator' or 'escalator'")),
        }
    }
}

impl fmt::Display for ConnectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell on a level; `arm` is only set for radial-arm mazes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub level: LevelDefinition,
    pub row: usize,
    pub col: usize,
    pub arm: Option<usize>,
}

impl Location {
    fn same_cell(&self, other: &Location) -> bool {
        self.row == other.row && self.col == other.col && self.arm == other.arm
    }

    pub fn to_spec(&self) -> Value {
        let mut spec = json!({
            "level": self.level.name,
            "row": self.row,
            "col": self.col,
        });
        if let (Some(arm), Some(map)) = (self.arm, spec.as_object_mut()) {
            map.insert("arm".into(), Value::from(arm));
        }
        spec
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connector {
    pub kind: ConnectorKind,
    pub start: Location,
    pub end: Location,
}

impl Connector {
    pub fn to_spec(&self) -> Value {
        json!({
            "type": self.kind.as_str(),
            "from": self.start.to_spec(),
            "to": self.end.to_spec(),
        })
    }
}

/// Whether connector locations carry an `arm` coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmPolicy {
    Forbidden,
    Required,
}

/// Parse an optional `connectors` list against the parsed levels.
pub fn parse_connectors(
    spec: Option<&Value>,
    levels: &[LevelDefinition],
    arms: ArmPolicy,
    path: &str,
) -> Result<Vec<Connector>> {
    let Some(spec) = spec else {
        return Ok(Vec::new());
    };
    let entries = spec::as_list(spec, path)?;
    let mut connectors = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = item(path, index);
        let map = spec::as_map(entry, &entry_path)?;
        let kind_key = if spec::optional(map, "type").is_some() {
            "type"
        } else {
            "kind"
        };
        let kind = ConnectorKind::parse(
            spec::optional(map, kind_key)
                .ok_or_else(|| MazeError::missing(child(&entry_path, "type")))?,
            &child(&entry_path, kind_key),
        )?;
        let start = parse_location(
            spec::required(map, "from", &entry_path)?,
            levels,
            arms,
            &child(&entry_path, "from"),
        )?;
        let end = parse_location(
            spec::required(map, "to", &entry_path)?,
            levels,
            arms,
            &child(&entry_path, "to"),
        )?;
        connectors.push(Connector { kind, start, end });
    }
    Ok(connectors)
}

fn parse_location(
    spec: &Value,
    levels: &[LevelDefinition],
    arms: ArmPolicy,
    path: &str,
) -> Result<Location> {
    let map = spec::as_map(spec, path)?;
    let level = resolve_level(
        levels,
        spec::required(map, "level", path)?,
        &child(path, "level"),
    )?
    .clone();
    let row = spec::non_negative_index(spec::required(map, "row", path)?, &child(path, "row"))?;
    let col = spec::non_negative_index(spec::required(map, "col", path)?, &child(path, "col"))?;
    let arm = match (spec::optional(map, "arm"), arms) {
        (Some(arm), ArmPolicy::Required) => {
            Some(spec::non_negative_index(arm, &child(path, "arm"))?)
        }
        (Some(_), ArmPolicy::Forbidden) => {
            return Err(MazeError::UnexpectedField {
                path: child(path, "arm"),
                reason: "arm is only allowed for radial arm mazes".into(),
            })
        }
        (None, ArmPolicy::Required) => return Err(MazeError::missing(child(path, "arm"))),
        (None, ArmPolicy::Forbidden) => None,
    };
    Ok(Location {
        level,
        row,
        col,
        arm,
    })
}

pub fn connectors_to_spec(connectors: &[Connector]) -> Value {
    Value::Array(connectors.iter().map(Connector::to_spec).collect())
}

/// Cell values connector ends must hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectorValues {
    pub elevator: i64,
    pub escalator: i64,
}

impl ConnectorValues {
    /// Look up `elevator` and `escalator` (ignoring case) in a cell
    /// vocabulary.
    pub fn from_elements<K, S>(elements: &S, path: &str) -> Result<Self>
    where
        K: ElementKind,
        S: ElementLookup<K>,
    {
        ensure_required_elements(elements, path)?;
        let value = |kind: ConnectorKind| {
            elements
                .value_for_name_ignore_case(kind.as_str())
                .ok_or_else(|| MazeError::MissingRequiredElements {
                    path: path.to_string(),
                    names: vec![kind.as_str().to_string()],
                })
        };
        Ok(Self {
            elevator: value(ConnectorKind::Elevator)?,
            escalator: value(ConnectorKind::Escalator)?,
        })
    }

    pub fn for_kind(&self, kind: ConnectorKind) -> i64 {
        match kind {
            ConnectorKind::Elevator => self.elevator,
            ConnectorKind::Escalator => self.escalator,
        }
    }
}

/// Check every connector, in order: levels adjacent, coordinate rule for
/// its kind, both ends in bounds, both end cells holding the kind's value.
///
/// `cell_at` bounds-checks a location and returns its current cell value.
pub fn validate_connectors<F>(
    connectors: &[Connector],
    values: ConnectorValues,
    path: &str,
    mut cell_at: F,
) -> Result<()>
where
    F: FnMut(&Location, &str) -> Result<i64>,
{
    for (index, connector) in connectors.iter().enumerate() {
        let connector_path = item(path, index);
        let (from, to) = (connector.start.level.index, connector.end.level.index);
        if from.abs_diff(to) != 1 {
            return Err(MazeError::NonAdjacentLevels {
                path: connector_path,
                from,
                to,
            });
        }

        let same_cell = connector.start.same_cell(&connector.end);
        match connector.kind {
            ConnectorKind::Elevator if !same_cell => {
                return Err(MazeError::ConnectorCoordinateRule {
                    path: connector_path,
                    reason: "elevator must use the same row, col and arm on both levels".into(),
                })
            }
            ConnectorKind::Escalator if same_cell => {
                return Err(MazeError::ConnectorCoordinateRule {
                    path: connector_path,
                    reason: "escalator must use different coordinates on each level".into(),
                })
            }
            _ => {}
        }

        let ends = [
            (&connector.start, child(&connector_path, "from")),
            (&connector.end, child(&connector_path, "to")),
        ];
        let mut found = Vec::with_capacity(2);
        for (location, location_path) in &ends {
            found.push(cell_at(*location, location_path.as_str())?);
        }

        let expected = values.for_kind(connector.kind);
        for ((_, location_path), actual) in ends.iter().zip(found) {
            if actual != expected {
                return Err(MazeError::ConnectorCellMismatch {
                    path: location_path.clone(),
                    expected_name: connector.kind.as_str().to_string(),
                    expected,
                    actual,
                });
            }
        }
    }
    Ok(())
}

/// Bounds-checked read of a location's row and column in `grid`.
pub fn grid_cell<G: GridView + ?Sized>(grid: &G, location: &Location, path: &str) -> Result<i64> {
    grid.get(location.row, location.col)
        .ok_or_else(|| MazeError::IndexOutOfRange {
            context: path.to_string(),
            index: format!("({}, {})", location.row, location.col),
            bounds: format!("{} x {}", grid.height(), grid.width()),
        })
}
