//! Level definitions shared by the multi-level maze types.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;

use crate::error::{MazeError, Result};
use crate::spec::{self, child, item, SpecMap};

/// Identity of a level: its name and 0-based position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LevelDefinition {
    pub name: String,
    pub index: usize,
}

/// One level of a multi-level layout
#[derive(Debug, Clone, PartialEq)]
pub struct Level<L> {
    pub definition: LevelDefinition,
    pub layout: L,
}

impl<L> Level<L> {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn index(&self) -> usize {
        self.definition.index
    }

    /// Same level with a transformed layout.
    pub fn map<T>(&self, f: impl FnOnce(&L) -> T) -> Level<T> {
        Level {
            definition: self.definition.clone(),
            layout: f(&self.layout),
        }
    }
}

/// How a caller addresses a level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelId {
    Name(String),
    Index(usize),
}

impl From<&str> for LevelId {
    fn from(name: &str) -> Self {
        LevelId::Name(name.to_string())
    }
}

impl From<String> for LevelId {
    fn from(name: String) -> Self {
        LevelId::Name(name)
    }
}

impl From<usize> for LevelId {
    fn from(index: usize) -> Self {
        LevelId::Index(index)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelId::Name(name) => f.write_str(name),
            LevelId::Index(index) => write!(f, "{index}"),
        }
    }
}

impl LevelId {
    /// Position of the addressed level among `levels`.
    pub fn resolve<'a>(
        &self,
        levels: impl IntoIterator<Item = &'a LevelDefinition>,
        path: &str,
    ) -> Result<usize> {
        let found = levels.into_iter().find(|level| match self {
            LevelId::Name(name) => level.name == *name,
            LevelId::Index(index) => level.index == *index,
        });
        found.map(|level| level.index).ok_or_else(|| MazeError::UnknownLevel {
            path: path.to_string(),
            identifier: self.to_string(),
        })
    }
}

/// Parse the `levels` list into definitions and per-level layout specs.
///
/// Each entry is a mapping with an optional `id` (string or integer,
/// defaulting to `level_{index}`) and a `layout`. Without a `layout` key
/// the entry's remaining keys form the layout.
pub fn parse_level_specs(spec: &Value, path: &str) -> Result<Vec<(LevelDefinition, Value)>> {
    let entries = spec::as_list(spec, path)?;
    if entries.len() < 2 {
        return Err(MazeError::out_of_range(path, "a list of at least two levels"));
    }

    let mut seen = HashSet::new();
    let mut parsed = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let entry_path = item(path, index);
        let map = spec::as_map(entry, &entry_path)?;
        let name = match spec::optional(map, "id") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Number(number)) if number.is_i64() || number.is_u64() => number.to_string(),
            Some(_) => {
                return Err(MazeError::type_mismatch(
                    child(&entry_path, "id"),
                    "a string or integer",
                ))
            }
            None => format!("level_{index}"),
        };
        if !seen.insert(name.clone()) {
            return Err(MazeError::DuplicateLevelName {
                path: entry_path,
                name,
            });
        }

        let layout_path = child(&entry_path, "layout");
        let layout = if map.contains_key("layout") {
            spec::required(map, "layout", &entry_path)?.clone()
        } else {
            let inline: SpecMap = map
                .iter()
                .filter(|(key, _)| key.as_str() != "id")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Value::Object(inline)
        };
        if layout.as_object().is_some_and(SpecMap::is_empty) {
            return Err(MazeError::missing(layout_path));
        }

        parsed.push((LevelDefinition { name, index }, layout));
    }
    Ok(parsed)
}

/// Resolve a connector's `level` field (a name or a 0-based index).
pub fn resolve_level<'a>(
    levels: &'a [LevelDefinition],
    identifier: &Value,
    path: &str,
) -> Result<&'a LevelDefinition> {
    let id = match identifier {
        Value::String(name) => LevelId::Name(name.clone()),
        Value::Number(number) => match number.as_u64().and_then(|n| usize::try_from(n).ok()) {
            Some(index) => LevelId::Index(index),
            None => {
                return Err(MazeError::UnknownLevel {
                    path: path.to_string(),
                    identifier: number.to_string(),
                })
            }
        },
        _ => return Err(MazeError::type_mismatch(path, "a level name or index")),
    };
    let index = id.resolve(levels, path)?;
    Ok(&levels[index])
}

/// Level-list invariants: at least two levels, unique names, and each
/// index matching its position.
pub fn validate_level_definitions<'a>(
    levels: impl ExactSizeIterator<Item = &'a LevelDefinition>,
    path: &str,
) -> Result<()> {
    if levels.len() < 2 {
        return Err(MazeError::out_of_range(path, "a list of at least two levels"));
    }
    let mut seen = HashSet::new();
    for (position, level) in levels.enumerate() {
        if level.index != position {
            return Err(MazeError::out_of_range(
                child(&item(path, position), "index"),
                format!("{position}"),
            ));
        }
        if !seen.insert(level.name.as_str()) {
            return Err(MazeError::DuplicateLevelName {
                path: item(path, position),
                name: level.name.clone(),
            });
        }
    }
    Ok(())
}
