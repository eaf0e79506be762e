//! Static maze-type registry
//!
//! Every maze type is a variant of [`MazeType`]. The lookup table mapping
//! canonical names and aliases to types is built once on first use and is
//! never modified afterwards.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use tracing::warn;

use crate::error::{MazeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MazeType {
    OccupancyGrid,
    EdgeGrid,
    RadialArm,
    OccupancyGrid3D,
    EdgeGrid3D,
    RadialArm3D,
}

impl MazeType {
    pub const ALL: [MazeType; 6] = [
        MazeType::OccupancyGrid,
        MazeType::EdgeGrid,
        MazeType::RadialArm,
        MazeType::OccupancyGrid3D,
        MazeType::EdgeGrid3D,
        MazeType::RadialArm3D,
    ];

    /// Canonical identifier, as emitted in specs
    pub fn as_str(self) -> &'static str {
        match self {
            MazeType::OccupancyGrid => "occupancy_grid",
            MazeType::EdgeGrid => "edge_grid",
            MazeType::RadialArm => "radial_arm",
            MazeType::OccupancyGrid3D => "occupancy_grid_3d",
            MazeType::EdgeGrid3D => "edge_grid_3d",
            MazeType::RadialArm3D => "radial_arm_3d",
        }
    }

    /// Alternative identifiers accepted on input
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            MazeType::OccupancyGrid => &["occupancy_grid_2d"],
            MazeType::EdgeGrid => &["edge_grid_2d"],
            MazeType::RadialArm => &["radial_arm_2d"],
            MazeType::OccupancyGrid3D | MazeType::EdgeGrid3D | MazeType::RadialArm3D => &[],
        }
    }

    /// Whether layouts are stacked into connected levels
    pub fn is_multi_level(self) -> bool {
        matches!(
            self,
            MazeType::OccupancyGrid3D | MazeType::EdgeGrid3D | MazeType::RadialArm3D
        )
    }
}

impl fmt::Display for MazeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MazeType {
    type Err = MazeError;

    fn from_str(name: &str) -> Result<Self> {
        resolve_maze_type(name)
    }
}

/// Canonical names and aliases, built once
static REGISTRY: Lazy<HashMap<&'static str, MazeType>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for maze_type in MazeType::ALL {
        table.insert(maze_type.as_str(), maze_type);
        for alias in maze_type.aliases() {
            table.insert(*alias, maze_type);
        }
    }
    table
});

/// Resolve a maze-type identifier or alias.
pub fn resolve_maze_type(name: &str) -> Result<MazeType> {
    match REGISTRY.get(name) {
        Some(maze_type) => Ok(*maze_type),
        None => {
            warn!(maze_type = %name, "Attempted to resolve unregistered maze type");
            Err(MazeError::UnknownMazeType(name.to_string()))
        }
    }
}

/// Check if a maze-type identifier or alias is registered
pub fn is_registered(name: &str) -> bool {
    REGISTRY.contains_key(name)
}

/// All registered identifiers, aliases included, sorted
pub fn list_registered_maze_types() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_and_aliases_resolve() {
        assert_eq!(resolve_maze_type("occupancy_grid").unwrap(), MazeType::OccupancyGrid);
        assert_eq!(resolve_maze_type("occupancy_grid_2d").unwrap(), MazeType::OccupancyGrid);
        assert_eq!(resolve_maze_type("edge_grid_2d").unwrap(), MazeType::EdgeGrid);
        assert_eq!(resolve_maze_type("radial_arm_2d").unwrap(), MazeType::RadialArm);
        assert_eq!("radial_arm_3d".parse::<MazeType>().unwrap(), MazeType::RadialArm3D);
    }

    #[test]
    fn test_unknown_maze_type() {
        assert_eq!(
            resolve_maze_type("hex_grid").unwrap_err(),
            MazeError::UnknownMazeType("hex_grid".into())
        );
        assert!(!is_registered("hex_grid"));
    }

    #[test]
    fn test_list_registered() {
        let names = list_registered_maze_types();
        assert_eq!(names.len(), 9);
        for maze_type in MazeType::ALL {
            assert!(names.contains(&maze_type.as_str()));
            assert_eq!(resolve_maze_type(maze_type.as_str()).unwrap(), maze_type);
        }
    }

    #[test]
    fn test_multi_level_flag() {
        let multi: Vec<MazeType> = MazeType::ALL
            .into_iter()
            .filter(|maze_type| maze_type.is_multi_level())
            .collect();
        assert_eq!(
            multi,
            vec![MazeType::OccupancyGrid3D, MazeType::EdgeGrid3D, MazeType::RadialArm3D]
        );
    }
}
