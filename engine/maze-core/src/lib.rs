//! Maze specification engine
//!
//! This crate parses, validates and serializes declarative maze specs:
//! - `Element` / `ElementSet`: name-token-value vocabularies for grids
//! - `codec`: the grid text format, with optional row/column headers
//! - `types`: occupancy grid, edge grid and radial-arm mazes, plus their
//!   multi-level variants linked by connectors
//! - `registry`: maze type names and aliases
//! - `MazeDraft` / `Maze`: the editable and frozen forms of a maze

pub mod codec;
pub mod config;
pub mod connector;
pub mod content;
pub mod element;
pub mod element_set;
pub mod error;
pub mod grid;
pub mod handler;
pub mod levels;
pub mod maze;
pub mod mode;
pub mod registry;
pub mod spec;
pub mod types;

// Re-export main types for convenience
pub use codec::{format_grid, format_grid_text, parse_grid, parse_grid_text};
pub use config::{ensure_required_elements, REQUIRED_CONNECTOR_ELEMENTS};
pub use connector::{Connector, ConnectorKind, Location};
pub use content::MazeContent;
pub use element::{Cell, CellElement, Element, ElementKind, MazeElement, Merged, Wall, WallElement};
pub use element_set::{resolve_default_values, ElementLookup, ElementSet, FrozenElementSet};
pub use error::{ElementField, MazeError, Result};
pub use grid::{FrozenGrid, Grid, GridView};
pub use handler::MazeTypeHandler;
pub use levels::{Level, LevelDefinition, LevelId};
pub use maze::{Maze, MazeDraft};
pub use mode::{Frozen, Mode, Mutable};
pub use registry::{is_registered, list_registered_maze_types, resolve_maze_type, MazeType};
pub use types::WallOrientation;
