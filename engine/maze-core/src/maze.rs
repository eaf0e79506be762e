//! The draft/frozen maze lifecycle.
//!
//! A [`MazeDraft`] is parsed from a spec and can be edited cell by cell; it
//! is not guaranteed to be valid. [`MazeDraft::freeze`] validates and
//! produces an immutable [`Maze`], which always serializes and can be read
//! from any thread. [`Maze::thaw`] hands back an independent draft.

use serde_json::Value;
use tracing::debug;

use crate::content::MazeContent;
use crate::error::{MazeError, Result};
use crate::grid::Grid;
use crate::levels::{Level, LevelId};
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::{resolve_maze_type, MazeType};
use crate::spec::{self, item, mapping};
use crate::types::{EdgeGridLayout, WallOrientation};

/// Build `{maze_type, config, layout}` for any content.
fn content_to_spec<M: Mode>(content: &MazeContent<M>, with_grid_numbers: bool) -> Value {
    mapping([
        ("maze_type", Value::from(content.maze_type().as_str())),
        ("config", content.config_to_spec()),
        ("layout", content.layout_to_spec(with_grid_numbers)),
    ])
}

fn unsupported(operation: &str, maze_type: MazeType) -> MazeError {
    MazeError::UnsupportedOperation {
        operation: operation.to_string(),
        maze_type: maze_type.to_string(),
    }
}

/// Single-level mazes take no level argument.
fn reject_level(level: Option<LevelId>, operation: &str, maze_type: MazeType) -> Result<()> {
    match level {
        Some(id) => Err(unsupported(&format!("{operation} with level '{id}'"), maze_type)),
        None => Ok(()),
    }
}

/// Position of the addressed level, which multi-level mazes require.
fn level_position<L>(
    levels: &[Level<L>],
    level: Option<LevelId>,
    operation: &str,
    maze_type: MazeType,
) -> Result<usize> {
    let id = level.ok_or_else(|| MazeError::MissingLevel {
        operation: operation.to_string(),
        maze_type: maze_type.to_string(),
    })?;
    id.resolve(levels.iter().map(|level| &level.definition), "level")
}

fn level_path(position: usize) -> String {
    format!("{}.layout", item("layout.levels", position))
}

fn arm_mut<'a>(
    arms: &'a mut [EdgeGridLayout<Mutable>],
    arm: usize,
    path: &str,
) -> Result<&'a mut EdgeGridLayout<Mutable>> {
    let count = arms.len();
    arms.get_mut(arm).ok_or_else(|| MazeError::IndexOutOfRange {
        context: path.to_string(),
        index: arm.to_string(),
        bounds: format!("{count} arms"),
    })
}

/// Write one value, reporting bounds errors against `path`.
fn write(grid: &mut Grid, row: usize, col: usize, value: i64, path: String) -> Result<()> {
    grid.set(row, col, value).map_err(|err| match err {
        MazeError::IndexOutOfRange { index, bounds, .. } => MazeError::IndexOutOfRange {
            context: path,
            index,
            bounds,
        },
        other => other,
    })
}

/// An editable maze
#[derive(Debug, Clone, PartialEq)]
pub struct MazeDraft {
    content: MazeContent<Mutable>,
}

impl MazeDraft {
    /// Parse `{maze_type, config, layout}`. The maze type may be an alias.
    pub fn from_spec(spec: &Value) -> Result<Self> {
        let map = spec::as_map(spec, "spec")?;
        let name = spec::as_str(spec::required(map, "maze_type", "")?, "maze_type")?;
        let maze_type = resolve_maze_type(name)?;
        let config = spec::required(map, "config", "")?;
        let layout = spec::required(map, "layout", "")?;
        let content = MazeContent::parse(maze_type, config, layout)?;
        debug!(maze_type = %maze_type, "Parsed maze draft");
        Ok(Self { content })
    }

    /// Parse a YAML (or JSON) document.
    pub fn from_text(text: &str) -> Result<Self> {
        let spec: Value = serde_yaml::from_str(text)?;
        Self::from_spec(&spec)
    }

    pub fn from_maze(maze: &Maze) -> Self {
        maze.thaw()
    }

    pub fn maze_type(&self) -> MazeType {
        self.content.maze_type()
    }

    pub fn content(&self) -> &MazeContent<Mutable> {
        &self.content
    }

    /// Run every check [`MazeDraft::freeze`] runs, without converting.
    pub fn validate(&self) -> Result<()> {
        self.content.validate()
    }

    /// Validate, then copy into an immutable [`Maze`]. On failure the
    /// draft is left as it was.
    pub fn freeze(&self) -> Result<Maze> {
        self.content.validate()?;
        let content = self.content.freeze();
        debug!(maze_type = %content.maze_type(), "Froze maze");
        Ok(Maze { content })
    }

    /// Emit the spec mapping. Fails if the draft does not validate.
    pub fn to_spec(&self, with_grid_numbers: bool) -> Result<Value> {
        self.validate()?;
        Ok(content_to_spec(&self.content, with_grid_numbers))
    }

    pub fn to_text(&self, with_grid_numbers: bool) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_spec(with_grid_numbers)?)?)
    }

    /// Set one cell of an occupancy or edge grid.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        value: i64,
        level: Option<LevelId>,
    ) -> Result<()> {
        const OPERATION: &str = "set_cell";
        let maze_type = self.maze_type();
        match &mut self.content {
            MazeContent::OccupancyGrid { layout, .. } => {
                reject_level(level, OPERATION, maze_type)?;
                write(&mut layout.grid, row, col, value, "layout.grid".into())
            }
            MazeContent::EdgeGrid { layout, .. } => {
                reject_level(level, OPERATION, maze_type)?;
                write(&mut layout.cells, row, col, value, "layout.cells".into())
            }
            MazeContent::OccupancyGrid3D { layout, .. } => {
                let position = level_position(&layout.levels, level, OPERATION, maze_type)?;
                let grid = &mut layout.levels[position].layout.grid;
                write(grid, row, col, value, format!("{}.grid", level_path(position)))
            }
            MazeContent::EdgeGrid3D { layout, .. } => {
                let position = level_position(&layout.levels, level, OPERATION, maze_type)?;
                let grid = &mut layout.levels[position].layout.cells;
                write(grid, row, col, value, format!("{}.cells", level_path(position)))
            }
            MazeContent::RadialArm { .. } | MazeContent::RadialArm3D { .. } => {
                Err(unsupported(OPERATION, maze_type))
            }
        }
    }

    /// Set one wall of an edge grid.
    pub fn set_wall(
        &mut self,
        orientation: WallOrientation,
        row: usize,
        col: usize,
        value: i64,
        level: Option<LevelId>,
    ) -> Result<()> {
        const OPERATION: &str = "set_wall";
        let maze_type = self.maze_type();
        match &mut self.content {
            MazeContent::EdgeGrid { layout, .. } => {
                reject_level(level, OPERATION, maze_type)?;
                let path = format!("layout.walls.{orientation}");
                write(layout.wall_grid_mut(orientation), row, col, value, path)
            }
            MazeContent::EdgeGrid3D { layout, .. } => {
                let position = level_position(&layout.levels, level, OPERATION, maze_type)?;
                let path = format!("{}.walls.{orientation}", level_path(position));
                let grid = layout.levels[position].layout.wall_grid_mut(orientation);
                write(grid, row, col, value, path)
            }
            _ => Err(unsupported(OPERATION, maze_type)),
        }
    }

    /// Set one cell of a radial-arm arm.
    pub fn set_arm_cell(
        &mut self,
        arm: usize,
        row: usize,
        col: usize,
        value: i64,
        level: Option<LevelId>,
    ) -> Result<()> {
        const OPERATION: &str = "set_arm_cell";
        let maze_type = self.maze_type();
        match &mut self.content {
            MazeContent::RadialArm { layout, .. } => {
                reject_level(level, OPERATION, maze_type)?;
                let target = arm_mut(&mut layout.arms, arm, "layout.arms")?;
                let path = format!("{}.layout.cells", item("layout.arms", arm));
                write(&mut target.cells, row, col, value, path)
            }
            MazeContent::RadialArm3D { layout, .. } => {
                let position = level_position(&layout.levels, level, OPERATION, maze_type)?;
                let arms_path = format!("{}.arms", level_path(position));
                let target = arm_mut(&mut layout.levels[position].layout, arm, &arms_path)?;
                let path = format!("{}.layout.cells", item(&arms_path, arm));
                write(&mut target.cells, row, col, value, path)
            }
            _ => Err(unsupported(OPERATION, maze_type)),
        }
    }

    /// Set one wall of a radial-arm arm.
    pub fn set_arm_wall(
        &mut self,
        arm: usize,
        orientation: WallOrientation,
        row: usize,
        col: usize,
        value: i64,
        level: Option<LevelId>,
    ) -> Result<()> {
        const OPERATION: &str = "set_arm_wall";
        let maze_type = self.maze_type();
        match &mut self.content {
            MazeContent::RadialArm { layout, .. } => {
                reject_level(level, OPERATION, maze_type)?;
                let target = arm_mut(&mut layout.arms, arm, "layout.arms")?;
                let path = format!("{}.layout.walls.{orientation}", item("layout.arms", arm));
                write(target.wall_grid_mut(orientation), row, col, value, path)
            }
            MazeContent::RadialArm3D { layout, .. } => {
                let position = level_position(&layout.levels, level, OPERATION, maze_type)?;
                let arms_path = format!("{}.arms", level_path(position));
                let target = arm_mut(&mut layout.levels[position].layout, arm, &arms_path)?;
                let path = format!("{}.layout.walls.{orientation}", item(&arms_path, arm));
                write(target.wall_grid_mut(orientation), row, col, value, path)
            }
            _ => Err(unsupported(OPERATION, maze_type)),
        }
    }
}

/// A validated, immutable maze
///
/// Grids and element sets are reference counted, so clones are cheap and a
/// `Maze` can be shared across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Maze {
    content: MazeContent<Frozen>,
}

impl Maze {
    /// Parse and freeze in one step.
    pub fn from_spec(spec: &Value) -> Result<Self> {
        MazeDraft::from_spec(spec)?.freeze()
    }

    pub fn from_text(text: &str) -> Result<Self> {
        MazeDraft::from_text(text)?.freeze()
    }

    pub fn maze_type(&self) -> MazeType {
        self.content.maze_type()
    }

    pub fn content(&self) -> &MazeContent<Frozen> {
        &self.content
    }

    pub fn validate(&self) -> Result<()> {
        self.content.validate()
    }

    pub fn to_spec(&self, with_grid_numbers: bool) -> Value {
        content_to_spec(&self.content, with_grid_numbers)
    }

    pub fn to_text(&self, with_grid_numbers: bool) -> Result<String> {
        Ok(serde_yaml::to_string(&self.to_spec(with_grid_numbers))?)
    }

    /// Independent editable copy.
    pub fn thaw(&self) -> MazeDraft {
        debug!(maze_type = %self.maze_type(), "Thawed maze");
        MazeDraft {
            content: self.content.thaw(),
        }
    }
}
