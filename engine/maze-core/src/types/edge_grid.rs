//! Edge grids: a cell grid plus the wall grids between cells.
//!
//! For an `H x W` cell grid, `vertical_walls` is `H x (W + 1)` (the wall at
//! `[r][c]` is the left edge of cell `(r, c)`) and `horizontal_walls` is
//! `(H + 1) x W` (the wall at `[r][c]` is the top edge of cell `(r, c)`).

use std::collections::BTreeSet;
use std::fmt;

use maze_config::PhysicalDimensions;
use serde_json::Value;

use crate::codec::{format_grid_text, parse_grid};
use crate::config::{self, check_grid_values};
use crate::content::MazeContent;
use crate::element::{Cell, Wall};
use crate::element_set::ElementLookup;
use crate::error::{MazeError, Result};
use crate::grid::{Grid, GridView};
use crate::handler::MazeTypeHandler;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::spec::{self, child, mapping};

/// Which wall grid of an edge grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallOrientation {
    /// Walls on the left edge of a cell
    Vertical,
    /// Walls on the top edge of a cell
    Horizontal,
}

impl WallOrientation {
    pub fn as_str(self) -> &'static str {
        match self {
            WallOrientation::Vertical => "vertical",
            WallOrientation::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for WallOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGridConfig<M: Mode> {
    pub cell_elements: M::Elements<Cell>,
    pub wall_elements: M::Elements<Wall>,
    pub physical: PhysicalDimensions,
}

impl EdgeGridConfig<Mutable> {
    /// Parse a config whose cell vocabulary reserves `open` plus
    /// `extra_cell_names`.
    pub(crate) fn parse(spec: &Value, extra_cell_names: &[&str]) -> Result<Self> {
        let path = "config";
        let map = spec::as_map(spec, path)?;
        let mut cell_names = vec!["open"];
        cell_names.extend_from_slice(extra_cell_names);
        let cell_elements = config::parse_cell_elements(
            map,
            path,
            &config::reserved(&cell_names),
            &BTreeSet::new(),
        )?;
        let wall_elements =
            config::parse_wall_elements(map, path, &config::reserved(&["open", "wall"]))?;
        Ok(Self {
            cell_elements,
            wall_elements,
            physical: config::parse_physical(map, path)?,
        })
    }

    pub fn freeze(&self) -> EdgeGridConfig<Frozen> {
        EdgeGridConfig {
            cell_elements: self.cell_elements.freeze(),
            wall_elements: self.wall_elements.freeze(),
            physical: self.physical,
        }
    }
}

impl EdgeGridConfig<Frozen> {
    pub fn thaw(&self) -> EdgeGridConfig<Mutable> {
        EdgeGridConfig {
            cell_elements: self.cell_elements.thaw(),
            wall_elements: self.wall_elements.thaw(),
            physical: self.physical,
        }
    }
}

impl<M: Mode> EdgeGridConfig<M> {
    pub fn to_spec(&self) -> Value {
        let mut map = spec::SpecMap::new();
        map.insert("cell_elements".into(), self.cell_elements.to_list());
        map.insert("wall_elements".into(), self.wall_elements.to_list());
        config::physical_to_spec(&self.physical, &mut map);
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGridLayout<M: Mode> {
    pub cells: M::Grid,
    pub vertical_walls: M::Grid,
    pub horizontal_walls: M::Grid,
}

impl EdgeGridLayout<Mutable> {
    /// Parse `{cells, walls: {vertical, horizontal}}` and check the wall
    /// grid dimensions.
    pub fn parse(spec: &Value, config: &EdgeGridConfig<Mutable>, path: &str) -> Result<Self> {
        let map = spec::as_map(spec, path)?;
        let cells_path = child(path, "cells");
        let cells = parse_grid(
            spec::required(map, "cells", path)?,
            &config.cell_elements,
            &cells_path,
        )?;

        let walls_path = child(path, "walls");
        let walls = spec::as_map(spec::required(map, "walls", path)?, &walls_path)?;
        let vertical = spec::required(walls, "vertical", &walls_path)?;
        let horizontal = spec::required(walls, "horizontal", &walls_path)?;
        let vertical_walls = parse_grid(
            vertical,
            &config.wall_elements,
            &child(&walls_path, "vertical"),
        )?;
        let horizontal_walls = parse_grid(
            horizontal,
            &config.wall_elements,
            &child(&walls_path, "horizontal"),
        )?;

        validate_edge_grid_dimensions(&cells, &vertical_walls, &horizontal_walls, path)?;
        Ok(Self {
            cells,
            vertical_walls,
            horizontal_walls,
        })
    }

    pub fn freeze(&self) -> EdgeGridLayout<Frozen> {
        EdgeGridLayout {
            cells: self.cells.freeze(),
            vertical_walls: self.vertical_walls.freeze(),
            horizontal_walls: self.horizontal_walls.freeze(),
        }
    }

    pub(crate) fn wall_grid_mut(&mut self, orientation: WallOrientation) -> &mut Grid {
        match orientation {
            WallOrientation::Vertical => &mut self.vertical_walls,
            WallOrientation::Horizontal => &mut self.horizontal_walls,
        }
    }
}

impl EdgeGridLayout<Frozen> {
    pub fn thaw(&self) -> EdgeGridLayout<Mutable> {
        EdgeGridLayout {
            cells: self.cells.thaw(),
            vertical_walls: self.vertical_walls.thaw(),
            horizontal_walls: self.horizontal_walls.thaw(),
        }
    }
}

impl<M: Mode> EdgeGridLayout<M> {
    pub fn wall_grid(&self, orientation: WallOrientation) -> &M::Grid {
        match orientation {
            WallOrientation::Vertical => &self.vertical_walls,
            WallOrientation::Horizontal => &self.horizontal_walls,
        }
    }

    /// Number of cell rows, which is also the width an arm presents to a hub
    pub fn height(&self) -> usize {
        self.cells.height()
    }

    /// Wall dimensions plus every value belonging to its vocabulary.
    pub fn validate(&self, config: &EdgeGridConfig<M>, path: &str) -> Result<()> {
        validate_edge_grid_dimensions(
            &self.cells,
            &self.vertical_walls,
            &self.horizontal_walls,
            path,
        )?;
        check_grid_values(&self.cells, &config.cell_elements, &child(path, "cells"))?;
        for orientation in [WallOrientation::Vertical, WallOrientation::Horizontal] {
            check_grid_values(
                self.wall_grid(orientation),
                &config.wall_elements,
                &child(&child(path, "walls"), orientation.as_str()),
            )?;
        }
        Ok(())
    }

    pub fn to_spec(&self, config: &EdgeGridConfig<M>, with_grid_numbers: bool) -> Value {
        let walls = mapping([
            (
                "vertical",
                Value::String(format_grid_text(
                    &self.vertical_walls,
                    &config.wall_elements,
                    with_grid_numbers,
                )),
            ),
            (
                "horizontal",
                Value::String(format_grid_text(
                    &self.horizontal_walls,
                    &config.wall_elements,
                    with_grid_numbers,
                )),
            ),
        ]);
        mapping([
            (
                "cells",
                Value::String(format_grid_text(
                    &self.cells,
                    &config.cell_elements,
                    with_grid_numbers,
                )),
            ),
            ("walls", walls),
        ])
    }
}

/// Check the wall grids against the cell grid shape.
pub fn validate_edge_grid_dimensions<C, V, H>(
    cells: &C,
    vertical: &V,
    horizontal: &H,
    path: &str,
) -> Result<()>
where
    C: GridView,
    V: GridView,
    H: GridView,
{
    let (height, width) = cells.shape();
    if height == 0 || width == 0 {
        return Err(MazeError::MalformedGrid {
            path: child(path, "cells"),
            reason: "cells must be non-empty".into(),
        });
    }
    let walls_path = child(path, "walls");
    let mismatch = |name: &str, rule: &str, expected: (usize, usize), actual: (usize, usize)| {
        MazeError::DimensionMismatch {
            path: child(&walls_path, name),
            context: format!("{rule} for {height} x {width} cells"),
            expected: format!("{} x {}", expected.0, expected.1),
            actual: format!("{} x {}", actual.0, actual.1),
        }
    };

    let expected = (height, width + 1);
    if vertical.height() != expected.0 {
        return Err(mismatch("vertical", "row count must match cells", expected, vertical.shape()));
    }
    if vertical.width() != expected.1 {
        return Err(mismatch("vertical", "column count must be width + 1", expected, vertical.shape()));
    }
    let expected = (height + 1, width);
    if horizontal.height() != expected.0 {
        return Err(mismatch("horizontal", "row count must be height + 1", expected, horizontal.shape()));
    }
    if horizontal.width() != expected.1 {
        return Err(mismatch("horizontal", "column count must match cells", expected, horizontal.shape()));
    }
    Ok(())
}

/// Handler for `edge_grid`
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeGridHandler;

impl MazeTypeHandler for EdgeGridHandler {
    const MAZE_TYPE: MazeType = MazeType::EdgeGrid;
    type Config<M: Mode> = EdgeGridConfig<M>;
    type Layout<M: Mode> = EdgeGridLayout<M>;

    fn parse_config(spec: &Value) -> Result<EdgeGridConfig<Mutable>> {
        EdgeGridConfig::parse(spec, &[])
    }

    fn parse_layout(spec: &Value, config: &EdgeGridConfig<Mutable>) -> Result<EdgeGridLayout<Mutable>> {
        EdgeGridLayout::parse(spec, config, "layout")
    }

    fn validate<M: Mode>(config: &EdgeGridConfig<M>, layout: &EdgeGridLayout<M>) -> Result<()> {
        layout.validate(config, "layout")
    }

    fn freeze(
        config: &EdgeGridConfig<Mutable>,
        layout: &EdgeGridLayout<Mutable>,
    ) -> (EdgeGridConfig<Frozen>, EdgeGridLayout<Frozen>) {
        (config.freeze(), layout.freeze())
    }

    fn thaw(
        config: &EdgeGridConfig<Frozen>,
        layout: &EdgeGridLayout<Frozen>,
    ) -> (EdgeGridConfig<Mutable>, EdgeGridLayout<Mutable>) {
        (config.thaw(), layout.thaw())
    }

    fn config_to_spec<M: Mode>(config: &EdgeGridConfig<M>) -> Value {
        config.to_spec()
    }

    fn layout_to_spec<M: Mode>(
        layout: &EdgeGridLayout<M>,
        config: &EdgeGridConfig<M>,
        with_grid_numbers: bool,
    ) -> Value {
        layout.to_spec(config, with_grid_numbers)
    }

    fn into_content<M: Mode>(config: EdgeGridConfig<M>, layout: EdgeGridLayout<M>) -> MazeContent<M> {
        MazeContent::EdgeGrid { config, layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> EdgeGridConfig<Mutable> {
        EdgeGridHandler::parse_config(&json!({
            "cell_elements": [{"name": "open", "token": "."}, {"name": "goal", "token": "G"}],
            "wall_elements": [{"name": "open", "token": "."}, {"name": "wall", "token": "#"}],
        }))
        .unwrap()
    }

    fn layout_spec() -> Value {
        json!({
            "cells": ".G\n..\n",
            "walls": {
                "vertical": "#.#\n#.#\n",
                "horizontal": "##\n..\n##\n",
            },
        })
    }

    #[test]
    fn test_parse_config_reserved_values() {
        let config = config();
        assert_eq!(config.cell_elements.element("open").unwrap().value(), 0);
        assert_eq!(config.cell_elements.element("goal").unwrap().value(), 1);
        assert_eq!(config.wall_elements.element("wall").unwrap().value(), 1);
        assert_eq!(config.physical, PhysicalDimensions::default());
    }

    #[test]
    fn test_parse_layout() {
        let config = config();
        let layout = EdgeGridHandler::parse_layout(&layout_spec(), &config).unwrap();
        assert_eq!(layout.cells.shape(), (2, 2));
        assert_eq!(layout.vertical_walls.shape(), (2, 3));
        assert_eq!(layout.horizontal_walls.shape(), (3, 2));
        assert_eq!(layout.cells.get(0, 1), Some(1));
        assert_eq!(layout.vertical_walls.get(0, 0), Some(1));
        assert_eq!(layout.horizontal_walls.get(1, 0), Some(0));
        EdgeGridHandler::validate(&config, &layout).unwrap();
    }

    #[test]
    fn test_vertical_wall_dimension_law() {
        let config = config();
        let spec = json!({
            "cells": ".G\n..\n",
            "walls": {"vertical": "#.\n#.\n", "horizontal": "##\n..\n##\n"},
        });
        let err = EdgeGridHandler::parse_layout(&spec, &config).unwrap_err();
        match err {
            MazeError::DimensionMismatch {
                path,
                expected,
                actual,
                ..
            } => {
                assert_eq!(path, "layout.walls.vertical");
                assert_eq!(expected, "2 x 3");
                assert_eq!(actual, "2 x 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_horizontal_wall_dimension_law() {
        let config = config();
        let spec = json!({
            "cells": ".G\n..\n",
            "walls": {"vertical": "#.#\n#.#\n", "horizontal": "##\n##\n"},
        });
        let err = EdgeGridHandler::parse_layout(&spec, &config).unwrap_err();
        assert!(matches!(
            err,
            MazeError::DimensionMismatch { ref path, ref expected, .. }
                if path == "layout.walls.horizontal" && expected == "3 x 2"
        ));
    }

    #[test]
    fn test_missing_wall_grid() {
        let config = config();
        let spec = json!({"cells": ".G\n..\n", "walls": {"vertical": "#.#\n#.#\n"}});
        assert_eq!(
            EdgeGridHandler::parse_layout(&spec, &config).unwrap_err(),
            MazeError::missing("layout.walls.horizontal")
        );
    }

    #[test]
    fn test_layout_to_spec_round_trip() {
        let config = config();
        let layout = EdgeGridHandler::parse_layout(&layout_spec(), &config).unwrap();
        let emitted = EdgeGridHandler::layout_to_spec(&layout, &config, false);
        assert_eq!(emitted, layout_spec());

        let headered = EdgeGridHandler::layout_to_spec(&layout, &config, true);
        let reparsed = EdgeGridHandler::parse_layout(&headered, &config).unwrap();
        assert_eq!(reparsed, layout);
    }

    #[test]
    fn test_freeze_thaw() {
        let config = config();
        let layout = EdgeGridHandler::parse_layout(&layout_spec(), &config).unwrap();
        let (frozen_config, frozen_layout) = EdgeGridHandler::freeze(&config, &layout);
        EdgeGridHandler::validate(&frozen_config, &frozen_layout).unwrap();
        let (thawed_config, thawed_layout) = EdgeGridHandler::thaw(&frozen_config, &frozen_layout);
        assert_eq!(thawed_config, config);
        assert_eq!(thawed_layout, layout);
    }
}
