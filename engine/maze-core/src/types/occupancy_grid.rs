//! Occupancy grids: one grid whose values come from the cell and wall
//! vocabularies merged into a single value space.

use std::collections::{BTreeSet, HashMap};

use maze_config::PhysicalDimensions;
use serde_json::Value;

use crate::codec::{format_grid_text, parse_grid};
use crate::config::{self, check_grid_values};
use crate::content::MazeContent;
use crate::element::{Cell, ElementKind, MazeElement, Merged, Wall};
use crate::element_set::{resolve_default_values, ElementLookup, ElementSet};
use crate::error::{MazeError, Result};
use crate::handler::MazeTypeHandler;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::spec::{self, child, mapping};

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGridConfig<M: Mode> {
    pub cell_elements: M::Elements<Cell>,
    /// Empty when the spec declares no wall vocabulary
    pub wall_elements: M::Elements<Wall>,
    pub physical: PhysicalDimensions,
    grid_elements: M::Elements<Merged>,
}

impl OccupancyGridConfig<Mutable> {
    /// Parse a config whose cell vocabulary reserves `open` plus
    /// `extra_cell_names`. Cell defaults are bumped past wall values so
    /// the merged vocabulary never collides.
    pub(crate) fn parse(spec: &Value, extra_cell_names: &[&str]) -> Result<Self> {
        let path = "config";
        let map = spec::as_map(spec, path)?;

        let has_walls = spec::optional(map, "wall_elements").is_some();
        let wall_elements = if has_walls {
            config::parse_wall_elements(map, path, &config::reserved(&["wall"]))?
        } else {
            ElementSet::new()
        };

        let blocked: BTreeSet<i64> = wall_elements.values();
        let mut cell_names = vec!["open"];
        if !has_walls {
            cell_names.push("wall");
        }
        cell_names.extend_from_slice(extra_cell_names);
        let cell_defaults = resolve_default_values(&config::reserved(&cell_names), &blocked);
        let cell_elements = config::parse_cell_elements(map, path, &cell_defaults, &blocked)?;

        let grid_elements = occupancy_grid_elements(&cell_elements, &wall_elements, path)?;
        Ok(Self {
            cell_elements,
            wall_elements,
            physical: config::parse_physical(map, path)?,
            grid_elements,
        })
    }

    pub fn freeze(&self) -> OccupancyGridConfig<Frozen> {
        OccupancyGridConfig {
            cell_elements: self.cell_elements.freeze(),
            wall_elements: self.wall_elements.freeze(),
            physical: self.physical,
            grid_elements: self.grid_elements.freeze(),
        }
    }
}

impl OccupancyGridConfig<Frozen> {
    pub fn thaw(&self) -> OccupancyGridConfig<Mutable> {
        OccupancyGridConfig {
            cell_elements: self.cell_elements.thaw(),
            wall_elements: self.wall_elements.thaw(),
            physical: self.physical,
            grid_elements: self.grid_elements.thaw(),
        }
    }
}

impl<M: Mode> OccupancyGridConfig<M> {
    /// The merged vocabulary grid values are drawn from. Element names are
    /// prefixed with their source list (`cell_elements.open`).
    pub fn grid_elements(&self) -> &M::Elements<Merged> {
        &self.grid_elements
    }

    pub fn to_spec(&self) -> Value {
        let mut map = spec::SpecMap::new();
        map.insert("cell_elements".into(), self.cell_elements.to_list());
        if !self.wall_elements.is_empty() {
            map.insert("wall_elements".into(), self.wall_elements.to_list());
        }
        config::physical_to_spec(&self.physical, &mut map);
        Value::Object(map)
    }
}

/// Merge cell and wall vocabularies, rejecting any token or value used by
/// both.
pub fn occupancy_grid_elements<C, W>(cells: &C, walls: &W, path: &str) -> Result<ElementSet<Merged>>
where
    C: ElementLookup<Cell>,
    W: ElementLookup<Wall>,
{
    let mut merged = ElementSet::new();
    let mut token_owners: HashMap<char, &str> = HashMap::new();
    let mut value_owners: HashMap<i64, &str> = HashMap::new();

    let mut merge = |section: &'static str, elements: Vec<MazeElement>| -> Result<()> {
        for element in elements {
            let (token, value) = (element.token(), element.value());
            if let Some(owner) = token_owners.get(&token) {
                return Err(MazeError::ElementCollision {
                    path: child(path, section),
                    detail: format!("token '{token}' duplicates {}", child(path, owner)),
                });
            }
            if let Some(owner) = value_owners.get(&value) {
                return Err(MazeError::ElementCollision {
                    path: child(path, section),
                    detail: format!("value {value} duplicates {}", child(path, owner)),
                });
            }
            token_owners.insert(token, section);
            value_owners.insert(value, section);
            merged.add(element)?;
        }
        Ok(())
    };

    merge("cell_elements", retagged(cells, "cell_elements"))?;
    merge("wall_elements", retagged(walls, "wall_elements"))?;
    Ok(merged)
}

fn retagged<K: ElementKind, S: ElementLookup<K>>(set: &S, section: &str) -> Vec<MazeElement> {
    set.elements()
        .iter()
        .map(|el| el.retag(format!("{section}.{}", el.name())))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGridLayout<M: Mode> {
    pub grid: M::Grid,
}

impl OccupancyGridLayout<Mutable> {
    /// Parse `{grid: ...}`, `{cells: ...}` or the grid input itself.
    pub fn parse(spec: &Value, config: &OccupancyGridConfig<Mutable>, path: &str) -> Result<Self> {
        let (input, grid_path) = match spec {
            Value::Object(map) => {
                if let Some(grid) = spec::optional(map, "grid") {
                    (grid, child(path, "grid"))
                } else if let Some(cells) = spec::optional(map, "cells") {
                    (cells, child(path, "cells"))
                } else {
                    return Err(MazeError::missing(child(path, "grid")));
                }
            }
            other => (other, path.to_string()),
        };
        let grid = parse_grid(input, config.grid_elements(), &grid_path)?;
        Ok(Self { grid })
    }

    pub fn freeze(&self) -> OccupancyGridLayout<Frozen> {
        OccupancyGridLayout {
            grid: self.grid.freeze(),
        }
    }
}

impl OccupancyGridLayout<Frozen> {
    pub fn thaw(&self) -> OccupancyGridLayout<Mutable> {
        OccupancyGridLayout {
            grid: self.grid.thaw(),
        }
    }
}

impl<M: Mode> OccupancyGridLayout<M> {
    pub fn validate(&self, config: &OccupancyGridConfig<M>, path: &str) -> Result<()> {
        check_grid_values(&self.grid, config.grid_elements(), &child(path, "grid"))
    }

    pub fn to_spec(&self, config: &OccupancyGridConfig<M>, with_grid_numbers: bool) -> Value {
        mapping([(
            "grid",
            Value::String(format_grid_text(
                &self.grid,
                config.grid_elements(),
                with_grid_numbers,
            )),
        )])
    }
}

/// Handler for `occupancy_grid`
#[derive(Debug, Clone, Copy, Default)]
pub struct OccupancyGridHandler;

impl MazeTypeHandler for OccupancyGridHandler {
    const MAZE_TYPE: MazeType = MazeType::OccupancyGrid;
    type Config<M: Mode> = OccupancyGridConfig<M>;
    type Layout<M: Mode> = OccupancyGridLayout<M>;

    fn parse_config(spec: &Value) -> Result<OccupancyGridConfig<Mutable>> {
        OccupancyGridConfig::parse(spec, &[])
    }

    fn parse_layout(
        spec: &Value,
        config: &OccupancyGridConfig<Mutable>,
    ) -> Result<OccupancyGridLayout<Mutable>> {
        OccupancyGridLayout::parse(spec, config, "layout")
    }

    fn validate<M: Mode>(config: &OccupancyGridConfig<M>, layout: &OccupancyGridLayout<M>) -> Result<()> {
        layout.validate(config, "layout")
    }

    fn freeze(
        config: &OccupancyGridConfig<Mutable>,
        layout: &OccupancyGridLayout<Mutable>,
    ) -> (OccupancyGridConfig<Frozen>, OccupancyGridLayout<Frozen>) {
        (config.freeze(), layout.freeze())
    }

    fn thaw(
        config: &OccupancyGridConfig<Frozen>,
        layout: &OccupancyGridLayout<Frozen>,
    ) -> (OccupancyGridConfig<Mutable>, OccupancyGridLayout<Mutable>) {
        (config.thaw(), layout.thaw())
    }

    fn config_to_spec<M: Mode>(config: &OccupancyGridConfig<M>) -> Value {
        config.to_spec()
    }

    fn layout_to_spec<M: Mode>(
        layout: &OccupancyGridLayout<M>,
        config: &OccupancyGridConfig<M>,
        with_grid_numbers: bool,
    ) -> Value {
        layout.to_spec(config, with_grid_numbers)
    }

    fn into_content<M: Mode>(
        config: OccupancyGridConfig<M>,
        layout: OccupancyGridLayout<M>,
    ) -> MazeContent<M> {
        MazeContent::OccupancyGrid { config, layout }
    }
}
