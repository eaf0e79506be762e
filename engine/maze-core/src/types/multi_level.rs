//! Multi-level wrapper shared by the 3-D occupancy and edge grid types.
//!
//! A multi-level layout stacks two or more 2-D layouts, each parsed by the
//! wrapped 2-D handler against one shared config, and links adjacent
//! levels with connectors.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::debug;

use crate::connector::{
    connectors_to_spec, grid_cell, parse_connectors, validate_connectors, ArmPolicy, Connector,
    ConnectorValues,
};
use crate::content::MazeContent;
use crate::element::Cell;
use crate::error::{MazeError, Result};
use crate::handler::MazeTypeHandler;
use crate::levels::{parse_level_specs, validate_level_definitions, Level};
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::spec::{self, child, item, mapping};

#[derive(Debug, Clone, PartialEq)]
pub struct MultiLevelLayout<L> {
    pub levels: Vec<Level<L>>,
    pub connectors: Vec<Connector>,
}

impl<L> MultiLevelLayout<L> {
    /// Same levels and connectors with every level layout transformed.
    pub fn map_levels<T>(&self, mut f: impl FnMut(&L) -> T) -> MultiLevelLayout<T> {
        MultiLevelLayout {
            levels: self.levels.iter().map(|level| level.map(&mut f)).collect(),
            connectors: self.connectors.clone(),
        }
    }
}

/// A 2-D handler that can be stacked into levels
pub trait LevelLayoutHandler: MazeTypeHandler {
    /// Maze type of the stacked variant
    const MULTI_LEVEL_TYPE: MazeType;

    /// Parse a config that also declares the connector elements.
    fn parse_multi_level_config(spec: &Value) -> Result<Self::Config<Mutable>>;

    fn parse_level_layout(
        spec: &Value,
        config: &Self::Config<Mutable>,
        path: &str,
    ) -> Result<Self::Layout<Mutable>>;

    fn validate_level<M: Mode>(
        config: &Self::Config<M>,
        layout: &Self::Layout<M>,
        path: &str,
    ) -> Result<()>;

    fn freeze_config(config: &Self::Config<Mutable>) -> Self::Config<Frozen>;

    fn thaw_config(config: &Self::Config<Frozen>) -> Self::Config<Mutable>;

    fn freeze_level(layout: &Self::Layout<Mutable>) -> Self::Layout<Frozen>;

    fn thaw_level(layout: &Self::Layout<Frozen>) -> Self::Layout<Mutable>;

    /// Vocabulary connector cells are looked up in
    fn cell_elements<M: Mode>(config: &Self::Config<M>) -> &M::Elements<Cell>;

    /// Grid connector ends sit on
    fn cell_grid<M: Mode>(layout: &Self::Layout<M>) -> &M::Grid;

    fn into_multi_level_content<M: Mode>(
        config: Self::Config<M>,
        layout: MultiLevelLayout<Self::Layout<M>>,
    ) -> MazeContent<M>;
}

/// Handler for a stack of `H` layouts
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiLevelHandler<H>(PhantomData<H>);

fn check_connectors<H: LevelLayoutHandler, M: Mode>(
    config: &H::Config<M>,
    layout: &MultiLevelLayout<H::Layout<M>>,
) -> Result<()> {
    let values = ConnectorValues::from_elements::<Cell, _>(H::cell_elements::<M>(config), "config.cell_elements")?;
    validate_connectors(&layout.connectors, values, "layout.connectors", |location, path| {
        let level = layout
            .levels
            .get(location.level.index)
            .ok_or_else(|| MazeError::UnknownLevel {
                path: child(path, "level"),
                identifier: location.level.name.clone(),
            })?;
        grid_cell(H::cell_grid::<M>(&level.layout), location, path)
    })
}

impl<H: LevelLayoutHandler> MazeTypeHandler for MultiLevelHandler<H> {
    const MAZE_TYPE: MazeType = H::MULTI_LEVEL_TYPE;
    type Config<M: Mode> = H::Config<M>;
    type Layout<M: Mode> = MultiLevelLayout<H::Layout<M>>;

    fn parse_config(spec: &Value) -> Result<H::Config<Mutable>> {
        H::parse_multi_level_config(spec)
    }

    fn parse_layout(
        spec: &Value,
        config: &H::Config<Mutable>,
    ) -> Result<MultiLevelLayout<H::Layout<Mutable>>> {
        let path = "layout";
        let map = spec::as_map(spec, path)?;
        let levels_path = child(path, "levels");
        let level_specs = parse_level_specs(spec::required(map, "levels", path)?, &levels_path)?;

        let mut levels = Vec::with_capacity(level_specs.len());
        for (definition, level_spec) in level_specs {
            let level_path = child(&item(&levels_path, definition.index), "layout");
            let layout = H::parse_level_layout(&level_spec, config, &level_path)?;
            levels.push(Level { definition, layout });
        }

        let definitions: Vec<_> = levels.iter().map(|level| level.definition.clone()).collect();
        let connectors = parse_connectors(
            spec::optional(map, "connectors"),
            &definitions,
            ArmPolicy::Forbidden,
            &child(path, "connectors"),
        )?;
        let layout = MultiLevelLayout { levels, connectors };
        check_connectors::<H, Mutable>(config, &layout)?;
        debug!(
            maze_type = %H::MULTI_LEVEL_TYPE,
            levels = layout.levels.len(),
            connectors = layout.connectors.len(),
            "Parsed multi-level layout"
        );
        Ok(layout)
    }

    fn validate<M: Mode>(
        config: &H::Config<M>,
        layout: &MultiLevelLayout<H::Layout<M>>,
    ) -> Result<()> {
        validate_level_definitions(
            layout.levels.iter().map(|level| &level.definition),
            "layout.levels",
        )?;
        for level in &layout.levels {
            let level_path = child(&item("layout.levels", level.index()), "layout");
            H::validate_level::<M>(config, &level.layout, &level_path)?;
        }
        check_connectors::<H, M>(config, layout)
    }

    fn freeze(
        config: &H::Config<Mutable>,
        layout: &MultiLevelLayout<H::Layout<Mutable>>,
    ) -> (H::Config<Frozen>, MultiLevelLayout<H::Layout<Frozen>>) {
        (H::freeze_config(config), layout.map_levels(H::freeze_level))
    }

    fn thaw(
        config: &H::Config<Frozen>,
        layout: &MultiLevelLayout<H::Layout<Frozen>>,
    ) -> (H::Config<Mutable>, MultiLevelLayout<H::Layout<Mutable>>) {
        (H::thaw_config(config), layout.map_levels(H::thaw_level))
    }

    fn config_to_spec<M: Mode>(config: &H::Config<M>) -> Value {
        H::config_to_spec::<M>(config)
    }

    fn layout_to_spec<M: Mode>(
        layout: &MultiLevelLayout<H::Layout<M>>,
        config: &H::Config<M>,
        with_grid_numbers: bool,
    ) -> Value {
        let levels = layout
            .levels
            .iter()
            .map(|level| {
                mapping([
                    ("id", Value::from(level.name())),
                    ("layout", H::layout_to_spec::<M>(&level.layout, config, with_grid_numbers)),
                ])
            })
            .collect();
        let mut map = spec::SpecMap::new();
        map.insert("levels".into(), Value::Array(levels));
        if !layout.connectors.is_empty() {
            map.insert("connectors".into(), connectors_to_spec(&layout.connectors));
        }
        Value::Object(map)
    }

    fn into_content<M: Mode>(
        config: H::Config<M>,
        layout: MultiLevelLayout<H::Layout<M>>,
    ) -> MazeContent<M> {
        H::into_multi_level_content(config, layout)
    }
}
