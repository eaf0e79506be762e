//! Stacked occupancy grids linked by elevators and escalators.

use serde_json::Value;

use crate::config::ensure_required_elements;
use crate::content::MazeContent;
use crate::element::Cell;
use crate::error::Result;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::types::multi_level::{LevelLayoutHandler, MultiLevelHandler, MultiLevelLayout};
use crate::types::occupancy_grid::{OccupancyGridConfig, OccupancyGridHandler, OccupancyGridLayout};

/// Handler for `occupancy_grid_3d`
pub type OccupancyGrid3DHandler = MultiLevelHandler<OccupancyGridHandler>;

pub type OccupancyGrid3DLayout<M> = MultiLevelLayout<OccupancyGridLayout<M>>;

impl LevelLayoutHandler for OccupancyGridHandler {
    const MULTI_LEVEL_TYPE: MazeType = MazeType::OccupancyGrid3D;

    fn parse_multi_level_config(spec: &Value) -> Result<OccupancyGridConfig<Mutable>> {
        let config = OccupancyGridConfig::parse(spec, &["elevator", "escalator"])?;
        ensure_required_elements(&config.cell_elements, "config.cell_elements")?;
        Ok(config)
    }

    fn parse_level_layout(
        spec: &Value,
        config: &OccupancyGridConfig<Mutable>,
        path: &str,
    ) -> Result<OccupancyGridLayout<Mutable>> {
        OccupancyGridLayout::parse(spec, config, path)
    }

    fn validate_level<M: Mode>(
        config: &OccupancyGridConfig<M>,
        layout: &OccupancyGridLayout<M>,
        path: &str,
    ) -> Result<()> {
        layout.validate(config, path)
    }

    fn freeze_config(config: &OccupancyGridConfig<Mutable>) -> OccupancyGridConfig<Frozen> {
        config.freeze()
    }

    fn thaw_config(config: &OccupancyGridConfig<Frozen>) -> OccupancyGridConfig<Mutable> {
        config.thaw()
    }

    fn freeze_level(layout: &OccupancyGridLayout<Mutable>) -> OccupancyGridLayout<Frozen> {
        layout.freeze()
    }

    fn thaw_level(layout: &OccupancyGridLayout<Frozen>) -> OccupancyGridLayout<Mutable> {
        layout.thaw()
    }

    fn cell_elements<M: Mode>(config: &OccupancyGridConfig<M>) -> &M::Elements<Cell> {
        &config.cell_elements
    }

    fn cell_grid<M: Mode>(layout: &OccupancyGridLayout<M>) -> &M::Grid {
        &layout.grid
    }

    fn into_multi_level_content<M: Mode>(
        config: OccupancyGridConfig<M>,
        layout: OccupancyGrid3DLayout<M>,
    ) -> MazeContent<M> {
        MazeContent::OccupancyGrid3D { config, layout }
    }
}
