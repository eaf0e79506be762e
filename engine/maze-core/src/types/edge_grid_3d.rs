//! Stacked edge grids. Connectors sit on cells; walls are per level.

use serde_json::Value;

use crate::config::ensure_required_elements;
use crate::content::MazeContent;
use crate::element::Cell;
use crate::error::Result;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::types::edge_grid::{EdgeGridConfig, EdgeGridHandler, EdgeGridLayout};
use crate::types::multi_level::{LevelLayoutHandler, MultiLevelHandler, MultiLevelLayout};

/// Handler for `edge_grid_3d`
pub type EdgeGrid3DHandler = MultiLevelHandler<EdgeGridHandler>;

pub type EdgeGrid3DLayout<M> = MultiLevelLayout<EdgeGridLayout<M>>;

impl LevelLayoutHandler for EdgeGridHandler {
    const MULTI_LEVEL_TYPE: MazeType = MazeType::EdgeGrid3D;

    fn parse_multi_level_config(spec: &Value) -> Result<EdgeGridConfig<Mutable>> {
        let config = EdgeGridConfig::parse(spec, &["elevator", "escalator"])?;
        ensure_required_elements(&config.cell_elements, "config.cell_elements")?;
        Ok(config)
    }

    fn parse_level_layout(
        spec: &Value,
        config: &EdgeGridConfig<Mutable>,
        path: &str,
    ) -> Result<EdgeGridLayout<Mutable>> {
        EdgeGridLayout::parse(spec, config, path)
    }

    fn validate_level<M: Mode>(
        config: &EdgeGridConfig<M>,
        layout: &EdgeGridLayout<M>,
        path: &str,
    ) -> Result<()> {
        layout.validate(config, path)
    }

    fn freeze_config(config: &EdgeGridConfig<Mutable>) -> EdgeGridConfig<Frozen> {
        config.freeze()
    }

    fn thaw_config(config: &EdgeGridConfig<Frozen>) -> EdgeGridConfig<Mutable> {
        config.thaw()
    }

    fn freeze_level(layout: &EdgeGridLayout<Mutable>) -> EdgeGridLayout<Frozen> {
        layout.freeze()
    }

    fn thaw_level(layout: &EdgeGridLayout<Frozen>) -> EdgeGridLayout<Mutable> {
        layout.thaw()
    }

    fn cell_elements<M: Mode>(config: &EdgeGridConfig<M>) -> &M::Elements<Cell> {
        &config.cell_elements
    }

    fn cell_grid<M: Mode>(layout: &EdgeGridLayout<M>) -> &M::Grid {
        &layout.cells
    }

    fn into_multi_level_content<M: Mode>(
        config: EdgeGridConfig<M>,
        layout: EdgeGrid3DLayout<M>,
    ) -> MazeContent<M> {
        MazeContent::EdgeGrid3D { config, layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;
    use crate::handler::MazeTypeHandler;
    use serde_json::json;

    fn config() -> EdgeGridConfig<Mutable> {
        EdgeGrid3DHandler::parse_config(&json!({
            "cell_elements": [
                {"name": "open", "token": "."},
                {"name": "elevator", "token": "E"},
                {"name": "escalator", "token": "S"},
            ],
            "wall_elements": [{"name": "open", "token": "."}, {"name": "wall", "token": "#"}],
        }))
        .unwrap()
    }

    fn level(id: &str, cells: &str) -> Value {
        json!({
            "id": id,
            "layout": {
                "cells": cells,
                "walls": {"vertical": "#.#\n#.#", "horizontal": "##\n..\n##"},
            },
        })
    }

    #[test]
    fn test_three_levels_with_adjacent_connectors() {
        let config = config();
        let spec = json!({
            "levels": [level("a", "E.\n.."), level("b", "E.\n.S"), level("c", "..\nS.")],
            "connectors": [
                {"type": "elevator", "from": {"level": "a", "row": 0, "col": 0},
                 "to": {"level": "b", "row": 0, "col": 0}},
                {"type": "escalator", "from": {"level": "b", "row": 1, "col": 1},
                 "to": {"level": "c", "row": 1, "col": 0}},
            ],
        });
        let layout = EdgeGrid3DHandler::parse_layout(&spec, &config).unwrap();
        assert_eq!(layout.levels.len(), 3);
        EdgeGrid3DHandler::validate(&config, &layout).unwrap();
    }

    #[test]
    fn test_skipping_a_level_fails() {
        let spec = json!({
            "levels": [level("a", "E.\n.."), level("b", "..\n.."), level("c", "E.\n..")],
            "connectors": [
                {"type": "elevator", "from": {"level": "a", "row": 0, "col": 0},
                 "to": {"level": "c", "row": 0, "col": 0}},
            ],
        });
        assert_eq!(
            EdgeGrid3DHandler::parse_layout(&spec, &config()).unwrap_err(),
            MazeError::NonAdjacentLevels {
                path: "layout.connectors[0]".into(),
                from: 0,
                to: 2,
            }
        );
    }

    #[test]
    fn test_wall_dimension_error_names_the_level() {
        let spec = json!({
            "levels": [
                level("a", "E.\n.."),
                {"layout": {"cells": "E.\n..", "walls": {"vertical": "#.#\n#.#", "horizontal": "##\n##"}}},
            ],
        });
        let err = EdgeGrid3DHandler::parse_layout(&spec, &config()).unwrap_err();
        assert!(matches!(
            err,
            MazeError::DimensionMismatch { ref path, .. }
                if path == "layout.levels[1].layout.walls.horizontal"
        ));
    }

    #[test]
    fn test_connector_out_of_bounds() {
        let spec = json!({
            "levels": [level("a", "E.\n.."), level("b", "E.\n..")],
            "connectors": [
                {"type": "elevator", "from": {"level": "a", "row": 5, "col": 0},
                 "to": {"level": "b", "row": 5, "col": 0}},
            ],
        });
        assert!(matches!(
            EdgeGrid3DHandler::parse_layout(&spec, &config()),
            Err(MazeError::IndexOutOfRange { .. })
        ));
    }
}
