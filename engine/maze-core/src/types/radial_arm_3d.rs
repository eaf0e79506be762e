//! Stacked radial-arm mazes.
//!
//! The hub is declared once at the layout root and shared by every level.
//! Each level only carries its arms, and every level must have as many
//! arms as the first. Connector locations name the arm they sit on.

use serde_json::Value;
use tracing::debug;

use crate::config::ensure_required_elements;
use crate::connector::{
    connectors_to_spec, grid_cell, parse_connectors, validate_connectors, ArmPolicy, Connector,
    ConnectorValues, Location,
};
use crate::content::MazeContent;
use crate::element::Cell;
use crate::error::{MazeError, Result};
use crate::handler::MazeTypeHandler;
use crate::levels::{parse_level_specs, validate_level_definitions, Level};
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::spec::{self, child, item, mapping};
use crate::types::edge_grid::{EdgeGridConfig, EdgeGridLayout};
use crate::types::radial_arm::{
    arm_widths, arms_to_spec, parse_arms, validate_arms, Hub, RadialArmConfig, RadiusRule,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RadialArm3DLayout<M: Mode> {
    pub hub: Hub,
    /// Each level holds its arms in hub order
    pub levels: Vec<Level<Vec<EdgeGridLayout<M>>>>,
    pub connectors: Vec<Connector>,
}

impl<M: Mode> RadialArm3DLayout<M> {
    fn first_level_widths(&self) -> Vec<usize> {
        self.levels
            .first()
            .map(|level| arm_widths(&level.layout))
            .unwrap_or_default()
    }
}

fn level_arms_path(index: usize) -> String {
    child(&child(&item("layout.levels", index), "layout"), "arms")
}

fn check_arm_counts<L>(levels: &[Level<Vec<L>>]) -> Result<()> {
    let Some(first) = levels.first() else {
        return Ok(());
    };
    let expected = first.layout.len();
    for level in &levels[1..] {
        if level.layout.len() != expected {
            return Err(MazeError::DimensionMismatch {
                path: level_arms_path(level.index()),
                context: format!("arm count must match level '{}'", first.name()),
                expected: expected.to_string(),
                actual: level.layout.len().to_string(),
            });
        }
    }
    Ok(())
}

fn arm_cell<M: Mode>(
    levels: &[Level<Vec<EdgeGridLayout<M>>>],
    location: &Location,
    path: &str,
) -> Result<i64> {
    let level = levels
        .get(location.level.index)
        .ok_or_else(|| MazeError::UnknownLevel {
            path: child(path, "level"),
            identifier: location.level.name.clone(),
        })?;
    let arm_path = child(path, "arm");
    let arm_index = location.arm.ok_or_else(|| MazeError::missing(arm_path.clone()))?;
    let arm = level
        .layout
        .get(arm_index)
        .ok_or_else(|| MazeError::IndexOutOfRange {
            context: arm_path,
            index: arm_index.to_string(),
            bounds: format!("{} arms", level.layout.len()),
        })?;
    grid_cell(&arm.cells, location, path)
}

fn check_connectors<M: Mode>(config: &EdgeGridConfig<M>, layout: &RadialArm3DLayout<M>) -> Result<()> {
    let values =
        ConnectorValues::from_elements::<Cell, _>(&config.cell_elements, "config.cell_elements")?;
    validate_connectors(&layout.connectors, values, "layout.connectors", |location, path| {
        arm_cell(&layout.levels, location, path)
    })
}

/// Handler for `radial_arm_3d`
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialArm3DHandler;

impl MazeTypeHandler for RadialArm3DHandler {
    const MAZE_TYPE: MazeType = MazeType::RadialArm3D;
    type Config<M: Mode> = RadialArmConfig<M>;
    type Layout<M: Mode> = RadialArm3DLayout<M>;

    fn parse_config(spec: &Value) -> Result<RadialArmConfig<Mutable>> {
        let config = EdgeGridConfig::parse(spec, &["elevator", "escalator"])?;
        ensure_required_elements(&config.cell_elements, "config.cell_elements")?;
        Ok(config)
    }

    fn parse_layout(
        spec: &Value,
        config: &RadialArmConfig<Mutable>,
    ) -> Result<RadialArm3DLayout<Mutable>> {
        let path = "layout";
        let map = spec::as_map(spec, path)?;
        let hub_path = child(path, "center_hub");
        let hub_spec = spec::required(map, "center_hub", path)?;
        spec::as_map(hub_spec, &hub_path)?;

        let levels_path = child(path, "levels");
        let level_specs = parse_level_specs(spec::required(map, "levels", path)?, &levels_path)?;
        let mut levels = Vec::with_capacity(level_specs.len());
        for (definition, level_spec) in level_specs {
            let layout_path = child(&item(&levels_path, definition.index), "layout");
            let level_map = spec::as_map(&level_spec, &layout_path)?;
            let arms = parse_arms(
                spec::required(level_map, "arms", &layout_path)?,
                config,
                &child(&layout_path, "arms"),
            )?;
            levels.push(Level {
                definition,
                layout: arms,
            });
        }
        check_arm_counts(&levels)?;

        let hub = Hub::parse(
            hub_spec,
            &arm_widths(&levels[0].layout),
            RadiusRule::MaxWidthTimesCount,
            &hub_path,
        )?;

        let definitions: Vec<_> = levels.iter().map(|level| level.definition.clone()).collect();
        let connectors = parse_connectors(
            spec::optional(map, "connectors"),
            &definitions,
            ArmPolicy::Required,
            &child(path, "connectors"),
        )?;
        let layout = RadialArm3DLayout {
            hub,
            levels,
            connectors,
        };
        check_connectors(config, &layout)?;
        debug!(
            levels = layout.levels.len(),
            arms = layout.levels[0].layout.len(),
            connectors = layout.connectors.len(),
            "Parsed radial arm 3d layout"
        );
        Ok(layout)
    }

    fn validate<M: Mode>(config: &RadialArmConfig<M>, layout: &RadialArm3DLayout<M>) -> Result<()> {
        validate_level_definitions(
            layout.levels.iter().map(|level| &level.definition),
            "layout.levels",
        )?;
        for level in &layout.levels {
            validate_arms(&level.layout, config, &level_arms_path(level.index()))?;
        }
        check_arm_counts(&layout.levels)?;
        layout.hub.validate(
            &layout.first_level_widths(),
            RadiusRule::MaxWidthTimesCount,
            "layout.center_hub",
        )?;
        check_connectors(config, layout)
    }

    fn freeze(
        config: &RadialArmConfig<Mutable>,
        layout: &RadialArm3DLayout<Mutable>,
    ) -> (RadialArmConfig<Frozen>, RadialArm3DLayout<Frozen>) {
        let levels = layout
            .levels
            .iter()
            .map(|level| level.map(|arms| arms.iter().map(EdgeGridLayout::freeze).collect()))
            .collect();
        let layout = RadialArm3DLayout {
            hub: layout.hub,
            levels,
            connectors: layout.connectors.clone(),
        };
        (config.freeze(), layout)
    }

    fn thaw(
        config: &RadialArmConfig<Frozen>,
        layout: &RadialArm3DLayout<Frozen>,
    ) -> (RadialArmConfig<Mutable>, RadialArm3DLayout<Mutable>) {
        let levels = layout
            .levels
            .iter()
            .map(|level| level.map(|arms| arms.iter().map(EdgeGridLayout::thaw).collect()))
            .collect();
        let layout = RadialArm3DLayout {
            hub: layout.hub,
            levels,
            connectors: layout.connectors.clone(),
        };
        (config.thaw(), layout)
    }

    fn config_to_spec<M: Mode>(config: &RadialArmConfig<M>) -> Value {
        config.to_spec()
    }

    fn layout_to_spec<M: Mode>(
        layout: &RadialArm3DLayout<M>,
        config: &RadialArmConfig<M>,
        with_grid_numbers: bool,
    ) -> Value {
        let levels = layout
            .levels
            .iter()
            .map(|level| {
                mapping([
                    ("id", Value::from(level.name())),
                    (
                        "layout",
                        mapping([("arms", arms_to_spec(&level.layout, config, with_grid_numbers))]),
                    ),
                ])
            })
            .collect();
        let mut map = spec::SpecMap::new();
        map.insert("center_hub".into(), layout.hub.to_spec());
        map.insert("levels".into(), Value::Array(levels));
        if !layout.connectors.is_empty() {
            map.insert("connectors".into(), connectors_to_spec(&layout.connectors));
        }
        Value::Object(map)
    }

    fn into_content<M: Mode>(
        config: RadialArmConfig<M>,
        layout: RadialArm3DLayout<M>,
    ) -> MazeContent<M> {
        MazeContent::RadialArm3D { config, layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::radial_arm::HubShape;
    use serde_json::json;

    fn config() -> RadialArmConfig<Mutable> {
        RadialArm3DHandler::parse_config(&json!({
            "cell_elements": [
                {"name": "open", "token": "."},
                {"name": "elevator", "token": "E"},
                {"name": "escalator", "token": "S"},
            ],
            "wall_elements": [{"name": "open", "token": "."}, {"name": "wall", "token": "#"}],
        }))
        .unwrap()
    }

    fn arm(cells: &str) -> Value {
        json!({
            "layout": {
                "cells": cells,
                "walls": {"vertical": "#.#", "horizontal": "##\n##"},
            },
        })
    }

    fn spec(upper_arms: Vec<Value>, connectors: Value) -> Value {
        json!({
            "center_hub": {"shape": "circular", "angle_degrees": 180},
            "levels": [
                {"id": "ground", "layout": {"arms": [arm("E."), arm("..")]}},
                {"id": "upper", "layout": {"arms": upper_arms}},
            ],
            "connectors": connectors,
        })
    }

    #[test]
    fn test_hub_uses_widest_arm_times_count() {
        let config = config();
        let layout = RadialArm3DHandler::parse_layout(
            &spec(vec![arm(".."), arm("..")], json!([])),
            &config,
        )
        .unwrap();
        let expected = RadiusRule::MaxWidthTimesCount.min_radius(&[1, 1], 180.0);
        assert_eq!(layout.hub.shape, HubShape::Circular { radius: expected });
        assert_eq!(layout.levels[1].layout.len(), 2);
        RadialArm3DHandler::validate(&config, &layout).unwrap();
    }

    #[test]
    fn test_arm_counts_must_match() {
        let err = RadialArm3DHandler::parse_layout(&spec(vec![arm("..")], json!([])), &config())
            .unwrap_err();
        assert_eq!(
            err,
            MazeError::DimensionMismatch {
                path: "layout.levels[1].layout.arms".into(),
                context: "arm count must match level 'ground'".into(),
                expected: "2".into(),
                actual: "1".into(),
            }
        );
    }

    #[test]
    fn test_connectors_need_an_arm() {
        let connectors = json!([
            {"type": "elevator", "from": {"level": 0, "row": 0, "col": 0},
             "to": {"level": 1, "row": 0, "col": 0, "arm": 0}},
        ]);
        let err = RadialArm3DHandler::parse_layout(&spec(vec![arm("E."), arm("..")], connectors), &config())
            .unwrap_err();
        assert_eq!(err, MazeError::missing("layout.connectors[0].from.arm"));
    }

    #[test]
    fn test_connector_on_missing_arm() {
        let connectors = json!([
            {"type": "elevator", "from": {"level": 0, "row": 0, "col": 0, "arm": 4},
             "to": {"level": 1, "row": 0, "col": 0, "arm": 4}},
        ]);
        let err = RadialArm3DHandler::parse_layout(&spec(vec![arm("E."), arm("..")], connectors), &config())
            .unwrap_err();
        assert!(matches!(
            err,
            MazeError::IndexOutOfRange { ref context, .. } if context == "layout.connectors[0].from.arm"
        ));
    }

    #[test]
    fn test_round_trip_keeps_connectors_and_hub() {
        let config = config();
        let connectors = json!([
            {"type": "elevator", "from": {"level": "ground", "row": 0, "col": 0, "arm": 0},
             "to": {"level": "upper", "row": 0, "col": 0, "arm": 0}},
            {"type": "escalator", "from": {"level": "ground", "row": 0, "col": 0, "arm": 0},
             "to": {"level": "upper", "row": 0, "col": 1, "arm": 1}},
        ]);
        let input = spec(vec![arm("E."), arm(".S")], connectors);
        // escalator starting on an elevator cell
        assert!(matches!(
            RadialArm3DHandler::parse_layout(&input, &config),
            Err(MazeError::ConnectorCellMismatch { .. })
        ));

        let connectors = json!([
            {"type": "elevator", "from": {"level": "ground", "row": 0, "col": 0, "arm": 0},
             "to": {"level": "upper", "row": 0, "col": 0, "arm": 0}},
        ]);
        let layout = RadialArm3DHandler::parse_layout(&spec(vec![arm("E."), arm(".S")], connectors), &config)
            .unwrap();
        let emitted = RadialArm3DHandler::layout_to_spec(&layout, &config, true);
        assert_eq!(emitted["connectors"][0]["from"]["arm"], json!(0));
        assert_eq!(emitted["center_hub"]["shape"], json!("circular"));
        let reparsed = RadialArm3DHandler::parse_layout(&emitted, &config).unwrap();
        assert_eq!(reparsed, layout);

        let (frozen_config, frozen) = RadialArm3DHandler::freeze(&config, &layout);
        RadialArm3DHandler::validate(&frozen_config, &frozen).unwrap();
        assert_eq!(RadialArm3DHandler::thaw(&frozen_config, &frozen).1, layout);
    }
}
