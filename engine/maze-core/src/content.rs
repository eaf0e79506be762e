//! Type-tagged maze content.
//!
//! [`MazeContent`] is the closed set of config/layout pairs, one variant
//! per [`MazeType`]. Operations dispatch to the variant's handler through a
//! static match.

use serde_json::Value;

use crate::error::Result;
use crate::handler::MazeTypeHandler;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::types::{
    EdgeGrid3DHandler, EdgeGrid3DLayout, EdgeGridConfig, EdgeGridHandler, EdgeGridLayout,
    OccupancyGrid3DHandler, OccupancyGrid3DLayout, OccupancyGridConfig, OccupancyGridHandler,
    OccupancyGridLayout, RadialArm3DHandler, RadialArm3DLayout, RadialArmConfig,
    RadialArmHandler, RadialArmLayout,
};

#[derive(Debug, Clone, PartialEq)]
pub enum MazeContent<M: Mode> {
    OccupancyGrid {
        config: OccupancyGridConfig<M>,
        layout: OccupancyGridLayout<M>,
    },
    EdgeGrid {
        config: EdgeGridConfig<M>,
        layout: EdgeGridLayout<M>,
    },
    RadialArm {
        config: RadialArmConfig<M>,
        layout: RadialArmLayout<M>,
    },
    OccupancyGrid3D {
        config: OccupancyGridConfig<M>,
        layout: OccupancyGrid3DLayout<M>,
    },
    EdgeGrid3D {
        config: EdgeGridConfig<M>,
        layout: EdgeGrid3DLayout<M>,
    },
    RadialArm3D {
        config: RadialArmConfig<M>,
        layout: RadialArm3DLayout<M>,
    },
}

/// Match on every variant, binding the handler type alongside the
/// config and layout.
macro_rules! dispatch {
    ($content:expr, |$handler:ident, $config:ident, $layout:ident| $body:expr) => {
        match $content {
            MazeContent::OccupancyGrid { config: $config, layout: $layout } => {
                type $handler = OccupancyGridHandler;
                $body
            }
            MazeContent::EdgeGrid { config: $config, layout: $layout } => {
                type $handler = EdgeGridHandler;
                $body
            }
            MazeContent::RadialArm { config: $config, layout: $layout } => {
                type $handler = RadialArmHandler;
                $body
            }
            MazeContent::OccupancyGrid3D { config: $config, layout: $layout } => {
                type $handler = OccupancyGrid3DHandler;
                $body
            }
            MazeContent::EdgeGrid3D { config: $config, layout: $layout } => {
                type $handler = EdgeGrid3DHandler;
                $body
            }
            MazeContent::RadialArm3D { config: $config, layout: $layout } => {
                type $handler = RadialArm3DHandler;
                $body
            }
        }
    };
}

impl MazeContent<Mutable> {
    /// Parse a config/layout pair with the handler for `maze_type`.
    pub fn parse(maze_type: MazeType, config: &Value, layout: &Value) -> Result<Self> {
        match maze_type {
            MazeType::OccupancyGrid => OccupancyGridHandler::parse(config, layout),
            MazeType::EdgeGrid => EdgeGridHandler::parse(config, layout),
            MazeType::RadialArm => RadialArmHandler::parse(config, layout),
            MazeType::OccupancyGrid3D => OccupancyGrid3DHandler::parse(config, layout),
            MazeType::EdgeGrid3D => EdgeGrid3DHandler::parse(config, layout),
            MazeType::RadialArm3D => RadialArm3DHandler::parse(config, layout),
        }
    }

    /// Deep copy into frozen storage. Callers validate first.
    pub fn freeze(&self) -> MazeContent<Frozen> {
        dispatch!(self, |H, config, layout| {
            let (config, layout) = H::freeze(config, layout);
            H::into_content(config, layout)
        })
    }
}

impl MazeContent<Frozen> {
    pub fn thaw(&self) -> MazeContent<Mutable> {
        dispatch!(self, |H, config, layout| {
            let (config, layout) = H::thaw(config, layout);
            H::into_content(config, layout)
        })
    }
}

impl<M: Mode> MazeContent<M> {
    pub fn maze_type(&self) -> MazeType {
        match self {
            MazeContent::OccupancyGrid { .. } => MazeType::OccupancyGrid,
            MazeContent::EdgeGrid { .. } => MazeType::EdgeGrid,
            MazeContent::RadialArm { .. } => MazeType::RadialArm,
            MazeContent::OccupancyGrid3D { .. } => MazeType::OccupancyGrid3D,
            MazeContent::EdgeGrid3D { .. } => MazeType::EdgeGrid3D,
            MazeContent::RadialArm3D { .. } => MazeType::RadialArm3D,
        }
    }

    pub fn validate(&self) -> Result<()> {
        dispatch!(self, |H, config, layout| H::validate::<M>(config, layout))
    }

    pub fn config_to_spec(&self) -> Value {
        dispatch!(self, |H, config, _layout| H::config_to_spec::<M>(config))
    }

    pub fn layout_to_spec(&self, with_grid_numbers: bool) -> Value {
        dispatch!(self, |H, config, layout| {
            H::layout_to_spec::<M>(layout, config, with_grid_numbers)
        })
    }
}
