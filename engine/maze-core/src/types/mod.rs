//! Per-maze-type configs, layouts and handlers.

pub mod edge_grid;
pub mod edge_grid_3d;
pub mod multi_level;
pub mod occupancy_grid;
pub mod occupancy_grid_3d;
pub mod radial_arm;
pub mod radial_arm_3d;

pub use edge_grid::{
    validate_edge_grid_dimensions, EdgeGridConfig, EdgeGridHandler, EdgeGridLayout,
    WallOrientation,
};
pub use edge_grid_3d::{EdgeGrid3DHandler, EdgeGrid3DLayout};
pub use multi_level::{LevelLayoutHandler, MultiLevelHandler, MultiLevelLayout};
pub use occupancy_grid::{
    occupancy_grid_elements, OccupancyGridConfig, OccupancyGridHandler, OccupancyGridLayout,
};
pub use occupancy_grid_3d::{OccupancyGrid3DHandler, OccupancyGrid3DLayout};
pub use radial_arm::{
    min_side_length, Hub, HubShape, RadialArmConfig, RadialArmHandler, RadialArmLayout,
    RadiusRule,
};
pub use radial_arm_3d::{RadialArm3DHandler, RadialArm3DLayout};
