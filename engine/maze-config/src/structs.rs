//! Public default-backed structs.
//!
//! These carry serde deserialization support so a config mapping can be
//! read directly into them; omitted fields take the built-in defaults.

use serde::Deserialize;

use crate::defaults;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_cell_size() -> f64 {
    defaults::cell_size()
}
fn d_wall_height() -> f64 {
    defaults::wall_height()
}
fn d_wall_thickness() -> f64 {
    defaults::wall_thickness()
}

// ============================================================================
// Structs
// ============================================================================

/// Physical dimensions of a maze, in meters.
///
/// Unknown keys are ignored so the struct can be read straight out of a
/// maze `config` mapping that also holds element lists.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicalDimensions {
    #[serde(default = "d_cell_size")]
    pub cell_size: f64,
    #[serde(default = "d_wall_height")]
    pub wall_height: f64,
    #[serde(default = "d_wall_thickness")]
    pub wall_thickness: f64,
}

impl Default for PhysicalDimensions {
    fn default() -> Self {
        Self {
            cell_size: defaults::cell_size(),
            wall_height: defaults::wall_height(),
            wall_thickness: defaults::wall_thickness(),
        }
    }
}

impl PhysicalDimensions {
    /// Fields that differ from the built-in defaults, in declaration order.
    ///
    /// Serializers use this to keep emitted configs minimal.
    pub fn non_default_fields(&self) -> Vec<(&'static str, f64)> {
        let default = Self::default();
        let mut fields = Vec::new();
        if self.cell_size != default.cell_size {
            fields.push(("cell_size", self.cell_size));
        }
        if self.wall_height != default.wall_height {
            fields.push(("wall_height", self.wall_height));
        }
        if self.wall_thickness != default.wall_thickness {
            fields.push(("wall_thickness", self.wall_thickness));
        }
        fields
    }
}

/// Text layout of a grid written with row/column index gutters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridFormat {
    /// Filler for gutter positions that carry no index
    pub pad_char: char,
    /// Grids larger than this (in either dimension) only label every
    /// `large_grid_interval`-th row and column
    pub large_grid_threshold: usize,
    pub large_grid_interval: usize,
}

impl Default for GridFormat {
    fn default() -> Self {
        Self {
            pad_char: defaults::grid_pad_char(),
            large_grid_threshold: defaults::large_grid_threshold(),
            large_grid_interval: defaults::large_grid_interval(),
        }
    }
}

impl GridFormat {
    /// Index labelling interval for a grid of the given shape.
    pub fn tick_interval(&self, height: usize, width: usize) -> usize {
        if height.max(width) > self.large_grid_threshold {
            self.large_grid_interval.max(1)
        } else {
            1
        }
    }
}
