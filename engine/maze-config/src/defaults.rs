//! Default values loaded from maze.defaults.toml.
//!
//! The TOML file is embedded at compile time and parsed once on first use.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../maze.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsFile> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("maze.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing maze.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsFile {
    physical: PhysicalDefaults,
    reserved_values: BTreeMap<String, i64>,
    grid: GridDefaults,
    hub: HubDefaults,
}

#[derive(Debug, Deserialize)]
struct PhysicalDefaults {
    cell_size: f64,
    wall_height: f64,
    wall_thickness: f64,
}

#[derive(Debug, Deserialize)]
struct GridDefaults {
    pad_char: char,
    large_grid_threshold: usize,
    large_grid_interval: usize,
}

#[derive(Debug, Deserialize)]
struct HubDefaults {
    angle_degrees: f64,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Physical
pub fn cell_size() -> f64 {
    DEFAULTS.physical.cell_size
}
pub fn wall_height() -> f64 {
    DEFAULTS.physical.wall_height
}
pub fn wall_thickness() -> f64 {
    DEFAULTS.physical.wall_thickness
}

// Reserved element values

/// Reserved value for a well-known element name, matched case-insensitively.
pub fn reserved_value(name: &str) -> Option<i64> {
    DEFAULTS
        .reserved_values
        .get(&name.to_lowercase())
        .copied()
}

/// Reserved values for the given element names, in the order given.
///
/// Names without an entry in the defaults file are skipped.
pub fn reserved_values_for(names: &[&str]) -> Vec<(String, i64)> {
    names
        .iter()
        .filter_map(|name| reserved_value(name).map(|value| (name.to_lowercase(), value)))
        .collect()
}

// Grid text format
pub fn grid_pad_char() -> char {
    DEFAULTS.grid.pad_char
}
pub fn large_grid_threshold() -> usize {
    DEFAULTS.grid.large_grid_threshold
}
pub fn large_grid_interval() -> usize {
    DEFAULTS.grid.large_grid_interval
}

// Hub
pub fn hub_angle_degrees() -> f64 {
    DEFAULTS.hub.angle_degrees
}
