//! Built-in defaults for maze specifications.
//!
//! This crate owns every value a maze spec falls back to when a field is
//! omitted: physical dimensions, the reserved values handed to well-known
//! element names, the grid text format, and hub defaults.
//!
//! # Source of truth
//!
//! Defaults live in `maze.defaults.toml` at the workspace root and are
//! embedded at compile time, so every consumer of the engine agrees on
//! them without reading any file at runtime.
//!
//! ```text
//! [physical]        cell_size, wall_height, wall_thickness (meters)
//! [reserved_values] open, wall, elevator, escalator
//! [grid]            pad_char, large_grid_threshold, large_grid_interval
//! [hub]             angle_degrees
//! ```

mod defaults;
mod structs;

pub use defaults::*;
pub use structs::*;

#[cfg(test)]
mod tests;
