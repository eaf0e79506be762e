//! Tests for the defaults crate.

use super::*;

#[test]
fn test_default_physical_dimensions() {
    let dims = PhysicalDimensions::default();
    assert!((dims.cell_size - 1.0).abs() < f64::EPSILON);
    assert!((dims.wall_height - 1.0).abs() < f64::EPSILON);
    assert!((dims.wall_thickness - 0.05).abs() < f64::EPSILON);
    assert!(dims.non_default_fields().is_empty());
}

#[test]
fn test_physical_dimensions_partial_toml() {
    let dims: PhysicalDimensions = toml::from_str("cell_size = 0.5").unwrap();
    assert!((dims.cell_size - 0.5).abs() < f64::EPSILON);
    assert!((dims.wall_height - 1.0).abs() < f64::EPSILON);
    assert_eq!(dims.non_default_fields(), vec![("cell_size", 0.5)]);
}

#[test]
fn test_physical_dimensions_ignores_unrelated_keys() {
    let dims: PhysicalDimensions =
        toml::from_str("wall_thickness = 0.1\nunrelated = \"value\"").unwrap();
    assert!((dims.wall_thickness - 0.1).abs() < f64::EPSILON);
    assert_eq!(dims.non_default_fields(), vec![("wall_thickness", 0.1)]);
}

#[test]
fn test_grid_format_tick_interval() {
    let format = GridFormat::default();
    assert_eq!(format.pad_char, '_');
    assert_eq!(format.tick_interval(5, 5), 1);
    assert_eq!(format.tick_interval(100, 100), 1);
    assert_eq!(format.tick_interval(101, 3), 10);
    assert_eq!(format.tick_interval(3, 250), 10);
}

#[test]
fn test_hub_defaults() {
    assert!((hub_angle_degrees() - 360.0).abs() < f64::EPSILON);
}
