//! Config parsing shared by every maze type.

use std::collections::BTreeSet;

use maze_config::PhysicalDimensions;
use serde_json::Value;

use crate::element::ElementKind;
use crate::element_set::{ElementLookup, ElementSet, ReservedDefaults};
use crate::error::{ElementField, MazeError, Result};
use crate::grid::GridView;
use crate::spec::{self, child, SpecMap};

/// Cell elements every multi-level maze must declare for its connectors
pub const REQUIRED_CONNECTOR_ELEMENTS: [&str; 2] = ["elevator", "escalator"];

const PHYSICAL_FIELDS: [&str; 3] = ["cell_size", "wall_height", "wall_thickness"];

/// Reserved defaults for well-known names, taken from the built-in table.
pub(crate) fn reserved(names: &[&str]) -> ReservedDefaults {
    maze_config::reserved_values_for(names)
}

/// Parse the cell vocabulary, accepting `elements` as an alias for
/// `cell_elements`.
pub(crate) fn parse_cell_elements<K: ElementKind>(
    map: &SpecMap,
    path: &str,
    reserved: &[(String, i64)],
    blocked: &BTreeSet<i64>,
) -> Result<ElementSet<K>> {
    let (key, items) = match spec::optional(map, "cell_elements") {
        Some(items) => ("cell_elements", items),
        None => match spec::optional(map, "elements") {
            Some(items) => ("elements", items),
            None => return Err(MazeError::missing(child(path, "cell_elements"))),
        },
    };
    ElementSet::from_list_excluding(items, reserved, blocked, &child(path, key))
}

/// Parse the required wall vocabulary.
pub(crate) fn parse_wall_elements<K: ElementKind>(
    map: &SpecMap,
    path: &str,
    reserved: &[(String, i64)],
) -> Result<ElementSet<K>> {
    let items = spec::required(map, "wall_elements", path)?;
    ElementSet::from_list(items, reserved, &child(path, "wall_elements"))
}

/// Read `cell_size`, `wall_height` and `wall_thickness`; omitted fields
/// take the built-in defaults, present fields must be positive numbers.
pub(crate) fn parse_physical(map: &SpecMap, path: &str) -> Result<PhysicalDimensions> {
    let mut present = SpecMap::new();
    for key in PHYSICAL_FIELDS {
        if let Some(value) = spec::optional(map, key) {
            spec::positive_number(value, &child(path, key))?;
            present.insert(key.to_string(), value.clone());
        }
    }
    serde_json::from_value(Value::Object(present))
        .map_err(|_| MazeError::type_mismatch(path, "physical dimensions"))
}

/// Append the physical fields that differ from the defaults.
pub(crate) fn physical_to_spec(physical: &PhysicalDimensions, map: &mut SpecMap) {
    for (key, value) in physical.non_default_fields() {
        map.insert(key.to_string(), Value::from(value));
    }
}

/// Fail unless the cell vocabulary declares the connector elements.
pub fn ensure_required_elements<K, S>(elements: &S, path: &str) -> Result<()>
where
    K: ElementKind,
    S: ElementLookup<K>,
{
    let missing: Vec<String> = REQUIRED_CONNECTOR_ELEMENTS
        .iter()
        .filter(|name| elements.value_for_name_ignore_case(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(MazeError::MissingRequiredElements {
            path: path.to_string(),
            names: missing,
        })
    }
}

/// Fail if any grid value has no element in `elements`.
pub(crate) fn check_grid_values<K, S, G>(grid: &G, elements: &S, path: &str) -> Result<()>
where
    K: ElementKind,
    S: ElementLookup<K>,
    G: GridView,
{
    match grid
        .as_slice()
        .iter()
        .find(|value| !elements.contains_value(**value))
    {
        Some(value) => Err(MazeError::UnknownElement {
            path: path.to_string(),
            field: ElementField::Value,
            value: value.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Cell;
    use crate::grid::Grid;
    use serde_json::json;

    #[test]
    fn test_physical_defaults_and_overrides() {
        let spec = json!({"cell_size": 0.5});
        let physical = parse_physical(spec::as_map(&spec, "config").unwrap(), "config").unwrap();
        assert_eq!(physical.cell_size, 0.5);
        assert_eq!(physical.wall_height, maze_config::wall_height());

        let mut emitted = SpecMap::new();
        physical_to_spec(&physical, &mut emitted);
        assert_eq!(Value::Object(emitted), json!({"cell_size": 0.5}));
    }

    #[test]
    fn test_physical_rejects_non_positive() {
        let spec = json!({"wall_thickness": -1});
        let err = parse_physical(spec::as_map(&spec, "config").unwrap(), "config").unwrap_err();
        assert_eq!(err, MazeError::out_of_range("config.wall_thickness", "> 0"));
    }

    #[test]
    fn test_physical_reads_integers_and_ignores_other_keys() {
        let spec = json!({
            "cell_elements": [{"name": "open", "token": "."}],
            "wall_height": 3,
            "wall_thickness": 0.25,
        });
        let physical = parse_physical(spec::as_map(&spec, "config").unwrap(), "config").unwrap();
        assert_eq!(physical.cell_size, maze_config::cell_size());
        assert_eq!(physical.wall_height, 3.0);
        assert_eq!(physical.wall_thickness, 0.25);

        let err = parse_physical(
            spec::as_map(&json!({"cell_size": "wide"}), "config").unwrap(),
            "config",
        )
        .unwrap_err();
        assert!(matches!(err, MazeError::TypeMismatch { .. }));
    }

    #[test]
    fn test_elements_alias() {
        let spec = json!({"elements": [{"name": "open", "token": "."}]});
        let map = spec::as_map(&spec, "config").unwrap();
        let set: ElementSet<Cell> =
            parse_cell_elements(map, "config", &reserved(&["open"]), &BTreeSet::new()).unwrap();
        assert_eq!(set.element("open").unwrap().value(), 0);

        let empty = json!({});
        let err = parse_cell_elements::<Cell>(
            spec::as_map(&empty, "config").unwrap(),
            "config",
            &[],
            &BTreeSet::new(),
        )
        .unwrap_err();
        assert_eq!(err, MazeError::missing("config.cell_elements"));
    }

    #[test]
    fn test_required_elements() {
        let items = json!([
            {"name": "open", "token": "."},
            {"name": "Elevator", "token": "E"},
        ]);
        let set = ElementSet::<Cell>::from_list(&items, &[], "e").unwrap();
        let err = ensure_required_elements(&set, "config.cell_elements").unwrap_err();
        assert_eq!(
            err,
            MazeError::MissingRequiredElements {
                path: "config.cell_elements".into(),
                names: vec!["escalator".into()],
            }
        );
    }

    #[test]
    fn test_check_grid_values() {
        let items = json!([{"name": "open", "token": ".", "value": 0}]);
        let set = ElementSet::<Cell>::from_list(&items, &[], "e").unwrap();
        let grid = Grid::from_rows(vec![vec![0, 0], vec![0, 4]]).unwrap();
        assert!(matches!(
            check_grid_values(&grid, &set, "layout.grid"),
            Err(MazeError::UnknownElement { field: ElementField::Value, .. })
        ));
        assert!(check_grid_values(&Grid::filled(1, 1, 0), &set, "layout.grid").is_ok());
    }
}
