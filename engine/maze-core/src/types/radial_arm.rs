//! Radial-arm mazes: a central hub with edge-grid arms radiating from it.
//!
//! Each arm is an edge grid whose row count is the width it presents to
//! the hub. The hub must be large enough for every arm to attach.

use serde_json::{json, Value};
use tracing::warn;

use crate::content::MazeContent;
use crate::error::{MazeError, Result};
use crate::handler::MazeTypeHandler;
use crate::mode::{Frozen, Mode, Mutable};
use crate::registry::MazeType;
use crate::spec::{self, child, item, mapping};
use crate::types::edge_grid::{EdgeGridConfig, EdgeGridLayout};

/// Radial-arm configs carry the same vocabularies as edge grids
pub type RadialArmConfig<M> = EdgeGridConfig<M>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HubShape {
    Circular { radius: f64 },
    Polygon { side_length: f64 },
}

impl HubShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            HubShape::Circular { .. } => "circular",
            HubShape::Polygon { .. } => "polygon",
        }
    }
}

/// How the minimum circular hub radius is derived from arm widths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusRule {
    /// `sum(widths) / radians(angle)`; single-level radial arms
    SumOfWidths,
    /// `max(widths) * count / radians(angle)`; multi-level radial arms
    MaxWidthTimesCount,
}

impl RadiusRule {
    pub fn min_radius(self, arm_widths: &[usize], angle_degrees: f64) -> f64 {
        let radians = angle_degrees.to_radians();
        let total = match self {
            RadiusRule::SumOfWidths => arm_widths.iter().sum::<usize>(),
            RadiusRule::MaxWidthTimesCount => {
                arm_widths.iter().copied().max().unwrap_or(0) * arm_widths.len()
            }
        };
        total as f64 / radians
    }
}

/// Smallest polygon side that fits the widest arm
pub fn min_side_length(arm_widths: &[usize]) -> f64 {
    arm_widths.iter().copied().max().unwrap_or(0) as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hub {
    /// Sweep the arms are spread over, in `(0, 360]`
    pub angle_degrees: f64,
    pub shape: HubShape,
}

impl Hub {
    /// Parse `center_hub`, deriving omitted sizes from the arm widths.
    pub fn parse(spec: &Value, arm_widths: &[usize], rule: RadiusRule, path: &str) -> Result<Self> {
        let map = spec::as_map(spec, path)?;
        let shape_path = child(path, "shape");
        let shape = spec::as_str(spec::required(map, "shape", path)?, &shape_path)?;
        if shape != "circular" && shape != "polygon" {
            return Err(MazeError::out_of_range(shape_path, "'circular' or 'polygon'"));
        }
        if map.contains_key("arm_width") {
            return Err(MazeError::DerivedFieldOverride {
                path: child(path, "arm_width"),
                reason: "arm width comes from the arm layouts".into(),
            });
        }
        let angle_degrees = match spec::optional(map, "angle_degrees") {
            Some(value) => parse_angle(value, &child(path, "angle_degrees"))?,
            None => maze_config::hub_angle_degrees(),
        };

        let shape = if shape == "circular" {
            if map.contains_key("side_length") {
                warn!(path = %path, "Ignoring side_length on a circular hub");
            }
            let minimum = rule.min_radius(arm_widths, angle_degrees);
            let radius = sized_field(map, "radius", minimum, path)?;
            HubShape::Circular { radius }
        } else {
            if let Some(sides) = spec::optional(map, "sides") {
                let sides_path = child(path, "sides");
                let sides = spec::non_negative_index(sides, &sides_path)?;
                if sides != arm_widths.len() {
                    return Err(MazeError::DerivedFieldOverride {
                        path: sides_path,
                        reason: format!(
                            "polygon sides must equal the number of arms ({})",
                            arm_widths.len()
                        ),
                    });
                }
            }
            if map.contains_key("radius") {
                warn!(path = %path, "Ignoring radius on a polygon hub");
            }
            let side_length = sized_field(map, "side_length", min_side_length(arm_widths), path)?;
            HubShape::Polygon { side_length }
        };
        Ok(Self {
            angle_degrees,
            shape,
        })
    }

    /// Re-check the angle range and the size bound for the given arms.
    pub fn validate(&self, arm_widths: &[usize], rule: RadiusRule, path: &str) -> Result<()> {
        if !(self.angle_degrees > 0.0 && self.angle_degrees <= 360.0) {
            return Err(MazeError::out_of_range(child(path, "angle_degrees"), "in (0, 360]"));
        }
        let (field, size, minimum) = match self.shape {
            HubShape::Circular { radius } => {
                ("radius", radius, rule.min_radius(arm_widths, self.angle_degrees))
            }
            HubShape::Polygon { side_length } => {
                ("side_length", side_length, min_side_length(arm_widths))
            }
        };
        if size < minimum {
            return Err(MazeError::out_of_range(child(path, field), format!(">= {minimum}")));
        }
        Ok(())
    }

    pub fn to_spec(&self) -> Value {
        let mut spec = json!({
            "shape": self.shape.as_str(),
            "angle_degrees": self.angle_degrees,
        });
        if let Some(map) = spec.as_object_mut() {
            match self.shape {
                HubShape::Circular { radius } => map.insert("radius".into(), Value::from(radius)),
                HubShape::Polygon { side_length } => {
                    map.insert("side_length".into(), Value::from(side_length))
                }
            };
        }
        spec
    }
}

fn parse_angle(value: &Value, path: &str) -> Result<f64> {
    let angle = spec::as_number(value, path)?;
    if angle <= 0.0 || angle > 360.0 {
        return Err(MazeError::out_of_range(path, "in (0, 360]"));
    }
    Ok(angle)
}

/// An explicit size must be positive and at least `minimum`; an omitted
/// one takes `minimum`.
fn sized_field(map: &spec::SpecMap, key: &str, minimum: f64, path: &str) -> Result<f64> {
    let field_path = child(path, key);
    match spec::optional(map, key) {
        Some(value) => {
            let size = spec::positive_number(value, &field_path)?;
            if size < minimum {
                return Err(MazeError::out_of_range(field_path, format!(">= {minimum}")));
            }
            Ok(size)
        }
        None => Ok(minimum),
    }
}

/// Parse an `arms` list of `{layout: {cells, walls}}` entries.
pub(crate) fn parse_arms(
    spec: &Value,
    config: &EdgeGridConfig<Mutable>,
    path: &str,
) -> Result<Vec<EdgeGridLayout<Mutable>>> {
    let entries = spec::as_list(spec, path)?;
    if entries.is_empty() {
        return Err(MazeError::type_mismatch(path, "a non-empty list"));
    }
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let arm_path = item(path, index);
            let map = spec::as_map(entry, &arm_path)?;
            if map.contains_key("config") {
                return Err(MazeError::UnexpectedField {
                    path: child(&arm_path, "config"),
                    reason: "arms share the top-level config".into(),
                });
            }
            let layout_path = child(&arm_path, "layout");
            let layout = spec::required(map, "layout", &arm_path)?;
            spec::as_map(layout, &layout_path)?;
            EdgeGridLayout::parse(layout, config, &layout_path)
        })
        .collect()
}

pub(crate) fn arm_widths<M: Mode>(arms: &[EdgeGridLayout<M>]) -> Vec<usize> {
    arms.iter().map(EdgeGridLayout::height).collect()
}

pub(crate) fn arms_to_spec<M: Mode>(
    arms: &[EdgeGridLayout<M>],
    config: &EdgeGridConfig<M>,
    with_grid_numbers: bool,
) -> Value {
    Value::Array(
        arms.iter()
            .map(|arm| mapping([("layout", arm.to_spec(config, with_grid_numbers))]))
            .collect(),
    )
}

pub(crate) fn validate_arms<M: Mode>(
    arms: &[EdgeGridLayout<M>],
    config: &EdgeGridConfig<M>,
    path: &str,
) -> Result<()> {
    if arms.is_empty() {
        return Err(MazeError::type_mismatch(path, "a non-empty list"));
    }
    for (index, arm) in arms.iter().enumerate() {
        arm.validate(config, &child(&item(path, index), "layout"))?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadialArmLayout<M: Mode> {
    pub hub: Hub,
    pub arms: Vec<EdgeGridLayout<M>>,
}

/// Handler for `radial_arm`
#[derive(Debug, Clone, Copy, Default)]
pub struct RadialArmHandler;

impl MazeTypeHandler for RadialArmHandler {
    const MAZE_TYPE: MazeType = MazeType::RadialArm;
    type Config<M: Mode> = RadialArmConfig<M>;
    type Layout<M: Mode> = RadialArmLayout<M>;

    fn parse_config(spec: &Value) -> Result<RadialArmConfig<Mutable>> {
        EdgeGridConfig::parse(spec, &[])
    }

    fn parse_layout(spec: &Value, config: &RadialArmConfig<Mutable>) -> Result<RadialArmLayout<Mutable>> {
        let path = "layout";
        let map = spec::as_map(spec, path)?;
        let hub_spec = spec::required(map, "center_hub", path)?;
        spec::as_map(hub_spec, &child(path, "center_hub"))?;
        let arms = parse_arms(
            spec::required(map, "arms", path)?,
            config,
            &child(path, "arms"),
        )?;
        let hub = Hub::parse(
            hub_spec,
            &arm_widths(&arms),
            RadiusRule::SumOfWidths,
            &child(path, "center_hub"),
        )?;
        Ok(RadialArmLayout { hub, arms })
    }

    fn validate<M: Mode>(config: &RadialArmConfig<M>, layout: &RadialArmLayout<M>) -> Result<()> {
        validate_arms(&layout.arms, config, "layout.arms")?;
        layout.hub.validate(
            &arm_widths(&layout.arms),
            RadiusRule::SumOfWidths,
            "layout.center_hub",
        )
    }

    fn freeze(
        config: &RadialArmConfig<Mutable>,
        layout: &RadialArmLayout<Mutable>,
    ) -> (RadialArmConfig<Frozen>, RadialArmLayout<Frozen>) {
        let layout = RadialArmLayout {
            hub: layout.hub,
            arms: layout.arms.iter().map(EdgeGridLayout::freeze).collect(),
        };
        (config.freeze(), layout)
    }

    fn thaw(
        config: &RadialArmConfig<Frozen>,
        layout: &RadialArmLayout<Frozen>,
    ) -> (RadialArmConfig<Mutable>, RadialArmLayout<Mutable>) {
        let layout = RadialArmLayout {
            hub: layout.hub,
            arms: layout.arms.iter().map(EdgeGridLayout::thaw).collect(),
        };
        (config.thaw(), layout)
    }

    fn config_to_spec<M: Mode>(config: &RadialArmConfig<M>) -> Value {
        config.to_spec()
    }

    fn layout_to_spec<M: Mode>(
        layout: &RadialArmLayout<M>,
        config: &RadialArmConfig<M>,
        with_grid_numbers: bool,
    ) -> Value {
        mapping([
            ("center_hub", layout.hub.to_spec()),
            ("arms", arms_to_spec(&layout.arms, config, with_grid_numbers)),
        ])
    }

    fn into_content<M: Mode>(config: RadialArmConfig<M>, layout: RadialArmLayout<M>) -> MazeContent<M> {
        MazeContent::RadialArm { config, layout }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> RadialArmConfig<Mutable> {
        RadialArmHandler::parse_config(&json!({
            "cell_elements": [{"name": "open", "token": "."}],
            "wall_elements": [{"name": "open", "token": "."}, {"name": "wall", "token": "#"}],
        }))
        .unwrap()
    }

    /// An arm `rows` cells wide and two cells long
    fn arm(rows: usize) -> Value {
        let cells = "..\n".repeat(rows);
        let vertical = "#.#\n".repeat(rows);
        let horizontal = "##\n".repeat(rows + 1);
        json!({"layout": {"cells": cells, "walls": {"vertical": vertical, "horizontal": horizontal}}})
    }

    fn layout(hub: Value, arms: Vec<Value>) -> Result<RadialArmLayout<Mutable>> {
        RadialArmHandler::parse_layout(&json!({"center_hub": hub, "arms": arms}), &config())
    }

    #[test]
    fn test_minimum_radius_sums_arm_widths() {
        let layout = layout(json!({"shape": "circular", "angle_degrees": 180}), vec![arm(1), arm(3)]).unwrap();
        let expected = 4.0 / std::f64::consts::PI;
        match layout.hub.shape {
            HubShape::Circular { radius } => assert!((radius - expected).abs() < 1e-12),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_radius_rules_are_pinned() {
        let widths = [1, 3];
        let sum = RadiusRule::SumOfWidths.min_radius(&widths, 360.0);
        let max = RadiusRule::MaxWidthTimesCount.min_radius(&widths, 360.0);
        assert!((sum - 4.0 / (2.0 * std::f64::consts::PI)).abs() < 1e-12);
        assert!((max - 6.0 / (2.0 * std::f64::consts::PI)).abs() < 1e-12);
        assert_eq!(min_side_length(&widths), 3.0);
    }

    #[test]
    fn test_explicit_radius_below_minimum_fails() {
        let err = layout(json!({"shape": "circular", "radius": 0.1}), vec![arm(2), arm(2)]).unwrap_err();
        assert!(matches!(
            err,
            MazeError::OutOfRangeValue { ref path, .. } if path == "layout.center_hub.radius"
        ));
    }

    #[test]
    fn test_polygon_hub() {
        let layout = layout(json!({"shape": "polygon"}), vec![arm(1), arm(2), arm(1)]).unwrap();
        assert_eq!(layout.hub.shape, HubShape::Polygon { side_length: 2.0 });
        assert_eq!(layout.hub.angle_degrees, 360.0);
        assert_eq!(
            layout.hub.to_spec(),
            json!({"shape": "polygon", "angle_degrees": 360.0, "side_length": 2.0})
        );
    }

    #[test]
    fn test_derived_fields_rejected() {
        assert!(matches!(
            layout(json!({"shape": "circular", "arm_width": 2}), vec![arm(1)]),
            Err(MazeError::DerivedFieldOverride { .. })
        ));
        assert!(matches!(
            layout(json!({"shape": "polygon", "sides": 5}), vec![arm(1), arm(1), arm(1)]),
            Err(MazeError::DerivedFieldOverride { .. })
        ));
        layout(json!({"shape": "polygon", "sides": 3}), vec![arm(1), arm(1), arm(1)]).unwrap();
    }

    #[test]
    fn test_hub_field_errors() {
        assert!(matches!(
            layout(json!({"shape": "square"}), vec![arm(1)]),
            Err(MazeError::OutOfRangeValue { .. })
        ));
        assert!(matches!(
            layout(json!({"shape": "circular", "angle_degrees": 0}), vec![arm(1)]),
            Err(MazeError::OutOfRangeValue { .. })
        ));
        assert!(matches!(
            layout(json!({"shape": "circular", "angle_degrees": 361}), vec![arm(1)]),
            Err(MazeError::OutOfRangeValue { .. })
        ));
        assert!(matches!(
            layout(json!({"shape": "circular"}), vec![]),
            Err(MazeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_arm_config_rejected() {
        let mut bad_arm = arm(1);
        bad_arm["config"] = json!({});
        assert!(matches!(
            layout(json!({"shape": "circular"}), vec![bad_arm]),
            Err(MazeError::UnexpectedField { .. })
        ));
    }

    #[test]
    fn test_layout_round_trip() {
        let config = config();
        let parsed = layout(json!({"shape": "circular", "angle_degrees": 90}), vec![arm(2), arm(1)]).unwrap();
        let spec = RadialArmHandler::layout_to_spec(&parsed, &config, true);
        let reparsed = RadialArmHandler::parse_layout(&spec, &config).unwrap();
        assert_eq!(reparsed, parsed);
        RadialArmHandler::validate(&config, &reparsed).unwrap();
    }
}
