//! Confetti configuration as accepted from JS / JSON.
//!
//! Shared keys (`size`, `clock`, `rotate`, `start_from_edge`) apply to every
//! shape; a detailed shape entry may override any of them for itself.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::weighted::WeightedTable;
use crate::geom::Rgb;

pub const DEFAULT_MAX: usize = 80;
pub const DEFAULT_CLOCK: f64 = 25.0;
pub const DEFAULT_SPIN_DIVISOR: f64 = 35.0;
pub const DEFAULT_IMAGE_EDGE: f64 = 15.0;

pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb::new(165, 104, 246),
    Rgb::new(230, 61, 135),
    Rgb::new(0, 199, 228),
    Rgb::new(253, 214, 126),
];

pub const DEFAULT_KINDS: [ShapeKind; 4] =
    [ShapeKind::Circle, ShapeKind::Square, ShapeKind::Triangle, ShapeKind::Line];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Square,
    Triangle,
    Line,
    #[serde(alias = "svg")]
    Image,
    /// Any name not listed above; dropped when the shape table is built.
    #[serde(other)]
    Unknown,
}

/// Shape entry: either a bare kind name or an object with overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropSpec {
    Kind(ShapeKind),
    Detailed(PropDetail),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropDetail {
    #[serde(rename = "type")]
    pub kind: Option<ShapeKind>,
    pub weight: Option<f64>,
    /// Size multiplier; for image shapes the edge length when `edge` is absent.
    pub size: Option<f64>,
    pub clock: Option<f64>,
    pub rotate: Option<bool>,
    pub start_from_edge: Option<bool>,
    pub src: Option<String>,
    pub edge: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub max: usize,
    pub props: Vec<PropSpec>,
    pub colors: Vec<Rgb>,
    pub size: f64,
    pub clock: f64,
    pub rotate: bool,
    pub start_from_edge: bool,
    pub respawn: bool,
    pub animate: bool,
    pub spin_divisor: f64,
}

impl Default for ConfettiOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            max: DEFAULT_MAX,
            props: Vec::new(),
            colors: Vec::new(),
            size: 1.0,
            clock: DEFAULT_CLOCK,
            rotate: false,
            start_from_edge: false,
            respawn: true,
            animate: true,
            spin_divisor: DEFAULT_SPIN_DIVISOR,
        }
    }
}

/// Geometry selector of a resolved shape descriptor.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeTemplate {
    Circle,
    Square,
    Triangle,
    Line,
    Image { src: Rc<str>, edge: f64 },
}

/// Fully resolved shape entry: shared keys merged with per-shape overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeDescriptor {
    pub template: ShapeTemplate,
    pub size: f64,
    pub clock: f64,
    pub rotate: bool,
    pub start_from_edge: bool,
}

impl ConfettiOptions {
    pub fn palette(&self) -> Vec<Rgb> {
        if self.colors.is_empty() { DEFAULT_PALETTE.to_vec() } else { self.colors.clone() }
    }

    fn base_descriptor(&self, template: ShapeTemplate) -> ShapeDescriptor {
        ShapeDescriptor {
            template,
            size: self.size,
            clock: self.clock,
            rotate: self.rotate,
            start_from_edge: self.start_from_edge,
        }
    }

    fn resolve(&self, spec: &PropSpec) -> Option<(f64, ShapeDescriptor)> {
        let detail = match spec {
            PropSpec::Kind(kind) => PropDetail { kind: Some(*kind), ..PropDetail::default() },
            PropSpec::Detailed(detail) => detail.clone(),
        };
        let Some(kind) = detail.kind else {
            log::warn!("confetti shape without a type dropped");
            return None;
        };
        let template = match kind {
            ShapeKind::Circle => ShapeTemplate::Circle,
            ShapeKind::Square => ShapeTemplate::Square,
            ShapeKind::Triangle => ShapeTemplate::Triangle,
            ShapeKind::Line => ShapeTemplate::Line,
            ShapeKind::Unknown => {
                log::warn!("unknown confetti shape dropped");
                return None;
            }
            ShapeKind::Image => {
                let Some(src) = detail.src.as_deref() else {
                    log::warn!("image shape without `src` dropped");
                    return None;
                };
                let edge = detail.edge.or(detail.size).unwrap_or(DEFAULT_IMAGE_EDGE);
                ShapeTemplate::Image { src: Rc::from(src), edge }
            }
        };
        let is_image = matches!(template, ShapeTemplate::Image { .. });
        let mut desc = self.base_descriptor(template);
        if let Some(size) = detail.size.filter(|_| !is_image) {
            desc.size = size;
        }
        if let Some(clock) = detail.clock {
            desc.clock = clock;
        }
        if let Some(rotate) = detail.rotate {
            desc.rotate = rotate;
        }
        if let Some(edge) = detail.start_from_edge {
            desc.start_from_edge = edge;
        }
        Some((detail.weight.unwrap_or(1.0), desc))
    }

    /// Weighted shape table; falls back to the four default kinds when the
    /// configured list is empty or carries no usable weight.
    pub fn shape_table(&self) -> WeightedTable<ShapeDescriptor> {
        let table = WeightedTable::new(self.props.iter().filter_map(|p| self.resolve(p)));
        if !table.is_empty() {
            return table;
        }
        if !self.props.is_empty() {
            log::warn!("no usable confetti shapes configured, using defaults");
        }
        WeightedTable::new(DEFAULT_KINDS.iter().filter_map(|k| self.resolve(&PropSpec::Kind(*k))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let opts: ConfettiOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ConfettiOptions::default());
        assert_eq!(opts.max, 80);
        assert!(opts.respawn && opts.animate);
        assert_eq!(opts.palette(), DEFAULT_PALETTE.to_vec());
        let table = opts.shape_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.total(), 4.0);
    }

    #[test]
    fn test_mixed_prop_list() {
        let json = r#"{
            "max": 256, "clock": 16, "rotate": true, "size": 2,
            "props": ["circle", {"type": "square", "weight": 3, "clock": -5},
                      {"type": "svg", "src": "star.svg", "size": 20}]
        }"#;
        let opts: ConfettiOptions = serde_json::from_str(json).unwrap();
        let table = opts.shape_table();
        assert_eq!(table.total(), 5.0);
        let descs: Vec<&ShapeDescriptor> = table.iter().collect();
        assert_eq!(descs[0].template, ShapeTemplate::Circle);
        assert_eq!(descs[0].clock, 16.0);
        assert!(descs[0].rotate);
        assert_eq!(descs[1].clock, -5.0);
        assert_eq!(descs[1].size, 2.0);
        assert_eq!(descs[2].template, ShapeTemplate::Image { src: Rc::from("star.svg"), edge: 20.0 });
        // image size names the edge; the shared multiplier still applies
        assert_eq!(descs[2].size, 2.0);
    }

    #[test]
    fn test_unusable_props_fall_back_to_defaults() {
        let json = r#"{"props": [{"type": "image"}, {"type": "circle", "weight": 0}]}"#;
        let opts: ConfettiOptions = serde_json::from_str(json).unwrap();
        let table = opts.shape_table();
        assert_eq!(table.len(), 4);
        assert_eq!(table.iter().next().unwrap().template, ShapeTemplate::Circle);
    }

    #[test]
    fn test_unknown_shape_names_are_dropped() {
        let json = r#"{"props": ["circle", "star", {"type": "hexagon", "weight": 9}, {"type": "line", "weight": 2}]}"#;
        let opts: ConfettiOptions = serde_json::from_str(json).unwrap();
        assert_eq!(opts.props[1], PropSpec::Kind(ShapeKind::Unknown));
        let table = opts.shape_table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3.0);
        let templates: Vec<&ShapeTemplate> = table.iter().map(|d| &d.template).collect();
        assert_eq!(templates, vec![&ShapeTemplate::Circle, &ShapeTemplate::Line]);

        let only_unknown: ConfettiOptions = serde_json::from_str(r#"{"props": ["star"]}"#).unwrap();
        assert_eq!(only_unknown.shape_table().len(), 4);
    }

    #[test]
    fn test_image_edge_default() {
        let opts = ConfettiOptions {
            props: vec![PropSpec::Detailed(PropDetail {
                kind: Some(ShapeKind::Image),
                src: Some("cake.svg".into()),
                ..PropDetail::default()
            })],
            ..ConfettiOptions::default()
        };
        let table = opts.shape_table();
        match &table.iter().next().unwrap().template {
            ShapeTemplate::Image { edge, .. } => assert_eq!(*edge, DEFAULT_IMAGE_EDGE),
            other => panic!("unexpected template {:?}", other),
        }
    }
}
