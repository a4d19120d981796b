//! Drawable primitive records consumed by an Excalidraw-style canvas.
//!
//! Geometry is supplied by the caller; everything else is a fixed style
//! default or a freshly generated identity block.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use super::{Cell, LayoutConfig};

const SHAPE_FILL: &str = "#E3F2FD";
const SHAPE_STROKE: &str = "#1565C0";
const INK: &str = "#1F1A17";
const TRANSPARENT: &str = "transparent";

/// Excalidraw font family 1 (hand-drawn).
const FONT_FAMILY: u8 = 1;

/// Roundness codes understood by the canvas: 2 for linear elements, 3 for boxes.
const ROUND_LINEAR: u8 = 2;
const ROUND_ADAPTIVE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Rectangle,
    Text,
    Arrow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Roundness {
    #[serde(rename = "type")]
    pub kind: u8,
}

/// Fields present only on text primitives.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFields {
    pub text: String,
    pub original_text: String,
    pub font_size: f64,
    pub font_family: u8,
    pub text_align: &'static str,
    pub vertical_align: &'static str,
    pub container_id: Option<String>,
    pub line_height: f64,
    pub auto_resize: bool,
}

/// Fields present only on arrow primitives. `points` are relative to `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowFields {
    pub points: Vec<[f64; 2]>,
    pub last_committed_point: Option<[f64; 2]>,
    pub start_binding: Option<serde_json::Value>,
    pub end_binding: Option<serde_json::Value>,
    pub start_arrowhead: Option<&'static str>,
    pub end_arrowhead: Option<&'static str>,
    pub elbowed: bool,
}

/// One drawable shape with computed geometry, style defaults, and identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualPrimitive {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PrimitiveKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: &'static str,
    pub background_color: &'static str,
    pub fill_style: &'static str,
    pub stroke_width: f64,
    pub stroke_style: &'static str,
    pub roughness: u8,
    pub opacity: u8,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<Roundness>,
    pub seed: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub is_deleted: bool,
    pub bound_elements: Option<Vec<serde_json::Value>>,
    pub updated: u64,
    pub link: Option<String>,
    pub locked: bool,
    #[serde(flatten)]
    pub text: Option<TextFields>,
    #[serde(flatten)]
    pub arrow: Option<ArrowFields>,
}

impl VisualPrimitive {
    /// A box covering `cell`.
    #[must_use]
    pub fn rectangle(cell: Cell) -> Self {
        Self {
            background_color: SHAPE_FILL,
            stroke_color: SHAPE_STROKE,
            roundness: Some(Roundness { kind: ROUND_ADAPTIVE }),
            ..Self::base(PrimitiveKind::Rectangle, cell.x, cell.y, cell.width, cell.height)
        }
    }

    /// A free-standing label at the given box.
    #[must_use]
    pub fn label(text: &str, x: f64, y: f64, width: f64, config: &LayoutConfig) -> Self {
        let height = config.font_size * config.line_height;
        Self {
            text: Some(TextFields {
                text: text.to_string(),
                original_text: text.to_string(),
                font_size: config.font_size,
                font_family: FONT_FAMILY,
                text_align: "center",
                vertical_align: "middle",
                container_id: None,
                line_height: config.line_height,
                auto_resize: true,
            }),
            ..Self::base(PrimitiveKind::Text, x, y, width, height)
        }
    }

    /// An arrow anchored at `(x, y)` pointing along `(dx, dy)`.
    #[must_use]
    pub fn arrow(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self {
            roundness: Some(Roundness { kind: ROUND_LINEAR }),
            arrow: Some(ArrowFields {
                points: vec![[0.0, 0.0], [dx, dy]],
                last_committed_point: None,
                start_binding: None,
                end_binding: None,
                start_arrowhead: None,
                end_arrowhead: Some("arrow"),
                elbowed: false,
            }),
            ..Self::base(PrimitiveKind::Arrow, x, y, dx.abs(), dy.abs())
        }
    }

    fn base(kind: PrimitiveKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            x,
            y,
            width,
            height,
            angle: 0.0,
            stroke_color: INK,
            background_color: TRANSPARENT,
            fill_style: "solid",
            stroke_width: 2.0,
            stroke_style: "solid",
            roughness: 1,
            opacity: 100,
            group_ids: Vec::new(),
            frame_id: None,
            roundness: None,
            seed: rand::random(),
            version: 1,
            version_nonce: rand::random(),
            is_deleted: false,
            bound_elements: None,
            updated: now_millis(),
            link: None,
            locked: false,
            text: None,
            arrow: None,
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
#[path = "primitive_test.rs"]
mod tests;
