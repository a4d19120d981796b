//! Layout — grid placement and primitive synthesis for a [`Diagram`].
//!
//! DESIGN
//! ======
//! Nodes fill a near-square grid in insertion order. Each node yields a box
//! and a centred label; each edge yields one arrow from source centre to
//! target centre. Geometry depends only on the diagram and [`LayoutConfig`];
//! identity fields on the emitted primitives are fresh per call.
//!
//! Edges whose endpoints do not resolve to a placed node are skipped.

pub mod primitive;

use std::collections::HashMap;

use tracing::debug;

use crate::diagram::Diagram;
pub use primitive::{PrimitiveKind, VisualPrimitive};

/// Fixed grid and typography constants, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub cell_width: f64,
    pub cell_height: f64,
    pub gap_x: f64,
    pub gap_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub label_padding: f64,
    pub label_min_width: f64,
    /// Estimated advance per character.
    pub char_width: f64,
    pub font_size: f64,
    pub line_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            cell_width: 220.0,
            cell_height: 100.0,
            gap_x: 80.0,
            gap_y: 80.0,
            origin_x: 100.0,
            origin_y: 100.0,
            label_padding: 12.0,
            label_min_width: 40.0,
            char_width: 9.0,
            font_size: 16.0,
            line_height: 1.25,
        }
    }
}

/// A placed node rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Cell {
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

// =============================================================================
// PLACEMENT
// =============================================================================

/// Smallest `c >= 1` with `c * c >= n`.
#[must_use]
pub fn columns(n: usize) -> usize {
    let mut c = 1;
    while c * c < n {
        c += 1;
    }
    c
}

/// Compute one cell per node, in node order.
#[must_use]
pub fn place(diagram: &Diagram, config: &LayoutConfig) -> Vec<Cell> {
    let cols = columns(diagram.nodes.len());
    (0..diagram.nodes.len())
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let (row, col) = ((i / cols) as f64, (i % cols) as f64);
            Cell {
                x: config.origin_x + col * (config.cell_width + config.gap_x),
                y: config.origin_y + row * (config.cell_height + config.gap_y),
                width: config.cell_width,
                height: config.cell_height,
            }
        })
        .collect()
}

/// Estimated label width, clamped to `[label_min_width, cell_width - 2 * padding]`.
///
/// When the cell is too narrow for the minimum, the cell bound wins.
#[must_use]
pub fn label_width(label: &str, config: &LayoutConfig) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let estimate = label.chars().count() as f64 * config.char_width;
    let max = (config.cell_width - 2.0 * config.label_padding).max(0.0);
    estimate.max(config.label_min_width).min(max)
}

// =============================================================================
// SYNTHESIS
// =============================================================================

/// Synthesize primitives with [`LayoutConfig::default`].
#[must_use]
pub fn synthesize(diagram: &Diagram) -> Vec<VisualPrimitive> {
    synthesize_with(diagram, &LayoutConfig::default())
}

/// Emit every node's box and label in node order, then one arrow per
/// resolvable edge in edge order.
#[must_use]
pub fn synthesize_with(diagram: &Diagram, config: &LayoutConfig) -> Vec<VisualPrimitive> {
    let cells = place(diagram, config);
    let mut primitives = Vec::with_capacity(diagram.nodes.len() * 2 + diagram.edges.len());
    let mut lookup: HashMap<&str, Cell> = HashMap::with_capacity(cells.len());

    for (node, cell) in diagram.nodes.iter().zip(&cells) {
        lookup.insert(node.id.as_str(), *cell);
        primitives.push(VisualPrimitive::rectangle(*cell));

        let height = config.font_size * config.line_height;
        primitives.push(VisualPrimitive::label(
            &node.label,
            cell.x + config.label_padding,
            cell.y + (cell.height - height) / 2.0,
            label_width(&node.label, config),
            config,
        ));
    }

    let mut skipped = 0usize;
    for edge in &diagram.edges {
        let (Some(source), Some(target)) = (lookup.get(edge.from.as_str()), lookup.get(edge.to.as_str())) else {
            skipped += 1;
            continue;
        };
        let (sx, sy) = source.center();
        let (tx, ty) = target.center();
        primitives.push(VisualPrimitive::arrow(sx, sy, tx - sx, ty - sy));
    }

    debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        skipped_edges = skipped,
        primitives = primitives.len(),
        "layout: primitives synthesized"
    );
    primitives
}

/// Wrap primitives in a scene document a canvas can open directly.
#[must_use]
pub fn scene_document(primitives: &[VisualPrimitive]) -> serde_json::Value {
    serde_json::json!({
        "type": "excalidraw",
        "version": 2,
        "source": env!("CARGO_PKG_NAME"),
        "elements": primitives,
        "appState": {
            "viewBackgroundColor": "#ffffff",
            "gridSize": null
        },
        "files": {}
    })
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
