// Mapping between graph layout space and terminal cells

use holomap_core::graph::{Graph, Position};
use ratatui::layout::Rect;

/// Horizontal margin around the outermost nodes, in layout units
const X_PADDING: f64 = 150.0;
/// Vertical margin, in layout units
const Y_PADDING: f64 = 60.0;

/// Visible window over layout space.
///
/// Layout y grows downward while canvas y grows upward, so `y_bounds` is
/// expressed in flipped (negated) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Viewport {
    pub fn for_graph(graph: &Graph) -> Self {
        let (mut min_x, mut max_x, mut max_y) = (0.0_f64, 0.0_f64, 0.0_f64);
        for node in graph.nodes() {
            min_x = min_x.min(node.position.x);
            max_x = max_x.max(node.position.x);
            max_y = max_y.max(node.position.y);
        }

        Self {
            x_bounds: [min_x - X_PADDING, max_x + X_PADDING],
            y_bounds: [-max_y - Y_PADDING, Y_PADDING],
        }
    }

    /// Canvas coordinates of a layout position
    pub fn canvas_point(&self, position: Position) -> (f64, f64) {
        (position.x, -position.y)
    }

    /// Terminal cell a layout position is drawn in, for a canvas filling `area`
    pub fn cell(&self, area: Rect, position: Position) -> (u16, u16) {
        let (x, y) = self.canvas_point(position);
        let width = f64::from(area.width.saturating_sub(1));
        let height = f64::from(area.height.saturating_sub(1));

        let fx = (x - self.x_bounds[0]) / (self.x_bounds[1] - self.x_bounds[0]);
        let fy = (self.y_bounds[1] - y) / (self.y_bounds[1] - self.y_bounds[0]);

        let col = area.x + (fx.clamp(0.0, 1.0) * width).round() as u16;
        let row = area.y + (fy.clamp(0.0, 1.0) * height).round() as u16;
        (col, row)
    }
}

/// Screen region covered by a node label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hitbox {
    pub area: Rect,
    pub node_id: String,
}

/// Label text drawn for a node
pub fn node_label(graph: &Graph, node_id: &str) -> String {
    graph
        .node(node_id)
        .map(|node| format!("● {}", node.label()))
        .unwrap_or_default()
}

pub fn hitboxes(graph: &Graph, viewport: &Viewport, area: Rect) -> Vec<Hitbox> {
    graph
        .nodes()
        .iter()
        .map(|node| {
            let (col, row) = viewport.cell(area, node.position);
            let label_width = node_label(graph, &node.id).chars().count() as u16;
            let right = area.x.saturating_add(area.width);
            Hitbox {
                area: Rect {
                    x: col,
                    y: row,
                    width: label_width.min(right.saturating_sub(col)),
                    height: 1,
                },
                node_id: node.id.clone(),
            }
        })
        .collect()
}

/// Topmost node whose label covers the cell
pub fn hit_test(hitboxes: &[Hitbox], col: u16, row: u16) -> Option<&str> {
    hitboxes
        .iter()
        .rev()
        .find(|h| {
            row == h.area.y && col >= h.area.x && col < h.area.x.saturating_add(h.area.width)
        })
        .map(|h| h.node_id.as_str())
}
