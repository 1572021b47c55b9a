use serde::Serialize;

use crate::ir::TaskId;

use super::colors::ColorPair;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Wrapped label lines plus the vertical offset of each line's baseline
/// centre from the node centre.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub font_size: f32,
    pub line_height: f32,
    pub offsets: Vec<f32>,
}

impl TextBlock {
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: TaskId,
    pub name: String,
    pub category: Option<String>,
    pub rank: usize,
    pub order: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: TextBlock,
    pub colors: ColorPair,
}

impl NodeLayout {
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Port where outgoing connectors start.
    pub fn output_port(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height / 2.0)
    }

    /// Port where incoming connectors end.
    pub fn input_port(&self) -> Point {
        Point::new(self.x, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub from: TaskId,
    pub to: TaskId,
    pub start: Point,
    pub end: Point,
}

impl EdgeLayout {
    /// Control points of a horizontal cubic connector. The handle length is
    /// `curvature * dx`, never shorter than `min_handle`.
    pub fn control_points(&self, curvature: f32, min_handle: f32) -> (Point, Point) {
        let dx = (self.end.x - self.start.x).abs();
        let handle = (dx * curvature).max(min_handle);
        (
            Point::new(self.start.x + handle, self.start.y),
            Point::new(self.end.x - handle, self.end.y),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    /// Column by column, top to bottom within each column.
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub layers: Vec<Vec<TaskId>>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    pub fn node(&self, id: TaskId) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn max_rank(&self) -> usize {
        self.layers.len().saturating_sub(1)
    }
}
