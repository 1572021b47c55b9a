use std::collections::BTreeMap;

use crate::ir::TaskId;

use super::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaps {
    pub column: f32,
    pub row: f32,
    pub canvas_margin: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    /// Top-left corner of every node box.
    pub positions: BTreeMap<TaskId, Point>,
    pub width: f32,
    pub height: f32,
}

/// Places layer `L` in column `L`, each column centred vertically on the
/// tallest one.
pub fn assign_coordinates(layers: &[Vec<TaskId>], size: BoxSize, gaps: Gaps) -> Coordinates {
    let margin = gaps.canvas_margin;
    let column_height = |count: usize| -> f32 {
        if count == 0 {
            0.0
        } else {
            count as f32 * size.height + (count - 1) as f32 * gaps.row
        }
    };

    let tallest = layers
        .iter()
        .map(|layer| column_height(layer.len()))
        .fold(0.0, f32::max);
    let height = tallest + 2.0 * margin;

    let mut positions = BTreeMap::new();
    for (rank, layer) in layers.iter().enumerate() {
        let x = margin + rank as f32 * (size.width + gaps.column);
        let slack = (height - 2.0 * margin - column_height(layer.len())).max(0.0);
        let mut y = margin + slack / 2.0;
        for id in layer {
            positions.insert(*id, Point::new(x, y));
            y += size.height + gaps.row;
        }
    }

    let width = match layers.len() {
        0 => 2.0 * margin,
        n => margin + (n - 1) as f32 * (size.width + gaps.column) + size.width + margin,
    };

    Coordinates {
        positions,
        width,
        height,
    }
}
