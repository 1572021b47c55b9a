mod colors;
mod error;
mod ordering;
mod position;
mod ranking;
pub mod text;
pub(crate) mod types;
pub use colors::{ColorPair, color_for};
pub use error::LayoutError;
pub use ordering::{count_crossings, order_layers};
pub use position::{BoxSize, Coordinates, Gaps, assign_coordinates};
pub use ranking::{Adjacency, Levels, UnresolvedRankPolicy, assign_levels};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{LayoutRequest, TaskId, TaskNode};
use crate::theme::Theme;
use std::collections::{BTreeMap, HashMap};

/// Lays out a request with measurement bound to the theme's font stack.
pub fn compute_layout(
    request: &LayoutRequest,
    theme: &Theme,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    compute_layout_with(request, config, text::theme_measure(theme, config))
}

/// Lays out a request with a caller supplied text measurer, typically one
/// bound to the host surface's font metrics.
pub fn compute_layout_with<F>(
    request: &LayoutRequest,
    config: &LayoutConfig,
    measure: F,
) -> Result<Layout, LayoutError>
where
    F: Fn(&str) -> Option<f32>,
{
    let nodes = unique_nodes(&request.nodes);
    let ids: Vec<TaskId> = nodes.keys().copied().collect();
    let adjacency = Adjacency::new(&ids, &request.edges);

    let levels = assign_levels(&adjacency, config.unresolved_rank_policy)?;
    let layers = order_layers(&levels.layers(), &adjacency, config.order_passes);
    let size = BoxSize {
        width: config.box_width,
        height: config.box_height,
    };
    let gaps = Gaps {
        column: config.column_gap,
        row: config.row_gap,
        canvas_margin: config.canvas_margin,
    };
    let coords = assign_coordinates(&layers, size, gaps);

    let mut placed = Vec::with_capacity(ids.len());
    let mut slot: HashMap<TaskId, (usize, usize)> = HashMap::new();
    for (rank, layer) in layers.iter().enumerate() {
        for (order, id) in layer.iter().enumerate() {
            let (Some(node), Some(pos)) = (nodes.get(id), coords.positions.get(id)) else {
                continue;
            };
            let text = if node.name.trim().is_empty() {
                node.id.to_string()
            } else {
                node.name.clone()
            };
            let label = text::label_block(
                &text,
                config.label_max_width(),
                &measure,
                config.label.font_size,
                config.label.max_lines,
            );
            let category = request.category_of(node).map(str::to_string);
            placed.push(NodeLayout {
                id: *id,
                name: node.name.clone(),
                colors: color_for(category.as_deref()),
                category,
                rank,
                order,
                x: pos.x,
                y: pos.y,
                width: size.width,
                height: size.height,
                label,
            });
            slot.insert(*id, (rank, order));
        }
    }

    let by_id: HashMap<TaskId, &NodeLayout> = placed.iter().map(|node| (node.id, node)).collect();
    let mut ordered_edges = adjacency.edges().to_vec();
    ordered_edges.sort_by_key(|edge| (slot[&edge.from], slot[&edge.to]));
    let edges = ordered_edges
        .iter()
        .map(|edge| EdgeLayout {
            from: edge.from,
            to: edge.to,
            start: by_id[&edge.from].output_port(),
            end: by_id[&edge.to].input_port(),
        })
        .collect();

    tracing::debug!(
        nodes = placed.len(),
        edges = adjacency.edges().len(),
        ranks = layers.len(),
        crossings = count_crossings(&layers, &adjacency),
        "computed workflow layout"
    );

    Ok(Layout {
        nodes: placed,
        edges,
        layers,
        width: coords.width,
        height: coords.height,
    })
}

fn unique_nodes(nodes: &[TaskNode]) -> BTreeMap<TaskId, &TaskNode> {
    let mut unique = BTreeMap::new();
    for node in nodes {
        if unique.contains_key(&node.id) {
            tracing::warn!(id = node.id, "duplicate task id, keeping the first");
            continue;
        }
        unique.insert(node.id, node);
    }
    unique
}
