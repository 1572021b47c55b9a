use crate::ir::TaskId;
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub layers: Vec<Vec<TaskId>>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: TaskId,
    pub name: String,
    pub category: Option<String>,
    pub rank: usize,
    pub order: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub fill: String,
    pub stroke: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: TaskId,
    pub to: TaskId,
    pub points: [[f32; 2]; 2],
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                id: node.id,
                name: node.name.clone(),
                category: node.category.clone(),
                rank: node.rank,
                order: node.order,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label_lines: node.label.lines.clone(),
                fill: node.colors.fill.clone(),
                stroke: node.colors.stroke.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.from,
                to: edge.to,
                points: [[edge.start.x, edge.start.y], [edge.end.x, edge.end.y]],
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            layers: layout.layers.clone(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{DependencyEdge, LayoutRequest, TaskNode};
    use crate::layout::compute_layout_with;

    #[test]
    fn dump_mirrors_layout() {
        let request = LayoutRequest::new(
            vec![TaskNode::new(1, "A"), TaskNode::new(2, "B")],
            vec![DependencyEdge::new(1, 2)],
        );
        let layout = compute_layout_with(&request, &LayoutConfig::default(), |t| {
            Some(t.len() as f32)
        })
        .unwrap();
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.layers, vec![vec![1], vec![2]]);
        assert_eq!(dump.nodes[1].rank, 1);
        assert_eq!(dump.edges[0].points[0][0], layout.nodes[0].x + layout.nodes[0].width);

        let value: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(value["nodes"][0]["label_lines"][0], "A");
    }
}
