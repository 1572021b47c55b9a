use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use workflow_diagram::config::LayoutConfig;
use workflow_diagram::ir::{DependencyEdge, LayoutRequest, TaskNode};
use workflow_diagram::layout::{
    Adjacency, UnresolvedRankPolicy, assign_levels, compute_layout_with, order_layers,
};
use workflow_diagram::render::render_svg;
use workflow_diagram::text_metrics::approximate_text_width;
use workflow_diagram::theme::Theme;

/// `columns` stages of `width` tasks; each task depends on its neighbour
/// slots in the previous stage, plus a few long skip edges.
fn staged_workflow(columns: i64, width: i64) -> LayoutRequest {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for col in 0..columns {
        for row in 0..width {
            let id = col * width + row;
            nodes.push(TaskNode::new(id, format!("Stage {col} inspection task {row}")));
            if col == 0 {
                continue;
            }
            let prev = (col - 1) * width;
            edges.push(DependencyEdge::new(prev + row, id));
            edges.push(DependencyEdge::new(prev + (row * 7 + 3) % width, id));
            if col >= 3 && row % 4 == 0 {
                edges.push(DependencyEdge::new((col - 3) * width + (row + 1) % width, id));
            }
        }
    }
    LayoutRequest::new(nodes, edges)
}

fn measure(text: &str) -> Option<f32> {
    Some(approximate_text_width(text, 12.0))
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");
    for (columns, width) in [(4, 4), (8, 12), (16, 24)] {
        let request = staged_workflow(columns, width);
        let ids: Vec<i64> = request.nodes.iter().map(|n| n.id).collect();
        let adjacency = Adjacency::new(&ids, &request.edges);
        let layers = assign_levels(&adjacency, UnresolvedRankPolicy::AssignZero)
            .expect("staged workflow is acyclic")
            .layers();
        let name = format!("{columns}x{width}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &layers, |b, data| {
            b.iter(|| black_box(order_layers(black_box(data), &adjacency, 3)));
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    for (columns, width) in [(4, 4), (8, 12), (16, 24)] {
        let request = staged_workflow(columns, width);
        let name = format!("{columns}x{width}");
        group.bench_with_input(BenchmarkId::from_parameter(name), &request, |b, data| {
            b.iter(|| {
                let layout = compute_layout_with(black_box(data), &config, measure)
                    .expect("layout failed");
                let svg = render_svg(&layout, &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_ordering, bench_end_to_end
);
criterion_main!(benches);
