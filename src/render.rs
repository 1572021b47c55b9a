use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{EdgeLayout, Layout, NodeLayout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(1.0);
    let height = layout.height.max(1.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    svg.push_str(&format!(
        "<marker id=\"arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
        theme.line_color
    ));
    svg.push_str("</defs>");

    let min_handle = config.column_gap / 2.0;
    for edge in &layout.edges {
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" marker-end=\"url(#arrow)\" data-from=\"{}\" data-to=\"{}\"/>",
            connector_path(edge, config.edge_curvature, min_handle),
            theme.line_color,
            theme.stroke_width,
            edge.from,
            edge.to
        ));
    }

    for node in &layout.nodes {
        svg.push_str(&node_svg(node, theme));
    }

    svg.push_str("</svg>");
    svg
}

fn connector_path(edge: &EdgeLayout, curvature: f32, min_handle: f32) -> String {
    let (c1, c2) = edge.control_points(curvature, min_handle);
    format!(
        "M {:.2} {:.2} C {:.2} {:.2}, {:.2} {:.2}, {:.2} {:.2}",
        edge.start.x, edge.start.y, c1.x, c1.y, c2.x, c2.y, edge.end.x, edge.end.y
    )
}

fn node_svg(node: &NodeLayout, theme: &Theme) -> String {
    let (fill, stroke) = node_colors(node, theme);
    let mut out = format!(
        "<g data-id=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        node.id,
        node.x,
        node.y,
        node.width,
        node.height,
        fill,
        stroke,
        theme.stroke_width,
        r = theme.corner_radius,
    );
    let center = node.center();
    out.push_str(&format!(
        "<text text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        escape_xml(&theme.font_family),
        node.label.font_size,
        theme.text_color
    ));
    for (line, offset) in node.label.lines.iter().zip(&node.label.offsets) {
        out.push_str(&format!(
            "<tspan x=\"{:.2}\" y=\"{:.2}\">{}</tspan>",
            center.x,
            center.y + offset,
            escape_xml(line)
        ));
    }
    out.push_str("</text>");
    if let Some(category) = node.category.as_deref() {
        out.push_str(&format!("<title>{}</title>", escape_xml(category)));
    }
    out.push_str("</g>");
    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let natural = tree.size();
    let scale = png_scale(
        (natural.width(), natural.height()),
        render_cfg.width,
        render_cfg.height,
    );
    let width = (natural.width() * scale).ceil().max(1.0) as u32;
    let height = (natural.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| anyhow::anyhow!("invalid render size {width}x{height}"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap.save_png(output)?;
    Ok(())
}

/// Uniform scale that fits the drawing inside the requested box. A single
/// bound scales by that side alone; no bound keeps the natural size.
#[cfg(feature = "png")]
fn png_scale(natural: (f32, f32), width: Option<f32>, height: Option<f32>) -> f32 {
    let ratio = |target: Option<f32>, side: f32| {
        target
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(|t| t / side.max(1.0))
    };
    match (ratio(width, natural.0), ratio(height, natural.1)) {
        (Some(sx), Some(sy)) => sx.min(sy),
        (Some(s), None) | (None, Some(s)) => s,
        (None, None) => 1.0,
    }
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        255,
    ))
}

/// Uncategorised tasks take the theme's neutral pair.
fn node_colors<'a>(node: &'a NodeLayout, theme: &'a Theme) -> (&'a str, &'a str) {
    let categorised = node
        .category
        .as_deref()
        .is_some_and(|category| !category.trim().is_empty());
    if categorised {
        (&node.colors.fill, &node.colors.stroke)
    } else {
        (&theme.node_fill, &theme.node_stroke)
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
