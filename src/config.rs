use crate::layout::UnresolvedRankPolicy;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    pub font_size: f32,
    pub max_lines: usize,
    pub padding_x: f32,
    /// Skip font lookup and use the per-character approximation.
    pub fast_text_metrics: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            max_lines: 3,
            padding_x: 10.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub column_gap: f32,
    pub row_gap: f32,
    pub canvas_margin: f32,
    pub order_passes: usize,
    pub edge_curvature: f32,
    pub unresolved_rank_policy: UnresolvedRankPolicy,
    pub label: LabelConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            box_width: 160.0,
            box_height: 56.0,
            column_gap: 80.0,
            row_gap: 24.0,
            canvas_margin: 24.0,
            order_passes: 3,
            edge_curvature: 0.5,
            unresolved_rank_policy: UnresolvedRankPolicy::AssignZero,
            label: LabelConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn label_max_width(&self) -> f32 {
        (self.box_width - 2.0 * self.label.padding_x).max(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Target PNG bounds; the drawing is scaled uniformly to fit.
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
    node_fill: Option<String>,
    node_stroke: Option<String>,
    stroke_width: Option<f32>,
    corner_radius: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    box_width: Option<f32>,
    box_height: Option<f32>,
    column_gap: Option<f32>,
    row_gap: Option<f32>,
    canvas_margin: Option<f32>,
    order_passes: Option<usize>,
    edge_curvature: Option<f32>,
    unresolved_rank_policy: Option<UnresolvedRankPolicy>,
    label_font_size: Option<f32>,
    label_max_lines: Option<usize>,
    label_padding_x: Option<f32>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme '{name}'"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_stroke {
            config.theme.node_stroke = v;
        }
        if let Some(v) = vars.stroke_width {
            config.theme.stroke_width = v;
        }
        if let Some(v) = vars.corner_radius {
            config.theme.corner_radius = v;
        }
    }
    config.render.background = config.theme.background.clone();
    config.layout.label.font_size = config.theme.font_size;

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        if let Some(v) = layout.box_width {
            target.box_width = v;
        }
        if let Some(v) = layout.box_height {
            target.box_height = v;
        }
        if let Some(v) = layout.column_gap {
            target.column_gap = v;
        }
        if let Some(v) = layout.row_gap {
            target.row_gap = v;
        }
        if let Some(v) = layout.canvas_margin {
            target.canvas_margin = v;
        }
        if let Some(v) = layout.order_passes {
            target.order_passes = v;
        }
        if let Some(v) = layout.edge_curvature {
            target.edge_curvature = v;
        }
        if let Some(v) = layout.unresolved_rank_policy {
            target.unresolved_rank_policy = v;
        }
        if let Some(v) = layout.label_font_size {
            target.label.font_size = v;
        }
        if let Some(v) = layout.label_max_lines {
            target.label.max_lines = v;
        }
        if let Some(v) = layout.label_padding_x {
            target.label.padding_x = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.label.fast_text_metrics = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.order_passes, 3);
        assert_eq!(config.layout.label.max_lines, 3);
        assert_eq!(
            config.layout.unresolved_rank_policy,
            UnresolvedRankPolicy::AssignZero
        );
    }

    #[test]
    fn json5_overrides_layer_over_defaults() {
        let config = parse_config(
            r##"{
                // comments are fine
                theme: "classic",
                themeVariables: { fontSize: 14, nodeFill: "#FFFFFF" },
                layout: { boxWidth: 200, unresolvedRankPolicy: "reject", labelMaxLines: 2 },
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, 14.0);
        assert_eq!(config.layout.label.font_size, 14.0);
        assert_eq!(config.theme.node_fill, "#FFFFFF");
        assert_eq!(config.layout.box_width, 200.0);
        assert_eq!(config.layout.box_height, 56.0);
        assert_eq!(config.layout.label.max_lines, 2);
        assert_eq!(
            config.layout.unresolved_rank_policy,
            UnresolvedRankPolicy::Reject
        );
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(parse_config(r#"{ "theme": "neon" }"#).is_err());
    }

    #[test]
    fn label_width_leaves_padding() {
        let config = LayoutConfig::default();
        assert_eq!(config.label_max_width(), 140.0);
    }
}
