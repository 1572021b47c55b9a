#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{
    CandidateTask, Definition, DependencyEdge, DocumentError, LayoutRequest, TaskId, TaskNode,
    WorkflowDocument, WorkflowTemplate,
};
pub use layout::{
    Layout, LayoutError, UnresolvedRankPolicy, color_for, compute_layout, compute_layout_with,
};
pub use render::render_svg;
pub use theme::Theme;

/// Theme and layout settings for one-call rendering.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn modern() -> Self {
        Self::with_theme(Theme::modern())
    }

    pub fn classic() -> Self {
        Self::with_theme(Theme::classic())
    }

    fn with_theme(theme: Theme) -> Self {
        let mut layout = LayoutConfig::default();
        layout.label.font_size = theme.font_size;
        Self { theme, layout }
    }
}

/// Parses a workflow document, selects a template and renders it to SVG.
pub fn render_with_options(
    document_json: &str,
    template_id: Option<i64>,
    options: RenderOptions,
) -> anyhow::Result<String> {
    let document = WorkflowDocument::from_json(document_json)?;
    let request = document.layout_request(template_id)?;
    let layout = compute_layout(&request, &options.theme, &options.layout)?;
    Ok(render_svg(&layout, &options.theme, &options.layout))
}
