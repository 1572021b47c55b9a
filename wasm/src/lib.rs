use serde::Deserialize;
use wasm_bindgen::prelude::*;
use workflow_diagram::{RenderOptions, render_with_options};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkflowRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    box_width: Option<f32>,
    fast_text: Option<bool>,
}

fn build_render_options(options: WorkflowRenderOptions) -> RenderOptions {
    let mut render_options = match options.theme.as_deref() {
        Some("classic") | Some("default") => RenderOptions::classic(),
        _ => RenderOptions::modern(),
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
        render_options.layout.label.font_size = font_size;
    }
    if let Some(box_width) = options.box_width {
        render_options.layout.box_width = box_width;
    }
    // No system fonts under wasm.
    render_options.layout.label.fast_text_metrics = options.fast_text.unwrap_or(true);

    render_options
}

#[wasm_bindgen]
pub fn render_workflow_svg(
    document_json: &str,
    template_id: Option<i32>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<WorkflowRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        WorkflowRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(document_json, template_id.map(i64::from), render_options)
        .map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use workflow_diagram::render_with_options;

    use crate::{WorkflowRenderOptions, build_render_options};

    #[test]
    fn renders_selected_template() {
        let document = r#"{
            "templates": [{
                "workflow_template_id": 3,
                "template_name": "Launch",
                "definitions": [
                    { "task_template_id": 1, "task_template_name": "Draft recipe" },
                    { "task_template_id": 2, "task_template_name": "Pilot batch", "depends_on_task_template_id": 1 }
                ]
            }],
            "candidate_tasks": [{ "task_template_id": 2, "category": "Production" }]
        }"#;

        let svg = render_with_options(
            document,
            Some(3),
            build_render_options(WorkflowRenderOptions::default()),
        )
        .expect("workflow should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Draft recipe"));
        assert!(svg.contains("Pilot batch"));
    }

    #[test]
    fn font_size_reaches_the_label_config() {
        let options = build_render_options(WorkflowRenderOptions {
            font_size: Some(15.0),
            ..Default::default()
        });
        assert_eq!(options.layout.label.font_size, 15.0);
        assert!(options.layout.label.fast_text_metrics);
    }
}
