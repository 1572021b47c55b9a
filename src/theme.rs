use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub background: String,
    pub node_fill: String,
    pub node_stroke: String,
    pub stroke_width: f32,
    pub corner_radius: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"Malgun Gothic\", \"Apple SD Gothic Neo\", arial, sans-serif"
                .to_string(),
            font_size: 12.0,
            text_color: "#333333".to_string(),
            line_color: "#555555".to_string(),
            background: "#FFFFFF".to_string(),
            node_fill: "#F3F4F6".to_string(),
            node_stroke: "#9CA3AF".to_string(),
            stroke_width: 1.2,
            corner_radius: 8.0,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, \"Noto Sans KR\", system-ui, sans-serif".to_string(),
            font_size: 12.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            background: "#FFFFFF".to_string(),
            node_fill: "#F8FAFF".to_string(),
            node_stroke: "#C7D2E5".to_string(),
            stroke_width: 1.4,
            corner_radius: 10.0,
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Some(Self::modern()),
            "classic" | "default" | "base" => Some(Self::classic()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
