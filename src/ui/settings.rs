use serde::{Deserialize, Serialize};
use egui::Color32;
use std::collections::HashMap;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Where and how to reach the completion provider.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,

    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.7,
            api_key: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    // Role → color mapping
    pub role_colors: HashMap<String, [u8; 4]>,

    pub llm: LlmSettings,
}

impl Default for UiSettings {
    fn default() -> Self {
        let mut role_colors = HashMap::new();

        role_colors.insert("user".into(), [30, 90, 70, 255]);
        role_colors.insert("assistant".into(), [70, 50, 25, 255]);
        role_colors.insert("system".into(), [80, 80, 80, 255]);

        Self {
            ui_scale: 1.0,
            role_colors,
            llm: LlmSettings::default(),
        }
    }
}

impl UiSettings {
    pub fn color(&self, key: &str) -> Color32 {
        self.role_colors
            .get(key)
            .map(|c| Color32::from_rgba_unmultiplied(c[0], c[1], c[2], c[3]))
            .unwrap_or(Color32::DARK_GRAY)
    }

    pub fn set_color(&mut self, key: &str, color: Color32) {
        self.role_colors.insert(
            key.to_string(),
            [color.r(), color.g(), color.b(), color.a()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let s: UiSettings = serde_json::from_str(r#"{"ui_scale": 1.5, "llm": {"model": "local-model"}}"#).unwrap();
        assert_eq!(s.ui_scale, 1.5);
        assert_eq!(s.llm.model, "local-model");
        assert_eq!(s.llm.base_url, DEFAULT_BASE_URL);
        assert!(s.role_colors.contains_key("assistant"));
    }

    #[test]
    fn api_key_is_never_serialized() {
        let mut s = UiSettings::default();
        s.llm.api_key = Some("sk-secret".into());
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("sk-secret"));
    }

    #[test]
    fn colors_round_trip() {
        let mut s = UiSettings::default();
        s.set_color("user", Color32::from_rgb(1, 2, 3));
        assert_eq!(s.color("user"), Color32::from_rgb(1, 2, 3));
        assert_eq!(s.color("nobody"), Color32::DARK_GRAY);
    }
}
