use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ui::settings::UiSettings;

fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("solo_text_rpg");
    path.push("settings.json");
    path
}

/// File settings with environment overrides applied on top.
pub fn load_settings() -> UiSettings {
    let mut settings = load_from(&settings_path());
    apply_env(&mut settings, |k| std::env::var(k).ok());
    settings
}

pub fn save_settings(settings: &UiSettings) {
    if let Err(e) = save_to(&settings_path(), settings) {
        warn!(error = %e, "could not save settings");
    }
}

fn load_from(path: &Path) -> UiSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_to(path: &Path, settings: &UiSettings) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(settings)?)?;
    Ok(())
}

fn apply_env(settings: &mut UiSettings, var: impl Fn(&str) -> Option<String>) {
    let non_empty = |k: &str| var(k).filter(|v| !v.trim().is_empty());

    if let Some(url) = non_empty("SOLO_RPG_BASE_URL") {
        settings.llm.base_url = url;
    }
    if let Some(model) = non_empty("SOLO_RPG_MODEL") {
        settings.llm.model = model;
    }
    settings.llm.api_key = non_empty("SOLO_RPG_API_KEY").or_else(|| non_empty("OPENAI_API_KEY"));
}
