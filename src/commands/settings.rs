use std::path::Path;

use crate::models::Settings;

/// Loads settings from `config/settings.json` under `data_dir`, falling
/// back to defaults when the file is absent.
pub async fn get_settings(data_dir: &Path) -> Result<Settings, String> {
    let config_path = data_dir.join("config").join("settings.json");

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path).map_err(|e| e.to_string())?;
        let mut settings: Settings = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        crate::utils::config::apply_env_defaults(&mut settings);
        Ok(settings)
    } else {
        let mut settings = Settings::default();
        crate::utils::config::apply_env_defaults(&mut settings);
        Ok(settings)
    }
}

pub async fn update_settings(data_dir: &Path, settings: &Settings) -> Result<(), String> {
    let config_dir = data_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| e.to_string())?;

    let config_path = config_dir.join("settings.json");
    let content = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    std::fs::write(&config_path, content).map_err(|e| e.to_string())
}
