use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub territory: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            territory: None,
        }
    }
}

/// Defaults, overridden by `console.toml` in the working directory,
/// overridden by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("DISPATCH_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("DISPATCH_TERRITORY") {
        settings.territory = Some(v);
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, raw: &str) {
    if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) {
        if let Some(v) = file_cfg.get("server_url") {
            settings.server_url = v.clone();
        }
        if let Some(v) = file_cfg.get("territory") {
            settings.territory = Some(v.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_settings_override_defaults() {
        let mut settings = Settings::default();
        apply_file_settings(
            &mut settings,
            "server_url = \"http://dispatch.internal:9090\"\nterritory = \"T-North\"\n",
        );
        assert_eq!(settings.server_url, "http://dispatch.internal:9090");
        assert_eq!(settings.territory.as_deref(), Some("T-North"));
    }

    #[test]
    fn malformed_file_keeps_defaults() {
        let mut settings = Settings::default();
        apply_file_settings(&mut settings, "server_url = [not toml");
        assert_eq!(settings.server_url, Settings::default().server_url);
        assert!(settings.territory.is_none());
    }
}
