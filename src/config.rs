use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

pub const APP_NAME: &str = "hud_chronicle";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime configuration. Defaults can be overridden from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model_name: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub prologue_enabled: bool,
    pub prologue_line_delay: Duration,
    pub connectivity_retry_delay: Duration,
    pub data_dir: PathBuf,
    /// Takes precedence over the stored credential when set.
    pub api_key_override: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(90),
            prologue_enabled: true,
            prologue_line_delay: Duration::from_millis(1800),
            connectivity_retry_delay: Duration::from_millis(1500),
            data_dir: default_data_dir(),
            api_key_override: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = non_empty("HUD_CHRONICLE_MODEL") {
            config.model_name = model;
        }
        if let Some(base) = non_empty("HUD_CHRONICLE_API_BASE") {
            config.api_base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(dir) = non_empty("HUD_CHRONICLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(flag) = non_empty("HUD_CHRONICLE_SKIP_PROLOGUE") {
            match parse_flag(&flag) {
                Some(skip) => config.prologue_enabled = !skip,
                None => warn!("ignoring HUD_CHRONICLE_SKIP_PROLOGUE={flag}"),
            }
        }
        config.api_key_override = non_empty("GEMINI_API_KEY");

        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_data_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config_with(&[]);
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert!(config.prologue_enabled);
        assert!(config.data_dir.ends_with(APP_NAME));
        assert_eq!(config.api_key_override, None);
    }

    #[test]
    fn environment_overrides() {
        let config = config_with(&[
            ("HUD_CHRONICLE_MODEL", "gemini-2.5-pro"),
            ("HUD_CHRONICLE_API_BASE", "http://localhost:8080/v1beta/"),
            ("HUD_CHRONICLE_SKIP_PROLOGUE", "yes"),
            ("HUD_CHRONICLE_DATA_DIR", "/tmp/hud"),
            ("GEMINI_API_KEY", "k"),
        ]);

        assert_eq!(config.model_name, "gemini-2.5-pro");
        assert_eq!(config.api_base_url, "http://localhost:8080/v1beta");
        assert!(!config.prologue_enabled);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/hud"));
        assert_eq!(config.api_key_override.as_deref(), Some("k"));
    }

    #[test]
    fn blank_and_unparseable_values_are_ignored() {
        let config = config_with(&[
            ("HUD_CHRONICLE_MODEL", "  "),
            ("HUD_CHRONICLE_SKIP_PROLOGUE", "maybe"),
            ("GEMINI_API_KEY", ""),
        ]);

        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert!(config.prologue_enabled);
        assert_eq!(config.api_key_override, None);
    }
}
