use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable holding a string of single-character toggles
/// applied at startup exactly like keystrokes. Unrecognized characters
/// are ignored silently.
pub const ENV_TOGGLES: &str = "PULSETOP";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    /// Average every logical core, or (false) stride one sibling per
    /// physical core so SMT siblings are not double-counted.
    pub count_smt_siblings: bool,
    /// Panes enabled at startup, as the same character toggles the keys
    /// and `PULSETOP` use.
    pub panes: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 1000,
            count_smt_siblings: true,
            panes: "cmp".to_string(),
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pulsetop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

pub fn env_toggles() -> Option<String> {
    std::env::var(ENV_TOGGLES).ok()
}
