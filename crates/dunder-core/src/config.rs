use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_BASE_URL: &str = "http://34.111.115.133";
pub const BASE_URL_ENV: &str = "DUNDER_API_URL";

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub base_url: Option<String>,
    /// Player command line, without the file argument
    pub audio_player: Option<Vec<String>>,
    pub logging_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Backend base URL: environment first, then the config file, then the
    /// built-in default.
    pub fn resolve_base_url(&self) -> String {
        self.resolve_base_url_from(std::env::var(BASE_URL_ENV).ok())
    }

    pub fn resolve_base_url_from(&self, env: Option<String>) -> String {
        let non_blank = |v: &String| !v.trim().is_empty();
        env.filter(non_blank)
            .or_else(|| self.base_url.clone().filter(non_blank))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("dunder").join("config.json"))
    }
}
