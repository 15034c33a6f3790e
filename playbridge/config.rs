use crate::error::App;
use crate::player::DEFAULT_SEEK_STEP;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Gstreamer,
    Headless,
}

// Every key is optional, an empty file gives the defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_to_stderr: bool,
    pub backend: Backend,
    pub seek_step: f64,
    pub tracks: Vec<String>,
    pub transcription_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            log_level: "info".to_string(),
            log_to_stderr: false,
            backend: Backend::default(),
            seek_step: DEFAULT_SEEK_STEP,
            tracks: Vec::new(),
            transcription_file: None,
        }
    }
}

impl Config {
    pub async fn load_from_file(file_path: &Path) -> Result<Self, App> {
        let content = tokio::fs::read_to_string(file_path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn dir() -> Result<PathBuf, App> {
        let home_dir = std::env::var("HOME")?;
        Ok(PathBuf::from(home_dir).join(".config").join("playbridge"))
    }
}
