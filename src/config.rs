// Sat Oct 17 2026 - Alex

use crate::memory::guest::is_valid_guest_address;
use crate::utils::ProcessUtils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub process_name: String,
    pub pid: Option<u32>,
    pub base_symbols: Option<PathBuf>,
    pub custom_map: Option<PathBuf>,
    pub custom_start: Option<u32>,
    pub dump_dir: PathBuf,
    pub log_level: String,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_name: ProcessUtils::default_emulator_name().to_string(),
            pid: None,
            base_symbols: None,
            custom_map: None,
            custom_start: None,
            dump_dir: PathBuf::from("dump"),
            log_level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = Some(pid);
        self
    }

    pub fn with_base_symbols(mut self, path: PathBuf) -> Self {
        self.base_symbols = Some(path);
        self
    }

    pub fn with_custom_map(mut self, path: PathBuf, start: Option<u32>) -> Self {
        self.custom_map = Some(path);
        self.custom_start = start;
        self
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext.to_lowercase().as_str() {
            "json" => {
                let contents = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&contents)?)
            }
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        if !ext.eq_ignore_ascii_case("json") {
            return Err(ConfigError::UnsupportedFormat(ext.to_string()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pid.is_none() && self.process_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "either pid or process_name must be set".to_string(),
            ));
        }
        if let Some(start) = self.custom_start {
            if !is_valid_guest_address(start) {
                return Err(ConfigError::ValidationError(format!(
                    "custom_start {:#010x} is outside guest memory",
                    start
                )));
            }
        }
        if self.custom_map.is_some() && self.base_symbols.is_none() {
            return Err(ConfigError::ValidationError(
                "custom_map requires base_symbols".to_string(),
            ));
        }
        const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log_level {:?}",
                self.log_level
            )));
        }
        Ok(())
    }
}
