use crate::app_dirs::{expand_path, AppDirs};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub timed: TimedConfig,
    pub language: LanguageConfig,
    pub network: NetworkConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_width: u16,
    pub center_text: bool,
    pub show_progress_bar: bool,
    /// live display refreshes per second
    pub fps: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: 80,
            center_text: true,
            show_progress_bar: true,
            fps: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimedConfig {
    pub default_seconds: u64,
}

impl Default for TimedConfig {
    fn default() -> Self {
        Self {
            default_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanguageConfig {
    pub default: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: "english".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    pub file: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: AppDirs::history_file().to_string_lossy().into_owned(),
        }
    }
}

impl HistoryConfig {
    pub fn path(&self) -> PathBuf {
        expand_path(&self.file)
    }
}

impl Config {
    /// Interval between live display refreshes.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.display.fps.max(1)))
    }

    pub fn timed_limit(&self) -> Duration {
        Duration::from_secs(self.timed.default_seconds.max(1))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_file(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the config file; per-profile state lives next to it.
    pub fn config_dir(&self) -> PathBuf {
        self.path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load the config, writing the defaults out first if no file exists yet.
    pub fn load_or_init(&self) -> Config {
        if !self.path.exists() {
            let cfg = Config::default();
            match self.save(&cfg) {
                Ok(()) => info!("wrote default config to {}", self.path.display()),
                Err(e) => warn!("could not write default config {}: {}", self.path.display(), e),
            }
            return cfg;
        }
        self.load()
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(
                    "failed to parse config {}: {}; using defaults",
                    self.path.display(),
                    e
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
