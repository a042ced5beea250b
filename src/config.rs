use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::protocol::DEFAULT_CANVAS_LENGTH;
use crate::quality::{
    QualityGate, CONFIGURED_MAX_TIME_MS, DEFAULT_MIN_POINTS, DEFAULT_MIN_TIME_MS,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub min_time_ms: i64,
    pub max_time_ms: i64,
    pub min_points: usize,
    pub canvas_length: i64,
    /// Worker threads for batch conversion; 0 means one per available core.
    pub workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_time_ms: DEFAULT_MIN_TIME_MS,
            max_time_ms: CONFIGURED_MAX_TIME_MS,
            min_points: DEFAULT_MIN_POINTS,
            canvas_length: DEFAULT_CANVAS_LENGTH,
            workers: 0,
        }
    }
}

impl Config {
    pub fn quality_gate(&self) -> QualityGate {
        QualityGate::new(self.min_time_ms, self.max_time_ms, self.min_points)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
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
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
