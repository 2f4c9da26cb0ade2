//! Planner settings, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! dashboard's stock behaviour: a 7-day horizon and a 3-month board.

use crate::calculations::maintenance::{
    DEFAULT_MONTHS_AHEAD, MAINTENANCE_CATEGORIES, MAX_MONTHS_AHEAD, MaintenanceGrouper,
};
use crate::calculations::next_occurrence::{Calculator, DEFAULT_ITERATION_CAP};
use crate::calculations::visibility::{DEFAULT_HORIZON_DAYS, HorizonFilter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_ENV: &str = "PLANNER_CONFIG";
pub const HTTP_ADDR_ENV: &str = "PLANNER_HTTP_ADDR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Days ahead the "upcoming" view looks.
    pub horizon_days: u32,
    /// Columns on the maintenance board.
    pub months_ahead: u32,
    /// Advance steps allowed per next-occurrence query.
    pub iteration_cap: usize,
    pub maintenance_categories: Vec<String>,
    pub http_addr: String,
    /// Task file used by the binaries when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            months_ahead: DEFAULT_MONTHS_AHEAD,
            iteration_cap: DEFAULT_ITERATION_CAP,
            maintenance_categories: MAINTENANCE_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
            http_addr: "0.0.0.0:3000".to_string(),
            store_path: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// File named by `PLANNER_CONFIG` if set, defaults otherwise. The listen
    /// address can be overridden on its own with `PLANNER_HTTP_ADDR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(addr) = std::env::var(HTTP_ADDR_ENV) {
            config.http_addr = addr;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_days == 0 {
            return Err(ConfigError::Invalid("horizon_days must be at least 1".into()));
        }
        if self.months_ahead == 0 || self.months_ahead > MAX_MONTHS_AHEAD {
            return Err(ConfigError::Invalid(format!(
                "months_ahead must be between 1 and {MAX_MONTHS_AHEAD}"
            )));
        }
        if self.iteration_cap == 0 {
            return Err(ConfigError::Invalid("iteration_cap must be at least 1".into()));
        }
        Ok(())
    }

    pub fn calculator(&self) -> Calculator {
        Calculator::with_iteration_cap(self.iteration_cap)
    }

    pub fn horizon_filter(&self) -> HorizonFilter {
        HorizonFilter::new(self.horizon_days).with_calculator(self.calculator())
    }

    pub fn maintenance_grouper(&self) -> MaintenanceGrouper {
        MaintenanceGrouper::new()
            .with_calculator(self.calculator())
            .with_categories(self.maintenance_categories.iter().cloned())
    }
}
