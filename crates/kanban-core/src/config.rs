//! Configuration loading and typed config structures for the Kanban game.
//!
//! The canonical configuration lives in `kanban-config.yaml` at the project
//! root. Every section and every key is optional; missing values fall back
//! to the shipped game constants. Board layouts are compiled in and are not
//! configurable.

use std::path::Path;

use chrono::NaiveDate;
use kanban_rules::{DecompositionConfig, EfficiencyTable, LifecycleConfig, RulesConfig, TaskBounds};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration. Mirrors `kanban-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct KanbanConfig {
    /// Economy and calendar settings.
    #[serde(default)]
    pub game: GameConfig,

    /// Worker lifecycle thresholds.
    #[serde(default)]
    pub lifecycle: LifecycleSection,

    /// Labor settings.
    #[serde(default)]
    pub labor: LaborSection,

    /// Feature decomposition settings.
    #[serde(default)]
    pub decomposition: DecompositionSection,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl KanbanConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `KANBAN_PORT` overrides `server.port` when set to a valid port.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// The rule-layer view of this configuration.
    pub fn to_rules(&self) -> RulesConfig {
        RulesConfig {
            lifecycle: LifecycleConfig {
                onboarding_days: self.lifecycle.onboarding_days,
                days_to_learn_role: self.lifecycle.days_to_learn_role,
                days_to_change_teams: self.lifecycle.days_to_change_teams,
            },
            efficiency: EfficiencyTable {
                junior: self.labor.efficiency.junior,
                mid: self.labor.efficiency.mid,
                senior: self.labor.efficiency.senior,
            },
            decomposition: DecompositionConfig {
                points_per_task: self.decomposition.points_per_task,
                backend: self.decomposition.backend.into(),
                frontend: self.decomposition.frontend.into(),
            },
        }
    }
}

/// Economy and calendar settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Money the company starts (and restarts) with.
    #[serde(default = "default_starting_money")]
    pub starting_money: Decimal,

    /// Calendar date of day 1. Defaults to the day the server starts.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: default_starting_money(),
            start_date: None,
        }
    }
}

/// Worker lifecycle thresholds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleSection {
    /// Days a new hire spends onboarding.
    #[serde(default = "default_onboarding_days")]
    pub onboarding_days: u32,

    /// Days of learning before a role is acquired.
    #[serde(default = "default_days_to_learn_role")]
    pub days_to_learn_role: u32,

    /// Days a worker spends changing teams.
    #[serde(default = "default_days_to_change_teams")]
    pub days_to_change_teams: u32,
}

impl Default for LifecycleSection {
    fn default() -> Self {
        Self {
            onboarding_days: default_onboarding_days(),
            days_to_learn_role: default_days_to_learn_role(),
            days_to_change_teams: default_days_to_change_teams(),
        }
    }
}

/// Labor settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LaborSection {
    /// Labor removed per worker per day, by seniority.
    #[serde(default)]
    pub efficiency: EfficiencySection,
}

/// Per-seniority efficiency.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EfficiencySection {
    /// Junior efficiency.
    #[serde(default = "default_efficiency")]
    pub junior: Decimal,
    /// Mid-level efficiency.
    #[serde(default = "default_efficiency")]
    pub mid: Decimal,
    /// Senior efficiency.
    #[serde(default = "default_efficiency")]
    pub senior: Decimal,
}

impl Default for EfficiencySection {
    fn default() -> Self {
        Self {
            junior: default_efficiency(),
            mid: default_efficiency(),
            senior: default_efficiency(),
        }
    }
}

/// Feature decomposition settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecompositionSection {
    /// Story points covered by one generated task.
    #[serde(default = "default_points_per_task")]
    pub points_per_task: u32,

    /// Backend task bounds.
    #[serde(default = "default_backend_bounds")]
    pub backend: BoundsSection,

    /// Frontend task bounds.
    #[serde(default = "default_frontend_bounds")]
    pub frontend: BoundsSection,
}

impl Default for DecompositionSection {
    fn default() -> Self {
        Self {
            points_per_task: default_points_per_task(),
            backend: default_backend_bounds(),
            frontend: default_frontend_bounds(),
        }
    }
}

/// Inclusive task-count bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoundsSection {
    /// Fewest tasks.
    pub min: u32,
    /// Most tasks.
    pub max: u32,
}

impl From<BoundsSection> for TaskBounds {
    fn from(bounds: BoundsSection) -> Self {
        Self {
            min: bounds.min,
            max: bounds.max,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSection {
    /// Override the port with `KANBAN_PORT` when it holds a valid port.
    pub fn apply_env_overrides(&mut self) {
        if let Some(port) = std::env::var("KANBAN_PORT")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
        {
            self.port = port;
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_starting_money() -> Decimal {
    Decimal::new(10_000, 0)
}

const fn default_onboarding_days() -> u32 {
    3
}

const fn default_days_to_learn_role() -> u32 {
    8
}

const fn default_days_to_change_teams() -> u32 {
    3
}

const fn default_efficiency() -> Decimal {
    Decimal::ONE
}

const fn default_points_per_task() -> u32 {
    5
}

const fn default_backend_bounds() -> BoundsSection {
    BoundsSection { min: 2, max: 6 }
}

const fn default_frontend_bounds() -> BoundsSection {
    BoundsSection { min: 1, max: 4 }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
