//! Configuration handling for triage
//!
//! Configuration is stored in `.triage/config.toml` (project) and
//! `~/.config/triage/config.toml` (global, platform dependent).
//!
//! ```toml
//! default_strategy = "smart"
//!
//! [smart]
//! urgency = 1.5
//! importance = 1.2
//! effort = 0.5
//! dependency = 2.0
//!
//! [matrix]
//! importance = 7
//! score = 50
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;
use crate::domain::{MatrixThresholds, SmartWeights, Strategy};

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".triage";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// Strategy used when none is given on the command line or in the input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_strategy: Option<Strategy>,

    /// Weights of the smart strategy
    pub smart: SmartWeights,

    /// Eisenhower matrix thresholds
    pub matrix: MatrixThresholds,
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Strategy used when the project does not set one
    pub default_strategy: Option<Strategy>,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Resolves the strategy for a run
    ///
    /// Precedence: explicit name (flag or `TRIAGE_STRATEGY`), then the input
    /// envelope, then project config, then global config, then smart.
    pub fn strategy(&self, explicit: Option<&str>, from_input: Option<&str>) -> Strategy {
        explicit
            .or(from_input)
            .map(Strategy::from_name)
            .or(self.project.default_strategy)
            .or(self.global.default_strategy)
            .unwrap_or_default()
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "triage", "triage-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = Self::project_config_path(project_root);

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")
    }

    fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(PROJECT_DIR).join("config.toml")
    }

    /// Finds the project root by looking for a `.triage/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(&current)
    }

    /// Walks up from `start` looking for a `.triage/` directory
    pub fn find_project_root_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Creates `.triage/config.toml` under `root` with default settings
    ///
    /// An existing config file is left untouched.
    pub fn init_project(root: &Path) -> Result<PathBuf> {
        let dir = root.join(PROJECT_DIR);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let config_path = Self::project_config_path(root);
        if !config_path.exists() {
            let defaults = ProjectConfig {
                default_strategy: Some(Strategy::Smart),
                ..ProjectConfig::default()
            };
            let content = toml::to_string_pretty(&defaults)
                .context("Failed to serialize project config")?;
            fs::write(&config_path, content).with_context(|| {
                format!("Failed to write project config: {}", config_path.display())
            })?;
        }

        Ok(config_path)
    }
}
