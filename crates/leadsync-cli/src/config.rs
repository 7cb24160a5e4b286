//! Persistent CLI configuration and path resolution.

use std::path::{Path, PathBuf};

use leadsync_core::util::normalize_text_option;
use serde::{Deserialize, Serialize};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_LEADS_DIR: &str = "leads";
const LOGS_DIR_NAME: &str = "logs";

pub const LEADS_DIR_ENV: &str = "LEADSYNC_LEADS_DIR";
pub const LOGS_DIR_ENV: &str = "LEADSYNC_LOGS_DIR";
pub const DB_PATH_ENV: &str = "LEADSYNC_DB_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeadsyncConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub leads_dir: Option<String>,
    #[serde(default)]
    pub logs_dir: Option<String>,
    #[serde(default)]
    pub db_path: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

impl Default for LeadsyncConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            leads_dir: None,
            logs_dir: None,
            db_path: None,
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leadsync")
        .join(CONFIG_FILE_NAME)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("leadsync")
        .join("leads.db")
}

/// Paths given on the command line; they win over everything else
#[derive(Debug, Clone, Default)]
pub struct PathOverrides {
    pub leads_dir: Option<PathBuf>,
    pub logs_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
}

/// Fully resolved locations for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub leads_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub db_path: PathBuf,
}

impl LeadsyncConfig {
    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load_from_path(&default_config_path()),
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read config at {}: {}",
                path.display(),
                error
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {}",
                path.display(),
                error
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    /// Resolve paths from the process environment
    pub fn resolve(&self, overrides: PathOverrides) -> ResolvedPaths {
        self.resolve_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve each path as flag, then environment, then file, then default
    pub fn resolve_with_env(
        &self,
        overrides: PathOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> ResolvedPaths {
        let pick = |flag: Option<PathBuf>, key: &str, file: &Option<String>| {
            flag.or_else(|| normalize_text_option(env(key)).map(PathBuf::from))
                .or_else(|| file.as_ref().map(PathBuf::from))
        };

        let leads_dir = pick(overrides.leads_dir, LEADS_DIR_ENV, &self.leads_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEADS_DIR));
        let logs_dir = pick(overrides.logs_dir, LOGS_DIR_ENV, &self.logs_dir)
            .unwrap_or_else(|| leads_dir.join(LOGS_DIR_NAME));
        let db_path =
            pick(overrides.db_path, DB_PATH_ENV, &self.db_path).unwrap_or_else(default_db_path);

        ResolvedPaths {
            leads_dir,
            logs_dir,
            db_path,
        }
    }

    fn normalize(&mut self) {
        self.leads_dir = normalize_text_option(self.leads_dir.take());
        self.logs_dir = normalize_text_option(self.logs_dir.take());
        self.db_path = normalize_text_option(self.db_path.take());
    }
}
