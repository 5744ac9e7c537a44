// src/core/config_manager.rs
//! Configuration: optional `careers.yaml` with per-environment sections,
//! overridden by `CAREERS_*` environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::FsOps;
use crate::state::UserRole;

pub const DEFAULT_CONFIG_FILE: &str = "careers.yaml";
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_FILE: &str = "careers_cache.db";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub cache_path: PathBuf,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub token: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigSection {
    api_base_url: Option<String>,
    timeout_seconds: Option<u64>,
    cache_path: Option<PathBuf>,
    log_file: Option<PathBuf>,
    token: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: ConfigSection,
    production: ConfigSection,
}

impl ConfigManager {
    /// Load configuration from the working directory and process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`ConfigManager::load`], reading the YAML file at `config_path` if given.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let path = config_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("CAREERS_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let contents = if path.exists() {
            Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            )
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        } else {
            None
        };

        let base_dir = std::env::current_dir().context("Failed to get current directory")?;

        Self::from_sources(&environment, contents.as_deref(), &base_dir, |key| {
            std::env::var(key).ok()
        })
    }

    fn get_environment() -> String {
        std::env::var("CAREERS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Merge defaults, the YAML section for `environment`, then `lookup` overrides.
    pub fn from_sources<F>(
        environment: &str,
        file_contents: Option<&str>,
        base_dir: &Path,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: ConfigFile = match file_contents {
            Some(raw) if !raw.trim().is_empty() => {
                serde_yaml::from_str(raw).context("Failed to parse configuration file")?
            }
            _ => ConfigFile::default(),
        };

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        let api_base_url = lookup("CAREERS_API_URL")
            .or(section.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_seconds = match lookup("CAREERS_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("CAREERS_TIMEOUT_SECS must be a whole number of seconds")?,
            None => section.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let role = match lookup("CAREERS_ROLE").or(section.role) {
            Some(raw) => Some(raw.parse::<UserRole>().map_err(|e| anyhow::anyhow!(e))?),
            None => None,
        };

        let cache_path = lookup("CAREERS_CACHE_PATH")
            .map(PathBuf::from)
            .or(section.cache_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE));

        let log_file = lookup("CAREERS_LOG_FILE")
            .map(PathBuf::from)
            .or(section.log_file)
            .map(|p| FsOps::normalize_path(base_dir, &p));

        Ok(Self {
            environment_name: environment.to_string(),
            environment: EnvironmentConfig {
                cache_path: FsOps::normalize_path(base_dir, &cache_path),
                log_file,
            },
            service: ServiceConfig {
                api_base_url,
                timeout_seconds,
                token: lookup("CAREERS_TOKEN").or(section.token),
                role,
            },
        })
    }

    pub fn with_api_url(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url {
            self.service.api_base_url = url;
        }
        self
    }
}
