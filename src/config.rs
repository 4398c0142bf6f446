use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    /// Connection pool size. The store is read-mostly, so a handful of
    /// connections covers concurrent list and search requests.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

/// Pagination bounds for the REST endpoints. Defaults match the public API
/// contract; overrides exist for load testing and embedded deployments.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_limit")]
    pub default_limit: i64,
    #[serde(default = "default_max_limit")]
    pub max_limit: i64,
    #[serde(default = "default_max_page")]
    pub max_page: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_page: default_max_page(),
        }
    }
}

fn default_pool_size() -> u32 {
    5
}
fn default_limit() -> i64 {
    20
}
fn default_max_limit() -> i64 {
    100
}
fn default_max_page() -> i64 {
    1000
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.db.pool_size < 1 {
        anyhow::bail!("db.pool_size must be >= 1");
    }
    if config.api.default_limit < 1 {
        anyhow::bail!("api.default_limit must be >= 1");
    }
    if config.api.max_limit < config.api.default_limit {
        anyhow::bail!("api.max_limit must be >= api.default_limit");
    }
    if config.api.max_page < 1 {
        anyhow::bail!("api.max_page must be >= 1");
    }

    Ok(config)
}
