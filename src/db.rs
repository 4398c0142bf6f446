//! SQLite connection handling for the listing store.
//!
//! The store is read-mostly: list and search queries fan out over a small
//! pool sized by `[db] pool_size`, while writes only arrive through `init`
//! and `seed`. WAL journaling keeps readers unblocked during those writes.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::config::Config;

/// Opens the listing database, creating the file and its parent directory
/// on first use.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory: {}", parent.display())
        })?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.db.pool_size)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open listing database: {}", db_path.display()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DbConfig, ServerConfig};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn config_at(path: PathBuf) -> Config {
        Config {
            db: DbConfig { path, pool_size: 2 },
            server: ServerConfig {
                bind: "127.0.0.1:0".to_string(),
            },
            api: ApiConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_connect_creates_missing_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("store").join("bizq.sqlite");

        let pool = connect(&config_at(path.clone())).await.unwrap();
        sqlx::query("SELECT 1").execute(&pool).await.unwrap();
        pool.close().await;

        assert!(path.exists());
    }
}
