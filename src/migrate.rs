use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    create_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Creates the listing tables and indexes. Idempotent; also used directly by
/// tests running against in-memory databases.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS businesses (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            industry TEXT,
            location TEXT,
            city TEXT,
            state TEXT,
            price REAL,
            revenue REAL,
            description TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            verification_status TEXT NOT NULL DEFAULT 'unverified',
            data_completeness_score INTEGER,
            featured INTEGER NOT NULL DEFAULT 0,
            trending INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS franchises (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            brand_name TEXT NOT NULL,
            industry TEXT,
            description TEXT,
            total_investment_min REAL,
            total_investment_max REAL,
            franchise_fee REAL,
            royalty_percentage REAL,
            total_outlets INTEGER,
            status TEXT NOT NULL DEFAULT 'active',
            verification_status TEXT NOT NULL DEFAULT 'unverified',
            data_completeness_score INTEGER,
            featured INTEGER NOT NULL DEFAULT 0,
            trending INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes cover the always-on status filter plus the common filter and
    // sort columns.
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_businesses_status ON businesses(status)",
        "CREATE INDEX IF NOT EXISTS idx_businesses_industry ON businesses(industry)",
        "CREATE INDEX IF NOT EXISTS idx_businesses_price ON businesses(price)",
        "CREATE INDEX IF NOT EXISTS idx_businesses_created_at ON businesses(created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_franchises_status ON franchises(status)",
        "CREATE INDEX IF NOT EXISTS idx_franchises_industry ON franchises(industry)",
        "CREATE INDEX IF NOT EXISTS idx_franchises_investment ON franchises(total_investment_min)",
        "CREATE INDEX IF NOT EXISTS idx_franchises_created_at ON franchises(created_at DESC)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
