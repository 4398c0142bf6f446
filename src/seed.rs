//! Listing fixture loading.
//!
//! `bizq seed <file.json>` inserts business and franchise listings from a
//! JSON fixture into the store. This exists for local development and
//! integration tests; production listings arrive through the marketplace
//! platform, which owns the write path.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use uuid::Uuid;

use crate::config::Config;
use crate::db;

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub businesses: Vec<BusinessSeed>,
    #[serde(default)]
    pub franchises: Vec<FranchiseSeed>,
}

#[derive(Debug, Deserialize)]
pub struct BusinessSeed {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_verification")]
    pub verification_status: String,
    #[serde(default)]
    pub data_completeness_score: Option<i64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FranchiseSeed {
    pub slug: String,
    pub brand_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total_investment_min: Option<f64>,
    #[serde(default)]
    pub total_investment_max: Option<f64>,
    #[serde(default)]
    pub franchise_fee: Option<f64>,
    #[serde(default)]
    pub royalty_percentage: Option<f64>,
    #[serde(default)]
    pub total_outlets: Option<i64>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_verification")]
    pub verification_status: String,
    #[serde(default)]
    pub data_completeness_score: Option<i64>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub trending: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_status() -> String {
    "active".to_string()
}

fn default_verification() -> String {
    "unverified".to_string()
}

pub async fn run_seed(config: &Config, path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let seed: SeedFile =
        serde_json::from_str(&content).with_context(|| "Failed to parse seed file")?;

    let pool = db::connect(config).await?;

    for business in &seed.businesses {
        insert_business(&pool, business).await?;
    }
    for franchise in &seed.franchises {
        insert_franchise(&pool, franchise).await?;
    }

    pool.close().await;

    println!(
        "seeded businesses: {}, franchises: {}",
        seed.businesses.len(),
        seed.franchises.len()
    );
    Ok(())
}

pub async fn insert_business(pool: &SqlitePool, seed: &BusinessSeed) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO businesses
            (id, slug, name, industry, location, city, state, price, revenue,
             description, status, verification_status, data_completeness_score,
             featured, trending, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&seed.slug)
    .bind(&seed.name)
    .bind(&seed.industry)
    .bind(&seed.location)
    .bind(&seed.city)
    .bind(&seed.state)
    .bind(seed.price)
    .bind(seed.revenue)
    .bind(&seed.description)
    .bind(&seed.status)
    .bind(&seed.verification_status)
    .bind(seed.data_completeness_score)
    .bind(seed.featured)
    .bind(seed.trending)
    .bind(created_at_or_now(seed.created_at.as_deref()))
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn insert_franchise(pool: &SqlitePool, seed: &FranchiseSeed) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO franchises
            (id, slug, brand_name, industry, description, total_investment_min,
             total_investment_max, franchise_fee, royalty_percentage, total_outlets,
             status, verification_status, data_completeness_score, featured,
             trending, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&seed.slug)
    .bind(&seed.brand_name)
    .bind(&seed.industry)
    .bind(&seed.description)
    .bind(seed.total_investment_min)
    .bind(seed.total_investment_max)
    .bind(seed.franchise_fee)
    .bind(seed.royalty_percentage)
    .bind(seed.total_outlets)
    .bind(&seed.status)
    .bind(&seed.verification_status)
    .bind(seed.data_completeness_score)
    .bind(seed.featured)
    .bind(seed.trending)
    .bind(created_at_or_now(seed.created_at.as_deref()))
    .execute(pool)
    .await?;
    Ok(())
}

fn created_at_or_now(explicit: Option<&str>) -> String {
    match explicit {
        Some(ts) => ts.to_string(),
        None => chrono::Utc::now().to_rfc3339(),
    }
}
