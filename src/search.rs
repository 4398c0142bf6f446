//! CLI entry points for intent parsing and natural-language search.
//!
//! `bizq parse` is the offline face of the NL endpoint's dry-run mode: it
//! prints the parsed intent without touching the store. `bizq search` parses
//! and executes, printing matching listings.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;
use crate::executor;
use crate::intent;
use crate::query;

/// Parses a query and prints the intent as JSON. No store access.
pub fn run_parse(query: &str) -> Result<()> {
    let intent = parse_checked(query)?;
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

/// Parses a query, executes it against the store, and prints the results.
pub async fn run_search(config: &Config, query: &str, limit: Option<i64>) -> Result<()> {
    let intent = parse_checked(query)?;
    let limit = limit
        .unwrap_or(query::DEFAULT_NL_RESULTS)
        .clamp(1, query::MAX_NL_RESULTS);

    let pool = db::connect(config).await?;
    let results = executor::execute_intent(&pool, &intent, limit).await;
    pool.close().await;

    println!("intent:");
    println!("{}", serde_json::to_string_pretty(&intent)?);
    println!();

    if !results.failed_collections.is_empty() {
        eprintln!("warning: query failed for: {}", results.failed_collections.join(", "));
    }

    println!("--- Businesses ({}) ---", results.businesses.len());
    for (i, business) in results.businesses.iter().enumerate() {
        let price = business
            .price
            .map(|p| format!("₹{:.0}", p))
            .unwrap_or_else(|| "price on request".to_string());
        println!(
            "{}. {} — {} ({})",
            i + 1,
            business.name,
            business.city.as_deref().unwrap_or("location undisclosed"),
            price
        );
        println!("    slug: {}", business.slug);
    }
    println!();

    println!("--- Franchises ({}) ---", results.franchises.len());
    for (i, franchise) in results.franchises.iter().enumerate() {
        let investment = match (franchise.total_investment_min, franchise.total_investment_max) {
            (Some(min), Some(max)) => format!("₹{:.0}–₹{:.0}", min, max),
            (Some(min), None) => format!("from ₹{:.0}", min),
            _ => "investment on request".to_string(),
        };
        println!("{}. {} ({})", i + 1, franchise.brand_name, investment);
        println!("    slug: {}", franchise.slug);
    }

    Ok(())
}

fn parse_checked(query: &str) -> Result<intent::ParsedIntent> {
    let length = query.trim().chars().count();
    if length < intent::MIN_QUERY_LENGTH {
        bail!(
            "query must be at least {} characters",
            intent::MIN_QUERY_LENGTH
        );
    }
    if length > intent::MAX_QUERY_LENGTH {
        bail!(
            "query must not exceed {} characters",
            intent::MAX_QUERY_LENGTH
        );
    }
    Ok(intent::parse(query))
}
