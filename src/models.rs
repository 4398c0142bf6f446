//! Core data types used throughout the listing query engine.
//!
//! Closed vocabularies (resource type, sort field, verification status) are
//! enums rather than raw strings, so nothing unvalidated can reach the
//! store's query layer.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Which listing collection(s) a query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Business,
    Franchise,
    Both,
}

impl ResourceType {
    pub fn includes_businesses(self) -> bool {
        matches!(self, Self::Business | Self::Both)
    }

    pub fn includes_franchises(self) -> bool {
        matches!(self, Self::Franchise | Self::Both)
    }
}

/// Listing verification state, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Pending,
    Unverified,
    Rejected,
}

impl VerificationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "verified" => Some(Self::Verified),
            "pending" => Some(Self::Pending),
            "unverified" => Some(Self::Unverified),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::Unverified => "unverified",
            Self::Rejected => "rejected",
        }
    }
}

/// Sortable columns. Each collection exposes only a subset; a field with no
/// column in the queried collection falls back to `created_at DESC` at the
/// executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    Price,
    TotalInvestmentMin,
    Name,
    BrandName,
    DataCompletenessScore,
    Featured,
}

impl SortField {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "created_at" => Some(Self::CreatedAt),
            "price" => Some(Self::Price),
            "total_investment_min" => Some(Self::TotalInvestmentMin),
            "name" => Some(Self::Name),
            "brand_name" => Some(Self::BrandName),
            "data_completeness_score" => Some(Self::DataCompletenessScore),
            "featured" => Some(Self::Featured),
            _ => None,
        }
    }

    /// Column name on the `businesses` table, if this field applies to it.
    pub fn business_column(self) -> Option<&'static str> {
        match self {
            Self::CreatedAt => Some("created_at"),
            Self::Price => Some("price"),
            Self::Name => Some("name"),
            Self::DataCompletenessScore => Some("data_completeness_score"),
            Self::Featured => Some("featured"),
            Self::TotalInvestmentMin | Self::BrandName => None,
        }
    }

    /// Column name on the `franchises` table, if this field applies to it.
    pub fn franchise_column(self) -> Option<&'static str> {
        match self {
            Self::CreatedAt => Some("created_at"),
            Self::TotalInvestmentMin => Some("total_investment_min"),
            Self::BrandName => Some("brand_name"),
            Self::DataCompletenessScore => Some("data_completeness_score"),
            Self::Featured => Some("featured"),
            Self::Price | Self::Name => None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sparse filter set shared by the natural-language path and the raw REST
/// path. Every present value has already passed the validator's allowlist
/// and bounds checks by construction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_investment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_investment: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Business listing summary row, as selected by list and search queries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BusinessSummary {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub price: Option<f64>,
    pub revenue: Option<f64>,
    pub description: Option<String>,
    pub verification_status: Option<String>,
    pub data_completeness_score: Option<i64>,
    pub featured: bool,
    pub trending: bool,
    pub created_at: String,
}

/// Franchise listing summary row.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FranchiseSummary {
    pub id: String,
    pub slug: String,
    pub brand_name: String,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub total_investment_min: Option<f64>,
    pub total_investment_max: Option<f64>,
    pub franchise_fee: Option<f64>,
    pub royalty_percentage: Option<f64>,
    pub total_outlets: Option<i64>,
    pub verification_status: Option<String>,
    pub data_completeness_score: Option<i64>,
    pub featured: bool,
    pub trending: bool,
    pub created_at: String,
}

/// Uniform response wrapper for paginated list endpoints. Built once per
/// request and discarded when the response is sent.
#[derive(Debug, Serialize)]
pub struct PaginatedEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: (total + limit - 1) / limit,
            has_next: page * limit < total,
            has_prev: page > 1,
        }
    }
}

/// Request timing metadata attached to every response body.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub response_time_ms: u64,
}

impl ResponseMeta {
    pub fn since(start: std::time::Instant) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}
