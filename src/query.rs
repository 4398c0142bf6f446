//! Query validation: raw request parameters in, [`SafeQuerySpec`] out.
//!
//! Both entry paths converge here. The raw REST path runs every field through
//! the sanitizer's allowlist and bounds checks; the natural-language path
//! adopts the extractor's filters, which are already drawn from closed
//! vocabularies. Any field failing validation is dropped rather than
//! rejected: a malformed filter degrades to "no filter", and the request
//! still succeeds.

use serde::Deserialize;

use crate::config::ApiConfig;
use crate::intent::ParsedIntent;
use crate::models::{ListingFilters, SortDirection, SortField, VerificationStatus};
use crate::sanitize;

/// Upper bound on free-text search length, in characters.
pub const MAX_SEARCH_LENGTH: usize = 100;
/// Upper bound on discrete string filters (industry, city, state, location).
pub const MAX_FILTER_LENGTH: usize = 100;
/// Minimum free-text search length on the dedicated search endpoint; shorter
/// queries are hard-rejected as both meaningless and expensive.
pub const MIN_SEARCH_LENGTH: usize = 3;
/// Price and investment bounds above this are discarded as implausible.
pub const MAX_AMOUNT: i64 = 10_000_000_000;

/// Result-count bounds for the natural-language endpoint, which is tighter
/// than the REST list endpoints.
pub const DEFAULT_NL_RESULTS: i64 = 10;
pub const MAX_NL_RESULTS: i64 = 20;

/// Sort fields accepted from raw REST parameters. The `featured` column is
/// reachable only through the intent extractor's sort-preference pass.
const REST_SORT_FIELDS: &[&str] = &[
    "created_at",
    "price",
    "total_investment_min",
    "name",
    "brand_name",
    "data_completeness_score",
];

const SORT_ORDERS: &[&str] = &["asc", "desc"];

/// Untrusted query-string parameters, exactly as received. All fields arrive
/// as strings so that malformed numbers degrade to defaults instead of
/// failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQueryParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_investment: Option<String>,
    pub max_investment: Option<String>,
    pub verification_status: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

/// The only structure the query executor accepts. By construction it cannot
/// encode a query outside declared resource limits: page and limit are
/// clamped, the sort column is a closed enum, and every filter string has
/// been stripped of wildcard and quote characters.
#[derive(Debug, Clone)]
pub struct SafeQuerySpec {
    pub page: i64,
    pub limit: i64,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub filters: ListingFilters,
}

impl SafeQuerySpec {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Validates raw REST parameters into a [`SafeQuerySpec`].
///
/// There is deliberately no cross-field check that `min <= max`: an inverted
/// range passes validation and simply yields an empty or very restrictive
/// result set.
pub fn validate(params: &RawQueryParams, api: &ApiConfig) -> SafeQuerySpec {
    let page = sanitize::parse_bounded_int(params.page.as_deref(), 1, api.max_page);
    let limit =
        sanitize::parse_bounded_int(params.limit.as_deref(), api.default_limit, api.max_limit);

    let sort_name = sanitize::validate_enum(params.sort_by.as_deref(), REST_SORT_FIELDS, "created_at");
    let sort_field = SortField::parse(sort_name).unwrap_or(SortField::CreatedAt);
    let sort_direction = match sanitize::validate_enum(params.sort_order.as_deref(), SORT_ORDERS, "desc")
    {
        "asc" => SortDirection::Asc,
        _ => SortDirection::Desc,
    };

    let filters = ListingFilters {
        industry: sanitize::sanitize_string(params.industry.as_deref(), MAX_FILTER_LENGTH),
        location: sanitize::sanitize_string(params.location.as_deref(), MAX_FILTER_LENGTH),
        city: sanitize::sanitize_string(params.city.as_deref(), MAX_FILTER_LENGTH),
        state: sanitize::sanitize_string(params.state.as_deref(), MAX_FILTER_LENGTH),
        min_price: bounded_amount(params.min_price.as_deref()),
        max_price: bounded_amount(params.max_price.as_deref()),
        min_investment: bounded_amount(params.min_investment.as_deref()),
        max_investment: bounded_amount(params.max_investment.as_deref()),
        features: Vec::new(),
        verification_status: params
            .verification_status
            .as_deref()
            .and_then(VerificationStatus::parse),
        search: sanitize::sanitize_string(params.search.as_deref(), MAX_SEARCH_LENGTH),
    };

    SafeQuerySpec {
        page,
        limit,
        sort_field,
        sort_direction,
        filters,
    }
}

/// Builds a spec from a parsed intent for the natural-language execute path.
/// Always page 1; the intent's filters are adopted as-is since the extractor
/// only assigns bounds-checked values from closed vocabularies.
pub fn from_intent(intent: &ParsedIntent, limit: i64) -> SafeQuerySpec {
    SafeQuerySpec {
        page: 1,
        limit: limit.clamp(1, MAX_NL_RESULTS),
        sort_field: intent.sort_by.unwrap_or(SortField::CreatedAt),
        sort_direction: intent.sort_order.unwrap_or(SortDirection::Desc),
        filters: intent.filters.clone(),
    }
}

/// Range-filter amounts use 0 as "absent": any unparsable, non-positive, or
/// over-limit value drops the filter entirely.
fn bounded_amount(input: Option<&str>) -> Option<f64> {
    let value = sanitize::parse_bounded_int(input, 0, MAX_AMOUNT);
    (value > 0).then(|| value as f64)
}
