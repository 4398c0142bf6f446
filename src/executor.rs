//! Safe dynamic query execution against the listing store.
//!
//! Consumes a [`SafeQuerySpec`] and issues filtered, sorted, paginated reads
//! over the `businesses` and `franchises` collections. Filter values are
//! always bound parameters; the only text interpolated into SQL is column
//! names drawn from the [`SortField`](crate::models::SortField) enum, so no
//! client-controlled string ever reaches the query text. A non-negotiable
//! `status = 'active'` predicate is present on every read.

use anyhow::Result;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::intent::ParsedIntent;
use crate::models::{BusinessSummary, FranchiseSummary, ListingFilters, SortDirection};
use crate::query::{self, SafeQuerySpec};

const BUSINESS_COLUMNS: &str = "id, slug, name, industry, location, city, state, price, revenue, \
     description, verification_status, data_completeness_score, featured, trending, created_at";

const FRANCHISE_COLUMNS: &str = "id, slug, brand_name, industry, description, \
     total_investment_min, total_investment_max, franchise_fee, royalty_percentage, \
     total_outlets, verification_status, data_completeness_score, featured, trending, created_at";

/// One page of rows plus the total count for the same predicate.
#[derive(Debug)]
pub struct PageResult<T> {
    pub rows: Vec<T>,
    pub total: i64,
}

/// Combined result of executing a parsed intent. A collection whose query
/// failed contributes an empty list and is named in `failed_collections`;
/// the other collection's results still come back (partial success).
#[derive(Debug, Default)]
pub struct IntentResults {
    pub businesses: Vec<BusinessSummary>,
    pub franchises: Vec<FranchiseSummary>,
    pub failed_collections: Vec<&'static str>,
}

/// Fetches one page of businesses matching the spec, plus the total count.
pub async fn fetch_businesses(
    pool: &SqlitePool,
    spec: &SafeQuerySpec,
) -> Result<PageResult<BusinessSummary>> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM businesses");
    push_business_filters(&mut count, &spec.filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::new(format!("SELECT {} FROM businesses", BUSINESS_COLUMNS));
    push_business_filters(&mut select, &spec.filters);
    push_order(
        &mut select,
        spec.sort_field.business_column(),
        spec.sort_direction,
    );
    select.push(" LIMIT ").push_bind(spec.limit);
    select.push(" OFFSET ").push_bind(spec.offset());

    let rows = select
        .build_query_as::<BusinessSummary>()
        .fetch_all(pool)
        .await?;

    Ok(PageResult { rows, total })
}

/// Fetches one page of franchises matching the spec, plus the total count.
pub async fn fetch_franchises(
    pool: &SqlitePool,
    spec: &SafeQuerySpec,
) -> Result<PageResult<FranchiseSummary>> {
    let mut count = QueryBuilder::new("SELECT COUNT(*) FROM franchises");
    push_franchise_filters(&mut count, &spec.filters);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::new(format!("SELECT {} FROM franchises", FRANCHISE_COLUMNS));
    push_franchise_filters(&mut select, &spec.filters);
    push_order(
        &mut select,
        spec.sort_field.franchise_column(),
        spec.sort_direction,
    );
    select.push(" LIMIT ").push_bind(spec.limit);
    select.push(" OFFSET ").push_bind(spec.offset());

    let rows = select
        .build_query_as::<FranchiseSummary>()
        .fetch_all(pool)
        .await?;

    Ok(PageResult { rows, total })
}

/// Looks up a single active business by UUID or slug.
pub async fn fetch_business_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<BusinessSummary>> {
    let column = identifier_column(id);
    let sql = format!(
        "SELECT {} FROM businesses WHERE status = 'active' AND {} = ?",
        BUSINESS_COLUMNS, column
    );
    let row = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Looks up a single active franchise by UUID or slug.
pub async fn fetch_franchise_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<FranchiseSummary>> {
    let column = identifier_column(id);
    let sql = format!(
        "SELECT {} FROM franchises WHERE status = 'active' AND {} = ?",
        FRANCHISE_COLUMNS, column
    );
    let row = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

/// Cross-collection free-text search over name/brand, description, and
/// industry. Used by the dedicated search endpoint; the term has already
/// passed the sanitizer and the minimum-length check.
pub async fn search_businesses(
    pool: &SqlitePool,
    term: &str,
    limit: i64,
) -> Result<Vec<BusinessSummary>> {
    let pattern = like_pattern(term);
    let sql = format!(
        "SELECT {} FROM businesses WHERE status = 'active' \
         AND (name LIKE ? OR description LIKE ? OR industry LIKE ?) LIMIT ?",
        BUSINESS_COLUMNS
    );
    let rows = sqlx::query_as(&sql)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn search_franchises(
    pool: &SqlitePool,
    term: &str,
    limit: i64,
) -> Result<Vec<FranchiseSummary>> {
    let pattern = like_pattern(term);
    let sql = format!(
        "SELECT {} FROM franchises WHERE status = 'active' \
         AND (brand_name LIKE ? OR description LIKE ? OR industry LIKE ?) LIMIT ?",
        FRANCHISE_COLUMNS
    );
    let rows = sqlx::query_as(&sql)
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Executes a parsed intent against the collection(s) it targets. The two
/// collection queries are independent and run concurrently. A failing
/// collection is logged server-side, reported in `failed_collections`, and
/// contributes an empty list; the request as a whole still succeeds.
pub async fn execute_intent(
    pool: &SqlitePool,
    intent: &ParsedIntent,
    limit: i64,
) -> IntentResults {
    let spec = query::from_intent(intent, limit);

    let (businesses, franchises) = tokio::join!(
        async {
            if intent.resource_type.includes_businesses() {
                Some(fetch_businesses(pool, &spec).await)
            } else {
                None
            }
        },
        async {
            if intent.resource_type.includes_franchises() {
                Some(fetch_franchises(pool, &spec).await)
            } else {
                None
            }
        },
    );

    let mut results = IntentResults::default();
    match businesses {
        Some(Ok(page)) => results.businesses = page.rows,
        Some(Err(error)) => {
            tracing::error!(%error, "business query failed during intent execution");
            results.failed_collections.push("businesses");
        }
        None => {}
    }
    match franchises {
        Some(Ok(page)) => results.franchises = page.rows,
        Some(Err(error)) => {
            tracing::error!(%error, "franchise query failed during intent execution");
            results.failed_collections.push("franchises");
        }
        None => {}
    }
    results
}

// ============ Predicate assembly ============

fn push_business_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &ListingFilters) {
    // Not client-controllable: only active listings are ever visible.
    builder.push(" WHERE status = 'active'");

    if let Some(ref industry) = filters.industry {
        builder.push(" AND industry = ").push_bind(industry.clone());
    }
    if let Some(ref city) = filters.city {
        builder.push(" AND city LIKE ").push_bind(like_pattern(city));
    }
    if let Some(ref state) = filters.state {
        builder.push(" AND state LIKE ").push_bind(like_pattern(state));
    }
    if let Some(ref location) = filters.location {
        builder
            .push(" AND (city LIKE ")
            .push_bind(like_pattern(location))
            .push(" OR state LIKE ")
            .push_bind(like_pattern(location))
            .push(")");
    }
    if let Some(min_price) = filters.min_price {
        builder.push(" AND price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filters.max_price {
        builder.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(status) = filters.verification_status {
        builder
            .push(" AND verification_status = ")
            .push_bind(status.as_str());
    }
    if let Some(ref search) = filters.search {
        builder
            .push(" AND (name LIKE ")
            .push_bind(like_pattern(search))
            .push(" OR description LIKE ")
            .push_bind(like_pattern(search))
            .push(")");
    }
}

fn push_franchise_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &ListingFilters) {
    builder.push(" WHERE status = 'active'");

    if let Some(ref industry) = filters.industry {
        builder.push(" AND industry = ").push_bind(industry.clone());
    }
    if let Some(min_investment) = filters.min_investment {
        builder
            .push(" AND total_investment_min >= ")
            .push_bind(min_investment);
    }
    if let Some(max_investment) = filters.max_investment {
        builder
            .push(" AND total_investment_max <= ")
            .push_bind(max_investment);
    }
    if let Some(status) = filters.verification_status {
        builder
            .push(" AND verification_status = ")
            .push_bind(status.as_str());
    }
    if let Some(ref search) = filters.search {
        builder
            .push(" AND (brand_name LIKE ")
            .push_bind(like_pattern(search))
            .push(" OR description LIKE ")
            .push_bind(like_pattern(search))
            .push(")");
    }
}

/// Sort column comes from the enum (never client text); a field with no
/// column in this collection falls back to newest-first.
fn push_order(
    builder: &mut QueryBuilder<'_, Sqlite>,
    column: Option<&'static str>,
    direction: SortDirection,
) {
    match column {
        Some(column) => {
            builder.push(" ORDER BY ");
            builder.push(column);
            builder.push(" ");
            builder.push(direction.sql());
        }
        None => {
            builder.push(" ORDER BY created_at DESC");
        }
    }
}

/// Wildcards in `term` were already stripped by the sanitizer, so the only
/// `%` in the pattern are the two added here.
fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

fn identifier_column(id: &str) -> &'static str {
    if Uuid::parse_str(id).is_ok() {
        "id"
    } else {
        "slug"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use crate::models::{SortField, VerificationStatus};
    use crate::seed::{self, BusinessSeed, FranchiseSeed};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        // Single connection so every query sees the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate::create_schema(&pool).await.unwrap();
        pool
    }

    fn business(slug: &str, name: &str) -> BusinessSeed {
        serde_json::from_value(serde_json::json!({ "slug": slug, "name": name })).unwrap()
    }

    fn franchise(slug: &str, brand: &str) -> FranchiseSeed {
        serde_json::from_value(serde_json::json!({ "slug": slug, "brand_name": brand })).unwrap()
    }

    async fn seed_listings(pool: &SqlitePool) {
        let mut cafe = business("mumbai-cafe", "Mumbai Cafe Central");
        cafe.industry = Some("Food & Beverage".to_string());
        cafe.city = Some("Mumbai".to_string());
        cafe.price = Some(1_500_000.0);
        cafe.description = Some("Running cafe near the station".to_string());
        cafe.verification_status = "verified".to_string();
        cafe.created_at = Some("2024-01-10T00:00:00Z".to_string());
        seed::insert_business(pool, &cafe).await.unwrap();

        let mut gym = business("pune-gym", "Pune Fitness Hub");
        gym.industry = Some("Health & Fitness".to_string());
        gym.city = Some("Pune".to_string());
        gym.price = Some(4_000_000.0);
        gym.created_at = Some("2024-03-05T00:00:00Z".to_string());
        seed::insert_business(pool, &gym).await.unwrap();

        let mut closed = business("closed-shop", "Closed Retail Shop");
        closed.status = "draft".to_string();
        closed.city = Some("Mumbai".to_string());
        closed.price = Some(100.0);
        seed::insert_business(pool, &closed).await.unwrap();

        let mut pizza = franchise("pizza-hub", "Pizza Hub");
        pizza.industry = Some("Food & Beverage".to_string());
        pizza.total_investment_min = Some(1_000_000.0);
        pizza.total_investment_max = Some(1_800_000.0);
        pizza.created_at = Some("2024-02-01T00:00:00Z".to_string());
        seed::insert_franchise(pool, &pizza).await.unwrap();

        let mut luxe = franchise("luxe-salon", "Luxe Salon");
        luxe.industry = Some("Beauty & Personal Care".to_string());
        luxe.total_investment_min = Some(8_000_000.0);
        luxe.total_investment_max = Some(12_000_000.0);
        luxe.created_at = Some("2024-04-01T00:00:00Z".to_string());
        seed::insert_franchise(pool, &luxe).await.unwrap();
    }

    fn spec() -> SafeQuerySpec {
        SafeQuerySpec {
            page: 1,
            limit: 20,
            sort_field: SortField::CreatedAt,
            sort_direction: SortDirection::Desc,
            filters: ListingFilters::default(),
        }
    }

    #[tokio::test]
    async fn test_status_filter_always_applied() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let page = fetch_businesses(&pool, &spec()).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.rows.iter().all(|b| b.slug != "closed-shop"));
    }

    #[tokio::test]
    async fn test_industry_equality_filter() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.industry = Some("Food & Beverage".to_string());
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].slug, "mumbai-cafe");
    }

    #[tokio::test]
    async fn test_city_partial_match() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.city = Some("mumb".to_string());
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].city.as_deref(), Some("Mumbai"));
    }

    #[tokio::test]
    async fn test_price_range() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.min_price = Some(2_000_000.0);
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].slug, "pune-gym");
    }

    #[tokio::test]
    async fn test_inverted_range_yields_empty() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.min_price = Some(5_000_000.0);
        spec.filters.max_price = Some(1_000.0);
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 0);
        assert!(page.rows.is_empty());
    }

    #[tokio::test]
    async fn test_verification_status_filter() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.verification_status = Some(VerificationStatus::Verified);
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].slug, "mumbai-cafe");
    }

    #[tokio::test]
    async fn test_sort_price_asc() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.sort_field = SortField::Price;
        spec.sort_direction = SortDirection::Asc;
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.rows[0].slug, "mumbai-cafe");
        assert_eq!(page.rows[1].slug, "pune-gym");
    }

    #[tokio::test]
    async fn test_inapplicable_sort_falls_back_to_created_at() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        // brand_name has no column on businesses; newest-first fallback.
        let mut spec = spec();
        spec.sort_field = SortField::BrandName;
        spec.sort_direction = SortDirection::Asc;
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.rows[0].slug, "pune-gym");
    }

    #[tokio::test]
    async fn test_pagination_offset_and_total() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.limit = 1;
        spec.page = 2;
        spec.sort_field = SortField::Price;
        spec.sort_direction = SortDirection::Asc;
        let page = fetch_businesses(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].slug, "pune-gym");
    }

    #[tokio::test]
    async fn test_franchise_investment_range() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let mut spec = spec();
        spec.filters.max_investment = Some(2_000_000.0);
        let page = fetch_franchises(&pool, &spec).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].slug, "pizza-hub");
    }

    #[tokio::test]
    async fn test_fetch_by_slug_and_missing() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let found = fetch_business_by_id(&pool, "mumbai-cafe").await.unwrap();
        assert_eq!(found.unwrap().name, "Mumbai Cafe Central");

        let missing = fetch_business_by_id(&pool, "no-such-slug").await.unwrap();
        assert!(missing.is_none());

        // Inactive listings are invisible even by direct lookup
        let draft = fetch_business_by_id(&pool, "closed-shop").await.unwrap();
        assert!(draft.is_none());
    }

    #[tokio::test]
    async fn test_fetch_by_uuid() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let id: String = sqlx::query_scalar("SELECT id FROM businesses WHERE slug = 'mumbai-cafe'")
            .fetch_one(&pool)
            .await
            .unwrap();
        let found = fetch_business_by_id(&pool, &id).await.unwrap();
        assert_eq!(found.unwrap().slug, "mumbai-cafe");
    }

    #[tokio::test]
    async fn test_free_text_search() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let businesses = search_businesses(&pool, "cafe", 10).await.unwrap();
        assert_eq!(businesses.len(), 1);

        // Industry text is searchable too
        let franchises = search_franchises(&pool, "beauty", 10).await.unwrap();
        assert_eq!(franchises.len(), 1);
        assert_eq!(franchises[0].slug, "luxe-salon");
    }

    #[tokio::test]
    async fn test_execute_intent_both_collections() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let intent = crate::intent::parse("food listings");
        let results = execute_intent(&pool, &intent, 10).await;
        assert_eq!(results.businesses.len(), 1);
        assert_eq!(results.franchises.len(), 1);
        assert!(results.failed_collections.is_empty());
    }

    #[tokio::test]
    async fn test_execute_intent_franchise_only() {
        let pool = test_pool().await;
        seed_listings(&pool).await;

        let intent = crate::intent::parse("franchise under 20 lakh");
        let results = execute_intent(&pool, &intent, 10).await;
        assert!(results.businesses.is_empty());
        assert_eq!(results.franchises.len(), 1);
        assert_eq!(results.franchises[0].slug, "pizza-hub");
    }
}
