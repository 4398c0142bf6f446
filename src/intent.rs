//! Natural-language intent extraction.
//!
//! Turns a free-text listing query ("cheap restaurant franchise in Mumbai
//! under 20 lakh") into a structured [`ParsedIntent`]: resource type, filter
//! set, sort preference, and a heuristic confidence score.
//!
//! Parsing is deterministic and pure: ordered passes over the sanitized
//! lowercase query, each matching against a closed lexicon table and adding a
//! fixed increment to the confidence score. The confidence is a completeness
//! measure, not a probability — callers use it to decide whether to confirm
//! the interpretation with the user before executing.
//!
//! Every value the extractor assigns is drawn from a closed vocabulary or a
//! bounds-checked numeric parse, so the output already satisfies the query
//! validator's allowlists and converges with the raw REST path on the same
//! [`SafeQuerySpec`](crate::query::SafeQuerySpec) shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::lexicon;
use crate::models::{ListingFilters, ResourceType, SortDirection, SortField, VerificationStatus};
use crate::sanitize;

/// Shortest accepted natural-language query, in characters.
pub const MIN_QUERY_LENGTH: usize = 3;
/// Longest accepted natural-language query; longer input is truncated by the
/// sanitizer before parsing.
pub const MAX_QUERY_LENGTH: usize = 500;

/// Parsed amounts outside this range are discarded as implausible.
const MAX_PLAUSIBLE_AMOUNT: f64 = 10_000_000_000.0;

/// The structured interpretation of a free-text query.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedIntent {
    #[serde(rename = "listing_type")]
    pub resource_type: ResourceType,
    pub filters: ListingFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortDirection>,
    pub confidence: f64,
    /// The sanitized input, retained for audit and debugging.
    pub original_query: String,
}

struct AmountPatterns {
    upper: Regex,
    lower: Regex,
    bare: Regex,
    multiplier: f64,
}

static AMOUNT_PATTERNS: Lazy<Vec<AmountPatterns>> = Lazy::new(|| {
    lexicon::AMOUNT_UNITS
        .iter()
        .map(|unit| {
            let number = format!(r"(\d+(?:\.\d+)?)\s*(?:{})", unit.pattern);
            AmountPatterns {
                upper: Regex::new(&format!(r"(?:{})\s*{}", lexicon::MAX_QUALIFIERS, number))
                    .expect("valid upper-bound pattern"),
                lower: Regex::new(&format!(r"(?:{})\s*{}", lexicon::MIN_QUALIFIERS, number))
                    .expect("valid lower-bound pattern"),
                bare: Regex::new(&number).expect("valid bare amount pattern"),
                multiplier: unit.multiplier,
            }
        })
        .collect()
});

/// Parses a free-text query into a [`ParsedIntent`]. Deterministic and pure;
/// the same input always yields the same intent.
pub fn parse(raw_query: &str) -> ParsedIntent {
    let sanitized =
        sanitize::sanitize_string(Some(raw_query), MAX_QUERY_LENGTH).unwrap_or_default();
    let lower = sanitized.to_lowercase();
    let mut confidence = 0.0_f64;

    // Pass 1: resource type. First literal match wins; the matched word is
    // not consumed and remains visible to later passes.
    let resource_type = if lower.contains("franchise") {
        confidence += 0.20;
        ResourceType::Franchise
    } else if lower.contains("business") || lower.contains("company") {
        confidence += 0.20;
        ResourceType::Business
    } else {
        ResourceType::Both
    };

    let mut filters = ListingFilters::default();

    // Pass 2: industry, ties broken by table order.
    for (label, keywords) in lexicon::INDUSTRY_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            filters.industry = Some((*label).to_string());
            confidence += 0.15;
            break;
        }
    }

    // Pass 3: location. Cities are more specific, so a city hit suppresses
    // state matching entirely (no multi-location queries).
    for city in lexicon::CITIES {
        if lower.contains(city) {
            filters.city = Some(title_case(city));
            confidence += 0.15;
            break;
        }
    }
    if filters.city.is_none() {
        for state in lexicon::STATES {
            if lower.contains(state) {
                filters.state = Some(title_case(state));
                confidence += 0.10;
                break;
            }
        }
    }

    // Pass 4: amounts. Only the first unit that yields a plausible amount is
    // consumed; an unqualified amount is treated as an implicit ceiling but
    // never overwrites an upper bound that is already set.
    'units: for patterns in AMOUNT_PATTERNS.iter() {
        if let Some(caps) = patterns.upper.captures(&lower) {
            if let Some(amount) = plausible_amount(&caps[1], patterns.multiplier) {
                set_upper_bound(&mut filters, resource_type, amount);
                confidence += 0.15;
                break 'units;
            }
        }
        if let Some(caps) = patterns.lower.captures(&lower) {
            if let Some(amount) = plausible_amount(&caps[1], patterns.multiplier) {
                set_lower_bound(&mut filters, resource_type, amount);
                confidence += 0.15;
                break 'units;
            }
        }
        if filters.max_price.is_none() && filters.max_investment.is_none() {
            if let Some(caps) = patterns.bare.captures(&lower) {
                if let Some(amount) = plausible_amount(&caps[1], patterns.multiplier) {
                    set_upper_bound(&mut filters, resource_type, amount);
                    confidence += 0.10;
                    break 'units;
                }
            }
        }
    }

    // Pass 5: features accumulate, unlike industry and location.
    for (tag, keywords) in lexicon::FEATURE_KEYWORDS {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            filters.features.push((*tag).to_string());
            confidence += 0.05;
        }
    }
    if filters.features.iter().any(|f| f == "verified") {
        filters.verification_status = Some(VerificationStatus::Verified);
    }

    // Pass 6: sort preference. Exclusive groups; first match wins.
    let price_field = match resource_type {
        ResourceType::Franchise => SortField::TotalInvestmentMin,
        ResourceType::Business | ResourceType::Both => SortField::Price,
    };
    let (sort_by, sort_order) = if matches_any(&lower, lexicon::SORT_CHEAP) {
        confidence += 0.10;
        (Some(price_field), Some(SortDirection::Asc))
    } else if matches_any(&lower, lexicon::SORT_PREMIUM) {
        confidence += 0.10;
        (Some(price_field), Some(SortDirection::Desc))
    } else if matches_any(&lower, lexicon::SORT_NEWEST) {
        confidence += 0.10;
        (Some(SortField::CreatedAt), Some(SortDirection::Desc))
    } else if matches_any(&lower, lexicon::SORT_POPULAR) {
        confidence += 0.10;
        (Some(SortField::Featured), Some(SortDirection::Desc))
    } else {
        (None, None)
    };

    ParsedIntent {
        resource_type,
        filters,
        sort_by,
        sort_order,
        confidence: (confidence.min(1.0) * 100.0).round() / 100.0,
        original_query: sanitized,
    }
}

fn matches_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}

fn plausible_amount(digits: &str, multiplier: f64) -> Option<f64> {
    let amount = digits.parse::<f64>().ok()? * multiplier;
    (amount > 0.0 && amount < MAX_PLAUSIBLE_AMOUNT).then_some(amount)
}

/// Upper bounds land on the investment range for franchise queries and on
/// the price range for everything else.
fn set_upper_bound(filters: &mut ListingFilters, resource_type: ResourceType, amount: f64) {
    match resource_type {
        ResourceType::Franchise => filters.max_investment = Some(amount),
        ResourceType::Business | ResourceType::Both => filters.max_price = Some(amount),
    }
}

fn set_lower_bound(filters: &mut ListingFilters, resource_type: ResourceType, amount: f64) {
    match resource_type {
        ResourceType::Franchise => filters.min_investment = Some(amount),
        ResourceType::Business | ResourceType::Both => filters.min_price = Some(amount),
    }
}

/// Word-wise capitalization for matched lowercase location names
/// ("navi mumbai" → "Navi Mumbai").
fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
