//! Input sanitization primitives.
//!
//! Every untrusted string or number entering the query engine passes through
//! these functions first. They never fail: malformed input degrades to a safe
//! default, so a bad filter becomes "no filter" instead of an error response.

/// Characters stripped from string inputs before they can reach the store's
/// query layer. Covers SQL LIKE wildcards plus quote/escape characters.
const DENYLIST: &[char] = &['%', '_', '\'', '"', ';', '\\', '\0'];

/// Strips denylisted characters, trims whitespace, and truncates to
/// `max_length` characters. Returns `None` for absent or effectively-empty
/// input so callers can treat it as "filter not provided".
pub fn sanitize_string(input: Option<&str>, max_length: usize) -> Option<String> {
    let raw = input?;
    let cleaned: String = raw.chars().filter(|c| !DENYLIST.contains(c)).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_length).collect())
}

/// Parses a decimal integer, falling back to `default` on any parse failure
/// or value below 1, and clamping values above `max` down to `max`.
///
/// Callers must pick a `default` that already satisfies their own bound
/// (`0` is used by range filters to mean "absent").
pub fn parse_bounded_int(input: Option<&str>, default: i64, max: i64) -> i64 {
    let Some(raw) = input else {
        return default;
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => value.min(max),
        _ => default,
    }
}

/// Exact membership check against a closed allowlist. Unknown values fall
/// back to `default` silently; there is deliberately no normalization.
pub fn validate_enum<'a>(input: Option<&str>, allowed: &'a [&'a str], default: &'a str) -> &'a str {
    match input {
        Some(value) => allowed
            .iter()
            .find(|candidate| **candidate == value)
            .copied()
            .unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_denylist() {
        let out = sanitize_string(Some("a%b_c'd\"e;f\\g\0h"), 100).unwrap();
        assert_eq!(out, "abcdefgh");
        for c in ['%', '_', '\'', '"', ';', '\\', '\0'] {
            assert!(!out.contains(c));
        }
    }

    #[test]
    fn test_sanitize_trims_and_truncates() {
        assert_eq!(sanitize_string(Some("  hello  "), 100).unwrap(), "hello");
        assert_eq!(sanitize_string(Some("abcdef"), 3).unwrap(), "abc");
    }

    #[test]
    fn test_sanitize_empty_is_none() {
        assert_eq!(sanitize_string(None, 10), None);
        assert_eq!(sanitize_string(Some(""), 10), None);
        assert_eq!(sanitize_string(Some("   "), 10), None);
        // Entirely denylisted input collapses to nothing
        assert_eq!(sanitize_string(Some("%%''__"), 10), None);
    }

    #[test]
    fn test_sanitize_length_bound_holds() {
        for input in ["short", "a much longer input string than the bound", "%_;"] {
            if let Some(out) = sanitize_string(Some(input), 8) {
                assert!(out.chars().count() <= 8, "too long: {}", out);
            }
        }
    }

    #[test]
    fn test_parse_bounded_int_defaults() {
        assert_eq!(parse_bounded_int(None, 1, 1000), 1);
        assert_eq!(parse_bounded_int(Some("abc"), 20, 100), 20);
        assert_eq!(parse_bounded_int(Some(""), 20, 100), 20);
        assert_eq!(parse_bounded_int(Some("0"), 20, 100), 20);
        assert_eq!(parse_bounded_int(Some("-5"), 20, 100), 20);
        assert_eq!(parse_bounded_int(Some("3.7"), 20, 100), 20);
    }

    #[test]
    fn test_parse_bounded_int_clamps() {
        assert_eq!(parse_bounded_int(Some("50"), 20, 100), 50);
        assert_eq!(parse_bounded_int(Some("100"), 20, 100), 100);
        assert_eq!(parse_bounded_int(Some("101"), 20, 100), 100);
        assert_eq!(parse_bounded_int(Some("999999999"), 1, 1000), 1000);
    }

    #[test]
    fn test_parse_bounded_int_never_out_of_range() {
        for input in ["1", "42", "1000", "9999999999999999999999", "x", "-1", "0"] {
            let v = parse_bounded_int(Some(input), 7, 500);
            assert!(v == 7 || (1..=500).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_validate_enum_membership() {
        let allowed = ["asc", "desc"];
        assert_eq!(validate_enum(Some("asc"), &allowed, "desc"), "asc");
        assert_eq!(validate_enum(Some("ASC"), &allowed, "desc"), "desc");
        assert_eq!(validate_enum(Some("sideways"), &allowed, "desc"), "desc");
        assert_eq!(validate_enum(None, &allowed, "desc"), "desc");
    }
}
