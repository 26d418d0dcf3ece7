//! Pagination defaults and clamping helpers shared by list repositories.

/// Default number of list results per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 25;

/// Maximum number of list results per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Default page size for the sales log (denser rows).
pub const DEFAULT_SALES_LIMIT: i64 = 50;

/// Maximum page size for the sales log.
pub const MAX_SALES_LIMIT: i64 = 200;

/// Clamp an optional limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Clamp an optional offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_limit_uses_default() {
        assert_eq!(clamp_limit(None, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 25);
    }

    #[test]
    fn oversized_limit_is_clamped() {
        assert_eq!(clamp_limit(Some(10_000), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 100);
    }

    #[test]
    fn zero_and_negative_limits_clamp_to_one() {
        assert_eq!(clamp_limit(Some(0), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 1);
        assert_eq!(clamp_limit(Some(-5), DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT), 1);
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        assert_eq!(clamp_offset(Some(-1)), 0);
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(75)), 75);
    }
}
