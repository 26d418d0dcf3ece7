//! Time-window boundaries, terminal status sets, and quota math for the
//! dashboard and sales-trend read paths.
//!
//! All helpers take `today` explicitly so aggregation queries are pure and
//! testable; the API layer passes the current date once per request.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Status sets
// ---------------------------------------------------------------------------

/// Service item statuses that end the item's lifecycle.
pub const SERVICE_ITEM_TERMINAL: &[&str] = &["Completed", "Closed"];

/// Task statuses still considered open. Overdue tasks are those in one of
/// these states whose due date has passed.
pub const TASK_OPEN: &[&str] = &["Open", "In Progress"];

/// Installment statuses still awaiting payment.
pub const INSTALLMENT_PENDING: &[&str] = &["Scheduled", "Reminded"];

/// Pipeline stages that close a prospect. Pipeline value/count excludes these.
pub const PROSPECT_CLOSED_STAGES: &[&str] = &["Closed-Won", "Closed-Lost"];

/// Sale types that count toward the monthly auto quota.
pub const QUOTA_SALE_TYPES: &[&str] = &["New Business", "Rewrite"];

/// Line of business that counts toward the monthly auto quota.
pub const QUOTA_LINE_OF_BUSINESS: &str = "Personal Auto";

// ---------------------------------------------------------------------------
// Window boundaries
// ---------------------------------------------------------------------------

/// End of the current week: today through the next Sunday, inclusive.
pub fn week_end(today: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - u64::from(today.weekday().num_days_from_monday());
    today + Days::new(days_to_sunday)
}

/// Start of the current week (Monday).
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_monday()))
}

/// First day of the current calendar month.
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).expect("day 1 exists in every month")
}

/// January 1st of the current year.
pub fn year_start(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("Jan 1 exists in every year")
}

// ---------------------------------------------------------------------------
// Quota tracking
// ---------------------------------------------------------------------------

/// Default monthly target of qualifying auto sale items.
pub const MONTHLY_AUTO_QUOTA: i64 = 13;

/// Month-to-date quota standing.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub target: i64,
    pub sold: i64,
    pub remaining: i64,
    pub on_track: bool,
}

/// Compute quota standing as of `today`.
///
/// `on_track` pro-rates the target linearly over a flat 30-day month
/// (`sold >= target * day_of_month / 30`), regardless of the month's actual
/// length. This mirrors the reported business metric exactly; do not
/// calendar-correct it.
pub fn quota_status(sold: i64, target: i64, today: NaiveDate) -> QuotaStatus {
    let pace = target as f64 * f64::from(today.day()) / 30.0;
    QuotaStatus {
        target,
        sold,
        remaining: (target - sold).max(0),
        on_track: sold as f64 >= pace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_end_is_next_sunday_inclusive() {
        // 2026-03-04 is a Wednesday; that week's Sunday is 2026-03-08.
        assert_eq!(week_end(date(2026, 3, 4)), date(2026, 3, 8));
        // A Sunday maps to itself.
        assert_eq!(week_end(date(2026, 3, 8)), date(2026, 3, 8));
        // A Monday has six days to go.
        assert_eq!(week_end(date(2026, 3, 2)), date(2026, 3, 8));
    }

    #[test]
    fn week_start_is_monday() {
        assert_eq!(week_start(date(2026, 3, 4)), date(2026, 3, 2));
        assert_eq!(week_start(date(2026, 3, 2)), date(2026, 3, 2));
    }

    #[test]
    fn month_and_year_starts() {
        assert_eq!(month_start(date(2026, 3, 31)), date(2026, 3, 1));
        assert_eq!(year_start(date(2026, 8, 7)), date(2026, 1, 1));
    }

    #[test]
    fn quota_five_sold_on_day_ten() {
        // Pace on day 10 is 13 * 10 / 30 ≈ 4.33, so 5 sold is on track
        // with 8 remaining.
        let status = quota_status(5, MONTHLY_AUTO_QUOTA, date(2026, 3, 10));
        assert_eq!(status.remaining, 8);
        assert!(status.on_track);
    }

    #[test]
    fn quota_behind_pace_is_off_track() {
        // Pace on day 20 is 13 * 20 / 30 ≈ 8.67.
        let status = quota_status(8, MONTHLY_AUTO_QUOTA, date(2026, 3, 20));
        assert!(!status.on_track);
        assert_eq!(status.remaining, 5);
    }

    #[test]
    fn quota_remaining_never_negative() {
        let status = quota_status(15, MONTHLY_AUTO_QUOTA, date(2026, 3, 28));
        assert_eq!(status.remaining, 0);
        assert!(status.on_track);
    }

    #[test]
    fn flat_thirty_divisor_even_in_february() {
        // Feb 28 pace uses /30, not /28: 13 * 28 / 30 ≈ 12.13.
        let status = quota_status(12, MONTHLY_AUTO_QUOTA, date(2026, 2, 28));
        assert!(!status.on_track);
    }
}
