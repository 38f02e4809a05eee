//! Resolution of calendar-relative transaction dates
//!
//! Transactions carry display dates rather than timestamps: "Today, 10:23 AM",
//! "Yesterday, 4:00 PM" or "Nov 18, 6:30 PM". These resolve against a
//! reference day:
//! - "Today" / "Yesterday" are the reference day minus 0 / 1 day
//! - "Mon D" is taken in the reference year, and rolled back one year when
//!   that lands strictly after the reference day (December data read in January)
//! - ISO "YYYY-MM-DD" is taken as-is

use chrono::{Datelike, Duration, NaiveDate};

pub fn resolve_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.contains("Today") {
        return Some(today);
    }
    if raw.contains("Yesterday") {
        return today.checked_sub_signed(Duration::days(1));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    // Drop any ", 6:30 PM" time suffix
    let month_day = raw.split(',').next().unwrap_or(raw).trim();
    if month_day.is_empty() {
        return None;
    }

    let in_year = |year: i32| {
        NaiveDate::parse_from_str(&format!("{} {}", month_day, year), "%b %d %Y").ok()
    };

    match in_year(today.year()) {
        Some(date) if date <= today => Some(date),
        // Feb 29 outside a leap year also falls through to the previous year
        _ => in_year(today.year() - 1),
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Whole months from `earlier` to `later`, ignoring days
pub fn months_between(earlier: NaiveDate, later: NaiveDate) -> i32 {
    (later.year() * 12 + later.month0() as i32) - (earlier.year() * 12 + earlier.month0() as i32)
}

/// Shift a month start by `delta` months
pub fn add_months(start: NaiveDate, delta: i32) -> NaiveDate {
    let total = start.year() * 12 + start.month0() as i32 + delta;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(start)
}

/// Short English month label ("Jan")
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// Next calendar date on or after `today` whose day-of-month is `day`
/// (clamped to the month's last day)
pub fn next_occurrence(today: NaiveDate, day: u32) -> NaiveDate {
    let this_month = month_start(today);
    for delta in 0..=1 {
        let start = add_months(this_month, delta);
        let candidate = clamp_day(start, day);
        if candidate >= today {
            return candidate;
        }
    }
    clamp_day(add_months(this_month, 1), day)
}

fn clamp_day(month_start: NaiveDate, day: u32) -> NaiveDate {
    let mut d = day.max(1);
    loop {
        if let Some(date) = month_start.with_day(d) {
            return date;
        }
        if d <= 28 {
            return month_start;
        }
        d -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        let today = date(2026, 3, 1);
        assert_eq!(resolve_date("Today, 10:23 AM", today), Some(today));
        assert_eq!(
            resolve_date("Yesterday, 4:00 PM", today),
            Some(date(2026, 2, 28))
        );
    }

    #[test]
    fn test_month_day_current_year() {
        let today = date(2026, 11, 20);
        assert_eq!(resolve_date("Nov 18, 6:30 PM", today), Some(date(2026, 11, 18)));
        assert_eq!(resolve_date("Nov 20", today), Some(date(2026, 11, 20)));
        assert_eq!(resolve_date("Mar 3", today), Some(date(2026, 3, 3)));
    }

    #[test]
    fn test_future_month_day_rolls_back_a_year() {
        // December data read in January
        let today = date(2026, 1, 5);
        assert_eq!(resolve_date("Dec 28", today), Some(date(2025, 12, 28)));
        assert_eq!(resolve_date("Jan 6", today), Some(date(2025, 1, 6)));
    }

    #[test]
    fn test_full_month_name_and_iso() {
        let today = date(2026, 6, 1);
        assert_eq!(resolve_date("April 2", today), Some(date(2026, 4, 2)));
        assert_eq!(resolve_date("2024-02-10", today), Some(date(2024, 2, 10)));
    }

    #[test]
    fn test_unparseable() {
        let today = date(2026, 6, 1);
        assert_eq!(resolve_date("", today), None);
        assert_eq!(resolve_date("sometime", today), None);
        assert_eq!(resolve_date("Foo 12", today), None);
    }

    #[test]
    fn test_leap_day_falls_back() {
        // 2027 is not a leap year, 2026 isn't either
        assert_eq!(resolve_date("Feb 29", date(2029, 3, 1)), Some(date(2028, 2, 29)));
        assert_eq!(resolve_date("Feb 29", date(2027, 3, 1)), None);
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(months_between(date(2025, 11, 30), date(2026, 2, 1)), 3);
        assert_eq!(add_months(date(2026, 1, 1), -1), date(2025, 12, 1));
        assert_eq!(add_months(date(2026, 11, 1), 3), date(2027, 2, 1));
        assert_eq!(month_label(date(2026, 9, 14)), "Sep");
    }

    #[test]
    fn test_next_occurrence() {
        assert_eq!(next_occurrence(date(2026, 10, 18), 18), date(2026, 10, 18));
        assert_eq!(next_occurrence(date(2026, 10, 18), 5), date(2026, 11, 5));
        assert_eq!(next_occurrence(date(2026, 1, 31), 30), date(2026, 2, 28));
    }
}
