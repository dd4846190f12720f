//! Payment timeliness classification and due-date projection.
//!
//! Every caller in the crate goes through these functions; nothing else does
//! date arithmetic on due dates. All functions are pure: the reference date is
//! always passed in, never read from the clock.

use super::client::PaymentDay;
use super::status::PaymentStatus;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// Parses a calendar date, discarding any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM:SS[.f]` (or with a space
/// separator), and RFC 3339 timestamps. Timestamps with an offset are
/// converted to UTC before the date is taken.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return Err(LedgerError::InvalidDate("empty date".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt.date());
        }
    }

    Err(LedgerError::InvalidDate(input.to_string()))
}

/// Signed number of days from `expected` to `actual`.
pub fn day_offset(expected: NaiveDate, actual: NaiveDate) -> i64 {
    // Both sides are whole days, so there is no fraction to round up.
    actual.signed_duration_since(expected).num_days()
}

/// Classifies a payment made on `actual` against its `expected` due date.
pub fn classify(expected: NaiveDate, actual: NaiveDate) -> PaymentStatus {
    let offset = day_offset(expected, actual);
    match offset {
        o if o > 0 => PaymentStatus::Late {
            days: o.unsigned_abs(),
        },
        0 => PaymentStatus::OnTime,
        o => PaymentStatus::Early {
            days: o.unsigned_abs(),
        },
    }
}

/// [`classify`] over unparsed date strings.
pub fn classify_dates(expected: &str, actual: &str) -> Result<PaymentStatus> {
    Ok(classify(parse_date(expected)?, parse_date(actual)?))
}

/// Projects the next due date strictly after `reference`.
///
/// The due date in the reference month is used if it falls after the
/// reference; otherwise the following month's. A day past the end of the
/// target month is clamped to that month's last day.
pub fn next_due_date(day: PaymentDay, reference: NaiveDate) -> Result<NaiveDate> {
    let candidate = due_date_in_month(reference.year(), reference.month(), day)?;
    if candidate > reference {
        return Ok(candidate);
    }

    let (year, month) = if reference.month() == 12 {
        (reference.year() + 1, 1)
    } else {
        (reference.year(), reference.month() + 1)
    };
    due_date_in_month(year, month, day)
}

/// [`next_due_date`] over a raw day number and an unparsed reference date.
pub fn next_due_date_for(day: i64, reference: &str) -> Result<NaiveDate> {
    let day = PaymentDay::new(day)?;
    next_due_date(day, parse_date(reference)?)
}

/// Whole days from `reference` until `target` (negative if already past).
pub fn days_until(target: NaiveDate, reference: NaiveDate) -> i64 {
    day_offset(reference, target)
}

fn due_date_in_month(year: i32, month: u32, day: PaymentDay) -> Result<NaiveDate> {
    (1..=day.get())
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .ok_or_else(|| {
            LedgerError::InvalidDate(format!(
                "{:04}-{:02}-{:02} is outside the supported range",
                year,
                month,
                day.get()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn day(d: i64) -> PaymentDay {
        PaymentDay::new(d).unwrap()
    }

    #[test]
    fn test_classify_late() {
        let status = classify_dates("2024-03-01", "2024-03-05").unwrap();
        assert_eq!(status, PaymentStatus::Late { days: 4 });
    }

    #[test]
    fn test_classify_early() {
        let status = classify_dates("2024-03-05", "2024-03-01").unwrap();
        assert_eq!(status, PaymentStatus::Early { days: 4 });
    }

    #[test]
    fn test_classify_on_time() {
        let status = classify_dates("2024-03-05", "2024-03-05").unwrap();
        assert_eq!(status, PaymentStatus::OnTime);
        assert_eq!(status.days(), 0);
    }

    #[test]
    fn test_classify_ignores_time_of_day() {
        let status = classify_dates("2024-03-05T23:59:59", "2024-03-05 00:00:01").unwrap();
        assert_eq!(status, PaymentStatus::OnTime);

        let status = classify_dates("2024-03-01T08:00:00Z", "2024-03-02T07:00:00Z").unwrap();
        assert_eq!(status, PaymentStatus::Late { days: 1 });
    }

    #[test]
    fn test_rfc3339_offsets_normalize_to_utc() {
        // 2024-03-01 22:00 at -06:00 is 2024-03-02 in UTC.
        assert_eq!(date("2024-03-01T22:00:00-06:00"), date("2024-03-02"));
    }

    #[test]
    fn test_classify_across_year_and_leap_day() {
        assert_eq!(
            classify_dates("2023-12-30", "2024-01-02").unwrap(),
            PaymentStatus::Late { days: 3 }
        );
        assert_eq!(
            classify_dates("2024-03-01", "2024-02-28").unwrap(),
            PaymentStatus::Early { days: 2 }
        );
    }

    #[test]
    fn test_invalid_dates_are_rejected() {
        assert!(matches!(
            classify_dates("2024-02-30", "2024-03-01"),
            Err(LedgerError::InvalidDate(_))
        ));
        assert!(matches!(
            classify_dates("2024-03-01", "yesterday"),
            Err(LedgerError::InvalidDate(_))
        ));
        assert!(matches!(parse_date("  "), Err(LedgerError::InvalidDate(_))));
    }

    #[test]
    fn test_next_due_date_later_this_month() {
        assert_eq!(
            next_due_date_for(15, "2024-03-10").unwrap(),
            date("2024-03-15")
        );
    }

    #[test]
    fn test_next_due_date_rolls_to_next_month() {
        assert_eq!(
            next_due_date_for(15, "2024-03-20").unwrap(),
            date("2024-04-15")
        );
    }

    #[test]
    fn test_next_due_date_on_due_day_moves_forward() {
        assert_eq!(
            next_due_date_for(15, "2024-03-15").unwrap(),
            date("2024-04-15")
        );
    }

    #[test]
    fn test_next_due_date_clamps_to_month_end() {
        assert_eq!(
            next_due_date_for(31, "2024-04-01").unwrap(),
            date("2024-04-30")
        );
        assert_eq!(
            next_due_date_for(30, "2024-02-01").unwrap(),
            date("2024-02-29")
        );
        assert_eq!(
            next_due_date_for(31, "2023-01-31").unwrap(),
            date("2023-02-28")
        );
    }

    #[test]
    fn test_next_due_date_year_rollover() {
        assert_eq!(
            next_due_date_for(5, "2024-12-20").unwrap(),
            date("2025-01-05")
        );
        assert_eq!(
            next_due_date_for(31, "2024-12-31").unwrap(),
            date("2025-01-31")
        );
    }

    #[test]
    fn test_next_due_date_errors() {
        assert!(matches!(
            next_due_date_for(0, "2024-03-10"),
            Err(LedgerError::InvalidDay(0))
        ));
        assert!(matches!(
            next_due_date_for(32, "2024-03-10"),
            Err(LedgerError::InvalidDay(32))
        ));
        assert!(matches!(
            next_due_date_for(10, "10/03/2024"),
            Err(LedgerError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_reapplying_next_due_date_advances_one_month() {
        let first = next_due_date(day(15), date("2024-03-10")).unwrap();
        let second = next_due_date(day(15), first).unwrap();
        assert_eq!(first, date("2024-03-15"));
        assert_eq!(second, date("2024-04-15"));

        let first = next_due_date(day(31), date("2024-04-01")).unwrap();
        let second = next_due_date(day(31), first).unwrap();
        assert_eq!(first, date("2024-04-30"));
        assert_eq!(second, date("2024-05-31"));
    }

    #[test]
    fn test_days_until() {
        assert_eq!(days_until(date("2024-03-15"), date("2024-03-10")), 5);
        assert_eq!(days_until(date("2024-03-10"), date("2024-03-15")), -5);
    }

    #[test]
    fn test_random_offsets_classify_consistently() {
        let mut rng = rand::thread_rng();
        let base = date("2000-01-01");
        for _ in 0..1_000 {
            let expected = base + chrono::Duration::days(rng.gen_range(0..20_000));
            let n: i64 = rng.gen_range(-400..=400);
            let actual = expected + chrono::Duration::days(n);

            let status = classify(expected, actual);
            match n {
                n if n > 0 => assert_eq!(status, PaymentStatus::Late { days: n as u64 }),
                0 => assert_eq!(status, PaymentStatus::OnTime),
                n => assert_eq!(status, PaymentStatus::Early { days: (-n) as u64 }),
            }
        }
    }

    #[test]
    fn test_random_next_due_date_is_strictly_after_reference() {
        let mut rng = rand::thread_rng();
        let base = date("2000-01-01");
        for _ in 0..2_000 {
            let reference = base + chrono::Duration::days(rng.gen_range(0..20_000));
            let d = day(rng.gen_range(1..=31));

            let next = next_due_date(d, reference).unwrap();
            assert!(next > reference, "{} not after {}", next, reference);
            assert!(days_until(next, reference) <= 62);

            let following = next_due_date(d, next).unwrap();
            let expected_month = if next.month() == 12 { 1 } else { next.month() + 1 };
            assert_eq!(following.month(), expected_month);
            assert!(following.day() <= d.get());
            assert!(following > next);
        }
    }
}
