//! Due-date urgency
//!
//! Future due dates are measured in business days (Monday to Friday) after
//! the reference date; overdue dates in calendar days. The day count is then
//! bucketed into a score:
//!
//! | days left | score |
//! |-----------|-------|
//! | `< 0` (overdue) | `100 + 2 * days overdue` |
//! | `0` | `80` |
//! | `1..=2` | `60` |
//! | `> 2` | `max(0, 50 - 2 * days)` |
//!
//! A missing or unparseable due date scores `0`.

use chrono::{Datelike, Days, NaiveDate};

/// Format accepted for due dates
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` due date
pub fn parse_due_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).ok()
}

fn is_weekday(date: NaiveDate) -> bool {
    date.weekday().number_from_monday() <= 5
}

/// Counts weekdays in the half-open range `(start, end]`
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let total = (end - start).num_days();
    if total <= 0 {
        return 0;
    }

    // Every run of seven consecutive days holds exactly five weekdays
    let full_weeks = total / 7;
    let mut count = full_weeks * 5;

    let Some(base) = start.checked_add_days(Days::new(full_weeks as u64 * 7)) else {
        return count;
    };
    for offset in 1..=(total % 7) as u64 {
        if base.checked_add_days(Days::new(offset)).is_some_and(is_weekday) {
            count += 1;
        }
    }
    count
}

/// Days until `due`: negative calendar days when overdue, business days otherwise
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    if due < today {
        (due - today).num_days()
    } else {
        business_days_between(today, due)
    }
}

/// Maps a day count to an urgency score
pub fn bucket(days_left: i64) -> i64 {
    match days_left {
        d if d < 0 => 100 + 2 * d.abs(),
        0 => 80,
        1 | 2 => 60,
        d => (50 - 2 * d).max(0),
    }
}

/// Urgency score for an optional due date string relative to `today`
pub fn urgency(due_date: Option<&str>, today: NaiveDate) -> i64 {
    let Some(raw) = due_date.filter(|s| !s.is_empty()) else {
        return 0;
    };
    match parse_due_date(raw) {
        Some(due) => bucket(days_left(due, today)),
        None => {
            tracing::trace!(due_date = raw, "unparseable due date, no urgency");
            0
        }
    }
}
