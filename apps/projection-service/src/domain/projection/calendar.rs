//! Business-day calendar used to extend the historical index.
//!
//! Weekends are skipped; exchange holidays are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};

/// Whether `date` falls on a weekday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The next `count` business days strictly after `after`.
///
/// Returns fewer than `count` dates only when the calendar range of
/// `NaiveDate` is exhausted.
#[must_use]
pub fn next_business_days(after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    after
        .iter_days()
        .skip(1)
        .filter(|d| is_business_day(*d))
        .take(count)
        .collect()
}
