//! Result ordering shared by listing, transaction and help desk queries.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};

/// Sort `items` by creation time, newest first.
///
/// The sort is stable: records created at the same instant keep their
/// relative order.
///
/// # Examples
/// ```
/// use bookshare::domain::newest_first;
/// use chrono::{TimeZone, Utc};
///
/// let mut days = vec![1, 3, 2];
/// newest_first(&mut days, |day| {
///     Utc.with_ymd_and_hms(2026, 2, *day, 0, 0, 0).single().expect("valid date")
/// });
/// assert_eq!(days, vec![3, 2, 1]);
/// ```
pub fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| Reverse(created_at(item)));
}
