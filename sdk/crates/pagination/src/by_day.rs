//! Calendar-day grouping with newest-first ordering.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::Bucket;

/// Bucket keyed by calendar day.
pub type DayBucket<T> = Bucket<NaiveDate, T>;

/// Group `items` by the calendar day of their moment, merging with
/// `previous`.
///
/// `moment` returns the wall-clock timestamp of an item; its time of day is
/// truncated so every item falling on the same date lands in one bucket
/// whatever its position in the input. Items keep their input order within
/// a day.
///
/// For a day present in both `previous` and the new page, the previous items
/// come first and the new ones follow. The result is always sorted by day,
/// newest first, regardless of the order of the input or of `previous`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use pagination::group_by_day;
///
/// let morning = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .and_then(|d| d.and_hms_opt(9, 0, 0))
///     .ok_or("invalid date")?;
/// let grouped = group_by_day(vec![morning], |m| *m, None);
/// assert_eq!(grouped.len(), 1);
/// assert_eq!(grouped[0].key, morning.date());
/// # Ok::<(), &'static str>(())
/// ```
pub fn group_by_day<T, F>(
    items: impl IntoIterator<Item = T>,
    moment: F,
    previous: Option<Vec<DayBucket<T>>>,
) -> Vec<DayBucket<T>>
where
    F: Fn(&T) -> NaiveDateTime,
{
    let mut days: BTreeMap<NaiveDate, Vec<T>> = BTreeMap::new();
    for item in items {
        days.entry(moment(&item).date()).or_default().push(item);
    }

    for Bucket { key, items: mut earlier } in previous.into_iter().flatten() {
        if let Some(later) = days.remove(&key) {
            earlier.extend(later);
        }
        days.insert(key, earlier);
    }

    days.into_iter()
        .rev()
        .map(|(day, items)| Bucket::new(day, items))
        .collect()
}
