//! Run-length grouping by an arbitrary key.

use crate::Bucket;

/// Group `items` into runs of equal keys, continuing from `previous`.
///
/// An item joins the last bucket only when its key equals that bucket's key;
/// otherwise a new bucket is opened, even if an earlier bucket carries the
/// same key. Input order is preserved and nothing is re-sorted, so callers
/// wanting one bucket per key must supply items sorted by key.
///
/// When `previous` is given, its buckets seed the result so the first run of
/// the new page can extend the trailing bucket of the previous page.
///
/// # Examples
///
/// ```
/// use pagination::{Bucket, group_runs};
///
/// let grouped = group_runs(vec!["a", "a", "b", "a"], |item| *item, None);
/// assert_eq!(
///     grouped,
///     vec![
///         Bucket::new("a", vec!["a", "a"]),
///         Bucket::new("b", vec!["b"]),
///         Bucket::new("a", vec!["a"]),
///     ]
/// );
/// ```
pub fn group_runs<T, K, F>(
    items: impl IntoIterator<Item = T>,
    key: F,
    previous: Option<Vec<Bucket<K, T>>>,
) -> Vec<Bucket<K, T>>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut buckets = previous.unwrap_or_default();
    for item in items {
        let item_key = key(&item);
        match buckets.last_mut() {
            Some(last) if last.key == item_key => last.items.push(item),
            _ => buckets.push(Bucket::new(item_key, vec![item])),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    //! Regression coverage for run-length grouping.

    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        folder: &'static str,
        name: &'static str,
    }

    fn item(folder: &'static str, name: &'static str) -> Item {
        Item { folder, name }
    }

    #[rstest]
    fn groups_runs_not_partitions() {
        let grouped = group_runs(vec!['a', 'a', 'b', 'a'], |c| *c, None);

        assert_eq!(grouped.len(), 3, "a trailing 'a' must open a third bucket");
        assert_eq!(grouped[0], Bucket::new('a', vec!['a', 'a']));
        assert_eq!(grouped[1], Bucket::new('b', vec!['b']));
        assert_eq!(grouped[2], Bucket::new('a', vec!['a']));
    }

    #[rstest]
    fn leading_run_of_new_page_extends_previous_trailing_bucket() {
        let first_page = group_runs(
            vec![item("drinks", "tea"), item("food", "bread")],
            |i| i.folder,
            None,
        );
        let merged = group_runs(
            vec![item("food", "cheese"), item("tools", "saw")],
            |i| i.folder,
            Some(first_page),
        );

        let keys: Vec<_> = merged.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["drinks", "food", "tools"]);
        let food: Vec<_> = merged[1].items.iter().map(|i| i.name).collect();
        assert_eq!(food, vec!["bread", "cheese"]);
    }

    #[rstest]
    fn new_page_never_merges_into_an_earlier_bucket() {
        let previous = vec![
            Bucket::new("drinks", vec![item("drinks", "tea")]),
            Bucket::new("food", vec![item("food", "bread")]),
        ];
        let merged = group_runs(vec![item("drinks", "coffee")], |i| i.folder, Some(previous));

        let keys: Vec<_> = merged.iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["drinks", "food", "drinks"]);
    }

    #[rstest]
    #[case::without_previous(None, 0)]
    #[case::with_previous(Some(vec![Bucket::new("food", vec![item("food", "bread")])]), 1)]
    fn empty_page_returns_previous_unchanged(
        #[case] previous: Option<Vec<Bucket<&'static str, Item>>>,
        #[case] expected_buckets: usize,
    ) {
        let expected = previous.clone().unwrap_or_default();
        let merged = group_runs(Vec::<Item>::new(), |i| i.folder, previous);

        assert_eq!(merged.len(), expected_buckets);
        assert_eq!(merged, expected);
    }

    #[rstest]
    fn regrouping_with_empty_page_is_idempotent() {
        let once = group_runs(
            vec![item("a", "1"), item("b", "2"), item("b", "3")],
            |i| i.folder,
            None,
        );
        let twice = group_runs(Vec::new(), |i: &Item| i.folder, Some(once.clone()));
        assert_eq!(once, twice);
    }
}
