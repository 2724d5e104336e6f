//! Group-by aggregation feeding the charts and statistics tiles.

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::record::Record;

/// Label used for records whose grouping key is missing or empty.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub key: String,
    pub mean: f64,
    pub count: usize,
}

/// Mean of `value_fn` per `key_fn` group, in first-seen key order.
///
/// Records with no key (or an empty one) fall into [`UNKNOWN_GROUP`].
/// Callers decide how absent values count; the usual policy is to map them
/// to zero so they stay in the denominator.
pub fn group_mean<R, K, V>(records: &[R], key_fn: K, value_fn: V) -> Vec<GroupMean>
where
    R: Borrow<Record>,
    K: Fn(&Record) -> Option<&str>,
    V: Fn(&Record) -> f64,
{
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, usize)> = HashMap::new();

    for record in records {
        let record: &Record = record.borrow();
        let key = match key_fn(record) {
            Some(k) if !k.is_empty() => k,
            _ => UNKNOWN_GROUP,
        };
        if !sums.contains_key(key) {
            order.push(key.to_string());
        }
        let entry = sums.entry(key.to_string()).or_insert((0.0, 0));
        entry.0 += value_fn(record);
        entry.1 += 1;
    }

    order
        .into_iter()
        .map(|key| {
            let (sum, count) = sums[&key];
            GroupMean {
                mean: sum / count as f64,
                key,
                count,
            }
        })
        .collect()
}

/// Number of distinct non-empty keys. Missing and empty keys are not
/// counted as a category of their own.
pub fn distinct_count<R, K>(records: &[R], key_fn: K) -> usize
where
    R: Borrow<Record>,
    K: Fn(&Record) -> Option<&str>,
{
    records
        .iter()
        .filter_map(|r| key_fn(Borrow::<Record>::borrow(r)))
        .filter(|k| !k.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(sector: Option<&str>, intensity: Option<f64>) -> Record {
        Record {
            sector: sector.map(Into::into),
            intensity,
            ..Default::default()
        }
    }

    fn by_sector(r: &Record) -> Option<&str> {
        r.sector.as_deref()
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Record> = Vec::new();
        assert!(group_mean(&records, by_sector, Record::intensity_or_zero).is_empty());
        assert_eq!(distinct_count(&records, by_sector), 0);
    }

    #[test]
    fn test_single_record_mean_is_its_value() {
        let records = vec![sector(Some("Energy"), Some(7.5))];
        let groups = group_mean(&records, by_sector, Record::intensity_or_zero);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Energy");
        assert_eq!(groups[0].mean, 7.5);
        assert_eq!(groups[0].count, 1);
    }

    #[test]
    fn test_mean_per_group_in_first_seen_order() {
        let records = vec![
            sector(Some("Energy"), Some(4.0)),
            sector(Some("Health"), Some(2.0)),
            sector(Some("Energy"), Some(8.0)),
        ];
        let groups = group_mean(&records, by_sector, Record::intensity_or_zero);
        let pairs: Vec<(&str, f64)> = groups.iter().map(|g| (g.key.as_str(), g.mean)).collect();
        assert_eq!(pairs, vec![("Energy", 6.0), ("Health", 2.0)]);
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let records = vec![sector(Some("Energy"), Some(6.0)), sector(Some("Energy"), None)];
        let groups = group_mean(&records, by_sector, Record::intensity_or_zero);
        assert_eq!(groups[0].mean, 3.0);
        assert_eq!(groups[0].count, 2);
    }

    #[test]
    fn test_missing_and_empty_keys_group_as_unknown() {
        let records = vec![
            sector(None, Some(3.0)),
            sector(Some(""), None),
            sector(Some("Energy"), Some(1.0)),
        ];
        let groups = group_mean(&records, by_sector, Record::intensity_or_zero);
        assert_eq!(groups[0].key, UNKNOWN_GROUP);
        assert_eq!(groups[0].mean, 1.5);
        assert_eq!(groups[1].key, "Energy");
    }

    #[test]
    fn test_works_over_borrowed_subsets() {
        let records = vec![sector(Some("Energy"), Some(2.0)), sector(Some("Health"), Some(4.0))];
        let subset: Vec<&Record> = records.iter().skip(1).collect();
        let groups = group_mean(&subset, by_sector, Record::intensity_or_zero);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "Health");
    }

    #[test]
    fn test_distinct_count_excludes_missing_and_empty() {
        let records = vec![
            sector(Some("Energy"), None),
            sector(Some("Energy"), None),
            sector(None, None),
            sector(Some(""), None),
            sector(Some("Health"), None),
        ];
        assert_eq!(distinct_count(&records, by_sector), 2);
    }

    #[test]
    fn test_distinct_count_never_decreases_as_records_are_added() {
        let pool = vec![
            sector(Some("Energy"), None),
            sector(None, None),
            sector(Some("Health"), None),
            sector(Some("Energy"), None),
            sector(Some("Retail"), None),
        ];
        let mut previous = 0;
        for n in 0..=pool.len() {
            let count = distinct_count(&pool[..n], by_sector);
            assert!(count >= previous);
            previous = count;
        }
        assert_eq!(previous, 3);
    }
}
