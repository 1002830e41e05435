use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// GroupKey – the value of the `n` column
// ---------------------------------------------------------------------------

/// A numeric `n` value. The loader picks one variant for the whole column:
/// `Integer` when every cell is an integer, `Float` otherwise. That way
/// `1` and `1.0` from the same file always compare equal.
#[derive(Debug, Clone, Copy)]
pub enum GroupKey {
    Integer(i64),
    Float(f64),
}

/// `-0.0` and `0.0` are the same `n`.
fn canonical(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

impl GroupKey {
    /// Float key with `-0.0` folded into `0.0`.
    pub fn float(v: f64) -> Self {
        GroupKey::Float(canonical(v))
    }
}

// -- Manual Eq/Ord so GroupKey can key a BTreeMap --

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (GroupKey::Integer(a), GroupKey::Integer(b)) => a.cmp(b),
            (GroupKey::Float(a), GroupKey::Float(b)) => canonical(*a).total_cmp(&canonical(*b)),
            (GroupKey::Integer(_), GroupKey::Float(_)) => Ordering::Less,
            (GroupKey::Float(_), GroupKey::Integer(_)) => Ordering::Greater,
        }
    }
}

impl std::hash::Hash for GroupKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            GroupKey::Integer(i) => i.hash(state),
            GroupKey::Float(f) => canonical(*f).to_bits().hash(state),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Integer(i) => write!(f, "{i}"),
            GroupKey::Float(v) if v.is_finite() && v.fract() == 0.0 => {
                write!(f, "{:.1}", canonical(*v))
            }
            GroupKey::Float(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TimingRecord – one row of the input table
// ---------------------------------------------------------------------------

/// A single measurement: running with parameter `n` over `m` rows took `time`
/// seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub n: GroupKey,
    pub m: f64,
    /// Seconds.
    pub time: f64,
}

// ---------------------------------------------------------------------------
// TimingDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All records in input order.
#[derive(Debug, Clone, Default)]
pub struct TimingDataset {
    pub records: Vec<TimingRecord>,
}

impl TimingDataset {
    pub fn new(records: Vec<TimingRecord>) -> Self {
        TimingDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted set of distinct `n` values.
    pub fn distinct_n(&self) -> BTreeSet<GroupKey> {
        self.records.iter().map(|r| r.n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_keys_keep_a_decimal_when_whole() {
        assert_eq!(GroupKey::Integer(4).to_string(), "4");
        assert_eq!(GroupKey::Float(4.0).to_string(), "4.0");
        assert_eq!(GroupKey::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn keys_order_numerically() {
        let mut keys = vec![
            GroupKey::Float(10.0),
            GroupKey::Float(-1.5),
            GroupKey::Float(2.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::Float(-1.5),
                GroupKey::Float(2.0),
                GroupKey::Float(10.0)
            ]
        );
        assert!(GroupKey::Integer(2) < GroupKey::Integer(10));
    }

    #[test]
    fn negative_zero_is_the_same_key_as_zero() {
        let neg = GroupKey::Float(-0.0);
        let pos = GroupKey::Float(0.0);
        assert_eq!(neg, pos);
        assert_eq!(neg.cmp(&pos), std::cmp::Ordering::Equal);
        assert_eq!(neg.to_string(), "0.0");

        let hash = |k: &GroupKey| {
            use std::hash::{Hash, Hasher};
            let mut h = std::collections::hash_map::DefaultHasher::new();
            k.hash(&mut h);
            h.finish()
        };
        assert_eq!(hash(&neg), hash(&pos));
        assert!(matches!(GroupKey::float(-0.0), GroupKey::Float(v) if v.is_sign_positive()));
    }

    #[test]
    fn equality_agrees_with_ordering_across_variants() {
        let int = GroupKey::Integer(1);
        let float = GroupKey::Float(1.0);
        assert_ne!(int, float);
        assert!(int < float);
    }

    #[test]
    fn distinct_n_collapses_duplicates() {
        let ds = TimingDataset::new(vec![
            TimingRecord { n: GroupKey::Integer(2), m: 10.0, time: 0.1 },
            TimingRecord { n: GroupKey::Integer(1), m: 10.0, time: 0.1 },
            TimingRecord { n: GroupKey::Integer(2), m: 100.0, time: 0.3 },
        ]);
        let keys: Vec<_> = ds.distinct_n().into_iter().collect();
        assert_eq!(keys, vec![GroupKey::Integer(1), GroupKey::Integer(2)]);
        assert_eq!(ds.len(), 3);
        assert!(!ds.is_empty());
    }
}
