use std::collections::BTreeMap;

use super::model::{GroupKey, TimingDataset};

// ---------------------------------------------------------------------------
// GroupSeries – one plotted line
// ---------------------------------------------------------------------------

/// The `(m, time)` points sharing one `n`, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSeries {
    pub n: GroupKey,
    pub points: Vec<(f64, f64)>,
}

impl GroupSeries {
    /// Legend label, e.g. `n = 4`.
    pub fn label(&self) -> String {
        format!("n = {}", self.n)
    }
}

/// Split the dataset into one series per distinct `n`, ascending.
///
/// Points keep the relative order they had in the input.
pub fn group_by_n(dataset: &TimingDataset) -> Vec<GroupSeries> {
    let mut groups: BTreeMap<GroupKey, Vec<(f64, f64)>> = BTreeMap::new();
    for rec in &dataset.records {
        groups.entry(rec.n).or_default().push((rec.m, rec.time));
    }

    let series: Vec<GroupSeries> = groups
        .into_iter()
        .map(|(n, points)| GroupSeries { n, points })
        .collect();

    for s in &series {
        log::debug!("{}: {} points", s.label(), s.points.len());
    }
    series
}
