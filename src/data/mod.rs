/// Data layer: core types, loading, and grouping.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .txt / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → TimingDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ TimingDataset │  Vec<TimingRecord>, n promoted column-wide
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  split by n → Vec<GroupSeries> (ascending n)
///   └──────────┘
/// ```

pub mod group;
pub mod loader;
pub mod model;
