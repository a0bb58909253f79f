/// Data layer: core types, loading, date normalization, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawRecord>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  dates    │  year/month/day (+hour) → timestamp, or InvalidDateError
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ AirQualityDataset │  Vec<Measurement>, station + date indices
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  station predicate → index view
///   └──────────┘
/// ```
///
/// The dataset is read-only after load; every downstream computation works
/// on index views into it.

pub mod dates;
pub mod filter;
pub mod loader;
pub mod model;
