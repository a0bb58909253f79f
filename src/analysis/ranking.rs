use std::collections::HashMap;

use crate::data::model::AirQualityDataset;

// ---------------------------------------------------------------------------
// Worst-station summary: highest mean PM2.5 across all stations
// ---------------------------------------------------------------------------

/// The station with the greatest mean PM2.5 over its non-missing readings.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRanking {
    pub station: String,
    pub mean_pm25: f64,
}

/// Find the station with the highest mean PM2.5 over the full record set.
///
/// This deliberately ignores the station filter: the comparison only makes
/// sense across all stations.  Missing readings are excluded from the mean
/// and stations with no readings at all do not participate.  Ties are broken
/// in favour of the station encountered first in original row order (strict
/// `>` while scanning in first-seen order).
pub fn highest_pollution_station(dataset: &AirQualityDataset) -> Option<StationRanking> {
    // Accumulate (sum, count) per station, keeping first-seen order so the
    // tie-break is stable against the input file.
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (f64, u64)> = HashMap::new();

    for m in &dataset.records {
        let Some(pm25) = m.pm25 else { continue };
        let entry = sums.entry(m.station.as_str()).or_insert_with(|| {
            order.push(m.station.as_str());
            (0.0, 0)
        });
        entry.0 += pm25;
        entry.1 += 1;
    }

    let mut best: Option<StationRanking> = None;
    for station in order {
        let (sum, count) = sums[station];
        let mean = sum / count as f64;
        if best.as_ref().map_or(true, |b| mean > b.mean_pm25) {
            best = Some(StationRanking {
                station: station.to_string(),
                mean_pm25: mean,
            });
        }
    }
    best
}
