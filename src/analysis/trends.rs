use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::data::model::{AirQualityDataset, Measurement};

// ---------------------------------------------------------------------------
// Time-bucketed averaging: seasonal (per-month) and daily trends
// ---------------------------------------------------------------------------

/// Mean PM2.5 / PM10 for one calendar month (1–12) of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyMean {
    pub month: u32,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

/// Mean PM2.5 / PM10 for one calendar date of the view.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMean {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
}

/// Per-series running sums; each series ignores rows where it is missing.
#[derive(Default)]
struct MeanAcc {
    pm25_sum: f64,
    pm25_count: u64,
    pm10_sum: f64,
    pm10_count: u64,
}

impl MeanAcc {
    fn add(&mut self, m: &Measurement) {
        if let Some(v) = m.pm25 {
            self.pm25_sum += v;
            self.pm25_count += 1;
        }
        if let Some(v) = m.pm10 {
            self.pm10_sum += v;
            self.pm10_count += 1;
        }
    }

    fn pm25(&self) -> Option<f64> {
        (self.pm25_count > 0).then(|| self.pm25_sum / self.pm25_count as f64)
    }

    fn pm10(&self) -> Option<f64> {
        (self.pm10_count > 0).then(|| self.pm10_sum / self.pm10_count as f64)
    }
}

/// Mean PM2.5 and PM10 per selected calendar month, ascending by month
/// number.  Months without any record in the view are omitted, never
/// zero-filled.  An empty selection yields an empty result; the UI
/// distinguishes that from "no data found".
pub fn monthly_trend(
    dataset: &AirQualityDataset,
    view: &[usize],
    months: &BTreeSet<u32>,
) -> Vec<MonthlyMean> {
    let mut buckets: BTreeMap<u32, MeanAcc> = BTreeMap::new();

    for &i in view {
        let m = &dataset.records[i];
        if months.contains(&m.month()) {
            buckets.entry(m.month()).or_default().add(m);
        }
    }

    buckets
        .into_iter()
        .map(|(month, acc)| MonthlyMean {
            month,
            pm25: acc.pm25(),
            pm10: acc.pm10(),
        })
        .collect()
}

/// Mean PM2.5 and PM10 per calendar date within `[start, end]`, ascending by
/// date.  Dates without any record are omitted.  An inverted range
/// (`start > end`) yields an empty result, not an error.
pub fn daily_trend(
    dataset: &AirQualityDataset,
    view: &[usize],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyMean> {
    if start > end {
        return Vec::new();
    }

    let mut buckets: BTreeMap<NaiveDate, MeanAcc> = BTreeMap::new();

    for &i in view {
        let m = &dataset.records[i];
        let date = m.date();
        if date >= start && date <= end {
            buckets.entry(date).or_default().add(m);
        }
    }

    buckets
        .into_iter()
        .map(|(date, acc)| DailyMean {
            date,
            pm25: acc.pm25(),
            pm10: acc.pm10(),
        })
        .collect()
}
