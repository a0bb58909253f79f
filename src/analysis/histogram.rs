use crate::data::model::{AirQualityDataset, NumericField};

// ---------------------------------------------------------------------------
// Distribution binning for the PM2.5 / PM10 histograms
// ---------------------------------------------------------------------------

/// Counts of one series partitioned into equal-width bins spanning the
/// observed min/max.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Midpoint of bin `i`, for plotting bar positions.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.min + (i as f64 + 0.5) * self.bin_width()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// The two distribution histograms shown together, each binned over its own
/// range.  A series with no observations in the view yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PmDistribution {
    pub pm25: Option<Histogram>,
    pub pm10: Option<Histogram>,
}

/// Bin one series into `bins` equal-width bins.  Missing values were already
/// excluded by the caller.  `bins` must be at least 1.
fn bin_series(values: &[f64], bins: usize) -> Option<Histogram> {
    debug_assert!(bins >= 1);
    if values.is_empty() {
        return None;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bins as f64;

    let mut counts = vec![0u64; bins];
    for &v in values {
        // A constant series has zero width; everything lands in bin 0.
        // The maximum value belongs to the last bin, not one past it.
        let idx = if width > 0.0 {
            (((v - min) / width) as usize).min(bins - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    Some(Histogram { min, max, counts })
}

fn series(dataset: &AirQualityDataset, view: &[usize], field: NumericField) -> Vec<f64> {
    view.iter()
        .filter_map(|&i| field.value(&dataset.records[i]))
        .collect()
}

/// Histogram the PM2.5 and PM10 values of the view into `bins` equal-width
/// bins per series.  Rows missing one pollutant still count toward the other.
pub fn pm_distribution(dataset: &AirQualityDataset, view: &[usize], bins: usize) -> PmDistribution {
    PmDistribution {
        pm25: bin_series(&series(dataset, view, NumericField::Pm25), bins),
        pm10: bin_series(&series(dataset, view, NumericField::Pm10), bins),
    }
}
