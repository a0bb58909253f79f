/// Analysis layer: the stateless aggregation functions and the dispatch
/// table that maps the user's analysis selection onto them.
///
/// Every function here is a pure pass over `(dataset, index view, params)`;
/// the UI layer owns widget state and rendering, nothing else.
///
/// Submodules:
/// - `histogram`   – PM2.5 / PM10 distribution binning.
/// - `correlation` – pairwise Pearson matrix over the 10 numeric fields.
/// - `ranking`     – highest mean-PM2.5 station across all stations.
/// - `trends`      – per-month and per-date mean series.

pub mod correlation;
pub mod histogram;
pub mod ranking;
pub mod trends;

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::data::model::AirQualityDataset;

use self::correlation::{correlation_matrix, CorrelationMatrix};
use self::histogram::{pm_distribution, PmDistribution};
use self::ranking::{highest_pollution_station, StationRanking};
use self::trends::{daily_trend, monthly_trend, DailyMean, MonthlyMean};

// ---------------------------------------------------------------------------
// Analysis selection and dispatch
// ---------------------------------------------------------------------------

/// The analyses offered by the dashboard, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    Distribution,
    Correlation,
    HighestPollution,
    SeasonalTrend,
    DailyTrend,
}

impl Analysis {
    pub const ALL: [Analysis; 5] = [
        Analysis::Distribution,
        Analysis::Correlation,
        Analysis::HighestPollution,
        Analysis::SeasonalTrend,
        Analysis::DailyTrend,
    ];

    /// Label shown in the analysis selector.
    pub fn label(&self) -> &'static str {
        match self {
            Analysis::Distribution => "PM2.5 and PM10 Distribution",
            Analysis::Correlation => "Pollutant / Meteorology Correlation",
            Analysis::HighestPollution => "Highest-Pollution Station",
            Analysis::SeasonalTrend => "Seasonal Trend",
            Analysis::DailyTrend => "Daily Trend",
        }
    }
}

/// Parameters collected by the UI widgets.  Owned by the application state;
/// the core only ever reads them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    pub analysis: Analysis,
    /// Histogram bin count (slider, 10–50).
    pub bins: usize,
    /// Selected calendar months for the seasonal trend.
    pub months: BTreeSet<u32>,
    /// Inclusive date range for the daily trend.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl AnalysisParams {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        AnalysisParams {
            analysis: Analysis::Distribution,
            bins: 30,
            months: (1..=12).collect(),
            start_date,
            end_date,
        }
    }
}

/// Output of one analysis run, ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutput {
    Distribution(PmDistribution),
    Correlation(CorrelationMatrix),
    HighestPollution(Option<StationRanking>),
    Seasonal(Vec<MonthlyMean>),
    Daily(Vec<DailyMean>),
}

/// Dispatch the selected analysis to its aggregator.
///
/// `view` is the station-filtered index view; the highest-pollution ranking
/// intentionally ignores it and ranks across the full record set.
pub fn run(dataset: &AirQualityDataset, view: &[usize], params: &AnalysisParams) -> AnalysisOutput {
    match params.analysis {
        Analysis::Distribution => {
            AnalysisOutput::Distribution(pm_distribution(dataset, view, params.bins))
        }
        Analysis::Correlation => AnalysisOutput::Correlation(correlation_matrix(dataset, view)),
        Analysis::HighestPollution => {
            AnalysisOutput::HighestPollution(highest_pollution_station(dataset))
        }
        Analysis::SeasonalTrend => {
            AnalysisOutput::Seasonal(monthly_trend(dataset, view, &params.months))
        }
        Analysis::DailyTrend => AnalysisOutput::Daily(daily_trend(
            dataset,
            view,
            params.start_date,
            params.end_date,
        )),
    }
}
