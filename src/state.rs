use chrono::NaiveDate;

use crate::analysis::{run, AnalysisOutput, AnalysisParams};
use crate::data::filter::station_indices;
use crate::data::model::AirQualityDataset;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.  Owns the loaded dataset;
/// everything downstream reads it through index views.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<AirQualityDataset>,

    /// Currently selected station.
    pub selected_station: Option<String>,

    /// Indices of records belonging to the selected station (cached view).
    pub view_indices: Vec<usize>,

    /// Analysis selection plus its widget-bound parameters.
    pub params: AnalysisParams,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        // Placeholder range until a dataset provides the real one.
        let epoch = NaiveDate::default();
        Self {
            dataset: None,
            selected_station: None,
            view_indices: Vec::new(),
            params: AnalysisParams::new(epoch, epoch),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: select the first station and seed the
    /// date pickers from the covered range.
    pub fn set_dataset(&mut self, dataset: AirQualityDataset) {
        self.selected_station = dataset.stations.first().cloned();
        if let Some((start, end)) = dataset.date_range {
            self.params.start_date = start;
            self.params.end_date = end;
        }

        self.dataset = Some(dataset);
        self.refilter();
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the cached station view after a selection change.
    pub fn refilter(&mut self) {
        self.view_indices = match (&self.dataset, &self.selected_station) {
            (Some(ds), Some(station)) => station_indices(ds, station),
            _ => Vec::new(),
        };
    }

    /// Select a station and rebuild the view.
    pub fn set_station(&mut self, station: String) {
        self.selected_station = Some(station);
        self.refilter();
    }

    /// Toggle one month in the seasonal-trend selection.
    pub fn toggle_month(&mut self, month: u32) {
        if !self.params.months.remove(&month) {
            self.params.months.insert(month);
        }
    }

    /// Select all twelve months.
    pub fn select_all_months(&mut self) {
        self.params.months = (1..=12).collect();
    }

    /// Clear the month selection.
    pub fn select_no_months(&mut self) {
        self.params.months.clear();
    }

    /// Run the selected analysis against the current view.  Recomputed from
    /// the resident dataset on every call; no derived state is cached.
    pub fn run_analysis(&self) -> Option<AnalysisOutput> {
        self.dataset
            .as_ref()
            .map(|ds| run(ds, &self.view_indices, &self.params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analysis;
    use crate::data::model::Measurement;

    fn measurement(station: &str, day: u32) -> Measurement {
        Measurement {
            station: station.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2016, 4, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            pm25: Some(12.0),
            pm10: Some(24.0),
            no2: None,
            so2: None,
            co: None,
            o3: None,
            temperature: None,
            pressure: None,
            dew_point: None,
            wind_speed: None,
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(AirQualityDataset::from_records(vec![
            measurement("B-Station", 2),
            measurement("A-Station", 1),
            measurement("B-Station", 5),
        ]));
        state
    }

    #[test]
    fn loading_selects_first_station_and_seeds_dates() {
        let state = loaded_state();
        assert_eq!(state.selected_station.as_deref(), Some("A-Station"));
        assert_eq!(state.view_indices, vec![1]);
        assert_eq!(
            state.params.start_date,
            NaiveDate::from_ymd_opt(2016, 4, 1).unwrap()
        );
        assert_eq!(
            state.params.end_date,
            NaiveDate::from_ymd_opt(2016, 4, 5).unwrap()
        );
    }

    #[test]
    fn changing_station_rebuilds_the_view() {
        let mut state = loaded_state();
        state.set_station("B-Station".to_string());
        assert_eq!(state.view_indices, vec![0, 2]);
    }

    #[test]
    fn month_toggles_round_trip() {
        let mut state = loaded_state();
        assert_eq!(state.params.months.len(), 12);
        state.toggle_month(4);
        assert!(!state.params.months.contains(&4));
        state.toggle_month(4);
        assert!(state.params.months.contains(&4));

        state.select_no_months();
        assert!(state.params.months.is_empty());
        state.select_all_months();
        assert_eq!(state.params.months.len(), 12);
    }

    #[test]
    fn analysis_runs_only_with_a_dataset() {
        let empty = AppState::default();
        assert!(empty.run_analysis().is_none());

        let mut state = loaded_state();
        state.params.analysis = Analysis::Distribution;
        assert!(state.run_analysis().is_some());
    }
}
