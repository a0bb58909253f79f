use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::analysis::Analysis;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – station, analysis, and parameter widgets
// ---------------------------------------------------------------------------

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the widgets.
    let stations = dataset.stations.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Station selector ----
            ui.strong("Station");
            let current_station = state.selected_station.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("station_select")
                .selected_text(&current_station)
                .show_ui(ui, |ui: &mut Ui| {
                    for station in &stations {
                        if ui
                            .selectable_label(current_station == *station, station)
                            .clicked()
                        {
                            state.set_station(station.clone());
                        }
                    }
                });
            ui.separator();

            // ---- Analysis selector ----
            ui.strong("Analysis");
            egui::ComboBox::from_id_salt("analysis_select")
                .selected_text(state.params.analysis.label())
                .width(200.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for analysis in Analysis::ALL {
                        if ui
                            .selectable_label(state.params.analysis == analysis, analysis.label())
                            .clicked()
                        {
                            state.params.analysis = analysis;
                        }
                    }
                });
            ui.separator();

            // ---- Parameters for the selected analysis ----
            match state.params.analysis {
                Analysis::Distribution => bins_widget(ui, state),
                Analysis::SeasonalTrend => months_widget(ui, state),
                Analysis::DailyTrend => date_range_widget(ui, state),
                Analysis::Correlation | Analysis::HighestPollution => {}
            }
        });
}

/// Bin-count slider for the distribution histograms.
fn bins_widget(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Histogram bins");
    ui.add(Slider::new(&mut state.params.bins, 10..=50));
}

/// Month multi-select for the seasonal trend.
fn months_widget(ui: &mut Ui, state: &mut AppState) {
    let n_selected = state.params.months.len();
    ui.strong(format!("Months  ({n_selected}/12)"));

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_months();
        }
        if ui.small_button("None").clicked() {
            state.select_no_months();
        }
    });

    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        let month = idx as u32 + 1;
        let mut checked = state.params.months.contains(&month);
        if ui.checkbox(&mut checked, *name).changed() {
            state.toggle_month(month);
        }
    }
}

/// Start/end date pickers for the daily trend.
fn date_range_widget(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Date range");

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut state.params.start_date).id_salt("trend_start"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut state.params.end_date).id_salt("trend_end"));
    });

    if state.params.start_date > state.params.end_date {
        ui.label(
            RichText::new("Start date is after end date; nothing to show.")
                .color(Color32::YELLOW),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} measurements, {} stations, {} in view",
                ds.len(),
                ds.stations.len(),
                state.view_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air-quality data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} measurements from {} stations",
                    dataset.len(),
                    dataset.stations.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
