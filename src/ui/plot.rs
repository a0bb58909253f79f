use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use eframe::egui::{vec2, Align2, Color32, FontId, Rect, RichText, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::analysis::correlation::{CorrelationMatrix, FIELD_COUNT};
use crate::analysis::histogram::Histogram;
use crate::analysis::ranking::StationRanking;
use crate::analysis::trends::{DailyMean, MonthlyMean};
use crate::analysis::{Analysis, AnalysisOutput};
use crate::color::{diverging_color, heatmap_text_color, series_color};
use crate::data::model::NumericField;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – chart for the selected analysis
// ---------------------------------------------------------------------------

/// Render the central panel: run the selected aggregator against the current
/// view and draw its output.
pub fn analysis_panel(ui: &mut Ui, state: &AppState) {
    let Some(output) = state.run_analysis() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore air-quality data  (File → Open…)");
        });
        return;
    };

    let station = state.selected_station.as_deref().unwrap_or("-");
    let title = match state.params.analysis {
        Analysis::HighestPollution => state.params.analysis.label().to_string(),
        other => format!("{} – {}", other.label(), station),
    };
    ui.heading(title);
    ui.separator();

    match output {
        AnalysisOutput::Distribution(dist) => {
            ui.columns(2, |columns: &mut [Ui]| {
                histogram_plot(&mut columns[0], "PM2.5", dist.pm25.as_ref(), series_color(0, 2));
                histogram_plot(&mut columns[1], "PM10", dist.pm10.as_ref(), series_color(1, 2));
            });
        }
        AnalysisOutput::Correlation(matrix) => correlation_heatmap(ui, &matrix),
        AnalysisOutput::HighestPollution(ranking) => ranking_summary(ui, ranking.as_ref()),
        AnalysisOutput::Seasonal(rows) => seasonal_plot(ui, state, &rows),
        AnalysisOutput::Daily(rows) => daily_plot(ui, state, &rows),
    }
}

// ---------------------------------------------------------------------------
// Distribution histograms
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, label: &str, hist: Option<&Histogram>, color: Color32) {
    let Some(hist) = hist else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(format!("No {label} data for the current selection."));
        });
        return;
    };

    let bar_width = if hist.bin_width() > 0.0 {
        hist.bin_width() * 0.95
    } else {
        1.0
    };
    let bars: Vec<Bar> = hist
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| Bar::new(hist.bin_center(i), count as f64).width(bar_width))
        .collect();

    Plot::new(format!("distribution_{label}"))
        .legend(Legend::default())
        .x_axis_label(label)
        .y_axis_label("Count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name(label));
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Annotated heatmap drawn with the raw painter: one colored cell per field
/// pair, undefined coefficients shown as a gray dash.
fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = FIELD_COUNT as f32;
    let label_space = 52.0;
    let avail = ui.available_size();
    let cell = ((avail.x - label_space) / n)
        .min((avail.y - label_space) / n)
        .clamp(22.0, 60.0);

    let size = Vec2::new(label_space + cell * n, label_space + cell * n);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;

    let label_font = FontId::proportional((cell * 0.30).clamp(9.0, 13.0));
    let value_font = FontId::proportional((cell * 0.28).clamp(8.0, 12.0));
    let text_color = ui.visuals().text_color();

    for (i, field) in NumericField::ALL.iter().enumerate() {
        // Column headers along the top, row labels down the left.
        painter.text(
            origin + vec2(label_space + (i as f32 + 0.5) * cell, label_space * 0.5),
            Align2::CENTER_CENTER,
            field.label(),
            label_font.clone(),
            text_color,
        );
        painter.text(
            origin + vec2(label_space - 4.0, label_space + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            field.label(),
            label_font.clone(),
            text_color,
        );
    }

    for i in 0..FIELD_COUNT {
        for j in 0..FIELD_COUNT {
            let r = matrix.value(i, j);
            let rect = Rect::from_min_size(
                origin + vec2(label_space + j as f32 * cell, label_space + i as f32 * cell),
                Vec2::splat(cell),
            );
            painter.rect_filled(rect.shrink(0.5), 0.0, diverging_color(r));

            let annotation = if r.is_nan() {
                "–".to_string()
            } else {
                format!("{r:.2}")
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                annotation,
                value_font.clone(),
                heatmap_text_color(r),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Highest-pollution summary
// ---------------------------------------------------------------------------

fn ranking_summary(ui: &mut Ui, ranking: Option<&StationRanking>) {
    ui.add_space(12.0);
    match ranking {
        Some(best) => {
            ui.label(
                RichText::new(format!(
                    "The station with the highest PM2.5 pollution is {}",
                    best.station
                ))
                .size(18.0)
                .strong(),
            );
            ui.label(format!("Mean PM2.5: {:.2} µg/m³", best.mean_pm25));
        }
        None => {
            ui.label("No PM2.5 readings in the dataset.");
        }
    }
}

// ---------------------------------------------------------------------------
// Trend lines
// ---------------------------------------------------------------------------

fn seasonal_plot(ui: &mut Ui, state: &AppState, rows: &[MonthlyMean]) {
    if state.params.months.is_empty() {
        ui.label("Select at least one month to see the seasonal trend.");
        return;
    }
    if rows.is_empty() {
        ui.label("No data in the selected months for this station.");
        return;
    }

    let pm25: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.month as f64, r.pm25?]))
        .collect();
    let pm10: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.month as f64, r.pm10?]))
        .collect();

    Plot::new("seasonal_trend")
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Pollutant level")
        .show(ui, |plot_ui| {
            trend_lines(plot_ui, pm25, pm10);
        });
}

fn daily_plot(ui: &mut Ui, state: &AppState, rows: &[DailyMean]) {
    if state.params.start_date > state.params.end_date {
        ui.label("Start date is after end date; nothing to show.");
        return;
    }
    if rows.is_empty() {
        ui.label("No data in the selected date range for this station.");
        return;
    }

    let pm25: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.date.num_days_from_ce() as f64, r.pm25?]))
        .collect();
    let pm10: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.date.num_days_from_ce() as f64, r.pm10?]))
        .collect();

    Plot::new("daily_trend")
        .legend(Legend::default())
        .x_axis_label("Date")
        .y_axis_label("Pollutant level")
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            trend_lines(plot_ui, pm25, pm10);
        });
}

fn trend_lines(plot_ui: &mut egui_plot::PlotUi, pm25: Vec<[f64; 2]>, pm10: Vec<[f64; 2]>) {
    let pm25_points: PlotPoints = pm25.into();
    let pm10_points: PlotPoints = pm10.into();
    plot_ui.line(
        Line::new(pm25_points)
            .name("PM2.5")
            .color(series_color(0, 2))
            .width(1.5),
    );
    plot_ui.line(
        Line::new(pm10_points)
            .name("PM10")
            .color(series_color(1, 2))
            .width(1.5),
    );
}
