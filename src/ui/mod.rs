/// UI layer: widget panels and chart rendering.
///
/// `panels` collects parameters (station, analysis, bins, months, date
/// range) into [`crate::state::AppState`]; `plot` renders the output of the
/// selected aggregator.  The core never touches egui types outside this
/// module and `app.rs`.

pub mod panels;
pub mod plot;
