use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// RawRecord – one row as read from disk, before date normalization
// ---------------------------------------------------------------------------

/// A measurement row exactly as it appears in the source table: the calendar
/// fields are still separate integers and every numeric cell may be missing.
///
/// Field names follow the source column headers (`PM2.5`, `TEMP`, …); any
/// other columns in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub station: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Hour of day when the source carries hourly granularity.
    #[serde(default, deserialize_with = "de_opt_u32")]
    pub hour: Option<u32>,
    #[serde(rename = "PM2.5", deserialize_with = "de_opt_f64")]
    pub pm25: Option<f64>,
    #[serde(rename = "PM10", deserialize_with = "de_opt_f64")]
    pub pm10: Option<f64>,
    #[serde(rename = "NO2", deserialize_with = "de_opt_f64")]
    pub no2: Option<f64>,
    #[serde(rename = "SO2", deserialize_with = "de_opt_f64")]
    pub so2: Option<f64>,
    #[serde(rename = "CO", deserialize_with = "de_opt_f64")]
    pub co: Option<f64>,
    #[serde(rename = "O3", deserialize_with = "de_opt_f64")]
    pub o3: Option<f64>,
    #[serde(rename = "TEMP", deserialize_with = "de_opt_f64")]
    pub temperature: Option<f64>,
    #[serde(rename = "PRES", deserialize_with = "de_opt_f64")]
    pub pressure: Option<f64>,
    #[serde(rename = "DEWP", deserialize_with = "de_opt_f64")]
    pub dew_point: Option<f64>,
    #[serde(rename = "WSPM", deserialize_with = "de_opt_f64")]
    pub wind_speed: Option<f64>,
}

/// Accept empty cells and the `NA` / `NaN` markers used by the source data
/// as missing values rather than parse errors.
fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") | Some("NaN") | Some("nan") => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn de_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") => Ok(None),
        Some(text) => text
            .parse::<u32>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

// ---------------------------------------------------------------------------
// Measurement – one normalized row of the dataset
// ---------------------------------------------------------------------------

/// A single measurement with its calendar fields folded into one timestamp.
/// Never mutated after load; filtering hands out index views instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub station: String,
    pub timestamp: NaiveDateTime,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub so2: Option<f64>,
    pub co: Option<f64>,
    pub o3: Option<f64>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub dew_point: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl Measurement {
    /// Calendar date of the measurement.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Calendar month (1–12) of the measurement.
    pub fn month(&self) -> u32 {
        use chrono::Datelike;
        self.timestamp.month()
    }
}

// ---------------------------------------------------------------------------
// NumericField – typed access to the 10 numeric columns
// ---------------------------------------------------------------------------

/// The numeric columns of a [`Measurement`], in the canonical order used by
/// the correlation matrix: six pollutants followed by four meteorological
/// readings. Typed accessors replace lookup by column-name string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Pm25,
    Pm10,
    No2,
    So2,
    Co,
    O3,
    Temperature,
    Pressure,
    DewPoint,
    WindSpeed,
}

impl NumericField {
    pub const ALL: [NumericField; 10] = [
        NumericField::Pm25,
        NumericField::Pm10,
        NumericField::No2,
        NumericField::So2,
        NumericField::Co,
        NumericField::O3,
        NumericField::Temperature,
        NumericField::Pressure,
        NumericField::DewPoint,
        NumericField::WindSpeed,
    ];

    /// Display label, matching the source column header.
    pub fn label(&self) -> &'static str {
        match self {
            NumericField::Pm25 => "PM2.5",
            NumericField::Pm10 => "PM10",
            NumericField::No2 => "NO2",
            NumericField::So2 => "SO2",
            NumericField::Co => "CO",
            NumericField::O3 => "O3",
            NumericField::Temperature => "TEMP",
            NumericField::Pressure => "PRES",
            NumericField::DewPoint => "DEWP",
            NumericField::WindSpeed => "WSPM",
        }
    }

    /// Read this field from a measurement.
    pub fn value(&self, m: &Measurement) -> Option<f64> {
        match self {
            NumericField::Pm25 => m.pm25,
            NumericField::Pm10 => m.pm10,
            NumericField::No2 => m.no2,
            NumericField::So2 => m.so2,
            NumericField::Co => m.co,
            NumericField::O3 => m.o3,
            NumericField::Temperature => m.temperature,
            NumericField::Pressure => m.pressure,
            NumericField::DewPoint => m.dew_point,
            NumericField::WindSpeed => m.wind_speed,
        }
    }
}

// ---------------------------------------------------------------------------
// AirQualityDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full record table plus the indices the UI needs: the sorted set of
/// station names and the covered date range.
#[derive(Debug, Clone)]
pub struct AirQualityDataset {
    /// All measurements, in original file order.
    pub records: Vec<Measurement>,
    /// Sorted unique station identifiers.
    pub stations: Vec<String>,
    /// Earliest and latest calendar date present, if any records exist.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

impl AirQualityDataset {
    /// Build the station and date indices from normalized records.
    pub fn from_records(records: Vec<Measurement>) -> Self {
        let stations: Vec<String> = records
            .iter()
            .map(|m| m.station.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let date_range = records
            .iter()
            .map(|m| m.date())
            .fold(None, |range, d| match range {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            });

        AirQualityDataset {
            records,
            stations,
            date_range,
        }
    }

    /// Number of measurements.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn measurement(station: &str, y: i32, m: u32, d: u32) -> Measurement {
        Measurement {
            station: station.to_string(),
            timestamp: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            pm25: None,
            pm10: None,
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

    #[test]
    fn dataset_indexes_stations_sorted_and_unique() {
        let ds = AirQualityDataset::from_records(vec![
            measurement("Wanliu", 2016, 5, 1),
            measurement("Aotizhongxin", 2016, 5, 2),
            measurement("Wanliu", 2016, 5, 3),
        ]);
        assert_eq!(ds.stations, vec!["Aotizhongxin", "Wanliu"]);
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn dataset_tracks_date_range() {
        let ds = AirQualityDataset::from_records(vec![
            measurement("A", 2015, 3, 14),
            measurement("A", 2013, 3, 1),
            measurement("B", 2017, 2, 28),
        ]);
        assert_eq!(
            ds.date_range,
            Some((
                NaiveDate::from_ymd_opt(2013, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2017, 2, 28).unwrap()
            ))
        );
    }

    #[test]
    fn empty_dataset_has_no_range() {
        let ds = AirQualityDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.date_range.is_none());
        assert!(ds.stations.is_empty());
    }

    #[test]
    fn numeric_field_order_matches_labels() {
        let labels: Vec<&str> = NumericField::ALL.iter().map(|f| f.label()).collect();
        assert_eq!(
            labels,
            vec!["PM2.5", "PM10", "NO2", "SO2", "CO", "O3", "TEMP", "PRES", "DEWP", "WSPM"]
        );
    }
}
