use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use super::model::{Measurement, RawRecord};

// ---------------------------------------------------------------------------
// Date normalization: year/month/day (+hour) → one timestamp
// ---------------------------------------------------------------------------

/// A row whose calendar fields do not form a valid point in time.
///
/// Raised at load time so bad rows surface to the operator instead of being
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDateError {
    #[error("row {row}: {year:04}-{month:02}-{day:02} is not a valid calendar date")]
    Date {
        row: usize,
        year: i32,
        month: u32,
        day: u32,
    },
    #[error("row {row}: hour {hour} is out of range (expected 0-23)")]
    Hour { row: usize, hour: u32 },
}

/// Combine a raw row's calendar fields into a timestamp. `row` is the
/// zero-based position in the source file, used for error reporting only.
pub fn timestamp_of(row: usize, raw: &RawRecord) -> Result<NaiveDateTime, InvalidDateError> {
    let date = NaiveDate::from_ymd_opt(raw.year, raw.month, raw.day).ok_or(
        InvalidDateError::Date {
            row,
            year: raw.year,
            month: raw.month,
            day: raw.day,
        },
    )?;
    let hour = raw.hour.unwrap_or(0);
    date.and_hms_opt(hour, 0, 0)
        .ok_or(InvalidDateError::Hour { row, hour })
}

/// Fold every raw row's year/month/day (and hour, when present) into a
/// [`Measurement`] timestamp. Fails on the first invalid row.
pub fn normalize(rows: Vec<RawRecord>) -> Result<Vec<Measurement>, InvalidDateError> {
    rows.into_iter()
        .enumerate()
        .map(|(row, raw)| {
            let timestamp = timestamp_of(row, &raw)?;
            Ok(Measurement {
                station: raw.station,
                timestamp,
                pm25: raw.pm25,
                pm10: raw.pm10,
                no2: raw.no2,
                so2: raw.so2,
                co: raw.co,
                o3: raw.o3,
                temperature: raw.temperature,
                pressure: raw.pressure,
                dew_point: raw.dew_point,
                wind_speed: raw.wind_speed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn raw(year: i32, month: u32, day: u32, hour: Option<u32>) -> RawRecord {
        RawRecord {
            station: "Dongsi".to_string(),
            year,
            month,
            day,
            hour,
            pm25: Some(12.0),
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
    fn valid_triples_round_trip() {
        for (y, m, d) in [(2013, 3, 1), (2016, 2, 29), (2017, 12, 31)] {
            let ts = timestamp_of(0, &raw(y, m, d, None)).unwrap();
            assert_eq!((ts.year(), ts.month(), ts.day()), (y, m, d));
            assert_eq!(ts.hour(), 0);
        }
    }

    #[test]
    fn hour_is_folded_into_timestamp() {
        let ts = timestamp_of(0, &raw(2015, 6, 15, Some(23))).unwrap();
        assert_eq!(ts.hour(), 23);
    }

    #[test]
    fn month_thirteen_is_rejected() {
        let err = timestamp_of(7, &raw(2015, 13, 1, None)).unwrap_err();
        assert_eq!(
            err,
            InvalidDateError::Date {
                row: 7,
                year: 2015,
                month: 13,
                day: 1
            }
        );
    }

    #[test]
    fn february_31st_is_rejected() {
        assert!(timestamp_of(0, &raw(2015, 2, 31, None)).is_err());
        // 2015 is not a leap year
        assert!(timestamp_of(0, &raw(2015, 2, 29, None)).is_err());
    }

    #[test]
    fn hour_24_is_rejected() {
        let err = timestamp_of(3, &raw(2015, 6, 1, Some(24))).unwrap_err();
        assert_eq!(err, InvalidDateError::Hour { row: 3, hour: 24 });
    }

    #[test]
    fn normalize_reports_the_offending_row() {
        let rows = vec![raw(2015, 1, 1, None), raw(2015, 2, 30, None)];
        let err = normalize(rows).unwrap_err();
        assert!(matches!(err, InvalidDateError::Date { row: 1, .. }));
    }

    #[test]
    fn normalize_preserves_values_and_order() {
        let rows = vec![raw(2015, 1, 2, Some(6)), raw(2015, 1, 1, None)];
        let records = normalize(rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pm25, Some(12.0));
        // Input order is preserved even when timestamps are not sorted.
        assert!(records[0].timestamp > records[1].timestamp);
    }
}
