use super::model::AirQualityDataset;

// ---------------------------------------------------------------------------
// Station filter: narrow the table to one station's rows
// ---------------------------------------------------------------------------

/// Return indices of records belonging to the given station, preserving
/// original row order.
///
/// An identifier that matches no record yields an empty view rather than an
/// error; the UI only offers identifiers from `dataset.stations`, but every
/// aggregator also tolerates an empty view.
pub fn station_indices(dataset: &AirQualityDataset, station: &str) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, m)| m.station == station)
        .map(|(i, _)| i)
        .collect()
}

/// View over the whole table, used when no station is selected.
pub fn all_indices(dataset: &AirQualityDataset) -> Vec<usize> {
    (0..dataset.len()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;
    use chrono::NaiveDate;

    fn measurement(station: &str, day: u32) -> Measurement {
        Measurement {
            station: station.to_string(),
            timestamp: NaiveDate::from_ymd_opt(2016, 1, day)
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

    fn sample() -> AirQualityDataset {
        AirQualityDataset::from_records(vec![
            measurement("Gucheng", 1),
            measurement("Shunyi", 2),
            measurement("Gucheng", 3),
            measurement("Shunyi", 4),
        ])
    }

    #[test]
    fn keeps_original_row_order() {
        let ds = sample();
        assert_eq!(station_indices(&ds, "Gucheng"), vec![0, 2]);
        assert_eq!(station_indices(&ds, "Shunyi"), vec![1, 3]);
    }

    #[test]
    fn unknown_station_yields_empty_view() {
        let ds = sample();
        assert!(station_indices(&ds, "Tiantan").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let ds = sample();
        let once = station_indices(&ds, "Gucheng");
        // Re-filter the already-filtered subset by the same station.
        let twice: Vec<usize> = once
            .iter()
            .copied()
            .filter(|&i| ds.records[i].station == "Gucheng")
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn all_indices_covers_every_row() {
        let ds = sample();
        assert_eq!(all_indices(&ds), vec![0, 1, 2, 3]);
    }
}
