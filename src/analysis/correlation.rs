use crate::data::model::{AirQualityDataset, NumericField};

// ---------------------------------------------------------------------------
// Pairwise Pearson correlation over the 10 numeric fields
// ---------------------------------------------------------------------------

pub const FIELD_COUNT: usize = NumericField::ALL.len();

/// Symmetric matrix of pairwise Pearson coefficients over
/// [`NumericField::ALL`].  Cells with fewer than two pairwise-complete
/// observations, or zero variance, hold NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    coefficients: [[f64; FIELD_COUNT]; FIELD_COUNT],
}

impl CorrelationMatrix {
    /// Coefficient for the field pair at canonical positions (`i`, `j`).
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.coefficients[i][j]
    }
}

/// Pearson coefficient of paired samples.  Returns NaN when fewer than two
/// pairs exist or either side has zero variance.
fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let n_f = n as f64;

    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n_f;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}

/// Compute the full matrix over the view using pairwise-complete
/// observations: each pair of fields uses exactly the rows where both are
/// present.  The diagonal is 1 whenever the field has at least two
/// observations.
pub fn correlation_matrix(dataset: &AirQualityDataset, view: &[usize]) -> CorrelationMatrix {
    let mut coefficients = [[f64::NAN; FIELD_COUNT]; FIELD_COUNT];

    for (i, fi) in NumericField::ALL.iter().enumerate() {
        let observed = view
            .iter()
            .filter(|&&row| fi.value(&dataset.records[row]).is_some())
            .count();
        coefficients[i][i] = if observed >= 2 { 1.0 } else { f64::NAN };

        for (j, fj) in NumericField::ALL.iter().enumerate().skip(i + 1) {
            let pairs: Vec<(f64, f64)> = view
                .iter()
                .filter_map(|&row| {
                    let m = &dataset.records[row];
                    Some((fi.value(m)?, fj.value(m)?))
                })
                .collect();
            let r = pearson(&pairs);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
        }
    }

    CorrelationMatrix { coefficients }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Measurement;
    use chrono::NaiveDate;

    fn measurement(pm25: Option<f64>, pm10: Option<f64>, temp: Option<f64>) -> Measurement {
        Measurement {
            station: "Changping".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2016, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            pm25,
            pm10,
            no2: None,
            so2: None,
            co: None,
            o3: None,
            temperature: temp,
            pressure: None,
            dew_point: None,
            wind_speed: None,
        }
    }

    const PM25: usize = 0;
    const PM10: usize = 1;
    const TEMP: usize = 6;

    fn full_view(ds: &AirQualityDataset) -> Vec<usize> {
        (0..ds.len()).collect()
    }

    #[test]
    fn perfectly_linear_pairs_hit_plus_minus_one() {
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(1.0), Some(2.0), Some(9.0)),
            measurement(Some(2.0), Some(4.0), Some(7.0)),
            measurement(Some(3.0), Some(6.0), Some(5.0)),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));

        assert!((m.value(PM25, PM10) - 1.0).abs() < 1e-12);
        assert!((m.value(PM25, TEMP) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(1.0), Some(5.0), Some(3.0)),
            measurement(Some(4.0), Some(2.0), Some(8.0)),
            measurement(Some(2.0), Some(9.0), Some(1.0)),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));

        for idx in [PM25, PM10, TEMP] {
            assert_eq!(m.value(idx, idx), 1.0);
        }
        for i in 0..FIELD_COUNT {
            for j in 0..FIELD_COUNT {
                let a = m.value(i, j);
                let b = m.value(j, i);
                assert!(a.is_nan() == b.is_nan());
                if !a.is_nan() {
                    assert_eq!(a, b);
                }
            }
        }
    }

    #[test]
    fn all_missing_fields_propagate_nan() {
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(1.0), None, None),
            measurement(Some(2.0), None, None),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));

        assert_eq!(m.value(PM25, PM25), 1.0);
        assert!(m.value(PM10, PM10).is_nan());
        assert!(m.value(PM25, PM10).is_nan());
    }

    #[test]
    fn fewer_than_two_complete_pairs_is_undefined() {
        // PM2.5 and PM10 are never present on the same row.
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(1.0), None, Some(2.0)),
            measurement(None, Some(3.0), Some(4.0)),
            measurement(Some(5.0), None, Some(6.0)),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));

        assert!(m.value(PM25, PM10).is_nan());
        // PM2.5 still pairs with temperature on two rows, PM10 on only one.
        assert!(!m.value(PM25, TEMP).is_nan());
        assert!(m.value(PM10, TEMP).is_nan());
    }

    #[test]
    fn pairwise_complete_rows_only() {
        // The (1.0, 100.0) PM10 outlier row is missing PM2.5, so it must not
        // influence the PM2.5/PM10 coefficient.
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(1.0), Some(2.0), None),
            measurement(Some(2.0), Some(4.0), None),
            measurement(Some(3.0), Some(6.0), None),
            measurement(None, Some(100.0), None),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));
        assert!((m.value(PM25, PM10) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_series_has_no_defined_correlation() {
        let ds = AirQualityDataset::from_records(vec![
            measurement(Some(5.0), Some(1.0), None),
            measurement(Some(5.0), Some(2.0), None),
            measurement(Some(5.0), Some(3.0), None),
        ]);
        let m = correlation_matrix(&ds, &full_view(&ds));
        assert!(m.value(PM25, PM10).is_nan());
    }

    #[test]
    fn empty_view_is_all_nan() {
        let ds = AirQualityDataset::from_records(vec![measurement(Some(1.0), Some(2.0), None)]);
        let m = correlation_matrix(&ds, &[]);
        for i in 0..FIELD_COUNT {
            for j in 0..FIELD_COUNT {
                assert!(m.value(i, j).is_nan());
            }
        }
    }
}
