use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::dates;
use super::model::{AirQualityDataset, RawRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an air-quality measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with a header row (primary format)
/// * `.json`    – `[{ "station": "...", "year": 2016, ..., "PM2.5": 12.0 }, ...]`
/// * `.parquet` – scalar columns with the same names as the CSV headers
///
/// All paths end with date normalization, so a row whose year/month/day does
/// not form a valid calendar date fails the whole load.
pub fn load_file(path: &Path) -> Result<AirQualityDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            read_json(&text)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let records = dates::normalize(rows).context("normalizing dates")?;
    Ok(AirQualityDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV rows into [`RawRecord`]s.  The header row must carry at least
/// `station`, `year`, `month`, `day` and the ten numeric columns (`PM2.5`,
/// `PM10`, `NO2`, `SO2`, `CO`, `O3`, `TEMP`, `PRES`, `DEWP`, `WSPM`); an
/// `hour` column is used when present and any other columns are ignored.
/// Empty and `NA` cells become missing values.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_reader(input);
    let mut rows = Vec::new();

    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "station": "Aotizhongxin",
///     "year": 2016, "month": 3, "day": 1, "hour": 6,
///     "PM2.5": 12.0, "PM10": 30.5, ..., "WSPM": 1.7
///   },
///   ...
/// ]
/// ```
///
/// Numeric fields may be `null` or absent; both mean missing.
pub fn read_json(text: &str) -> Result<Vec<RawRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let station = obj
            .get("station")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing or invalid 'station'"))?
            .to_string();

        let hour = match obj.get("hour") {
            None | Some(JsonValue::Null) => None,
            Some(v) => Some(
                v.as_u64()
                    .with_context(|| format!("Row {i}: 'hour' is not an integer"))?
                    as u32,
            ),
        };

        rows.push(RawRecord {
            station,
            year: json_int(obj, "year", i)? as i32,
            month: json_int(obj, "month", i)? as u32,
            day: json_int(obj, "day", i)? as u32,
            hour,
            pm25: json_opt_f64(obj, "PM2.5"),
            pm10: json_opt_f64(obj, "PM10"),
            no2: json_opt_f64(obj, "NO2"),
            so2: json_opt_f64(obj, "SO2"),
            co: json_opt_f64(obj, "CO"),
            o3: json_opt_f64(obj, "O3"),
            temperature: json_opt_f64(obj, "TEMP"),
            pressure: json_opt_f64(obj, "PRES"),
            dew_point: json_opt_f64(obj, "DEWP"),
            wind_speed: json_opt_f64(obj, "WSPM"),
        });
    }

    Ok(rows)
}

fn json_int(obj: &serde_json::Map<String, JsonValue>, key: &str, row: usize) -> Result<i64> {
    obj.get(key)
        .and_then(|v| v.as_i64())
        .with_context(|| format!("Row {row}: missing or invalid '{key}'"))
}

fn json_opt_f64(obj: &serde_json::Map<String, JsonValue>, key: &str) -> Option<f64> {
    obj.get(key).and_then(|v| v.as_f64())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet measurement table.  Columns are scalar (one value per row)
/// and named like the CSV headers; nulls become missing values.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let station_col = required_column(&batch, "station")?;
        let year_col = required_column(&batch, "year")?;
        let month_col = required_column(&batch, "month")?;
        let day_col = required_column(&batch, "day")?;
        let hour_col = batch.column_by_name("hour");

        let pm25_col = required_column(&batch, "PM2.5")?;
        let pm10_col = required_column(&batch, "PM10")?;
        let no2_col = required_column(&batch, "NO2")?;
        let so2_col = required_column(&batch, "SO2")?;
        let co_col = required_column(&batch, "CO")?;
        let o3_col = required_column(&batch, "O3")?;
        let temp_col = required_column(&batch, "TEMP")?;
        let pres_col = required_column(&batch, "PRES")?;
        let dewp_col = required_column(&batch, "DEWP")?;
        let wspm_col = required_column(&batch, "WSPM")?;

        for row in 0..batch.num_rows() {
            rows.push(RawRecord {
                station: extract_string(station_col, row)
                    .with_context(|| format!("Row {row}: invalid 'station'"))?,
                year: extract_int(year_col, row)
                    .with_context(|| format!("Row {row}: invalid 'year'"))?
                    as i32,
                month: extract_int(month_col, row)
                    .with_context(|| format!("Row {row}: invalid 'month'"))?
                    as u32,
                day: extract_int(day_col, row)
                    .with_context(|| format!("Row {row}: invalid 'day'"))?
                    as u32,
                hour: hour_col
                    .and_then(|col| extract_int(col, row).ok())
                    .map(|h| h as u32),
                pm25: extract_opt_f64(pm25_col, row),
                pm10: extract_opt_f64(pm10_col, row),
                no2: extract_opt_f64(no2_col, row),
                so2: extract_opt_f64(so2_col, row),
                co: extract_opt_f64(co_col, row),
                o3: extract_opt_f64(o3_col, row),
                temperature: extract_opt_f64(temp_col, row),
                pressure: extract_opt_f64(pres_col, row),
                dew_point: extract_opt_f64(dewp_col, row),
                wind_speed: extract_opt_f64(wspm_col, row),
            });
        }
    }

    Ok(rows)
}

fn required_column<'a>(
    batch: &'a arrow::record_batch::RecordBatch,
    name: &str,
) -> Result<&'a Arc<dyn Array>> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

// -- Parquet / Arrow helpers --

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(arr.value(row).to_string())
        }
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

fn extract_int(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            Ok(arr.value(row))
        }
        other => bail!("Expected integer column, got {other:?}"),
    }
}

/// Read a numeric cell as `f64`; nulls and unsupported types become missing.
fn extract_opt_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_SAMPLE: &str = "\
station,year,month,day,hour,PM2.5,PM10,NO2,SO2,CO,O3,TEMP,PRES,DEWP,WSPM,wd
Aotizhongxin,2016,3,1,0,12.0,30.5,20.0,4.0,300.0,77.0,0.1,1025.1,-18.8,4.4,NNW
Aotizhongxin,2016,3,1,6,NA,42.0,25.0,5.0,350.0,60.0,2.5,1024.0,-17.0,2.1,N
Dongsi,2016,3,1,0,88.0,,30.0,8.0,900.0,12.0,1.0,1026.0,-15.0,0.8,NE
";

    #[test]
    fn csv_rows_parse_with_na_as_missing() {
        let rows = read_csv(CSV_SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].station, "Aotizhongxin");
        assert_eq!((rows[0].year, rows[0].month, rows[0].day), (2016, 3, 1));
        assert_eq!(rows[0].hour, Some(0));
        assert_eq!(rows[0].pm25, Some(12.0));

        // "NA" and empty cells are missing, not errors.
        assert_eq!(rows[1].pm25, None);
        assert_eq!(rows[2].pm10, None);
        assert_eq!(rows[2].wind_speed, Some(0.8));
    }

    #[test]
    fn csv_without_hour_column_defaults_to_midnight() {
        let csv = "\
station,year,month,day,PM2.5,PM10,NO2,SO2,CO,O3,TEMP,PRES,DEWP,WSPM
Wanliu,2014,7,20,9.0,18.0,10.0,2.0,200.0,90.0,28.0,1002.0,18.0,1.2
";
        let rows = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].hour, None);
    }

    #[test]
    fn csv_bad_number_is_an_error() {
        let csv = "\
station,year,month,day,PM2.5,PM10,NO2,SO2,CO,O3,TEMP,PRES,DEWP,WSPM
Wanliu,2014,7,20,garbage,18.0,10.0,2.0,200.0,90.0,28.0,1002.0,18.0,1.2
";
        assert!(read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn json_records_parse_with_null_as_missing() {
        let json = r#"[
            {"station": "Dongsi", "year": 2016, "month": 3, "day": 1, "hour": 6,
             "PM2.5": 12.0, "PM10": null, "NO2": 20.0, "SO2": 4.0, "CO": 300.0,
             "O3": 77.0, "TEMP": 0.1, "PRES": 1025.1, "DEWP": -18.8, "WSPM": 4.4},
            {"station": "Dongsi", "year": 2016, "month": 3, "day": 2,
             "PM2.5": 20.0}
        ]"#;
        let rows = read_json(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pm10, None);
        assert_eq!(rows[0].hour, Some(6));
        // Absent fields mean missing as well.
        assert_eq!(rows[1].hour, None);
        assert_eq!(rows[1].wind_speed, None);
    }

    #[test]
    fn json_missing_station_is_an_error() {
        let json = r#"[{"year": 2016, "month": 3, "day": 1}]"#;
        assert!(read_json(json).is_err());
    }
}
