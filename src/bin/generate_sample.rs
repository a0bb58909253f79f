use chrono::{Datelike, Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Per-station pollution character: baseline PM2.5 and how strongly the
/// winter heating season amplifies it.
struct StationProfile {
    name: &'static str,
    base_pm25: f64,
    winter_boost: f64,
}

const STATIONS: [StationProfile; 3] = [
    StationProfile {
        name: "Aotizhongxin",
        base_pm25: 85.0,
        winter_boost: 0.75,
    },
    StationProfile {
        name: "Dongsi",
        base_pm25: 65.0,
        winter_boost: 0.60,
    },
    StationProfile {
        name: "Huairou",
        base_pm25: 40.0,
        winter_boost: 0.50,
    },
];

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "NA".to_string(),
    }
}

/// Occasionally drop a reading, the way real sensor feeds do.
fn with_gaps(rng: &mut SimpleRng, value: f64) -> Option<f64> {
    if rng.next_f64() < 0.04 {
        None
    } else {
        Some(value)
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "station", "year", "month", "day", "hour", "PM2.5", "PM10", "NO2", "SO2", "CO", "O3",
            "TEMP", "PRES", "DEWP", "WSPM",
        ])
        .expect("Failed to write header");

    let start = NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid start date");
    let days = 730;
    let hours = [0u32, 6, 12, 18];

    let mut row_count: u64 = 0;
    for station in &STATIONS {
        for day_offset in 0..days {
            let date = start + Duration::days(day_offset);
            // Phase peaking mid-January (winter smog) and mid-July (heat).
            let season = (2.0 * std::f64::consts::PI * (date.ordinal() as f64 - 15.0) / 365.25)
                .cos();

            for &hour in &hours {
                let pm25 = (station.base_pm25 * (1.0 + station.winter_boost * season)
                    + rng.gauss(0.0, 18.0))
                .max(1.0);
                let pm10 = (pm25 * 1.55 + rng.gauss(10.0, 22.0)).max(1.0);
                let no2 = (38.0 + 18.0 * season + rng.gauss(0.0, 9.0)).max(1.0);
                let so2 = (14.0 + 9.0 * season + rng.gauss(0.0, 4.0)).max(0.5);
                let co = (1100.0 + 650.0 * season + rng.gauss(0.0, 250.0)).max(100.0);
                // Ozone runs against the particulates: a summer pollutant.
                let o3 = (70.0 - 45.0 * season + rng.gauss(0.0, 14.0)).max(1.0);

                let diurnal = (2.0 * std::f64::consts::PI * (hour as f64 - 14.0) / 24.0).cos();
                let temp = 13.5 - 15.0 * season + 4.5 * diurnal + rng.gauss(0.0, 2.0);
                let pres = 1013.0 + 10.0 * season + rng.gauss(0.0, 3.0);
                let dewp = temp - 9.0 + rng.gauss(0.0, 2.5);
                let wspm = (1.8 + rng.gauss(0.0, 1.1)).max(0.0);

                writer
                    .write_record([
                        station.name.to_string(),
                        date.year().to_string(),
                        date.month().to_string(),
                        date.day().to_string(),
                        hour.to_string(),
                        fmt(with_gaps(&mut rng, pm25)),
                        fmt(with_gaps(&mut rng, pm10)),
                        fmt(with_gaps(&mut rng, no2)),
                        fmt(with_gaps(&mut rng, so2)),
                        fmt(with_gaps(&mut rng, co)),
                        fmt(with_gaps(&mut rng, o3)),
                        fmt(with_gaps(&mut rng, temp)),
                        fmt(with_gaps(&mut rng, pres)),
                        fmt(with_gaps(&mut rng, dewp)),
                        fmt(with_gaps(&mut rng, wspm)),
                    ])
                    .expect("Failed to write row");
                row_count += 1;
            }
        }
    }

    writer.flush().expect("Failed to flush output");
    println!(
        "Wrote {row_count} measurements for {} stations to {output_path}",
        STATIONS.len()
    );
}
