use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Mix, Srgb};

// ---------------------------------------------------------------------------
// Series colors
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
/// Used to keep the PM2.5 / PM10 series colours consistent across the
/// histogram and trend charts.
pub fn series_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue % 360.0, 0.70, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour of series `i` out of `n` (0 = PM2.5, 1 = PM10 in the charts).
pub fn series_color(i: usize, n: usize) -> Color32 {
    let palette = series_palette(n);
    palette.get(i).copied().unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// Diverging map for the correlation heatmap
// ---------------------------------------------------------------------------

/// Map a correlation coefficient in [-1, 1] onto a cool/warm diverging ramp:
/// saturated blue at -1, white at 0, saturated red at +1.  NaN (undefined
/// coefficient) renders as neutral gray.
pub fn diverging_color(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::from_gray(120);
    }
    let t = r.clamp(-1.0, 1.0) as f32;

    let white = Srgb::new(0.97f32, 0.96, 0.96).into_linear();
    let cool = Srgb::new(0.23f32, 0.30, 0.75).into_linear();
    let warm = Srgb::new(0.71f32, 0.02, 0.15).into_linear();

    let mixed = if t < 0.0 {
        white.mix(cool, -t)
    } else {
        white.mix(warm, t)
    };
    let rgb: Srgb = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Whether annotation text drawn over a heatmap cell should be light.
/// Strong coefficients get dark saturated cells.
pub fn heatmap_text_color(r: f64) -> Color32 {
    if !r.is_nan() && r.abs() > 0.55 {
        Color32::WHITE
    } else {
        Color32::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_entries() {
        let palette = series_palette(2);
        assert_eq!(palette.len(), 2);
        assert_ne!(palette[0], palette[1]);
        assert!(series_palette(0).is_empty());
    }

    #[test]
    fn diverging_endpoints_are_blue_and_red() {
        let cold = diverging_color(-1.0);
        let warm = diverging_color(1.0);
        assert!(cold.b() > cold.r());
        assert!(warm.r() > warm.b());
    }

    #[test]
    fn nan_coefficient_renders_gray() {
        let c = diverging_color(f64::NAN);
        assert_eq!(c.r(), c.g());
        assert_eq!(c.g(), c.b());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        assert_eq!(diverging_color(5.0), diverging_color(1.0));
        assert_eq!(diverging_color(-5.0), diverging_color(-1.0));
    }
}
