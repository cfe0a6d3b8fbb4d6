//! Fill color ramp for the choropleth layer.
//!
//! Mirrors the renderer's linear interpolation so the CLI and exports can
//! show the same color a suburb gets on the map.

use crime_rate_geography_models::CrimeRate;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// `(rate, color)` stops, ascending by rate.
pub const COLOR_STOPS: &[(f64, Rgb)] = &[
    (0.0, Rgb(0xF6, 0xE7, 0xD8)),
    (4.0, Rgb(0xF6, 0x89, 0x89)),
    (6.0, Rgb(0xC6, 0x5D, 0x7B)),
    (10.0, Rgb(0x87, 0x43, 0x56)),
    (100.0, Rgb(0x00, 0x00, 0x00)),
];

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Color for `rate`, clamped to the first and last stop. Missing rates
/// get no fill.
#[must_use]
pub fn crime_rate_color(rate: CrimeRate) -> Option<Rgb> {
    let value = rate.value()?;

    let (first_rate, first_color) = COLOR_STOPS[0];
    if value <= first_rate {
        return Some(first_color);
    }

    for pair in COLOR_STOPS.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if value <= hi {
            let t = (value - lo) / (hi - lo);
            return Some(Rgb(
                lerp_channel(lo_color.0, hi_color.0, t),
                lerp_channel(lo_color.1, hi_color.1, t),
                lerp_channel(lo_color.2, hi_color.2, t),
            ));
        }
    }

    COLOR_STOPS.last().map(|(_, color)| *color)
}
