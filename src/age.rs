use crate::timescale::GeoTimeTable;
use log::debug;

pub const AGE_UNKNOWN: &str = "Geologic age unknown";

/// Describes when a find lived.
///
/// The midpoint of the age range is placed inside a period and its era from
/// `table`; when that fails the raw interval name is used instead. The
/// approximate age is appended in thousands of years for finds younger than
/// one million years, and in millions otherwise.
pub fn resolve_age(
    interval_name: Option<&str>,
    max_ma: Option<f64>,
    min_ma: Option<f64>,
    table: &GeoTimeTable,
) -> String {
    let Some(interval_name) = interval_name else {
        return AGE_UNKNOWN.to_string();
    };
    let Some(max_ma) = max_ma else {
        return interval_name.to_string();
    };

    let midpoint = midpoint_age(max_ma, min_ma);
    let prefix = match table.period_and_era(midpoint) {
        Some((period, era)) => format!(
            "{} {}, {} {}",
            period.name,
            period.division_word(),
            era.name,
            era.division_word()
        ),
        None => {
            debug!(
                "No period and era contain {} Ma, keeping '{}'",
                midpoint, interval_name
            );
            interval_name.to_string()
        }
    };

    format!("{prefix}{}", age_suffix(max_ma, min_ma))
}

pub fn midpoint_age(max_ma: f64, min_ma: Option<f64>) -> f64 {
    match min_ma {
        Some(min_ma) => (max_ma + min_ma) / 2.0,
        None => max_ma,
    }
}

/// The units are chosen from the older bound, not from the midpoint. With
/// both bounds the midpoint is rounded to two places; a lone max age is
/// printed as recorded.
fn age_suffix(max_ma: f64, min_ma: Option<f64>) -> String {
    let (value, units) = if max_ma < 1.0 {
        (midpoint_age(max_ma, min_ma) * 1000.0, "thousand")
    } else {
        (midpoint_age(max_ma, min_ma), "million")
    };
    let shown = match min_ma {
        Some(_) => round_to_hundredths(value),
        None if max_ma < 1.0 => strip_scaling_noise(value),
        None => value,
    };
    format!(" (approx. {shown:?} {units} years ago)")
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Undoes binary noise from scaling Ma to ka (0.0117 * 1000 is
/// 11.700000000000001), keeping every digit the feed actually gave.
fn strip_scaling_noise(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}
