//! Unit and clock conversions shared by the providers.

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use uom::si::f64::ThermodynamicTemperature;
use uom::si::thermodynamic_temperature::{degree_fahrenheit, kelvin};

const WEEKDAYS: [&str; 7] = ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"];

/// Kelvin to whole degrees Fahrenheit, rounded.
pub fn kelvin_to_f(temp_k: f64) -> i32 {
    ThermodynamicTemperature::new::<kelvin>(temp_k)
        .get::<degree_fahrenheit>()
        .round() as i32
}

/// Epoch seconds to local wall time for the configured offset.
pub fn localize(epoch: i64, utc_offset: i32) -> Option<DateTime<FixedOffset>> {
    let tz = FixedOffset::east_opt(utc_offset)?;
    Some(DateTime::from_timestamp(epoch, 0)?.with_timezone(&tz))
}

/// 24-hour clock to a 12-hour label: 0 becomes 12, 13 becomes 1.
pub fn clock_hour_12(hour: u32) -> u32 {
    match hour % 24 {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    }
}

/// Three-letter weekday tag, Monday first.
pub fn weekday3(t: &DateTime<FixedOffset>) -> &'static str {
    WEEKDAYS[t.weekday().num_days_from_monday() as usize]
}
