//! Canonical in-memory model the renderer consumes.
//!
//! Assembled fresh by the normalizer on every refresh cycle and
//! discarded afterwards; the renderer keeps no state between frames.
//! Missing data is carried as `None` so every field renders as a
//! neutral placeholder instead of panicking downstream.

/// Snapshot of the conditions right now.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurrentConditions {
    /// Apparent temperature, already rounded to whole °F.
    pub feels_like_f: Option<i32>,
    /// Relative humidity in percent.
    pub humidity: Option<i32>,
    /// Raw UV index; rounding happens at the presentation boundary.
    pub uv_index: Option<f32>,
    /// Provider condition code (800 = clear, 2xx = thunderstorm, ...).
    pub condition: Option<u32>,
    /// True when the observation falls between sunrise and sunset.
    pub is_daytime: bool,
}

impl CurrentConditions {
    /// Explicit all-unknown snapshot for a failed or malformed fetch.
    pub fn unknown() -> Self {
        Self::default()
    }
}

/// One fixed-position entry of the hourly strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HourlySlot {
    /// Wall-clock hour label, 1..=12, no AM/PM marker.
    pub hour: Option<u32>,
    pub feels_like_f: Option<i32>,
    pub condition: Option<u32>,
}

/// One fixed-position entry of the daily strip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailySlot {
    /// Three-letter weekday abbreviation out of the Mon-first set.
    pub weekday: Option<&'static str>,
    pub max_f: Option<i32>,
    pub min_f: Option<i32>,
    pub condition: Option<u32>,
}

/// Severity taxonomy of the pollen bulletin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollenLevel {
    Low,
    Medium,
    Heavy,
    ExtremelyHeavy,
    #[default]
    Unknown,
}

impl PollenLevel {
    /// Case-insensitive parse; anything unrecognized is `Unknown`.
    pub fn parse(text: &str) -> Self {
        match text.to_ascii_lowercase().as_str() {
            "low" => PollenLevel::Low,
            "medium" => PollenLevel::Medium,
            "heavy" => PollenLevel::Heavy,
            "extremely heavy" => PollenLevel::ExtremelyHeavy,
            _ => PollenLevel::Unknown,
        }
    }
}

/// Severity per allergen category reported by the bulletin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollenLevels {
    pub tree: PollenLevel,
    pub weed: PollenLevel,
    pub grass: PollenLevel,
    pub mold: PollenLevel,
}

/// One pollutant reading; all fields absent renders as neutral.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AqReading {
    pub aqi: Option<i32>,
    pub category: Option<String>,
    /// Category bucket, 1 (good) .. 5+ (hazardous).
    pub code: Option<i32>,
}

/// Ozone and particulate readings for today and tomorrow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AirQuality {
    pub ozone: AqReading,
    pub particulate: AqReading,
    pub ozone_forecast: AqReading,
    pub particulate_forecast: AqReading,
}

/// Everything one frame needs. `pollen`/`air` are `None` when the
/// source hard-failed, which the renderer shows as a region marker.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderModel {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySlot>,
    pub daily: Vec<DailySlot>,
    pub pollen: Option<PollenLevels>,
    pub air: Option<AirQuality>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pollen_parse_is_case_insensitive() {
        assert_eq!(PollenLevel::parse("LOW"), PollenLevel::Low);
        assert_eq!(PollenLevel::parse("Medium"), PollenLevel::Medium);
        assert_eq!(PollenLevel::parse("heavy"), PollenLevel::Heavy);
        assert_eq!(
            PollenLevel::parse("Extremely Heavy"),
            PollenLevel::ExtremelyHeavy
        );
        assert_eq!(PollenLevel::parse(""), PollenLevel::Unknown);
        assert_eq!(PollenLevel::parse("severe"), PollenLevel::Unknown);
    }
}
