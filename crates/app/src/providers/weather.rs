//! OpenWeatherMap One Call provider.
//!
//! Normalization is total: any payload, including garbage, maps to a
//! report with the configured number of hourly and daily slots. Slots
//! backed by missing fields carry `None` values and render as unknown.

use serde::Deserialize;

use display::model::{CurrentConditions, DailySlot, HourlySlot};

use crate::config::Config;
use crate::providers::{http_client, ProviderError};
use crate::units;

const BASE_URL: &str = "https://api.openweathermap.org/data/3.0/onecall";

#[derive(Deserialize, Debug, Default)]
pub struct OneCall {
    #[serde(default)]
    pub current: Current,
    #[serde(default)]
    pub hourly: Vec<Hourly>,
    #[serde(default)]
    pub daily: Vec<Daily>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Current {
    pub dt: Option<i64>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub uvi: Option<f64>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Condition {
    pub id: Option<u32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Hourly {
    pub dt: Option<i64>,
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Daily {
    pub dt: Option<i64>,
    #[serde(default)]
    pub temp: Temp,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Temp {
    pub max: Option<f64>,
    pub min: Option<f64>,
}

#[derive(Debug, Default)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlySlot>,
    pub daily: Vec<DailySlot>,
}

pub fn fetch(cfg: &Config) -> Result<String, ProviderError> {
    let url = format!(
        "{BASE_URL}?lat={}&lon={}&appid={}",
        cfg.lat, cfg.lon, cfg.owm_key
    );
    Ok(http_client()?
        .get(url)
        .send()?
        .error_for_status()?
        .text()?)
}

pub fn normalize(body: &str, cfg: &Config) -> WeatherReport {
    let payload: OneCall = match serde_json::from_str(body) {
        Ok(payload) => payload,
        Err(err) => {
            log::warn!("weather payload unreadable: {err}");
            return WeatherReport {
                current: CurrentConditions::unknown(),
                hourly: vec![HourlySlot::default(); cfg.hourly_slots],
                daily: vec![DailySlot::default(); cfg.daily_slots],
            };
        }
    };

    let mut report = WeatherReport {
        current: normalize_current(&payload.current),
        hourly: payload
            .hourly
            .iter()
            .take(cfg.hourly_slots)
            .map(|h| normalize_hourly(h, cfg.utc_offset))
            .collect(),
        daily: payload
            .daily
            .iter()
            .take(cfg.daily_slots)
            .map(|d| normalize_daily(d, cfg.utc_offset))
            .collect(),
    };
    report.hourly.resize_with(cfg.hourly_slots, Default::default);
    report.daily.resize_with(cfg.daily_slots, Default::default);
    report
}

fn normalize_current(current: &Current) -> CurrentConditions {
    // Without solar data the observation is treated as nighttime,
    // same as an all-unknown snapshot.
    let is_daytime = match (current.sunrise, current.dt, current.sunset) {
        (Some(sunrise), Some(dt), Some(sunset)) => sunrise < dt && dt < sunset,
        _ => false,
    };
    CurrentConditions {
        feels_like_f: current.feels_like.map(units::kelvin_to_f),
        humidity: current.humidity.map(|h| h.round() as i32),
        uv_index: current.uvi.map(|v| v as f32),
        condition: condition_id(&current.weather),
        is_daytime,
    }
}

fn normalize_hourly(hourly: &Hourly, utc_offset: i32) -> HourlySlot {
    HourlySlot {
        hour: hourly
            .dt
            .and_then(|dt| units::localize(dt, utc_offset))
            .map(|t| units::clock_hour_12(chrono::Timelike::hour(&t))),
        feels_like_f: hourly.feels_like.map(units::kelvin_to_f),
        condition: condition_id(&hourly.weather),
    }
}

fn normalize_daily(daily: &Daily, utc_offset: i32) -> DailySlot {
    DailySlot {
        weekday: daily
            .dt
            .and_then(|dt| units::localize(dt, utc_offset))
            .map(|t| units::weekday3(&t)),
        max_f: daily.temp.max.map(units::kelvin_to_f),
        min_f: daily.temp.min.map(units::kelvin_to_f),
        condition: condition_id(&daily.weather),
    }
}

fn condition_id(weather: &[Condition]) -> Option<u32> {
    weather.first().and_then(|c| c.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    fn test_config() -> Config {
        Config {
            owm_key: "owm".to_string(),
            airnow_key: "airnow".to_string(),
            lat: "29.8068".to_string(),
            lon: "-95.4181".to_string(),
            zip: "77008".to_string(),
            utc_offset: -18000,
            canvas: Size::new(800, 480),
            hourly_slots: 8,
            daily_slots: 5,
            out: None,
            once: true,
        }
    }

    #[test]
    fn garbage_payload_yields_full_length_unknown_report() {
        let report = normalize("not json at all", &test_config());
        assert_eq!(report.hourly.len(), 8);
        assert_eq!(report.daily.len(), 5);
        assert_eq!(report.current, CurrentConditions::unknown());
        assert!(!report.current.is_daytime);
        assert!(report.hourly.iter().all(|h| h.hour.is_none()));
        assert!(report.daily.iter().all(|d| d.weekday.is_none()));
    }

    #[test]
    fn valid_payload_converts_units_and_clock() {
        // 307.59 K feels-like at 18:00 UTC (13:00 local), clear sky.
        let body = r#"{
            "current": {
                "dt": 1755885600, "sunrise": 1755864000, "sunset": 1755910800,
                "feels_like": 307.59, "humidity": 61.0, "uvi": 7.8,
                "weather": [{"id": 800}]
            },
            "hourly": [
                {"dt": 1755889200, "feels_like": 305.15, "weather": [{"id": 801}]}
            ],
            "daily": [
                {"dt": 1755885600, "temp": {"max": 310.15, "min": 299.15},
                 "weather": [{"id": 500}]}
            ]
        }"#;
        let report = normalize(body, &test_config());

        assert_eq!(report.current.feels_like_f, Some(94));
        assert_eq!(report.current.humidity, Some(61));
        assert_eq!(report.current.condition, Some(800));
        assert!(report.current.is_daytime);

        // 19:00 UTC localizes to 2 PM.
        assert_eq!(report.hourly[0].hour, Some(2));
        assert_eq!(report.hourly[0].feels_like_f, Some(90));
        // Padding keeps the slot count fixed.
        assert_eq!(report.hourly.len(), 8);
        assert_eq!(report.hourly[1].hour, None);

        assert_eq!(report.daily[0].weekday, Some("FRI"));
        assert_eq!(report.daily[0].max_f, Some(99));
        assert_eq!(report.daily[0].min_f, Some(79));
    }

    #[test]
    fn nighttime_when_outside_solar_window() {
        let body = r#"{
            "current": {
                "dt": 1755950400, "sunrise": 1755864000, "sunset": 1755910800,
                "weather": [{"id": 800}]
            }
        }"#;
        let report = normalize(body, &test_config());
        assert!(!report.current.is_daytime);
    }

    #[test]
    fn missing_solar_data_is_treated_as_nighttime() {
        let body = r#"{"current": {"weather": [{"id": 800}]}}"#;
        let report = normalize(body, &test_config());
        assert_eq!(report.current.condition, Some(800));
        assert!(!report.current.is_daytime);
    }
}
