//! AirNow observation and forecast provider.
//!
//! The service 404s for unknown ZIP codes and 504s under load; both
//! are routine and map to "no reading" rather than an error.

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use display::model::{AirQuality, AqReading};

use crate::config::Config;
use crate::providers::{http_client, ProviderError};

const BASE_URL: &str = "http://www.airnowapi.org/aq";

#[derive(Deserialize, Debug)]
pub struct Observation {
    #[serde(rename = "ParameterName")]
    parameter: String,
    #[serde(rename = "AQI")]
    aqi: Option<i32>,
    #[serde(rename = "Category", default)]
    category: Category,
    #[serde(rename = "DateForecast", default)]
    date_forecast: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Category {
    #[serde(rename = "Number")]
    number: Option<i32>,
    #[serde(rename = "Name")]
    name: Option<String>,
}

pub fn fetch_current(cfg: &Config) -> Result<Option<String>, ProviderError> {
    fetch(&format!(
        "{BASE_URL}/observation/zipCode/current/?format=JSON&zipCode={}&api_key={}",
        cfg.zip, cfg.airnow_key
    ))
}

pub fn fetch_forecast(cfg: &Config) -> Result<Option<String>, ProviderError> {
    fetch(&format!(
        "{BASE_URL}/forecast/zipCode/?format=JSON&zipCode={}&api_key={}",
        cfg.zip, cfg.airnow_key
    ))
}

fn fetch(url: &str) -> Result<Option<String>, ProviderError> {
    let response = http_client()?.get(url).send()?;
    match response.status().as_u16() {
        404 | 504 => {
            log::warn!("airnow returned {}, treating as no data", response.status());
            Ok(None)
        }
        _ => Ok(Some(response.error_for_status()?.text()?)),
    }
}

/// Current observations: ozone and PM2.5 readings by parameter name.
pub fn parse_current(body: &str) -> Result<(AqReading, AqReading), ProviderError> {
    let observations: Vec<Observation> = serde_json::from_str(body)?;
    Ok((
        pick(&observations, "O3", None),
        pick(&observations, "PM2.5", None),
    ))
}

/// Forecast rows carry one entry per parameter per date; only
/// tomorrow's rows are relevant.
pub fn parse_forecast(
    body: &str,
    today: NaiveDate,
) -> Result<(AqReading, AqReading), ProviderError> {
    let observations: Vec<Observation> = serde_json::from_str(body)?;
    let tomorrow = today
        .checked_add_days(Days::new(1))
        .map(|d| d.format("%Y-%m-%d").to_string());
    Ok((
        pick(&observations, "O3", tomorrow.as_deref()),
        pick(&observations, "PM2.5", tomorrow.as_deref()),
    ))
}

fn pick(observations: &[Observation], parameter: &str, date: Option<&str>) -> AqReading {
    observations
        .iter()
        .find(|o| {
            o.parameter == parameter
                && match date {
                    Some(date) => o.date_forecast.as_deref().map(str::trim) == Some(date),
                    None => true,
                }
        })
        .map(|o| AqReading {
            aqi: o.aqi,
            category: o.category.name.clone(),
            code: o.category.number,
        })
        .unwrap_or_default()
}

/// Assemble the air quality block. Transport errors propagate so the
/// caller can drop the block; missing feeds degrade to empty readings.
pub fn gather(cfg: &Config, today: NaiveDate) -> Result<AirQuality, ProviderError> {
    let (ozone, particulate) = match fetch_current(cfg)? {
        Some(body) => parse_current(&body)?,
        None => (AqReading::default(), AqReading::default()),
    };
    let (ozone_forecast, particulate_forecast) = match fetch_forecast(cfg)? {
        Some(body) => parse_forecast(&body, today)?,
        None => (AqReading::default(), AqReading::default()),
    };
    Ok(AirQuality {
        ozone,
        particulate,
        ozone_forecast,
        particulate_forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"[
        {"ParameterName": "O3", "AQI": 72,
         "Category": {"Number": 2, "Name": "Moderate"}},
        {"ParameterName": "PM2.5", "AQI": 24,
         "Category": {"Number": 1, "Name": "Good"}}
    ]"#;

    const FORECAST: &str = r#"[
        {"DateForecast": "2025-08-22 ", "ParameterName": "O3", "AQI": 60,
         "Category": {"Number": 2, "Name": "Moderate"}},
        {"DateForecast": "2025-08-23 ", "ParameterName": "O3", "AQI": 105,
         "Category": {"Number": 3, "Name": "Unhealthy for Sensitive Groups"}},
        {"DateForecast": "2025-08-23 ", "ParameterName": "PM2.5", "AQI": 30,
         "Category": {"Number": 1, "Name": "Good"}}
    ]"#;

    #[test]
    fn current_readings_split_by_parameter() {
        let (ozone, particulate) = parse_current(CURRENT).unwrap();
        assert_eq!(ozone.aqi, Some(72));
        assert_eq!(ozone.code, Some(2));
        assert_eq!(particulate.aqi, Some(24));
        assert_eq!(particulate.category.as_deref(), Some("Good"));
    }

    #[test]
    fn forecast_keeps_only_tomorrows_rows() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 22).unwrap();
        let (ozone, particulate) = parse_forecast(FORECAST, today).unwrap();
        assert_eq!(ozone.aqi, Some(105));
        assert_eq!(ozone.code, Some(3));
        assert_eq!(particulate.code, Some(1));
    }

    #[test]
    fn missing_parameter_is_an_empty_reading() {
        let (_, particulate) =
            parse_current(r#"[{"ParameterName": "O3", "AQI": 10, "Category": {}}]"#).unwrap();
        assert_eq!(particulate.aqi, None);
        assert_eq!(particulate.code, None);
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_current("<html>gateway timeout</html>").is_err());
    }
}
