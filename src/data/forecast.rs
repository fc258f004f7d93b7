use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::weather::{
    CurrentConditions, DailyForecast, HourlyForecast, Location, RawForecast, parse_date,
    parse_datetime,
};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,weather_code,pressure_msl,wind_speed_10m,wind_direction_10m,wind_gusts_10m,precipitation_probability,cloud_cover";
const HOURLY_FIELDS: &str =
    "temperature_2m,pressure_msl,precipitation_probability,precipitation,wind_speed_10m";
const DAILY_FIELDS: &str = "sunrise,sunset";

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("forecast service returned {0}")]
    Status(StatusCode),
    #[error("failed to parse forecast payload: {0}")]
    Payload(#[source] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_URL)
    }

    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client"),
            base_url: base_url.into(),
        }
    }

    pub async fn fetch(&self, location: &Location) -> Result<RawForecast, ForecastError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", location.latitude.to_string()),
                ("longitude", location.longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("past_days", "1".to_string()),
                ("forecast_days", "2".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(ForecastError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::Status(status));
        }

        let body = response.bytes().await.map_err(ForecastError::Request)?;
        parse_forecast_payload(&body)
    }
}

/// Parses an Open-Meteo response body into per-hour and per-day records.
pub fn parse_forecast_payload(body: &[u8]) -> Result<RawForecast, ForecastError> {
    let payload: ForecastResponse = serde_json::from_slice(body).map_err(ForecastError::Payload)?;

    let current = CurrentConditions {
        temperature_2m_c: payload.current.temperature_2m,
        apparent_temperature_c: payload.current.apparent_temperature,
        relative_humidity_2m: payload.current.relative_humidity_2m,
        weather_code: payload.current.weather_code,
        pressure_msl_hpa: payload.current.pressure_msl,
        wind_speed_10m: payload.current.wind_speed_10m,
        wind_gusts_10m: payload.current.wind_gusts_10m,
        wind_direction_10m: payload.current.wind_direction_10m,
        precipitation_probability: payload.current.precipitation_probability,
        cloud_cover: payload.current.cloud_cover,
    };

    Ok(RawForecast {
        current,
        hourly: parse_hourly(&payload.hourly),
        daily: parse_daily(&payload.daily),
        utc_offset_seconds: payload.utc_offset_seconds,
    })
}

fn parse_hourly(hourly: &HourlyBlock) -> Vec<HourlyForecast> {
    let mut out = Vec::with_capacity(hourly.time.len());
    for (idx, raw_time) in hourly.time.iter().enumerate() {
        let Some(time) = parse_datetime(raw_time) else {
            debug!(idx, %raw_time, "dropping hour with unparsable timestamp");
            continue;
        };
        let temperature = hourly.temperature_2m.get(idx).copied().flatten();
        let pressure = hourly.pressure_msl.get(idx).copied().flatten();
        let (Some(temperature_2m_c), Some(pressure_msl_hpa)) = (temperature, pressure) else {
            debug!(%time, "dropping hour without temperature or pressure");
            continue;
        };

        out.push(HourlyForecast {
            time,
            temperature_2m_c,
            pressure_msl_hpa,
            precipitation_probability: hourly.precipitation_probability.get(idx).copied().flatten(),
            precipitation_mm: hourly.precipitation.get(idx).copied().flatten(),
            wind_speed_10m: hourly.wind_speed_10m.get(idx).copied().flatten(),
        });
    }
    out
}

fn parse_daily(daily: &DailyBlock) -> Vec<DailyForecast> {
    daily
        .time
        .iter()
        .enumerate()
        .filter_map(|(idx, raw_date)| {
            let date = parse_date(raw_date)?;
            Some(DailyForecast {
                date,
                sunrise: daily.sunrise.get(idx).and_then(|v| parse_datetime(v)),
                sunset: daily.sunset.get(idx).and_then(|v| parse_datetime(v)),
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    current: CurrentBlock,
    #[serde(default)]
    hourly: HourlyBlock,
    #[serde(default)]
    daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    temperature_2m: f32,
    apparent_temperature: f32,
    relative_humidity_2m: f32,
    weather_code: u16,
    pressure_msl: f32,
    wind_speed_10m: f32,
    #[serde(default)]
    wind_gusts_10m: f32,
    wind_direction_10m: f32,
    #[serde(default)]
    precipitation_probability: f32,
    #[serde(default)]
    cloud_cover: f32,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f32>>,
    #[serde(default)]
    pressure_msl: Vec<Option<f32>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f32>>,
    #[serde(default)]
    precipitation: Vec<Option<f32>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f32>>,
}

#[derive(Debug, Default, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(times: &[&str]) -> HourlyBlock {
        HourlyBlock {
            time: times.iter().map(ToString::to_string).collect(),
            temperature_2m: vec![Some(1.0); times.len()],
            pressure_msl: vec![Some(1012.0); times.len()],
            precipitation_probability: vec![Some(10.0); times.len()],
            precipitation: vec![Some(0.2); times.len()],
            wind_speed_10m: vec![Some(9.0); times.len()],
        }
    }

    #[test]
    fn parse_hourly_skips_bad_timestamps() {
        let parsed = parse_hourly(&block(&["bad", "2026-02-12T10:00"]));
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn parse_hourly_drops_hours_without_trend_metrics() {
        let mut hourly = block(&["2026-02-12T10:00", "2026-02-12T11:00", "2026-02-12T12:00"]);
        hourly.temperature_2m[0] = None;
        hourly.pressure_msl.truncate(2);
        hourly.wind_speed_10m[1] = None;

        let parsed = parse_hourly(&hourly);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].wind_speed_10m, None);
        assert_eq!(parsed[0].precipitation_mm, Some(0.2));
    }

    #[test]
    fn payload_without_current_block_is_rejected() {
        let err = parse_forecast_payload(br#"{"hourly": {}}"#).unwrap_err();
        assert!(matches!(err, ForecastError::Payload(_)));
    }

    #[test]
    fn daily_block_keeps_raw_sun_times() {
        let daily = DailyBlock {
            time: vec!["2026-02-12".to_string(), "nope".to_string()],
            sunrise: vec!["2026-02-12T07:31".to_string()],
            sunset: vec![],
        };
        let parsed = parse_daily(&daily);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].sunrise, parse_datetime("2026-02-12T07:31"));
        assert_eq!(parsed[0].sunset, None);
    }
}
