#![allow(clippy::cast_precision_loss)]
#![allow(dead_code)]

use carplogic::{
    app::{settings::RuntimeSettings, state::AppState},
    cli::Cli,
    data::forecast::parse_forecast_payload,
    domain::weather::{Location, RawForecast},
};
use chrono::{DateTime, TimeZone, Utc};
use clap::Parser;
use serde_json::{Value, json};

pub const HOURS: usize = 72;
/// Hour index of 12:00 local on 2026-05-01 in the fixture series.
pub const NOW_INDEX: usize = 36;

pub fn munich() -> Location {
    Location::new("München", 48.1, 11.6)
}

/// 12:00 at the fixture location (UTC+2).
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
}

pub fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("carplogic").chain(args.iter().copied()))
}

pub fn state_for(forecast_url: &str, extra: &[&str]) -> AppState {
    let mut args = vec!["--lat", "48.1", "--lon", "11.6", "--forecast-url", forecast_url];
    args.extend_from_slice(extra);
    AppState::new(&cli(&args), RuntimeSettings::default())
}

/// Open-Meteo shaped payload: 72 hours from 2026-04-30T00:00 local time,
/// pressure rising 0.5 hPa per hour, a rain shower around local noon.
pub fn forecast_payload() -> Value {
    let times: Vec<String> = (0..HOURS)
        .map(|idx| {
            let day = 30 + idx / 24;
            let (month, day) = if day > 30 { (5, day - 30) } else { (4, day) };
            format!("2026-{month:02}-{day:02}T{:02}:00", idx % 24)
        })
        .collect();
    let pressure: Vec<f64> = (0..HOURS).map(|idx| 1000.0 + 0.5 * idx as f64).collect();
    let temperature: Vec<f64> = (0..HOURS).map(|idx| 10.0 + 0.5 * (idx % 24) as f64).collect();
    let probability: Vec<f64> = (0..HOURS)
        .map(|idx| match idx {
            36 => 30.0,
            37 => 60.0,
            38 => 40.0,
            _ => 10.0,
        })
        .collect();
    let precipitation: Vec<f64> = (0..HOURS)
        .map(|idx| match idx {
            36 => 0.2,
            37 => 0.5,
            38 => 0.1,
            _ => 0.0,
        })
        .collect();
    let wind: Vec<f64> = (0..HOURS)
        .map(|idx| if idx == 37 { 14.0 } else { 8.0 })
        .collect();

    json!({
        "latitude": 48.1,
        "longitude": 11.6,
        "utc_offset_seconds": 7200,
        "timezone": "Europe/Berlin",
        "current": {
            "time": "2026-05-01T12:00",
            "temperature_2m": 16.4,
            "apparent_temperature": 15.1,
            "relative_humidity_2m": 68,
            "weather_code": 2,
            "pressure_msl": 1013.2,
            "wind_speed_10m": 11.6,
            "wind_direction_10m": 225,
            "wind_gusts_10m": 24.0,
            "precipitation_probability": 20,
            "cloud_cover": 55
        },
        "hourly": {
            "time": times,
            "temperature_2m": temperature,
            "pressure_msl": pressure,
            "precipitation_probability": probability,
            "precipitation": precipitation,
            "wind_speed_10m": wind
        },
        "daily": {
            "time": ["2026-04-30", "2026-05-01", "2026-05-02"],
            "sunrise": ["2026-04-30T05:54", "2026-05-01T05:52", "2026-05-02T05:50"],
            "sunset": ["2026-04-30T20:19", "2026-05-01T20:21", "2026-05-02T20:22"]
        }
    })
}

pub fn fixture_raw() -> RawForecast {
    parse_forecast_payload(forecast_payload().to_string().as_bytes())
        .expect("fixture payload parses")
}
