use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Parser;

use crate::{
    app::{settings::RuntimeSettings, state::AppState},
    cli::Cli,
    domain::weather::{CurrentConditions, DailyForecast, HourlyForecast, Location, RawForecast},
};

fn parse_time(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("valid time fixture")
}

pub(crate) fn state_test_cli() -> Cli {
    Cli::parse_from(["carplogic", "--no-geoip", "--forecast-url", "http://127.0.0.1:9"])
}

pub(crate) fn test_state() -> AppState {
    AppState::new(&state_test_cli(), RuntimeSettings::default())
}

pub(crate) fn munich() -> Location {
    Location::new("München", 48.1, 11.6)
}

/// 12:00 local time on the fixture day (UTC+2).
pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap()
}

pub(crate) fn sample_current() -> CurrentConditions {
    CurrentConditions {
        temperature_2m_c: 16.4,
        apparent_temperature_c: 15.1,
        relative_humidity_2m: 68.0,
        weather_code: 2,
        pressure_msl_hpa: 1013.2,
        wind_speed_10m: 11.6,
        wind_gusts_10m: 24.0,
        wind_direction_10m: 225.0,
        precipitation_probability: 20.0,
        cloud_cover: 55.0,
    }
}

pub(crate) fn sample_hourly() -> Vec<HourlyForecast> {
    let start = parse_time("2026-04-30T00:00");
    (0..72)
        .map(|idx: i32| HourlyForecast {
            time: start + Duration::hours(i64::from(idx)),
            temperature_2m_c: 10.0 + f32::from(i16::try_from(idx % 24).unwrap_or(0)) * 0.4,
            pressure_msl_hpa: 1008.0 + f32::from(i16::try_from(idx).unwrap_or(0)) * 0.2,
            precipitation_probability: Some(20.0),
            precipitation_mm: Some(0.1),
            wind_speed_10m: Some(9.0),
        })
        .collect()
}

pub(crate) fn sample_daily() -> Vec<DailyForecast> {
    let first = NaiveDate::from_ymd_opt(2026, 4, 30).expect("valid date fixture");
    (0..3)
        .map(|offset| {
            let date = first + Duration::days(offset);
            DailyForecast {
                date,
                sunrise: date.and_hms_opt(5, 52, 0),
                sunset: date.and_hms_opt(20, 21, 0),
            }
        })
        .collect()
}

pub(crate) fn sample_raw() -> RawForecast {
    RawForecast {
        current: sample_current(),
        hourly: sample_hourly(),
        daily: sample_daily(),
        utc_offset_seconds: 7200,
    }
}
