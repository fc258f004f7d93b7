use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::astro::LunarEstimate;

mod conditions;
mod conversions;
mod series;
mod snapshot;

pub use conditions::{CompassDirection, UNKNOWN_CONDITION, compass_direction, condition_label};
pub use conversions::{
    parse_date, parse_datetime, provider_local_time, round_one_decimal, round_whole,
};
pub use series::{
    HORIZON_HOURS, ShortHorizon, TREND_HOURS_BACK, TREND_HOURS_FORWARD, TrendMetric, TrendPoint,
    TrendSeries, aggregate_horizon, align_now, build_trend, build_trends,
};
pub use snapshot::derive;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn from_coords(lat: f64, lon: f64) -> Self {
        Self::new(format!("{lat:.1}, {lon:.1}"), lat, lon)
    }
}

/// Point-in-time conditions as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature_2m_c: f32,
    pub apparent_temperature_c: f32,
    pub relative_humidity_2m: f32,
    pub weather_code: u16,
    pub pressure_msl_hpa: f32,
    pub wind_speed_10m: f32,
    pub wind_gusts_10m: f32,
    pub wind_direction_10m: f32,
    pub precipitation_probability: f32,
    pub cloud_cover: f32,
}

/// One hour of the provider's hourly series. Temperature and pressure are
/// always present; hours missing either are dropped at the wire boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecast {
    pub time: NaiveDateTime,
    pub temperature_2m_c: f32,
    pub pressure_msl_hpa: f32,
    pub precipitation_probability: Option<f32>,
    pub precipitation_mm: Option<f32>,
    pub wind_speed_10m: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

/// Parsed provider payload. Times are provider-local, `utc_offset_seconds`
/// relates them to UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct RawForecast {
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
    pub utc_offset_seconds: i32,
}

impl RawForecast {
    #[must_use]
    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        provider_local_time(now, self.utc_offset_seconds)
    }

    /// The daily entry for `date`, falling back to the first one.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DailyForecast> {
        self.daily
            .iter()
            .find(|day| day.date == date)
            .or_else(|| self.daily.first())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature_c: i32,
    pub apparent_temperature_c: i32,
    pub humidity_pct: f32,
    pub pressure_hpa: i32,
    pub wind_speed_kmh: i32,
    pub wind_gusts_kmh: i32,
    /// Unrounded, used for needle orientation.
    pub wind_direction_deg: f32,
    pub wind_direction: CompassDirection,
    pub weather_code: u16,
    pub condition: &'static str,
    pub precipitation_probability_pct: f32,
    pub cloud_cover_pct: f32,
    pub moon: LunarEstimate,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub outlook: ShortHorizon,
}

/// Everything derived from one successful fetch. Replaced as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedForecast {
    pub location: Location,
    pub snapshot: WeatherSnapshot,
    pub pressure_trend: TrendSeries,
    pub temperature_trend: TrendSeries,
    pub activity_score: u8,
    pub derived_at: DateTime<Utc>,
}

impl DerivedForecast {
    #[must_use]
    pub fn trend(&self, metric: TrendMetric) -> &TrendSeries {
        match metric {
            TrendMetric::Pressure => &self.pressure_trend,
            TrendMetric::Temperature => &self.temperature_trend,
        }
    }
}
