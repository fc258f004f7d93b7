use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{
    DerivedForecast, Location, RawForecast, ShortHorizon, TrendMetric, TrendSeries,
    WeatherSnapshot, aggregate_horizon, align_now, build_trends, compass_direction,
    condition_label, round_whole,
};
use crate::domain::{
    activity::{ScoreInputs, activity_score},
    astro,
};

/// Derives the snapshot, both trend windows and the activity score from one
/// provider payload. Every step degrades on its own; nothing here fails.
#[must_use]
pub fn derive(raw: &RawForecast, location: Location, now: DateTime<Utc>) -> DerivedForecast {
    let local_now = raw.local_time(now);
    let moon = astro::estimate(local_now.date());

    let aligned = align_now(&raw.hourly, local_now);
    if aligned.is_none() {
        warn!(%local_now, "hourly series is empty; using current values only");
    }

    let outlook = aggregate_horizon(&raw.hourly, aligned.unwrap_or(0)).unwrap_or_else(|| {
        debug!(hours = raw.hourly.len(), "short horizon out of range; using current values");
        ShortHorizon::from_current(&raw.current)
    });

    let (pressure_trend, temperature_trend) = match aligned {
        Some(now_idx) => build_trends(&raw.hourly, now_idx),
        None => (
            TrendSeries::empty(TrendMetric::Pressure),
            TrendSeries::empty(TrendMetric::Temperature),
        ),
    };

    let current = &raw.current;
    let today = raw.day(local_now.date());
    let snapshot = WeatherSnapshot {
        temperature_c: round_whole(current.temperature_2m_c),
        apparent_temperature_c: round_whole(current.apparent_temperature_c),
        humidity_pct: current.relative_humidity_2m,
        pressure_hpa: round_whole(current.pressure_msl_hpa),
        wind_speed_kmh: round_whole(current.wind_speed_10m),
        wind_gusts_kmh: round_whole(current.wind_gusts_10m),
        wind_direction_deg: current.wind_direction_10m,
        wind_direction: compass_direction(current.wind_direction_10m),
        weather_code: current.weather_code,
        condition: condition_label(current.weather_code),
        precipitation_probability_pct: current.precipitation_probability,
        cloud_cover_pct: current.cloud_cover,
        moon,
        sunrise: today.and_then(|day| day.sunrise),
        sunset: today.and_then(|day| day.sunset),
        outlook,
    };
    let activity_score = activity_score(&ScoreInputs::from_snapshot(&snapshot));

    DerivedForecast {
        location,
        snapshot,
        pressure_trend,
        temperature_trend,
        activity_score,
        derived_at: now,
    }
}
