use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CurrentConditions, HourlyForecast, round_one_decimal, round_whole};

pub const TREND_HOURS_BACK: usize = 12;
pub const TREND_HOURS_FORWARD: usize = 24;
/// The aligned hour plus the two following it. Labeled "next 2 hours" in the
/// report but deliberately three points wide.
pub const HORIZON_HOURS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendMetric {
    #[default]
    Pressure,
    Temperature,
}

impl TrendMetric {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pressure => "Luftdruck",
            Self::Temperature => "Temperatur",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Pressure => "hPa",
            Self::Temperature => "°C",
        }
    }

    /// Change over three hours needed to call the trend rising or falling.
    #[must_use]
    pub fn trend_threshold(self) -> f32 {
        match self {
            Self::Pressure => 1.0,
            Self::Temperature => 0.5,
        }
    }

    fn value(self, hour: &HourlyForecast) -> f32 {
        match self {
            Self::Pressure => hour.pressure_msl_hpa,
            Self::Temperature => hour.temperature_2m_c,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub time: NaiveDateTime,
    pub value: f32,
    pub is_future: bool,
    pub is_now: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub metric: TrendMetric,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    #[must_use]
    pub fn empty(metric: TrendMetric) -> Self {
        Self {
            metric,
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn now_index(&self) -> Option<usize> {
        self.points.iter().position(|point| point.is_now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShortHorizon {
    pub max_probability_pct: f32,
    pub rain_amount_mm: f32,
    pub max_wind_kmh: i32,
}

impl ShortHorizon {
    /// Degraded outlook from the current-instant values alone.
    #[must_use]
    pub fn from_current(current: &CurrentConditions) -> Self {
        Self {
            max_probability_pct: current.precipitation_probability,
            rain_amount_mm: 0.0,
            max_wind_kmh: round_whole(current.wind_speed_10m),
        }
    }
}

/// Index of the hour closest to `now`; the earliest wins on ties.
#[must_use]
pub fn align_now(hours: &[HourlyForecast], now: NaiveDateTime) -> Option<usize> {
    hours
        .iter()
        .enumerate()
        .min_by_key(|(_, hour)| (hour.time - now).num_milliseconds().abs())
        .map(|(idx, _)| idx)
}

/// Worst-case rain/wind over `[idx, idx + 2]`, or `None` when the slice
/// would run past the end of the series.
#[must_use]
pub fn aggregate_horizon(hours: &[HourlyForecast], idx: usize) -> Option<ShortHorizon> {
    let window = hours.get(idx..idx.saturating_add(HORIZON_HOURS))?;

    let max_probability_pct = window
        .iter()
        .filter_map(|h| h.precipitation_probability)
        .max_by(f32::total_cmp)
        .unwrap_or(0.0);
    let rain_amount_mm: f32 = window.iter().filter_map(|h| h.precipitation_mm).sum();
    let max_wind = window
        .iter()
        .filter_map(|h| h.wind_speed_10m)
        .max_by(f32::total_cmp)
        .unwrap_or(0.0);

    Some(ShortHorizon {
        max_probability_pct,
        rain_amount_mm: round_one_decimal(rain_amount_mm),
        max_wind_kmh: round_whole(max_wind),
    })
}

fn window_bounds(len: usize, now_idx: usize) -> (usize, usize) {
    let end = now_idx.saturating_add(TREND_HOURS_FORWARD).min(len);
    let start = now_idx.saturating_sub(TREND_HOURS_BACK).min(end);
    (start, end)
}

#[must_use]
pub fn build_trend(hours: &[HourlyForecast], now_idx: usize, metric: TrendMetric) -> TrendSeries {
    let (start, end) = window_bounds(hours.len(), now_idx);
    let points = hours[start..end]
        .iter()
        .zip(start..)
        .map(|(hour, idx)| TrendPoint {
            time: hour.time,
            value: metric.value(hour),
            is_future: idx > now_idx,
            is_now: idx == now_idx,
        })
        .collect();

    TrendSeries { metric, points }
}

/// Pressure and temperature windows over the same hours.
#[must_use]
pub fn build_trends(hours: &[HourlyForecast], now_idx: usize) -> (TrendSeries, TrendSeries) {
    (
        build_trend(hours, now_idx, TrendMetric::Pressure),
        build_trend(hours, now_idx, TrendMetric::Temperature),
    )
}
