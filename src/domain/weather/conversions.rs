#![allow(clippy::cast_possible_truncation)]

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Nearest integer, halves toward positive infinity (`-2.5` becomes `-2`).
#[must_use]
pub fn round_whole(value: f32) -> i32 {
    round_half_up(value) as i32
}

#[must_use]
pub fn round_one_decimal(value: f32) -> f32 {
    round_half_up(value * 10.0) / 10.0
}

fn round_half_up(value: f32) -> f32 {
    (value + 0.5).floor()
}

#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok()
}

#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Wall-clock time at the forecast location for a UTC instant.
#[must_use]
pub fn provider_local_time(now: DateTime<Utc>, utc_offset_seconds: i32) -> NaiveDateTime {
    now.naive_utc() + Duration::seconds(i64::from(utc_offset_seconds))
}
