#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

//! Bite-activity heuristic and the trend summary shown beside the chart.

use serde::Serialize;

use crate::domain::{
    astro::MoonPhase,
    weather::{TrendSeries, WeatherSnapshot},
};

pub const BASELINE_SCORE: i32 = 50;
/// Never 100: the heuristic cannot be certain.
pub const MAX_SCORE: u8 = 95;
/// How many hours back the trend comparison looks.
pub const TREND_LOOKBACK: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub pressure_hpa: f32,
    pub wind_speed_kmh: f32,
    pub moon_phase: MoonPhase,
    pub cloud_cover_pct: f32,
}

impl ScoreInputs {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self {
            pressure_hpa: snapshot.pressure_hpa as f32,
            wind_speed_kmh: snapshot.wind_speed_kmh as f32,
            moon_phase: snapshot.moon.phase,
            cloud_cover_pct: snapshot.cloud_cover_pct,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub name: &'static str,
    pub points: i32,
    pub applies: fn(&ScoreInputs) -> bool,
}

pub const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        name: "Stabiler Luftdruck",
        points: 20,
        applies: pressure_in_comfort_band,
    },
    ScoreRule {
        name: "Wind",
        points: 10,
        applies: windy,
    },
    ScoreRule {
        name: "Voll- oder Neumond",
        points: 15,
        applies: full_or_new_moon,
    },
    ScoreRule {
        name: "Bewölkt",
        points: 5,
        applies: overcast,
    },
];

fn pressure_in_comfort_band(inputs: &ScoreInputs) -> bool {
    inputs.pressure_hpa > 1010.0 && inputs.pressure_hpa < 1020.0
}

fn windy(inputs: &ScoreInputs) -> bool {
    inputs.wind_speed_kmh > 10.0
}

fn full_or_new_moon(inputs: &ScoreInputs) -> bool {
    inputs.moon_phase.is_full_or_new()
}

fn overcast(inputs: &ScoreInputs) -> bool {
    inputs.cloud_cover_pct > 50.0
}

#[must_use]
pub fn activity_score(inputs: &ScoreInputs) -> u8 {
    score_with_rules(inputs, SCORE_RULES)
}

#[must_use]
pub fn score_with_rules(inputs: &ScoreInputs, rules: &[ScoreRule]) -> u8 {
    let total = matching_rules(inputs, rules).fold(BASELINE_SCORE, |acc, rule| acc + rule.points);
    total.clamp(0, i32::from(MAX_SCORE)) as u8
}

pub fn matching_rules<'a>(
    inputs: &'a ScoreInputs,
    rules: &'a [ScoreRule],
) -> impl Iterator<Item = &'a ScoreRule> + 'a {
    rules.iter().filter(move |rule| (rule.applies)(inputs))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rising => "Steigend",
            Self::Falling => "Fallend",
            Self::Stable => "Stabil",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub min: f32,
    pub max: f32,
    pub trend: Trend,
}

/// Min, max and three-hour direction of the selected series.
#[must_use]
pub fn summarize(series: &TrendSeries) -> ActivitySummary {
    if series.is_empty() {
        return ActivitySummary {
            min: 0.0,
            max: 0.0,
            trend: Trend::Stable,
        };
    }

    let values = series.points.iter().map(|point| point.value);
    let min = values.clone().min_by(f32::total_cmp).unwrap_or(0.0);
    let max = values.max_by(f32::total_cmp).unwrap_or(0.0);

    let trend = series.now_index().map_or(Trend::Stable, |now_idx| {
        let past = series.points[now_idx.saturating_sub(TREND_LOOKBACK)].value;
        classify_change(
            series.points[now_idx].value - past,
            series.metric.trend_threshold(),
        )
    });

    ActivitySummary { min, max, trend }
}

fn classify_change(delta: f32, threshold: f32) -> Trend {
    if delta > threshold {
        Trend::Rising
    } else if delta < -threshold {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDateTime};

    use super::*;
    use crate::domain::weather::{TrendMetric, TrendPoint};

    fn inputs(pressure: f32, wind: f32, phase: MoonPhase, cloud: f32) -> ScoreInputs {
        ScoreInputs {
            pressure_hpa: pressure,
            wind_speed_kmh: wind,
            moon_phase: phase,
            cloud_cover_pct: cloud,
        }
    }

    fn series(metric: TrendMetric, values: &[f32], now_idx: usize) -> TrendSeries {
        let start = NaiveDateTime::parse_from_str("2026-05-01T06:00", "%Y-%m-%dT%H:%M")
            .expect("valid time");
        TrendSeries {
            metric,
            points: values
                .iter()
                .enumerate()
                .map(|(idx, value)| TrendPoint {
                    time: start + Duration::hours(i64::try_from(idx).unwrap_or(0)),
                    value: *value,
                    is_future: idx > now_idx,
                    is_now: idx == now_idx,
                })
                .collect(),
        }
    }

    #[test]
    fn all_rules_hit_the_cap() {
        assert_eq!(activity_score(&inputs(1015.0, 15.0, MoonPhase::Full, 60.0)), 95);
    }

    #[test]
    fn baseline_without_matching_rules() {
        let score = activity_score(&inputs(1005.0, 5.0, MoonPhase::FirstQuarter, 10.0));
        assert_eq!(score, 50);
    }

    #[test]
    fn pressure_band_is_exclusive() {
        let at_edge = inputs(1010.0, 0.0, MoonPhase::WaxingGibbous, 0.0);
        let inside = inputs(1011.0, 0.0, MoonPhase::WaxingGibbous, 0.0);
        assert_eq!(activity_score(&at_edge), 50);
        assert_eq!(activity_score(&inside), 70);
    }

    #[test]
    fn partial_rules_add_up() {
        let inputs = inputs(1025.0, 12.0, MoonPhase::New, 80.0);
        assert_eq!(activity_score(&inputs), 80);
        let names: Vec<_> = matching_rules(&inputs, SCORE_RULES)
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names, vec!["Wind", "Voll- oder Neumond", "Bewölkt"]);
    }

    #[test]
    fn custom_rule_tables_are_clamped() {
        let penalty = [ScoreRule {
            name: "Sturm",
            points: -80,
            applies: |inputs| inputs.wind_speed_kmh > 60.0,
        }];
        let score = score_with_rules(&inputs(1000.0, 70.0, MoonPhase::New, 0.0), &penalty);
        assert_eq!(score, 0);
    }

    #[test]
    fn pressure_rising_over_threshold() {
        let values = [1010.0, 1011.0, 1011.5, 1012.0];
        let summary = summarize(&series(TrendMetric::Pressure, &values, 3));
        assert_eq!(summary.trend, Trend::Rising);
        assert!((summary.min - 1010.0).abs() < f32::EPSILON);
        assert!((summary.max - 1012.0).abs() < f32::EPSILON);
    }

    #[test]
    fn temperature_small_change_is_stable() {
        let values = [10.0, 10.1, 10.2, 10.3];
        let summary = summarize(&series(TrendMetric::Temperature, &values, 3));
        assert_eq!(summary.trend, Trend::Stable);
    }

    #[test]
    fn temperature_drop_is_falling() {
        let values = [12.0, 11.8, 11.5, 11.2, 11.0];
        let summary = summarize(&series(TrendMetric::Temperature, &values, 4));
        assert_eq!(summary.trend, Trend::Falling);
    }

    #[test]
    fn lookback_clamps_to_first_point() {
        let summary = summarize(&series(TrendMetric::Pressure, &[1008.0, 1013.0], 1));
        assert_eq!(summary.trend, Trend::Rising);
    }

    #[test]
    fn empty_series_reports_zeroes() {
        let summary = summarize(&TrendSeries::empty(TrendMetric::Pressure));
        assert_eq!(
            summary,
            ActivitySummary {
                min: 0.0,
                max: 0.0,
                trend: Trend::Stable
            }
        );
    }
}
