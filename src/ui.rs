#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

//! Plain-text rendering of derived forecasts. The only place timestamps are
//! formatted for display.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::{
    data::advisory::TacticalAdvice,
    domain::{
        activity::summarize,
        weather::{DerivedForecast, TrendMetric, TrendSeries},
    },
    resilience::freshness::RefreshMetadata,
};

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const NO_TIME: &str = "--:--";

/// 24-hour `HH:MM`, as shown in de-DE locales.
#[must_use]
pub fn format_clock(time: NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

fn clock_or_placeholder(time: Option<NaiveDateTime>) -> String {
    time.map_or_else(|| NO_TIME.to_string(), format_clock)
}

/// One character per trend point, scaled between the series min and max.
#[must_use]
pub fn sparkline(series: &TrendSeries) -> String {
    let values: Vec<f32> = series.points.iter().map(|point| point.value).collect();
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let span = max - min;

    values
        .iter()
        .map(|value| {
            if span <= f32::EPSILON {
                return SPARK_LEVELS[0];
            }
            let level = ((value - min) / span * 7.0).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[must_use]
pub fn render_report(derived: &DerivedForecast, metric: TrendMetric) -> String {
    let snapshot = &derived.snapshot;
    let outlook = &snapshot.outlook;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Karpfen-Check: {} ({:.2}, {:.2})",
        derived.location.name, derived.location.latitude, derived.location.longitude
    );
    let _ = writeln!(
        out,
        "Wetter:      {}, {}°C (gefühlt {}°C)",
        snapshot.condition, snapshot.temperature_c, snapshot.apparent_temperature_c
    );
    let _ = writeln!(out, "Luftdruck:   {} hPa", snapshot.pressure_hpa);
    let _ = writeln!(
        out,
        "Wind:        {} km/h aus {} (Böen {} km/h)",
        snapshot.wind_speed_kmh,
        snapshot.wind_direction.label(),
        snapshot.wind_gusts_kmh
    );
    let _ = writeln!(
        out,
        "Feuchte:     {:.0} %, Bewölkung {:.0} %",
        snapshot.humidity_pct, snapshot.cloud_cover_pct
    );
    let _ = writeln!(
        out,
        "Nächste 2 h: Regen {:.0} %, {:.1} mm, Wind bis {} km/h",
        outlook.max_probability_pct, outlook.rain_amount_mm, outlook.max_wind_kmh
    );
    let _ = writeln!(
        out,
        "Sonne:       auf {}, unter {}",
        clock_or_placeholder(snapshot.sunrise),
        clock_or_placeholder(snapshot.sunset)
    );
    let _ = writeln!(
        out,
        "Mond:        {} ({} %)",
        snapshot.moon.phase.label(),
        snapshot.moon.illumination_pct
    );
    let _ = writeln!(out, "Aktivität:   {}/100", derived.activity_score);

    let series = derived.trend(metric);
    if series.is_empty() {
        let _ = write!(out, "{}-Trend:   keine Stundenwerte", metric.label());
    } else {
        let summary = summarize(series);
        let _ = writeln!(
            out,
            "{}-Trend:   {:.1} bis {:.1} {}, {}",
            metric.label(),
            summary.min,
            summary.max,
            metric.unit(),
            summary.trend.label()
        );
        let _ = write!(out, "             {}", sparkline(series));
    }

    out
}

#[must_use]
pub fn render_advice(advice: &TacticalAdvice) -> String {
    format!(
        "Taktik:      {}\n\
         Köder:       {}\n\
         Montage:     {}\n\
         Spot:        {}\n\
         Begründung:  {}\n\
         Beißindex:   {:.0}/100",
        advice.strategy_name,
        advice.bait_advice,
        advice.rig_advice,
        advice.spot_advice,
        advice.reasoning,
        advice.activity_score
    )
}

#[must_use]
pub fn render_error_banner(message: &str) -> String {
    format!("! {message}")
}

#[must_use]
pub fn render_status(meta: &RefreshMetadata, now: DateTime<Utc>) -> String {
    match meta.age_minutes(now) {
        Some(age) => format!("Daten {} (vor {age} min)", meta.state.label()),
        None => format!("Daten {}", meta.state.label()),
    }
}
