#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

//! Closed-form lunar phase estimate.
//!
//! A coarse day-number heuristic for the activity score, not an ephemeris.
//! Phase names can lead the sky by up to two weeks.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Mean length of the synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_67;

/// Reference new moon on the day-number scale.
const REFERENCE_NEW_MOON_JD: f64 = 2_451_550.1;
const DAY_NUMBER_OFFSET: f64 = 1_720_995.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

pub const ALL_PHASES: [MoonPhase; 8] = [
    MoonPhase::New,
    MoonPhase::WaxingCrescent,
    MoonPhase::FirstQuarter,
    MoonPhase::WaxingGibbous,
    MoonPhase::Full,
    MoonPhase::WaningGibbous,
    MoonPhase::LastQuarter,
    MoonPhase::WaningCrescent,
];

impl MoonPhase {
    /// Classifies a position in the lunar cycle, `0.0` being new moon.
    #[must_use]
    pub fn from_phase_index(phase_index: f64) -> Self {
        match phase_index {
            p if !(0.03..=0.97).contains(&p) => Self::New,
            p if p < 0.22 => Self::WaxingCrescent,
            p if p < 0.28 => Self::FirstQuarter,
            p if p < 0.47 => Self::WaxingGibbous,
            p if p < 0.53 => Self::Full,
            p if p < 0.72 => Self::WaningGibbous,
            p if p < 0.78 => Self::LastQuarter,
            _ => Self::WaningCrescent,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "Neumond",
            Self::WaxingCrescent => "Zun. Sichel",
            Self::FirstQuarter => "1. Viertel",
            Self::WaxingGibbous => "Zun. Mond",
            Self::Full => "Vollmond",
            Self::WaningGibbous => "Abn. Mond",
            Self::LastQuarter => "Letztes Viertel",
            Self::WaningCrescent => "Abn. Sichel",
        }
    }

    #[must_use]
    pub fn is_full_or_new(self) -> bool {
        matches!(self, Self::Full | Self::New)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LunarEstimate {
    pub phase: MoonPhase,
    pub illumination_pct: u8,
    pub phase_index: f64,
}

/// Day number on the Julian Day scale: civil-calendar day count with
/// January and February folded into the previous year. No Gregorian century
/// correction, so it runs about 13 days ahead of the astronomical JD.
#[must_use]
pub fn julian_day(date: NaiveDate) -> f64 {
    let (mut year, mut month) = (date.year(), date.month());
    if month < 3 {
        year -= 1;
        month += 12;
    }

    (365.25 * f64::from(year)).floor()
        + (30.6001 * f64::from(month + 1)).floor()
        + f64::from(date.day())
        + DAY_NUMBER_OFFSET
}

/// Position in the lunar cycle, always in `[0, 1)`.
#[must_use]
pub fn phase_index(date: NaiveDate) -> f64 {
    let days_since_new_moon =
        (julian_day(date) - REFERENCE_NEW_MOON_JD).rem_euclid(SYNODIC_MONTH_DAYS);
    (days_since_new_moon / SYNODIC_MONTH_DAYS).min(0.999_999_999)
}

#[must_use]
pub fn illumination_pct(phase_index: f64) -> u8 {
    let fraction = (1.0 - (std::f64::consts::TAU * phase_index).cos()) / 2.0;
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

#[must_use]
pub fn estimate(date: NaiveDate) -> LunarEstimate {
    let phase_index = phase_index(date);
    LunarEstimate {
        phase: MoonPhase::from_phase_index(phase_index),
        illumination_pct: illumination_pct(phase_index),
        phase_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn day_number_has_no_century_correction() {
        assert!((julian_day(date(2000, 1, 1)) - 2_451_558.0).abs() < f64::EPSILON);
        assert!((julian_day(date(1999, 12, 31)) - 2_451_557.0).abs() < f64::EPSILON);
        assert!((julian_day(date(2026, 10, 16)) - 2_461_343.0).abs() < f64::EPSILON);
    }

    #[test]
    fn half_cycle_is_full_moon() {
        assert_eq!(MoonPhase::from_phase_index(0.50), MoonPhase::Full);
        assert_eq!(illumination_pct(0.50), 100);
    }

    #[test]
    fn phase_boundaries_follow_thresholds() {
        assert_eq!(MoonPhase::from_phase_index(0.0), MoonPhase::New);
        assert_eq!(MoonPhase::from_phase_index(0.029), MoonPhase::New);
        assert_eq!(MoonPhase::from_phase_index(0.03), MoonPhase::WaxingCrescent);
        assert_eq!(MoonPhase::from_phase_index(0.25), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_phase_index(0.47), MoonPhase::Full);
        assert_eq!(MoonPhase::from_phase_index(0.53), MoonPhase::WaningGibbous);
        assert_eq!(MoonPhase::from_phase_index(0.75), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_phase_index(0.9), MoonPhase::WaningCrescent);
        assert_eq!(MoonPhase::from_phase_index(0.971), MoonPhase::New);
    }

    #[test]
    fn known_dates_classify_as_expected() {
        let full = estimate(date(2026, 1, 20));
        assert_eq!(full.phase, MoonPhase::Full);
        assert_eq!(full.phase.label(), "Vollmond");
        assert_eq!(full.illumination_pct, 100);

        let new = estimate(date(2026, 2, 3));
        assert_eq!(new.phase, MoonPhase::New);
        assert_eq!(new.illumination_pct, 0);

        let waning = estimate(date(2026, 10, 16));
        assert_eq!(waning.phase, MoonPhase::WaningGibbous);
        assert_eq!(waning.illumination_pct, 87);
    }

    #[test]
    fn dates_before_reference_stay_in_range() {
        let estimate = estimate(date(1980, 7, 4));
        assert!((0.0..1.0).contains(&estimate.phase_index));
        assert!(estimate.illumination_pct <= 100);
    }

    #[test]
    fn every_phase_has_its_own_label() {
        let mut labels: Vec<&str> = ALL_PHASES.iter().map(|phase| phase.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ALL_PHASES.len());
        assert_eq!(MoonPhase::New.label(), "Neumond");
    }
}
