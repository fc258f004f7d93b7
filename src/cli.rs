#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::domain::weather::TrendMetric;

pub const DEFAULT_REFRESH_SECS: u64 = 600;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TrendArg {
    Pressure,
    Temperature,
}

impl From<TrendArg> for TrendMetric {
    fn from(value: TrendArg) -> Self {
        match value {
            TrendArg::Pressure => Self::Pressure,
            TrendArg::Temperature => Self::Temperature,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "carplogic",
    version,
    about = "Carp fishing conditions from the Open-Meteo forecast"
)]
pub struct Cli {
    /// Direct latitude (requires --lon)
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Direct longitude (requires --lat)
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Skip IP geolocation and use the fallback location
    #[arg(long)]
    pub no_geoip: bool,

    /// Trend series to summarize
    #[arg(long, value_enum)]
    pub trend: Option<TrendArg>,

    /// Keep running and refresh periodically
    #[arg(long)]
    pub watch: bool,

    /// Refresh interval in seconds (watch mode)
    #[arg(long, default_value_t = DEFAULT_REFRESH_SECS)]
    pub refresh_interval: u64,

    /// Forecast API base URL
    #[arg(long)]
    pub forecast_url: Option<String>,

    /// Request tactical advice after the first snapshot
    #[arg(long)]
    pub advise: bool,

    /// Water type for the advice, e.g. "Baggersee" or "Fluss"
    #[arg(long)]
    pub water_type: Option<String>,

    /// Season for the advice
    #[arg(long)]
    pub season: Option<String>,

    /// JPEG photo of the fishing spot (requires --advise)
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Advisory API base URL
    #[arg(long)]
    pub advisory_url: Option<String>,

    /// Advisory model name
    #[arg(long)]
    pub advisory_model: Option<String>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    anyhow::bail!("--lat must be within -90..=90, got {lat}");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    anyhow::bail!("--lon must be within -180..=180, got {lon}");
                }
            }
            (None, None) => {}
        }
        if self.image.is_some() && !self.advise {
            anyhow::bail!("--image requires --advise");
        }
        Ok(())
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lon)
    }
}
