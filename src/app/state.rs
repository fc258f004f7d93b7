use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, schedule_retry, start_refresh_task},
        settings::RuntimeSettings,
        slot::{FetchSequencer, FetchToken, SnapshotSlot},
    },
    cli::Cli,
    data::{
        advisory::{AdvisoryClient, AdvisoryRequest, TacticalAdvice},
        forecast::ForecastClient,
        geoip::resolve_location,
    },
    domain::weather::{DerivedForecast, Location, RawForecast, derive},
    resilience::{backoff::Backoff, freshness::RefreshMetadata},
};

pub const WEATHER_ERROR: &str = "Wetterdaten nicht verfügbar";
pub const ADVICE_ERROR: &str = "Fehler bei der Analyse.";

const RETRY_BASE: Duration = Duration::from_secs(10);
const RETRY_MAX: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Error,
    Quit,
}

/// What handling one event changed, for the run loop to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    FetchStarted(FetchToken),
    SnapshotAccepted { version: u64 },
    Discarded(FetchToken),
    FetchFailed { retry_in: Duration },
    AdviceReady,
    AdviceFailed,
    Quit,
}

#[derive(Debug, Clone, Default)]
struct AdvisoryOptions {
    enabled: bool,
    base_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    spot_image: Option<Vec<u8>>,
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub location: Option<Location>,
    pub slot: SnapshotSlot,
    pub sequencer: FetchSequencer,
    pub refresh_meta: RefreshMetadata,
    pub backoff: Backoff,
    pub last_error: Option<String>,
    pub advice: Option<TacticalAdvice>,
    pub advice_error: Option<String>,
    pub settings: RuntimeSettings,
    forecast: ForecastClient,
    coordinates: Option<(f64, f64)>,
    use_geoip: bool,
    watch: bool,
    advisory: AdvisoryOptions,
    advice_requested: bool,
}

impl AppState {
    #[must_use]
    pub fn new(cli: &Cli, settings: RuntimeSettings) -> Self {
        let forecast = cli
            .forecast_url
            .as_deref()
            .map_or_else(ForecastClient::new, ForecastClient::with_base_url);

        Self {
            mode: AppMode::Loading,
            location: None,
            slot: SnapshotSlot::default(),
            sequencer: FetchSequencer::default(),
            refresh_meta: RefreshMetadata::default(),
            backoff: Backoff::new(RETRY_BASE, RETRY_MAX),
            last_error: None,
            advice: None,
            advice_error: None,
            settings,
            forecast,
            coordinates: cli.coordinates(),
            use_geoip: !cli.no_geoip,
            watch: cli.watch,
            advisory: AdvisoryOptions {
                enabled: cli.advise,
                base_url: cli.advisory_url.clone(),
                model: cli.advisory_model.clone(),
                api_key: None,
                spot_image: None,
            },
            advice_requested: false,
        }
    }

    #[must_use]
    pub fn with_spot_image(mut self, bytes: Vec<u8>) -> Self {
        self.advisory.spot_image = Some(bytes);
        self
    }

    /// Uses `key` instead of reading the advisory key from the environment.
    #[must_use]
    pub fn with_advisory_key(mut self, key: impl Into<String>) -> Self {
        self.advisory.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn current(&self) -> Option<&DerivedForecast> {
        self.slot.get()
    }

    #[must_use]
    pub fn wants_advice(&self) -> bool {
        self.advisory.enabled
    }

    pub fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        now: DateTime<Utc>,
    ) -> Outcome {
        match event {
            AppEvent::Bootstrap => {
                if self.watch {
                    start_refresh_task(
                        tx.clone(),
                        Duration::from_secs(self.settings.refresh_interval_secs),
                    );
                }
                Outcome::FetchStarted(self.start_fetch(tx, now))
            }
            AppEvent::TickRefresh => {
                self.refresh_meta.reevaluate(now);
                if self.mode == AppMode::Quit {
                    return Outcome::Idle;
                }
                Outcome::FetchStarted(self.start_fetch(tx, now))
            }
            AppEvent::FetchSucceeded {
                token,
                location,
                forecast,
            } => {
                let outcome = self.apply_forecast(token, location, &forecast, now);
                if matches!(outcome, Outcome::SnapshotAccepted { .. })
                    && self.advisory.enabled
                    && !self.advice_requested
                {
                    self.request_advice(tx);
                }
                outcome
            }
            AppEvent::FetchFailed { token, error } => {
                let outcome = self.handle_fetch_failed(token, &error, now);
                if let Outcome::FetchFailed { retry_in } = outcome
                    && self.watch
                {
                    schedule_retry(tx.clone(), retry_in);
                }
                outcome
            }
            AppEvent::AdviceReady(advice) => {
                info!(strategy = %advice.strategy_name, "advice received");
                self.advice = Some(advice);
                self.advice_error = None;
                Outcome::AdviceReady
            }
            AppEvent::AdviceFailed(error) => {
                warn!(%error, "advice request failed");
                self.advice_error = Some(format!("{ADVICE_ERROR} ({error})"));
                Outcome::AdviceFailed
            }
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
                Outcome::Quit
            }
        }
    }

    /// Derives and publishes a forecast unless a newer fetch has been issued.
    pub fn apply_forecast(
        &mut self,
        token: FetchToken,
        location: Location,
        raw: &RawForecast,
        now: DateTime<Utc>,
    ) -> Outcome {
        if !self.sequencer.accepts(token) {
            debug!(token = token.value(), "discarding stale forecast response");
            return Outcome::Discarded(token);
        }

        let derived = derive(raw, location.clone(), now);
        let score = derived.activity_score;
        let version = self.slot.replace(derived);
        info!(
            token = token.value(),
            version,
            location = %location.name,
            score,
            "forecast snapshot accepted"
        );

        self.location = Some(location);
        self.mode = AppMode::Ready;
        self.last_error = None;
        self.refresh_meta.mark_success(now);
        self.backoff.reset();
        Outcome::SnapshotAccepted { version }
    }

    /// Records one failure. The previous snapshot stays in place.
    pub fn handle_fetch_failed(
        &mut self,
        token: FetchToken,
        error: &str,
        now: DateTime<Utc>,
    ) -> Outcome {
        if !self.sequencer.accepts(token) {
            debug!(token = token.value(), %error, "discarding stale fetch failure");
            return Outcome::Discarded(token);
        }

        self.last_error = Some(format!("{WEATHER_ERROR} ({error})"));
        self.mode = AppMode::Error;
        self.refresh_meta.mark_failure(now);
        let retry_in = self.backoff.next_delay();
        warn!(
            %error,
            failures = self.refresh_meta.consecutive_failures,
            retry_secs = retry_in.as_secs(),
            "forecast fetch failed"
        );
        Outcome::FetchFailed { retry_in }
    }

    fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>, now: DateTime<Utc>) -> FetchToken {
        let token = self.sequencer.issue();
        self.refresh_meta.mark_attempt(now);
        if self.slot.is_empty() {
            self.mode = AppMode::Loading;
        }

        let client = self.forecast.clone();
        let known = self.location.clone();
        let coordinates = self.coordinates;
        let use_geoip = self.use_geoip;
        let tx = tx.clone();
        tokio::spawn(async move {
            let location = match known {
                Some(location) => location,
                None => resolve_location(coordinates, use_geoip, None).await,
            };
            let event = match client.fetch(&location).await {
                Ok(forecast) => AppEvent::FetchSucceeded {
                    token,
                    location,
                    forecast: Box::new(forecast),
                },
                Err(err) => AppEvent::FetchFailed {
                    token,
                    error: err.to_string(),
                },
            };
            let _ = tx.send(event).await;
        });
        token
    }

    fn request_advice(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(derived) = self.slot.current() else {
            return;
        };
        self.advice_requested = true;

        let mut request = AdvisoryRequest::from_snapshot(
            &derived.snapshot,
            self.settings.water_type.clone(),
            self.settings.season.clone(),
        );
        if let Some(bytes) = &self.advisory.spot_image {
            request = request.with_image_bytes(bytes);
        }

        let options = self.advisory.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let client = match options.api_key {
                Some(key) => Ok(AdvisoryClient::new(key)),
                None => AdvisoryClient::from_env(),
            };
            let result = match client {
                Ok(mut client) => {
                    if let Some(url) = options.base_url {
                        client = client.with_base_url(url);
                    }
                    if let Some(model) = options.model {
                        client = client.with_model(model);
                    }
                    client.advise(&request).await
                }
                Err(err) => Err(err),
            };
            let event = match result {
                Ok(advice) => AppEvent::AdviceReady(advice),
                Err(err) => AppEvent::AdviceFailed(err.to_string()),
            };
            let _ = tx.send(event).await;
        });
    }
}
