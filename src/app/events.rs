use std::time::Duration;

use rand::Rng;
use tokio::{sync::mpsc::Sender, time::sleep};

use crate::{
    app::slot::FetchToken,
    data::advisory::TacticalAdvice,
    domain::weather::{Location, RawForecast},
};

/// Shortest refresh period the refresh task will honor.
pub const MIN_REFRESH: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickRefresh,
    FetchSucceeded {
        token: FetchToken,
        location: Location,
        forecast: Box<RawForecast>,
    },
    FetchFailed {
        token: FetchToken,
        error: String,
    },
    AdviceReady(TacticalAdvice),
    AdviceFailed(String),
    Quit,
}

/// `base` scaled by a random factor in `[0.9, 1.1)`.
#[must_use]
pub fn jittered(base: Duration) -> Duration {
    let jitter = rand::rng().random_range(-0.1f64..0.1f64);
    base.mul_f64(1.0 + jitter).max(Duration::from_secs(1))
}

pub fn start_refresh_task(tx: Sender<AppEvent>, every: Duration) {
    tokio::spawn(async move {
        let base = every.max(MIN_REFRESH);
        loop {
            sleep(jittered(base)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}

pub fn schedule_retry(tx: Sender<AppEvent>, delay: Duration) {
    tokio::spawn(async move {
        sleep(delay.max(Duration::from_secs(1))).await;
        let _ = tx.send(AppEvent::TickRefresh).await;
    });
}
