pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod resilience;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_support;

use std::io::{self, Write};

use anyhow::{Context, Result};
use app::{
    events::AppEvent,
    settings::{load_runtime_settings, save_runtime_settings},
    state::{AppState, Outcome},
};
use chrono::Utc;
use cli::Cli;
use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    let spot_image = cli
        .image
        .as_deref()
        .map(data::advisory::read_spot_image)
        .transpose()
        .context("cannot use --image")?;

    let (settings, settings_path) = load_runtime_settings(&cli, true);
    let mut app = AppState::new(&cli, settings);
    if let Some(bytes) = spot_image {
        app = app.with_spot_image(bytes);
    }

    let mut stdout = io::stdout();
    let app = run_session(&cli, app, &mut stdout).await?;

    if let Some(path) = settings_path
        && let Err(err) = save_runtime_settings(&path, &app.settings)
    {
        warn!(path = %path.display(), "{err:#}");
    }
    Ok(())
}

/// Drives the event loop until the mode's work is done, writing reports to
/// `out`. One-shot sessions stop after the first snapshot (and advice, when
/// requested); watch sessions run until Ctrl-C.
pub async fn run_session<W: Write>(
    cli: &Cli,
    mut app: AppState,
    out: &mut W,
) -> Result<AppState> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(64);
    tx.send(AppEvent::Bootstrap).await?;

    loop {
        let event = tokio::select! {
            maybe_event = rx.recv() => match maybe_event {
                Some(event) => event,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => AppEvent::Quit,
        };

        let now = Utc::now();
        let outcome = app.handle_event(event, &tx, now);
        if write_outcome(cli, &app, outcome, out)? == Flow::Stop {
            break;
        }
    }

    Ok(app)
}

fn write_outcome<W: Write>(
    cli: &Cli,
    app: &AppState,
    outcome: Outcome,
    out: &mut W,
) -> Result<Flow> {
    let one_shot = !cli.watch;
    let flow = match outcome {
        Outcome::SnapshotAccepted { .. } => {
            if let Some(derived) = app.current() {
                writeln!(out, "{}", ui::render_report(derived, app.settings.trend))?;
                if cli.watch {
                    writeln!(out, "{}", ui::render_status(&app.refresh_meta, Utc::now()))?;
                }
                writeln!(out)?;
            }
            if one_shot && !app.wants_advice() {
                Flow::Stop
            } else {
                Flow::Continue
            }
        }
        Outcome::FetchFailed { .. } => {
            if let Some(message) = &app.last_error {
                writeln!(out, "{}", ui::render_error_banner(message))?;
            }
            if one_shot { Flow::Stop } else { Flow::Continue }
        }
        Outcome::AdviceReady => {
            if let Some(advice) = &app.advice {
                writeln!(out, "{}", ui::render_advice(advice))?;
            }
            if one_shot { Flow::Stop } else { Flow::Continue }
        }
        Outcome::AdviceFailed => {
            if let Some(message) = &app.advice_error {
                writeln!(out, "{}", ui::render_error_banner(message))?;
            }
            if one_shot { Flow::Stop } else { Flow::Continue }
        }
        Outcome::Quit => Flow::Stop,
        Outcome::Idle | Outcome::FetchStarted(_) | Outcome::Discarded(_) => Flow::Continue,
    };
    out.flush()?;
    Ok(flow)
}
