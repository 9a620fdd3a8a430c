#![forbid(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use config::Config;
use ev_predict::cli::{Cli, Command, PredictArgs};
use ev_predict::error::Error;
use ev_predict::signals::{SignalEvent, report_task, wait_for_signal};
use flume::{Receiver, bounded};
use prediction::{HttpClient, Notifier, PredictionClient, PredictionScreen, SubmitOutcome};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use tracing_log::AsTrace;
use viewer::{AssetCache, FsAssetLoader, LOADING_PLACEHOLDER, SceneViewer, ViewerCommand};

/// Alerts go to stdout next to the results.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) {
        if let Err(err) = writeln!(io::stdout().lock(), "{message}") {
            warn!(%err, message, "could not print alert");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.log_level_filter().as_trace())
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    debug!(config = ?cli);

    let config = match &cli.conffile {
        Some(path) => Config::load(path)?,
        _ => Config::new(),
    };

    match cli.command {
        Command::Predict(args) => predict(&config, &args).await,
        Command::Health => {
            let health = HttpClient::new(&config.api).health().await?;
            let mut out = io::stdout().lock();
            writeln!(out, "status: {}", health.status)?;
            if let Some(message) = health.message {
                writeln!(out, "message: {message}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::ModelInfo => {
            let info = HttpClient::new(&config.api).model_info().await?;
            let mut out = io::stdout().lock();
            writeln!(out, "model type: {}", info.model_type)?;
            writeln!(out, "features: {}", info.features.join(", "))?;
            if let Some(target) = info.target_variable {
                writeln!(out, "target: {target}")?;
            }
            if let Some(status) = info.status {
                writeln!(out, "status: {status}")?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Viewer { asset } => run_viewer(config, asset).await,
        Command::DumpConfig => {
            write!(io::stdout().lock(), "{}", config.to_toml()?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn predict(config: &Config, args: &PredictArgs) -> anyhow::Result<ExitCode> {
    let client = Arc::new(HttpClient::new(&config.api));
    let screen = PredictionScreen::new(client, Arc::new(StdoutNotifier));
    for (field, value) in args.to_form().iter() {
        screen.edit(field, value);
    }

    let outcome = screen.submit().await;
    let mut out = io::stdout().lock();
    match outcome {
        SubmitOutcome::Updated(metrics) => {
            writeln!(out, "{metrics}")?;
            Ok(ExitCode::SUCCESS)
        }
        SubmitOutcome::Invalid(errors) => {
            for (field, message) in errors.iter() {
                writeln!(out, "{field}: {message}")?;
            }
            Ok(ExitCode::from(2))
        }
        // the notifier already showed the alert
        SubmitOutcome::Rejected(_) | SubmitOutcome::TransportFailed => Ok(ExitCode::FAILURE),
        SubmitOutcome::Malformed(reason) => {
            warn!(?reason, "no prediction in reply");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_viewer(mut config: Config, asset: Option<PathBuf>) -> anyhow::Result<ExitCode> {
    if let Some(asset) = asset {
        config.viewer.asset_path = asset;
    }

    let cache = AssetCache::new(Arc::new(FsAssetLoader::new()), 2);
    cache
        .prefetch(&config.viewer.asset_path)
        .context("prefetching scene asset")?;

    let mut viewer = SceneViewer::new(&config, cache)?;
    writeln!(io::stdout().lock(), "{LOADING_PLACEHOLDER}")?;

    let cancel = CancellationToken::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = bounded(8);

    let signal_cancel = cancel.clone();
    let signals = tokio::spawn(async move {
        tokio::select! {
            err = wait_for_signal(&events_tx) => {
                error!(error = ?err, "Error while waiting for signal");
                signal_cancel.cancel();
            }
            _ = signal_cancel.cancelled() => {}
        }
    });

    let router_cancel = cancel.clone();
    let router = tokio::spawn(async move {
        if let Err(err) = route_signals(events_rx, command_tx, &router_cancel).await {
            debug!(%err, "signal routing ended");
        }
    });

    let report = viewer.run_until(cancel.clone(), command_rx).await;
    cancel.cancel();
    let (signals, router) = tokio::join!(signals, router);
    report_task("signals", signals);
    report_task("router", router);

    info!(frames = report.frames, toggles = report.toggles, "viewer finished");
    Ok(ExitCode::SUCCESS)
}

/// Turn signal events into viewer commands until the channel closes.
async fn route_signals(
    events: Receiver<SignalEvent>,
    commands: mpsc::UnboundedSender<ViewerCommand>,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    while let Ok(event) = events.recv_async().await {
        debug!(?event, "Received signal event");
        match event.command() {
            Some(command) => commands
                .send(command)
                .map_err(|_| Error::ViewerGone(event))?,
            None if event == SignalEvent::Interrupt => {
                cancel.cancel();
                break;
            }
            None => {}
        }
    }
    Ok(())
}
