//! Headless harness for the inspection capture engine.
//!
//! Stands in for a desktop shell: wires the command/event channels,
//! spawns the engine with the synthetic source backend, and streams
//! ledger updates to the log until the source runs out or Ctrl-C.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aoi_analysis::{AnalysisClient, DEFAULT_REQUEST_TIMEOUT};
use aoi_capture::SyntheticBackend;
use aoi_engine::{Engine, EngineConfig, DEFAULT_CYCLE_INTERVAL_MS};
use aoi_ipc::{
    command_channel, event_channel, AnalysisOutcome, EngineCommand, EngineEvent, SourceRequest,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceArg {
    Camera,
    Screen,
    File,
    Url,
}

#[derive(Debug, Parser)]
#[command(
    name = "aoi-monitor",
    about = "Drive the live inspection loop against a defect-classification endpoint"
)]
struct Args {
    /// Defect-classification endpoint URL.
    #[arg(long)]
    endpoint: String,

    /// Quiescence interval between cycles, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_CYCLE_INTERVAL_MS)]
    interval_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    timeout_secs: u64,

    /// Frames the synthetic source produces before ending.
    #[arg(long, default_value_t = 20)]
    frames: u64,

    /// Which source kind to drive.
    #[arg(long, value_enum, default_value_t = SourceArg::Camera)]
    source: SourceArg,
}

impl Args {
    fn source_request(&self) -> SourceRequest {
        match self.source {
            SourceArg::Camera => SourceRequest::Camera { device: None },
            SourceArg::Screen => SourceRequest::ScreenShare { display: None },
            SourceArg::File => SourceRequest::FileUpload {
                path: "synthetic://panel-run".into(),
            },
            SourceArg::Url => SourceRequest::RemoteUrl {
                url: "synthetic://line-feed".into(),
            },
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "aoi_monitor=debug,aoi_engine=debug,aoi_capture=debug,aoi_analysis=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    info!(endpoint = %args.endpoint, "inspection monitor starting");

    let client = AnalysisClient::new(&args.endpoint, Duration::from_secs(args.timeout_secs))?;
    let backend = SyntheticBackend::with_frame_budget(args.frames);

    let (command_tx, command_rx) = command_channel();
    let (event_tx, mut event_rx) = event_channel();

    let config = EngineConfig {
        cycle_interval: Duration::from_millis(args.interval_ms),
    };
    let mut engine = Engine::new(backend, client, config, command_rx, event_tx);
    let engine_task = tokio::spawn(async move { engine.run().await });

    command_tx
        .send(EngineCommand::AcquireSource(args.source_request()))
        .await?;
    command_tx.send(EngineCommand::StartCapture).await?;

    let mut last_completed: Option<DateTime<Utc>> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                let _ = command_tx.send(EngineCommand::Shutdown).await;
            }
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    EngineEvent::Shutdown => break,
                    EngineEvent::StateChanged { previous, current } => {
                        debug!(from = previous.name(), to = current.name(), "session state");
                        if previous.is_stopping() && current.is_idle() {
                            let _ = command_tx.send(EngineCommand::Shutdown).await;
                        }
                    }
                    EngineEvent::ActiveSourceChanged { kind } => match kind {
                        Some(kind) => info!(source = kind.name(), "active source"),
                        None => info!("no active source"),
                    },
                    EngineEvent::SourceError { kind, message } => {
                        warn!(kind = kind.name(), "source error: {message}");
                    }
                    EngineEvent::LedgerUpdated { entries, pending } => {
                        if let Some(entry) = entries.first() {
                            if last_completed != Some(entry.completed_at) {
                                last_completed = Some(entry.completed_at);
                                print_entry(&entry.outcome);
                            }
                        }
                        if pending.is_some() {
                            debug!("analysis in flight");
                        }
                    }
                    EngineEvent::Ready => debug!("engine ready"),
                }
            }
        }
    }

    engine_task.await?;
    info!("inspection monitor stopped");
    Ok(())
}

fn print_entry(outcome: &AnalysisOutcome) {
    match outcome {
        AnalysisOutcome::Success(report) => info!(
            "{} [{}] {:.1}% - {}",
            report.defect_type,
            report.severity.label(),
            report.confidence,
            report.mitigation
        ),
        AnalysisOutcome::ApiError { message } => warn!("analysis rejected: {message}"),
        AnalysisOutcome::TransportError { message } => warn!("analysis unreachable: {message}"),
    }
}
