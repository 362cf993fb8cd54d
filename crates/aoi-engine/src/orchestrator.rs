//! Main capture session orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use aoi_analysis::Dispatch;
use aoi_capture::{sample, CaptureError, MediaBackend, SampledFrame, SourceRegistry};
use aoi_ipc::{
    CaptureState, EngineCommand, EngineEvent, LoopStatus, SourceKind, SourceRequest, StopReason,
};

use crate::cancel::CancelToken;
use crate::ledger::HistoryLedger;

/// Default quiescence interval between cycles.
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 1500;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed wait after each cycle settles, before the next one.
    pub cycle_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cycle_interval: Duration::from_millis(DEFAULT_CYCLE_INTERVAL_MS),
        }
    }
}

/// The capture engine.
///
/// Owns the source registry, the history ledger, and at most one
/// capture loop task per session. Driven entirely through
/// [`EngineCommand`]s; observations flow back as [`EngineEvent`]s.
pub struct Engine<B, D>
where
    B: MediaBackend,
    D: Dispatch + 'static,
{
    command_rx: Receiver<EngineCommand>,
    event_tx: Sender<EngineEvent>,
    backend: B,
    dispatcher: Arc<D>,
    sources: Arc<Mutex<SourceRegistry>>,
    ledger: Arc<Mutex<HistoryLedger>>,
    state: Arc<RwLock<CaptureState>>,
    cancel: CancelToken,
    loop_task: Option<JoinHandle<()>>,
    config: EngineConfig,
}

impl<B, D> Engine<B, D>
where
    B: MediaBackend,
    D: Dispatch + 'static,
{
    /// Create a new engine.
    pub fn new(
        backend: B,
        dispatcher: D,
        config: EngineConfig,
        command_rx: Receiver<EngineCommand>,
        event_tx: Sender<EngineEvent>,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            backend,
            dispatcher: Arc::new(dispatcher),
            sources: Arc::new(Mutex::new(SourceRegistry::new())),
            ledger: Arc::new(Mutex::new(HistoryLedger::new())),
            state: Arc::new(RwLock::new(CaptureState::Idle)),
            cancel: CancelToken::new(),
            loop_task: None,
            config,
        }
    }

    /// Run the engine until shutdown or until the command channel
    /// closes.
    #[instrument(name = "engine_run", skip(self))]
    pub async fn run(&mut self) {
        info!("engine starting");
        self.send_event(EngineEvent::Ready);

        while let Some(command) = self.command_rx.recv().await {
            if !self.handle_command(command).await {
                break;
            }
        }

        self.stop_capture(StopReason::UserRequested).await;
        self.sources.lock().release_all();
        info!("engine stopped");
    }

    /// Handle a command. Returns false if the engine should stop.
    async fn handle_command(&mut self, command: EngineCommand) -> bool {
        debug!(?command, "handling command");

        match command {
            EngineCommand::AcquireSource(request) => self.acquire_source(request),
            EngineCommand::ReleaseSource(kind) => self.release_source(kind),
            EngineCommand::StartCapture => self.start_capture(),
            EngineCommand::StopCapture => self.stop_capture(StopReason::UserRequested).await,
            EngineCommand::GetState => self.send_state(),
            EngineCommand::GetLedger => self.send_ledger(),
            EngineCommand::Shutdown => {
                self.stop_capture(StopReason::UserRequested).await;
                self.sources.lock().release_all();
                self.send_event(EngineEvent::Shutdown);
                return false;
            }
        }

        true
    }

    /// Acquire a source. Failures surface immediately as events; they
    /// never touch an already-installed handle.
    #[instrument(name = "acquire_source", skip(self, request), fields(kind = ?request.kind()))]
    fn acquire_source(&mut self, request: SourceRequest) {
        let kind = request.kind();
        let result = self.sources.lock().acquire(&self.backend, &request);

        match result {
            Ok(()) => {
                let active = self.sources.lock().active_kind();
                self.send_event(EngineEvent::ActiveSourceChanged { kind: active });
            }
            Err(e) => {
                error!("acquisition failed: {e}");
                self.send_event(EngineEvent::SourceError {
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    fn release_source(&mut self, kind: SourceKind) {
        self.sources.lock().release(kind);
        let active = self.sources.lock().active_kind();
        self.send_event(EngineEvent::ActiveSourceChanged { kind: active });
    }

    /// Start the capture loop. Idempotent while running or stopping.
    #[instrument(name = "start_capture", skip(self))]
    fn start_capture(&mut self) {
        {
            let state = self.state.read();
            if state.is_running() || state.is_stopping() {
                debug!("already running or stopping, ignoring start command");
                return;
            }
        }

        info!("starting capture session");

        // Fresh token per session: a task left over from an earlier
        // session keeps observing its own, already-raised flag.
        self.cancel = CancelToken::new();
        transition(
            &self.state,
            &self.event_tx,
            CaptureState::Running {
                status: LoopStatus::WaitingForSource,
            },
        );

        self.loop_task = Some(tokio::spawn(capture_loop(
            Arc::clone(&self.sources),
            Arc::clone(&self.ledger),
            Arc::clone(&self.dispatcher),
            self.cancel.clone(),
            Arc::clone(&self.state),
            self.event_tx.clone(),
            self.config.cycle_interval,
        )));
    }

    /// Stop the capture loop and drain the in-flight cycle. Idempotent
    /// while idle.
    #[instrument(name = "stop_capture", skip(self))]
    async fn stop_capture(&mut self, reason: StopReason) {
        {
            let state = self.state.read();
            if state.is_idle() {
                debug!("already idle, ignoring stop command");
                return;
            }
        }

        info!(?reason, "stopping capture session");
        self.cancel.cancel();
        transition(
            &self.state,
            &self.event_tx,
            CaptureState::Stopping { reason },
        );

        if let Some(handle) = self.loop_task.take() {
            let _ = handle.await;
        }

        transition(&self.state, &self.event_tx, CaptureState::Idle);
        info!("capture session stopped");
    }

    fn send_state(&self) {
        let state = self.state.read().clone();
        self.send_event(EngineEvent::StateChanged {
            previous: state.clone(),
            current: state,
        });
    }

    fn send_ledger(&self) {
        let (entries, pending) = self.ledger.lock().snapshot();
        self.send_event(EngineEvent::LedgerUpdated { entries, pending });
    }

    fn send_event(&self, event: EngineEvent) {
        try_send(&self.event_tx, event);
    }
}

impl<B, D> Drop for Engine<B, D>
where
    B: MediaBackend,
    D: Dispatch + 'static,
{
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// One step of a capture cycle.
enum Cycle {
    /// A frame was sampled and is ready to dispatch.
    Frame(SampledFrame),

    /// No acquired source resolved.
    NoSource,

    /// The resolved source is not producing yet.
    NoVideo,

    /// A finite source finished playback.
    End,
}

/// The capture loop: one task per session.
///
/// Cycles strictly in sequence; the next frame is never sampled until
/// the previous dispatch has settled, which is what bounds the remote
/// service to a single outstanding request. The cancellation flag is
/// read at the top of every cycle and again right after the dispatch
/// suspension point.
async fn capture_loop<D: Dispatch>(
    sources: Arc<Mutex<SourceRegistry>>,
    ledger: Arc<Mutex<HistoryLedger>>,
    dispatcher: Arc<D>,
    cancel: CancelToken,
    state: Arc<RwLock<CaptureState>>,
    event_tx: Sender<EngineEvent>,
    cycle_interval: Duration,
) {
    debug!("capture loop starting");

    let started = Instant::now();
    let mut cycles: u64 = 0;
    let mut completed: u64 = 0;
    let mut skipped: u64 = 0;
    let mut last_log_time = Instant::now();
    let mut exhausted = false;

    while !cancel.is_cancelled() {
        cycles += 1;

        // Periodic status logging every 10 seconds
        if last_log_time.elapsed() >= Duration::from_secs(10) {
            info!(
                "capture stats: cycles={}, completed={}, skipped={}, uptime={:.1}s",
                cycles,
                completed,
                skipped,
                started.elapsed().as_secs_f32()
            );
            last_log_time = Instant::now();
        }

        // Resolve and sample under the registry lock. The lock is
        // never held across an await.
        let step = {
            let mut registry = sources.lock();
            match registry.active_mut() {
                None => Cycle::NoSource,
                Some(handle) => match sample(handle) {
                    Ok(frame) => Cycle::Frame(frame),
                    Err(CaptureError::SourceExhausted) => Cycle::End,
                    Err(CaptureError::NotReady) => Cycle::NoVideo,
                    Err(e) => {
                        warn!("sample failed: {e}");
                        Cycle::NoVideo
                    }
                },
            }
        };

        match step {
            Cycle::NoSource => {
                skipped += 1;
                set_status(&state, &event_tx, LoopStatus::WaitingForSource);
            }
            Cycle::NoVideo => {
                skipped += 1;
                set_status(&state, &event_tx, LoopStatus::WaitingForVideo);
            }
            Cycle::End => {
                exhausted = true;
                break;
            }
            Cycle::Frame(frame) => {
                set_status(&state, &event_tx, LoopStatus::Analyzing);
                {
                    let mut ledger = ledger.lock();
                    ledger.set_pending(frame.captured_at);
                    emit_ledger(&event_tx, &ledger);
                }

                let outcome = dispatcher.dispatch(frame).await;

                if cancel.is_cancelled() {
                    // The session stopped while the call was in
                    // flight; the late result must not reach any
                    // ledger.
                    debug!("discarding late outcome from cancelled session");
                    let mut ledger = ledger.lock();
                    ledger.clear_pending();
                    emit_ledger(&event_tx, &ledger);
                    break;
                }

                completed += 1;
                let mut ledger = ledger.lock();
                ledger.resolve_pending(outcome);
                emit_ledger(&event_tx, &ledger);
            }
        }

        tokio::time::sleep(cycle_interval).await;
    }

    if exhausted {
        info!("source exhausted, ending session");
        transition(
            &state,
            &event_tx,
            CaptureState::Stopping {
                reason: StopReason::SourceExhausted,
            },
        );
        transition(&state, &event_tx, CaptureState::Idle);
    }

    info!(
        "capture loop stopped: cycles={}, completed={}, skipped={}",
        cycles, completed, skipped
    );
}

fn transition(
    state: &RwLock<CaptureState>,
    event_tx: &Sender<EngineEvent>,
    new_state: CaptureState,
) {
    let previous = {
        let mut state = state.write();
        std::mem::replace(&mut *state, new_state.clone())
    };

    debug!(
        previous = previous.name(),
        current = new_state.name(),
        "state transition"
    );

    try_send(
        event_tx,
        EngineEvent::StateChanged {
            previous,
            current: new_state,
        },
    );
}

/// Update the running status, emitting only on change. Ignored unless
/// the session is `Running`.
fn set_status(state: &RwLock<CaptureState>, event_tx: &Sender<EngineEvent>, status: LoopStatus) {
    let previous = {
        let mut state = state.write();
        match &*state {
            CaptureState::Running { status: current } if *current != status => {
                std::mem::replace(&mut *state, CaptureState::Running { status })
            }
            _ => return,
        }
    };

    debug!(status = status.message(), "loop status");
    try_send(
        event_tx,
        EngineEvent::StateChanged {
            previous,
            current: CaptureState::Running { status },
        },
    );
}

fn emit_ledger(event_tx: &Sender<EngineEvent>, ledger: &HistoryLedger) {
    let (entries, pending) = ledger.snapshot();
    try_send(event_tx, EngineEvent::LedgerUpdated { entries, pending });
}

fn try_send(event_tx: &Sender<EngineEvent>, event: EngineEvent) {
    if let Err(e) = event_tx.try_send(event) {
        warn!("failed to send event: {e}");
    }
}
