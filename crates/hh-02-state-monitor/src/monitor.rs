//! # Async Completion Monitor
//!
//! Tracks one long-running state transition (device power, input switch)
//! without blocking the owning driver. The owner starts a run, polls
//! `check_result` on its own schedule and calls `cleanup` to make the
//! monitor reusable.
//!
//! ## Shutdown handshake
//!
//! ```text
//! owner                          worker
//!   | -- watch: shutdown=true --> |
//!   | <-- oneshot: ack ---------- |   (bounded by shutdown_request)
//!   | <-- JoinHandle completes -- |   (bounded by shutdown_exit, else abort)
//!   | clear targets, state=Idle   |
//! ```
//!
//! Targets are cleared only after the handshake, so the worker never sees
//! them change under it.
//!
//! Each run gets its own state cell. A worker that outlives its run (abort
//! only lands at its next `.await`) can only write into the cell of that
//! run, never into the cell of a later one.

use crate::config::MonitorConfig;
use crate::domain::errors::MonitorError;
use crate::domain::state::{CheckResult, MonitorState, SharedState};
use crate::domain::targets::TargetList;
use crate::ports::outbound::CompletionProbe;
use crate::SUBSYSTEM;
use hub_telemetry::{log_event, subsystem_span};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, timeout, Instant};
use tracing::{debug, error, trace, warn, Instrument};

/// Completion monitor bound to one probe and one tokio runtime.
pub struct AsyncCompletionMonitor {
    name: String,
    config: MonitorConfig,
    probe: Arc<dyn CompletionProbe>,
    runtime: Handle,
    state: SharedState,
    targets: Arc<TargetList>,
    worker: Option<WorkerHandle>,
}

struct WorkerHandle {
    shutdown_tx: watch::Sender<bool>,
    ack_rx: oneshot::Receiver<()>,
    join: JoinHandle<()>,
}

impl AsyncCompletionMonitor {
    /// Creates an idle monitor whose workers run on the current tokio
    /// runtime.
    pub fn new(
        name: impl Into<String>,
        probe: impl CompletionProbe,
        config: MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let name = name.into();
        let runtime = Handle::try_current().map_err(|_| MonitorError::NoRuntime(name.clone()))?;
        Self::with_runtime(name, Arc::new(probe), config, runtime)
    }

    /// Creates an idle monitor whose workers run on `runtime`.
    pub fn with_runtime(
        name: impl Into<String>,
        probe: Arc<dyn CompletionProbe>,
        config: MonitorConfig,
        runtime: Handle,
    ) -> Result<Self, MonitorError> {
        config.validate()?;
        let name = name.into();
        debug!(monitor = %name, ?config, "Created completion monitor");
        Ok(Self {
            name,
            config,
            probe,
            runtime,
            state: SharedState::new(),
            targets: Arc::new(TargetList::new()),
            worker: None,
        })
    }

    /// Starts a run against a private copy of `targets`.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` unless the monitor is `Idle`. Nothing changes in
    /// that case.
    pub fn start(&mut self, targets: &TargetList, flag: bool) -> Result<(), MonitorError> {
        let current = self.state.load();
        if current != MonitorState::Idle {
            return Err(MonitorError::AlreadyStarted {
                name: self.name.clone(),
                state: current,
            });
        }

        self.targets = Arc::new(targets.clone());
        self.state = SharedState::new();
        self.state.store(MonitorState::Waiting);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (ack_tx, ack_rx) = oneshot::channel();
        let worker = Worker {
            probe: Arc::clone(&self.probe),
            targets: Arc::clone(&self.targets),
            state: self.state.clone(),
            flag,
            poll_interval: self.config.poll_interval(),
            wait_limit: self.config.wait_limit(),
        };
        let span = subsystem_span!(
            "completion_monitor",
            subsystem = SUBSYSTEM,
            monitor = %self.name
        );
        let join = self
            .runtime
            .spawn(worker.run(shutdown_rx, ack_tx).instrument(span));

        self.worker = Some(WorkerHandle {
            shutdown_tx,
            ack_rx,
            join,
        });
        debug!(
            monitor = %self.name,
            targets = self.targets.len(),
            flag,
            "Monitor started"
        );
        Ok(())
    }

    /// Non-blocking poll of a started run.
    ///
    /// # Errors
    ///
    /// `NotReady` while `Idle`.
    pub fn check_result(&self) -> Result<CheckResult, MonitorError> {
        match self.state.load() {
            MonitorState::Idle => Err(MonitorError::NotReady {
                name: self.name.clone(),
                state: MonitorState::Idle,
            }),
            MonitorState::Waiting => Ok(CheckResult::Waiting),
            MonitorState::Complete => Ok(CheckResult::Complete),
            MonitorState::Timeout => Ok(CheckResult::Timeout),
        }
    }

    /// Stops the worker and returns the monitor to `Idle`.
    ///
    /// A no-op while `Idle`. Worker shutdown is bounded by the configured
    /// request and exit bounds; failures are logged and the monitor is
    /// reset regardless.
    pub async fn cleanup(&mut self) {
        if self.state.load() == MonitorState::Idle {
            return;
        }
        if let Some(worker) = self.worker.take() {
            self.stop_worker(worker).await;
        }
        self.targets = Arc::new(TargetList::new());
        self.state.store(MonitorState::Idle);
        debug!(monitor = %self.name, "Monitor reset to idle");
    }

    async fn stop_worker(&self, worker: WorkerHandle) {
        let WorkerHandle {
            shutdown_tx,
            ack_rx,
            mut join,
        } = worker;

        if shutdown_tx.send(true).is_err() {
            trace!(monitor = %self.name, "Worker already finished");
        }

        match timeout(self.config.shutdown_request(), ack_rx).await {
            Ok(Ok(())) => trace!(monitor = %self.name, "Worker acknowledged shutdown"),
            Ok(Err(_)) => trace!(monitor = %self.name, "Worker ended before shutdown request"),
            Err(_) => warn!(
                monitor = %self.name,
                bound = ?self.config.shutdown_request(),
                "Worker did not acknowledge shutdown"
            ),
        }

        match timeout(self.config.shutdown_exit(), &mut join).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.is_panic() => error!(monitor = %self.name, "Worker panicked"),
            Ok(Err(e)) => warn!(monitor = %self.name, error = %e, "Worker did not finish cleanly"),
            Err(_) => {
                warn!(
                    monitor = %self.name,
                    bound = ?self.config.shutdown_exit(),
                    "Worker did not exit, aborting"
                );
                join.abort();
            }
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state.load()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Targets of the current run; empty while `Idle`.
    pub fn targets(&self) -> &TargetList {
        &self.targets
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

impl Drop for AsyncCompletionMonitor {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.join.abort();
        }
    }
}

impl std::fmt::Debug for AsyncCompletionMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncCompletionMonitor")
            .field("name", &self.name)
            .field("state", &self.state.load())
            .field("targets", &self.targets.len())
            .finish_non_exhaustive()
    }
}

/// How a worker run ended.
enum Outcome {
    Shutdown,
    Finished(MonitorState),
}

struct Worker {
    probe: Arc<dyn CompletionProbe>,
    targets: Arc<TargetList>,
    state: SharedState,
    flag: bool,
    poll_interval: Duration,
    wait_limit: Duration,
}

impl Worker {
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>, ack_tx: oneshot::Sender<()>) {
        match self.poll_until_done(&mut shutdown_rx).await {
            Outcome::Shutdown => {
                let _ = ack_tx.send(());
                debug!("Shutdown signal received");
            }
            Outcome::Finished(terminal) => {
                if !self.state.transition(MonitorState::Waiting, terminal) {
                    return;
                }
                match terminal {
                    MonitorState::Timeout => log_event!(
                        warn,
                        SUBSYSTEM,
                        "Targets not reached before wait limit",
                        wait_limit = ?self.wait_limit
                    ),
                    _ => log_event!(info, SUBSYSTEM, "Targets reached", targets = self.targets.len()),
                }
            }
        }
    }

    async fn poll_until_done(&self, shutdown_rx: &mut watch::Receiver<bool>) -> Outcome {
        let deadline = Instant::now() + self.wait_limit;
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => return Outcome::Shutdown,
                _ = sleep_until(deadline) => return Outcome::Finished(MonitorState::Timeout),
                result = self.probe.probe(&self.targets, self.flag) => match result {
                    Ok(true) => return Outcome::Finished(MonitorState::Complete),
                    Ok(false) => trace!("Targets not reached yet"),
                    Err(e) => warn!(error = %e, "Probe failed, retrying"),
                },
            }

            let next_poll = (Instant::now() + self.poll_interval).min(deadline);
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => return Outcome::Shutdown,
                _ = sleep_until(next_poll) => {}
            }
        }
    }
}
