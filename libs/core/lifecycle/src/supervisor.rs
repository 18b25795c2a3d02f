use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::signals::OsSignals;
use crate::{ShutdownReason, ShutdownSignal, Unit, UnitError};

/// Name reported in the outcome when no signal handlers could be installed.
pub const SIGNALS_UNIT: &str = "signals";

/// The first fatal unit error of a run.
#[derive(Debug, Error)]
#[error("unit `{unit}` failed: {error}")]
pub struct UnitFailure {
    pub unit: String,
    #[source]
    pub error: UnitError,
}

/// Aggregated result of a supervised run.
#[derive(Debug)]
pub enum Outcome {
    /// Every unit finished or was stopped cleanly.
    Clean,
    /// At least one unit failed; holds the first failure.
    Failed(UnitFailure),
}

impl Outcome {
    pub fn is_clean(&self) -> bool {
        matches!(self, Self::Clean)
    }

    pub fn failure(&self) -> Option<&UnitFailure> {
        match self {
            Self::Clean => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Failed(_) => ExitCode::FAILURE,
        }
    }

    pub fn into_result(self) -> Result<(), UnitFailure> {
        match self {
            Self::Clean => Ok(()),
            Self::Failed(failure) => Err(failure),
        }
    }
}

/// Runs a set of units under one shared shutdown signal.
///
/// Each unit gets a serve task and a watcher task. The watcher waits for the
/// shared signal and calls the unit's `stop` exactly once. A unit whose serve
/// ends with a non-sentinel error fires the signal, so every other unit is
/// stopped too. [`run`](Self::run) returns only after every task has been
/// joined.
pub struct Supervisor {
    shutdown: ShutdownSignal,
    units: Vec<Arc<dyn Unit>>,
    deadline: Option<Duration>,
}

impl Supervisor {
    pub fn new(shutdown: ShutdownSignal) -> Self {
        Self {
            shutdown,
            units: Vec::new(),
            deadline: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Unit) -> Self {
        self.units.push(Arc::new(unit));
        self
    }

    pub fn with_shared_unit(mut self, unit: Arc<dyn Unit>) -> Self {
        self.units.push(unit);
        self
    }

    /// Abort whatever is still running this long after the signal fired.
    pub fn with_shutdown_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Like [`run`](Self::run), with SIGINT/SIGTERM wired to the shared signal.
    pub async fn run_until_signal(self) -> Outcome {
        let signals = OsSignals::install().map(OsSignals::recv);
        self.run_until(signals).await
    }

    /// Like [`run`](Self::run), firing the shared signal when `signal`
    /// resolves. Without a signal source nothing is started and the run
    /// fails, since the process could never be shut down.
    pub async fn run_until<F>(self, signal: std::io::Result<F>) -> Outcome
    where
        F: Future<Output = &'static str> + Send + 'static,
    {
        let signal = match signal {
            Ok(signal) => signal,
            Err(e) => {
                error!(unit = SIGNALS_UNIT, error = %e, "Failed to install signal handlers");
                return Outcome::Failed(UnitFailure {
                    unit: SIGNALS_UNIT.to_string(),
                    error: UnitError::failed(e),
                });
            }
        };

        let shutdown = self.shutdown.clone();
        let listener = tokio::spawn(async move {
            let name = signal.await;
            info!(signal = name, "Received shutdown signal");
            shutdown.trigger(ShutdownReason::Signal(name));
        });

        let outcome = self.run().await;
        listener.abort();
        outcome
    }

    pub async fn run(self) -> Outcome {
        let first_failure = Arc::new(Mutex::new(None));
        let mut tasks = JoinSet::new();

        for unit in &self.units {
            tasks.spawn(serve_unit(
                Arc::clone(unit),
                self.shutdown.clone(),
                Arc::clone(&first_failure),
            ));
            tasks.spawn(watch_unit(Arc::clone(unit), self.shutdown.clone()));
        }

        info!(units = self.units.len(), "Supervisor started");

        let shutdown = self.shutdown.clone();
        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => {
                    shutdown.triggered().await;
                    tokio::time::sleep(deadline).await;
                }
                None => std::future::pending().await,
            }
        };
        tokio::pin!(expired);
        let mut aborted = false;

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    None => break,
                    Some(Ok(())) => {}
                    Some(Err(e)) if e.is_cancelled() => debug!("Supervised task aborted"),
                    Some(Err(e)) => error!(error = %e, "Supervised task failed to join"),
                },
                _ = &mut expired, if !aborted => {
                    warn!(
                        remaining = tasks.len(),
                        deadline = ?self.deadline,
                        "Shutdown deadline exceeded, aborting remaining units"
                    );
                    tasks.abort_all();
                    aborted = true;
                }
            }
        }

        let outcome = first_failure.lock().ok().and_then(|mut slot| slot.take());

        match outcome {
            Some(failure) => {
                // The unit's own error line is the fatal record.
                info!(unit = %failure.unit, "Supervisor finished with failure");
                Outcome::Failed(failure)
            }
            None => {
                info!("Supervisor finished cleanly");
                Outcome::Clean
            }
        }
    }
}

async fn serve_unit(
    unit: Arc<dyn Unit>,
    shutdown: ShutdownSignal,
    first_failure: Arc<Mutex<Option<UnitFailure>>>,
) {
    let name = unit.name().to_string();
    info!(unit = %name, "Starting unit");

    let result = match AssertUnwindSafe(unit.serve()).catch_unwind().await {
        Ok(result) => result,
        Err(panic) => Err(UnitError::Panicked(panic_message(panic.as_ref()))),
    };

    match result {
        Ok(()) => info!(unit = %name, "Unit finished"),
        Err(e) if e.is_closed() => debug!(unit = %name, "Unit closed"),
        Err(e) => {
            error!(unit = %name, error = %e, "Unit failed");
            if let Ok(mut slot) = first_failure.lock() {
                if slot.is_none() {
                    *slot = Some(UnitFailure {
                        unit: name.clone(),
                        error: e,
                    });
                }
            }
            shutdown.trigger(ShutdownReason::UnitFailed(name));
        }
    }
}

async fn watch_unit(unit: Arc<dyn Unit>, shutdown: ShutdownSignal) {
    shutdown.triggered().await;
    info!(unit = unit.name(), "Stopping unit");
    unit.stop().await;
    info!(unit = unit.name(), "Unit stopped");
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
