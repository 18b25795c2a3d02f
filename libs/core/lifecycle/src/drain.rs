use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use crate::{ShutdownReason, ShutdownSignal, UnitError};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Serve/stop bookkeeping shared by the concrete units.
///
/// A unit calls [`begin`](Self::begin) when `serve` starts, passes
/// [`stop_requested`](Self::stop_requested) to its server as the graceful
/// shutdown future and calls [`finish`](Self::finish) once it has drained.
/// [`request_stop`](Self::request_stop) implements `Unit::stop`: it fires the
/// local stop, then waits until the unit has finished. A unit that never
/// started is marked stopped immediately and any later `begin` is rejected.
#[derive(Debug)]
pub struct Drain {
    state: AtomicU8,
    stop: ShutdownSignal,
    done: ShutdownSignal,
    grace: Duration,
}

impl Drain {
    pub fn new(grace: Duration) -> Self {
        Self {
            state: AtomicU8::new(IDLE),
            stop: ShutdownSignal::new(),
            done: ShutdownSignal::new(),
            grace,
        }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Marks the unit running. Fails with [`UnitError::Closed`] if it was
    /// already started or already stopped.
    pub fn begin(&self) -> Result<(), UnitError> {
        self.state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| UnitError::Closed)
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_triggered()
    }

    /// Resolves once stop has been requested.
    pub async fn stop_requested(&self) {
        self.stop.triggered().await
    }

    /// Owned handle to the stop event, for servers that need a `'static` future.
    pub fn stop_signal(&self) -> ShutdownSignal {
        self.stop.clone()
    }

    /// Resolves `grace` after stop was requested.
    pub async fn grace_expired(&self) {
        self.stop.triggered().await;
        tokio::time::sleep(self.grace).await;
    }

    pub fn finish(&self) {
        self.state.store(STOPPED, Ordering::SeqCst);
        self.done.trigger(ShutdownReason::Requested);
    }

    /// Request stop and wait for the unit to drain. Idempotent.
    pub async fn request_stop(&self) {
        self.stop.trigger(ShutdownReason::Requested);

        if self
            .state
            .compare_exchange(IDLE, STOPPED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.done.trigger(ShutdownReason::Requested);
        }

        self.done.triggered().await;
    }
}
