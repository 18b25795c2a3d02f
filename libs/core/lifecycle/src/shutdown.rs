use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Why the process is shutting down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// An OS signal was received (`"SIGINT"`, `"SIGTERM"`).
    Signal(&'static str),
    /// The named unit returned a fatal error.
    UnitFailed(String),
    /// Shutdown requested programmatically.
    Requested,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signal(name) => write!(f, "received {name}"),
            Self::UnitFailed(unit) => write!(f, "unit `{unit}` failed"),
            Self::Requested => f.write_str("shutdown requested"),
        }
    }
}

/// Process-wide, level-triggered cancellation event.
///
/// Cloning is cheap and every clone observes the same event. The signal fires
/// at most once: the first [`trigger`](Self::trigger) records its reason and
/// wakes every waiter, later calls are no-ops. Waiters that subscribe after
/// the signal fired return immediately.
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<Option<ShutdownReason>>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal. Returns `true` only for the call that actually fired it.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        let mut fired = None;
        self.tx.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            fired = Some(reason.to_string());
            *state = Some(reason);
            true
        });

        match fired {
            Some(reason) => {
                info!(%reason, "Initiating graceful shutdown");
                true
            }
            None => {
                debug!("Shutdown already in progress, ignoring trigger");
                false
            }
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// The reason recorded by the first trigger.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.tx.borrow().clone()
    }

    /// Resolves once the signal has fired.
    pub async fn triggered(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a closed channel.
        let _ = rx.wait_for(Option::is_some).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownSignal")
            .field("reason", &*self.tx.borrow())
            .finish()
    }
}
