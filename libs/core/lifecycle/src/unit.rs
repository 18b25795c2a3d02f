use async_trait::async_trait;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors a unit can end its `serve` with.
#[derive(Debug, Error)]
pub enum UnitError {
    /// The unit was stopped on purpose. Counts as success.
    #[error("unit closed")]
    Closed,

    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("failed to connect to {target}: {source}")]
    Connect {
        target: &'static str,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Failed(BoxError),

    #[error("unit panicked: {0}")]
    Panicked(String),
}

impl UnitError {
    pub fn failed(error: impl Into<BoxError>) -> Self {
        Self::Failed(error.into())
    }

    pub fn connect(target: &'static str, error: impl Into<BoxError>) -> Self {
        Self::Connect {
            target,
            source: error.into(),
        }
    }

    /// Whether this is the deliberate-stop sentinel.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// An independently startable and stoppable service inside the process.
///
/// `serve` blocks until the unit fails or is stopped. `stop` asks a running
/// unit to drain and returns once it has; it must be safe to call before
/// `serve` ran, after the unit already finished, and more than once.
#[async_trait]
pub trait Unit: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn serve(&self) -> Result<(), UnitError>;

    async fn stop(&self);
}
