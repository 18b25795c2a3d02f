//! # Lifecycle
//!
//! Runs several independent long-running units in one process and shuts them
//! down together.
//!
//! - [`Unit`]: something that can `serve` until it fails or is stopped.
//! - [`ShutdownSignal`]: the one process-wide cancellation event. It fires at
//!   most once, from an OS signal or from the first unit that fails.
//! - [`Supervisor`]: spawns every unit plus a watcher that calls `stop` when
//!   the signal fires, joins all of them and reports the first failure.
//!
//! ```ignore
//! use lifecycle::{ShutdownSignal, Supervisor};
//!
//! let shutdown = ShutdownSignal::new();
//! let outcome = Supervisor::new(shutdown)
//!     .with_unit(grpc_unit)
//!     .with_unit(gateway_unit)
//!     .run_until_signal()
//!     .await;
//!
//! return outcome.exit_code();
//! ```

mod drain;
mod shutdown;
pub mod signals;
mod supervisor;
mod unit;

pub use drain::Drain;
pub use shutdown::{ShutdownReason, ShutdownSignal};
pub use supervisor::{Outcome, SIGNALS_UNIT, Supervisor, UnitFailure};
pub use unit::{BoxError, Unit, UnitError};
