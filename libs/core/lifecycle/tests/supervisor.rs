use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lifecycle::{
    Drain, Outcome, SIGNALS_UNIT, ShutdownReason, ShutdownSignal, Supervisor, Unit, UnitError,
};
use test_utils::LogCapture;

#[derive(Clone, Copy)]
enum Script {
    /// Serve until stopped, then return the sentinel.
    UntilStopped,
    /// Fail on its own after the delay.
    FailAfter(Duration),
    /// Serve until stopped, then report an error anyway.
    FailOnStop,
    Panic,
    /// Never finishes draining.
    Hang,
}

struct ScriptedUnit {
    name: &'static str,
    script: Script,
    drain: Drain,
    stops: AtomicUsize,
}

impl ScriptedUnit {
    fn new(name: &'static str, script: Script) -> Arc<Self> {
        Arc::new(Self {
            name,
            script,
            drain: Drain::new(Duration::from_secs(1)),
            stops: AtomicUsize::new(0),
        })
    }

    fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Unit for ScriptedUnit {
    fn name(&self) -> &str {
        self.name
    }

    async fn serve(&self) -> Result<(), UnitError> {
        match self.script {
            Script::UntilStopped => {
                self.drain.begin()?;
                self.drain.stop_requested().await;
                self.drain.finish();
                Err(UnitError::Closed)
            }
            Script::FailAfter(delay) => {
                self.drain.begin()?;
                tokio::time::sleep(delay).await;
                self.drain.finish();
                Err(UnitError::failed(format!("{} exploded", self.name)))
            }
            Script::FailOnStop => {
                self.drain.begin()?;
                self.drain.stop_requested().await;
                self.drain.finish();
                Err(UnitError::failed("failed while stopping"))
            }
            Script::Panic => panic!("serve panicked"),
            Script::Hang => {
                self.drain.begin()?;
                std::future::pending().await
            }
        }
    }

    async fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.drain.request_stop().await;
    }
}

fn supervise(shutdown: &ShutdownSignal, units: &[Arc<ScriptedUnit>]) -> Supervisor {
    units.iter().fold(Supervisor::new(shutdown.clone()), |sup, unit| {
        sup.with_shared_unit(Arc::clone(unit) as Arc<dyn Unit>)
    })
}

async fn within<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("supervisor did not finish in time")
}

#[tokio::test]
async fn test_sentinel_shutdown_is_clean() {
    let shutdown = ShutdownSignal::new();
    let grpc = ScriptedUnit::new("grpc", Script::UntilStopped);
    let gateway = ScriptedUnit::new("gateway", Script::UntilStopped);

    let run = tokio::spawn(supervise(&shutdown, &[grpc.clone(), gateway.clone()]).run());
    tokio::time::sleep(Duration::from_millis(20)).await;
    shutdown.trigger(ShutdownReason::Signal("SIGTERM"));

    let outcome = within(run).await.unwrap();
    assert!(outcome.is_clean());
    assert_eq!(outcome.exit_code(), std::process::ExitCode::SUCCESS);
    assert_eq!(grpc.stops(), 1);
    assert_eq!(gateway.stops(), 1);
}

#[tokio::test]
async fn test_failing_unit_stops_every_other_unit_once() {
    let shutdown = ShutdownSignal::new();
    let grpc = ScriptedUnit::new("grpc", Script::UntilStopped);
    let gateway = ScriptedUnit::new("gateway", Script::UntilStopped);
    let tasks = ScriptedUnit::new("tasks", Script::FailAfter(Duration::from_millis(10)));

    let outcome = within(
        supervise(&shutdown, &[grpc.clone(), gateway.clone(), tasks.clone()]).run(),
    )
    .await;

    let failure = outcome.failure().expect("outcome should carry the failure");
    assert_eq!(failure.unit, "tasks");
    assert!(failure.error.to_string().contains("tasks exploded"));
    assert_eq!(
        shutdown.reason(),
        Some(ShutdownReason::UnitFailed("tasks".into()))
    );
    assert_eq!(grpc.stops(), 1);
    assert_eq!(gateway.stops(), 1);
    assert_eq!(tasks.stops(), 1);
    assert_eq!(outcome.into_result().unwrap_err().unit, "tasks");
}

#[tokio::test]
async fn test_first_error_wins() {
    let shutdown = ShutdownSignal::new();
    let first = ScriptedUnit::new("first", Script::FailAfter(Duration::from_millis(10)));
    let second = ScriptedUnit::new("second", Script::FailOnStop);

    let outcome = within(supervise(&shutdown, &[first, second.clone()]).run()).await;

    assert_eq!(outcome.failure().map(|f| f.unit.as_str()), Some("first"));
    assert_eq!(second.stops(), 1);
}

#[tokio::test]
async fn test_panicking_unit_is_a_failure() {
    let shutdown = ShutdownSignal::new();
    let healthy = ScriptedUnit::new("grpc", Script::UntilStopped);
    let broken = ScriptedUnit::new("tasks", Script::Panic);

    let outcome = within(supervise(&shutdown, &[healthy.clone(), broken]).run()).await;

    match outcome {
        Outcome::Failed(failure) => {
            assert_eq!(failure.unit, "tasks");
            assert!(matches!(failure.error, UnitError::Panicked(ref msg) if msg == "serve panicked"));
        }
        Outcome::Clean => panic!("panic should fail the run"),
    }
    assert_eq!(healthy.stops(), 1);
}

#[tokio::test]
async fn test_signal_before_serve_is_harmless() {
    let shutdown = ShutdownSignal::new();
    shutdown.trigger(ShutdownReason::Requested);
    let unit = ScriptedUnit::new("gateway", Script::UntilStopped);

    let outcome = within(supervise(&shutdown, &[unit.clone()]).run()).await;

    // Either serve saw the stop and returned the sentinel, or stop won the
    // race and serve was rejected with the sentinel. Both are clean.
    assert!(outcome.is_clean());
    assert_eq!(unit.stops(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_deadline_aborts_stuck_units() {
    let shutdown = ShutdownSignal::new();
    let stuck = ScriptedUnit::new("tasks", Script::Hang);
    let healthy = ScriptedUnit::new("grpc", Script::UntilStopped);

    let run = tokio::spawn(
        supervise(&shutdown, &[stuck.clone(), healthy.clone()])
            .with_shutdown_deadline(Some(Duration::from_secs(3)))
            .run(),
    );
    tokio::time::sleep(Duration::from_millis(10)).await;
    shutdown.trigger(ShutdownReason::Signal("SIGINT"));

    let outcome = run.await.unwrap();
    assert!(outcome.is_clean());
    assert_eq!(stuck.stops(), 1);
    assert_eq!(healthy.stops(), 1);
}

#[tokio::test]
async fn test_double_stop_on_finished_unit() {
    let unit = ScriptedUnit::new("grpc", Script::FailAfter(Duration::from_millis(1)));
    assert!(unit.serve().await.is_err());

    within(unit.stop()).await;
    within(unit.stop()).await;
    assert_eq!(unit.stops(), 2);
}

#[tokio::test]
async fn test_failure_is_logged_at_error_once() {
    let logs = LogCapture::new();
    let _guard = logs.install();

    let shutdown = ShutdownSignal::new();
    let healthy = ScriptedUnit::new("grpc", Script::UntilStopped);
    let tasks = ScriptedUnit::new("tasks", Script::FailAfter(Duration::from_millis(10)));

    let outcome = within(supervise(&shutdown, &[healthy, tasks]).run()).await;
    assert!(!outcome.is_clean());

    let errors: Vec<_> = logs
        .records()
        .into_iter()
        .filter(|record| record["level"] == "ERROR")
        .collect();
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors[0]["unit"], "tasks");
    assert_eq!(errors[0]["message"], "Unit failed");

    let summary = logs.records_with_message("Supervisor finished with failure");
    assert_eq!(summary[0]["level"], "INFO");
}

#[tokio::test]
async fn test_signal_stops_every_unit() {
    let shutdown = ShutdownSignal::new();
    let grpc = ScriptedUnit::new("grpc", Script::UntilStopped);
    let gateway = ScriptedUnit::new("gateway", Script::UntilStopped);

    let signal = Ok(async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        "SIGTERM"
    });
    let supervisor = supervise(&shutdown, &[grpc.clone(), gateway.clone()]);
    let outcome = within(supervisor.run_until(signal)).await;

    assert!(outcome.is_clean());
    assert_eq!(shutdown.reason(), Some(ShutdownReason::Signal("SIGTERM")));
    assert_eq!(grpc.stops(), 1);
    assert_eq!(gateway.stops(), 1);
}

#[tokio::test]
async fn test_missing_signal_handlers_fail_before_units_start() {
    let shutdown = ShutdownSignal::new();
    let grpc = ScriptedUnit::new("grpc", Script::UntilStopped);

    let signal: std::io::Result<std::future::Ready<&'static str>> =
        Err(std::io::Error::other("signal driver unavailable"));
    let outcome = within(supervise(&shutdown, &[grpc.clone()]).run_until(signal)).await;

    let failure = outcome.failure().expect("run should fail without signal handlers");
    assert_eq!(failure.unit, SIGNALS_UNIT);
    assert!(failure.error.to_string().contains("signal driver unavailable"));
    assert_eq!(grpc.stops(), 0);
    assert!(!shutdown.is_triggered());

    // The unit was never served, so it can still be started.
    assert!(grpc.drain.begin().is_ok());
}
