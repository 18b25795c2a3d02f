//! Process-level shutdown scenarios over real listeners.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use core_config::redis::RedisConfig;
use core_config::server::ServerConfig;
use core_config::shutdown::ShutdownConfig;
use core_config::Environment;
use database::postgres::PostgresConfig;
use domain_customers::{
    Customer, CustomerDetail, CustomerFilter, CustomerRepository, DataResult,
    MockCustomerRepository, NewCustomer, Page,
};
use email::SenderConfig;
use lifecycle::{ShutdownReason, UnitError};
use prism_server::{Config, assemble};
use rpc::customer::GetCustomerRequest;
use rpc::customer::customer_service_client::CustomerServiceClient;
use test_utils::LogCapture;
use tokio::sync::Notify;
use uuid::Uuid;

fn config(redis: Option<&str>) -> Config {
    Config {
        environment: Environment::Development,
        http: ServerConfig::new("127.0.0.1", 0),
        grpc: grpc_helpers::ServerConfig::new()
            .with_host("127.0.0.1")
            .with_port(0)
            .with_shutdown_grace(Duration::from_secs(5)),
        shutdown: ShutdownConfig {
            grace: Duration::from_secs(5),
            deadline: Some(Duration::from_secs(10)),
        },
        database: PostgresConfig::new("postgres://unused"),
        redis: redis.map(RedisConfig::new),
        smtp: None,
        sender: SenderConfig::new("Prism", "noreply@localhost"),
    }
}

async fn is_listening(addr: SocketAddr) -> bool {
    tokio::net::TcpStream::connect(addr).await.is_ok()
}

/// A Redis URL with credentials pointing at a port nothing listens on.
async fn unreachable_redis_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("redis://:wrong-password@127.0.0.1:{port}")
}

#[tokio::test]
async fn test_failing_tasks_unit_stops_protocol_units() {
    let capture = LogCapture::new();
    let _guard = capture.install();

    let redis_url = unreachable_redis_url().await;
    let app = assemble(&config(Some(&redis_url)), MockCustomerRepository::new())
        .await
        .unwrap();
    let (grpc_addr, http_addr) = (app.grpc_addr, app.http_addr);
    let signal = app.supervisor.shutdown_signal().clone();

    // The connection manager retries a refused connect a few times first.
    let outcome = tokio::time::timeout(Duration::from_secs(20), app.supervisor.run())
        .await
        .expect("supervisor should finish after the tasks unit failed");

    let failure = outcome.failure().expect("outcome should be a failure");
    assert_eq!(failure.unit, "tasks");
    assert!(matches!(failure.error, UnitError::Connect { target: "redis", .. }));
    assert_eq!(signal.reason(), Some(ShutdownReason::UnitFailed("tasks".into())));

    let mut stopped: Vec<String> = capture
        .records_with_message("Unit stopped")
        .iter()
        .filter_map(|record| record["unit"].as_str().map(str::to_string))
        .collect();
    stopped.sort();
    assert_eq!(stopped, ["gateway", "grpc", "tasks"]);

    let fatal: Vec<_> = capture
        .records()
        .into_iter()
        .filter(|record| record["level"] == "ERROR")
        .collect();
    assert_eq!(fatal.len(), 1, "{fatal:?}");
    assert_eq!(fatal[0]["unit"], "tasks");

    assert!(!is_listening(grpc_addr).await);
    assert!(!is_listening(http_addr).await);
}

#[tokio::test]
async fn test_lean_process_stops_cleanly() {
    let app = assemble(&config(None), MockCustomerRepository::new())
        .await
        .unwrap();
    let signal = app.supervisor.shutdown_signal().clone();
    let supervisor = tokio::spawn(app.supervisor.run());

    assert!(is_listening(app.http_addr).await);
    signal.trigger(ShutdownReason::Signal("SIGINT"));

    let outcome = tokio::time::timeout(Duration::from_secs(10), supervisor)
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_clean());
}

#[tokio::test]
async fn test_busy_port_fails_assembly() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut config = config(None);
    config.http.port = listener.local_addr().unwrap().port();

    let err = assemble(&config, MockCustomerRepository::new())
        .await
        .err()
        .expect("binding a busy port must fail");
    assert!(err.to_string().starts_with("binding HTTP listener"));
}

/// Answers `get_detail` only after a delay.
struct SlowRepository {
    started: Arc<Notify>,
    delay: Duration,
}

#[async_trait]
impl CustomerRepository for SlowRepository {
    async fn create(&self, _input: NewCustomer) -> DataResult<Customer> {
        unimplemented!("not used by the scenario")
    }

    async fn search(&self, _filter: CustomerFilter) -> DataResult<Vec<Customer>> {
        Ok(Vec::new())
    }

    async fn get_detail(&self, id: Uuid) -> DataResult<Option<CustomerDetail>> {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;

        Ok(Some(CustomerDetail {
            customer: Customer {
                id,
                book_id: Uuid::now_v7(),
                name: "Acme".into(),
                job: None,
                corporation: None,
                address: None,
                memo: None,
                leader_id: None,
                pic_id: None,
                created_at: Utc::now(),
            },
            contact: None,
        }))
    }

    async fn list_by_book(&self, _book_id: Uuid, _page: Page) -> DataResult<Vec<Customer>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn test_termination_lets_in_flight_call_complete() {
    let started = Arc::new(Notify::new());
    let repository = SlowRepository {
        started: Arc::clone(&started),
        delay: Duration::from_millis(300),
    };

    let app = assemble(&config(None), repository).await.unwrap();
    let signal = app.supervisor.shutdown_signal().clone();
    let grpc_addr = app.grpc_addr;
    let supervisor = tokio::spawn(app.supervisor.run());

    let mut client = CustomerServiceClient::connect(format!("http://{grpc_addr}"))
        .await
        .unwrap();
    let id = Uuid::now_v7();
    let call = tokio::spawn(async move {
        client
            .get_customer(GetCustomerRequest { id: id.to_string() })
            .await
    });

    started.notified().await;
    signal.trigger(ShutdownReason::Signal("SIGTERM"));

    let response = call
        .await
        .unwrap()
        .expect("in-flight call should complete during drain")
        .into_inner();
    assert_eq!(response.id, id.to_string());
    assert_eq!(response.name, "Acme");

    let outcome = tokio::time::timeout(Duration::from_secs(10), supervisor)
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_clean());
}
