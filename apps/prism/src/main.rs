use std::process::ExitCode;

use core_config::Environment;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryConfig;
use domain_customers::PgCustomerRepository;
use eyre::WrapErr;
use prism_server::{App, Config};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let app = match start().await {
        Ok(app) => app,
        Err(report) => {
            error!(error = ?report, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    info!(grpc = %app.grpc_addr, http = %app.http_addr, "Prism backend started");
    let outcome = app.supervisor.run_until_signal().await;
    info!(clean = outcome.is_clean(), "Prism backend stopped");
    outcome.exit_code()
}

async fn start() -> eyre::Result<App> {
    let config = Config::from_env()?;

    observability::init_metrics().wrap_err("installing metrics recorder")?;

    let db = database::postgres::connect_from_config_with_retry(
        config.database.clone(),
        Some(RetryConfig::new().with_max_retries(5)),
    )
    .await
    .wrap_err("connecting to PostgreSQL")?;

    prism_server::assemble(&config, PgCustomerRepository::new(db)).await
}
