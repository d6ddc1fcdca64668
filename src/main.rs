mod app_error;
mod cli;
mod config;
mod controllers;
mod model;
mod repositories;
mod services;

use crate::cli::{Cli, Command};
use crate::config::config::Config;
use crate::repositories::catalog_repository::CatalogRepository;
use crate::services::planner::{Planner, PlannerState};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    enable_logging(cli.verbose);
    let Some(mut config) = Config::from_path(&cli.config_path) else {
        return Ok(ExitCode::FAILURE);
    };
    if let Some(port) = cli.port {
        config.set_port(port);
    }

    let catalog = match CatalogRepository::new(config.catalog().clone()).load() {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.command == Some(Command::ValidateCatalog) {
        info!(
            "Catalog validation passed for {} SKUs.",
            catalog.skus().len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let state: PlannerState = Arc::new(Planner::new(catalog, config.get_all_gpu_types()));
    let app = controllers::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(ExitCode::SUCCESS)
}

fn enable_logging(verbose: u8) {
    let log_level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
