use std::process::ExitCode;

use dotenvy::dotenv;
use stock_reminder::{
    background::watch_loop::{PriceWatcher, SessionReport},
    config::AppConfig,
    errors::watch_error::WatchError,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(report) => {
            info!(
                cycles = report.cycles,
                notifications = report.notifications,
                "Watch finished."
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Watch aborted.");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<SessionReport, WatchError> {
    let config = AppConfig::from_env()?;
    // Debug output redacts the mail password.
    info!(config = ?config, "Loaded configuration.");

    let mut watcher = PriceWatcher::from_config(&config)?;
    watcher.run().await
}
