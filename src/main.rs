use anyhow::{Context, Result};
use career_engine::{start_web_server, ConfigManager};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "jobpilot")]
#[command(about = "Career assistant API server")]
struct Cli {
    /// Port to bind to (falls back to ROCKET_PORT, then 8080)
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    // Initialize logging before anything else that should be traced
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Clear file on startup
        .open(&config.environment.log_path)
        .with_context(|| {
            format!(
                "Failed to open log file: {}",
                config.environment.log_path.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = cli
        .port
        .or_else(|| {
            std::env::var("ROCKET_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
        })
        .unwrap_or(8080);

    info!("Starting JobPilot career assistant API server");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!(
        "Database: {}",
        config.environment.database_path.display()
    );
    info!("Model endpoint: {}", config.service.llm_api_url);
    info!("Search endpoint: {}", config.service.search_api_url);
    info!("Server: http://0.0.0.0:{}", port);

    start_web_server(config, port).await
}
