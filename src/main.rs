//! `ewa-server`: serves the earned wage access engine over HTTP.

use std::path::PathBuf;

use clap::Parser;
use ewa_engine::api::{AppState, create_router};
use ewa_engine::calculation::SalaryEngine;
use ewa_engine::config::EngineSettings;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Earned wage access calculation server
#[derive(Parser, Debug)]
#[command(name = "ewa-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the settings file
    #[arg(short, long, default_value = "config/settings.yaml")]
    settings: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = EngineSettings::load(&args.settings)?;
    info!(
        settings = %args.settings.display(),
        rates_dir = %settings.rates_dir.display(),
        profile = settings.profile.as_str(),
        cache_ttl_secs = ?settings.cache_ttl_secs,
        load_timeout_ms = settings.load_timeout_ms,
        "Loaded settings"
    );

    let state = AppState::new(settings.build_cache(), SalaryEngine::new(settings.profile));
    let listener = TcpListener::bind(&settings.bind_address).await?;
    info!(address = %settings.bind_address, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
