//! fitgen server binary.

use std::process;
use std::sync::Arc;

use clap::Parser;

use fitgen::cli::Cli;
use fitgen::config::{self, Config};
use fitgen::context::ServiceContext;
use fitgen::error::RelayError;
use fitgen::provider;
use fitgen::server::{app, AppState};
use fitgen::upload::UploadPolicy;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RelayError> {
    // Load config
    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(RelayError::Config)?;

    // Resolve provider
    let kind = provider::parse_provider(&config.provider_name()).map_err(RelayError::Config)?;

    // Scratch directory is recreated if missing; requests also create it
    // lazily, so a failure here only delays the first upload.
    let policy = UploadPolicy::from_config(&config, kind);
    tokio::fs::create_dir_all(&policy.upload_dir).await?;

    let ctx = ServiceContext::live(kind, &config);
    let state = AppState { policy: Arc::new(policy), transformer: ctx.transformer };

    let port = cli.port.unwrap_or_else(|| config.port());
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("provider: {kind:?}");
    log::info!("scratch directory: {}", state.policy.upload_dir.display());
    log::info!("listening on {addr}");

    axum::serve(listener, app(state)).await?;

    Ok(())
}
