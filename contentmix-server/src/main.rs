use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contentmix_server::{AppState, Config, router};

#[derive(Parser)]
#[command(name = "contentmix-server")]
#[command(version)]
#[command(about = "Serve round-robin content mixes from several providers over HTTP")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path; the built-in default is used when omitted
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listening address, overrides the config file
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<SocketAddr>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.server.addr = addr;
    }

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let log_filter = format!(
        "contentmix_server={lvl},contentmix={lvl},contentmix_core={lvl},tower_http={lvl}",
        lvl = cli.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting contentmix-server v{}", env!("CARGO_PKG_VERSION"));
    match &cli.config {
        Some(path) => info!("Configuration loaded from: {}", path.display()),
        None => info!("Using built-in default configuration"),
    }

    let mixer = Arc::new(config.build_mixer()?);
    let mut providers: Vec<&str> = mixer.providers().keys().map(|k| k.as_str()).collect();
    providers.sort_unstable();
    info!(
        providers = ?providers,
        slots = mixer.schedule().len(),
        max_count = ?config.server.max_count,
        "mixer ready"
    );

    let state = AppState::new(Arc::clone(&mixer)).with_max_count(config.server.max_count);
    let listener = tokio::net::TcpListener::bind(config.server.addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
