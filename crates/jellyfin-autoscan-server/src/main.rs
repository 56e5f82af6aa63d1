//! jellyfin-autoscan relay server

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use jellyfin_autoscan_core::{Config, LogLevel};
use jellyfin_autoscan_server::{logging, serve, AppState, DEFAULT_BIND_ADDR, DEFAULT_LOG_FILE};

/// HTTP relay that starts Jellyfin's library refresh task.
///
/// Jellyfin settings are read from `JELLYFIN_BASE_URL`, `JELLYFIN_API_KEY`
/// and `LOG_LEVEL`.
#[derive(Parser, Debug)]
#[command(name = "jellyfin-autoscan", about = "Trigger Jellyfin library refreshes over HTTP")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_BIND_ADDR)]
    bind_addr: SocketAddr,

    /// Log file, appended to on every start
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load config; logging still comes up on failure so the reason is recorded
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init(LogLevel::default(), &args.log_file)?;
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    logging::init(config.log_level, &args.log_file)?;

    info!(
        base_url = %config.base_url,
        log_level = ?config.log_level,
        log_file = %args.log_file.display(),
        "Starting jellyfin-autoscan"
    );

    let state = AppState::from_config(&config);

    let listener = match TcpListener::bind(args.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %args.bind_addr, "Server failed to start");
            return Err(e.into());
        }
    };
    info!("Server starting on {}", args.bind_addr);

    if let Err(e) = serve(listener, state).await {
        error!(error = %e, "HTTP server error");
        return Err(e.into());
    }

    Ok(())
}
