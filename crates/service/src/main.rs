//! cubby - multi-tenant file storage service
//!
//! Authenticated users upload, list, preview, download, and delete files
//! confined to a private per-tenant directory under the storage root. The
//! authenticating front end passes the caller's identity in a request
//! header; everything else lives in `cubby-store`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use cubby::{http_server, Config, ServiceState};

/// cubby - multi-tenant file storage service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for HTTP requests
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Directory holding all tenant namespaces
    #[arg(short, long, default_value = "blob-storage/uploads")]
    storage_root: PathBuf,

    /// Upload size ceiling in bytes (uncapped if not set)
    #[arg(long)]
    max_upload_bytes: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(non_blocking_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stdout_layer).init();
    register_panic_logger();

    tracing::info!("Starting cubby");

    let config = Config {
        listen_addr: SocketAddr::from_str(&format!("0.0.0.0:{}", args.port))?,
        storage_root: args.storage_root,
        max_upload_bytes: args.max_upload_bytes,
        log_level,
    };

    // Create state
    let state = match ServiceState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to create service state: {}", e);
            std::process::exit(1);
        }
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let graceful_shutdown = async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl+c");
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    };
    tokio::spawn(graceful_shutdown);

    http_server::run(config, state, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Registers a panic hook that logs panics using the `tracing` crate
fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| match panic.location() {
        Some(loc) => {
            tracing::error!(
                message = %panic,
                panic.file = loc.file(),
                panic.line = loc.line(),
                panic.column = loc.column(),
            );
        }
        None => tracing::error!(message = %panic),
    }));
}
