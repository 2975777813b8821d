//! Lotto central server: entry point.
//!
//! ```text
//! lotto-central                        Listen on 0.0.0.0:12345 for 5 agencies
//! lotto-central --port 4000 --agencies 2
//! SERVER_PORT=4000 AGENCIES=2 lotto-central
//! ```

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lotto_central::{CentralConfig, CentralServer};
use lotto_core::{CancellationToken, ShutdownSignal};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CentralConfig::parse();

    // Init tracing.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("lotto-central v{}", env!("CARGO_PKG_VERSION"));
    info!(
        port = config.port,
        agencies = config.agencies,
        winning_number = config.winning_number,
        storage = ?config.storage_path,
        "configuration loaded"
    );

    let server = CentralServer::bind(&config).await?;

    // Ctrl-C / SIGTERM handler.
    let cancel = CancellationToken::new();
    let signal = ShutdownSignal::listen();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            signal.recv().await;
            info!("shutdown signal received, closing the listener");
            cancel.cancel();
        }
    });

    server.run(cancel).await?;
    info!("server socket closed");
    Ok(())
}
