//! Lotto agency client: entry point.
//!
//! ```text
//! lotto-agency                   Run with lotto-agency.toml (or defaults)
//! lotto-agency --config <path>   Load a custom config TOML
//! lotto-agency --id 3 ...        Override file settings (also CLI_* env vars)
//! lotto-agency --gen-config      Write default config to stdout
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lotto_agency::client::AgencyClient;
use lotto_agency::config::{AgencyConfig, ConfigOverrides};
use lotto_core::{CancellationToken, SessionOutcome, ShutdownSignal};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "lotto-agency", about = "Report an agency's bets and fetch its winners")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "lotto-agency.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,
}

// ── Main ─────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&AgencyConfig::default())?;
        println!("{text}");
        return Ok(());
    }

    let (config, load_error) = AgencyConfig::resolve(&cli.config, cli.overrides);

    // Init tracing.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(e) = load_error {
        error!(action = "config", result = "fail", error = %e);
        std::process::exit(1);
    }

    info!("lotto-agency v{}", env!("CARGO_PKG_VERSION"));
    info!(
        action = "config",
        result = "success",
        id = config.agency.id,
        server_address = %config.agency.server_address,
        batch_size = config.session.batch_size,
        loop_period_ms = config.session.loop_period_ms,
        bets_file = %config.agency.bets_file.display()
    );

    let cancel = CancellationToken::new();
    let signal = ShutdownSignal::listen();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            signal.recv().await;
            info!("shutdown signal received; stopping after the current batch");
            cancel.cancel();
        }
    });

    let client = AgencyClient::new(config);
    match client.run(&cancel).await {
        Ok(SessionOutcome::Completed(report)) => {
            info!(
                sent = report.sent,
                batches = report.batches,
                rejected = report.rejected_batches,
                "session finished"
            );
        }
        Ok(SessionOutcome::Cancelled { sent }) => {
            info!(action = "loop_stopped", result = "success", sent);
        }
        Err(e) => {
            error!(action = "session", result = "fail", error = %e);
            std::process::exit(1);
        }
    }

    Ok(())
}
