//! Agency client: one connection, one session.

use tokio::net::TcpStream;
use tracing::{info, warn};

use lotto_core::{
    CancellationToken, LottoError, SessionDriver, SessionOutcome, TracingEvents,
};

use crate::config::AgencyConfig;
use crate::source::CsvBetSource;

// ── AgencyClient ─────────────────────────────────────────────────

/// Connects to the central server and runs the whole session.
pub struct AgencyClient {
    config: AgencyConfig,
}

impl AgencyClient {
    pub fn new(config: AgencyConfig) -> Self {
        Self { config }
    }

    /// Run until the winners are in or `cancel` fires.
    ///
    /// 1. Connects to `server_address`.
    /// 2. Streams the bets file through a [`SessionDriver`].
    /// 3. On completion, keeps the connection open for `linger_ms`, then
    ///    closes it.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<SessionOutcome, LottoError> {
        let session = self.config.to_session_config()?;
        let agency = session.agency;
        let addr = &self.config.agency.server_address;

        let stream = TcpStream::connect(addr).await.map_err(|e| {
            tracing::error!(action = "connect", result = "fail", agency, error = %e);
            LottoError::TransportWrite(e)
        })?;
        if let Err(e) = stream.set_nodelay(true) {
            warn!("could not set TCP_NODELAY: {e}");
        }
        info!(action = "connect", result = "success", agency, server = %addr);

        let source = CsvBetSource::new(&self.config.agency.bets_file);
        let mut driver = SessionDriver::new(stream, source, session, TracingEvents);

        let outcome = driver.run(cancel).await?;
        if let SessionOutcome::Completed(report) = &outcome {
            info!(
                action = "winners_query",
                result = "success",
                agency,
                sent = report.sent,
                winners = report.winners.len()
            );

            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(self.config.linger()) => {}
            }
            driver.close().await?;
            info!("connection closed");
        }
        Ok(outcome)
    }
}
