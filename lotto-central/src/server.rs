//! TCP accept loop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use lotto_core::LottoError;

use crate::config::CentralConfig;
use crate::handler::AgencyHandler;
use crate::lottery::Lottery;

// ── CentralServer ────────────────────────────────────────────────

/// Listens for agencies and serves each one on its own task.
pub struct CentralServer {
    listener: TcpListener,
    lottery: Arc<Lottery>,
    max_frame_size: usize,
}

impl CentralServer {
    /// Validate the config and bind the listener.
    pub async fn bind(config: &CentralConfig) -> Result<Self, LottoError> {
        config.validate()?;
        let listener = TcpListener::bind(config.bind_addr()).await.map_err(|e| {
            LottoError::Config(format!("cannot bind {}: {e}", config.bind_addr()))
        })?;
        let mut lottery = Lottery::new(config.agencies, config.winning_number);
        if let Some(path) = &config.storage_path {
            lottery = lottery.with_storage(path);
        }
        Ok(Self {
            listener,
            lottery: Arc::new(lottery),
            max_frame_size: config.max_frame_size,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, LottoError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn lottery(&self) -> Arc<Lottery> {
        Arc::clone(&self.lottery)
    }

    /// Accept agencies until `cancel` fires, then wait for every
    /// connection task to wind down.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), LottoError> {
        let mut connections = JoinSet::new();
        info!(addr = %self.local_addr()?, "central server listening");

        loop {
            let accept = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.listener.accept() => result,
            };

            let (stream, peer) = match accept {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("accept error: {e}");
                    continue;
                }
            };
            info!(action = "accept_connections", result = "success", ip = %peer.ip());

            let lottery = Arc::clone(&self.lottery);
            let cancel = cancel.clone();
            let max_frame_size = self.max_frame_size;
            connections.spawn(async move {
                let mut handler = AgencyHandler::new(stream, lottery, max_frame_size);
                if let Err(e) = handler.run(&cancel).await {
                    error!(agency = ?handler.agency(), %peer, "connection failed: {e}");
                }
            });

            // Reap finished connections so the set does not grow unbounded.
            while connections.try_join_next().is_some() {}
        }

        info!("shutting down; waiting for {} connection(s)", connections.len());
        while connections.join_next().await.is_some() {}
        let stored = self.lottery.stored().await;
        info!(stored, "all connections closed");
        Ok(())
    }
}
