//! Process shutdown signals shared by the binaries.

/// Ctrl-C, plus SIGTERM on Unix (what `docker stop` sends).
///
/// The SIGTERM handler is installed by [`listen`](Self::listen), so a
/// signal that arrives before [`recv`](Self::recv) is first polled is not
/// lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: Option<tokio::signal::unix::Signal>,
}

impl ShutdownSignal {
    /// Must be called from inside a `tokio` runtime.
    pub fn listen() -> Self {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let terminate = match signal(SignalKind::terminate()) {
                Ok(term) => Some(term),
                Err(e) => {
                    tracing::warn!("failed to install SIGTERM handler: {e}");
                    None
                }
            };
            Self { terminate }
        }
        #[cfg(not(unix))]
        {
            Self {}
        }
    }

    /// Resolves once either signal arrives.
    pub async fn recv(self) {
        #[cfg(unix)]
        {
            if let Some(mut term) = self.terminate {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
        }
        wait_for_ctrl_c().await;
    }
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
