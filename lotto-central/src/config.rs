//! Command-line / environment configuration for the central server.

use std::path::PathBuf;

use clap::Parser;

use lotto_core::{LottoError, MAX_FRAME_SIZE};

/// Number every winning bet carries.
pub const DEFAULT_WINNING_NUMBER: u32 = 7574;

#[derive(Parser, Debug, Clone)]
#[command(name = "lotto-central", about = "Collect agency bets and draw winners")]
pub struct CentralConfig {
    /// TCP port to listen on.
    #[arg(long, env = "SERVER_PORT", default_value_t = 12345)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Agencies that must send END before the draw.
    #[arg(long, env = "AGENCIES", default_value_t = 5)]
    pub agencies: usize,

    /// Bets with this number win.
    #[arg(long, env = "WINNING_NUMBER", default_value_t = DEFAULT_WINNING_NUMBER)]
    pub winning_number: u32,

    /// Largest batch frame accepted, terminator included.
    #[arg(long, env = "MAX_FRAME_SIZE", default_value_t = MAX_FRAME_SIZE)]
    pub max_frame_size: usize,

    /// CSV file every accepted bet is appended to. Unset keeps bets in
    /// memory only.
    #[arg(long, env = "STORAGE_PATH")]
    pub storage_path: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for CentralConfig {
    fn default() -> Self {
        Self {
            port: 12345,
            host: "0.0.0.0".into(),
            agencies: 5,
            winning_number: DEFAULT_WINNING_NUMBER,
            max_frame_size: MAX_FRAME_SIZE,
            storage_path: None,
            log_level: "info".into(),
        }
    }
}

impl CentralConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), LottoError> {
        if self.agencies == 0 {
            return Err(LottoError::Config("agencies must be at least 1".into()));
        }
        if self.max_frame_size <= lotto_core::TERMINATOR.len() {
            return Err(LottoError::Config(format!(
                "max_frame_size {} leaves no room for records",
                self.max_frame_size
            )));
        }
        Ok(())
    }
}
