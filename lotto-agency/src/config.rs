//! Configuration for the agency client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

use lotto_core::{LottoError, SessionConfig, DEFAULT_READ_CAPACITY, MAX_FRAME_SIZE};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencyConfig {
    /// Who this agency is and where it reports to.
    pub agency: AgencySection,
    /// Batch loop tuning.
    pub session: SessionSection,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Agency identity and endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgencySection {
    /// Agency id, sent with BEGIN and stamped on every bet.
    pub id: u8,
    /// `host:port` of the central server.
    pub server_address: String,
    /// CSV file with one bet per line:
    /// `first_name,last_name,document,birthdate,number`.
    pub bets_file: PathBuf,
}

/// Batch loop tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Most bets per batch; larger batches are split to fit a frame.
    pub batch_size: usize,
    /// Pause between batches in milliseconds.
    pub loop_period_ms: u64,
    /// Cap on a batch frame in bytes, terminator included.
    pub max_frame_size: usize,
    /// Receive buffer ceiling in bytes.
    pub read_capacity: usize,
    /// How long to keep the connection open after the winners arrive.
    pub linger_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for AgencyConfig {
    fn default() -> Self {
        Self {
            agency: AgencySection::default(),
            session: SessionSection::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AgencySection {
    fn default() -> Self {
        Self {
            id: 1,
            server_address: "server:12345".into(),
            bets_file: PathBuf::from("/data/agency.csv"),
        }
    }
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            batch_size: 100,
            loop_period_ms: 0,
            max_frame_size: MAX_FRAME_SIZE,
            read_capacity: DEFAULT_READ_CAPACITY,
            linger_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Overrides ────────────────────────────────────────────────────

/// Settings that can be given on the command line or through the
/// environment. Anything set here wins over the file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Agency id.
    #[arg(long, env = "CLI_ID")]
    pub id: Option<u8>,

    /// Central server `host:port`.
    #[arg(long, env = "CLI_SERVER_ADDRESS")]
    pub server_address: Option<String>,

    /// Most bets per batch.
    #[arg(long, env = "CLI_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Pause between batches in milliseconds.
    #[arg(long, env = "CLI_LOOP_PERIOD_MS")]
    pub loop_period_ms: Option<u64>,

    /// CSV file with the agency's bets.
    #[arg(long, env = "CLI_BETS_FILE")]
    pub bets_file: Option<PathBuf>,

    /// Log level.
    #[arg(long, env = "CLI_LOG_LEVEL")]
    pub log_level: Option<String>,
}

// ── Loading ──────────────────────────────────────────────────────

impl AgencyConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file means defaults; a file that does not parse is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, LottoError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .map_err(|e| LottoError::Config(format!("invalid config {}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(LottoError::Config(format!(
                "cannot read config {}: {e}",
                path.display()
            ))),
        }
    }

    /// [`load`](Self::load), then [`apply`](Self::apply) `overrides`.
    ///
    /// The settings come back even when the file cannot be loaded (the
    /// defaults with `overrides` applied), so logging can be set up
    /// before the error is reported.
    pub fn resolve(path: &Path, overrides: ConfigOverrides) -> (Self, Option<LottoError>) {
        let (mut config, error) = match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply(overrides);
        (config, error)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(id) = overrides.id {
            self.agency.id = id;
        }
        if let Some(addr) = overrides.server_address {
            self.agency.server_address = addr;
        }
        if let Some(batch_size) = overrides.batch_size {
            self.session.batch_size = batch_size;
        }
        if let Some(period) = overrides.loop_period_ms {
            self.session.loop_period_ms = period;
        }
        if let Some(file) = overrides.bets_file {
            self.agency.bets_file = file;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.session.linger_ms)
    }

    /// Validated session settings for the driver.
    pub fn to_session_config(&self) -> Result<SessionConfig, LottoError> {
        if self.agency.server_address.trim().is_empty() {
            return Err(LottoError::Config("server_address is empty".into()));
        }
        let config = SessionConfig {
            agency: self.agency.id,
            batch_size: self.session.batch_size,
            loop_period: Duration::from_millis(self.session.loop_period_ms),
            max_frame_size: self.session.max_frame_size,
            read_capacity: self.session.read_capacity,
        };
        config.validate()?;
        Ok(config)
    }
}

// ── Tests ────────────────────────────────────────────────────────
