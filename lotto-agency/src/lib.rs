//! # lotto-agency: lottery agency client
//!
//! Reads the agency's bets from a CSV file and reports them to the central
//! server in batches over one TCP connection, then asks which of them won.
//!
//! ## Layers
//!
//! - **Config**: TOML file with CLI / environment overrides.
//! - **Source**: `CsvBetSource`, the file-backed `BetSource`.
//! - **Client**: `AgencyClient`, connect + session + linger + close.

pub mod client;
pub mod config;
pub mod source;
