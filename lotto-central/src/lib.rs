//! # lotto-central: central lottery server
//!
//! Accepts one connection per agency, stores every batch it receives and,
//! once all expected agencies have sent END, answers each agency's
//! winners query with the documents of its winning bets.

pub mod config;
pub mod handler;
pub mod lottery;
pub mod server;

pub use config::CentralConfig;
pub use lottery::Lottery;
pub use server::CentralServer;
