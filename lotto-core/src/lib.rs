//! # lotto-core
//!
//! Wire protocol and client session for agencies reporting bets to the
//! central lottery service.
//!
//! This crate contains:
//! - **Bets**: `Bet`, `RawBet`, `Birthdate` with the field limits the wire imposes
//! - **Codec**: record encoding, batch framing, and `RequestCodec` for the central side
//! - **Messages**: `ControlMessage`, `Status` acks and `WinnersResponse`
//! - **Network**: `write_all` and `FrameReader` for partial-I/O transports
//! - **State**: the `SessionPhase` machine
//! - **Session**: `SessionDriver` running BEGIN → batches → END → GETWINNERS
//! - **Source**: the `BetSource` trait the driver pulls records from
//! - **Shutdown**: `ShutdownSignal` for Ctrl-C and SIGTERM in the binaries
//! - **Error**: `LottoError`, a typed `thiserror` hierarchy

pub mod bet;
pub mod codec;
pub mod error;
pub mod message;
pub mod network;
pub mod session;
pub mod shutdown;
pub mod source;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────

pub use bet::{Bet, Birthdate, RawBet, MAX_NAME_LEN};
pub use codec::{assemble, split_batch, Request, RequestCodec, RecordCodec, MAX_FRAME_SIZE, TERMINATOR};
pub use error::LottoError;
pub use message::{ControlMessage, Status, WinnerSet, WinnersResponse};
pub use network::{write_all, FrameReader, DEFAULT_READ_CAPACITY};
pub use session::{
    SessionConfig, SessionDriver, SessionEvents, SessionOutcome, SessionReport, TracingEvents,
};
pub use shutdown::ShutdownSignal;
pub use source::{BetSource, VecSource};
pub use state::SessionPhase;

// Runtime pieces callers need alongside the driver.
pub use tokio_util::sync::CancellationToken;
