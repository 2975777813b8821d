//! Agency-side session phase machine.
//!
//! Models the lifecycle of one connection's protocol exchange, with
//! validated transitions that return `Result` instead of panicking.

use crate::error::LottoError;

// ── SessionPhase ─────────────────────────────────────────────────

/// The current phase of an agency session.
///
/// ```text
///  Idle ──► Sending ──► Ending ──► QueryingWinners ──► Closed
///              │                                         ▲
///              └──────────────── (cancelled) ────────────┘
/// ```
///
/// Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Connected, nothing sent yet.
    #[default]
    Idle,

    /// BEGIN sent; batches are flowing.
    Sending,

    /// END sent; no more batches.
    Ending,

    /// GETWINNERS sent; waiting for or holding the response.
    QueryingWinners,

    /// Transport released.
    Closed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Sending => write!(f, "Sending"),
            Self::Ending => write!(f, "Ending"),
            Self::QueryingWinners => write!(f, "QueryingWinners"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl SessionPhase {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Valid from: `Idle`.
    pub fn begin(&mut self) -> Result<(), LottoError> {
        match self {
            Self::Idle => {
                *self = Self::Sending;
                Ok(())
            }
            _ => Err(LottoError::ProtocolViolation(
                "cannot begin: session not Idle",
            )),
        }
    }

    /// Valid from: `Sending`.
    pub fn end(&mut self) -> Result<(), LottoError> {
        match self {
            Self::Sending => {
                *self = Self::Ending;
                Ok(())
            }
            _ => Err(LottoError::ProtocolViolation(
                "cannot end: session not Sending",
            )),
        }
    }

    /// Valid from: `Ending`.
    pub fn query_winners(&mut self) -> Result<(), LottoError> {
        match self {
            Self::Ending => {
                *self = Self::QueryingWinners;
                Ok(())
            }
            _ => Err(LottoError::ProtocolViolation(
                "cannot query winners: session not Ending",
            )),
        }
    }

    /// Valid from: `QueryingWinners`.
    pub fn close(&mut self) -> Result<(), LottoError> {
        match self {
            Self::QueryingWinners => {
                *self = Self::Closed;
                Ok(())
            }
            _ => Err(LottoError::ProtocolViolation(
                "cannot close: winners not queried",
            )),
        }
    }

    /// Jump to `Closed` from anywhere.
    ///
    /// Used on cancellation and on fatal transport errors.
    pub fn abort(&mut self) {
        *self = Self::Closed;
    }
}
