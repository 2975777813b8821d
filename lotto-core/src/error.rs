//! Domain-specific error types for the lotto wire protocol.
//!
//! All fallible operations return `Result<T, LottoError>`.
//! Transport and framing errors are fatal to a session; a `FAIL`
//! acknowledgment is not an error and never shows up here.

use thiserror::Error;

/// The canonical error type for the lotto protocol.
#[derive(Debug, Error)]
pub enum LottoError {
    // ── Record Errors ────────────────────────────────────────────
    /// A field does not fit its wire representation.
    #[error("cannot encode {field}: {len} bytes (max 255)")]
    Encoding { field: &'static str, len: usize },

    /// A birthdate is not a `YYYY-MM-DD` string of three numeric parts.
    #[error("invalid birthdate: {0:?}")]
    InvalidBirthdate(String),

    /// A record ended before all of its fields were read.
    #[error("truncated record: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// A decoded name is not valid UTF-8.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // ── Framing Errors ───────────────────────────────────────────
    /// The assembled frame exceeds the configured maximum.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// The receive buffer filled up before a terminator arrived.
    #[error("receive buffer exhausted: no terminator within {capacity} bytes")]
    BufferExhausted { capacity: usize },

    /// A response did not have the shape the session expected.
    #[error("protocol desync: {0}")]
    ProtocolDesync(String),

    /// The session was driven through an illegal phase transition.
    #[error("protocol violation: {0}")]
    ProtocolViolation(&'static str),

    /// The server answered the winners query with `FAIL`.
    #[error("winners not available")]
    WinnersUnavailable,

    // ── Transport Errors ─────────────────────────────────────────
    /// Writing to the transport failed or made no progress.
    #[error("transport write error: {0}")]
    TransportWrite(#[source] std::io::Error),

    /// Reading from the transport failed or hit end-of-stream early.
    #[error("transport read error: {0}")]
    TransportRead(#[source] std::io::Error),

    /// An I/O error surfaced through a `tokio_util` framed stream, which
    /// does not say which direction failed.
    #[error("transport error: {0}")]
    Io(#[from] std::io::Error),

    // ── Collaborator Errors ──────────────────────────────────────
    /// The bet source could not produce records.
    #[error("bet source error: {0}")]
    Source(String),

    /// Accepted bets could not be written to storage.
    #[error("bet storage error: {0}")]
    Storage(String),

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LottoError {
    /// Returns `true` for errors raised by the transport itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportWrite(_) | Self::TransportRead(_) | Self::Io(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = LottoError::FrameTooLarge {
            size: 9000,
            max: 8192,
        };
        assert!(e.to_string().contains("9000"));
        assert!(e.to_string().contains("8192"));

        let e = LottoError::Encoding {
            field: "first_name",
            len: 300,
        };
        assert!(e.to_string().contains("first_name"));
        assert!(e.to_string().contains("300"));
    }

    #[test]
    fn transport_classification() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        assert!(LottoError::TransportWrite(io_err).is_transport());
        assert!(!LottoError::WinnersUnavailable.is_transport());

        let e: LottoError = std::io::Error::from(std::io::ErrorKind::ConnectionReset).into();
        assert!(e.is_transport());
    }

    #[test]
    fn from_utf8() {
        let bad = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let e: LottoError = bad.into();
        assert!(matches!(e, LottoError::InvalidUtf8(_)));
    }
}
