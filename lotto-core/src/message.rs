//! Control frames and responses.
//!
//! Tokens are parsed with `TryFrom`; unknown ones are a
//! [`LottoError::ProtocolDesync`], never a panic.

use std::collections::BTreeSet;
use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::codec::TERMINATOR;
use crate::error::LottoError;

pub const BEGIN_TAG: &[u8] = b"BEGIN";
pub const END_TAG: &[u8] = b"END";
pub const GET_WINNERS_TAG: &[u8] = b"GETWINNERS";

// ── ControlMessage ───────────────────────────────────────────────

/// Frames an agency sends around its batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlMessage {
    /// Opens a session for the agency.
    Begin { agency: u8 },
    /// No more batches follow.
    End,
    /// Asks for the agency's winning documents.
    GetWinners { agency: u8 },
}

impl ControlMessage {
    /// Wire form, terminator included.
    pub fn to_frame(&self) -> Bytes {
        let mut frame = BytesMut::with_capacity(GET_WINNERS_TAG.len() + 1 + TERMINATOR.len());
        match *self {
            Self::Begin { agency } => {
                frame.put_slice(BEGIN_TAG);
                frame.put_u8(agency);
            }
            Self::End => frame.put_slice(END_TAG),
            Self::GetWinners { agency } => {
                frame.put_slice(GET_WINNERS_TAG);
                frame.put_u8(agency);
            }
        }
        frame.put_slice(&TERMINATOR);
        frame.freeze()
    }

    /// Recognize a control frame payload (terminator stripped).
    ///
    /// Returns `None` for anything else, which on the central side means
    /// a batch. No batch payload can collide: the shortest record is
    /// longer than every control frame, and an empty batch is empty.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        match payload {
            [b'B', b'E', b'G', b'I', b'N', agency] => Some(Self::Begin { agency: *agency }),
            b"END" => Some(Self::End),
            [tag @ .., agency] if tag == GET_WINNERS_TAG => {
                Some(Self::GetWinners { agency: *agency })
            }
            _ => None,
        }
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin { agency } => write!(f, "BEGIN({agency})"),
            Self::End => write!(f, "END"),
            Self::GetWinners { agency } => write!(f, "GETWINNERS({agency})"),
        }
    }
}

// ── Status ───────────────────────────────────────────────────────

/// Status token used for batch acks and as the winners response marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok,
    Fail,
}

impl Status {
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Self::Ok => b"OK",
            Self::Fail => b"FAIL",
        }
    }

    /// Wire form of an ack, terminator included.
    pub fn to_frame(&self) -> Bytes {
        let mut frame = BytesMut::with_capacity(4 + TERMINATOR.len());
        frame.put_slice(self.as_bytes());
        frame.put_slice(&TERMINATOR);
        frame.freeze()
    }
}

impl TryFrom<&[u8]> for Status {
    type Error = LottoError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        match value {
            b"OK" => Ok(Self::Ok),
            b"FAIL" => Ok(Self::Fail),
            other => Err(LottoError::ProtocolDesync(format!(
                "unknown status token {:?}",
                String::from_utf8_lossy(other)
            ))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

// ── WinnerSet ────────────────────────────────────────────────────

/// Document numbers of the winning bets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WinnerSet(BTreeSet<u32>);

impl WinnerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: u32) -> bool {
        self.0.insert(document)
    }

    pub fn contains(&self, document: u32) -> bool {
        self.0.contains(&document)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for WinnerSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ── WinnersResponse ──────────────────────────────────────────────

/// Answer to [`ControlMessage::GetWinners`].
///
/// ```text
///  OK|FAIL  ||  document(4B BE) * N  ||
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WinnersResponse {
    Ready(WinnerSet),
    /// The draw has not happened for this agency.
    Unavailable,
}

impl WinnersResponse {
    /// Wire form, both terminators included.
    pub fn to_frame(&self) -> Bytes {
        let (status, winners) = match self {
            Self::Ready(winners) => (Status::Ok, winners.len()),
            Self::Unavailable => (Status::Fail, 0),
        };

        let mut frame = BytesMut::with_capacity(4 + 2 * TERMINATOR.len() + 4 * winners);
        frame.put_slice(status.as_bytes());
        frame.put_slice(&TERMINATOR);
        if let Self::Ready(winners) = self {
            for document in winners.iter() {
                frame.put_u32(document);
            }
        }
        frame.put_slice(&TERMINATOR);
        frame.freeze()
    }

    /// Parse a whole response payload with its final terminator stripped.
    pub fn parse(payload: &[u8]) -> Result<Self, LottoError> {
        for status in [Status::Ok, Status::Fail] {
            let marker = status.as_bytes();
            if payload.starts_with(marker) && payload[marker.len()..].starts_with(&TERMINATOR) {
                let body = &payload[marker.len() + TERMINATOR.len()..];
                return Self::from_parts(status, body);
            }
        }
        Err(LottoError::ProtocolDesync(
            "winners response lacks a status marker".into(),
        ))
    }

    /// Build a response from a marker and the document list that followed it.
    pub fn from_parts(status: Status, body: &[u8]) -> Result<Self, LottoError> {
        match status {
            Status::Fail => Ok(Self::Unavailable),
            Status::Ok => {
                if body.len() % 4 != 0 {
                    return Err(LottoError::ProtocolDesync(format!(
                        "winners list of {} bytes is not a multiple of 4",
                        body.len()
                    )));
                }
                Ok(Self::Ready(
                    body.chunks_exact(4)
                        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_frames() {
        assert_eq!(&ControlMessage::Begin { agency: 7 }.to_frame()[..], b"BEGIN\x07||");
        assert_eq!(&ControlMessage::End.to_frame()[..], b"END||");
        assert_eq!(
            &ControlMessage::GetWinners { agency: 7 }.to_frame()[..],
            b"GETWINNERS\x07||"
        );
    }

    #[test]
    fn control_parse() {
        for msg in [
            ControlMessage::Begin { agency: 0 },
            ControlMessage::End,
            ControlMessage::GetWinners { agency: 255 },
        ] {
            let frame = msg.to_frame();
            assert_eq!(ControlMessage::parse(&frame[..frame.len() - 2]), Some(msg));
        }
        assert_eq!(ControlMessage::parse(b""), None);
        assert_eq!(ControlMessage::parse(b"BEGIN"), None);
        assert_eq!(ControlMessage::parse(b"ENDX"), None);
    }

    #[test]
    fn status_tokens() {
        assert_eq!(Status::try_from(&b"OK"[..]).unwrap(), Status::Ok);
        assert_eq!(Status::try_from(&b"FAIL"[..]).unwrap(), Status::Fail);
        assert!(matches!(
            Status::try_from(&b"MAYBE"[..]),
            Err(LottoError::ProtocolDesync(_))
        ));
        assert_eq!(&Status::Fail.to_frame()[..], b"FAIL||");
    }

    #[test]
    fn winners_response_layout() {
        let winners: WinnerSet = [111, 0x0102_0304].into_iter().collect();
        let frame = WinnersResponse::Ready(winners).to_frame();

        let mut expected = b"OK||".to_vec();
        expected.extend_from_slice(&111u32.to_be_bytes());
        expected.extend_from_slice(&[1, 2, 3, 4]);
        expected.extend_from_slice(b"||");
        assert_eq!(&frame[..], &expected[..]);
    }

    #[test]
    fn winners_response_parse() {
        let winners: WinnerSet = [5, 111].into_iter().collect();
        let frame = WinnersResponse::Ready(winners.clone()).to_frame();
        let parsed = WinnersResponse::parse(&frame[..frame.len() - 2]).unwrap();
        assert_eq!(parsed, WinnersResponse::Ready(winners));
    }

    #[test]
    fn empty_winners_is_not_an_error() {
        let parsed = WinnersResponse::parse(b"OK||").unwrap();
        assert_eq!(parsed, WinnersResponse::Ready(WinnerSet::new()));
    }

    #[test]
    fn unavailable_winners() {
        let frame = WinnersResponse::Unavailable.to_frame();
        assert_eq!(&frame[..], b"FAIL||||");
        assert_eq!(
            WinnersResponse::parse(&frame[..frame.len() - 2]).unwrap(),
            WinnersResponse::Unavailable
        );
    }

    #[test]
    fn malformed_winners() {
        assert!(matches!(
            WinnersResponse::parse(b"OK||\x00\x00\x01"),
            Err(LottoError::ProtocolDesync(_))
        ));
        assert!(matches!(
            WinnersResponse::parse(b"\x00\x00\x00\x01"),
            Err(LottoError::ProtocolDesync(_))
        ));
    }
}
