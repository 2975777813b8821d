//! Central-side framing of what an agency sends.
//!
//! An agency writes BEGIN and its first batch (or END and GETWINNERS)
//! back to back, so several frames can arrive in one read. Because the
//! terminator is not escaped, a `||` only ends a frame when the bytes
//! before it form a control message or a whole number of records.
//!
//! A `||` right after a whole record is also the start of a record when
//! the agency id and the first name length are both `0x7C`. An agency
//! never writes past a batch before its ack, so bytes already buffered
//! after such a `||` mean it was record data. If a read ends exactly on
//! it there is nothing to look at yet, and it is taken as the end of the
//! frame.

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::bet::Bet;
use crate::codec::batch::{split_batch, MAX_FRAME_SIZE, TERMINATOR};
use crate::codec::record;
use crate::error::LottoError;
use crate::message::ControlMessage;

/// One frame received from an agency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Control(ControlMessage),
    Batch(Vec<Bet>),
    /// A terminated frame that is neither; answered with `FAIL`.
    Rejected(String),
}

/// `tokio_util` codec splitting an agency's byte stream into [`Request`]s.
///
/// Encodes already-terminated response frames unchanged.
#[derive(Debug, Clone, Copy)]
pub struct RequestCodec {
    max_frame_size: usize,
}

impl Default for RequestCodec {
    fn default() -> Self {
        Self::new(MAX_FRAME_SIZE)
    }
}

impl RequestCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }
}

impl Decoder for RequestCodec {
    type Item = Request;
    type Error = LottoError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let mut end = 0;
        while let Some(pos) = find_terminator(&src[end..]) {
            end += pos;
            let payload = &src[..end];

            let request = if let Some(msg) = ControlMessage::parse(payload) {
                Some(Request::Control(msg))
            } else {
                match split_batch(payload) {
                    Ok(bets) if continues_record(&bets, &src[end..]) => None,
                    Ok(bets) if !bets.is_empty() => Some(Request::Batch(bets)),
                    // The `||` was record data; keep looking. Agencies never
                    // send empty batches, so an empty payload is record data
                    // too.
                    Ok(_) | Err(LottoError::Truncated { .. }) | Err(LottoError::ProtocolDesync(_)) => {
                        None
                    }
                    Err(e) => Some(Request::Rejected(e.to_string())),
                }
            };

            if let Some(request) = request {
                src.advance(end + TERMINATOR.len());
                return Ok(Some(request));
            }
            end += 1;
        }

        if src.len() > self.max_frame_size {
            return Err(LottoError::FrameTooLarge {
                size: src.len(),
                max: self.max_frame_size,
            });
        }
        Ok(None)
    }
}

impl Encoder<Bytes> for RequestCodec {
    type Error = LottoError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item);
        Ok(())
    }
}

/// Whether the `||` at the front of `rest` opens another record of the
/// same agency rather than ending the batch.
fn continues_record(bets: &[Bet], rest: &[u8]) -> bool {
    let Some(last) = bets.last() else {
        return false;
    };
    if last.agency() != TERMINATOR[0] || rest.len() <= TERMINATOR.len() {
        return false;
    }
    match record::decode(rest) {
        Ok(_) | Err(LottoError::Truncated { .. }) => true,
        Err(_) => false,
    }
}

fn find_terminator(data: &[u8]) -> Option<usize> {
    data.windows(TERMINATOR.len()).position(|w| w == TERMINATOR.as_slice())
}
