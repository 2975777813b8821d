//! Batch frames: consecutive records followed by the terminator.
//!
//! The terminator is not escaped inside records. A name byte or a
//! big-endian integer containing `0x7C 0x7C` looks exactly like the end
//! of a frame; readers that need to tell the two apart must check that
//! the payload decodes into whole records ([`split_batch`]).

use bytes::{BufMut, Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::bet::Bet;
use crate::codec::record::{self, RecordCodec};
use crate::error::LottoError;

/// Frame terminator appended to every frame on the wire.
pub const TERMINATOR: [u8; 2] = *b"||";

/// Default cap on a frame's wire size, terminator included.
pub const MAX_FRAME_SIZE: usize = 8 * 1024;

/// Serialize `bets` in order into one terminated frame.
///
/// The size is checked before anything is encoded, so an oversized batch
/// never reaches the transport.
pub fn assemble(bets: &[Bet], max_frame_size: usize) -> Result<Bytes, LottoError> {
    let size = frame_len(bets);
    if size > max_frame_size {
        return Err(LottoError::FrameTooLarge {
            size,
            max: max_frame_size,
        });
    }

    let mut frame = BytesMut::with_capacity(size);
    for bet in bets {
        record::encode(bet, &mut frame);
    }
    frame.put_slice(&TERMINATOR);
    Ok(frame.freeze())
}

/// Wire size of the frame [`assemble`] would build for `bets`.
pub fn frame_len(bets: &[Bet]) -> usize {
    bets.iter().map(record::encoded_len).sum::<usize>() + TERMINATOR.len()
}

/// Decode a batch payload (terminator already stripped) into its records.
pub fn split_batch(payload: &[u8]) -> Result<Vec<Bet>, LottoError> {
    let mut codec = RecordCodec;
    let mut buf = BytesMut::from(payload);
    let mut bets = Vec::new();

    while !buf.is_empty() {
        match codec.decode(&mut buf)? {
            Some(bet) => bets.push(bet),
            None => {
                return Err(LottoError::ProtocolDesync(format!(
                    "batch ends with {} bytes of a partial record",
                    buf.len()
                )));
            }
        }
    }
    Ok(bets)
}
