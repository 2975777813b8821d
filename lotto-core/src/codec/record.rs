//! Fixed-layout record encoding.
//!
//! ```text
//!  agency  len  first_name  len  last_name  document  year  month  day  number
//!    1B    1B    0..=255B   1B   0..=255B     4B      2B    1B    1B    4B
//! ```
//!
//! All multi-byte integers are big-endian.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Decoder;

use crate::bet::{Bet, Birthdate};
use crate::error::LottoError;

/// Bytes taken by the fixed-width fields of a record.
const FIXED_LEN: usize = 1 + 1 + 1 + 4 + 2 + 1 + 1 + 4;

/// Exact number of bytes [`encode`] writes for `bet`.
pub fn encoded_len(bet: &Bet) -> usize {
    FIXED_LEN + bet.first_name().len() + bet.last_name().len()
}

/// Append the wire form of `bet` to `dst`.
pub fn encode(bet: &Bet, dst: &mut BytesMut) {
    dst.reserve(encoded_len(bet));

    dst.put_u8(bet.agency());
    // Name lengths are bounded by `Bet::new`.
    dst.put_u8(bet.first_name().len() as u8);
    dst.put_slice(bet.first_name().as_bytes());
    dst.put_u8(bet.last_name().len() as u8);
    dst.put_slice(bet.last_name().as_bytes());
    dst.put_u32(bet.document());

    let birthdate = bet.birthdate();
    dst.put_u16(birthdate.year);
    dst.put_u8(birthdate.month);
    dst.put_u8(birthdate.day);

    dst.put_u32(bet.number());
}

/// Decode one record from the front of `src`.
///
/// Returns the record and the number of bytes it occupied.
pub fn decode(src: &[u8]) -> Result<(Bet, usize), LottoError> {
    let mut buf = src;

    need(buf, 2)?;
    let agency = buf.get_u8();
    let first_name = take_name(&mut buf)?;

    need(buf, 1)?;
    let last_name = take_name(&mut buf)?;

    need(buf, 4 + 2 + 1 + 1 + 4)?;
    let document = buf.get_u32();
    let birthdate = Birthdate::new(buf.get_u16(), buf.get_u8(), buf.get_u8());
    let number = buf.get_u32();

    let consumed = src.len() - buf.len();
    let bet = Bet::new(agency, first_name, last_name, document, birthdate, number)?;
    Ok((bet, consumed))
}

fn need(buf: &[u8], needed: usize) -> Result<(), LottoError> {
    if buf.len() < needed {
        return Err(LottoError::Truncated {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}

fn take_name(buf: &mut &[u8]) -> Result<String, LottoError> {
    let len = buf.get_u8() as usize;
    need(buf, len)?;
    let name = String::from_utf8(buf[..len].to_vec())?;
    buf.advance(len);
    Ok(name)
}

// ── RecordCodec ──────────────────────────────────────────────────

/// `tokio_util` codec for a bare stream of records.
///
/// Decoding yields `None` until a whole record is buffered.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordCodec;

impl Decoder for RecordCodec {
    type Item = Bet;
    type Error = LottoError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match decode(&src[..]) {
            Ok((bet, consumed)) => {
                src.advance(consumed);
                Ok(Some(bet))
            }
            Err(LottoError::Truncated { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
