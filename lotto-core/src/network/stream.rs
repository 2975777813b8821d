//! Reliable frame I/O over a byte stream.
//!
//! A transport may move fewer bytes than asked on every call. [`write_all`]
//! keeps writing until the whole buffer is out; [`FrameReader`] keeps
//! reading until the accumulated bytes end with the frame terminator.

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::codec::TERMINATOR;
use crate::error::LottoError;

/// Receive ceiling used when none is configured.
pub const DEFAULT_READ_CAPACITY: usize = 1024;

/// Write every byte of `buf`, looping over partial writes, then flush.
///
/// A zero-length write is treated like an error: the peer is gone.
pub async fn write_all<W>(stream: &mut W, buf: &[u8]) -> Result<(), LottoError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < buf.len() {
        let n = stream
            .write(&buf[written..])
            .await
            .map_err(LottoError::TransportWrite)?;
        if n == 0 {
            return Err(LottoError::TransportWrite(std::io::Error::new(
                std::io::ErrorKind::WriteZero,
                format!("wrote {written} of {} bytes", buf.len()),
            )));
        }
        written += n;
    }
    stream.flush().await.map_err(LottoError::TransportWrite)
}

// ── FrameReader ──────────────────────────────────────────────────

/// Reads terminator-delimited frames into a buffer of fixed capacity.
///
/// The capacity is a hard ceiling on a single frame, terminator included.
/// It is never grown: a frame that does not fit fails with
/// [`LottoError::BufferExhausted`] so the caller can raise the limit.
#[derive(Debug, Clone, Copy)]
pub struct FrameReader {
    capacity: usize,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new(DEFAULT_READ_CAPACITY)
    }
}

impl FrameReader {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Read one frame and return its payload without the terminator.
    ///
    /// Stops as soon as the bytes read so far end with the terminator.
    pub async fn read_frame<R>(&self, stream: &mut R) -> Result<Bytes, LottoError>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = BytesMut::zeroed(self.capacity);
        let mut filled = 0;

        loop {
            if filled == self.capacity {
                return Err(LottoError::BufferExhausted {
                    capacity: self.capacity,
                });
            }

            let n = stream
                .read(&mut buf[filled..])
                .await
                .map_err(LottoError::TransportRead)?;
            if n == 0 {
                return Err(LottoError::TransportRead(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("stream closed after {filled} bytes without a terminator"),
                )));
            }
            filled += n;

            if buf[..filled].ends_with(&TERMINATOR) {
                buf.truncate(filled - TERMINATOR.len());
                return Ok(buf.freeze());
            }
        }
    }
}
