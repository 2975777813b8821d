//! Wire encoding for wager records and frames.
//!
//! - [`record`]: one [`Bet`](crate::Bet) to/from its fixed field layout,
//!   plus [`RecordCodec`] for use with `tokio_util` framed I/O.
//! - [`batch`]: terminator-delimited frames of consecutive records.
//! - [`request`]: central-side splitting of an agency's byte stream.

pub mod batch;
pub mod record;
pub mod request;

pub use batch::{assemble, frame_len, split_batch, MAX_FRAME_SIZE, TERMINATOR};
pub use record::{decode, encode, encoded_len, RecordCodec};
pub use request::{Request, RequestCodec};
