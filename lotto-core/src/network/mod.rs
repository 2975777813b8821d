//! Transport-facing primitives: complete writes and terminator-delimited
//! reads over any `tokio` byte stream.

pub mod stream;

pub use stream::{write_all, FrameReader, DEFAULT_READ_CAPACITY};
