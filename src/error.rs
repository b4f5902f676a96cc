//! Crate-level error type for I/O and structural failures.
//!
//! This is distinct from the [`crate::types::message::Message`] diagnostic
//! model: `Error` is what a [`crate::core::reader::Reader`] or the
//! dispatcher returns when it cannot proceed at all (I/O failure, a path
//! that doesn't exist). A malformed-but-readable file never reaches this
//! type — it is reported as a Fatal `Message` on the `RepInfo` instead.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected end of input: needed {need} bytes, had {have}")]
    UnexpectedEof { need: u64, have: u64 },

    #[error("offset {offset} is out of bounds (file size {size})")]
    OutOfBounds { offset: u64, size: u64 },

    #[error("no module registered under name {0:?}")]
    UnknownModule(String),

    #[error("module {0:?} does not support random access and cannot be used on this input")]
    NotRandomAccess(String),

    #[error("value count {count} overflows addressable array bound for tag {tag}")]
    CountOverflow { tag: u16, count: u64 },

    #[error("input is not seekable: read at offset {offset} requested, current position is {pos}")]
    NotSeekable { offset: u64, pos: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
