//! `curator`: a file-format identification, validation, and
//! characterization engine for digital preservation.
//!
//! Given a byte stream purporting to be a file of some format, answers
//! three questions: is it recognizable as that format (well-formed), does
//! it conform to the format's rules (valid), and what technical metadata
//! does it carry. See [`dispatcher::Dispatcher`] for the entry point.

pub mod core;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod hash;
pub mod module;
pub mod modules;
pub mod signature;
pub mod types;

pub use error::{Error, Result};
