//! Structured, code-identified diagnostics.
//!
//! The teacher's own error type carries a TODO calling out that it should
//! eventually grow "warnings, errors, fatal" classification
//! (`examples/photostructure-exif-oxide/src/types/errors.rs`); this module
//! is that classification, generalized into the four-level severity model
//! every module reports through.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

/// A single diagnostic raised during a parse.
///
/// `id` is a stable short code (e.g. `TIFF-HUL-2`) and is itself a public
/// API: once shipped, an id's meaning must not change out from under
/// callers that match on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub severity: Severity,
    pub offset: Option<u64>,
    pub submessage: Option<Box<Message>>,
}

impl Message {
    pub fn new(id: impl Into<String>, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            severity,
            offset: None,
            submessage: None,
        }
    }

    pub fn info(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Severity::Info, text)
    }

    pub fn warning(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Severity::Warning, text)
    }

    pub fn error(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Severity::Error, text)
    }

    pub fn fatal(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, Severity::Fatal, text)
    }

    pub fn at_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_submessage(mut self, sub: Message) -> Self {
        self.submessage = Some(Box::new(sub));
        self
    }

    /// Downgrades a Fatal to an Info, used when a module is invoked in
    /// suppress-errors mode: chaining still stops, but the caller gets a
    /// populated RepInfo instead of an unwind.
    pub fn downgrade_to_info(mut self) -> Self {
        self.severity = Severity::Info;
        self
    }
}
