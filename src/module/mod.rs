//! Module Framework: the abstract contract every format parser implements.

mod registry;

pub use registry::{register_module, registered_modules, ModuleEntry};

use crate::core::reader::Reader;
use crate::error::{Error, Result};
use crate::signature::Signature;
use crate::types::message::Message;
use crate::types::rep_info::RepInfo;

/// Static metadata describing a module. Identity of a module is
/// `(name, release)`.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    pub name: &'static str,
    pub release: &'static str,
    pub date: &'static str,
    pub formats: &'static [&'static str],
    pub mime_types: &'static [&'static str],
    pub vendor: &'static str,
    pub specifications: &'static [&'static str],
    pub note: &'static str,
    pub rights: &'static str,
    pub is_random_access: bool,
}

/// Per-parse options every module must honor, threaded explicitly rather
/// than read from module-global state — the teacher's `FilterOptions` is
/// passed the same way into every call that needs it.
#[derive(Debug, Clone, Copy)]
pub struct ModuleOptions {
    /// Emit bitfield/enum Properties as raw integers instead of labels.
    pub raw: bool,
    /// Include low-level segment detail.
    pub verbose: bool,
    /// Suppress the IFD tag-ordering invariant check (Open Question #2).
    pub strict_tag_order: bool,
    /// Downgrade an odd out-of-line offset from Fatal to Info when the
    /// value read there is itself in-domain.
    pub byte_offset_is_valid: bool,
    /// Downgrade every Fatal message to Info: a module still stops parsing
    /// at the point a fatal condition would have fired, but the caller
    /// gets a populated RepInfo back instead of `well_formed = False`.
    pub suppress_errors: bool,
}

impl ModuleOptions {
    pub fn new() -> Self {
        Self {
            raw: false,
            verbose: false,
            strict_tag_order: true,
            byte_offset_is_valid: false,
            suppress_errors: false,
        }
    }

    /// Applies the `suppress_errors` downgrade to `message`: a Fatal
    /// becomes Info when set, otherwise `message` is returned unchanged.
    /// This is the general mechanism; `byte_offset_is_valid`'s odd-offset-
    /// specific downgrade is layered on top of this by the TIFF IFD walker,
    /// not folded in here.
    pub fn maybe_suppress(&self, message: Message) -> Message {
        if self.suppress_errors && message.severity == crate::types::message::Severity::Fatal {
            message.downgrade_to_info()
        } else {
            message
        }
    }
}

/// `strict_tag_order: true` is the intended default (Open Question #2's
/// resolution in DESIGN.md) — implemented explicitly rather than derived so
/// `ModuleOptions::default()` and `ModuleOptions::new()` cannot drift apart.
impl Default for ModuleOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What a stream-based `parse` call returns: either the file is fully
/// characterized, or the dispatcher must re-open the stream and invoke
/// `parse` again, passing this index back in as the next call's
/// `parse_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Done,
    ContinueAt(u32),
}

/// Contract every format module implements.
///
/// `check_signatures` must not leave `reader` in a different logical
/// position than it found it — all of its reads are by absolute offset, so
/// this is automatically satisfied by any implementation built on
/// [`Reader`].
///
/// There are two distinct `parse` entry points rather than one merged
/// signature: [`Module::parse_stream`] for formats whose characterization
/// can proceed over a forward-only source, and [`Module::parse_random_access`]
/// for seek-heavy formats (TIFF, PDF) that must jump to arbitrary offsets.
/// A module implements whichever matches `descriptor().is_random_access`
/// and inherits the other's default, which reports
/// `Error::NotRandomAccess`.
pub trait Module {
    fn descriptor(&self) -> ModuleDescriptor;

    fn signatures(&self) -> &[Signature];

    /// Non-destructive: sets `info.sig_match` and `info.valid =
    /// Undetermined` on match, else leaves `info.well_formed = False`.
    fn check_signatures(
        &mut self,
        reader: &mut dyn Reader,
        extension: Option<&str>,
        options: ModuleOptions,
        info: &mut RepInfo,
    ) -> Result<bool>;

    /// Stream-based parse: `reader` need not support genuine random access
    /// (see [`Reader::is_seekable`]) — only reads from wherever the
    /// previous call left off are guaranteed to succeed. Returns the next
    /// `parse_index` to re-invoke with, or `ParseOutcome::Done`.
    ///
    /// `parse_index` is `0` on the first invocation for a file and, on every
    /// re-invocation, whatever value the previous call returned via
    /// `ParseOutcome::ContinueAt` — this is how a multi-pass module tells
    /// invocation 1 apart from invocation 2+ of the same characterization.
    fn parse_stream(
        &mut self,
        reader: &mut dyn Reader,
        options: ModuleOptions,
        info: &mut RepInfo,
        parse_index: u32,
    ) -> Result<ParseOutcome> {
        let _ = (reader, options, info, parse_index);
        Err(Error::NotRandomAccess(self.descriptor().name.to_string()))
    }

    /// Random-access parse variant for seek-heavy formats (TIFF, PDF). Only
    /// called when `descriptor().is_random_access` is true AND the reader
    /// reports [`Reader::is_seekable`] — the dispatcher refuses to call
    /// this on non-seekable input (see `ensure_random_access`). Single-
    /// pass by contract: unlike `parse_stream`, there is no re-invocation
    /// index.
    fn parse_random_access(
        &mut self,
        reader: &mut dyn Reader,
        options: ModuleOptions,
        info: &mut RepInfo,
    ) -> Result<ParseOutcome> {
        let _ = (reader, options, info);
        Err(Error::NotRandomAccess(self.descriptor().name.to_string()))
    }

    /// Idempotent; clears per-file state. Must be called (or the module
    /// re-instantiated) before reuse across files, since `parse_stream` may
    /// accumulate per-file state between a `ContinueAt` re-invocation.
    fn reset(&mut self);
}

/// Returns `Err(Error::NotRandomAccess)` when `descriptor` requires random
/// access but `reader` cannot provide it. The dispatcher calls this before
/// invoking `parse_random_access`, per the documented refusal to call that
/// variant on non-seekable input.
pub fn ensure_random_access(descriptor: &ModuleDescriptor, reader: &dyn Reader) -> Result<()> {
    if descriptor.is_random_access && !reader.is_seekable() {
        Err(Error::NotRandomAccess(descriptor.name.to_string()))
    } else {
        Ok(())
    }
}
