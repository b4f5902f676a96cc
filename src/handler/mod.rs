//! Handler Contract: the interface the core exposes to output serializers.
//!
//! Handlers consume a `RepInfo` tree and produce bytes; they never mutate
//! the Property tree (the trait below has no `&mut Property` anywhere) and
//! track their own indent/nesting depth.

pub mod json;
pub mod text;
pub mod xml;

use std::io::{self, Write};

use crate::module::ModuleDescriptor;
use crate::types::property::PropertyValue;
use crate::types::rep_info::RepInfo;

pub use json::JsonHandler;
pub use text::TextHandler;
pub use xml::XmlHandler;

/// Static metadata describing a handler implementation, mirroring the
/// shape of `ModuleDescriptor` — identity is `(name, release)`.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    pub name: &'static str,
    pub release: &'static str,
    pub date: &'static str,
    pub vendor: &'static str,
    pub note: &'static str,
    pub rights: &'static str,
}

/// Static metadata describing the application itself, shown once per
/// invocation ahead of any module or handler self-description.
#[derive(Debug, Clone)]
pub struct AppDescriptor {
    pub name: &'static str,
    pub release: &'static str,
    pub date: &'static str,
    pub rights: &'static str,
}

/// Output serializer contract. `show_*` methods borrow their arguments
/// immutably; only `self` (the handler's own writer/indent state) changes.
pub trait Handler {
    fn show_header(&mut self) -> io::Result<()>;

    /// The application's own self-description (name, release, rights),
    /// shown once per invocation ahead of any per-file output.
    fn show_app(&mut self, app: &AppDescriptor) -> io::Result<()>;

    /// The handler's own self-description, analogous to `show_module` but
    /// for the serializer itself rather than the format module that did
    /// the parsing.
    fn show_handler(&mut self, handler: &HandlerDescriptor) -> io::Result<()>;

    fn show_module(&mut self, module: &ModuleDescriptor) -> io::Result<()>;
    fn show_rep_info(&mut self, info: &RepInfo) -> io::Result<()>;
    fn show_footer(&mut self) -> io::Result<()>;
    fn close(&mut self) -> io::Result<()>;

    /// Directory-traversal callbacks.
    fn start_directory(&mut self, path: &str) -> io::Result<()>;
    fn end_directory(&mut self) -> io::Result<()>;

    /// Last-chance veto before a path is dispatched at all.
    fn ok_to_process(&mut self, _path: &str) -> bool {
        true
    }

    /// Last-chance hook before a populated RepInfo is emitted.
    fn analyze(&mut self, _info: &mut RepInfo) {}

    fn indent(&self) -> usize;
    fn push_indent(&mut self);
    fn pop_indent(&mut self);
}

/// Shared indent bookkeeping every concrete handler embeds.
#[derive(Debug, Default)]
pub(crate) struct IndentState {
    depth: usize,
}

impl IndentState {
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn push(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn pop(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

pub(crate) fn write_indented(out: &mut impl Write, depth: usize, line: &str) -> io::Result<()> {
    for _ in 0..depth {
        write!(out, "  ")?;
    }
    writeln!(out, "{line}")
}

/// Renders a scalar `PropertyValue` as display text; `None` for the
/// subtree variants (`PropertyList`/`NisoImageMetadata`), which a caller
/// must recurse into instead. Shared by the text and XML handlers so a
/// property's leaf rendering doesn't drift between the two.
pub(crate) fn scalar_value_text(value: &PropertyValue) -> Option<String> {
    match value {
        PropertyValue::Boolean(b) => Some(b.to_string()),
        PropertyValue::Integer(v) => Some(v.to_string()),
        PropertyValue::IntegerArray(v) => Some(format!("{v:?}")),
        PropertyValue::Float(v) => Some(v.to_string()),
        PropertyValue::FloatArray(v) => Some(format!("{v:?}")),
        PropertyValue::Rational(r) => Some(format!("{}/{}", r.numerator, r.denominator)),
        PropertyValue::RationalArray(rs) => {
            Some(rs.iter().map(|r| format!("{}/{}", r.numerator, r.denominator)).collect::<Vec<_>>().join(", "))
        }
        PropertyValue::SRational(r) => Some(format!("{}/{}", r.numerator, r.denominator)),
        PropertyValue::SRationalArray(rs) => {
            Some(rs.iter().map(|r| format!("{}/{}", r.numerator, r.denominator)).collect::<Vec<_>>().join(", "))
        }
        PropertyValue::Text(s) => Some(s.clone()),
        PropertyValue::TextArray(ss) => Some(ss.join(", ")),
        PropertyValue::Date(d) => Some(d.to_rfc3339()),
        PropertyValue::PropertyList(_) | PropertyValue::NisoImageMetadata(_) => None,
    }
}
