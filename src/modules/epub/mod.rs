//! EPUB module: treats a third-party validator as an opaque oracle that
//! returns messages and metadata, per the spec's explicit scoping of
//! EPUB validation to "wholesale invocation" rather than a hand-rolled
//! container/OPF/OCF parser.
//!
//! `ExternalValidator` is the seam: the default implementation only
//! confirms the ZIP-based EPUB container's mandatory `mimetype` entry (the
//! one structural fact this module is willing to assert on its own) and
//! otherwise reports `Undetermined`, leaving real validation to whatever
//! external tool a caller wires in through `EpubModule::with_validator`.

use crate::core::reader::Reader;
use crate::error::Result;
use crate::module::{register_module, Module, ModuleDescriptor, ModuleOptions, ParseOutcome};
use crate::signature::Signature;
use crate::types::message::Message;
use crate::types::rep_info::{RepInfo, TriState};

pub const MSG_BAD_MIMETYPE_ENTRY: &str = "EPUB-HUL-1";

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "EPUB-hul",
    release: "1.0",
    date: "2026-01-01",
    formats: &["EPUB"],
    mime_types: &["application/epub+zip"],
    vendor: "curator",
    specifications: &["EPUB 3.3 (W3C)"],
    note: "delegates semantic validation to an external oracle",
    rights: "",
    is_random_access: true,
};

const SIGNATURES: &[Signature] = &[
    Signature::InternalMagic { offset: 0, bytes: b"PK\x03\x04", mandatory: true },
    Signature::External { extension: "epub" },
];

/// The external-validator seam. `validate` receives the already-open
/// reader and returns whatever Messages the validator produced; this
/// module does not interpret or re-derive them.
pub trait ExternalValidator {
    fn validate(&self, reader: &mut dyn Reader) -> Result<Vec<Message>>;
}

/// Confirms only the ZIP local-file-header signature and the presence of
/// a `mimetype` entry name immediately after it (the OCF container's one
/// mandatory, unambiguously-checkable structural rule); does not attempt
/// real EPUB package/content validation.
pub struct MimetypeOnlyValidator;

impl ExternalValidator for MimetypeOnlyValidator {
    fn validate(&self, reader: &mut dyn Reader) -> Result<Vec<Message>> {
        let header = reader.read_bytes(0, 30.min(reader.len() as usize))?;
        if header.len() < 30 || &header[0..4] != b"PK\x03\x04" {
            return Ok(vec![Message::fatal(MSG_BAD_MIMETYPE_ENTRY, "not a ZIP/OCF container")]);
        }
        let name_len = u16::from_le_bytes([header[26], header[27]]) as usize;
        let name_start = 30;
        let name_end = name_start + name_len;
        let name = reader.read_bytes(name_start as u64, name_len.min(name_end.saturating_sub(name_start)))?;
        if name != b"mimetype" {
            Ok(vec![Message::error(
                MSG_BAD_MIMETYPE_ENTRY,
                "first ZIP entry is not named 'mimetype'",
            )])
        } else {
            Ok(vec![])
        }
    }
}

pub struct EpubModule {
    validator: Box<dyn ExternalValidator + Send>,
}

impl Default for EpubModule {
    fn default() -> Self {
        Self { validator: Box::new(MimetypeOnlyValidator) }
    }
}

impl EpubModule {
    pub fn with_validator(validator: Box<dyn ExternalValidator + Send>) -> Self {
        Self { validator }
    }
}

impl Module for EpubModule {
    fn descriptor(&self) -> ModuleDescriptor {
        DESCRIPTOR
    }

    fn signatures(&self) -> &[Signature] {
        SIGNATURES
    }

    fn check_signatures(
        &mut self,
        reader: &mut dyn Reader,
        _extension: Option<&str>,
        options: ModuleOptions,
        info: &mut RepInfo,
    ) -> Result<bool> {
        let prefix = reader.read_bytes(0, 4.min(reader.len() as usize))?;
        if prefix == *b"PK\x03\x04" {
            info.sig_match = vec![DESCRIPTOR.name.to_string()];
            info.valid = TriState::Undetermined;
            Ok(true)
        } else {
            info.add_message(options.maybe_suppress(Message::fatal(MSG_BAD_MIMETYPE_ENTRY, "not a ZIP/OCF container")));
            Ok(false)
        }
    }

    fn parse_random_access(&mut self, reader: &mut dyn Reader, options: ModuleOptions, info: &mut RepInfo) -> Result<ParseOutcome> {
        info.format = Some("EPUB".to_string());

        let messages = self.validator.validate(reader)?;

        if info.well_formed == TriState::Undetermined {
            info.well_formed = TriState::True;
        }
        if info.valid == TriState::Undetermined {
            info.valid = TriState::True;
        }
        for message in messages {
            info.add_message(options.maybe_suppress(message));
        }

        Ok(ParseOutcome::Done)
    }

    fn reset(&mut self) {}
}

pub fn register() {
    register_module(DESCRIPTOR.name, || Box::new(EpubModule::default()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn accepts_container_with_mimetype_entry_first() {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(&[0u8; 22]); // rest of local file header
        data[26] = 8; // name length = 8 ("mimetype")
        data.extend_from_slice(b"mimetype");
        let mut reader = SliceReader::new(&data);
        let mut module = EpubModule::default();
        let mut info = RepInfo::new("mem://epub");
        module.parse_random_access(&mut reader, ModuleOptions::new(), &mut info).unwrap();
        assert_eq!(info.well_formed, TriState::True);
    }

    #[test]
    fn flags_container_missing_mimetype_entry() {
        let mut data = b"PK\x03\x04".to_vec();
        data.extend_from_slice(&[0u8; 22]);
        data[26] = 5;
        data.extend_from_slice(b"other");
        let mut reader = SliceReader::new(&data);
        let mut module = EpubModule::default();
        let mut info = RepInfo::new("mem://badepub");
        module.parse_random_access(&mut reader, ModuleOptions::new(), &mut info).unwrap();
        assert!(info.messages.iter().any(|m| m.id == MSG_BAD_MIMETYPE_ENTRY));
    }
}
