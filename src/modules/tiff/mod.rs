//! The TIFF module: the exemplar binary parser.
//!
//! Wires the header, value readers, and IFD walker below into the
//! `Module` contract. Grounded throughout on
//! `examples/photostructure-exif-oxide/src/core/{ifd,tiff,endian,types}.rs`.

pub mod header;
pub mod ifd;
pub mod tags;
pub mod values;

use crate::core::reader::Reader;
use crate::error::Result;
use crate::module::{register_module, Module, ModuleDescriptor, ModuleOptions, ParseOutcome};
use crate::signature::Signature;
use crate::types::rep_info::{RepInfo, TriState};

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "TIFF-hul",
    release: "1.0",
    date: "2026-01-01",
    formats: &["TIFF"],
    mime_types: &["image/tiff"],
    vendor: "curator",
    specifications: &["TIFF Revision 6.0 (Adobe, 1992)"],
    note: "",
    rights: "",
    is_random_access: true,
};

const SIGNATURES: &[Signature] = &[
    Signature::InternalMagic { offset: 0, bytes: b"II", mandatory: true },
    Signature::InternalMagic { offset: 0, bytes: b"MM", mandatory: true },
    Signature::External { extension: "tif" },
    Signature::External { extension: "tiff" },
];

#[derive(Default)]
pub struct TiffModule;

impl Module for TiffModule {
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
        match header::TiffHeader::parse(reader) {
            Ok(_) => {
                info.sig_match = vec![DESCRIPTOR.name.to_string()];
                info.valid = TriState::Undetermined;
                Ok(true)
            }
            Err(message) => {
                info.add_message(options.maybe_suppress(message));
                Ok(false)
            }
        }
    }

    fn parse_random_access(&mut self, reader: &mut dyn Reader, options: ModuleOptions, info: &mut RepInfo) -> Result<ParseOutcome> {
        info.format = Some("TIFF".to_string());

        let header = match header::TiffHeader::parse(reader) {
            Ok(h) => h,
            Err(message) => {
                info.add_message(options.maybe_suppress(message));
                return Ok(ParseOutcome::Done);
            }
        };

        if info.well_formed == TriState::Undetermined {
            info.well_formed = TriState::True;
        }
        if info.valid == TriState::Undetermined {
            info.valid = TriState::True;
        }

        let mut walker = ifd::IfdWalker::new(reader, &header, options);
        walker.walk_chain(header.first_ifd_offset, info)?;

        Ok(ParseOutcome::Done)
    }

    fn reset(&mut self) {}
}

pub fn register() {
    register_module(DESCRIPTOR.name, || Box::new(TiffModule));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn signature_check_does_not_advance_or_mutate_the_stream() {
        let data = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0xFF];
        let mut reader = SliceReader::new(&data);
        let mut module = TiffModule;
        let mut info = RepInfo::new("mem://sig");
        let matched = module.check_signatures(&mut reader, None, ModuleOptions::new(), &mut info).unwrap();
        assert!(matched);
        assert_eq!(info.sig_match, vec![DESCRIPTOR.name.to_string()]);
        assert_eq!(info.valid, TriState::Undetermined);
        // the byte at offset 8 is untouched/unread; re-reading the header
        // still succeeds, proving no destructive state was left behind.
        assert!(header::TiffHeader::parse(&mut reader).is_ok());
    }

    #[test]
    fn non_tiff_bytes_fail_signature_check() {
        let data = [0x00, 0x00, 0x00, 0x00];
        let mut reader = SliceReader::new(&data);
        let mut module = TiffModule;
        let mut info = RepInfo::new("mem://notiff");
        let matched = module.check_signatures(&mut reader, None, ModuleOptions::new(), &mut info).unwrap();
        assert!(!matched);
        assert_eq!(info.well_formed, TriState::False);
        assert!(info.messages.iter().any(|m| m.severity == crate::types::message::Severity::Fatal));
    }
}
