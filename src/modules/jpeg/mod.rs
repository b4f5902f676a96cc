//! JPEG module: a thinner sibling of the TIFF-IFD Engine.
//!
//! JPEG is a sequence of marker segments (`0xFFD8` SOI, `0xFFE0..0xFFEF`
//! APPn, `0xFFC0..0xFFCF` SOFn, `0xFFDA` SOS, `0xFFD9` EOI); well-
//! formedness here is "starts with SOI, every marker's declared length
//! stays in bounds, ends with EOI", which is a much shallower structural
//! check than the IFD algorithm the TIFF module carries. Depth deliberately
//! mirrors the "detailed exemplar vs. thinner sibling" split named for the
//! module family.

use crate::core::endian::Endian;
use crate::core::reader::Reader;
use crate::error::Result;
use crate::module::{register_module, Module, ModuleDescriptor, ModuleOptions, ParseOutcome};
use crate::signature::Signature;
use crate::types::message::Message;
use crate::types::property::Property;
use crate::types::rep_info::{RepInfo, TriState};

pub const MSG_BAD_SOI: &str = "JPEG-HUL-1";
pub const MSG_TRUNCATED_SEGMENT: &str = "JPEG-HUL-2";
pub const MSG_MISSING_EOI: &str = "JPEG-HUL-3";

const SOI: u16 = 0xFFD8;
const EOI: u16 = 0xFFD9;
const SOS: u16 = 0xFFDA;

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "JPEG-hul",
    release: "1.0",
    date: "2026-01-01",
    formats: &["JPEG"],
    mime_types: &["image/jpeg"],
    vendor: "curator",
    specifications: &["ITU-T T.81 (JPEG)"],
    note: "",
    rights: "",
    is_random_access: true,
};

const SIGNATURES: &[Signature] = &[
    Signature::InternalMagic { offset: 0, bytes: &[0xFF, 0xD8], mandatory: true },
    Signature::External { extension: "jpg" },
    Signature::External { extension: "jpeg" },
];

#[derive(Default)]
pub struct JpegModule;

impl Module for JpegModule {
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
        let marker = reader.read_u16(0, Endian::Big);
        match marker {
            Ok(SOI) => {
                info.sig_match = vec![DESCRIPTOR.name.to_string()];
                info.valid = TriState::Undetermined;
                Ok(true)
            }
            _ => {
                info.add_message(options.maybe_suppress(Message::fatal(MSG_BAD_SOI, "file does not start with SOI marker").at_offset(0)));
                Ok(false)
            }
        }
    }

    fn parse_random_access(&mut self, reader: &mut dyn Reader, options: ModuleOptions, info: &mut RepInfo) -> Result<ParseOutcome> {
        info.format = Some("JPEG".to_string());

        let soi = reader.read_u16(0, Endian::Big)?;
        if soi != SOI {
            info.add_message(options.maybe_suppress(Message::fatal(MSG_BAD_SOI, "file does not start with SOI marker").at_offset(0)));
            return Ok(ParseOutcome::Done);
        }

        if info.well_formed == TriState::Undetermined {
            info.well_formed = TriState::True;
        }
        if info.valid == TriState::Undetermined {
            info.valid = TriState::True;
        }

        let mut offset = 2u64;
        let mut saw_sos = false;
        let mut saw_eoi = false;

        loop {
            let marker = match reader.read_u16(offset, Endian::Big) {
                Ok(m) => m,
                Err(_) => break,
            };
            if marker == EOI {
                saw_eoi = true;
                break;
            }
            if marker & 0xFF00 != 0xFF00 {
                info.add_message(
                    Message::error(MSG_TRUNCATED_SEGMENT, format!("expected marker, found {marker:#06x}")).at_offset(offset),
                );
                break;
            }
            if marker == SOS {
                saw_sos = true;
                // Scan data has no declared length; without entropy-coded
                // segment scanning (out of scope here) we stop structural
                // walking at SOS and rely on the EOI check alone.
                break;
            }
            let length = reader.read_u16(offset + 2, Endian::Big)?;
            if options.verbose {
                info.add_property(Property::integer(format!("Segment-{marker:04X}"), length as i64));
            }
            offset += 2 + length as u64;
        }

        if !saw_eoi && !saw_sos {
            info.add_message(Message::error(MSG_MISSING_EOI, "no EOI marker found before end of file"));
        }

        Ok(ParseOutcome::Done)
    }

    fn reset(&mut self) {}
}

pub fn register() {
    register_module(DESCRIPTOR.name, || Box::new(JpegModule));
}
