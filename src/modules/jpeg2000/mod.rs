//! JPEG 2000 module: another thin sibling, structured as a sequence of
//! length-prefixed boxes (ISO/IEC 15444-1 JP2 container format) rather
//! than JPEG's marker stream — still shallow by design relative to TIFF.

use crate::core::endian::Endian;
use crate::core::reader::Reader;
use crate::error::Result;
use crate::module::{register_module, Module, ModuleDescriptor, ModuleOptions, ParseOutcome};
use crate::signature::Signature;
use crate::types::message::Message;
use crate::types::property::Property;
use crate::types::rep_info::{RepInfo, TriState};

pub const MSG_BAD_SIGNATURE_BOX: &str = "JP2-HUL-1";
pub const MSG_TRUNCATED_BOX: &str = "JP2-HUL-2";

const SIGNATURE_BOX: [u8; 12] = [0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A];

pub const DESCRIPTOR: ModuleDescriptor = ModuleDescriptor {
    name: "JPEG2000-hul",
    release: "1.0",
    date: "2026-01-01",
    formats: &["JPEG 2000"],
    mime_types: &["image/jp2"],
    vendor: "curator",
    specifications: &["ISO/IEC 15444-1"],
    note: "",
    rights: "",
    is_random_access: true,
};

const SIGNATURES: &[Signature] = &[
    Signature::InternalMagic { offset: 0, bytes: &SIGNATURE_BOX, mandatory: true },
    Signature::External { extension: "jp2" },
];

#[derive(Default)]
pub struct Jpeg2000Module;

impl Module for Jpeg2000Module {
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
        let prefix = reader.read_bytes(0, SIGNATURE_BOX.len())?;
        if prefix == SIGNATURE_BOX {
            info.sig_match = vec![DESCRIPTOR.name.to_string()];
            info.valid = TriState::Undetermined;
            Ok(true)
        } else {
            info.add_message(options.maybe_suppress(Message::fatal(MSG_BAD_SIGNATURE_BOX, "missing JP2 signature box").at_offset(0)));
            Ok(false)
        }
    }

    fn parse_random_access(&mut self, reader: &mut dyn Reader, options: ModuleOptions, info: &mut RepInfo) -> Result<ParseOutcome> {
        info.format = Some("JPEG 2000".to_string());

        let prefix = reader.read_bytes(0, SIGNATURE_BOX.len())?;
        if prefix != SIGNATURE_BOX {
            info.add_message(options.maybe_suppress(Message::fatal(MSG_BAD_SIGNATURE_BOX, "missing JP2 signature box").at_offset(0)));
            return Ok(ParseOutcome::Done);
        }

        if info.well_formed == TriState::Undetermined {
            info.well_formed = TriState::True;
        }
        if info.valid == TriState::Undetermined {
            info.valid = TriState::True;
        }

        let mut offset = SIGNATURE_BOX.len() as u64;
        let file_len = reader.len();
        while offset + 8 <= file_len {
            let box_len = reader.read_u32(offset, Endian::Big)? as u64;
            let box_type = reader.read_bytes(offset + 4, 4)?;
            if box_len < 8 {
                info.add_message(Message::error(MSG_TRUNCATED_BOX, "box declares a length shorter than its own header").at_offset(offset));
                break;
            }
            if options.verbose {
                let type_name = String::from_utf8_lossy(&box_type).to_string();
                info.add_property(Property::integer(format!("Box-{type_name}"), box_len as i64));
            }
            offset += box_len;
        }

        Ok(ParseOutcome::Done)
    }

    fn reset(&mut self) {}
}

pub fn register() {
    register_module(DESCRIPTOR.name, || Box::new(Jpeg2000Module));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn well_formed_minimal_jp2() {
        let mut data = SIGNATURE_BOX.to_vec();
        data.extend_from_slice(&16u32.to_be_bytes());
        data.extend_from_slice(b"ftyp");
        data.extend_from_slice(&[0u8; 8]);
        let mut reader = SliceReader::new(&data);
        let mut module = Jpeg2000Module;
        let mut info = RepInfo::new("mem://jp2");
        module.parse_random_access(&mut reader, ModuleOptions::new(), &mut info).unwrap();
        assert_eq!(info.well_formed, TriState::True);
    }

    #[test]
    fn missing_signature_box_is_fatal() {
        let data = [0u8; 12];
        let mut reader = SliceReader::new(&data);
        let mut module = Jpeg2000Module;
        let mut info = RepInfo::new("mem://notjp2");
        module.parse_random_access(&mut reader, ModuleOptions::new(), &mut info).unwrap();
        assert_eq!(info.well_formed, TriState::False);
    }
}
