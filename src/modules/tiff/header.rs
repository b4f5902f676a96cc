//! TIFF header: 2-byte endian marker, 2-byte magic, 4-byte first-IFD offset.
//!
//! Any deviation here is fatal — grounded on the teacher's
//! `core/tiff.rs::find_ifd_data`, which treats a bad magic number as an
//! unrecoverable condition rather than a recoverable Error.

use crate::core::endian::Endian;
use crate::core::reader::Reader;
use crate::types::message::Message;

pub const MSG_BAD_HEADER: &str = "TIFF-HUL-1";

#[derive(Debug, Clone, Copy)]
pub struct TiffHeader {
    pub endian: Endian,
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parses the 8-byte TIFF header. Returns `Err` (a Fatal `Message`,
    /// never a Rust panic) on any deviation from `II`/`MM` + magic `42`.
    pub fn parse(reader: &mut dyn Reader) -> std::result::Result<Self, Message> {
        let bytes = reader
            .read_bytes(0, 8)
            .map_err(|_| Message::fatal(MSG_BAD_HEADER, "file is shorter than a TIFF header"))?;

        let endian = Endian::from_tiff_header(&bytes)
            .ok_or_else(|| Message::fatal(MSG_BAD_HEADER, "missing II/MM byte-order marker"))?;

        let magic = endian.read_u16(&bytes[2..4]);
        if magic != 42 {
            return Err(Message::fatal(
                MSG_BAD_HEADER,
                format!("expected TIFF magic number 42, found {magic}"),
            )
            .at_offset(2));
        }

        let first_ifd_offset = endian.read_u32(&bytes[4..8]);
        Ok(Self { endian, first_ifd_offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn parses_little_endian_header() {
        let data = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        let mut r = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut r).unwrap();
        assert_eq!(header.endian, Endian::Little);
        assert_eq!(header.first_ifd_offset, 8);
    }

    #[test]
    fn parses_big_endian_header() {
        let data = [0x4D, 0x4D, 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        let mut r = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut r).unwrap();
        assert_eq!(header.endian, Endian::Big);
        assert_eq!(header.first_ifd_offset, 8);
    }

    #[test]
    fn rejects_bad_magic() {
        let data = [0x49, 0x49, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00];
        let mut r = SliceReader::new(&data);
        let err = TiffHeader::parse(&mut r).unwrap_err();
        assert_eq!(err.id, MSG_BAD_HEADER);
    }

    #[test]
    fn rejects_truncated_header() {
        let data = [0x49, 0x49];
        let mut r = SliceReader::new(&data);
        assert!(TiffHeader::parse(&mut r).is_err());
    }
}
