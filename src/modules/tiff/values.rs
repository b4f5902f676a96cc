//! TIFF tag type domain, value readers, and count/type coercion helpers.
//!
//! The type domain and element sizes are grounded on the teacher's
//! `core/types.rs::ExifFormat`, extended to include type 13 (IFD) per the
//! documented domain `1..=13`.

use crate::core::endian::Endian;
use crate::core::rational::{Rational, SRational};
use crate::core::reader::Reader;
use crate::error::{Error, Result};
use crate::types::message::Message;

pub const MSG_UNKNOWN_TYPE: &str = "TIFF-HUL-3";
pub const MSG_BAD_COUNT: &str = "TIFF-HUL-5";

/// The 1..=13 TIFF type domain. Observing any variant `>= SByte` promotes
/// an IFD's version to 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
    Ifd = 13,
}

impl TiffType {
    pub fn from_u16(code: u16) -> Option<Self> {
        Some(match code {
            1 => TiffType::Byte,
            2 => TiffType::Ascii,
            3 => TiffType::Short,
            4 => TiffType::Long,
            5 => TiffType::Rational,
            6 => TiffType::SByte,
            7 => TiffType::Undefined,
            8 => TiffType::SShort,
            9 => TiffType::SLong,
            10 => TiffType::SRational,
            11 => TiffType::Float,
            12 => TiffType::Double,
            13 => TiffType::Ifd,
            _ => return None,
        })
    }

    pub fn element_size(&self) -> u32 {
        match self {
            TiffType::Byte | TiffType::Ascii | TiffType::SByte | TiffType::Undefined => 1,
            TiffType::Short | TiffType::SShort => 2,
            TiffType::Long | TiffType::SLong | TiffType::Float | TiffType::Ifd => 4,
            TiffType::Rational | TiffType::SRational | TiffType::Double => 8,
        }
    }

    /// Observing this type promotes the owning IFD's version to 6.
    pub fn promotes_version(&self) -> bool {
        !matches!(self, TiffType::Byte | TiffType::Ascii | TiffType::Short | TiffType::Long | TiffType::Rational)
    }

    /// Unsigned-integer tags tolerate BYTE, SHORT, LONG, or IFD
    /// interchangeably; any other substitution is rejected.
    pub fn is_unsigned_integer_compatible(&self) -> bool {
        matches!(self, TiffType::Byte | TiffType::Short | TiffType::Long | TiffType::Ifd)
    }
}

/// Validates a type code against the declared domain. An unknown code is
/// reported as `TIFF-HUL-3` and the caller must skip the entry, not abort.
pub fn validate_type(code: u16, offset: u64) -> std::result::Result<TiffType, Message> {
    TiffType::from_u16(code)
        .ok_or_else(|| Message::error(MSG_UNKNOWN_TYPE, format!("unknown tag type {code}")).at_offset(offset))
}

/// `checkCount`: rejects `count < min_count`.
pub fn check_count(tag: u16, count: u32, min_count: u32) -> std::result::Result<(), Message> {
    if count < min_count {
        Err(Message::error(
            MSG_BAD_COUNT,
            format!("tag {tag:#06x} has count {count}, expected at least {min_count}"),
        ))
    } else {
        Ok(())
    }
}

/// `checkCountArray`: rejects a count that would overflow the addressable
/// array bound before any allocation is attempted.
pub fn check_count_array(tag: u16, count: u32, element_size: u32) -> Result<()> {
    let total = (count as u64).checked_mul(element_size as u64);
    match total {
        Some(n) if n <= i32::MAX as u64 => Ok(()),
        _ => Err(Error::CountOverflow { tag, count: count as u64 }),
    }
}

/// Reads a single tag's values, given the resolved absolute offset the
/// caller has already computed (inline window or out-of-line offset) and
/// the element count.
pub fn read_unsigned_integers(
    reader: &mut dyn Reader,
    offset: u64,
    ty: TiffType,
    count: u32,
    endian: Endian,
) -> Result<Vec<u32>> {
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count as u64 {
        let v = match ty {
            TiffType::Byte => reader.read_u8(offset + i)? as u32,
            TiffType::Short => reader.read_u16(offset + i * 2, endian)? as u32,
            TiffType::Long | TiffType::Ifd => reader.read_u32(offset + i * 4, endian)?,
            _ => return Err(Error::CountOverflow { tag: 0, count: 0 }),
        };
        out.push(v);
    }
    Ok(out)
}

pub fn read_rationals(reader: &mut dyn Reader, offset: u64, count: u32, endian: Endian) -> Result<Vec<Rational>> {
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count as u64 {
        let base = offset + i * 8;
        let num = reader.read_u32(base, endian)?;
        let den = reader.read_u32(base + 4, endian)?;
        out.push(Rational::new(num, den));
    }
    Ok(out)
}

pub fn read_srationals(reader: &mut dyn Reader, offset: u64, count: u32, endian: Endian) -> Result<Vec<SRational>> {
    let mut out = Vec::with_capacity(count as usize);
    for i in 0..count as u64 {
        let base = offset + i * 8;
        let num = reader.read_i32(base, endian)?;
        let den = reader.read_i32(base + 4, endian)?;
        out.push(SRational::new(num, den));
    }
    Ok(out)
}

/// ASCII tag reader. A single ASCII property is the NUL-terminated string
/// at `offset`, with non-ASCII bytes percent-escaped as `%XX`. Arrays of
/// ASCII (count covering multiple NUL-delimited runs) split on every NUL;
/// the returned length equals the number of NUL-terminated substrings
/// encountered.
pub fn read_ascii_array(reader: &mut dyn Reader, offset: u64, count: u32) -> Result<Vec<String>> {
    let raw = reader.read_bytes(offset, count as usize)?;
    let mut out = Vec::new();
    let mut current = String::new();
    let mut found_any = false;
    for &b in &raw {
        if b == 0 {
            out.push(std::mem::take(&mut current));
            found_any = true;
        } else if b.is_ascii() && !b.is_ascii_control() {
            current.push(b as char);
        } else {
            current.push_str(&format!("%{b:02X}"));
        }
    }
    if !current.is_empty() {
        out.push(current);
        found_any = true;
    }
    if !found_any {
        out.push(String::new());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn type_domain_promotes_version_from_sbyte_up() {
        assert!(!TiffType::Long.promotes_version());
        assert!(TiffType::SByte.promotes_version());
        assert!(TiffType::Ifd.promotes_version());
    }

    #[test]
    fn unknown_type_code_is_rejected_without_panicking() {
        let err = validate_type(99, 0).unwrap_err();
        assert_eq!(err.id, MSG_UNKNOWN_TYPE);
    }

    #[test]
    fn count_array_rejects_overflowing_allocations() {
        assert!(check_count_array(0x0100, u32::MAX, 8).is_err());
        assert!(check_count_array(0x0100, 4, 2).is_ok());
    }

    #[test]
    fn ascii_array_splits_on_every_nul_and_reports_correct_length() {
        let data = b"foo\0bar\0baz\0".to_vec();
        let mut r = SliceReader::new(&data);
        let strings = read_ascii_array(&mut r, 0, data.len() as u32).unwrap();
        assert_eq!(strings, vec!["foo".to_string(), "bar".to_string(), "baz".to_string()]);
        assert_eq!(strings.len(), 3);
    }

    #[test]
    fn ascii_array_percent_escapes_non_ascii_bytes() {
        let data = vec![0xE9, 0x00];
        let mut r = SliceReader::new(&data);
        let strings = read_ascii_array(&mut r, 0, data.len() as u32).unwrap();
        assert_eq!(strings, vec!["%E9".to_string()]);
    }

    #[test]
    fn rational_array_reads_alternating_pairs() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&3u32.to_be_bytes());
        data.extend_from_slice(&4u32.to_be_bytes());
        let mut r = SliceReader::new(&data);
        let values = read_rationals(&mut r, 0, 2, Endian::Big).unwrap();
        assert_eq!(values, vec![Rational::new(1, 2), Rational::new(3, 4)]);
    }
}
