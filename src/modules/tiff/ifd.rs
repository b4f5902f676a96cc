//! The IFD parse algorithm: the core of the TIFF-IFD Engine.
//!
//! Generalizes the teacher's `core/ifd.rs::IfdParser` — which keeps a flat
//! `HashMap<u16, ExifValue>` per file and has no notion of a cycle — into
//! an owned, offset-indexed IFD graph with explicit cycle detection, per
//! the "cyclic ownership" redesign note: edges between IFDs are plain
//! offsets, never owning references, and the walker itself is responsible
//! for refusing to revisit an offset. Bounds-checked, `Result`-returning
//! reads follow the tighter style of
//! `examples/other_examples/0ef09c8e_ssoj13-exiftool-rs__crates-exiftool-core-src-ifd.rs.rs`
//! rather than the teacher's own (which trusts the entry table blindly).

use std::collections::HashSet;

use crate::core::endian::Endian;
use crate::core::reader::Reader;
use crate::error::{Error, Result};
use crate::module::ModuleOptions;
use crate::modules::tiff::header::TiffHeader;
use crate::modules::tiff::tags::{self, IfdKind};
use crate::modules::tiff::values::{self, TiffType};
use crate::types::message::Message;
use crate::types::property::Property;
use crate::types::rep_info::RepInfo;

pub const MSG_OUT_OF_ORDER: &str = "TIFF-HUL-2";
pub const MSG_UNKNOWN_TYPE: &str = values::MSG_UNKNOWN_TYPE;
pub const MSG_ODD_OFFSET: &str = "TIFF-HUL-4";
pub const MSG_IFD_CYCLE: &str = "TIFF-HUL-6";
pub const MSG_IO_FAILURE: &str = "TIFF-HUL-7";
pub const MSG_MIXED_STRIP_TILE: &str = "TIFF-HUL-8";

const ENTRY_SIZE: u64 = 12;

/// One decoded IFD entry, prior to value resolution.
#[derive(Debug, Clone, Copy)]
struct RawEntry {
    tag: u16,
    type_code: u16,
    count: u32,
    value_or_offset: u32,
}

/// A fully parsed IFD: its offset, subclass, decoded entries (as
/// Properties already folded into the RepInfo by the time parsing
/// returns), and chain-walking metadata.
#[derive(Debug, Default)]
pub struct IfdSummary {
    pub version: u32,
    pub next: u32,
}

/// Drives the whole IFD graph for one TIFF file: the primary chain rooted
/// at the header's first-IFD offset, plus every sub-IFD reached through a
/// MainIFD pointer tag. A single visited-offset set is shared across both,
/// so a sub-IFD that happens to alias a chain IFD is still caught.
pub struct IfdWalker<'a> {
    reader: &'a mut dyn Reader,
    endian: Endian,
    options: ModuleOptions,
    visited: HashSet<u64>,
}

impl<'a> IfdWalker<'a> {
    pub fn new(reader: &'a mut dyn Reader, header: &TiffHeader, options: ModuleOptions) -> Self {
        Self { reader, endian: header.endian, options, visited: HashSet::new() }
    }

    /// Walks the primary IFD chain starting at `first_offset`, recursing
    /// into sub-IFDs as their pointer tags are encountered. Populates
    /// `info` with Properties and Messages in discovery order. Returns
    /// `Ok(())` even when individual IFDs fail — failures are represented
    /// as Messages on `info`, per "a parsing module must never propagate
    /// an unstructured exception out to the dispatcher".
    pub fn walk_chain(&mut self, first_offset: u32, info: &mut RepInfo) -> Result<()> {
        let mut offset = first_offset as u64;
        let mut version = 5u32;
        let mut index = 0usize;

        while offset != 0 {
            let kind = match index {
                0 => IfdKind::Main,
                _ => IfdKind::Main, // thumbnail/page IFDs are still MainIFD-shaped
            };
            match self.parse_one(offset, kind, info) {
                Ok(summary) => {
                    version = version.max(summary.version);
                    offset = summary.next as u64;
                }
                Err(fatal) => {
                    info.add_message(self.maybe_downgrade(fatal));
                    return Ok(());
                }
            }
            index += 1;
        }

        info.add_property(Property::integer("TIFFVersion", version as i64));
        Ok(())
    }

    fn maybe_downgrade(&self, message: Message) -> Message {
        let message = if message.id == MSG_ODD_OFFSET && self.options.byte_offset_is_valid {
            message.downgrade_to_info()
        } else {
            message
        };
        self.options.maybe_suppress(message)
    }

    /// Parses one IFD at `offset`, recording its entries as Properties on
    /// `info` and recursing into any sub-IFD pointer tags it contains.
    /// Returns the decoded `next`/`version` on success, or the first fatal
    /// `Message` encountered (read failure, odd out-of-line offset, or a
    /// cycle).
    fn parse_one(&mut self, offset: u64, kind: IfdKind, info: &mut RepInfo) -> std::result::Result<IfdSummary, Message> {
        if !self.visited.insert(offset) {
            return Err(Message::fatal(MSG_IFD_CYCLE, format!("IFD offset {offset:#x} visited twice")).at_offset(offset));
        }

        let count = self
            .reader
            .read_u16(offset, self.endian)
            .map_err(|e| Message::fatal(MSG_IO_FAILURE, e.to_string()).at_offset(offset))?;

        let table = self
            .reader
            .read_bytes(offset + 2, count as usize * ENTRY_SIZE as usize)
            .map_err(|e| Message::fatal(MSG_IO_FAILURE, e.to_string()).at_offset(offset))?;

        let next = self
            .reader
            .read_u32(offset + 2 + count as u64 * ENTRY_SIZE, self.endian)
            .map_err(|e| Message::fatal(MSG_IO_FAILURE, e.to_string()).at_offset(offset))?;

        let mut version = 5u32;
        let mut last_tag: Option<u16> = None;
        let mut present_tags = std::collections::HashSet::new();
        let mut sub_ifd_offsets: Vec<(u16, u32)> = Vec::new();

        for i in 0..count as usize {
            let base = i * ENTRY_SIZE as usize;
            let entry = RawEntry {
                tag: self.endian.read_u16(&table[base..base + 2]),
                type_code: self.endian.read_u16(&table[base + 2..base + 4]),
                count: self.endian.read_u32(&table[base + 4..base + 8]),
                value_or_offset: self.endian.read_u32(&table[base + 8..base + 12]),
            };
            let entry_field_offset = offset + 2 + (i as u64) * ENTRY_SIZE + 8;

            if self.options.strict_tag_order {
                if let Some(prev) = last_tag {
                    if entry.tag <= prev {
                        info.add_message(
                            Message::error(
                                MSG_OUT_OF_ORDER,
                                format!("tag {:#06x} is not strictly greater than preceding tag {:#06x}", entry.tag, prev),
                            )
                            .at_offset(entry_field_offset),
                        );
                    }
                }
            }
            last_tag = Some(entry.tag);
            present_tags.insert(entry.tag);

            let ty = match values::validate_type(entry.type_code, entry_field_offset) {
                Ok(ty) => ty,
                Err(message) => {
                    info.add_message(message);
                    continue;
                }
            };
            if ty.promotes_version() {
                version = 6;
            }

            if let Some(sub_kind) = tags::sub_ifd_pointer_kind(entry.tag) {
                let _ = sub_kind;
                sub_ifd_offsets.push((entry.tag, entry.value_or_offset));
                continue;
            }

            match self.resolve_entry_offset(&entry, entry_field_offset, ty) {
                Ok(value_offset) => {
                    if let Err(message) = self.emit_property(kind, &entry, ty, value_offset, info) {
                        info.add_message(message);
                    }
                }
                // A count that would overflow the addressable array bound is
                // reported and the entry skipped, not a reason to abandon
                // the whole IFD — only an odd out-of-line offset is fatal.
                Err(message) if message.severity == crate::types::message::Severity::Fatal => return Err(message),
                Err(message) => info.add_message(message),
            }
        }

        self.post_parse_initialization(&present_tags, info);

        for (tag, sub_offset) in sub_ifd_offsets {
            let sub_kind = tags::sub_ifd_pointer_kind(tag).unwrap_or(IfdKind::Main);
            match self.parse_one(sub_offset as u64, sub_kind, info) {
                Ok(sub_summary) => version = version.max(sub_summary.version),
                Err(fatal) => info.add_message(self.maybe_downgrade(fatal)),
            }
        }

        Ok(IfdSummary { version, next })
    }

    /// Computes where an entry's value actually lives: inline within the
    /// entry's own `value` field when `sizeBytes <= 4`, else the absolute
    /// offset the `value` field encodes. Enforces the odd-offset alignment
    /// rule for the out-of-line case.
    fn resolve_entry_offset(&self, entry: &RawEntry, entry_field_offset: u64, ty: TiffType) -> std::result::Result<u64, Message> {
        if let Err(Error::CountOverflow { tag, count }) = values::check_count_array(entry.tag, entry.count, ty.element_size()) {
            return Err(Message::error(
                values::MSG_BAD_COUNT,
                format!("tag {tag:#06x} declares count {count}, which overflows the addressable array bound"),
            )
            .at_offset(entry_field_offset));
        }

        let size_bytes = ty.element_size() as u64 * entry.count as u64;
        if size_bytes <= 4 {
            Ok(entry_field_offset)
        } else {
            let value_offset = entry.value_or_offset as u64;
            if value_offset % 2 != 0 {
                return Err(Message::fatal(
                    MSG_ODD_OFFSET,
                    format!("out-of-line value for tag {:#06x} at odd offset {value_offset:#x}", entry.tag),
                )
                .at_offset(value_offset));
            }
            Ok(value_offset)
        }
    }

    fn emit_property(
        &mut self,
        kind: IfdKind,
        entry: &RawEntry,
        ty: TiffType,
        value_offset: u64,
        info: &mut RepInfo,
    ) -> std::result::Result<(), Message> {
        let name = tags::tag_name(kind, entry.tag);
        let raw_mode = self.options.raw;

        let property = match ty {
            TiffType::Ascii => {
                let strings = values::read_ascii_array(self.reader, value_offset, entry.count)
                    .map_err(|e| Message::error(MSG_IO_FAILURE, e.to_string()).at_offset(value_offset))?;
                if strings.len() == 1 {
                    Property::text(name, strings.into_iter().next().unwrap_or_default())
                } else {
                    Property::text_array(name, strings)
                }
            }
            TiffType::Rational => {
                let values = values::read_rationals(self.reader, value_offset, entry.count, self.endian)
                    .map_err(|e| Message::error(MSG_IO_FAILURE, e.to_string()).at_offset(value_offset))?;
                if values.len() == 1 {
                    Property::rational(name, values[0])
                } else {
                    Property::rational_array(name, values)
                }
            }
            TiffType::SRational => {
                let values = values::read_srationals(self.reader, value_offset, entry.count, self.endian)
                    .map_err(|e| Message::error(MSG_IO_FAILURE, e.to_string()).at_offset(value_offset))?;
                let as_i64: Vec<i64> = values.iter().flat_map(|r| [r.numerator as i64, r.denominator as i64]).collect();
                Property::integer_array(name, as_i64)
            }
            TiffType::Byte | TiffType::Short | TiffType::Long | TiffType::Ifd if ty.is_unsigned_integer_compatible() => {
                let values = values::read_unsigned_integers(self.reader, value_offset, ty, entry.count, self.endian)
                    .map_err(|e| Message::error(MSG_IO_FAILURE, e.to_string()).at_offset(value_offset))?;
                if values.len() == 1 {
                    match entry.tag {
                        tags::COMPRESSION => Property::labeled_or_raw(name, values[0] as i64, tags::compression_label(values[0]), raw_mode),
                        tags::PHOTOMETRIC_INTERPRETATION => {
                            Property::labeled_or_raw(name, values[0] as i64, tags::photometric_label(values[0]), raw_mode)
                        }
                        tags::FLASH => Property::labels_or_raw(name, values[0] as i64, tags::flash_labels(values[0]), raw_mode),
                        _ => Property::integer(name, values[0] as i64),
                    }
                } else {
                    Property::integer_array(name, values.into_iter().map(i64::from).collect())
                }
            }
            _ => {
                // UNDEFINED, SBYTE, SSHORT, SLONG, FLOAT, DOUBLE and any
                // type not covered above: emit a generic "unknown" value
                // preserving type/count/bytes, per the failure-semantics
                // rule for unknown tag numbers.
                let bytes = self
                    .reader
                    .read_bytes(value_offset, (ty.element_size() * entry.count) as usize)
                    .map_err(|e| Message::error(MSG_IO_FAILURE, e.to_string()).at_offset(value_offset))?;
                Property::text(
                    format!("{name}-raw"),
                    bytes.iter().map(|b| format!("{b:02X}")).collect::<String>(),
                )
            }
        };

        info.add_property(property);
        Ok(())
    }

    /// Cross-tag invariants checked once all of an IFD's entries have been
    /// seen: strip-vs-tile exclusivity is the concrete example named in
    /// the algorithm description.
    fn post_parse_initialization(&self, present_tags: &std::collections::HashSet<u16>, info: &mut RepInfo) {
        if tags::has_strip_fields(present_tags) && tags::has_tile_fields(present_tags) {
            info.add_message(Message::warning(
                MSG_MIXED_STRIP_TILE,
                "IFD declares both strip and tile organization; these are mutually exclusive",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;
    use crate::module::ModuleOptions;
    use crate::modules::tiff::header::TiffHeader;
    use crate::types::rep_info::TriState;

    fn le_header() -> [u8; 8] {
        [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00]
    }

    fn push_entry(buf: &mut Vec<u8>, tag: u16, ty: u16, count: u32, value: u32) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&ty.to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn scenario_one_little_endian_single_entry_ifd() {
        let mut data = le_header().to_vec();
        data.extend_from_slice(&1u16.to_le_bytes()); // n = 1
        push_entry(&mut data, tags::IMAGE_WIDTH, TiffType::Short as u16, 1, 100);
        data.extend_from_slice(&0u32.to_le_bytes()); // next = 0

        let mut reader = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://scenario1");
        info.well_formed = TriState::True;
        info.valid = TriState::True;
        let mut walker = IfdWalker::new(&mut reader, &header, ModuleOptions::new());
        walker.walk_chain(header.first_ifd_offset, &mut info).unwrap();

        assert_eq!(info.well_formed, TriState::True);
        assert_eq!(info.valid, TriState::True);
        assert!(info
            .properties
            .iter()
            .any(|p| p.name == "ImageWidth" && p.value == crate::types::property::PropertyValue::Integer(100)));
    }

    #[test]
    fn scenario_two_out_of_order_tags_yield_non_fatal_error() {
        let mut data = le_header().to_vec();
        data.extend_from_slice(&2u16.to_le_bytes());
        push_entry(&mut data, 257, TiffType::Short as u16, 1, 1);
        push_entry(&mut data, 256, TiffType::Short as u16, 1, 1);
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://scenario2");
        info.well_formed = TriState::True;
        info.valid = TriState::True;
        let mut walker = IfdWalker::new(&mut reader, &header, ModuleOptions::new());
        walker.walk_chain(header.first_ifd_offset, &mut info).unwrap();

        assert_eq!(info.well_formed, TriState::True);
        assert_eq!(info.valid, TriState::False);
        assert!(info.messages.iter().any(|m| m.id == MSG_OUT_OF_ORDER));
    }

    #[test]
    fn scenario_three_odd_offset_is_fatal_unless_byte_offset_is_valid() {
        // A LONG array of count 2 (8 bytes) is out-of-line; point it at
        // odd offset 0x11.
        let mut data = le_header().to_vec();
        data.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut data, tags::STRIP_OFFSETS, TiffType::Long as u16, 2, 0x11);
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://scenario3");
        info.well_formed = TriState::True;
        let mut walker = IfdWalker::new(&mut reader, &header, ModuleOptions::new());
        walker.walk_chain(header.first_ifd_offset, &mut info).unwrap();
        assert_eq!(info.well_formed, TriState::False);
        assert!(info.has_fatal());

        let mut reader2 = SliceReader::new(&data);
        let header2 = TiffHeader::parse(&mut reader2).unwrap();
        let mut info2 = RepInfo::new("mem://scenario3b");
        info2.well_formed = TriState::True;
        let mut options = ModuleOptions::new();
        options.byte_offset_is_valid = true;
        let mut walker2 = IfdWalker::new(&mut reader2, &header2, options);
        walker2.walk_chain(header2.first_ifd_offset, &mut info2).unwrap();
        assert_eq!(info2.well_formed, TriState::True);
        assert!(info2.messages.iter().any(|m| m.id == MSG_ODD_OFFSET));
    }

    #[test]
    fn oversized_count_is_rejected_before_any_value_read_is_attempted() {
        // A SHORT array whose declared count would demand a multi-GB
        // allocation; must be rejected by `check_count_array` rather than
        // handed to `Vec::with_capacity`.
        let mut data = le_header().to_vec();
        data.extend_from_slice(&2u16.to_le_bytes());
        push_entry(&mut data, tags::IMAGE_WIDTH, TiffType::Short as u16, 1, 100);
        push_entry(&mut data, tags::STRIP_OFFSETS, TiffType::Short as u16, u32::MAX, 0x100);
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://oversized-count");
        info.well_formed = TriState::True;
        info.valid = TriState::True;
        let mut walker = IfdWalker::new(&mut reader, &header, ModuleOptions::new());
        walker.walk_chain(header.first_ifd_offset, &mut info).unwrap();

        assert!(info.messages.iter().any(|m| m.id == values::MSG_BAD_COUNT));
        // not fatal: the rest of the IFD still gets walked.
        assert_eq!(info.well_formed, TriState::True);
        assert!(info
            .properties
            .iter()
            .any(|p| p.name == "ImageWidth" && p.value == crate::types::property::PropertyValue::Integer(100)));
    }

    #[test]
    fn scenario_five_unknown_type_skips_entry_but_continues() {
        let mut data = le_header().to_vec();
        data.extend_from_slice(&2u16.to_le_bytes());
        push_entry(&mut data, 256, 99, 1, 1);
        push_entry(&mut data, 257, TiffType::Short as u16, 1, 50);
        data.extend_from_slice(&0u32.to_le_bytes());

        let mut reader = SliceReader::new(&data);
        let header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://scenario5");
        let mut walker = IfdWalker::new(&mut reader, &header, ModuleOptions::new());
        walker.walk_chain(header.first_ifd_offset, &mut info).unwrap();

        assert!(info.messages.iter().any(|m| m.id == MSG_UNKNOWN_TYPE));
        assert!(info
            .properties
            .iter()
            .any(|p| p.name == "ImageLength" && p.value == crate::types::property::PropertyValue::Integer(50)));
    }

    #[test]
    fn scenario_four_cyclic_ifd_chain_is_fatal() {
        // Two IFDs whose `next` fields point at each other.
        let header = le_header();
        let ifd_a_offset = 8u32;
        let ifd_b_offset = 8 + 2 + 12 + 4; // one entry each

        let mut data = header.to_vec();
        // IFD A
        data.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut data, 256, TiffType::Short as u16, 1, 1);
        data.extend_from_slice(&ifd_b_offset.to_le_bytes());
        // IFD B
        data.extend_from_slice(&1u16.to_le_bytes());
        push_entry(&mut data, 256, TiffType::Short as u16, 1, 1);
        data.extend_from_slice(&ifd_a_offset.to_le_bytes());

        let mut reader = SliceReader::new(&data);
        let parsed_header = TiffHeader::parse(&mut reader).unwrap();
        let mut info = RepInfo::new("mem://scenario4");
        info.well_formed = TriState::True;
        let mut walker = IfdWalker::new(&mut reader, &parsed_header, ModuleOptions::new());
        walker.walk_chain(parsed_header.first_ifd_offset, &mut info).unwrap();

        assert_eq!(info.well_formed, TriState::False);
        assert!(info.messages.iter().any(|m| m.id == MSG_IFD_CYCLE));
    }
}
