//! Signature Matcher: identifies candidate modules from file bytes/extension.
//!
//! Grounded on the teacher's two-phase detector
//! (`examples/photostructure-exif-oxide/src/file_detection.rs`):
//! extension candidates are gathered first, then validated or overridden by
//! a capped-prefix magic-number read. Internal-magic hits outrank
//! extension-only hits; ties are broken by module registration order.

use crate::core::reader::Reader;
use crate::error::Result;

/// The longest prefix any registered signature needs to read before a
/// decision can be made. Mirrors the teacher's `MAGIC_TEST_BUFFER_SIZE`
/// capped-read discipline so signature checking never pulls an entire file
/// into memory just to identify it.
pub const MAX_SIGNATURE_PREFIX: usize = 1024;

#[derive(Debug, Clone)]
pub enum Signature {
    /// Filename-extension hint. Advisory only — never sufficient on its
    /// own to outrank an internal-magic hit.
    External { extension: &'static str },
    /// A fixed byte sequence at a fixed absolute offset.
    InternalMagic {
        offset: u64,
        bytes: &'static [u8],
        mandatory: bool,
    },
}

impl Signature {
    fn required_prefix_len(&self) -> usize {
        match self {
            Signature::External { .. } => 0,
            Signature::InternalMagic { offset, bytes, .. } => (*offset as usize) + bytes.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchRank {
    ExtensionOnly,
    MandatoryInternal,
}

/// A candidate module, ranked for signature-check order.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub module_name: String,
    rank: MatchRank,
    registration_order: usize,
}

/// Tests `signatures` (declared by one module, in registration order
/// `registration_order`) against a capped prefix of `reader` and the
/// file's extension (if any), returning `Some(Candidate)` if at least one
/// signature matches.
///
/// Never leaves `reader` advanced: all reads are by absolute offset.
pub fn evaluate_module_signatures(
    module_name: &str,
    registration_order: usize,
    signatures: &[Signature],
    extension: Option<&str>,
    reader: &mut dyn Reader,
) -> Result<Option<Candidate>> {
    let prefix_len = signatures
        .iter()
        .map(Signature::required_prefix_len)
        .max()
        .unwrap_or(0)
        .min(MAX_SIGNATURE_PREFIX)
        .min(reader.len() as usize);

    let prefix = reader.read_bytes(0, prefix_len)?;

    let mut best: Option<MatchRank> = None;
    for sig in signatures {
        match sig {
            Signature::InternalMagic { offset, bytes, mandatory } => {
                let start = *offset as usize;
                let end = start + bytes.len();
                let hit = end <= prefix.len() && &prefix[start..end] == *bytes;
                if hit && *mandatory {
                    best = Some(MatchRank::MandatoryInternal);
                }
            }
            Signature::External { extension: ext } => {
                if extension.is_some_and(|e| e.eq_ignore_ascii_case(ext)) {
                    best = best.or(Some(MatchRank::ExtensionOnly));
                }
            }
        }
    }

    Ok(best.map(|rank| Candidate {
        module_name: module_name.to_string(),
        rank,
        registration_order,
    }))
}

/// Sorts candidates mandatory-internal-first, ties broken by registration
/// order — the order the dispatcher then tries each candidate's
/// `checkSignatures` in.
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then(a.registration_order.cmp(&b.registration_order))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::SliceReader;

    #[test]
    fn mandatory_internal_outranks_extension_only() {
        let data = [0x49, 0x49, 0x2A, 0x00];
        let mut reader = SliceReader::new(&data);
        let tiff_sigs = [Signature::InternalMagic {
            offset: 0,
            bytes: b"II",
            mandatory: true,
        }];
        let other_sigs = [Signature::External { extension: "tif" }];

        let tiff = evaluate_module_signatures("tiff", 1, &tiff_sigs, Some("tif"), &mut reader)
            .unwrap()
            .unwrap();
        let other = evaluate_module_signatures("other", 0, &other_sigs, Some("tif"), &mut reader)
            .unwrap()
            .unwrap();

        let ranked = rank_candidates(vec![other, tiff]);
        assert_eq!(ranked[0].module_name, "tiff");
    }

    #[test]
    fn ties_broken_by_registration_order() {
        let data = [0u8; 4];
        let mut reader = SliceReader::new(&data);
        let sigs = [Signature::External { extension: "dat" }];
        let first = evaluate_module_signatures("first", 0, &sigs, Some("dat"), &mut reader)
            .unwrap()
            .unwrap();
        let second = evaluate_module_signatures("second", 1, &sigs, Some("dat"), &mut reader)
            .unwrap()
            .unwrap();
        let ranked = rank_candidates(vec![second, first]);
        assert_eq!(ranked[0].module_name, "first");
    }
}
