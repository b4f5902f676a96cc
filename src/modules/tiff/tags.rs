//! Well-known tag numbers and per-IFD-kind semantics.
//!
//! Tag-ID constant style grounded on
//! `examples/other_examples/0ef09c8e_ssoj13-exiftool-rs__crates-exiftool-core-src-ifd.rs.rs`'s
//! `tags` submodule.

pub const IMAGE_WIDTH: u16 = 0x0100;
pub const IMAGE_LENGTH: u16 = 0x0101;
pub const BITS_PER_SAMPLE: u16 = 0x0102;
pub const COMPRESSION: u16 = 0x0103;
pub const PHOTOMETRIC_INTERPRETATION: u16 = 0x0106;
pub const IMAGE_DESCRIPTION: u16 = 0x010E;
pub const MAKE: u16 = 0x010F;
pub const MODEL: u16 = 0x0110;
pub const STRIP_OFFSETS: u16 = 0x0111;
pub const ORIENTATION: u16 = 0x0112;
pub const SAMPLES_PER_PIXEL: u16 = 0x0115;
pub const ROWS_PER_STRIP: u16 = 0x0116;
pub const STRIP_BYTE_COUNTS: u16 = 0x0117;
pub const X_RESOLUTION: u16 = 0x011A;
pub const Y_RESOLUTION: u16 = 0x011B;
pub const PLANAR_CONFIGURATION: u16 = 0x011C;
pub const RESOLUTION_UNIT: u16 = 0x0128;
pub const SOFTWARE: u16 = 0x0131;
pub const DATE_TIME: u16 = 0x0132;
pub const TILE_WIDTH: u16 = 0x0142;
pub const TILE_LENGTH: u16 = 0x0143;
pub const TILE_OFFSETS: u16 = 0x0144;
pub const TILE_BYTE_COUNTS: u16 = 0x0145;
pub const SUB_IFDS: u16 = 0x014A;

/// Sub-IFD-pointer tags reached from the MainIFD. The value is itself an
/// absolute IFD offset, not a plain integer — the parser must dispatch it
/// through the IFD walker rather than record it as a Property.
pub const EXIF_IFD_POINTER: u16 = 0x8769;
pub const GPS_INFO_IFD_POINTER: u16 = 0x8825;
pub const INTEROP_IFD_POINTER: u16 = 0xA005;

/// GlobalParametersIFD is reached via a structural tag in a TIFF/EP file;
/// modeled as a constant here since its reservation is fixed by the spec
/// rather than negotiated per file.
pub const GLOBAL_PARAMETERS_IFD_POINTER: u16 = 0x0129;

// ExifIFD tags (a representative set; the full Exif 2.3 tag space is much
// larger but these are the ones every consumer expects by name).
pub const EXPOSURE_TIME: u16 = 0x829A;
pub const F_NUMBER: u16 = 0x829D;
pub const EXPOSURE_PROGRAM: u16 = 0x8822;
pub const ISO_SPEED_RATINGS: u16 = 0x8827;
pub const EXIF_VERSION: u16 = 0x9000;
pub const DATE_TIME_ORIGINAL: u16 = 0x9003;
pub const DATE_TIME_DIGITIZED: u16 = 0x9004;
pub const SHUTTER_SPEED_VALUE: u16 = 0x9201;
pub const APERTURE_VALUE: u16 = 0x9202;
pub const METERING_MODE: u16 = 0x9207;
pub const FLASH: u16 = 0x9209;
pub const FOCAL_LENGTH: u16 = 0x920A;
pub const COLOR_SPACE: u16 = 0xA001;
pub const PIXEL_X_DIMENSION: u16 = 0xA002;
pub const PIXEL_Y_DIMENSION: u16 = 0xA003;
pub const FOCAL_LENGTH_IN_35MM_FILM: u16 = 0xA405;
pub const LENS_MODEL: u16 = 0xA434;

// GPSIFD tags (TIFF Technical Note 1 / Exif Annex).
pub const GPS_VERSION_ID: u16 = 0x0000;
pub const GPS_LATITUDE_REF: u16 = 0x0001;
pub const GPS_LATITUDE: u16 = 0x0002;
pub const GPS_LONGITUDE_REF: u16 = 0x0003;
pub const GPS_LONGITUDE: u16 = 0x0004;
pub const GPS_ALTITUDE_REF: u16 = 0x0005;
pub const GPS_ALTITUDE: u16 = 0x0006;
pub const GPS_TIME_STAMP: u16 = 0x0007;
pub const GPS_SATELLITES: u16 = 0x0008;
pub const GPS_DATE_STAMP: u16 = 0x001D;

// InteropIFD tags (Exif "Interoperability Rules", e.g. DCF/R98/R03).
pub const INTEROPERABILITY_INDEX: u16 = 0x0001;
pub const INTEROPERABILITY_VERSION: u16 = 0x0002;
pub const RELATED_IMAGE_FILE_FORMAT: u16 = 0x1000;
pub const RELATED_IMAGE_WIDTH: u16 = 0x1001;
pub const RELATED_IMAGE_LENGTH: u16 = 0x1002;

// GlobalParametersIFD tags (TIFF/EP, ISO 12234-2) — sensor parameters
// shared across an image's sub-IFDs.
pub const CFA_REPEAT_PATTERN_DIM: u16 = 0x828D;
pub const CFA_PATTERN: u16 = 0x828E;
pub const TIFF_EP_STANDARD_ID: u16 = 0x9216;
pub const SENSING_METHOD: u16 = 0x9217;

/// Which subclass a given IFD belongs to — decides `lookupTag` semantics.
/// A variant enum replaces the teacher's (and the original JHOVE's) use of
/// subclass identity, per the deep-inheritance redesign note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfdKind {
    Main,
    Exif,
    Gps,
    Interop,
    GlobalParameters,
}

/// Returns the sub-IFD pointer tag and the `IfdKind` it leads to, for tags
/// that are structural pointers rather than ordinary value-carrying tags.
/// Only meaningful when looked up against a MainIFD's entries.
pub fn sub_ifd_pointer_kind(tag: u16) -> Option<IfdKind> {
    match tag {
        EXIF_IFD_POINTER => Some(IfdKind::Exif),
        GPS_INFO_IFD_POINTER => Some(IfdKind::Gps),
        INTEROP_IFD_POINTER => Some(IfdKind::Interop),
        GLOBAL_PARAMETERS_IFD_POINTER => Some(IfdKind::GlobalParameters),
        _ => None,
    }
}

/// Human-readable name for a tag, used as the emitted Property name. Tags
/// with no known name are emitted as `Unknown-0x{tag:04X}` per the
/// "unknown tag number is not an error" failure-semantics rule.
pub fn tag_name(kind: IfdKind, tag: u16) -> String {
    let known = match kind {
        IfdKind::Main => match tag {
            IMAGE_WIDTH => Some("ImageWidth"),
            IMAGE_LENGTH => Some("ImageLength"),
            BITS_PER_SAMPLE => Some("BitsPerSample"),
            COMPRESSION => Some("Compression"),
            PHOTOMETRIC_INTERPRETATION => Some("PhotometricInterpretation"),
            IMAGE_DESCRIPTION => Some("ImageDescription"),
            MAKE => Some("Make"),
            MODEL => Some("Model"),
            STRIP_OFFSETS => Some("StripOffsets"),
            ORIENTATION => Some("Orientation"),
            SAMPLES_PER_PIXEL => Some("SamplesPerPixel"),
            ROWS_PER_STRIP => Some("RowsPerStrip"),
            STRIP_BYTE_COUNTS => Some("StripByteCounts"),
            X_RESOLUTION => Some("XResolution"),
            Y_RESOLUTION => Some("YResolution"),
            PLANAR_CONFIGURATION => Some("PlanarConfiguration"),
            RESOLUTION_UNIT => Some("ResolutionUnit"),
            SOFTWARE => Some("Software"),
            DATE_TIME => Some("DateTime"),
            TILE_WIDTH => Some("TileWidth"),
            TILE_LENGTH => Some("TileLength"),
            TILE_OFFSETS => Some("TileOffsets"),
            TILE_BYTE_COUNTS => Some("TileByteCounts"),
            SUB_IFDS => Some("SubIFDs"),
            _ => None,
        },
        IfdKind::Exif => match tag {
            EXPOSURE_TIME => Some("ExposureTime"),
            F_NUMBER => Some("FNumber"),
            EXPOSURE_PROGRAM => Some("ExposureProgram"),
            ISO_SPEED_RATINGS => Some("ISOSpeedRatings"),
            EXIF_VERSION => Some("ExifVersion"),
            DATE_TIME_ORIGINAL => Some("DateTimeOriginal"),
            DATE_TIME_DIGITIZED => Some("DateTimeDigitized"),
            SHUTTER_SPEED_VALUE => Some("ShutterSpeedValue"),
            APERTURE_VALUE => Some("ApertureValue"),
            METERING_MODE => Some("MeteringMode"),
            FLASH => Some("Flash"),
            FOCAL_LENGTH => Some("FocalLength"),
            COLOR_SPACE => Some("ColorSpace"),
            PIXEL_X_DIMENSION => Some("PixelXDimension"),
            PIXEL_Y_DIMENSION => Some("PixelYDimension"),
            FOCAL_LENGTH_IN_35MM_FILM => Some("FocalLengthIn35mmFilm"),
            LENS_MODEL => Some("LensModel"),
            _ => None,
        },
        IfdKind::Gps => match tag {
            GPS_VERSION_ID => Some("GPSVersionID"),
            GPS_LATITUDE_REF => Some("GPSLatitudeRef"),
            GPS_LATITUDE => Some("GPSLatitude"),
            GPS_LONGITUDE_REF => Some("GPSLongitudeRef"),
            GPS_LONGITUDE => Some("GPSLongitude"),
            GPS_ALTITUDE_REF => Some("GPSAltitudeRef"),
            GPS_ALTITUDE => Some("GPSAltitude"),
            GPS_TIME_STAMP => Some("GPSTimeStamp"),
            GPS_SATELLITES => Some("GPSSatellites"),
            GPS_DATE_STAMP => Some("GPSDateStamp"),
            _ => None,
        },
        IfdKind::Interop => match tag {
            INTEROPERABILITY_INDEX => Some("InteroperabilityIndex"),
            INTEROPERABILITY_VERSION => Some("InteroperabilityVersion"),
            RELATED_IMAGE_FILE_FORMAT => Some("RelatedImageFileFormat"),
            RELATED_IMAGE_WIDTH => Some("RelatedImageWidth"),
            RELATED_IMAGE_LENGTH => Some("RelatedImageLength"),
            _ => None,
        },
        IfdKind::GlobalParameters => match tag {
            CFA_REPEAT_PATTERN_DIM => Some("CFARepeatPatternDim"),
            CFA_PATTERN => Some("CFAPattern"),
            TIFF_EP_STANDARD_ID => Some("TIFF/EPStandardID"),
            SENSING_METHOD => Some("SensingMethod"),
            _ => None,
        },
    };
    known.map(str::to_string).unwrap_or_else(|| format!("Unknown-0x{tag:04X}"))
}

/// Compression value labels, for interpreted-mode emission of the
/// `Compression` tag via `Property::labeled_or_raw`.
pub fn compression_label(value: u32) -> Option<&'static str> {
    match value {
        1 => Some("Uncompressed"),
        2 => Some("CCITT 1D"),
        3 => Some("CCITT Group 3"),
        4 => Some("CCITT Group 4"),
        5 => Some("LZW"),
        6 => Some("JPEG (old-style)"),
        7 => Some("JPEG"),
        8 => Some("Deflate/Adobe"),
        32773 => Some("PackBits"),
        _ => None,
    }
}

/// `Flash` is a bitmask, not an enum: fired-bit, strobe-return 2-bit field,
/// mode 2-bit field, plus two standalone capability bits, decomposed into
/// every label the set value carries rather than one mutually-exclusive
/// choice.
pub fn flash_labels(value: u32) -> Vec<&'static str> {
    let mut labels = Vec::new();
    if value & 0x01 != 0 {
        labels.push("Flash fired");
    } else {
        labels.push("Flash did not fire");
    }
    match (value >> 1) & 0x03 {
        2 => labels.push("Strobe return light not detected"),
        3 => labels.push("Strobe return light detected"),
        _ => {}
    }
    match (value >> 3) & 0x03 {
        1 => labels.push("Compulsory flash firing"),
        2 => labels.push("Compulsory flash suppression"),
        3 => labels.push("Auto mode"),
        _ => {}
    }
    if value & 0x20 != 0 {
        labels.push("No flash function");
    }
    if value & 0x40 != 0 {
        labels.push("Red-eye reduction supported");
    }
    labels
}

pub fn photometric_label(value: u32) -> Option<&'static str> {
    match value {
        0 => Some("WhiteIsZero"),
        1 => Some("BlackIsZero"),
        2 => Some("RGB"),
        3 => Some("Palette color"),
        4 => Some("Transparency mask"),
        5 => Some("CMYK"),
        6 => Some("YCbCr"),
        8 => Some("CIELab"),
        _ => None,
    }
}

/// Strip-vs-tile exclusivity invariant, checked in `postParseInitialization`.
pub fn has_strip_fields(present: &std::collections::HashSet<u16>) -> bool {
    present.contains(&STRIP_OFFSETS) || present.contains(&ROWS_PER_STRIP) || present.contains(&STRIP_BYTE_COUNTS)
}

pub fn has_tile_fields(present: &std::collections::HashSet<u16>) -> bool {
    present.contains(&TILE_WIDTH) || present.contains(&TILE_LENGTH) || present.contains(&TILE_OFFSETS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_labels_decomposes_fired_and_mode_bits() {
        assert_eq!(flash_labels(0x00), vec!["Flash did not fire"]);
        let fired_auto_with_red_eye = flash_labels(0x01 | (3 << 3) | 0x40);
        assert_eq!(fired_auto_with_red_eye, vec!["Flash fired", "Auto mode", "Red-eye reduction supported"]);
    }
}
