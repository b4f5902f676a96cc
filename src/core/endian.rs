//! Byte order (endianness) handling.
//!
//! Endianness is always a per-call argument, never global state: a TIFF
//! stream derives it once from the header's `II`/`MM` marker and threads
//! it through every nested read that follows.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn read_u16(&self, data: &[u8]) -> u16 {
        match self {
            Endian::Little => LittleEndian::read_u16(data),
            Endian::Big => BigEndian::read_u16(data),
        }
    }

    pub fn read_u32(&self, data: &[u8]) -> u32 {
        match self {
            Endian::Little => LittleEndian::read_u32(data),
            Endian::Big => BigEndian::read_u32(data),
        }
    }

    pub fn read_u64(&self, data: &[u8]) -> u64 {
        match self {
            Endian::Little => LittleEndian::read_u64(data),
            Endian::Big => BigEndian::read_u64(data),
        }
    }

    pub fn read_i16(&self, data: &[u8]) -> i16 {
        match self {
            Endian::Little => LittleEndian::read_i16(data),
            Endian::Big => BigEndian::read_i16(data),
        }
    }

    pub fn read_i32(&self, data: &[u8]) -> i32 {
        match self {
            Endian::Little => LittleEndian::read_i32(data),
            Endian::Big => BigEndian::read_i32(data),
        }
    }

    pub fn read_f32(&self, data: &[u8]) -> f32 {
        match self {
            Endian::Little => LittleEndian::read_f32(data),
            Endian::Big => BigEndian::read_f32(data),
        }
    }

    pub fn read_f64(&self, data: &[u8]) -> f64 {
        match self {
            Endian::Little => LittleEndian::read_f64(data),
            Endian::Big => BigEndian::read_f64(data),
        }
    }

    pub fn write_u32(&self, out: &mut [u8], v: u32) {
        match self {
            Endian::Little => LittleEndian::write_u32(out, v),
            Endian::Big => BigEndian::write_u32(out, v),
        }
    }

    /// Detect endianness from a TIFF header's first two bytes.
    pub fn from_tiff_header(data: &[u8]) -> Option<Self> {
        if data.len() < 2 {
            return None;
        }
        match &data[0..2] {
            b"II" => Some(Endian::Little),
            b"MM" => Some(Endian::Big),
            _ => None,
        }
    }
}
