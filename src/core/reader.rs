//! Binary-Reader: endian-aware primitive reads over seekable byte storage.
//!
//! Two backends share one trait: [`SliceReader`] wraps an in-memory view
//! (used once an IFD's entry table has been prefetched into a single
//! buffer) and [`FileReader`] wraps a `File` for the random-access TIFF
//! module. Reading past the end of the underlying storage never panics;
//! it returns `Error::UnexpectedEof`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::core::endian::Endian;
use crate::error::{Error, Result};

/// Seekable byte storage a module reads tag values and headers from.
pub trait Reader {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this storage supports genuine random access (arbitrary
    /// `read_at` offsets, not just the next sequential one). `SliceReader`
    /// and `FileReader` both do; [`StreamReader`] does not. A module whose
    /// descriptor declares `is_random_access` is only ever handed a reader
    /// for which this is `true` — the dispatcher refuses otherwise.
    fn is_seekable(&self) -> bool {
        true
    }

    /// Read exactly `buf.len()` bytes starting at the absolute offset.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()>;

    fn read_bytes(&mut self, offset: u64, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.read_at(offset, &mut buf)?;
        Ok(buf)
    }

    fn read_u8(&mut self, offset: u64) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_at(offset, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u16(&mut self, offset: u64, endian: Endian) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_u16(&buf))
    }

    fn read_u32(&mut self, offset: u64, endian: Endian) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_u32(&buf))
    }

    fn read_i16(&mut self, offset: u64, endian: Endian) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_i16(&buf))
    }

    fn read_i32(&mut self, offset: u64, endian: Endian) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_i32(&buf))
    }

    fn read_f32(&mut self, offset: u64, endian: Endian) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_f32(&buf))
    }

    fn read_f64(&mut self, offset: u64, endian: Endian) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.read_at(offset, &mut buf)?;
        Ok(endian.read_f64(&buf))
    }
}

/// In-memory backed reader, e.g. a prefetched IFD entry table.
pub struct SliceReader<'a> {
    data: &'a [u8],
}

impl<'a> SliceReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Reader for SliceReader<'_> {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let start = offset as usize;
        let end = start
            .checked_add(buf.len())
            .ok_or(Error::UnexpectedEof { need: buf.len() as u64, have: self.len() })?;
        if end > self.data.len() {
            return Err(Error::UnexpectedEof {
                need: end as u64,
                have: self.data.len() as u64,
            });
        }
        buf.copy_from_slice(&self.data[start..end]);
        Ok(())
    }
}

/// File-backed reader for seek-heavy, random-access modules (TIFF, PDF).
pub struct FileReader {
    file: File,
    len: u64,
}

impl FileReader {
    pub fn new(mut file: File) -> Result<Self> {
        let len = file.seek(SeekFrom::End(0))?;
        file.seek(SeekFrom::Start(0))?;
        Ok(Self { file, len })
    }
}

impl Reader for FileReader {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if offset.checked_add(buf.len() as u64).is_none_or(|end| end > self.len) {
            return Err(Error::UnexpectedEof {
                need: offset + buf.len() as u64,
                have: self.len,
            });
        }
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf)?;
        Ok(())
    }
}

/// Forward-only reader over any [`Read`] source — a pipe or a one-shot
/// network stream that cannot be seeked. `read_at` only succeeds when
/// `offset` equals the current read position; anything else is rejected
/// with `Error::NotSeekable` rather than silently buffered, since there is
/// no way to honor a backward or skip-ahead request without one.
pub struct StreamReader<R> {
    inner: R,
    pos: u64,
}

impl<R: Read> StreamReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }
}

impl<R: Read> Reader for StreamReader<R> {
    /// Unknown until the stream is exhausted; callers that need a byte
    /// count up front (e.g. a bounded prefix read) should `min()` against
    /// their own bound rather than trust this value.
    fn len(&self) -> u64 {
        u64::MAX
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        if offset != self.pos {
            return Err(Error::NotSeekable { offset, pos: self.pos });
        }
        self.inner.read_exact(buf).map_err(|_| Error::UnexpectedEof { need: buf.len() as u64, have: 0 })?;
        self.pos += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_reader_reads_in_bounds() {
        let data = [0x01, 0x02, 0x00, 0x2A];
        let mut r = SliceReader::new(&data);
        assert_eq!(r.read_u8(0).unwrap(), 0x01);
        assert_eq!(r.read_u16(2, Endian::Big).unwrap(), 0x002A);
    }

    #[test]
    fn slice_reader_reports_eof_without_panicking() {
        let data = [0x00u8; 2];
        let mut r = SliceReader::new(&data);
        assert!(matches!(r.read_u32(0, Endian::Big), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn stream_reader_allows_sequential_reads_but_rejects_seeks() {
        let data = [1u8, 2, 3, 4];
        let mut r = StreamReader::new(&data[..]);
        assert!(!r.is_seekable());
        let mut buf = [0u8; 2];
        r.read_at(0, &mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        // offset 0 is no longer the current position; re-reading it (a
        // seek backward) is exactly what a non-seekable source cannot do.
        assert!(matches!(r.read_at(0, &mut buf), Err(Error::NotSeekable { .. })));
        r.read_at(2, &mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
    }
}
