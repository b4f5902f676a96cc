//! Checksums computed in a single tee'd pass over the input stream.
//!
//! Grounded on the teacher's `ImageDataHasher`
//! (`examples/photostructure-exif-oxide/src/hash/mod.rs`), which chunks a
//! reader through a boxed `dyn DynDigest` in 64KB reads; adapted here from
//! MD5/SHA256/SHA512 to the CRC32/MD5/SHA-1 set the Dispatcher computes.

use std::io::{self, Read};

use digest::Digest;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChecksumAlgorithm {
    Crc32,
    Md5,
    Sha1,
}

impl ChecksumAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Crc32 => "CRC32",
            ChecksumAlgorithm::Md5 => "MD5",
            ChecksumAlgorithm::Sha1 => "SHA-1",
        }
    }
}

enum Hasher {
    Crc32(crc32fast::Hasher),
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
}

impl Hasher {
    fn new(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Crc32 => Hasher::Crc32(crc32fast::Hasher::new()),
            ChecksumAlgorithm::Md5 => Hasher::Md5(md5::Md5::new()),
            ChecksumAlgorithm::Sha1 => Hasher::Sha1(sha1::Sha1::new()),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            Hasher::Crc32(h) => h.update(chunk),
            Hasher::Md5(h) => h.update(chunk),
            Hasher::Sha1(h) => h.update(chunk),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Hasher::Crc32(h) => format!("{:08x}", h.finalize()),
            Hasher::Md5(h) => hex_encode(&h.finalize()),
            Hasher::Sha1(h) => hex_encode(&h.finalize()),
        }
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A `Read` wrapper that feeds every byte it passes through into the
/// requested hashers, so computing checksums never requires a second pass
/// over the file — the Dispatcher wraps the module's input stream in this
/// before handing it to `Module::parse`.
pub struct TeeHasher<R> {
    inner: R,
    hashers: Vec<(ChecksumAlgorithm, Hasher)>,
}

impl<R: Read> TeeHasher<R> {
    pub fn new(inner: R, algorithms: &[ChecksumAlgorithm]) -> Self {
        Self {
            inner,
            hashers: algorithms.iter().map(|&a| (a, Hasher::new(a))).collect(),
        }
    }

    pub fn finalize(self) -> std::collections::BTreeMap<String, String> {
        self.hashers
            .into_iter()
            .map(|(algorithm, hasher)| (algorithm.name().to_string(), hasher.finalize_hex()))
            .collect()
    }
}

impl<R: Read> Read for TeeHasher<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for (_, hasher) in &mut self.hashers {
            hasher.update(&buf[..n]);
        }
        Ok(n)
    }
}

/// Computes all three checksums over a reader in one chunked pass, without
/// requiring the caller to route the bytes through a module parse.
pub fn checksum_all(mut reader: impl Read) -> io::Result<std::collections::BTreeMap<String, String>> {
    let algorithms = [ChecksumAlgorithm::Crc32, ChecksumAlgorithm::Md5, ChecksumAlgorithm::Sha1];
    let mut hashers: Vec<(ChecksumAlgorithm, Hasher)> =
        algorithms.iter().map(|&a| (a, Hasher::new(a))).collect();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for (_, hasher) in &mut hashers {
            hasher.update(&buf[..n]);
        }
    }
    Ok(hashers
        .into_iter()
        .map(|(algorithm, hasher)| (algorithm.name().to_string(), hasher.finalize_hex()))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn checksums_of_empty_input_are_the_well_known_empty_hashes() {
        let sums = checksum_all(&b""[..]).unwrap();
        assert_eq!(sums["MD5"], "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(sums["SHA-1"], "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(sums["CRC32"], "00000000");
    }

    #[test]
    fn tee_hasher_does_not_alter_the_bytes_read() {
        let data = b"hello world".to_vec();
        let mut tee = TeeHasher::new(&data[..], &[ChecksumAlgorithm::Md5]);
        let mut out = Vec::new();
        tee.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
        let sums = tee.finalize();
        assert_eq!(sums.len(), 1);
    }
}
