//! SHA-1 checksums for flagged MIX archives.
//!
//! An archive whose flags carry the checksum bit ends with the 20-byte SHA-1
//! digest of its data section. The reader only exposes the stored digest;
//! hashing the data is up to the caller (see
//! [`MixArchive::verify_checksum`](crate::MixArchive::verify_checksum)).
//!
//! # Example
//!
//! ```rust
//! use cncmix::checksum::{Sha1Writer, sha1};
//! use std::io::Write;
//!
//! let mut buffer = Vec::new();
//! let mut writer = Sha1Writer::new(&mut buffer);
//! writer.write_all(b"Hello, ").unwrap();
//! writer.write_all(b"World!").unwrap();
//!
//! assert_eq!(writer.digest(), sha1(b"Hello, World!"));
//! assert_eq!(buffer, b"Hello, World!");
//! ```

use std::io::{self, Read, Write};

use sha1::{Digest, Sha1};

use crate::READ_BUFFER_SIZE;
use crate::format::CHECKSUM_SIZE;

/// A stored or computed archive checksum.
pub type Sha1Digest = [u8; CHECKSUM_SIZE];

/// Computes the SHA-1 digest of `data`.
pub fn sha1(data: &[u8]) -> Sha1Digest {
    Sha1::digest(data).into()
}

/// Computes the SHA-1 digest of everything `reader` yields.
pub fn sha1_reader<R: Read>(reader: &mut R) -> io::Result<Sha1Digest> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(hasher.finalize().into())
}

/// Formats a digest as lowercase hex.
pub fn to_hex(digest: &Sha1Digest) -> String {
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// A writer wrapper that computes SHA-1 while writing.
pub struct Sha1Writer<W> {
    inner: W,
    hasher: Sha1,
    bytes_written: u64,
}

impl<W> Sha1Writer<W> {
    /// Creates a new SHA-1 writer wrapping the given writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha1::new(),
            bytes_written: 0,
        }
    }

    /// Returns the digest of everything written so far.
    pub fn digest(&self) -> Sha1Digest {
        self.hasher.clone().finalize().into()
    }

    /// Returns the number of bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the wrapper and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for Sha1Writer<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            to_hex(&sha1(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn test_reader_matches_slice() {
        let data = vec![0x5Au8; READ_BUFFER_SIZE * 2 + 17];
        let digest = sha1_reader(&mut Cursor::new(&data)).unwrap();
        assert_eq!(digest, sha1(&data));
    }

    #[test]
    fn test_writer_counts_bytes() {
        let mut writer = Sha1Writer::new(Vec::new());
        writer.write_all(b"abc").unwrap();
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(writer.digest(), sha1(b"abc"));
        assert_eq!(writer.into_inner(), b"abc");
    }
}
