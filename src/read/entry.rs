//! Bounded reader over one entry body.

use std::io::{self, Read, Take};

use crate::format::header::MixEntry;

/// Reads exactly the bytes of one entry from the archive stream.
///
/// Returned by [`MixArchive::entry_reader`](super::MixArchive::entry_reader);
/// it borrows the archive's reader, so only one can be alive at a time.
pub struct EntryReader<'a, R> {
    inner: Take<&'a mut R>,
    entry: MixEntry,
}

impl<'a, R: Read> EntryReader<'a, R> {
    pub(crate) fn new(reader: &'a mut R, entry: MixEntry) -> Self {
        Self {
            inner: reader.take(u64::from(entry.length)),
            entry,
        }
    }
}

impl<R> EntryReader<'_, R> {
    /// The entry being read.
    pub fn entry(&self) -> &MixEntry {
        &self.entry
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> u64 {
        self.inner.limit()
    }
}

impl<R: Read> Read for EntryReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n == 0 && !buf.is_empty() && self.inner.limit() > 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "entry {:#010x} ended {} bytes early",
                    self.entry.id,
                    self.inner.limit()
                ),
            ));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_limits_and_remaining() {
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        let mut reader = EntryReader::new(&mut cursor, MixEntry::new(7, 0, 4));
        let mut buf = [0u8; 3];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(reader.remaining(), 1);
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"d");
        assert_eq!(reader.entry().id, 7);
    }

    #[test]
    fn test_short_source_is_eof_error() {
        let mut cursor = Cursor::new(b"ab".to_vec());
        let mut reader = EntryReader::new(&mut cursor, MixEntry::new(7, 0, 4));
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
