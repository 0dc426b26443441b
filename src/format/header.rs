//! MIX archive header structures and parsing.

use std::io::{self, Read, Write};
use std::ops::Range;

use crate::{Error, Result};

use super::reader::{read_u16_le, read_u32_le};
use super::{ENTRY_SIZE, PLAIN_HEADER_SIZE, table_size};

/// Which header layout an archive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderVariant {
    /// Original Tiberian Dawn layout: the file count comes first.
    Unflagged,
    /// Flags word followed by a plain header.
    Flagged,
    /// Flags word, key blob, then a Blowfish-encrypted header.
    Encrypted,
}

impl std::fmt::Display for HeaderVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unflagged => write!(f, "unflagged"),
            Self::Flagged => write!(f, "flagged"),
            Self::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// One file-table entry.
///
/// `offset` is relative to the start of the data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MixEntry {
    /// Name hash of the file.
    pub id: u32,
    /// Offset from the start of the data section.
    pub offset: u32,
    /// Length in bytes.
    pub length: u32,
}

impl MixEntry {
    /// Creates an entry.
    pub fn new(id: u32, offset: u32, length: u32) -> Self {
        Self { id, offset, length }
    }

    /// One past the last data-relative byte of this entry.
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.length)
    }
}

/// The plain header and file table, as stored unencrypted on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlainHeader {
    /// Declared number of entries.
    pub file_count: u16,
    /// Declared size of the data section.
    pub data_length: u32,
    /// File table in stored order.
    pub entries: Vec<MixEntry>,
}

impl PlainHeader {
    /// Parses a plain header and file table from a reader.
    ///
    /// `base_offset` is the stream position of the first byte, used only
    /// for error reporting.
    pub fn parse<R: Read>(r: &mut R, base_offset: u64) -> Result<Self> {
        let file_count =
            read_u16_le(r).map_err(|e| Error::from_read(e, base_offset, "file count"))?;
        let data_length =
            read_u32_le(r).map_err(|e| Error::from_read(e, base_offset + 2, "data length"))?;

        let mut entries = Vec::with_capacity(file_count as usize);
        for i in 0..file_count as usize {
            let entry_offset = base_offset + (PLAIN_HEADER_SIZE + i * ENTRY_SIZE) as u64;
            let mut raw = [0u8; ENTRY_SIZE];
            r.read_exact(&mut raw)
                .map_err(|e| Error::from_read(e, entry_offset, "file table entry"))?;
            entries.push(MixEntry {
                id: u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]),
                offset: u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]),
                length: u32::from_le_bytes([raw[8], raw[9], raw[10], raw[11]]),
            });
        }

        Ok(Self {
            file_count,
            data_length,
            entries,
        })
    }

    /// Parses a plain header from an in-memory buffer (e.g. a decrypted block run).
    pub fn parse_bytes(data: &[u8], base_offset: u64) -> Result<Self> {
        let mut cursor = io::Cursor::new(data);
        Self::parse(&mut cursor, base_offset)
    }

    /// Number of bytes the header and table occupy on disk.
    pub fn encoded_len(&self) -> usize {
        table_size(self.file_count)
    }

    /// Writes the header and file table.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.to_bytes())
    }

    /// Serializes the header and file table into a new vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.file_count.to_le_bytes());
        out.extend_from_slice(&self.data_length.to_le_bytes());
        for entry in &self.entries {
            out.extend_from_slice(&entry.id.to_le_bytes());
            out.extend_from_slice(&entry.offset.to_le_bytes());
            out.extend_from_slice(&entry.length.to_le_bytes());
        }
        out
    }
}

/// A fully resolved MIX header.
///
/// Immutable once parsed; it can be cloned and shared between readers that
/// each hold their own stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixHeader {
    /// Detected header layout.
    pub variant: HeaderVariant,
    /// Raw flags word (zero for unflagged archives).
    pub flags: u32,
    /// Declared number of entries.
    pub file_count: u16,
    /// Declared size of the data section (may disagree with the file).
    pub data_length: u32,
    /// File table in stored order.
    pub entries: Vec<MixEntry>,
    /// Absolute offset of the first data byte.
    pub data_start: u64,
    /// Absolute offset one past the last addressable data byte.
    pub data_end: u64,
    /// Encrypted key blob, present only for encrypted archives.
    pub key_blob: Option<[u8; super::KEY_BLOB_SIZE]>,
}

impl MixHeader {
    /// Whether the archive starts with a flags word.
    pub fn flags_present(&self) -> bool {
        self.variant != HeaderVariant::Unflagged
    }

    /// Whether the header was Blowfish-encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.variant == HeaderVariant::Encrypted
    }

    /// Whether the archive ends with a checksum trailer.
    pub fn has_checksum(&self) -> bool {
        self.flags_present() && self.flags & super::FLAG_CHECKSUM != 0
    }

    /// Size of the addressable data region actually present in the file.
    pub fn data_region_len(&self) -> u64 {
        self.data_end.saturating_sub(self.data_start)
    }

    /// Looks up an entry by id with a linear scan of the table.
    pub fn find_by_id(&self, id: u32) -> Option<&MixEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns the absolute byte range of `entry`, checked against the data region.
    pub fn entry_range(&self, entry: &MixEntry) -> Result<Range<u64>> {
        if entry.end() > self.data_region_len() {
            return Err(Error::malformed(
                self.data_start + u64::from(entry.offset),
                format!(
                    "entry {:#010x} spans {}..{} but the data region holds {} bytes",
                    entry.id,
                    entry.offset,
                    entry.end(),
                    self.data_region_len()
                ),
            ));
        }
        let start = self.data_start + u64::from(entry.offset);
        Ok(start..start + u64::from(entry.length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlainHeader {
        PlainHeader {
            file_count: 2,
            data_length: 30,
            entries: vec![MixEntry::new(0x1111, 0, 10), MixEntry::new(0x2222, 10, 20)],
        }
    }

    #[test]
    fn test_plain_header_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes.len(), 30);
        assert_eq!(&bytes[0..2], &[2, 0]);
        assert_eq!(&bytes[2..6], &[30, 0, 0, 0]);
        assert_eq!(&bytes[6..10], &0x1111u32.to_le_bytes());
        assert_eq!(&bytes[26..30], &20u32.to_le_bytes());
    }

    #[test]
    fn test_write_matches_to_bytes() {
        let mut out = Vec::new();
        sample().write(&mut out).unwrap();
        assert_eq!(out, sample().to_bytes());
        assert_eq!(out.len(), sample().encoded_len());
    }

    #[test]
    fn test_plain_header_parse() {
        let bytes = sample().to_bytes();
        let parsed = PlainHeader::parse_bytes(&bytes, 0).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_truncated_table_reports_entry_offset() {
        let mut bytes = sample().to_bytes();
        bytes.truncate(20);
        let err = PlainHeader::parse_bytes(&bytes, 4).unwrap_err();
        // Second entry starts at 4 + 6 + 12
        assert!(matches!(err, Error::MalformedStream { offset: 22, .. }));
    }

    #[test]
    fn test_entry_range_checked() {
        let header = MixHeader {
            variant: HeaderVariant::Unflagged,
            flags: 0,
            file_count: 1,
            data_length: 8,
            entries: vec![MixEntry::new(1, 4, 8)],
            data_start: 18,
            data_end: 26,
            key_blob: None,
        };
        assert!(header.entry_range(&MixEntry::new(1, 0, 8)).is_ok());
        assert_eq!(header.entry_range(&MixEntry::new(1, 2, 4)).unwrap(), 20..24);
        assert!(header.entry_range(&header.entries[0]).is_err());
        assert!(!header.has_checksum());
    }
}
