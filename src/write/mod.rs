//! Archive writing API for MIX archives.
//!
//! Entries are collected in memory and written in one go by
//! [`MixWriter::finish`]. The file table is sorted by id compared as signed
//! 32-bit numbers, the order the original Westwood tools produced, and entry
//! data is laid out in table order. Encrypted headers are not written.
//!
//! # Example
//!
//! ```rust
//! use cncmix::{MixArchive, MixWriter, WriteOptions};
//! use std::io::Cursor;
//!
//! let mut writer = MixWriter::new(WriteOptions::new().checksum(true));
//! writer.add("RULES.INI", b"[General]".to_vec())?;
//! let mut out = Vec::new();
//! writer.finish(&mut out)?;
//!
//! let mut archive = MixArchive::open(Cursor::new(out))?;
//! assert_eq!(archive.read_by_name("rules.ini")?, b"[General]");
//! assert_eq!(archive.verify_checksum()?, Some(true));
//! # Ok::<(), cncmix::Error>(())
//! ```

mod options;

pub use options::{WriteOptions, WriteResult};

use std::collections::BTreeMap;
use std::io::Write;

use crate::checksum::Sha1Writer;
use crate::format::header::{MixEntry, PlainHeader};
use crate::format::{FLAG_CHECKSUM, FLAGS_SIZE, MAX_ENTRIES};
use crate::{Error, Result};

/// Builds a MIX archive from in-memory entries.
#[derive(Debug, Clone, Default)]
pub struct MixWriter {
    options: WriteOptions,
    // Keyed by the signed id so iteration follows table order.
    entries: BTreeMap<i32, Vec<u8>>,
}

impl MixWriter {
    /// Creates an empty writer.
    pub fn new(options: WriteOptions) -> Self {
        Self {
            options,
            entries: BTreeMap::new(),
        }
    }

    /// Adds a file under `name`, returning its id.
    pub fn add(&mut self, name: &str, data: impl Into<Vec<u8>>) -> Result<u32> {
        let id = self.options.hash_kind.hash_name(name);
        self.add_with_id(id, data).map_err(|e| match e {
            Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", name, msg)),
            other => other,
        })?;
        Ok(id)
    }

    /// Adds a file under a precomputed id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the id is already present or the
    /// table is full.
    pub fn add_with_id(&mut self, id: u32, data: impl Into<Vec<u8>>) -> Result<()> {
        let key = id as i32;
        if self.entries.contains_key(&key) {
            return Err(Error::InvalidInput(format!("duplicate id {:#010x}", id)));
        }
        if self.entries.len() >= MAX_ENTRIES {
            return Err(Error::InvalidInput(format!(
                "a MIX archive holds at most {} entries",
                MAX_ENTRIES
            )));
        }
        self.entries.insert(key, data.into());
        Ok(())
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the header that [`finish`](Self::finish) would write.
    pub fn plain_header(&self) -> Result<PlainHeader> {
        let mut entries = Vec::with_capacity(self.entries.len());
        let mut offset = 0u64;
        for (&key, data) in &self.entries {
            let length = u32::try_from(data.len()).map_err(|_| {
                Error::InvalidInput(format!("entry {:#010x} exceeds 4 GiB", key as u32))
            })?;
            let start = u32::try_from(offset)
                .map_err(|_| Error::InvalidInput("data section exceeds 4 GiB".into()))?;
            entries.push(MixEntry::new(key as u32, start, length));
            offset += u64::from(length);
        }
        let data_length = u32::try_from(offset)
            .map_err(|_| Error::InvalidInput("data section exceeds 4 GiB".into()))?;
        Ok(PlainHeader {
            file_count: entries.len() as u16,
            data_length,
            entries,
        })
    }

    /// Writes the archive and returns what was written.
    pub fn finish<W: Write>(self, mut writer: W) -> Result<WriteResult> {
        let header = self.plain_header()?;
        let mut total_size = 0u64;

        if self.options.is_flagged() {
            let flags = if self.options.has_checksum() {
                FLAG_CHECKSUM
            } else {
                0
            };
            writer.write_all(&flags.to_le_bytes())?;
            total_size += FLAGS_SIZE;
        }
        header.write(&mut writer)?;
        total_size += header.encoded_len() as u64;

        let mut data = Sha1Writer::new(&mut writer);
        for body in self.entries.values() {
            data.write_all(body)?;
        }
        let data_size = data.bytes_written();
        let digest = data.digest();
        total_size += data_size;

        let checksum = if self.options.has_checksum() {
            writer.write_all(&digest)?;
            total_size += digest.len() as u64;
            Some(digest)
        } else {
            None
        };
        writer.flush()?;

        log::debug!(
            "Wrote {} MIX archive: {} entries, {} data bytes",
            self.options.variant(),
            header.entries.len(),
            data_size
        );
        Ok(WriteResult {
            variant: self.options.variant(),
            entries_written: header.entries.len(),
            data_size,
            total_size,
            checksum,
        })
    }
}
