//! Archive query methods.
//!
//! Lookups and entry reads on an opened archive. Names are turned into ids by
//! the context's [`NameDirectory`](crate::directory::NameDirectory); the
//! archive itself only knows ids.

use std::io::{Read, Seek, SeekFrom};

use crate::checksum::{Sha1Digest, sha1_reader};
use crate::format::header::{MixEntry, MixHeader};
use crate::{Error, Result};

use super::{ArchiveInfo, ArchiveWarning, EntryReader, MixArchive, MixContext};

impl<R> MixArchive<R> {
    /// Returns the parsed header.
    pub fn header(&self) -> &MixHeader {
        &self.header
    }

    /// Returns the context the archive was opened with.
    pub fn context(&self) -> &MixContext {
        &self.context
    }

    /// Returns a summary of the archive.
    pub fn info(&self) -> ArchiveInfo {
        ArchiveInfo {
            variant: self.header.variant,
            entry_count: self.header.entries.len(),
            declared_data_length: self.header.data_length,
            data_start: self.header.data_start,
            data_size: self.header.data_region_len(),
            total_entry_size: self.header.entries.iter().map(|e| u64::from(e.length)).sum(),
            has_checksum: self.header.has_checksum(),
            has_encrypted_header: self.header.is_encrypted(),
        }
    }

    /// Non-fatal problems noticed while opening.
    pub fn warnings(&self) -> &[ArchiveWarning] {
        &self.warnings
    }

    /// The stored SHA-1 trailer, if the archive has one.
    ///
    /// Opening never checks it; see [`verify_checksum`](Self::verify_checksum).
    pub fn checksum(&self) -> Option<&Sha1Digest> {
        self.checksum.as_ref()
    }

    /// Returns all entries in stored order.
    pub fn entries(&self) -> &[MixEntry] {
        &self.header.entries
    }

    /// Pairs every entry with its name, where the directory knows it.
    pub fn named_entries(&self) -> impl Iterator<Item = (&MixEntry, Option<String>)> + '_ {
        self.header
            .entries
            .iter()
            .map(move |entry| (entry, self.context.directory.id_to_name(entry.id)))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.header.entries.len()
    }

    /// Returns true if the archive has no entries.
    pub fn is_empty(&self) -> bool {
        self.header.entries.is_empty()
    }

    /// Finds an entry by id.
    pub fn find_by_id(&self, id: u32) -> Option<&MixEntry> {
        self.header.find_by_id(id)
    }

    /// Finds an entry by name.
    pub fn find_by_name(&self, name: &str) -> Option<&MixEntry> {
        self.find_by_id(self.context.directory.name_to_id(name))
    }

    /// Finds an entry by name, failing with [`Error::LookupNotFound`].
    pub fn get_by_name(&self, name: &str) -> Result<&MixEntry> {
        self.find_by_name(name).ok_or_else(|| Error::not_found(name))
    }

    /// Returns true if an entry for `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Consumes the archive and returns the underlying reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read + Seek> MixArchive<R> {
    /// Reads the whole body of `entry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedStream`] if the entry lies outside the data
    /// region or the file ends early.
    pub fn read_entry(&mut self, entry: &MixEntry) -> Result<Vec<u8>> {
        let range = self.header.entry_range(entry)?;
        self.reader.seek(SeekFrom::Start(range.start))?;
        let mut data = vec![0u8; entry.length as usize];
        self.reader
            .read_exact(&mut data)
            .map_err(|e| Error::from_read(e, range.start, "entry data"))?;
        Ok(data)
    }

    /// Looks up `name` and reads its body.
    pub fn read_by_name(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = *self.get_by_name(name)?;
        self.read_entry(&entry)
    }

    /// Returns a reader bounded to the body of `entry`.
    pub fn entry_reader(&mut self, entry: &MixEntry) -> Result<EntryReader<'_, R>> {
        let range = self.header.entry_range(entry)?;
        self.reader.seek(SeekFrom::Start(range.start))?;
        Ok(EntryReader::new(&mut self.reader, *entry))
    }

    /// Hashes the data region and compares it with the stored checksum.
    ///
    /// Returns `None` if the archive has no checksum.
    pub fn verify_checksum(&mut self) -> Result<Option<bool>> {
        let Some(stored) = self.checksum else {
            return Ok(None);
        };
        self.reader.seek(SeekFrom::Start(self.header.data_start))?;
        let mut region = (&mut self.reader).take(self.header.data_region_len());
        let computed = sha1_reader(&mut region)?;
        if computed != stored {
            log::debug!("Stored checksum does not match the data region");
        }
        Ok(Some(computed == stored))
    }
}
