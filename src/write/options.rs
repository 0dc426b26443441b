//! Write options and results for archive creation.

use crate::checksum::Sha1Digest;
use crate::format::header::HeaderVariant;
use crate::hash::HashKind;

/// Options for [`MixWriter`](super::MixWriter).
///
/// # Example
///
/// ```rust
/// use cncmix::WriteOptions;
/// use cncmix::hash::HashKind;
///
/// let options = WriteOptions::new().checksum(true).hash_kind(HashKind::Crc32);
/// assert!(options.is_flagged());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub(crate) flagged: bool,
    pub(crate) checksum: bool,
    pub(crate) hash_kind: HashKind,
}

impl WriteOptions {
    /// Unflagged layout, classic hash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the archive with a flags word.
    pub fn flagged(mut self, flagged: bool) -> Self {
        self.flagged = flagged;
        self
    }

    /// Appends a SHA-1 trailer over the data section.
    ///
    /// A checksum needs the flags word, so this implies [`flagged`](Self::flagged).
    pub fn checksum(mut self, checksum: bool) -> Self {
        self.checksum = checksum;
        self
    }

    /// Hash used to turn names into ids.
    pub fn hash_kind(mut self, kind: HashKind) -> Self {
        self.hash_kind = kind;
        self
    }

    /// Whether the output starts with a flags word.
    pub fn is_flagged(&self) -> bool {
        self.flagged || self.checksum
    }

    /// Whether the output ends with a checksum.
    pub fn has_checksum(&self) -> bool {
        self.checksum
    }

    pub(crate) fn variant(&self) -> HeaderVariant {
        if self.is_flagged() {
            HeaderVariant::Flagged
        } else {
            HeaderVariant::Unflagged
        }
    }
}

/// Result of writing an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    /// Layout that was written.
    pub variant: HeaderVariant,
    /// Number of entries written.
    pub entries_written: usize,
    /// Size of the data section.
    pub data_size: u64,
    /// Total bytes written, header and trailer included.
    pub total_size: u64,
    /// Checksum trailer, if one was written.
    pub checksum: Option<Sha1Digest>,
}

impl WriteResult {
    /// Bytes spent on everything but entry data.
    pub fn overhead(&self) -> u64 {
        self.total_size - self.data_size
    }
}
