//! Archive information types.

use crate::format::header::HeaderVariant;

/// Non-fatal problem noticed while opening an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveWarning {
    /// The header's data length disagrees with the bytes actually present.
    DataLengthMismatch {
        /// Length stored in the header.
        declared: u32,
        /// Length of the data region in the file.
        actual: u64,
    },
}

impl std::fmt::Display for ArchiveWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataLengthMismatch { declared, actual } => write!(
                f,
                "header declares {} data bytes but the file holds {}",
                declared, actual
            ),
        }
    }
}

/// Summary of an opened archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// Detected header layout.
    pub variant: HeaderVariant,
    /// Number of entries in the file table.
    pub entry_count: usize,
    /// Data length stored in the header.
    pub declared_data_length: u32,
    /// Absolute offset of the data section.
    pub data_start: u64,
    /// Size of the data region present in the file.
    pub data_size: u64,
    /// Sum of all entry lengths.
    pub total_entry_size: u64,
    /// Whether a checksum trailer is present.
    pub has_checksum: bool,
    /// Whether the header was encrypted.
    pub has_encrypted_header: bool,
}

impl ArchiveInfo {
    /// Bytes of the data region not covered by any entry.
    ///
    /// Overlapping entries can make this zero even when gaps exist.
    pub fn slack(&self) -> u64 {
        self.data_size.saturating_sub(self.total_entry_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ArchiveWarning::DataLengthMismatch {
            declared: 10,
            actual: 7,
        };
        assert_eq!(
            warning.to_string(),
            "header declares 10 data bytes but the file holds 7"
        );
    }
}
