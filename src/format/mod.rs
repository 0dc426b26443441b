//! MIX archive format constants, definitions, and low-level parsing utilities.
//!
//! A MIX file never stores names, only 32-bit name hashes. Two layouts exist:
//!
//! ```text
//! unflagged: [u16 file_count][u32 data_length][file_count x entry][data]
//! flagged:   [u32 flags][80-byte key blob if encrypted]
//!            [header + table, Blowfish-ECB encrypted if flagged so]
//!            [data][20-byte checksum if flagged so]
//! entry:     [u32 id][u32 offset][u32 length]
//! ```
//!
//! There is no version tag; the layout is resolved by probing the first four
//! bytes (see [`crate::read`]).

pub mod header;
pub mod reader;

/// Flags bit marking a trailing checksum.
pub const FLAG_CHECKSUM: u32 = 0x0001_0000;

/// Flags bit marking an encrypted header.
pub const FLAG_ENCRYPTED: u32 = 0x0002_0000;

/// All flag bits this crate understands.
pub const KNOWN_FLAGS: u32 = FLAG_CHECKSUM | FLAG_ENCRYPTED;

/// Size of the flags word that starts a flagged archive.
pub const FLAGS_SIZE: u64 = 4;

/// Size of the encrypted key blob following the flags word.
pub const KEY_BLOB_SIZE: usize = 80;

/// Size of the trailing checksum.
pub const CHECKSUM_SIZE: usize = 20;

/// Size of `[u16 file_count][u32 data_length]`.
pub const PLAIN_HEADER_SIZE: usize = 6;

/// Size of one file-table entry.
pub const ENTRY_SIZE: usize = 12;

/// Blowfish block size used for encrypted headers.
pub const CIPHER_BLOCK_SIZE: usize = 8;

/// Largest number of entries a header can declare.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// Returns the size of the plain header plus file table for `file_count` entries.
pub fn table_size(file_count: u16) -> usize {
    PLAIN_HEADER_SIZE + file_count as usize * ENTRY_SIZE
}

/// Returns the number of cipher blocks covering the header of `file_count` entries.
pub fn encrypted_block_count(file_count: u16) -> usize {
    table_size(file_count).div_ceil(CIPHER_BLOCK_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_size() {
        assert_eq!(table_size(0), 6);
        assert_eq!(table_size(3), 42);
    }

    #[test]
    fn test_encrypted_block_count() {
        // 6 bytes still needs one full block
        assert_eq!(encrypted_block_count(0), 1);
        // 42 bytes -> 6 blocks (48 bytes)
        assert_eq!(encrypted_block_count(3), 6);
        // 6 + 12 * 5 = 66 -> 9 blocks
        assert_eq!(encrypted_block_count(5), 9);
    }
}
