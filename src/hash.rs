//! File-name hashing for MIX file tables.
//!
//! MIX archives identify files by a 32-bit hash of the upper-cased name.
//! Tiberian Dawn and Red Alert use a rotate-and-add scheme over little-endian
//! words (historically called "CRC" although it is not one). Tiberian Sun and
//! later games switched to a real CRC-32 over a padded name.
//!
//! # Example
//!
//! ```rust
//! use cncmix::hash::{HashKind, name_hash};
//!
//! assert_eq!(name_hash("A"), 0x41);
//! assert_eq!(HashKind::Classic.hash_name("rules.ini"), name_hash("RULES.INI"));
//! ```

/// Replacement byte for characters outside Latin-1.
const NON_LATIN1: u8 = b'?';

/// Converts a name to the byte form the hashes operate on.
///
/// Characters above U+00FF have no single-byte form and become `?`.
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(NON_LATIN1))
        .collect()
}

/// Computes the classic Westwood name hash of `text` as given.
///
/// Bytes are taken four at a time, zero-padded at the end, packed
/// little-endian, and folded as `acc = acc.rotate_left(1) + word`.
/// The hash is case-sensitive; archive lookups upper-case first.
pub fn name_hash(text: &str) -> u32 {
    hash_bytes(&latin1_bytes(text))
}

/// Classic Westwood hash over raw bytes.
pub fn hash_bytes(bytes: &[u8]) -> u32 {
    bytes.chunks(4).fold(0u32, |acc, group| {
        let mut word = [0u8; 4];
        word[..group.len()].copy_from_slice(group);
        acc.rotate_left(1).wrapping_add(u32::from_le_bytes(word))
    })
}

/// CRC-32 name hash used by Tiberian Sun era archives.
///
/// A name whose length is not a multiple of four gets one byte holding
/// `len % 4`, then copies of the byte at `len & !3` until it is.
pub fn crc32_name_hash(text: &str) -> u32 {
    let mut bytes = latin1_bytes(text);
    let len = bytes.len();
    let remainder = len % 4;
    if remainder != 0 {
        let pad = bytes[len & !3];
        bytes.push(remainder as u8);
        bytes.resize(len + 4 - remainder, pad);
    }
    crc32fast::hash(&bytes)
}

/// Name hashing scheme used by an archive's file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashKind {
    /// Rotate-and-add hash (Tiberian Dawn, Red Alert).
    #[default]
    Classic,
    /// Padded CRC-32 (Tiberian Sun, Red Alert 2).
    Crc32,
}

impl HashKind {
    /// Hashes `name` after upper-casing its ASCII letters.
    ///
    /// Only `a..=z` are folded. Latin-1 letters such as `é` keep their case,
    /// as in the game tools, so `"é"` and `"É"` hash differently.
    pub fn hash_name(self, name: &str) -> u32 {
        let upper = name.to_ascii_uppercase();
        match self {
            HashKind::Classic => name_hash(&upper),
            HashKind::Crc32 => crc32_name_hash(&upper),
        }
    }
}
