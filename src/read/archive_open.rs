//! Archive opening and header probing.
//!
//! MIX files carry no magic number. The first four bytes are read as a flags
//! word; if its low half is zero the archive is flagged, otherwise those bytes
//! were the file count and data length of an unflagged header. A flags word
//! with unknown bits, or a zero word in a file too short for a flagged header,
//! is probed again as unflagged, which is how an unflagged archive with no
//! files is recognised. Known flag bits in a file too short for them mean the
//! archive is truncated.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

#[cfg(feature = "encryption")]
use crate::crypto::{KeyBootstrap, MixCipher};
use crate::format::header::{HeaderVariant, MixHeader, PlainHeader};
use crate::format::reader::{read_u16_le, read_u32_le};
#[cfg(feature = "encryption")]
use crate::format::encrypted_block_count;
use crate::format::{
    CHECKSUM_SIZE, CIPHER_BLOCK_SIZE, FLAG_CHECKSUM, FLAG_ENCRYPTED, FLAGS_SIZE, KEY_BLOB_SIZE,
    KNOWN_FLAGS, PLAIN_HEADER_SIZE, table_size,
};
use crate::{Error, Result};

use super::{ArchiveWarning, MixArchive, MixContext};

/// Header, trailer and warnings gathered while opening.
struct OpenResult {
    header: MixHeader,
    checksum: Option<[u8; CHECKSUM_SIZE]>,
    warnings: Vec<ArchiveWarning>,
}

impl MixArchive<BufReader<File>> {
    /// Opens an archive from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the header is invalid.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_path_with(path, &MixContext::default())
    }

    /// Opens an archive from a file path with an explicit context.
    pub fn open_path_with(path: impl AsRef<Path>, context: &MixContext) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(Error::Io)?;
        Self::open_with(BufReader::new(file), context)
    }
}

impl<R: Read + Seek> MixArchive<R> {
    /// Opens an archive from a reader using the default context.
    ///
    /// The archive is expected to start at the reader's offset zero.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with(reader, &MixContext::default())
    }

    /// Opens an archive from a reader with an explicit context.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedHeaderVariant`] if no header layout fits the file
    /// - [`Error::MalformedStream`] if the header or file table is truncated
    /// - [`Error::UnsupportedFeature`] for encrypted archives when the
    ///   `encryption` feature is disabled
    pub fn open_with(mut reader: R, context: &MixContext) -> Result<Self> {
        let result = read_header(&mut reader, context)?;
        log::debug!(
            "Opened {} MIX archive with {} entries, data at {:#x}",
            result.header.variant,
            result.header.entries.len(),
            result.header.data_start
        );
        Ok(Self {
            reader,
            header: result.header,
            context: context.clone(),
            checksum: result.checksum,
            warnings: result.warnings,
        })
    }
}

fn read_header<R: Read + Seek>(reader: &mut R, context: &MixContext) -> Result<OpenResult> {
    let file_len = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;

    if file_len < FLAGS_SIZE {
        return read_unflagged(reader, file_len);
    }
    let flags = read_u32_le(reader).map_err(|e| Error::from_read(e, 0, "flags"))?;
    if flags & 0xFFFF != 0 {
        return read_unflagged(reader, file_len);
    }

    let encrypted = flags & FLAG_ENCRYPTED != 0;
    let checksum_len = if flags & FLAG_CHECKSUM != 0 {
        CHECKSUM_SIZE as u64
    } else {
        0
    };
    let min_header = if encrypted {
        (KEY_BLOB_SIZE + CIPHER_BLOCK_SIZE) as u64
    } else {
        PLAIN_HEADER_SIZE as u64
    };
    let too_short = file_len < FLAGS_SIZE + min_header + checksum_len;
    if flags & !KNOWN_FLAGS != 0 || (too_short && flags == 0) {
        log::debug!(
            "Flags word {:#010x} does not fit a flagged header, probing as unflagged",
            flags
        );
        return read_unflagged(reader, file_len);
    }
    if too_short {
        return Err(Error::malformed(
            FLAGS_SIZE,
            format!(
                "flags {:#010x} need at least {} bytes but the file holds {}",
                flags,
                FLAGS_SIZE + min_header + checksum_len,
                file_len
            ),
        ));
    }

    let (variant, plain, key_blob, data_start) = if encrypted {
        let (plain, blob, data_start) = read_encrypted_table(reader, context)?;
        (HeaderVariant::Encrypted, plain, Some(blob), data_start)
    } else {
        let plain = PlainHeader::parse(reader, FLAGS_SIZE)?;
        let data_start = FLAGS_SIZE + table_size(plain.file_count) as u64;
        (HeaderVariant::Flagged, plain, None, data_start)
    };

    let data_end = file_len.checked_sub(checksum_len).filter(|&end| end >= data_start);
    let Some(data_end) = data_end else {
        return Err(Error::malformed(
            data_start,
            format!(
                "file of {} bytes ends inside the header or checksum trailer",
                file_len
            ),
        ));
    };

    let checksum = if checksum_len > 0 {
        let mut digest = [0u8; CHECKSUM_SIZE];
        reader.seek(SeekFrom::Start(data_end))?;
        reader
            .read_exact(&mut digest)
            .map_err(|e| Error::from_read(e, data_end, "checksum"))?;
        Some(digest)
    } else {
        None
    };

    let header = MixHeader {
        variant,
        flags,
        file_count: plain.file_count,
        data_length: plain.data_length,
        entries: plain.entries,
        data_start,
        data_end,
        key_blob,
    };
    Ok(OpenResult {
        warnings: check_data_length(&header),
        header,
        checksum,
    })
}

fn read_unflagged<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<OpenResult> {
    if file_len < PLAIN_HEADER_SIZE as u64 {
        return Err(Error::UnsupportedHeaderVariant(format!(
            "file of {} bytes is too short for a MIX header",
            file_len
        )));
    }
    reader.seek(SeekFrom::Start(0))?;
    let file_count = read_u16_le(reader).map_err(|e| Error::from_read(e, 0, "file count"))?;
    let table_len = table_size(file_count) as u64;
    if table_len > file_len {
        return Err(Error::UnsupportedHeaderVariant(format!(
            "unflagged header declares {} entries ({} bytes) in a {}-byte file",
            file_count, table_len, file_len
        )));
    }

    reader.seek(SeekFrom::Start(0))?;
    let plain = PlainHeader::parse(reader, 0)?;
    let header = MixHeader {
        variant: HeaderVariant::Unflagged,
        flags: 0,
        file_count: plain.file_count,
        data_length: plain.data_length,
        entries: plain.entries,
        data_start: table_len,
        data_end: file_len,
        key_blob: None,
    };
    Ok(OpenResult {
        warnings: check_data_length(&header),
        header,
        checksum: None,
    })
}

fn check_data_length(header: &MixHeader) -> Vec<ArchiveWarning> {
    let actual = header.data_region_len();
    if u64::from(header.data_length) == actual {
        return Vec::new();
    }
    log::warn!(
        "MIX header declares {} data bytes but {} are present",
        header.data_length,
        actual
    );
    vec![ArchiveWarning::DataLengthMismatch {
        declared: header.data_length,
        actual,
    }]
}

/// Reads the key blob and decrypts the file table behind it.
///
/// Returns the table, the blob, and the offset where data starts.
#[cfg(feature = "encryption")]
fn read_encrypted_table<R: Read + Seek>(
    reader: &mut R,
    context: &MixContext,
) -> Result<(PlainHeader, [u8; KEY_BLOB_SIZE], u64)> {
    let mut blob = [0u8; KEY_BLOB_SIZE];
    reader
        .read_exact(&mut blob)
        .map_err(|e| Error::from_read(e, FLAGS_SIZE, "key blob"))?;

    let westwood;
    let bootstrap = match context.key_bootstrap.as_ref() {
        Some(key) => key,
        None => {
            westwood = KeyBootstrap::westwood()?;
            &westwood
        }
    };
    let cipher = MixCipher::new(&bootstrap.decrypt(&blob))?;
    log::debug!("Bootstrapped header key from {}-byte blob", KEY_BLOB_SIZE);

    let table_start = FLAGS_SIZE + KEY_BLOB_SIZE as u64;
    let mut first = [0u8; CIPHER_BLOCK_SIZE];
    reader
        .read_exact(&mut first)
        .map_err(|e| Error::from_read(e, table_start, "encrypted header"))?;
    cipher.decrypt_blocks(&mut first)?;
    let file_count = u16::from_le_bytes([first[0], first[1]]);

    let mut scratch = vec![0u8; encrypted_block_count(file_count) * CIPHER_BLOCK_SIZE];
    reader.seek(SeekFrom::Start(table_start))?;
    reader
        .read_exact(&mut scratch)
        .map_err(|e| Error::from_read(e, table_start, "encrypted file table"))?;
    cipher.decrypt_blocks(&mut scratch)?;

    let plain = PlainHeader::parse_bytes(&scratch, table_start)?;
    Ok((plain, blob, table_start + scratch.len() as u64))
}

#[cfg(not(feature = "encryption"))]
fn read_encrypted_table<R: Read + Seek>(
    _reader: &mut R,
    _context: &MixContext,
) -> Result<(PlainHeader, [u8; KEY_BLOB_SIZE], u64)> {
    Err(Error::UnsupportedFeature {
        feature: "encryption",
    })
}
