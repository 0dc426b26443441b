//! Encrypted-header archives, opened through a test key bootstrap.

#![cfg(feature = "encryption")]

mod common;

use std::io::Cursor;

use common::encrypted::{
    create_encrypted_archive, make_key_blob, test_blowfish_key, test_bootstrap, test_context,
};
use cncmix::format::KEY_BLOB_SIZE;
use cncmix::{HeaderVariant, MixArchive, MixContext};

const FILES: [(&str, &[u8]); 5] = [
    ("RULES.INI", b"[General]\n"),
    ("ART.INI", b"[Movies]\n"),
    ("SOUNDS.INI", b"[Sounds]\n"),
    ("TUTORIAL.INI", b"[Tutorial]\n"),
    ("SNOW.PAL", &[0x20; 48]),
];

#[test]
fn test_key_blob_bootstraps_to_blowfish_key() {
    let key = test_blowfish_key();
    let material = test_bootstrap().decrypt(&make_key_blob(&key));
    assert_eq!(material.len(), 78);
    assert_eq!(&material[..56], &key[..]);
}

#[test]
fn test_open_encrypted_archive() {
    let bytes = create_encrypted_archive(&FILES, false);
    let mut archive = MixArchive::open_with(Cursor::new(bytes), &test_context()).unwrap();

    let header = archive.header().clone();
    assert_eq!(header.variant, HeaderVariant::Encrypted);
    assert!(header.is_encrypted());
    assert!(header.key_blob.is_some());
    // 6 + 5 * 12 = 66 bytes of table, padded to 9 blocks
    assert_eq!(header.data_start, 4 + KEY_BLOB_SIZE as u64 + 72);
    assert!(archive.warnings().is_empty());
    assert!(archive.info().has_encrypted_header);

    common::verify_archive_contents(&mut archive, &FILES);
}

#[test]
fn test_encrypted_with_checksum() {
    let bytes = create_encrypted_archive(&FILES[..2], true);
    let mut archive = MixArchive::open_with(Cursor::new(bytes), &test_context()).unwrap();
    assert!(archive.header().has_checksum());
    assert!(archive.warnings().is_empty());
    assert_eq!(archive.verify_checksum().unwrap(), Some(true));
    assert_eq!(archive.read_by_name("ART.INI").unwrap(), FILES[1].1);
}

#[test]
fn test_encrypted_empty_table() {
    let bytes = create_encrypted_archive(&[], false);
    let archive = MixArchive::open_with(Cursor::new(bytes), &test_context()).unwrap();
    assert!(archive.is_empty());
    assert_eq!(archive.header().data_start, 4 + KEY_BLOB_SIZE as u64 + 8);
}

#[test]
fn test_truncated_encrypted_table() {
    let mut bytes = create_encrypted_archive(&FILES, false);
    bytes.truncate(4 + KEY_BLOB_SIZE + 16);
    let err = MixArchive::open_with(Cursor::new(bytes), &test_context()).unwrap_err();
    assert!(err.is_corruption(), "{}", err);
}

#[test]
fn test_context_override_is_required() {
    // The built-in key recovers a different Blowfish key, so the table
    // decrypts to something other than our five entries.
    let bytes = create_encrypted_archive(&FILES, false);
    if let Ok(archive) = MixArchive::open_with(Cursor::new(bytes), &MixContext::new()) {
        assert!(archive.find_by_name("RULES.INI").is_none());
    }
}
