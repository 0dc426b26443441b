//! Tests for malformed and corrupted archive handling.
//!
//! Damaged input must surface as an error value, never as a panic.

mod common;

use std::io::Cursor;

use cncmix::codec::{lcw, xor_delta, zero_run};
use cncmix::format::header::{MixEntry, PlainHeader};
use cncmix::{Error, MixArchive, WriteOptions, pack};

fn open(bytes: Vec<u8>) -> cncmix::Result<MixArchive<Cursor<Vec<u8>>>> {
    MixArchive::open(Cursor::new(bytes))
}

#[test]
fn test_truncated_flagged_table() {
    let mut bytes = vec![0, 0, 0, 0];
    bytes.extend_from_slice(&3u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 12]);

    let err = open(bytes).unwrap_err();
    assert!(matches!(err, Error::MalformedStream { offset: 22, .. }), "{}", err);
}

#[test]
fn test_unflagged_count_too_large() {
    let mut bytes = 200u16.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    assert!(matches!(
        open(bytes).unwrap_err(),
        Error::UnsupportedHeaderVariant(_)
    ));
}

#[test]
fn test_missing_checksum_trailer() {
    // Checksum flag, two entries, no data and no trailer
    let mut bytes = 0x0001_0000u32.to_le_bytes().to_vec();
    bytes.extend_from_slice(
        &PlainHeader {
            file_count: 2,
            data_length: 0,
            entries: vec![MixEntry::new(1, 0, 0), MixEntry::new(2, 0, 0)],
        }
        .to_bytes(),
    );
    assert!(open(bytes).unwrap_err().is_corruption());
}

#[test]
fn test_entry_past_data_region_fails_on_read() {
    let header = PlainHeader {
        file_count: 1,
        data_length: 4,
        entries: vec![MixEntry::new(0x41, 2, 10)],
    };
    let mut bytes = header.to_bytes();
    bytes.extend_from_slice(b"data");

    let mut archive = open(bytes).expect("header itself is well-formed");
    let entry = *archive.find_by_id(0x41).unwrap();
    assert!(matches!(
        archive.read_entry(&entry).unwrap_err(),
        Error::MalformedStream { .. }
    ));
    assert!(archive.entry_reader(&entry).is_err());
}

#[test]
fn test_random_input_never_panics() {
    for seed in 0..200u64 {
        let len = (seed as usize * 7) % 300;
        let bytes = common::random_bytes(len, seed);
        if let Ok(mut archive) = open(bytes) {
            let entries = archive.entries().to_vec();
            for entry in entries {
                let _ = archive.read_entry(&entry);
            }
        }
    }
}

#[test]
fn test_bit_flips_never_panic() {
    let files: [(&str, &[u8]); 2] = [("A.BIN", b"first body"), ("B.BIN", b"second body")];
    let original = common::create_archive(Some(WriteOptions::new().checksum(true)), &files);
    for i in 0..original.len() {
        for bit in [0x01u8, 0x80] {
            let mut bytes = original.clone();
            bytes[i] ^= bit;
            if let Ok(mut archive) = open(bytes) {
                let entries = archive.entries().to_vec();
                for entry in entries {
                    let _ = archive.read_entry(&entry);
                }
                let _ = archive.verify_checksum();
            }
        }
    }
}

#[test]
fn test_random_codec_streams_never_panic() {
    for seed in 0..300u64 {
        let stream = common::random_bytes(64, seed);
        let mut dst = vec![0u8; 256];
        let _ = lcw::decode(&mut dst, (seed % 4) as usize, &mut &stream[..]);
        let _ = xor_delta::decode(&mut dst, 0, &mut &stream[..]);
        let _ = zero_run::decode(&stream, 16, 16);
        let _ = pack::decode_binary(&stream);
    }
}

#[test]
fn test_truncated_lcw_stream() {
    let packed = lcw::encode(&common::random_bytes(500, 3));
    for cut in 0..packed.len() {
        assert!(
            lcw::decompress(&packed[..cut], 500).is_err(),
            "truncation at {} was accepted",
            cut
        );
    }
}

#[cfg(feature = "encryption")]
#[test]
fn test_truncated_encrypted_archive_is_malformed() {
    use common::encrypted::{create_encrypted_archive, test_context};

    let mut bytes = create_encrypted_archive(&[("RULES.INI", b"[General]\n")], false);
    bytes.truncate(90);
    let err = MixArchive::open_with(Cursor::new(bytes), &test_context()).unwrap_err();
    assert!(matches!(err, Error::MalformedStream { .. }), "{}", err);
}

#[test]
fn test_truncated_checksum_trailer_is_malformed() {
    let mut bytes = common::create_archive(Some(WriteOptions::new().checksum(true)), &[]);
    assert_eq!(bytes.len(), 30);
    bytes.truncate(bytes.len() - 5);
    let err = open(bytes).unwrap_err();
    assert!(matches!(err, Error::MalformedStream { .. }), "{}", err);
}
