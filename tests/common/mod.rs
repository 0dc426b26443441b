//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::Cursor;

use cncmix::{MixArchive, MixWriter, WriteOptions, WriteResult};

/// Creates an in-memory archive, returning its bytes and the write summary.
pub fn create_archive_with_result(
    options: Option<WriteOptions>,
    entries: &[(&str, &[u8])],
) -> cncmix::Result<(Vec<u8>, WriteResult)> {
    let mut writer = MixWriter::new(options.unwrap_or_default());
    for (name, data) in entries {
        writer.add(name, data.to_vec())?;
    }
    let mut bytes = Vec::new();
    let result = writer.finish(&mut bytes)?;
    Ok((bytes, result))
}

/// Creates an in-memory archive.
pub fn create_archive(options: Option<WriteOptions>, entries: &[(&str, &[u8])]) -> Vec<u8> {
    create_archive_with_result(options, entries)
        .expect("Failed to create test archive")
        .0
}

/// Opens archive bytes with the default context.
pub fn open_archive(bytes: Vec<u8>) -> MixArchive<Cursor<Vec<u8>>> {
    MixArchive::open(Cursor::new(bytes)).expect("Failed to open test archive")
}

/// Reads every entry by name and compares it with the expected content.
pub fn verify_archive_contents(archive: &mut MixArchive<Cursor<Vec<u8>>>, expected: &[(&str, &[u8])]) {
    assert_eq!(archive.len(), expected.len());
    for (name, data) in expected {
        let read = archive
            .read_by_name(name)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e));
        assert_eq!(&read, data, "Content mismatch for {}", name);
    }
}

/// Deterministic random bytes.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

/// Builds a Format40 delta turning `base` into `target` (same length).
pub fn make_delta(base: &[u8], target: &[u8]) -> Vec<u8> {
    assert_eq!(base.len(), target.len());
    let mut out = Vec::new();
    let mut i = 0;
    while i < base.len() {
        let same = base[i..]
            .iter()
            .zip(&target[i..])
            .take(0x7F)
            .take_while(|(a, b)| a == b)
            .count();
        if same > 0 {
            out.push(0x80 | same as u8);
            i += same;
            continue;
        }
        let diff = base[i..]
            .iter()
            .zip(&target[i..])
            .take(0x7F)
            .take_while(|(a, b)| a != b)
            .count();
        out.push(diff as u8);
        out.extend(base[i..i + diff].iter().zip(&target[i..i + diff]).map(|(a, b)| a ^ b));
        i += diff;
    }
    out.extend_from_slice(&[0x80, 0x00, 0x00]);
    out
}

/// Encrypted-archive fixtures keyed with a private test key.
#[cfg(feature = "encryption")]
pub mod encrypted {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use cncmix::crypto::{BigUint, KeyBootstrap, MixCipher, WESTWOOD_EXPONENT};
    use cncmix::format::{CIPHER_BLOCK_SIZE, FLAG_CHECKSUM, FLAG_ENCRYPTED, KEY_BLOB_SIZE};
    use cncmix::hash::HashKind;
    use cncmix::{MixContext, MixWriter, WriteOptions};

    /// DER integer of a 320-bit test modulus.
    pub const TEST_MODULUS_DER: &str =
        "AikAyvPaaNsWaLxH3Cyipf5hJPNJaB69ziCBNLk+DIi2zNjnFhCSnfRJHw==";

    /// Private exponent matching [`TEST_MODULUS_DER`].
    pub const TEST_PRIVATE_EXPONENT: &[u8] =
        b"957d7306434249594e11166ba39b30d0f7c6bd427f85b67b680c6b1ddc32d248df269c2f764d9391";

    /// Blowfish key hidden in fixture blobs.
    pub fn test_blowfish_key() -> [u8; 56] {
        let mut key = [0u8; 56];
        for (i, b) in key.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        key
    }

    pub fn test_bootstrap() -> KeyBootstrap {
        let der = STANDARD.decode(TEST_MODULUS_DER).unwrap();
        KeyBootstrap::from_der(&der, WESTWOOD_EXPONENT).unwrap()
    }

    pub fn test_context() -> MixContext {
        MixContext::new().key_bootstrap(test_bootstrap())
    }

    /// Produces a key blob that bootstraps to `key` under the test key.
    pub fn make_key_blob(key: &[u8; 56]) -> [u8; KEY_BLOB_SIZE] {
        let bootstrap = test_bootstrap();
        let d = BigUint::parse_bytes(TEST_PRIVATE_EXPONENT, 16).unwrap();
        let width = bootstrap.result_width();

        let mut high = key[width..].to_vec();
        high.resize(width, 0);
        let mut blob = [0u8; KEY_BLOB_SIZE];
        for (half, plain) in [(0usize, &high[..]), (1, &key[..width])] {
            let mut c = BigUint::from_bytes_le(plain)
                .modpow(&d, bootstrap.modulus())
                .to_bytes_le();
            c.resize(KEY_BLOB_SIZE / 2, 0);
            blob[half * 40..(half + 1) * 40].copy_from_slice(&c);
        }
        blob
    }

    /// Builds an archive with an encrypted header.
    pub fn create_encrypted_archive(entries: &[(&str, &[u8])], checksum: bool) -> Vec<u8> {
        let mut writer = MixWriter::new(WriteOptions::new());
        for (name, data) in entries {
            writer.add(name, data.to_vec()).unwrap();
        }
        let header = writer.plain_header().unwrap();

        let mut table = header.to_bytes();
        table.resize(table.len().div_ceil(CIPHER_BLOCK_SIZE) * CIPHER_BLOCK_SIZE, 0);
        let key = test_blowfish_key();
        MixCipher::new(&key).unwrap().encrypt_blocks(&mut table).unwrap();

        let mut data = Vec::new();
        for entry in &header.entries {
            let (_, body) = entries
                .iter()
                .find(|(name, _)| HashKind::Classic.hash_name(name) == entry.id)
                .unwrap();
            data.extend_from_slice(body);
        }

        let flags = FLAG_ENCRYPTED | if checksum { FLAG_CHECKSUM } else { 0 };
        let mut out = flags.to_le_bytes().to_vec();
        out.extend_from_slice(&make_key_blob(&key));
        out.extend_from_slice(&table);
        out.extend_from_slice(&data);
        if checksum {
            out.extend_from_slice(&cncmix::checksum::sha1(&data));
        }
        out
    }
}
