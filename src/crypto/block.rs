//! Blowfish-ECB over the encrypted header.

use blowfish::Blowfish;
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use super::MAX_KEY_LEN;
use crate::format::CIPHER_BLOCK_SIZE;
use crate::{Error, Result};

const MIN_KEY_LEN: usize = 4;

/// Header cipher keyed from bootstrapped key material.
#[derive(Clone)]
pub struct MixCipher {
    inner: Blowfish,
}

impl std::fmt::Debug for MixCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixCipher").finish_non_exhaustive()
    }
}

impl MixCipher {
    /// Keys Blowfish with the first 56 bytes of `key_material`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CryptoError`] if fewer than 4 bytes are given.
    pub fn new(key_material: &[u8]) -> Result<Self> {
        if key_material.len() < MIN_KEY_LEN {
            return Err(Error::CryptoError(format!(
                "Blowfish key needs at least {} bytes, got {}",
                MIN_KEY_LEN,
                key_material.len()
            )));
        }
        let key = &key_material[..key_material.len().min(MAX_KEY_LEN)];
        let inner = <Blowfish as KeyInit>::new_from_slice(key)
            .map_err(|e| Error::CryptoError(format!("invalid Blowfish key: {}", e)))?;
        Ok(Self { inner })
    }

    /// Decrypts `buf` in place, one 8-byte block at a time.
    pub fn decrypt_blocks(&self, buf: &mut [u8]) -> Result<()> {
        check_aligned(buf)?;
        for block in buf.chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            self.inner.decrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }

    /// Encrypts `buf` in place, one 8-byte block at a time.
    pub fn encrypt_blocks(&self, buf: &mut [u8]) -> Result<()> {
        check_aligned(buf)?;
        for block in buf.chunks_exact_mut(CIPHER_BLOCK_SIZE) {
            self.inner.encrypt_block(GenericArray::from_mut_slice(block));
        }
        Ok(())
    }
}

fn check_aligned(buf: &[u8]) -> Result<()> {
    if buf.len() % CIPHER_BLOCK_SIZE != 0 {
        return Err(Error::CryptoError(format!(
            "buffer of {} bytes is not a multiple of the {}-byte block size",
            buf.len(),
            CIPHER_BLOCK_SIZE
        )));
    }
    Ok(())
}
