//! Public-key bootstrap of the header cipher key.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rsa::BigUint;

use super::{KEY_BLOCK_SIZE, WESTWOOD_EXPONENT};
use crate::format::KEY_BLOB_SIZE;
use crate::{Error, Result};

/// DER integer holding the modulus shipped with the games.
const WESTWOOD_MODULUS_DER: &str = "AihRvNoIbTn85FZRYNZRcT+i6KpU+maCsEqr3Q5q+LDB5tH7Tz2qQ38V";

const DER_INTEGER_TAG: u8 = 0x02;

/// Parses a primitive DER INTEGER with a short-form length.
///
/// Only `0x02 <len> <magnitude>` with `len < 0x80` is accepted. The magnitude
/// is read as an unsigned big-endian number; bytes after it are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidKeyEncoding`] for any other tag, a long-form
/// length, an empty magnitude, or too few bytes.
pub fn parse_der_integer(bytes: &[u8]) -> Result<BigUint> {
    let (&tag, rest) = bytes
        .split_first()
        .ok_or_else(|| Error::InvalidKeyEncoding("empty input".into()))?;
    if tag != DER_INTEGER_TAG {
        return Err(Error::InvalidKeyEncoding(format!(
            "expected INTEGER tag 0x02, found {:#04x}",
            tag
        )));
    }
    let (&len, rest) = rest
        .split_first()
        .ok_or_else(|| Error::InvalidKeyEncoding("missing length".into()))?;
    if len >= 0x80 {
        return Err(Error::InvalidKeyEncoding(format!(
            "long-form length {:#04x} is not supported",
            len
        )));
    }
    if len == 0 {
        return Err(Error::InvalidKeyEncoding("integer has no content".into()));
    }
    let magnitude = rest.get(..usize::from(len)).ok_or_else(|| {
        Error::InvalidKeyEncoding(format!(
            "integer declares {} bytes but {} are present",
            len,
            rest.len()
        ))
    })?;
    Ok(BigUint::from_bytes_be(magnitude))
}

/// Recovers header key material from an archive's key blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBootstrap {
    modulus: BigUint,
    exponent: BigUint,
    result_width: usize,
}

impl KeyBootstrap {
    /// The public key compiled into Red Alert and Tiberian Sun.
    pub fn westwood() -> Result<Self> {
        let der = STANDARD
            .decode(WESTWOOD_MODULUS_DER)
            .map_err(|e| Error::InvalidKeyEncoding(format!("built-in key: {}", e)))?;
        Self::from_der(&der, WESTWOOD_EXPONENT)
    }

    /// Creates a bootstrap for a custom modulus and exponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyEncoding`] if the modulus is shorter than
    /// two bytes, since each block result is one byte narrower than it.
    pub fn new(modulus: BigUint, exponent: BigUint) -> Result<Self> {
        let modulus_bytes = modulus.bits().div_ceil(8);
        if modulus_bytes < 2 {
            return Err(Error::InvalidKeyEncoding(format!(
                "modulus of {} bits is too small",
                modulus.bits()
            )));
        }
        Ok(Self {
            modulus,
            exponent,
            result_width: modulus_bytes - 1,
        })
    }

    /// Creates a bootstrap from a DER-encoded modulus.
    pub fn from_der(der: &[u8], exponent: u32) -> Result<Self> {
        Self::new(parse_der_integer(der)?, BigUint::from(exponent))
    }

    /// The public modulus.
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Bytes produced per key block.
    pub fn result_width(&self) -> usize {
        self.result_width
    }

    /// Decrypts a key blob into Blowfish key material.
    ///
    /// Each 40-byte half is a little-endian integer raised to the public
    /// exponent. The results are rendered little-endian at
    /// [`result_width`](Self::result_width) bytes, second half first.
    pub fn decrypt(&self, blob: &[u8; KEY_BLOB_SIZE]) -> Vec<u8> {
        let (first, second) = blob.split_at(KEY_BLOCK_SIZE);
        let mut out = Vec::with_capacity(self.result_width * 2);
        for block in [second, first] {
            let value = BigUint::from_bytes_le(block).modpow(&self.exponent, &self.modulus);
            let mut bytes = value.to_bytes_le();
            bytes.resize(self.result_width, 0);
            out.extend_from_slice(&bytes);
        }
        out
    }
}
