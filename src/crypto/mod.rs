//! Header encryption for Red Alert and Tiberian Sun MIX archives.
//!
//! An encrypted archive stores an 80-byte key blob right after its flags
//! word. The blob is raised to a public RSA exponent ([`KeyBootstrap`]) to
//! recover the Blowfish key that decrypts the header ([`MixCipher`]).
//!
//! ```text
//! blob[0..40], blob[40..80]  --modpow-->  key material (78 bytes)
//! key material[..56]         --Blowfish-ECB-->  plain header + table
//! ```
//!
//! Only the header is encrypted; file data is stored in the clear.
//!
//! This module requires the `encryption` feature.

mod block;
mod key;

pub use block::MixCipher;
pub use key::{KeyBootstrap, parse_der_integer};

/// Re-exported big integer type used for key material.
pub use rsa::BigUint;

/// Public exponent of the Westwood key.
pub const WESTWOOD_EXPONENT: u32 = 0x10001;

/// Size of one encrypted key block.
pub const KEY_BLOCK_SIZE: usize = 40;

/// Largest Blowfish key, in bytes.
pub const MAX_KEY_LEN: usize = 56;
