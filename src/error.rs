//! Error types for MIX archive and codec operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when parsing archives or decoding Westwood codec streams,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. A decode
//! or parse error aborts the load of that one file; nothing is retried or
//! repaired locally.
//!
//! ```rust,no_run
//! use cncmix::{Error, MixArchive};
//!
//! fn describe(path: &str) -> cncmix::Result<()> {
//!     match MixArchive::open_path(path) {
//!         Ok(archive) => {
//!             println!("{} entries", archive.len());
//!             Ok(())
//!         }
//!         Err(Error::UnsupportedHeaderVariant(msg)) => {
//!             eprintln!("Not a MIX archive: {}", msg);
//!             Err(Error::UnsupportedHeaderVariant(msg))
//!         }
//!         Err(e) if e.is_corruption() => {
//!             eprintln!("Archive is damaged: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```

use std::io;

/// The main error type for MIX archive and codec operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Format | [`MalformedStream`][Self::MalformedStream], [`UnsupportedHeaderVariant`][Self::UnsupportedHeaderVariant] | Truncated or invalid data |
/// | Crypto | [`InvalidKeyEncoding`][Self::InvalidKeyEncoding], [`CryptoError`][Self::CryptoError] | Bad key material |
/// | Lookup | [`LookupNotFound`][Self::LookupNotFound] | Name absent from archive or directory |
/// | Caller | [`InvalidInput`][Self::InvalidInput] | Encoder preconditions |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A codec or header stream is truncated or contains an out-of-range
    /// command.
    ///
    /// The offset is the position in the source stream where the problem
    /// was detected.
    #[error("Malformed stream at offset {offset:#x}: {reason}")]
    MalformedStream {
        /// Byte offset in the source stream.
        offset: u64,
        /// Description of the problem.
        reason: String,
    },

    /// A DER-encoded key integer is not in the supported primitive form.
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// Neither a flagged nor a length-consistent unflagged MIX header was found.
    #[error("Unsupported MIX header: {0}")]
    UnsupportedHeaderVariant(String),

    /// The requested name is not present in the archive or directory.
    #[error("Entry not found: {name}")]
    LookupNotFound {
        /// The name (or formatted id) that was looked up.
        name: String,
    },

    /// A feature required by the archive is not compiled in.
    ///
    /// Encrypted archives need the `encryption` cargo feature.
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// Input handed to an encoder or builder violates its preconditions.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A block cipher could not be keyed or was given misaligned data.
    #[error("Cryptographic error: {0}")]
    CryptoError(String),
}

impl Error {
    /// Returns `true` if this is a data corruption error.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::MalformedStream { .. } | Error::UnsupportedHeaderVariant(_)
        )
    }

    /// Returns `true` if this is an encryption-related error.
    pub fn is_encryption_error(&self) -> bool {
        matches!(self, Error::InvalidKeyEncoding(_) | Error::CryptoError(_))
    }

    /// Returns `true` if a lookup failed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::LookupNotFound { .. })
    }

    /// Returns the stream offset if this is a malformed stream error.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Error::MalformedStream { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Creates a MalformedStream error.
    pub fn malformed(offset: u64, reason: impl Into<String>) -> Self {
        Error::MalformedStream {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a LookupNotFound error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Error::LookupNotFound { name: name.into() }
    }

    /// Converts an I/O error raised at `offset` into a crate error.
    ///
    /// Unexpected end of input becomes [`Error::MalformedStream`]; every
    /// other kind stays an [`Error::Io`].
    pub(crate) fn from_read(err: io::Error, offset: u64, what: &str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::malformed(offset, format!("unexpected end of stream reading {}", what))
        } else {
            Error::Io(err)
        }
    }
}

/// A specialized Result type for MIX and codec operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_malformed_display() {
        let err = Error::malformed(0x1234, "literal runs past end of buffer");
        assert_eq!(
            err.to_string(),
            "Malformed stream at offset 0x1234: literal runs past end of buffer"
        );
        assert_eq!(err.offset(), Some(0x1234));
        assert!(err.is_corruption());
    }

    #[test]
    fn test_eof_becomes_malformed() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err = Error::from_read(eof, 7, "opcode");
        assert!(matches!(err, Error::MalformedStream { offset: 7, .. }));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(Error::from_read(denied, 0, "x"), Error::Io(_)));
    }

    #[test]
    fn test_classification() {
        assert!(Error::not_found("RULES.INI").is_not_found());
        assert!(Error::InvalidKeyEncoding("tag".into()).is_encryption_error());
        assert!(!Error::InvalidInput("len".into()).is_corruption());
    }
}
