//! # cncmix
//!
//! A pure-Rust library for the MIX archives and asset codecs of Westwood's
//! Command & Conquer games (Tiberian Dawn, Red Alert, Tiberian Sun).
//!
//! The crate reads all three MIX header layouts, including Blowfish-encrypted
//! headers, writes plain and checksummed archives, and implements the
//! compression codecs the game assets use.
//!
//! ## Quick Start
//!
//! ### Reading an Archive
//!
//! ```rust,no_run
//! use cncmix::{MixArchive, MixContext, Result};
//! use cncmix::directory::NameTable;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! fn main() -> Result<()> {
//!     let names = NameTable::from_reader(BufReader::new(File::open("names.txt")?), Default::default())?;
//!     let context = MixContext::new().directory(names);
//!     let mut archive = MixArchive::open_path_with("REDALERT.MIX", &context)?;
//!
//!     for (entry, name) in archive.named_entries() {
//!         println!("{:<16} {:>8} bytes", name.unwrap_or_default(), entry.length);
//!     }
//!
//!     let palette = archive.read_by_name("TEMPERAT.PAL")?;
//!     println!("palette is {} bytes", palette.len());
//!     Ok(())
//! }
//! ```
//!
//! ### Decoding Assets
//!
//! ```rust
//! use cncmix::codec::{lcw, xor_delta};
//!
//! let frame = vec![0x11u8; 320];
//! let packed = lcw::encode(&frame);
//! let mut decoded = lcw::decompress(&packed, frame.len())?;
//!
//! // An empty delta (just the exit command) leaves the frame unchanged
//! xor_delta::apply(&mut decoded, &[0x80, 0x00, 0x00])?;
//! assert_eq!(decoded, frame);
//! # Ok::<(), cncmix::Error>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`read`] | [`MixArchive`] and header probing |
//! | [`write`] | [`MixWriter`] for plain and checksummed archives |
//! | [`codec`] | LCW, XOR-delta and zero-run codecs |
//! | [`pack`] | Chunked LCW with a base64 text form |
//! | [`hash`] | File-name hashes |
//! | [`directory`] | Name directories for reverse lookups |
//! | [`crypto`] | Key bootstrap and header cipher (`encryption` feature) |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `encryption` | Yes | Encrypted MIX headers (RSA key bootstrap, Blowfish) |
//!
//! Without `encryption`, opening an encrypted archive fails with
//! [`Error::UnsupportedFeature`].
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod checksum;
pub mod codec;
pub mod directory;
pub mod error;
pub mod format;
pub mod hash;
pub mod pack;
pub mod read;
pub mod write;

#[cfg(feature = "encryption")]
#[cfg_attr(docsrs, doc(cfg(feature = "encryption")))]
pub mod crypto;

pub use error::{Error, Result};

pub use directory::{NameDirectory, NameTable};
pub use format::header::{HeaderVariant, MixEntry, MixHeader};
pub use hash::{HashKind, name_hash};

// Re-export reading API at crate root for convenience
pub use read::{ArchiveInfo, ArchiveWarning, EntryReader, MixArchive, MixContext};

// Re-export writing API at crate root for convenience
pub use write::{MixWriter, WriteOptions, WriteResult};

#[cfg(feature = "encryption")]
pub use crypto::{KeyBootstrap, MixCipher};
