//! Archive reading API for MIX archives.
//!
//! # Example
//!
//! ```rust,no_run
//! use cncmix::MixArchive;
//!
//! let mut archive = MixArchive::open_path("CONQUER.MIX")?;
//! for entry in archive.entries() {
//!     println!("{:08X}: {} bytes at {}", entry.id, entry.length, entry.offset);
//! }
//!
//! let rules = archive.read_by_name("rules.ini")?;
//! # Ok::<(), cncmix::Error>(())
//! ```

mod archive_open;
mod archive_query;
mod entry;
mod info;
mod options;

pub use entry::EntryReader;
pub use info::{ArchiveInfo, ArchiveWarning};
pub use options::MixContext;

use crate::checksum::Sha1Digest;
use crate::format::header::MixHeader;

/// A MIX archive reader.
///
/// The header is parsed once at open time; entry bodies are read on demand
/// through the owned reader.
pub struct MixArchive<R> {
    reader: R,
    header: MixHeader,
    context: MixContext,
    checksum: Option<Sha1Digest>,
    warnings: Vec<ArchiveWarning>,
}

impl<R> std::fmt::Debug for MixArchive<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixArchive")
            .field("variant", &self.header.variant)
            .field("entries", &self.header.entries.len())
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
