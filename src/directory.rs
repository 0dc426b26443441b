//! Name directories: mapping between file names and MIX ids.
//!
//! MIX archives store only name hashes, so listing an archive by name needs a
//! directory of known names. The games shipped such lists in "local mix
//! databases"; modding tools keep them as plain text files, one name per line.
//!
//! # Example
//!
//! ```rust
//! use cncmix::directory::{NameDirectory, NameTable};
//!
//! let table = NameTable::from_names(["RULES.INI", "conquer.mix"]);
//! let id = table.name_to_id("rules.ini");
//! assert_eq!(table.id_to_name(id).as_deref(), Some("RULES.INI"));
//! ```

use std::collections::HashMap;
use std::io::BufRead;

use crate::Result;
use crate::hash::HashKind;

/// Resolves names to ids and, where known, ids back to names.
pub trait NameDirectory: Send + Sync {
    /// Computes the id an archive uses for `name`.
    fn name_to_id(&self, name: &str) -> u32 {
        HashKind::Classic.hash_name(name)
    }

    /// Returns the name recorded for `id`, if any.
    fn id_to_name(&self, id: u32) -> Option<String>;
}

/// Directory that knows no names and hashes with the classic scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameDirectory for NoNames {
    fn id_to_name(&self, _id: u32) -> Option<String> {
        None
    }
}

/// In-memory name list keyed by id.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    kind: HashKind,
    names: HashMap<u32, String>,
}

impl NameTable {
    /// Creates an empty table using the classic hash.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table using `kind` to hash names.
    pub fn with_hash_kind(kind: HashKind) -> Self {
        Self {
            kind,
            names: HashMap::new(),
        }
    }

    /// Creates a classic-hash table holding `names`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        table.extend(names);
        table
    }

    /// Loads newline-separated names.
    ///
    /// Surrounding whitespace is trimmed; blank lines and lines starting
    /// with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R, kind: HashKind) -> Result<Self> {
        let mut table = Self::with_hash_kind(kind);
        for line in reader.lines() {
            let line = line?;
            let name = line.trim();
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            table.insert(name);
        }
        log::debug!("Loaded {} names into {:?} table", table.len(), kind);
        Ok(table)
    }

    /// Adds `name` and returns its id.
    ///
    /// A name whose id is already taken replaces the earlier one; the
    /// collision is logged.
    pub fn insert(&mut self, name: impl Into<String>) -> u32 {
        let name = name.into();
        let id = self.kind.hash_name(&name);
        if let Some(previous) = self.names.insert(id, name) {
            if !self.names[&id].eq_ignore_ascii_case(&previous) {
                log::debug!(
                    "Name {:?} replaces {:?} for id {:#010x}",
                    self.names[&id],
                    previous,
                    id
                );
            }
        }
        id
    }

    /// Hash scheme used by this table.
    pub fn hash_kind(&self) -> HashKind {
        self.kind
    }

    /// Number of distinct ids known.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no names are known.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for NameTable {
    fn extend<I: IntoIterator<Item = S>>(&mut self, names: I) {
        for name in names {
            self.insert(name);
        }
    }
}

impl NameDirectory for NameTable {
    fn name_to_id(&self, name: &str) -> u32 {
        self.kind.hash_name(name)
    }

    fn id_to_name(&self, id: u32) -> Option<String> {
        self.names.get(&id).cloned()
    }
}
