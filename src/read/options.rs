//! Open-time configuration for MIX archives.

use std::sync::Arc;

#[cfg(feature = "encryption")]
use crate::crypto::KeyBootstrap;
use crate::directory::{NameDirectory, NoNames};

/// Everything an archive needs besides its bytes.
///
/// A context is passed explicitly to [`MixArchive::open_with`]; there is no
/// process-wide registry. Cloning is cheap and shares the directory.
///
/// [`MixArchive::open_with`]: super::MixArchive::open_with
///
/// # Example
///
/// ```rust
/// use cncmix::MixContext;
/// use cncmix::directory::NameTable;
///
/// let context = MixContext::new().directory(NameTable::from_names(["RULES.INI"]));
/// assert_eq!(
///     context.name_directory().id_to_name(0xB1C3_B238).as_deref(),
///     Some("RULES.INI")
/// );
/// ```
#[derive(Clone)]
pub struct MixContext {
    pub(crate) directory: Arc<dyn NameDirectory>,
    #[cfg(feature = "encryption")]
    pub(crate) key_bootstrap: Option<KeyBootstrap>,
}

impl Default for MixContext {
    fn default() -> Self {
        Self {
            directory: Arc::new(NoNames),
            #[cfg(feature = "encryption")]
            key_bootstrap: None,
        }
    }
}

impl std::fmt::Debug for MixContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("MixContext");
        s.field("directory", &"<dyn NameDirectory>");
        #[cfg(feature = "encryption")]
        s.field("key_bootstrap", &self.key_bootstrap.is_some());
        s.finish()
    }
}

impl MixContext {
    /// Creates a context with no known names and the built-in key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name directory used for lookups by name.
    pub fn directory(mut self, directory: impl NameDirectory + 'static) -> Self {
        self.directory = Arc::new(directory);
        self
    }

    /// Sets a name directory that is shared with other contexts.
    pub fn shared_directory(mut self, directory: Arc<dyn NameDirectory>) -> Self {
        self.directory = directory;
        self
    }

    /// Replaces the built-in Westwood key for encrypted headers.
    #[cfg(feature = "encryption")]
    #[cfg_attr(docsrs, doc(cfg(feature = "encryption")))]
    pub fn key_bootstrap(mut self, key: KeyBootstrap) -> Self {
        self.key_bootstrap = Some(key);
        self
    }

    /// The configured name directory.
    pub fn name_directory(&self) -> &dyn NameDirectory {
        self.directory.as_ref()
    }
}
