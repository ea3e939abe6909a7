//! Script text loading.
//!
//! The interpreter never touches the filesystem itself: it asks a
//! [`TextLoader`] for the source named by an identifier.  [`FileLoader`]
//! reads identifiers as paths under a root directory; any
//! `Fn(&str) -> io::Result<String>` closure also works, which is handy for
//! embedded or generated scripts.

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::script::{GordianError, Result};

pub trait TextLoader {
    fn load_text(&self, identifier: &str) -> Result<String>;
}

impl<F> TextLoader for F
where
    F: Fn(&str) -> io::Result<String>,
{
    fn load_text(&self, identifier: &str) -> Result<String> {
        self(identifier).map_err(|source| load_error(identifier, source))
    }
}

fn load_error(identifier: &str, source: io::Error) -> GordianError {
    GordianError::Load {
        identifier: identifier.to_owned(),
        source,
    }
}

/// Loads `<root>/<identifier>` as UTF-8 text.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The platform data directory for `gordian`, if one can be determined.
    ///
    /// On Linux this is `$XDG_DATA_HOME/gordian`.
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gordian").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.root.join(identifier)
    }
}

impl Default for FileLoader {
    /// Rooted at [`FileLoader::data_dir`], or the working directory.
    fn default() -> Self {
        FileLoader::new(Self::data_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

impl TextLoader for FileLoader {
    fn load_text(&self, identifier: &str) -> Result<String> {
        let path = self.path_for(identifier);
        debug!(path = %path.display(), "reading script");
        std::fs::read_to_string(&path).map_err(|source| load_error(identifier, source))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
