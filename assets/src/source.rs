use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::AssetError;

/// Raw byte retrieval collaborator used by every fallback chain.
pub trait AssetSource {
    /// Reads the asset stored at `path`.
    fn fetch(&self, path: &Path) -> Result<Vec<u8>, AssetError>;
}

/// Reads assets from a directory on the local filesystem.
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    /// Creates a source resolving relative asset paths below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for FileSource {
    fn fetch(&self, path: &Path) -> Result<Vec<u8>, AssetError> {
        let full = self.root.join(path);
        fs::read(&full).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => AssetError::NotFound(full),
            _ => AssetError::Io { path: full, source },
        })
    }
}
