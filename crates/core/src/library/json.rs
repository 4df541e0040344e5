//! JSON-file backed album library.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use super::{Album, AlbumQuery, Library, LibraryError};

/// A library stored as a JSON array of album objects.
///
/// Changes are kept in memory until [`JsonLibrary::flush`] writes the file.
pub struct JsonLibrary {
    path: PathBuf,
    albums: Mutex<Vec<Album>>,
}

impl JsonLibrary {
    /// Open a library file. A missing file is an error.
    pub fn open(path: &Path) -> Result<Self, LibraryError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| LibraryError::Io(format!("{}: {}", path.display(), e)))?;
        let albums: Vec<Album> =
            serde_json::from_str(&raw).map_err(|e| LibraryError::Parse(e.to_string()))?;
        debug!(path = %path.display(), albums = albums.len(), "Library loaded");

        Ok(Self {
            path: path.to_path_buf(),
            albums: Mutex::new(albums),
        })
    }

    /// Write all albums back, replacing the file atomically.
    pub fn flush(&self) -> Result<(), LibraryError> {
        let albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        let json =
            serde_json::to_string_pretty(&*albums).map_err(|e| LibraryError::Parse(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| LibraryError::Io(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| LibraryError::Io(e.to_string()))?;
        Ok(())
    }
}

impl Library for JsonLibrary {
    fn albums(&self, query: &AlbumQuery) -> Result<Vec<Album>, LibraryError> {
        let albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        Ok(albums.iter().filter(|a| query.matches(a)).cloned().collect())
    }

    fn store(&self, album: &Album) -> Result<(), LibraryError> {
        let mut albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        let slot = albums
            .iter_mut()
            .find(|a| a.id == album.id)
            .ok_or(LibraryError::NotFound(album.id))?;
        *slot = album.clone();
        Ok(())
    }
}
