//! In-memory album library.

use std::sync::Mutex;

use super::{Album, AlbumQuery, Library, LibraryError};

/// A library held entirely in memory (useful for testing and imports).
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    albums: Mutex<Vec<Album>>,
}

impl MemoryLibrary {
    pub fn new(albums: Vec<Album>) -> Self {
        Self {
            albums: Mutex::new(albums),
        }
    }

    /// Album with the given id, as currently stored.
    pub fn get(&self, id: i64) -> Result<Album, LibraryError> {
        let albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        albums
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(LibraryError::NotFound(id))
    }
}

impl Library for MemoryLibrary {
    fn albums(&self, query: &AlbumQuery) -> Result<Vec<Album>, LibraryError> {
        let albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        Ok(albums.iter().filter(|a| query.matches(a)).cloned().collect())
    }

    fn store(&self, album: &Album) -> Result<(), LibraryError> {
        let mut albums = self.albums.lock().map_err(|_| LibraryError::Poisoned)?;
        match albums.iter_mut().find(|a| a.id == album.id) {
            Some(slot) => *slot = album.clone(),
            None => albums.push(album.clone()),
        }
        Ok(())
    }
}
