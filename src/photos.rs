//! Photo file storage.
//!
//! One file per meal under a fixed subdirectory of the data dir:
//! ```text
//! <DATA_DIR>/
//!   photos/
//!     <meal_id>.webp
//! ```
//! File handles are opened per operation and released on every exit
//! path; nothing is cached between calls.

use std::io;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Subdirectory of the data dir holding meal photos.
const PHOTOS_DIR: &str = "photos";

/// Errors that can occur during photo store operations.
#[derive(Debug)]
pub enum PhotoStoreError {
    /// I/O error reading or writing a file.
    IoError(PathBuf, io::Error),
    /// No file exists for the requested photo id.
    Missing(PathBuf),
    /// Photo id contains path separators or traversal components.
    InvalidPhotoId(String),
}

impl std::fmt::Display for PhotoStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoStoreError::IoError(path, e) => {
                write!(f, "I/O error for {}: {}", path.display(), e)
            }
            PhotoStoreError::Missing(path) => {
                write!(f, "Photo file not found: {}", path.display())
            }
            PhotoStoreError::InvalidPhotoId(id) => {
                write!(f, "Invalid photo id: {}", id)
            }
        }
    }
}

impl std::error::Error for PhotoStoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhotoStoreError::IoError(_, e) => Some(e),
            _ => None,
        }
    }
}

/// File store for meal photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    data_dir: PathBuf,
}

impl PhotoStore {
    /// Creates a photo store rooted at the data dir.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Validates a photo id before any path is formed from it.
    fn validate_photo_id(photo_id: &str) -> Result<(), PhotoStoreError> {
        if photo_id.is_empty()
            || photo_id.contains('/')
            || photo_id.contains('\\')
            || photo_id.contains("..")
            || photo_id.starts_with('.')
        {
            return Err(PhotoStoreError::InvalidPhotoId(photo_id.to_string()));
        }
        Ok(())
    }

    /// Returns the photo subdirectory path.
    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir.join(PHOTOS_DIR)
    }

    /// Returns the full path for a photo id.
    pub fn photo_path(&self, photo_id: &str) -> PathBuf {
        self.photos_dir().join(photo_id)
    }

    /// Writes the full payload for a photo id, creating the
    /// subdirectory on demand. The data is flushed to disk before the
    /// handle is released.
    pub async fn write(&self, photo_id: &str, bytes: &[u8]) -> Result<(), PhotoStoreError> {
        Self::validate_photo_id(photo_id)?;

        let dir = self.photos_dir();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| PhotoStoreError::IoError(dir.clone(), e))?;

        let path = dir.join(photo_id);
        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| PhotoStoreError::IoError(path.clone(), e))?;
        file.write_all(bytes)
            .await
            .map_err(|e| PhotoStoreError::IoError(path.clone(), e))?;
        file.sync_all()
            .await
            .map_err(|e| PhotoStoreError::IoError(path, e))?;

        Ok(())
    }

    /// Reads the full contents for a photo id.
    ///
    /// A missing file is a distinct error; the caller decides whether
    /// that fails a whole batch.
    pub async fn read(&self, photo_id: &str) -> Result<Vec<u8>, PhotoStoreError> {
        Self::validate_photo_id(photo_id)?;

        let path = self.photo_path(photo_id);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(PhotoStoreError::Missing(path)),
            Err(e) => Err(PhotoStoreError::IoError(path, e)),
        }
    }

    /// Recursively removes the photo subdirectory. Absence is not an
    /// error.
    pub async fn remove_all(&self) -> Result<(), PhotoStoreError> {
        let dir = self.photos_dir();
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PhotoStoreError::IoError(dir, e)),
        }
    }
}
