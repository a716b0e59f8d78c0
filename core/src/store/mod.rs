//! Persistent state owned by the reader: the work collection, reading
//! positions, and the bookmark listing derived from them.
//!
//! All stores share the same discipline: reads degrade to empty state so a
//! corrupt file never prevents startup, and writes replace the whole file
//! atomically so a concurrent reader never observes a partial document.

pub mod bookmarks;
pub mod library;
pub mod positions;

pub use bookmarks::{BookmarkEntry, list_bookmarks};
pub use library::LibraryStore;
pub use positions::{NO_BOOKMARK, PositionEntry, PositionKey, PositionStore};

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::anyhow;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::warn;

pub type Result<T> = crate::Result<T>;

/// Read a JSON state file, degrading to the default value when the file is
/// missing or unparseable. Corrupt state is logged and contributes nothing.
pub(crate) fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return T::default(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "state read failed, starting empty");
            return T::default();
        }
    };
    match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "state parse failed, starting empty");
            T::default()
        }
    }
}

/// Atomically replace `path` with the pretty-printed JSON of `value`.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow!("state path {} has no parent directory", path.display()))?;
    fs::create_dir_all(parent)?;

    let data = serde_json::to_vec_pretty(value)?;
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(&data)?;
    temp.flush()?;
    match temp.persist(path) {
        Ok(_) => Ok(()),
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            // Windows cannot rename over an existing file.
            if let Err(remove_err) = fs::remove_file(path) {
                if remove_err.kind() != io::ErrorKind::NotFound {
                    return Err(remove_err.into());
                }
            }
            err.file.persist(path).map(|_| ()).map_err(|persist| persist.error.into())
        }
        Err(err) => Err(err.error.into()),
    }
}
