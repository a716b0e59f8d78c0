//! Import pipeline: schema decoding, legacy migration, and sanitisation.
//!
//! Batches are all-or-nothing. Every file in a batch must read and decode
//! before any work is returned, so a failure part-way through leaves the
//! library untouched even when earlier files were fine.

pub mod codec;
pub mod legacy;
pub mod sanitize;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::types::{Chapter, Page, Work};

pub use codec::decode_works;
pub use sanitize::sanitize_works;

/// Author recorded for plain-text imports, which carry no metadata of
/// their own.
pub const IMPORT_AUTHOR: &str = "Imported";

/// Chapter title for the single body chapter of a plain-text import.
pub const BODY_CHAPTER_TITLE: &str = "Body";

/// Errors that abort an import batch.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file could not be read from disk, or its bytes were not valid
    /// UTF-8 where text was expected.
    #[error("unreadable file {}", .0.display())]
    UnreadableFile(PathBuf),
    /// The bytes parsed as none of the supported schemas.
    #[error("unsupported format {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Import a batch of JSON files.
///
/// Each file may hold a single work or an array of works, in the current or
/// the legacy schema; see [`codec::decode_works`] for the attempt order. The
/// combined result is sanitised before it is returned.
pub fn import_json(paths: &[PathBuf]) -> Result<Vec<Work>> {
    let mut results = Vec::new();
    for path in paths {
        let bytes = read_bytes(path)?;
        let works = codec::decode_works(&bytes)
            .ok_or_else(|| ImportError::UnsupportedFormat(path.clone()))?;
        debug!(path = %path.display(), works = works.len(), "decoded import file");
        results.extend(works);
    }
    Ok(sanitize::sanitize_works(results))
}

/// Import plain-text files, one work per file.
///
/// The file name (without extension) becomes the title; the whole decoded
/// text becomes one page in a single body chapter.
pub fn import_text(paths: &[PathBuf]) -> Result<Vec<Work>> {
    let mut results = Vec::new();
    for path in paths {
        let bytes = read_bytes(path)?;
        let text =
            String::from_utf8(bytes).map_err(|_| ImportError::UnreadableFile(path.clone()))?;
        results.push(text_work(path, text));
    }
    Ok(sanitize::sanitize_works(results))
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|_| ImportError::UnreadableFile(path.to_path_buf()))
}

fn text_work(path: &Path, text: String) -> Work {
    let title =
        path.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
    Work {
        id: Uuid::new_v4(),
        title,
        author: IMPORT_AUTHOR.to_string(),
        chapters: vec![Chapter {
            id: Uuid::new_v4(),
            title: BODY_CHAPTER_TITLE.to_string(),
            pages: vec![Page::text(text)],
        }],
    }
}
