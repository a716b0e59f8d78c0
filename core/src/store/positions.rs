//! Per-chapter reading position and bookmark persistence.
//!
//! Records are keyed by the composite (work id, chapter id) pair and are
//! created lazily on first use. They are never deleted: clearing a bookmark
//! writes the [`NO_BOOKMARK`] sentinel back, which keeps existence checks a
//! plain map lookup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::{read_json_or_default, write_json_atomic};

/// Sentinel stored when no bookmark is set, distinct from any valid
/// paragraph index.
pub const NO_BOOKMARK: i64 = -1;

/// Reading state for one (work, chapter) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEntry {
    /// Paragraph nearest the viewport top when the chapter was last read.
    pub last_paragraph: u32,
    /// Bookmarked paragraph, or [`NO_BOOKMARK`].
    pub bookmark: i64,
}

impl Default for PositionEntry {
    fn default() -> Self {
        Self { last_paragraph: 0, bookmark: NO_BOOKMARK }
    }
}

/// On-disk record; the file holds a list sorted by key so rewrites stay
/// diff-friendly.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPosition {
    work: Uuid,
    chapter: Uuid,
    last_paragraph: u32,
    bookmark: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PositionFile {
    entries: Vec<StoredPosition>,
}

/// Composite key identifying one chapter of one work.
pub type PositionKey = (Uuid, Uuid);

/// Repository for reading positions and bookmarks.
///
/// The whole map is loaded once at [`PositionStore::open`] and mutated in
/// memory; every change rewrites the backing file atomically. Write
/// failures are logged and the in-memory state stays authoritative.
#[derive(Debug)]
pub struct PositionStore {
    path: PathBuf,
    inner: Mutex<BTreeMap<PositionKey, PositionEntry>>,
}

impl PositionStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file: PositionFile = read_json_or_default(&path);
        let entries = file
            .entries
            .into_iter()
            .map(|stored| {
                (
                    (stored.work, stored.chapter),
                    PositionEntry {
                        last_paragraph: stored.last_paragraph,
                        bookmark: stored.bookmark,
                    },
                )
            })
            .collect();
        Self { path, inner: Mutex::new(entries) }
    }

    /// Record the paragraph nearest the viewport top.
    ///
    /// Writes only when the value changed, which keeps high-frequency
    /// visibility sampling from rewriting the file on every scroll event.
    pub fn record_visible(&self, work: &Uuid, chapter: &Uuid, paragraph: u32) {
        let mut inner = self.inner.lock();
        {
            let entry = inner.entry((*work, *chapter)).or_default();
            if entry.last_paragraph == paragraph {
                return;
            }
            entry.last_paragraph = paragraph;
        }
        self.persist(&inner);
    }

    /// Set a bookmark at `paragraph`, or clear the existing one.
    ///
    /// A stored value only counts as a bookmark while it indexes into the
    /// chapter, so a stale out-of-range value is overwritten rather than
    /// cleared. At most one bookmark exists per chapter. Returns the newly
    /// stored value.
    pub fn toggle_bookmark(
        &self,
        work: &Uuid,
        chapter: &Uuid,
        paragraph: u32,
        paragraph_count: usize,
    ) -> i64 {
        let mut inner = self.inner.lock();
        let stored;
        {
            let entry = inner.entry((*work, *chapter)).or_default();
            stored = if bookmark_in_range(entry.bookmark, paragraph_count) {
                NO_BOOKMARK
            } else {
                i64::from(paragraph)
            };
            entry.bookmark = stored;
        }
        self.persist(&inner);
        stored
    }

    /// The bookmarked paragraph, if one is set and within the chapter.
    pub fn bookmark(&self, work: &Uuid, chapter: &Uuid, paragraph_count: usize) -> Option<u32> {
        let inner = self.inner.lock();
        inner.get(&(*work, *chapter)).and_then(|entry| {
            bookmark_in_range(entry.bookmark, paragraph_count).then_some(entry.bookmark as u32)
        })
    }

    /// Clear the bookmark by writing the sentinel back; the record stays.
    pub fn clear_bookmark(&self, work: &Uuid, chapter: &Uuid) {
        let mut inner = self.inner.lock();
        {
            let entry = inner.entry((*work, *chapter)).or_default();
            if entry.bookmark == NO_BOOKMARK {
                return;
            }
            entry.bookmark = NO_BOOKMARK;
        }
        self.persist(&inner);
    }

    /// Paragraph to open the chapter at.
    ///
    /// A valid bookmark wins when `prefer_bookmark` is set; otherwise the
    /// last visible paragraph, clamped to the chapter.
    pub fn restore_start(
        &self,
        work: &Uuid,
        chapter: &Uuid,
        paragraph_count: usize,
        prefer_bookmark: bool,
    ) -> u32 {
        if paragraph_count == 0 {
            return 0;
        }
        let inner = self.inner.lock();
        let entry = inner.get(&(*work, *chapter)).copied().unwrap_or_default();
        if prefer_bookmark && bookmark_in_range(entry.bookmark, paragraph_count) {
            return entry.bookmark as u32;
        }
        entry.last_paragraph.min(paragraph_count as u32 - 1)
    }

    /// Every persisted record, for cross-library listings.
    pub fn entries(&self) -> Vec<(PositionKey, PositionEntry)> {
        let inner = self.inner.lock();
        inner.iter().map(|(key, entry)| (*key, *entry)).collect()
    }

    fn persist(&self, entries: &BTreeMap<PositionKey, PositionEntry>) {
        let file = PositionFile {
            entries: entries
                .iter()
                .map(|(&(work, chapter), entry)| StoredPosition {
                    work,
                    chapter,
                    last_paragraph: entry.last_paragraph,
                    bookmark: entry.bookmark,
                })
                .collect(),
        };
        if let Err(err) = write_json_atomic(&self.path, &file) {
            warn!(path = %self.path.display(), error = %err, "position write failed");
        }
    }
}

fn bookmark_in_range(bookmark: i64, paragraph_count: usize) -> bool {
    bookmark >= 0 && (bookmark as u64) < paragraph_count as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn open_temp() -> (tempfile::TempDir, PositionStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = PositionStore::open(dir.path().join("positions.json"));
        (dir, store)
    }

    #[test]
    fn toggling_sets_then_clears_bookmark() {
        let (_dir, store) = open_temp();
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        assert_eq!(store.bookmark(&work, &chapter, 10), None);
        assert_eq!(store.toggle_bookmark(&work, &chapter, 4, 10), 4);
        assert_eq!(store.bookmark(&work, &chapter, 10), Some(4));
        assert_eq!(store.toggle_bookmark(&work, &chapter, 7, 10), NO_BOOKMARK);
        assert_eq!(store.bookmark(&work, &chapter, 10), None);
    }

    #[test]
    fn out_of_range_bookmark_counts_as_unset() {
        let (_dir, store) = open_temp();
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        store.toggle_bookmark(&work, &chapter, 8, 10);
        // The chapter shrank below the stored index; the next toggle sets a
        // fresh bookmark instead of clearing.
        assert_eq!(store.bookmark(&work, &chapter, 5), None);
        assert_eq!(store.toggle_bookmark(&work, &chapter, 2, 5), 2);
    }

    #[test]
    fn restore_prefers_valid_bookmark() {
        let (_dir, store) = open_temp();
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        store.record_visible(&work, &chapter, 6);
        store.toggle_bookmark(&work, &chapter, 3, 10);

        assert_eq!(store.restore_start(&work, &chapter, 10, true), 3);
        assert_eq!(store.restore_start(&work, &chapter, 10, false), 6);
    }

    #[test]
    fn restore_clamps_to_chapter() {
        let (_dir, store) = open_temp();
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        store.record_visible(&work, &chapter, 42);
        assert_eq!(store.restore_start(&work, &chapter, 5, false), 4);
        assert_eq!(store.restore_start(&work, &chapter, 0, false), 0);
        assert_eq!(store.restore_start(&Uuid::new_v4(), &chapter, 5, false), 0);
    }

    #[test]
    fn record_visible_writes_only_on_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("positions.json");
        let store = PositionStore::open(&path);
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        store.record_visible(&work, &chapter, 5);
        assert!(path.exists());
        fs::write(&path, b"sampling marker").unwrap();

        store.record_visible(&work, &chapter, 5);
        assert_eq!(fs::read(&path).unwrap(), b"sampling marker");

        store.record_visible(&work, &chapter, 6);
        assert_ne!(fs::read(&path).unwrap(), b"sampling marker");
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("positions.json");
        let work = Uuid::new_v4();
        let chapter = Uuid::new_v4();

        {
            let store = PositionStore::open(&path);
            store.record_visible(&work, &chapter, 9);
            store.toggle_bookmark(&work, &chapter, 2, 20);
        }

        let store = PositionStore::open(&path);
        assert_eq!(store.restore_start(&work, &chapter, 20, false), 9);
        assert_eq!(store.bookmark(&work, &chapter, 20), Some(2));
    }
}
