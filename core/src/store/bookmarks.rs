//! Cross-library bookmark listing derived from the position store.

use std::collections::HashMap;

use uuid::Uuid;

use crate::types::{Chapter, Work};

use super::positions::PositionStore;

/// One set bookmark, resolved against the live library.
#[derive(Debug, Clone, Copy)]
pub struct BookmarkEntry<'a> {
    pub work: &'a Work,
    pub chapter: &'a Chapter,
    pub paragraph: u32,
}

/// Collect every set bookmark across `works`.
///
/// Records whose work or chapter is no longer in the library are skipped
/// silently. The result is sorted by work title, then chapter title,
/// case-insensitive ascending.
pub fn list_bookmarks<'a>(store: &PositionStore, works: &'a [Work]) -> Vec<BookmarkEntry<'a>> {
    let mut bookmarked: HashMap<(Uuid, Uuid), u32> = HashMap::new();
    for (key, entry) in store.entries() {
        if entry.bookmark >= 0 {
            bookmarked.insert(key, entry.bookmark as u32);
        }
    }

    let mut entries = Vec::new();
    for work in works {
        for chapter in &work.chapters {
            if let Some(&paragraph) = bookmarked.get(&(work.id, chapter.id)) {
                entries.push(BookmarkEntry { work, chapter, paragraph });
            }
        }
    }

    entries.sort_by(|a, b| {
        let by_work = a.work.title.to_lowercase().cmp(&b.work.title.to_lowercase());
        by_work.then_with(|| a.chapter.title.to_lowercase().cmp(&b.chapter.title.to_lowercase()))
    });
    entries
}
