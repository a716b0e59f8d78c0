//! Wire-only representation of the legacy schema and its migration.
//!
//! The legacy format tagged each work with an optional `type` discriminator
//! ("novel" / "manga") and allowed image pages alongside text pages. Neither
//! survives the decode boundary: the discriminator is read and discarded,
//! image pages are filtered out, and chapters or works left empty by the
//! filtering disappear from the import result.

use serde::Deserialize;
use tracing::trace;
use uuid::Uuid;

use crate::types::{Chapter, Page, Work};

/// Legacy work as it appears on the wire. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct LegacyWork {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Read so that typed wire validators accept the document; never kept.
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,
    pub chapters: Vec<LegacyChapter>,
}

#[derive(Debug, Deserialize)]
pub struct LegacyChapter {
    pub id: Uuid,
    pub title: String,
    pub pages: LegacyPages,
}

/// Chapters usually carry tagged pages; some producers wrote a bare string
/// array instead, which is treated as a run of text pages.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LegacyPages {
    Tagged(Vec<LegacyPage>),
    Plain(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub struct LegacyPage {
    pub kind: String,
    pub value: String,
}

/// Convert a legacy work to the canonical model, or `None` when every
/// chapter loses all of its pages.
pub fn migrate(work: LegacyWork) -> Option<Work> {
    if let Some(tag) = work.work_type.as_deref() {
        trace!(work = %work.id, tag, "discarding legacy work type tag");
    }

    let chapters: Vec<Chapter> =
        work.chapters.into_iter().filter_map(migrate_chapter).collect();
    if chapters.is_empty() {
        return None;
    }
    Some(Work { id: work.id, title: work.title, author: work.author, chapters })
}

fn migrate_chapter(chapter: LegacyChapter) -> Option<Chapter> {
    let pages: Vec<Page> = match chapter.pages {
        LegacyPages::Tagged(raw) => raw
            .into_iter()
            .filter(|page| page.kind.eq_ignore_ascii_case("text"))
            .map(|page| Page::text(page.value))
            .collect(),
        LegacyPages::Plain(texts) => texts.into_iter().map(Page::text).collect(),
    };
    if pages.is_empty() {
        return None;
    }
    Some(Chapter { id: chapter.id, title: chapter.title, pages })
}
