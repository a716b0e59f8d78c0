//! Canonical data model shared between the import, store, and reader layers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between paragraphs in a chapter's body text.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// A unit of chapter content.
///
/// The canonical model is text-only. The legacy wire format also carried
/// image pages; those exist only as [`crate::import::legacy`] wire types and
/// are discarded before anything reaches this enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Page {
    Text { value: String },
}

impl Page {
    pub fn text(value: impl Into<String>) -> Self {
        Page::Text { value: value.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Page::Text { value } => value,
        }
    }
}

/// An ordered run of pages within a work. Chapter ids are unique within
/// their parent work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chapter {
    pub id: Uuid,
    pub title: String,
    pub pages: Vec<Page>,
}

impl Chapter {
    /// Full chapter text as shown by the reader: page texts joined with a
    /// blank line.
    pub fn body_text(&self) -> String {
        self.pages.iter().map(Page::as_text).collect::<Vec<_>>().join(PARAGRAPH_SEPARATOR)
    }

    /// Blank-line separated paragraphs, empty runs skipped. Reading
    /// positions and bookmarks index into this sequence.
    pub fn paragraphs(&self) -> Vec<String> {
        self.body_text()
            .split(PARAGRAPH_SEPARATOR)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A top-level library item. Identity is the id alone: two works sharing an
/// id are the same logical entity regardless of content differences.
///
/// Unknown fields are rejected on decode so that legacy documents (which
/// carry an extra `type` discriminator) fall through to the legacy schema
/// attempts instead of being half-read here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Work {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub chapters: Vec<Chapter>,
}
