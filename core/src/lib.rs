//! Core engine for the local novel reader.
//!
//! Covers the import/decode/migration pipeline, the reconciled library
//! collection, and per-chapter reading-position persistence. View code sits
//! in the application shell and only consumes what this crate produces.

#![deny(missing_debug_implementations)]

pub mod import;
pub mod log;
pub mod paths;
pub mod store;
pub mod types;
pub mod viewport;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

pub use import::{ImportError, import_json, import_text};
pub use store::{BookmarkEntry, LibraryStore, NO_BOOKMARK, PositionStore, list_bookmarks};
pub use types::{Chapter, Page, Work};
pub use viewport::{ParagraphOffset, pick_top_most_index};

/// Returns the version of the core crate for telemetry and debugging.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn exposes_semver_version() {
        assert!(version().contains('.'));
    }

    #[test]
    fn constructs_basic_types() {
        let work = Work {
            id: Uuid::new_v4(),
            title: "A Work".to_string(),
            author: "An Author".to_string(),
            chapters: vec![Chapter {
                id: Uuid::new_v4(),
                title: "One".to_string(),
                pages: vec![Page::text("hello")],
            }],
        };

        assert_eq!(work.chapters[0].paragraphs(), vec!["hello"]);
    }
}
