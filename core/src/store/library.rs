//! The canonical, deduplicated work collection and its reconciliation rules.

use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::types::Work;

use super::{read_json_or_default, write_json_atomic};

/// Owns the work collection, kept sorted by title (case-insensitive
/// ascending) as the canonical display and persist order.
///
/// Every successful mutation rewrites the backing file in full. The
/// in-memory state stays authoritative when a write fails; the next
/// mutation retries.
#[derive(Debug)]
pub struct LibraryStore {
    path: PathBuf,
    works: Vec<Work>,
}

impl LibraryStore {
    /// Open the library at `path`, reconciling it with optional read-only
    /// seed content.
    ///
    /// Both sources degrade to empty when missing or unreadable. Persisted
    /// entries win over seed entries with the same id. The merged result is
    /// written back immediately so the backing file exists from the first
    /// run onward.
    pub fn open(path: impl Into<PathBuf>, seed_path: Option<&Path>) -> Self {
        let path = path.into();
        let persisted: Vec<Work> = read_json_or_default(&path);
        let seed: Vec<Work> = seed_path.map(read_json_or_default).unwrap_or_default();

        let mut merged: LinkedHashMap<Uuid, Work> = LinkedHashMap::new();
        for work in persisted {
            merged.insert(work.id, work);
        }
        for work in seed {
            if !merged.contains_key(&work.id) {
                merged.insert(work.id, work);
            }
        }
        debug!(path = %path.display(), works = merged.len(), "library reconciled");

        let mut store = Self { path, works: collect_sorted(merged) };
        store.persist();
        store
    }

    /// Works in display order.
    pub fn works(&self) -> &[Work] {
        &self.works
    }

    pub fn get(&self, id: &Uuid) -> Option<&Work> {
        self.works.iter().find(|work| &work.id == id)
    }

    /// Merge an imported batch into the collection.
    ///
    /// A batch entry whose id is already present replaces the stored work
    /// wholesale; there is no field-level merge, so chapters absent from the
    /// incoming work are gone.
    pub fn add_works(&mut self, batch: Vec<Work>) {
        let mut merged: LinkedHashMap<Uuid, Work> =
            self.works.drain(..).map(|work| (work.id, work)).collect();
        for work in batch {
            merged.insert(work.id, work);
        }
        self.works = collect_sorted(merged);
        self.persist();
    }

    /// Case-insensitive substring search over titles and authors. An empty
    /// query returns the whole collection in display order.
    pub fn search(&self, query: &str) -> Vec<&Work> {
        if query.is_empty() {
            return self.works.iter().collect();
        }
        let needle = query.to_lowercase();
        self.works
            .iter()
            .filter(|work| {
                work.title.to_lowercase().contains(&needle)
                    || work.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    fn persist(&self) {
        if let Err(err) = write_json_atomic(&self.path, &self.works) {
            warn!(path = %self.path.display(), error = %err, "library write failed");
        }
    }
}

fn collect_sorted(merged: LinkedHashMap<Uuid, Work>) -> Vec<Work> {
    let mut works: Vec<Work> = merged.into_iter().map(|(_, work)| work).collect();
    works.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    works
}
