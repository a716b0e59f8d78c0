//! Schema decoding for import files.
//!
//! Four decode attempts run in fixed priority order; the first success wins
//! and later attempts are not consulted:
//!
//! 1. array of current-schema works
//! 2. single current-schema work
//! 3. array of legacy works
//! 4. single legacy work
//!
//! The current schema is strict (unknown fields rejected) while the legacy
//! schema is lenient, so a current-schema document with an unexpected extra
//! field can fall through and be classified as legacy. First-match-wins is
//! the contract; callers should not rely on how ambiguous documents are
//! classified.

use crate::types::Work;

use super::legacy::{self, LegacyWork};

/// Decode one file's bytes into canonical works. `None` means the bytes
/// matched none of the supported schemas.
pub fn decode_works(bytes: &[u8]) -> Option<Vec<Work>> {
    if let Ok(many) = serde_json::from_slice::<Vec<Work>>(bytes) {
        return Some(many);
    }
    if let Ok(one) = serde_json::from_slice::<Work>(bytes) {
        return Some(vec![one]);
    }
    if let Ok(many) = serde_json::from_slice::<Vec<LegacyWork>>(bytes) {
        return Some(many.into_iter().filter_map(legacy::migrate).collect());
    }
    if let Ok(one) = serde_json::from_slice::<LegacyWork>(bytes) {
        return Some(legacy::migrate(one).into_iter().collect());
    }
    None
}
