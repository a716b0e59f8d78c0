//! Default on-disk locations for application state.
//!
//! Stores are constructed with explicit paths (tests point them at temp
//! directories); this module only resolves the conventional locations the
//! application shell passes in.

use std::path::PathBuf;

use anyhow::anyhow;
use directories::ProjectDirs;

use crate::Result;

const APP_QUALIFIER: &str = "com";
const APP_ORGANISATION: &str = "LocalNovelReader";
const APP_NAME: &str = "local-novel-reader";

/// File name of the persisted library collection.
pub const LIBRARY_FILE: &str = "library.json";
/// File name of the position/bookmark store.
pub const POSITIONS_FILE: &str = "positions.json";
/// File name of the bundled read-only seed collection.
pub const SEED_FILE: &str = "seed.json";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORGANISATION, APP_NAME)
        .ok_or_else(|| anyhow!("unable to resolve application data directory"))
}

/// Directory holding mutable application state.
pub fn state_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().join("state"))
}

/// Default location of the persisted library.
pub fn library_file() -> Result<PathBuf> {
    Ok(state_dir()?.join(LIBRARY_FILE))
}

/// Default location of the position store.
pub fn positions_file() -> Result<PathBuf> {
    Ok(state_dir()?.join(POSITIONS_FILE))
}

/// Directory for rolling log files, with a temp-dir fallback so logging
/// still comes up on systems without a resolvable home.
pub fn log_dir() -> PathBuf {
    match project_dirs() {
        Ok(dirs) => dirs.data_dir().join("logs"),
        Err(_) => std::env::temp_dir().join(format!("{APP_NAME}-logs")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_files_share_the_state_dir() {
        let state = state_dir().expect("state dir");
        assert_eq!(library_file().unwrap(), state.join(LIBRARY_FILE));
        assert_eq!(positions_file().unwrap(), state.join(POSITIONS_FILE));
    }
}
