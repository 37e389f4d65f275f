//! Writing the run history to disk.

use std::path::{Path, PathBuf};

use ark_core::history::RunHistory;

use crate::error::EngineError;

/// File name of the exported history inside the output directory.
pub const HISTORY_FILE: &str = "ark-history.json";

/// Write `history` as pretty JSON to `<dir>/ark-history.json`, creating the
/// directory when missing. Returns the path written.
pub fn write_history(dir: &Path, history: &RunHistory) -> Result<PathBuf, EngineError> {
    std::fs::create_dir_all(dir).map_err(|source| EngineError::Export {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(HISTORY_FILE);
    let json = history.to_json_pretty()?;
    std::fs::write(&path, json).map_err(|source| EngineError::Export {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
