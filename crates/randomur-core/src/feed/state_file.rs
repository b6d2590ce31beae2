//! On-disk copy of [`SavedViewState`] for hosts that restart between views.

use crate::feed::state::SavedViewState;
use crate::{RandomurError, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Write the flags as JSON, replacing any previous file atomically.
pub async fn save_view_state(path: &Path, state: &SavedViewState) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("Failed to create state directory", e))?;
    }

    let contents = serde_json::to_string_pretty(state)?;
    let temp = path.with_extension("tmp");
    tokio::fs::write(&temp, contents)
        .await
        .map_err(|e| io_error("Failed to write view state", e))?;
    tokio::fs::rename(&temp, path)
        .await
        .map_err(|e| io_error("Failed to replace view state", e))?;

    debug!("Saved view state to {}", path.display());
    Ok(())
}

/// Read the flags back. A missing file yields `None`.
pub async fn load_view_state(path: &Path) -> Result<Option<SavedViewState>> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error("Failed to read view state", e)),
    };

    match serde_json::from_str(&contents) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            warn!("Ignoring unreadable view state {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}

fn io_error(message: &str, err: std::io::Error) -> RandomurError {
    RandomurError::Io {
        message: format!("{}: {}", message, err),
        source: Some(err),
    }
}
