// SPDX-License-Identifier: MPL-2.0
//! Workout history persistence using CBOR format.
//!
//! Finished sessions are stored most recent first in `history.cbor` inside the
//! app data directory. History is application state, not a user preference,
//! so it lives apart from `settings.toml`.
//!
//! # Path Resolution
//!
//! The history file location can be customized for testing or portable deployments:
//! 1. Use `load_from()` with explicit path override
//! 2. Set `FORMCHECK_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::paths;
use crate::domain::exercise::WorkoutSession;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::warn;

/// History file name within the app data directory.
const HISTORY_FILE: &str = "history.cbor";

#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    sessions: Vec<WorkoutSession>,
}

/// Finished workouts, most recent first.
#[derive(Debug, Clone, Default)]
pub struct WorkoutHistory {
    sessions: Vec<WorkoutSession>,
    path: Option<PathBuf>,
}

impl WorkoutHistory {
    /// Loads history from the default location.
    ///
    /// A missing file yields empty history. An unreadable or corrupt file also
    /// yields empty history, with a warning logged; the file is replaced on the
    /// next save.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// Loads history from a custom data directory.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - Optional base directory. If `None`, uses default path resolution.
    #[must_use]
    pub fn load_from(base_dir: Option<PathBuf>) -> Self {
        let path = Self::history_file_path_with_override(base_dir);
        let sessions = path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| match fs::File::open(p) {
                Ok(file) => match ciborium::from_reader::<HistoryFile, _>(BufReader::new(file)) {
                    Ok(history) => history.sessions,
                    Err(e) => {
                        warn!(
                            path = %p.display(),
                            error = %e,
                            "workout history is corrupt, starting empty"
                        );
                        Vec::new()
                    }
                },
                Err(e) => {
                    warn!(
                        path = %p.display(),
                        error = %e,
                        "cannot read workout history, starting empty"
                    );
                    Vec::new()
                }
            })
            .unwrap_or_default();

        Self { sessions, path }
    }

    /// Writes history to its file, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined or writing fails.
    pub fn save(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| Error::History("no data directory available".to_string()))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = fs::File::create(path)?;
        self.write_to(file)
    }

    /// Encodes the sessions to `writer` and flushes it, so a failed final
    /// write is reported instead of being lost when the buffer drops.
    fn write_to(&self, writer: impl Write) -> Result<()> {
        let snapshot = HistoryFile {
            sessions: self.sessions.clone(),
        };
        let mut writer = BufWriter::new(writer);
        ciborium::into_writer(&snapshot, &mut writer).map_err(|e| Error::History(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }

    /// Adds a session at the front and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails. The session stays in memory.
    pub fn record(&mut self, session: WorkoutSession) -> Result<()> {
        self.sessions.insert(0, session);
        self.save()
    }

    /// Removes every session and saves.
    ///
    /// # Errors
    ///
    /// Returns an error if saving fails.
    pub fn clear(&mut self) -> Result<()> {
        self.sessions.clear();
        self.save()
    }

    #[must_use]
    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Location of the history file, if one could be resolved.
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Returns the full path to the history file with optional override.
    fn history_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(HISTORY_FILE);
            path
        })
    }
}
