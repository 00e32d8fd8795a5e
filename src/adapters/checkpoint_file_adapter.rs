//! Single-line checkpoint file.

use crate::adapters::csv_adapter::temp_path;
use crate::domain::error::PulseError;
use crate::ports::checkpoint_port::{first_run_cutoff, CheckpointPort};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Stores the last processed instant as one RFC 3339 line in UTC.
pub struct FileCheckpointAdapter {
    path: PathBuf,
}

impl FileCheckpointAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored checkpoint, if present and readable.
    pub fn read(&self) -> Result<Option<DateTime<Utc>>, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };
        DateTime::parse_from_rfc3339(content.trim())
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(|e| format!("invalid timestamp '{}': {}", content.trim(), e))
    }
}

impl CheckpointPort for FileCheckpointAdapter {
    fn load(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.read() {
            Ok(Some(ts)) => ts,
            Ok(None) => {
                let cutoff = first_run_cutoff(now);
                info!(path = %self.path.display(), cutoff = %cutoff, "no checkpoint, first run");
                cutoff
            }
            Err(reason) => {
                let cutoff = first_run_cutoff(now);
                warn!(
                    path = %self.path.display(),
                    error = %reason,
                    cutoff = %cutoff,
                    "unreadable checkpoint, using first-run cutoff"
                );
                cutoff
            }
        }
    }

    fn save(&self, timestamp: DateTime<Utc>) -> Result<(), PulseError> {
        let line = format!("{}\n", timestamp.to_rfc3339_opts(SecondsFormat::Secs, true));
        let tmp = temp_path(&self.path);
        fs::write(&tmp, line).map_err(|e| PulseError::storage(tmp.display(), e))?;
        fs::rename(&tmp, &self.path).map_err(|e| PulseError::storage(self.path.display(), e))
    }
}
