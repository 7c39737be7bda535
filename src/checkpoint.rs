use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("checkpoint I/O on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("checkpoint {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("checkpoint {path} is corrupt: progress {progress} exceeds {total} foods")]
    Corrupt {
        path: PathBuf,
        progress: usize,
        total: usize,
    },
}

/// Crawl progress: the fixed food list and how many of it are done.
///
/// Serialized as `{"progress": <n>, "food": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointState {
    #[serde(rename = "progress")]
    pub processed: usize,
    #[serde(rename = "food")]
    pub foods: Vec<String>,
}

impl CheckpointState {
    pub fn new(foods: Vec<String>) -> Self {
        Self { processed: 0, foods }
    }

    /// Foods not yet processed, in original order.
    pub fn remaining(&self) -> &[String] {
        &self.foods[self.processed.min(self.foods.len())..]
    }

    pub fn is_done(&self) -> bool {
        self.processed >= self.foods.len()
    }

    pub fn advance(&mut self) {
        if !self.is_done() {
            self.processed += 1;
        }
    }
}

/// JSON checkpoint file, rewritten whole on every save.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no checkpoint has been written yet.
    pub fn load(&self) -> Result<Option<CheckpointState>, CheckpointError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };
        let state: CheckpointState =
            serde_json::from_str(&text).map_err(|source| CheckpointError::Json {
                path: self.path.clone(),
                source,
            })?;
        if state.processed > state.foods.len() {
            return Err(CheckpointError::Corrupt {
                path: self.path.clone(),
                progress: state.processed,
                total: state.foods.len(),
            });
        }
        Ok(Some(state))
    }

    /// Write to a sibling temp file, fsync, then rename over the checkpoint,
    /// so a crash leaves either the old or the new document.
    pub fn save(&self, state: &CheckpointState) -> Result<(), CheckpointError> {
        let json = serde_json::to_vec(state).map_err(|source| CheckpointError::Json {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
            }
        }

        let tmp = self.tmp_path();
        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.sync_all()
        };
        let result = write()
            .map_err(|source| CheckpointError::Io {
                path: tmp.clone(),
                source,
            })
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e)));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "checkpoint".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_err(&self, source: io::Error) -> CheckpointError {
        CheckpointError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
