//! Single-key on-disk store for the resumable quiz index.

#![allow(missing_docs)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{CalmError, Result};

/// The one persisted key: which quiz question the visitor reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizProgress {
    pub question_index: usize,
    pub saved_at: DateTime<Utc>,
}

/// File-backed store for [`QuizProgress`].
#[derive(Debug, Clone)]
pub struct QuizProgressStore {
    path: PathBuf,
}

impl QuizProgressStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved index, if any.
    pub fn load(&self) -> Result<Option<usize>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(CalmError::io(&self.path, error)),
        };

        let entry: QuizProgress =
            serde_json::from_str(&raw).map_err(|error| CalmError::CorruptProgress {
                path: self.path.clone(),
                details: error.to_string(),
            })?;
        Ok(Some(entry.question_index))
    }

    /// Store the index using atomic rename for crash safety.
    pub fn store(&self, question_index: usize) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CalmError::io(parent, source))?;
        }

        let entry = QuizProgress {
            question_index,
            saved_at: Utc::now(),
        };
        let tmp_path = self.path.with_extension("tmp");
        let data = serde_json::to_vec_pretty(&entry)?;

        fs::write(&tmp_path, data).map_err(|source| CalmError::io(&tmp_path, source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| CalmError::io(&self.path, source))?;
        Ok(())
    }

    /// Remove the key if present.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CalmError::io(&self.path, error)),
        }
    }
}
