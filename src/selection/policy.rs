//! The selection policy consumed by the selector.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ScnError};
use crate::selection::discipline::SelectionDiscipline;

/// What to select and from where. Immutable for the duration of one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Directory expected to contain `tfrecord*` scenario files.
    pub path: PathBuf,
    /// Target output length.
    pub num_scenes: usize,
    pub discipline: SelectionDiscipline,
    /// Only read by [`SelectionDiscipline::KUniqueN`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_unique_scenes: Option<usize>,
}

impl SelectionPolicy {
    #[must_use]
    pub fn new(
        path: impl AsRef<Path>,
        num_scenes: usize,
        discipline: SelectionDiscipline,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            num_scenes,
            discipline,
            k_unique_scenes: None,
        }
    }

    #[must_use]
    pub fn with_k_unique(mut self, k: usize) -> Self {
        self.k_unique_scenes = Some(k);
        self
    }

    /// Checks that need no filesystem access.
    ///
    /// `k_unique_scenes` is deliberately not checked here: the selector reports
    /// it as [`ScnError::InvalidKUnique`] after the dataset checks.
    pub fn validate(&self) -> Result<()> {
        if self.num_scenes == 0 {
            return Err(ScnError::InvalidConfig {
                details: "num_scenes must be >= 1".to_string(),
            });
        }
        Ok(())
    }
}
