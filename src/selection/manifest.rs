//! On-disk record of a completed selection, handed to the downstream pipeline.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, ScnError};
use crate::selection::policy::SelectionPolicy;
use crate::selection::selector::Selection;

/// Ordered scene paths plus the policy that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionManifest {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub tool_version: String,
    pub policy: SelectionPolicy,
    /// [`crate::core::config::Config::stable_hash`] of the effective config, when one was loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    pub dataset_dir: PathBuf,
    pub selected: usize,
    pub unique: usize,
    pub paths: Vec<PathBuf>,
}

impl SelectionManifest {
    #[must_use]
    pub fn new(policy: &SelectionPolicy, selection: &Selection, config_hash: Option<String>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            policy: policy.clone(),
            config_hash,
            dataset_dir: selection.report.dataset_dir.clone(),
            selected: selection.report.selected,
            unique: selection.report.unique,
            paths: selection.paths.clone(),
        }
    }

    /// Write pretty JSON via a temp file and rename, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ScnError::io(parent, source))?;
        }

        let tmp_path = path.with_extension("tmp");
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(&tmp_path, data).map_err(|source| ScnError::io(&tmp_path, source))?;
        fs::rename(&tmp_path, path).map_err(|source| ScnError::io(path, source))?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ScnError::io(path, source))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
