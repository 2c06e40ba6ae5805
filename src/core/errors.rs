//! SCN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, ScnError>;

/// Top-level error type for the scene selector.
#[derive(Debug, Error)]
pub enum ScnError {
    #[error("[SCN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SCN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SCN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SCN-2001] the data directory {path} does not exist or is empty: {details}")]
    InvalidDatasetDirectory { path: PathBuf, details: String },

    #[error(
        "[SCN-2002] the data directory {path} does not contain any traffic scenes; \
         maybe you specified a path to the wrong folder?"
    )]
    NoScenariosFound { path: PathBuf },

    #[error(
        "[SCN-2003] exact_n selection expects {expected} entries in {path}, found {found}"
    )]
    ScenarioCountMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("[SCN-2004] k_unique_n selection requires a positive k_unique_scenes: {details}")]
    InvalidKUnique { details: String },

    #[error(
        "[SCN-2900] the selected scenes contain no traffic scenario; \
         something went wrong with the scene selection ({details})"
    )]
    SelectionCorrupted { details: String },

    #[error("[SCN-3001] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SCN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScnError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SCN-1001",
            Self::MissingConfig { .. } => "SCN-1002",
            Self::ConfigParse { .. } => "SCN-1003",
            Self::InvalidDatasetDirectory { .. } => "SCN-2001",
            Self::NoScenariosFound { .. } => "SCN-2002",
            Self::ScenarioCountMismatch { .. } => "SCN-2003",
            Self::InvalidKUnique { .. } => "SCN-2004",
            Self::SelectionCorrupted { .. } => "SCN-2900",
            Self::Serialization { .. } => "SCN-3001",
            Self::Io { .. } => "SCN-3002",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Selection failures are configuration-time errors; only raw IO is transient.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Internal invariant violations, as opposed to bad operator input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::SelectionCorrupted { .. } | Self::Serialization { .. })
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for ScnError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for ScnError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
