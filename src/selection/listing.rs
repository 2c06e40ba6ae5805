//! Dataset directory listing: one sorted read of the names inside `path`.

#![allow(missing_docs)]

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, ScnError};

/// File-name prefix that marks a traffic scenario.
pub const SCENARIO_PREFIX: &str = "tfrecord";

/// Whether a directory entry name denotes a scenario file.
///
/// Compares raw bytes so names that are not valid UTF-8 are still classified.
#[must_use]
pub fn is_scenario_name(name: &OsStr) -> bool {
    name.as_encoded_bytes()
        .starts_with(SCENARIO_PREFIX.as_bytes())
}

/// Sorted names found directly inside a dataset directory.
///
/// Every entry is kept, scenario or not: non-scenario names still count toward
/// listing length and still take part in sorting and slicing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetListing {
    dir: PathBuf,
    entries: Vec<OsString>,
    scenario_count: usize,
}

impl DatasetListing {
    /// Read and sort the directory.
    ///
    /// A path that is missing, not a directory, unreadable, or empty yields
    /// [`ScnError::InvalidDatasetDirectory`].
    pub fn read(dir: &Path) -> Result<Self> {
        let invalid = |details: String| ScnError::InvalidDatasetDirectory {
            path: dir.to_path_buf(),
            details,
        };

        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(invalid("path does not exist".to_string()));
            }
            Err(err) if err.kind() == ErrorKind::NotADirectory => {
                return Err(invalid("path is not a directory".to_string()));
            }
            Err(err) => return Err(invalid(format!("cannot list directory: {err}"))),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| ScnError::io(dir, source))?;
            entries.push(entry.file_name());
        }
        if entries.is_empty() {
            return Err(invalid("directory is empty".to_string()));
        }

        Ok(Self::from_names(dir, entries))
    }

    /// Build a listing from names already in hand. Sorts them.
    #[must_use]
    pub fn from_names(dir: &Path, mut entries: Vec<OsString>) -> Self {
        entries.sort_unstable();
        let scenario_count = entries.iter().filter(|n| is_scenario_name(n)).count();
        Self {
            dir: dir.to_path_buf(),
            entries,
            scenario_count,
        }
    }

    /// Fail with [`ScnError::NoScenariosFound`] unless a scenario is present.
    pub fn require_scenarios(&self) -> Result<()> {
        if self.scenario_count == 0 {
            return Err(ScnError::NoScenariosFound {
                path: self.dir.clone(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All names, byte-wise sorted.
    #[must_use]
    pub fn entries(&self) -> &[OsString] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn scenario_count(&self) -> usize {
        self.scenario_count
    }

    /// Names that do not carry the scenario prefix, in sorted order.
    pub fn non_scenarios(&self) -> impl Iterator<Item = &OsStr> {
        self.entries
            .iter()
            .map(OsString::as_os_str)
            .filter(|n| !is_scenario_name(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn prefix_match_is_exact_and_case_sensitive() {
        assert!(is_scenario_name(OsStr::new("tfrecord-00001-of-01000")));
        assert!(is_scenario_name(OsStr::new("tfrecord")));
        assert!(!is_scenario_name(OsStr::new("TFRECORD-1")));
        assert!(!is_scenario_name(OsStr::new("x_tfrecord-1")));
        assert!(!is_scenario_name(OsStr::new("tfrec")));
    }

    #[test]
    fn read_sorts_entries_and_counts_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tfrecord-2");
        touch(dir.path(), "dataset_info.json");
        touch(dir.path(), "tfrecord-0");
        fs::create_dir(dir.path().join("tfrecord-1")).unwrap();

        let listing = DatasetListing::read(dir.path()).unwrap();
        let names: Vec<_> = listing
            .entries()
            .iter()
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["dataset_info.json", "tfrecord-0", "tfrecord-1", "tfrecord-2"]
        );
        assert_eq!(listing.len(), 4);
        assert_eq!(listing.scenario_count(), 3);
        assert_eq!(
            listing.non_scenarios().collect::<Vec<_>>(),
            vec![OsStr::new("dataset_info.json")]
        );
        listing.require_scenarios().unwrap();
    }

    #[test]
    fn missing_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetListing::read(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ScnError::InvalidDatasetDirectory { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn empty_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatasetListing::read(dir.path()).unwrap_err();
        assert!(matches!(err, ScnError::InvalidDatasetDirectory { .. }));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn regular_file_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tfrecord-0");
        let err = DatasetListing::read(&dir.path().join("tfrecord-0")).unwrap_err();
        assert!(matches!(err, ScnError::InvalidDatasetDirectory { .. }));
    }

    #[test]
    fn metadata_only_directory_has_no_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "scenario-0.json");
        let listing = DatasetListing::read(dir.path()).unwrap();
        let err = listing.require_scenarios().unwrap_err();
        match err {
            ScnError::NoScenariosFound { path } => assert_eq!(path, dir.path()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_names_sorts_byte_wise() {
        let listing = DatasetListing::from_names(
            Path::new("/data"),
            vec!["tfrecord-b".into(), "Zebra".into(), "tfrecord-a".into()],
        );
        assert_eq!(
            listing.entries(),
            &[
                OsString::from("Zebra"),
                OsString::from("tfrecord-a"),
                OsString::from("tfrecord-b")
            ]
        );
    }
}
