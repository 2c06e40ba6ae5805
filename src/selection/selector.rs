//! The scene selector: dataset listing + policy → ordered absolute paths.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;

use crate::core::errors::{Result, ScnError};
use crate::core::paths::absolutize;
use crate::selection::discipline::SelectionDiscipline;
use crate::selection::listing::{DatasetListing, SCENARIO_PREFIX, is_scenario_name};
use crate::selection::policy::SelectionPolicy;
use crate::selection::report::{SelectionObserver, SelectionReport};
use crate::selection::sampling::{cycle_to_len, fixed_seed_sample};

/// A completed selection: the ordered paths plus their diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub paths: Vec<PathBuf>,
    pub report: SelectionReport,
}

impl Selection {
    #[must_use]
    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}

/// Select scenes without diagnostics.
pub fn select_scenes(policy: &SelectionPolicy) -> Result<Vec<PathBuf>> {
    select(policy).map(Selection::into_paths)
}

/// Select scenes and hand the outcome, success or failure, to `observer`.
pub fn select_scenes_with<O>(policy: &SelectionPolicy, observer: &mut O) -> Result<Vec<PathBuf>>
where
    O: SelectionObserver + ?Sized,
{
    select_with(policy, observer).map(Selection::into_paths)
}

/// [`select`], reporting to `observer` before returning.
pub fn select_with<O>(policy: &SelectionPolicy, observer: &mut O) -> Result<Selection>
where
    O: SelectionObserver + ?Sized,
{
    match select(policy) {
        Ok(selection) => {
            observer.observe(&selection.report);
            Ok(selection)
        }
        Err(err) => {
            observer.observe_failure(policy, &err);
            Err(err)
        }
    }
}

/// Run one selection.
///
/// Checks run in a fixed order: policy shape, directory existence and
/// non-emptiness, scenario presence, discipline-specific rules, and finally
/// the scenario re-check on the picked names. Any failure aborts the call.
pub fn select(policy: &SelectionPolicy) -> Result<Selection> {
    let started = Instant::now();
    policy.validate()?;

    let listing = DatasetListing::read(&policy.path)?;
    listing.require_scenarios()?;

    let picked = pick(policy, &listing)?;
    if !picked.iter().any(|name| is_scenario_name(name)) {
        return Err(ScnError::SelectionCorrupted {
            details: format!(
                "{} picked {} entries from {}, none prefixed {SCENARIO_PREFIX:?}",
                policy.discipline,
                picked.len(),
                policy.path.display()
            ),
        });
    }

    let dataset_dir = absolutize(&policy.path);
    let paths: Vec<PathBuf> = picked.iter().map(|name| dataset_dir.join(name)).collect();
    let unique = paths.iter().collect::<HashSet<_>>().len();

    let report = SelectionReport {
        discipline: policy.discipline,
        dataset_dir,
        requested: policy.num_scenes,
        listing_len: listing.len(),
        scenario_count: listing.scenario_count(),
        selected: paths.len(),
        unique,
        elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    Ok(Selection { paths, report })
}

fn pick(policy: &SelectionPolicy, listing: &DatasetListing) -> Result<Vec<OsString>> {
    let entries = listing.entries();
    let n = policy.num_scenes;

    let picked: Vec<OsString> = match policy.discipline {
        SelectionDiscipline::FirstN => entries.iter().take(n).cloned().collect(),
        SelectionDiscipline::RandomN => fixed_seed_sample(entries, n),
        SelectionDiscipline::PadN => cycle_to_len(entries, n),
        SelectionDiscipline::ExactN => {
            if entries.len() != n {
                return Err(ScnError::ScenarioCountMismatch {
                    path: listing.dir().to_path_buf(),
                    expected: n,
                    found: entries.len(),
                });
            }
            entries.to_vec()
        }
        SelectionDiscipline::KUniqueN => {
            let k = k_unique(policy.k_unique_scenes, entries.len())?;
            cycle_to_len(&fixed_seed_sample(entries, k), n)
        }
    };
    Ok(picked)
}

fn k_unique(k: Option<usize>, available: usize) -> Result<usize> {
    match k {
        None => Err(ScnError::InvalidKUnique {
            details: "k_unique_scenes is not set".to_string(),
        }),
        Some(0) => Err(ScnError::InvalidKUnique {
            details: "k_unique_scenes must be >= 1, got 0".to_string(),
        }),
        Some(k) if k > available => Err(ScnError::InvalidKUnique {
            details: format!("k_unique_scenes is {k} but the listing holds only {available} entries"),
        }),
        Some(k) => Ok(k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn dataset(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"scenario").unwrap();
        }
        dir
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn policy(dir: &Path, n: usize, discipline: SelectionDiscipline) -> SelectionPolicy {
        SelectionPolicy::new(dir, n, discipline)
    }

    #[test]
    fn first_n_takes_sorted_prefix() {
        let dir = dataset(&["tfrecord-d", "tfrecord-b", "tfrecord-a", "tfrecord-c"]);
        let paths = select_scenes(&policy(dir.path(), 2, SelectionDiscipline::FirstN)).unwrap();
        assert_eq!(file_names(&paths), vec!["tfrecord-a", "tfrecord-b"]);
    }

    #[test]
    fn first_n_on_short_listing_truncates() {
        let dir = dataset(&["tfrecord-a", "tfrecord-b"]);
        let paths = select_scenes(&policy(dir.path(), 5, SelectionDiscipline::FirstN)).unwrap();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn pad_n_cycles_listing() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1", "tfrecord-2"]);
        let paths = select_scenes(&policy(dir.path(), 7, SelectionDiscipline::PadN)).unwrap();
        assert_eq!(
            file_names(&paths),
            vec![
                "tfrecord-0",
                "tfrecord-1",
                "tfrecord-2",
                "tfrecord-0",
                "tfrecord-1",
                "tfrecord-2",
                "tfrecord-0"
            ]
        );
    }

    #[test]
    fn pad_n_truncates_long_listing() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1", "tfrecord-2"]);
        let paths = select_scenes(&policy(dir.path(), 2, SelectionDiscipline::PadN)).unwrap();
        assert_eq!(file_names(&paths), vec!["tfrecord-0", "tfrecord-1"]);
    }

    #[test]
    fn exact_n_requires_matching_count() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1", "tfrecord-2", "tfrecord-3", "tfrecord-4"]);
        let err = select_scenes(&policy(dir.path(), 4, SelectionDiscipline::ExactN)).unwrap_err();
        match err {
            ScnError::ScenarioCountMismatch {
                expected, found, ..
            } => assert_eq!((expected, found), (4, 5)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn exact_n_returns_full_sorted_listing() {
        let dir = dataset(&["tfrecord-3", "tfrecord-1", "tfrecord-0", "tfrecord-2"]);
        let paths = select_scenes(&policy(dir.path(), 4, SelectionDiscipline::ExactN)).unwrap();
        assert_eq!(
            file_names(&paths),
            vec!["tfrecord-0", "tfrecord-1", "tfrecord-2", "tfrecord-3"]
        );
    }

    #[test]
    fn random_n_samples_num_scenes_distinct_entries() {
        let names: Vec<String> = (0..20).map(|i| format!("tfrecord-{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = dataset(&refs);
        let paths = select_scenes(&policy(dir.path(), 5, SelectionDiscipline::RandomN)).unwrap();
        assert_eq!(paths.len(), 5);
        assert_eq!(paths.iter().collect::<HashSet<_>>().len(), 5);
    }

    #[test]
    fn random_n_is_deterministic() {
        let names: Vec<String> = (0..20).map(|i| format!("tfrecord-{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = dataset(&refs);
        let p = policy(dir.path(), 6, SelectionDiscipline::RandomN);
        assert_eq!(select_scenes(&p).unwrap(), select_scenes(&p).unwrap());
    }

    #[test]
    fn k_unique_n_limits_distinct_scenes() {
        let names: Vec<String> = (0..8).map(|i| format!("tfrecord-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let dir = dataset(&refs);
        let p = policy(dir.path(), 10, SelectionDiscipline::KUniqueN).with_k_unique(2);
        let paths = select_scenes(&p).unwrap();
        assert_eq!(paths.len(), 10);
        assert!(paths.iter().collect::<HashSet<_>>().len() <= 2);
        assert_eq!(paths[0], paths[2]);
        assert_eq!(paths[1], paths[3]);
    }

    #[test]
    fn k_unique_n_requires_k() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1"]);
        for k in [None, Some(0), Some(3)] {
            let mut p = policy(dir.path(), 4, SelectionDiscipline::KUniqueN);
            p.k_unique_scenes = k;
            let err = select_scenes(&p).unwrap_err();
            assert!(
                matches!(err, ScnError::InvalidKUnique { .. }),
                "k={k:?}: {err}"
            );
        }
    }

    #[test]
    fn k_unique_ignored_by_other_disciplines() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1"]);
        let p = policy(dir.path(), 2, SelectionDiscipline::FirstN).with_k_unique(0);
        assert_eq!(select_scenes(&p).unwrap().len(), 2);
    }

    #[test]
    fn directory_errors_precede_discipline_checks() {
        let empty = tempfile::tempdir().unwrap();
        let no_scenes = dataset(&["README.md"]);
        for discipline in SelectionDiscipline::ALL {
            let err = select_scenes(&policy(empty.path(), 3, discipline)).unwrap_err();
            assert!(matches!(err, ScnError::InvalidDatasetDirectory { .. }));

            let missing = empty.path().join("nope");
            let err = select_scenes(&policy(&missing, 3, discipline)).unwrap_err();
            assert!(matches!(err, ScnError::InvalidDatasetDirectory { .. }));

            let err = select_scenes(&policy(no_scenes.path(), 3, discipline)).unwrap_err();
            assert!(
                matches!(err, ScnError::NoScenariosFound { .. }),
                "{discipline}: {err}"
            );
        }
    }

    #[test]
    fn selection_without_scenarios_is_corrupted() {
        // "dataset_info.json" sorts before every tfrecord name.
        let dir = dataset(&["dataset_info.json", "tfrecord-0"]);
        let err = select_scenes(&policy(dir.path(), 1, SelectionDiscipline::FirstN)).unwrap_err();
        assert!(matches!(err, ScnError::SelectionCorrupted { .. }), "{err}");
        assert!(err.is_internal());
    }

    #[test]
    fn non_scenarios_remain_in_raw_listing() {
        let dir = dataset(&["dataset_info.json", "tfrecord-0", "tfrecord-1"]);
        let paths = select_scenes(&policy(dir.path(), 2, SelectionDiscipline::FirstN)).unwrap();
        assert_eq!(file_names(&paths), vec!["dataset_info.json", "tfrecord-0"]);
    }

    #[test]
    fn paths_are_absolute_and_inside_dataset() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1"]);
        let paths = select_scenes(&policy(dir.path(), 3, SelectionDiscipline::PadN)).unwrap();
        for path in &paths {
            assert!(path.is_absolute());
            assert_eq!(path.parent().unwrap(), absolutize(dir.path()));
        }
    }

    #[test]
    fn report_counts_unique_and_total() {
        let dir = dataset(&["tfrecord-0", "tfrecord-1", "notes.txt"]);
        let selection = select(&policy(dir.path(), 5, SelectionDiscipline::PadN)).unwrap();
        let report = &selection.report;
        assert_eq!(report.selected, 5);
        assert_eq!(report.unique, 3);
        assert_eq!(report.listing_len, 3);
        assert_eq!(report.scenario_count, 2);
        assert_eq!(report.requested, 5);
    }

    #[test]
    fn zero_scenes_rejected_before_listing() {
        let missing = PathBuf::from("/nonexistent/scenes");
        let err = select_scenes(&policy(&missing, 0, SelectionDiscipline::PadN)).unwrap_err();
        assert!(matches!(err, ScnError::InvalidConfig { .. }));
    }

    struct Recorder {
        reports: Vec<SelectionReport>,
        failures: Vec<&'static str>,
    }

    impl SelectionObserver for Recorder {
        fn observe(&mut self, report: &SelectionReport) {
            self.reports.push(report.clone());
        }

        fn observe_failure(&mut self, _policy: &SelectionPolicy, error: &ScnError) {
            self.failures.push(error.code());
        }
    }

    #[test]
    fn observer_sees_successes_and_failures() {
        let dir = dataset(&["tfrecord-0"]);
        let mut recorder = Recorder {
            reports: Vec::new(),
            failures: Vec::new(),
        };

        select_scenes_with(&policy(dir.path(), 3, SelectionDiscipline::PadN), &mut recorder)
            .unwrap();
        select_scenes_with(&policy(dir.path(), 3, SelectionDiscipline::ExactN), &mut recorder)
            .unwrap_err();

        assert_eq!(recorder.reports.len(), 1);
        assert_eq!(recorder.reports[0].unique, 1);
        assert_eq!(recorder.failures, vec!["SCN-2003"]);
    }
}
