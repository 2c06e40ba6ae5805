//! Selection diagnostics: the report handed to observers after each call.

#![allow(missing_docs)]

use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::ScnError;
use crate::selection::discipline::SelectionDiscipline;
use crate::selection::policy::SelectionPolicy;

/// Summary of one successful selection. Observability only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionReport {
    pub discipline: SelectionDiscipline,
    /// Absolute dataset directory the paths were joined onto.
    pub dataset_dir: PathBuf,
    pub requested: usize,
    /// Entries in the raw listing, scenario or not.
    pub listing_len: usize,
    pub scenario_count: usize,
    pub selected: usize,
    pub unique: usize,
    pub elapsed_ms: u64,
}

impl SelectionReport {
    /// Fraction of selected paths that are distinct. Zero for an empty selection.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unique_ratio(&self) -> f64 {
        if self.selected == 0 {
            0.0
        } else {
            self.unique as f64 / self.selected as f64
        }
    }

    /// Operator-facing `unique/total` line.
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!(
            "{}: {}/{} unique scenes selected ({:.1}%) from {} entries in {}",
            self.discipline,
            self.unique,
            self.selected,
            self.unique_ratio() * 100.0,
            self.listing_len,
            self.dataset_dir.display(),
        )
    }
}

/// Diagnostics hook invoked once per selection call.
pub trait SelectionObserver {
    fn observe(&mut self, report: &SelectionReport);

    fn observe_failure(&mut self, _policy: &SelectionPolicy, _error: &ScnError) {}
}

/// Silent observer.
impl SelectionObserver for () {
    fn observe(&mut self, _report: &SelectionReport) {}
}

/// Fan-out to several observers, in order.
impl SelectionObserver for Vec<Box<dyn SelectionObserver>> {
    fn observe(&mut self, report: &SelectionReport) {
        for observer in self.iter_mut() {
            observer.observe(report);
        }
    }

    fn observe_failure(&mut self, policy: &SelectionPolicy, error: &ScnError) {
        for observer in self.iter_mut() {
            observer.observe_failure(policy, error);
        }
    }
}

/// Writes `[SCN-SELECT]` lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReport;

impl SelectionObserver for StderrReport {
    fn observe(&mut self, report: &SelectionReport) {
        let _ = writeln!(io::stderr(), "[SCN-SELECT] {}", report.summary_line());
    }

    fn observe_failure(&mut self, policy: &SelectionPolicy, error: &ScnError) {
        let _ = writeln!(
            io::stderr(),
            "[SCN-SELECT] {} selection from {} failed: {error}",
            policy.discipline,
            policy.path.display()
        );
    }
}
