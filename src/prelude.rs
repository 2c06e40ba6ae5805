//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use scene_selector::prelude::*;
//! ```

// Core
pub use crate::core::config::Config;
pub use crate::core::errors::{Result, ScnError};

// Selection
pub use crate::selection::discipline::SelectionDiscipline;
pub use crate::selection::listing::{DatasetListing, SCENARIO_PREFIX};
pub use crate::selection::manifest::SelectionManifest;
pub use crate::selection::policy::SelectionPolicy;
pub use crate::selection::report::{SelectionObserver, SelectionReport, StderrReport};
pub use crate::selection::sampling::SAMPLING_SEED;
pub use crate::selection::selector::{
    Selection, select, select_scenes, select_scenes_with, select_with,
};

// Logging
pub use crate::logger::jsonl::{JsonlConfig, JsonlWriter};
