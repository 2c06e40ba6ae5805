#![forbid(unsafe_code)]

//! Scene Selector (scnsel): deterministic traffic-scenario selection for
//! simulation and training pipelines.
//!
//! Given a dataset directory of `tfrecord*` scenario files and a
//! [`SelectionPolicy`](selection::policy::SelectionPolicy), the selector
//! returns an ordered list of absolute scene paths under one of five
//! disciplines:
//! 1. **first_n**: the first N entries of the sorted listing
//! 2. **random_n**: a fixed-seed sample without replacement
//! 3. **pad_n**: the sorted listing cycled and cut to exactly N
//! 4. **exact_n**: the whole listing, which must hold exactly N entries
//! 5. **k_unique_n**: K sampled scenes cycled and cut to exactly N
//!
//! # Library usage
//!
//! ```rust,no_run
//! use scene_selector::prelude::*;
//!
//! let policy = SelectionPolicy::new("waymo_data", 64, SelectionDiscipline::PadN);
//! let paths = select_scenes(&policy)?;
//! # Ok::<(), ScnError>(())
//! ```

pub mod prelude;

pub mod core;
pub mod logger;
pub mod selection;
