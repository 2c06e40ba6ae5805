//! Scene selection: dataset listing, disciplines, fixed-seed sampling, manifests.

pub mod discipline;
pub mod listing;
pub mod manifest;
pub mod policy;
pub mod report;
pub mod sampling;
pub mod selector;
