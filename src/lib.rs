//! group-runner - Group and regex based test selection
//!
//! This library narrows a list of candidate test files to the ones matching
//! `--group=` and `--regex=` selectors, using the tags each file declares in
//! its leading docblock.

pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod runner;
pub mod selector;
pub mod telemetry;
