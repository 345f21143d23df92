//! composite-commits - mines composite commits from linear git histories.
//!
//! # Overview
//!
//! A composite commit is a run of three or more consecutive commits that
//! together look like one small, atomic change: each step touches few files
//! with few hunks, and no file is touched on both sides of the run. The
//! [`grouping::CompositeGrouper`] partitions a branch's history into such runs
//! and the [`dataset`] module persists them as one JSON file per repository.

pub mod dataset;
pub mod error;
pub mod git;
pub mod grouping;

// Re-export commonly used types
pub use dataset::{PipelineSettings, RepoOutcome, ResultSink, process_repository};
pub use error::{ConfigError, DatasetError, GitError, PipelineError};
pub use git::{Commit, DiffSource, FileDiff};
pub use grouping::{CompositeGroup, CompositeGrouper, GrouperConfig, PathFilter, PathFilterConfig};
