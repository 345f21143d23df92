//! Error types for composite-commits modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository at {path}: {source}")]
    OpenRepository {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to find branch '{0}': {1}")]
    BranchNotFound(String, #[source] git2::Error),

    #[error("Repository has no local branches")]
    NoBranch,

    #[error("Failed to list branches: {0}")]
    ListBranches(#[source] git2::Error),

    #[error("Failed to find commit {0}: {1}")]
    CommitNotFound(String, #[source] git2::Error),

    #[error("Failed to walk commit history: {0}")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to compute diff between {parent} and {child}: {source}")]
    DiffFailed {
        parent: String,
        child: String,
        #[source]
        source: git2::Error,
    },
}

/// Errors from invalid grouping or filtering configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid threshold {name}={value}: must be at least {min}")]
    InvalidThreshold {
        name: &'static str,
        value: usize,
        min: usize,
    },

    #[error("Excluded character range {start:?}..={end:?} is empty")]
    EmptyRange { start: char, end: char },

    #[error("Failed to compile excluded character pattern: {0}")]
    InvalidPattern(#[source] regex_lite::Error),
}

/// Errors from reading the work list or persisting results.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read work list {path}: {source}")]
    ReadWorkList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize results: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    #[error("Failed to write results: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to persist results to {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that end the processing of a single repository.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
