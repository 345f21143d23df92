//! Per-repository processing: history, grouping, persistence.

use std::path::PathBuf;

use git2::Repository;
use tracing::{debug, info};

use crate::error::{GitError, PipelineError};
use crate::git::{TreeDiffSource, fetch_history};
use crate::grouping::CompositeGrouper;

use super::sink::ResultSink;

/// Settings shared by every repository in a dataset run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Directory holding one working copy per repository name.
    pub projects_dir: PathBuf,
    /// Branch to scan. None selects the primary branch.
    pub branch: Option<String>,
    pub grouper: CompositeGrouper,
    pub sink: ResultSink,
}

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// A result file already existed; nothing was recomputed.
    Skipped { path: PathBuf },
    /// The history was grouped and persisted.
    Written {
        path: PathBuf,
        commits: usize,
        groups: usize,
    },
}

/// Process one repository.
///
/// An existing result short-circuits before the repository is opened.
pub fn process_repository(
    settings: &PipelineSettings,
    repo_name: &str,
) -> Result<RepoOutcome, PipelineError> {
    if settings.sink.exists(repo_name) {
        let path = settings.sink.result_path(repo_name);
        debug!("Result for {} already exists at {}", repo_name, path.display());
        return Ok(RepoOutcome::Skipped { path });
    }

    let repo_path = settings.projects_dir.join(repo_name);
    let repo = Repository::open(&repo_path).map_err(|source| GitError::OpenRepository {
        path: repo_path.clone(),
        source,
    })?;

    info!("Processing {}", repo_name);

    let commits = fetch_history(&repo, settings.branch.as_deref())?;
    let diffs = TreeDiffSource::new(&repo);
    let groups = settings.grouper.group(&commits, &diffs)?;

    let path = settings.sink.write(repo_name, &groups)?;

    info!(
        "Collected {} composite commits from {} commits in {}",
        groups.len(),
        commits.len(),
        repo_name
    );

    Ok(RepoOutcome::Written {
        path,
        commits: commits.len(),
        groups: groups.len(),
    })
}
