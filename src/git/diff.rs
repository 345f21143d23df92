//! Commit-to-commit diff collection using git2.

use git2::{Delta, DiffFindOptions, DiffOptions, Oid, Patch, Repository};
use tracing::{trace, warn};

use crate::error::GitError;

use super::commits::Commit;

/// One file's change between a parent commit and its child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Path before the change (None if the file was created).
    pub old_path: Option<String>,
    /// Path after the change (None if the file was deleted).
    pub new_path: Option<String>,
    /// Raw unified patch text. May not be valid UTF-8.
    pub patch: Vec<u8>,
}

impl FileDiff {
    pub fn new<P: AsRef<str>>(
        old_path: Option<P>,
        new_path: Option<P>,
        patch: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            old_path: old_path.map(|p| p.as_ref().to_string()),
            new_path: new_path.map(|p| p.as_ref().to_string()),
            patch: patch.into(),
        }
    }
}

/// Source of per-file diffs between two adjacent commits.
///
/// This abstraction allows the grouper to run against fixtures in tests.
#[cfg_attr(test, mockall::automock)]
pub trait DiffSource {
    /// Return the file diffs from `parent` to `child`.
    fn file_diffs(&self, parent: &Commit, child: &Commit) -> Result<Vec<FileDiff>, GitError>;
}

/// Diff source backed by a local git repository.
///
/// Whitespace-only changes are ignored and renames are detected, so a moved
/// file shows up as a single diff with both paths set. A modified file whose
/// only change is whitespace is left out entirely.
pub struct TreeDiffSource<'repo> {
    repo: &'repo Repository,
}

impl<'repo> TreeDiffSource<'repo> {
    pub fn new(repo: &'repo Repository) -> Self {
        Self { repo }
    }

    fn find_tree(&self, commit: &Commit) -> Result<git2::Tree<'repo>, GitError> {
        let not_found = |e| GitError::CommitNotFound(commit.id.clone(), e);
        let oid = Oid::from_str(&commit.id).map_err(not_found)?;
        let found = self.repo.find_commit(oid).map_err(not_found)?;
        found.tree().map_err(not_found)
    }
}

impl DiffSource for TreeDiffSource<'_> {
    fn file_diffs(&self, parent: &Commit, child: &Commit) -> Result<Vec<FileDiff>, GitError> {
        let diff_failed = |e| GitError::DiffFailed {
            parent: parent.id.clone(),
            child: child.id.clone(),
            source: e,
        };

        let old_tree = self.find_tree(parent)?;
        let new_tree = self.find_tree(child)?;

        let mut opts = DiffOptions::new();
        opts.ignore_whitespace_change(true);
        let mut diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut opts))
            .map_err(diff_failed)?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts)).map_err(diff_failed)?;

        let mut files = Vec::with_capacity(diff.deltas().len());

        for (idx, delta) in diff.deltas().enumerate() {
            let status = delta.status();

            // libgit2 fills both sides for added/deleted files; only keep the real one.
            let old_path = match status {
                Delta::Added | Delta::Untracked => None,
                _ => delta.old_file().path().map(|p| p.to_string_lossy().to_string()),
            };
            let new_path = match status {
                Delta::Deleted => None,
                _ => delta.new_file().path().map(|p| p.to_string_lossy().to_string()),
            };

            let patch = match Patch::from_diff(&diff, idx).map_err(diff_failed)? {
                Some(patch) if is_whitespace_only(status, &patch) => {
                    trace!("Ignoring whitespace-only change to {:?} in {}", new_path, child.id);
                    continue;
                }
                Some(mut patch) => patch.to_buf().map_err(diff_failed)?.to_vec(),
                None => {
                    warn!(
                        "No patch text for {:?} -> {:?} in {}",
                        old_path, new_path, child.id
                    );
                    Vec::new()
                }
            };

            files.push(FileDiff {
                old_path,
                new_path,
                patch,
            });
        }

        Ok(files)
    }
}

/// True for an in-place content change that has no hunks once whitespace
/// changes are ignored (`git diff -b` prints nothing for it).
///
/// Renames, mode changes and binary files keep their delta.
fn is_whitespace_only(status: Delta, patch: &Patch<'_>) -> bool {
    let delta = patch.delta();
    status == Delta::Modified
        && patch.num_hunks() == 0
        && delta.old_file().mode() == delta.new_file().mode()
        && !delta.flags().is_binary()
}
