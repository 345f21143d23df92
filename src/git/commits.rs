//! Linear history fetching.

use git2::{Repository, Sort};
use tracing::debug;

use crate::error::GitError;

use super::branch::resolve_branch;

/// Number of hex characters kept when a commit id is written to a dataset.
pub const SHORT_ID_LEN: usize = 10;

/// One revision in a branch's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Full hex object id.
    pub id: String,
    /// Parent ids in the order recorded by the commit.
    pub parents: Vec<String>,
}

impl Commit {
    pub fn new(id: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            id: id.into(),
            parents,
        }
    }

    /// Create a Commit from a git2 Commit.
    pub fn from_git2_commit(commit: &git2::Commit) -> Self {
        Self {
            id: commit.id().to_string(),
            parents: commit.parent_ids().map(|oid| oid.to_string()).collect(),
        }
    }

    /// True when this commit has exactly one parent and it is `previous`.
    pub fn follows(&self, previous: &Commit) -> bool {
        matches!(self.parents.as_slice(), [parent] if *parent == previous.id)
    }

    /// The id truncated to [`SHORT_ID_LEN`] characters.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((end, _)) => &self.id[..end],
            None => &self.id,
        }
    }
}

/// Fetch every commit reachable from the selected branch, oldest first.
pub fn fetch_history(repo: &Repository, branch: Option<&str>) -> Result<Vec<Commit>, GitError> {
    let tip = resolve_branch(repo, branch)?;
    debug!("Walking history of {} from {}", tip.name, tip.oid);

    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME | Sort::REVERSE)
        .map_err(GitError::RevwalkError)?;
    revwalk.push(tip.oid).map_err(GitError::RevwalkError)?;

    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo
            .find_commit(oid)
            .map_err(|e| GitError::CommitNotFound(oid.to_string(), e))?;
        commits.push(Commit::from_git2_commit(&commit));
    }

    Ok(commits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(id: &str, parents: &[&str]) -> Commit {
        Commit::new(id, parents.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_follows_single_matching_parent() {
        let a = commit("a", &[]);
        let b = commit("b", &["a"]);
        assert!(b.follows(&a));
    }

    #[test]
    fn test_follows_rejects_other_parent() {
        let a = commit("a", &[]);
        let b = commit("b", &["x"]);
        assert!(!b.follows(&a));
    }

    #[test]
    fn test_follows_rejects_root_and_merge() {
        let a = commit("a", &[]);
        assert!(!commit("root", &[]).follows(&a));
        assert!(!commit("merge", &["a", "x"]).follows(&a));
    }

    #[test]
    fn test_short_id() {
        let c = commit("0123456789abcdef0123456789abcdef01234567", &[]);
        assert_eq!(c.short_id(), "0123456789");
        assert_eq!(commit("abc", &[]).short_id(), "abc");
    }
}
