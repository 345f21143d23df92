//! Primary branch resolution.

use git2::{BranchType, Oid, Repository};
use tracing::debug;

use crate::error::GitError;

/// Resolved branch tip.
#[derive(Debug, Clone)]
pub struct BranchTip {
    pub name: String,
    pub oid: Oid,
}

/// Resolve the branch whose history should be scanned.
///
/// If `branch` is given it is looked up as a local branch first and then as
/// any revspec (remote branch, tag, commit hash). If `branch` is None, the
/// first local branch in name order is used.
pub fn resolve_branch(repo: &Repository, branch: Option<&str>) -> Result<BranchTip, GitError> {
    match branch {
        Some(name) => resolve_named(repo, name),
        None => first_local_branch(repo),
    }
}

fn resolve_named(repo: &Repository, name: &str) -> Result<BranchTip, GitError> {
    if let Ok(branch) = repo.find_branch(name, BranchType::Local) {
        let commit = branch
            .get()
            .peel_to_commit()
            .map_err(|e| GitError::BranchNotFound(name.to_string(), e))?;
        return Ok(BranchTip {
            name: name.to_string(),
            oid: commit.id(),
        });
    }

    let obj = repo
        .revparse_single(name)
        .map_err(|e| GitError::BranchNotFound(name.to_string(), e))?;
    let commit = obj
        .peel_to_commit()
        .map_err(|e| GitError::BranchNotFound(name.to_string(), e))?;

    Ok(BranchTip {
        name: name.to_string(),
        oid: commit.id(),
    })
}

fn first_local_branch(repo: &Repository) -> Result<BranchTip, GitError> {
    let branches = repo
        .branches(Some(BranchType::Local))
        .map_err(GitError::ListBranches)?;

    let mut tips = Vec::new();
    for entry in branches {
        let (branch, _) = entry.map_err(GitError::ListBranches)?;
        let Some(name) = branch.name().map_err(GitError::ListBranches)? else {
            debug!("Skipping branch with non UTF-8 name");
            continue;
        };
        let name = name.to_string();
        let commit = branch
            .get()
            .peel_to_commit()
            .map_err(|e| GitError::BranchNotFound(name.clone(), e))?;
        tips.push(BranchTip {
            name,
            oid: commit.id(),
        });
    }

    tips.sort_by(|a, b| a.name.cmp(&b.name));
    tips.into_iter().next().ok_or(GitError::NoBranch)
}
