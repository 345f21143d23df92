//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use git2::{Oid, Repository, Signature};

use composite_commits::{Commit, DiffSource, FileDiff, GitError};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    /// Create an empty repository at `<parent>/<name>`.
    pub fn init_at(parent: &Path, name: &str) -> Repository {
        Repository::init(parent.join(name)).expect("Failed to init git repo")
    }

    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Commit a set of file writes (`Some(content)`) and deletions (`None`)
    /// on top of HEAD. Returns the commit OID.
    pub fn commit_files(&self, message: &str, files: &[(String, Option<&str>)]) -> Oid {
        commit_files(&self.repo, message, files)
    }

    /// Create a merge commit of HEAD and `other` with HEAD's tree.
    pub fn merge(&self, other: Oid) -> Oid {
        let sig = self.signature();
        let head = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .expect("Failed to read HEAD");
        let other = self.repo.find_commit(other).expect("Failed to find commit");
        let tree = head.tree().expect("Failed to read tree");

        self.repo
            .commit(Some("HEAD"), &sig, &sig, "merge", &tree, &[&head, &other])
            .expect("Failed to create merge commit")
    }

    /// Create a commit with an explicit parent, without moving HEAD.
    pub fn side_commit(&self, parent: Oid, path: &str, content: &str) -> Oid {
        let sig = self.signature();
        let parent = self.repo.find_commit(parent).expect("Failed to find parent");
        let blob = self.repo.blob(content.as_bytes()).expect("Failed to write blob");

        let mut builder = git2::build::TreeUpdateBuilder::new();
        builder.upsert(path, blob, git2::FileMode::Blob);
        let base = parent.tree().expect("Failed to read tree");
        let tree_id = builder
            .create_updated(&self.repo, &base)
            .expect("Failed to build tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        self.repo
            .commit(None, &sig, &sig, "side", &tree, &[&parent])
            .expect("Failed to create side commit")
    }
}

/// Commit file changes on top of HEAD of an arbitrary repository.
pub fn commit_files(repo: &Repository, message: &str, files: &[(String, Option<&str>)]) -> Oid {
    let workdir = repo.workdir().expect("Repository has no workdir").to_path_buf();
    let mut index = repo.index().expect("Failed to get index");

    for (path, content) in files {
        let full = workdir.join(path);
        match content {
            Some(content) => {
                if let Some(parent) = full.parent() {
                    std::fs::create_dir_all(parent).expect("Failed to create dirs");
                }
                std::fs::write(&full, content).expect("Failed to write file");
                index.add_path(Path::new(path)).expect("Failed to add file");
            }
            None => {
                std::fs::remove_file(&full).expect("Failed to remove file");
                index.remove_path(Path::new(path)).expect("Failed to remove from index");
            }
        }
    }

    index.write().expect("Failed to write index");
    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");

    let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Failed to create commit")
}

/// Java source path under the production root.
pub fn java(name: &str) -> String {
    format!("src/main/java/com/example/{}.java", name)
}

/// A patch text with `hunks` hunk headers.
pub fn patch_with_hunks(hunks: usize) -> String {
    (0..hunks)
        .map(|i| format!("@@ -{0} +{0} @@\n-old\n+new\n", i * 10 + 1))
        .collect()
}

/// A modification of one path with a single hunk.
pub fn modify(path: &str) -> FileDiff {
    FileDiff::new(Some(path), Some(path), patch_with_hunks(1))
}

/// In-memory diff source keyed by child commit id.
#[derive(Default)]
pub struct FixtureDiffs {
    by_child: HashMap<String, Vec<FileDiff>>,
}

impl FixtureDiffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, child: &str, diffs: Vec<FileDiff>) -> &mut Self {
        self.by_child.insert(child.to_string(), diffs);
        self
    }
}

impl DiffSource for FixtureDiffs {
    fn file_diffs(&self, _parent: &Commit, child: &Commit) -> Result<Vec<FileDiff>, GitError> {
        Ok(self.by_child.get(&child.id).cloned().unwrap_or_default())
    }
}

/// Linear commits with ids `c00`, `c01`, ... each parented on the previous.
pub fn linear_commits(n: usize) -> Vec<Commit> {
    (0..n)
        .map(|i| {
            let parents = if i == 0 { vec![] } else { vec![format!("c{:02}", i - 1)] };
            Commit::new(format!("c{:02}", i), parents)
        })
        .collect()
}
