//! Git operations using git2-rs.

pub mod branch;
pub mod commits;
pub mod diff;

pub use branch::{BranchTip, resolve_branch};
pub use commits::{Commit, SHORT_ID_LEN, fetch_history};
pub use diff::{DiffSource, FileDiff, TreeDiffSource};
