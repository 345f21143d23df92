//! Greedy partitioning of a linear history into composite commits.
//!
//! The grouper walks the commits oldest-first. Each run starts at an anchor
//! commit and is extended one step at a time while the step stays small:
//! linear parentage, few files, few hunks per file, at least one eligible
//! path, and no path that the run already touched on the opposite side.
//! The first rejected step closes the run and the next anchor is the rejected
//! commit itself. Runs are never revisited.

use std::collections::HashSet;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ConfigError, GitError};
use crate::git::{Commit, DiffSource, FileDiff};

use super::hunks::count_hunks;
use super::path_filter::PathFilter;

/// Shortest run that is emitted as a composite commit.
pub const MIN_GROUP_LEN: usize = 3;

/// Thresholds applied to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrouperConfig {
    /// Maximum file diffs between two consecutive commits of a run.
    pub max_files_per_step: usize,
    /// Maximum commits in one run.
    pub max_run_length: usize,
    /// Maximum hunks in a single file's patch within one step.
    pub max_hunks_per_file: usize,
}

impl Default for GrouperConfig {
    fn default() -> Self {
        Self {
            max_files_per_step: 3,
            max_run_length: 5,
            max_hunks_per_file: 5,
        }
    }
}

impl GrouperConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files_per_step < 1 {
            return Err(ConfigError::InvalidThreshold {
                name: "max_files_per_step",
                value: self.max_files_per_step,
                min: 1,
            });
        }
        if self.max_run_length < 1 {
            return Err(ConfigError::InvalidThreshold {
                name: "max_run_length",
                value: self.max_run_length,
                min: 1,
            });
        }
        Ok(())
    }
}

/// A contiguous run of at least [`MIN_GROUP_LEN`] commits, by short id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeGroup {
    commits: Vec<String>,
}

impl CompositeGroup {
    fn from_run(commits: &[Commit]) -> Self {
        Self {
            commits: commits.iter().map(|c| c.short_id().to_string()).collect(),
        }
    }

    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Why a step was not added to the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Zero or several parents, or a parent other than the previous commit.
    NotLinear,
    /// The run already holds `max_run_length` commits.
    RunFull,
    /// More file diffs than `max_files_per_step`.
    TooManyFiles(usize),
    /// Some file in the step has more than `max_hunks_per_file` hunks.
    TooManyHunks,
    /// A path was seen earlier in the run on the opposite side.
    PathOverlap,
    /// No diff in the step had eligible paths.
    NoEligibleChange,
    /// The staged before/after path sets grew past `max_files_per_step`.
    TooManyPaths,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotLinear => write!(f, "history is not linear"),
            RejectReason::RunFull => write!(f, "run length cap reached"),
            RejectReason::TooManyFiles(n) => write!(f, "{} files changed", n),
            RejectReason::TooManyHunks => write!(f, "file exceeds hunk cap"),
            RejectReason::PathOverlap => write!(f, "path touched on both sides"),
            RejectReason::NoEligibleChange => write!(f, "no eligible change"),
            RejectReason::TooManyPaths => write!(f, "too many staged paths"),
        }
    }
}

/// Paths collected from one step, merged into the run only if it is accepted.
#[derive(Debug, Default)]
struct StagedPaths {
    before: HashSet<String>,
    after: HashSet<String>,
}

enum StepOutcome {
    Accepted(StagedPaths),
    Rejected(RejectReason),
}

/// State of the run being extended. Fresh for every anchor.
#[derive(Debug)]
struct RunAccumulator {
    len: usize,
    before: HashSet<String>,
    after: HashSet<String>,
}

impl RunAccumulator {
    fn new() -> Self {
        Self {
            len: 1,
            before: HashSet::new(),
            after: HashSet::new(),
        }
    }

    /// Path compared as plain strings across the whole run, not per commit.
    fn overlaps(&self, old_path: Option<&str>, new_path: Option<&str>) -> bool {
        old_path.is_some_and(|p| self.after.contains(p))
            || new_path.is_some_and(|p| self.before.contains(p))
    }

    fn absorb(&mut self, staged: StagedPaths) {
        self.len += 1;
        self.before.extend(staged.before);
        self.after.extend(staged.after);
    }
}

/// Partitions commit histories into composite commits.
#[derive(Debug, Clone)]
pub struct CompositeGrouper {
    config: GrouperConfig,
    filter: PathFilter,
}

impl CompositeGrouper {
    pub fn new(config: GrouperConfig, filter: PathFilter) -> Self {
        Self { config, filter }
    }

    pub fn config(&self) -> &GrouperConfig {
        &self.config
    }

    /// Emit every run of at least [`MIN_GROUP_LEN`] commits, in history order.
    ///
    /// Only failures of the diff source are returned as errors; structural
    /// rejections just close the current run.
    pub fn group<D>(&self, commits: &[Commit], diffs: &D) -> Result<Vec<CompositeGroup>, GitError>
    where
        D: DiffSource + ?Sized,
    {
        let runs = self.partition(commits, diffs)?;

        let groups: Vec<CompositeGroup> = runs
            .into_iter()
            .filter(|run| run.len() >= MIN_GROUP_LEN)
            .map(|run| CompositeGroup::from_run(&commits[run]))
            .collect();

        debug!(
            "Found {} composite commits in {} commits",
            groups.len(),
            commits.len()
        );

        Ok(groups)
    }

    /// Split `commits` into consecutive candidate runs covering every index
    /// exactly once, including runs too short to be emitted.
    pub fn partition<D>(&self, commits: &[Commit], diffs: &D) -> Result<Vec<Range<usize>>, GitError>
    where
        D: DiffSource + ?Sized,
    {
        let mut runs = Vec::new();
        let mut anchor = 0;

        while anchor < commits.len() {
            let len = self.extend_run(commits, anchor, diffs)?;
            runs.push(anchor..anchor + len);
            anchor += len;
        }

        Ok(runs)
    }

    /// Grow the run anchored at `anchor` and return its length.
    fn extend_run<D>(&self, commits: &[Commit], anchor: usize, diffs: &D) -> Result<usize, GitError>
    where
        D: DiffSource + ?Sized,
    {
        let mut run = RunAccumulator::new();

        for j in anchor + 1..commits.len() {
            let (parent, child) = (&commits[j - 1], &commits[j]);

            let outcome = if !child.follows(parent) {
                StepOutcome::Rejected(RejectReason::NotLinear)
            } else if run.len >= self.config.max_run_length {
                StepOutcome::Rejected(RejectReason::RunFull)
            } else {
                let files = diffs.file_diffs(parent, child)?;
                self.evaluate_step(&run, &files)
            };

            match outcome {
                StepOutcome::Accepted(staged) => run.absorb(staged),
                StepOutcome::Rejected(reason) => {
                    trace!(
                        "Run at {} closed before {}: {}",
                        commits[anchor].short_id(),
                        child.short_id(),
                        reason
                    );
                    break;
                }
            }
        }

        Ok(run.len)
    }

    fn evaluate_step(&self, run: &RunAccumulator, files: &[FileDiff]) -> StepOutcome {
        let max_files = self.config.max_files_per_step;
        if files.len() > max_files {
            return StepOutcome::Rejected(RejectReason::TooManyFiles(files.len()));
        }

        let mut staged = StagedPaths::default();
        let mut has_mod = false;
        let mut rejection = None;

        for file in files {
            // An oversized file rejects the step, but the remaining files are still examined.
            if count_hunks(&file.patch) > self.config.max_hunks_per_file {
                rejection.get_or_insert(RejectReason::TooManyHunks);
                continue;
            }

            let old_path = file.old_path.as_deref();
            let new_path = file.new_path.as_deref();
            if !(self.filter.is_eligible(old_path) && self.filter.is_eligible(new_path)) {
                continue;
            }

            has_mod = true;
            if run.overlaps(old_path, new_path) {
                rejection.get_or_insert(RejectReason::PathOverlap);
                break;
            }

            if let Some(path) = old_path {
                staged.before.insert(path.to_string());
            }
            if let Some(path) = new_path {
                staged.after.insert(path.to_string());
            }
        }

        if let Some(reason) = rejection {
            return StepOutcome::Rejected(reason);
        }
        if !has_mod {
            return StepOutcome::Rejected(RejectReason::NoEligibleChange);
        }
        if staged.before.len() > max_files || staged.after.len() > max_files {
            return StepOutcome::Rejected(RejectReason::TooManyPaths);
        }

        StepOutcome::Accepted(staged)
    }
}

impl Default for CompositeGrouper {
    fn default() -> Self {
        Self::new(GrouperConfig::default(), PathFilter::default())
    }
}
