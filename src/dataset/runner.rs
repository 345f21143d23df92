//! Parallel processing of a work list.

use std::collections::HashSet;
use std::env;
use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use super::pipeline::{PipelineSettings, RepoOutcome, process_repository};

/// Environment variable overriding the number of parallel repositories.
pub const JOBS_ENV_VAR: &str = "COMPOSITE_COMMITS_JOBS";

/// Totals over one work list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub failed: Vec<String>,
    pub groups: usize,
}

impl RunSummary {
    fn record(&mut self, repo_name: String, result: Result<RepoOutcome, String>) {
        match result {
            Ok(RepoOutcome::Written { groups, .. }) => {
                self.written += 1;
                self.groups += groups;
            }
            Ok(RepoOutcome::Skipped { .. }) => self.skipped += 1,
            Err(message) => {
                error!("Failed to process {}: {}", repo_name, message);
                self.failed.push(repo_name);
            }
        }
    }
}

/// Get the configured number of parallel jobs.
///
/// Reads from COMPOSITE_COMMITS_JOBS if set, otherwise uses the available
/// parallelism of the machine. Logs a warning if the variable is set but is
/// not a positive integer.
pub fn default_jobs() -> usize {
    let fallback = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);

    match env::var(JOBS_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<usize>() {
            Ok(jobs) if jobs > 0 => jobs,
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}",
                    JOBS_ENV_VAR, v, fallback
                );
                fallback
            }
        },
        _ => fallback,
    }
}

/// Process every repository, at most `jobs` at a time.
///
/// A failing repository is logged and counted; the others still run. A name
/// listed more than once is processed once.
pub async fn run_work_list(
    settings: Arc<PipelineSettings>,
    repo_names: Vec<String>,
    jobs: usize,
) -> RunSummary {
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    let mut seen = HashSet::new();
    for repo_name in repo_names {
        if !seen.insert(repo_name.clone()) {
            debug!("Skipping duplicate work list entry {}", repo_name);
            continue;
        }
        let settings = Arc::clone(&settings);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await;
            let name = repo_name.clone();
            let result = tokio::task::spawn_blocking(move || {
                process_repository(&settings, &name).map_err(|e| e.to_string())
            })
            .await
            .unwrap_or_else(|e| Err(format!("worker panicked: {}", e)));
            (repo_name, result)
        });
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((repo_name, result)) => summary.record(repo_name, result),
            Err(e) => error!("Repository task failed: {}", e),
        }
    }

    summary.failed.sort();
    summary
}
