//! composite-commits - CLI entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use composite_commits::dataset::{
    PipelineSettings, ResultSink, default_jobs, read_work_list, run_work_list,
};
use composite_commits::grouping::{
    CompositeGrouper, GrouperConfig, PathFilter, PathFilterConfig,
};

/// Mine composite commits from the histories of local git repositories.
#[derive(Parser, Debug)]
#[command(name = "composite-commits")]
#[command(about = "Mine composite commits from the histories of local git repositories")]
#[command(version)]
struct Cli {
    /// File listing repository names, one per line
    #[arg(long, default_value = "repos.txt")]
    work_list: PathBuf,

    /// Process these repositories instead of the work list
    #[arg(long = "repo")]
    repos: Vec<String>,

    /// Directory containing one working copy per repository name
    #[arg(long, default_value = "projects")]
    projects_dir: PathBuf,

    /// Directory receiving one <repo>.json file per repository
    #[arg(short = 'o', long, default_value = "dataset")]
    output_dir: PathBuf,

    /// Branch to scan (defaults to the first local branch)
    #[arg(long)]
    branch: Option<String>,

    /// Source file extension under study
    #[arg(long, default_value = ".java")]
    extension: String,

    /// Directory fragment a path must contain (repeatable)
    #[arg(long = "source-root", default_values_t = [String::from("src/main/java"), String::from("src/test/java")])]
    source_roots: Vec<String>,

    /// Maximum file diffs per step
    #[arg(long, default_value_t = 3)]
    max_files: usize,

    /// Maximum commits per composite commit
    #[arg(long, default_value_t = 5)]
    max_len: usize,

    /// Maximum hunks per file within one step
    #[arg(long, default_value_t = 5)]
    max_hunks: usize,

    /// Repositories processed in parallel (default: COMPOSITE_COMMITS_JOBS or CPU count)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Step 1: Build the grouper from thresholds and path rules
    let config = GrouperConfig {
        max_files_per_step: cli.max_files,
        max_run_length: cli.max_len,
        max_hunks_per_file: cli.max_hunks,
    };
    config.validate().context("Invalid grouping thresholds")?;

    let filter = PathFilter::new(PathFilterConfig {
        extension: cli.extension,
        source_roots: cli.source_roots,
        ..PathFilterConfig::default()
    })
    .context("Invalid path filter")?;

    // Step 2: Resolve the repositories to process
    let repo_names = if cli.repos.is_empty() {
        read_work_list(&cli.work_list).context("Failed to read work list")?
    } else {
        cli.repos
    };

    if repo_names.is_empty() {
        println!("No repositories to process.");
        return Ok(());
    }

    let jobs = cli.jobs.unwrap_or_else(default_jobs);
    println!(
        "Processing {} repositories with {} jobs...",
        repo_names.len(),
        jobs
    );

    // Step 3: Group and persist every repository
    let settings = Arc::new(PipelineSettings {
        projects_dir: cli.projects_dir,
        branch: cli.branch,
        grouper: CompositeGrouper::new(config, filter),
        sink: ResultSink::new(cli.output_dir),
    });

    let summary = run_work_list(settings, repo_names, jobs).await;

    println!(
        "✓ {} written, {} skipped, {} failed ({} composite commits)",
        summary.written,
        summary.skipped,
        summary.failed.len(),
        summary.groups
    );
    for name in &summary.failed {
        eprintln!("Warning: {} was not processed", name);
    }

    Ok(())
}
