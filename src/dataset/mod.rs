//! Dataset construction: work list, per-repository pipeline, result files.

pub mod pipeline;
pub mod runner;
pub mod sink;
pub mod work_list;

pub use pipeline::{PipelineSettings, RepoOutcome, process_repository};
pub use runner::{JOBS_ENV_VAR, RunSummary, default_jobs, run_work_list};
pub use sink::ResultSink;
pub use work_list::{parse_work_list, read_work_list};
