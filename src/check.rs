//! Batch and single-file runners.

use std::path::Path;

use tracing::info;

use crate::config::Config;
use crate::discovery::discover;
use crate::error::Result;
use crate::parse::check_file;
use crate::report::{FileOutcome, Mode, Summary};

/// Exit code for a batch run with at least one failure.
pub const EXIT_BATCH_FAILURE: i32 = 2;
/// Exit code for a single-file run that failed.
pub const EXIT_SINGLE_FAILURE: i32 = 1;

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    pub summary: Summary,
}

impl BatchReport {
    pub fn exit_code(&self) -> i32 {
        exit_code(Mode::Batch, &self.summary)
    }
}

/// Discover files and parse each one in order.
///
/// Parse failures are recorded and never stop the run.
pub fn run_batch(config: &Config) -> Result<BatchReport> {
    run_batch_with(config, |_| {})
}

/// Like [`run_batch`], invoking `on_outcome` as each file finishes.
pub fn run_batch_with<F>(config: &Config, mut on_outcome: F) -> Result<BatchReport>
where
    F: FnMut(&FileOutcome),
{
    let files = discover(&config.root, &config.patterns, &config.paths)?;

    let mut outcomes = Vec::with_capacity(files.len());
    let mut summary = Summary::default();

    for path in &files {
        let outcome = check_file(path);
        summary.record(&outcome);
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        "batch complete"
    );

    Ok(BatchReport { outcomes, summary })
}

pub fn run_single(path: &Path) -> FileOutcome {
    check_file(path)
}

pub fn exit_code(mode: Mode, summary: &Summary) -> i32 {
    match (summary.is_success(), mode) {
        (true, _) => 0,
        (false, Mode::Batch) => EXIT_BATCH_FAILURE,
        (false, Mode::Single) => EXIT_SINGLE_FAILURE,
    }
}
