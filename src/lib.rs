//! # yamlcheck - parse-check YAML documents
//!
//! Verifies that every YAML document in a project, typically its OpenAPI
//! files, loads as a single well-formed document. Failures are reported per
//! file and folded into the process exit status.
//!
//! ## Modules
//!
//! - [`discovery`] - Glob expansion plus fixed paths, de-duplicated and sorted
//! - [`parse`] - Safe single-document YAML loading
//! - [`report`] - Per-file outcomes, summaries and text/JSON rendering
//! - [`check`] - Batch and single-file runners and exit codes
//! - [`config`] - `yamlcheck.yaml` loading and CLI overrides
//! - [`error`] - Library error type
//! - [`logging`] - `tracing` subscriber setup
//!
//! ## Example
//!
//! ```no_run
//! use yamlcheck::check::run_batch;
//! use yamlcheck::config::{Config, Overrides};
//!
//! let config = Config::load(None, Overrides::default()).expect("Failed to load config");
//! let report = run_batch(&config).expect("Failed to discover files");
//!
//! for outcome in &report.outcomes {
//!     if let Some(message) = outcome.message() {
//!         eprintln!("{}: {}", outcome.path.display(), message);
//!     }
//! }
//! std::process::exit(report.exit_code());
//! ```

pub mod check;
pub mod config;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod parse;
pub mod report;

pub use error::{CheckError, Result};
