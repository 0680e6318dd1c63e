//! CLI entry point for yamlcheck.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::{Path, PathBuf};

use yamlcheck::check::{self, BatchReport};
use yamlcheck::config::{Config, Overrides};
use yamlcheck::report::{FileOutcome, Mode, OutputFormat, Reporter, Summary};

#[derive(Debug, Parser)]
#[command(name = "yamlcheck")]
#[command(version)]
#[command(about = "Parse-check YAML and OpenAPI documents", long_about = None)]
#[command(
    after_help = "EXIT STATUS:\n    0    every file parsed\n    1    single-file check failed, or a usage/config error\n    2    at least one file failed in a batch check"
)]
struct Cli {
    /// Log discovery and parse details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse every file matched by the configured patterns and fixed paths
    ///
    /// Defaults to docs/openapi/**/*.yaml plus docs/openapi.yaml, overridable
    /// through yamlcheck.yaml or the flags below.
    #[command(visible_alias = "all")]
    Check {
        /// Base directory for relative patterns and paths
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
        /// Glob pattern to expand (can be specified multiple times)
        #[arg(long = "pattern", value_name = "GLOB")]
        patterns: Vec<String>,
        /// Path to check even if no pattern matches it (can be specified multiple times)
        #[arg(long = "path", value_name = "FILE")]
        paths: Vec<PathBuf>,
        /// Config file to use instead of ./yamlcheck.yaml
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output format (text, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Parse a single file
    File {
        /// File to parse
        path: PathBuf,
        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version information (add --verbose for build details)
    Version,
}

fn main() -> Result<()> {
    // Exit 2 belongs to batch parse failures, so usage errors exit 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            std::process::exit(code);
        }
    };
    yamlcheck::logging::init(cli.verbose);

    let code = run(cli)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check {
            root,
            patterns,
            paths,
            config,
            format,
        } => {
            let overrides = Overrides {
                root,
                patterns,
                paths,
                format: format.as_deref().map(parse_format).transpose()?,
            };
            cmd_check(config.as_deref(), overrides)
        }
        Commands::File { path, format } => cmd_file(&path, parse_format(&format)?),
        Commands::Completion { shell } => cmd_completion(shell),
        Commands::Version => cmd_version(cli.verbose),
    }
}

fn parse_format(s: &str) -> Result<OutputFormat> {
    s.parse().map_err(anyhow::Error::msg)
}

fn use_color() -> bool {
    atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
}

fn cmd_check(config_path: Option<&Path>, overrides: Overrides) -> Result<i32> {
    let config = Config::load(config_path, overrides).context("Failed to load configuration")?;
    let reporter = Reporter::new(Mode::Batch, config.format).with_color(use_color());

    let report: BatchReport = match config.format {
        OutputFormat::Text => check::run_batch_with(&config, |outcome| {
            println!("{}", reporter.outcome_line(outcome));
        }),
        OutputFormat::Json => check::run_batch(&config),
    }
    .context("Failed to discover files")?;

    match config.format {
        OutputFormat::Text => {
            if let Some(footer) = reporter.footer(&report.summary) {
                println!("{}", footer);
            }
        }
        OutputFormat::Json => {
            println!("{}", reporter.json(&report.outcomes, &report.summary)?);
        }
    }

    Ok(report.exit_code())
}

fn cmd_file(path: &Path, format: OutputFormat) -> Result<i32> {
    let reporter = Reporter::new(Mode::Single, format).with_color(use_color());
    let outcome: FileOutcome = check::run_single(path);
    let summary = Summary::from_outcomes(std::slice::from_ref(&outcome));

    match format {
        OutputFormat::Text => println!("{}", reporter.outcome_line(&outcome)),
        OutputFormat::Json => {
            println!("{}", reporter.json(std::slice::from_ref(&outcome), &summary)?)
        }
    }

    Ok(check::exit_code(Mode::Single, &summary))
}

fn cmd_completion(shell: Shell) -> Result<i32> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "yamlcheck", &mut io::stdout());
    Ok(0)
}

fn cmd_version(verbose: bool) -> Result<i32> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("yamlcheck {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }

    Ok(0)
}
