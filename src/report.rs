//! Per-file outcomes, aggregate summary and output rendering.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Result of parsing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseStatus {
    Ok,
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: ParseStatus,
}

impl FileOutcome {
    pub fn ok(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: ParseStatus::Ok,
        }
    }

    pub fn error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: ParseStatus::Error {
                message: message.into(),
            },
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ParseStatus::Ok
    }

    pub fn message(&self) -> Option<&str> {
        match &self.status {
            ParseStatus::Ok => None,
            ParseStatus::Error { message } => Some(message.as_str()),
        }
    }
}

/// Aggregate counts over a run. An empty run is successful.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &FileOutcome) {
        self.total += 1;
        if outcome.is_ok() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Which front end produced the outcomes; selects wording and exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Many files discovered from patterns and fixed paths
    Batch,
    /// One explicitly named file
    Single,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid format '{}', use 'text' or 'json'", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
struct JsonFile<'a> {
    path: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    counts: Summary,
    ok: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: Vec<JsonFile<'a>>,
    summary: JsonSummary,
}

/// Renders outcomes as status lines or as a single JSON document.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    pub mode: Mode,
    pub format: OutputFormat,
    pub color: bool,
}

impl Reporter {
    pub fn new(mode: Mode, format: OutputFormat) -> Self {
        Self {
            mode,
            format,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Status line(s) for one file in text format.
    pub fn outcome_line(&self, outcome: &FileOutcome) -> String {
        match (self.mode, &outcome.status) {
            (Mode::Batch, ParseStatus::Ok) => {
                format!("{} -> {}", display_path(&outcome.path), self.good("PARSE OK"))
            }
            (Mode::Batch, ParseStatus::Error { message }) => format!(
                "{} -> {}: {}",
                display_path(&outcome.path),
                self.bad("PARSE ERROR"),
                message
            ),
            (Mode::Single, ParseStatus::Ok) => format!("YAML PARSE: {}", self.good("OK")),
            (Mode::Single, ParseStatus::Error { message }) => {
                format!("YAML PARSE: {}\n{}", self.bad("ERROR"), message)
            }
        }
    }

    /// Closing line for a batch run; only printed when everything parsed.
    pub fn footer(&self, summary: &Summary) -> Option<String> {
        match self.mode {
            Mode::Batch if summary.is_success() => Some(self.good("ALL PARSE OK")),
            _ => None,
        }
    }

    pub fn json(&self, outcomes: &[FileOutcome], summary: &Summary) -> serde_json::Result<String> {
        let report = JsonReport {
            files: outcomes
                .iter()
                .map(|o| JsonFile {
                    path: display_path(&o.path),
                    status: if o.is_ok() { "ok" } else { "error" },
                    message: o.message(),
                })
                .collect(),
            summary: JsonSummary {
                counts: *summary,
                ok: summary.is_success(),
            },
        };
        serde_json::to_string_pretty(&report)
    }

    fn good(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
