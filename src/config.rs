//! Configuration for batch runs.
//!
//! Merge order (later overrides earlier):
//! 1. Built-in defaults (`docs/openapi/**/*.yaml` plus `docs/openapi.yaml`)
//! 2. Project file (`yamlcheck.yaml`, or the path given with `--config`)
//! 3. Command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::discovery::validate_patterns;
use crate::error::{CheckError, Result};
use crate::parse::parse_str;
use crate::report::OutputFormat;

/// Project config file looked up in the working directory.
pub const CONFIG_FILE: &str = "yamlcheck.yaml";

macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

default_fn!(default_root, PathBuf, PathBuf::from("."));
default_fn!(
    default_patterns,
    Vec<String>,
    vec!["docs/openapi/**/*.yaml".to_string()]
);
default_fn!(
    default_paths,
    Vec<PathBuf>,
    vec![PathBuf::from("docs/openapi.yaml")]
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory for relative patterns and paths
    pub root: PathBuf,
    /// Glob patterns expanded recursively
    pub patterns: Vec<String>,
    /// Paths checked whether or not any pattern matched them
    pub paths: Vec<PathBuf>,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: default_root(),
            patterns: default_patterns(),
            paths: default_paths(),
            format: OutputFormat::default(),
        }
    }
}

/// Values supplied on the command line. Empty lists leave the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub patterns: Vec<String>,
    pub paths: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load the project file (if any) and apply `overrides`.
    ///
    /// An explicit `config_path` must exist; the default `yamlcheck.yaml` is optional.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => PartialConfig::load_from(path)?,
            None if Path::new(CONFIG_FILE).exists() => {
                PartialConfig::load_from(Path::new(CONFIG_FILE))?
            }
            None => PartialConfig::default(),
        };

        let config = file.merge_into(Self::default()).apply(overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config = PartialConfig::parse(content)?.merge_into(Self::default());
        config.validate()?;
        Ok(config)
    }

    /// An empty `root` is allowed and means the working directory.
    pub fn validate(&self) -> Result<()> {
        validate_patterns(&self.patterns)
    }

    fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if !overrides.patterns.is_empty() {
            self.patterns = overrides.patterns;
        }
        if !overrides.paths.is_empty() {
            self.paths = overrides.paths;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self
    }
}

/// Project file contents - all fields optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    root: Option<PathBuf>,
    patterns: Option<Vec<String>>,
    paths: Option<Vec<PathBuf>>,
    format: Option<OutputFormat>,
}

impl PartialConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        debug!(path = %path.display(), "loaded config");

        Self::parse(&content).map_err(|e| {
            CheckError::config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    fn parse(content: &str) -> Result<Self> {
        match parse_str(content)? {
            Value::Null => Ok(Self::default()),
            value => Ok(serde_yaml::from_value(value)?),
        }
    }

    /// A list present in the file replaces the default, even when empty.
    fn merge_into(self, base: Config) -> Config {
        Config {
            root: self.root.unwrap_or(base.root),
            patterns: self.patterns.unwrap_or(base.patterns),
            paths: self.paths.unwrap_or(base.paths),
            format: self.format.unwrap_or(base.format),
        }
    }
}
