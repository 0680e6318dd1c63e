//! File discovery from glob patterns and fixed paths.
//!
//! Patterns use recursive `**` matching. Wildcards never match a leading
//! `.`, so hidden files are skipped unless named literally.
//! Fixed paths are always included, whether they exist or not; a missing
//! one surfaces later as a parse error rather than disappearing.

use std::path::{Path, PathBuf};

use glob::MatchOptions;
use tracing::{debug, warn};

use crate::error::{CheckError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expand `patterns` and append `extra_paths`, resolving both against `root`.
///
/// The result is de-duplicated and sorted bytewise, so `docs/openapi.yaml`
/// sorts ahead of `docs/openapi/a.yaml`.
pub fn discover<P, E>(root: &Path, patterns: &[P], extra_paths: &[E]) -> Result<Vec<PathBuf>>
where
    P: AsRef<str>,
    E: AsRef<Path>,
{
    let mut found = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let full = resolve_pattern(root, pattern);

        let entries =
            glob::glob_with(&full, MATCH_OPTIONS).map_err(|source| CheckError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;

        for entry in entries {
            match entry {
                Ok(path) => {
                    debug!(pattern, path = %path.display(), "matched");
                    found.push(path);
                }
                Err(e) => {
                    warn!(path = %e.path().display(), error = %e.error(), "skipping unreadable path");
                }
            }
        }
    }

    for extra in extra_paths {
        let path = resolve_path(root, extra.as_ref());
        debug!(path = %path.display(), "fixed path");
        found.push(path);
    }

    found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    found.dedup();

    Ok(found)
}

/// Compile every pattern without walking the filesystem.
pub fn validate_patterns<P: AsRef<str>>(patterns: &[P]) -> Result<()> {
    for pattern in patterns {
        let pattern = pattern.as_ref();
        glob::Pattern::new(pattern).map_err(|source| CheckError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
    }
    Ok(())
}

fn is_current_dir(root: &Path) -> bool {
    root.as_os_str().is_empty() || root == Path::new(".")
}

fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || is_current_dir(root) {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn resolve_pattern(root: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() || is_current_dir(root) {
        return pattern.to_string();
    }

    // The root is a literal location; metacharacters in it must not glob.
    let root = glob::Pattern::escape(&root.to_string_lossy());
    Path::new(&root).join(pattern).to_string_lossy().into_owned()
}
