//! Safe single-document YAML loading.
//!
//! Only the YAML core tags (`!!str`, `!!map`, ...) are accepted; any other
//! tag is an error, as there is no constructor for it. A stream must hold at
//! most one document; an empty stream loads as `null`.
//!
//! Mapping keys must be unique. Nesting deeper than 128 levels is rejected.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::value::Tag;
use serde_yaml::Value;
use tracing::debug;

use crate::error::{CheckError, Result};
use crate::report::FileOutcome;

const UTF8_BOM: &str = "\u{feff}";

const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

const CORE_TAGS: &[&str] = &[
    "str",
    "int",
    "float",
    "bool",
    "null",
    "map",
    "seq",
    "binary",
    "timestamp",
    "set",
    "omap",
    "pairs",
    "merge",
    "value",
];

/// Parse YAML text as a single document.
pub fn parse_str(content: &str) -> Result<Value> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    if is_blank_stream(content) {
        return Ok(Value::Null);
    }

    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        documents.push(Value::deserialize(document)?);
    }

    let value = match documents.len() {
        0 => Value::Null,
        1 => documents.remove(0),
        count => return Err(CheckError::MultipleDocuments { count }),
    };

    reject_unknown_tags(&value)?;
    Ok(value)
}

/// Read `path` as UTF-8 and parse it.
pub fn parse_file(path: &Path) -> Result<Value> {
    let bytes = fs::read(path).map_err(|e| CheckError::io(path, e))?;
    let content = String::from_utf8(bytes).map_err(|_| CheckError::Encoding {
        path: path.to_path_buf(),
    })?;

    parse_str(&content)
}

/// Parse `path` and capture the result without failing.
pub fn check_file(path: &Path) -> FileOutcome {
    match parse_file(path) {
        Ok(_) => {
            debug!(path = %path.display(), "parse ok");
            FileOutcome::ok(path)
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "parse error");
            FileOutcome::error(path, e.to_string())
        }
    }
}

fn reject_unknown_tags(value: &Value) -> Result<()> {
    match value {
        Value::Tagged(tagged) => {
            if !is_core_tag(&tagged.tag) {
                return Err(CheckError::UnsupportedTag {
                    tag: tagged.tag.to_string(),
                });
            }
            reject_unknown_tags(&tagged.value)
        }
        Value::Sequence(items) => items.iter().try_for_each(reject_unknown_tags),
        Value::Mapping(mapping) => mapping.iter().try_for_each(|(key, value)| {
            reject_unknown_tags(key)?;
            reject_unknown_tags(value)
        }),
        _ => Ok(()),
    }
}

/// Accepts both the `!!str` shorthand and the expanded `tag:yaml.org,2002:str`.
fn is_core_tag(tag: &Tag) -> bool {
    let tag = tag.to_string();
    let name = tag.trim_start_matches('!');
    let name = name.strip_prefix(CORE_TAG_PREFIX).unwrap_or(name);
    CORE_TAGS.contains(&name)
}

/// True when the stream is one empty document: nothing but whitespace,
/// comments and at most one start marker.
fn is_blank_stream(content: &str) -> bool {
    let mut starts = 0;
    let blank = content.lines().all(|line| {
        let line = line.trim();
        if line == "---" {
            starts += 1;
        }
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    });
    blank && starts <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_openapi_document() {
        let content = r#"openapi: 3.0.3
info:
  title: Orders
  version: "1.0"
paths:
  /orders:
    get:
      responses:
        "200":
          description: ok
"#;
        let value = parse_str(content).unwrap();
        assert_eq!(value["openapi"].as_str(), Some("3.0.3"));
        assert_eq!(value["info"]["title"].as_str(), Some("Orders"));
    }

    #[test]
    fn test_parse_empty_and_comment_only() {
        assert_eq!(parse_str("").unwrap(), Value::Null);
        assert_eq!(parse_str("\n\n").unwrap(), Value::Null);
        assert_eq!(parse_str("# nothing here\n---\n").unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_strips_bom() {
        let value = parse_str("\u{feff}title: x\n").unwrap();
        assert_eq!(value["title"].as_str(), Some("x"));
    }

    #[test]
    fn test_parse_leading_document_marker() {
        let value = parse_str("---\nopenapi: 3.1.0\n").unwrap();
        assert_eq!(value["openapi"].as_str(), Some("3.1.0"));
    }

    #[test]
    fn test_parse_rejects_multiple_documents() {
        let err = parse_str("a: 1\n---\nb: 2\n").unwrap_err();
        assert!(matches!(err, CheckError::MultipleDocuments { count: 2 }));
        assert!(err.to_string().contains("single document"));

        assert!(parse_str("---\n---\n").is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_yaml() {
        let err = parse_str("paths:\n  /a:\n    get: [unclosed\n").unwrap_err();
        assert!(matches!(err, CheckError::Yaml(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_parse_rejects_nested_mapping_on_one_line() {
        assert!(parse_str("title: a: b\n").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_tags() {
        let err = parse_str("schema: !include shared/schema.yaml\n").unwrap_err();
        assert!(matches!(err, CheckError::UnsupportedTag { ref tag } if tag == "!include"));
        assert!(err.to_string().contains("could not determine a constructor"));

        assert!(parse_str("cmd: !!python/object/apply:os.system [ls]\n").is_err());
        assert!(parse_str("paths:\n  - {a: !Ref x}\n").is_err());
    }

    #[test]
    fn test_parse_accepts_core_tags() {
        let value = parse_str("version: !!str 1.0\ncount: !!int 3\n").unwrap();
        assert!(value.get("version").is_some());
        assert!(value.get("count").is_some());
    }

    #[test]
    fn test_parse_rejects_duplicate_keys() {
        let err = parse_str("info:\n  title: a\n  title: b\n").unwrap_err();
        assert!(matches!(err, CheckError::Yaml(_)));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_parse_nesting_limit() {
        let shallow = format!("{}1{}", "[".repeat(20), "]".repeat(20));
        assert!(parse_str(&shallow).is_ok());

        let deep = format!("{}1{}", "[".repeat(200), "]".repeat(200));
        assert!(matches!(parse_str(&deep), Err(CheckError::Yaml(_))));
    }

    #[test]
    fn test_parse_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = parse_file(&tmp.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, CheckError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn test_parse_file_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("latin1.yaml");
        fs::write(&path, b"title: caf\xe9\n").unwrap();

        let err = parse_file(&path).unwrap_err();
        assert!(matches!(err, CheckError::Encoding { .. }));
    }

    #[test]
    fn test_parse_file_directory_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(parse_file(tmp.path()).is_err());
    }

    #[test]
    fn test_check_file_outcomes() {
        let tmp = TempDir::new().unwrap();
        let good = tmp.path().join("good.yaml");
        let bad = tmp.path().join("bad.yaml");
        fs::write(&good, "openapi: 3.0.0\n").unwrap();
        fs::write(&bad, "key: [1, 2\n").unwrap();

        assert!(check_file(&good).is_ok());

        let outcome = check_file(&bad);
        assert!(!outcome.is_ok());
        assert_eq!(outcome.path, bad);
        assert!(outcome.message().is_some());
    }
}
