use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

use super::fixtures::load_fixture;

/// Isolated project directory with a `docs/` tree for yamlcheck to scan.
pub struct TestHarness {
    pub dir: TempDir,
    pub binary: PathBuf,
}

impl TestHarness {
    /// Creates an empty project directory (no docs, no config).
    pub fn new() -> Self {
        TestHarness {
            dir: TempDir::new().expect("Failed to create temp dir"),
            binary: PathBuf::from(env!("CARGO_BIN_EXE_yamlcheck")),
        }
    }

    /// Returns the base directory path (the TempDir path).
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path().join(rel);
        fs::create_dir_all(path.parent().expect("path has a parent"))
            .expect("Failed to create parent dir");
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes a named fixture from tests/fixtures to `rel`.
    pub fn write_fixture(&self, rel: &str, fixture: &str) -> PathBuf {
        self.write(rel, &load_fixture(fixture))
    }

    /// Executes the yamlcheck binary with the given arguments in the harness directory.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary)
            .args(args)
            .current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run yamlcheck")
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
