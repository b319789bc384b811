//! Shared helpers for driver tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A scratch directory holding one source file.
pub struct Workspace {
    pub dir: TempDir,
    pub source: PathBuf,
}

impl Workspace {
    pub fn with_source(name: &str, text: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let source = dir.path().join(name);
        std::fs::write(&source, text).expect("write source");
        Workspace { dir, source }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read output")
}
