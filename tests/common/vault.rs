//! Temporary vault fixtures

use moc_explorer::VaultStore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A vault directory that is removed when dropped
pub struct TestVault {
    dir: TempDir,
}

impl TestVault {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp vault"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a note, creating parent folders
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create note folder");
        }
        fs::write(&path, content).expect("write note");
        path
    }

    pub fn with(self, rel: &str, content: &str) -> Self {
        self.write(rel, content);
        self
    }

    pub fn mkdir(&self, rel: &str) {
        fs::create_dir_all(self.root().join(rel)).expect("create folder");
    }

    pub fn store(&self) -> VaultStore {
        VaultStore::open(self.root()).expect("open vault")
    }
}

/// `A` and `B` link to each other, `C` links nowhere; all under `Atlas/Maps`
pub fn mutual_pair_vault() -> TestVault {
    TestVault::new()
        .with("Atlas/Maps/A.md", "# A\n\nSee [[B]].\n")
        .with("Atlas/Maps/B.md", "# B\n\nBack to [[A]].\n")
        .with("Atlas/Maps/C.md", "# C\n\nNothing here yet.\n")
        .with("Notes/daily.md", "Nothing about maps today.\n")
}
