// Shared fixtures for the integration tests
//
// Lays out an archive tree and asset mirrors in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use rehost::{Rehoster, SiteConfig};
use tempfile::TempDir;

/// A throwaway site: `<root>/archive/<host>/...` pages and `<root>/public/...` mirrors
pub struct SiteFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl SiteFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn archive_root(&self) -> PathBuf {
        self.root().join("archive")
    }

    pub fn public_root(&self) -> PathBuf {
        self.root().join("public")
    }

    /// Adds a page to the main archive, e.g. `page("blog/post/index.html", "...")`
    pub fn page(self, path: &str, html: &str) -> Self {
        let host = SiteConfig::default().domains.primary;
        self.write(&self.archive_root().join(host).join(path), html.as_bytes());
        self
    }

    /// Adds a page to the panel archive
    pub fn panel_page(self, path: &str, html: &str) -> Self {
        let host = SiteConfig::default().domains.panel;
        self.write(&self.archive_root().join(host).join(path), html.as_bytes());
        self
    }

    /// Adds a file under the public root, e.g. `asset("legacy/websithebama.com/a.png")`
    pub fn asset(self, path: &str) -> Self {
        self.write(&self.public_root().join(path), b"asset");
        self
    }

    pub fn raw_page(self, path: &str, bytes: &[u8]) -> Self {
        let host = SiteConfig::default().domains.primary;
        self.write(&self.archive_root().join(host).join(path), bytes);
        self
    }

    pub fn config(&self) -> SiteConfig {
        SiteConfig {
            archive_root: self.archive_root(),
            public_root: self.public_root(),
            ..SiteConfig::default()
        }
    }

    pub fn rehoster(&self) -> Rehoster {
        Rehoster::new(self.config())
    }

    fn write(&self, path: &Path, bytes: &[u8]) {
        fs::create_dir_all(path.parent().expect("fixture paths have a parent"))
            .expect("create fixture dirs");
        fs::write(path, bytes).expect("write fixture file");
    }
}

#[allow(dead_code)]
pub fn segments(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
