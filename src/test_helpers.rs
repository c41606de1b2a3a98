//! Shared test utilities.
//!
//! [`SiteDir`] builds a throwaway project tree in a temp directory:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = SiteDir::new()
//!     .page("about", "# About\nHello")
//!     .asset("images", "logo.png", b"png");
//! let pages = list_files_with_extension(&site.content(), "md").unwrap();
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::SiteConfig;

/// A project root holding `content/` and `templates/`.
pub struct SiteDir {
    tmp: TempDir,
}

impl SiteDir {
    /// Empty project with an existing (empty) `content/` directory.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();
        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn content(&self) -> PathBuf {
        self.root().join("content")
    }

    pub fn templates(&self) -> PathBuf {
        self.root().join("templates")
    }

    pub fn output(&self) -> PathBuf {
        self.root().join("build")
    }

    /// Config pointing at this project's directories.
    pub fn config(&self) -> SiteConfig {
        SiteConfig {
            content_dir: self.content(),
            templates_dir: self.templates(),
            output_dir: self.output(),
            ..SiteConfig::default()
        }
    }

    /// Add `content/<slug>.md`.
    pub fn page(self, slug: &str, markdown: &str) -> Self {
        fs::write(self.content().join(format!("{slug}.md")), markdown).unwrap();
        self
    }

    /// Add `content/<dir>/<file>`.
    pub fn asset(self, dir: &str, file: &str, bytes: &[u8]) -> Self {
        let dir = self.content().join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), bytes).unwrap();
        self
    }

    /// Add `templates/<name>`.
    pub fn template(self, name: &str, source: &str) -> Self {
        fs::create_dir_all(self.templates()).unwrap();
        fs::write(self.templates().join(name), source).unwrap();
        self
    }
}

/// Names of the `.html` files directly in `dir`, sorted.
pub fn html_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".html"))
        .collect();
    names.sort();
    names
}
